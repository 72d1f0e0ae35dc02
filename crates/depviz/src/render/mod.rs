//! Graph rendering.
//!
//! - [`render_text`]: plain-text tree written to the text output file
//! - [`render_diagram_source`]: D2 diagram source
//! - [`DiagramRenderer`]: external collaborator turning D2 source into an
//!   image; [`D2Cli`] runs the `d2` binary
//!
//! Graph logic never invokes a renderer; the pipeline injects one.

mod d2;
mod external;
mod text;

pub use d2::render_diagram_source;
pub use external::{D2Cli, DiagramRenderer};
pub use text::render_text;
