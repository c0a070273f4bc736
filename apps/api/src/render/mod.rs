// Resume layout: font metrics, line building and pagination.
// Pure and CPU-bound; handlers call it through tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod layout;

pub use font_metrics::{FontFamily, PageConfig};
pub use layout::{render, RenderMode, RenderedResume};
