//! Client side of the component playground: prop derivation, render URLs, the
//! preview controller and the drivers that talk to the rendering service.

pub mod catalog;
pub mod config;
pub mod controls;
pub mod driver;
pub mod frame;
pub mod preview;
pub mod props;
pub mod render;
pub mod url_builder;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use config::{load_settings, PreviewStrategy, Settings};
pub use controls::{control_widgets, ControlWidget};
pub use driver::{build_driver, ContentReplaceDriver, RenderDriver};
pub use frame::{IsolatedFrameDriver, PreviewFrame};
pub use preview::{PreviewEvent, PreviewPhase, PreviewSession};
pub use props::{initial_props, CHILDREN_PROP};
pub use render::{HttpRenderService, RenderService};
pub use url_builder::{build_render_url, render_query, resolve_render_url};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
