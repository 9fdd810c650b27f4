//! Controller layer: error modeling and render dispatch for the playground window.

pub mod events;
pub mod orchestration;
