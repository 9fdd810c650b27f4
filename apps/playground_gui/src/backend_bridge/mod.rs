//! Bridge between the egui thread and the async render backend.

pub mod runtime;
