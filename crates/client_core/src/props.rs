//! Initial prop values derived from a control schema.

use shared::{
    domain::{ComponentId, PropState, PropValue},
    schema::{ControlDescriptor, ControlSchema},
};

/// Text prop that mirrors the component id so a demo's body shows its name.
pub const CHILDREN_PROP: &str = "children";

/// Derives the starting value of every prop, in schema order.
pub fn initial_props(schema: &ControlSchema, component: &ComponentId) -> PropState {
    schema
        .iter()
        .map(|(key, descriptor)| (key, initial_value(key, descriptor, component)))
        .collect()
}

fn initial_value(key: &str, descriptor: &ControlDescriptor, component: &ComponentId) -> PropValue {
    match descriptor {
        ControlDescriptor::Choice { options } => {
            PropValue::Text(options.first().cloned().unwrap_or_default())
        }
        ControlDescriptor::Boolean => PropValue::Bool(false),
        ControlDescriptor::Text if key == CHILDREN_PROP => {
            PropValue::Text(component.as_str().to_string())
        }
        ControlDescriptor::Text => PropValue::Text(String::new()),
    }
}
