//! Toolkit-independent model of the controls panel.

use shared::{
    domain::{PropState, PropValue},
    schema::{ControlDescriptor, ControlSchema},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlWidget {
    Choice {
        key: String,
        options: Vec<String>,
        selected: String,
    },
    Toggle {
        key: String,
        checked: bool,
    },
    TextField {
        key: String,
        value: String,
    },
}

impl ControlWidget {
    pub fn key(&self) -> &str {
        match self {
            Self::Choice { key, .. } | Self::Toggle { key, .. } | Self::TextField { key, .. } => key,
        }
    }

    /// Caption shown next to a toggle.
    pub fn toggle_caption(checked: bool) -> &'static str {
        if checked {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

/// One widget per schema entry, in schema order, reflecting current values.
///
/// Props missing from `props` (or holding a value of the wrong shape) show as
/// empty text or an unchecked toggle.
pub fn control_widgets(schema: &ControlSchema, props: &PropState) -> Vec<ControlWidget> {
    schema
        .iter()
        .map(|(key, descriptor)| {
            let current = props.get(key);
            match descriptor {
                ControlDescriptor::Choice { options } => ControlWidget::Choice {
                    key: key.to_string(),
                    options: options.clone(),
                    selected: text_of(current),
                },
                ControlDescriptor::Boolean => ControlWidget::Toggle {
                    key: key.to_string(),
                    checked: current.and_then(PropValue::as_bool).unwrap_or(false),
                },
                ControlDescriptor::Text => ControlWidget::TextField {
                    key: key.to_string(),
                    value: text_of(current),
                },
            }
        })
        .collect()
}

fn text_of(value: Option<&PropValue>) -> String {
    value
        .and_then(PropValue::as_text)
        .unwrap_or_default()
        .to_string()
}
