use thiserror::Error;

/// Problems with an author-supplied control schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown control kind '{kind}'{}", prop_suffix(.prop.as_deref()))]
    UnknownKind { prop: Option<String>, kind: String },
    #[error("choice control for prop '{0}' has no options")]
    EmptyChoice(String),
    #[error("prop '{0}' is declared more than once")]
    DuplicateProp(String),
}

fn prop_suffix(prop: Option<&str>) -> String {
    prop.map(|name| format!(" for prop '{name}'"))
        .unwrap_or_default()
}

impl SchemaError {
    pub fn for_prop(self, name: &str) -> Self {
        match self {
            Self::UnknownKind { prop: None, kind } => Self::UnknownKind {
                prop: Some(name.to_string()),
                kind,
            },
            other => other,
        }
    }
}

/// A render request that did not produce markup.
///
/// Every variant is displayed the same way in the preview; the detail is only
/// secondary text and log context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("rendering service responded with status {0}")]
    Status(u16),
    #[error("invalid render url: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    pub const FALLBACK_MESSAGE: &'static str = "Failed to render component";

    pub fn fallback_message(&self) -> &'static str {
        Self::FALLBACK_MESSAGE
    }
}
