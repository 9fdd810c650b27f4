//! Errors surfaced in the playground's status banner.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Config,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Catalog,
    Render,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("unknown control kind")
            || message_lower.contains("no options")
            || message_lower.contains("more than once")
            || message_lower.contains("invalid")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("failed to read")
            || message_lower.contains("no such file")
            || message_lower.contains("permission denied")
            || message_lower.contains("catalog")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Config
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("status")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Whether the preview can still work once the banner is dismissed.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line banner text.
    pub fn headline(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Render backend unavailable",
            UiErrorContext::Catalog => "Catalog problem",
            UiErrorContext::Render => "Render problem",
            UiErrorContext::General => "Error",
        };
        format!("{prefix}: {}", self.message)
    }
}
