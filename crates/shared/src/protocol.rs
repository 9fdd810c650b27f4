use serde::Serialize;

use crate::{
    domain::{ComponentId, PropState, RequestId},
    error::TransportError,
};

/// Path of the rendering service endpoint.
pub const RENDER_COMPONENT_PATH: &str = "/render-component";
/// Query parameter carrying the component identifier.
pub const COMPONENT_PARAM: &str = "component";

/// Snapshot of what to render, taken when the request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    pub request_id: RequestId,
    pub component: ComponentId,
    pub props: PropState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Markup(String),
    Failure(TransportError),
}

impl RenderOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<Result<String, TransportError>> for RenderOutcome {
    fn from(value: Result<String, TransportError>) -> Self {
        match value {
            Ok(markup) => Self::Markup(markup),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Outcome of a render request, tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub request_id: RequestId,
    pub outcome: RenderOutcome,
}

impl RenderResult {
    pub fn new(request_id: RequestId, outcome: impl Into<RenderOutcome>) -> Self {
        Self {
            request_id,
            outcome: outcome.into(),
        }
    }

    pub fn markup(request_id: RequestId, markup: impl Into<String>) -> Self {
        Self::new(request_id, RenderOutcome::Markup(markup.into()))
    }

    pub fn failure(request_id: RequestId, err: TransportError) -> Self {
        Self::new(request_id, RenderOutcome::Failure(err))
    }
}
