//! Preview controller: owns the prop state of one mounted playground and
//! decides which render result may be displayed.
//!
//! The controller is a reducer. Every input is a [`PreviewEvent`]; applying
//! one may yield a [`RenderRequest`] that the caller hands to a render driver.
//! Results are only applied when they answer the most recently issued
//! request, so a slow response to a superseded request is never shown.

use shared::{
    domain::{ComponentId, PropState, PropValue, RequestId},
    protocol::{RenderOutcome, RenderRequest, RenderResult},
    schema::ControlSchema,
};
use tracing::debug;

use crate::props::initial_props;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// Mount, or the documented component/schema changed. Props are derived
    /// from scratch; earlier values are not carried over.
    SchemaChanged {
        component: ComponentId,
        schema: ControlSchema,
    },
    PropEdited {
        key: String,
        value: PropValue,
    },
    ResultArrived(RenderResult),
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase<'a> {
    Idle,
    Loading,
    Displaying(&'a RenderOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Mounted,
    Unmounted,
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    lifecycle: Lifecycle,
    component: Option<ComponentId>,
    schema: ControlSchema,
    current_props: PropState,
    last_issued: u64,
    displayed_result: Option<RenderOutcome>,
    is_loading: bool,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSession {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Mounted,
            component: None,
            schema: ControlSchema::new(),
            current_props: PropState::new(),
            last_issued: 0,
            displayed_result: None,
            is_loading: false,
        }
    }

    pub fn apply(&mut self, event: PreviewEvent) -> Option<RenderRequest> {
        if self.lifecycle == Lifecycle::Unmounted {
            debug!(?event, "preview session unmounted; ignoring event");
            return None;
        }

        match event {
            PreviewEvent::SchemaChanged { component, schema } => {
                self.current_props = initial_props(&schema, &component);
                self.schema = schema;
                self.component = Some(component.clone());
                Some(self.issue_request(component))
            }
            PreviewEvent::PropEdited { key, value } => {
                let Some(component) = self.component.clone() else {
                    debug!(%key, "prop edited before a component was mounted; ignoring");
                    return None;
                };
                self.current_props.set(key, value);
                Some(self.issue_request(component))
            }
            PreviewEvent::ResultArrived(result) => {
                self.apply_result(result);
                None
            }
            PreviewEvent::Unmounted => {
                self.lifecycle = Lifecycle::Unmounted;
                self.is_loading = false;
                debug!(last_issued = self.last_issued, "preview session unmounted");
                None
            }
        }
    }

    /// Convenience for the controls view callback.
    pub fn set_prop(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropValue>,
    ) -> Option<RenderRequest> {
        self.apply(PreviewEvent::PropEdited {
            key: key.into(),
            value: value.into(),
        })
    }

    fn issue_request(&mut self, component: ComponentId) -> RenderRequest {
        self.last_issued += 1;
        self.is_loading = true;
        let request = RenderRequest {
            request_id: RequestId(self.last_issued),
            component,
            props: self.current_props.clone(),
        };
        debug!(
            request_id = %request.request_id,
            component = %request.component,
            "issued render request"
        );
        request
    }

    fn apply_result(&mut self, result: RenderResult) {
        if !self.is_latest(result.request_id) {
            debug!(
                request_id = %result.request_id,
                latest = self.last_issued,
                "discarding stale render result"
            );
            return;
        }

        if let RenderOutcome::Failure(err) = &result.outcome {
            debug!(request_id = %result.request_id, error = %err, "render request failed");
        } else {
            debug!(request_id = %result.request_id, "render result applied");
        }
        self.displayed_result = Some(result.outcome);
        self.is_loading = false;
    }

    pub fn is_latest(&self, request_id: RequestId) -> bool {
        self.last_issued != 0 && request_id.0 == self.last_issued
    }

    pub fn phase(&self) -> PreviewPhase<'_> {
        if self.is_loading {
            return PreviewPhase::Loading;
        }
        match &self.displayed_result {
            Some(outcome) => PreviewPhase::Displaying(outcome),
            None => PreviewPhase::Idle,
        }
    }

    pub fn component(&self) -> Option<&ComponentId> {
        self.component.as_ref()
    }

    pub fn schema(&self) -> &ControlSchema {
        &self.schema
    }

    pub fn current_props(&self) -> &PropState {
        &self.current_props
    }

    /// Id of the request whose result is still awaited, if any.
    pub fn pending_request_id(&self) -> Option<RequestId> {
        self.is_loading.then_some(RequestId(self.last_issued))
    }

    pub fn latest_request_id(&self) -> Option<RequestId> {
        (self.last_issued != 0).then_some(RequestId(self.last_issued))
    }

    pub fn displayed_result(&self) -> Option<&RenderOutcome> {
        self.displayed_result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }
}
