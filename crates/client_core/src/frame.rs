//! Isolated-frame preview strategy.
//!
//! Every render request navigates a brand-new [`PreviewFrame`]. A frame owns
//! its loader task and the only receiver for that task's load/error signal, so
//! replacing the frame drops the receiver: a late signal from a superseded
//! navigation has nowhere to go and can never clear the loading state of the
//! frame that replaced it.

use std::sync::Arc;

use shared::{
    domain::{FrameId, RequestId},
    error::TransportError,
    protocol::{RenderRequest, RenderResult},
};
use tokio::{
    runtime::Handle,
    sync::oneshot::{self, error::TryRecvError},
    task::JoinHandle,
};
use tracing::debug;

use crate::{driver::RenderDriver, render::RenderService, url_builder::build_render_url};

#[derive(Debug)]
enum FrameSignal {
    Loaded(String),
    Failed(TransportError),
}

pub struct PreviewFrame {
    id: FrameId,
    request_id: RequestId,
    location: String,
    signal: oneshot::Receiver<FrameSignal>,
    loader: JoinHandle<()>,
    settled: bool,
}

impl PreviewFrame {
    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Render path the frame navigated to.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn poll_signal(&mut self) -> Option<RenderResult> {
        if self.settled {
            return None;
        }
        match self.signal.try_recv() {
            Ok(signal) => {
                self.settled = true;
                let result = match signal {
                    FrameSignal::Loaded(markup) => RenderResult::markup(self.request_id, markup),
                    FrameSignal::Failed(err) => RenderResult::failure(self.request_id, err),
                };
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.settled = true;
                debug!(frame = %self.id, "frame loader ended without a signal");
                None
            }
        }
    }
}

impl Drop for PreviewFrame {
    fn drop(&mut self) {
        if !self.loader.is_finished() {
            self.loader.abort();
        }
    }
}

pub struct IsolatedFrameDriver {
    runtime: Handle,
    service: Arc<dyn RenderService>,
    last_frame: u64,
    current: Option<PreviewFrame>,
    shut_down: bool,
}

impl IsolatedFrameDriver {
    pub fn new(runtime: Handle, service: Arc<dyn RenderService>) -> Self {
        Self {
            runtime,
            service,
            last_frame: 0,
            current: None,
            shut_down: false,
        }
    }

    pub fn current_frame(&self) -> Option<&PreviewFrame> {
        self.current.as_ref()
    }

    fn navigate(&mut self, request: RenderRequest) -> PreviewFrame {
        self.last_frame += 1;
        let id = FrameId(self.last_frame);
        let request_id = request.request_id;
        let location = build_render_url(&request.component, &request.props);
        let (signal_tx, signal_rx) = oneshot::channel();
        let service = Arc::clone(&self.service);

        let loader = self.runtime.spawn(async move {
            let signal = match service.render(&request).await {
                Ok(markup) => FrameSignal::Loaded(markup),
                Err(err) => FrameSignal::Failed(err),
            };
            if signal_tx.send(signal).is_err() {
                debug!(frame = %id, "frame replaced before it finished loading");
            }
        });

        debug!(frame = %id, %request_id, %location, "navigating new preview frame");
        PreviewFrame {
            id,
            request_id,
            location,
            signal: signal_rx,
            loader,
            settled: false,
        }
    }
}

impl RenderDriver for IsolatedFrameDriver {
    fn dispatch(&mut self, request: RenderRequest) {
        if self.shut_down {
            debug!(request_id = %request.request_id, "driver shut down; dropping request");
            return;
        }
        // Drop the old frame first so its signal can no longer be observed.
        self.current = None;
        let frame = self.navigate(request);
        self.current = Some(frame);
    }

    fn drain(&mut self) -> Vec<RenderResult> {
        self.current
            .as_mut()
            .and_then(PreviewFrame::poll_signal)
            .into_iter()
            .collect()
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        self.current = None;
    }

    fn in_flight(&self) -> usize {
        self.current
            .as_ref()
            .map_or(0, |frame| usize::from(!frame.settled))
    }
}
