//! Render drivers turn issued render requests into results on the async
//! runtime while the UI thread keeps running.
//!
//! Drivers are polled: the owner calls [`RenderDriver::drain`] from its event
//! loop and feeds every result into the preview controller, which decides
//! whether it is still current.

use std::sync::Arc;

use shared::{
    domain::RequestId,
    protocol::{RenderRequest, RenderResult},
};
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{config::PreviewStrategy, frame::IsolatedFrameDriver, render::RenderService};

pub trait RenderDriver: Send {
    fn dispatch(&mut self, request: RenderRequest);
    /// Results that arrived since the last call, in arrival order.
    fn drain(&mut self) -> Vec<RenderResult>;
    /// Best-effort abort of in-flight work; nothing is delivered afterwards.
    fn shutdown(&mut self);
    fn in_flight(&self) -> usize;
}

pub fn build_driver(
    strategy: PreviewStrategy,
    runtime: Handle,
    service: Arc<dyn RenderService>,
) -> Box<dyn RenderDriver> {
    match strategy {
        PreviewStrategy::ContentReplace => Box::new(ContentReplaceDriver::new(runtime, service)),
        PreviewStrategy::IsolatedFrame => Box::new(IsolatedFrameDriver::new(runtime, service)),
    }
}

/// Fetches markup for every request concurrently and hands back every result,
/// stale ones included. The preview controller's request-id check is what
/// keeps superseded markup off screen.
pub struct ContentReplaceDriver {
    runtime: Handle,
    service: Arc<dyn RenderService>,
    results_tx: mpsc::UnboundedSender<RenderResult>,
    results_rx: mpsc::UnboundedReceiver<RenderResult>,
    tasks: Vec<(RequestId, JoinHandle<()>)>,
    shut_down: bool,
}

impl ContentReplaceDriver {
    pub fn new(runtime: Handle, service: Arc<dyn RenderService>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            service,
            results_tx,
            results_rx,
            tasks: Vec::new(),
            shut_down: false,
        }
    }
}

impl RenderDriver for ContentReplaceDriver {
    fn dispatch(&mut self, request: RenderRequest) {
        if self.shut_down {
            debug!(request_id = %request.request_id, "driver shut down; dropping request");
            return;
        }
        self.tasks.retain(|(_, task)| !task.is_finished());

        let request_id = request.request_id;
        let service = Arc::clone(&self.service);
        let results_tx = self.results_tx.clone();
        let task = self.runtime.spawn(async move {
            let outcome = service.render(&request).await;
            let _ = results_tx.send(RenderResult::new(request.request_id, outcome));
        });
        self.tasks.push((request_id, task));
    }

    fn drain(&mut self) -> Vec<RenderResult> {
        let mut results = Vec::new();
        if self.shut_down {
            return results;
        }
        while let Ok(result) = self.results_rx.try_recv() {
            results.push(result);
        }
        results
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        for (request_id, task) in self.tasks.drain(..) {
            if !task.is_finished() {
                debug!(%request_id, "aborting in-flight render request");
                task.abort();
            }
        }
        self.results_rx.close();
    }

    fn in_flight(&self) -> usize {
        self.tasks
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .count()
    }
}
