//! Tokio runtime and render driver owned by the playground window.

use std::sync::Arc;

use client_core::{build_driver, HttpRenderService, RenderDriver, Settings};
use tokio::runtime::Runtime;

use crate::controller::events::{UiError, UiErrorContext};

pub struct RenderBackend {
    // Declared first so in-flight tasks are aborted before the runtime goes away.
    pub driver: Box<dyn RenderDriver>,
    _runtime: Runtime,
}

pub fn start_render_backend(settings: &Settings) -> Result<RenderBackend, UiError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("playground-render")
        .enable_all()
        .build()
        .map_err(|err| {
            tracing::error!("failed to build render runtime: {err}");
            UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("failed to build render runtime: {err}"),
            )
        })?;

    let service = HttpRenderService::with_timeout(
        settings.render_base_url.clone(),
        settings.request_timeout(),
    )
    .map_err(|err| {
        tracing::error!("failed to build render client: {err:#}");
        UiError::from_message(
            UiErrorContext::BackendStartup,
            format!("failed to build render client: {err:#}"),
        )
    })?;

    tracing::info!(
        base_url = service.base_url(),
        strategy = %settings.preview_strategy,
        "render backend started"
    );
    let driver = build_driver(
        settings.preview_strategy,
        runtime.handle().clone(),
        Arc::new(service),
    );
    Ok(RenderBackend {
        driver,
        _runtime: runtime,
    })
}
