//! Hands requests issued by the preview session to the active render driver.

use client_core::RenderDriver;
use shared::protocol::RenderRequest;

pub fn dispatch_render(
    driver: Option<&mut (dyn RenderDriver + 'static)>,
    request: Option<RenderRequest>,
    status: &mut String,
) {
    let Some(request) = request else {
        return;
    };
    let Some(driver) = driver else {
        *status = "Render backend is not running; restart the playground".to_string();
        tracing::warn!(request_id = %request.request_id, "no render driver; dropping request");
        return;
    };

    tracing::debug!(
        request_id = %request.request_id,
        component = %request.component,
        in_flight = driver.in_flight(),
        "dispatching render request"
    );
    *status = format!("Rendering {}...", request.component);
    driver.dispatch(request);
}
