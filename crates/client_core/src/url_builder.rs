//! Canonical render URLs for the rendering service.

use shared::{
    domain::{ComponentId, PropState},
    error::TransportError,
    protocol::{COMPONENT_PARAM, RENDER_COMPONENT_PATH},
};
use url::{form_urlencoded, Url};

/// Builds `/render-component?component=<id>&<key>=<value>...`.
///
/// Props are encoded in `PropState` order. Empty text values are omitted so
/// the service falls back to its own defaults; booleans encode as
/// `true`/`false`. Output is byte-for-byte stable for identical input.
pub fn build_render_url(component: &ComponentId, props: &PropState) -> String {
    format!("{RENDER_COMPONENT_PATH}?{}", render_query(component, props))
}

/// Query string without the leading `?`.
///
/// Every parameter appears once: a prop named `component` replaces the
/// component id in place, the same way repeated `set` calls on a search
/// parameter list would.
pub fn render_query(component: &ComponentId, props: &PropState) -> String {
    let mut pairs: Vec<(&str, String)> = vec![(COMPONENT_PARAM, component.as_str().to_string())];
    for (key, value) in props.iter() {
        if value.is_unset() {
            continue;
        }
        match pairs.iter_mut().find(|(name, _)| *name == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => pairs.push((key, value.to_string())),
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        query.append_pair(key, value);
    }
    query.finish()
}

/// Absolute render URL against the configured service base.
pub fn resolve_render_url(
    base: &str,
    component: &ComponentId,
    props: &PropState,
) -> Result<Url, TransportError> {
    let base = Url::parse(base).map_err(|err| TransportError::InvalidUrl(format!("{base}: {err}")))?;
    base.join(&build_render_url(component, props))
        .map_err(|err| TransportError::InvalidUrl(err.to_string()))
}
