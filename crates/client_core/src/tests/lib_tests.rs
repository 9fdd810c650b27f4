use super::*;
use std::{collections::HashMap, time::Duration};

use axum::{extract::RawQuery, http::StatusCode, routing::get, Router};
use shared::{
    domain::{ComponentId, PropState, PropValue, RequestId},
    error::TransportError,
    protocol::{RenderOutcome, RenderRequest, RenderResult},
    schema::{ControlDescriptor, ControlSchema},
};
use tokio::net::TcpListener;

fn button_schema() -> ControlSchema {
    ControlSchema::from_entries([
        ("label", ControlDescriptor::Text),
        ("size", ControlDescriptor::choice(["small", "large"])),
        ("disabled", ControlDescriptor::Boolean),
    ])
    .expect("schema")
}

fn mounted_button() -> (PreviewSession, RenderRequest) {
    let mut session = PreviewSession::new();
    let request = session
        .apply(PreviewEvent::SchemaChanged {
            component: ComponentId::new("Button"),
            schema: button_schema(),
        })
        .expect("mount issues a request");
    (session, request)
}

fn url_of(request: &RenderRequest) -> String {
    build_render_url(&request.component, &request.props)
}

fn displayed_markup(session: &PreviewSession) -> Option<&str> {
    match session.displayed_result() {
        Some(RenderOutcome::Markup(markup)) => Some(markup.as_str()),
        _ => None,
    }
}

async fn render_component(RawQuery(query): RawQuery) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    if let Some(delay) = params.get("delay").and_then(|d| d.parse::<u64>().ok()) {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if params.get("component").map(String::as_str) == Some("Broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "render failed".to_string());
    }
    (StatusCode::OK, format!("<div data-query=\"{query}\"></div>"))
}

/// In-process stand-in for the rendering service. Echoes the query back inside
/// the markup, sleeps for `delay` milliseconds when asked, and fails for the
/// `Broken` component.
pub(crate) async fn spawn_render_server() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/render-component", get(render_component));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[test]
fn initial_props_follow_descriptor_defaults() {
    let props = initial_props(&button_schema(), &ComponentId::new("Button"));

    let entries: Vec<_> = props.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    assert_eq!(
        entries,
        vec![
            ("label".to_string(), PropValue::text("")),
            ("size".to_string(), PropValue::text("small")),
            ("disabled".to_string(), PropValue::Bool(false)),
        ]
    );
}

#[test]
fn children_text_prop_defaults_to_component_id() {
    let schema = ControlSchema::from_entries([
        ("children", ControlDescriptor::Text),
        ("title", ControlDescriptor::Text),
    ])
    .expect("schema");

    let props = initial_props(&schema, &ComponentId::new("Card"));
    assert_eq!(props.get("children"), Some(&PropValue::text("Card")));
    assert_eq!(props.get("title"), Some(&PropValue::text("")));
    assert_eq!(props.len(), schema.len());
}

#[test]
fn children_only_special_for_text_controls() {
    let schema = ControlSchema::from_entries([(
        "children",
        ControlDescriptor::choice(["one", "two"]),
    )])
    .expect("schema");

    let props = initial_props(&schema, &ComponentId::new("Card"));
    assert_eq!(props.get("children"), Some(&PropValue::text("one")));
}

#[test]
fn url_for_initial_props_skips_empty_text_but_keeps_false() {
    let (_, request) = mounted_button();
    assert_eq!(
        url_of(&request),
        "/render-component?component=Button&size=small&disabled=false"
    );
}

#[test]
fn editing_label_produces_documented_url() {
    let (mut session, _) = mounted_button();
    let request = session.set_prop("label", "Click me").expect("edit issues a request");

    assert_eq!(
        url_of(&request),
        "/render-component?component=Button&size=small&disabled=false&label=Click+me"
    );
}

#[test]
fn url_builder_is_deterministic() {
    let props: PropState = [
        ("variant", PropValue::text("primary")),
        ("disabled", PropValue::Bool(true)),
    ]
    .into_iter()
    .collect();
    let component = ComponentId::new("Button");

    assert_eq!(
        build_render_url(&component, &props),
        build_render_url(&component, &props)
    );
}

#[test]
fn url_builder_includes_each_non_empty_key_once() {
    let props: PropState = [
        ("a", PropValue::text("1")),
        ("empty", PropValue::text("")),
        ("flag", PropValue::Bool(true)),
    ]
    .into_iter()
    .collect();

    let query = render_query(&ComponentId::new("X"), &props);
    let keys: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, vec!["component", "a", "flag"]);
}

#[test]
fn url_builder_percent_encodes_reserved_characters() {
    let props: PropState = [("label", PropValue::text("a&b=c d/é"))].into_iter().collect();
    assert_eq!(
        build_render_url(&ComponentId::new("Button"), &props),
        "/render-component?component=Button&label=a%26b%3Dc+d%2F%C3%A9"
    );
}

#[test]
fn prop_named_component_replaces_component_param() {
    let props: PropState = [("component", PropValue::text("Other")), ("x", PropValue::text("1"))]
        .into_iter()
        .collect();
    assert_eq!(
        build_render_url(&ComponentId::new("Button"), &props),
        "/render-component?component=Other&x=1"
    );
}

#[test]
fn resolve_render_url_joins_service_base() {
    let props: PropState = [("size", PropValue::text("large"))].into_iter().collect();
    let url = resolve_render_url("http://localhost:4321/", &ComponentId::new("Button"), &props)
        .expect("url");
    assert_eq!(
        url.as_str(),
        "http://localhost:4321/render-component?component=Button&size=large"
    );

    let err = resolve_render_url("not a url", &ComponentId::new("Button"), &props)
        .expect_err("invalid base");
    assert!(matches!(err, TransportError::InvalidUrl(_)));
}

#[test]
fn repeating_an_edit_issues_new_request_with_identical_url() {
    let (mut session, _) = mounted_button();
    let first = session.set_prop("size", "large").expect("first edit");
    let second = session.set_prop("size", "large").expect("second edit");

    assert!(second.request_id > first.request_id);
    assert_eq!(url_of(&first), url_of(&second));
}

#[test]
fn edit_merges_single_key_and_keeps_others() {
    let (mut session, _) = mounted_button();
    session.set_prop("disabled", true);

    let props = session.current_props();
    assert_eq!(props.get("disabled"), Some(&PropValue::Bool(true)));
    assert_eq!(props.get("size"), Some(&PropValue::text("small")));
    assert_eq!(props.get("label"), Some(&PropValue::text("")));
    assert_eq!(props.len(), 3);
}

#[test]
fn request_ids_increase_monotonically() {
    let (mut session, mount) = mounted_button();
    assert_eq!(mount.request_id, RequestId(1));
    let edit = session.set_prop("size", "large").expect("edit");
    assert_eq!(edit.request_id, RequestId(2));
    let remount = session
        .apply(PreviewEvent::SchemaChanged {
            component: ComponentId::new("Badge"),
            schema: button_schema(),
        })
        .expect("remount");
    assert_eq!(remount.request_id, RequestId(3));
}

#[test]
fn phases_move_from_idle_to_loading_to_displaying() {
    let mut session = PreviewSession::new();
    assert_eq!(session.phase(), PreviewPhase::Idle);

    let request = session
        .apply(PreviewEvent::SchemaChanged {
            component: ComponentId::new("Button"),
            schema: button_schema(),
        })
        .expect("mount");
    assert_eq!(session.phase(), PreviewPhase::Loading);
    assert_eq!(session.pending_request_id(), Some(request.request_id));

    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(
        request.request_id,
        "<button>Button</button>",
    )));
    assert_eq!(
        session.phase(),
        PreviewPhase::Displaying(&RenderOutcome::Markup("<button>Button</button>".into()))
    );
    assert_eq!(session.pending_request_id(), None);
    assert!(!session.is_loading());
}

#[test]
fn late_result_of_older_request_is_never_displayed() {
    let (mut session, _) = mounted_button();
    let r1 = session.set_prop("size", "large").expect("r1");
    let r2 = session.set_prop("size", "small").expect("r2");

    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(r2.request_id, "r2")));
    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(r1.request_id, "r1")));

    assert_eq!(displayed_markup(&session), Some("r2"));
    assert!(!session.is_loading());
}

#[test]
fn late_success_does_not_hide_newer_failure() {
    let (mut session, _) = mounted_button();
    let r1 = session.set_prop("size", "large").expect("r1");
    let r2 = session.set_prop("size", "small").expect("r2");

    session.apply(PreviewEvent::ResultArrived(RenderResult::failure(
        r2.request_id,
        TransportError::Status(500),
    )));
    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(r1.request_id, "r1")));

    assert_eq!(
        session.displayed_result(),
        Some(&RenderOutcome::Failure(TransportError::Status(500)))
    );
}

#[test]
fn early_result_of_superseded_request_keeps_loading() {
    let (mut session, _) = mounted_button();
    let r1 = session.set_prop("size", "large").expect("r1");
    let r2 = session.set_prop("size", "small").expect("r2");

    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(r1.request_id, "r1")));
    assert!(session.is_loading());
    assert_eq!(session.pending_request_id(), Some(r2.request_id));
    assert_eq!(session.displayed_result(), None);
}

#[test]
fn rapid_size_edits_settle_on_last_value_in_any_arrival_order() {
    let arrival_orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

    for order in arrival_orders {
        let (mut session, mount) = mounted_button();
        session.apply(PreviewEvent::ResultArrived(RenderResult::markup(
            mount.request_id,
            url_of(&mount),
        )));

        let requests = [
            session.set_prop("size", "small").expect("small"),
            session.set_prop("size", "large").expect("large"),
            session.set_prop("size", "small").expect("small again"),
        ];
        for index in order {
            let request = &requests[index];
            session.apply(PreviewEvent::ResultArrived(RenderResult::markup(
                request.request_id,
                url_of(request),
            )));
        }

        let shown = displayed_markup(&session).expect("markup shown");
        assert!(shown.contains("size=small"), "order {order:?} showed {shown}");
        assert_eq!(shown, url_of(&requests[2]));
    }
}

#[test]
fn failure_is_displayed_with_fallback_message() {
    let (mut session, mount) = mounted_button();
    session.apply(PreviewEvent::ResultArrived(RenderResult::failure(
        mount.request_id,
        TransportError::Network("connection refused".into()),
    )));

    match session.phase() {
        PreviewPhase::Displaying(RenderOutcome::Failure(err)) => {
            assert_eq!(err.fallback_message(), "Failed to render component");
        }
        other => panic!("expected failure, got {other:?}"),
    }

    // The controls stay usable: another edit simply retries.
    let retry = session.set_prop("label", "again");
    assert!(retry.is_some());
    assert!(session.is_loading());
}

#[test]
fn schema_change_rederives_props_without_carry_over() {
    let (mut session, _) = mounted_button();
    session.set_prop("size", "large");
    session.set_prop("label", "Kept?");

    let schema = ControlSchema::from_entries([
        ("size", ControlDescriptor::choice(["xs", "xl"])),
        ("children", ControlDescriptor::Text),
    ])
    .expect("schema");
    session.apply(PreviewEvent::SchemaChanged {
        component: ComponentId::new("Tag"),
        schema,
    });

    let props = session.current_props();
    assert_eq!(props.get("size"), Some(&PropValue::text("xs")));
    assert_eq!(props.get("children"), Some(&PropValue::text("Tag")));
    assert!(!props.contains_key("label"));
    assert_eq!(session.component(), Some(&ComponentId::new("Tag")));
}

#[test]
fn result_from_before_schema_change_is_discarded() {
    let (mut session, mount) = mounted_button();
    let remount = session
        .apply(PreviewEvent::SchemaChanged {
            component: ComponentId::new("Other"),
            schema: button_schema(),
        })
        .expect("remount");

    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(mount.request_id, "old")));
    assert_eq!(session.pending_request_id(), Some(remount.request_id));
    assert_eq!(session.displayed_result(), None);
}

#[test]
fn unmounted_session_ignores_everything() {
    let (mut session, mount) = mounted_button();
    session.apply(PreviewEvent::Unmounted);

    session.apply(PreviewEvent::ResultArrived(RenderResult::markup(mount.request_id, "late")));
    assert_eq!(session.displayed_result(), None);
    assert!(session.set_prop("size", "large").is_none());
    assert!(!session.is_mounted());
    assert!(!session.is_loading());
}

#[test]
fn edits_before_mount_are_ignored() {
    let mut session = PreviewSession::new();
    assert!(session.set_prop("size", "large").is_none());
    assert!(session.current_props().is_empty());
    assert_eq!(session.latest_request_id(), None);
}

#[test]
fn controls_reflect_schema_order_and_current_values() {
    let (mut session, _) = mounted_button();
    session.set_prop("disabled", true);

    let widgets = control_widgets(session.schema(), session.current_props());
    assert_eq!(
        widgets,
        vec![
            ControlWidget::TextField {
                key: "label".into(),
                value: String::new(),
            },
            ControlWidget::Choice {
                key: "size".into(),
                options: vec!["small".into(), "large".into()],
                selected: "small".into(),
            },
            ControlWidget::Toggle {
                key: "disabled".into(),
                checked: true,
            },
        ]
    );
    assert_eq!(ControlWidget::toggle_caption(true), "Enabled");
    assert_eq!(ControlWidget::toggle_caption(false), "Disabled");
}

#[test]
fn controls_show_missing_values_as_empty() {
    let widgets = control_widgets(&button_schema(), &PropState::new());
    let keys: Vec<_> = widgets.iter().map(ControlWidget::key).collect();
    assert_eq!(keys, vec!["label", "size", "disabled"]);
    assert!(matches!(&widgets[1], ControlWidget::Choice { selected, .. } if selected.is_empty()));
    assert!(matches!(&widgets[2], ControlWidget::Toggle { checked: false, .. }));
}

#[test]
fn builtin_catalog_lists_documented_components_in_order() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let labels: Vec<_> = catalog.entries().iter().map(CatalogEntry::label).collect();
    assert_eq!(labels, vec!["Button", "Interactive Button", "React Counter"]);

    let counter = catalog.get("ReactCounter").expect("counter");
    let keys: Vec<_> = counter.controls.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["color", "step", "initialCount"]);
}

#[test]
fn catalog_rejects_unknown_kinds_duplicates_and_empty_files() {
    let unknown = Catalog::parse(
        r#"
        [[component]]
        id = "Slider"
        [component.controls]
        value = "number"
        "#,
    )
    .expect_err("unknown kind");
    assert!(matches!(unknown, CatalogError::Parse(_)));
    assert!(unknown.to_string().contains("number"));

    let duplicate = Catalog::parse(
        r#"
        [[component]]
        id = "Button"
        [[component]]
        id = "Button"
        "#,
    )
    .expect_err("duplicate");
    assert!(matches!(duplicate, CatalogError::DuplicateComponent(id) if id == "Button"));

    assert!(matches!(Catalog::parse(""), Err(CatalogError::Empty)));
}

#[test]
fn catalog_label_falls_back_to_id() {
    let catalog = Catalog::parse(
        r#"
        [[component]]
        id = "Badge"
        "#,
    )
    .expect("catalog");
    let badge = catalog.first().expect("entry");
    assert_eq!(badge.label(), "Badge");
    assert!(badge.controls.is_empty());
}

#[tokio::test]
async fn http_service_returns_markup_for_success() {
    let base = spawn_render_server().await.expect("spawn server");
    let service = HttpRenderService::new(base);
    let (_, request) = mounted_button();

    let markup = service.render(&request).await.expect("markup");
    assert_eq!(
        markup,
        "<div data-query=\"component=Button&size=small&disabled=false\"></div>"
    );
}

#[tokio::test]
async fn http_service_maps_error_status_to_transport_error() {
    let base = spawn_render_server().await.expect("spawn server");
    let service = HttpRenderService::new(base);
    let request = RenderRequest {
        request_id: RequestId(7),
        component: ComponentId::new("Broken"),
        props: PropState::new(),
    };

    let err = service.render(&request).await.expect_err("500 must fail");
    assert_eq!(err, TransportError::Status(500));
}

#[tokio::test]
async fn http_service_reports_unreachable_service_as_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpRenderService::with_timeout(format!("http://{addr}"), Duration::from_secs(2))
        .expect("client");
    let (_, request) = mounted_button();

    let err = service.render(&request).await.expect_err("unreachable");
    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
}
