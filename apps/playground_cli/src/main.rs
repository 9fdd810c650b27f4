use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    build_render_url, load_settings, Catalog, CatalogEntry, HttpRenderService, PreviewEvent,
    PreviewSession, RenderService,
};
use shared::{
    domain::PropValue,
    protocol::{RenderOutcome, RenderRequest, RenderResult},
    schema::ControlDescriptor,
};

#[derive(Parser, Debug)]
#[command(name = "playground", about = "Inspect and render documented components")]
struct Cli {
    /// Catalog TOML to read instead of the configured/built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Base URL of the rendering service.
    #[arg(long, global = true)]
    render_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog components.
    List,
    /// Print the initial prop values of a component as JSON.
    Props { component: String },
    /// Print the render URL after applying `--set` edits in order.
    Url {
        component: String,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Fetch rendered markup from the rendering service.
    Render {
        component: String,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(path) = cli.catalog {
        settings.catalog_path = Some(path);
    }
    if let Some(url) = cli.render_url {
        settings.render_base_url = url;
    }
    let catalog = Catalog::load_or_builtin(settings.catalog_path.as_deref())
        .context("failed to load component catalog")?;

    match cli.command {
        Command::List => {
            for entry in catalog.entries() {
                println!("{}\t{}", entry.id, entry.label());
            }
        }
        Command::Props { component } => {
            let (session, _) = mount(&catalog, &component, &[])?;
            println!("{}", serde_json::to_string_pretty(session.current_props())?);
        }
        Command::Url { component, set } => {
            let (_, request) = mount(&catalog, &component, &set)?;
            println!("{}", build_render_url(&request.component, &request.props));
        }
        Command::Render { component, set } => {
            let (mut session, request) = mount(&catalog, &component, &set)?;
            let service = HttpRenderService::with_timeout(
                settings.render_base_url.clone(),
                settings.request_timeout(),
            )?;
            tracing::info!(
                request_id = %request.request_id,
                base_url = service.base_url(),
                "rendering component"
            );
            let outcome = service.render(&request).await;
            session.apply(PreviewEvent::ResultArrived(RenderResult::new(
                request.request_id,
                outcome,
            )));

            match session.displayed_result() {
                Some(RenderOutcome::Markup(markup)) => println!("{markup}"),
                Some(RenderOutcome::Failure(err)) => {
                    bail!("{}: {err}", err.fallback_message());
                }
                None => bail!("no render result for request {}", request.request_id),
            }
        }
    }

    Ok(())
}

/// Mounts `component` and applies each `KEY=VALUE` edit in order, returning
/// the session and the request for its final state.
fn mount(
    catalog: &Catalog,
    component: &str,
    assignments: &[String],
) -> Result<(PreviewSession, RenderRequest)> {
    let entry = catalog
        .get(component)
        .ok_or_else(|| anyhow!("component '{component}' is not in the catalog"))?;

    let mut session = PreviewSession::new();
    let mut request = session
        .apply(PreviewEvent::SchemaChanged {
            component: entry.id.clone(),
            schema: entry.controls.clone(),
        })
        .ok_or_else(|| anyhow!("preview session did not issue a render request"))?;

    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        let value = coerce_value(entry, &key, &value)?;
        if let Some(next) = session.set_prop(key, value) {
            request = next;
        }
    }

    Ok((session, request))
}

fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("empty prop name in '{raw}'");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Applies the same limits the controls panel enforces structurally.
fn coerce_value(entry: &CatalogEntry, key: &str, value: &str) -> Result<PropValue> {
    let descriptor = entry
        .controls
        .get(key)
        .ok_or_else(|| anyhow!("component '{}' has no control named '{key}'", entry.id))?;

    match descriptor {
        ControlDescriptor::Boolean => match value {
            "true" => Ok(PropValue::Bool(true)),
            "false" => Ok(PropValue::Bool(false)),
            other => bail!("'{key}' is a toggle; expected true or false, got '{other}'"),
        },
        ControlDescriptor::Choice { options } => {
            if options.iter().any(|option| option == value) {
                Ok(PropValue::text(value))
            } else {
                bail!("'{value}' is not an option for '{key}' ({})", options.join(", "))
            }
        }
        ControlDescriptor::Text => Ok(PropValue::text(value)),
    }
}
