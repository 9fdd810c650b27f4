use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, Catalog, PreviewStrategy, Settings};
use controller::events::{UiError, UiErrorContext};
use eframe::egui;
use ui::{
    app::{PersistedPlaygroundState, STATE_STORAGE_KEY},
    PlaygroundApp, StartupConfig,
};

#[derive(Parser, Debug)]
#[command(name = "playground_gui", about = "Interactive component playground")]
struct Args {
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    render_url: Option<String>,
    /// `content_replace` or `isolated_frame`.
    #[arg(long)]
    strategy: Option<PreviewStrategy>,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(path) = self.catalog {
            settings.catalog_path = Some(path);
        }
        if let Some(url) = self.render_url {
            settings.render_base_url = url;
        }
        if let Some(strategy) = self.strategy {
            settings.preview_strategy = strategy;
        }
    }
}

/// Falls back to the built-in catalog so the window still opens when the
/// configured one is unusable.
fn load_catalog(settings: &Settings) -> Result<(Catalog, Option<UiError>), UiError> {
    match Catalog::load_or_builtin(settings.catalog_path.as_deref()) {
        Ok(catalog) => Ok((catalog, None)),
        Err(err) => {
            tracing::error!("failed to load catalog: {err}");
            let banner = UiError::from_message(UiErrorContext::Catalog, err.to_string());
            let builtin = Catalog::builtin().map_err(|builtin_err| {
                UiError::from_message(UiErrorContext::Catalog, builtin_err.to_string())
            })?;
            Ok((builtin, Some(banner)))
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut settings = load_settings();
    Args::parse().apply(&mut settings);
    tracing::info!(?settings, "starting playground");

    let (catalog, catalog_error) = match load_catalog(&settings) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{}", err.headline());
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Component Playground")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Component Playground",
        options,
        Box::new(move |cc| {
            let persisted_selection = cc
                .storage
                .and_then(|storage| storage.get_string(STATE_STORAGE_KEY))
                .and_then(|text| serde_json::from_str::<PersistedPlaygroundState>(&text).ok())
                .and_then(|state| state.selected_component);
            Ok(Box::new(PlaygroundApp::new(
                StartupConfig {
                    settings,
                    catalog,
                    catalog_error,
                },
                persisted_selection,
            )))
        }),
    )
}
