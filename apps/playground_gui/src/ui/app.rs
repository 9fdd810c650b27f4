use client_core::{
    control_widgets, Catalog, PreviewEvent, PreviewStrategy, PreviewSession, Settings,
};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ComponentId, PropValue},
    protocol::RenderOutcome,
};

use crate::{
    backend_bridge::runtime::{start_render_backend, RenderBackend},
    controller::{events::UiError, orchestration::dispatch_render},
    ui::{controls::show_controls, preview::show_preview},
};

pub const STATE_STORAGE_KEY: &str = "playground_gui.state";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPlaygroundState {
    #[serde(default)]
    pub selected_component: Option<String>,
}

pub struct StartupConfig {
    pub settings: Settings,
    pub catalog: Catalog,
    /// Set when the configured catalog could not be used and the built-in one
    /// was loaded instead.
    pub catalog_error: Option<UiError>,
}

pub struct PlaygroundApp {
    backend: Option<RenderBackend>,
    catalog: Catalog,
    session: PreviewSession,
    selected: Option<ComponentId>,
    strategy: PreviewStrategy,
    render_base_url: String,
    status: String,
    status_banner: Option<UiError>,
}

impl PlaygroundApp {
    pub fn new(startup: StartupConfig, persisted_selection: Option<String>) -> Self {
        let (backend, backend_error) = match start_render_backend(&startup.settings) {
            Ok(backend) => (Some(backend), None),
            Err(err) => (None, Some(err)),
        };

        let mut app = Self {
            backend,
            catalog: startup.catalog,
            session: PreviewSession::new(),
            selected: None,
            strategy: startup.settings.preview_strategy,
            render_base_url: startup.settings.render_base_url,
            status: "Ready".to_string(),
            status_banner: backend_error.or(startup.catalog_error),
        };

        let initial = persisted_selection
            .as_deref()
            .and_then(|id| app.catalog.get(id))
            .or_else(|| app.catalog.first())
            .map(|entry| entry.id.clone());
        if let Some(id) = initial {
            app.select_component(&id);
        }
        app
    }

    /// Mounts `id` in the preview; a no-op when it is already selected.
    pub fn select_component(&mut self, id: &ComponentId) {
        if self.selected.as_ref() == Some(id) {
            return;
        }
        let Some(entry) = self.catalog.get(id.as_str()) else {
            tracing::warn!(component = %id, "selected component is not in the catalog");
            return;
        };

        let request = self.session.apply(PreviewEvent::SchemaChanged {
            component: entry.id.clone(),
            schema: entry.controls.clone(),
        });
        self.selected = Some(entry.id.clone());
        dispatch_render(
            self.backend.as_mut().map(|backend| backend.driver.as_mut()),
            request,
            &mut self.status,
        );
    }

    pub fn edit_prop(&mut self, key: String, value: PropValue) {
        let request = self.session.set_prop(key, value);
        dispatch_render(
            self.backend.as_mut().map(|backend| backend.driver.as_mut()),
            request,
            &mut self.status,
        );
    }

    /// Feeds every result the driver collected into the session.
    pub fn poll_results(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let results = backend.driver.drain();
        if results.is_empty() {
            return;
        }
        for result in results {
            self.session.apply(PreviewEvent::ResultArrived(result));
        }

        if !self.session.is_loading() {
            let component = self
                .session
                .component()
                .map(ToString::to_string)
                .unwrap_or_default();
            self.status = match self.session.displayed_result() {
                Some(RenderOutcome::Failure(err)) => format!("{}: {err}", err.fallback_message()),
                _ => format!("Rendered {component}"),
            };
        }
    }

    pub fn selected(&self) -> Option<&ComponentId> {
        self.selected.as_ref()
    }

    pub fn session(&self) -> &PreviewSession {
        &self.session
    }

    pub fn status_banner(&self) -> Option<&UiError> {
        self.status_banner.as_ref()
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("playground_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Component playground");
                ui.separator();
                ui.label(format!("{} via {}", self.render_base_url, self.strategy.label()));
                ui.separator();
                ui.weak(self.status.as_str());
            });

            let mut dismissed = false;
            if let Some(banner) = &self.status_banner {
                ui.horizontal(|ui| {
                    ui.colored_label(ui.visuals().error_fg_color, banner.headline());
                    if !banner.is_fatal() && ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            }
            if dismissed {
                self.status_banner = None;
            }
        });
    }

    fn show_component_list(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::SidePanel::left("component_list")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Components");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for entry in self.catalog.entries() {
                        let is_selected = self.selected.as_ref() == Some(&entry.id);
                        if ui.selectable_label(is_selected, entry.label()).clicked() {
                            clicked = Some(entry.id.clone());
                        }
                    }
                });
            });

        if let Some(id) = clicked {
            self.select_component(&id);
        }
    }

    fn show_workspace(&mut self, ctx: &egui::Context) {
        let mut edits = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            let title = self
                .selected
                .as_ref()
                .and_then(|id| self.catalog.get(id.as_str()))
                .map(|entry| entry.label().to_string())
                .unwrap_or_else(|| "No component selected".to_string());
            ui.heading(title);
            ui.add_space(8.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Controls").strong());
                let widgets = control_widgets(self.session.schema(), self.session.current_props());
                show_controls(ui, &widgets, |key, value| edits.push((key, value)));
            });

            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Preview").strong());
            show_preview(ui, self.session.phase());
        });

        for (key, value) in edits {
            self.edit_prop(key, value);
        }
    }
}

impl eframe::App for PlaygroundApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        self.show_status_bar(ctx);
        self.show_component_list(ctx);
        self.show_workspace(ctx);

        if self.session.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedPlaygroundState {
            selected_component: self.selected.as_ref().map(ToString::to_string),
        };
        if let Ok(serialized) = serde_json::to_string(&state) {
            storage.set_string(STATE_STORAGE_KEY, serialized);
        }
    }
}

impl Drop for PlaygroundApp {
    fn drop(&mut self) {
        self.session.apply(PreviewEvent::Unmounted);
        if let Some(backend) = self.backend.as_mut() {
            backend.driver.shutdown();
        }
    }
}
