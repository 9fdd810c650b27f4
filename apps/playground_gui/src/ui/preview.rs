//! Preview panel.

use client_core::PreviewPhase;
use eframe::egui;
use shared::{error::TransportError, protocol::RenderOutcome};

pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody<'a> {
    Empty,
    Loading,
    Markup(&'a str),
    Failed {
        headline: &'static str,
        detail: String,
    },
}

pub fn preview_body(phase: PreviewPhase<'_>) -> PreviewBody<'_> {
    match phase {
        PreviewPhase::Idle => PreviewBody::Empty,
        PreviewPhase::Loading => PreviewBody::Loading,
        PreviewPhase::Displaying(RenderOutcome::Markup(markup)) => PreviewBody::Markup(markup),
        PreviewPhase::Displaying(RenderOutcome::Failure(err)) => failed(err),
    }
}

fn failed(err: &TransportError) -> PreviewBody<'static> {
    PreviewBody::Failed {
        headline: err.fallback_message(),
        detail: err.to_string(),
    }
}

pub fn show_preview(ui: &mut egui::Ui, phase: PreviewPhase<'_>) {
    match preview_body(phase) {
        PreviewBody::Empty => {
            ui.weak("Select a component to preview it.");
        }
        PreviewBody::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(LOADING_TEXT);
            });
        }
        PreviewBody::Markup(markup) => {
            egui::ScrollArea::vertical()
                .id_salt("preview_markup_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    // Read-only: egui never writes through a `&str` buffer.
                    let mut text = markup;
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
        }
        PreviewBody::Failed { headline, detail } => {
            ui.colored_label(ui.visuals().error_fg_color, headline);
            ui.weak(detail);
        }
    }
}
