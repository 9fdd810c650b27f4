//! egui rendering of the controls view model.

use client_core::ControlWidget;
use eframe::egui;
use shared::domain::PropValue;

/// Draws one labelled widget per control and reports every user edit through
/// `on_change`. Choices report a pick even when it equals the current value.
pub fn show_controls(
    ui: &mut egui::Ui,
    widgets: &[ControlWidget],
    mut on_change: impl FnMut(String, PropValue),
) {
    if widgets.is_empty() {
        ui.weak("This component has no controls.");
        return;
    }

    egui::Grid::new("playground_controls_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .striped(true)
        .show(ui, |ui| {
            for widget in widgets {
                ui.label(egui::RichText::new(widget.key()).monospace());
                match widget {
                    ControlWidget::Choice {
                        key,
                        options,
                        selected,
                    } => {
                        egui::ComboBox::from_id_salt(("control_choice", key.as_str()))
                            .selected_text(selected.clone())
                            .show_ui(ui, |ui| {
                                for option in options {
                                    if ui
                                        .selectable_label(option == selected, option.as_str())
                                        .clicked()
                                    {
                                        on_change(key.clone(), PropValue::text(option.as_str()));
                                    }
                                }
                            });
                    }
                    ControlWidget::Toggle { key, checked } => {
                        let mut value = *checked;
                        if ui
                            .checkbox(&mut value, ControlWidget::toggle_caption(*checked))
                            .changed()
                        {
                            on_change(key.clone(), PropValue::Bool(value));
                        }
                    }
                    ControlWidget::TextField { key, value } => {
                        let mut draft = value.clone();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut draft)
                                .id_salt(("control_text", key.as_str()))
                                .desired_width(240.0),
                        );
                        if response.changed() {
                            on_change(key.clone(), PropValue::Text(draft));
                        }
                    }
                }
                ui.end_row();
            }
        });
}
