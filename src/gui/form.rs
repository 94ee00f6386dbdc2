use egui::{ComboBox, Grid, Slider, TextEdit};
use rust_i18n::t;

use crate::{common::{CompletionModel, retain_integer_chars}, gui::State};

pub fn ui_form(ui: &mut egui::Ui, state: &mut State) {
    Grid::new("completion_form")
    .num_columns(2)
    .spacing([10.0, 10.0])
    .striped(false)
    .show(ui, |ui| {
        // --- API key ---
        ui.label(t!("api_key_label"));
        let response = ui.add(
            TextEdit::singleline(&mut state.api_key_entered)
                .password(true)
                .desired_width(f32::INFINITY)
        ).on_hover_text(t!("api_key_tooltip"));
        if response.changed() {
            state.on_api_key_changed();
        }
        ui.end_row();

        // --- Model ---
        ui.label(t!("model_label"));
        let mut selected = state.model;
        ComboBox::from_id_salt("model_selector")
        .selected_text(selected.to_string())
        .show_ui(ui, |ui| {
            for model in CompletionModel::all() {
                ui.selectable_value(&mut selected, model, model.to_string());
            }
        })
        .response.on_hover_text(t!("model_tooltip"));
        if selected != state.model {
            state.on_model_changed(selected);
        }
        ui.end_row();

        // --- Prompt ---
        ui.label(t!("prompt_label"));
        ui.add(
            TextEdit::multiline(&mut state.prompt)
                .desired_rows(6)
                .desired_width(f32::INFINITY)
        ).on_hover_text(t!("prompt_tooltip"));
        ui.end_row();

        // --- Max tokens ---
        ui.label(state.max_tokens_label());
        let mut value = state.max_tokens;
        let response = ui.add(
            Slider::new(&mut value, 1..=state.max_tokens_ceiling)
                .show_value(false)
        ).on_hover_text(t!("max_tokens_tooltip"));
        if response.changed() {
            state.on_max_tokens_changed(value);
        }
        ui.end_row();

        // --- Temperature ---
        ui.label(t!("temperature_label"));
        integer_edit(ui, &mut state.temperature_entered, "0",
            &t!("temperature_tooltip"));
        ui.end_row();

        // --- n ---
        ui.label(t!("n_label"));
        integer_edit(ui, &mut state.n_entered, "1", &t!("n_tooltip"));
        ui.end_row();

        ui.label("");
        if ui.button(t!("submit_btn"))
            .on_hover_text(t!("submit_btn_tooltip"))
            .clicked() {
            // blocks the UI until the service answers
            state.on_submit();
        }
        ui.end_row();
    });
}

// single line field that only keeps integer characters
fn integer_edit(ui: &mut egui::Ui, text: &mut String, placeholder: &str,
        tooltip: &str) {
    let response = ui.add(
        TextEdit::singleline(text)
            .hint_text(placeholder)
            .desired_width(f32::INFINITY)
    ).on_hover_text(tooltip);
    if response.changed() {
        retain_integer_chars(text);
    }
}
