use std::sync::Arc;

use egui::{Galley, TextBuffer, TextEdit, TextStyle};
use rust_i18n::t;

use crate::{gui::State, highlight::Highlighter};

pub fn ui_response(ui: &mut egui::Ui, state: &mut State) {
    let font_id = TextStyle::Monospace.resolve(ui.style());
    let default_color = ui.visuals().text_color();

    // recomputed from scratch for every layout pass
    let mut layouter = |ui: &egui::Ui, buf: &dyn TextBuffer, wrap_width: f32|
            -> Arc<Galley> {
        let mut job = Highlighter::global().layout_job(
            buf.as_str(), font_id.clone(), default_color);
        job.wrap.max_width = wrap_width;
        ui.painter().layout_job(job)
    };

    egui::ScrollArea::vertical()
    .id_salt("response_scroll")
    .auto_shrink([false, false])
    .show(ui, |ui| {
        // a &str buffer makes the edit read-only but still selectable
        let mut text = state.response.as_str();
        ui.add(
            TextEdit::multiline(&mut text)
                .desired_width(f32::INFINITY)
                .desired_rows(12)
                .layouter(&mut layouter)
        ).on_hover_text(t!("response_tooltip"));
    });
}
