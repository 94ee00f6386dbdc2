use log::{info, warn};

use crate::{gui::State, mybtn};

pub fn ui_top_panel(ctx: &egui::Context, state: &mut State) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            let Ok(mut app_language) = state.perma.app_language.lock() else {
                warn!("language setting is unavailable");
                return;
            };
            let (lang_label, target_lang) = if *app_language == "ru" {
                ("ru", "en")
            } else {
                ("en", "ru")
            };
            if ui.button(lang_label)
                .on_hover_text(egui::RichText::new(
                    rust_i18n::t!("language_switch_tooltip"))
                    .strong()
                    .heading()
                )
                .clicked()
            {
                // remembered by eframe on save
                *app_language = target_lang.to_string();
                rust_i18n::set_locale(target_lang);
                info!("language switched to {}", target_lang);
            }
            drop(app_language);

            ui.separator();

            if mybtn!(ui, "menu_dark_theme_btn") {
                ctx.set_theme(egui::Theme::Dark);
            }

            if mybtn!(ui, "menu_light_theme_btn") {
                ctx.set_theme(egui::Theme::Light);
            }
        });
    });
}

#[macro_export]
macro_rules! mybtn {
    // mybtn!(ui, "label_key") uses "label_key_tooltip" for the hover text
    ($ui:expr, $key:literal) => {
        $ui.button(rust_i18n::t!($key))
            .on_hover_text(
                ::egui::RichText::new(
                    rust_i18n::t!(concat!($key, "_tooltip"))
                )
                .strong()
                .heading()
            )
            .clicked()
    };
}
