#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use egui::ViewportBuilder;
use log::warn;
use tokio::runtime::Runtime;

use crate::gui::MyAppPermanent;

rust_i18n::i18n!("locales", fallback = "en");

mod common;
mod credentials;
mod highlight;
mod openai;
mod gui;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    // Set the application theme ("light" or "dark")
    #[arg(long)]
    theme: Option<String>,
    // Interface language ("en" or "ru")
    #[arg(long)]
    la: Option<String>,
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args = Args::parse();

    // the runtime only drives the http client; the UI thread blocks on it
    let rt = Runtime::new().expect("Unable to create Runtime");

    // enter the runtime context
    // this variable must live as long as the app runs!
    let _enter = rt.enter();

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title(rust_i18n::t!("window_title")),
        ..Default::default()
    };

    let rt_handle = rt.handle().clone();

    eframe::run_native(
        "completion-ui",
        native_options,
        Box::new(move |cc| {
            // language setting persistence and overriding
            let mut app_language = "en".to_string();
            if let Some(storage) = cc.storage {
                if let Some(saved_lang) = eframe::get_value::<String>(
                        storage, "app_language") {
                    app_language = saved_lang;
                }
            }
            if let Some(la) = args.la {
                match la.as_str() {
                    "ru" | "en" => app_language = la,
                    _ => {
                        warn!("Unsupported language '{}'. Supported: 'en', 'ru'.", la);
                    }
                }
            }
            rust_i18n::set_locale(&app_language);

            if let Some(theme) = args.theme {
                match theme.as_str() {
                    "light" => cc.egui_ctx.set_theme(egui::Theme::Light),
                    "dark" => cc.egui_ctx.set_theme(egui::Theme::Dark),
                    _ => warn!("Unsupported theme '{}'. Supported: 'light', 'dark'.", theme),
                }
            }

            Ok(Box::new(gui::MyApp::new(cc, MyAppPermanent {
                rt: rt_handle,
                app_language: std::sync::Mutex::new(app_language),
            })))
        }),
    )
}
