use eframe::egui;
use parking_lot::Mutex;
use std::sync::Arc;

mod chat_panel;
mod editor_panel;
mod modals;
mod state;
mod types;
mod utils;
mod widgets;

pub use types::*;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Quill",
        options,
        Box::new(|_cc| {
            Box::new(QuillApp {
                state: Arc::new(Mutex::new(AppState::default())),
            })
        }),
    )
}

struct QuillApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for QuillApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();

        // Non-blocking checks for background results.
        s.poll_rewrite();
        s.poll_chat();
        if s.any_in_flight() {
            ctx.request_repaint();
        }

        ctx.set_visuals(if s.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        // Modals run first so their results land in this frame's state.
        s.api_key_dialog.update(ctx);
        s.resolve_api_key_entry();
        s.suggestion_dialog.update(ctx);
        s.resolve_suggestion_review();

        let modal_open = s.api_key_dialog.is_open() || s.suggestion_dialog.is_open();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Quill");
                ui.weak("Select text in the editor to see AI options.");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        s.show_settings = !s.show_settings;
                    }
                    let theme_label = if s.settings.dark_mode { "Light" } else { "Dark" };
                    if ui.button(theme_label).clicked() {
                        s.settings.dark_mode = !s.settings.dark_mode;
                        s.persist_settings();
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::SidePanel::right("chat_sidebar")
            .resizable(true)
            .default_width(340.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                chat_panel::show(ui, &mut s);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            editor_panel::show(ui, &mut s, modal_open);
        });

        settings_window(ctx, &mut s);
        s.toasts.show(ctx);
    }
}

fn settings_window(ctx: &egui::Context, s: &mut AppState) {
    if !s.show_settings {
        return;
    }

    let mut open = true;
    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.set_min_width(360.0);

            ui.label(egui::RichText::new("Model").strong());
            ui.horizontal(|ui| {
                ui.label("Gemini model:");
                ui.text_edit_singleline(&mut s.settings.gemini_model);
            });
            ui.add_space(8.0);

            ui.label(egui::RichText::new("Web search").strong());
            ui.horizontal(|ui| {
                ui.label("Tavily key:");
                ui.add(
                    egui::TextEdit::singleline(&mut s.tavily_key_input)
                        .password(true)
                        .desired_width(200.0)
                        .hint_text("paste to replace"),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Serper key:");
                ui.add(
                    egui::TextEdit::singleline(&mut s.serper_key_input)
                        .password(true)
                        .desired_width(200.0)
                        .hint_text("paste to replace"),
                );
            });
            if ui.button("Save search keys").clicked() {
                let mut saved = false;
                for (provider, input) in [
                    ("tavily", &mut s.tavily_key_input),
                    ("serper", &mut s.serper_key_input),
                ] {
                    if !input.trim().is_empty() {
                        match s.credentials.store(provider, input.trim()) {
                            Ok(()) => saved = true,
                            Err(e) => {
                                tracing::warn!(provider, error = %e, "failed to store search key")
                            }
                        }
                        input.clear();
                    }
                }
                if saved {
                    s.toasts.info("Search keys saved.");
                } else {
                    s.toasts.error("Paste a key first.");
                }
            }

            ui.add_space(4.0);
            let mut tavily_first = s
                .settings
                .search_provider_preference
                .first()
                .map(|p| p == "tavily")
                .unwrap_or(true);
            ui.horizontal(|ui| {
                ui.label("Try first:");
                let tavily = ui.radio_value(&mut tavily_first, true, "Tavily").clicked();
                let serper = ui.radio_value(&mut tavily_first, false, "Serper").clicked();
                if tavily || serper {
                    s.settings.search_provider_preference = if tavily_first {
                        vec!["tavily".into(), "serper".into()]
                    } else {
                        vec!["serper".into(), "tavily".into()]
                    };
                }
            });
            ui.horizontal(|ui| {
                ui.label("Max results:");
                ui.add(egui::Slider::new(&mut s.settings.search_max_results, 1..=10));
            });

            ui.add_space(8.0);
            if ui.button("Save settings").clicked() {
                s.persist_settings();
                s.toasts.info("Settings saved.");
            }
        });

    if !open {
        s.show_settings = false;
        s.persist_settings();
    }
}
