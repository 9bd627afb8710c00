//! Blocking Gemini API-key entry dialog.
//!
//! Opens on first launch and again whenever the provider rejects the
//! stored key. There is no cancel: AI features need a key, and the key
//! only ever lives on this device. The input buffer is zeroized on drop.

use super::ModalResult;
use egui::{Align2, Area, Context, Id, Key, RichText, TextEdit, Vec2};
use zeroize::Zeroizing;

pub struct ApiKeyDialog {
    is_open: bool,
    key: Zeroizing<String>,
    result: ModalResult<String>,
    /// Extra context shown above the input, e.g. after a rejection.
    message: Option<String>,
    id: Id,
}

impl ApiKeyDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            key: Zeroizing::new(String::new()),
            result: ModalResult::Pending,
            message: None,
            id: Id::new(id),
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.message = None;
        self.key = Zeroizing::new(String::new());
        self.result = ModalResult::Pending;
    }

    pub fn open_with_message(&mut self, message: impl Into<String>) {
        self.open();
        self.message = Some(message.into());
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The confirmed key, once. Resets the result to pending.
    pub fn take_key(&mut self) -> Option<String> {
        std::mem::replace(&mut self.result, ModalResult::Pending).take_value()
    }

    pub fn update(&mut self, ctx: &Context) {
        if !self.is_open {
            return;
        }

        let mut submitted = false;

        // Dim everything behind the dialog; clicks outside do nothing.
        Area::new(self.id.with("overlay"))
            .anchor(Align2::LEFT_TOP, Vec2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(180));
            });

        egui::Window::new("Enter Your Gemini API Key")
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(380.0);
                ui.add_space(8.0);

                ui.label(
                    "To use the AI features, you need to provide your own Google Gemini \
                     API key. Your key is saved only on this device.",
                );
                ui.add_space(8.0);

                if let Some(message) = &self.message {
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                    ui.add_space(8.0);
                }

                ui.horizontal(|ui| {
                    ui.label("API Key:");
                    let response = ui.add(
                        TextEdit::singleline(&mut *self.key)
                            .password(true)
                            .desired_width(240.0)
                            .hint_text("Enter your key here"),
                    );
                    if response.gained_focus() {
                        response.request_focus();
                    }
                    if response.lost_focus()
                        && ui.input(|i| i.key_pressed(Key::Enter))
                        && !self.key.trim().is_empty()
                    {
                        submitted = true;
                    }
                });

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    let save_enabled = !self.key.trim().is_empty();
                    if ui
                        .add_enabled(save_enabled, egui::Button::new("Save"))
                        .clicked()
                    {
                        submitted = true;
                    }

                    ui.add_space(8.0);

                    if ui.link("Get a free key from Google AI Studio").clicked() {
                        if let Err(e) = open::that("https://aistudio.google.com/") {
                            tracing::warn!(error = %e, "failed to open browser");
                        }
                    }
                });

                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.label(
                        RichText::new("Stored in plain text in your config folder")
                            .small()
                            .weak(),
                    );
                });
            });

        if submitted {
            let key = self.key.trim().to_string();
            self.result = ModalResult::Confirmed(key);
            self.key = Zeroizing::new(String::new());
            self.is_open = false;
        }
    }
}
