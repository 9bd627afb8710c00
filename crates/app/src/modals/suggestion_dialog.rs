//! Review dialog for a pending AI suggestion.
//!
//! Shows the original selection next to the proposed replacement. Accept
//! hands the suggestion back to the app for anchored application; cancel
//! discards it and the document stays untouched.

use assist::{RewriteAction, Suggestion};
use egui::{Align2, Area, Context, Id, Key, RichText, ScrollArea, Vec2};

pub struct SuggestionDialog {
    suggestion: Option<Suggestion>,
    action_label: &'static str,
    /// `Some(Some(..))` accepted, `Some(None)` cancelled, `None` still open.
    decision: Option<Option<Suggestion>>,
    id: Id,
}

impl SuggestionDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            suggestion: None,
            action_label: "",
            decision: None,
            id: Id::new(id),
        }
    }

    pub fn open_with(&mut self, suggestion: Suggestion, action: RewriteAction) {
        self.suggestion = Some(suggestion);
        self.action_label = action.label();
        self.decision = None;
    }

    pub fn is_open(&self) -> bool {
        self.suggestion.is_some()
    }

    /// The user's decision, once: `Some(suggestion)` to apply, `None` if
    /// cancelled.
    pub fn take_decision(&mut self) -> Option<Option<Suggestion>> {
        self.decision.take()
    }

    pub fn update(&mut self, ctx: &Context) {
        let Some(suggestion) = &self.suggestion else {
            return;
        };

        let mut accepted = false;
        let mut cancelled = false;

        Area::new(self.id.with("overlay"))
            .anchor(Align2::LEFT_TOP, Vec2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(180));
            });

        egui::Window::new(format!("AI Suggestion — {}", self.action_label))
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(560.0);
                ui.add_space(4.0);
                ui.label(
                    RichText::new(
                        "Review the suggestion below. You can accept it or cancel to keep \
                         the original text.",
                    )
                    .weak(),
                );
                ui.add_space(8.0);

                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("ORIGINAL").small().strong());
                    ScrollArea::vertical()
                        .id_source(self.id.with("original"))
                        .max_height(220.0)
                        .show(&mut cols[0], |ui| {
                            ui.label(&suggestion.original);
                        });

                    cols[1].label(
                        RichText::new("SUGGESTION")
                            .small()
                            .strong()
                            .color(egui::Color32::from_rgb(0x4c, 0xaf, 0x50)),
                    );
                    ScrollArea::vertical()
                        .id_source(self.id.with("suggested"))
                        .max_height(220.0)
                        .show(&mut cols[1], |ui| {
                            ui.label(&suggestion.suggested);
                        });
                });

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                    if ui.button("Accept Suggestion").clicked() {
                        accepted = true;
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Copy suggestion").clicked() {
                            copy_to_clipboard(&suggestion.suggested);
                        }
                    });
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            cancelled = true;
        }

        if accepted {
            self.decision = Some(self.suggestion.take());
        } else if cancelled {
            self.suggestion = None;
            self.decision = Some(None);
        }
    }
}

pub(crate) fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text.to_string()) {
                tracing::warn!(error = %e, "clipboard write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
    }
}
