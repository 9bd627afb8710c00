//! Transient notifications in the bottom-right corner.
//!
//! Every failure in the app degrades to one of these plus an idle UI;
//! none of them block input.

use egui::{Align2, Area, Color32, Context, Frame, Id, RichText, Vec2};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastKind {
    Info,
    Error,
}

struct Toast {
    text: String,
    kind: ToastKind,
    created: Instant,
}

#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text.into(), ToastKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text.into(), ToastKind::Error);
    }

    fn push(&mut self, text: String, kind: ToastKind) {
        tracing::info!(%text, "toast");
        self.items.push(Toast {
            text,
            kind,
            created: Instant::now(),
        });
    }

    pub fn show(&mut self, ctx: &Context) {
        self.items
            .retain(|t| t.created.elapsed() < TOAST_LIFETIME);
        if self.items.is_empty() {
            return;
        }
        // Keep repainting so toasts expire without user input.
        ctx.request_repaint_after(Duration::from_millis(250));

        Area::new(Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in self.items.iter().rev() {
                    let (fill, stroke) = match toast.kind {
                        ToastKind::Info => {
                            (Color32::from_rgb(0x26, 0x32, 0x38), Color32::from_rgb(0x4f, 0xc3, 0xf7))
                        }
                        ToastKind::Error => {
                            (Color32::from_rgb(0x3a, 0x1f, 0x1f), Color32::from_rgb(0xef, 0x53, 0x50))
                        }
                    };
                    Frame::popup(ui.style())
                        .fill(fill)
                        .stroke(egui::Stroke::new(1.0, stroke))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&toast.text).color(Color32::WHITE));
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_accumulate() {
        let mut toasts = Toasts::default();
        toasts.error("boom");
        toasts.info("saved");
        assert_eq!(toasts.items.len(), 2);
        assert_eq!(toasts.items[0].kind, ToastKind::Error);
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut toasts = Toasts::default();
        toasts.info("old");
        toasts.items[0].created = Instant::now() - TOAST_LIFETIME - Duration::from_secs(1);
        toasts.items.retain(|t| t.created.elapsed() < TOAST_LIFETIME);
        assert!(toasts.items.is_empty());
    }
}
