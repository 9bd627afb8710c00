//! The chat sidebar: message list, progress steps, and the input row
//! with the explicit web-search toggle.

use crate::modals::suggestion_dialog::copy_to_clipboard;
use crate::types::AppState;
use egui::{Align, Frame, Key, Layout, RichText, Rounding, ScrollArea, Spinner, TextEdit, Ui};
use shared::chat::{ChatMessage, MessageKind, Role};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("AI Assistant");
    ui.separator();

    // Reserve room at the bottom for the toggle and input rows.
    let messages_height = (ui.available_height() - 96.0).max(120.0);

    ScrollArea::vertical()
        .id_source("chat_scroll")
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .max_height(messages_height)
        .show(ui, |ui| {
            for msg in state.chat.messages() {
                bubble(ui, msg);
            }
            if state.chat_in_flight {
                ui.horizontal(|ui| {
                    ui.add(Spinner::new().size(14.0));
                    ui.weak(state.chat_status.as_str());
                });
            }
        });

    ui.separator();
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.search_web, "Search the web")
            .on_hover_text("Look things up online before answering this turn");
        ui.checkbox(&mut state.include_document, "Use document")
            .on_hover_text("Send the current document along as context");
    });

    let mut send = false;
    ui.horizontal(|ui| {
        let button_width = 52.0;
        let input = ui.add_sized(
            [ui.available_width() - button_width, 24.0],
            TextEdit::singleline(&mut state.chat_input)
                .hint_text("Ask AI about your document…"),
        );
        if input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            send = true;
            input.request_focus();
        }
        if ui
            .add_enabled(!state.chat_in_flight, egui::Button::new("Send"))
            .clicked()
        {
            send = true;
        }
    });

    if send {
        state.send_chat_message();
    }
}

fn bubble(ui: &mut Ui, msg: &ChatMessage) {
    match msg.kind {
        MessageKind::Step => {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&msg.content).small().weak().italics());
            });
        }
        MessageKind::Normal => {
            let layout = match msg.role {
                Role::User => Layout::right_to_left(Align::Min),
                Role::Model => Layout::left_to_right(Align::Min),
            };
            ui.with_layout(layout, |ui| {
                let fill = match msg.role {
                    Role::User => ui.visuals().selection.bg_fill.linear_multiply(0.35),
                    Role::Model => ui.visuals().faint_bg_color,
                };
                Frame::none()
                    .fill(fill)
                    .rounding(Rounding::same(6.0))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_max_width(ui.available_width() * 0.85);
                        ui.label(&msg.content);
                    });
                if msg.role == Role::Model {
                    if ui.small_button("⎘").on_hover_text("Copy reply").clicked() {
                        copy_to_clipboard(&msg.content);
                    }
                }
            });
        }
    }
    ui.add_space(6.0);
}
