//! The document editor and its floating selection toolbar.
//!
//! The text model, selection handling, and undo stack all belong to
//! egui's `TextEdit`; this module only reads the selection out of the
//! widget state and splices accepted suggestions back into the string.

use crate::types::AppState;
use crate::utils::char_slice;
use assist::{RewriteAction, SelectionRange};
use egui::text::{CCursor, CCursorRange};
use egui::{Area, Frame, Id, Order, Pos2, ScrollArea, Spinner, TextEdit, Ui, Vec2};

fn editor_id() -> Id {
    Id::new("quill_document")
}

pub fn show(ui: &mut Ui, state: &mut AppState, suppress_toolbar: bool) {
    ScrollArea::vertical()
        .id_source("editor_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let select_after = state.pending_select.take();

            let output = TextEdit::multiline(&mut state.document)
                .id(editor_id())
                .desired_width(f32::INFINITY)
                .desired_rows(30)
                .frame(false)
                .hint_text("Start writing…")
                .show(ui);

            // After an accepted suggestion, select the inserted text so
            // the user sees exactly what changed.
            if let Some(range) = select_after {
                let mut edit_state = egui::text_edit::TextEditState::load(ui.ctx(), editor_id())
                    .unwrap_or_default();
                edit_state.cursor.set_char_range(Some(CCursorRange::two(
                    CCursor::new(range.start),
                    CCursor::new(range.end),
                )));
                edit_state.store(ui.ctx(), editor_id());
                output.response.request_focus();
            }

            if suppress_toolbar {
                return;
            }

            if let Some(cursor_range) = output.cursor_range {
                let range = SelectionRange::new(
                    cursor_range.primary.ccursor.index,
                    cursor_range.secondary.ccursor.index,
                );
                if !range.is_empty() {
                    let cursor_rect = output.galley.pos_from_cursor(&cursor_range.primary);
                    let pos = output.galley_pos + cursor_rect.left_bottom().to_vec2()
                        + Vec2::new(0.0, 10.0);
                    selection_toolbar(ui, state, pos, range);
                }
            }
        });
}

/// The Improve / Shorten / Lengthen / To Table strip under the selection.
fn selection_toolbar(ui: &mut Ui, state: &mut AppState, pos: Pos2, range: SelectionRange) {
    let mut clicked_action = None;

    Area::new(Id::new("selection_toolbar"))
        .order(Order::Foreground)
        .fixed_pos(pos)
        .show(ui.ctx(), |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    for action in RewriteAction::ALL {
                        let busy_with_this =
                            state.rewrite_in_flight && state.active_action == Some(action);
                        if busy_with_this {
                            ui.add(Spinner::new().size(14.0));
                        }
                        let button = ui.add_enabled(
                            !state.rewrite_in_flight,
                            egui::Button::new(action.label()).small(),
                        );
                        if button.clicked() {
                            clicked_action = Some(action);
                        }
                    }
                });
            });
        });

    if let Some(action) = clicked_action {
        let selection = char_slice(&state.document, range.start, range.end);
        state.trigger_rewrite(action, selection, range);
    }
}
