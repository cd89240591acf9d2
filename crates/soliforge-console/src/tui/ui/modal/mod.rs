/*
[INPUT]:  Modal state, fields, and key events
[OUTPUT]: Modal rendering output and modal action results
[POS]:    TUI UI modal module root
[UPDATE]: 2026-09-03 Add secret fields and a hint line for form errors
[UPDATE]: 2026-09-05 Add read-only message modal for alerts and case details
*/

mod confirm;
mod create_task;
mod filters;
mod login;
mod message;
mod upload;

pub(in crate::tui) use confirm::ConfirmDeleteModal;
pub(in crate::tui) use create_task::CreateTaskModal;
pub(in crate::tui) use filters::SearchFiltersModal;
pub(in crate::tui) use login::{LoginMode, LoginModal};
pub(in crate::tui) use message::{MessageModal, draw_message_modal};
pub(in crate::tui) use upload::UploadModal;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::ui::layout::border_style;

pub(in crate::tui) struct Modal {
    pub(super) title: String,
    pub(super) focus_index: usize,
    pub(super) fields: Vec<Field>,
    /// Hint or validation error under the fields
    pub(super) notice: Option<String>,
}

pub(in crate::tui) enum Field {
    TextInput {
        label: String,
        value: String,
    },
    /// Text input rendered masked
    Secret {
        label: String,
        value: String,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Button {
        label: String,
        action: ModalAction,
    },
}

impl Field {
    fn is_text(&self) -> bool {
        matches!(self, Field::TextInput { .. } | Field::Secret { .. })
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Field::TextInput { value, .. } | Field::Secret { value, .. } => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui) enum ModalAction {
    Submit,
    /// Alternate button, e.g. switching the login form to register
    Secondary,
    Cancel,
    None,
}

pub(in crate::tui) fn draw_modal(frame: &mut ratatui::Frame, area: Rect, modal: &Modal) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(modal.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let lines: Vec<Line> = modal
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let content = match field {
                Field::TextInput { label, value } => format!("{label}: {value}"),
                Field::Secret { label, value } => {
                    format!("{label}: {}", "*".repeat(value.chars().count()))
                }
                Field::Select {
                    label,
                    options,
                    selected,
                } => {
                    let selected_value = options.get(*selected).map(String::as_str).unwrap_or("-");
                    format!("{label}: < {selected_value} >")
                }
                Field::Button { label, .. } => format!("[{label}]"),
            };
            let style = if index == modal.focus_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(content, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[0]);

    if let Some(notice) = modal.notice.as_deref() {
        let widget = Paragraph::new(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::LightRed),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(widget, rows[1]);
    }
}

pub(in crate::tui) fn handle_modal_key(modal: &mut Modal, key: KeyCode) -> ModalAction {
    let count = modal.fields.len();
    match key {
        KeyCode::Esc => ModalAction::Cancel,
        KeyCode::Tab => {
            if count > 0 {
                modal.focus_index = (modal.focus_index + 1) % count;
            }
            ModalAction::None
        }
        KeyCode::BackTab => {
            if count > 0 {
                modal.focus_index = (modal.focus_index + count - 1) % count;
            }
            ModalAction::None
        }
        KeyCode::Up | KeyCode::Left => {
            if let Some(Field::Select { selected, .. }) = modal.fields.get_mut(modal.focus_index) {
                *selected = selected.saturating_sub(1);
            }
            ModalAction::None
        }
        KeyCode::Down | KeyCode::Right => {
            if let Some(Field::Select {
                selected, options, ..
            }) = modal.fields.get_mut(modal.focus_index)
            {
                if *selected + 1 < options.len() {
                    *selected += 1;
                }
            }
            ModalAction::None
        }
        KeyCode::Backspace => {
            if let Some(value) = modal
                .fields
                .get_mut(modal.focus_index)
                .and_then(Field::text_mut)
            {
                value.pop();
            }
            ModalAction::None
        }
        KeyCode::Char(ch) => {
            if let Some(value) = modal
                .fields
                .get_mut(modal.focus_index)
                .and_then(Field::text_mut)
            {
                value.push(ch);
            }
            ModalAction::None
        }
        KeyCode::Enter => match modal.fields.get(modal.focus_index) {
            Some(Field::Button { action, .. }) => *action,
            // Enter in a text field advances to the next field
            Some(field) if field.is_text() && count > 0 => {
                modal.focus_index = (modal.focus_index + 1) % count;
                ModalAction::None
            }
            _ => ModalAction::None,
        },
        _ => ModalAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Modal {
        Modal {
            title: "Form".to_string(),
            focus_index: 0,
            fields: vec![
                Field::TextInput {
                    label: "Name".to_string(),
                    value: String::new(),
                },
                Field::Secret {
                    label: "Password".to_string(),
                    value: String::new(),
                },
                Field::Button {
                    label: "OK".to_string(),
                    action: ModalAction::Submit,
                },
            ],
            notice: None,
        }
    }

    #[test]
    fn test_typing_and_focus_navigation() {
        let mut modal = form();
        for ch in "vault".chars() {
            handle_modal_key(&mut modal, KeyCode::Char(ch));
        }
        handle_modal_key(&mut modal, KeyCode::Backspace);
        assert!(matches!(&modal.fields[0], Field::TextInput { value, .. } if value == "vaul"));

        assert_eq!(handle_modal_key(&mut modal, KeyCode::Enter), ModalAction::None);
        assert_eq!(modal.focus_index, 1);
        handle_modal_key(&mut modal, KeyCode::Char('x'));
        assert!(matches!(&modal.fields[1], Field::Secret { value, .. } if value == "x"));

        handle_modal_key(&mut modal, KeyCode::BackTab);
        assert_eq!(modal.focus_index, 0);
        handle_modal_key(&mut modal, KeyCode::BackTab);
        assert_eq!(modal.focus_index, 2);
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Enter), ModalAction::Submit);
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Esc), ModalAction::Cancel);
    }
}
