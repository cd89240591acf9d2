/*
[INPUT]:  Task selected for deletion
[OUTPUT]: Delete confirmation modal
[POS]:    TUI UI modal delete confirmation
[UPDATE]: When changing the delete confirmation flow
*/

use crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

pub(in crate::tui) struct ConfirmDeleteModal {
    task_id: String,
    task_name: String,
    focus_index: usize,
}

impl ConfirmDeleteModal {
    pub(in crate::tui) fn new(task_id: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_name: task_name.into(),
            // Cancel is focused so a stray Enter does not delete
            focus_index: 1,
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: format!("Delete '{}'?", self.task_name),
            focus_index: self.focus_index,
            fields: vec![
                Field::Button {
                    label: String::from("Delete"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Cancel"),
                    action: ModalAction::Cancel,
                },
            ],
            notice: Some(String::from("This removes the task and its results on the server.")),
        }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        let mut modal = self.to_modal();
        let action = match key {
            KeyCode::Char('y') => ModalAction::Submit,
            KeyCode::Char('n') => ModalAction::Cancel,
            _ => handle_modal_key(&mut modal, key),
        };
        self.focus_index = modal.focus_index;
        action
    }

    pub(in crate::tui) fn task_id(&self) -> &str {
        self.task_id.as_str()
    }
}
