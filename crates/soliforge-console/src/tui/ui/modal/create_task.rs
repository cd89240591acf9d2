/*
[INPUT]:  Task creation form state
[OUTPUT]: Task creation modal rendering
[POS]:    TUI UI modal create task
[UPDATE]: 2026-09-03 Reduce the form to the task name
*/

use crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

pub(in crate::tui) struct CreateTaskModal {
    name: String,
    focus_index: usize,
    notice: Option<String>,
}

impl CreateTaskModal {
    pub(in crate::tui) fn new() -> Self {
        Self {
            name: String::new(),
            focus_index: 0,
            notice: None,
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: String::from("New Audit Task"),
            focus_index: self.focus_index,
            fields: vec![
                Field::TextInput {
                    label: String::from("Task name"),
                    value: self.name.clone(),
                },
                Field::Button {
                    label: String::from("Create"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Cancel"),
                    action: ModalAction::Cancel,
                },
            ],
            notice: self.notice.clone(),
        }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        let mut modal = self.to_modal();
        let action = handle_modal_key(&mut modal, key);
        self.apply_modal_state(&modal);
        action
    }

    pub(in crate::tui) fn name(&self) -> &str {
        self.name.as_str()
    }

    pub(in crate::tui) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    fn apply_modal_state(&mut self, modal: &Modal) {
        self.focus_index = modal.focus_index;
        if let Some(Field::TextInput { value, .. }) = modal.fields.first() {
            self.name = value.clone();
        }
    }
}
