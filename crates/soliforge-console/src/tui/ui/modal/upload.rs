/*
[INPUT]:  Local path typed by the user
[OUTPUT]: Contract upload modal
[POS]:    TUI UI modal contract upload
[UPDATE]: When changing how contract files are picked
*/

use std::path::PathBuf;

use crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

pub(in crate::tui) struct UploadModal {
    title: String,
    path: String,
    focus_index: usize,
    notice: Option<String>,
}

impl UploadModal {
    pub(in crate::tui) fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            path: String::new(),
            focus_index: 0,
            notice: Some(String::from("Solidity source files (.sol) only")),
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: self.title.clone(),
            focus_index: self.focus_index,
            fields: vec![
                Field::TextInput {
                    label: String::from("Contract path"),
                    value: self.path.clone(),
                },
                Field::Button {
                    label: String::from("Upload"),
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
        self.focus_index = modal.focus_index;
        if let Some(Field::TextInput { value, .. }) = modal.fields.first() {
            self.path = value.clone();
        }
        action
    }

    /// Typed path with a leading `~/` expanded
    pub(in crate::tui) fn path(&self) -> PathBuf {
        let raw = self.path.trim();
        match (raw.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(raw),
        }
    }
}
