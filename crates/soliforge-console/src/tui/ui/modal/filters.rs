/*
[INPUT]:  Current search filters
[OUTPUT]: Search filter form; parsed SearchFilters on submit
[POS]:    TUI UI modal search filters
[UPDATE]: When the search filter contract changes
*/

use crossterm::event::KeyCode;
use soliforge_client::TaskStatus;
use soliforge_console::board::{SearchFilters, parse_date_filter};

use super::{Field, Modal, ModalAction, handle_modal_key};

const ANY_STATUS: &str = "all";

pub(in crate::tui) struct SearchFiltersModal {
    keyword: String,
    creator_name: String,
    status_index: usize,
    start_date: String,
    end_date: String,
    owner_id: String,
    focus_index: usize,
    notice: Option<String>,
}

impl SearchFiltersModal {
    pub(in crate::tui) fn new(filters: &SearchFilters) -> Self {
        let status_index = filters
            .status
            .and_then(|status| TaskStatus::ALL.iter().position(|s| *s == status))
            .map(|index| index + 1)
            .unwrap_or(0);
        let date = |value: Option<chrono::NaiveDate>| {
            value
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        Self {
            keyword: filters.keyword.clone(),
            creator_name: filters.creator_name.clone(),
            status_index,
            start_date: date(filters.start_date),
            end_date: date(filters.end_date),
            owner_id: filters.owner_id.clone(),
            focus_index: 0,
            notice: None,
        }
    }

    fn status_options() -> Vec<String> {
        std::iter::once(ANY_STATUS.to_string())
            .chain(TaskStatus::ALL.iter().map(|status| status.as_str().to_string()))
            .collect()
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: String::from("Search Filters"),
            focus_index: self.focus_index,
            fields: vec![
                Field::TextInput {
                    label: String::from("Keyword"),
                    value: self.keyword.clone(),
                },
                Field::TextInput {
                    label: String::from("Creator"),
                    value: self.creator_name.clone(),
                },
                Field::Select {
                    label: String::from("Status"),
                    options: Self::status_options(),
                    selected: self.status_index,
                },
                Field::TextInput {
                    label: String::from("From (YYYY-MM-DD)"),
                    value: self.start_date.clone(),
                },
                Field::TextInput {
                    label: String::from("To (YYYY-MM-DD)"),
                    value: self.end_date.clone(),
                },
                Field::TextInput {
                    label: String::from("Owner ID"),
                    value: self.owner_id.clone(),
                },
                Field::Button {
                    label: String::from("Search"),
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

    /// Parse the form; a bad date keeps the modal open with a notice
    pub(in crate::tui) fn to_filters(&mut self) -> Option<SearchFilters> {
        let parsed = parse_date_filter(&self.start_date).and_then(|start| {
            parse_date_filter(&self.end_date).map(|end| (start, end))
        });
        let (start_date, end_date) = match parsed {
            Ok(range) => range,
            Err(message) => {
                self.notice = Some(message);
                return None;
            }
        };
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                self.notice = Some(String::from("From date is after To date"));
                return None;
            }
        }
        Some(SearchFilters {
            keyword: self.keyword.trim().to_string(),
            creator_name: self.creator_name.trim().to_string(),
            status: self
                .status_index
                .checked_sub(1)
                .and_then(|index| TaskStatus::ALL.get(index).copied()),
            start_date,
            end_date,
            owner_id: self.owner_id.trim().to_string(),
        })
    }

    fn apply_modal_state(&mut self, modal: &Modal) {
        self.focus_index = modal.focus_index;
        let text = |index: usize| match modal.fields.get(index) {
            Some(Field::TextInput { value, .. }) => Some(value.clone()),
            _ => None,
        };
        if let Some(value) = text(0) {
            self.keyword = value;
        }
        if let Some(value) = text(1) {
            self.creator_name = value;
        }
        if let Some(Field::Select { selected, .. }) = modal.fields.get(2) {
            self.status_index = *selected;
        }
        if let Some(value) = text(3) {
            self.start_date = value;
        }
        if let Some(value) = text(4) {
            self.end_date = value;
        }
        if let Some(value) = text(5) {
            self.owner_id = value;
        }
    }
}
