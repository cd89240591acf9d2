/*
[INPUT]:  Crossterm key codes
[OUTPUT]: TUI event routing to AppState actions
[POS]:    TUI key handling per screen and modal
[UPDATE]: 2026-09-03 Split key maps by screen (login, boards, execution)
[UPDATE]: 2026-09-05 Wire delete confirmation, upload, filters, and case detail modals
*/

use std::path::PathBuf;

use crossterm::event::KeyCode;
use soliforge_console::board::SearchFilters;

use super::app::{ActiveModal, AppState, Screen, Tab};
use super::ui::modal::{LoginMode, ModalAction};

enum ModalSubmit {
    SignIn {
        email: String,
        password: String,
    },
    Register {
        email: String,
        username: String,
        password: String,
    },
    CreateTask {
        name: String,
    },
    Delete {
        task_id: String,
    },
    Upload {
        path: PathBuf,
    },
    Filters(SearchFilters),
}

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) async fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    if app.active_modal.is_some() {
        return handle_modal_key_event(app, key).await;
    }

    match app.screen {
        Screen::Login => {
            app.show_login(None);
            false
        }
        Screen::Board => handle_board_key(app, key).await,
        Screen::Execution => handle_execution_key(app, key).await,
    }
}

async fn handle_board_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('r') => app.refresh().await,
        KeyCode::Tab | KeyCode::Char('l') => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Dashboard),
        KeyCode::Char('2') => app.set_tab(Tab::Search),
        KeyCode::Char('3') => app.set_tab(Tab::Diagnostics),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Enter => app.open_selected().await,
        KeyCode::Char('n') => app.open_create_task(),
        KeyCode::Char('d') => app.open_delete_confirm(),
        KeyCode::Char('f') if app.current_tab == Tab::Search => app.open_filters(),
        KeyCode::Char('c') if app.current_tab == Tab::Search => app.reset_filters().await,
        KeyCode::Char('o') => app.logout().await,
        _ => {}
    }
    false
}

async fn handle_execution_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.close_execution().await,
        KeyCode::Char('r') => app.refresh().await,
        KeyCode::Char('s') => app.start_task().await,
        KeyCode::Char('x') => app.stop_task().await,
        KeyCode::Char('u') => app.open_upload(),
        KeyCode::Up | KeyCode::Char('k') => app.move_case_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_case_selection(1),
        KeyCode::Enter => app.open_case_detail(),
        _ => {}
    }
    false
}

async fn handle_modal_key_event(app: &mut AppState, key: KeyCode) -> bool {
    let (action, submit) = match app.active_modal.as_mut() {
        Some(ActiveModal::Login(modal)) => {
            let action = modal.handle_key(key);
            let submit = (action == ModalAction::Submit).then(|| match modal.mode() {
                LoginMode::SignIn => ModalSubmit::SignIn {
                    email: modal.email().to_string(),
                    password: modal.password().to_string(),
                },
                LoginMode::Register => ModalSubmit::Register {
                    email: modal.email().to_string(),
                    username: modal.username().to_string(),
                    password: modal.password().to_string(),
                },
            });
            (action, submit)
        }
        Some(ActiveModal::CreateTask(modal)) => {
            let action = modal.handle_key(key);
            let submit = (action == ModalAction::Submit).then(|| ModalSubmit::CreateTask {
                name: modal.name().to_string(),
            });
            (action, submit)
        }
        Some(ActiveModal::ConfirmDelete(modal)) => {
            let action = modal.handle_key(key);
            let submit = (action == ModalAction::Submit).then(|| ModalSubmit::Delete {
                task_id: modal.task_id().to_string(),
            });
            (action, submit)
        }
        Some(ActiveModal::Upload(modal)) => {
            let action = modal.handle_key(key);
            let submit = (action == ModalAction::Submit).then(|| ModalSubmit::Upload {
                path: modal.path(),
            });
            (action, submit)
        }
        Some(ActiveModal::Filters(modal)) => {
            let action = modal.handle_key(key);
            let submit = if action == ModalAction::Submit {
                modal.to_filters().map(ModalSubmit::Filters)
            } else {
                None
            };
            (action, submit)
        }
        Some(ActiveModal::Message(modal)) => (modal.handle_key(key), None),
        None => return false,
    };

    if action == ModalAction::Cancel {
        // Leaving the login form quits; there is nothing behind it
        if matches!(app.active_modal, Some(ActiveModal::Login(_))) {
            return true;
        }
        app.close_modal();
        return false;
    }

    if let Some(submit) = submit {
        match submit {
            ModalSubmit::SignIn { email, password } => app.submit_login(email, password).await,
            ModalSubmit::Register {
                email,
                username,
                password,
            } => app.submit_register(email, username, password).await,
            ModalSubmit::CreateTask { name } => app.submit_create_task(name).await,
            ModalSubmit::Delete { task_id } => app.submit_delete(task_id).await,
            ModalSubmit::Upload { path } => app.submit_upload(path).await,
            ModalSubmit::Filters(filters) => app.submit_filters(filters).await,
        }
    }

    false
}
