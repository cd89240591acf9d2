/*
[INPUT]:  Credentials typed on the login screen
[OUTPUT]: Sign-in / register form modal
[POS]:    TUI UI modal login form
[UPDATE]: 2026-09-03 Add register mode toggled from the sign-in form
*/

use crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::tui) enum LoginMode {
    SignIn,
    Register,
}

pub(in crate::tui) struct LoginModal {
    mode: LoginMode,
    email: String,
    username: String,
    password: String,
    focus_index: usize,
    notice: Option<String>,
}

impl LoginModal {
    pub(in crate::tui) fn new(email: Option<&str>, notice: Option<String>) -> Self {
        let email = email.unwrap_or_default().to_string();
        Self {
            // Jump straight to the password when the e-mail is remembered
            focus_index: if email.is_empty() { 0 } else { 1 },
            mode: LoginMode::SignIn,
            email,
            username: String::new(),
            password: String::new(),
            notice,
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        let fields = match self.mode {
            LoginMode::SignIn => vec![
                Field::TextInput {
                    label: String::from("Email"),
                    value: self.email.clone(),
                },
                Field::Secret {
                    label: String::from("Password"),
                    value: self.password.clone(),
                },
                Field::Button {
                    label: String::from("Sign in"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Create an account"),
                    action: ModalAction::Secondary,
                },
                Field::Button {
                    label: String::from("Quit"),
                    action: ModalAction::Cancel,
                },
            ],
            LoginMode::Register => vec![
                Field::TextInput {
                    label: String::from("Email"),
                    value: self.email.clone(),
                },
                Field::TextInput {
                    label: String::from("Username (optional)"),
                    value: self.username.clone(),
                },
                Field::Secret {
                    label: String::from("Password"),
                    value: self.password.clone(),
                },
                Field::Button {
                    label: String::from("Register"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Back to sign in"),
                    action: ModalAction::Secondary,
                },
                Field::Button {
                    label: String::from("Quit"),
                    action: ModalAction::Cancel,
                },
            ],
        };
        let title = match self.mode {
            LoginMode::SignIn => "SoliForge - Sign in",
            LoginMode::Register => "SoliForge - Register",
        };
        Modal {
            title: String::from(title),
            focus_index: self.focus_index,
            fields,
            notice: self.notice.clone(),
        }
    }

    /// Feed a key; the Secondary button flips the form mode in place
    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        let mut modal = self.to_modal();
        let action = handle_modal_key(&mut modal, key);
        self.apply_modal_state(&modal);
        if action == ModalAction::Secondary {
            self.mode = match self.mode {
                LoginMode::SignIn => LoginMode::Register,
                LoginMode::Register => LoginMode::SignIn,
            };
            self.focus_index = 0;
            self.notice = None;
            return ModalAction::None;
        }
        action
    }

    pub(in crate::tui) fn mode(&self) -> LoginMode {
        self.mode
    }

    pub(in crate::tui) fn email(&self) -> &str {
        self.email.trim()
    }

    pub(in crate::tui) fn username(&self) -> &str {
        self.username.trim()
    }

    pub(in crate::tui) fn password(&self) -> &str {
        self.password.as_str()
    }

    pub(in crate::tui) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Return to sign-in after a successful registration
    pub(in crate::tui) fn registered(&mut self) {
        self.mode = LoginMode::SignIn;
        self.password.clear();
        self.focus_index = 1;
        self.notice = Some(String::from("Account created, sign in to continue"));
    }

    fn apply_modal_state(&mut self, modal: &Modal) {
        self.focus_index = modal.focus_index;
        let text = |index: usize| match modal.fields.get(index) {
            Some(Field::TextInput { value, .. } | Field::Secret { value, .. }) => {
                Some(value.clone())
            }
            _ => None,
        };
        match self.mode {
            LoginMode::SignIn => {
                if let Some(value) = text(0) {
                    self.email = value;
                }
                if let Some(value) = text(1) {
                    self.password = value;
                }
            }
            LoginMode::Register => {
                if let Some(value) = text(0) {
                    self.email = value;
                }
                if let Some(value) = text(1) {
                    self.username = value;
                }
                if let Some(value) = text(2) {
                    self.password = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(modal: &mut LoginModal, text: &str) {
        for ch in text.chars() {
            modal.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_sign_in_form_collects_credentials() {
        let mut modal = LoginModal::new(None, None);
        type_text(&mut modal, "alice@example.com");
        modal.handle_key(KeyCode::Tab);
        type_text(&mut modal, "secret");
        modal.handle_key(KeyCode::Tab);
        assert_eq!(modal.handle_key(KeyCode::Enter), ModalAction::Submit);
        assert_eq!(modal.email(), "alice@example.com");
        assert_eq!(modal.password(), "secret");
    }

    #[test]
    fn test_secondary_button_toggles_register_mode() {
        let mut modal = LoginModal::new(Some("bob@example.com"), None);
        assert_eq!(modal.to_modal().focus_index, 1);
        modal.handle_key(KeyCode::Tab);
        modal.handle_key(KeyCode::Tab);
        assert_eq!(modal.handle_key(KeyCode::Enter), ModalAction::None);
        assert_eq!(modal.mode(), LoginMode::Register);
        assert_eq!(modal.email(), "bob@example.com");

        modal.registered();
        assert_eq!(modal.mode(), LoginMode::SignIn);
        assert!(modal.to_modal().notice.is_some());
    }
}
