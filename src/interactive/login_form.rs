//! Identity/password form shown while signed out

use crossterm::event::{Event, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Identity,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Identity => LoginField::Password,
            LoginField::Password => LoginField::Identity,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoginField::Identity => "Username or email",
            LoginField::Password => "Password",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub identity: Input,
    pub password: Input,
    pub focus: LoginField,
    /// Set while the signin request is in flight
    pub submitting: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            identity: Input::default(),
            password: Input::default(),
            focus: LoginField::Identity,
            submitting: false,
        }
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Feed an edit key to the focused field
    pub fn handle_key(&mut self, key: KeyEvent) {
        let event = Event::Key(key);
        match self.focus {
            LoginField::Identity => self.identity.handle_event(&event),
            LoginField::Password => self.password.handle_event(&event),
        };
    }

    pub fn input(&self, field: LoginField) -> &Input {
        match field {
            LoginField::Identity => &self.identity,
            LoginField::Password => &self.password,
        }
    }

    /// Field text as drawn; the password is masked
    pub fn display_value(&self, field: LoginField) -> String {
        match field {
            LoginField::Identity => self.identity.value().to_string(),
            LoginField::Password => "•".repeat(self.password.value().chars().count()),
        }
    }

    pub fn credentials(&self) -> (String, String) {
        (
            self.identity.value().trim().to_string(),
            self.password.value().to_string(),
        )
    }

    /// Keeps the identity so a failed attempt only needs the password again
    pub fn clear_password(&mut self) {
        self.password.reset();
        self.focus = LoginField::Password;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
