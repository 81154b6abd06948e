use super::{is_valid_input_char, FormError};

/// Maximum length for email input (RFC 5321 path limit)
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Which exchange the form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFocus {
    Email,
    Password,
    Submit,
}

/// Login / registration form state
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub mode: AuthMode,
    pub focus: AuthFocus,
    pub error: Option<String>,
    /// Set while an exchange is outstanding; the submit control is disabled
    pub submitting: bool,
}

impl AuthForm {
    /// Fresh form, optionally pre-filled with the last email used
    pub fn new(last_email: Option<String>) -> Self {
        let email = last_email.unwrap_or_default();
        let focus = if email.is_empty() {
            AuthFocus::Email
        } else {
            AuthFocus::Password
        };
        Self {
            email,
            password: String::new(),
            mode: AuthMode::Login,
            focus,
            error: None,
            submitting: false,
        }
    }

    /// Type a character into the focused field. Returns false if rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        match self.focus {
            AuthFocus::Email if can_add_email_char(self.email.chars().count(), c) => {
                self.email.push(c);
                true
            }
            AuthFocus::Password if can_add_password_char(self.password.chars().count(), c) => {
                self.password.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            AuthFocus::Email => {
                self.email.pop();
            }
            AuthFocus::Password => {
                self.password.pop();
            }
            AuthFocus::Submit => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            AuthFocus::Email => AuthFocus::Password,
            AuthFocus::Password => AuthFocus::Submit,
            AuthFocus::Submit => AuthFocus::Email,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            AuthFocus::Email => AuthFocus::Submit,
            AuthFocus::Password => AuthFocus::Email,
            AuthFocus::Submit => AuthFocus::Password,
        };
    }

    /// Switch between logging in and creating an account
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
    }

    /// Validated (email, password) pair ready to send
    pub fn credentials(&self) -> Result<(String, String), FormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FormError::EmptyCredentials);
        }
        Ok((email.to_string(), self.password.clone()))
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.credentials().is_ok()
    }

    /// Mark the exchange as started; fails (and records the error) if the
    /// form is incomplete or already submitting.
    pub fn begin_submit(&mut self) -> Result<(String, String), FormError> {
        match self.credentials() {
            Ok(credentials) => {
                self.error = None;
                self.submitting = true;
                Ok(credentials)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Record the outcome of an exchange
    pub fn finish_submit(&mut self, error: Option<String>) {
        self.submitting = false;
        match error {
            Some(message) => self.error = Some(message),
            None => {
                self.error = None;
                self.password.clear();
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Log in to RUN AI",
            AuthMode::Register => "Create your account",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Log in",
            AuthMode::Register => "Sign up",
        }
    }

    pub fn toggle_hint(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "No account yet? Ctrl+R to sign up",
            AuthMode::Register => "Already registered? Ctrl+R to log in",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        assert!(!can_add_email_char(254, 'a'));
        assert!(!can_add_email_char(0, '\n'));
        assert!(!can_add_email_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }

    #[test]
    fn test_new_focuses_password_when_prefilled() {
        assert_eq!(AuthForm::new(None).focus, AuthFocus::Email);
        let form = AuthForm::new(Some("a@b.com".to_string()));
        assert_eq!(form.focus, AuthFocus::Password);
        assert_eq!(form.email, "a@b.com");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut form = AuthForm::new(None);
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit(), Err(FormError::EmptyCredentials));
        assert_eq!(form.error.as_deref(), Some("Please fill in all fields."));
        assert!(!form.submitting);

        form.email = "   ".to_string();
        form.password = "secret".to_string();
        assert_eq!(form.credentials(), Err(FormError::EmptyCredentials));
    }

    #[test]
    fn test_submit_lifecycle() {
        let mut form = AuthForm::new(Some(" a@b.com ".to_string()));
        form.password = "secret".to_string();

        let (email, password) = form.begin_submit().unwrap();
        assert_eq!(email, "a@b.com");
        assert_eq!(password, "secret");
        assert!(form.submitting);
        assert!(!form.can_submit());

        form.finish_submit(Some("Invalid credentials".to_string()));
        assert!(!form.submitting);
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(form.password, "secret");

        form.begin_submit().unwrap();
        form.finish_submit(None);
        assert!(form.password.is_empty());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_typing_follows_focus() {
        let mut form = AuthForm::new(None);
        assert!(form.push_char('a'));
        form.focus_next();
        assert!(form.push_char('x'));
        form.focus_next();
        assert!(!form.push_char('z'));
        form.focus_prev();
        form.pop_char();

        assert_eq!(form.email, "a");
        assert!(form.password.is_empty());
    }

    #[test]
    fn test_toggle_mode_clears_error() {
        let mut form = AuthForm::new(None);
        form.error = Some("boom".to_string());
        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Register);
        assert!(form.error.is_none());
        assert_eq!(form.submit_label(), "Sign up");
        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Login);
    }
}
