//! Form state and client-side validation.
//!
//! Forms hold raw text exactly as typed; validation happens when the user
//! submits, and a rejected form never reaches the network.

pub mod auth;
pub mod profile;

pub use auth::{can_add_email_char, can_add_password_char, AuthFocus, AuthForm, AuthMode};
pub use profile::{ProfileField, ProfileForm};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    EmptyCredentials,

    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{field} must be a number")]
    InvalidNumber { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}
