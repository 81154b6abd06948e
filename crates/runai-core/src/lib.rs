//! Core library for the RUN AI client.
//!
//! The backend owns every piece of business logic; this crate holds the thin
//! client side of it:
//!
//! - `auth`: the session store and the key-value backends it persists through
//! - `api`: the authenticated request helper, login/registration exchanges and
//!   one wrapper per backend route
//! - `models`: request and response shapes
//! - `forms`: login and profile form state with client-side validation
//! - `nav`: page selection and the screen router
//! - `config`: on-disk configuration and environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod nav;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Credential, SessionState, SessionStore};
pub use config::Config;
