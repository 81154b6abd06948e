//! REST API client module for the RUN AI backend.
//!
//! This module provides the `ApiClient` for the login and registration
//! exchanges and for every authenticated route (chat, documents, profile,
//! program generation).
//!
//! The backend issues a bearer token from `/token` or `/register`; every
//! other route expects it in the `Authorization` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, NO_BODY};
pub use error::{ApiError, UNKNOWN_SERVER_ERROR};

pub use reqwest::Method;
