//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the single owner of the current credential
//! - `KeyValueStore`: string-keyed persistence the session is mirrored into,
//!   with file, OS keychain and in-memory backends
//!
//! A session has no client-side expiry; it lasts until the user logs out.

pub mod session;
pub mod storage;

pub use session::{Credential, SessionState, SessionStore, EMAIL_KEY, TOKEN_KEY};
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
