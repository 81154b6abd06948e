//! Request and response shapes for the RUN AI backend.
//!
//! - `TokenResponse`, `RegisterRequest`: login and registration exchanges
//! - `QueryRequest`, `QueryResponse`, `ChatMessage`: the coaching chat
//! - `DocumentInfo`, `UpdateRagResponse`: the document index
//! - `UserProfile`, `Gender`, `ActivityLevel`: the runner's parameters
//! - `ProgramResponse`: generated training programs

pub mod auth;
pub mod chat;
pub mod document;
pub mod profile;
pub mod program;

pub use auth::{RegisterRequest, TokenResponse};
pub use chat::{ChatMessage, QueryRequest, QueryResponse, Role};
pub use document::{DocumentInfo, DocumentListResponse, UpdateRagResponse};
pub use profile::{ActivityLevel, Gender, UserProfile};
pub use program::ProgramResponse;
