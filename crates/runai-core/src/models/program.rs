use serde::Deserialize;

/// Markdown text of a generated training program
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramResponse {
    pub program: String,
}
