use serde::{Deserialize, Serialize};

/// A file indexed by the retrieval backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    /// Human-readable size, already formatted by the backend
    pub size: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRagResponse {
    pub message: String,
}
