//! Schema types for the one-shot process endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub response: String,
}
