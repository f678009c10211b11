use serde::{Deserialize, Serialize};

/// Body of `POST /calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    /// Calculator the metrics came from. Only logged.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Free-form metrics, forwarded to the prompt untouched.
    #[serde(default)]
    pub inputs: serde_json::Value,
    #[serde(default)]
    pub email: Option<String>,
}

/// Text produced by the analysis generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
}

impl AnalysisResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
