use serde::{Deserialize, Serialize, Serializer};

use crate::error::ServiceError;
use crate::form::{Tone, WritingStyle};

/// Body of `POST /api/description`
#[derive(Debug, Serialize)]
pub struct DescriptionRequest<'a> {
    /// Image as a base64 data URL
    pub image: &'a str,
}

/// Body of `POST /api/caption`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    pub description: String,
    pub tone: Tone,
    pub style: WritingStyle,
    /// Sent as `null` when the user gave no context
    pub additional_context: Option<String>,
    #[serde(serialize_with = "yes_no")]
    pub emojis: bool,
    #[serde(serialize_with = "yes_no")]
    pub hashtags: bool,
}

// The service expects these toggles as "Yes"/"No"
fn yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}

/// Decoded caption payload
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionResponse {
    pub captions: Vec<String>,
}

/// Extracts the description from a response body.
///
/// The service returns either a JSON string or plain text.
pub fn parse_description(body: &str) -> String {
    match serde_json::from_str::<String>(body) {
        Ok(description) => description,
        Err(_) => body.trim().to_string(),
    }
}

/// Extracts the captions from a response body.
///
/// The service wraps the caption object in a JSON string, so the body is
/// decoded twice; a bare object is accepted as well.
pub fn parse_captions(body: &str) -> Result<Vec<String>, ServiceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let response: CaptionResponse = match value {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)?,
        other => serde_json::from_value(other)?,
    };
    Ok(response.captions)
}
