use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const SENT_MESSAGE: &str = "Application sent successfully!";
pub const MISSING_FIELDS_ERROR: &str = "Missing required fields.";
pub const INVALID_BODY_ERROR: &str = "Invalid request body.";
pub const PAYLOAD_TOO_LARGE_ERROR: &str = "Application payload is too large.";
pub const UNDECODABLE_RESUME_ERROR: &str = "Resume attachment could not be decoded.";
pub const SEND_FAILED_ERROR: &str = "Failed to send application email.";

/// Payload posted by the application modal to the relay endpoint.
///
/// Only `full_name` and `email` are required; the job fields are a
/// denormalized copy of the selected posting and only feed the email body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub message: Option<String>,
    /// Data URL (`data:<mime>;base64,<payload>`) of the uploaded resume.
    #[serde(default)]
    pub resume_base64: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub resume_file_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub job_type: Option<String>,
}

impl ApplicationSubmission {
    /// Name and email when both are present and non-empty. No format checks.
    pub fn applicant(&self) -> Option<(&str, &str)> {
        match (non_empty(&self.full_name), non_empty(&self.email)) {
            (Some(full_name), Some(email)) => Some((full_name, email)),
            _ => None,
        }
    }

    pub fn message_text(&self) -> Option<&str> {
        non_empty(&self.message)
    }

    pub fn resume_payload(&self) -> Option<&str> {
        non_empty(&self.resume_base64)
    }

    pub fn job_title(&self) -> Option<&str> {
        non_empty(&self.job_title)
    }

    /// Labelled job fields in display order, skipping blanks.
    pub fn job_details(&self) -> Vec<(&'static str, &str)> {
        [
            ("Position", &self.job_title),
            ("Country", &self.country),
            ("Salary", &self.salary),
            ("Experience", &self.experience),
            ("Job Type", &self.job_type),
        ]
        .into_iter()
        .filter_map(|(label, value)| non_empty(value).map(|value| (label, value)))
        .collect()
    }
}

/// Cosmetic fields echo whatever the sheet cell held. Numbers and booleans
/// become text; anything else is dropped.
fn deserialize_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => Some(raw),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Relay response body consumed by the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: Some(SENT_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
