use serde::{Deserialize, Serialize};

use crate::feedback::Feedback;

pub const FEEDBACK_PATH: &str = "/api/feedback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl DispatchRequest {
    pub fn from_feedback(feedback: &Feedback) -> Self {
        Self {
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            contact: feedback.contact.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub delivered: bool,
}

pub fn encode<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

pub fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}
