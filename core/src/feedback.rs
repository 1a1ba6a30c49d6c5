use std::fmt;

use crate::rating::{POSITIVE_THRESHOLD, RATING_UNSET};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub rating: u8,
    pub comment: String,
    pub contact: Option<String>,
}

impl Feedback {
    pub fn new(rating: u8, comment: &str, contact: &str) -> Result<Self, FeedbackError> {
        if rating == RATING_UNSET || rating >= POSITIVE_THRESHOLD {
            return Err(FeedbackError::RatingOutOfRange { found: rating });
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(FeedbackError::EmptyComment);
        }
        let contact = contact.trim();
        let contact = if contact.is_empty() {
            None
        } else {
            Some(contact.to_string())
        };
        Ok(Self {
            rating,
            comment: comment.to_string(),
            contact,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    EmptyComment,
    RatingOutOfRange { found: u8 },
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::EmptyComment => write!(f, "comment must not be empty"),
            FeedbackError::RatingOutOfRange { found } => {
                write!(f, "feedback rating must be 1-3, got {found}")
            }
        }
    }
}

impl std::error::Error for FeedbackError {}
