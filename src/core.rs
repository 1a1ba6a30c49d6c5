pub(crate) use hyoka_core::rating::{branch_for, Branch, RATING_MAX, RATING_MIN, RATING_UNSET};

pub(crate) const FORM_REVEAL_DELAY_MS: u32 = 260;

pub(crate) const DEFAULT_BUSINESS_NAME: &str = "our shop";
pub(crate) const DEFAULT_REVIEW_URL: &str = "https://search.google.com/local/writereview";

pub(crate) const SUBMIT_FAILURE_MESSAGE: &str =
    "Something went wrong sending your message. Please try again.";
