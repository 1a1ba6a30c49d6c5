pub mod feedback;
pub mod flow;
pub mod protocol;
pub mod rating;

pub use feedback::{Feedback, FeedbackError};
pub use flow::{apply, FlowAction, FlowEffect, FlowState, Step};
pub use protocol::{decode, encode, DispatchRequest, DispatchResponse, FEEDBACK_PATH};
pub use rating::{
    branch_for, rating_at, Branch, ControlSpan, POSITIVE_THRESHOLD, RATING_MAX, RATING_MIN,
    RATING_UNSET,
};
