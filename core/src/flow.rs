use crate::rating::{branch_for, Branch, RATING_MAX, RATING_UNSET};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Rating,
    Form,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowState {
    pub rating: u8,
    pub step: Step,
    pub submitting: bool,
}

impl FlowState {
    pub fn new() -> Self {
        Self {
            rating: RATING_UNSET,
            step: Step::Rating,
            submitting: false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.step == Step::Form && !self.submitting
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowAction {
    RateSample { value: u8 },
    RateAbandon,
    RateCommit,
    // Fed by the shell once the cosmetic reveal delay after a negative
    // commit has elapsed.
    ShowForm,
    Back,
    SubmitStarted,
    SubmitFinished { delivered: bool },
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEffect {
    OpenReview,
    RevealForm,
    NotifyFailure,
}

// Actions whose guards fail leave the state untouched and produce no effect.
pub fn apply(state: &mut FlowState, action: FlowAction) -> Option<FlowEffect> {
    match action {
        FlowAction::RateSample { value } => {
            if state.step == Step::Rating {
                state.rating = value.min(RATING_MAX);
            }
            None
        }
        FlowAction::RateAbandon => {
            if state.step == Step::Rating {
                state.rating = RATING_UNSET;
            }
            None
        }
        FlowAction::RateCommit => {
            if state.step != Step::Rating || state.rating == RATING_UNSET {
                return None;
            }
            match branch_for(state.rating) {
                Branch::Positive => {
                    state.step = Step::Success;
                    Some(FlowEffect::OpenReview)
                }
                Branch::Negative => Some(FlowEffect::RevealForm),
            }
        }
        FlowAction::ShowForm => {
            if state.step == Step::Rating
                && state.rating != RATING_UNSET
                && branch_for(state.rating) == Branch::Negative
            {
                state.step = Step::Form;
            }
            None
        }
        FlowAction::Back => {
            if state.step == Step::Form && !state.submitting {
                state.step = Step::Rating;
            }
            None
        }
        FlowAction::SubmitStarted => {
            if state.can_submit() {
                state.submitting = true;
            }
            None
        }
        FlowAction::SubmitFinished { delivered } => {
            if state.step != Step::Form || !state.submitting {
                return None;
            }
            state.submitting = false;
            if delivered {
                state.step = Step::Success;
                None
            } else {
                Some(FlowEffect::NotifyFailure)
            }
        }
        FlowAction::Restart => {
            *state = FlowState::new();
            None
        }
    }
}
