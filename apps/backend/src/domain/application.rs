//! Application lifecycle state machine.
//!
//! The whole transition table lives in `next_status` so every legal move is
//! visible and testable in one place. Everything here is pure: persistence,
//! role checks against the caller, and ownership are the service layer's
//! concern. Ownership is checked separately from role: a candidate may
//! only withdraw their own application.

use crate::entities::job_applications::ApplicationStatus;
use crate::entities::users::UserRole;
use crate::errors::domain::DomainError;

/// Events that move an existing application through its lifecycle.
/// Submission is not an event: it creates the record in `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationEvent {
    MarkReviewed,
    ScheduleInterview,
    Reject,
    Accept,
    Withdraw,
}

impl ApplicationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ApplicationEvent::MarkReviewed => "review",
            ApplicationEvent::ScheduleInterview => "schedule an interview for",
            ApplicationEvent::Reject => "reject",
            ApplicationEvent::Accept => "accept",
            ApplicationEvent::Withdraw => "withdraw",
        }
    }

    /// The role allowed to trigger this event. Withdrawal is the only
    /// candidate-initiated move; everything else is an admin action.
    pub fn required_role(&self) -> UserRole {
        match self {
            ApplicationEvent::Withdraw => UserRole::Candidate,
            _ => UserRole::Admin,
        }
    }
}

/// The transition table.
///
/// `Ok(Some(next))` updates the status, `Ok(None)` deletes the record
/// (withdrawal). An illegal pair leaves the record untouched and names the
/// attempted event and current status in the error. `Accepted` and
/// `Rejected` are terminal: no event is legal from either.
pub fn next_status(
    current: ApplicationStatus,
    event: ApplicationEvent,
) -> Result<Option<ApplicationStatus>, DomainError> {
    use self::ApplicationEvent as E;
    use self::ApplicationStatus as S;

    match (current, event) {
        (S::Pending | S::Reviewing, E::MarkReviewed) => Ok(Some(S::Reviewing)),
        (S::Reviewing, E::ScheduleInterview) => Ok(Some(S::Interview)),
        (S::Pending | S::Reviewing | S::Interview, E::Reject) => Ok(Some(S::Rejected)),
        (S::Interview, E::Accept) => Ok(Some(S::Accepted)),
        (S::Pending | S::Reviewing, E::Withdraw) => Ok(None),
        (current, event) => Err(DomainError::invalid_transition(event.name(), current.as_str())),
    }
}

/// An application can still be (re-)reviewed while it sits in the early states.
pub fn can_be_reviewed(status: ApplicationStatus) -> bool {
    matches!(status, ApplicationStatus::Pending | ApplicationStatus::Reviewing)
}

/// Interviews are scheduled only once a review has happened.
pub fn can_schedule_interview(status: ApplicationStatus) -> bool {
    matches!(status, ApplicationStatus::Reviewing)
}

/// Candidates may withdraw only while the application is in an early state.
pub fn can_withdraw(status: ApplicationStatus) -> bool {
    matches!(status, ApplicationStatus::Pending | ApplicationStatus::Reviewing)
}

pub fn is_terminal(status: ApplicationStatus) -> bool {
    matches!(status, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::job_applications::ApplicationStatus as S;
    use super::ApplicationEvent as E;

    const ALL_STATUSES: [S; 5] = [S::Pending, S::Reviewing, S::Interview, S::Rejected, S::Accepted];
    const ALL_EVENTS: [E; 5] = [E::MarkReviewed, E::ScheduleInterview, E::Reject, E::Accept, E::Withdraw];

    #[test]
    fn test_review_from_early_states() {
        assert_eq!(next_status(S::Pending, E::MarkReviewed).unwrap(), Some(S::Reviewing));
        assert_eq!(next_status(S::Reviewing, E::MarkReviewed).unwrap(), Some(S::Reviewing));
        assert!(next_status(S::Interview, E::MarkReviewed).is_err());
    }

    #[test]
    fn test_interview_only_from_reviewing() {
        assert_eq!(
            next_status(S::Reviewing, E::ScheduleInterview).unwrap(),
            Some(S::Interview)
        );
        assert!(next_status(S::Pending, E::ScheduleInterview).is_err());
        assert!(next_status(S::Interview, E::ScheduleInterview).is_err());
    }

    #[test]
    fn test_reject_from_any_live_state() {
        for status in [S::Pending, S::Reviewing, S::Interview] {
            assert_eq!(next_status(status, E::Reject).unwrap(), Some(S::Rejected));
        }
    }

    #[test]
    fn test_accept_only_from_interview() {
        assert_eq!(next_status(S::Interview, E::Accept).unwrap(), Some(S::Accepted));
        let err = next_status(S::Pending, E::Accept).unwrap_err();
        match err {
            DomainError::InvalidTransition { event, status } => {
                assert_eq!(event, "accept");
                assert_eq!(status, "pending");
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
        assert!(next_status(S::Reviewing, E::Accept).is_err());
    }

    #[test]
    fn test_withdraw_deletes_from_early_states_only() {
        assert_eq!(next_status(S::Pending, E::Withdraw).unwrap(), None);
        assert_eq!(next_status(S::Reviewing, E::Withdraw).unwrap(), None);
        assert!(next_status(S::Interview, E::Withdraw).is_err());
    }

    #[test]
    fn test_terminal_states_admit_no_event() {
        for status in [S::Rejected, S::Accepted] {
            for event in ALL_EVENTS {
                assert!(
                    next_status(status, event).is_err(),
                    "{event:?} must not be legal from {status:?}"
                );
            }
        }
    }

    #[test]
    fn test_predicates_match_table() {
        for status in ALL_STATUSES {
            assert_eq!(can_be_reviewed(status), next_status(status, E::MarkReviewed).is_ok());
            assert_eq!(
                can_schedule_interview(status),
                next_status(status, E::ScheduleInterview).is_ok()
            );
            assert_eq!(can_withdraw(status), next_status(status, E::Withdraw).is_ok());
        }
    }

    #[test]
    fn test_required_roles() {
        use crate::entities::users::UserRole;
        assert_eq!(E::Withdraw.required_role(), UserRole::Candidate);
        for event in [E::MarkReviewed, E::ScheduleInterview, E::Reject, E::Accept] {
            assert_eq!(event.required_role(), UserRole::Admin);
        }
    }

    mod props {
        use proptest::prelude::*;

        use super::{ALL_EVENTS, ALL_STATUSES};
        use crate::domain::application::{is_terminal, next_status, ApplicationEvent as E};
        use crate::entities::job_applications::ApplicationStatus as S;

        fn arb_status() -> impl Strategy<Value = S> {
            prop::sample::select(ALL_STATUSES.to_vec())
        }

        fn arb_event() -> impl Strategy<Value = E> {
            prop::sample::select(ALL_EVENTS.to_vec())
        }

        proptest! {
            /// No event ever produces a transition out of a terminal state,
            /// and no transition ever lands on `Pending` (only submission
            /// creates that state).
            #[test]
            fn terminal_is_absorbing_and_pending_unreachable(
                status in arb_status(),
                event in arb_event(),
            ) {
                let result = next_status(status, event);
                if is_terminal(status) {
                    prop_assert!(result.is_err());
                }
                if let Ok(Some(next)) = result {
                    prop_assert_ne!(next, S::Pending);
                }
            }
        }
    }
}
