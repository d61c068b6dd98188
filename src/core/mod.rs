pub mod batch;
pub mod dispatch;
pub mod features;
pub mod heuristic;
pub mod model;
pub mod present;
pub mod report;
pub mod score;
pub mod session;

use crate::core::session::{FailurePolicy, ReportSession};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

pub fn replay<'a, I>(responses: I, policy: FailurePolicy) -> ReportSession
where
    I: IntoIterator<Item = &'a RawResponse>,
{
    let mut session = ReportSession::new(policy);
    for (idx, response) in responses.into_iter().enumerate() {
        debug!(idx, status = response.status, "applying response");
        session.apply(dispatch::dispatch_response(
            response.status,
            &response.body,
        ));
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::RenderInstruction;

    #[test]
    fn last_success_wins() {
        let responses = [
            RawResponse::ok(r#"{"valid": false}"#),
            RawResponse::ok(r#"{"multi_file": true, "results": [{"valid": true}]}"#),
        ];
        let session = replay(&responses, FailurePolicy::Keep);
        assert!(matches!(session.report(), Some(RenderInstruction::Batch(_))));
        assert!(session.is_clean());
    }

    #[test]
    fn trailing_failure_keeps_report_by_default() {
        let responses = [
            RawResponse::ok(r#"{"valid": true}"#),
            RawResponse {
                status: 500,
                body: "Internal Server Error".to_string(),
            },
        ];
        let session = replay(&responses, FailurePolicy::default());
        assert!(session.report().is_some());
        assert!(session.failure().is_some());

        let session = replay(&responses, FailurePolicy::Clear);
        assert!(session.report().is_none());
    }

    #[test]
    fn no_responses_leave_empty_session() {
        let session = replay(std::iter::empty(), FailurePolicy::Keep);
        assert!(session.report().is_none());
        assert!(session.failure().is_none());
    }
}
