use crate::core::dispatch::{DispatchError, RenderInstruction};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Keep,
    Clear,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailureBanner {
    pub message: String,
}

impl From<&DispatchError> for FailureBanner {
    fn from(err: &DispatchError) -> Self {
        Self {
            message: format!("An error occurred: {err}"),
        }
    }
}

// Each successful dispatch replaces the report wholesale.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSession {
    #[serde(skip)]
    policy: FailurePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<RenderInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureBanner>,
}

impl ReportSession {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            report: None,
            failure: None,
        }
    }

    pub fn apply(&mut self, outcome: Result<RenderInstruction, DispatchError>) {
        match outcome {
            Ok(instruction) => {
                debug!("replacing rendered report");
                self.report = Some(instruction);
                self.failure = None;
            }
            Err(err) => {
                info!(error = %err, policy = %self.policy, "showing failure banner");
                if self.policy == FailurePolicy::Clear {
                    self.report = None;
                }
                self.failure = Some(FailureBanner::from(&err));
            }
        }
    }

    pub fn clear(&mut self) {
        self.report = None;
        self.failure = None;
    }

    pub fn report(&self) -> Option<&RenderInstruction> {
        self.report.as_ref()
    }

    pub fn failure(&self) -> Option<&FailureBanner> {
        self.failure.as_ref()
    }

    pub fn is_clean(&self) -> bool {
        self.failure.is_none() && self.report.as_ref().is_some_and(RenderInstruction::all_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::dispatch;
    use serde_json::json;

    fn good_report() -> Result<RenderInstruction, DispatchError> {
        dispatch(&json!({"valid": true, "filename": "a.py"}))
    }

    #[test]
    fn keep_policy_leaves_previous_report_under_banner() {
        let mut session = ReportSession::new(FailurePolicy::Keep);
        session.apply(good_report());
        let before = session.report().cloned();

        session.apply(Err(DispatchError::Transport("HTTP status 502".to_string())));
        assert_eq!(session.report().cloned(), before);
        assert!(session.failure().unwrap().message.contains("502"));
        assert!(!session.is_clean());
    }

    #[test]
    fn clear_policy_drops_previous_report() {
        let mut session = ReportSession::new(FailurePolicy::Clear);
        session.apply(good_report());
        session.apply(dispatch(&json!({})));
        assert!(session.report().is_none());
        assert!(session.failure().is_some());
    }

    #[test]
    fn malformed_body_only_sets_banner() {
        let mut session = ReportSession::default();
        session.apply(dispatch(&json!({})));
        assert!(session.report().is_none());
        assert!(
            session
                .failure()
                .unwrap()
                .message
                .starts_with("An error occurred:")
        );
    }

    #[test]
    fn success_replaces_report_and_clears_banner() {
        let mut session = ReportSession::default();
        session.apply(Err(DispatchError::Transport("refused".to_string())));
        session.apply(dispatch(&json!({"valid": false})));
        assert!(session.failure().is_none());
        assert!(!session.report().unwrap().all_valid());

        session.apply(good_report());
        assert!(session.is_clean());
    }

    #[test]
    fn clear_resets_everything() {
        let mut session = ReportSession::default();
        session.apply(good_report());
        session.apply(Err(DispatchError::Transport("x".to_string())));
        session.clear();
        assert!(session.report().is_none());
        assert!(session.failure().is_none());
        assert!(!session.is_clean());
    }
}
