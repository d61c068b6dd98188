use crate::core::batch::{self, BatchViewModel};
use crate::core::model::{AnalysisResult, BatchReport};
use crate::core::present::{self, SingleViewModel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("analysis request failed: {0}")]
    Transport(String),

    #[error("unrecognized analyzer response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RenderInstruction {
    Single(SingleViewModel),
    Batch(BatchViewModel),
}

impl RenderInstruction {
    pub fn all_valid(&self) -> bool {
        match self {
            Self::Single(view) => view.valid,
            Self::Batch(view) => view.invalid_count == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseShape {
    Single,
    Batch,
    Unrecognized,
}

fn shape_of(body: &Value) -> ResponseShape {
    let Some(fields) = body.as_object() else {
        return ResponseShape::Unrecognized;
    };

    let marker = fields.get("multi_file").or_else(|| fields.get("multiFile"));
    if marker == Some(&Value::Bool(true)) && fields.get("results").is_some_and(|r| !r.is_null())
    {
        return ResponseShape::Batch;
    }

    if fields.get("valid").is_some_and(Value::is_boolean) {
        ResponseShape::Single
    } else {
        ResponseShape::Unrecognized
    }
}

pub fn dispatch(body: &Value) -> Result<RenderInstruction, DispatchError> {
    match shape_of(body) {
        ResponseShape::Batch => {
            let report = BatchReport::deserialize(body)
                .map_err(|err| DispatchError::Malformed(format!("batch envelope: {err}")))?;
            debug!(files = report.results.len(), "dispatching batch response");
            Ok(RenderInstruction::Batch(batch::aggregate(&report)))
        }
        ResponseShape::Single => {
            let result = AnalysisResult::deserialize(body)
                .map_err(|err| DispatchError::Malformed(format!("analysis result: {err}")))?;
            debug!(valid = result.valid, "dispatching single response");
            Ok(RenderInstruction::Single(present::present(&result)))
        }
        ResponseShape::Unrecognized => {
            warn!("response matches neither the single nor the batch shape");
            Err(DispatchError::Malformed(
                "expected an analysis result or a multi_file envelope".to_string(),
            ))
        }
    }
}

pub fn dispatch_response(status: u16, body: &str) -> Result<RenderInstruction, DispatchError> {
    if !(200..300).contains(&status) {
        warn!(status, "analyzer answered with a non-success status");
        return Err(DispatchError::Transport(format!("HTTP status {status}")));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|err| DispatchError::Malformed(format!("body is not JSON: {err}")))?;
    dispatch(&value)
}
