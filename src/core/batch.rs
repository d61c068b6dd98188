use crate::core::model::BatchReport;
use crate::core::present::{self, SingleViewModel};
use serde::Serialize;

pub const DEFAULT_FILENAME: &str = "code_snippet.py";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchViewModel {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub files: Vec<FileView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileView {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_link: Option<String>,
    pub view: SingleViewModel,
}

impl FileView {
    pub fn status_label(&self) -> &'static str {
        if self.view.valid { "Valid" } else { "Invalid" }
    }
}

pub fn detail_link(analysis_id: &str) -> String {
    format!("/analysis/{analysis_id}")
}

pub fn aggregate(report: &BatchReport) -> BatchViewModel {
    let total = report.results.len();
    let valid_count = report.results.iter().filter(|r| r.valid).count();

    let files = report
        .results
        .iter()
        .map(|result| FileView {
            filename: result
                .filename
                .clone()
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            detail_link: result.analysis_id.as_deref().map(detail_link),
            view: present::present(result),
        })
        .collect();

    BatchViewModel {
        total,
        valid_count,
        invalid_count: total - valid_count,
        files,
    }
}
