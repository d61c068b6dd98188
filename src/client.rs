use crate::config::AnalyzerConfig;
use crate::core::RawResponse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("a validation request is already in flight")]
    Busy,

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filename: String,
    pub content: String,
}

// Text and files travel in the same request, the way the analyzer's web form
// posts them. The analyzer answers with a batch as soon as any file is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub code: String,
    pub files: Vec<SourceFile>,
}

impl Submission {
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            files: Vec::new(),
        }
    }
}

// The slot frees when the permit drops, on every exit path.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

#[derive(Debug)]
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
}

impl InFlightGuard {
    pub fn try_acquire(&self) -> Result<InFlightPermit<'_>, ClientError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(InFlightPermit { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

pub struct AnalyzerClient {
    url: String,
    python_version: String,
    agent: ureq::Agent,
    in_flight: InFlightGuard,
}

fn make_agent(timeout_secs: u64) -> ureq::Agent {
    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    ureq::config::Config::builder()
        // Status codes are classified by the dispatcher.
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build()
        .new_agent()
}

impl AnalyzerClient {
    pub fn new(cfg: &AnalyzerConfig) -> Self {
        Self {
            url: cfg.url.clone(),
            python_version: cfg.python_version.clone(),
            agent: make_agent(cfg.timeout_secs),
            in_flight: InFlightGuard::default(),
        }
    }

    pub fn submit(&self, submission: &Submission) -> Result<RawResponse, ClientError> {
        let _permit = self.in_flight.try_acquire()?;
        info!(
            url = %self.url,
            bytes = submission.code.len(),
            files = submission.files.len(),
            "submitting code for validation"
        );

        let request = self.agent.post(self.url.as_str());
        let sent = if submission.files.is_empty() {
            request.send_form([
                ("code", submission.code.as_str()),
                ("python_version", self.python_version.as_str()),
            ])
        } else {
            let form = MultipartForm::new(submission, &self.python_version);
            request
                .header("Content-Type", form.content_type())
                .send(form.body.as_slice())
        };
        let response = sent.map_err(|err| self.transport_error(err))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| self.transport_error(err))?;
        debug!(status, bytes = body.len(), "analyzer replied");

        Ok(RawResponse { status, body })
    }

    fn transport_error(&self, err: ureq::Error) -> ClientError {
        ClientError::Transport {
            url: self.url.clone(),
            message: err.to_string(),
        }
    }
}

struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    fn new(submission: &Submission, python_version: &str) -> Self {
        let boundary = pick_boundary(submission, python_version);
        let mut body = Vec::new();

        let mut part = |disposition: String, payload: &str| {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n\r\n");
            body.extend_from_slice(payload.as_bytes());
            body.extend_from_slice(b"\r\n");
        };

        part(field_disposition("python_version"), python_version);
        part(field_disposition("code"), &submission.code);
        for file in &submission.files {
            part(
                format!(
                    "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                     Content-Type: text/x-python",
                    quote_filename(&file.filename)
                ),
                &file.content,
            );
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Self { boundary, body }
    }

    fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

fn field_disposition(name: &str) -> String {
    format!("Content-Disposition: form-data; name=\"{name}\"")
}

fn quote_filename(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn pick_boundary(submission: &Submission, python_version: &str) -> String {
    let collides = |boundary: &str| {
        submission.code.contains(boundary)
            || python_version.contains(boundary)
            || submission
                .files
                .iter()
                .any(|f| f.content.contains(boundary) || f.filename.contains(boundary))
    };

    let mut seed = 0u64;
    loop {
        let boundary = format!("pyvet-boundary-{seed:016x}");
        if !collides(&boundary) {
            return boundary;
        }
        seed += 1;
    }
}
