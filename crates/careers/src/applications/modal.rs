use std::path::Path;

use tracing::error;

use super::client::ClientSubmissionError;
use super::domain::{ApplicationSubmission, SubmissionResult};
use super::resume;
use crate::listings::{JobBoard, JobPosting};

pub const FAILED_ALERT: &str = "Failed to send your application. Please try again.";
pub const ERROR_ALERT: &str = "Something went wrong while sending your application.";

/// File picker hint. Advisory only; the relay never re-checks it.
pub const RESUME_ACCEPT: &[&str] = &["pdf", "doc", "docx"];

const SUBMIT_LABEL: &str = "Submit Application";
const SUBMITTING_LABEL: &str = "Submitting...";

/// A resume picked by the applicant, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read the whole file and guess its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientSubmissionError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientSubmissionError::ResumeRead {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn matches_accept_hint(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                RESUME_ACCEPT
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    pub fn to_data_url(&self) -> String {
        resume::encode_data_url(&self.content_type, &self.bytes)
    }
}

/// Editable form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub resume: Option<ResumeFile>,
}

impl ApplicationForm {
    fn has_required_fields(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Idle,
    Submitting,
    Success,
}

/// Transitions the modal refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("full name and email are required")]
    MissingRequiredFields,
    #[error("the form cannot be submitted while {0:?}")]
    NotEditable(ModalPhase),
}

/// Application modal bound to one posting. Transitions consume the modal and
/// return the next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationModal {
    job: JobPosting,
    form: ApplicationForm,
    phase: ModalPhase,
    alert: Option<String>,
}

impl ApplicationModal {
    pub fn open(job: JobPosting) -> Self {
        Self {
            job,
            form: ApplicationForm::default(),
            phase: ModalPhase::Idle,
            alert: None,
        }
    }

    /// Open for whatever the board currently has selected.
    pub fn for_selection(board: &JobBoard) -> Option<Self> {
        board.selected().cloned().map(Self::open)
    }

    pub fn job(&self) -> &JobPosting {
        &self.job
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// Alert raised by the last failed submission, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn inputs_enabled(&self) -> bool {
        self.phase == ModalPhase::Idle
    }

    pub fn submit_label(&self) -> &'static str {
        match self.phase {
            ModalPhase::Submitting => SUBMITTING_LABEL,
            ModalPhase::Idle | ModalPhase::Success => SUBMIT_LABEL,
        }
    }

    /// Subtitle under the job title: country, job type and salary.
    pub fn header(&self) -> String {
        format!(
            "{} • {} • {}",
            self.job.country, self.job.job_type, self.job.salary
        )
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.edit(|form| form.name = name.into())
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        self.edit(|form| form.email = email.into())
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.edit(|form| form.message = message.into())
    }

    pub fn with_resume(self, resume: Option<ResumeFile>) -> Self {
        self.edit(|form| form.resume = resume)
    }

    fn edit(mut self, apply: impl FnOnce(&mut ApplicationForm)) -> Self {
        if self.inputs_enabled() {
            apply(&mut self.form);
        }
        self
    }

    /// `Idle -> Submitting`. Returns the payload to post; the resume, if any,
    /// is encoded here so the request never leaves without it.
    pub fn begin_submit(self) -> Result<(Self, ApplicationSubmission), ModalError> {
        if self.phase != ModalPhase::Idle {
            return Err(ModalError::NotEditable(self.phase));
        }
        if !self.form.has_required_fields() {
            return Err(ModalError::MissingRequiredFields);
        }

        let payload = ApplicationSubmission {
            full_name: Some(self.form.name.clone()),
            email: Some(self.form.email.clone()),
            message: Some(self.form.message.clone()),
            resume_base64: self.form.resume.as_ref().map(ResumeFile::to_data_url),
            resume_file_name: self
                .form
                .resume
                .as_ref()
                .map(|resume| resume.file_name.clone()),
            job_title: Some(self.job.title.clone()),
            country: Some(self.job.country.clone()),
            salary: Some(self.job.salary.clone()),
            experience: Some(self.job.experience.clone()),
            job_type: Some(self.job.job_type.clone()),
        };

        let submitting = Self {
            phase: ModalPhase::Submitting,
            alert: None,
            ..self
        };
        Ok((submitting, payload))
    }

    /// `Submitting -> Success` clears the form; any failure returns to `Idle`
    /// with the fields kept and an alert set.
    pub fn finish(self, outcome: Result<SubmissionResult, ClientSubmissionError>) -> Self {
        if self.phase != ModalPhase::Submitting {
            return self;
        }

        match outcome {
            Ok(result) if result.success => Self {
                form: ApplicationForm::default(),
                phase: ModalPhase::Success,
                alert: None,
                ..self
            },
            Ok(result) => {
                error!(
                    error = result.error.as_deref().unwrap_or("unspecified"),
                    "relay rejected application"
                );
                Self {
                    phase: ModalPhase::Idle,
                    alert: Some(FAILED_ALERT.to_string()),
                    ..self
                }
            }
            Err(err) => {
                error!(error = %err, "error submitting application");
                Self {
                    phase: ModalPhase::Idle,
                    alert: Some(ERROR_ALERT.to_string()),
                    ..self
                }
            }
        }
    }

    /// Close the modal and hand the page back its board without a selection.
    pub fn close(self, board: JobBoard) -> JobBoard {
        board.clear_selection()
    }
}
