use thiserror::Error;

/// Failure talking to the text-generation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured (set llm.api_key or the {env} environment variable)")]
    MissingCredentials { env: String },

    #[error("request to the generation service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("generation service timed out")]
    Timeout,

    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    #[error("generation service returned an empty response")]
    Empty,

    #[error("response was cut off ({0})")]
    Truncated(String),

    #[error("response was blocked ({0})")]
    Blocked(String),

    #[error("could not read saved response: {0}")]
    Replay(#[from] std::io::Error),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Transport(e)
        }
    }
}

/// Why a raw response could not become a resume.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("response is not valid {0}")]
    Malformed(String),

    #[error("response is missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("field '{0}' has the wrong shape")]
    ShapeMismatch(String),

    #[error("response content rejected: {0}")]
    ContentPolicyViolation(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to compile document: {0}")]
    Compile(String),

    #[error("export timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Unsupported(String),

    #[error("export worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// Stable name of the failure. Safe to log: carries no response text.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Service(e) => match e {
                ServiceError::MissingCredentials { .. } => "service.missing_credentials",
                ServiceError::Transport(_) => "service.transport",
                ServiceError::Timeout => "service.timeout",
                ServiceError::Status { .. } => "service.status",
                ServiceError::Envelope(_) => "service.envelope",
                ServiceError::Empty => "service.empty",
                ServiceError::Truncated(_) => "service.truncated",
                ServiceError::Blocked(_) => "service.blocked",
                ServiceError::Replay(_) => "service.replay",
            },
            PipelineError::Validation(e) => match e {
                ValidationError::Malformed(_) => "validation.malformed",
                ValidationError::MissingFields(_) => "validation.missing_fields",
                ValidationError::ShapeMismatch(_) => "validation.shape_mismatch",
                ValidationError::ContentPolicyViolation(_) => "validation.content_policy",
            },
            PipelineError::Export(e) => match e {
                ExportError::Compile(_) => "export.compile",
                ExportError::Timeout(_) => "export.timeout",
                ExportError::Unsupported(_) => "export.unsupported",
                ExportError::Worker(_) => "export.worker",
                ExportError::Io(_) => "export.io",
            },
        }
    }

    /// Message suitable for showing to the person filling in the form.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Service(ServiceError::MissingCredentials { env }) => format!(
                "No API key is configured. Add one to your config file or set {}.",
                env
            ),
            PipelineError::Service(ServiceError::Timeout) => {
                "The AI service took too long to respond. Please try again.".to_string()
            }
            PipelineError::Service(ServiceError::Truncated(_)) => {
                "The AI response was cut off before it finished. Please try again.".to_string()
            }
            PipelineError::Service(ServiceError::Blocked(_)) => {
                "The AI service declined to answer. Try rephrasing your details.".to_string()
            }
            PipelineError::Service(_) => {
                "Failed to generate resume. Please try again.".to_string()
            }
            PipelineError::Validation(ValidationError::Malformed(_)) => {
                "Failed to parse AI response. Please try again.".to_string()
            }
            PipelineError::Validation(ValidationError::MissingFields(fields)) => format!(
                "Invalid response format. Missing fields: {}",
                fields.join(", ")
            ),
            PipelineError::Validation(ValidationError::ShapeMismatch(field)) => format!(
                "Invalid response format. '{}' does not have the expected structure.",
                field
            ),
            PipelineError::Validation(ValidationError::ContentPolicyViolation(reason)) => {
                format!("The generated resume was incomplete: {}.", reason)
            }
            PipelineError::Export(e) => format!("Could not export the resume: {}.", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_names() {
        let err = PipelineError::from(ValidationError::MissingFields(vec![
            "skills".into(),
            "summary".into(),
        ]));
        assert_eq!(
            err.user_message(),
            "Invalid response format. Missing fields: skills, summary"
        );
    }

    #[test]
    fn test_service_errors_do_not_leak_bodies() {
        let err = PipelineError::from(ServiceError::Status {
            status: 500,
            body: "internal stack trace".into(),
        });
        assert!(!err.user_message().contains("stack trace"));
    }

    #[test]
    fn test_kind_never_carries_response_text() {
        let err = PipelineError::from(ServiceError::Status {
            status: 400,
            body: "echo of the request".into(),
        });
        assert_eq!(err.kind(), "service.status");

        let err = PipelineError::from(ValidationError::ContentPolicyViolation(
            "model said something".into(),
        ));
        assert_eq!(err.kind(), "validation.content_policy");
    }
}
