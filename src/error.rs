use thiserror::Error;

use crate::api::{DownloadError, PollError, SubmissionError};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Status check failed: {0}")]
    Poll(#[from] PollError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Polling cancelled before the job finished")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_error_is_wrapped() {
        let err: ConvertError = SubmissionError::Rejected {
            status: 500,
            body: "disk full".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Submission failed: job submission failed (status 500): disk full"
        );
    }

    #[test]
    fn file_read_names_the_path() {
        let err = ConvertError::FileRead {
            path: "in/a.pdf".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "Failed to read in/a.pdf: no such file");
    }

    #[test]
    fn json_error_is_wrapped() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConvertError = source.into();
        assert!(matches!(err, ConvertError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
