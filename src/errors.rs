use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrunerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("GitHub CLI operation failed: {0}")]
    GitHubCli(String),

    #[error("GitHub CLI not found")]
    GitHubCliNotFound,

    #[error("Could not read data for branch '{branch}': {message}")]
    BranchData { branch: String, message: String },

    #[error("Tracked issue operation failed: {0}")]
    TrackedIssue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrunerError {
    /// Wrap any failure that happened while touching the summary issue
    pub fn tracked_issue(err: PrunerError) -> Self {
        match err {
            PrunerError::TrackedIssue(_) => err,
            other => PrunerError::TrackedIssue(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrunerError>;
