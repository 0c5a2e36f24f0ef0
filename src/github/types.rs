use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
    pub commit: BranchHead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchHead {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/commits/{ref}`, only the fields we read
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommitDetails {
    #[serde(default)]
    pub commit: GitCommit,
    /// The GitHub account linked to the commit author, if any
    #[serde(default)]
    pub author: Option<Account>,
}

impl CommitDetails {
    pub fn author_date(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|author| author.date)
    }

    pub fn author_login(&self) -> Option<String> {
        self.author.as_ref().map(|account| account.login.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GitCommit {
    #[serde(default)]
    pub author: Option<GitSignature>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GitSignature {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    pub number: u64,
    #[serde(default)]
    pub merged: bool,
}

/// The one open issue that carries the tracking label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedIssue {
    pub number: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Present when the issues endpoint hands back a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl TrackedIssue {
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}
