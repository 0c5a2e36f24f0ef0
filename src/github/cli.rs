use crate::config::Repository;
use crate::errors::{PrunerError, Result};
use crate::github::types::{
    Branch, CommitDetails, PullRequestDetails, PullRequestSummary, TrackedIssue,
};
use serde::de::DeserializeOwned;
use std::process::Command;

/// Everything the pruner needs from the hosting API, scoped to one repository
pub trait GitHubCli {
    fn is_available(&self) -> Result<bool>;
    fn list_branches(&self) -> Result<Vec<Branch>>;
    fn get_commit(&self, sha: &str) -> Result<CommitDetails>;
    /// `head` is `owner:branch`
    fn list_open_pull_requests(&self, head: &str) -> Result<Vec<PullRequestSummary>>;
    fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails>;
    fn find_open_issues_by_label(&self, label: &str) -> Result<Vec<TrackedIssue>>;
    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> Result<u64>;
    fn update_issue(&self, number: u64, body: &str) -> Result<()>;
}

pub struct GitHubCliImpl {
    repository: Repository,
}

impl GitHubCliImpl {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn run_command(&self, args: &[&str]) -> Result<std::process::Output> {
        log::debug!("gh {}", args.join(" "));

        let output = Command::new("gh")
            .args(args)
            .output()
            .map_err(|e| PrunerError::GitHubCli(format!("Failed to execute gh command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrunerError::GitHubCli(stderr.trim().to_string()));
        }

        Ok(output)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "repos/{}/{}/{}",
            self.repository.owner, self.repository.name, path
        )
    }

    fn api_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let endpoint = self.endpoint(path);
        let output = self.run_command(&["api", &endpoint])?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// GET a list endpoint, following every page. Query fields go through `-f` so gh encodes them.
    fn api_list<T: DeserializeOwned>(&self, path: &str, fields: &[(&str, &str)]) -> Result<Vec<T>> {
        let endpoint = self.endpoint(path);
        let fields: Vec<String> = std::iter::once(("per_page", "100"))
            .chain(fields.iter().copied())
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        let mut args = vec!["api", "--paginate", "-X", "GET", endpoint.as_str()];
        for field in &fields {
            args.push("-f");
            args.push(field.as_str());
        }

        let output = self.run_command(&args)?;
        parse_pages(&output.stdout)
    }

    fn api_write(&self, method: &str, path: &str, fields: &[String]) -> Result<Vec<u8>> {
        let endpoint = self.endpoint(path);
        let mut args = vec!["api", "-X", method, endpoint.as_str()];
        for field in fields {
            args.push("-f");
            args.push(field.as_str());
        }

        Ok(self.run_command(&args)?.stdout)
    }
}

/// `gh api --paginate` prints one JSON array per page, back to back
pub fn parse_pages<T: DeserializeOwned>(stdout: &[u8]) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_slice(stdout).into_iter::<Vec<T>>() {
        items.extend(page?);
    }
    Ok(items)
}

impl GitHubCli for GitHubCliImpl {
    fn is_available(&self) -> Result<bool> {
        match Command::new("gh").arg("--version").output() {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }

    fn list_branches(&self) -> Result<Vec<Branch>> {
        log::debug!("Listing branches of {}", self.repository);
        self.api_list("branches", &[])
    }

    fn get_commit(&self, sha: &str) -> Result<CommitDetails> {
        self.api_get(&format!("commits/{}", sha))
    }

    fn list_open_pull_requests(&self, head: &str) -> Result<Vec<PullRequestSummary>> {
        self.api_list("pulls", &[("state", "open"), ("head", head)])
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        self.api_get(&format!("pulls/{}", number))
    }

    fn find_open_issues_by_label(&self, label: &str) -> Result<Vec<TrackedIssue>> {
        let issues: Vec<TrackedIssue> =
            self.api_list("issues", &[("state", "open"), ("labels", label)])?;

        // The issues endpoint lists pull requests too
        Ok(issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .collect())
    }

    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> Result<u64> {
        log::info!("Creating issue \"{}\" in {}", title, self.repository);

        let mut fields = vec![format!("title={}", title), format!("body={}", body)];
        fields.extend(labels.iter().map(|label| format!("labels[]={}", label)));

        let stdout = self.api_write("POST", "issues", &fields)?;
        let created: TrackedIssue = serde_json::from_slice(&stdout)?;
        Ok(created.number)
    }

    fn update_issue(&self, number: u64, body: &str) -> Result<()> {
        log::info!("Updating issue #{} in {}", number, self.repository);

        self.api_write(
            "PATCH",
            &format!("issues/{}", number),
            &[format!("body={}", body)],
        )?;
        Ok(())
    }
}

#[cfg(test)]
pub use mock::MockGitHubCli;

#[cfg(test)]
mod mock {
    use super::GitHubCli;
    use crate::errors::{PrunerError, Result};
    use crate::github::types::{
        Account, Branch, BranchHead, CommitDetails, GitCommit, GitSignature, PullRequestDetails,
        PullRequestSummary, TrackedIssue,
    };
    use chrono::{DateTime, Utc};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    pub struct MockGitHubCli {
        pub available: bool,
        pub branches: Vec<Branch>,
        pub commits: HashMap<String, CommitDetails>,
        pub open_prs: HashMap<String, Vec<u64>>,
        pub merged_prs: HashSet<u64>,
        pub failing_pr_lists: HashSet<String>,
        pub failing_pr_details: HashSet<u64>,
        pub issues: Vec<TrackedIssue>,
        pub fail_branch_listing: bool,
        pub fail_issue_listing: bool,
        pub fail_issue_writes: bool,
        pub commit_lookups: Mutex<Vec<String>>,
        pub created_issues: Mutex<Vec<(String, String, Vec<String>)>>,
        pub updated_issues: Mutex<Vec<(u64, String)>>,
    }

    impl MockGitHubCli {
        pub fn new() -> Self {
            Self {
                available: true,
                branches: Vec::new(),
                commits: HashMap::new(),
                open_prs: HashMap::new(),
                merged_prs: HashSet::new(),
                failing_pr_lists: HashSet::new(),
                failing_pr_details: HashSet::new(),
                issues: Vec::new(),
                fail_branch_listing: false,
                fail_issue_listing: false,
                fail_issue_writes: false,
                commit_lookups: Mutex::new(Vec::new()),
                created_issues: Mutex::new(Vec::new()),
                updated_issues: Mutex::new(Vec::new()),
            }
        }

        fn sha_of(name: &str) -> String {
            format!("sha-{}", name)
        }

        /// A branch whose head commit has the given author date and login
        pub fn with_branch(
            mut self,
            name: &str,
            protected: bool,
            date: Option<DateTime<Utc>>,
            login: Option<&str>,
        ) -> Self {
            let sha = Self::sha_of(name);
            self.commits.insert(
                sha.clone(),
                CommitDetails {
                    commit: GitCommit {
                        author: Some(GitSignature { date }),
                    },
                    author: login.map(|login| Account {
                        login: login.to_string(),
                    }),
                },
            );
            self.branches.push(Branch {
                name: name.to_string(),
                protected,
                commit: BranchHead { sha },
            });
            self
        }

        /// A branch whose commit lookup fails
        pub fn with_broken_branch(mut self, name: &str) -> Self {
            self.branches.push(Branch {
                name: name.to_string(),
                protected: false,
                commit: BranchHead {
                    sha: Self::sha_of(name),
                },
            });
            self
        }

        pub fn with_open_pr(mut self, head: &str, number: u64, merged: bool) -> Self {
            self.open_prs.entry(head.to_string()).or_default().push(number);
            if merged {
                self.merged_prs.insert(number);
            }
            self
        }

        pub fn with_failing_pr_list(mut self, head: &str) -> Self {
            self.failing_pr_lists.insert(head.to_string());
            self
        }

        pub fn with_failing_pr_details(mut self, number: u64) -> Self {
            self.failing_pr_details.insert(number);
            self
        }

        pub fn with_issue(mut self, number: u64, body: &str) -> Self {
            self.issues.push(TrackedIssue {
                number,
                body: Some(body.to_string()),
                state: "open".to_string(),
                pull_request: None,
            });
            self
        }

        pub fn set_available(mut self, available: bool) -> Self {
            self.available = available;
            self
        }

        pub fn get_commit_lookups(&self) -> Vec<String> {
            self.commit_lookups.lock().unwrap().clone()
        }

        pub fn get_created_issues(&self) -> Vec<(String, String, Vec<String>)> {
            self.created_issues.lock().unwrap().clone()
        }

        pub fn get_updated_issues(&self) -> Vec<(u64, String)> {
            self.updated_issues.lock().unwrap().clone()
        }
    }

    impl GitHubCli for MockGitHubCli {
        fn is_available(&self) -> Result<bool> {
            Ok(self.available)
        }

        fn list_branches(&self) -> Result<Vec<Branch>> {
            if self.fail_branch_listing {
                return Err(PrunerError::GitHubCli("HTTP 502: Bad Gateway".to_string()));
            }
            Ok(self.branches.clone())
        }

        fn get_commit(&self, sha: &str) -> Result<CommitDetails> {
            self.commit_lookups.lock().unwrap().push(sha.to_string());
            self.commits
                .get(sha)
                .cloned()
                .ok_or_else(|| PrunerError::GitHubCli(format!("No commit found for SHA: {}", sha)))
        }

        fn list_open_pull_requests(&self, head: &str) -> Result<Vec<PullRequestSummary>> {
            if self.failing_pr_lists.contains(head) {
                return Err(PrunerError::GitHubCli("HTTP 500".to_string()));
            }
            Ok(self
                .open_prs
                .get(head)
                .map(|numbers| {
                    numbers
                        .iter()
                        .map(|number| PullRequestSummary { number: *number })
                        .collect()
                })
                .unwrap_or_default())
        }

        fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
            if self.failing_pr_details.contains(&number) {
                return Err(PrunerError::GitHubCli("HTTP 500".to_string()));
            }
            Ok(PullRequestDetails {
                number,
                merged: self.merged_prs.contains(&number),
            })
        }

        fn find_open_issues_by_label(&self, _label: &str) -> Result<Vec<TrackedIssue>> {
            if self.fail_issue_listing {
                return Err(PrunerError::GitHubCli("HTTP 401: Bad credentials".to_string()));
            }
            Ok(self.issues.clone())
        }

        fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> Result<u64> {
            if self.fail_issue_writes {
                return Err(PrunerError::GitHubCli("HTTP 403".to_string()));
            }
            let mut created = self.created_issues.lock().unwrap();
            created.push((
                title.to_string(),
                body.to_string(),
                labels.iter().map(|label| label.to_string()).collect(),
            ));
            Ok(100 + created.len() as u64)
        }

        fn update_issue(&self, number: u64, body: &str) -> Result<()> {
            if self.fail_issue_writes {
                return Err(PrunerError::GitHubCli("HTTP 403".to_string()));
            }
            self.updated_issues
                .lock()
                .unwrap()
                .push((number, body.to_string()));
            Ok(())
        }
    }
}
