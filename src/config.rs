use crate::errors::{PrunerError, Result};
use std::fmt;

pub const DEFAULT_INACTIVE_DAYS: i64 = 30;
pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_TRACKING_LABEL: &str = "Repo Pruner Summary";
pub const DEFAULT_ISSUE_TITLE: &str = "Repo Pruner: Inactive Branches Summary";

/// Environment variables accepted as the GitHub credential, in lookup order
const TOKEN_VARIABLES: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn parse(slug: &str) -> Result<Self> {
        let slug = slug.trim();
        match slug.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PrunerError::Config(format!(
                "repository must look like 'owner/name', got '{}'",
                slug
            ))),
        }
    }

    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub repository: Repository,
    pub inactive_days: u32,
    pub base_branch: String,
    pub tracking_label: String,
    pub issue_title: String,
}

impl Config {
    /// Validate raw options. Nothing here talks to GitHub.
    pub fn new(
        repository: &str,
        inactive_days: i64,
        base_branch: &str,
        tracking_label: &str,
        issue_title: &str,
    ) -> Result<Self> {
        let repository = Repository::parse(repository)?;
        let inactive_days = validate_inactive_days(inactive_days)?;

        if tracking_label.trim().is_empty() {
            return Err(PrunerError::Config(
                "tracking label must not be empty".to_string(),
            ));
        }

        Ok(Self {
            repository,
            inactive_days,
            base_branch: base_branch.trim().to_string(),
            tracking_label: tracking_label.trim().to_string(),
            issue_title: issue_title.trim().to_string(),
        })
    }
}

pub fn validate_inactive_days(days: i64) -> Result<u32> {
    if days <= 0 {
        return Err(PrunerError::Config(format!(
            "inactive days must be a positive integer, got {}",
            days
        )));
    }
    u32::try_from(days)
        .map_err(|_| PrunerError::Config(format!("inactive days is too large: {}", days)))
}

/// `gh` reads the token itself; we only make sure one is there before the first call
pub fn require_credential() -> Result<()> {
    credential_from(|key| std::env::var(key).ok())
}

fn credential_from<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let found = TOKEN_VARIABLES
        .iter()
        .any(|key| lookup(key).is_some_and(|value| !value.trim().is_empty()));

    if found {
        Ok(())
    } else {
        Err(PrunerError::Config(format!(
            "no GitHub credential found, set {}",
            TOKEN_VARIABLES.join(" or ")
        )))
    }
}
