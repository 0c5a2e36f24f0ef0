pub mod scan;
pub mod show;

use crate::config::{
    require_credential, Config, DEFAULT_BASE_BRANCH, DEFAULT_INACTIVE_DAYS, DEFAULT_ISSUE_TITLE,
    DEFAULT_TRACKING_LABEL,
};
use crate::errors::Result;
use clap::Args;

/// Options shared by every command. Each one can also be set through the
/// environment a GitHub Action step provides.
#[derive(Debug, Args)]
pub struct Options {
    /// Repository to scan, as owner/name
    #[arg(long, global = true, env = "GITHUB_REPOSITORY", default_value = "")]
    pub repo: String,

    /// Days without commits before a branch counts as inactive
    #[arg(
        long,
        global = true,
        env = "INPUT_INACTIVE_DAYS",
        default_value_t = DEFAULT_INACTIVE_DAYS,
        allow_negative_numbers = true
    )]
    pub inactive_days: i64,

    /// Branch that is never reported
    #[arg(long, global = true, env = "INPUT_BASE_BRANCH", default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// Label that identifies the summary issue
    #[arg(long, global = true, env = "INPUT_TRACKING_LABEL", default_value = DEFAULT_TRACKING_LABEL)]
    pub label: String,

    /// Title used when the summary issue is created
    #[arg(long, global = true, default_value = DEFAULT_ISSUE_TITLE)]
    pub title: String,
}

impl Options {
    pub fn into_config(self) -> Result<Config> {
        let config = Config::new(
            &self.repo,
            self.inactive_days,
            &self.base_branch,
            &self.label,
            &self.title,
        )?;
        require_credential()?;
        Ok(config)
    }
}
