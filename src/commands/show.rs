use crate::{
    config::Config,
    errors::Result,
    github::{types::TrackedIssue, GitHubCliImpl, PrunerIntegration},
    parser::decisions_from_string,
};
use clap::Args;

/// Print the decisions recorded in the current summary issue
#[derive(Debug, Args)]
pub struct Show {}

impl Show {
    pub fn execute(&self, config: Config) -> Result<()> {
        let github_cli = GitHubCliImpl::new(config.repository.clone());
        let integration = PrunerIntegration::new(github_cli, config);
        integration.ensure_available()?;

        let issue = integration.find_tracked_issue()?;
        for line in describe(issue.as_ref(), &integration.config.tracking_label) {
            println!("{}", line);
        }
        Ok(())
    }
}

/// One line per branch, in the order the issue lists them
pub fn describe(issue: Option<&TrackedIssue>, tracking_label: &str) -> Vec<String> {
    let Some(issue) = issue else {
        return vec![format!("No open issue carries the label '{}'", tracking_label)];
    };

    let decisions = decisions_from_string(issue.body());
    if decisions.is_empty() {
        return vec![format!("Issue #{} lists no branches", issue.number)];
    }

    let mut lines = vec![format!("Issue #{} ({}):", issue.number, issue.state)];
    lines.extend(
        decisions
            .iter()
            .map(|(branch, decision)| format!("{}: {}", branch, decision)),
    );
    lines
}
