use crate::config::Config;
use crate::core::{
    classify, days_inactive, exclusion, threshold_date, BranchRecord, BranchSnapshot,
    Classification, SkipReason,
};
use crate::errors::{PrunerError, Result};
use crate::github::correlator::find_pull_request;
use crate::github::types::{Branch, TrackedIssue};
use crate::github::GitHubCli;
use crate::parser::{decisions_from_string, records_to_string, Decision, Decisions};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report, any tracked issue was left alone
    NoInactiveBranches,
    Created(u64),
    Updated(u64),
    /// The regenerated body matched the existing one
    Unchanged(u64),
    DryRun(String),
}

pub struct PrunerIntegration<T: GitHubCli> {
    pub github_cli: T,
    pub config: Config,
}

impl<T: GitHubCli> PrunerIntegration<T> {
    pub fn new(github_cli: T, config: Config) -> Self {
        Self { github_cli, config }
    }

    pub fn ensure_available(&self) -> Result<()> {
        if self.github_cli.is_available()? {
            Ok(())
        } else {
            log::error!("Install gh CLI to talk to GitHub: https://cli.github.com/");
            Err(PrunerError::GitHubCliNotFound)
        }
    }

    /// The open issue carrying the tracking label. Always re-queried, never cached.
    pub fn find_tracked_issue(&self) -> Result<Option<TrackedIssue>> {
        let issues = self
            .github_cli
            .find_open_issues_by_label(&self.config.tracking_label)
            .map_err(PrunerError::tracked_issue)?;

        if issues.len() > 1 {
            let numbers: Vec<String> = issues
                .iter()
                .map(|issue| format!("#{}", issue.number))
                .collect();
            log::warn!(
                "⚠️  {} open issues carry the label '{}' ({}). Only #{} will be updated.",
                issues.len(),
                self.config.tracking_label,
                numbers.join(", "),
                issues[0].number
            );
        }

        Ok(issues.into_iter().next())
    }

    fn snapshot(&self, branch: &Branch) -> Result<BranchSnapshot> {
        let details = self
            .github_cli
            .get_commit(&branch.commit.sha)
            .map_err(|e| PrunerError::BranchData {
                branch: branch.name.clone(),
                message: e.to_string(),
            })?;

        Ok(BranchSnapshot {
            name: branch.name.clone(),
            is_protected: branch.protected,
            last_commit_date: details.author_date(),
            commit_author_login: details.author_login(),
        })
    }

    /// Inactive branches in the order the host lists them. Per-branch failures only drop or degrade that branch.
    pub fn collect_inactive_branches(
        &self,
        threshold: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<BranchRecord>> {
        let branches = self.github_cli.list_branches()?;
        let mut records = Vec::new();

        for branch in &branches {
            match exclusion(&branch.name, branch.protected, &self.config.base_branch) {
                Some(SkipReason::BaseBranch) => {
                    log::info!("Skipping base branch: {}", branch.name);
                    continue;
                }
                Some(_) => {
                    log::info!("Skipping protected branch: {}", branch.name);
                    continue;
                }
                None => {}
            }

            let snapshot = match self.snapshot(branch) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("⚠️  {}", e);
                    continue;
                }
            };

            match classify(&snapshot, &self.config.base_branch, threshold) {
                Classification::Inactive(last_commit_date) => {
                    log::info!(
                        "🕸️  {} is inactive ({} days)",
                        branch.name,
                        days_inactive(last_commit_date, now)
                    );
                    let pull_request = find_pull_request(
                        &self.github_cli,
                        &self.config.repository.owner,
                        &branch.name,
                    );
                    records.push(BranchRecord::new(&snapshot, last_commit_date, pull_request));
                }
                Classification::Active => {
                    log::debug!("{} is active", branch.name);
                }
                Classification::Skipped(SkipReason::MissingCommitDate) => {
                    log::warn!(
                        "⚠️  Branch {} is missing the last commit date, skipping",
                        branch.name
                    );
                }
                Classification::Skipped(reason) => {
                    log::debug!("Skipping {}: {:?}", branch.name, reason);
                }
            }
        }

        Ok(records)
    }

    /// One full pass: read the tracked issue, scan branches, then write the regenerated summary.
    pub fn reconcile(&self, now: DateTime<Utc>, dry_run: bool) -> Result<Outcome> {
        let threshold = threshold_date(i64::from(self.config.inactive_days), now)?;
        self.ensure_available()?;

        log::info!(
            "🔍 Scanning {} for branches without commits since {}",
            self.config.repository,
            crate::core::format_date(&threshold)
        );

        let tracked_issue = self.find_tracked_issue()?;
        let prior = match &tracked_issue {
            Some(issue) => {
                let decisions = decisions_from_string(issue.body());
                log::info!(
                    "Found existing summary issue #{} with {} recorded branches",
                    issue.number,
                    decisions.len()
                );
                decisions
            }
            None => Decisions::new(),
        };

        let records = self.collect_inactive_branches(threshold, now)?;
        if records.is_empty() {
            log::info!("✅ No inactive branches found, nothing to report");
            return Ok(Outcome::NoInactiveBranches);
        }

        let decisions = prior.carried_over(&records);
        for (name, decision) in prior.iter() {
            if decision != Decision::Undecided && !decisions.contains(name) {
                log::info!("Dropping '{}' decision for {}, no longer inactive", decision, name);
            }
        }
        log::info!(
            "📋 {} inactive branches: {} keep, {} delete, {} undecided",
            records.len(),
            decisions.count(Decision::Keep),
            decisions.count(Decision::Delete),
            decisions.count(Decision::Undecided)
        );

        let body = records_to_string(&self.config.repository, &records, &decisions);

        if dry_run {
            return Ok(Outcome::DryRun(body));
        }

        match tracked_issue {
            Some(issue) if issue.body() == body => {
                log::info!("Summary issue #{} is up to date", issue.number);
                Ok(Outcome::Unchanged(issue.number))
            }
            Some(issue) => {
                self.github_cli
                    .update_issue(issue.number, &body)
                    .map_err(PrunerError::tracked_issue)?;
                log::info!("✅ Updated existing summary issue #{}", issue.number);
                Ok(Outcome::Updated(issue.number))
            }
            None => {
                let number = self
                    .github_cli
                    .create_issue(
                        &self.config.issue_title,
                        &body,
                        &[self.config.tracking_label.as_str()],
                    )
                    .map_err(PrunerError::tracked_issue)?;
                log::info!("✅ Created summary issue #{}", number);
                Ok(Outcome::Created(number))
            }
        }
    }
}
