use crate::errors::{PrunerError, Result};
use chrono::{DateTime, Days, Utc};

/// A branch as seen on the host for this run
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSnapshot {
    pub name: String,
    pub is_protected: bool,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub commit_author_login: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub is_merged: bool,
}

/// One row of the summary document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    pub name: String,
    pub last_commit_date: String,
    pub creator_login: Option<String>,
    pub is_merged: bool,
    pub pr_number: Option<u64>,
}

impl BranchRecord {
    pub fn new(
        snapshot: &BranchSnapshot,
        last_commit_date: DateTime<Utc>,
        pull_request: Option<PullRequestRef>,
    ) -> Self {
        Self {
            name: snapshot.name.clone(),
            last_commit_date: format_date(&last_commit_date),
            creator_login: snapshot.commit_author_login.clone(),
            is_merged: pull_request.is_some_and(|pr| pr.is_merged),
            pr_number: pull_request.map(|pr| pr.number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BaseBranch,
    Protected,
    MissingCommitDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Inactive(DateTime<Utc>),
    Active,
    Skipped(SkipReason),
}

/// `now` minus the inactivity window, in calendar days
pub fn threshold_date(inactive_days: i64, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = crate::config::validate_inactive_days(inactive_days)?;
    now.checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            PrunerError::Config(format!(
                "inactive days {} reaches before the earliest representable date",
                days
            ))
        })
}

/// Whole days between the last commit and `now`
pub fn days_inactive(last_commit_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last_commit_date).num_days()
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reasons that can be decided from the branch listing alone, before any commit lookup
pub fn exclusion(name: &str, is_protected: bool, base_branch: &str) -> Option<SkipReason> {
    if name == base_branch {
        Some(SkipReason::BaseBranch)
    } else if is_protected {
        Some(SkipReason::Protected)
    } else {
        None
    }
}

pub fn classify(
    snapshot: &BranchSnapshot,
    base_branch: &str,
    threshold: DateTime<Utc>,
) -> Classification {
    if let Some(reason) = exclusion(&snapshot.name, snapshot.is_protected, base_branch) {
        return Classification::Skipped(reason);
    }

    let Some(last_commit_date) = snapshot.last_commit_date else {
        return Classification::Skipped(SkipReason::MissingCommitDate);
    };

    if last_commit_date < threshold {
        Classification::Inactive(last_commit_date)
    } else {
        Classification::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()
    }

    fn snapshot(name: &str, protected: bool, last: Option<DateTime<Utc>>) -> BranchSnapshot {
        BranchSnapshot {
            name: name.to_string(),
            is_protected: protected,
            last_commit_date: last,
            commit_author_login: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_threshold_date_subtracts_calendar_days() {
        let threshold = threshold_date(30, now()).unwrap();
        assert_eq!(threshold, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_threshold_date_rejects_non_positive_window() {
        assert!(matches!(threshold_date(0, now()), Err(PrunerError::Config(_))));
        assert!(matches!(threshold_date(-1, now()), Err(PrunerError::Config(_))));
    }

    #[test]
    fn test_threshold_matches_elapsed_days() {
        let window = 10;
        let threshold = threshold_date(window, now()).unwrap();
        let offsets = [
            Duration::days(9),
            Duration::days(10) - Duration::seconds(1),
            Duration::days(10),
            Duration::days(10) + Duration::seconds(1),
            Duration::days(11),
            Duration::days(400),
        ];
        for offset in offsets {
            let last = now() - offset;
            let elapsed = now() - last;
            assert_eq!(
                last < threshold,
                elapsed > Duration::days(window),
                "offset {:?}",
                offset
            );
        }
    }

    #[test]
    fn test_classify_inactive_and_active() {
        let threshold = threshold_date(30, now()).unwrap();
        let old = now() - Duration::days(45);
        let recent = now() - Duration::days(3);

        assert_eq!(
            classify(&snapshot("feature-old", false, Some(old)), "main", threshold),
            Classification::Inactive(old)
        );
        assert_eq!(
            classify(&snapshot("feature-new", false, Some(recent)), "main", threshold),
            Classification::Active
        );
    }

    #[test]
    fn test_classify_protected_is_never_inactive() {
        let threshold = threshold_date(30, now()).unwrap();
        let ancient = now() - Duration::days(5000);
        assert_eq!(
            classify(&snapshot("release", true, Some(ancient)), "main", threshold),
            Classification::Skipped(SkipReason::Protected)
        );
    }

    #[test]
    fn test_classify_base_branch_and_missing_date() {
        let threshold = threshold_date(30, now()).unwrap();
        let ancient = now() - Duration::days(500);
        assert_eq!(
            classify(&snapshot("main", false, Some(ancient)), "main", threshold),
            Classification::Skipped(SkipReason::BaseBranch)
        );
        assert_eq!(
            classify(&snapshot("feature-x", false, None), "main", threshold),
            Classification::Skipped(SkipReason::MissingCommitDate)
        );
    }

    #[test]
    fn test_branch_record_from_snapshot() {
        let last = Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 0).unwrap();
        let snap = snapshot("feature-x", false, Some(last));

        let record = BranchRecord::new(
            &snap,
            last,
            Some(PullRequestRef {
                number: 42,
                is_merged: true,
            }),
        );
        assert_eq!(record.last_commit_date, "2024-01-02");
        assert_eq!(record.creator_login, Some("alice".to_string()));
        assert_eq!(record.pr_number, Some(42));
        assert!(record.is_merged);

        let without_pr = BranchRecord::new(&snap, last, None);
        assert_eq!(without_pr.pr_number, None);
        assert!(!without_pr.is_merged);
    }

    #[test]
    fn test_days_inactive() {
        assert_eq!(days_inactive(now() - Duration::hours(47), now()), 1);
        assert_eq!(days_inactive(now() - Duration::days(31), now()), 31);
    }
}
