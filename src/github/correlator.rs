use crate::core::PullRequestRef;
use crate::github::GitHubCli;

/// Find the open pull request for `branch`, if any.
///
/// Lookup failures never abort the scan. A failed list means no pull request, a failed
/// detail fetch keeps the number and reports the branch as unmerged.
pub fn find_pull_request<T: GitHubCli>(
    github_cli: &T,
    owner: &str,
    branch: &str,
) -> Option<PullRequestRef> {
    let head = format!("{}:{}", owner, branch);

    let pull_requests = match github_cli.list_open_pull_requests(&head) {
        Ok(pull_requests) => pull_requests,
        Err(e) => {
            log::warn!("⚠️  Could not list pull requests for {}: {}", branch, e);
            return None;
        }
    };

    if pull_requests.len() > 1 {
        log::debug!(
            "{} open pull requests for {}, using #{}",
            pull_requests.len(),
            branch,
            pull_requests[0].number
        );
    }
    let number = pull_requests.first()?.number;

    let is_merged = match github_cli.get_pull_request(number) {
        Ok(details) => {
            log::debug!("PR #{} for {} merged: {}", details.number, branch, details.merged);
            details.merged
        }
        Err(e) => {
            log::warn!(
                "⚠️  Could not read merge status of PR #{} for {}: {}",
                number,
                branch,
                e
            );
            false
        }
    };

    Some(PullRequestRef { number, is_merged })
}
