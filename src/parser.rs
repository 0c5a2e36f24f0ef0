// Summary issue body: rendering and reading back the keep/delete decisions

use crate::{config::Repository, core::BranchRecord};
use regex::Regex;
use std::fmt;

const HEADER: &str = r#"### Inactive Branches

This is a list of branches that have been inactive beyond the configured threshold. If you created one of these branches, please review it and delete it if it is no longer needed. Then come back to this issue and check either "Keep" or "Delete" for the branch so the team knows what you decided.

This issue is regenerated on every run. Only the Keep/Delete checkboxes are carried over."#;

const EMPTY_NOTICE: &str = "_No inactive branches were found._";
const SEPARATOR: &str = "---";
const BRANCH_PREFIX: &str = "#### Branch: ";
const QUESTION: &str = "**Did you keep or delete this branch?**";
const KEEP_LABEL: &str = "Keep";
const DELETE_LABEL: &str = "Delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    #[default]
    Undecided,
    Keep,
    Delete,
}

impl Decision {
    pub fn from_marks(keep: bool, delete: bool) -> Self {
        match (keep, delete) {
            (true, false) => Decision::Keep,
            (false, true) => Decision::Delete,
            // Neither, or both checked by hand
            _ => Decision::Undecided,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Decision::Undecided => "undecided",
            Decision::Keep => "keep",
            Decision::Delete => "delete",
        };
        f.write_str(text)
    }
}

/// Decisions keyed by branch name, in the order the branches were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decisions {
    entries: Vec<(String, Decision)>,
}

impl Decisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown branches are undecided
    pub fn get(&self, branch: &str) -> Decision {
        self.entries
            .iter()
            .find(|(name, _)| name == branch)
            .map(|(_, decision)| *decision)
            .unwrap_or_default()
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == branch)
    }

    /// Replaces an existing entry in place, otherwise appends
    pub fn set(&mut self, branch: &str, decision: Decision) {
        match self.entries.iter_mut().find(|(name, _)| name == branch) {
            Some(entry) => entry.1 = decision,
            None => self.entries.push((branch.to_string(), decision)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decision)> {
        self.entries
            .iter()
            .map(|(name, decision)| (name.as_str(), *decision))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, decision: Decision) -> usize {
        self.entries.iter().filter(|(_, d)| *d == decision).count()
    }

    /// Decisions for `records` only, in record order. Branches missing from `self` become undecided.
    pub fn carried_over(&self, records: &[BranchRecord]) -> Decisions {
        let mut carried = Decisions::new();
        for record in records {
            carried.set(&record.name, self.get(&record.name));
        }
        carried
    }
}

fn checkbox(checked: bool, label: &str) -> String {
    format!("- [{}] **{}**", if checked { "x" } else { " " }, label)
}

/// `#` would start a fragment and `%` an escape, other ref characters are safe in a path
fn encode_link_path(name: &str) -> String {
    name.replace('%', "%25").replace('#', "%23")
}

fn branch_block(repository: &Repository, record: &BranchRecord, decision: Decision) -> String {
    let creator = match &record.creator_login {
        Some(login) => format!("@{}", login),
        None => "unknown".to_string(),
    };
    let status = if record.is_merged { "Merged" } else { "Unmerged" };
    let pull_request = match record.pr_number {
        Some(number) => format!("[PR #{}]({}/pull/{})", number, repository.url(), number),
        None => "None".to_string(),
    };

    // Two trailing spaces keep the fields on separate lines in rendered markdown
    let lines = [
        format!("{}{}", BRANCH_PREFIX, record.name),
        format!("_Last Commit Date:_ {}  ", record.last_commit_date),
        format!("_Creator:_ {}  ", creator),
        format!("_Status:_ {}  ", status),
        format!("_Pull Request:_ {}  ", pull_request),
        format!(
            "_Browse:_ [branch]({}/tree/{})",
            repository.url(),
            encode_link_path(&record.name)
        ),
        String::new(),
        QUESTION.to_string(),
        checkbox(decision == Decision::Keep, KEEP_LABEL),
        checkbox(decision == Decision::Delete, DELETE_LABEL),
    ];
    lines.join("\n")
}

/// Render the canonical summary document. The output only depends on the arguments.
pub fn records_to_string(
    repository: &Repository,
    records: &[BranchRecord],
    decisions: &Decisions,
) -> String {
    let mut output = format!("{}\n\n{}\n", HEADER, SEPARATOR);

    if records.is_empty() {
        output = format!("{}\n{}\n", output, EMPTY_NOTICE);
        return output;
    }

    for record in records {
        let block = branch_block(repository, record, decisions.get(&record.name));
        output = format!("{}\n{}\n\n{}\n", output, block, SEPARATOR);
    }
    output
}

/// Read the decisions back out of a summary document.
///
/// Lines that are not a branch heading or a Keep/Delete checkbox are ignored, so
/// hand edits elsewhere in the body are harmless. The first block for a branch wins.
pub fn decisions_from_string(input: &str) -> Decisions {
    let Some((heading_re, other_heading_re, checkbox_re)) = decision_patterns() else {
        return Decisions::new();
    };

    let mut decisions = Decisions::new();
    let mut current: Option<(String, bool, bool)> = None;

    for line in input.lines().map(|line| line.trim()) {
        if let Some(caps) = heading_re.captures(line) {
            finish(current.take(), &mut decisions);
            if let Some(name) = caps.name("name") {
                current = Some((name.as_str().to_string(), false, false));
            }
            continue;
        }

        if other_heading_re.is_match(line) {
            // Any other heading closes the block, `#42` style references do not
            finish(current.take(), &mut decisions);
            continue;
        }

        let Some((_, keep, delete)) = current.as_mut() else {
            continue;
        };
        if let Some(caps) = checkbox_re.captures(line) {
            let checked = caps
                .name("mark")
                .is_some_and(|mark| mark.as_str().eq_ignore_ascii_case("x"));
            match caps.name("label").map(|label| label.as_str()) {
                Some(KEEP_LABEL) => *keep |= checked,
                Some(DELETE_LABEL) => *delete |= checked,
                _ => {}
            }
        }
    }
    finish(current.take(), &mut decisions);

    decisions
}

fn finish(block: Option<(String, bool, bool)>, decisions: &mut Decisions) {
    if let Some((name, keep, delete)) = block {
        if !decisions.contains(&name) {
            decisions.set(&name, Decision::from_marks(keep, delete));
        }
    }
}

/// Patterns for branch headings, other headings and checkboxes.
///
/// The branch heading is built from `BRANCH_PREFIX` with any run of whitespace
/// accepted between its words. Text after the branch name is allowed.
fn decision_patterns() -> Option<(Regex, Regex, Regex)> {
    let prefix = BRANCH_PREFIX
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let heading_re = Regex::new(&format!(r"^{}\s+(?P<name>\S+)(?:\s.*)?$", prefix)).ok()?;
    let other_heading_re = Regex::new(r"^#{1,6}(?:\s|$)").ok()?;
    let checkbox_re =
        Regex::new(r"^[-*]\s+\[(?P<mark>[ xX])\]\s+\*\*(?P<label>Keep|Delete)\*\*").ok()?;
    Some((heading_re, other_heading_re, checkbox_re))
}
