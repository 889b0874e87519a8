//! Commit record types

use std::borrow::Borrow;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Display format for normalized commit dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque commit identifier as printed by `git log`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap an identifier, returning `None` if it is empty after trimming
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Extract the id from a `commit <id>` header line
    ///
    /// Returns `None` when the line is not a header or carries no id.
    #[must_use]
    pub fn from_header(line: &str) -> Option<Self> {
        line.strip_prefix("commit").and_then(Self::new)
    }

    /// The identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CommitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lines added or removed for one file, as reported by `--numstat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCount {
    /// A plain line count
    Lines(u64),
    /// Binary file, printed by git as `-`
    Binary,
}

impl LineCount {
    /// Parse a numstat column (`12` or `-`)
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "-" {
            Some(Self::Binary)
        } else {
            raw.parse().ok().map(Self::Lines)
        }
    }
}

impl fmt::Display for LineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines(n) => write!(f, "{n}"),
            Self::Binary => f.write_str("-"),
        }
    }
}

impl Serialize for LineCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Lines(n) => serializer.serialize_u64(*n),
            Self::Binary => serializer.serialize_str("-"),
        }
    }
}

/// One `--numstat` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Lines added
    pub added: LineCount,
    /// Lines removed
    pub removed: LineCount,
    /// Path of the changed file
    pub path: String,
}

/// Branch attribution parsed from `git name-rev` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRef {
    /// Branch name with any remote-tracking prefix removed
    pub branch: String,
    /// Depth below the branch tip (0 = tip)
    pub offset: u32,
}

impl BranchRef {
    /// Parse a name-rev response such as `abc123 remotes/origin/main~2`
    ///
    /// The commit id and the `remotes/<remote>/` (or `<remote>/`) prefix are
    /// stripped. Anything after the first `~` is the offset; only its leading
    /// digits count and a missing or unparsable offset is 0. Returns `None`
    /// when no usable name remains (empty output or git's `undefined`).
    #[must_use]
    pub fn parse(response: &str, id: &CommitId, remote: &str) -> Option<Self> {
        let mut name = response.trim();
        if let Some(rest) = name.strip_prefix(id.as_str()) {
            name = rest.trim_start();
        }
        let tracking = format!("remotes/{remote}/");
        let short = format!("{remote}/");
        if let Some(rest) = name
            .strip_prefix(tracking.as_str())
            .or_else(|| name.strip_prefix(short.as_str()))
        {
            name = rest;
        }

        let (branch, offset) = match name.split_once('~') {
            Some((branch, depth)) => (branch.trim(), leading_number(depth.trim())),
            None => (name.trim(), 0),
        };

        if branch.is_empty() || branch == "undefined" {
            return None;
        }

        Some(Self {
            branch: branch.to_string(),
            offset,
        })
    }
}

fn leading_number(raw: &str) -> u32 {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().unwrap_or(0)
}

/// A commit parsed from one raw `git log` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Commit identifier
    pub id: CommitId,
    /// Branch the commit was introduced on, if name resolution found one
    pub branch: Option<String>,
    /// Depth below the tip of `branch`
    pub branch_offset: u32,
    /// Author line (`Name <email>`)
    pub author: Option<String>,
    /// Commit date normalized to UTC
    pub timestamp: Option<NaiveDateTime>,
    /// Parents listed on a `Merge:` line, with a leading space
    pub merge_parents: Option<String>,
    /// Description lines, trimmed and concatenated
    pub description: String,
    /// Numstat file changes in log order
    pub files: Vec<FileChange>,
    /// Lines that matched no known pattern
    pub info: Vec<String>,
}

impl CommitRecord {
    /// An empty record for `id`
    #[must_use]
    pub fn new(id: CommitId) -> Self {
        Self {
            id,
            branch: None,
            branch_offset: 0,
            author: None,
            timestamp: None,
            merge_parents: None,
            description: String::new(),
            files: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Attach a resolved branch
    pub fn set_branch(&mut self, branch_ref: Option<BranchRef>) {
        match branch_ref {
            Some(BranchRef { branch, offset }) => {
                self.branch = Some(branch);
                self.branch_offset = offset;
            }
            None => {
                self.branch = None;
                self.branch_offset = 0;
            }
        }
    }

    /// The normalized date as `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn date_string(&self) -> Option<String> {
        self.timestamp.map(|ts| ts.format(DATE_FORMAT).to_string())
    }

    /// Check whether this record lists merge parents
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.merge_parents.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn id(raw: &str) -> CommitId {
        CommitId::new(raw).expect("non-empty id")
    }

    #[test]
    fn test_commit_id_trims() {
        assert_eq!(id("  abc123 ").as_str(), "abc123");
    }

    #[test]
    fn test_commit_id_rejects_blank() {
        assert!(CommitId::new("").is_none());
        assert!(CommitId::new("   \t").is_none());
    }

    #[test]
    fn test_commit_id_from_header() {
        assert_eq!(CommitId::from_header("commit abc123"), Some(id("abc123")));
        assert_eq!(CommitId::from_header("commit"), None);
        assert_eq!(CommitId::from_header("commit   "), None);
        assert_eq!(CommitId::from_header("Author: x"), None);
        assert_eq!(CommitId::from_header(" commit abc"), None);
    }

    #[test]
    fn test_commit_id_serializes_as_string() {
        let json = serde_json::to_string(&id("abc123")).expect("serialize");
        assert_eq!(json.as_str(), "\"abc123\"");
    }

    #[test]
    fn test_line_count_parse() {
        assert_eq!(LineCount::parse("12"), Some(LineCount::Lines(12)));
        assert_eq!(LineCount::parse("0"), Some(LineCount::Lines(0)));
        assert_eq!(LineCount::parse("-"), Some(LineCount::Binary));
        assert_eq!(LineCount::parse("x"), None);
        assert_eq!(LineCount::parse(""), None);
    }

    #[test]
    fn test_line_count_json() {
        let change = FileChange {
            added: LineCount::Binary,
            removed: LineCount::Lines(4),
            path: "img.png".to_string(),
        };
        let json = serde_json::to_string(&change).expect("serialize");
        assert_eq!(json.as_str(), r#"{"added":"-","removed":4,"path":"img.png"}"#);
    }

    #[test]
    fn test_branch_ref_with_offset() {
        let parsed = BranchRef::parse("abc123 main~2", &id("abc123"), "origin");
        assert_eq!(
            parsed,
            Some(BranchRef {
                branch: "main".to_string(),
                offset: 2
            })
        );
    }

    #[test]
    fn test_branch_ref_tip() {
        let parsed = BranchRef::parse("abc123 develop\n", &id("abc123"), "origin");
        assert_eq!(
            parsed,
            Some(BranchRef {
                branch: "develop".to_string(),
                offset: 0
            })
        );
    }

    #[test]
    fn test_branch_ref_strips_remote_prefix() {
        let parsed = BranchRef::parse(
            "abc123 remotes/origin/feature/login~14",
            &id("abc123"),
            "origin",
        );
        assert_eq!(
            parsed,
            Some(BranchRef {
                branch: "feature/login".to_string(),
                offset: 14
            })
        );
    }

    #[test]
    fn test_branch_ref_strips_short_remote_prefix() {
        let parsed =
            BranchRef::parse("abc123 origin/main~1", &id("abc123"), "origin").expect("resolved");
        assert_eq!(parsed.branch.as_str(), "main");
        assert_eq!(parsed.offset, 1);
    }

    #[test]
    fn test_branch_ref_keeps_other_remote_prefix() {
        let parsed = BranchRef::parse("abc123 remotes/upstream/main", &id("abc123"), "origin")
            .expect("resolved");
        assert_eq!(parsed.branch.as_str(), "remotes/upstream/main");
    }

    #[test]
    fn test_branch_ref_offset_leading_digits() {
        let parsed = BranchRef::parse("abc123 main~3^2~1", &id("abc123"), "origin")
            .expect("resolved");
        assert_eq!(parsed.branch.as_str(), "main");
        assert_eq!(parsed.offset, 3);
    }

    #[test]
    fn test_branch_ref_unparsable_offset_defaults_to_zero() {
        let parsed =
            BranchRef::parse("abc123 main~x", &id("abc123"), "origin").expect("resolved");
        assert_eq!(parsed.offset, 0);
        let parsed = BranchRef::parse("abc123 main~", &id("abc123"), "origin").expect("resolved");
        assert_eq!(parsed.offset, 0);
    }

    #[test]
    fn test_branch_ref_absent() {
        assert_eq!(BranchRef::parse("", &id("abc123"), "origin"), None);
        assert_eq!(BranchRef::parse("abc123", &id("abc123"), "origin"), None);
        assert_eq!(BranchRef::parse("abc123 undefined", &id("abc123"), "origin"), None);
        assert_eq!(BranchRef::parse("abc123 ~4", &id("abc123"), "origin"), None);
    }

    #[test]
    fn test_branch_ref_without_id_echo() {
        let parsed = BranchRef::parse("main~5", &id("abc123"), "origin").expect("resolved");
        assert_eq!(parsed.branch.as_str(), "main");
        assert_eq!(parsed.offset, 5);
    }

    #[test]
    fn test_set_branch_clears_on_none() {
        let mut record = CommitRecord::new(id("abc"));
        record.set_branch(Some(BranchRef {
            branch: "main".to_string(),
            offset: 7,
        }));
        assert_eq!(record.branch.as_deref(), Some("main"));
        assert_eq!(record.branch_offset, 7);

        record.set_branch(None);
        assert_eq!(record.branch, None);
        assert_eq!(record.branch_offset, 0);
    }

    #[test]
    fn test_date_string_format() {
        let mut record = CommitRecord::new(id("abc"));
        assert_eq!(record.date_string(), None);
        record.timestamp = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0));
        assert_eq!(record.date_string().as_deref(), Some("2024-01-01 10:00:00"));
    }
}
