//! Data model types for the project catalog.
//!
//! Each struct maps one-to-one onto the columns of its CSV table, in column
//! order. Field order matters: rows are written positionally under the
//! table's header.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator for list-valued fields (keywords, collaborators, genres).
pub const LIST_SEPARATOR: char = ';';

/// Format used for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Status assigned to newly created projects.
pub const STATUS_ACTIVE: &str = "Active";

/// Format a date the way the tables store it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Split a `;`-delimited list field, dropping blank items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Join items into a `;`-delimited list field.
pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(LIST_SEPARATOR);
        }
        out.push_str(item);
    }
    out
}

// ── Project ID ──────────────────────────────────────────────────────────────

/// Sequential project identifier: `P` followed by a zero-padded number.
///
/// Displays with at least three digits (`P001`, `P042`) and grows past
/// three digits once the sequence does (`P1000`). Ordering is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(u32);

impl ProjectId {
    pub const fn new(sequence: u32) -> Self {
        Self(sequence)
    }

    /// The ID assigned when the projects table is empty.
    pub const fn first() -> Self {
        Self(1)
    }

    /// The following ID, or `None` once the sequence is exhausted.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    pub const fn sequence(self) -> u32 {
        self.0
    }
}

/// A string that is not `P` followed by digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid project ID '{0}' (expected P followed by digits, e.g. P001)")]
pub struct InvalidProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:03}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = InvalidProjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidProjectId(s.to_string());
        let digits = s.strip_prefix('P').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse().map(Self).map_err(|_| invalid())
    }
}

// ── Track ───────────────────────────────────────────────────────────────────

/// A licensable recording from the external catalog. Read-only here.
///
/// Numeric-looking columns (`bpm`, `duration`) stay as text: the table is
/// owned by the ingestion process and is not validated on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub track_title: String,
    #[serde(default)]
    pub track_description: String,
    #[serde(default)]
    pub bpm: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub album_title: String,
    #[serde(default)]
    pub library_name: String,
    #[serde(default)]
    pub composer: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub additional_genres: String,
    #[serde(default)]
    pub apm_release_date: String,
    /// Older exports have no `has_stems` column; those tracks load as `false`.
    #[serde(default, with = "stems_flag")]
    pub has_stems: bool,
}

impl Track {
    pub fn additional_genres(&self) -> Vec<String> {
        split_list(&self.additional_genres)
    }
}

mod stems_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.is_empty() || v.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "has_stems must be 'true' or 'false', got '{other}'"
            ))),
        }
    }
}

// ── Project ─────────────────────────────────────────────────────────────────

/// A named collection of tracks assembled for a purpose.
///
/// `project_id` is kept as the literal cell text so a malformed row never
/// blocks lookups of the well-formed ones; use [`Project::id`] to parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub for_field: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub modified_on: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub collaborators: String,
}

impl Project {
    pub fn id(&self) -> Result<ProjectId, InvalidProjectId> {
        self.project_id.parse()
    }

    pub fn keywords(&self) -> Vec<String> {
        split_list(&self.keywords)
    }

    pub fn collaborators(&self) -> Vec<String> {
        split_list(&self.collaborators)
    }
}

// ── Project membership ──────────────────────────────────────────────────────

/// Membership of a track in a project, keyed by `(project_id, track_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTrack {
    pub project_id: String,
    pub track_id: String,
    #[serde(default)]
    pub added_date: String,
    /// 1-based; gaps are left behind by removals.
    pub position: u32,
    #[serde(default)]
    pub notes: String,
}

impl ProjectTrack {
    pub fn matches(&self, project_id: &str, track_id: &str) -> bool {
        self.project_id == project_id && self.track_id == track_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_display_pads_to_three_digits() {
        assert_eq!(ProjectId::new(1).to_string(), "P001");
        assert_eq!(ProjectId::new(42).to_string(), "P042");
        assert_eq!(ProjectId::new(1000).to_string(), "P1000");
    }

    #[test]
    fn project_id_parse() {
        assert_eq!("P001".parse::<ProjectId>().unwrap(), ProjectId::new(1));
        assert_eq!("P12".parse::<ProjectId>().unwrap(), ProjectId::new(12));
        assert_eq!("P1000".parse::<ProjectId>().unwrap(), ProjectId::new(1000));
        assert!("001".parse::<ProjectId>().is_err());
        assert!("P".parse::<ProjectId>().is_err());
        assert!("P-1".parse::<ProjectId>().is_err());
        assert!("p001".parse::<ProjectId>().is_err());
        assert!("P99999999999".parse::<ProjectId>().is_err());
    }

    #[test]
    fn project_id_next_and_ordering() {
        let first = ProjectId::first();
        assert_eq!(first.to_string(), "P001");
        assert_eq!(first.next().unwrap().to_string(), "P002");
        assert_eq!(first.next().unwrap().sequence(), 2);
        assert!(ProjectId::new(9) < ProjectId::new(10));
    }

    #[test]
    fn project_id_next_stops_at_end_of_sequence() {
        let last: ProjectId = "P4294967295".parse().unwrap();
        assert_eq!(last, ProjectId::new(u32::MAX));
        assert_eq!(last.next(), None);
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list("swing; party;;rockabilly "), vec![
            "swing",
            "party",
            "rockabilly"
        ]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn join_list_skips_blank_items() {
        assert_eq!(join_list(["Ana", " ", "Ben "]), "Ana;Ben");
        assert_eq!(join_list(Vec::<String>::new()), "");
    }

    #[test]
    fn format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(format_date(date), "2025-01-07");
    }
}
