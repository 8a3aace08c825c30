use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One author's contribution volume to one entity.
///
/// # Examples
///
/// ```
/// use conway_core::AuthorRevision;
///
/// let rev = AuthorRevision::new("alice", 3);
/// assert_eq!(rev.author, "alice");
/// assert_eq!(rev.revisions, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRevision {
    /// Author identifier.
    pub author: String,
    /// Number of revisions this author contributed to the entity.
    pub revisions: u32,
}

impl AuthorRevision {
    /// Create a revision count for `author`.
    pub fn new(author: impl Into<String>, revisions: u32) -> Self {
        Self {
            author: author.into(),
            revisions,
        }
    }
}

/// Per-entity record of which authors touched it and how much.
///
/// The order of `authors` drives pair enumeration order.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
///
/// let effort = Effort::new(
///     "src/auth.rs",
///     vec![AuthorRevision::new("alice", 3), AuthorRevision::new("bob", 2)],
/// );
/// assert_eq!(effort.authors.len(), 2);
/// assert_eq!(effort.total_revisions(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effort {
    /// Entity identifier (file, function, ...). Only used in diagnostics.
    #[serde(default)]
    pub entity: String,
    /// Authors of the entity with their revision counts.
    pub authors: Vec<AuthorRevision>,
}

impl Effort {
    /// Create an effort record for `entity`.
    pub fn new(entity: impl Into<String>, authors: Vec<AuthorRevision>) -> Self {
        Self {
            entity: entity.into(),
            authors,
        }
    }

    /// Sum of all authors' revisions on this entity.
    pub fn total_revisions(&self) -> u64 {
        self.authors.iter().map(|a| u64::from(a.revisions)).sum()
    }
}

/// A single row of an already-parsed change log.
///
/// # Examples
///
/// ```
/// use conway_core::Change;
///
/// let change = Change::new("src/main.rs", "alice", "3f2a9c1");
/// assert_eq!(change.revision, "3f2a9c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Entity touched by the revision.
    pub entity: String,
    /// Author of the revision.
    pub author: String,
    /// Revision identifier (commit hash or similar).
    pub revision: String,
}

impl Change {
    /// Create a change row.
    pub fn new(
        entity: impl Into<String>,
        author: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            author: author.into(),
            revision: revision.into(),
        }
    }
}

/// Communication strength between two contributors co-authoring entities.
///
/// # Examples
///
/// ```
/// use conway_core::CommunicationRecord;
///
/// let record = CommunicationRecord {
///     author: "alice".into(),
///     peer: "bob".into(),
///     shared_count: 2,
///     average_volume: 5.0,
///     strength: 0.4,
/// };
/// assert!(record.strength < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationRecord {
    /// First author of the pair (see [`PairOrder`]).
    pub author: String,
    /// Second author of the pair.
    pub peer: String,
    /// Number of entities both authors contributed to.
    pub shared_count: u32,
    /// `ceil((total(author) + total(peer)) / 2)`.
    pub average_volume: f64,
    /// `shared_count / average_volume`, or 0 when the average is 0.
    pub strength: f64,
}

/// How the two sides of a pair are labelled in the output.
///
/// Both modes count an unordered pair under one key; only the labels differ.
///
/// # Examples
///
/// ```
/// use conway_core::PairOrder;
///
/// let order: PairOrder = "encounter".parse().unwrap();
/// assert_eq!(order, PairOrder::Encounter);
/// assert_eq!(PairOrder::default(), PairOrder::Canonical);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrder {
    /// `author < peer` lexicographically.
    #[default]
    Canonical,
    /// Orientation of the pair's first occurrence during enumeration.
    Encounter,
}

impl fmt::Display for PairOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOrder::Canonical => write!(f, "canonical"),
            PairOrder::Encounter => write!(f, "encounter"),
        }
    }
}

impl FromStr for PairOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canonical" => Ok(PairOrder::Canonical),
            "encounter" => Ok(PairOrder::Encounter),
            other => Err(format!("unknown pair order: {other}")),
        }
    }
}

/// Ordering of emitted communication records.
///
/// # Examples
///
/// ```
/// use conway_core::SortOrder;
///
/// let sort: SortOrder = "Strength".parse().unwrap();
/// assert_eq!(sort, SortOrder::Strength);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending by `(author, peer)`.
    #[default]
    Pair,
    /// Descending by strength, ties broken by `(author, peer)`.
    Strength,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Pair => write!(f, "pair"),
            SortOrder::Strength => write!(f, "strength"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pair" => Ok(SortOrder::Pair),
            "strength" => Ok(SortOrder::Strength),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_from_str() {
        assert_eq!(
            "canonical".parse::<PairOrder>().unwrap(),
            PairOrder::Canonical
        );
        assert_eq!(
            "ENCOUNTER".parse::<PairOrder>().unwrap(),
            PairOrder::Encounter
        );
        assert!("alphabetical".parse::<PairOrder>().is_err());
    }

    #[test]
    fn sort_order_display() {
        assert_eq!(SortOrder::Pair.to_string(), "pair");
        assert_eq!(SortOrder::Strength.to_string(), "strength");
        assert!("volume".parse::<SortOrder>().is_err());
    }

    #[test]
    fn effort_deserializes_without_entity() {
        let json = r#"{"authors":[{"author":"alice","revisions":3}]}"#;
        let effort: Effort = serde_json::from_str(json).unwrap();
        assert!(effort.entity.is_empty());
        assert_eq!(effort.authors, vec![AuthorRevision::new("alice", 3)]);
    }

    #[test]
    fn communication_record_uses_camel_case() {
        let record = CommunicationRecord {
            author: "alice".into(),
            peer: "bob".into(),
            shared_count: 1,
            average_volume: 4.0,
            strength: 0.25,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sharedCount"], 1);
        assert_eq!(json["averageVolume"], 4.0);
        assert_eq!(json["strength"], 0.25);
    }

    #[test]
    fn total_revisions_does_not_overflow_u32() {
        let effort = Effort::new(
            "big.rs",
            vec![
                AuthorRevision::new("alice", u32::MAX),
                AuthorRevision::new("bob", u32::MAX),
            ],
        );
        assert_eq!(effort.total_revisions(), 2 * u64::from(u32::MAX));
    }
}
