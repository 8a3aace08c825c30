//! Per-entity author effort.
//!
//! Aggregates an already-parsed change log into [`Effort`] records (how many
//! distinct revisions each author made to each entity) and validates effort
//! lists handed in from outside before they reach the pair tally.

use std::collections::{HashMap, HashSet};

use conway_core::{AuthorRevision, Change, ConwayError, Effort};
use tracing::debug;

/// Aggregate changes into per-entity efforts.
///
/// Entities appear in the order they are first seen in `changes`. Within an
/// effort, authors are ordered by revision count descending, then by name.
/// A revision touching the same entity twice is counted once.
///
/// # Errors
///
/// Returns [`ConwayError::InvalidInput`] if a row has an empty entity,
/// author, or revision id.
///
/// # Examples
///
/// ```
/// use conway_core::Change;
/// use conway_comms::effort::by_revisions_per_author;
///
/// let changes = vec![
///     Change::new("a.rs", "alice", "r1"),
///     Change::new("a.rs", "bob", "r2"),
///     Change::new("a.rs", "alice", "r3"),
/// ];
/// let efforts = by_revisions_per_author(&changes).unwrap();
/// assert_eq!(efforts.len(), 1);
/// assert_eq!(efforts[0].authors[0].author, "alice");
/// assert_eq!(efforts[0].authors[0].revisions, 2);
/// ```
pub fn by_revisions_per_author(changes: &[Change]) -> Result<Vec<Effort>, ConwayError> {
    let mut entity_index: HashMap<&str, usize> = HashMap::new();
    // Per entity: author -> distinct revision ids
    let mut grouped: Vec<(&str, HashMap<&str, HashSet<&str>>)> = Vec::new();

    for (row, change) in changes.iter().enumerate() {
        check_change(row, change)?;

        let slot = *entity_index
            .entry(change.entity.as_str())
            .or_insert_with(|| {
                grouped.push((change.entity.as_str(), HashMap::new()));
                grouped.len() - 1
            });

        grouped[slot]
            .1
            .entry(change.author.as_str())
            .or_default()
            .insert(change.revision.as_str());
    }

    let efforts: Vec<Effort> = grouped
        .into_iter()
        .map(|(entity, authors)| {
            let mut revs: Vec<AuthorRevision> = authors
                .into_iter()
                .map(|(author, revisions)| {
                    AuthorRevision::new(author, u32::try_from(revisions.len()).unwrap_or(u32::MAX))
                })
                .collect();
            revs.sort_by(|a, b| {
                b.revisions
                    .cmp(&a.revisions)
                    .then_with(|| a.author.cmp(&b.author))
            });
            Effort::new(entity, revs)
        })
        .collect();

    debug!(
        changes = changes.len(),
        entities = efforts.len(),
        "aggregated revisions per author"
    );

    Ok(efforts)
}

fn check_change(row: usize, change: &Change) -> Result<(), ConwayError> {
    let missing = if change.entity.trim().is_empty() {
        "entity"
    } else if change.author.trim().is_empty() {
        "author"
    } else if change.revision.trim().is_empty() {
        "revision"
    } else {
        return Ok(());
    };
    Err(ConwayError::InvalidInput(format!(
        "change #{row} has an empty {missing}"
    )))
}

/// Reject effort lists the pair tally cannot interpret.
///
/// An effort may have any number of authors (zero or one simply yield no
/// pairs), but author identifiers must be non-empty and unique within an
/// effort.
///
/// # Errors
///
/// Returns [`ConwayError::InvalidInput`] naming the offending entity.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
/// use conway_comms::effort::validate_efforts;
///
/// let ok = vec![Effort::new("a.rs", vec![AuthorRevision::new("alice", 1)])];
/// assert!(validate_efforts(&ok).is_ok());
///
/// let dup = vec![Effort::new(
///     "a.rs",
///     vec![AuthorRevision::new("alice", 1), AuthorRevision::new("alice", 2)],
/// )];
/// assert!(validate_efforts(&dup).is_err());
/// ```
pub fn validate_efforts(efforts: &[Effort]) -> Result<(), ConwayError> {
    for (index, effort) in efforts.iter().enumerate() {
        let mut seen = HashSet::new();
        for rev in &effort.authors {
            if rev.author.trim().is_empty() {
                return Err(ConwayError::InvalidInput(format!(
                    "{} has an author with an empty identifier",
                    describe(index, effort)
                )));
            }
            if !seen.insert(rev.author.as_str()) {
                return Err(ConwayError::InvalidInput(format!(
                    "{} lists author '{}' more than once",
                    describe(index, effort),
                    rev.author
                )));
            }
        }
    }
    Ok(())
}

fn describe(index: usize, effort: &Effort) -> String {
    if effort.entity.is_empty() {
        format!("effort #{index}")
    } else {
        format!("entity '{}'", effort.entity)
    }
}
