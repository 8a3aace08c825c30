//! Communication strength between co-authors.
//!
//! Based on Conway's law: a project works best when its organizational
//! structure mirrors the software. For each pair of authors the number of
//! shared entities is divided by the pair's averaged total revisions.
//!
//! The normalization is a heuristic. Dividing an entity count by a revision
//! average does not measure "fraction of shared work" exactly, but the
//! formula is kept as is so scores stay comparable with earlier analyses.

use std::collections::HashMap;

use conway_core::{
    Change, CommunicationConfig, CommunicationRecord, ConwayError, Effort, PairOrder, SortOrder,
};
use tracing::debug;

use crate::effort::by_revisions_per_author;
use crate::pairs::{label_pair, tally_pairs, tally_pairs_parallel};

/// Options for communication analysis.
///
/// # Examples
///
/// ```
/// use conway_comms::communication::CommunicationOptions;
///
/// let opts = CommunicationOptions::default();
/// assert_eq!(opts.min_shared, 1);
/// assert_eq!(opts.parallel_threshold, 1024);
/// ```
#[derive(Debug, Clone)]
pub struct CommunicationOptions {
    /// How author/peer are labelled (default: canonical).
    pub pair_order: PairOrder,
    /// Output ordering (default: pair).
    pub sort: SortOrder,
    /// Minimum shared entities to report a pair (default: 1).
    pub min_shared: u32,
    /// Minimum strength to report a pair (default: 0.0).
    pub min_strength: f64,
    /// Effort count from which the tally runs in parallel (default: 1024, 0 = never).
    pub parallel_threshold: usize,
}

impl Default for CommunicationOptions {
    fn default() -> Self {
        Self::from(&CommunicationConfig::default())
    }
}

impl From<&CommunicationConfig> for CommunicationOptions {
    fn from(config: &CommunicationConfig) -> Self {
        Self {
            pair_order: config.pair_order,
            sort: config.sort,
            min_shared: config.min_shared,
            min_strength: config.min_strength,
            parallel_threshold: config.parallel_threshold,
        }
    }
}

impl From<&CommunicationOptions> for CommunicationConfig {
    fn from(options: &CommunicationOptions) -> Self {
        Self {
            pair_order: options.pair_order,
            sort: options.sort,
            min_shared: options.min_shared,
            min_strength: options.min_strength,
            parallel_threshold: options.parallel_threshold,
        }
    }
}

impl CommunicationOptions {
    /// Check thresholds with the same rules as [`CommunicationConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConwayError::Config`] if `min_strength` is negative or not finite.
    pub fn validate(&self) -> Result<(), ConwayError> {
        CommunicationConfig::from(self).validate()
    }

    fn use_parallel(&self, efforts: usize) -> bool {
        self.parallel_threshold > 0 && efforts >= self.parallel_threshold
    }
}

/// Sum each author's revisions across all efforts.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
/// use conway_comms::communication::revisions_per_author;
///
/// let efforts = vec![
///     Effort::new("a.rs", vec![AuthorRevision::new("alice", 3)]),
///     Effort::new("b.rs", vec![AuthorRevision::new("alice", 1)]),
/// ];
/// assert_eq!(revisions_per_author(&efforts)["alice"], 4);
/// ```
pub fn revisions_per_author(efforts: &[Effort]) -> HashMap<String, u64> {
    let mut per_author: HashMap<String, u64> = HashMap::new();
    for effort in efforts {
        for rev in &effort.authors {
            let total = per_author.entry(rev.author.clone()).or_default();
            *total = total.saturating_add(u64::from(rev.revisions));
        }
    }
    per_author
}

/// `ceil((a + b) / 2)` as a float.
///
/// # Examples
///
/// ```
/// use conway_comms::communication::average_volume;
///
/// assert_eq!(average_volume(4, 6), 5.0);
/// assert_eq!(average_volume(4, 3), 4.0);
/// ```
pub fn average_volume(a: u64, b: u64) -> f64 {
    a.saturating_add(b).div_ceil(2) as f64
}

/// `shared / average`, or 0 when `average` is 0.
///
/// # Examples
///
/// ```
/// use conway_comms::communication::strength;
///
/// assert_eq!(strength(2, 5.0), 0.4);
/// assert_eq!(strength(3, 0.0), 0.0);
/// ```
pub fn strength(shared: u32, average: f64) -> f64 {
    if average == 0.0 {
        0.0
    } else {
        f64::from(shared) / average
    }
}

/// Calculate communication strength between authors from shared entities.
///
/// Returns one record per unordered pair of authors sharing at least
/// `min_shared` entities and reaching `min_strength`, ordered per
/// `options.sort`. An effort with fewer than two authors contributes
/// nothing.
///
/// # Errors
///
/// Returns [`ConwayError::Config`] if `min_strength` is negative or not finite.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
/// use conway_comms::communication::{by_shared_entities, CommunicationOptions};
///
/// let efforts = vec![
///     Effort::new("a.rs", vec![AuthorRevision::new("A", 3), AuthorRevision::new("B", 2)]),
///     Effort::new(
///         "b.rs",
///         vec![
///             AuthorRevision::new("A", 1),
///             AuthorRevision::new("B", 4),
///             AuthorRevision::new("C", 2),
///         ],
///     ),
/// ];
/// let records = by_shared_entities(&efforts, &CommunicationOptions::default()).unwrap();
/// assert_eq!(records.len(), 3);
/// assert_eq!((records[0].author.as_str(), records[0].peer.as_str()), ("A", "B"));
/// assert_eq!(records[0].shared_count, 2);
/// assert_eq!(records[0].average_volume, 5.0);
/// assert!((records[0].strength - 0.4).abs() < f64::EPSILON);
/// ```
pub fn by_shared_entities(
    efforts: &[Effort],
    options: &CommunicationOptions,
) -> Result<Vec<CommunicationRecord>, ConwayError> {
    options.validate()?;

    let per_author = revisions_per_author(efforts);
    let tally = if options.use_parallel(efforts.len()) {
        tally_pairs_parallel(efforts)
    } else {
        tally_pairs(efforts)
    };

    let volume = |author: &str| per_author.get(author).copied().unwrap_or(0);

    let mut records = Vec::with_capacity(tally.len());
    for (key, count) in tally.iter() {
        if count.shared < options.min_shared {
            continue;
        }

        let average = average_volume(volume(&key.0), volume(&key.1));
        let strength = strength(count.shared, average);
        if strength < options.min_strength {
            continue;
        }

        let (author, peer) = label_pair(key, count, options.pair_order);
        records.push(CommunicationRecord {
            author: author.to_string(),
            peer: peer.to_string(),
            shared_count: count.shared,
            average_volume: average,
            strength,
        });
    }

    sort_records(&mut records, options.sort);

    debug!(
        authors = per_author.len(),
        pairs = tally.len(),
        reported = records.len(),
        "computed communication strength"
    );

    Ok(records)
}

/// Aggregate a change log into efforts, then run [`by_shared_entities`].
///
/// # Errors
///
/// Returns [`ConwayError::InvalidInput`] for malformed change rows, or
/// [`ConwayError::Config`] for invalid options.
///
/// # Examples
///
/// ```
/// use conway_core::Change;
/// use conway_comms::communication::{communication_from_changes, CommunicationOptions};
///
/// let changes = vec![
///     Change::new("a.rs", "alice", "r1"),
///     Change::new("a.rs", "bob", "r2"),
/// ];
/// let records = communication_from_changes(&changes, &CommunicationOptions::default()).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].strength, 1.0);
/// ```
pub fn communication_from_changes(
    changes: &[Change],
    options: &CommunicationOptions,
) -> Result<Vec<CommunicationRecord>, ConwayError> {
    let efforts = by_revisions_per_author(changes)?;
    by_shared_entities(&efforts, options)
}

fn sort_records(records: &mut [CommunicationRecord], sort: SortOrder) {
    match sort {
        SortOrder::Pair => {
            records.sort_by(|a, b| a.author.cmp(&b.author).then_with(|| a.peer.cmp(&b.peer)));
        }
        SortOrder::Strength => {
            records.sort_by(|a, b| {
                b.strength
                    .partial_cmp(&a.strength)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.author.cmp(&b.author))
                    .then_with(|| a.peer.cmp(&b.peer))
            });
        }
    }
}
