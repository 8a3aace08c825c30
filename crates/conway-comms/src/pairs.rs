//! Co-authorship pair enumeration and tallying.
//!
//! Every effort with N distinct authors contributes C(N, 2) pair occurrences.
//! Occurrences are counted under a lexicographically normalized key, so
//! `(alice, bob)` and `(bob, alice)` always land in the same tally.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use conway_core::{Effort, PairOrder};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Tally state for one unordered author pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCount {
    /// Number of efforts that produced the pair.
    pub shared: u32,
    /// Index of the first effort that produced the pair.
    pub first_effort: usize,
    /// `true` when the first occurrence was `(larger, smaller)`.
    pub reversed: bool,
}

/// Enumerate the author pairs of one effort.
///
/// Authors listed more than once are kept at their first position, then
/// `(authors[i], authors[j])` is produced for every `i < j` in list order.
/// Each distinct pair therefore appears at most once per effort.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
/// use conway_comms::pairs::author_pairs;
///
/// let effort = Effort::new(
///     "a.rs",
///     vec![
///         AuthorRevision::new("a", 1),
///         AuthorRevision::new("b", 1),
///         AuthorRevision::new("c", 1),
///     ],
/// );
/// assert_eq!(
///     author_pairs(&effort),
///     vec![("a", "b"), ("a", "c"), ("b", "c")]
/// );
/// ```
pub fn author_pairs(effort: &Effort) -> Vec<(&str, &str)> {
    let unique_authors: Vec<&str> = {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for rev in &effort.authors {
            if seen.insert(rev.author.as_str()) {
                unique.push(rev.author.as_str());
            } else {
                warn!(entity = %effort.entity, author = %rev.author, "author listed twice, counting once");
            }
        }
        unique
    };

    let mut pairs = Vec::new();
    for i in 0..unique_authors.len() {
        for j in (i + 1)..unique_authors.len() {
            pairs.push((unique_authors[i], unique_authors[j]));
        }
    }
    pairs
}

/// Shared-entity counts for every co-occurring author pair.
#[derive(Debug, Clone, Default)]
pub struct PairTally {
    counts: HashMap<(String, String), PairCount>,
}

impl PairTally {
    /// Number of distinct unordered pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no pair was tallied.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Look up a pair in either orientation.
    pub fn get(&self, a: &str, b: &str) -> Option<&PairCount> {
        self.counts.get(&normalize_pair(a, b))
    }

    /// Iterate pairs as `((smaller, larger), count)`.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &PairCount)> {
        self.counts.iter()
    }

    /// Add all pair occurrences of the effort at `index`.
    fn record_effort(&mut self, index: usize, effort: &Effort) {
        for (a, b) in author_pairs(effort) {
            match self.counts.entry(normalize_pair(a, b)) {
                Entry::Occupied(mut slot) => {
                    let count = slot.get_mut();
                    count.shared = count.shared.saturating_add(1);
                }
                Entry::Vacant(slot) => {
                    slot.insert(PairCount {
                        shared: 1,
                        first_effort: index,
                        reversed: a > b,
                    });
                }
            }
        }
    }

    /// Combine two partial tallies. The earliest first occurrence wins.
    fn merge(mut self, other: PairTally) -> PairTally {
        for (key, incoming) in other.counts {
            match self.counts.entry(key) {
                Entry::Occupied(mut slot) => {
                    let count = slot.get_mut();
                    count.shared = count.shared.saturating_add(incoming.shared);
                    if incoming.first_effort < count.first_effort {
                        count.first_effort = incoming.first_effort;
                        count.reversed = incoming.reversed;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
            }
        }
        self
    }
}

/// Label a tallied pair as `(author, peer)` according to `order`.
///
/// # Examples
///
/// ```
/// use conway_core::PairOrder;
/// use conway_comms::pairs::{label_pair, PairCount};
///
/// let key = ("alice".to_string(), "bob".to_string());
/// let count = PairCount { shared: 1, first_effort: 0, reversed: true };
/// assert_eq!(label_pair(&key, &count, PairOrder::Canonical), ("alice", "bob"));
/// assert_eq!(label_pair(&key, &count, PairOrder::Encounter), ("bob", "alice"));
/// ```
pub fn label_pair<'a>(
    key: &'a (String, String),
    count: &PairCount,
    order: PairOrder,
) -> (&'a str, &'a str) {
    match order {
        PairOrder::Encounter if count.reversed => (key.1.as_str(), key.0.as_str()),
        _ => (key.0.as_str(), key.1.as_str()),
    }
}

/// Count, for every unordered author pair, how many efforts contain both.
///
/// # Examples
///
/// ```
/// use conway_core::{AuthorRevision, Effort};
/// use conway_comms::pairs::tally_pairs;
///
/// let efforts = vec![
///     Effort::new("a.rs", vec![AuthorRevision::new("alice", 1), AuthorRevision::new("bob", 1)]),
///     Effort::new("b.rs", vec![AuthorRevision::new("bob", 1), AuthorRevision::new("alice", 1)]),
/// ];
/// let tally = tally_pairs(&efforts);
/// assert_eq!(tally.len(), 1);
/// assert_eq!(tally.get("bob", "alice").unwrap().shared, 2);
/// ```
pub fn tally_pairs(efforts: &[Effort]) -> PairTally {
    let mut tally = PairTally::default();
    for (index, effort) in efforts.iter().enumerate() {
        tally.record_effort(index, effort);
    }
    debug!(
        efforts = efforts.len(),
        pairs = tally.len(),
        "tallied author pairs"
    );
    tally
}

/// Parallel variant of [`tally_pairs`].
///
/// Each rayon worker fills its own partial tally; partials are merged at the
/// end. The result is identical to the sequential tally.
pub fn tally_pairs_parallel(efforts: &[Effort]) -> PairTally {
    let tally = efforts
        .par_iter()
        .enumerate()
        .fold(PairTally::default, |mut partial, (index, effort)| {
            partial.record_effort(index, effort);
            partial
        })
        .reduce(PairTally::default, PairTally::merge);
    debug!(
        efforts = efforts.len(),
        pairs = tally.len(),
        threads = rayon::current_num_threads(),
        "tallied author pairs in parallel"
    );
    tally
}

fn normalize_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conway_core::AuthorRevision;

    fn effort(authors: &[&str]) -> Effort {
        Effort::new(
            "entity",
            authors
                .iter()
                .map(|a| AuthorRevision::new(*a, 1))
                .collect(),
        )
    }

    #[test]
    fn lonely_authors_produce_no_pairs() {
        assert_eq!(author_pairs(&effort(&[])).len(), 0);
        assert_eq!(author_pairs(&effort(&["alice"])).len(), 0);
    }

    #[test]
    fn n_authors_produce_n_choose_2_pairs() {
        let e = effort(&["a", "b", "c", "d", "e"]);
        assert_eq!(author_pairs(&e).len(), 10);
    }

    #[test]
    fn pairs_follow_list_order() {
        let e = effort(&["c", "a", "b"]);
        let pairs = author_pairs(&e);
        assert_eq!(pairs, vec![("c", "a"), ("c", "b"), ("a", "b")]);
    }

    #[test]
    fn reversed_occurrences_share_one_key() {
        let efforts = vec![effort(&["z", "a"]), effort(&["a", "z"])];

        let tally = tally_pairs(&efforts);
        assert_eq!(tally.len(), 1);
        let count = tally.get("a", "z").unwrap();
        assert_eq!(count.shared, 2);
        assert_eq!(count.first_effort, 0);
        assert!(count.reversed, "first seen as (z, a)");
    }

    #[test]
    fn repeated_author_counts_once_per_effort() {
        let efforts = vec![effort(&["alice", "alice", "bob"])];

        let tally = tally_pairs(&efforts);
        assert!(tally.get("alice", "alice").is_none());
        assert_eq!(tally.get("alice", "bob").unwrap().shared, 1);
    }

    #[test]
    fn repeated_author_keeps_first_position() {
        let e = effort(&["bob", "alice", "bob", "carol"]);
        assert_eq!(
            author_pairs(&e),
            vec![("bob", "alice"), ("bob", "carol"), ("alice", "carol")]
        );
    }

    #[test]
    fn parallel_tally_counts_repeated_author_once() {
        let efforts = vec![
            effort(&["alice", "bob", "alice"]),
            effort(&["bob", "bob", "alice"]),
        ];

        let tally = tally_pairs_parallel(&efforts);
        assert_eq!(tally.get("alice", "bob").unwrap().shared, 2);
    }

    #[test]
    fn separator_like_names_do_not_collide() {
        let efforts = vec![effort(&["a\\0b", "c"]), effort(&["a", "b\\0c"])];

        let tally = tally_pairs(&efforts);
        assert_eq!(tally.len(), 2);
        assert!(tally.iter().all(|(_, count)| count.shared == 1));
    }

    #[test]
    fn parallel_tally_matches_sequential() {
        let names = ["ann", "ben", "cat", "dan", "eve", "fay"];
        let efforts: Vec<Effort> = (0..500)
            .map(|i| {
                let len = 1 + i % names.len();
                let start = i % 3;
                let authors: Vec<&str> = names
                    .iter()
                    .cycle()
                    .skip(start)
                    .take(len)
                    .copied()
                    .collect();
                effort(&authors)
            })
            .collect();

        let sequential = tally_pairs(&efforts);
        let parallel = tally_pairs_parallel(&efforts);
        assert_eq!(sequential.len(), parallel.len());
        for (key, count) in sequential.iter() {
            assert_eq!(parallel.get(&key.0, &key.1), Some(count), "pair {key:?}");
        }
    }

    #[test]
    fn merge_keeps_earliest_orientation() {
        let mut late = PairTally::default();
        late.record_effort(7, &effort(&["b", "a"]));
        let mut early = PairTally::default();
        early.record_effort(2, &effort(&["a", "b"]));

        let merged = late.merge(early);
        let count = merged.get("a", "b").unwrap();
        assert_eq!(count.shared, 2);
        assert_eq!(count.first_effort, 2);
        assert!(!count.reversed);
    }
}
