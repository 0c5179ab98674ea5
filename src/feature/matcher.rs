//! Brute-force Hamming matching with cross-check.

use crate::feature::Descriptor;

/// A mutual nearest-neighbour pair between two descriptor sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorMatch {
    /// Index into the query set.
    pub query_idx: usize,
    /// Index into the train set.
    pub train_idx: usize,
    /// Hamming distance between the two descriptors.
    pub distance: u32,
}

/// Index and distance of the nearest descriptor in `set`; ties keep the lowest index.
fn nearest(descriptor: &Descriptor, set: &[Descriptor]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, candidate) in set.iter().enumerate() {
        let distance = descriptor.hamming(candidate);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best
}

/// Matches `query` against `train`, keeping only mutual nearest neighbours.
///
/// A pair `(q, t)` is kept when `t` is the nearest train descriptor of `q`
/// and `q` is the nearest query descriptor of `t`. Results are ordered by
/// query index.
pub fn cross_check_matches(query: &[Descriptor], train: &[Descriptor]) -> Vec<DescriptorMatch> {
    if query.is_empty() || train.is_empty() {
        return Vec::new();
    }

    let backward: Vec<usize> = train
        .iter()
        .map(|t| nearest(t, query).map_or(usize::MAX, |(idx, _)| idx))
        .collect();

    query
        .iter()
        .enumerate()
        .filter_map(|(query_idx, q)| {
            let (train_idx, distance) = nearest(q, train)?;
            (backward[train_idx] == query_idx).then_some(DescriptorMatch {
                query_idx,
                train_idx,
                distance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::cross_check_matches;
    use crate::feature::Descriptor;

    fn desc(fill: u8, first: u8) -> Descriptor {
        let mut bits = [fill; 32];
        bits[0] = first;
        Descriptor(bits)
    }

    #[test]
    fn keeps_only_mutual_nearest_pairs() {
        let query = [desc(0x00, 0x00), desc(0x00, 0x01)];
        let train = [desc(0x00, 0x03), desc(0xFF, 0xFF)];
        // Both queries prefer train[0]; train[0] prefers query[1].
        let matches = cross_check_matches(&query, &train);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].query_idx, 1);
        assert_eq!(matches[0].train_idx, 0);
        assert_eq!(matches[0].distance, 1);
    }

    #[test]
    fn identical_sets_match_one_to_one() {
        let set: Vec<_> = (0..5u8).map(|i| desc(i * 40, i)).collect();
        let matches = cross_check_matches(&set, &set);
        assert_eq!(matches.len(), 5);
        assert!(matches.iter().all(|m| m.query_idx == m.train_idx && m.distance == 0));
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let query = [desc(0x00, 0x00)];
        let train = [desc(0x00, 0x01), desc(0x00, 0x02)];
        let matches = cross_check_matches(&query, &train);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].train_idx, 0);
    }

    #[test]
    fn empty_inputs_produce_no_matches() {
        assert!(cross_check_matches(&[], &[desc(0, 0)]).is_empty());
        assert!(cross_check_matches(&[desc(0, 0)], &[]).is_empty());
    }
}
