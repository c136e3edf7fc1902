use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("test ratio must be strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),
    #[error("class {label:?} has only {count} record(s); at least 2 are required")]
    TooFewMembers { label: String, count: usize },
    #[error("{partition} partition of {size} records cannot hold all {classes} classes")]
    PartitionTooSmall {
        partition: &'static str,
        size: usize,
        classes: usize,
    },
}

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partitions `labels` so each class keeps its share in both halves.
///
/// The test partition holds `ceil(n * test_ratio)` rows, allocated to classes
/// by floor of their proportional share and then by largest remainder. Every
/// class keeps at least one training row.
pub fn stratified_split(
    labels: &[String],
    test_ratio: f64,
    seed: u64,
) -> Result<Split, SplitError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(SplitError::InvalidRatio(test_ratio));
    }

    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, label) in labels.iter().enumerate() {
        by_class.entry(label.as_str()).or_default().push(index);
    }
    if let Some((label, members)) = by_class.iter().find(|(_, members)| members.len() < 2) {
        return Err(SplitError::TooFewMembers {
            label: label.to_string(),
            count: members.len(),
        });
    }

    let n = labels.len();
    let classes = by_class.len();
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    let n_train = n - n_test;
    if n_test < classes {
        return Err(SplitError::PartitionTooSmall {
            partition: "test",
            size: n_test,
            classes,
        });
    }
    if n_train < classes {
        return Err(SplitError::PartitionTooSmall {
            partition: "train",
            size: n_train,
            classes,
        });
    }

    let mut quotas: Vec<(usize, f64)> = by_class
        .values()
        .map(|members| {
            let exact = members.len() as f64 * n_test as f64 / n as f64;
            let floor = (exact.floor() as usize).min(members.len() - 1);
            (floor, exact - floor as f64)
        })
        .collect();
    let mut remaining = n_test.saturating_sub(quotas.iter().map(|(q, _)| q).sum());
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].1.total_cmp(&quotas[a].1).then(a.cmp(&b)));
    let sizes: Vec<usize> = by_class.values().map(Vec::len).collect();
    // Classes already at `size - 1` are skipped, so this may take several rounds.
    while remaining > 0 {
        let before = remaining;
        for &class in &order {
            if remaining == 0 {
                break;
            }
            if quotas[class].0 + 1 < sizes[class] {
                quotas[class].0 += 1;
                remaining -= 1;
            }
        }
        if remaining == before {
            return Err(SplitError::PartitionTooSmall {
                partition: "train",
                size: n_train,
                classes,
            });
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (members, (quota, _)) in by_class.into_values().zip(quotas) {
        let mut members = members;
        members.shuffle(&mut rng);
        let (test_part, train_part) = members.split_at(quota);
        test.extend_from_slice(test_part);
        train.extend_from_slice(train_part);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(spec: &[(&str, usize)]) -> Vec<String> {
        spec.iter()
            .flat_map(|(label, count)| std::iter::repeat(label.to_string()).take(*count))
            .collect()
    }

    fn count(indices: &[usize], labels: &[String], label: &str) -> usize {
        indices.iter().filter(|&&i| labels[i] == label).count()
    }

    #[test]
    fn preserves_class_proportions() {
        let labels = labels(&[("normal", 80), ("spam", 40), ("high_priority", 30)]);
        let split = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 30);
        assert_eq!(split.train.len(), 120);
        assert_eq!(count(&split.test, &labels, "normal"), 16);
        assert_eq!(count(&split.test, &labels, "spam"), 8);
        assert_eq!(count(&split.test, &labels, "high_priority"), 6);
    }

    #[test]
    fn capped_classes_do_not_shrink_test_partition() {
        let labels = labels(&[("a", 2), ("b", 2), ("c", 2), ("d", 20)]);
        let split = stratified_split(&labels, 0.8, 7).unwrap();
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 5);
        for small in ["a", "b", "c"] {
            assert_eq!(count(&split.test, &labels, small), 1);
            assert_eq!(count(&split.train, &labels, small), 1);
        }
        assert_eq!(count(&split.test, &labels, "d"), 18);
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let labels = labels(&[("a", 7), ("b", 5), ("c", 3)]);
        let split = stratified_split(&labels, 0.2, 1).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());
        assert_eq!(split.test.len(), 3);
        for class in ["a", "b", "c"] {
            assert!(count(&split.train, &labels, class) >= 1);
        }
    }

    #[test]
    fn same_seed_same_split() {
        let labels = labels(&[("x", 10), ("y", 10)]);
        assert_eq!(
            stratified_split(&labels, 0.3, 5).unwrap(),
            stratified_split(&labels, 0.3, 5).unwrap()
        );
    }

    #[test]
    fn singleton_class_is_rejected() {
        let labels = labels(&[("normal", 10), ("spam", 1)]);
        let err = stratified_split(&labels, 0.2, 42).unwrap_err();
        assert!(matches!(err, SplitError::TooFewMembers { count: 1, .. }));
    }

    #[test]
    fn tiny_test_partition_is_rejected() {
        let labels = labels(&[("a", 2), ("b", 2), ("c", 2)]);
        let err = stratified_split(&labels, 0.1, 42).unwrap_err();
        assert!(matches!(
            err,
            SplitError::PartitionTooSmall { partition: "test", .. }
        ));
    }
}
