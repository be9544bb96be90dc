//! # Weighted Sorting
//!
//! Reorders lines so the most used commands come first.

use super::storage::WeightSource;

/// Sort `lines` by weight (descending), breaking ties by the full line text
/// (ascending, byte order).
///
/// Each line's weight is looked up once, the decorated pairs are sorted, and
/// the weights are dropped again. The source is only read.
pub fn sort_by_weight<S>(lines: Vec<String>, source: &S) -> Vec<String>
where
    S: WeightSource + ?Sized,
{
    let mut decorated: Vec<(u64, String)> = lines
        .into_iter()
        .map(|line| (source.weight_of(&line), line))
        .collect();

    decorated.sort_by(|(left_weight, left), (right_weight, right)| {
        right_weight.cmp(left_weight).then_with(|| left.cmp(right))
    });

    decorated.into_iter().map(|(_, line)| line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn weights(items: &[(&str, u64)]) -> HashMap<String, u64> {
        items.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_all_zero_weights_sort_lexicographically() {
        let sorted = sort_by_weight(lines(&["zeta", "alpha", "beta"]), &HashMap::new());
        assert_eq!(sorted, lines(&["alpha", "beta", "zeta"]));
    }

    #[test]
    fn test_weight_descending_by_first_token() {
        let store = weights(&[("git", 5), ("ls", 2)]);
        let sorted = sort_by_weight(lines(&["ls -la", "git status", "pwd"]), &store);
        assert_eq!(sorted, lines(&["git status", "ls -la", "pwd"]));
    }

    #[test]
    fn test_equal_weights_use_full_line() {
        let store = weights(&[("git", 3)]);
        let sorted = sort_by_weight(lines(&["git status", "git add .", "git log"]), &store);
        assert_eq!(sorted, lines(&["git add .", "git log", "git status"]));
    }

    #[test]
    fn test_tie_break_is_byte_order() {
        let sorted = sort_by_weight(lines(&["b", "B", "a", "_"]), &HashMap::new());
        assert_eq!(sorted, lines(&["B", "_", "a", "b"]));
    }

    #[test]
    fn test_preserves_duplicates() {
        let store = weights(&[("make", 1)]);
        let input = lines(&["pwd", "make", "pwd", "make"]);
        let sorted = sort_by_weight(input, &store);
        assert_eq!(sorted, lines(&["make", "make", "pwd", "pwd"]));
    }

    #[test]
    fn test_same_multiset_and_deterministic() {
        let store = weights(&[("a", 4), ("c", 4), ("e", 1)]);
        let input = lines(&["e 1", "d", "c x", "a z", "c a", "b", "a z"]);

        let first = sort_by_weight(input.clone(), &store);
        let second = sort_by_weight(input.clone(), &store);
        assert_eq!(first, second);

        let mut expected = input;
        expected.sort();
        let mut actual = first.clone();
        actual.sort();
        assert_eq!(actual, expected);

        for pair in first.windows(2) {
            let (a, b) = (store.weight_of(&pair[0]), store.weight_of(&pair[1]));
            assert!(a > b || (a == b && pair[0] <= pair[1]));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_by_weight(Vec::new(), &HashMap::new()).is_empty());
    }
}
