//! Edit-distance similarity.

/// Levenshtein distance over characters (insert, delete, substitute; cost 1).
pub fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row: row[j] holds the distance between a[..i] and b[..j].
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diag = i;
        let mut left = i + 1;
        if let Some(first) = row.first_mut() {
            *first = left;
        }
        for (cb, cell) in b.iter().zip(row.iter_mut().skip(1)) {
            let up = *cell;
            let cost = usize::from(ca != cb);
            let value = (up + 1).min(left + 1).min(diag + cost);
            diag = up;
            *cell = value;
            left = value;
        }
    }
    row.last().copied().unwrap_or(0)
}

/// Similarity in `[0, 1]`: `1 - distance / max(len(a), len(b), 1)`.
///
/// Identical strings (including two empty strings) score 1. The score is
/// symmetric in its arguments.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similarity_chars(&a, &b)
}

pub(crate) fn similarity_chars(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len()).max(1);
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_distance_known_values() {
        assert_eq!(levenshtein_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein_distance(&chars("flaw"), &chars("lawn")), 2);
        assert_eq!(levenshtein_distance(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein_distance(&chars("abc"), &chars("")), 3);
        assert_eq!(levenshtein_distance(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn test_distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance(&chars("café"), &chars("cafe")), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("jon", "joh") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [("jon", "john"), ("", "abc"), ("kitten", "sitting"), ("ab", "ba")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }
}
