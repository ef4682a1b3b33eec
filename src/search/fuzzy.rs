//! Approximate string similarity for snippet search
//!
//! Both scores are built on the Indel distance (insertions and deletions only),
//! normalized to 0-100:
//!
//! - [`ratio`] compares two strings as wholes
//! - [`partial_ratio`] slides the shorter string over the longer one and keeps
//!   the best-aligned window, so a short query like `"git"` can match anywhere
//!   inside a long content block
//!
//! Strings are compared as sequences of Unicode scalar values. Callers are
//! responsible for case folding.

use std::collections::HashMap;

/// Needles up to this many chars use the bit-parallel LCS.
const BITPARALLEL_MAX_LEN: usize = 64;

/// Normalized Indel similarity of two strings, 0-100.
///
/// Two empty strings are identical (100).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_similarity(&a, &b) * 100.0
}

/// Best similarity of the shorter string against any window of the longer one, 0-100.
///
/// Windows are the growing prefixes at the start, every full-length window,
/// and the shrinking suffixes at the end of the longer string. When both
/// strings have the same length the roles are tried both ways.
///
/// # Examples
///
/// ```
/// use quick_snippet::search::partial_ratio;
///
/// assert_eq!(partial_ratio("flask", "start flask app"), 100.0);
/// assert_eq!(partial_ratio("", "anything"), 0.0);
/// ```
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut best = best_window_similarity(shorter, longer);

    if best < 1.0 && a.len() == b.len() {
        best = best.max(best_window_similarity(longer, shorter));
    }

    best * 100.0
}

/// `2 * LCS / (|a| + |b|)`, in 0.0-1.0.
fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let lcs = if a.len() <= b.len() {
        lcs_len(a, b)
    } else {
        lcs_len(b, a)
    };
    (2 * lcs) as f64 / total as f64
}

/// Longest common subsequence length, dispatching on needle size.
fn lcs_len(needle: &[char], haystack: &[char]) -> usize {
    if needle.is_empty() || haystack.is_empty() {
        return 0;
    }
    if needle.len() <= BITPARALLEL_MAX_LEN {
        PatternMasks::new(needle).lcs_len(haystack)
    } else {
        lcs_len_dp(needle, haystack)
    }
}

/// Two-row DP fallback for needles longer than a machine word.
fn lcs_len_dp(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ac in a {
        for (j, &bc) in b.iter().enumerate() {
            curr[j + 1] = if ac == bc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Per-character match bitmasks for a needle of at most 64 chars.
///
/// Bit `i` of `masks[c]` is set when `needle[i] == c`. The LCS against any
/// haystack is then one add/or/and per haystack char (Hyyrö 2004).
struct PatternMasks {
    masks: HashMap<char, u64>,
    len: usize,
}

impl PatternMasks {
    fn new(needle: &[char]) -> Self {
        debug_assert!(needle.len() <= BITPARALLEL_MAX_LEN);
        let mut masks: HashMap<char, u64> = HashMap::with_capacity(needle.len());
        for (i, &c) in needle.iter().enumerate() {
            *masks.entry(c).or_insert(0) |= 1u64 << i;
        }
        Self {
            masks,
            len: needle.len(),
        }
    }

    #[inline]
    fn contains(&self, c: char) -> bool {
        self.masks.contains_key(&c)
    }

    fn lcs_len(&self, haystack: &[char]) -> usize {
        let mut s: u64 = !0;
        for c in haystack {
            if let Some(&m) = self.masks.get(c) {
                let u = s & m;
                s = s.wrapping_add(u) | s.wrapping_sub(u);
            }
        }
        let used = if self.len == 64 {
            !0
        } else {
            (1u64 << self.len) - 1
        };
        (!s & used).count_ones() as usize
    }
}

/// Similarity (0.0-1.0) of `needle` against the best window of `haystack`.
///
/// Requires `needle.len() <= haystack.len()`.
fn best_window_similarity(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let h = haystack.len();
    if n == 0 {
        return 0.0;
    }

    let scorer = WindowScorer::new(needle);
    let mut best = 0.0f64;

    // Growing prefixes: only worth scoring when the new last char can match.
    for i in 1..n {
        if !scorer.contains(haystack[i - 1]) {
            continue;
        }
        best = best.max(scorer.score(&haystack[..i]));
        if best >= 1.0 {
            return 1.0;
        }
    }

    // Full-length windows.
    for i in 0..(h - n) {
        if !scorer.contains(haystack[i + n - 1]) {
            continue;
        }
        best = best.max(scorer.score(&haystack[i..i + n]));
        if best >= 1.0 {
            return 1.0;
        }
    }

    // Shrinking suffixes: the first char has to be able to match.
    for i in (h - n)..h {
        if !scorer.contains(haystack[i]) {
            continue;
        }
        best = best.max(scorer.score(&haystack[i..]));
        if best >= 1.0 {
            return 1.0;
        }
    }

    best
}

/// Scores windows against a fixed needle, reusing its bitmasks when possible.
enum WindowScorer<'a> {
    BitParallel { masks: PatternMasks, needle_len: usize },
    Dp { needle: &'a [char] },
}

impl<'a> WindowScorer<'a> {
    fn new(needle: &'a [char]) -> Self {
        if needle.len() <= BITPARALLEL_MAX_LEN {
            WindowScorer::BitParallel {
                masks: PatternMasks::new(needle),
                needle_len: needle.len(),
            }
        } else {
            WindowScorer::Dp { needle }
        }
    }

    fn contains(&self, c: char) -> bool {
        match self {
            WindowScorer::BitParallel { masks, .. } => masks.contains(c),
            WindowScorer::Dp { needle } => needle.contains(&c),
        }
    }

    fn score(&self, window: &[char]) -> f64 {
        let (lcs, needle_len) = match self {
            WindowScorer::BitParallel { masks, needle_len } => (masks.lcs_len(window), *needle_len),
            WindowScorer::Dp { needle } => (lcs_len_dp(needle, window), needle.len()),
        };
        let total = needle_len + window.len();
        if total == 0 {
            return 1.0;
        }
        (2 * lcs) as f64 / total as f64
    }
}
