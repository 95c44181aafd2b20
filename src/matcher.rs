//! Subsequence filtering over candidate labels.
//!
//! A filter pass walks every label once and keeps those containing the
//! query's runes as an in-order (not necessarily contiguous) subsequence
//! under the active case rule. The result preserves the original candidate
//! order: filtering is order-preserving membership testing, not a sorted
//! relevance search. The similarity score attached to each match is
//! advisory, used for highlighting-adjacent display only.

use crate::score::score;

/// Matching mode applied to a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Case-insensitive until the query contains an upper-case rune, then
    /// case-sensitive. Resolved once per filter pass. The default.
    #[default]
    Smart,
    /// Always case-sensitive.
    CaseSensitive,
    /// Always case-insensitive.
    CaseInsensitive,
}

/// One filtered candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Index of the candidate in the original sequence.
    pub index: usize,
    /// Matched rune range in the label, `(start, end_exclusive)`.
    /// `None` when the query was empty (nothing to highlight).
    pub span: Option<(usize, usize)>,
    /// Similarity score of the matched substring against the query.
    pub score: i32,
}

/// Filters `labels` against `query`, returning one [`MatchResult`] per
/// matching candidate in original candidate order.
///
/// An empty query matches every candidate with no span and a zero score.
pub fn filter(query: &str, mode: Mode, labels: &[String]) -> Vec<MatchResult> {
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| MatchResult {
                index,
                span: None,
                score: 0,
            })
            .collect();
    }

    let case_sensitive = match mode {
        Mode::CaseSensitive => true,
        Mode::CaseInsensitive => false,
        Mode::Smart => query.chars().any(char::is_uppercase),
    };

    let q: Vec<char> = if case_sensitive {
        query.chars().collect()
    } else {
        query.chars().map(fold).collect()
    };
    let folded_query: String = q.iter().collect();

    let mut res = Vec::new();
    let mut runes = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        runes.clear();
        runes.extend(label.chars());
        if !case_sensitive {
            for r in &mut runes {
                *r = fold(*r);
            }
        }

        // Greedy leftmost scan: consume the next query rune at every equal
        // label rune, stop as soon as the whole query is consumed. This
        // yields the leftmost match, not the globally tightest span.
        let mut from = 0;
        let mut qi = 0;
        for (i, &r) in runes.iter().enumerate() {
            if r != q[qi] {
                continue;
            }
            if qi == 0 {
                from = i;
            }
            qi += 1;
            if qi == q.len() {
                let matched: String = runes[from..=i].iter().collect();
                res.push(MatchResult {
                    index,
                    span: Some((from, i + 1)),
                    score: score(&matched, &folded_query),
                });
                break;
            }
        }
    }
    res
}

/// Single-rune case fold. Runes whose lowercase form expands to several
/// runes keep only the first, so span indices stay aligned with the label.
pub(crate) fn fold(r: char) -> char {
    r.to_lowercase().next().unwrap_or(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn indices(res: &[MatchResult]) -> Vec<usize> {
        res.iter().map(|m| m.index).collect()
    }

    #[test]
    fn test_subsequence_match() {
        let l = labels(&["one", "two", "three2one"]);
        let res = filter("one", Mode::Smart, &l);
        assert_eq!(indices(&res), vec![0, 2]);
        assert_eq!(res[0].span, Some((0, 3)));
        // Greedy leftmost: "one" is consumed starting at the 'o' of the
        // "one" suffix, runes t-h-r-e-e-2 are skipped first.
        assert_eq!(res[1].span, Some((6, 9)));
    }

    #[test]
    fn test_preserves_candidate_order() {
        let l = labels(&["bbb", "ab", "zzab", "a", "ba"]);
        let res = filter("a", Mode::Smart, &l);
        let idx = indices(&res);
        assert_eq!(idx, vec![1, 2, 3, 4]);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let l = labels(&["one", "two", "three"]);
        let res = filter("", Mode::Smart, &l);
        assert_eq!(indices(&res), vec![0, 1, 2]);
        assert!(res.iter().all(|m| m.span.is_none() && m.score == 0));
    }

    #[test]
    fn test_idempotent() {
        let l = labels(&["alpha", "beta", "gamma", "delta"]);
        let first = filter("at", Mode::Smart, &l);
        let second = filter("at", Mode::Smart, &l);
        assert_eq!(first, second);
    }

    #[test]
    fn test_smart_mode_switches_on_uppercase() {
        let l = labels(&["readme", "README"]);
        // All-lowercase query matches case-insensitively.
        assert_eq!(indices(&filter("readme", Mode::Smart, &l)), vec![0, 1]);
        // An upper-case rune makes the whole query case-sensitive.
        assert_eq!(indices(&filter("READ", Mode::Smart, &l)), vec![1]);
        assert_eq!(indices(&filter("Read", Mode::Smart, &l)), Vec::<usize>::new());
    }

    #[test]
    fn test_explicit_case_modes() {
        let l = labels(&["Makefile", "makefile"]);
        assert_eq!(indices(&filter("Make", Mode::CaseSensitive, &l)), vec![0]);
        assert_eq!(indices(&filter("MAKE", Mode::CaseInsensitive, &l)), vec![0, 1]);
    }

    #[test]
    fn test_unmatched_candidates_excluded() {
        let l = labels(&["abc", "acb", "cab"]);
        // "acb" and "cab" contain the right runes but not in query order.
        assert_eq!(indices(&filter("abc", Mode::Smart, &l)), vec![0]);
    }

    #[test]
    fn test_score_attached_but_order_untouched() {
        // The gapped match scores lower than the exact one, yet candidate
        // order is preserved in the output.
        let l = labels(&["o-n-e", "one"]);
        let res = filter("one", Mode::Smart, &l);
        assert_eq!(indices(&res), vec![0, 1]);
        assert!(res[1].score > res[0].score);
    }
}
