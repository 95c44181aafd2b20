//! Similarity scoring between a candidate string and a query.
//!
//! The score is a local sequence alignment (Smith-Waterman family) with an
//! affine gap penalty, evaluated with Gotoh's recurrence so the whole
//! computation stays O(|candidate| * |query|) in time and space. Opening a
//! gap is more expensive than extending one, which rewards contiguous runs
//! of matched runes over scattered ones.

/// Bonus for a pair of equal runes on the alignment diagonal.
const MATCH_BONUS: i32 = 6;
/// Penalty for aligning two different runes.
const MISMATCH_PENALTY: i32 = 4;
/// One-time cost of opening a gap.
const GAP_OPEN_PENALTY: i32 = 4;
/// Per-rune cost of extending a gap. A gap of length L costs
/// `GAP_OPEN_PENALTY + GAP_EXTEND_PENALTY * L`.
const GAP_EXTEND_PENALTY: i32 = 2;
/// Extra bonus when the matched candidate rune starts a word. Rewards
/// acronym- and prefix-style matches over mid-token ones.
const BOUNDARY_BONUS: i32 = 2;

/// Runes that terminate a word for the purpose of [`BOUNDARY_BONUS`].
const WORD_DELIMITERS: [char; 7] = ['(', '[', '{', '/', '-', '_', '.'];

/// Calculates a similarity score between a candidate string and a query.
/// The bigger the score, the more similar they are.
///
/// The raw best-cell score is normalized as
/// `max_cell * max_cell / candidate_rune_len`, so for an equal raw
/// alignment a shorter candidate wins.
///
/// Both arguments must be non-empty; passing an empty string is a contract
/// violation, not a recoverable error. Pure and safe to call concurrently.
pub fn score(candidate: &str, query: &str) -> i32 {
    let c: Vec<char> = candidate.chars().collect();
    let q: Vec<char> = query.chars().collect();
    assert!(
        !c.is_empty() && !q.is_empty(),
        "score requires non-empty candidate and query"
    );

    let n = c.len();
    let m = q.len();
    let stride = m + 1;

    // Three DP surfaces, flattened row-major. `best` is the classic H
    // matrix; `gap_c` holds alignments currently skipping candidate runes;
    // `gap_q` holds alignments currently skipping query runes. Cells start
    // at zero, which doubles as the local-alignment floor.
    let mut best = vec![0i32; (n + 1) * stride];
    let mut gap_c = vec![i32::MIN / 2; (n + 1) * stride];
    let mut gap_q = vec![i32::MIN / 2; (n + 1) * stride];

    let mut max_cell = 0i32;
    for i in 1..=n {
        for j in 1..=m {
            let at = i * stride + j;
            let up = (i - 1) * stride + j;
            let left = i * stride + j - 1;
            let diag = (i - 1) * stride + j - 1;

            gap_c[at] = (best[up] - GAP_OPEN_PENALTY - GAP_EXTEND_PENALTY)
                .max(gap_c[up] - GAP_EXTEND_PENALTY);
            gap_q[at] = (best[left] - GAP_OPEN_PENALTY - GAP_EXTEND_PENALTY)
                .max(gap_q[left] - GAP_EXTEND_PENALTY);

            let sub = if c[i - 1] == q[j - 1] {
                let mut bonus = 0;
                if is_word_start(&c, i - 1) {
                    bonus = BOUNDARY_BONUS;
                }
                best[diag] + MATCH_BONUS + bonus
            } else {
                best[diag] - MISMATCH_PENALTY
            };

            best[at] = sub.max(gap_c[at]).max(gap_q[at]).max(0);
            max_cell = max_cell.max(best[at]);
        }
    }

    // Quadratic density adjustment: prefers the shorter of two candidates
    // carrying the same raw alignment score.
    ((i64::from(max_cell) * i64::from(max_cell)) / n as i64) as i32
}

/// Reports whether the rune at `idx` starts a word: it is the first rune,
/// or the previous rune is whitespace or one of [`WORD_DELIMITERS`].
fn is_word_start(runes: &[char], idx: usize) -> bool {
    if idx == 0 {
        return true;
    }
    let prev = runes[idx - 1];
    prev.is_whitespace() || WORD_DELIMITERS.contains(&prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_alignment() {
        assert_eq!(score("TACGGGCCCGCTA", "TAGCCCTA"), 78);
    }

    #[test]
    fn test_dash_breaks_contiguous_run() {
        // The dash forces one more gap open, lowering the score versus the
        // no-dash candidate.
        assert_eq!(score("TACGGG-CCCGCTA", "TAGCCCTA"), 56);
    }

    #[test]
    fn test_deterministic_and_non_negative() {
        let cases = [
            ("foo", "foo"),
            ("foobar", "fb"),
            ("a", "a"),
            ("src/main.rs", "smr"),
            ("FLY ME TO THE MOON", "MEON"),
        ];
        for (c, q) in cases {
            let first = score(c, q);
            assert!(first >= 0, "score({c:?}, {q:?}) is negative");
            assert_eq!(first, score(c, q));
        }
    }

    #[test]
    fn test_boundary_bonus_favors_word_start() {
        // "il" right after a delimiter should beat the same runes mid-token.
        assert!(score("x_il", "il") > score("xil", "il"));
    }

    #[test]
    fn test_normalization_prefers_shorter_candidate() {
        assert!(score("ab", "ab") > score("abxxxx", "ab"));
    }

    #[test]
    #[should_panic]
    fn test_empty_query_is_contract_violation() {
        score("foo", "");
    }
}
