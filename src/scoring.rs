use crate::audio_toolkit::{matches_variant, normalize};
use strsim::normalized_levenshtein;

// Bonus for each target word found verbatim in the transcript.
const WORD_HIT_BONUS: f32 = 5.0;
// Bonus for a target word heard as a known kid mispronunciation.
const TOLERANCE_BONUS: f32 = 35.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreOptions {
    /// Accept known child mispronunciations ("free" for "three", ...).
    pub tolerance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Great,
    Close,
    TryAgain,
}

/// Scores a transcript against the target phrase.
///
/// Both strings are normalized first. The base is the edit-distance
/// similarity ratio in percent; every target word found in the transcript
/// adds a small bonus, and with tolerance enabled a target word heard as a
/// known mispronunciation variant adds a larger one. The result is clamped
/// to [0, 100].
pub fn score_attempt(target: &str, heard: &str, opts: &ScoreOptions) -> f32 {
    let target = normalize(target);
    let heard = normalize(heard);

    let base = (normalized_levenshtein(&target, &heard) * 100.0) as f32;

    let mut bonus = 0.0f32;
    for word in target.split_whitespace() {
        if heard.contains(word) {
            bonus += WORD_HIT_BONUS;
        } else if opts.tolerance
            && heard
                .split_whitespace()
                .any(|heard_word| matches_variant(word, heard_word))
        {
            bonus += TOLERANCE_BONUS;
        }
    }

    (base + bonus).clamp(0.0, 100.0)
}

/// Scores an attempt at a specific number.
///
/// Speech services routinely emit the digit form ("13" for "thirteen"), so a
/// transcript token equal to the number's digits counts as a perfect answer.
pub fn score_number_attempt(number: u32, target: &str, heard: &str, opts: &ScoreOptions) -> f32 {
    let digits = number.to_string();
    if normalize(heard)
        .split_whitespace()
        .any(|token| token == digits)
    {
        return 100.0;
    }

    score_attempt(target, heard, opts)
}

/// Maps a score onto the two configured thresholds.
pub fn verdict_for(score: f32, threshold_great: u8, threshold_close: u8) -> Verdict {
    if score >= threshold_great as f32 {
        Verdict::Great
    } else if score >= threshold_close as f32 {
        Verdict::Close
    } else {
        Verdict::TryAgain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ScoreOptions {
        ScoreOptions { tolerance: false }
    }

    fn tolerant() -> ScoreOptions {
        ScoreOptions { tolerance: true }
    }

    #[test]
    fn test_exact_match_scores_100() {
        for target in ["one", "twenty one", "one hundred five"] {
            assert_eq!(score_attempt(target, target, &plain()), 100.0);
            assert_eq!(score_attempt(target, target, &tolerant()), 100.0);
        }
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let cases = [
            ("", ""),
            ("one", ""),
            ("", "one"),
            ("twenty one", "completely unrelated words"),
            ("three", "free free free free free free"),
            ("nine", "Nine! Nine. NINE"),
        ];
        for (target, heard) in cases {
            for opts in [plain(), tolerant()] {
                let score = score_attempt(target, heard, &opts);
                assert!((0.0..=100.0).contains(&score), "{} out of bounds", score);
            }
        }
    }

    #[test]
    fn test_adding_missing_word_never_hurts() {
        let partial = score_attempt("twenty one", "twenty", &plain());
        let complete = score_attempt("twenty one", "twenty one", &plain());
        assert!(complete >= partial);
        assert_eq!(complete, 100.0);
    }

    #[test]
    fn test_tolerance_lifts_teen_ty_confusion() {
        let with = score_attempt("thirteen", "thirty", &tolerant());
        let without = score_attempt("thirteen", "thirty", &plain());
        assert!(with >= 95.0, "tolerant score was {}", with);
        assert!(without < with);
        // Off the tolerance path only the fuzzy ratio remains.
        assert!(without < 70.0);
    }

    #[test]
    fn test_variant_bonus_only_for_missing_words() {
        // "twenty" is heard verbatim; only the word bonus applies to it.
        let score = score_attempt("twenty one", "twenty won", &tolerant());
        assert!(score > score_attempt("twenty one", "twenty won", &plain()));
        assert!(score <= 100.0);
    }

    #[test]
    fn test_digit_transcript_is_accepted() {
        assert_eq!(score_number_attempt(13, "thirteen", "13", &plain()), 100.0);
        assert_eq!(
            score_number_attempt(21, "twenty one", "I heard 21 maybe", &plain()),
            100.0
        );
    }

    #[test]
    fn test_digit_match_requires_whole_token() {
        // "21" must not satisfy a target of 1.
        let score = score_number_attempt(1, "one", "21", &plain());
        assert!(score < 100.0);
    }

    #[test]
    fn test_word_form_still_scores_without_digits() {
        let score = score_number_attempt(13, "thirteen", "thirteen", &plain());
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(verdict_for(92.0, 85, 70), Verdict::Great);
        assert_eq!(verdict_for(85.0, 85, 70), Verdict::Great);
        assert_eq!(verdict_for(75.0, 85, 70), Verdict::Close);
        assert_eq!(verdict_for(70.0, 85, 70), Verdict::Close);
        assert_eq!(verdict_for(42.0, 85, 70), Verdict::TryAgain);
    }
}
