use clap::ValueEnum;
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How many questions a challenge round asks, at most.
pub const CHALLENGE_LENGTH: usize = 10;

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// Every number from start to end, in order.
    Sequential,
    /// Up to ten unique numbers drawn at random from the range.
    Challenge,
}

/// One practice round: the ordered target list, the cursor into it and the
/// running correct count. Lives only for the duration of the process.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    mode: PracticeMode,
    numbers: Vec<u32>,
    position: usize,
    correct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    Champion,
    GreatWork,
    KeepGoing,
}

impl SummaryTier {
    pub fn message(self) -> &'static str {
        match self {
            SummaryTier::Champion => "Amazing! You're a number champion!",
            SummaryTier::GreatWork => "Great work! Keep it up!",
            SummaryTier::KeepGoing => "Good try! One more round and you'll nail it!",
        }
    }
}

impl PracticeSession {
    /// Builds the target list for a round. A reversed range is accepted and
    /// swapped. Challenge mode draws `min(CHALLENGE_LENGTH, range size)`
    /// unique numbers.
    pub fn new(mode: PracticeMode, start: u32, end: u32) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let mut numbers: Vec<u32> = (start..=end).collect();

        if mode == PracticeMode::Challenge {
            let mut rng = rng();
            numbers.shuffle(&mut rng);
            numbers.truncate(CHALLENGE_LENGTH);
        }

        Self {
            mode,
            numbers,
            position: 0,
            correct: 0,
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    /// The number currently being practiced, or `None` once the round is over.
    pub fn current(&self) -> Option<u32> {
        self.numbers.get(self.position).copied()
    }

    /// Move to the next number, crediting the current one when `correct`.
    pub fn advance(&mut self, correct: bool) {
        if self.position >= self.numbers.len() {
            return;
        }
        if correct {
            self.correct += 1;
        }
        self.position += 1;
    }

    /// Move on without credit.
    pub fn skip(&mut self) {
        self.advance(false);
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.numbers.len()
    }

    /// (answered so far, total questions)
    pub fn progress(&self) -> (usize, usize) {
        (self.position, self.numbers.len())
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// End-of-round encouragement tier: top at 80 % correct, middle at 50 %.
    pub fn summary_tier(&self) -> SummaryTier {
        let total = self.numbers.len() as u32;
        if total == 0 {
            return SummaryTier::KeepGoing;
        }
        let percent = self.correct * 100 / total;
        if percent >= 80 {
            SummaryTier::Champion
        } else if percent >= 50 {
            SummaryTier::GreatWork
        } else {
            SummaryTier::KeepGoing
        }
    }

    #[cfg(test)]
    fn targets(&self) -> &[u32] {
        &self.numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_covers_range_in_order() {
        let session = PracticeSession::new(PracticeMode::Sequential, 1, 5);
        assert_eq!(session.targets(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sequential_single_number() {
        let session = PracticeSession::new(PracticeMode::Sequential, 7, 7);
        assert_eq!(session.targets(), &[7]);
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let session = PracticeSession::new(PracticeMode::Sequential, 5, 1);
        assert_eq!(session.targets(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_challenge_draws_ten_unique_from_wide_range() {
        let session = PracticeSession::new(PracticeMode::Challenge, 1, 20);
        assert_eq!(session.len(), 10);

        let unique: HashSet<u32> = session.targets().iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(session.targets().iter().all(|n| (1..=20).contains(n)));
    }

    #[test]
    fn test_challenge_narrow_range_uses_whole_range() {
        let session = PracticeSession::new(PracticeMode::Challenge, 3, 6);
        assert_eq!(session.len(), 4);

        let unique: HashSet<u32> = session.targets().iter().copied().collect();
        assert_eq!(unique.len(), 4);
        assert!(session.targets().iter().all(|n| (3..=6).contains(n)));
    }

    #[test]
    fn test_advance_tracks_position_and_correct_count() {
        let mut session = PracticeSession::new(PracticeMode::Sequential, 1, 3);
        assert_eq!(session.current(), Some(1));

        session.advance(true);
        assert_eq!(session.current(), Some(2));
        session.skip();
        assert_eq!(session.current(), Some(3));
        session.advance(true);

        assert!(session.is_finished());
        assert_eq!(session.current(), None);
        assert_eq!(session.correct(), 2);
    }

    #[test]
    fn test_advance_past_end_is_a_no_op() {
        let mut session = PracticeSession::new(PracticeMode::Sequential, 1, 1);
        session.advance(true);
        session.advance(true);
        session.advance(true);

        assert_eq!(session.correct(), 1);
        assert_eq!(session.progress(), (1, 1));
    }

    #[test]
    fn test_summary_tiers() {
        let mut session = PracticeSession::new(PracticeMode::Sequential, 1, 10);
        for _ in 0..8 {
            session.advance(true);
        }
        for _ in 0..2 {
            session.skip();
        }
        assert_eq!(session.summary_tier(), SummaryTier::Champion);

        let mut session = PracticeSession::new(PracticeMode::Sequential, 1, 10);
        for i in 0..10 {
            session.advance(i < 5);
        }
        assert_eq!(session.summary_tier(), SummaryTier::GreatWork);

        let mut session = PracticeSession::new(PracticeMode::Sequential, 1, 10);
        for _ in 0..10 {
            session.skip();
        }
        assert_eq!(session.summary_tier(), SummaryTier::KeepGoing);
    }
}
