//! Match state and end-of-game results
//!
//! Plain data owned by the match state machine. Everything here is
//! serializable so a finished match can be summarized or logged as JSON.

use serde::{Deserialize, Serialize};

use super::ai::Difficulty;
use super::shot::Side;
use crate::settings::MatchRules;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Solo shooting against the clock
    #[default]
    Practice,
    /// Race an AI opponent for the higher score
    VsAi,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Practice => "Practice",
            GameMode::VsAi => "VsAI",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "practice" => Some(GameMode::Practice),
            "vsai" | "vs_ai" | "ai" => Some(GameMode::VsAi),
            _ => None,
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for `start`
    NotStarted,
    /// Clock running, shots allowed
    Running,
    /// Clock ran out with a ball in the air; waiting for it to land
    WaitingForBall,
    /// Final
    Ended,
}

/// Practice mode grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PracticeRating {
    TryAgain,
    Good,
    Great,
    Excellent,
}

impl PracticeRating {
    /// Grade a score; thresholds scale with match length
    pub fn from_score(score: u32, duration: f32, rules: &MatchRules) -> Self {
        let scale = duration / rules.rating_reference_duration;
        let scaled = |threshold: u32| (threshold as f32 * scale).ceil() as u32;

        if score >= scaled(rules.excellent_threshold) {
            PracticeRating::Excellent
        } else if score >= scaled(rules.great_threshold) {
            PracticeRating::Great
        } else if score >= scaled(rules.good_threshold) {
            PracticeRating::Good
        } else {
            PracticeRating::TryAgain
        }
    }

    pub fn stars(&self) -> u8 {
        match self {
            PracticeRating::TryAgain => 0,
            PracticeRating::Good => 1,
            PracticeRating::Great => 2,
            PracticeRating::Excellent => 3,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PracticeRating::TryAgain => "TRY AGAIN!",
            PracticeRating::Good => "GOOD!",
            PracticeRating::Great => "GREAT JOB!",
            PracticeRating::Excellent => "EXCELLENT!",
        }
    }
}

/// Versus mode result, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VsAiResult {
    Win,
    Lose,
    Draw,
}

impl VsAiResult {
    pub fn from_scores(player: u32, opponent: u32) -> Self {
        match player.cmp(&opponent) {
            std::cmp::Ordering::Greater => VsAiResult::Win,
            std::cmp::Ordering::Less => VsAiResult::Lose,
            std::cmp::Ordering::Equal => VsAiResult::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Practice(PracticeRating),
    VsAi(VsAiResult),
}

/// Final numbers for the results screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub player_score: u32,
    pub opponent_score: u32,
    pub player_shots: u32,
    pub opponent_shots: u32,
    pub outcome: MatchOutcome,
}

/// Clock, scores and shot counters for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub phase: MatchPhase,
    /// Match length (seconds)
    pub duration: f32,
    /// Seconds left on the clock
    pub remaining: f32,
    pub player_score: u32,
    pub opponent_score: u32,
    pub player_shots: u32,
    pub opponent_shots: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl MatchState {
    pub fn new(mode: GameMode, difficulty: Difficulty, duration: f32) -> Self {
        Self {
            mode,
            difficulty,
            phase: MatchPhase::NotStarted,
            duration,
            remaining: duration,
            player_score: 0,
            opponent_score: 0,
            player_shots: 0,
            opponent_shots: 0,
            time_ticks: 0,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Opponent => self.opponent_score,
        }
    }

    pub fn add_points(&mut self, side: Side, points: u32) {
        match side {
            Side::Player => self.player_score = self.player_score.saturating_add(points),
            Side::Opponent => self.opponent_score = self.opponent_score.saturating_add(points),
        }
    }

    pub fn count_shot(&mut self, side: Side) {
        match side {
            Side::Player => self.player_shots = self.player_shots.saturating_add(1),
            Side::Opponent => self.opponent_shots = self.opponent_shots.saturating_add(1),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    pub fn summary(&self, rules: &MatchRules) -> MatchSummary {
        let outcome = match self.mode {
            GameMode::Practice => MatchOutcome::Practice(PracticeRating::from_score(
                self.player_score,
                self.duration,
                rules,
            )),
            GameMode::VsAi => {
                MatchOutcome::VsAi(VsAiResult::from_scores(self.player_score, self.opponent_score))
            }
        };
        MatchSummary {
            mode: self.mode,
            difficulty: self.difficulty,
            player_score: self.player_score,
            opponent_score: self.opponent_score,
            player_shots: self.player_shots,
            opponent_shots: self.opponent_shots,
            outcome,
        }
    }

    /// Zero the clock and scores, back to NotStarted
    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.difficulty, self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_thresholds() {
        let rules = MatchRules::default();
        assert_eq!(PracticeRating::from_score(0, 60.0, &rules), PracticeRating::TryAgain);
        assert_eq!(PracticeRating::from_score(14, 60.0, &rules), PracticeRating::TryAgain);
        assert_eq!(PracticeRating::from_score(15, 60.0, &rules), PracticeRating::Good);
        assert_eq!(PracticeRating::from_score(30, 60.0, &rules), PracticeRating::Great);
        assert_eq!(PracticeRating::from_score(50, 60.0, &rules), PracticeRating::Excellent);
        assert_eq!(PracticeRating::Excellent.stars(), 3);
    }

    #[test]
    fn test_rating_scales_with_duration() {
        let rules = MatchRules::default();
        // Half-length match halves the bar
        assert_eq!(PracticeRating::from_score(25, 30.0, &rules), PracticeRating::Excellent);
        assert_eq!(PracticeRating::from_score(15, 30.0, &rules), PracticeRating::Great);
        // Double length doubles it
        assert_eq!(PracticeRating::from_score(50, 120.0, &rules), PracticeRating::Good);
    }

    #[test]
    fn test_vs_ai_result() {
        assert_eq!(VsAiResult::from_scores(10, 8), VsAiResult::Win);
        assert_eq!(VsAiResult::from_scores(8, 10), VsAiResult::Lose);
        assert_eq!(VsAiResult::from_scores(9, 9), VsAiResult::Draw);
    }

    #[test]
    fn test_summary_and_reset() {
        let rules = MatchRules::default();
        let mut state = MatchState::new(GameMode::VsAi, Difficulty::Hard, 60.0);
        state.phase = MatchPhase::Ended;
        state.add_points(Side::Player, 7);
        state.add_points(Side::Opponent, 9);
        state.count_shot(Side::Player);

        let summary = state.summary(&rules);
        assert_eq!(summary.outcome, MatchOutcome::VsAi(VsAiResult::Lose));
        assert_eq!(summary.player_shots, 1);

        state.reset();
        assert_eq!(state.phase, MatchPhase::NotStarted);
        assert_eq!(state.score(Side::Opponent), 0);
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_points_saturate() {
        let mut state = MatchState::new(GameMode::Practice, Difficulty::Normal, 60.0);
        state.add_points(Side::Player, u32::MAX / 2 + 1);
        state.add_points(Side::Player, u32::MAX / 2 + 1);
        assert_eq!(state.score(Side::Player), u32::MAX);
        assert_eq!(state.score(Side::Opponent), 0);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("vsai"), Some(GameMode::VsAi));
        assert_eq!(GameMode::from_str("Practice"), Some(GameMode::Practice));
        assert_eq!(GameMode::from_str("pvp"), None);
    }
}
