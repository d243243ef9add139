//! Score and level progress

use serde::{Deserialize, Serialize};

use super::terrain::{SECTION_WIDTH, SECTIONS_PER_LEVEL, section_label};

/// Scroll distance covered by one full level
pub const LEVEL_LENGTH: f32 = SECTION_WIDTH * SECTIONS_PER_LEVEL as f32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: u64,
    level: u32,
    /// Percent of the current level covered, 0..=100
    progress: f32,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::at(1, 0.0)
    }
}

impl ScoreLedger {
    /// Ledger positioned at `level` with `progress` percent done
    pub fn at(level: u32, progress: f32) -> Self {
        Self {
            score: 0,
            level: level.max(1),
            progress: progress.clamp(0.0, 100.0),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_progress(&self) -> f32 {
        self.progress
    }

    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Credit scrolled distance toward the current level
    pub fn advance(&mut self, distance: f32) {
        if distance > 0.0 {
            self.progress = (self.progress + distance / LEVEL_LENGTH * 100.0).min(100.0);
        }
    }

    pub fn is_level_complete(&self) -> bool {
        self.progress >= 100.0
    }

    /// Move to the next level. Returns the new level.
    pub fn complete_level(&mut self) -> u32 {
        self.level += 1;
        self.progress = 0.0;
        self.level
    }

    /// Section letter for the current progress
    pub fn section_label(&self) -> char {
        let idx = ((self.progress / 100.0) * SECTIONS_PER_LEVEL as f32) as u32;
        section_label(idx.min(SECTIONS_PER_LEVEL - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_caps_at_100() {
        let mut ledger = ScoreLedger::default();
        ledger.advance(LEVEL_LENGTH * 2.0);
        assert_eq!(ledger.level_progress(), 100.0);
        assert!(ledger.is_level_complete());
        assert_eq!(ledger.complete_level(), 2);
        assert_eq!(ledger.level_progress(), 0.0);
    }

    #[test]
    fn test_sections_follow_progress() {
        let mut ledger = ScoreLedger::default();
        assert_eq!(ledger.section_label(), 'A');
        ledger.advance(SECTION_WIDTH * 3.5);
        assert_eq!(ledger.section_label(), 'D');
        ledger.advance(LEVEL_LENGTH);
        assert_eq!(ledger.section_label(), 'L');
    }

    #[test]
    fn test_score_monotonic() {
        let mut ledger = ScoreLedger::default();
        ledger.add(20);
        ledger.add(0);
        ledger.add(150);
        assert_eq!(ledger.score(), 170);
        ledger.advance(-10.0);
        assert_eq!(ledger.level_progress(), 0.0);
    }
}
