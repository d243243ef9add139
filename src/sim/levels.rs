//! Per-level difficulty table

/// Level that ends the run with a celebration instead of normal progression
pub const MILESTONE_LEVEL: u32 = 42;

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    /// Scroll speed in px per reference frame
    pub scroll_speed: f32,
    /// Countdown between timed rock rolls (ms)
    pub obstacle_interval_ms: f32,
    /// Banner shown when the level starts
    pub description: &'static str,
}

const LEVELS: [LevelConfig; 6] = [
    LevelConfig {
        scroll_speed: 3.0,
        obstacle_interval_ms: 120.0,
        description: "Beginner level - Avoid craters and rocks.",
    },
    LevelConfig {
        scroll_speed: 3.5,
        obstacle_interval_ms: 110.0,
        description: "High UFOs appear!",
    },
    LevelConfig {
        scroll_speed: 4.0,
        obstacle_interval_ms: 100.0,
        description: "Mid-level UFOs appear!",
    },
    LevelConfig {
        scroll_speed: 4.5,
        obstacle_interval_ms: 90.0,
        description: "Enemy buggies attack from behind!",
    },
    LevelConfig {
        scroll_speed: 5.0,
        obstacle_interval_ms: 80.0,
        description: "Low UFOs with precision bombing!",
    },
    LevelConfig {
        scroll_speed: 5.5,
        obstacle_interval_ms: 70.0,
        description: "More land mines!",
    },
];

/// Description for levels past the end of the table
const LATE_DESCRIPTION: &str = "Difficulty increases!";

/// Configuration for a 1-based level. Levels past the table reuse its last row.
pub fn level_config(level: u32) -> LevelConfig {
    let idx = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    let mut config = LEVELS[idx];
    if level as usize > LEVELS.len() {
        config.description = LATE_DESCRIPTION;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(level_config(1).scroll_speed, 3.0);
        assert_eq!(level_config(4).obstacle_interval_ms, 90.0);
        assert_eq!(level_config(0), level_config(1));
    }

    #[test]
    fn test_late_levels_reuse_last_row() {
        let late = level_config(20);
        assert_eq!(late.scroll_speed, 5.5);
        assert_eq!(late.description, "Difficulty increases!");
    }

    #[test]
    fn test_scroll_speed_non_decreasing() {
        for level in 1..MILESTONE_LEVEL {
            assert!(level_config(level + 1).scroll_speed >= level_config(level).scroll_speed);
        }
    }
}
