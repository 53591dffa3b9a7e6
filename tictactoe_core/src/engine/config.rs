use crate::engine::Difficulty;
use crate::logic::board::MIN_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine settings that would let the heuristic or the search arithmetic
/// misrank positions.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("malformed engine config: {0}")]
    Json(String),
    #[error("heuristic weight {name} must not be negative, got {value}")]
    NegativeWeight { name: String, value: i32 },
    #[error("win score {win_score} must exceed {minimum}")]
    WinScoreTooLow { win_score: i32, minimum: i64 },
    #[error("heuristic can reach {bound}, which does not stay below win score {win_score}")]
    HeuristicOutranksWin { bound: i64, win_score: i32 },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Search depth caps by board size. `None` searches to the end of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthCaps {
    pub size_3: Option<u8>,
    pub size_4: Option<u8>,
    pub size_5: Option<u8>,
    pub larger: Option<u8>,
}

impl DepthCaps {
    #[must_use]
    pub const fn for_size(&self, size: usize) -> Option<u8> {
        match size {
            0..=3 => self.size_3,
            4 => self.size_4,
            5 => self.size_5,
            _ => self.larger,
        }
    }

    const fn hard() -> Self {
        Self {
            size_3: None,
            size_4: Some(4),
            size_5: Some(3),
            larger: Some(2),
        }
    }

    const fn impossible() -> Self {
        Self {
            size_3: None,
            size_4: Some(6),
            size_5: Some(4),
            larger: Some(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Terminal scoring: wins score win_score - depth.
    pub win_score: i32,

    // Static heuristic, per line
    pub weight_full_line: i32,
    pub weight_one_away: i32,
    pub weight_two_away: i32,

    // Medium tier
    pub optimal_play_chance: f64,

    // Search limits
    pub hard_depth: DepthCaps,
    pub impossible_depth: DepthCaps,
    pub time_limit_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_score: 10_000,

            weight_full_line: 1000,
            weight_one_away: 10,
            weight_two_away: 5,

            optimal_play_chance: 0.7,

            hard_depth: DepthCaps::hard(),
            impossible_depth: DepthCaps::impossible(),
            time_limit_ms: None,
        }
    }
}

#[derive(Deserialize)]
struct DepthCapsJson {
    size_3: Option<u8>,
    size_4: Option<u8>,
    size_5: Option<u8>,
    larger: Option<u8>,
}

#[derive(Deserialize)]
struct EngineConfigJson {
    win_score: Option<i32>,

    weight_full_line: Option<f32>,
    weight_one_away: Option<f32>,
    weight_two_away: Option<f32>,

    optimal_play_chance: Option<f64>,

    hard_depth: Option<DepthCapsJson>,
    impossible_depth: Option<DepthCapsJson>,
    time_limit_ms: Option<u64>,
}

impl EngineConfig {
    /// Loads overrides on top of the defaults. Heuristic weights are scale
    /// factors; depth caps are absolute with `0` meaning unlimited; anything
    /// missing keeps its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, or the error from
    /// [`EngineConfig::validate`] against the smallest board.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        let config = Self {
            win_score: json_config.win_score.unwrap_or(default.win_score),

            weight_full_line: apply_scale(default.weight_full_line, json_config.weight_full_line),
            weight_one_away: apply_scale(default.weight_one_away, json_config.weight_one_away),
            weight_two_away: apply_scale(default.weight_two_away, json_config.weight_two_away),

            optimal_play_chance: json_config
                .optimal_play_chance
                .map_or(default.optimal_play_chance, |p| p.clamp(0.0, 1.0)),

            hard_depth: apply_caps(default.hard_depth, json_config.hard_depth),
            impossible_depth: apply_caps(default.impossible_depth, json_config.impossible_depth),
            time_limit_ms: json_config.time_limit_ms.or(default.time_limit_ms),
        };
        config.validate(MIN_SIZE)?;
        Ok(config)
    }

    /// Checks that scores keep their order on a `size`×`size` board: every
    /// win outranks every heuristic value, and no sum can overflow.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a weight is negative, when `win_score`
    /// does not exceed the cell count plus one, or when the heuristic can
    /// reach the smallest win score.
    pub fn validate(&self, size: usize) -> Result<(), ConfigError> {
        for (name, value) in [
            ("weight_full_line", self.weight_full_line),
            ("weight_one_away", self.weight_one_away),
            ("weight_two_away", self.weight_two_away),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let size = i64::try_from(size).unwrap_or(i64::MAX);
        let cells = size.saturating_mul(size);
        let minimum = cells.saturating_add(1);
        let win_score = i64::from(self.win_score);
        if win_score <= minimum {
            return Err(ConfigError::WinScoreTooLow {
                win_score: self.win_score,
                minimum,
            });
        }

        // Positions scored at the cutoff never hold a completed line.
        let lines = size.saturating_mul(2).saturating_add(2);
        let per_line = i64::from(self.weight_one_away.max(self.weight_two_away));
        let bound = lines
            .saturating_mul(per_line)
            .max(i64::from(self.weight_full_line));
        if bound >= win_score - cells {
            return Err(ConfigError::HeuristicOutranksWin {
                bound,
                win_score: self.win_score,
            });
        }
        Ok(())
    }

    /// Depth cap the minimax tiers use for a board of `size`.
    #[must_use]
    pub const fn depth_cap(&self, difficulty: Difficulty, size: usize) -> Option<u8> {
        match difficulty {
            Difficulty::Hard => self.hard_depth.for_size(size),
            Difficulty::Impossible => self.impossible_depth.for_size(size),
            Difficulty::Easy | Difficulty::Medium => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

fn apply_caps(default: DepthCaps, overrides: Option<DepthCapsJson>) -> DepthCaps {
    let Some(overrides) = overrides else {
        return default;
    };
    let pick = |current: Option<u8>, value: Option<u8>| match value {
        Some(0) => None,
        Some(depth) => Some(depth),
        None => current,
    };
    DepthCaps {
        size_3: pick(default.size_3, overrides.size_3),
        size_4: pick(default.size_4, overrides.size_4),
        size_5: pick(default.size_5, overrides.size_5),
        larger: pick(default.larger, overrides.larger),
    }
}
