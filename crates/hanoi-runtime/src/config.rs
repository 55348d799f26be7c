#![forbid(unsafe_code)]

//! Board and animator configuration.
//!
//! Settings are plain data that load from TOML or JSON at startup; every
//! field has a default, so a file only needs the values it changes.
//!
//! ```toml
//! # hanoi.toml
//! [board]
//! pegs = 4
//! discs = 8
//! seconds_per_move = 0.5
//!
//! [animator]
//! debounce_ms = 1000
//! lift_delay_ms = 0
//! three_peg_disc_limit = 20   # 0 disables the limit
//! ```
//!
//! ```rust,ignore
//! let settings = Settings::from_file("hanoi.toml")?.validated()?;
//! ```

use std::path::{Path, PathBuf};

use hanoi_core::DEFAULT_THREE_PEG_DISC_LIMIT;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::debounce::DEFAULT_QUIET_PERIOD;

/// Longest accepted duration of a single move.
pub const MAX_SECONDS_PER_MOVE: f64 = 3600.0;

/// Largest accepted disc count; split search recurses once per disc.
pub const MAX_DISCS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Board input
// ---------------------------------------------------------------------------

/// The three user-facing inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HanoiConfig {
    pub pegs: u32,
    pub discs: u32,
    pub seconds_per_move: f64,
}

impl Default for HanoiConfig {
    fn default() -> Self {
        Self {
            pegs: 3,
            discs: 5,
            seconds_per_move: 1.0,
        }
    }
}

impl HanoiConfig {
    #[must_use]
    pub fn new(pegs: u32, discs: u32, seconds_per_move: f64) -> Self {
        Self {
            pegs,
            discs,
            seconds_per_move,
        }
    }

    /// Duration of one move; zero for out-of-range input.
    #[must_use]
    pub fn per_move(&self) -> Duration {
        Duration::try_from_secs_f64(self.seconds_per_move).unwrap_or_default()
    }

    /// Every violated rule, one message each.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.pegs == 0 {
            errors.push("board.pegs must be at least 1".into());
        }
        if self.discs == 0 || self.discs > MAX_DISCS {
            errors.push(format!(
                "board.discs must be in [1, {MAX_DISCS}], got {}",
                self.discs
            ));
        }
        if !self.seconds_per_move.is_finite()
            || self.seconds_per_move < 0.0
            || self.seconds_per_move > MAX_SECONDS_PER_MOVE
        {
            errors.push(format!(
                "board.seconds_per_move must be in [0, {MAX_SECONDS_PER_MOVE}], got {}",
                self.seconds_per_move
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Animator tuning
// ---------------------------------------------------------------------------

/// Runtime tuning that is not part of the board input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Quiet period before a configuration change is applied.
    pub debounce_ms: u64,
    /// Pause between the structural transfer and the lift.
    pub lift_delay_ms: u64,
    /// Three-peg boards larger than this replay only this many discs.
    /// Zero disables the limit.
    pub three_peg_disc_limit: u32,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            lift_delay_ms: 0,
            three_peg_disc_limit: DEFAULT_THREE_PEG_DISC_LIMIT,
        }
    }
}

impl AnimatorConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn lift_delay(&self) -> Duration {
        Duration::from_millis(self.lift_delay_ms)
    }

    #[must_use]
    pub fn disc_limit(&self) -> Option<u32> {
        (self.three_peg_disc_limit > 0).then_some(self.three_peg_disc_limit)
    }
}

// ---------------------------------------------------------------------------
// Top-level settings
// ---------------------------------------------------------------------------

/// Everything loadable from a settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: HanoiConfig,
    pub animator: AnimatorConfig,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a settings file, picking the format from its extension.
    ///
    /// `.json` files parse as JSON; anything else parses as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = read(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.board.validate()
    }

    /// `self` if valid, otherwise every violation in one error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_empty());
        assert_eq!(settings.animator.debounce(), Duration::from_secs(1));
        assert_eq!(settings.animator.disc_limit(), Some(20));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str("[board]\npegs = 5\n").unwrap();
        assert_eq!(settings.board.pegs, 5);
        assert_eq!(settings.board.discs, HanoiConfig::default().discs);
        assert_eq!(settings.animator, AnimatorConfig::default());
    }

    #[test]
    fn full_toml() {
        let settings = Settings::from_toml_str(
            r#"
            [board]
            pegs = 4
            discs = 8
            seconds_per_move = 0.5

            [animator]
            debounce_ms = 250
            lift_delay_ms = 16
            three_peg_disc_limit = 0
            "#,
        )
        .unwrap();
        assert_eq!(settings.board, HanoiConfig::new(4, 8, 0.5));
        assert_eq!(settings.board.per_move(), Duration::from_millis(500));
        assert_eq!(settings.animator.debounce(), Duration::from_millis(250));
        assert_eq!(settings.animator.lift_delay(), Duration::from_millis(16));
        assert_eq!(settings.animator.disc_limit(), None);
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings::from_json_str(r#"{"board":{"discs":12}}"#).unwrap();
        assert_eq!(settings.board.discs, 12);
        assert_eq!(settings.board.pegs, 3);
    }

    #[test]
    fn validation_names_every_bad_field() {
        let config = HanoiConfig::new(0, 0, -1.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("board.pegs"));
        assert!(errors[1].contains("board.discs"));
        assert!(errors[2].contains("board.seconds_per_move"));
    }

    #[test]
    fn non_finite_duration_rejected() {
        assert!(!HanoiConfig::new(3, 3, f64::NAN).validate().is_empty());
        assert!(!HanoiConfig::new(3, 3, f64::INFINITY).validate().is_empty());
        assert_eq!(HanoiConfig::new(3, 3, f64::NAN).per_move(), Duration::ZERO);
    }

    #[test]
    fn disc_count_is_bounded() {
        assert!(HanoiConfig::new(3, MAX_DISCS, 1.0).validate().is_empty());
        assert_eq!(HanoiConfig::new(3, MAX_DISCS + 1, 1.0).validate().len(), 1);
    }

    #[test]
    fn zero_seconds_is_valid() {
        assert!(HanoiConfig::new(3, 3, 0.0).validate().is_empty());
    }

    #[test]
    fn validated_collects_errors() {
        let settings = Settings {
            board: HanoiConfig::new(3, 0, 1.0),
            ..Settings::default()
        };
        let err = settings.validated().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("validation errors: board.discs"));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            Settings::from_toml_str("[board]\npegs = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
