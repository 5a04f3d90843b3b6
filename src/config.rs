//! Game settings construction, including `FARKLE_*` environment overrides.

use crate::error::EngineError;
use crate::model::{GameSettings, DEFAULT_WIN_TARGET};

pub const ENV_WIN_TARGET: &str = "FARKLE_WIN_TARGET";
pub const ENV_EXACT_WIN: &str = "FARKLE_EXACT_WIN";

impl GameSettings {
    pub fn new(win_target: u32, exact_win: bool) -> Result<Self, EngineError> {
        if win_target == 0 {
            return Err(EngineError::InvalidWinTarget { target: win_target });
        }
        Ok(GameSettings { win_target, exact_win })
    }

    /// Read `FARKLE_WIN_TARGET` (default 10000) and `FARKLE_EXACT_WIN`
    /// (default false). Unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let win_target = lookup(ENV_WIN_TARGET)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&t| t > 0)
            .unwrap_or(DEFAULT_WIN_TARGET);
        let exact_win = lookup(ENV_EXACT_WIN)
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        GameSettings { win_target, exact_win }
    }
}
