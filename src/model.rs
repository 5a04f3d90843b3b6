use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WIN_TARGET: u32 = 10_000;
pub const MAX_PLAYERS: usize = 6;
pub const DICE_PER_ROLL: usize = 6;

pub type Face = u8;

/// One applied scoring combination.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreLine {
    pub points: u32,
    pub label: String,
    pub used_indices: Vec<usize>,
}

/// Result of scoring one roll.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEvaluation {
    pub best_points: u32,
    pub best_used_indices: Vec<usize>, // ascending, unique
    pub lines: Vec<ScoreLine>,
    pub farkle: bool,
    pub hot_dice: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub total_score: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub win_target: u32,
    /// Refuse a bank that would overshoot `win_target`.
    pub exact_win: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings { win_target: DEFAULT_WIN_TARGET, exact_win: false }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub active_player_index: usize,
    pub current_dice: [Option<Face>; DICE_PER_ROLL],
    pub selected_indices: Vec<usize>,
    pub turn_subtotal: u32,
    pub available_dice_count: usize,
    pub last_roll: Vec<Face>,
    pub last_score_evaluation: Option<ScoreEvaluation>,
    pub settings: GameSettings,
    pub schema_version: u32,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            players: vec![],
            active_player_index: 0,
            current_dice: [None; DICE_PER_ROLL],
            selected_indices: vec![],
            turn_subtotal: 0,
            available_dice_count: DICE_PER_ROLL,
            last_roll: vec![],
            last_score_evaluation: None,
            settings: GameSettings::default(),
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Everything a UI layer can dispatch against a [`GameState`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Setup { players: Vec<String> },
    Roll,
    ToggleDie { index: usize },
    Bank,
    EndTurn,
    NewGame,
    LoadSaved { state: Box<GameState> },
    #[serde(other)]
    Unknown,
}
