//! # farkle_engine
//!
//! Rules engine for the dice game Farkle. [`rules::score_roll`] finds the
//! best-scoring partition of a roll; [`reduce`] drives a turn-based game from
//! it, one [`Action`] at a time, always handing back a fresh [`GameState`].
//!
//! ```
//! use farkle_engine::{initial_state, reduce, Action, GameSettings};
//!
//! let state = initial_state(&["Alice", "Bob"], GameSettings::default()).unwrap();
//! let mut roller = |n: usize| -> Vec<u8> { vec![2, 3, 4, 6, 2, 3][..n].to_vec() };
//! let next = reduce(&state, &Action::Roll, &mut roller).unwrap();
//! // nothing scored: Alice farkled and it is Bob's turn
//! assert_eq!(next.active_player_index, 1);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod rng;
pub mod rules;

pub use error::EngineError;
pub use model::*;
pub use rng::{DiceRoller, SeededRoller};
pub use rules::score_roll;

use tracing::{debug, info, warn};

fn normalize_players<S: AsRef<str>>(names: &[S]) -> Vec<PlayerState> {
    names.iter().enumerate().map(|(i, name)| {
        let name = name.as_ref().trim();
        PlayerState {
            name: if name.is_empty() { format!("Player {}", i + 1) } else { name.to_string() },
            total_score: 0,
        }
    }).collect()
}

fn current_dice_from(roll: &[Face]) -> [Option<Face>; DICE_PER_ROLL] {
    let mut out = [None; DICE_PER_ROLL];
    for (slot, &face) in out.iter_mut().zip(roll) { *slot = Some(face); }
    out
}

/// Shared by farkle, BANK and END_TURN: clear the dice and pass the turn on.
fn end_turn(state: GameState) -> GameState {
    let active_player_index = if state.players.is_empty() {
        state.active_player_index
    } else {
        (state.active_player_index + 1) % state.players.len()
    };
    GameState {
        active_player_index,
        turn_subtotal: 0,
        selected_indices: vec![],
        available_dice_count: DICE_PER_ROLL,
        current_dice: [None; DICE_PER_ROLL],
        last_roll: vec![],
        last_score_evaluation: None,
        ..state
    }
}

fn selected_values(state: &GameState, indices: &[usize]) -> Option<Vec<Face>> {
    indices.iter().map(|&i| {
        if i >= state.last_roll.len() { return None; }
        state.current_dice.get(i).copied().flatten()
    }).collect()
}

/// 0 for an empty selection or one that leaves a selected die unscored.
fn selected_score(state: &GameState, indices: &[usize]) -> u32 {
    selected_values(state, indices).map_or(0, |values| rules::selection_points(&values))
}

/// Fresh game with zeroed scores. No names gives a lobby state waiting for
/// [`Action::Setup`].
pub fn initial_state<S: AsRef<str>>(names: &[S], settings: GameSettings) -> Result<GameState, EngineError> {
    if names.len() > MAX_PLAYERS {
        return Err(EngineError::InvalidPlayerCount { count: names.len() });
    }
    if settings.win_target == 0 {
        return Err(EngineError::InvalidWinTarget { target: 0 });
    }
    Ok(GameState { players: normalize_players(names), settings, ..GameState::default() })
}

/// Apply one action. Rejected actions come back as `Ok` with a state equal
/// to the input; `Err` means the roller broke its contract.
pub fn reduce<R>(state: &GameState, action: &Action, roller: &mut R) -> Result<GameState, EngineError>
where
    R: DiceRoller + ?Sized,
{
    match action {
        Action::Setup { players } => {
            let players = normalize_players(players.as_slice());
            if players.is_empty() || players.len() > MAX_PLAYERS {
                debug!(count = players.len(), "setup rejected");
                return Ok(state.clone());
            }
            info!(count = players.len(), "game set up");
            Ok(GameState { players, settings: state.settings, ..GameState::default() })
        }

        Action::Roll => roll(state, roller),

        Action::ToggleDie { index } => Ok(toggle_die(state, *index)),

        Action::Bank => Ok(bank(state)),

        Action::EndTurn => {
            debug!(player = state.active_player_index, "turn ended");
            Ok(end_turn(state.clone()))
        }

        Action::NewGame => {
            let players = state.players.iter()
                .map(|p| PlayerState { total_score: 0, ..p.clone() })
                .collect();
            info!("new game");
            Ok(GameState { players, settings: state.settings, ..GameState::default() })
        }

        Action::LoadSaved { state: saved } => {
            info!(saved_version = saved.schema_version, "loaded saved game");
            Ok(GameState { schema_version: SCHEMA_VERSION, ..(**saved).clone() })
        }

        Action::Unknown => Ok(state.clone()),
    }
}

fn roll<R: DiceRoller + ?Sized>(state: &GameState, roller: &mut R) -> Result<GameState, EngineError> {
    if state.players.is_empty() { return Ok(state.clone()); }

    let mut working = state.clone();
    if !state.last_roll.is_empty() {
        let pending = selected_score(state, &state.selected_indices);
        if pending == 0 {
            debug!(selected = ?state.selected_indices, "roll rejected: selection does not score");
            return Ok(state.clone());
        }
        working.turn_subtotal = working.turn_subtotal.saturating_add(pending);
        working.selected_indices.clear();
    }

    let requested = if working.available_dice_count == 0 { DICE_PER_ROLL } else { working.available_dice_count };
    let faces = roller.roll(requested);
    if faces.len() != requested {
        warn!(requested, returned = faces.len(), "roller broke its contract");
        return Err(EngineError::RollerContract { requested, returned: faces.len() });
    }
    if let Err(err) = rules::validate_faces(&faces) {
        warn!(?faces, "roller returned an invalid face");
        return Err(err);
    }

    let evaluation = rules::score_roll(&faces);
    debug!(player = working.active_player_index, requested, ?faces, best = evaluation.best_points, "rolled");
    let farkle = evaluation.farkle;
    let rolled = GameState {
        current_dice: current_dice_from(&faces),
        selected_indices: vec![],
        last_roll: faces,
        last_score_evaluation: Some(evaluation),
        available_dice_count: requested,
        ..working
    };

    if farkle {
        info!(player = rolled.active_player_index, forfeited = rolled.turn_subtotal, "farkle");
        return Ok(end_turn(GameState { turn_subtotal: 0, ..rolled }));
    }
    Ok(rolled)
}

fn toggle_die(state: &GameState, index: usize) -> GameState {
    if state.last_roll.is_empty() || index >= state.last_roll.len() { return state.clone(); }

    let mut next: Vec<usize> = state.selected_indices.clone();
    if next.contains(&index) { next.retain(|&i| i != index); } else { next.push(index); }
    next.sort_unstable();
    next.dedup();

    if next.is_empty() {
        return GameState {
            selected_indices: next,
            available_dice_count: state.last_roll.len(),
            ..state.clone()
        };
    }

    let points = selected_score(state, &next);
    if points == 0 {
        debug!(index, selected = ?next, "toggle rejected");
        return state.clone();
    }
    debug!(index, selected = ?next, points, "toggle accepted");
    GameState {
        available_dice_count: state.last_roll.len() - next.len(),
        selected_indices: next,
        ..state.clone()
    }
}

fn bank(state: &GameState) -> GameState {
    if state.players.is_empty() { return state.clone(); }

    let amount = state.turn_subtotal.saturating_add(selected_score(state, &state.selected_indices));
    let settings = state.settings;
    let mut players = state.players.clone();
    if let Some(active) = players.get_mut(state.active_player_index) {
        let tentative = active.total_score.saturating_add(amount);
        if !settings.exact_win || tentative <= settings.win_target {
            active.total_score = tentative;
            info!(player = state.active_player_index, amount, total = tentative, "banked");
        } else {
            info!(player = state.active_player_index, amount, target = settings.win_target, "bank refused: overshoots target");
        }
    }
    end_turn(GameState { players, ..state.clone() })
}

impl GameState {
    pub fn active_player(&self) -> Option<&PlayerState> {
        self.players.get(self.active_player_index)
    }

    /// Score of the current selection, 0 if it is empty or not cleanly scorable.
    pub fn pending_points(&self) -> u32 {
        selected_score(self, &self.selected_indices)
    }

    /// What BANK would add right now.
    pub fn turn_points(&self) -> u32 {
        self.turn_subtotal.saturating_add(self.pending_points())
    }

    pub fn can_roll(&self) -> bool {
        !self.players.is_empty() && (self.last_roll.is_empty() || self.pending_points() > 0)
    }

    pub fn can_bank(&self) -> bool {
        !self.players.is_empty() && self.turn_points() > 0
    }

    /// Index of the player who reached the target. With `exact_win` only an
    /// exact hit counts. Highest score wins, earliest seat breaks ties.
    pub fn winner(&self) -> Option<usize> {
        let target = self.settings.win_target;
        self.players.iter().enumerate()
            .filter(|(_, p)| if self.settings.exact_win { p.total_score == target } else { p.total_score >= target })
            .max_by(|(ia, a), (ib, b)| a.total_score.cmp(&b.total_score).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }

    pub fn is_finished(&self) -> bool { self.winner().is_some() }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a saved game and stamp it with the current schema version.
    /// Older schemas are not migrated.
    pub fn from_json(json: &str) -> Result<GameState, EngineError> {
        let saved: GameState = serde_json::from_str(json)?;
        rules::validate_faces(&saved.last_roll)?;
        let dice: Vec<Face> = saved.current_dice.iter().flatten().copied().collect();
        rules::validate_faces(&dice)?;
        Ok(GameState { schema_version: SCHEMA_VERSION, ..saved })
    }
}
