//! Simulation tick
//!
//! One call advances the match by exactly one frame. Order matters:
//! physics, then paddle collision, then scoring, then the win check.

use super::fsm::GameEvent;
use super::state::{GameState, MatchOutcome, Side};
use super::{ai, collision, scoring};
use crate::error::SimError;

/// What happened during a tick (drives sounds and logging)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// False when the game was not playing and nothing was simulated
    pub ticked: bool,
    pub wall_hit: bool,
    pub paddle_hit: Option<Side>,
    /// Side that scored this tick
    pub point: Option<Side>,
    /// Set on the tick that ended the match
    pub outcome: Option<MatchOutcome>,
}

/// Advance the game state by one tick.
///
/// Does nothing unless the state machine is in PLAYING. Returns an error if
/// any entity ends the tick with a non-finite value.
pub fn tick(state: &mut GameState) -> Result<TickEvents, SimError> {
    let mut events = TickEvents::default();
    if !state.machine.is_playing() {
        return Ok(events);
    }
    events.ticked = true;
    state.time_ticks += 1;

    let difficulty = state.difficulty_settings();

    // Physics
    collision::integrate(&mut state.ball);
    events.wall_hit = collision::reflect_walls(&mut state.ball, &state.surface);
    state.paddle_one.apply_direction(&state.surface);
    ai::track_ball(&mut state.paddle_two, &state.ball, &state.surface);

    // Collision
    if let Some(contact) = collision::resolve_paddles(
        &mut state.ball,
        &state.paddle_one,
        &state.paddle_two,
        &state.surface,
        difficulty.factor,
    ) {
        if contact.hit {
            events.paddle_hit = Some(contact.side);
        }
        ai::redraw_speed(&mut state.paddle_two, &mut *state.roll, difficulty.factor);
    }

    // Scoring and win check
    if let Some(point) = scoring::check_scoring(
        &mut state.ball,
        &mut state.score,
        &state.surface,
        &difficulty,
        state.settings.score_to_win,
    ) {
        events.point = Some(point.side);
        log::debug!(
            "Point to {:?} ({}:{})",
            point.side,
            state.score.left,
            state.score.right
        );

        if let Some(outcome) = point.outcome {
            let event = if outcome.player_won() {
                GameEvent::Win
            } else {
                GameEvent::Lose
            };
            if state.machine.transition(event) {
                state.outcome = Some(outcome);
                events.outcome = Some(outcome);
            }
        }
    }

    state.check_finite()?;
    Ok(events)
}
