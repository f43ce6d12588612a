//! Scoring and win evaluation

use super::difficulty::DifficultySettings;
use super::state::{Ball, MatchOutcome, Score, Side, Surface};

/// Side that earns a point if the ball has left the court, else `None`.
/// Touching a paddle plane is not enough; the centre must pass the surface edge.
pub fn scoring_side(ball: &Ball, surface: &Surface) -> Option<Side> {
    if ball.pos.x > surface.width {
        Some(Side::Left)
    } else if ball.pos.x < 0.0 {
        Some(Side::Right)
    } else {
        None
    }
}

/// A point that was just scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointScored {
    pub side: Side,
    /// Set when this point ended the match
    pub outcome: Option<MatchOutcome>,
}

/// Award a point if the ball is out, re-serve, then check for a winner.
///
/// The winner is recorded here, at the scoring event, rather than inferred
/// later from where the ball happens to be.
pub fn check_scoring(
    ball: &mut Ball,
    score: &mut Score,
    surface: &Surface,
    difficulty: &DifficultySettings,
    score_to_win: u32,
) -> Option<PointScored> {
    let side = scoring_side(ball, surface)?;
    let total = score.award(side);
    ball.reset(surface, difficulty);

    let outcome = (total >= score_to_win).then_some(MatchOutcome {
        winner: side,
        score: *score,
    });
    Some(PointScored { side, outcome })
}
