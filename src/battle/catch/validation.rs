use crate::battle::engine::validate_player_action;
use crate::battle::state::BattleSession;
use crate::errors::{CatchError, CatchResult};
use crate::inventory::InventoryLedger;
use crate::item_data::{ball_multiplier, get_item_data};

/// Validate a capture attempt and return the ball's multiplier if it may proceed.
///
/// The battle must be waiting for the player, the item must be a capture item,
/// and at least one must be held.
pub fn can_attempt_capture(
    session: Option<&BattleSession>,
    ledger: &InventoryLedger,
    ball_id: &str,
) -> CatchResult<f32> {
    validate_player_action(session)?;

    let item = get_item_data(ball_id).map_err(|_| CatchError::UnknownBall(ball_id.to_string()))?;
    let multiplier =
        ball_multiplier(item).ok_or_else(|| CatchError::NotABall(ball_id.to_string()))?;

    if !ledger.has_item(ball_id, 1) {
        return Err(CatchError::NoBallsLeft(ball_id.to_string()));
    }
    Ok(multiplier)
}
