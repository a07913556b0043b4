//! Win detection for a started room.

use crate::connection::ConnectionId;
use crate::session::{Registry, SessionError, ROOM_CAPACITY};
use trigon_geometry::{overlap_ratio, Overlap, Precision};

/// A decided match.
#[derive(Debug, Clone, PartialEq)]
pub struct Victory {
    pub room: String,
    pub winner: String,
    pub winner_connection: ConnectionId,
    pub overlap: Overlap,
}

/// Decides whether the pin update from `initiator` ends the match.
///
/// A player wins when every sampled cell of the opponent's triangle lies
/// inside their own, and only a player with all three pins placed can win.
/// When both triangles cover each other the initiator wins.
///
/// Returns `Ok(None)` when the initiator is not in a started two-player room,
/// when neither player has a complete triangle, or when nobody encloses the
/// other. A shared bounding box without area is reported as
/// [`SessionError::DegenerateGeometry`].
pub fn evaluate(
    registry: &Registry,
    initiator: ConnectionId,
    precision: Precision,
) -> Result<Option<Victory>, SessionError> {
    let Some(player) = registry.player(initiator) else {
        return Ok(None);
    };
    let Some(room) = player.room.as_deref().and_then(|name| registry.room(name)) else {
        return Ok(None);
    };
    if !room.started || room.members.len() != ROOM_CAPACITY {
        return Ok(None);
    }
    let Some(opponent) = room
        .opponent_of(initiator)
        .and_then(|connection| registry.player(connection))
    else {
        return Ok(None);
    };

    if !player.pins.is_complete() && !opponent.pins.is_complete() {
        return Ok(None);
    }
    let (Some(own), Some(theirs)) = (player.pins.triangle(), opponent.pins.triangle()) else {
        return Ok(None);
    };

    let overlap = overlap_ratio(own.vertices(), theirs.vertices(), precision)?;

    // ratio_b is the share of the opponent's cells inside our triangle
    let initiator_encloses = player.pins.is_complete() && overlap.b_covered();
    let opponent_encloses = opponent.pins.is_complete() && overlap.a_covered();

    let winner = if initiator_encloses {
        player
    } else if opponent_encloses {
        opponent
    } else {
        return Ok(None);
    };

    Ok(Some(Victory {
        room: room.name.clone(),
        winner: winner.name.clone(),
        winner_connection: winner.connection,
        overlap,
    }))
}
