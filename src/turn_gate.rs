use crate::error::InputRejection;
use crate::player::Player;
use crate::snapshot::{Phase, Snapshot};


// Decides whether local input may be acted upon at all. Purely a function of the latest
// snapshot: the server is authoritative and re-checks everything anyway.
pub fn check(me: Player, snapshot: Option<&Snapshot>) -> Result<Phase, InputRejection> {
    let snapshot = snapshot.ok_or(InputRejection::NoSnapshot)?;
    if snapshot.player_to_move() != me {
        return Err(InputRejection::NotYourTurn);
    }
    Ok(snapshot.phase())
}
