use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::InputRejection;
use crate::internal_error_message;
use crate::player::Player;
use crate::selection::{CellRef, PanelSlot};
use crate::snapshot::Phase;
use crate::unit::UnitKind;


// Player intent produced from a completed input. Lives for one round trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    MoveAttack { from: Coord, to: Coord },
    Spawn { kind: UnitKind, to: Coord },
    Research(UnitKind),
    EndPhase,
}

// Encodes a resolved two-click pair. Only the shape of the pair is checked here: whether
// the move is legal is up to the server.
pub fn encode_pair(from: CellRef, to: CellRef, me: Player) -> Result<Action, InputRejection> {
    use CellRef::*;
    match (from, to) {
        (Board(a), Board(b)) => Ok(Action::MoveAttack { from: a, to: b }),
        (Board(_), Panel { .. } | PhaseToggle(_)) => Err(InputRejection::InvalidDestination),
        (Panel { player, .. }, _) if player != me => Err(InputRejection::OpponentCell),
        (Panel { slot, .. }, Board(b)) => match slot {
            PanelSlot::Unit(kind) => Ok(Action::Spawn { kind, to: b }),
            PanelSlot::Money => Err(InputRejection::NotSpawnable),
        },
        (Panel { slot, .. }, PhaseToggle(player)) if player == me => match slot {
            PanelSlot::Unit(kind) => Ok(Action::Research(kind)),
            // Slot 0 is never a research target: fall back to the plain toggle meaning.
            PanelSlot::Money => Ok(Action::EndPhase),
        },
        (Panel { .. }, _) if from == to => Err(InputRejection::Cancelled),
        (Panel { .. }, Panel { .. } | PhaseToggle(_)) => Err(InputRejection::InvalidDestination),
        (PhaseToggle(_), _) => Err(InputRejection::InvalidDestination),
    }
}

// Encodes a single-click command.
pub fn encode_immediate(cell: CellRef, me: Player) -> Result<Action, InputRejection> {
    match cell {
        CellRef::PhaseToggle(player) if player == me => Ok(Action::EndPhase),
        CellRef::PhaseToggle(_) | CellRef::Panel { .. } => Err(InputRejection::OpponentCell),
        CellRef::Board(_) => Err(InputRejection::InvalidDestination),
    }
}


// Origin of a targeted command: a square for move/attack or a unit type for spawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnSource {
    Square(Coord),
    Unit(UnitKind),
}

// Body of `POST /game/status`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusRequest {
    SetPhase { economy_phase: bool },
    Research { research: UnitKind },
    Target { t1: TurnSource, t2: Coord },
}

impl StatusRequest {
    // `phase` is the current phase of the player making the request.
    pub fn from_action(action: Action, phase: Phase) -> Self {
        match action {
            Action::MoveAttack { from, to } => {
                StatusRequest::Target { t1: TurnSource::Square(from), t2: to }
            }
            Action::Spawn { kind, to } => StatusRequest::Target { t1: TurnSource::Unit(kind), t2: to },
            Action::Research(kind) => StatusRequest::Research { research: kind },
            Action::EndPhase => StatusRequest::SetPhase { economy_phase: phase != Phase::Economy },
        }
    }

    pub fn to_body(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|err| panic!("{}", internal_error_message!("cannot serialize {self:?}: {err}")))
    }
}
