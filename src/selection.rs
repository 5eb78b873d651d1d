use std::fmt;

use strum::IntoEnumIterator;

use crate::coord::Coord;
use crate::player::Player;
use crate::snapshot::Snapshot;
use crate::unit::UnitKind;


// Slot on a player's side panel. Slot 0 shows money; slots 1..7 stand for unit types and are
// used both to spawn and to research.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PanelSlot {
    Money,
    Unit(UnitKind),
}

impl PanelSlot {
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(PanelSlot::Money),
            _ => UnitKind::from_id(idx).map(PanelSlot::Unit),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            PanelSlot::Money => 0,
            PanelSlot::Unit(kind) => kind.id(),
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        std::iter::once(PanelSlot::Money).chain(UnitKind::iter().map(PanelSlot::Unit))
    }
}


// Anything on screen that can be clicked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CellRef {
    Board(Coord),
    Panel { player: Player, slot: PanelSlot },
    PhaseToggle(Player),
}

impl CellRef {
    // Cell ids: "<row>-<col>" for squares, "<player>-slot-<n>" for panel slots and
    // "<player>-phase" for phase toggles.
    pub fn from_cell_id(id: &str) -> Option<Self> {
        if let Some((player, rest)) = id.split_once('-') {
            if let Some(player) = Player::from_id(player) {
                if rest == "phase" {
                    return Some(CellRef::PhaseToggle(player));
                }
                let slot = rest.strip_prefix("slot-")?.parse().ok()?;
                return Some(CellRef::Panel { player, slot: PanelSlot::from_index(slot)? });
            }
        }
        Coord::from_cell_id(id).map(CellRef::Board)
    }

    pub fn to_cell_id(self) -> String {
        match self {
            CellRef::Board(coord) => coord.to_cell_id(),
            CellRef::Panel { player, slot } => format!("{}-slot-{}", player.to_id(), slot.index()),
            CellRef::PhaseToggle(player) => format!("{}-phase", player.to_id()),
        }
    }

    // Owner of the cell for the purpose of selecting it. Board squares belong to whoever has a
    // unit there; empty squares are nobody's.
    pub fn owner(self, snapshot: &Snapshot) -> Option<Player> {
        match self {
            CellRef::Board(coord) => snapshot.unit(coord).map(|u| u.unit.owner),
            CellRef::Panel { player, .. } | CellRef::PhaseToggle(player) => Some(player),
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_cell_id()) }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed(CellRef),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    // Input rejected, state unchanged.
    Ignored,
    // Idle -> Armed. The cell should glow.
    Armed(CellRef),
    // Single-click command (own phase toggle while idle). State stays Idle.
    Immediate(CellRef),
    // Armed -> Idle. Both cells lose their glow whatever the pair turns out to mean.
    Resolved { from: CellRef, to: CellRef },
}

impl Transition {
    pub fn released_cells(self) -> Vec<CellRef> {
        match self {
            Transition::Resolved { from, to } if from == to => vec![from],
            Transition::Resolved { from, to } => vec![from, to],
            Transition::Ignored | Transition::Armed(_) | Transition::Immediate(_) => vec![],
        }
    }
}

impl Selection {
    pub fn armed(&self) -> Option<CellRef> {
        match *self {
            Selection::Idle => None,
            Selection::Armed(cell) => Some(cell),
        }
    }

    // The only place selection state changes. Turn gating happens before this is called; the
    // validity of a resolved pair is decided by the action encoder and ultimately by the server.
    pub fn transition(&mut self, cell: CellRef, me: Player, snapshot: &Snapshot) -> Transition {
        match *self {
            Selection::Idle => {
                if cell.owner(snapshot) == Some(me.opponent()) {
                    Transition::Ignored
                } else if cell == CellRef::PhaseToggle(me) {
                    Transition::Immediate(cell)
                } else {
                    *self = Selection::Armed(cell);
                    Transition::Armed(cell)
                }
            }
            Selection::Armed(from) => {
                *self = Selection::Idle;
                Transition::Resolved { from, to: cell }
            }
        }
    }

    pub fn reset(&mut self) -> Option<CellRef> {
        let armed = self.armed();
        *self = Selection::Idle;
        armed
    }
}
