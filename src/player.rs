use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


// On the wire a side is encoded by its sign: +1 for White, -1 for Black.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "i8", into = "i8")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Player::White),
            -1 => Some(Player::Black),
            _ => None,
        }
    }

    // Stable lowercase form used in cell ids and on the command line.
    pub fn to_id(self) -> &'static str {
        match self {
            Player::White => "white",
            Player::Black => "black",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "white" | "w" => Some(Player::White),
            "black" | "b" => Some(Player::Black),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::White => "White",
            Player::Black => "Black",
        }
    }
}

impl TryFrom<i8> for Player {
    type Error = String;
    fn try_from(sign: i8) -> Result<Self, Self::Error> {
        Player::from_sign(sign).ok_or_else(|| format!("expected player +1 or -1, got {sign}"))
    }
}

impl From<Player> for i8 {
    fn from(player: Player) -> i8 { player.sign() }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
