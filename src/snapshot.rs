use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::coord::Coord;
use crate::error::ClientError;
use crate::grid::Grid;
use crate::player::Player;
use crate::unit::{StatTable, TypeTable, Unit, UnitKind};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum CityControl {
    Neutral,
    Owned(Player),
}

impl TryFrom<i8> for CityControl {
    type Error = String;
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CityControl::Neutral),
            _ => Player::from_sign(value)
                .map(CityControl::Owned)
                .ok_or_else(|| format!("bad city value {value}")),
        }
    }
}

impl From<CityControl> for i8 {
    fn from(city: CityControl) -> i8 {
        match city {
            CityControl::Neutral => 0,
            CityControl::Owned(player) => player.sign(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Phase {
    Economy,
    Command,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Economy => "Economy",
            Phase::Command => "Command",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnitOnBoard {
    pub unit: Unit,
    pub health: i32,
    pub move_ready: u8,
    pub attack_ready: u8,
    pub blessed: bool,
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct UnitStats {
    pub max_health: StatTable,
    pub attack: StatTable,
    pub retaliation: StatTable,
    pub cost: StatTable,
}


// Full game state as last received from the server. Never patched locally: every successful
// round trip replaces it as a whole.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    player_to_move: Player,
    economy_phase: bool,
    money: EnumMap<Player, i32>,
    research: EnumMap<Player, EnumMap<UnitKind, bool>>,
    cities: Grid<Option<CityControl>>,
    units: Grid<Option<UnitOnBoard>>,
    stats: UnitStats,
}

impl Snapshot {
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        serde_json::from_str(body).map_err(|err| ClientError::ProtocolViolation(err.to_string()))
    }

    pub fn player_to_move(&self) -> Player { self.player_to_move }
    pub fn is_economy_phase(&self) -> bool { self.economy_phase }
    pub fn phase(&self) -> Phase {
        if self.economy_phase { Phase::Economy } else { Phase::Command }
    }
    pub fn money(&self, player: Player) -> i32 { self.money[player] }
    pub fn research(&self, player: Player) -> &EnumMap<UnitKind, bool> { &self.research[player] }
    pub fn has_researched(&self, player: Player, kind: UnitKind) -> bool {
        self.research[player][kind]
    }
    pub fn city(&self, coord: Coord) -> Option<CityControl> { self.cities[coord] }
    pub fn unit(&self, coord: Coord) -> Option<&UnitOnBoard> { self.units[coord].as_ref() }
    pub fn stats(&self) -> &UnitStats { &self.stats }

    pub fn units(&self) -> impl Iterator<Item = (Coord, &UnitOnBoard)> {
        self.units.iter().filter_map(|(coord, unit)| Some((coord, unit.as_ref()?)))
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self, String> {
        let mut units: Grid<Option<UnitOnBoard>> = Grid::default();
        for (coord, &code) in raw.pieces.iter() {
            let Some(unit) = Unit::from_code(code).map_err(|err| format!("at {coord}: {err}"))?
            else {
                continue;
            };
            let layer = |grid: &Option<Grid<u8>>| grid.as_ref().map_or(0, |grid| grid[coord]);
            units[coord] = Some(UnitOnBoard {
                unit,
                health: raw.piece_health[coord],
                move_ready: layer(&raw.move_ready),
                attack_ready: layer(&raw.attack_ready),
                blessed: layer(&raw.bless) != 0,
            });
        }
        let research_table = |values: &TypeTable<bool>| -> EnumMap<UnitKind, bool> {
            EnumMap::from_fn(|kind| values.get(kind).unwrap_or(false))
        };
        Ok(Snapshot {
            player_to_move: raw.player_to_move,
            economy_phase: raw.economy_phase,
            money: enum_map! {
                Player::White => raw.white_money,
                Player::Black => raw.black_money,
            },
            research: enum_map! {
                Player::White => research_table(&raw.white_research),
                Player::Black => research_table(&raw.black_research),
            },
            cities: raw.cities,
            units,
            stats: UnitStats {
                max_health: raw.max_health,
                attack: raw.attack,
                retaliation: raw.retaliation,
                cost: raw.cost,
            },
        })
    }

    fn to_raw(&self) -> RawSnapshot {
        let research_map = |player: Player| TypeTable::from_fn(|kind| Some(self.research[player][kind]));
        let layer = |f: fn(&UnitOnBoard) -> u8| {
            Some(self.units.map(|_, unit| unit.as_ref().map_or(0, f)))
        };
        RawSnapshot {
            player_to_move: self.player_to_move,
            economy_phase: self.economy_phase,
            black_money: self.money[Player::Black],
            white_money: self.money[Player::White],
            black_research: research_map(Player::Black),
            white_research: research_map(Player::White),
            cities: self.cities.clone(),
            pieces: self.units.map(|_, unit| unit.map_or(0, |u| u.unit.to_code())),
            piece_health: self.units.map(|_, unit| unit.map_or(0, |u| u.health)),
            max_health: self.stats.max_health.clone(),
            attack: self.stats.attack.clone(),
            retaliation: self.stats.retaliation.clone(),
            cost: self.stats.cost.clone(),
            move_ready: layer(|u| u.move_ready),
            attack_ready: layer(|u| u.attack_ready),
            bless: layer(|u| u.blessed.into()),
        }
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSnapshot::deserialize(deserializer)?;
        Snapshot::from_raw(raw).map_err(de::Error::custom)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

// Exactly what `GET /game/status` returns. Per-type tables are keyed by the type id, which
// JSON carries as a string, or indexed by it. Readiness and blessing layers are optional.
#[derive(Serialize, Deserialize)]
struct RawSnapshot {
    player_to_move: Player,
    economy_phase: bool,
    black_money: i32,
    white_money: i32,
    black_research: TypeTable<bool>,
    white_research: TypeTable<bool>,
    cities: Grid<Option<CityControl>>,
    pieces: Grid<i8>,
    piece_health: Grid<i32>,
    max_health: StatTable,
    attack: StatTable,
    retaliation: StatTable,
    #[serde(default, skip_serializing_if = "StatTable::is_empty")]
    cost: StatTable,
    #[serde(default)]
    move_ready: Option<Grid<u8>>,
    #[serde(default)]
    attack_ready: Option<Grid<u8>>,
    #[serde(default)]
    bless: Option<Grid<u8>>,
}
