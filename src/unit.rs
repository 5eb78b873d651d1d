use std::fmt;
use std::marker::PhantomData;

use enum_map::{Enum, EnumMap};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumIter, IntoEnumIterator};

use crate::player::Player;


// Unit type ids as used by the server. Names are for display only: the client never derives
// rules from the kind, all numbers come from the snapshot's stat tables.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum UnitKind {
    Basic,
    Runner,
    Defender,
    Swordsman,
    Archer,
    Support,
    Berserker,
}

impl UnitKind {
    pub fn id(self) -> u8 {
        match self {
            UnitKind::Basic => 1,
            UnitKind::Runner => 2,
            UnitKind::Defender => 3,
            UnitKind::Swordsman => 4,
            UnitKind::Archer => 5,
            UnitKind::Support => 6,
            UnitKind::Berserker => 7,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> { UnitKind::iter().find(|kind| kind.id() == id) }

    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Basic => "Basic",
            UnitKind::Runner => "Runner",
            UnitKind::Defender => "Defender",
            UnitKind::Swordsman => "Swordsman",
            UnitKind::Archer => "Archer",
            UnitKind::Support => "Support",
            UnitKind::Berserker => "Berserker",
        }
    }

    // Single letter for text boards; upper case for White, lower case for Black.
    pub fn to_letter(self, owner: Player) -> char {
        let ch = match self {
            UnitKind::Basic => 'B',
            UnitKind::Runner => 'R',
            UnitKind::Defender => 'D',
            UnitKind::Swordsman => 'S',
            UnitKind::Archer => 'A',
            UnitKind::Support => 'U',
            UnitKind::Berserker => 'Z',
        };
        match owner {
            Player::White => ch,
            Player::Black => ch.to_ascii_lowercase(),
        }
    }
}

impl TryFrom<u8> for UnitKind {
    type Error = String;
    fn try_from(id: u8) -> Result<Self, Self::Error> {
        UnitKind::from_id(id).ok_or_else(|| format!("unknown unit type {id}"))
    }
}

impl From<UnitKind> for u8 {
    fn from(kind: UnitKind) -> u8 { kind.id() }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Unit {
    pub owner: Player,
    pub kind: UnitKind,
}

impl Unit {
    pub fn new(owner: Player, kind: UnitKind) -> Self { Unit { owner, kind } }

    // Decodes a signed piece code: 0 is an empty square, the sign is the owner and the
    // magnitude is the unit type id.
    pub fn from_code(code: i8) -> Result<Option<Unit>, String> {
        if code == 0 {
            return Ok(None);
        }
        let owner = Player::from_sign(code.signum()).ok_or_else(|| format!("bad piece {code}"))?;
        let kind = UnitKind::try_from(code.unsigned_abs())?;
        Ok(Some(Unit { owner, kind }))
    }

    pub fn to_code(self) -> i8 { self.owner.sign() * self.kind.id() as i8 }
}


// Per-type table supplied by the server: stats, costs and research flags. The client treats
// the values as opaque. On the wire it is either an object keyed by type id or an array
// indexed by it; index 0 (basic, never tracked) is accepted and dropped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeTable<T>(EnumMap<UnitKind, Option<T>>);

pub type StatTable = TypeTable<i32>;

impl<T> Default for TypeTable<T> {
    fn default() -> Self { TypeTable(EnumMap::from_fn(|_| None)) }
}

impl<T: Copy> TypeTable<T> {
    pub fn from_fn(f: impl FnMut(UnitKind) -> Option<T>) -> Self { TypeTable(EnumMap::from_fn(f)) }

    pub fn get(&self, kind: UnitKind) -> Option<T> { self.0[kind] }
    pub fn is_empty(&self) -> bool { self.0.values().all(Option::is_none) }
}

impl<T> TypeTable<T> {
    fn insert(&mut self, id: u8, value: T) -> Result<(), String> {
        if id == 0 {
            return Ok(());
        }
        self.0[UnitKind::try_from(id)?] = Some(value);
        Ok(())
    }
}

impl<T: Serialize> Serialize for TypeTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0.iter().filter_map(|(kind, value)| Some((kind.id(), value.as_ref()?))),
        )
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TypeTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for TableVisitor<T> {
            type Value = TypeTable<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table keyed or indexed by unit type id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut table = TypeTable::default();
                while let Some((id, value)) = map.next_entry::<u8, T>()? {
                    table.insert(id, value).map_err(de::Error::custom)?;
                }
                Ok(table)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut table = TypeTable::default();
                let mut id = 0;
                while let Some(value) = seq.next_element::<T>()? {
                    table.insert(id, value).map_err(de::Error::custom)?;
                    id += 1;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_any(TableVisitor(PhantomData))
    }
}
