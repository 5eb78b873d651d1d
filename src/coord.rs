use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Rows are counted from the top of the board: row 0 is rank 8 in algebraic notation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub const fn try_from_zero_based(idx: u8) -> Option<Self> {
        if idx < NUM_ROWS { Some(Self { idx }) } else { None }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let rank = ch.to_digit(10)?;
        if (1..=NUM_ROWS as u32).contains(&rank) {
            Some(Self::from_zero_based(NUM_ROWS - rank as u8))
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (b'0' + NUM_ROWS - self.idx) as char }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub const fn try_from_zero_based(idx: u8) -> Option<Self> {
        if idx < NUM_COLS { Some(Self { idx }) } else { None }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() {
            Self::try_from_zero_based(ch as u8 - b'a')
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (b'A' + self.idx) as char }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    pub const fn from_zero_based(row: u8, col: u8) -> Self {
        Self::new(Row::from_zero_based(row), Col::from_zero_based(col))
    }

    pub fn try_from_zero_based(row: u8, col: u8) -> Option<Self> {
        Some(Self::new(Row::try_from_zero_based(row)?, Col::try_from_zero_based(col)?))
    }

    // Algebraic name, e.g. "A8" for the top-left corner. Case-insensitive.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.trim().chars().collect_tuple()?;
        Some(Self::new(Row::from_algebraic(row)?, Col::from_algebraic(col)?))
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    // Cell id in the "<row>-<col>" form used by the board view. Row and column are parsed
    // separately: a destination must never collapse onto the diagonal.
    pub fn from_cell_id(id: &str) -> Option<Self> {
        let (row, col) = id.split_once('-')?;
        let row: u8 = row.trim().parse().ok()?;
        let col: u8 = col.trim().parse().ok()?;
        Self::try_from_zero_based(row, col)
    }

    pub fn to_cell_id(self) -> String {
        format!("{}-{}", self.row.to_zero_based(), self.col.to_zero_based())
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

impl TryFrom<[u8; 2]> for Coord {
    type Error = String;
    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Self::try_from_zero_based(row, col)
            .ok_or_else(|| format!("coordinate ({row}, {col}) is outside the board"))
    }
}

impl From<Coord> for [u8; 2] {
    fn from(coord: Coord) -> [u8; 2] { [coord.row.to_zero_based(), coord.col.to_zero_based()] }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row.to_zero_based(), self.col.to_zero_based())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_algebraic()) }
}
