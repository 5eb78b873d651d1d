use std::{array, ops};

use serde::{Deserialize, Serialize};

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};


const ROWS: usize = NUM_ROWS as usize;
const COLS: usize = NUM_COLS as usize;

// Serialized as a nested array, one inner array per row, which is how the server sends
// every per-square layer.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid<T> {
    data: [[T; COLS]; ROWS],
}

impl<T> Grid<T> {
    pub fn from_fn(mut f: impl FnMut(Coord) -> T) -> Self {
        Grid {
            data: array::from_fn(|row| {
                array::from_fn(|col| f(Coord::from_zero_based(row as u8, col as u8)))
            }),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Coord, &T) -> U) -> Grid<U> {
        Grid::from_fn(|coord| f(coord, &self[coord]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        Coord::all().map(|coord| (coord, &self[coord]))
    }
}

impl<T: Default> Default for Grid<T> {
    fn default() -> Self { Grid::from_fn(|_| T::default()) }
}

impl<T> ops::Index<Coord> for Grid<T> {
    type Output = T;
    fn index(&self, pos: Coord) -> &T {
        &self.data[pos.row.to_zero_based() as usize][pos.col.to_zero_based() as usize]
    }
}

impl<T> ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, pos: Coord) -> &mut T {
        &mut self.data[pos.row.to_zero_based() as usize][pos.col.to_zero_based() as usize]
    }
}
