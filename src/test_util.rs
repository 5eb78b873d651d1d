// Sample game states shared by unit tests, integration tests and the console client's offline
// printout. Built as JSON so that every sample goes through the same parser as server data.

use serde_json::{Value, json};

use crate::coord::Coord;
use crate::snapshot::Snapshot;


// The opening position: 14 cities, Black owns the top-left corner and White the bottom-right
// one, each with a single Basic unit on it. White moves first.
pub fn starting_position_json() -> Value {
    let n = Value::Null;
    let empty = || json!([0, 0, 0, 0, 0, 0, 0, 0]);
    let research = json!({
        "1": true, "2": false, "3": false, "4": false, "5": false, "6": false, "7": false,
    });
    json!({
        "player_to_move": 1,
        "economy_phase": false,
        "white_money": 0,
        "black_money": 1,
        "white_research": research.clone(),
        "black_research": research,
        "cities": [
            [-1, n, 0, n, n, n, n, 0],
            [n, n, n, n, 0, n, n, n],
            [0, n, 0, n, n, n, n, n],
            [n, n, n, n, n, n, 0, n],
            [n, 0, n, n, n, n, n, n],
            [n, n, n, n, n, 0, n, 0],
            [n, n, n, 0, n, n, n, n],
            [0, n, n, n, n, 0, n, 1],
        ],
        "pieces": [
            [-1, 0, 0, 0, 0, 0, 0, 0],
            empty(), empty(), empty(), empty(), empty(), empty(),
            [0, 0, 0, 0, 0, 0, 0, 1],
        ],
        "piece_health": [
            [2, 0, 0, 0, 0, 0, 0, 0],
            empty(), empty(), empty(), empty(), empty(), empty(),
            [0, 0, 0, 0, 0, 0, 0, 2],
        ],
        "move_ready": [
            empty(), empty(), empty(), empty(), empty(), empty(), empty(),
            [0, 0, 0, 0, 0, 0, 0, 1],
        ],
        "attack_ready": [
            empty(), empty(), empty(), empty(), empty(), empty(), empty(),
            [0, 0, 0, 0, 0, 0, 0, 1],
        ],
        "bless": [
            empty(), empty(), empty(), empty(), empty(), empty(), empty(), empty(),
        ],
        "max_health": { "1": 2, "2": 1, "3": 3, "4": 3, "5": 2, "6": 2, "7": 3 },
        "attack": { "1": 1, "2": 1, "3": 1, "4": 2, "5": 1, "6": 0, "7": 2 },
        "retaliation": { "1": 1, "2": 0, "3": 3, "4": 1, "5": 0, "6": 1, "7": 0 },
        "cost": { "1": 1, "2": 1, "3": 2, "4": 3, "5": 3, "6": 2, "7": 4 },
    })
}

// Puts a unit given by its signed piece code on the board (0 clears the square).
pub fn place_unit(json: &mut Value, coord: Coord, code: i8, health: i32) {
    let (row, col) = (coord.row.to_zero_based() as usize, coord.col.to_zero_based() as usize);
    json["pieces"][row][col] = code.into();
    json["piece_health"][row][col] = health.into();
}

pub fn starting_position() -> Snapshot {
    serde_json::from_value(starting_position_json()).expect("starting position must parse")
}
