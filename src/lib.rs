#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod action;
pub mod client;
pub mod coord;
pub mod error;
pub mod grid;
pub mod player;
pub mod render;
pub mod selection;
pub mod snapshot;
pub mod sync;
pub mod test_util;
pub mod turn_gate;
pub mod unit;
