// View model for a board display. A `BoardView` is a plain value computed from the snapshot
// alone, so both the terminal and the browser client draw from the same data, and drawing the
// same snapshot twice draws the same thing.

use enum_map::EnumMap;

use crate::grid::Grid;
use crate::player::Player;
use crate::snapshot::{CityControl, Snapshot};
use crate::unit::{StatTable, Unit, UnitKind};


pub const UNKNOWN_STAT: &str = "?";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnitView {
    pub unit: Unit,
    pub health: i32,
    pub health_readout: String, // "<current>/<max>"
    pub attack: String,
    pub retaliation: String,
    pub move_ready: u8,
    pub attack_ready: u8,
    pub blessed: bool,
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct CellView {
    pub city: Option<CityControl>,
    pub unit: Option<UnitView>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PanelView {
    pub money: i32,
    pub research: EnumMap<UnitKind, bool>,
    pub costs: EnumMap<UnitKind, Option<i32>>,
    pub phase_label: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardView {
    pub player_to_move: Player,
    pub cells: Grid<CellView>,
    pub panels: EnumMap<Player, PanelView>,
}

impl PanelView {
    pub fn research_mark(&self, kind: UnitKind) -> char {
        if self.research[kind] { '✓' } else { '✗' }
    }
}

fn stat_text(table: &StatTable, kind: UnitKind) -> String {
    table.get(kind).map_or_else(|| UNKNOWN_STAT.to_owned(), |v| v.to_string())
}

pub fn phase_label(snapshot: &Snapshot, player: Player) -> String {
    let to_move = snapshot.player_to_move();
    if player == to_move {
        snapshot.phase().name().to_owned()
    } else {
        format!("It's {}'s turn...", to_move.name())
    }
}

pub fn render(snapshot: &Snapshot) -> BoardView {
    let stats = snapshot.stats();
    let cells = Grid::from_fn(|coord| CellView {
        city: snapshot.city(coord),
        unit: snapshot.unit(coord).map(|u| UnitView {
            unit: u.unit,
            health: u.health,
            health_readout: format!("{}/{}", u.health, stat_text(&stats.max_health, u.unit.kind)),
            attack: stat_text(&stats.attack, u.unit.kind),
            retaliation: stat_text(&stats.retaliation, u.unit.kind),
            move_ready: u.move_ready,
            attack_ready: u.attack_ready,
            blessed: u.blessed,
        }),
    });
    let panels = EnumMap::from_fn(|player| PanelView {
        money: snapshot.money(player),
        research: *snapshot.research(player),
        costs: EnumMap::from_fn(|kind| stats.cost.get(kind)),
        phase_label: phase_label(snapshot, player),
    });
    BoardView {
        player_to_move: snapshot.player_to_move(),
        cells,
        panels,
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::coord::Coord;
    use crate::test_util::{place_unit, starting_position, starting_position_json};

    #[test]
    fn render_is_idempotent() {
        let snapshot = starting_position();
        assert_eq!(render(&snapshot), render(&snapshot));
        assert_eq!(render(&snapshot), render(&snapshot.clone()));
    }

    #[test]
    fn unit_readouts() {
        let mut json = starting_position_json();
        place_unit(&mut json, Coord::from_zero_based(3, 2), -3, 1);
        json["retaliation"].as_object_mut().unwrap().remove("3");
        let view = render(&serde_json::from_value(json).unwrap());
        let defender = view.cells[Coord::from_zero_based(3, 2)].unit.clone().unwrap();
        assert_eq!(defender.unit, Unit::new(Player::Black, UnitKind::Defender));
        assert_eq!(defender.health, 1);
        assert_eq!(defender.health_readout, "1/3");
        assert_eq!(defender.attack, "1");
        assert_eq!(defender.retaliation, UNKNOWN_STAT);
        let empty = &view.cells[Coord::from_zero_based(0, 1)];
        assert_eq!(empty, &CellView::default());
        let city = &view.cells[Coord::from_zero_based(7, 7)];
        assert_eq!(city.city, Some(CityControl::Owned(Player::White)));
        assert_eq!(city.unit.as_ref().unwrap().health_readout, "2/2");
    }

    #[test]
    fn panels_use_own_money() {
        let mut json = starting_position_json();
        json["white_money"] = 7.into();
        json["black_money"] = 2.into();
        json["white_research"]["4"] = true.into();
        let view = render(&serde_json::from_value(json).unwrap());
        assert_eq!(view.panels[Player::White].money, 7);
        assert_eq!(view.panels[Player::Black].money, 2);
        assert_eq!(view.panels[Player::White].research_mark(UnitKind::Swordsman), '✓');
        assert_eq!(view.panels[Player::Black].research_mark(UnitKind::Swordsman), '✗');
        assert_eq!(view.panels[Player::Black].costs[UnitKind::Berserker], Some(4));
    }

    #[test]
    fn phase_labels() {
        let mut json = starting_position_json();
        json["economy_phase"] = true.into();
        let view = render(&serde_json::from_value(json.clone()).unwrap());
        assert_eq!(view.panels[Player::White].phase_label, "Economy");
        assert_eq!(view.panels[Player::Black].phase_label, "It's White's turn...");

        json["player_to_move"] = (-1).into();
        json["economy_phase"] = false.into();
        let view = render(&serde_json::from_value(json).unwrap());
        assert_eq!(view.panels[Player::Black].phase_label, "Command");
        assert_eq!(view.panels[Player::White].phase_label, "It's Black's turn...");
    }
}
