use std::collections::HashSet;

use citywar::coord::{Col, Coord, Row};
use citywar::player::Player;
use citywar::render::{BoardView, CellView, PanelView};
use citywar::selection::{CellRef, PanelSlot};
use citywar::snapshot::CityControl;
use citywar::sync::BoardRenderer;
use citywar::unit::UnitKind;
use console::Style;
use itertools::Itertools;
use strum::IntoEnumIterator;


const TOP: &str = "┏━━━━━┳━━━━━┳━━━━━┳━━━━━┳━━━━━┳━━━━━┳━━━━━┳━━━━━┓";
const MIDDLE: &str = "┣━━━━━╋━━━━━╋━━━━━╋━━━━━╋━━━━━╋━━━━━╋━━━━━╋━━━━━┫";
const BOTTOM: &str = "┗━━━━━┻━━━━━┻━━━━━┻━━━━━┻━━━━━┻━━━━━┻━━━━━┻━━━━━┛";

// Five characters: unit letter, health, readiness (or blessing mark followed by readiness)
// and city mark. E.g. "B2! □" is a White Basic with 2 health that can move, on a White city.
pub fn render_tile(cell: &CellView) -> String {
    let mut tile = String::new();
    match cell.unit {
        Some(ref unit) => {
            tile.push(unit.unit.kind.to_letter(unit.unit.owner));
            if unit.health == 0 {
                tile.push(' ');
            } else {
                tile.push_str(&unit.health.to_string());
            }
            let readiness = match (unit.move_ready, unit.attack_ready) {
                (2.., _) => '‼',
                (1, _) => '!',
                (_, 1..) => '.',
                _ => ' ',
            };
            if unit.blessed {
                tile.push('*');
                tile.push(readiness);
            } else {
                tile.push(readiness);
                tile.push(' ');
            }
        }
        None => tile.push_str("    "),
    }
    tile.push(match cell.city {
        None => ' ',
        Some(CityControl::Neutral) => '◈',
        Some(CityControl::Owned(Player::Black)) => '■',
        Some(CityControl::Owned(Player::White)) => '□',
    });
    tile
}

pub fn render_grid(view: &BoardView, armed: &HashSet<CellRef>) -> String {
    let highlight = Style::new().reverse();
    let col_header = Col::all().map(|col| format!("  {}   ", col.to_algebraic())).join("");
    let mut lines = vec![format!("   {col_header}"), format!("  {TOP}")];
    for row in Row::all() {
        let tiles = Col::all()
            .map(|col| {
                let coord = Coord::new(row, col);
                let tile = render_tile(&view.cells[coord]);
                if armed.contains(&CellRef::Board(coord)) {
                    highlight.apply_to(tile).to_string()
                } else {
                    tile
                }
            })
            .join("┃");
        lines.push(format!("{} ┃{tiles}┃", row.to_algebraic()));
        if row.to_zero_based() + 1 < citywar::coord::NUM_ROWS {
            lines.push(format!("  {MIDDLE}"));
        }
    }
    lines.push(format!("  {BOTTOM}"));
    lines.join("\n")
}

fn render_panel(player: Player, panel: &PanelView, to_move: bool) -> String {
    let label_style = if to_move { Style::new().green().bold() } else { Style::new().dim() };
    let research = UnitKind::iter()
        .map(|kind| format!("{}{}", kind.to_letter(player), panel.research_mark(kind)))
        .join(" ");
    let costs = UnitKind::iter()
        .map(|kind| match panel.costs[kind] {
            Some(cost) => format!("{}:{cost}", kind.to_letter(player)),
            None => format!("{}:?", kind.to_letter(player)),
        })
        .join(" ");
    format!(
        "{}  money: {}  {}\n  research: {research}\n  costs:    {costs}",
        player.name(),
        panel.money,
        label_style.apply_to(&panel.phase_label),
    )
}

pub fn render_sideboard(view: &BoardView) -> String {
    Player::iter()
        .map(|player| render_panel(player, &view.panels[player], player == view.player_to_move))
        .join("\n")
}

pub fn describe_cell(cell: CellRef) -> String {
    match cell {
        CellRef::Board(coord) => coord.to_algebraic(),
        CellRef::Panel { player, slot: PanelSlot::Money } => format!("{} money slot", player.name()),
        CellRef::Panel { player, slot: PanelSlot::Unit(kind) } => {
            format!("{} {} slot", player.name(), kind.name())
        }
        CellRef::PhaseToggle(player) => format!("{} phase toggle", player.name()),
    }
}

// Terminal counterpart of the browser board: prints a fresh board for every snapshot.
pub struct TuiBoard {
    view: Option<BoardView>,
    armed: HashSet<CellRef>,
}

impl TuiBoard {
    pub fn new() -> Self { TuiBoard { view: None, armed: HashSet::new() } }

    pub fn print_board(&self) {
        match self.view {
            Some(ref view) => println!("{}", render_grid(view, &self.armed)),
            None => println!("Loading..."),
        }
    }

    pub fn print_sideboard(&self) {
        if let Some(ref view) = self.view {
            println!("{}", render_sideboard(view));
        }
    }
}

impl BoardRenderer for TuiBoard {
    fn render(&mut self, view: &BoardView) {
        self.view = Some(view.clone());
        self.print_board();
        self.print_sideboard();
    }

    fn set_armed(&mut self, cell: CellRef, armed: bool) {
        if armed {
            println!("Selected {}", describe_cell(cell));
            self.armed.insert(cell);
        } else {
            self.armed.remove(&cell);
        }
    }
}
