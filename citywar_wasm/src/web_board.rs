use std::collections::HashMap;

use citywar::coord::{Col, Coord, Row};
use citywar::player::Player;
use citywar::render::{BoardView, CellView, PanelView};
use citywar::selection::{CellRef, PanelSlot};
use citywar::snapshot::CityControl;
use strum::IntoEnumIterator;

use crate::rust_error;
use crate::web_document::WebDocument;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


const ARMED_CLASS: &str = "armed";

// Board and both side panels. Every clickable element gets its cell id as DOM id and is kept
// in `elements`, so updates never look elements up by position in the tree.
pub struct WebBoard {
    doc: WebDocument,
    elements: HashMap<CellRef, web_sys::Element>,
}

impl WebBoard {
    // Clears `container` and builds the skeleton: opponent's panel on top, own panel at the
    // bottom.
    pub fn build(doc: WebDocument, container: &web_sys::Element, me: Player) -> JsResult<Self> {
        container.remove_all_children();
        let mut elements = HashMap::new();
        build_panel(&doc, container, me.opponent(), &mut elements)?;
        let table = container.append_new_element(&doc, "table")?.with_classes(["board"])?;
        for row in Row::all() {
            let tr = table.append_new_element(&doc, "tr")?;
            for col in Col::all() {
                let cell = CellRef::Board(Coord::new(row, col));
                let td = tr
                    .append_new_element(&doc, "td")?
                    .with_id(&cell.to_cell_id())
                    .with_classes(["cell"])?;
                elements.insert(cell, td);
            }
        }
        build_panel(&doc, container, me, &mut elements)?;
        Ok(WebBoard { doc, elements })
    }

    fn element(&self, cell: CellRef) -> JsResult<&web_sys::Element> {
        self.elements.get(&cell).ok_or_else(|| rust_error!("No element for cell {}", cell))
    }

    pub fn render(&self, view: &BoardView) -> JsResult<()> {
        for row in Row::all() {
            for col in Col::all() {
                let coord = Coord::new(row, col);
                self.render_cell(self.element(CellRef::Board(coord))?, &view.cells[coord])?;
            }
        }
        for player in Player::iter() {
            self.render_panel(player, &view.panels[player], player == view.player_to_move)?;
        }
        Ok(())
    }

    pub fn set_armed(&self, cell: CellRef, armed: bool) -> JsResult<()> {
        self.element(cell)?.set_class(ARMED_CLASS, armed)
    }

    fn render_cell(&self, td: &web_sys::Element, cell: &CellView) -> JsResult<()> {
        td.set_class("city-neutral", cell.city == Some(CityControl::Neutral))?;
        td.set_class("city-white", cell.city == Some(CityControl::Owned(Player::White)))?;
        td.set_class("city-black", cell.city == Some(CityControl::Owned(Player::Black)))?;
        td.remove_all_children();
        let Some(ref unit) = cell.unit else {
            return Ok(());
        };
        let owner_class = format!("unit-{}", unit.unit.owner.to_id());
        let marker = td
            .append_new_element(&self.doc, "div")?
            .with_classes(["unit", owner_class.as_str()])?
            .with_text_content(unit.unit.kind.name());
        marker.set_class("blessed", unit.blessed)?;
        marker.set_class("can-move", unit.move_ready > 0)?;
        marker.set_class("can-attack", unit.move_ready == 0 && unit.attack_ready > 0)?;
        let stats = td.append_new_element(&self.doc, "div")?.with_classes(["unit-stats"])?;
        stats.append_text_span(&self.doc, &unit.health_readout, ["health"])?;
        stats.append_text_span(&self.doc, &unit.attack, ["attack"])?;
        stats.append_text_span(&self.doc, &unit.retaliation, ["retaliation"])?;
        Ok(())
    }

    fn render_panel(&self, player: Player, panel: &PanelView, to_move: bool) -> JsResult<()> {
        for slot in PanelSlot::all() {
            let element = self.element(CellRef::Panel { player, slot })?;
            element.remove_all_children();
            match slot {
                PanelSlot::Money => {
                    element.append_text_span(&self.doc, &panel.money.to_string(), ["money"])?;
                }
                PanelSlot::Unit(kind) => {
                    element.append_text_span(&self.doc, kind.name(), ["unit-name"])?;
                    element.append_text_span(
                        &self.doc,
                        &panel.research_mark(kind).to_string(),
                        ["research"],
                    )?;
                    if let Some(cost) = panel.costs[kind] {
                        element.append_text_span(&self.doc, &cost.to_string(), ["cost"])?;
                    }
                }
            }
        }
        let toggle = self.element(CellRef::PhaseToggle(player))?;
        toggle.set_text_content(Some(&panel.phase_label));
        toggle.set_class("to-move", to_move)?;
        Ok(())
    }
}

fn build_panel(
    doc: &WebDocument, container: &web_sys::Element, player: Player,
    elements: &mut HashMap<CellRef, web_sys::Element>,
) -> JsResult<()> {
    let player_class = format!("panel-{}", player.to_id());
    let panel = container
        .append_new_element(doc, "div")?
        .with_classes(["panel", player_class.as_str()])?;
    for slot in PanelSlot::all() {
        let cell = CellRef::Panel { player, slot };
        let element = panel
            .append_new_element(doc, "div")?
            .with_id(&cell.to_cell_id())
            .with_classes(["slot"])?;
        elements.insert(cell, element);
    }
    let cell = CellRef::PhaseToggle(player);
    let toggle = panel
        .append_new_element(doc, "div")?
        .with_id(&cell.to_cell_id())
        .with_classes(["phase-toggle"])?;
    elements.insert(cell, toggle);
    Ok(())
}
