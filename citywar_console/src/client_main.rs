use std::io::Write;

use anyhow::Context;
use async_std::{io, task};
use citywar::action::Action;
use citywar::coord::Coord;
use citywar::error::ClientError;
use citywar::player::Player;
use citywar::render::render;
use citywar::selection::{CellRef, PanelSlot};
use citywar::snapshot::{Phase, Snapshot};
use citywar::unit::UnitKind;
use citywar::sync::{GameTransport, SyncController};
use console::Style;
use itertools::Itertools;
use log::info;
use url::Url;

use crate::client_config::ClientConfig;
use crate::network::HttpTransport;
use crate::tui::{self, TuiBoard};


type Controller = SyncController<HttpTransport, TuiBoard>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConsoleCommand {
    Help,
    View,
    Side,
    Refresh,
    Cancel,
    // Enter the economy phase. Unlike `end`, refused when already there.
    Economy,
    Quit,
    // Typed action, bypassing the selection.
    Submit(Action),
    // Each cell is one click, in order.
    Clicks(Vec<CellRef>),
}

// Cells can be typed as algebraic squares ("C5"), board cell ids ("3-2"), own panel slots
// ("slot3" or "s3"), own phase toggle ("toggle") or full cell ids ("black-slot-2").
pub fn parse_cell(token: &str, me: Player) -> Option<CellRef> {
    let token = token.trim().to_ascii_lowercase();
    if token == "toggle" || token == "phase" {
        return Some(CellRef::PhaseToggle(me));
    }
    if let Some(idx) = token.strip_prefix("slot").or_else(|| token.strip_prefix('s')) {
        let slot = PanelSlot::from_index(idx.parse().ok()?)?;
        return Some(CellRef::Panel { player: me, slot });
    }
    Coord::from_algebraic(&token)
        .map(CellRef::Board)
        .or_else(|| CellRef::from_cell_id(&token))
}

// Compass heading as a (row, col) step. North is up, towards row 8.
fn parse_heading(token: &str) -> Option<(i8, i8)> {
    let step = match token {
        "n" => (-1, 0),
        "ne" => (-1, 1),
        "e" => (0, 1),
        "se" => (1, 1),
        "s" => (1, 0),
        "sw" => (1, -1),
        "w" => (0, -1),
        "nw" => (-1, -1),
        _ => return None,
    };
    Some(step)
}

fn parse_square(token: &str) -> Result<Coord, String> {
    Coord::from_algebraic(token).ok_or_else(|| format!("Unknown square \"{token}\""))
}

fn parse_unit_kind(token: &str) -> Result<UnitKind, String> {
    token
        .parse()
        .ok()
        .and_then(UnitKind::from_id)
        .ok_or_else(|| format!("Unknown unit type \"{token}\", expected 1..7"))
}

fn parse_step(square: &str, heading: &str) -> Result<Action, String> {
    let from = parse_square(square)?;
    let (d_row, d_col) =
        parse_heading(heading).ok_or_else(|| format!("Unknown heading \"{heading}\""))?;
    let to = from
        .row
        .to_zero_based()
        .checked_add_signed(d_row)
        .zip(from.col.to_zero_based().checked_add_signed(d_col))
        .and_then(|(row, col)| Coord::try_from_zero_based(row, col))
        .ok_or_else(|| format!("Heading {heading} from {} leaves the board", from.to_algebraic()))?;
    Ok(Action::MoveAttack { from, to })
}

pub fn parse_command(line: &str, me: Player) -> Result<ConsoleCommand, String> {
    let line = line.to_ascii_lowercase();
    let words = line.split_whitespace().collect_vec();
    let command = match words.as_slice() {
        ["help"] => ConsoleCommand::Help,
        ["view"] => ConsoleCommand::View,
        ["side"] => ConsoleCommand::Side,
        ["refresh"] => ConsoleCommand::Refresh,
        ["cancel"] => ConsoleCommand::Cancel,
        ["end"] => ConsoleCommand::Submit(Action::EndPhase),
        ["economy"] => ConsoleCommand::Economy,
        ["research", kind] => ConsoleCommand::Submit(Action::Research(parse_unit_kind(kind)?)),
        ["place", square, kind] => ConsoleCommand::Submit(Action::Spawn {
            kind: parse_unit_kind(kind)?,
            to: parse_square(square)?,
        }),
        ["move" | "attack", square, heading] => ConsoleCommand::Submit(parse_step(square, heading)?),
        ["quit" | "exit"] => ConsoleCommand::Quit,
        tokens => ConsoleCommand::Clicks(
            tokens
                .iter()
                .map(|&t| parse_cell(t, me).ok_or_else(|| format!("Unknown cell \"{t}\"")))
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(command)
}

fn print_help() {
    println!("Type \"view\" to see the board state");
    println!("Type \"side\" to see the sideboard (research and money)");
    println!("Type \"refresh\" to reload the game, \"cancel\" to drop the selection");
    println!("Type \"end\" to end the current phase, \"quit\" to exit");
    println!("Typed actions:");
    println!("  move H1 NW   move or attack one step in a compass direction (also \"attack\")");
    println!("  research 2   research a unit type");
    println!("  economy      enter the economy phase");
    println!("  place F1 2   spawn a unit type on a square");
    println!("Anything else is a sequence of clicks. Cells are typed as:");
    println!("  C5 or 3-2    a board square");
    println!("  slot3 or s3  your panel slot (0 is money, 1..7 are unit types)");
    println!("  toggle       your phase toggle");
    println!("Examples:");
    println!("  H1 H2        move or attack");
    println!("  s2 G1        spawn a Runner on G1");
    println!("  s4 toggle    research Swordsman");
    println!("  toggle       end economy phase");
}

async fn click_all(controller: &mut Controller, cells: Vec<CellRef>) -> Result<(), ClientError> {
    for cell in cells {
        controller.click(cell).await?;
    }
    Ok(())
}

async fn run_async(config: ClientConfig) -> anyhow::Result<()> {
    let me = config.player;
    let transport = HttpTransport::new(&config.server_address)?;
    info!(
        "Connecting to {} as {me}, request timeout {}",
        transport.status_url(),
        humantime::format_duration(config.request_timeout)
    );
    let mut controller =
        SyncController::connect(transport, me, config.sync_options(), |_| TuiBoard::new())
            .await
            .context("Cannot load the game")?;
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Your action: ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let command = match parse_command(&line, me) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}. Try again (or type \"help\")");
                continue;
            }
        };
        let result = match command {
            ConsoleCommand::Help => {
                print_help();
                Ok(())
            }
            ConsoleCommand::View => {
                controller.view().print_board();
                Ok(())
            }
            ConsoleCommand::Side => {
                controller.view().print_board();
                controller.view().print_sideboard();
                Ok(())
            }
            ConsoleCommand::Refresh => controller.refresh().await,
            ConsoleCommand::Cancel => {
                controller.cancel_selection();
                Ok(())
            }
            ConsoleCommand::Economy => match controller.state().snapshot().map(Snapshot::phase) {
                Some(Phase::Economy) => {
                    println!("Already in the economy phase");
                    Ok(())
                }
                _ => controller.submit(Action::EndPhase).await,
            },
            ConsoleCommand::Submit(action) => {
                controller.cancel_selection();
                controller.submit(action).await
            }
            ConsoleCommand::Quit => return Ok(()),
            ConsoleCommand::Clicks(cells) => click_all(&mut controller, cells).await,
        };
        if let Err(err) = result {
            println!("{}", Style::new().red().apply_to(err));
        }
    }
}

pub fn run(config: ClientConfig) -> anyhow::Result<()> { task::block_on(run_async(config)) }

async fn print_status(server_address: Url) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&server_address)?;
    let body = transport.fetch_status().await.context("Cannot fetch game status")?;
    let view = render(&Snapshot::from_json(&body)?);
    println!("{}", tui::render_grid(&view, &Default::default()));
    println!("{}", tui::render_sideboard(&view));
    Ok(())
}

// One-shot printout of the current game.
pub fn run_status(server_address: Url) -> anyhow::Result<()> {
    task::block_on(print_status(server_address))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cells() {
        let me = Player::Black;
        assert_eq!(parse_cell("A8", me), Some(CellRef::Board(Coord::from_zero_based(0, 0))));
        assert_eq!(parse_cell("h1", me), Some(CellRef::Board(Coord::from_zero_based(7, 7))));
        assert_eq!(parse_cell("3-2", me), Some(CellRef::Board(Coord::from_zero_based(3, 2))));
        assert_eq!(parse_cell("s0", me), Some(CellRef::Panel { player: me, slot: PanelSlot::Money }));
        assert_eq!(
            parse_cell("slot7", me),
            Some(CellRef::Panel {
                player: me,
                slot: PanelSlot::from_index(7).unwrap()
            })
        );
        assert_eq!(parse_cell("toggle", me), Some(CellRef::PhaseToggle(me)));
        assert_eq!(parse_cell("white-phase", me), Some(CellRef::PhaseToggle(Player::White)));
        assert_eq!(parse_cell("s8", me), None);
        assert_eq!(parse_cell("I9", me), None);
    }

    #[test]
    fn commands() {
        let me = Player::White;
        assert_eq!(parse_command("Help\n", me), Ok(ConsoleCommand::Help));
        assert_eq!(parse_command(" quit ", me), Ok(ConsoleCommand::Quit));
        assert_eq!(parse_command("", me), Ok(ConsoleCommand::Clicks(vec![])));
        assert_eq!(
            parse_command("H1 G1", me),
            Ok(ConsoleCommand::Clicks(vec![
                CellRef::Board(Coord::from_zero_based(7, 7)),
                CellRef::Board(Coord::from_zero_based(7, 6)),
            ]))
        );
        assert!(parse_command("H8 NW", me).is_err());
    }

    #[test]
    fn typed_actions() {
        let me = Player::White;
        let square = |s: &str| Coord::from_algebraic(s).unwrap();
        assert_eq!(
            parse_command("move H1 NW", me),
            Ok(ConsoleCommand::Submit(Action::MoveAttack { from: square("H1"), to: square("G2") }))
        );
        assert_eq!(
            parse_command("attack C3 s", me),
            Ok(ConsoleCommand::Submit(Action::MoveAttack { from: square("C3"), to: square("C2") }))
        );
        assert_eq!(
            parse_command("research 2", me),
            Ok(ConsoleCommand::Submit(Action::Research(UnitKind::Runner)))
        );
        assert_eq!(
            parse_command("place F1 2", me),
            Ok(ConsoleCommand::Submit(Action::Spawn { kind: UnitKind::Runner, to: square("F1") }))
        );
        assert_eq!(parse_command("economy", me), Ok(ConsoleCommand::Economy));
        assert_eq!(parse_command("end", me), Ok(ConsoleCommand::Submit(Action::EndPhase)));
        assert!(parse_command("move H8 N", me).is_err());
        assert!(parse_command("move A1 SW", me).is_err());
        assert!(parse_command("research 0", me).is_err());
        assert!(parse_command("place F1 8", me).is_err());
        assert!(parse_command("move H8 up", me).is_err());
    }
}
