mod common;

use citywar::action::Action;
use citywar::client::ClickOutcome;
use citywar::coord::Coord;
use citywar::error::{ClientError, InputRejection, TransportError};
use citywar::player::Player;
use citywar::selection::{CellRef, PanelSlot, Selection};
use citywar::sync::SyncController;
use citywar::test_util::{place_unit, starting_position_json};
use citywar::unit::UnitKind;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;


type Controller = SyncController<FakeServer, RecordingRenderer>;

fn board(row: u8, col: u8) -> CellRef { CellRef::Board(Coord::from_zero_based(row, col)) }

async fn connect(server: &FakeServer, me: Player) -> Controller {
    SyncController::connect(server.clone(), me, fast_options(), |_| RecordingRenderer::default())
        .await
        .unwrap()
}

#[async_std::test]
async fn failed_initial_load_builds_no_view() {
    let server = FakeServer::new();
    server.reply_unreachable().reply_unreachable().reply_unreachable();
    let mut view_built = false;
    let result = SyncController::connect(server.clone(), Player::White, fast_options(), |_| {
        view_built = true;
        RecordingRenderer::default()
    })
    .await;
    assert!(matches!(result, Err(ClientError::Network(TransportError::Unreachable(_)))));
    assert!(!view_built);
    assert_eq!(server.requests(), vec![Request::Fetch; 3]);
}

#[async_std::test]
async fn malformed_initial_load_builds_no_view() {
    let server = FakeServer::new();
    server.reply_raw("<html>502 Bad Gateway</html>");
    let result = SyncController::connect(server.clone(), Player::White, fast_options(), |_| {
        RecordingRenderer::default()
    })
    .await;
    assert!(matches!(result, Err(ClientError::ProtocolViolation(_))));
    assert_eq!(server.requests(), vec![Request::Fetch]);
}

#[async_std::test]
async fn ending_economy_phase() {
    let mut status = starting_position_json();
    status["economy_phase"] = true.into();
    let server = FakeServer::new();
    server.reply_status(&status);
    let mut controller = connect(&server, Player::White).await;
    assert_eq!(controller.view().last().panels[Player::White].phase_label, "Economy");

    status["economy_phase"] = false.into();
    server.reply_status(&status);
    controller.click(CellRef::PhaseToggle(Player::White)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "economy_phase": false }))));
    assert_eq!(controller.view().last().panels[Player::White].phase_label, "Command");
    assert_eq!(controller.view().renders.len(), 2);
    assert!(controller.view().armed.is_empty());
}

#[async_std::test]
async fn research_from_armed_slot() {
    let mut status = starting_position_json();
    status["economy_phase"] = true.into();
    let server = FakeServer::new();
    server.reply_status(&status).reply_status(&status);
    let mut controller = connect(&server, Player::White).await;
    let archer = CellRef::Panel {
        player: Player::White,
        slot: PanelSlot::Unit(UnitKind::Archer),
    };
    controller.click(archer).await.unwrap();
    controller.click(CellRef::PhaseToggle(Player::White)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "research": 5 }))));
}

#[async_std::test]
async fn money_slot_never_researches() {
    let mut status = starting_position_json();
    status["economy_phase"] = true.into();
    let server = FakeServer::new();
    server.reply_status(&status).reply_status(&status);
    let mut controller = connect(&server, Player::White).await;
    let money = CellRef::Panel { player: Player::White, slot: PanelSlot::Money };
    controller.click(money).await.unwrap();
    controller.click(CellRef::PhaseToggle(Player::White)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "economy_phase": false }))));
}

#[async_std::test]
async fn move_clears_both_highlights() {
    let mut status = starting_position_json();
    place_unit(&mut status, Coord::from_zero_based(3, 2), 3, 3);
    let server = FakeServer::new();
    server.reply_status(&status);
    let mut controller = connect(&server, Player::White).await;

    let outcome = controller.click(board(3, 2)).await.unwrap();
    assert_eq!(outcome, ClickOutcome::Armed(board(3, 2)));
    assert_eq!(controller.state().selection(), Selection::Armed(board(3, 2)));
    assert!(controller.view().armed.contains(&board(3, 2)));

    let mut after = status.clone();
    place_unit(&mut after, Coord::from_zero_based(3, 2), 0, 0);
    place_unit(&mut after, Coord::from_zero_based(3, 3), 3, 3);
    server.reply_status(&after);
    controller.click(board(3, 3)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "t1": [3, 2], "t2": [3, 3] }))));
    assert_eq!(controller.state().selection(), Selection::Idle);
    assert!(controller.view().armed.is_empty());
    let view = controller.view().last();
    assert!(view.cells[Coord::from_zero_based(3, 2)].unit.is_none());
    assert!(view.cells[Coord::from_zero_based(3, 3)].unit.is_some());
}

#[async_std::test]
async fn destination_keeps_row_and_column() {
    let mut status = starting_position_json();
    place_unit(&mut status, Coord::from_zero_based(3, 2), 3, 3);
    let server = FakeServer::new();
    server.reply_status(&status).reply_status(&status);
    let mut controller = connect(&server, Player::White).await;
    controller.click(board(3, 2)).await.unwrap();
    controller.click(board(1, 6)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "t1": [3, 2], "t2": [1, 6] }))));
}

#[async_std::test]
async fn spawn_from_panel() {
    let server = FakeServer::new();
    server.reply_status(&starting_position_json()).reply_status(&starting_position_json());
    let mut controller = connect(&server, Player::White).await;
    let slot = CellRef::Panel {
        player: Player::White,
        slot: PanelSlot::Unit(UnitKind::Defender),
    };
    assert_eq!(controller.click(slot).await.unwrap(), ClickOutcome::Armed(slot));
    controller.click(board(5, 5)).await.unwrap();
    assert_eq!(server.last_request(), Some(Request::Post(json!({ "t1": 3, "t2": [5, 5] }))));
    assert!(controller.view().armed.is_empty());
}

#[async_std::test]
async fn waiting_player_input_is_dropped() {
    let server = FakeServer::new();
    server.reply_status(&starting_position_json());
    let mut controller = connect(&server, Player::Black).await;
    for cell in [board(0, 0), board(4, 4), CellRef::PhaseToggle(Player::Black)] {
        let outcome = controller.click(cell).await.unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored(InputRejection::NotYourTurn));
        assert_eq!(controller.state().selection(), Selection::Idle);
    }
    assert!(matches!(
        controller.submit(Action::EndPhase).await,
        Err(ClientError::IllegalInput(InputRejection::NotYourTurn))
    ));
    assert_eq!(server.requests(), vec![Request::Fetch]);
    assert!(controller.view().armed.is_empty());
    assert_eq!(
        controller.view().last().panels[Player::Black].phase_label,
        "It's White's turn..."
    );
}

#[async_std::test]
async fn opponent_cells_are_not_armed() {
    let server = FakeServer::new();
    server.reply_status(&starting_position_json());
    let mut controller = connect(&server, Player::White).await;
    let outcome = controller.click(board(0, 0)).await.unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored(InputRejection::OpponentCell));
    assert_eq!(controller.state().selection(), Selection::Idle);
    assert!(controller.view().armed.is_empty());
}

#[async_std::test]
async fn failed_submit_keeps_snapshot_and_is_not_retried() {
    let mut status = starting_position_json();
    place_unit(&mut status, Coord::from_zero_based(3, 2), 3, 3);
    let server = FakeServer::new();
    server.reply_status(&status);
    let mut controller = connect(&server, Player::White).await;
    let before = controller.state().snapshot().cloned();

    server.reply_unreachable();
    controller.click(board(3, 2)).await.unwrap();
    let result = controller.click(board(3, 3)).await;
    assert!(matches!(result, Err(ClientError::Network(_))));
    assert_eq!(server.num_posts(), 1);
    assert_eq!(controller.state().snapshot().cloned(), before);
    assert_eq!(controller.view().renders.len(), 1);
    assert!(controller.view().armed.is_empty());
    assert!(!controller.state().is_busy());

    server.reply_error(TransportError::Rejected { status: 400, body: "Illegal move".to_owned() });
    controller.click(board(3, 2)).await.unwrap();
    let result = controller.click(board(0, 0)).await;
    assert!(matches!(
        result,
        Err(ClientError::Network(TransportError::Rejected { status: 400, .. }))
    ));
    assert_eq!(server.num_posts(), 2);
    assert_eq!(controller.state().snapshot().cloned(), before);

    server.reply_raw("{\"oops\": true}");
    let result = controller.submit(Action::EndPhase).await;
    assert!(matches!(result, Err(ClientError::ProtocolViolation(_))));
    assert_eq!(controller.state().snapshot().cloned(), before);
    assert_eq!(controller.view().renders.len(), 1);
}

#[async_std::test]
async fn refresh_retries_are_bounded() {
    let server = FakeServer::new();
    server.reply_status(&starting_position_json());
    let mut controller = connect(&server, Player::White).await;

    let mut status = starting_position_json();
    status["white_money"] = 3.into();
    server.reply_unreachable().reply_unreachable().reply_status(&status);
    controller.refresh().await.unwrap();
    assert_eq!(server.requests().len(), 4);
    assert_eq!(controller.view().last().panels[Player::White].money, 3);

    server.reply_unreachable().reply_unreachable().reply_unreachable().reply_status(&status);
    assert!(matches!(controller.refresh().await, Err(ClientError::Network(_))));
    assert_eq!(server.requests().len(), 7);
    assert_eq!(controller.view().renders.len(), 2);
}

#[async_std::test]
async fn hung_request_times_out() {
    let server = FakeServer::new();
    server.reply_status(&starting_position_json());
    let mut controller = connect(&server, Player::White).await;
    server.reply_hang();
    let result = controller.submit(Action::EndPhase).await;
    assert_eq!(result, Err(ClientError::Network(TransportError::TimedOut)));
    assert!(!controller.state().is_busy());
    assert_eq!(controller.view().renders.len(), 1);
}
