// Browser client. JS owns the network: it asks this module what to send, performs `fetch`
// and hands the outcome back via `process_status` / `process_request_failure`.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate console_error_panic_hook;
extern crate strum;
extern crate wasm_bindgen;

extern crate citywar;

pub mod web_board;
pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;

use citywar::client::{ClickOutcome, ClientState};
use citywar::error::TransportError;
use citywar::player::Player;
use citywar::render;
use citywar::selection::CellRef;
use wasm_bindgen::prelude::*;

use web_board::WebBoard;
use web_document::web_document;
use web_error_handling::JsResult;


#[wasm_bindgen]
pub struct WebClient {
    state: ClientState,
    container_id: String,
    // Built on the first successfully parsed status. Until then nothing is drawn.
    board: Option<WebBoard>,
}

#[wasm_bindgen]
impl WebClient {
    pub fn new_client(player: &str, container_id: &str) -> JsResult<WebClient> {
        let me = Player::from_id(player)
            .ok_or_else(|| rust_error!("Unknown player \"{}\", expected \"white\" or \"black\"", player))?;
        Ok(WebClient {
            state: ClientState::new(me),
            container_id: container_id.to_owned(),
            board: None,
        })
    }

    pub fn my_player(&self) -> String { self.state.me().to_id().to_owned() }

    // True while a request is in flight: JS must not start another one.
    pub fn is_busy(&self) -> bool { self.state.is_busy() }

    pub fn player_to_move(&self) -> Option<String> {
        self.state.snapshot().map(|snapshot| snapshot.player_to_move().to_id().to_owned())
    }

    // Must be called before each `GET /game/status`.
    pub fn begin_refresh(&mut self) -> JsResult<()> {
        self.state.begin_refresh().map_err(|rejection| rust_error!("{}", rejection))
    }

    // Body of a 2xx response to either a GET or a POST.
    pub fn process_status(&mut self, body: String) -> JsResult<()> {
        self.complete(Ok(body))
    }

    // A request did not produce a 2xx response. Status 0 means the request never reached the
    // server. The snapshot is kept; always returns the error so that JS can report it.
    pub fn process_request_failure(&mut self, status: u16, message: String) -> JsResult<()> {
        let err = if status == 0 {
            TransportError::Unreachable(message)
        } else {
            TransportError::Rejected { status, body: message }
        };
        self.complete(Err(err))
    }

    pub fn process_timeout(&mut self) -> JsResult<()> { self.complete(Err(TransportError::TimedOut)) }

    // Returns the body to POST to `/game/status`, if the click completed an action.
    pub fn click(&mut self, cell_id: &str) -> JsResult<Option<String>> {
        let cell = CellRef::from_cell_id(cell_id)
            .ok_or_else(|| rust_error!("Unknown cell \"{}\"", cell_id))?;
        match self.state.click(cell) {
            ClickOutcome::Ignored(_) => Ok(None),
            ClickOutcome::Armed(cell) => {
                self.board()?.set_armed(cell, true)?;
                Ok(None)
            }
            ClickOutcome::Resolved { released, submission } => {
                let body = submission.ok().map(|submission| submission.request.to_body());
                let board = self.board()?;
                for cell in released {
                    board.set_armed(cell, false)?;
                }
                Ok(body)
            }
        }
    }

    pub fn cancel_selection(&mut self) -> JsResult<()> {
        if let Some(cell) = self.state.cancel_selection() {
            self.board()?.set_armed(cell, false)?;
        }
        Ok(())
    }
}

impl WebClient {
    fn board(&self) -> JsResult<&WebBoard> {
        self.board.as_ref().ok_or_else(|| rust_error!("Board is not initialized"))
    }

    fn complete(&mut self, result: Result<String, TransportError>) -> JsResult<()> {
        let view = match self.state.complete_request(result) {
            Ok(snapshot) => render::render(snapshot),
            Err(err) => return Err(rust_error!("{}", err)),
        };
        if self.board.is_none() {
            let doc = web_document()?;
            let container = doc.get_existing_element_by_id(&self.container_id)?;
            self.board = Some(WebBoard::build(doc, &container, self.state.me())?);
        }
        self.board()?.render(&view)
    }
}
