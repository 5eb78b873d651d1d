// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use citywar::error::TransportError;
use citywar::render::BoardView;
use citywar::selection::CellRef;
use citywar::sync::{BoardRenderer, GameTransport, SyncOptions};
use serde_json::Value;


#[derive(Clone, PartialEq, Debug)]
pub enum Request {
    Fetch,
    Post(Value),
}

enum Reply {
    Body(String),
    Fail(TransportError),
    Hang,
}

#[derive(Default)]
struct FakeServerState {
    replies: VecDeque<Reply>,
    requests: Vec<Request>,
}

// Answers requests from a script, in order, regardless of what was asked. Records every
// request it gets.
#[derive(Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<FakeServerState>>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn new() -> Self { Self::default() }

    pub fn reply_status(&self, status: &Value) -> &Self {
        self.push(Reply::Body(status.to_string()))
    }
    pub fn reply_raw(&self, body: &str) -> &Self { self.push(Reply::Body(body.to_owned())) }
    pub fn reply_error(&self, err: TransportError) -> &Self { self.push(Reply::Fail(err)) }
    pub fn reply_unreachable(&self) -> &Self {
        self.reply_error(TransportError::Unreachable("connection refused".to_owned()))
    }
    pub fn reply_hang(&self) -> &Self { self.push(Reply::Hang) }

    pub fn requests(&self) -> Vec<Request> { self.state.lock().unwrap().requests.clone() }
    pub fn last_request(&self) -> Option<Request> { self.requests().last().cloned() }
    pub fn num_posts(&self) -> usize {
        self.requests().iter().filter(|r| matches!(r, Request::Post(_))).count()
    }

    fn push(&self, reply: Reply) -> &Self {
        self.state.lock().unwrap().replies.push_back(reply);
        self
    }

    async fn answer(&self, request: Request) -> Result<String, TransportError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.replies.pop_front()
        };
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Hang) => {
                async_std::task::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Unreachable("hung request finished".to_owned()))
            }
            None => Err(TransportError::Unreachable("no scripted reply".to_owned())),
        }
    }
}

#[async_trait]
impl GameTransport for FakeServer {
    async fn fetch_status(&self) -> Result<String, TransportError> {
        self.answer(Request::Fetch).await
    }

    async fn post_status(&self, body: String) -> Result<String, TransportError> {
        let body: Value = serde_json::from_str(&body).unwrap();
        self.answer(Request::Post(body)).await
    }
}


#[derive(Default)]
pub struct RecordingRenderer {
    pub renders: Vec<BoardView>,
    pub armed: HashSet<CellRef>,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn last(&self) -> &BoardView { self.renders.last().unwrap() }
}

impl BoardRenderer for RecordingRenderer {
    fn render(&mut self, view: &BoardView) { self.renders.push(view.clone()); }

    fn set_armed(&mut self, cell: CellRef, armed: bool) {
        if armed {
            assert!(self.armed.insert(cell), "{cell} is already highlighted");
        } else {
            self.armed.remove(&cell);
        }
    }
}


#[allow(dead_code)]
pub fn fast_options() -> SyncOptions {
    SyncOptions {
        request_timeout: Duration::from_millis(200),
        refresh_attempts: 3,
        retry_delay: Duration::from_millis(1),
    }
}
