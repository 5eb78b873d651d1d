use std::future::Future;
use std::time::Duration;

use async_std::{future, task};
use async_trait::async_trait;
use log::{debug, info, warn};

use crate::action::Action;
use crate::client::{ClickOutcome, ClientState, Submission};
use crate::error::{ClientError, TransportError};
use crate::player::Player;
use crate::render::{BoardView, render};
use crate::selection::CellRef;
use crate::snapshot::Snapshot;


// Request/response primitive for `/game/status`. Implementations return the response body for
// 2xx answers and `TransportError::Rejected` for everything else.
#[async_trait]
pub trait GameTransport: Send + Sync {
    async fn fetch_status(&self) -> Result<String, TransportError>;
    async fn post_status(&self, body: String) -> Result<String, TransportError>;
}

pub trait BoardRenderer {
    fn render(&mut self, view: &BoardView);
    fn set_armed(&mut self, cell: CellRef, armed: bool);
}

#[derive(Clone, Debug)]
pub struct SyncOptions {
    pub request_timeout: Duration,
    // Total number of tries for a status fetch. Submissions are always tried once.
    pub refresh_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            request_timeout: Duration::from_secs(10),
            refresh_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

async fn with_timeout<F>(timeout: Duration, request: F) -> Result<String, TransportError>
where
    F: Future<Output = Result<String, TransportError>>,
{
    future::timeout(timeout, request).await.unwrap_or(Err(TransportError::TimedOut))
}

async fn fetch_with_retry(
    transport: &impl GameTransport, options: &SyncOptions,
) -> Result<String, TransportError> {
    let mut attempt = 1;
    loop {
        match with_timeout(options.request_timeout, transport.fetch_status()).await {
            Err(err) if attempt < options.refresh_attempts => {
                warn!("Fetching game status failed ({err}), retrying ({attempt}/{})", options.refresh_attempts);
                task::sleep(options.retry_delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

// Drives a `ClientState` against a transport and keeps a view in sync with it. Every
// successfully received snapshot is rendered in full.
pub struct SyncController<T, V> {
    transport: T,
    state: ClientState,
    view: V,
    options: SyncOptions,
}

impl<T: GameTransport, V: BoardRenderer> SyncController<T, V> {
    // Loads the game and builds the view. If the game cannot be loaded, no view is built.
    pub async fn connect(
        transport: T, me: Player, options: SyncOptions, make_view: impl FnOnce(&Snapshot) -> V,
    ) -> Result<Self, ClientError> {
        let mut state = ClientState::new(me);
        state.begin_refresh()?;
        let result = fetch_with_retry(&transport, &options).await;
        let snapshot = match state.complete_request(result) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Cannot load the game: {err}");
                return Err(err);
            }
        };
        let mut view = make_view(snapshot);
        view.render(&render(snapshot));
        info!("Joined the game as {me}");
        Ok(SyncController { transport, state, view, options })
    }

    pub fn state(&self) -> &ClientState { &self.state }
    pub fn view(&self) -> &V { &self.view }
    pub fn view_mut(&mut self) -> &mut V { &mut self.view }
    pub fn transport(&self) -> &T { &self.transport }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.state.begin_refresh()?;
        let result = fetch_with_retry(&self.transport, &self.options).await;
        self.apply(result)
    }

    // Handles one input. Highlights are updated before any request goes out, so a failed
    // request never leaves a glowing cell behind.
    pub async fn click(&mut self, cell: CellRef) -> Result<ClickOutcome, ClientError> {
        let outcome = self.state.click(cell);
        match outcome {
            ClickOutcome::Ignored(rejection) => debug!("Ignored input on {cell}: {rejection}"),
            ClickOutcome::Armed(cell) => self.view.set_armed(cell, true),
            ClickOutcome::Resolved { ref released, submission } => {
                for &cell in released {
                    self.view.set_armed(cell, false);
                }
                match submission {
                    Ok(submission) => self.send(submission).await?,
                    Err(rejection) => debug!("Dropped input pair: {rejection}"),
                }
            }
        }
        Ok(outcome)
    }

    pub fn cancel_selection(&mut self) {
        if let Some(cell) = self.state.cancel_selection() {
            self.view.set_armed(cell, false);
        }
    }

    pub async fn submit(&mut self, action: Action) -> Result<(), ClientError> {
        let submission = self.state.begin_submit(action)?;
        self.send(submission).await
    }

    async fn send(&mut self, submission: Submission) -> Result<(), ClientError> {
        let body = submission.request.to_body();
        debug!("Submitting {:?}: {body}", submission.action);
        let result = with_timeout(self.options.request_timeout, self.transport.post_status(body)).await;
        self.apply(result)
    }

    fn apply(&mut self, result: Result<String, TransportError>) -> Result<(), ClientError> {
        match self.state.complete_request(result) {
            Ok(snapshot) => {
                self.view.render(&render(snapshot));
                Ok(())
            }
            Err(err) => {
                warn!("{err}");
                Err(err)
            }
        }
    }
}
