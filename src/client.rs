use log::warn;

use crate::action::{self, Action, StatusRequest};
use crate::error::{ClientError, InputRejection, TransportError};
use crate::internal_error_message;
use crate::player::Player;
use crate::selection::{CellRef, Selection, Transition};
use crate::snapshot::{Phase, Snapshot};
use crate::turn_gate;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PendingRequest {
    Fetch,
    Submit(Action),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Submission {
    pub action: Action,
    pub request: StatusRequest,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClickOutcome {
    // Nothing changed.
    Ignored(InputRejection),
    // The cell is now selected and should be highlighted.
    Armed(CellRef),
    // Selection consumed. `released` cells lose their highlight no matter what happens next.
    // If `submission` is `Ok`, the request is already marked as in flight and must be sent.
    Resolved {
        released: Vec<CellRef>,
        submission: Result<Submission, InputRejection>,
    },
}

// Client session: local player identity, the last snapshot received from the server and the
// local selection. Does no IO itself; the caller performs the requests it asks for and reports
// back via `complete_request`.
pub struct ClientState {
    me: Player,
    snapshot: Option<Snapshot>,
    selection: Selection,
    pending: Option<PendingRequest>,
}

impl ClientState {
    pub fn new(me: Player) -> Self {
        ClientState {
            me,
            snapshot: None,
            selection: Selection::Idle,
            pending: None,
        }
    }

    pub fn me(&self) -> Player { self.me }
    pub fn snapshot(&self) -> Option<&Snapshot> { self.snapshot.as_ref() }
    pub fn selection(&self) -> Selection { self.selection }
    pub fn pending(&self) -> Option<PendingRequest> { self.pending }
    pub fn is_busy(&self) -> bool { self.pending.is_some() }

    pub fn click(&mut self, cell: CellRef) -> ClickOutcome {
        if self.pending.is_some() {
            return ClickOutcome::Ignored(InputRejection::RequestInFlight);
        }
        let phase = match turn_gate::check(self.me, self.snapshot.as_ref()) {
            Ok(phase) => phase,
            Err(rejection) => return ClickOutcome::Ignored(rejection),
        };
        let Some(ref snapshot) = self.snapshot else {
            return ClickOutcome::Ignored(InputRejection::NoSnapshot);
        };
        let transition = self.selection.transition(cell, self.me, snapshot);
        let encoded = match transition {
            Transition::Ignored => return ClickOutcome::Ignored(InputRejection::OpponentCell),
            Transition::Armed(cell) => return ClickOutcome::Armed(cell),
            Transition::Immediate(cell) => action::encode_immediate(cell, self.me),
            Transition::Resolved { from, to } => action::encode_pair(from, to, self.me),
        };
        let submission = encoded.map(|action| self.start_submit(action, phase));
        ClickOutcome::Resolved { released: transition.released_cells(), submission }
    }

    // Submits an action bypassing the selection, e.g. from a typed command. Same gating as a
    // click.
    pub fn begin_submit(&mut self, action: Action) -> Result<Submission, InputRejection> {
        if self.pending.is_some() {
            return Err(InputRejection::RequestInFlight);
        }
        let phase = turn_gate::check(self.me, self.snapshot.as_ref())?;
        Ok(self.start_submit(action, phase))
    }

    fn start_submit(&mut self, action: Action, phase: Phase) -> Submission {
        self.pending = Some(PendingRequest::Submit(action));
        Submission {
            action,
            request: StatusRequest::from_action(action, phase),
        }
    }

    // Drops the current selection, returning the cell that should lose its highlight.
    pub fn cancel_selection(&mut self) -> Option<CellRef> { self.selection.reset() }

    pub fn begin_refresh(&mut self) -> Result<(), InputRejection> {
        if self.pending.is_some() {
            return Err(InputRejection::RequestInFlight);
        }
        self.pending = Some(PendingRequest::Fetch);
        Ok(())
    }

    // Applies the outcome of the request in flight. The snapshot is replaced only by a
    // well-formed 2xx body; on any error it stays as it was.
    pub fn complete_request(
        &mut self, result: Result<String, TransportError>,
    ) -> Result<&Snapshot, ClientError> {
        if self.pending.take().is_none() {
            warn!("{}", internal_error_message!("got a response with no request in flight"));
        }
        let body = result?;
        Ok(self.snapshot.insert(Snapshot::from_json(&body)?))
    }
}
