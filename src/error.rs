use std::fmt;


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}


// Failure of a single request/response round trip.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TransportError {
    // The request could not complete (connection refused, DNS, broken body, etc.).
    Unreachable(String),
    // The server answered with a non-2xx status: illegal action, not your turn, etc.
    Rejected { status: u16, body: String },
    TimedOut,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClientError {
    Network(TransportError),
    // The server answered 2xx but the body is not a well-formed snapshot.
    ProtocolViolation(String),
    // A request was asked for directly but local checks did not let it through.
    IllegalInput(InputRejection),
}

impl ClientError {
    pub fn is_network_failure(&self) -> bool { matches!(self, ClientError::Network(_)) }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self { ClientError::Network(err) }
}

impl From<InputRejection> for ClientError {
    fn from(rejection: InputRejection) -> Self { ClientError::IllegalInput(rejection) }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Unreachable(message) => write!(f, "request failed: {message}"),
            TransportError::Rejected { status, body } if body.is_empty() => {
                write!(f, "server rejected the request with status {status}")
            }
            TransportError::Rejected { status, body } => {
                write!(f, "server rejected the request with status {status}: {body}")
            }
            TransportError::TimedOut => write!(f, "request timed out"),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(err) => write!(f, "network failure: {err}"),
            ClientError::ProtocolViolation(message) => {
                write!(f, "malformed game status from server: {message}")
            }
            ClientError::IllegalInput(rejection) => write!(f, "{rejection}"),
        }
    }
}

impl std::error::Error for TransportError {}
impl std::error::Error for ClientError {}


// Local input that was not turned into a request. Never shown to the user: it only means the
// click landed outside of the currently valid target set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputRejection {
    NoSnapshot,
    RequestInFlight,
    NotYourTurn,
    // First click on a cell owned by the opponent.
    OpponentCell,
    // Panel slots and phase toggles cannot be a destination for a board unit.
    InvalidDestination,
    // The money slot (slot 0) cannot be spawned or researched.
    NotSpawnable,
    // Same panel slot clicked twice.
    Cancelled,
}

impl fmt::Display for InputRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InputRejection::NoSnapshot => "game status not loaded yet",
            InputRejection::RequestInFlight => "waiting for the server",
            InputRejection::NotYourTurn => "not your turn",
            InputRejection::OpponentCell => "cannot select opponent's cell",
            InputRejection::InvalidDestination => "invalid destination",
            InputRejection::NotSpawnable => "nothing to spawn from this slot",
            InputRejection::Cancelled => "selection cancelled",
        };
        f.write_str(text)
    }
}
