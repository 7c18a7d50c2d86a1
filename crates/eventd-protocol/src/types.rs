//! Request and response types for the eventd protocol.

use serde::{Deserialize, Serialize};

use eventd_core::{Anchor, NormalizedEvent, QueryError};

use crate::PROTOCOL_VERSION;

/// Message envelope wrapping every protocol message.
///
/// Provides versioning and request/response correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Protocol version (always "1" for v1).
    pub protocol_version: String,
    /// Unique request ID for correlation.
    pub request_id: String,
    /// The actual payload.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Creates a new envelope with the current protocol version.
    pub fn new(request_id: impl Into<String>, payload: T) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            request_id: request_id.into(),
            payload,
        }
    }

    /// Creates a request envelope.
    pub fn request(request_id: impl Into<String>, request: T) -> Self {
        Self::new(request_id, request)
    }

    /// Creates a response envelope.
    pub fn response(request_id: impl Into<String>, response: T) -> Self {
        Self::new(request_id, response)
    }

    /// Checks if this envelope uses a compatible protocol version.
    pub fn is_compatible(&self) -> bool {
        self.protocol_version == PROTOCOL_VERSION
    }
}

/// Requests a client can send to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Date-range event query. All parameters arrive as raw request strings
    /// and are validated server-side: `from`/`to` as `YYYY-MM-DD`, `at` as
    /// one of `start`/`end`/`overlap` (default `overlap`).
    GetEvents {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<String>,
    },

    /// Month-view query: events whose start falls inside the month.
    GetEventsByMonth { year: i32, month: u32 },

    /// Fetch a single event by id.
    GetEvent { id: String },

    /// Get daemon status.
    Status,

    /// Ping to check daemon liveness.
    Ping,

    /// Request daemon shutdown.
    Shutdown,
}

impl Request {
    /// Creates an unbounded GetEvents request.
    pub fn get_events() -> Self {
        Self::GetEvents {
            from: None,
            to: None,
            at: None,
        }
    }

    /// Creates a GetEvents request with raw window parameters.
    pub fn get_events_in(from: Option<&str>, to: Option<&str>, at: Option<&str>) -> Self {
        Self::GetEvents {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            at: at.map(str::to_string),
        }
    }

    /// Creates a GetEventsByMonth request.
    pub fn get_events_by_month(year: i32, month: u32) -> Self {
        Self::GetEventsByMonth { year, month }
    }

    /// Creates a GetEvent request.
    pub fn get_event(id: impl Into<String>) -> Self {
        Self::GetEvent { id: id.into() }
    }
}

/// Responses the daemon can send back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Date-range query result. The anchor the query ran with is echoed as
    /// its own field, never mixed into the event sequence.
    Events {
        events: Vec<NormalizedEvent>,
        at: Anchor,
    },

    /// A single event.
    Event { event: NormalizedEvent },

    /// Daemon status information.
    Status {
        #[serde(flatten)]
        info: StatusInfo,
    },

    /// Generic success response.
    Ok,

    /// Pong response to Ping.
    Pong,

    /// Error response.
    Error {
        #[serde(flatten)]
        error: ErrorResponse,
    },
}

impl Response {
    /// Creates an Events response.
    pub fn events(events: Vec<NormalizedEvent>, at: Anchor) -> Self {
        Self::Events { events, at }
    }

    /// Creates an Event response.
    pub fn event(event: NormalizedEvent) -> Self {
        Self::Event { event }
    }

    /// Creates a Status response.
    pub fn status(info: StatusInfo) -> Self {
        Self::Status { info }
    }

    /// Creates an Error response.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorResponse::new(code, message),
        }
    }

    /// Creates an Error response from an existing ErrorResponse.
    pub fn from_error(error: ErrorResponse) -> Self {
        Self::Error { error }
    }

    /// Returns true unless this is an error response.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// Returns the error if this is an error response.
    pub fn as_error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

/// Daemon status information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// Daemon uptime in seconds.
    pub uptime_seconds: u64,
    /// Number of records in the store, queryable or not.
    pub event_count: usize,
}

impl StatusInfo {
    /// Creates a new StatusInfo.
    pub fn new(uptime_seconds: u64, event_count: usize) -> Self {
        Self {
            uptime_seconds,
            event_count,
        }
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A date parameter does not match `YYYY-MM-DD`.
    MalformedDate,
    /// A date parameter names a calendrically invalid date.
    ImpossibleDate,
    /// The `at` parameter is not an accepted value.
    InvalidAnchor,
    /// The month parameter is outside 1-12.
    InvalidMonth,
    /// Requested event does not exist.
    NotFound,
    /// The event store failed.
    StoreError,
    /// The request could not be understood.
    InvalidRequest,
    /// Unknown or internal error.
    InternalError,
    /// Daemon is shutting down.
    ShuttingDown,
}

impl ErrorCode {
    /// Returns a human-readable description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MalformedDate => "Parameter is not in the correct format",
            Self::ImpossibleDate => "Parameter is an impossible date",
            Self::InvalidAnchor => "Parameter is not an accepted value",
            Self::InvalidMonth => "Month is out of range",
            Self::NotFound => "Requested event not found",
            Self::StoreError => "Event store returned an error",
            Self::InvalidRequest => "The request was invalid",
            Self::InternalError => "An internal error occurred",
            Self::ShuttingDown => "Daemon is shutting down",
        }
    }
}

/// Error response details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<QueryError> for ErrorResponse {
    fn from(err: QueryError) -> Self {
        let code = match &err {
            QueryError::MalformedDate { .. } => ErrorCode::MalformedDate,
            QueryError::ImpossibleDate { .. } => ErrorCode::ImpossibleDate,
            QueryError::InvalidAnchor { .. } => ErrorCode::InvalidAnchor,
        };
        Self::new(code, err.to_string())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_versioning() {
        let envelope = Envelope::request("req-1", Request::Ping);
        assert_eq!(envelope.protocol_version, "1");
        assert!(envelope.is_compatible());

        let stale = Envelope {
            protocol_version: "0".to_string(),
            request_id: "req-2".to_string(),
            payload: Request::Ping,
        };
        assert!(!stale.is_compatible());
    }

    #[test]
    fn request_serde_ping() {
        let json = serde_json::to_string(&Request::Ping).unwrap();
        assert_eq!(json, r#"{"type":"ping"}"#);
        let parsed: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Request::Ping);
    }

    #[test]
    fn request_serde_get_events_omits_absent_params() {
        let json = serde_json::to_string(&Request::get_events()).unwrap();
        assert_eq!(json, r#"{"type":"get_events"}"#);

        let request = Request::get_events_in(Some("2021-01-08"), None, Some("start"));
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"from\":\"2021-01-08\""));
        assert!(!json.contains("\"to\""));

        let parsed: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn request_serde_month() {
        let request = Request::get_events_by_month(2024, 2);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"type":"get_events_by_month","year":2024,"month":2}"#
        );
    }

    #[test]
    fn response_serde_events_carries_anchor_separately() {
        let response = Response::events(vec![], Anchor::Start);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"type":"events","events":[],"at":"start"}"#);

        let parsed: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn response_serde_status_flattens_info() {
        let response = Response::status(StatusInfo::new(3600, 12));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"uptime_seconds\":3600"));
        assert!(json.contains("\"event_count\":12"));
    }

    #[test]
    fn response_error_accessors() {
        let response = Response::error(ErrorCode::NotFound, "event `x` not found");
        assert!(!response.is_success());
        let error = response.as_error().unwrap();
        assert_eq!(error.code, ErrorCode::NotFound);

        assert!(Response::Pong.is_success());
        assert!(Response::Pong.as_error().is_none());
    }

    #[test]
    fn error_codes_serialize_snake_case() {
        let json = serde_json::to_string(&ErrorCode::ImpossibleDate).unwrap();
        assert_eq!(json, "\"impossible_date\"");
    }

    #[test]
    fn query_errors_map_to_codes() {
        let err = QueryError::MalformedDate {
            param: "from",
            input: "nope".to_string(),
        };
        let response = ErrorResponse::from(err);
        assert_eq!(response.code, ErrorCode::MalformedDate);
        assert!(response.message.contains("from"));

        let err = QueryError::ImpossibleDate {
            param: "to",
            input: "2021-02-30".to_string(),
        };
        assert_eq!(ErrorResponse::from(err).code, ErrorCode::ImpossibleDate);

        let err = QueryError::InvalidAnchor {
            input: "both".to_string(),
        };
        assert_eq!(ErrorResponse::from(err).code, ErrorCode::InvalidAnchor);
    }

    #[test]
    fn error_response_display() {
        let error = ErrorResponse::new(ErrorCode::InvalidAnchor, "`both` is not accepted");
        let rendered = error.to_string();
        assert!(rendered.contains("not an accepted value"));
        assert!(rendered.contains("both"));
    }
}
