//! Request/response dispatch handler.
//!
//! Routes incoming protocol requests to the query engine. Validation runs
//! first and short-circuits: an invalid `from`/`to`/`at` never reaches the
//! store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use eventd_core::{DateError, QueryParams};
use eventd_protocol::{ErrorCode, ErrorResponse, Request, Response};
use eventd_store::{
    EngineError, MemoryStore, StoreError, fetch_event, query_events, query_events_by_month,
};

use crate::error::{ServerError, ServerResult};
use crate::socket::Connection;

/// Server state shared across all connections.
pub struct ServerState {
    /// Daemon start time.
    start_time: DateTime<Utc>,
    /// The event store queries run against.
    store: Arc<MemoryStore>,
    /// Whether shutdown has been requested.
    shutdown_requested: bool,
}

impl ServerState {
    /// Creates a new server state over the given store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            start_time: Utc::now(),
            store,
            shutdown_requested: false,
        }
    }

    /// Returns the daemon uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        let duration = Utc::now() - self.start_time;
        duration.num_seconds().max(0) as u64
    }

    /// Returns the store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Requests a shutdown.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    /// Returns true if shutdown has been requested.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }
}

/// Shared server state.
pub type SharedState = Arc<RwLock<ServerState>>;

/// Creates a new shared state over the given store.
pub fn new_shared_state(store: Arc<MemoryStore>) -> SharedState {
    Arc::new(RwLock::new(ServerState::new(store)))
}

/// Request handler that processes incoming requests and produces responses.
pub struct RequestHandler {
    state: SharedState,
}

impl RequestHandler {
    /// Creates a new request handler with the given state.
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Handles a single request and returns the response.
    #[tracing::instrument(skip_all, fields(request_type))]
    pub async fn handle(&self, request: &Request) -> Response {
        use tracing::Span;

        Span::current().record("request_type", tracing::field::debug(request));

        match request {
            Request::Ping => {
                debug!("Handling Ping request");
                Response::Pong
            }
            Request::Status => {
                debug!("Handling Status request");
                let state = self.state.read().await;
                let info = eventd_protocol::StatusInfo::new(
                    state.uptime_seconds(),
                    state.store().len(),
                );
                Response::status(info)
            }
            Request::GetEvents { from, to, at } => {
                debug!(?from, ?to, ?at, "Handling GetEvents request");
                let params = match QueryParams::from_request(
                    from.as_deref(),
                    to.as_deref(),
                    at.as_deref(),
                ) {
                    Ok(params) => params,
                    Err(err) => {
                        debug!(error = %err, "Rejecting invalid query parameters");
                        return Response::from_error(err.into());
                    }
                };

                let state = self.state.read().await;
                match query_events(state.store(), &params) {
                    Ok(outcome) => {
                        debug!(count = outcome.events.len(), "Returning events");
                        Response::events(outcome.events, outcome.at)
                    }
                    Err(err) => Response::from_error(engine_error(err)),
                }
            }
            Request::GetEventsByMonth { year, month } => {
                debug!(year, month, "Handling GetEventsByMonth request");
                let state = self.state.read().await;
                match query_events_by_month(state.store(), *year, *month) {
                    Ok(events) => {
                        debug!(count = events.len(), "Returning month events");
                        // month views filter on the start field
                        Response::events(events, eventd_core::Anchor::Start)
                    }
                    Err(err) => Response::from_error(engine_error(err)),
                }
            }
            Request::GetEvent { id } => {
                debug!(id = %id, "Handling GetEvent request");
                let state = self.state.read().await;
                match fetch_event(state.store(), id) {
                    Ok(event) => Response::event(event),
                    Err(err) => Response::from_error(engine_error(err)),
                }
            }
            Request::Shutdown => {
                info!("Handling Shutdown request");
                let mut state = self.state.write().await;
                state.request_shutdown();
                Response::Ok
            }
        }
    }

    /// Handles a connection, processing requests until the peer disconnects.
    pub async fn handle_connection(&self, mut conn: Connection) -> ServerResult<()> {
        loop {
            match conn.read_request().await {
                Ok(Some(envelope)) => {
                    let response = self.handle(&envelope.payload).await;
                    conn.respond(&envelope.request_id, response).await?;

                    if self.state.read().await.shutdown_requested() {
                        return Err(ServerError::Shutdown);
                    }
                }
                Ok(None) => {
                    debug!("Client disconnected");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "Error reading request");
                    return Err(e);
                }
            }
        }
    }
}

/// Maps engine failures onto wire error codes.
fn engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Date(DateError::InvalidMonth { month }) => ErrorResponse::new(
            ErrorCode::InvalidMonth,
            format!("month {month} is out of range, use 1-12"),
        ),
        EngineError::Date(err) => ErrorResponse::new(ErrorCode::InvalidRequest, err.to_string()),
        EngineError::Store(StoreError::NotFound { id }) => {
            ErrorResponse::new(ErrorCode::NotFound, format!("event `{id}` not found"))
        }
        EngineError::Store(err) => ErrorResponse::new(ErrorCode::StoreError, err.to_string()),
    }
}

/// Creates a connection handler closure for `SocketServer::run`.
pub fn make_connection_handler(
    state: SharedState,
) -> impl Fn(Connection) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>>
+ Send
+ Sync
+ 'static {
    move |conn| {
        let handler = RequestHandler::new(state.clone());
        Box::pin(async move {
            if let Err(e) = handler.handle_connection(conn).await
                && !matches!(e, ServerError::Shutdown)
            {
                warn!(error = %e, "Connection handler error");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventd_store::{MetaField, RawRecord};
    use url::Url;

    fn seeded_state() -> SharedState {
        let store = MemoryStore::with_records(
            Url::parse("https://example.org/").unwrap(),
            vec![
                RawRecord::new("fair", "Spring Fair", "2024-01-01 00:00:00")
                    .with_meta(MetaField::Start, "2024-05-01 08:00:00")
                    .with_meta(MetaField::End, "2024-05-01 18:00:00"),
                RawRecord::new("club", "Monthly Club", "2024-01-01 00:00:00")
                    .with_meta(MetaField::Start, "2024-02-01 19:00:00")
                    .with_meta(MetaField::End, "2024-02-01 21:00:00")
                    .with_meta(MetaField::Repeat, "100"),
            ],
        );
        new_shared_state(Arc::new(store))
    }

    #[tokio::test]
    async fn ping() {
        let handler = RequestHandler::new(seeded_state());
        assert_eq!(handler.handle(&Request::Ping).await, Response::Pong);
    }

    #[tokio::test]
    async fn status_reports_event_count() {
        let handler = RequestHandler::new(seeded_state());
        match handler.handle(&Request::Status).await {
            Response::Status { info } => {
                assert!(info.uptime_seconds < 2);
                assert_eq!(info.event_count, 2);
            }
            other => panic!("expected Status response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_events_unbounded() {
        let handler = RequestHandler::new(seeded_state());
        match handler.handle(&Request::get_events()).await {
            Response::Events { events, at } => {
                assert_eq!(events.len(), 2);
                assert_eq!(at, eventd_core::Anchor::Overlap);
            }
            other => panic!("expected Events response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_events_window_keeps_recurring() {
        let handler = RequestHandler::new(seeded_state());
        let request = Request::get_events_in(Some("2030-01-01"), Some("2030-01-31"), None);
        match handler.handle(&request).await {
            Response::Events { events, .. } => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].id, "club");
            }
            other => panic!("expected Events response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_events_rejects_malformed_date() {
        let handler = RequestHandler::new(seeded_state());
        let request = Request::get_events_in(Some("05/01/2024"), None, None);
        match handler.handle(&request).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::MalformedDate);
                assert!(error.message.contains("from"));
            }
            other => panic!("expected Error response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_events_rejects_impossible_date() {
        let handler = RequestHandler::new(seeded_state());
        let request = Request::get_events_in(None, Some("2024-02-30"), None);
        match handler.handle(&request).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::ImpossibleDate);
            }
            other => panic!("expected Error response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_events_rejects_invalid_anchor() {
        let handler = RequestHandler::new(seeded_state());
        let request = Request::get_events_in(None, None, Some("both"));
        match handler.handle(&request).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::InvalidAnchor);
            }
            other => panic!("expected Error response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn month_query_excludes_out_of_month_recurring() {
        let handler = RequestHandler::new(seeded_state());
        match handler.handle(&Request::get_events_by_month(2024, 5)).await {
            Response::Events { events, .. } => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].id, "fair");
            }
            other => panic!("expected Events response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn month_query_rejects_bad_month() {
        let handler = RequestHandler::new(seeded_state());
        match handler.handle(&Request::get_events_by_month(2024, 0)).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::InvalidMonth);
            }
            other => panic!("expected Error response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_event_found_and_missing() {
        let handler = RequestHandler::new(seeded_state());

        match handler.handle(&Request::get_event("fair")).await {
            Response::Event { event } => {
                assert_eq!(event.title, "Spring Fair");
                assert_eq!(event.url, "https://example.org/events/fair");
            }
            other => panic!("expected Event response, got {other:?}"),
        }

        match handler.handle(&Request::get_event("missing")).await {
            Response::Error { error } => assert_eq!(error.code, ErrorCode::NotFound),
            other => panic!("expected Error response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn shutdown_sets_flag() {
        let state = seeded_state();
        let handler = RequestHandler::new(state.clone());

        assert_eq!(handler.handle(&Request::Shutdown).await, Response::Ok);
        assert!(state.read().await.shutdown_requested());
    }
}
