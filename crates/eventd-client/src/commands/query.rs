//! Query-side subcommands: events, month, show, status, ping, stop.
//!
//! All validation of the window parameters happens on the daemon; the
//! client forwards the raw strings and renders whatever comes back.

use eventd_protocol::{Request, Response};

use crate::error::{ClientError, ClientResult};
use crate::render;
use crate::socket::DaemonClient;

/// Runs a date-range query and prints the result.
pub async fn events(
    client: &DaemonClient,
    from: Option<String>,
    to: Option<String>,
    at: Option<String>,
    json: bool,
) -> ClientResult<()> {
    let request = Request::GetEvents { from, to, at };
    match client.request(request).await? {
        Response::Events { events, at } => {
            let rendered = if json {
                render::render_events_json(&events, at)?
            } else {
                render::render_events_text(&events, at)
            };
            println!("{rendered}");
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}

/// Runs a month-view query and prints the result.
pub async fn month(client: &DaemonClient, year: i32, month: u32, json: bool) -> ClientResult<()> {
    match client.request(Request::get_events_by_month(year, month)).await? {
        Response::Events { events, at } => {
            let rendered = if json {
                render::render_events_json(&events, at)?
            } else {
                render::render_events_text(&events, at)
            };
            println!("{rendered}");
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}

/// Fetches and prints a single event.
pub async fn show(client: &DaemonClient, id: String, json: bool) -> ClientResult<()> {
    match client.request(Request::get_event(id)).await? {
        Response::Event { event } => {
            let rendered = if json {
                render::render_event_json(&event)?
            } else {
                render::render_event_text(&event)
            };
            println!("{rendered}");
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}

/// Prints daemon status.
pub async fn status(client: &DaemonClient) -> ClientResult<()> {
    match client.request(Request::Status).await? {
        Response::Status { info } => {
            println!("{}", render::render_status_text(&info));
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}

/// Pings the daemon.
pub async fn ping(client: &DaemonClient) -> ClientResult<()> {
    match client.request(Request::Ping).await? {
        Response::Pong => {
            println!("pong");
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}

/// Asks the daemon to shut down.
pub async fn stop(client: &DaemonClient) -> ClientResult<()> {
    match client.request(Request::Shutdown).await? {
        Response::Ok => {
            println!("daemon stopping");
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error)),
        other => Err(ClientError::unexpected(&other)),
    }
}
