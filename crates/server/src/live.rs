// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live calendar streaming for front-desk UIs.
//!
//! This module provides read-only, non-authoritative change notifications
//! via WebSocket connections. Events say that something changed; clients
//! must still query availability and appointments over HTTP.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - Events are published only after the change was committed
//! - No commands are executed over WebSocket connections
//! - No audit events are emitted for streaming activity

use agenda::{LifecycleEvent, LifecycleEventKind, LifecycleNotifier, NotifyError};
use agenda_domain::format_wall_clock;
use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// The appointment an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub appointment_id: i64,
    pub client_id: i64,
    pub staff_id: i64,
    /// Business-local start, `YYYY-MM-DD HH:MM:SS`.
    pub start_at: String,
    pub status: String,
}

impl From<&LifecycleEvent> for AppointmentSummary {
    fn from(event: &LifecycleEvent) -> Self {
        Self {
            appointment_id: event.appointment_id,
            client_id: event.client_id,
            staff_id: event.staff_id,
            start_at: format_wall_clock(event.start_at),
            status: event.status.to_string(),
        }
    }
}

/// Live calendar event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// An appointment was booked.
    BookingCreated(AppointmentSummary),
    /// An appointment was confirmed.
    BookingConfirmed(AppointmentSummary),
    /// An appointment started.
    BookingStarted(AppointmentSummary),
    /// An appointment was cancelled; its interval is free again.
    BookingCancelled(AppointmentSummary),
    /// An appointment was completed.
    BookingCompleted(AppointmentSummary),
    /// A schedule definition changed; cached availability is stale.
    ScheduleChanged {
        /// The schedule identifier.
        schedule_id: i64,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl From<&LifecycleEvent> for LiveEvent {
    fn from(event: &LifecycleEvent) -> Self {
        let summary = AppointmentSummary::from(event);
        match event.kind {
            LifecycleEventKind::Created => Self::BookingCreated(summary),
            LifecycleEventKind::Confirmed => Self::BookingConfirmed(summary),
            LifecycleEventKind::Started => Self::BookingStarted(summary),
            LifecycleEventKind::Cancelled => Self::BookingCancelled(summary),
            LifecycleEventKind::Completed => Self::BookingCompleted(summary),
        }
    }
}

/// Broadcaster for live calendar events.
///
/// This is a lightweight wrapper around `tokio::sync::broadcast` that allows
/// multiple WebSocket clients to receive change notifications.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    /// The broadcast channel sender.
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is silently dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleNotifier for LiveEventBroadcaster {
    fn notify(&self, event: &LifecycleEvent) -> Result<(), NotifyError> {
        self.broadcast(&LiveEvent::from(event));
        Ok(())
    }
}

/// Handles WebSocket upgrade requests for live event streaming.
///
/// # Arguments
///
/// * `ws` - WebSocket upgrade request
/// * `broadcaster` - The live event broadcaster from application state
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Sends a connection confirmation, then streams all live events until
/// the client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live event stream");
}
