//! Session table for the SSE transport.
//!
//! Each open event stream owns one session. Posted messages are routed to a
//! stream by looking its sender up here and pushing onto the channel, so a
//! slow client never blocks anyone else. The entry is removed when the
//! stream is dropped, which is how axum reports a client disconnect.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::error::GatewayError;
use super::jsonrpc::JsonRpcResponse;

/// Server-assigned session identifier, rendered as 32 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

type SessionSender = mpsc::UnboundedSender<JsonRpcResponse>;

/// Map from session id to the sending half of its stream.
///
/// Insert, remove and lookup each hold the lock for a single map operation,
/// so they are atomic with respect to each other.
#[derive(Clone, Default)]
pub struct SessionTable {
    sessions: Arc<RwLock<HashMap<SessionId, SessionSender>>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return the stream its messages arrive on.
    pub fn open(&self) -> (SessionId, SessionStream) {
        let id = SessionId::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.write().insert(id, sender);
        debug!("Session {} opened", id);

        let stream = SessionStream {
            receiver,
            _guard: SessionGuard {
                table: self.clone(),
                id,
            },
        };
        (id, stream)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.read().contains_key(id)
    }

    /// Push a message onto a session's stream.
    ///
    /// Fails with [`GatewayError::UnknownSession`] if the session does not
    /// exist or its stream has already gone away.
    pub fn deliver(&self, id: &SessionId, message: JsonRpcResponse) -> Result<(), GatewayError> {
        let delivered = match self.read().get(id) {
            Some(sender) => sender.send(message).is_ok(),
            None => return Err(GatewayError::UnknownSession(id.to_string())),
        };

        if !delivered {
            self.close(id);
            return Err(GatewayError::UnknownSession(id.to_string()));
        }
        Ok(())
    }

    /// Remove a session. Returns whether it existed.
    pub fn close(&self, id: &SessionId) -> bool {
        self.write().remove(id).is_some()
    }

    /// Remove every session, ending all open streams. Returns how many
    /// were open.
    pub fn close_all(&self) -> usize {
        self.write().drain().count()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, SessionSender>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, SessionSender>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes the session from the table when dropped.
struct SessionGuard {
    table: SessionTable,
    id: SessionId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.table.close(&self.id) {
            debug!("Session {} closed", self.id);
        }
    }
}

/// Messages routed to one session, in delivery order.
pub struct SessionStream {
    receiver: mpsc::UnboundedReceiver<JsonRpcResponse>,
    _guard: SessionGuard,
}

impl Stream for SessionStream {
    type Item = JsonRpcResponse;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, StreamExt};
    use serde_json::json;

    fn message(n: i64) -> JsonRpcResponse {
        JsonRpcResponse::success(Some(json!(n)), json!({}))
    }

    #[test]
    fn test_session_id_round_trip() {
        let id = SessionId::new();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rendered.parse::<SessionId>().unwrap(), id);
        assert!("not-a-session".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_distinct_sessions() {
        let table = SessionTable::new();
        let (a, _stream_a) = table.open();
        let (b, _stream_b) = table.open();
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_delivery_is_routed_by_id() {
        let table = SessionTable::new();
        let (a, mut stream_a) = table.open();
        let (_b, mut stream_b) = table.open();

        tokio_test::assert_ok!(table.deliver(&a, message(1)));

        let received = stream_a.next().await.unwrap();
        assert_eq!(received.id, Some(json!(1)));
        assert!(stream_b.next().now_or_never().is_none());
    }

    #[test]
    fn test_unknown_session() {
        let table = SessionTable::new();
        let (_a, mut stream_a) = table.open();

        let err = table.deliver(&SessionId::new(), message(1)).unwrap_err();
        assert!(matches!(err, GatewayError::UnknownSession(_)));
        assert!(stream_a.next().now_or_never().is_none());
    }

    #[test]
    fn test_drop_removes_session() {
        let table = SessionTable::new();
        let (id, stream) = table.open();
        assert!(table.contains(&id));

        drop(stream);
        assert!(!table.contains(&id));
        assert!(table.is_empty());
        assert!(table.deliver(&id, message(1)).is_err());
    }

    #[tokio::test]
    async fn test_close_all_ends_streams() {
        let table = SessionTable::new();
        let (_a, mut stream_a) = table.open();
        let (_b, _stream_b) = table.open();

        assert_eq!(table.close_all(), 2);
        assert!(table.is_empty());
        assert!(stream_a.next().await.is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let table = SessionTable::new();
        let (id, _stream) = table.open();
        assert!(table.close(&id));
        assert!(!table.close(&id));
    }
}
