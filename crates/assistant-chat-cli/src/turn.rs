//! Background streaming of one chat turn.
//!
//! The spawned task owns the [`ChatStream`](assistant_chat_client::ChatStream)
//! and forwards every event it pulls to the event loop, which is the only
//! place the transcript is mutated. Events carry the turn number so anything
//! still queued from an abandoned turn can be told apart.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use assistant_chat_client::{AssistantApi, CancelHandle, StreamError};
use assistant_chat_core::{ChatTurn, StreamEvent};

/// Message from a turn task to the event loop.
#[derive(Debug)]
pub struct TurnEvent {
    /// Turn the event belongs to.
    pub turn: u64,
    /// What happened.
    pub kind: TurnEventKind,
}

/// Progress of a turn.
#[derive(Debug)]
pub enum TurnEventKind {
    /// The upstream accepted the request; the handle stops the stream.
    Opened(CancelHandle),
    /// A decoded event, in arrival order.
    Event(StreamEvent),
    /// The request failed before any event was produced.
    Rejected(String),
    /// The stream ended without a finish signal.
    Failed(StreamError),
}

/// Spawn the task that streams one turn into `tx`.
pub fn spawn_turn<A>(
    api: Arc<A>,
    assistant_name: String,
    history: Vec<ChatTurn>,
    turn: u64,
    tx: mpsc::Sender<TurnEvent>,
) -> JoinHandle<()>
where
    A: AssistantApi + 'static,
{
    tokio::spawn(async move { run_turn(api.as_ref(), &assistant_name, &history, turn, &tx).await })
}

async fn run_turn<A>(
    api: &A,
    assistant_name: &str,
    history: &[ChatTurn],
    turn: u64,
    tx: &mpsc::Sender<TurnEvent>,
) where
    A: AssistantApi,
{
    let mut stream = match api.open_chat(assistant_name, history).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(assistant = %assistant_name, error = %e, "Failed to open chat");
            forward(tx, turn, TurnEventKind::Rejected(e.to_string())).await;
            return;
        }
    };

    if !forward(tx, turn, TurnEventKind::Opened(stream.cancel_handle())).await {
        return;
    }

    let mut events = 0_usize;
    loop {
        let (kind, last) = match stream.next_event().await {
            Some(Ok(event)) => {
                events += 1;
                let last = event.is_finish();
                (TurnEventKind::Event(event), last)
            }
            Some(Err(err)) => (TurnEventKind::Failed(err), true),
            None => (TurnEventKind::Failed(StreamError::Incomplete), true),
        };
        // A closed receiver means the app moved on; dropping the stream
        // closes the connection.
        if !forward(tx, turn, kind).await || last {
            break;
        }
    }

    tracing::debug!(turn, events, "Turn stream closed");
}

/// Returns `false` once the receiver is gone.
async fn forward(tx: &mpsc::Sender<TurnEvent>, turn: u64, kind: TurnEventKind) -> bool {
    tx.send(TurnEvent { turn, kind }).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    async fn drain(mut rx: mpsc::Receiver<TurnEvent>) -> Vec<TurnEvent> {
        let mut out = Vec::new();
        while let Some(event) = rx.recv().await {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn forwards_events_until_finish() {
        let api = Arc::new(FakeApi::replying(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
        ]));
        let (tx, rx) = mpsc::channel(16);

        spawn_turn(api.clone(), "docs".into(), vec![ChatTurn::user("q")], 7, tx)
            .await
            .unwrap();
        let events = drain(rx).await;

        assert!(events.iter().all(|e| e.turn == 7));
        assert!(matches!(events[0].kind, TurnEventKind::Opened(_)));
        assert!(matches!(
            &events[1].kind,
            TurnEventKind::Event(StreamEvent::ContentDelta { text }) if text == "Hi"
        ));
        assert!(matches!(
            &events[2].kind,
            TurnEventKind::Event(e) if e.is_finish()
        ));
        assert_eq!(events.len(), 3);
        assert_eq!(api.chats(), vec![("docs".to_string(), 1)]);
    }

    #[tokio::test]
    async fn missing_finish_reports_incomplete() {
        let api = Arc::new(FakeApi::replying(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"part\"}}]}\n\n",
        ]));
        let (tx, rx) = mpsc::channel(16);

        spawn_turn(api, "docs".into(), Vec::new(), 1, tx).await.unwrap();
        let events = drain(rx).await;

        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(TurnEventKind::Failed(StreamError::Incomplete))
        ));
    }

    #[tokio::test]
    async fn open_failure_is_rejected() {
        let api = Arc::new(FakeApi::rejecting(503, "overloaded"));
        let (tx, rx) = mpsc::channel(16);

        spawn_turn(api, "docs".into(), Vec::new(), 1, tx).await.unwrap();
        let events = drain(rx).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0].kind,
            TurnEventKind::Rejected(msg) if msg.contains("overloaded")
        ));
    }
}
