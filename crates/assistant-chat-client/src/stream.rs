//! Pull-based, cancellable chat event stream.
//!
//! [`ChatStream`] wraps the upstream response body. Each call to
//! [`ChatStream::next_event`] reads just enough bytes to produce the next
//! decoded [`StreamEvent`]. The connection is dropped as soon as a finish
//! signal is delivered, a transport error occurs, or the stream is
//! cancelled through its [`CancelHandle`].

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::sync::watch;

use assistant_chat_core::{decode_payload, SseFramer, StreamEvent};

use crate::error::StreamError;

/// Raw body chunks as delivered by the transport.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, StreamError>>;

/// Handle that stops a [`ChatStream`] from another task.
///
/// Cancelling is idempotent. The stream reports it as
/// [`StreamError::Cancelled`], which consumers treat like a transport error.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Decoded event stream for one chat turn.
pub struct ChatStream {
    bytes: Option<ByteStream>,
    framer: SseFramer,
    queued: VecDeque<StreamEvent>,
    cancel: CancelHandle,
    cancel_rx: watch::Receiver<bool>,
    done: bool,
}

impl ChatStream {
    /// Wrap a stream of raw SSE body chunks.
    pub fn from_byte_stream<S>(bytes: S) -> Self
    where
        S: Stream<Item = Result<Vec<u8>, StreamError>> + Send + 'static,
    {
        let (tx, cancel_rx) = watch::channel(false);
        Self {
            bytes: Some(bytes.boxed()),
            framer: SseFramer::new(),
            queued: VecDeque::new(),
            cancel: CancelHandle { tx: Arc::new(tx) },
            cancel_rx,
            done: false,
        }
    }

    /// Wrap an upstream HTTP response whose body is an SSE feed.
    #[must_use]
    pub fn from_response(response: reqwest::Response) -> Self {
        let bytes = response.bytes_stream().map(|chunk| {
            chunk
                .map(|b| b.to_vec())
                .map_err(|e| StreamError::Transport(e.to_string()))
        });
        Self::from_byte_stream(bytes)
    }

    /// A handle that cancels this stream.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Whether the stream has ended (finished, failed or cancelled).
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.done
    }

    /// Pull the next event.
    ///
    /// Returns `None` once the stream is closed. After a
    /// [`StreamEvent::FinishSignal`] the connection is dropped and any later
    /// data is discarded. Parse errors are yielded as events and do not end
    /// the stream.
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent, StreamError>> {
        loop {
            if self.done {
                return None;
            }
            if *self.cancel_rx.borrow_and_update() {
                return Some(Err(self.terminate(StreamError::Cancelled)));
            }
            if let Some(event) = self.queued.pop_front() {
                if event.is_finish() {
                    self.close();
                }
                return Some(Ok(event));
            }

            let Some(bytes) = self.bytes.as_mut() else {
                return Some(Err(self.terminate(StreamError::Incomplete)));
            };

            let chunk = tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => continue,
                chunk = bytes.next() => chunk,
            };

            match chunk {
                Some(Ok(chunk)) => {
                    let payloads = self.framer.push(&chunk);
                    self.enqueue(payloads);
                }
                Some(Err(err)) => return Some(Err(self.terminate(err))),
                None => {
                    self.bytes = None;
                    let tail = self.framer.finish();
                    self.enqueue(tail);
                }
            }
        }
    }

    /// Drop the connection. Later calls to [`Self::next_event`] return `None`.
    pub fn close(&mut self) {
        self.bytes = None;
        self.queued.clear();
        self.done = true;
    }

    /// Adapt into a [`Stream`] of events.
    pub fn into_events(self) -> impl Stream<Item = Result<StreamEvent, StreamError>> + Send {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next_event().await.map(|item| (item, stream))
        })
    }

    fn enqueue(&mut self, payloads: impl IntoIterator<Item = String>) {
        for payload in payloads {
            self.queued.extend(decode_payload(&payload));
        }
    }

    fn terminate(&mut self, err: StreamError) -> StreamError {
        tracing::debug!(error = %err, "Closing chat stream");
        self.close();
        err
    }
}
