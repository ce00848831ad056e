//! Drives a [`ChatStream`] into a [`Transcript`].

use assistant_chat_core::{Applied, Message, StreamEvent, Transcript};

use crate::error::StreamError;
use crate::stream::ChatStream;

/// Feed events from `stream` into `transcript` until the reply is sealed.
///
/// `observe` is called after each event is applied, so a front end can
/// render the open message incrementally. On any stream error the turn is
/// failed on the transcript (partial content is kept) and the error is
/// returned.
///
/// # Errors
///
/// Returns the [`StreamError`] that ended the turn.
pub async fn relay_turn<F>(
    stream: &mut ChatStream,
    transcript: &mut Transcript,
    mut observe: F,
) -> Result<(), StreamError>
where
    F: FnMut(&StreamEvent, &Transcript),
{
    let mut events = 0_usize;

    while let Some(item) = stream.next_event().await {
        match item {
            Ok(event) => {
                events += 1;
                let applied = transcript.apply(&event);
                observe(&event, transcript);
                if applied == Applied::Sealed {
                    tracing::debug!(events, "Chat turn complete");
                    return Ok(());
                }
            }
            Err(err) => return Err(fail_turn(transcript, err, events)),
        }
    }

    Err(fail_turn(transcript, StreamError::Incomplete, events))
}

/// Accumulate a whole reply without intermediate rendering.
///
/// # Errors
///
/// Returns the [`StreamError`] that ended the turn; partial content is
/// discarded.
pub async fn collect_reply(stream: &mut ChatStream) -> Result<Message, StreamError> {
    let mut transcript = Transcript::awaiting_reply();
    relay_turn(stream, &mut transcript, |_, _| {}).await?;
    transcript
        .last_reply()
        .cloned()
        .ok_or(StreamError::Incomplete)
}

fn fail_turn(transcript: &mut Transcript, err: StreamError, events: usize) -> StreamError {
    tracing::warn!(error = %err, events, "Chat turn failed");
    transcript.fail(err.to_string());
    err
}
