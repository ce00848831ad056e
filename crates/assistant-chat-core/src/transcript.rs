//! Transcript accumulator.
//!
//! The transcript owns the ordered message list and folds decoded stream
//! events into the single open assistant message. Each chat turn runs this
//! state machine:
//!
//! ```text
//!            submit / begin_reply
//!   Idle ─────────────────────────▶ AwaitingResponse ◀─┐
//!    ▲                                 │   │            │ ContentDelta
//!    │ FinishSignal (seal)             │   └────────────┘ ReferenceDelta
//!    └─────────────────────────────────┤
//!    │ fail (drop if empty, flag error)│
//!    └─────────────────────────────────┘
//! ```
//!
//! The transcript is deliberately not `Sync`-guarded: it is mutated only by
//! the single consumer of the stream.

use crate::error::TranscriptError;
use crate::event::StreamEvent;
use crate::message::{merge_reference, ChatTurn, Message, Reference, Role};

/// Phase of the current chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No reply is streaming; input is accepted.
    Idle,
    /// An assistant message is open and receiving deltas.
    AwaitingResponse,
}

/// Effect of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The open message changed.
    Updated,
    /// The open message was sealed; the transcript is idle again.
    Sealed,
    /// Nothing changed (parse error, or no message was open).
    Ignored,
}

/// Ordered list of messages for one conversation.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    referenced_files: Vec<Reference>,
    open: Option<usize>,
    error: Option<String>,
}

impl Transcript {
    /// Create an empty, idle transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle transcript seeded with already-complete turns.
    pub fn from_history(turns: impl IntoIterator<Item = ChatTurn>) -> Self {
        Self {
            messages: turns
                .into_iter()
                .map(|turn| Message::new(turn.role, turn.content))
                .collect(),
            ..Self::default()
        }
    }

    /// Create a transcript holding only an open, empty assistant reply.
    ///
    /// Used when the caller already sent the history upstream and only needs
    /// to accumulate the answer.
    #[must_use]
    pub fn awaiting_reply() -> Self {
        Self {
            messages: vec![Message::assistant_placeholder()],
            open: Some(0),
            ..Self::default()
        }
    }

    /// All messages in insertion order, including the open one.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Every reference seen this session, unique by key, in first-seen order.
    #[must_use]
    pub fn referenced_files(&self) -> &[Reference] {
        &self.referenced_files
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> TurnState {
        if self.open.is_some() {
            TurnState::AwaitingResponse
        } else {
            TurnState::Idle
        }
    }

    /// Whether a reply is streaming.
    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        self.open.is_some()
    }

    /// The assistant message currently receiving deltas.
    #[must_use]
    pub fn open_message(&self) -> Option<&Message> {
        self.open.and_then(|idx| self.messages.get(idx))
    }

    /// The most recent assistant message, open or sealed.
    #[must_use]
    pub fn last_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Error from the last failed turn, cleared by the next submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The `{role, content}` pairs of every message except the open one.
    #[must_use]
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != self.open)
            .map(|(_, m)| m.to_turn())
            .collect()
    }

    /// Accept user input and open an assistant reply.
    ///
    /// Returns the history to send upstream, ending with the new user turn.
    ///
    /// # Errors
    ///
    /// - [`TranscriptError::Busy`] while a reply is streaming.
    /// - [`TranscriptError::EmptyInput`] for blank input.
    pub fn submit(&mut self, input: &str) -> Result<Vec<ChatTurn>, TranscriptError> {
        if self.is_awaiting() {
            return Err(TranscriptError::Busy);
        }
        if input.trim().is_empty() {
            return Err(TranscriptError::EmptyInput);
        }

        self.messages.push(Message::user(input));
        self.begin_reply()
    }

    /// Open an empty assistant reply after the existing history.
    ///
    /// Returns the history to send upstream.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Busy`] while a reply is streaming.
    pub fn begin_reply(&mut self) -> Result<Vec<ChatTurn>, TranscriptError> {
        if self.is_awaiting() {
            return Err(TranscriptError::Busy);
        }

        self.error = None;
        let history = self.history();
        self.messages.push(Message::assistant_placeholder());
        self.open = Some(self.messages.len() - 1);
        Ok(history)
    }

    /// Fold one stream event into the transcript.
    ///
    /// Events arriving while idle (after sealing, or duplicated) are ignored.
    pub fn apply(&mut self, event: &StreamEvent) -> Applied {
        let Some(idx) = self.open else {
            tracing::debug!(?event, "Ignoring stream event with no open message");
            return Applied::Ignored;
        };

        match event {
            StreamEvent::ContentDelta { text } => {
                self.messages[idx].content.push_str(text);
                Applied::Updated
            }
            StreamEvent::ReferenceDelta { references } => {
                let message = &mut self.messages[idx];
                for reference in references {
                    message.add_reference(reference);
                    merge_reference(&mut self.referenced_files, reference);
                }
                Applied::Updated
            }
            StreamEvent::FinishSignal { reason } => {
                tracing::debug!(
                    reason = %reason,
                    chars = self.messages[idx].content.len(),
                    "Reply sealed"
                );
                self.open = None;
                Applied::Sealed
            }
            StreamEvent::ParseError { .. } => Applied::Ignored,
        }
    }

    /// End the open turn after a fatal error.
    ///
    /// The open message is removed if it received no content, otherwise kept
    /// with what arrived. The error is recorded either way. Returns `true`
    /// if the open message was removed.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        let error = error.into();
        let removed = match self.open.take() {
            Some(idx) if self.messages[idx].content.is_empty() => {
                self.messages.remove(idx);
                true
            }
            _ => false,
        };
        tracing::debug!(error = %error, removed_empty_reply = removed, "Turn failed");
        self.error = Some(error);
        removed
    }

    /// Drop every message and reference to start a new conversation.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Busy`] while a reply is streaming.
    pub fn reset(&mut self) -> Result<(), TranscriptError> {
        if self.is_awaiting() {
            return Err(TranscriptError::Busy);
        }
        *self = Self::default();
        Ok(())
    }
}

/// Pure transition: `state` after `event`.
#[must_use]
pub fn apply(mut state: Transcript, event: &StreamEvent) -> Transcript {
    state.apply(event);
    state
}
