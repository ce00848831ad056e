//! Application state.
//!
//! [`App`] owns the transcript and everything the UI shows. Chat turns stream
//! in a background task (see [`crate::turn`]); their events come back through
//! the event loop and are applied here, one at a time, so the transcript has
//! a single writer.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use assistant_chat_client::{AssistantApi, CancelHandle, ClientError, FileUpload, StreamError};
use assistant_chat_core::{Applied, FileDescriptor, StreamEvent, Transcript};

use crate::commands::{self, Command, HELP_TEXT};
use crate::turn::{spawn_turn, TurnEvent, TurnEventKind};

/// Which list the side panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidePanel {
    /// Files attached to the assistant.
    #[default]
    Files,
    /// Files cited so far in this conversation.
    References,
}

impl SidePanel {
    /// Switch to the other list.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Files => Self::References,
            Self::References => Self::Files,
        }
    }
}

/// Input mode for special operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Typing goes to the chat input.
    #[default]
    Normal,
    /// Confirming that the conversation should be discarded.
    ConfirmingReset,
}

/// What the assistant existence check found at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantStatus {
    /// Not checked yet.
    Unknown,
    /// Listed upstream.
    Found,
    /// Not listed upstream; chat requests will fail.
    Missing,
}

/// A turn whose task is still running.
struct ActiveTurn {
    /// Present once the upstream accepted the request.
    cancel: Option<CancelHandle>,
    task: JoinHandle<()>,
}

/// Application state.
pub struct App<A> {
    api: Arc<A>,
    /// Assistant every request targets.
    pub assistant_name: String,
    /// Base URL shown in the header.
    pub base_url: String,
    /// Result of the startup existence check.
    pub assistant_status: AssistantStatus,
    /// The conversation.
    pub transcript: Transcript,
    /// Files attached to the assistant, as last listed.
    pub files: Vec<FileDescriptor>,
    /// Which list the side panel shows.
    pub panel: SidePanel,
    /// Whether citations are rendered under replies.
    pub show_citations: bool,
    /// Current input buffer.
    pub input: String,
    /// Cursor position in input, in characters.
    pub cursor_position: usize,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether single-key commands are active instead of typing.
    pub command_mode: bool,
    /// Lines scrolled up from the bottom of the chat.
    pub chat_scroll: usize,
    /// Status message to display.
    pub status_message: Option<String>,
    /// Error message to display.
    pub error_message: Option<String>,
    /// Persistent warning (e.g. the assistant does not exist).
    pub warning: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Animation frame counter for loading indicators.
    pub animation_frame: usize,
    turn: u64,
    active: Option<ActiveTurn>,
    turn_tx: mpsc::Sender<TurnEvent>,
    saved_chat_input: Option<(String, usize)>,
}

impl<A> App<A>
where
    A: AssistantApi + 'static,
{
    /// Create the application. Turn events are sent to `turn_tx`.
    pub fn new(api: Arc<A>, base_url: impl Into<String>, turn_tx: mpsc::Sender<TurnEvent>) -> Self {
        let assistant_name = api.assistant_name().to_string();
        Self {
            api,
            assistant_name,
            base_url: base_url.into(),
            assistant_status: AssistantStatus::Unknown,
            transcript: Transcript::new(),
            files: Vec::new(),
            panel: SidePanel::Files,
            show_citations: false,
            input: String::new(),
            cursor_position: 0,
            input_mode: InputMode::Normal,
            command_mode: false,
            chat_scroll: 0,
            status_message: None,
            error_message: None,
            warning: None,
            should_quit: false,
            animation_frame: 0,
            turn: 0,
            active: None,
            turn_tx,
            saved_chat_input: None,
        }
    }

    /// Render citations under replies from the start.
    #[must_use]
    pub fn with_citations(mut self, show: bool) -> Self {
        self.show_citations = show;
        self
    }

    // =========================================================================
    // Display State
    // =========================================================================

    /// Tick the animation frame (call on each render).
    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Get current spinner character for loading animation.
    #[must_use]
    pub fn spinner_char(&self) -> &'static str {
        const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    /// Set the status message (also clears any error).
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.error_message = None;
    }

    /// Set the error message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Clear the error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Whether a reply is streaming.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.transcript.is_awaiting()
    }

    /// Check if UI needs high-frequency redraws (during streaming).
    #[must_use]
    pub const fn needs_immediate_redraw(&self) -> bool {
        self.is_streaming()
    }

    /// Scroll chat up (view older messages).
    pub fn scroll_chat_up(&mut self, amount: usize) {
        self.chat_scroll = self.chat_scroll.saturating_add(amount);
    }

    /// Scroll chat down (view newer messages).
    pub fn scroll_chat_down(&mut self, amount: usize) {
        self.chat_scroll = self.chat_scroll.saturating_sub(amount);
    }

    /// Flip between the file list and the referenced files.
    pub fn toggle_panel(&mut self) {
        self.panel = self.panel.next();
    }

    /// Flip citation rendering.
    pub fn toggle_citations(&mut self) {
        self.show_citations = !self.show_citations;
        self.set_status(if self.show_citations {
            "Citations shown"
        } else {
            "Citations hidden"
        });
    }

    /// Enter a dialog mode, saving the current chat input.
    pub fn enter_dialog_mode(&mut self, mode: InputMode) {
        self.saved_chat_input = Some((std::mem::take(&mut self.input), self.cursor_position));
        self.cursor_position = 0;
        self.input_mode = mode;
    }

    /// Exit dialog mode, restoring the saved chat input.
    pub fn exit_dialog_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        if let Some((input, cursor)) = self.saved_chat_input.take() {
            self.input = input;
            self.cursor_position = cursor;
        } else {
            self.clear_input();
        }
    }

    // =========================================================================
    // Input Handling
    // =========================================================================

    fn byte_index(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(idx, _)| idx)
    }

    fn input_chars(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor_position);
        self.input.insert(idx, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index(self.cursor_position);
            self.input.remove(idx);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.input_chars() {
            let idx = self.byte_index(self.cursor_position);
            self.input.remove(idx);
        }
    }

    /// Delete back to the start of the previous word.
    pub fn delete_word(&mut self) {
        while self.cursor_position > 0 {
            self.delete_char();
            let prev = self
                .cursor_position
                .checked_sub(1)
                .and_then(|i| self.input.chars().nth(i));
            if prev == Some(' ') {
                break;
            }
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input_chars() {
            self.cursor_position += 1;
        }
    }

    /// Move cursor to the start.
    pub fn move_cursor_start(&mut self) {
        self.cursor_position = 0;
    }

    /// Move cursor to the end.
    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input_chars();
    }

    /// Clear the input.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Take the current input (clears it).
    pub fn take_input(&mut self) -> String {
        let input = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        input
    }

    /// Send the input as a chat message or run it as a command.
    pub async fn submit_input(&mut self) {
        let input = self.take_input();
        match commands::parse(&input) {
            Some(Ok(command)) => self.run_command(command).await,
            Some(Err(e)) => self.set_error(e.to_string()),
            None => self.send_message(&input),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Execute a slash command.
    pub async fn run_command(&mut self, command: Command) {
        match command {
            Command::Files => match self.refresh_files().await {
                Ok(()) => {
                    self.panel = SidePanel::Files;
                    self.set_status(format!("Found {} file(s)", self.files.len()));
                }
                Err(e) => self.set_error(format!("Failed to list files: {e}")),
            },
            Command::Upload { path, metadata } => {
                if let Err(e) = self.upload(&path, metadata).await {
                    self.set_error(format!("Upload failed: {e}"));
                }
            }
            Command::Refs => {
                self.panel = SidePanel::References;
                let count = self.transcript.referenced_files().len();
                self.set_status(format!("{count} file(s) referenced this session"));
            }
            Command::Citations => self.toggle_citations(),
            Command::New => {
                if self.transcript.messages().is_empty() {
                    self.reset_conversation();
                } else {
                    self.enter_dialog_mode(InputMode::ConfirmingReset);
                }
            }
            Command::Help => self.set_status(HELP_TEXT),
            Command::Quit => self.should_quit = true,
        }
    }

    /// Discard the conversation and its referenced files.
    pub fn reset_conversation(&mut self) {
        match self.transcript.reset() {
            Ok(()) => {
                self.chat_scroll = 0;
                self.set_status("New conversation");
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // =========================================================================
    // API Operations
    // =========================================================================

    /// Verify the configured assistant exists, warning if it does not.
    pub async fn check_assistant(&mut self) {
        match self.api.assistant_exists(&self.assistant_name).await {
            Ok(true) => {
                self.assistant_status = AssistantStatus::Found;
                self.warning = None;
            }
            Ok(false) => {
                tracing::warn!(assistant = %self.assistant_name, "Assistant not found");
                self.assistant_status = AssistantStatus::Missing;
                self.warning = Some(format!(
                    "Assistant '{}' not found; chat requests will fail",
                    self.assistant_name
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check assistant");
                self.warning = Some(format!("Could not verify assistant: {e}"));
            }
        }
    }

    /// Reload the assistant's file list.
    ///
    /// # Errors
    ///
    /// Returns the client error if the listing fails; the previous list is
    /// kept.
    pub async fn refresh_files(&mut self) -> Result<(), ClientError> {
        self.files = self.api.list_files(&self.assistant_name).await?;
        Ok(())
    }

    /// Upload a local file and add it to the file list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read, or the
    /// upstream error if the upload is rejected.
    pub async fn upload(&mut self, path: &Path, metadata: Option<Value>) -> Result<(), ClientError> {
        let mut upload = FileUpload::from_path(path).await?;
        if let Some(metadata) = metadata {
            upload = upload.with_metadata(metadata);
        }
        let name = upload.file_name.clone();
        let size = upload.bytes.len();

        self.set_status(format!("Uploading {name}..."));
        let descriptor = self.api.upload_file(&self.assistant_name, upload).await?;

        tracing::info!(file = %name, bytes = size, id = %descriptor.id, "File uploaded");
        self.set_status(format!("Uploaded {name} ({})", descriptor.id));
        self.files.retain(|f| f.id != descriptor.id);
        self.files.push(descriptor);
        self.panel = SidePanel::Files;
        Ok(())
    }

    // =========================================================================
    // Chat Turns
    // =========================================================================

    /// Submit a user message and start streaming the reply.
    pub fn send_message(&mut self, content: &str) {
        let history = match self.transcript.submit(content) {
            Ok(history) => history,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        self.turn += 1;
        tracing::debug!(turn = self.turn, turns = history.len(), "Starting chat turn");
        let task = spawn_turn(
            Arc::clone(&self.api),
            self.assistant_name.clone(),
            history,
            self.turn,
            self.turn_tx.clone(),
        );
        self.active = Some(ActiveTurn { cancel: None, task });
        self.chat_scroll = 0;
        self.set_status("Assistant responding... (Esc to cancel)");
    }

    /// Apply an event from a turn task.
    ///
    /// Returns `true` if the UI should be redrawn immediately.
    pub fn handle_turn_event(&mut self, event: TurnEvent) -> bool {
        if event.turn != self.turn || self.active.is_none() {
            tracing::debug!(turn = event.turn, current = self.turn, "Dropping event from finished turn");
            return false;
        }

        match event.kind {
            TurnEventKind::Opened(handle) => {
                if let Some(active) = self.active.as_mut() {
                    active.cancel = Some(handle);
                }
                false
            }
            TurnEventKind::Event(event) => self.apply_stream_event(&event),
            TurnEventKind::Rejected(message) => {
                self.end_turn();
                self.transcript.fail(message.clone());
                self.set_error(format!("Request failed: {message}"));
                true
            }
            TurnEventKind::Failed(err) => {
                self.end_turn();
                self.transcript.fail(err.to_string());
                if err == StreamError::Cancelled {
                    self.set_status("Cancelled");
                } else {
                    self.set_error(format!("Reply interrupted: {err}"));
                }
                true
            }
        }
    }

    fn apply_stream_event(&mut self, event: &StreamEvent) -> bool {
        match self.transcript.apply(event) {
            Applied::Updated => {
                self.chat_scroll = 0;
                true
            }
            Applied::Sealed => {
                self.end_turn();
                let references = self
                    .transcript
                    .last_reply()
                    .map_or(0, |m| m.references.len());
                self.set_status(format!("Reply complete ({references} reference(s))"));
                self.chat_scroll = 0;
                true
            }
            Applied::Ignored => false,
        }
    }

    fn end_turn(&mut self) {
        self.active = None;
    }

    /// Cancel the current streaming response.
    ///
    /// Once the stream is open the cancellation is reported back by the
    /// stream itself. Before that, the request task is aborted and the turn
    /// fails here. Returns `false` if nothing was streaming.
    pub fn cancel_streaming(&mut self) -> bool {
        let Some(active) = self.active.as_ref() else {
            return false;
        };

        if let Some(cancel) = &active.cancel {
            cancel.cancel();
            self.set_status("Cancelling...");
        } else {
            active.task.abort();
            self.end_turn();
            self.transcript.fail(StreamError::Cancelled.to_string());
            self.set_status("Cancelled");
        }
        true
    }

    /// Stop any running turn before exiting.
    pub fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            if let Some(cancel) = active.cancel {
                cancel.cancel();
            }
            active.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use std::io::Write;

    const HI_THERE: &[&str] = &[
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" there\",\"references\":[{\"file\":{\"id\":\"f1\",\"name\":\"manual.pdf\"}}]}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    ];

    fn new_app(api: FakeApi) -> (App<FakeApi>, mpsc::Receiver<TurnEvent>) {
        let (tx, rx) = mpsc::channel(64);
        (App::new(Arc::new(api), "https://api.example.com", tx), rx)
    }

    async fn pump(app: &mut App<FakeApi>, rx: &mut mpsc::Receiver<TurnEvent>) {
        while app.is_streaming() {
            let event = rx.recv().await.unwrap();
            app.handle_turn_event(event);
        }
    }

    #[test]
    fn input_editing_handles_multibyte_chars() {
        let (mut app, _rx) = new_app(FakeApi::default());
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.move_cursor_left();
        app.move_cursor_left();
        app.insert_char('X');
        assert_eq!(app.input, "hélXlo");

        app.move_cursor_start();
        app.move_cursor_right();
        app.delete_char_forward();
        assert_eq!(app.input, "hlXlo");

        app.move_cursor_end();
        app.delete_char();
        assert_eq!(app.input, "hlXl");
        assert_eq!(app.take_input(), "hlXl");
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn delete_word_stops_at_space() {
        let (mut app, _rx) = new_app(FakeApi::default());
        for c in "find the manual".chars() {
            app.insert_char(c);
        }
        app.delete_word();
        assert_eq!(app.input, "find the ");
    }

    #[tokio::test]
    async fn streams_reply_into_transcript() {
        let (mut app, mut rx) = new_app(FakeApi::replying(HI_THERE));

        app.send_message("Hello");
        assert!(app.is_streaming());
        pump(&mut app, &mut rx).await;

        let messages = app.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(messages[1].references.len(), 1);
        assert_eq!(app.transcript.referenced_files()[0].label(), "manual.pdf");
        assert_eq!(
            app.status_message.as_deref(),
            Some("Reply complete (1 reference(s))")
        );
    }

    #[tokio::test]
    async fn follow_up_sends_full_history() {
        let api = FakeApi::replying(HI_THERE);
        let (mut app, mut rx) = new_app(api);

        app.send_message("first");
        pump(&mut app, &mut rx).await;
        app.send_message("second");
        pump(&mut app, &mut rx).await;

        assert_eq!(
            app.api.chats(),
            vec![("docs".to_string(), 1), ("docs".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn rejected_request_drops_empty_reply() {
        let (mut app, mut rx) = new_app(FakeApi::rejecting(404, "assistant not found"));

        app.send_message("Hello");
        pump(&mut app, &mut rx).await;

        assert_eq!(app.transcript.messages().len(), 1);
        assert!(app
            .error_message
            .as_deref()
            .unwrap()
            .contains("assistant not found"));
        assert!(app.transcript.error().is_some());
    }

    #[tokio::test]
    async fn cancel_after_open_keeps_partial_reply() {
        let (mut app, mut rx) = new_app(FakeApi::hanging());

        app.send_message("Hello");
        let opened = rx.recv().await.unwrap();
        assert!(matches!(opened.kind, TurnEventKind::Opened(_)));
        app.handle_turn_event(opened);
        app.handle_turn_event(TurnEvent {
            turn: 1,
            kind: TurnEventKind::Event(StreamEvent::content("partial")),
        });

        assert!(app.cancel_streaming());
        pump(&mut app, &mut rx).await;

        assert_eq!(app.transcript.messages()[1].content, "partial");
        assert_eq!(app.status_message.as_deref(), Some("Cancelled"));
        assert!(app.error_message.is_none());
    }

    #[tokio::test]
    async fn cancel_before_open_fails_turn_locally() {
        let (mut app, _rx) = new_app(FakeApi::hanging());

        app.send_message("Hello");
        assert!(app.cancel_streaming());

        assert!(!app.is_streaming());
        assert_eq!(app.transcript.messages().len(), 1);
        assert!(!app.cancel_streaming());
    }

    #[tokio::test]
    async fn stale_turn_events_are_ignored() {
        let (mut app, _rx) = new_app(FakeApi::hanging());
        app.send_message("Hello");

        let redraw = app.handle_turn_event(TurnEvent {
            turn: 99,
            kind: TurnEventKind::Event(StreamEvent::content("ghost")),
        });

        assert!(!redraw);
        assert_eq!(app.transcript.messages()[1].content, "");
        app.shutdown();
    }

    #[tokio::test]
    async fn busy_while_streaming() {
        let (mut app, _rx) = new_app(FakeApi::hanging());
        app.send_message("one");
        app.send_message("two");

        assert_eq!(app.transcript.messages().len(), 2);
        assert_eq!(
            app.error_message.as_deref(),
            Some("a response is still streaming")
        );
        app.shutdown();
    }

    #[tokio::test]
    async fn commands_dispatch() {
        let mut api = FakeApi::default();
        api.files = vec![FileDescriptor {
            id: "f1".into(),
            name: "manual.pdf".into(),
            size_bytes: Some(1024),
            created_at: None,
            status: Some("Available".into()),
        }];
        let (mut app, _rx) = new_app(api);

        app.input = "/files".into();
        app.submit_input().await;
        assert_eq!(app.files.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Found 1 file(s)"));

        app.input = "/refs".into();
        app.submit_input().await;
        assert_eq!(app.panel, SidePanel::References);

        app.input = "/citations".into();
        app.submit_input().await;
        assert!(app.show_citations);

        app.input = "/bogus".into();
        app.submit_input().await;
        assert!(app.error_message.as_deref().unwrap().contains("/bogus"));

        app.input = "/quit".into();
        app.submit_input().await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn new_conversation_asks_for_confirmation() {
        let (mut app, mut rx) = new_app(FakeApi::replying(HI_THERE));
        app.run_command(Command::New).await;
        assert_eq!(app.input_mode, InputMode::Normal);

        app.send_message("Hello");
        pump(&mut app, &mut rx).await;
        app.input = "draft".into();
        app.run_command(Command::New).await;
        assert_eq!(app.input_mode, InputMode::ConfirmingReset);
        assert!(app.input.is_empty());

        app.reset_conversation();
        app.exit_dialog_mode();
        assert!(app.transcript.messages().is_empty());
        assert!(app.transcript.referenced_files().is_empty());
        assert_eq!(app.input, "draft");
    }

    #[tokio::test]
    async fn uploads_file_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"release notes").unwrap();
        let (mut app, _rx) = new_app(FakeApi::default());

        app.run_command(Command::Upload {
            path: file.path().to_path_buf(),
            metadata: Some(serde_json::json!({"team": "docs"})),
        })
        .await;

        assert_eq!(app.files.len(), 1);
        assert_eq!(app.files[0].size_bytes, Some(13));
        let uploads = app.api.uploads();
        assert_eq!(uploads[0].1, Some(serde_json::json!({"team": "docs"})));
        assert!(app.status_message.as_deref().unwrap().starts_with("Uploaded"));
    }

    #[tokio::test]
    async fn upload_of_missing_file_reports_error() {
        let (mut app, _rx) = new_app(FakeApi::default());
        app.run_command(Command::Upload {
            path: "/definitely/not/here.txt".into(),
            metadata: None,
        })
        .await;

        assert!(app.error_message.as_deref().unwrap().starts_with("Upload failed"));
        assert!(app.api.uploads().is_empty());
    }

    #[tokio::test]
    async fn existence_check_warns_when_missing() {
        let (mut app, _rx) = new_app(FakeApi::replying(&[]));
        app.check_assistant().await;
        assert_eq!(app.assistant_status, AssistantStatus::Found);
        assert!(app.warning.is_none());

        let (mut app, _rx) = new_app(FakeApi::default());
        app.check_assistant().await;
        assert_eq!(app.assistant_status, AssistantStatus::Missing);
        assert!(app.warning.as_deref().unwrap().contains("'docs' not found"));
    }
}
