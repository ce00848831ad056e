//! Assistant chat CLI - terminal UI for a hosted assistant.
//!
//! This is the entry point for the `achat` binary.

mod app;
mod commands;
mod markdown;
#[cfg(test)]
mod testing;
mod turn;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use assistant_chat_client::config::DEFAULT_BASE_URL;
use assistant_chat_client::{AssistantApi, AssistantClient, AssistantConfig};

use app::{App, InputMode};
use turn::TurnEvent;

/// Assistant chat CLI - terminal UI for a hosted assistant.
#[derive(Parser, Debug)]
#[command(name = "achat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API key for the assistant service.
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Assistant to chat with.
    #[arg(long, env = "PINECONE_ASSISTANT_NAME")]
    assistant: Option<String>,

    /// API base URL.
    #[arg(long, env = "PINECONE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Full chat URL, replacing the one derived from the assistant name.
    #[arg(long, env = "PINECONE_ASSISTANT_CHAT_ENDPOINT")]
    chat_endpoint: Option<String>,

    /// Show citations under each reply.
    #[arg(long, env = "ACHAT_CITATIONS", default_value = "false")]
    citations: bool,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("assistant_chat=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    // Missing credentials are fatal before the terminal is touched.
    let config = AssistantConfig::from_parts(args.api_key, args.assistant)
        .context("incomplete assistant configuration")?
        .with_base_url(args.base_url)
        .with_chat_endpoint(args.chat_endpoint);
    let base_url = config.base_url.clone();
    let api = Arc::new(AssistantClient::new(config)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (turn_tx, mut turn_rx) = mpsc::channel::<TurnEvent>(128);
    let mut app = App::new(api, base_url, turn_tx).with_citations(args.citations);

    app.check_assistant().await;
    if let Err(e) = app.refresh_files().await {
        app.set_error(format!("Failed to list files: {e}"));
    }

    let result = run_event_loop(&mut terminal, &mut app, &mut turn_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
///
/// Redraws immediately on every stream event so replies appear as they arrive.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
    turn_rx: &mut mpsc::Receiver<TurnEvent>,
) -> anyhow::Result<()>
where
    A: AssistantApi + 'static,
{
    loop {
        app.tick_animation();
        terminal.draw(|f| ui::render(f, app))?;

        let tick_rate = if app.needs_immediate_redraw() {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(100)
        };

        tokio::select! {
            () = tokio::time::sleep(tick_rate) => {
                while event::poll(Duration::from_millis(0)).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        handle_input(app, evt).await;
                    }
                }
            }

            Some(event) = turn_rx.recv() => {
                if app.handle_turn_event(event) {
                    terminal.draw(|f| ui::render(f, app))?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    Ok(())
}

async fn handle_input<A>(app: &mut App<A>, event: Event)
where
    A: AssistantApi + 'static,
{
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.should_quit = true;
                return;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_mode(app, key.code, key.modifiers).await,
                InputMode::ConfirmingReset => handle_confirm_reset_mode(app, key.code),
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => app.scroll_chat_up(3),
            MouseEventKind::ScrollDown => app.scroll_chat_down(3),
            _ => {}
        },
        _ => {}
    }
}

/// Keys shared by both modes; Esc cancels a reply first, then clears an
/// error, then toggles command mode.
async fn handle_normal_mode<A>(app: &mut App<A>, code: KeyCode, modifiers: KeyModifiers)
where
    A: AssistantApi + 'static,
{
    match code {
        KeyCode::Esc => {
            if app.command_mode {
                app.command_mode = false;
            } else if app.is_streaming() {
                app.cancel_streaming();
            } else if app.error_message.is_some() {
                app.clear_error();
            } else {
                app.command_mode = true;
            }
        }
        KeyCode::PageUp => app.scroll_chat_up(10),
        KeyCode::PageDown => app.scroll_chat_down(10),
        KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Tab => app.toggle_panel(),
        _ if app.command_mode => handle_command_mode(app, code).await,
        _ => handle_input_mode(app, code, modifiers).await,
    }
}

/// Single-key commands (after Esc).
async fn handle_command_mode<A>(app: &mut App<A>, code: KeyCode)
where
    A: AssistantApi + 'static,
{
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') => app.scroll_chat_down(1),
        KeyCode::Char('k') => app.scroll_chat_up(1),
        KeyCode::Char('c') => app.toggle_citations(),
        KeyCode::Char('f') => app.run_command(commands::Command::Files).await,
        KeyCode::Char('r') => app.run_command(commands::Command::Refs).await,
        KeyCode::Char('n') => app.run_command(commands::Command::New).await,
        KeyCode::Enter | KeyCode::Char('i') => app.command_mode = false,
        _ => {}
    }
}

/// Typing goes to the input line.
async fn handle_input_mode<A>(app: &mut App<A>, code: KeyCode, modifiers: KeyModifiers)
where
    A: AssistantApi + 'static,
{
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Enter => {
            if !app.input.trim().is_empty() {
                app.submit_input().await;
            }
        }
        KeyCode::Char('a') if ctrl => app.move_cursor_start(),
        KeyCode::Char('e') if ctrl => app.move_cursor_end(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Char('w') if ctrl => app.delete_word(),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_start(),
        KeyCode::End => app.move_cursor_end(),
        _ => {}
    }
}

fn handle_confirm_reset_mode<A>(app: &mut App<A>, code: KeyCode)
where
    A: AssistantApi + 'static,
{
    match code {
        KeyCode::Char('y' | 'Y') => {
            app.reset_conversation();
            app.exit_dialog_mode();
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.exit_dialog_mode(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_flags() {
        let args = Args::try_parse_from([
            "achat",
            "--api-key",
            "k",
            "--assistant",
            "docs",
            "--citations",
        ])
        .unwrap();
        assert_eq!(args.api_key.as_deref(), Some("k"));
        assert_eq!(args.assistant.as_deref(), Some("docs"));
        assert!(args.citations);
        assert!(!args.debug);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = AssistantConfig::from_parts(None, Some("docs".into())).unwrap_err();
        assert!(err.to_string().contains("PINECONE_API_KEY"));
    }
}
