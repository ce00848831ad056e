//! UI rendering with ratatui.
//!
//! Two columns: the assistant's files (or the files cited so far) on the
//! left, the conversation and input line on the right.

use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};
use ratatui::Frame;

use assistant_chat_client::AssistantApi;
use assistant_chat_core::{FileDescriptor, Message, Reference, Role, Transcript};

use crate::app::{App, AssistantStatus, InputMode, SidePanel};
use crate::markdown::render_markdown;

/// Horizontal padding for chat content.
const CHAT_PADDING: u16 = 2;

/// Render the UI.
pub fn render<A>(frame: &mut Frame, app: &App<A>)
where
    A: AssistantApi + 'static,
{
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(5),    // Side panel + chat
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header_bar(frame, app, main_layout[0]);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_layout[1]);

    render_side_panel(frame, app, content_layout[0]);
    render_chat_column(frame, app, content_layout[1]);
    render_status_bar(frame, app, main_layout[2]);

    if app.input_mode == InputMode::ConfirmingReset {
        render_confirm_reset_dialog(frame, area);
    }
}

// =============================================================================
// Header and Status
// =============================================================================

fn render_header_bar<A>(frame: &mut Frame, app: &App<A>, area: Rect)
where
    A: AssistantApi + 'static,
{
    let (state, state_style) = if app.is_streaming() {
        ("streaming", Style::default().fg(Color::Yellow))
    } else {
        match app.assistant_status {
            AssistantStatus::Found => ("ready", Style::default().fg(Color::Green)),
            AssistantStatus::Missing => ("not found", Style::default().fg(Color::Red)),
            AssistantStatus::Unknown => ("unverified", Style::default().fg(Color::Gray)),
        }
    };

    let title = "ASSISTANT CHAT";
    let max_target = (area.width as usize / 2).saturating_sub(state.len() + 3);
    let target = truncate_middle(
        &format!("{} @ {}", app.assistant_name, app.base_url),
        max_target,
    );
    let right_width = target.chars().count() + state.len() + 3;
    let gap = (area.width as usize).saturating_sub(title.len() + right_width);

    let line = Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap)),
        Span::raw(target),
        Span::raw(" ["),
        Span::styled(state, state_style),
        Span::raw("]"),
    ]);

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(Color::DarkGray)), area);
}

fn render_status_bar<A>(frame: &mut Frame, app: &App<A>, area: Rect)
where
    A: AssistantApi + 'static,
{
    let mode_indicator = if app.command_mode {
        Span::styled(" COMMAND ", Style::default().fg(Color::Black).bg(Color::Blue))
    } else {
        Span::styled(" INPUT ", Style::default().fg(Color::Black).bg(Color::Green))
    };

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let status = if let Some(ref error) = app.error_message {
        Line::from(vec![
            mode_indicator,
            Span::styled(" ERROR: ", Style::default().fg(Color::Red).bold()),
            Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        ])
    } else if let Some(ref warning) = app.warning {
        Line::from(vec![
            mode_indicator,
            Span::styled(" ⚠ ", Style::default().fg(Color::Yellow).bold()),
            Span::styled(warning.as_str(), Style::default().fg(Color::Yellow)),
        ])
    } else if let Some(ref status) = app.status_message {
        Line::from(vec![
            mode_indicator,
            Span::styled(format!(" {status}"), Style::default().fg(Color::Green)),
        ])
    } else if app.command_mode {
        Line::from(vec![
            mode_indicator,
            Span::raw(" "),
            key("q"),
            Span::raw(":quit "),
            key("j/k"),
            Span::raw(":scroll "),
            key("f"),
            Span::raw(":files "),
            key("c"),
            Span::raw(":citations "),
            key("n"),
            Span::raw(":new "),
            key("Enter"),
            Span::raw(":type"),
        ])
    } else {
        Line::from(vec![
            mode_indicator,
            Span::raw(" "),
            key("Enter"),
            Span::raw(":send "),
            key("Esc"),
            Span::raw(":commands "),
            key("Tab"),
            Span::raw(":files/refs "),
            key("/help"),
        ])
    };

    frame.render_widget(
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

// =============================================================================
// Side Panel
// =============================================================================

fn render_side_panel<A>(frame: &mut Frame, app: &App<A>, area: Rect)
where
    A: AssistantApi + 'static,
{
    let (title, items) = match app.panel {
        SidePanel::Files => (
            format!(" Files ({}) ", app.files.len()),
            app.files.iter().map(file_item).collect::<Vec<_>>(),
        ),
        SidePanel::References => {
            let refs = app.transcript.referenced_files();
            (
                format!(" Referenced ({}) ", refs.len()),
                refs.iter()
                    .enumerate()
                    .map(|(i, r)| reference_item(i + 1, r))
                    .collect(),
            )
        }
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if items.is_empty() {
        let hint = match app.panel {
            SidePanel::Files => "No files. /files to reload, /upload <path> to add.",
            SidePanel::References => "Nothing cited yet.",
        };
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn file_item(file: &FileDescriptor) -> ListItem<'static> {
    let name = if file.name.is_empty() { &file.id } else { &file.name };
    let mut spans = vec![Span::raw(name.clone())];
    if let Some(size) = file.size_bytes {
        spans.push(Span::styled(
            format!(" {}", format_size(size)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(status) = &file.status {
        spans.push(Span::styled(format!(" {status}"), Style::default().fg(file_status_color(status))));
    }
    ListItem::new(Line::from(spans))
}

fn file_status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "available" => Color::Green,
        "processing" => Color::Yellow,
        s if s.contains("fail") => Color::Red,
        _ => Color::Gray,
    }
}

fn reference_item(n: usize, reference: &Reference) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("[{n}] "), Style::default().fg(Color::Cyan)),
        Span::raw(reference.label().to_string()),
    ]))
}

/// Human-readable byte count.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

// =============================================================================
// Chat
// =============================================================================

fn render_chat_column<A>(frame: &mut Frame, app: &App<A>, area: Rect)
where
    A: AssistantApi + 'static,
{
    let block = Block::default()
        .title(format!(" Chat: {} ", app.assistant_name))
        .borders(Borders::ALL)
        .border_style(if app.command_mode {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Cyan)
        });

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let inner_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Messages
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Input
        ])
        .split(inner_area);

    let chat_area_full = inner_layout[0];
    let chat_area = Rect::new(
        chat_area_full.x + CHAT_PADDING,
        chat_area_full.y,
        chat_area_full.width.saturating_sub(CHAT_PADDING * 2 + 1), // +1 for scrollbar
        chat_area_full.height,
    );
    let content_width = chat_area.width as usize;

    if app.transcript.messages().is_empty() {
        let help = Paragraph::new("Type a message and press Enter to send. /help lists commands.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(help, chat_area);
    } else {
        let text = Text::from(transcript_lines(
            &app.transcript,
            app.show_citations,
            app.spinner_char(),
            content_width,
        ));
        let visible_lines = chat_area.height as usize;
        let total_lines = wrapped_line_count(&text, content_width);

        // chat_scroll counts up from the bottom; Paragraph scrolls from the top.
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let effective_scroll = app.chat_scroll.min(max_scroll);
        let scroll_offset = max_scroll - effective_scroll;

        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, chat_area);

        if total_lines > visible_lines {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::new(total_lines)
                .position(scroll_offset)
                .viewport_content_length(visible_lines);
            frame.render_stateful_widget(scrollbar, chat_area_full, &mut scrollbar_state);
        }
    }

    render_input_line(frame, app, inner_layout[1], inner_layout[2]);
}

/// Lines for the whole conversation.
///
/// The open reply gets a streaming cursor, or a spinner while still empty.
fn transcript_lines(
    transcript: &Transcript,
    show_citations: bool,
    spinner: &'static str,
    width: usize,
) -> Vec<Line<'static>> {
    let open_id = transcript.open_message().map(|m| m.id);
    let mut lines = Vec::new();

    for msg in transcript.messages() {
        let is_open = open_id == Some(msg.id);
        match msg.role {
            Role::User => user_lines(msg, &mut lines),
            Role::Assistant => assistant_lines(msg, is_open, spinner, width, &mut lines),
        }
        if show_citations && !msg.references.is_empty() {
            lines.extend(citation_lines(&msg.references, width));
        }
        lines.push(Line::default());
    }

    lines
}

fn label(name: &'static str, color: Color, msg: &Message) -> Vec<Span<'static>> {
    let time = msg.timestamp.with_timezone(&Local).format("%H:%M").to_string();
    vec![
        Span::styled(format!("[{name}]"), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {time}"), Style::default().fg(Color::DarkGray)),
    ]
}

fn user_lines(msg: &Message, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(label("You", Color::Cyan, msg)));
    lines.extend(
        msg.content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White)))),
    );
}

fn assistant_lines(
    msg: &Message,
    is_open: bool,
    spinner: &'static str,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    lines.push(Line::from(label("Assistant", Color::Green, msg)));

    if is_open && msg.content.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Yellow)),
            Span::styled(" thinking...", Style::default().fg(Color::DarkGray)),
        ]));
        return;
    }

    let mut body = render_markdown(&msg.content, width);
    if is_open {
        let cursor = Span::styled("▌", Style::default().fg(Color::Yellow));
        match body.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => body.push(Line::from(cursor)),
        }
    }
    lines.extend(body);
}

/// Numbered sources under a reply, each with a one-line excerpt.
fn citation_lines(references: &[Reference], width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled("Sources", dim.add_modifier(Modifier::BOLD)))];

    for (i, reference) in references.iter().enumerate() {
        let mut spans = vec![
            Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Cyan)),
            Span::raw(reference.label().to_string()),
        ];
        if let Some(url) = &reference.url {
            spans.push(Span::styled(
                format!("  {}", truncate_middle(url, width / 2)),
                dim,
            ));
        }
        lines.push(Line::from(spans));

        let quote = reference.quote.split_whitespace().collect::<Vec<_>>().join(" ");
        if !quote.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    \"{}\"", truncate_end(&quote, width.saturating_sub(6))),
                dim.add_modifier(Modifier::ITALIC),
            )));
        }
    }
    lines
}

fn render_input_line<A>(frame: &mut Frame, app: &App<A>, separator_area: Rect, input_area: Rect)
where
    A: AssistantApi + 'static,
{
    frame.render_widget(
        Paragraph::new("─".repeat(separator_area.width as usize))
            .style(Style::default().fg(Color::DarkGray)),
        separator_area,
    );

    let in_dialog = app.input_mode != InputMode::Normal;
    let prompt = if app.command_mode { ": " } else { "> " };
    let input_text = if in_dialog { "" } else { app.input.as_str() };

    let input_line = Line::from(vec![
        Span::styled(
            prompt,
            Style::default().fg(if app.command_mode { Color::DarkGray } else { Color::Cyan }),
        ),
        Span::styled(input_text, Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(input_line), input_area);

    // Hidden during streaming to prevent flickering.
    if !in_dialog && !app.command_mode && !app.is_streaming() {
        let offset = u16::try_from(prompt.len() + app.cursor_position).unwrap_or(u16::MAX);
        frame.set_cursor_position((input_area.x.saturating_add(offset), input_area.y));
    }
}

fn render_confirm_reset_dialog(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" New Conversation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = Text::from(vec![
        Line::from("Discard this conversation and its citations?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red).bold()),
            Span::raw(" Yes  "),
            Span::styled("[n]", Style::default().fg(Color::Green).bold()),
            Span::raw(" No"),
        ]),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true }),
        inner,
    );
}

// =============================================================================
// Helpers
// =============================================================================

/// Shorten `s` to `max_len` characters by replacing its middle with `...`.
fn truncate_middle(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    if max_len < 5 {
        return s.chars().take(max_len).collect();
    }
    let keep = (max_len - 3) / 2;
    let start: String = s.chars().take(keep).collect();
    let end: String = s.chars().skip(len - keep).collect();
    format!("{start}...{end}")
}

/// Shorten `s` to `max_len` characters, ending with an ellipsis if cut.
fn truncate_end(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Number of screen rows `text` occupies when wrapped to `width`.
fn wrapped_line_count(text: &Text, width: usize) -> usize {
    if width == 0 {
        return text.lines.len();
    }
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
