//! Rendering for every screen. Pure view code: reads the [`App`], never
//! mutates it.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use tw_model::{GameSession, Polarity};

use crate::app::{App, Screen};
use crate::log::{LogLine, LogStyle};
use crate::markup;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main draw entry point.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::HintEntry => draw_hint_entry(frame, app),
        Screen::Loading => draw_loading(frame, app),
        Screen::Playing => draw_playing(frame, app),
        Screen::QuitConfirm => {
            draw_playing(frame, app);
            draw_quit_confirm(frame, app);
        }
        Screen::Error => draw_error(frame, app),
    }
}

fn spinner(app: &App) -> &'static str {
    SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]
}

fn draw_hint_entry(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Welcome text
            Constraint::Length(1), // Inline error
            Constraint::Length(3), // Input
        ])
        .split(frame.area());

    let mut lines = vec![
        Line::from(Span::styled(
            "Taleweaver",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from("Give me a hint about the world you want to play in"),
        Line::from("(e.g. 'cyberpunk detective', 'zombie kitchen'), or press Enter for a random one."),
    ];
    if !app.saves.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(
            "Or load a previous game: /load <name> (Tab to auto-complete)",
        ));
        lines.push(Line::from(Span::styled(
            format!("Available saves: {}", app.saves.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let welcome = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(welcome, chunks[0]);

    if let Some(err) = &app.inline_error {
        let error = Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red).bold());
        frame.render_widget(error, chunks[1]);
    }

    draw_input(frame, app, chunks[2]);
    if app.completion.active && !app.completion.candidates.is_empty() {
        draw_completion_popup(frame, app, chunks[2]);
    }
}

fn draw_loading(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());
    let text = format!("{} Generating your world... please wait.", spinner(app));
    let loading = Paragraph::new(text).style(Style::default().fg(Color::Cyan));
    frame.render_widget(loading, area);
}

fn draw_playing(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Log + sidebar
            Constraint::Length(3), // Input / busy indicator
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[0]);

    draw_log(frame, app, content[0]);
    draw_sidebar(frame, app, content[1]);

    if app.turn_pending {
        let busy = Paragraph::new(format!("{} Thinking...", spinner(app)))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(busy, chunks[1]);
    } else {
        draw_input(frame, app, chunks[1]);
    }

    let help = Paragraph::new("Commands: /save <name>, /restart, /quit — or just type what you do.")
        .style(Style::default().fg(Color::DarkGray).italic());
    frame.render_widget(help, chunks[2]);
}

fn draw_quit_confirm(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Quit ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let mut lines = vec![
        Line::from("Save before quitting?"),
        Line::from("Enter a save name, leave empty to quit without saving,"),
        Line::from("or /cancel to keep playing."),
    ];
    if app.quit_after_save {
        lines.push(Line::from(Span::styled(
            format!("{} Saving...", spinner(app)),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(err) = &app.inline_error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    if !app.quit_after_save {
        draw_input(frame, app, chunks[1]);
    }
}

fn draw_error(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 40, frame.area());
    let text = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(app.error_text.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to quit.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let error = Paragraph::new(text).wrap(Wrap { trim: false });
    frame.render_widget(error, area);
}

fn draw_log(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, entry) in app.log.iter().enumerate() {
        if i > 0 && entry.style != LogStyle::SideEffect {
            lines.push(Line::from(""));
        }
        lines.extend(log_entry_lines(entry));
    }

    // Pin to the bottom unless the player scrolled up.
    let inner_width = area.width.saturating_sub(2) as usize;
    let total_wrapped: u16 = lines
        .iter()
        .map(|l| {
            let len = l.width();
            if inner_width == 0 {
                1
            } else {
                len.max(1).div_ceil(inner_width) as u16
            }
        })
        .sum();
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = total_wrapped.saturating_sub(visible_height);
    let scroll = max_scroll.saturating_sub(app.scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Story ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn log_entry_lines(entry: &LogLine) -> Vec<Line<'static>> {
    match entry.style {
        LogStyle::Player => entry
            .text
            .lines()
            .enumerate()
            .map(|(i, l)| {
                let prefix = if i == 0 { "> " } else { "  " };
                Line::from(Span::styled(
                    format!("{prefix}{l}"),
                    Style::default().fg(Color::Yellow).bold(),
                ))
            })
            .collect(),
        LogStyle::Narration => markup::narration_lines(&entry.text, Style::default().fg(Color::White)),
        LogStyle::SideEffect => styled_lines(&entry.text, Style::default().fg(Color::Magenta).italic()),
        LogStyle::System => styled_lines(&entry.text, Style::default().fg(Color::Cyan).italic()),
        LogStyle::Error => styled_lines(&entry.text, Style::default().fg(Color::Red)),
    }
}

fn styled_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), style)))
        .collect()
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.session else {
        return;
    };

    let mut lines = Vec::new();
    section(&mut lines, "TITLE");
    lines.push(Line::from(session.world.title.clone()));
    lines.push(Line::from(""));

    section(&mut lines, "LOCATION");
    lines.push(Line::from(session.state.current_location.clone()));
    lines.push(Line::from(""));

    section(&mut lines, "STATS");
    lines.push(stat_line(session, "health", &session.state.health));
    lines.push(stat_line(session, "progress", &session.state.progress));
    for (key, value) in &session.state.stats {
        if key != "health" && key != "progress" {
            lines.push(stat_line(session, key, value));
        }
    }
    lines.push(Line::from(""));

    section(&mut lines, "INVENTORY");
    if session.state.inventory.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for item in &session.state.inventory {
            lines.push(Line::from(format!("- {item}")));
        }
    }

    let sidebar = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(sidebar, area);
}

fn section(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(Span::styled(
        title,
        Style::default().fg(Color::Yellow).bold().underlined(),
    )));
}

fn stat_line(session: &GameSession, key: &str, value: &str) -> Line<'static> {
    let value_color = match session.world.polarity(key) {
        Polarity::Good => Color::Green,
        Polarity::Bad => Color::Red,
    };
    Line::from(vec![
        Span::raw(format!("{}: ", session.world.display_name(key))),
        Span::styled(value.to_string(), Style::default().fg(value_color)),
    ])
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let display = format!("> {}", app.input);
    let input = Paragraph::new(display).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(input, area);

    // Offset by 2 for "> " plus 1 for the left border.
    let cursor_x = area.x + 1 + 2 + app.input[..app.cursor].chars().count() as u16;
    let cursor_y = area.y + 1;
    if cursor_x < area.x + area.width.saturating_sub(1) {
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_completion_popup(frame: &mut Frame, app: &App, input_area: Rect) {
    let max_visible = 6_u16;
    let count = app.completion.candidates.len() as u16;
    let popup_height = count.min(max_visible) + 2;
    let popup_width = app
        .completion
        .candidates
        .iter()
        .map(|c| c.len() as u16)
        .max()
        .unwrap_or(10)
        .min(input_area.width.saturating_sub(4))
        + 4;

    let popup_y = input_area.y.saturating_sub(popup_height);
    let popup_area = Rect::new(input_area.x + 1, popup_y, popup_width, popup_height);

    let items: Vec<ListItem> = app
        .completion
        .candidates
        .iter()
        .map(|c| ListItem::new(Span::raw(format!(" {c}"))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(app.completion.index));

    frame.render_widget(Clear, popup_area);
    frame.render_stateful_widget(list, popup_area, &mut state);
}

/// Create a centered rectangle as a percentage of the given area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
