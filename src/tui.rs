use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::models::{ApplicationPatch, ApplicationStatus};
use crate::store::AppStore;
use crate::workflow::{is_terminal, next_possible_statuses};

struct BrowseState {
    selected: usize,
    scroll_offset: u16,
}

impl BrowseState {
    fn new() -> Self {
        Self { selected: 0, scroll_offset: 0 }
    }

    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

/// Interactive dashboard: application list on the left, detail with notes,
/// timeline, and workflow hints on the right. Status keys only offer the
/// legal next stages for the selected application.
pub fn run_browse(store: &mut AppStore) -> Result<()> {
    if store.applications().is_empty() {
        println!("No applications found.");
        return Ok(());
    }

    let mut state = BrowseState::new();

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut BrowseState,
    store: &mut AppStore,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, store, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(store.applications().len()),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char(c @ '1'..='9') => {
                    let choice = c as usize - '1' as usize;
                    advance_status(store, state.selected, choice);
                }
                _ => {}
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

/// Applies the nth legal next status to the selected application.
fn advance_status(store: &mut AppStore, selected: usize, choice: usize) {
    let Some(app) = store.applications().get(selected) else {
        return;
    };
    let id = app.id.clone();
    let options = next_possible_statuses(app.status);
    if let Some(&status) = options.get(choice) {
        store.update(
            &id,
            &ApplicationPatch { status: Some(status), ..Default::default() },
        );
    }
}

fn draw(frame: &mut Frame, state: &BrowseState, store: &AppStore, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(frame.area());

    let items: Vec<ListItem> = store
        .applications()
        .iter()
        .map(|app| {
            let icon = status_icon(app.status);
            let position = truncate(&app.position, 28);
            ListItem::new(format!("{} {} | {}", icon, app.company, position))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Applications ({}) ",
            store.applications().len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    let detail = build_detail(store, state.selected);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let help = Paragraph::new(" j/k:navigate  J/K:scroll  1/2:advance status  q:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area[1]);
}

fn status_icon(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Applied => " ",
        ApplicationStatus::PhoneScreen => "~",
        ApplicationStatus::TechnicalInterview | ApplicationStatus::OnsiteInterview => "*",
        ApplicationStatus::Offer => "$",
        ApplicationStatus::Rejected => "x",
        ApplicationStatus::Accepted => "+",
        ApplicationStatus::Declined => "-",
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Applied => Style::default().fg(Color::Blue),
        ApplicationStatus::PhoneScreen => Style::default().fg(Color::Magenta),
        ApplicationStatus::TechnicalInterview | ApplicationStatus::OnsiteInterview => {
            Style::default().fg(Color::Green)
        }
        ApplicationStatus::Offer => Style::default().fg(Color::Yellow),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
        ApplicationStatus::Accepted => Style::default().fg(Color::Cyan),
        ApplicationStatus::Declined => Style::default().fg(Color::DarkGray),
    }
}

fn build_detail(store: &AppStore, selected: usize) -> Text<'static> {
    let Some(app) = store.applications().get(selected) else {
        return Text::raw("No application selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("{} - {}", app.company, app.position),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status),
        status_style(app.status),
    )));
    lines.push(Line::from(format!("Applied: {}", app.date_applied)));

    if let Some(location) = &app.location {
        lines.push(Line::from(format!("Location: {location}")));
    }
    if let Some(job_type) = &app.job_type {
        lines.push(Line::from(format!("Type: {job_type}")));
    }
    if let Some(salary) = &app.salary {
        lines.push(Line::from(format!("Salary: {salary}")));
    }
    if let Some(url) = &app.url {
        lines.push(Line::from(format!("URL: {url}")));
    }
    if let Some(contact) = &app.contact_name {
        lines.push(Line::from(format!("Contact: {contact}")));
    }

    lines.push(Line::from(""));
    if is_terminal(app.status) {
        lines.push(Line::from(Span::styled(
            "(Terminal status)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let hints: Vec<String> = next_possible_statuses(app.status)
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}:{}", i + 1, s))
            .collect();
        lines.push(Line::from(Span::styled(
            format!("Next: {}", hints.join("  ")),
            Style::default().fg(Color::Cyan),
        )));
    }

    if let Some(description) = &app.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(description, 70).lines() {
            lines.push(Line::from(format!("  {line}")));
        }
    }

    let events = store.events_for(&app.id);
    if !events.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Timeline",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for event in events {
            lines.push(Line::from(format!("  {} {}", event.date, event.event_type)));
            if let Some(notes) = &event.notes {
                for line in textwrap::fill(notes, 66).lines() {
                    lines.push(Line::from(Span::styled(
                        format!("    {line}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    let notes = store.notes_for(&app.id);
    if !notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Notes",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for note in notes {
            lines.push(Line::from(format!("  {} {}", note.date, note.title)));
            for line in textwrap::fill(&note.content, 66).lines() {
                lines.push(Line::from(Span::styled(
                    format!("    {line}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    Text::from(lines)
}

/// Char-boundary truncation; positions can contain multi-byte text.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
