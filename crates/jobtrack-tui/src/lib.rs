// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use jobtrack_app::{
    AppCommand, AppEvent, AppState, ApplicationStatus, DialogMode, DialogState, DraftField,
    JobApplication, JobDraft, JobId, StatusBadge, Submission,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{OffsetDateTime, UtcOffset};
use time::macros::format_description;

const SCREEN_TITLE: &str = "My Job Applications";
const ADD_TRIGGER: &str = "a  Add Job";
const COLUMN_LABELS: [&str; 6] = ["Company", "Role", "Location", "Status", "Date", "Actions"];
const ACTIONS_HINT: &str = "e edit  d delete";
const EMPTY_PLACEHOLDER: &str = "No applications found. Press \"a\" to add a job!";
const DELETE_PROMPT: &str = "Are you sure you want to delete this application?";
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Remote operations the screen issues. Implementations block until the call finishes.
pub trait AppRuntime {
    fn load_jobs(&mut self) -> Result<Vec<JobApplication>>;
    fn insert_job(&mut self, draft: &JobDraft) -> Result<JobApplication>;
    fn update_job(&mut self, id: JobId, draft: &JobDraft) -> Result<()>;
    fn delete_job(&mut self, id: JobId) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableUiState {
    selected_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormUiState {
    field_index: usize,
}

impl FormUiState {
    fn field(self) -> DraftField {
        DraftField::ALL[self.field_index.min(DraftField::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    table: TableUiState,
    form: FormUiState,
    help_visible: bool,
    status_token: u64,
    date_offset: UtcOffset,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            table: TableUiState::default(),
            form: FormUiState::default(),
            help_visible: false,
            status_token: 0,
            date_offset: UtcOffset::UTC,
        }
    }
}

/// Runs the screen until the user quits. Applied dates render in `date_offset`.
pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    date_offset: UtcOffset,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        date_offset,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    load_jobs(state, runtime, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn load_jobs<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    let command = match runtime.load_jobs() {
        Ok(jobs) => AppCommand::LoadSucceeded(jobs),
        Err(error) => AppCommand::LoadFailed(error.to_string()),
    };
    state.dispatch(command);
    clamp_selection(state, view_data);
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    let events = state.dispatch(AppCommand::SetStatus(message.into()));
    track_status(view_data, internal_tx, &events);
}

/// Dispatches `command`, arming the status-clear timer when it set a status line.
fn dispatch_tracked(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    track_status(view_data, internal_tx, &events);
    events
}

fn track_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, events: &[AppEvent]) {
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.load_error.is_some() {
        return matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
    }

    if state.alert.is_some() {
        state.dispatch(AppCommand::DismissAlert);
        return false;
    }

    if let Some(id) = state.pending_delete {
        handle_confirm_key(state, runtime, view_data, internal_tx, id, key);
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if matches!(state.dialog, DialogState::Open(_)) {
        handle_form_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    handle_table_key(state, view_data, internal_tx, key)
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return true,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => move_row(state, view_data, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => move_row(state, view_data, -1),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => view_data.table.selected_row = 0,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            view_data.table.selected_row = state.jobs.len().saturating_sub(1);
        }
        (KeyCode::Char('a'), _) => {
            view_data.form = FormUiState::default();
            state.dispatch(AppCommand::OpenAddDialog);
        }
        (KeyCode::Char('e'), _) | (KeyCode::Enter, _) => {
            let Some(id) = selected_job_id(state, view_data) else {
                emit_status(state, view_data, internal_tx, "no application selected");
                return false;
            };
            view_data.form = FormUiState::default();
            dispatch_tracked(state, view_data, internal_tx, AppCommand::OpenEditDialog(id));
        }
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => {
            let Some(id) = selected_job_id(state, view_data) else {
                emit_status(state, view_data, internal_tx, "no application selected");
                return false;
            };
            dispatch_tracked(state, view_data, internal_tx, AppCommand::RequestDelete(id));
        }
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        _ => {}
    }
    false
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: JobId,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let command = match runtime.delete_job(id) {
                Ok(()) => AppCommand::DeleteSucceeded(id),
                Err(error) => AppCommand::DeleteFailed(error.to_string()),
            };
            dispatch_tracked(state, view_data, internal_tx, command);
            clamp_selection(state, view_data);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            dispatch_tracked(state, view_data, internal_tx, AppCommand::DeclineDelete);
        }
        _ => {}
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = view_data.form.field();
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::CancelDialog);
            emit_status(state, view_data, internal_tx, "form canceled");
        }
        (KeyCode::Enter, _) => submit_form(state, runtime, view_data, internal_tx),
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            submit_form(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => move_form_field(view_data, 1),
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => move_form_field(view_data, -1),
        (KeyCode::Left, _) if field == DraftField::Status => {
            let status = state.draft.status.cycle(-1);
            state.dispatch(AppCommand::SetDraftStatus(status));
        }
        (KeyCode::Right, _) if field == DraftField::Status => {
            let status = state.draft.status.cycle(1);
            state.dispatch(AppCommand::SetDraftStatus(status));
        }
        (KeyCode::Char(ch), _) if field == DraftField::Status => {
            if let Some(status) = status_for_digit(ch) {
                state.dispatch(AppCommand::SetDraftStatus(status));
            }
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            state.dispatch(AppCommand::SetDraftText(field, String::new()));
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            if let Some(current) = state.draft.text(field) {
                let mut value = current.to_owned();
                value.push(ch);
                state.dispatch(AppCommand::SetDraftText(field, value));
            }
        }
        (KeyCode::Backspace, _) => {
            if let Some(current) = state.draft.text(field) {
                let mut value = current.to_owned();
                value.pop();
                state.dispatch(AppCommand::SetDraftText(field, value));
            }
        }
        _ => {}
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let submission = match state.submission() {
        Ok(submission) => submission,
        Err(error) => {
            emit_status(state, view_data, internal_tx, error.to_string());
            return;
        }
    };

    let command = match submission {
        Submission::Insert(draft) => match runtime.insert_job(&draft) {
            Ok(job) => {
                view_data.table.selected_row = 0;
                AppCommand::InsertSucceeded(job)
            }
            Err(error) => AppCommand::SaveFailed(error.to_string()),
        },
        Submission::Update { id, draft } => match runtime.update_job(id, &draft) {
            Ok(()) => AppCommand::UpdateSucceeded { id, draft },
            Err(error) => AppCommand::SaveFailed(error.to_string()),
        },
    };
    dispatch_tracked(state, view_data, internal_tx, command);
    if state.dialog == DialogState::Closed {
        view_data.form = FormUiState::default();
    }
}

fn move_form_field(view_data: &mut ViewData, delta: isize) {
    let len = DraftField::ALL.len() as isize;
    let next = (view_data.form.field_index as isize + delta).rem_euclid(len) as usize;
    view_data.form.field_index = next;
}

fn status_for_digit(ch: char) -> Option<ApplicationStatus> {
    let index = ch.to_digit(10)?.checked_sub(1)? as usize;
    ApplicationStatus::ALL.get(index).copied()
}

fn move_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let row_count = state.jobs.len();
    if row_count == 0 {
        view_data.table.selected_row = 0;
        return;
    }

    let current = view_data.table.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.table.selected_row = next.min(row_count - 1);
}

fn clamp_selection(state: &AppState, view_data: &mut ViewData) {
    view_data.table.selected_row = view_data
        .table
        .selected_row
        .min(state.jobs.len().saturating_sub(1));
}

fn selected_job_id(state: &AppState, view_data: &ViewData) -> Option<JobId> {
    state.jobs.get(view_data.table.selected_row).map(|job| job.id)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    if let Some(message) = &state.load_error {
        let error = Paragraph::new(load_error_text(message))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("jobtrack"));
        frame.render_widget(error, frame.area());
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(SCREEN_TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("    "),
        Span::styled(ADD_TRIGGER, Style::default().fg(Color::Cyan)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let DialogState::Open(mode) = state.dialog {
        let area = centered_rect(64, 70, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_form_text(state, view_data, mode))
            .block(Block::default().title(form_title(mode)).borders(Borders::ALL));
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    if let Some(id) = state.pending_delete {
        let area = centered_rect(56, 30, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(render_confirm_text(state, id))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("confirm").borders(Borders::ALL));
        frame.render_widget(confirm, area);
    }

    if let Some(message) = &state.alert {
        let area = centered_rect(56, 30, frame.area());
        frame.render_widget(Clear, area);
        let alert = Paragraph::new(format!("{message}\n\npress any key to continue"))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("error")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(alert, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let block = Block::default()
        .title(format!("applications ({})", state.jobs.len()))
        .borders(Borders::ALL);

    let header = Row::new(COLUMN_LABELS.map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(22),
        Constraint::Percentage(16),
        Constraint::Percentage(13),
        Constraint::Percentage(11),
        Constraint::Percentage(18),
    ];

    if state.jobs.is_empty() {
        let inner = block.inner(area);
        let table = Table::new(Vec::<Row>::new(), widths)
            .header(header)
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
        // Placeholder spans every column on the first body line.
        if inner.height > 1 {
            let placeholder_area = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            let empty = Paragraph::new(EMPTY_PLACEHOLDER).alignment(Alignment::Center);
            frame.render_widget(empty, placeholder_area);
        }
        return;
    }

    let rows = state.jobs.iter().enumerate().map(|(row_index, job)| {
        let selected = row_index == view_data.table.selected_row;
        let cells = job_row_cells(job, view_data.date_offset)
            .into_iter()
            .enumerate()
            .map(|(column_index, text)| {
                let mut style = if column_index == 3 {
                    badge_style(job.status.badge())
                } else {
                    Style::default()
                };
                if selected {
                    style = style.bg(Color::DarkGray);
                }
                Cell::from(text).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    let mut table_state = TableState::default().with_selected(Some(view_data.table.selected_row));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn job_row_cells(job: &JobApplication, date_offset: UtcOffset) -> [String; 6] {
    [
        job.company_name.clone(),
        job.role_title.clone(),
        job.location.clone(),
        job.status.as_str().to_owned(),
        format_applied_date(job.applied_date, date_offset),
        ACTIONS_HINT.to_owned(),
    ]
}

fn badge_style(badge: StatusBadge) -> Style {
    match badge {
        StatusBadge::Destructive => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        StatusBadge::Highlight => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        StatusBadge::Neutral => Style::default().fg(Color::Gray),
    }
}

/// US short date, e.g. `3/4/2026`, of the calendar day at `date_offset`.
fn format_applied_date(value: OffsetDateTime, date_offset: UtcOffset) -> String {
    value
        .checked_to_offset(date_offset)
        .unwrap_or(value)
        .format(format_description!(
            "[month padding:none]/[day padding:none]/[year]"
        ))
        .unwrap_or_default()
}

fn load_error_text(message: &str) -> String {
    format!("Error loading jobs: {message}\n\nq quit")
}

const fn form_title(mode: DialogMode) -> &'static str {
    match mode {
        DialogMode::Edit(_) => "Edit Application",
        DialogMode::Add => "Add New Application",
    }
}

const fn submit_label(mode: DialogMode) -> &'static str {
    match mode {
        DialogMode::Edit(_) => "Save Changes",
        DialogMode::Add => "Create Application",
    }
}

fn render_form_text(state: &AppState, view_data: &ViewData, mode: DialogMode) -> String {
    let focused = view_data.form.field();
    let mut lines = Vec::with_capacity(DraftField::ALL.len() + 4);
    for field in DraftField::ALL {
        let marker = if field == focused { ">" } else { " " };
        let required = if field.required() { " *" } else { "" };
        let value = match state.draft.text(field) {
            Some(text) if field == focused => format!("{text}_"),
            Some(text) => text.to_owned(),
            None => format!("< {} >", state.draft.status.as_str()),
        };
        lines.push(format!("{marker} {}{required}: {value}", field.label()));
    }

    if focused == DraftField::Status {
        let choices = ApplicationStatus::ALL
            .iter()
            .enumerate()
            .map(|(index, status)| format!("{} {}", index + 1, status.as_str()))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(String::new());
        lines.push(choices);
    }

    lines.push(String::new());
    lines.push(format!(
        "[enter] {}    [esc] Cancel",
        submit_label(mode)
    ));
    lines.join("\n")
}

fn render_confirm_text(state: &AppState, id: JobId) -> String {
    let target = state
        .job(id)
        .map(|job| format!("{} - {}", job.company_name, job.role_title))
        .unwrap_or_else(|| format!("application {id}"));
    format!("{DELETE_PROMPT}\n\n{target}\n\ny delete | n cancel")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
table: j/k or up/down move | g/G first/last | a add | e or enter edit | d delete | ? help | q quit\n\
form: tab/shift+tab or up/down field | type to edit | backspace | ctrl+u clear field\n\
form: on status left/right cycle | 1-5 choose | enter or ctrl+s submit | esc cancel\n\
confirm: y delete | n or esc keep\n\
alert: any key close"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = if matches!(state.dialog, DialogState::Open(_)) {
        format!(
            "FORM {} | tab field | enter save | esc cancel",
            view_data.form.field().label().to_ascii_lowercase()
        )
    } else {
        "j/k g/G | a add | e edit | d delete | ? help | q quit".to_owned()
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
