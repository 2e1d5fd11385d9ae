// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Interactive annotation editor shell (ratatui + crossterm) over a [`crate::session::Editor`].

use std::{
    env,
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::Command,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::model::{PiiType, Record, Relevance};
use crate::ops::{self, ValidationError};
use crate::render::text::{single_line, truncate_with_ellipsis};
use crate::render::{highlight_segments, render_html, HighlightPalette, Segment};
use crate::session::{
    Editor, LifecycleError, Session, MSG_EDITS_SAVED, MSG_ORIGINAL_RELOADED, MSG_PIIS_REFRESHED,
};
use crate::store::{read_batch, write_export};

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "piimark";
const QUESTION_PANE_HEIGHT: u16 = 5;

/// Settings the UI takes from [`Config`].
#[derive(Debug, Clone)]
pub struct TuiSettings {
    export_path: PathBuf,
    toast_duration: Duration,
    palette: HighlightPalette,
    theme: TuiTheme,
}

impl TuiSettings {
    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            export_path: config.export_path.clone(),
            toast_duration: Duration::from_secs(config.toast_seconds),
            palette: config.palette(),
            theme: TuiTheme::from_config(config)?,
        })
    }
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from(crate::store::file::DEFAULT_EXPORT_FILE_NAME),
            toast_duration: Duration::from_secs(2),
            palette: HighlightPalette::default(),
            theme: TuiTheme::default(),
        }
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(editor: Editor, settings: TuiSettings) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(editor, settings);
    info!(open = app.editor.is_open(), "tui started");

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if let Some(action) = app.take_external_action() {
                        let result =
                            terminal.run_external_action(|| app.execute_external_action(action));
                        if let Err(err) = result {
                            error!(%err, "external editor failed");
                            app.set_error_toast(format!("External action failed: {err}"));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    info!("tui stopped");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let header_area = layout[0];
    let main_area = layout[1];
    let status_area = layout[2];

    frame.render_widget(Paragraph::new(header_line(app)), header_area);

    match app.editor.session().map(Session::current_view) {
        Some(view) => draw_session(frame, app, &view, main_area),
        None => {
            let empty = Paragraph::new(empty_state_text())
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(view_title("Batch", None)));
            frame.render_widget(empty, main_area);
        }
    }

    if app.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
        app.toast = None;
    }
    let toast = app.toast.as_ref().map(|toast| toast_span(toast, &app.settings.theme));

    match &app.mode {
        InputMode::GoTo { input } | InputMode::Open { input } => {
            let status = Paragraph::new(prompt_footer_line(&app.mode, toast));
            frame.render_widget(status, status_area);
            let prefix_len = app.mode.prompt_label().chars().count() + 2;
            let cursor_x = status_area
                .x
                .saturating_add((prefix_len + input.chars().count()) as u16)
                .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
            frame.set_cursor(cursor_x, status_area.y);
        }
        InputMode::Add(_) => {
            let status = Paragraph::new(footer_help_line(app, toast));
            frame.render_widget(status, status_area);
            render_add_form(frame, app, main_area);
        }
        InputMode::Normal => {
            let status = Paragraph::new(footer_help_line(app, toast));
            frame.render_widget(status, status_area);
            let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
            frame.render_widget(brand, status_area);
        }
    }

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn draw_session(frame: &mut Frame<'_>, app: &mut App, view: &Record, area: Rect) {
    let stale = ops::stale_keys(view);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let text_panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(QUESTION_PANE_HEIGHT)])
        .split(panes[0]);

    let passage = Paragraph::new(passage_text(
        &highlight_segments(view.context(), view.piis()),
        &app.settings.theme,
    ))
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Passage", Some("e edit")))
            .border_style(app.settings.theme.panel_border_style()),
    );
    frame.render_widget(passage, text_panes[0]);

    let question = Paragraph::new(view.question().to_owned())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Question", Some("E edit"))),
        );
    frame.render_widget(question, text_panes[1]);

    let theme = &app.settings.theme;
    let items = view
        .piis()
        .iter()
        .map(|(key, annotation)| {
            let is_stale = stale.iter().any(|stale_key| stale_key == key);
            let key_style = if is_stale { theme.stale_style() } else { Style::default() };
            ListItem::new(Line::from(vec![
                Span::styled(single_line(key), key_style),
                Span::raw("  "),
                Span::styled(annotation.pii_type().to_string(), Style::default().fg(Color::Gray)),
                Span::raw(" · "),
                Span::styled(
                    annotation.relevance().to_string(),
                    theme.relevance_style(annotation.relevance()),
                ),
            ]))
        })
        .collect::<Vec<_>>();
    let suffix = annotation_list_suffix(view.piis().len(), stale.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("PIIs", Some(&suffix))),
        )
        .highlight_style(theme.selection_style());
    app.clamp_annotation_cursor(view.piis().len());
    frame.render_stateful_widget(list, panes[1], &mut app.annotations_state);
}

fn render_add_form(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let InputMode::Add(form) = &app.mode else {
        return;
    };
    let area = centered_rect(60, 40, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let theme = &app.settings.theme;
    let lines = vec![
        Line::from(vec![Span::styled("Value:     ", key_style), Span::raw(form.value.clone())]),
        Line::from(vec![
            Span::styled("Type:      ", key_style),
            Span::raw(format!("◀ {} ▶", form.pii_type)),
        ]),
        Line::from(vec![
            Span::styled("Relevance: ", key_style),
            Span::styled(form.relevance.to_string(), theme.relevance_style(form.relevance)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter add · ↑/↓ type · ←/→/Tab relevance · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Add PII ─")
        .border_style(theme.panel_border_style());
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let cursor_x = inner
        .x
        .saturating_add(11)
        .saturating_add(form.value.chars().count() as u16)
        .min(inner.x.saturating_add(inner.width.saturating_sub(1)));
    frame.set_cursor(cursor_x, inner.y);
}

/// Splits highlight segments into styled lines for the passage pane.
fn passage_text(segments: &[Segment<'_>], theme: &TuiTheme) -> Text<'static> {
    let mut lines = Vec::<Line<'static>>::new();
    let mut current = Vec::<Span<'static>>::new();
    for segment in segments {
        let style = match segment.mark {
            Some(mark) => theme.mark_style(mark.relevance),
            None => Style::default(),
        };
        let mut parts =
            segment.text.split('\n').map(|part| part.strip_suffix('\r').unwrap_or(part));
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first.to_owned(), style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_owned(), style));
            }
        }
    }
    lines.push(Line::from(current));
    Text::from(lines)
}

// Header, footer, help and layout helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    is_error: bool,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AddForm {
    value: String,
    pii_type: PiiType,
    relevance: Relevance,
}

impl Default for AddForm {
    fn default() -> Self {
        Self { value: String::new(), pii_type: PiiType::default(), relevance: Relevance::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    GoTo {
        input: String,
    },
    Open {
        input: String,
    },
    Add(AddForm),
}

impl InputMode {
    fn prompt_label(&self) -> &'static str {
        match self {
            Self::GoTo { .. } => "Go to",
            Self::Open { .. } => "Open",
            Self::Add(_) => "Add",
            Self::Normal => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExternalAction {
    EditPassage,
    EditQuestion,
}

impl ExternalAction {
    fn label(self) -> &'static str {
        match self {
            Self::EditPassage => "passage",
            Self::EditQuestion => "question",
        }
    }
}

struct App {
    editor: Editor,
    settings: TuiSettings,
    annotations_state: ListState,
    mode: InputMode,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    toast: Option<Toast>,
    pending_external_action: Option<ExternalAction>,
    should_quit: bool,
}

impl App {
    fn new(editor: Editor, settings: TuiSettings) -> Self {
        let mut app = Self {
            editor,
            settings,
            annotations_state: ListState::default(),
            mode: InputMode::Normal,
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            toast: None,
            pending_external_action: None,
            should_quit: false,
        };
        app.reset_annotation_cursor();
        app
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => self.help_scroll_by(1),
                KeyCode::Up | KeyCode::Char('k') => self.help_scroll_by(-1),
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return false;
        }

        match self.mode {
            InputMode::GoTo { .. } | InputMode::Open { .. } => {
                self.handle_prompt_key(code);
                return false;
            }
            InputMode::Add(_) => {
                self.handle_add_form_key(code);
                return false;
            }
            InputMode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('o') => self.enter_open_prompt(),
            KeyCode::Char('R') => self.load_original(),
            _ if !self.editor.is_open() => self.set_toast("No batch loaded. Press o to open one."),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('[') => self.go_previous(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(']') => self.go_next(),
            KeyCode::Char('g') => self.mode = InputMode::GoTo { input: String::new() },
            KeyCode::Char('e') => self.queue_external_action(ExternalAction::EditPassage),
            KeyCode::Char('E') => self.queue_external_action(ExternalAction::EditQuestion),
            KeyCode::Char('a') => self.mode = InputMode::Add(AddForm::default()),
            KeyCode::Char('j') | KeyCode::Down => self.move_annotation_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_annotation_cursor(-1),
            KeyCode::Char('t') => self.cycle_selected_type(true),
            KeyCode::Char('T') => self.cycle_selected_type(false),
            KeyCode::Char('r') => self.toggle_selected_relevance(),
            KeyCode::Char('u') => self.refresh_annotations(),
            KeyCode::Char('s') => self.save_edits(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('C') => self.close_session(),
            KeyCode::Char('y') => self.yank_record_json(),
            KeyCode::Char('Y') => self.yank_passage_html(),
            _ => {}
        }

        false
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    fn help_scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.help_scroll).saturating_add(delta).max(0);
        self.help_scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let input = match &mut self.mode {
            InputMode::GoTo { input } | InputMode::Open { input } => input,
            _ => return,
        };
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => input.push(ch),
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.mode);
                match mode {
                    InputMode::GoTo { input } => self.submit_go_to(&input),
                    InputMode::Open { input } => self.submit_open(&input),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn handle_add_form_key(&mut self, code: KeyCode) {
        let InputMode::Add(form) = &mut self.mode else {
            return;
        };
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Up => form.pii_type = form.pii_type.prev(),
            KeyCode::Down => form.pii_type = form.pii_type.next(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                form.relevance = form.relevance.toggle();
            }
            KeyCode::Backspace => {
                form.value.pop();
            }
            KeyCode::Char(ch) => form.value.push(ch),
            KeyCode::Enter => {
                let form = form.clone();
                self.submit_add_form(form);
            }
            _ => {}
        }
    }

    fn submit_add_form(&mut self, form: AddForm) {
        let Some(session) = self.editor.session_mut() else {
            self.mode = InputMode::Normal;
            return;
        };
        match session.add_annotation(&form.value, form.pii_type, form.relevance) {
            Ok(key) => {
                let position = session.active_record().piis().get_index_of(&key);
                self.mode = InputMode::Normal;
                self.annotations_state.select(position);
                self.set_toast(format!("Added PII: {key} and updated PII list."));
            }
            // The form stays open so the value can be corrected.
            Err(err @ ValidationError::Empty) => self.set_toast(format!("Warning: {err}")),
            Err(err @ ValidationError::NotInContext { .. }) => {
                self.set_error_toast(format!("Error: {err}"));
            }
        }
    }

    fn submit_go_to(&mut self, input: &str) {
        let Ok(target) = input.trim().parse::<usize>() else {
            self.set_toast(format!("Not a record number: {}", input.trim()));
            return;
        };
        let Some(session) = self.editor.session_mut() else {
            return;
        };
        match session.go_to(target) {
            Ok(()) => self.reset_annotation_cursor(),
            Err(err) => {
                self.set_toast(format!("No record {} (batch has {})", err.index, err.len));
            }
        }
    }

    fn enter_open_prompt(&mut self) {
        if self.editor.is_open() {
            self.set_toast(LifecycleError::AlreadyOpen.to_string());
            return;
        }
        self.mode = InputMode::Open { input: String::new() };
    }

    fn submit_open(&mut self, input: &str) {
        let path = input.trim();
        if path.is_empty() {
            self.set_toast("No file given");
            return;
        }
        self.open_path(Path::new(path));
    }

    fn open_path(&mut self, path: &Path) {
        let store = match read_batch(path) {
            Ok(store) => store,
            Err(err) => {
                error!(code = err.code(), line = ?err.line(), "open failed");
                self.set_error_toast(format!("Open failed: {err}"));
                return;
            }
        };
        match self.editor.open(store) {
            Ok(session) => {
                let count = session.len();
                info!(records = count, "opened batch");
                self.reset_annotation_cursor();
                self.set_toast(format!("Loaded {count} records from {}", path.display()));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn close_session(&mut self) {
        if self.editor.close().is_some() {
            self.reset_annotation_cursor();
            self.set_toast("Session closed");
        }
    }

    fn go_previous(&mut self) {
        if self.editor.session_mut().is_some_and(Session::go_previous) {
            self.reset_annotation_cursor();
        }
    }

    fn go_next(&mut self) {
        if self.editor.session_mut().is_some_and(Session::go_next) {
            self.reset_annotation_cursor();
        }
    }

    fn selected_key(&self) -> Option<String> {
        let session = self.editor.session()?;
        let idx = self.annotations_state.selected()?;
        session.current_view().piis().get_index(idx).map(|(key, _)| key.clone())
    }

    fn annotation_count(&self) -> usize {
        self.editor.session().map_or(0, |session| session.current_view().piis().len())
    }

    fn reset_annotation_cursor(&mut self) {
        let selected = (self.annotation_count() > 0).then_some(0);
        self.annotations_state = ListState::default();
        self.annotations_state.select(selected);
    }

    fn clamp_annotation_cursor(&mut self, len: usize) {
        let selected = match (self.annotations_state.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(idx), len) => Some(idx.min(len - 1)),
        };
        self.annotations_state.select(selected);
    }

    fn move_annotation_cursor(&mut self, delta: isize) {
        let len = self.annotation_count();
        if len == 0 {
            return;
        }
        let current = self.annotations_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.annotations_state.select(Some(next));
    }

    fn cycle_selected_type(&mut self, forward: bool) {
        let Some(key) = self.selected_key() else {
            self.set_toast("No PII selected");
            return;
        };
        if let Some(session) = self.editor.session_mut() {
            session.cycle_annotation_type(&key, forward);
        }
    }

    fn toggle_selected_relevance(&mut self) {
        let Some(key) = self.selected_key() else {
            self.set_toast("No PII selected");
            return;
        };
        if let Some(session) = self.editor.session_mut() {
            session.toggle_annotation_relevance(&key);
        }
    }

    fn refresh_annotations(&mut self) {
        let Some(session) = self.editor.session_mut() else {
            return;
        };
        let removed = session.refresh_annotations();
        let len = session.active_record().piis().len();
        self.clamp_annotation_cursor(len);
        if removed.is_empty() {
            self.set_toast(MSG_PIIS_REFRESHED);
        } else {
            self.set_toast(format!("{MSG_PIIS_REFRESHED} Removed {}.", removed.len()));
        }
    }

    fn save_edits(&mut self) {
        if let Some(session) = self.editor.session_mut() {
            session.save_edits();
            self.set_toast(MSG_EDITS_SAVED);
        }
    }

    fn export(&mut self) {
        let Some(session) = self.editor.session_mut() else {
            return;
        };
        let path = self.settings.export_path.clone();
        let result = session
            .export_lines()
            .map_err(crate::store::FileError::from)
            .and_then(|lines| write_export(&path, &lines).map(|()| lines.len()));
        match result {
            Ok(count) => {
                info!(records = count, path = %path.display(), "exported batch");
                self.set_toast(format!("Exported {count} records to {}", path.display()));
            }
            Err(err) => {
                error!(code = err.code(), "export failed");
                self.set_error_toast(format!("Export failed: {err}"));
            }
        }
    }

    fn load_original(&mut self) {
        match self.editor.load_original() {
            Ok(()) => {
                self.reset_annotation_cursor();
                self.set_toast(MSG_ORIGINAL_RELOADED);
            }
            Err(warning) => self.set_toast(format!("Warning: {warning}")),
        }
    }

    fn yank_record_json(&mut self) {
        let Some(session) = self.editor.session() else {
            return;
        };
        let json = match serde_json::to_string(&session.current_view()) {
            Ok(json) => json,
            Err(err) => {
                self.set_error_toast(format!("Serialize error: {err}"));
                return;
            }
        };
        self.yank(&json, "record JSON");
    }

    fn yank_passage_html(&mut self) {
        let Some(session) = self.editor.session() else {
            return;
        };
        let view = session.current_view();
        let html = render_html(view.context(), view.piis(), &self.settings.palette);
        self.yank(&html, "passage HTML");
    }

    fn yank(&mut self, text: &str, what: &str) {
        match copy_to_clipboard(text) {
            Ok(backend) => self.set_toast(format!("Yanked {what} ({backend})")),
            Err(err) => {
                warn!(%err, "clipboard write failed");
                self.set_error_toast(format!("Clipboard error: {err}"));
            }
        }
    }

    fn take_external_action(&mut self) -> Option<ExternalAction> {
        self.pending_external_action.take()
    }

    fn queue_external_action(&mut self, action: ExternalAction) {
        self.pending_external_action = Some(action);
    }

    fn execute_external_action(&mut self, action: ExternalAction) -> Result<(), String> {
        let Some(session) = self.editor.session() else {
            return Err("no batch loaded".to_owned());
        };
        let view = session.current_view();
        let original = match action {
            ExternalAction::EditPassage => view.context(),
            ExternalAction::EditQuestion => view.question(),
        };

        let Some(edited) = edit_text_in_editor(action.label(), original)? else {
            self.set_toast(format!("Edit cancelled (no changes): {}", action.label()));
            return Ok(());
        };

        if let Some(session) = self.editor.session_mut() {
            match action {
                ExternalAction::EditPassage => session.set_context(edited),
                ExternalAction::EditQuestion => session.set_question(edited),
            }
        }
        self.set_toast(format!("Edited {} (press s to save, u to refresh PIIs)", action.label()));
        Ok(())
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.push_toast(message.into(), false);
    }

    fn set_error_toast(&mut self, message: impl Into<String>) {
        self.push_toast(message.into(), true);
    }

    fn push_toast(&mut self, message: String, is_error: bool) {
        self.toast = Some(Toast {
            message,
            is_error,
            expires_at: Instant::now() + self.settings.toast_duration,
        });
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    fn run_external_action(
        &mut self,
        action: impl FnOnce() -> Result<(), String>,
    ) -> Result<(), String> {
        let _suspend = TerminalSuspendGuard::new(&mut self.terminal)
            .map_err(|err| format!("terminal suspend failed: {err}"))?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            let _ = enable_raw_mode();
            let _ = execute!(terminal.backend_mut(), EnterAlternateScreen);
            let _ = terminal.hide_cursor();
            return Err(err);
        }

        ratatui::backend::Backend::flush(terminal.backend_mut())?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        let _ = enable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), EnterAlternateScreen);
        let _ = self.terminal.clear();
        let _ = self.terminal.hide_cursor();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

fn resolve_editor_command() -> String {
    env::var("VISUAL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env::var("EDITOR").ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_owned())
}

/// Opens `original` in the user's editor. Returns `None` when the text comes back unchanged.
fn edit_text_in_editor(label: &str, original: &str) -> Result<Option<String>, String> {
    let temp_path = write_temp_text_file(label, original)?;
    let editor_command = resolve_editor_command();

    let launch_result = launch_editor_command(&editor_command, &temp_path);
    let edited = fs::read_to_string(&temp_path).map_err(|err| {
        format!("failed reading edited {label} from {}: {err}", temp_path.display())
    });
    let _ = fs::remove_file(&temp_path);

    launch_result?;
    let edited = strip_editor_newline(original, edited?);
    Ok((edited != original).then_some(edited))
}

/// Drops the final newline most editors append on save, unless the original had one.
fn strip_editor_newline(original: &str, mut edited: String) -> String {
    if !original.ends_with('\n') && edited.ends_with('\n') {
        edited.pop();
        if edited.ends_with('\r') {
            edited.pop();
        }
    }
    edited
}

fn write_temp_text_file(label: &str, content: &str) -> Result<PathBuf, String> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let mut temp_path = env::temp_dir();
    temp_path.push(format!("piimark-{label}-{}-{ts}.txt", std::process::id()));
    fs::write(&temp_path, content).map_err(|err| {
        format!("failed to create temporary file {}: {err}", temp_path.display())
    })?;
    Ok(temp_path)
}

fn launch_editor_command(command: &str, path: &Path) -> Result<(), String> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err("invalid editor temp path".to_owned());
    }

    let status = Command::new("sh")
        .arg("-lc")
        .arg(format!("{command} {}", shell_single_quote(path_text.as_ref())))
        .status()
        .map_err(|err| format!("failed to run editor command `{command}`: {err}"))?;
    if !status.success() {
        return Err(format!("editor command failed with status {status}"));
    }
    Ok(())
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn record_label(record: &Record) -> Option<String> {
    record.id_label().map(|id| truncate_with_ellipsis(&single_line(&id), 32))
}
