// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Header, footer, help, and layout helpers used by TUI rendering.
fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push_str(" ─ ");
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn entry_counter_label(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("Entry {:>width$} / {total}", index + 1)
}

fn annotation_list_suffix(count: usize, stale: usize) -> String {
    if stale == 0 {
        format!("[{count}]")
    } else {
        format!("[{count}, {stale} stale: u]")
    }
}

fn header_line(app: &App) -> Line<'static> {
    let Some(session) = app.editor.session() else {
        return Line::from(vec![
            Span::styled("─ piimark ".to_owned(), help_header_style()),
            Span::styled("no batch loaded".to_owned(), Style::default().fg(Color::DarkGray)),
        ]);
    };

    let mut spans = vec![
        Span::raw("─ ".to_owned()),
        Span::styled(
            entry_counter_label(session.active_index(), session.len()),
            Style::default().fg(Color::LightGreen),
        ),
    ];
    if let Some(label) = record_label(session.active_record()) {
        spans.push(Span::raw(" ".to_owned()));
        spans.push(Span::styled(label, Style::default().fg(Color::White)));
    }
    if !session.edits().is_empty() {
        spans.push(Span::styled(" ● unsaved".to_owned(), Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn empty_state_text() -> Text<'static> {
    Text::from(vec![
        Line::from("No batch loaded."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("o", help_key_style()),
            Span::raw(" to open a JSONL file, "),
            Span::styled("?", help_key_style()),
            Span::raw(" for help."),
        ]),
    ])
}

fn footer_help_line(app: &App, toast: Option<Span<'static>>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match (&app.mode, app.editor.session()) {
        (InputMode::Add(_), _) => {
            push_footer_entry(&mut spans, "ADD", "Enter");
            push_footer_entry(&mut spans, "TYPE", "↑↓");
            push_footer_entry(&mut spans, "RELEVANCE", "←→");
            push_footer_entry(&mut spans, "CANCEL", "Esc");
        }
        (_, None) => {
            push_footer_entry(&mut spans, "OPEN", "o");
            push_footer_entry(&mut spans, "HELP", "?");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
        (_, Some(session)) => {
            push_footer_entry_maybe_disabled(&mut spans, "PREV", "h", !session.can_go_previous());
            push_footer_entry_maybe_disabled(&mut spans, "NEXT", "l", !session.can_go_next());
            push_footer_entry(&mut spans, "GOTO", "g");
            push_footer_entry(&mut spans, "EDIT", "e/E");
            push_footer_entry(&mut spans, "ADD", "a");
            push_footer_entry(&mut spans, "REFRESH", "u");
            push_footer_entry_maybe_disabled(&mut spans, "SAVE", "s", session.edits().is_empty());
            push_footer_entry(&mut spans, "EXPORT", "x");
            push_footer_entry(&mut spans, "HELP", "?");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
    }

    push_toast_suffix(&mut spans, toast);
    Line::from(spans)
}

fn prompt_footer_line(mode: &InputMode, toast: Option<Span<'static>>) -> Line<'static> {
    let input = match mode {
        InputMode::GoTo { input } | InputMode::Open { input } => input.as_str(),
        _ => "",
    };
    let mut spans = vec![
        Span::styled(format!("{}: ", mode.prompt_label()), Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(input.to_owned()),
    ];
    push_toast_suffix(&mut spans, toast);
    Line::from(spans)
}

fn push_toast_suffix(spans: &mut Vec<Span<'static>>, toast: Option<Span<'static>>) {
    if let Some(toast) = toast {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(toast);
    }
}

fn toast_span(toast: &Toast, theme: &TuiTheme) -> Span<'static> {
    let style = if toast.is_error { theme.error_style() } else { Style::default() };
    Span::styled(toast.message.clone(), style)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_RECORD_KEYS: &[(&str, &str)] = &[
    ("h/←/[", "Previous record"),
    ("l/→/]", "Next record"),
    ("g", "Go to record number"),
    ("e", "Edit passage in $EDITOR"),
    ("E", "Edit question in $EDITOR"),
    ("s", "Save edits (in memory)"),
];

const HELP_PII_KEYS: &[(&str, &str)] = &[
    ("a", "Add PII from passage text"),
    ("j/k, ↑/↓", "Move PII cursor"),
    ("t/T", "Cycle type forward/back"),
    ("r", "Toggle relevance"),
    ("u", "Refresh PIIs (drop stale)"),
];

const HELP_BATCH_KEYS: &[(&str, &str)] = &[
    ("o", "Open JSONL file"),
    ("x", "Export batch"),
    ("R", "Load original data"),
    ("C", "Close batch"),
    ("y", "Yank record JSON"),
    ("Y", "Yank highlighted passage HTML"),
];

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(72, 84, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let dim_style = Style::default().fg(Color::DarkGray);

    let key_col_width = HELP_RECORD_KEYS
        .iter()
        .chain(HELP_PII_KEYS)
        .chain(HELP_BATCH_KEYS)
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv("?", "Help (toggle)", key_col_width, key_style));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));
    for (title, keys) in [
        ("--- Record ---", HELP_RECORD_KEYS),
        ("--- PIIs ---", HELP_PII_KEYS),
        ("--- Batch ---", HELP_BATCH_KEYS),
    ] {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(title, header_style)));
        lines.extend(keys.iter().map(|(key, desc)| help_kv(key, desc, key_col_width, key_style)));
    }
    lines.push(Line::from(""));
    lines.push(help_kv("Esc/?", "Close help", key_col_width, key_style));
    lines.push(Line::from(vec![
        Span::styled("Note: ", dim_style),
        Span::styled(
            "PIIs must appear verbatim in the passage; edits are kept when moving between records.",
            dim_style,
        ),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(app.settings.theme.panel_border_style());
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    let color = if disabled { Color::DarkGray } else { FOOTER_KEY_COLOR };
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
