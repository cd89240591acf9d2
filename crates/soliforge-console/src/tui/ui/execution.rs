/*
[INPUT]:  Mounted ExecutionView (task snapshot, logs, clock) and case selection
[OUTPUT]: Execution screen: header, attack matrix, source panels, task logs
[POS]:    TUI UI execution view rendering
[UPDATE]: 2026-09-05 Add attack matrix, failing-case list, and static findings
*/

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use soliforge_client::LogLevel;
use soliforge_console::execution::{ExecutionView, WAITING_FOR_UPLOAD};
use soliforge_console::matrix::{self, case_description};

use crate::tui::ui::layout::{border_style, status_style};

pub(in crate::tui) fn draw_execution(
    frame: &mut ratatui::Frame,
    area: Rect,
    view: &ExecutionView,
    case_state: &mut ListState,
) {
    if let Some(message) = view.load_error() {
        let widget = Paragraph::new(vec![
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("[r] Retry  [Esc] Back"),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(format!("Task {}", view.task_id())),
        );
        frame.render_widget(widget, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10)])
        .split(area);
    draw_header(frame, rows[0], view);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(7),
        ])
        .split(columns[0]);
    draw_matrix_summary(frame, left[0], view);
    draw_failing_cases(frame, left[1], view, case_state);
    draw_static_findings(frame, left[2], view);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);
    draw_sources(frame, right[0], view);
    draw_task_logs(frame, right[1], view);
}

fn draw_header(frame: &mut ratatui::Frame, area: Rect, view: &ExecutionView) {
    let mut spans = Vec::new();
    if let Some(task) = view.task() {
        spans.push(Span::styled(
            task.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("  #{}  ", task.short_id())));
        spans.push(Span::styled(
            format!(" {} ", task.status.as_str().to_uppercase()),
            status_style(task.status).add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(format!("  {}  ", view.clock())));
        if let Some(contract) = task.contract_name.as_deref() {
            spans.push(Span::raw(format!("contract: {contract}  ")));
        }
        if view.is_starting() {
            spans.push(Span::styled("starting...", Style::default().fg(Color::Yellow)));
        } else if !view.can_stop() && !view.can_start() {
            spans.push(Span::styled(
                "upload a contract to start",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Execution"),
    );
    frame.render_widget(widget, area);
}

fn draw_matrix_summary(frame: &mut ratatui::Frame, area: Rect, view: &ExecutionView) {
    let summary = view.summary();
    let threat_style = if summary.threats > 0 {
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::LightGreen)
    };
    let lines = vec![
        Line::from(vec![
            Span::raw("Pass rate: "),
            Span::styled(
                format!("{}%", summary.pass_rate()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Threats: "),
            Span::styled(summary.threats.to_string(), threat_style),
            Span::raw(format!("  Pending: {}", summary.pending)),
        ]),
        Line::from(summary.blocked_label()),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Attack Matrix"),
    );
    frame.render_widget(widget, area);
}

fn draw_failing_cases(
    frame: &mut ratatui::Frame,
    area: Rect,
    view: &ExecutionView,
    case_state: &mut ListState,
) {
    let failing = view.task().map(matrix::failing_cases).unwrap_or_default();
    let items = if failing.is_empty() {
        vec![ListItem::new("No threats detected")]
    } else {
        failing
            .iter()
            .map(|case| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        case.name.clone(),
                        Style::default().fg(Color::LightRed),
                    )),
                    Line::from(Span::styled(
                        format!("  {} - {}", case.source.label(), case_description(case)),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Threats"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, case_state);
}

fn draw_static_findings(frame: &mut ratatui::Frame, area: Rect, view: &ExecutionView) {
    let findings =
        matrix::static_findings(view.task().and_then(|task| task.slither_report.as_deref()));
    let lines = if findings.is_empty() {
        vec![Line::from("No static findings")]
    } else {
        findings.into_iter().map(Line::from).collect()
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Static Analysis"),
    );
    frame.render_widget(widget, area);
}

fn draw_sources(frame: &mut ratatui::Frame, area: Rect, view: &ExecutionView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let original = if view.waiting_for_upload() {
        WAITING_FOR_UPLOAD
    } else {
        view.source_v1()
    };
    let panels = [
        ("V1 (original)", original, Color::Reset),
        ("V2 (fixed)", view.source_v2(), Color::LightGreen),
    ];
    for (area, (title, code, color)) in columns.iter().zip(panels) {
        let widget = Paragraph::new(code.to_string())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style())
                    .title(title),
            );
        frame.render_widget(widget, *area);
    }
}

fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(Color::LightRed),
        LogLevel::Warning => Style::default().fg(Color::Yellow),
        LogLevel::Debug => Style::default().fg(Color::DarkGray),
        LogLevel::Info => Style::default(),
    }
}

fn draw_task_logs(frame: &mut ratatui::Frame, area: Rect, view: &ExecutionView) {
    let available = area.height.saturating_sub(2) as usize;
    let logs = view.logs();
    let start = logs.len().saturating_sub(available);
    let lines = logs[start..]
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{:<7} ", entry.level.as_str()), level_style(entry.level)),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect::<Vec<_>>();
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(format!("Task Logs ({})", logs.len())),
    );
    frame.render_widget(widget, area);
}
