/*
[INPUT]:  AppState task boards (dashboard and search) and selection
[OUTPUT]: Task table rendered into Ratatui frame
[POS]:    TUI UI task board rendering
[UPDATE]: 2026-09-03 Render boards as tables with a filter summary on search
*/

use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use soliforge_client::Task;
use soliforge_console::board::{SearchFilters, TaskBoard};
use soliforge_console::elapsed;

use crate::tui::app::{AppState, Tab};
use crate::tui::ui::layout::{border_style, header_style, status_style};

pub(in crate::tui) fn draw_board(frame: &mut ratatui::Frame, area: Rect, app: &mut AppState) {
    match app.current_tab {
        Tab::Dashboard => draw_task_table(
            frame,
            area,
            "Tasks",
            &app.dashboard,
            app.dashboard_error.as_deref(),
            &mut app.dashboard_state,
        ),
        Tab::Search => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(5)])
                .split(area);
            draw_filter_summary(frame, rows[0], app.search.filters());
            draw_task_table(
                frame,
                rows[1],
                "Search Results",
                &app.search,
                app.search_error.as_deref(),
                &mut app.search_state,
            );
        }
        Tab::Diagnostics => {}
    }
}

fn draw_filter_summary(frame: &mut ratatui::Frame, area: Rect, filters: &SearchFilters) {
    let mut parts = Vec::new();
    if !filters.keyword.is_empty() {
        parts.push(format!("keyword={}", filters.keyword));
    }
    if !filters.creator_name.is_empty() {
        parts.push(format!("creator={}", filters.creator_name));
    }
    if let Some(status) = filters.status {
        parts.push(format!("status={status}"));
    }
    if let Some(date) = filters.start_date {
        parts.push(format!("from={date}"));
    }
    if let Some(date) = filters.end_date {
        parts.push(format!("to={date}"));
    }
    if !filters.owner_id.is_empty() {
        parts.push(format!("owner={}", filters.owner_id));
    }
    let summary = if parts.is_empty() {
        "No filters - [f] to filter".to_string()
    } else {
        parts.join("  ")
    };
    let widget = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Filters"),
    );
    frame.render_widget(widget, area);
}

fn task_row(task: &Task) -> Row<'static> {
    let contract = task.contract_name.clone().unwrap_or_else(|| "-".to_string());
    let created = task
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let clock = elapsed::format_clock(elapsed::for_task(task, Utc::now()));
    Row::new(vec![
        Cell::from(task.short_id().to_string()),
        Cell::from(task.name.clone()),
        Cell::from(Span::styled(task.status.as_str().to_uppercase(), status_style(task.status))),
        Cell::from(contract),
        Cell::from(task.creator_label().to_string()),
        Cell::from(created),
        Cell::from(clock),
    ])
}

fn draw_task_table(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    board: &TaskBoard,
    load_error: Option<&str>,
    state: &mut TableState,
) {
    let title = match board.total() {
        Some(total) => format!("{title} ({}/{total})", board.tasks().len()),
        None => format!("{title} ({})", board.tasks().len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(title);

    if let Some(message) = load_error {
        let widget = Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::LightRed),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(widget, area);
        return;
    }

    if board.tasks().is_empty() {
        let widget = Paragraph::new("No tasks found - [n] to create one").block(block);
        frame.render_widget(widget, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Status"),
        Cell::from("Contract"),
        Cell::from("Creator"),
        Cell::from("Created"),
        Cell::from("Elapsed"),
    ])
    .style(header_style());

    let rows = board.tasks().iter().map(task_row).collect::<Vec<_>>();
    let table = Table::new(rows, [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(17),
        Constraint::Length(8),
    ])
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, area, state);
}
