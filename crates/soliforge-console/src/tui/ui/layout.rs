/*
[INPUT]:  Frame layout regions, current tab and screen
[OUTPUT]: Tab bar, hotkey footer, shared palette and layout helpers
[POS]:    TUI UI layout module
[UPDATE]: 2026-09-03 Footer hotkeys follow the active screen
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use soliforge_client::TaskStatus;

use crate::tui::app::{AppState, Screen, Tab};

pub(in crate::tui) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(in crate::tui) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Created | TaskStatus::Uploaded => Color::Cyan,
        TaskStatus::Running => Color::Yellow,
        TaskStatus::Completed => Color::LightGreen,
        TaskStatus::Failed => Color::LightRed,
        TaskStatus::Stopped => Color::Gray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn draw_tabs(frame: &mut ratatui::Frame, area: Rect, current_tab: Tab) {
    let titles = Tab::ALL
        .iter()
        .map(|tab| Line::from(tab.title()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Tabs"),
        )
        .highlight_style(header_style())
        .select(current_tab.index());

    frame.render_widget(tabs, area);
}

fn hotkeys(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, label) in pairs {
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    Line::from(spans)
}

pub(in crate::tui) fn draw_footer(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let line1 = match app.screen {
        Screen::Login => hotkeys(&[("[Tab]", "Next field"), ("[Enter]", "Select"), ("[Esc]", "Quit")]),
        Screen::Board => {
            let mut pairs = vec![
                ("[Up/Down]", "Select"),
                ("[Enter]", "Open"),
                ("[n]", "New"),
                ("[d]", "Delete"),
                ("[Tab/1-3]", "Tabs"),
            ];
            if app.current_tab == Tab::Search {
                pairs.push(("[f]", "Filters"));
                pairs.push(("[c]", "Clear"));
            }
            hotkeys(&pairs)
        }
        Screen::Execution => {
            let start_label = app
                .execution
                .as_ref()
                .map(|view| view.start_label())
                .unwrap_or("Start");
            let upload_label = app
                .execution
                .as_ref()
                .map(|view| view.upload_label())
                .unwrap_or("Upload");
            hotkeys(&[
                ("[s]", start_label),
                ("[x]", "Stop"),
                ("[u]", upload_label),
                ("[Up/Down]", "Case"),
                ("[Enter]", "Details"),
                ("[Esc]", "Back"),
            ])
        }
    };

    let mut line2 = match app.screen {
        Screen::Login => Line::default(),
        Screen::Board => hotkeys(&[("[r]", "Refresh"), ("[o]", "Sign out"), ("[q]", "Quit")]),
        Screen::Execution => hotkeys(&[("[r]", "Refresh"), ("[q]", "Quit")]),
    };
    line2
        .spans
        .push(Span::raw(format!("Status: {}", app.status_message)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![line1, line2]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
