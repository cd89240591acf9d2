/*
[INPUT]:  Configured API base URL
[OUTPUT]: Sign-in screen banner behind the login modal
[POS]:    TUI UI login screen
[UPDATE]: 2026-09-03 Add banner for the unauthenticated screen
*/

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::ui::layout::border_style;

pub(in crate::tui) fn draw_login_banner(frame: &mut ratatui::Frame, area: Rect, api_url: &str) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "SOLIFORGE",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Smart contract audit console"),
        Line::default(),
        Line::from(Span::styled(
            format!("API: {api_url}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Sign in"),
    );
    frame.render_widget(widget, area);
}
