/*
[INPUT]:  Alert text or attack-case details
[OUTPUT]: Read-only, scrollable message modal
[POS]:    TUI UI modal for blocking alerts and case details
[UPDATE]: 2026-09-05 Add for ViewError alerts and the attack-case viewer
*/

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::ModalAction;

pub(in crate::tui) struct MessageModal {
    title: String,
    lines: Vec<String>,
    scroll: u16,
    is_error: bool,
}

impl MessageModal {
    /// Blocking failure alert
    pub(in crate::tui) fn alert(message: impl Into<String>) -> Self {
        Self {
            title: String::from("Error"),
            lines: vec![message.into()],
            scroll: 0,
            is_error: true,
        }
    }

    pub(in crate::tui) fn info(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            scroll: 0,
            is_error: false,
        }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => ModalAction::Cancel,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ModalAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.lines.len().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 1).min(max);
                ModalAction::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                ModalAction::None
            }
            KeyCode::PageDown => {
                let max = self.lines.len().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 10).min(max);
                ModalAction::None
            }
            _ => ModalAction::None,
        }
    }
}

pub(in crate::tui) fn draw_message_modal(frame: &mut ratatui::Frame, area: Rect, modal: &MessageModal) {
    frame.render_widget(Clear, area);

    let border = if modal.is_error {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::Magenta)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            modal.title.as_str(),
            border.add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from("[Enter/Esc] Close  [Up/Down] Scroll"));

    let text: Vec<Line> = modal
        .lines
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let widget = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((modal.scroll, 0));
    frame.render_widget(widget, area);
}
