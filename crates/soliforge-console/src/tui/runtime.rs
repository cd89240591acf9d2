/*
[INPUT]:  Console config, session store, authenticated client, log buffer, shutdown token
[OUTPUT]: Ratatui run loop: input, redraw tick, execution poll signals
[POS]:    TUI runtime loop and frame composition
[UPDATE]: 2026-09-02 Move runtime logic out of tui/mod.rs
[UPDATE]: 2026-09-05 Drive the mounted execution view from the select loop
*/

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use soliforge_client::SoliforgeClient;
use soliforge_console::execution::{ExecSignal, ExecutionView};
use soliforge_console::{ConsoleConfig, SessionStore};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::LogBufferHandle;
use super::app::{ActiveModal, AppState, Screen, Tab};
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::modal::{draw_message_modal, draw_modal};
use super::ui::*;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

enum UiEvent {
    Input(CrosstermEvent),
}

/// Wait for the mounted view's next signal; pending while nothing is mounted
async fn next_exec_signal(view: Option<&mut ExecutionView>) -> ExecSignal {
    match view {
        Some(view) => view.next_signal().await,
        None => std::future::pending().await,
    }
}

pub async fn run_tui_with_log(
    config: ConsoleConfig,
    store: SessionStore,
    client: SoliforgeClient,
    log_buffer: LogBufferHandle,
    username: Option<String>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    if event_tx.send(UiEvent::Input(event)).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut app = AppState::new(config, store, client, log_buffer, username);
    app.bootstrap().await;
    terminal.draw(|frame| draw_ui(frame, &mut app))?;

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested; leaving tui");
                should_quit = true;
            }
            _ = tick.tick() => {}
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Input(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c');
                        if ctrl_c || handle_key_event(&mut app, key.code).await {
                            should_quit = true;
                        }
                    }
                    Some(_) => {}
                    None => should_quit = true,
                }
            }
            signal = next_exec_signal(app.execution.as_mut()) => {
                app.handle_exec_signal(signal).await;
            }
        }

        terminal.draw(|frame| draw_ui(frame, &mut app))?;
    }

    input_shutdown.cancel();
    if let Some(view) = app.execution.as_mut() {
        view.unmount();
    }
    Ok(())
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();

    match app.screen {
        Screen::Login => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(4)])
                .split(area);
            draw_login_banner(frame, layout[0], app.client.base_url().as_str());
            draw_footer(frame, layout[1], app);
        }
        Screen::Board => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(10),
                    Constraint::Length(3),
                    Constraint::Length(4),
                ])
                .split(area);
            match app.current_tab {
                Tab::Diagnostics => draw_logs(frame, layout[0], &app.log_buffer),
                Tab::Dashboard | Tab::Search => draw_board(frame, layout[0], app),
            }
            draw_tabs(frame, layout[1], app.current_tab);
            draw_footer(frame, layout[2], app);
        }
        Screen::Execution => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(10), Constraint::Length(4)])
                .split(area);
            if let Some(view) = app.execution.as_ref() {
                draw_execution(frame, layout[0], view, &mut app.case_state);
            }
            draw_footer(frame, layout[1], app);
        }
    }

    if let Some(active_modal) = app.active_modal.as_ref() {
        let modal = match active_modal {
            ActiveModal::Login(modal) => modal.to_modal(),
            ActiveModal::CreateTask(modal) => modal.to_modal(),
            ActiveModal::ConfirmDelete(modal) => modal.to_modal(),
            ActiveModal::Upload(modal) => modal.to_modal(),
            ActiveModal::Filters(modal) => modal.to_modal(),
            ActiveModal::Message(modal) => {
                draw_message_modal(frame, centered_rect(area, 70, 60), modal);
                return;
            }
        };
        let modal_area = centered_rect(area, 60, 60);
        draw_modal(frame, modal_area, &modal);
    }
}
