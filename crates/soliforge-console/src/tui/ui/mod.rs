/*
[INPUT]:  TUI app state for UI components
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: 2026-09-03 Add login banner and execution screen renderers
*/

mod execution;
mod layout;
mod login;
mod logs;
mod task_list;

pub mod modal;

pub(in crate::tui) use execution::draw_execution;
pub(in crate::tui) use layout::{centered_rect, draw_footer, draw_tabs};
pub(in crate::tui) use login::draw_login_banner;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use task_list::draw_board;
