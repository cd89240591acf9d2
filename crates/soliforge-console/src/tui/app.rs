/*
[INPUT]:  Console config, session store, API client, log buffer
[OUTPUT]: AppState: screens, boards, mounted execution view, active modal
[POS]:    TUI app state and view-model orchestration
[UPDATE]: 2026-09-03 Route every ViewError through report()
[UPDATE]: 2026-09-05 Mount/unmount the execution view with its poller
*/

use ratatui::widgets::{ListState, TableState};
use soliforge_client::{RegisterRequest, SoliforgeClient, Task};
use soliforge_console::board::SearchFilters;
use soliforge_console::execution::{ExecSignal, ExecutionView};
use soliforge_console::matrix::{self, case_code, case_description};
use soliforge_console::{ConsoleConfig, SessionStore, StoredSession, TaskBoard, ViewError};
use tracing::{info, warn};

use crate::tui::LogBufferHandle;
use crate::tui::ui::modal::{
    ConfirmDeleteModal, CreateTaskModal, LoginModal, MessageModal, SearchFiltersModal,
    UploadModal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Screen {
    Login,
    Board,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Dashboard,
    Search,
    Diagnostics,
}

impl Tab {
    pub(super) const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Search, Tab::Diagnostics];

    pub(super) fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Search => "Search",
            Tab::Diagnostics => "Diagnostics",
        }
    }

    pub(super) fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Search => 1,
            Tab::Diagnostics => 2,
        }
    }
}

pub(super) enum ActiveModal {
    Login(LoginModal),
    CreateTask(CreateTaskModal),
    ConfirmDelete(ConfirmDeleteModal),
    Upload(UploadModal),
    Filters(SearchFiltersModal),
    Message(MessageModal),
}

pub(super) struct AppState {
    pub(super) config: ConsoleConfig,
    pub(super) store: SessionStore,
    pub(super) client: SoliforgeClient,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) dashboard: TaskBoard,
    pub(super) search: TaskBoard,
    pub(super) dashboard_state: TableState,
    pub(super) search_state: TableState,
    pub(super) dashboard_error: Option<String>,
    pub(super) search_error: Option<String>,
    pub(super) execution: Option<ExecutionView>,
    pub(super) case_state: ListState,
    pub(super) current_tab: Tab,
    pub(super) screen: Screen,
    pub(super) status_message: String,
    pub(super) active_modal: Option<ActiveModal>,
    pub(super) username: Option<String>,
}

impl AppState {
    pub(super) fn new(
        config: ConsoleConfig,
        store: SessionStore,
        client: SoliforgeClient,
        log_buffer: LogBufferHandle,
        username: Option<String>,
    ) -> Self {
        let dashboard = TaskBoard::dashboard(client.clone(), config.board.page_size);
        let search = TaskBoard::search(client.clone(), config.board.search_page_size);
        Self {
            config,
            store,
            client,
            log_buffer,
            dashboard,
            search,
            dashboard_state: TableState::default(),
            search_state: TableState::default(),
            dashboard_error: None,
            search_error: None,
            execution: None,
            case_state: ListState::default(),
            current_tab: Tab::Dashboard,
            screen: Screen::Login,
            status_message: "Ready".to_string(),
            active_modal: None,
            username,
        }
    }

    /// Show the boards when a session was restored, the login form otherwise
    pub(super) async fn bootstrap(&mut self) {
        if self.client.auth().is_authenticated() {
            self.enter_boards().await;
        } else {
            self.show_login(None);
        }
    }

    pub(super) fn close_modal(&mut self) {
        self.active_modal = None;
    }

    pub(super) fn show_login(&mut self, notice: Option<String>) {
        self.execution = None;
        self.screen = Screen::Login;
        self.active_modal = Some(ActiveModal::Login(LoginModal::new(
            self.username.as_deref(),
            notice,
        )));
    }

    fn login_notice(&mut self, notice: impl Into<String>) {
        if let Some(ActiveModal::Login(modal)) = self.active_modal.as_mut() {
            modal.set_notice(notice);
        }
    }

    async fn enter_boards(&mut self) {
        self.screen = Screen::Board;
        self.active_modal = None;
        self.load_board(Tab::Dashboard).await;
        if self.screen == Screen::Board {
            self.load_board(Tab::Search).await;
        }
    }

    async fn load_board(&mut self, tab: Tab) {
        let result = match tab {
            Tab::Dashboard => self.dashboard.load().await,
            Tab::Search => self.search.load().await,
            Tab::Diagnostics => return,
        };
        let message = match result {
            Ok(()) => None,
            Err(ViewError::Load(message)) => Some(message),
            Err(err) => {
                self.report(err).await;
                return;
            }
        };
        match tab {
            Tab::Dashboard => {
                self.dashboard_error = message;
                clamp_selection(&mut self.dashboard_state, self.dashboard.tasks().len());
            }
            Tab::Search => {
                self.search_error = message;
                clamp_selection(&mut self.search_state, self.search.tasks().len());
            }
            Tab::Diagnostics => {}
        }
    }

    /// Present a view error: login redirect, inline load error, or blocking alert
    pub(super) async fn report(&mut self, err: ViewError) {
        match err {
            ViewError::Unauthenticated => self.session_expired().await,
            ViewError::Load(message) => {
                self.status_message = message.clone();
                self.active_modal = Some(ActiveModal::Message(MessageModal::alert(message)));
            }
            alert @ ViewError::Alert { .. } => {
                self.status_message = alert.to_string();
                self.active_modal = Some(ActiveModal::Message(MessageModal::alert(
                    alert.to_string(),
                )));
            }
        }
    }

    pub(super) async fn session_expired(&mut self) {
        warn!("session rejected by server; returning to login");
        self.client.logout();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear stored session");
        }
        self.status_message = "Session expired".to_string();
        self.show_login(Some(ViewError::Unauthenticated.to_string()));
    }

    pub(super) async fn submit_login(&mut self, email: String, password: String) {
        if email.is_empty() || password.is_empty() {
            self.login_notice("Email and password are required");
            return;
        }
        self.login_notice("Signing in...");
        if let Err(err) = self.client.login(&email, &password).await {
            warn!(error = %err, "login failed");
            self.login_notice(err.detail());
            return;
        }
        if let Some(token) = self.client.auth().token() {
            let session = StoredSession::new(&self.config.api.base_url, Some(&email), &token);
            if let Err(err) = self.store.save(&session).await {
                warn!(error = %err, "failed to persist session");
            }
        }
        info!(user = %email, "signed in");
        self.status_message = format!("Signed in as {email}");
        self.username = Some(email);
        self.enter_boards().await;
    }

    pub(super) async fn submit_register(&mut self, email: String, username: String, password: String) {
        if email.is_empty() || password.is_empty() {
            self.login_notice("Email and password are required");
            return;
        }
        let request = RegisterRequest::new(email.as_str(), password, Some(username.as_str()));
        match self.client.register(&request).await {
            Ok(profile) => {
                info!(user = %profile.username, "account registered");
                self.username = Some(email);
                if let Some(ActiveModal::Login(modal)) = self.active_modal.as_mut() {
                    modal.registered();
                }
            }
            Err(err) => self.login_notice(err.detail()),
        }
    }

    pub(super) async fn logout(&mut self) {
        self.client.logout();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear stored session");
        }
        info!("signed out");
        self.status_message = "Signed out".to_string();
        self.show_login(None);
    }

    pub(super) fn next_tab(&mut self) {
        let next = (self.current_tab.index() + 1) % Tab::ALL.len();
        self.current_tab = Tab::ALL[next];
    }

    pub(super) fn set_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    fn current_board(&self) -> Option<(&TaskBoard, &TableState)> {
        match self.current_tab {
            Tab::Dashboard => Some((&self.dashboard, &self.dashboard_state)),
            Tab::Search => Some((&self.search, &self.search_state)),
            Tab::Diagnostics => None,
        }
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        let (board, state) = self.current_board()?;
        board.tasks().get(state.selected()?)
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let (len, state) = match self.current_tab {
            Tab::Dashboard => (self.dashboard.tasks().len(), &mut self.dashboard_state),
            Tab::Search => (self.search.tasks().len(), &mut self.search_state),
            Tab::Diagnostics => return,
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, (len - 1) as isize) as usize;
        state.select(Some(next));
    }

    pub(super) async fn refresh(&mut self) {
        match self.screen {
            Screen::Execution => {
                let result = match self.execution.as_mut() {
                    Some(view) if view.load_error().is_some() => view.load().await,
                    Some(view) => view.refresh().await,
                    None => Ok(()),
                };
                match result {
                    Ok(()) => self.status_message = "Task refreshed".to_string(),
                    Err(ViewError::Load(message)) => self.status_message = message,
                    Err(err) => self.report(err).await,
                }
            }
            Screen::Board => {
                let result = match self.current_tab {
                    Tab::Dashboard => self.dashboard.refresh().await,
                    Tab::Search => self.search.refresh().await,
                    Tab::Diagnostics => Ok(()),
                };
                match result {
                    Ok(()) => {
                        self.dashboard_error = None;
                        self.search_error = None;
                        clamp_selection(&mut self.dashboard_state, self.dashboard.tasks().len());
                        clamp_selection(&mut self.search_state, self.search.tasks().len());
                        self.status_message = "Tasks refreshed".to_string();
                    }
                    Err(err) => self.report(err).await,
                }
            }
            Screen::Login => {}
        }
    }

    pub(super) async fn open_selected(&mut self) {
        if let Some(task_id) = self.selected_task().map(|task| task.id.clone()) {
            self.open_execution(task_id).await;
        }
    }

    pub(super) async fn open_execution(&mut self, task_id: String) {
        let mut view = ExecutionView::new(self.client.clone(), task_id, &self.config.poll);
        match view.load().await {
            Ok(()) => {}
            Err(ViewError::Unauthenticated) => {
                self.session_expired().await;
                return;
            }
            Err(err) => self.status_message = err.to_string(),
        }
        self.case_state = ListState::default();
        self.execution = Some(view);
        self.screen = Screen::Execution;
    }

    /// Unmount the execution view (stops its poller) and go back to the boards
    pub(super) async fn close_execution(&mut self) {
        self.execution = None;
        self.screen = Screen::Board;
        self.refresh().await;
    }

    pub(super) fn open_create_task(&mut self) {
        self.active_modal = Some(ActiveModal::CreateTask(CreateTaskModal::new()));
    }

    pub(super) async fn submit_create_task(&mut self, name: String) {
        if name.trim().is_empty() {
            if let Some(ActiveModal::CreateTask(modal)) = self.active_modal.as_mut() {
                modal.set_notice("Task name is required");
            }
            return;
        }
        self.close_modal();
        match self.dashboard.create(&name).await {
            Ok(task_id) => {
                info!(task_id = %task_id, "task created");
                self.status_message = format!("Task created: {name}");
                self.open_execution(task_id).await;
            }
            Err(err) => self.report(err).await,
        }
    }

    pub(super) fn open_delete_confirm(&mut self) {
        if let Some(task) = self.selected_task() {
            let modal = ConfirmDeleteModal::new(task.id.clone(), task.name.clone());
            self.active_modal = Some(ActiveModal::ConfirmDelete(modal));
        }
    }

    pub(super) async fn submit_delete(&mut self, task_id: String) {
        self.close_modal();
        let result = match self.current_tab {
            Tab::Search => self.search.delete(&task_id).await,
            _ => self.dashboard.delete(&task_id).await,
        };
        match result {
            Ok(()) => {
                self.status_message = format!("Task deleted: {task_id}");
                let other = match self.current_tab {
                    Tab::Search => self.dashboard.refresh().await,
                    _ => self.search.refresh().await,
                };
                if let Err(err) = other {
                    warn!(error = %err, "failed to refresh the other task board");
                }
                clamp_selection(&mut self.dashboard_state, self.dashboard.tasks().len());
                clamp_selection(&mut self.search_state, self.search.tasks().len());
            }
            Err(err) => self.report(err).await,
        }
    }

    pub(super) fn open_filters(&mut self) {
        let modal = SearchFiltersModal::new(self.search.filters());
        self.active_modal = Some(ActiveModal::Filters(modal));
    }

    pub(super) async fn submit_filters(&mut self, filters: SearchFilters) {
        self.close_modal();
        match self.search.apply_filters(filters).await {
            Ok(()) => {
                self.search_error = None;
                clamp_selection(&mut self.search_state, self.search.tasks().len());
                self.status_message = format!("{} tasks found", self.search.tasks().len());
            }
            Err(err) => self.report(err).await,
        }
    }

    pub(super) async fn reset_filters(&mut self) {
        match self.search.reset_filters().await {
            Ok(()) => {
                self.search_error = None;
                clamp_selection(&mut self.search_state, self.search.tasks().len());
                self.status_message = "Filters cleared".to_string();
            }
            Err(err) => self.report(err).await,
        }
    }

    pub(super) async fn start_task(&mut self) {
        let Some(view) = self.execution.as_mut() else {
            return;
        };
        self.status_message = "Starting...".to_string();
        match view.start().await {
            Ok(()) => self.status_message = "Task started".to_string(),
            Err(err) => self.report(err).await,
        }
    }

    pub(super) async fn stop_task(&mut self) {
        let Some(view) = self.execution.as_mut() else {
            return;
        };
        match view.stop().await {
            Ok(()) => self.status_message = "Task stopped".to_string(),
            Err(err) => self.report(err).await,
        }
    }

    pub(super) fn open_upload(&mut self) {
        if let Some(view) = self.execution.as_ref() {
            if view.can_stop() {
                self.status_message = "Stop the task before uploading".to_string();
                return;
            }
            let title = format!("{} Contract", view.upload_label());
            self.active_modal = Some(ActiveModal::Upload(UploadModal::new(&title)));
        }
    }

    pub(super) async fn submit_upload(&mut self, path: std::path::PathBuf) {
        self.close_modal();
        let Some(view) = self.execution.as_mut() else {
            return;
        };
        match view.upload(&path).await {
            Ok(()) => self.status_message = format!("Uploaded {}", path.display()),
            Err(err) => self.report(err).await,
        }
    }

    pub(super) fn move_case_selection(&mut self, delta: isize) {
        let len = self
            .execution
            .as_ref()
            .and_then(ExecutionView::task)
            .map(|task| matrix::failing_cases(task).len())
            .unwrap_or(0);
        if len == 0 {
            self.case_state.select(None);
            return;
        }
        let current = self.case_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, (len - 1) as isize) as usize;
        self.case_state.select(Some(next));
    }

    pub(super) fn open_case_detail(&mut self) {
        let Some(task) = self.execution.as_ref().and_then(ExecutionView::task) else {
            return;
        };
        let failing = matrix::failing_cases(task);
        let Some(case) = self.case_state.selected().and_then(|index| failing.get(index)) else {
            return;
        };
        let mut lines = vec![
            format!("Source: {}", case.source.label()),
            format!("Vector: {}", case_description(case)),
            String::new(),
        ];
        lines.extend(case_code(case).lines().map(str::to_string));
        let modal = MessageModal::info(case.name.clone(), lines);
        self.active_modal = Some(ActiveModal::Message(modal));
    }

    pub(super) async fn handle_exec_signal(&mut self, signal: ExecSignal) {
        let Some(view) = self.execution.as_mut() else {
            return;
        };
        if let Err(err) = view.handle_signal(signal) {
            self.report(err).await;
        }
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    match (len, state.selected()) {
        (0, _) => state.select(None),
        (_, None) => state.select(Some(0)),
        (len, Some(selected)) if selected >= len => state.select(Some(len - 1)),
        _ => {}
    }
}
