/*
[INPUT]:  SoliforgeClient, page size, search filters
[OUTPUT]: Task list for the dashboard and search views; create/delete actions
[POS]:    View layer - task board view model
[UPDATE]: When changing list paging, filter handling, or create/delete flow
*/

use chrono::NaiveDate;
use soliforge_client::{SoliforgeClient, Task, TaskListQuery, TaskStatus};
use tracing::{debug, info};

use crate::alert::ViewError;

const LOAD_TASKS_FALLBACK: &str = "Failed to load tasks.";

/// Filters of the search page; blank text fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub keyword: String,
    pub creator_name: String,
    pub status: Option<TaskStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: String,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, query: TaskListQuery) -> TaskListQuery {
        query
            .keyword(self.keyword.as_str())
            .creator_name(self.creator_name.as_str())
            .status(self.status)
            .date_range(self.start_date, self.end_date)
            .owner_id(self.owner_id.as_str())
    }
}

/// Parse a `YYYY-MM-DD` filter value; blank means no bound
pub fn parse_date_filter(raw: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// Parse a status filter value; blank or `all` means any status
pub fn parse_status_filter(raw: &str) -> Result<Option<TaskStatus>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    raw.parse().map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    /// First page, no filters
    Dashboard,
    /// First page with the search filters
    Search,
}

pub struct TaskBoard {
    client: SoliforgeClient,
    kind: BoardKind,
    page_size: u32,
    filters: SearchFilters,
    tasks: Vec<Task>,
    total: Option<u64>,
}

impl TaskBoard {
    pub fn dashboard(client: SoliforgeClient, page_size: u32) -> Self {
        Self::new(client, BoardKind::Dashboard, page_size)
    }

    pub fn search(client: SoliforgeClient, page_size: u32) -> Self {
        Self::new(client, BoardKind::Search, page_size)
    }

    fn new(client: SoliforgeClient, kind: BoardKind, page_size: u32) -> Self {
        Self {
            client,
            kind,
            page_size,
            filters: SearchFilters::default(),
            tasks: Vec::new(),
            total: None,
        }
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn query(&self) -> TaskListQuery {
        let query = TaskListQuery::default().page(1).page_size(self.page_size);
        match self.kind {
            BoardKind::Dashboard => query,
            BoardKind::Search => self.filters.apply(query),
        }
    }

    async fn fetch(&mut self) -> soliforge_client::Result<()> {
        let page = self.client.list_tasks(&self.query()).await?;
        debug!(kind = ?self.kind, count = page.items.len(), total = ?page.total, "task list loaded");
        self.total = page.total;
        self.tasks = page.items;
        Ok(())
    }

    /// Initial load; a failure replaces the view
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.fetch()
            .await
            .map_err(|err| ViewError::load(err, LOAD_TASKS_FALLBACK))
    }

    /// User-triggered reload; a failure is an alert and the list is kept
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        self.fetch()
            .await
            .map_err(|err| ViewError::alert("Refresh", err))
    }

    pub async fn apply_filters(&mut self, filters: SearchFilters) -> Result<(), ViewError> {
        self.filters = filters;
        self.fetch()
            .await
            .map_err(|err| ViewError::alert("Search", err))
    }

    /// Clear every filter and query again
    pub async fn reset_filters(&mut self) -> Result<(), ViewError> {
        self.apply_filters(SearchFilters::default()).await
    }

    /// Create a task and return its id; blank names never reach the backend
    pub async fn create(&mut self, name: &str) -> Result<String, ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::rejected("Create", "Task name is required"));
        }
        let created = self
            .client
            .create_task(name)
            .await
            .map_err(|err| ViewError::alert("Create", err))?;
        Ok(created.id)
    }

    /// Delete on the backend, then drop the row; a failure leaves the list as is
    pub async fn delete(&mut self, task_id: &str) -> Result<(), ViewError> {
        self.client
            .delete_task(task_id)
            .await
            .map_err(|err| ViewError::alert("Delete", err))?;

        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        if self.tasks.len() < before {
            if let Some(total) = self.total.as_mut() {
                *total = total.saturating_sub(1);
            }
        }
        info!(task_id, "task removed from board");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_filter() {
        assert_eq!(parse_date_filter("  "), Ok(None));
        assert_eq!(
            parse_date_filter("2026-03-09"),
            Ok(NaiveDate::from_ymd_opt(2026, 3, 9))
        );
        assert!(parse_date_filter("09/03/2026").is_err());
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter("all"), Ok(None));
        assert_eq!(parse_status_filter("FAILED"), Ok(Some(TaskStatus::Failed)));
        assert!(parse_status_filter("paused").is_err());
    }

    #[test]
    fn test_dashboard_ignores_filters_and_search_applies_them() {
        let client = SoliforgeClient::new(soliforge_client::DEFAULT_BASE_URL).unwrap();
        let mut search = TaskBoard::search(client.clone(), 50);
        search.filters = SearchFilters {
            keyword: "vault".to_string(),
            status: Some(TaskStatus::Running),
            ..SearchFilters::default()
        };
        let query = search.query();
        assert_eq!(query.page_size, 50);
        assert_eq!(query.keyword.as_deref(), Some("vault"));
        assert_eq!(query.status, Some(TaskStatus::Running));
        assert!(query.creator_name.is_none());

        let dashboard = TaskBoard::dashboard(client, 20);
        let query = dashboard.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert!(query.keyword.is_none());
    }
}
