/*
[INPUT]:  Task identifiers, list filters, contract files, and the auth context
[OUTPUT]: Task snapshots, log streams, and state-transition acknowledgements
[POS]:    HTTP layer - task endpoints (require bearer auth)
[UPDATE]: When adding new task endpoints or changing query parameters
*/

// ### Task Endpoints

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::http::client::Access;
use crate::http::{Result, SoliforgeClient, SoliforgeError};
use crate::types::{ActionResponse, LogEntry, Task, TaskCreated, TaskListQuery, TaskPage};

impl SoliforgeClient {
    /// List tasks with pagination and optional filters
    ///
    /// GET /tasks/?page={page}&page_size={page_size}&keyword=...&status=...
    pub async fn list_tasks(&self, query: &TaskListQuery) -> Result<TaskPage> {
        let builder = self
            .request(Method::GET, "tasks/", Access::Bearer)?
            .query(query);
        self.send_json(builder, Access::Bearer).await
    }

    /// Create an empty task
    ///
    /// POST /tasks/create?name={name}
    pub async fn create_task(&self, name: &str) -> Result<TaskCreated> {
        let builder = self
            .request(Method::POST, "tasks/create", Access::Bearer)?
            .query(&[("name", name)]);
        let created: TaskCreated = self.send_json(builder, Access::Bearer).await?;
        info!(task_id = %created.id, name, "task created");
        Ok(created)
    }

    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, task_id: &str) -> Result<ActionResponse> {
        let url = self.task_url(task_id, None)?;
        let builder = self.request_url(Method::DELETE, url, Access::Bearer);
        let ack = self.send_action(builder, Access::Bearer).await?;
        info!(task_id, "task deleted");
        Ok(ack)
    }

    /// Upload a contract source file from disk
    ///
    /// POST /tasks/{id}/upload (multipart field `file`)
    pub async fn upload_contract(&self, task_id: &str, path: &Path) -> Result<ActionResponse> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SoliforgeError::Config(format!("not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.upload_source(task_id, &file_name, bytes).await
    }

    /// Upload contract source already held in memory
    pub async fn upload_source(
        &self,
        task_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ActionResponse> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let url = self.task_url(task_id, Some("upload"))?;
        let builder = self
            .request_url(Method::POST, url, Access::Bearer)
            .multipart(form);
        let ack = self.send_action(builder, Access::Bearer).await?;
        info!(task_id, file_name, size, "contract uploaded");
        Ok(ack)
    }

    /// POST /tasks/{id}/start
    pub async fn start_task(&self, task_id: &str) -> Result<ActionResponse> {
        let url = self.task_url(task_id, Some("start"))?;
        let builder = self.request_url(Method::POST, url, Access::Bearer);
        let ack = self.send_action(builder, Access::Bearer).await?;
        info!(task_id, "task start requested");
        Ok(ack)
    }

    /// POST /tasks/{id}/stop
    pub async fn stop_task(&self, task_id: &str) -> Result<ActionResponse> {
        let url = self.task_url(task_id, Some("stop"))?;
        let builder = self.request_url(Method::POST, url, Access::Bearer);
        let ack = self.send_action(builder, Access::Bearer).await?;
        info!(task_id, "task stop requested");
        Ok(ack)
    }

    /// Full task snapshot including source code and matrix cases
    ///
    /// GET /tasks/{id}/detail
    pub async fn task_detail(&self, task_id: &str) -> Result<Task> {
        let url = self.task_url(task_id, Some("detail"))?;
        let builder = self.request_url(Method::GET, url, Access::Bearer);
        self.send_json(builder, Access::Bearer).await
    }

    /// Complete log stream of a task, oldest first
    ///
    /// GET /tasks/{id}/logs
    pub async fn task_logs(&self, task_id: &str) -> Result<Vec<LogEntry>> {
        let url = self.task_url(task_id, Some("logs"))?;
        let builder = self.request_url(Method::GET, url, Access::Bearer);
        self.send_json(builder, Access::Bearer).await
    }
}
