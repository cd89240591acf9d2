/*
[INPUT]:  Subcommand, console config, session store, shutdown token
[OUTPUT]: Account and task operations printed to stdout
[POS]:    CLI command implementations
[UPDATE]: 2026-09-06 Route session expiry through one handler
*/

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use console::style;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};
use soliforge_client::{
    AuthContext, LogEntry, RegisterRequest, SessionToken, SoliforgeClient, SoliforgeError, Task,
    TaskListQuery,
};
use soliforge_console::alert::LOAD_TASK_FALLBACK;
use soliforge_console::board::{SearchFilters, parse_date_filter, parse_status_filter};
use soliforge_console::execution::{ExecSignal, ExecutionView};
use soliforge_console::matrix::{self, MatrixSummary, case_description};
use soliforge_console::{ConsoleConfig, SessionStore, StoredSession, TaskBoard, ViewError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Command, ListArgs, TaskCommand};

const SHOW_LOG_LINES: usize = 20;

/// Build a client from `--token`, or from the stored session for this API.
///
/// Returns the client and the username remembered with the session.
pub(crate) async fn connect(
    config: &ConsoleConfig,
    store: &SessionStore,
    token: Option<&str>,
) -> Result<(SoliforgeClient, Option<String>)> {
    let auth = AuthContext::new();
    let mut username = None;
    match token {
        Some(token) => {
            debug!("using token from command line");
            auth.set_token(SessionToken::bearer(token));
        }
        None => {
            if let Some(restored) = store.restore(&config.api.base_url, Utc::now()).await? {
                username = store.load().await?.and_then(|session| session.username);
                info!(user = ?username, "restored stored session");
                auth.set_token(restored);
            }
        }
    }
    let client =
        SoliforgeClient::with_config(config.api.client_config(), &config.api.base_url, auth)
            .context("create api client")?;
    Ok((client, username))
}

/// Whether a command failed because the server rejected the session
pub(crate) fn is_session_expired(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ViewError>()
        .is_some_and(ViewError::is_unauthenticated)
        || err
            .downcast_ref::<SoliforgeError>()
            .is_some_and(SoliforgeError::is_auth_error)
}

pub(crate) async fn run(
    command: Command,
    config: &ConsoleConfig,
    store: &SessionStore,
    client: SoliforgeClient,
    shutdown: CancellationToken,
) -> Result<()> {
    let result = dispatch(command, config, store, client, shutdown).await;
    match result {
        Err(err) if is_session_expired(&err) => {
            if let Err(clear_err) = store.clear().await {
                warn!(error = %clear_err, "failed to clear stored session");
            }
            eprintln!("{}", style("session expired").red().bold());
            Err(err.context("session expired; sign in again with `soliforge login`"))
        }
        other => other,
    }
}

async fn dispatch(
    command: Command,
    config: &ConsoleConfig,
    store: &SessionStore,
    client: SoliforgeClient,
    shutdown: CancellationToken,
) -> Result<()> {
    match command {
        Command::Tui => bail!("the terminal UI is started by the binary, not the CLI runner"),
        Command::Login { username, password } => {
            login(config, store, &client, username, password).await
        }
        Command::Register {
            email,
            username,
            password,
        } => register(&client, email, username, password).await,
        Command::Logout => logout(store, &client).await,
        Command::Whoami => {
            require_session(&client)?;
            whoami(&client).await
        }
        Command::Tasks(command) => {
            require_session(&client)?;
            run_task_command(command, config, client, shutdown).await
        }
    }
}

fn require_session(client: &SoliforgeClient) -> Result<()> {
    if client.auth().is_authenticated() {
        Ok(())
    } else {
        bail!("not signed in; run `soliforge login` first")
    }
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::with_theme(theme)
            .with_prompt(prompt)
            .interact_text()?),
    }
}

fn prompt_password(theme: &ColorfulTheme, value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut password = Password::with_theme(theme);
    password = password.with_prompt("Password");
    if confirm {
        password = password.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(password.interact()?)
}

async fn login(
    config: &ConsoleConfig,
    store: &SessionStore,
    client: &SoliforgeClient,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let username = prompt_text(&theme, "Email", username)?;
    let password = prompt_password(&theme, password, false)?;
    if username.trim().is_empty() || password.is_empty() {
        bail!("email and password are required");
    }

    client
        .login(username.trim(), &password)
        .await
        .map_err(|err| anyhow!("sign in failed: {}", err.detail()))?;
    let token = client
        .auth()
        .token()
        .context("server returned no access token")?;
    let session = StoredSession::new(&config.api.base_url, Some(username.trim()), &token);
    store.save(&session).await?;

    println!(
        "{} {}",
        style("Signed in as").green(),
        style(username.trim()).bold()
    );
    if let Some(expires_at) = token.expires_at {
        println!("{}", style(format!("Session valid until {expires_at}")).dim());
    }
    Ok(())
}

async fn register(
    client: &SoliforgeClient,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let email = prompt_text(&theme, "Email", email)?;
    let username = match username {
        Some(username) => username,
        None => Input::with_theme(&theme)
            .with_prompt("Username (blank for the e-mail name)")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = prompt_password(&theme, password, true)?;
    if email.trim().is_empty() || password.is_empty() {
        bail!("email and password are required");
    }

    let request = RegisterRequest::new(email.trim(), password, Some(username.as_str()));
    let profile = client
        .register(&request)
        .await
        .map_err(|err| anyhow!("registration failed: {}", err.detail()))?;
    println!(
        "{} {} {}",
        style("Registered").green(),
        style(&profile.username).bold(),
        style("- sign in with `soliforge login`").dim()
    );
    Ok(())
}

async fn logout(store: &SessionStore, client: &SoliforgeClient) -> Result<()> {
    client.logout();
    store.clear().await?;
    println!("{}", style("Signed out").green());
    Ok(())
}

async fn whoami(client: &SoliforgeClient) -> Result<()> {
    let profile = client.me().await?;
    println!("{} {}", style("User:").bold(), profile.username);
    println!("{} {}", style("ID:").bold(), profile.id);
    if let Some(email) = profile.email.as_deref() {
        println!("{} {email}", style("Email:").bold());
    }
    if profile.is_active == Some(false) {
        println!("{}", style("Account is inactive").yellow());
    }
    Ok(())
}

async fn run_task_command(
    command: TaskCommand,
    config: &ConsoleConfig,
    client: SoliforgeClient,
    shutdown: CancellationToken,
) -> Result<()> {
    match command {
        TaskCommand::List(args) => list_tasks(config, &client, args).await,
        TaskCommand::Show { id } => show_task(&client, &id).await,
        TaskCommand::Create { name } => {
            let mut board = TaskBoard::dashboard(client, config.board.page_size);
            let id = board.create(&name).await?;
            println!("{} {}", style("Created task").green(), style(&id).bold());
            Ok(())
        }
        TaskCommand::Delete { id, yes } => {
            if !yes {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Delete task {id}?"))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("{}", style("Cancelled").yellow());
                    return Ok(());
                }
            }
            let mut board = TaskBoard::dashboard(client, config.board.page_size);
            board.delete(&id).await?;
            println!("{} {}", style("Deleted task").green(), style(&id).bold());
            Ok(())
        }
        TaskCommand::Upload { id, file } => {
            let mut view = load_view(client, config, &id).await?;
            let result = view.upload(&file).await;
            view.unmount();
            result?;
            println!(
                "{} {} {}",
                style("Uploaded").green(),
                file.display(),
                status_suffix(&view)
            );
            Ok(())
        }
        TaskCommand::Start { id } => {
            let mut view = load_view(client, config, &id).await?;
            let label = view.start_label();
            let result = view.start().await;
            view.unmount();
            result?;
            println!("{} {}", style(format!("{label}ed")).green(), status_suffix(&view));
            Ok(())
        }
        TaskCommand::Stop { id } => {
            let mut view = load_view(client, config, &id).await?;
            let result = view.stop().await;
            view.unmount();
            result?;
            println!("{} {}", style("Stopped").green(), status_suffix(&view));
            Ok(())
        }
        TaskCommand::Watch { id } => {
            let mut view = load_view(client, config, &id).await?;
            let result = watch_task(&mut view, shutdown).await;
            view.unmount();
            result
        }
    }
}

fn filters_from_args(args: &ListArgs) -> Result<SearchFilters> {
    let parse = |value: &Option<String>| value.clone().unwrap_or_default();
    let status = parse_status_filter(&parse(&args.status)).map_err(|err| anyhow!(err))?;
    let start_date = parse_date_filter(&parse(&args.from)).map_err(|err| anyhow!(err))?;
    let end_date = parse_date_filter(&parse(&args.to)).map_err(|err| anyhow!(err))?;
    if let (Some(from), Some(to)) = (start_date, end_date) {
        if from > to {
            bail!("--from {from} is after --to {to}");
        }
    }
    Ok(SearchFilters {
        keyword: parse(&args.keyword),
        creator_name: parse(&args.creator),
        status,
        start_date,
        end_date,
        owner_id: parse(&args.owner),
    })
}

async fn list_tasks(config: &ConsoleConfig, client: &SoliforgeClient, args: ListArgs) -> Result<()> {
    let filters = filters_from_args(&args)?;
    let query = filters.apply(
        TaskListQuery::default()
            .page(args.page)
            .page_size(args.page_size.unwrap_or(config.board.page_size)),
    );
    let page = client
        .list_tasks(&query)
        .await
        .map_err(|err| ViewError::load(err, "Failed to load tasks."))?;

    if page.items.is_empty() {
        println!("{}", style("No tasks found.").yellow());
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{:<10} {:<24} {:<10} {:<20} {:<12} {:>8}",
            "ID", "NAME", "STATUS", "CONTRACT", "CREATOR", "ELAPSED"
        ))
        .bold()
    );
    let now = Utc::now();
    for task in &page.items {
        println!(
            "{:<10} {:<24} {:<10} {:<20} {:<12} {:>8}",
            task.short_id(),
            truncate(&task.name, 24),
            task.status.as_str(),
            truncate(task.contract_name.as_deref().unwrap_or("-"), 20),
            truncate(task.creator_label(), 12),
            soliforge_console::elapsed::format_clock(soliforge_console::elapsed::for_task(
                task, now
            )),
        );
    }
    let total = page
        .total
        .map(|total| format!(" of {total}"))
        .unwrap_or_default();
    println!(
        "{}",
        style(format!("page {} - {} task(s){total}", query.page, page.items.len())).dim()
    );
    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out = value.chars().take(width.saturating_sub(1)).collect::<String>();
    out.push('~');
    out
}

async fn show_task(client: &SoliforgeClient, id: &str) -> Result<()> {
    let task = client
        .task_detail(id)
        .await
        .map_err(|err| ViewError::load(err, LOAD_TASK_FALLBACK))?;
    let logs = match client.task_logs(id).await {
        Ok(logs) => logs,
        Err(err) if err.is_auth_error() => return Err(err.into()),
        Err(err) => {
            warn!(task_id = id, error = %err, "log fetch failed");
            Vec::new()
        }
    };
    print_task(&task);
    print_logs(&logs[logs.len().saturating_sub(SHOW_LOG_LINES)..]);
    Ok(())
}

fn print_task(task: &Task) {
    let now = Utc::now();
    println!("{} {}", style(&task.name).bold().cyan(), style(&task.id).dim());
    println!("  status:   {}", task.status);
    if let Some(contract) = task.contract_name.as_deref() {
        println!("  contract: {contract}");
    }
    if let Some(creator) = task.creator_name.as_deref() {
        println!("  creator:  {creator}");
    }
    println!(
        "  elapsed:  {}",
        soliforge_console::elapsed::format_clock(soliforge_console::elapsed::for_task(task, now))
    );

    let summary = MatrixSummary::for_task(task);
    if summary.total > 0 {
        println!(
            "  matrix:   {}% pass, {} threat(s), {}",
            summary.pass_rate(),
            summary.threats,
            summary.blocked_label()
        );
        for case in matrix::failing_cases(task) {
            println!(
                "    {} {} ({})",
                style("!").red().bold(),
                case.name,
                case_description(case)
            );
        }
    }
    for finding in matrix::static_findings(task.slither_report.as_deref()) {
        println!("    {} {finding}", style("*").yellow());
    }
}

fn print_logs(logs: &[LogEntry]) {
    for entry in logs {
        println!(
            "{} {:<7} {}",
            style(entry.timestamp.format("%H:%M:%S")).dim(),
            entry.level.as_str(),
            entry.message
        );
    }
}

fn status_suffix(view: &ExecutionView) -> String {
    view.status()
        .map(|status| format!("(status: {status})"))
        .unwrap_or_default()
}

async fn load_view(client: SoliforgeClient, config: &ConsoleConfig, id: &str) -> Result<ExecutionView> {
    let mut view = ExecutionView::new(client, id, &config.poll);
    view.load().await?;
    Ok(view)
}

/// Print new log lines and status changes until polling stops or Ctrl-C
async fn watch_task(view: &mut ExecutionView, shutdown: CancellationToken) -> Result<()> {
    let mut printed = 0;
    let mut last_status = None;
    report_progress(view, &mut printed, &mut last_status);

    loop {
        if !view.poller_state().is_some_and(|state| state.is_polling()) {
            println!("{}", style("Task is not running; watch finished").dim());
            return Ok(());
        }
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("watch interrupted");
                return Ok(());
            }
            signal = view.next_signal() => {
                let closed = matches!(signal, ExecSignal::PollClosed);
                let snapshot = matches!(signal, ExecSignal::Poll(_));
                view.handle_signal(signal)?;
                if snapshot {
                    report_progress(view, &mut printed, &mut last_status);
                }
                if closed {
                    return Ok(());
                }
            }
        }
    }
}

fn report_progress(
    view: &ExecutionView,
    printed: &mut usize,
    last_status: &mut Option<soliforge_client::TaskStatus>,
) {
    let status = view.status();
    if status != *last_status {
        if let Some(status) = status {
            println!(
                "{} {} ({})",
                style("status").bold(),
                style(status).cyan(),
                view.clock()
            );
        }
        *last_status = status;
    }
    let logs = view.logs();
    if logs.len() < *printed {
        *printed = 0;
    }
    print_logs(&logs[*printed..]);
    *printed = logs.len();
}
