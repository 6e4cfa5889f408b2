//! `Taskdeck` — command-line client for a shared task board.
//!
//! Signs in against the board API and runs one board operation per
//! invocation. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Show the board
//! TASKDECK_EMAIL=alice@example.com TASKDECK_PASSWORD=secret \
//!     cargo run --bin taskdeck -- board
//!
//! # Create and move a task
//! cargo run --bin taskdeck -- create --title "Ship v1" \
//!     --description "Cut the release" --due 2026-09-01T12:00
//! cargo run --bin taskdeck -- move t-42 IN_PROGRESS
//! ```

use std::path::Path;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use url::Url;

use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig, Command};
use taskdeck::gateway::http::HttpGateway;
use taskdeck_proto::auth::Credentials;
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Task, TaskDraft};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");
    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr, or to a file when `--log-file` is given.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure
/// all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Signs in and runs the requested board operation.
async fn run(cli: &CliArgs, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = Url::parse(&config.api_url)?;
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()?;
    let mut app = App::new(HttpGateway::with_client(client, base_url));

    let credentials = Credentials {
        email: cli.email.clone(),
        password: cli.password.clone(),
    };
    let identity = if cli.sign_up {
        app.sign_up(&credentials).await?
    } else {
        app.log_in(&credentials).await?
    };
    tracing::info!(user = %identity.email, "signed in");

    match &cli.command {
        Command::Board { assignee, priority } => {
            let mut filter = TaskFilter::new();
            filter.set_assignee(assignee.clone());
            filter.set_priority(*priority);
            if !filter.is_empty() {
                app.set_filter(filter).await?;
            }
            print_board(&app, &config.due_format);
        }
        Command::Users => {
            for user in app.board().users() {
                println!("{}  {}", user.id, user.email);
            }
        }
        Command::Create {
            title,
            description,
            priority,
            assignee,
            due,
        } => {
            let draft = TaskDraft::new(
                title.clone(),
                description.clone(),
                *priority,
                assignee.clone(),
                parse_due(due)?,
            );
            let task = app.create_task(&draft).await?;
            println!("created {}", task.id);
        }
        Command::Move { id, status } => {
            let outcome = app.move_task(id, *status).await?;
            println!("{id}: {outcome:?}");
        }
        Command::Show { id } => {
            app.open_task(id).await?;
            if let Some(task) = app.overlay().open_task() {
                print_task(task, &config.due_format);
                for comment in app.overlay().comments() {
                    println!(
                        "  [{}] {}: {}",
                        comment.created_at.format(&config.due_format),
                        comment.author.email,
                        comment.body
                    );
                }
            }
        }
        Command::Comment { id, body } => {
            app.open_task(id).await?;
            let comment = app.add_comment(body).await?;
            println!("commented {}", comment.id);
        }
    }

    Ok(())
}

/// Parses a due instant: RFC 3339, or a bare `YYYY-MM-DDTHH:MM` local
/// form treated as UTC.
fn parse_due(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M").map(|dt| dt.and_utc()))
}

/// Renders the board as one column per status, in column order.
fn print_board<G: taskdeck::gateway::Gateway>(app: &App<G>, due_format: &str) {
    for (status, tasks) in app.board().group_by_status() {
        println!("== {} ({}) ==", status.title(), tasks.len());
        for task in tasks {
            print_task(task, due_format);
        }
    }
}

fn print_task(task: &Task, due_format: &str) {
    let assignee = task
        .assignee
        .as_ref()
        .map_or("unassigned", |user| user.email.as_str());
    let badge = if task.badge.is_empty() {
        String::new()
    } else {
        format!("  [{}]", task.badge)
    };
    println!(
        "{}  {}  {}  {}  due {}{}",
        task.id,
        task.title,
        task.priority,
        assignee,
        task.due_date.format(due_format),
        badge
    );
}
