use clap::Parser;
use clap::error::ErrorKind;
use std::io;
use std::path::PathBuf;
use tasker_cli::cli::{Cli, Command, collect_overrides};
use tasker_cli::console::ConsolePrompt;
use tasker_cli::render;
use tasker_core::config::{self, Config};
use tasker_core::error::AppError;
use tasker_core::model::{Task, TaskStatus};
use tasker_core::prompt::{INVALID_DUE_DATE, NO_SEARCH_RESULTS, NO_TASKS, NO_TASKS_WITH_STATUS};
use tasker_core::query;
use tasker_core::stats;
use tasker_core::storage::json_store;
use tasker_core::task_api::{self, TaskStore, ViewCandidates};
use tasker_core::workflow::{self, NewTaskInput};
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKER_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = &loaded.error {
        tracing::debug!(target: "tasks", "configuration not loaded: {err}");
    }
    let overrides = collect_overrides(&cli.config_override)?;
    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn resolve_store_path(cli: &Cli, config: &Config) -> Result<PathBuf, AppError> {
    match &cli.store {
        Some(path) => Ok(path.clone()),
        None => json_store::store_path(config.store_name()),
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

fn print_tasks(
    tasks: &[Task],
    json: bool,
    offset: UtcOffset,
    empty_message: &str,
) -> Result<(), AppError> {
    if json {
        print_json(&render::tasks_json(tasks)?);
    } else if tasks.is_empty() {
        println!("{empty_message}");
    } else {
        println!("{}", render::tasks_table(tasks, offset));
    }
    Ok(())
}

fn add_command(
    store: &mut TaskStore,
    input: NewTaskInput,
    json: bool,
    offset: UtcOffset,
) -> Result<(), AppError> {
    let created = workflow::build_new_task(&input, offset)?;
    if created.due_date_rejected {
        eprintln!("{INVALID_DUE_DATE}");
    }

    let task = created.task;
    store.add(task.clone());
    if !store.save() {
        return Err(AppError::io(format!(
            "could not save tasks to {}",
            store.path().display()
        )));
    }

    if json {
        print_json(&render::task_json(&task)?);
    } else {
        println!("Added task: {} ({})", task.name(), task.id());
    }
    Ok(())
}

fn list_command(
    store: &TaskStore,
    status: Option<TaskStatus>,
    json: bool,
    offset: UtcOffset,
) -> Result<(), AppError> {
    match task_api::view_candidates(store.tasks(), status) {
        ViewCandidates::Found(tasks) => print_tasks(&tasks, json, offset, NO_TASKS),
        ViewCandidates::NoTasks => print_tasks(&[], json, offset, NO_TASKS),
        ViewCandidates::NoResults => print_tasks(&[], json, offset, NO_TASKS_WITH_STATUS),
    }
}

fn search_command(
    store: &TaskStore,
    text: &str,
    json: bool,
    offset: UtcOffset,
) -> Result<(), AppError> {
    if text.is_empty() {
        return Err(AppError::invalid_input("search text is required"));
    }

    let found = query::matching_name(&store.active_tasks(), text)
        .into_option()
        .unwrap_or_default();
    print_tasks(&found, json, offset, NO_SEARCH_RESULTS)
}

fn stats_command(store: &TaskStore, json: bool) -> Result<(), AppError> {
    let summary = stats::summarize(store.tasks());
    if json {
        print_json(&render::statistics_json(&summary)?);
    } else if summary.is_empty() {
        println!("{NO_TASKS}");
    } else {
        println!("{}", render::statistics_table(&summary));
    }
    Ok(())
}

fn run_command(
    command: Command,
    store: &mut TaskStore,
    json: bool,
    offset: UtcOffset,
) -> Result<(), AppError> {
    match command {
        Command::Add {
            title,
            description,
            difficulty,
            status,
            due,
        } => {
            let input = NewTaskInput {
                title,
                description: description.unwrap_or_default(),
                difficulty: difficulty.map(|code| code.to_string()).unwrap_or_default(),
                status: status.map(|code| code.to_string()).unwrap_or_default(),
                due_date: due.unwrap_or_default(),
            };
            add_command(store, input, json, offset)
        }
        Command::List { status } => {
            list_command(store, status.map(TaskStatus::from), json, offset)
        }
        Command::Search { text } => search_command(store, &text, json, offset),
        Command::Stats => stats_command(store, json),
    }
}

fn run_interactive(store: &mut TaskStore, config: &Config) -> Result<(), AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompt = ConsolePrompt::new(stdin.lock(), stdout.lock(), config.offset());
    task_api::run_session(store, &mut prompt)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli)?;
    let path = resolve_store_path(&cli, &config)?;
    let mut store = TaskStore::open(path);

    match cli.command {
        Some(command) => run_command(command, &mut store, cli.json, config.offset()),
        None => run_interactive(&mut store, &config),
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
