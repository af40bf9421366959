//! `tasklist`: command-line front end for the tasklist client.
//!
//! Each invocation loads the stored base URL (prompting for one on first
//! run), fetches the list, applies one command through the store, and prints
//! the resulting notifications and list.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tasklist::{
    FileConfigStore, TodoAction, TodoEnvironment, TodoReducer, TodoState, resolve_config_path,
    view,
};
use tasklist_core::NaiveDate;
use tasklist_core::config::ConfigStore;
use tasklist_core::environment::{Clock, SystemClock};
use tasklist_core::todo::{DUE_DATE_FORMAT, Filter, TodoDraft, TodoId};
use tasklist_rest::HttpTodoApi;
use tasklist_runtime::Store;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// How long pending effects may take to settle on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "tasklist", version)]
#[command(about = "Manage todos stored on a remote tasklist API")]
struct Cli {
    /// Config file holding the base URL
    #[arg(long, global = true, env = "TASKLIST_CONFIG")]
    config: Option<PathBuf>,
    /// HTTP request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "TASKLIST_TIMEOUT_SECS")]
    timeout: Option<u64>,
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or change the backend base URL
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// List todos
    List {
        /// all, active or completed
        #[arg(long, short, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Add a todo
    Add {
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD (today when omitted)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Edit a todo; unspecified fields keep their current value
    Edit {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Flip a todo between active and completed
    Toggle { id: TodoId },
    /// Delete a todo
    Rm { id: TodoId },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Save a new base URL and fetch its list
    Set { url: String },
    /// Print the stored base URL
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr so they never mix with the rendered list
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let path = resolve_config_path(
        cli.config,
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    );
    tracing::debug!(path = %path.display(), "using config file");
    let config = Arc::new(FileConfigStore::new(path));

    let api = match cli.timeout {
        Some(secs) => HttpTodoApi::with_timeout(Duration::from_secs(secs))?,
        None => HttpTodoApi::new(),
    };
    let clock = Arc::new(SystemClock);
    let env = TodoEnvironment::new(Arc::new(api), config.clone(), clock.clone());
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);

    match cli.command {
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            let stored = config
                .load()
                .with_context(|| format!("reading {}", config.path().display()))?;
            match stored {
                Some(url) => println!("{url}"),
                None => println!("(not configured)"),
            }
            return Ok(ExitCode::SUCCESS);
        },
        Command::Config {
            command: ConfigCommand::Set { url },
        } => {
            dispatch(&store, TodoAction::SaveBaseUrl { input: url }).await?;
        },
        command => {
            dispatch(&store, TodoAction::Start).await?;
            ensure_configured(&store).await?;
            let action = command_action(&store, command).await?;
            dispatch(&store, action).await?;
        },
    }

    let state = store.state(Clone::clone).await;
    print!("{}", view::render(&state, clock.now()));
    store.shutdown(SHUTDOWN_TIMEOUT).await?;

    Ok(if state.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Send an action and wait for everything it causes to settle
async fn dispatch(store: &TodoStore, action: TodoAction) -> Result<()> {
    let mut handle = store.send(action).await?;
    handle.wait().await;
    Ok(())
}

/// First-run prompt: keep asking until a usable base URL is saved
async fn ensure_configured(store: &TodoStore) -> Result<()> {
    let mut lines = std::io::stdin().lock().lines();

    while !store.state(TodoState::is_configured).await {
        let errors: Vec<_> = store
            .state(|s| s.notifications.iter().filter(|n| n.is_error()).cloned().collect())
            .await;
        for notification in &errors {
            eprintln!("{}", view::render_notification(notification));
        }
        dispatch(store, TodoAction::DismissNotifications).await?;

        print!("Base URL of the todo API (e.g. http://localhost:3000): ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            bail!("no base URL configured; run `tasklist config set <URL>`");
        };
        dispatch(store, TodoAction::SaveBaseUrl { input: line? }).await?;
    }
    Ok(())
}

/// Translate a command into the action the store should run
async fn command_action(store: &TodoStore, command: Command) -> Result<TodoAction> {
    let action = match command {
        Command::Config { .. } => bail!("configuration commands are handled separately"),
        Command::List { filter } => TodoAction::SetFilter { filter },
        Command::Add {
            title,
            description,
            due,
        } => TodoAction::CreateTodo {
            draft: TodoDraft {
                title,
                description,
                due_date: due,
            },
        },
        Command::Edit {
            id,
            title,
            description,
            due,
        } => {
            let Some(mut todo) = store.state(|s| s.find(id).cloned()).await else {
                bail!("todo #{id} is not in the fetched list");
            };
            if let Some(title) = title {
                todo.title = title;
            }
            if let Some(description) = description {
                todo.description = description;
            }
            if let Some(due) = due {
                todo.due_date = due.format(DUE_DATE_FORMAT).to_string();
            }
            TodoAction::UpdateTodo { todo }
        },
        Command::Toggle { id } => TodoAction::ToggleComplete { id },
        Command::Rm { id } => TodoAction::DeleteTodo { id },
    };
    Ok(action)
}
