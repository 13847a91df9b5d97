use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use plainxml::{Config, Document, FileError, Task, TaskList, TaskStore, WriteConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for failures that did not come from the document library
const GENERIC_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(
    name = "plainxml",
    version,
    about = "Check, format and manage plain tag/attribute/text documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a document and report whether it is well formed
    Check(ReadArgs),
    /// Re-write a document in canonical layout
    Fmt {
        #[command(flatten)]
        read: ReadArgs,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Omit the `<?xml ...?>` line
        #[arg(long)]
        no_prolog: bool,
        /// Write everything on one line, without indentation
        #[arg(long)]
        compact: bool,
    },
    /// Manage daily task files
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Debug, Args)]
struct ReadArgs {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Maximum element nesting depth (0 for unlimited)
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<u16>,
}

impl ReadArgs {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config
    }
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// Task list name; stored as `<dir>/<name>.xml`
    name: String,
    /// Directory holding the task files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

#[derive(Debug, Subcommand)]
enum TasksCommand {
    /// Print the tasks of a list
    List(StoreArgs),
    /// Append a task to a list, creating the file if needed
    Add {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        start: String,
        #[arg(long, default_value = "")]
        end: String,
    },
    /// Mark a task as done
    Complete {
        #[command(flatten)]
        store: StoreArgs,
        /// Title of the task to complete
        title: String,
    },
    /// Remove a task from a list
    Remove {
        #[command(flatten)]
        store: StoreArgs,
        /// Title of the task to remove
        title: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(FileError::SUCCESS_CODE),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<plainxml::Error>()
        .map_or(GENERIC_FAILURE, plainxml::Error::exit_code)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check(read) => {
            let document = read_input(&read)?;
            debug!(nodes = document.node_count(), "document is well formed");
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "ok: <{}>", document.root_node().name())
                .context("failed to write stdout")?;
            Ok(())
        }
        Command::Fmt {
            read,
            output,
            no_prolog,
            compact,
        } => {
            let document = read_input(&read)?;
            let config = WriteConfig::new(!no_prolog, !compact);
            write_output(output.as_deref(), &document, config)
        }
        Command::Tasks(command) => run_tasks(command),
    }
}

fn run_tasks(command: TasksCommand) -> Result<()> {
    match command {
        TasksCommand::List(store) => {
            let tasks = plainxml::XmlTaskStore::new(&store.dir).read(&store.name)?;
            let mut stdout = io::stdout().lock();
            for task in &tasks {
                writeln!(stdout, "{}", format_task(task)).context("failed to write stdout")?;
            }
            Ok(())
        }
        TasksCommand::Add {
            store,
            title,
            description,
            start,
            end,
        } => {
            for (flag, value) in [
                ("title", &title),
                ("description", &description),
                ("start", &start),
                ("end", &end),
            ] {
                ensure_plain_text(flag, value)?;
            }
            update_tasks(&store, |list| {
                list.add(Task::new(title, description, start, end));
                Ok(())
            })
        }
        TasksCommand::Complete { store, title } => update_tasks(&store, |list| {
            if !list.complete(&title) {
                bail!("no task titled {title:?} in {}", store.name);
            }
            Ok(())
        }),
        TasksCommand::Remove { store, title } => update_tasks(&store, |list| {
            if list.remove(&title).is_none() {
                bail!("no task titled {title:?} in {}", store.name);
            }
            Ok(())
        }),
    }
}

/// Load a task list (a missing file counts as empty), apply `edit` and save it back.
fn update_tasks(args: &StoreArgs, edit: impl FnOnce(&mut TaskList) -> Result<()>) -> Result<()> {
    let store = plainxml::XmlTaskStore::new(&args.dir);
    let tasks = match store.read(&args.name) {
        Ok(tasks) => tasks,
        Err(err) if err.file_error() == Some(FileError::FailedToOpen) => {
            debug!(path = %store.path_for(&args.name).display(), "starting a new task list");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    let mut list = TaskList::from(tasks);
    edit(&mut list)?;
    store.write(&args.name, list.tasks())?;
    Ok(())
}

/// Task files are written without escaping; reject text that would break them.
fn ensure_plain_text(flag: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| matches!(c, '<' | '>' | '"')) {
        bail!("--{flag} cannot contain {c:?}");
    }
    Ok(())
}

fn format_task(task: &Task) -> String {
    let mark = if task.is_done { 'x' } else { ' ' };
    let mut line = format!("[{mark}] {}", task.title);
    if !task.start_time.is_empty() || !task.end_time.is_empty() {
        line.push_str(&format!(" ({}-{})", task.start_time, task.end_time));
    }
    if !task.description.is_empty() {
        line.push_str(&format!(": {}", task.description));
    }
    line
}

fn read_input(args: &ReadArgs) -> Result<Document> {
    let config = args.config();
    let document = match &args.input {
        Some(path) => plainxml::read_document_with_config(path, config)?,
        None => {
            let document =
                plainxml::read_document_from_stream_with_config(&mut io::stdin().lock(), config)?;
            if document.root_node().name().is_empty() {
                return Err(plainxml::Error::file(
                    FileError::FileEmpty,
                    "no input provided on stdin",
                )
                .into());
            }
            document
        }
    };
    Ok(document)
}

fn write_output(path: Option<&Path>, document: &Document, config: WriteConfig) -> Result<()> {
    match path {
        Some(path) => Ok(plainxml::write_document(path, document, config)?),
        None => {
            let mut stdout = io::stdout().lock();
            plainxml::write_document_to_stream(&mut stdout, document, config)?;
            Ok(())
        }
    }
}
