use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "User-state store and workout tooling for Liftlog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new user and print its id
    Signup,

    /// Print the stored blob for a user
    Get {
        user_id: String,
    },

    /// Store a blob for a user (validated before being accepted)
    Put {
        user_id: String,

        /// Raw JSON payload
        #[arg(long, conflicts_with = "payload_file")]
        payload: Option<String>,

        /// Read the payload from a file instead
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },

    /// Delete a user (absent users are a no-op)
    Delete {
        user_id: String,
    },

    /// List stored user ids
    List,

    /// Assemble a workout from a CSV row export and display it
    Workout {
        /// CSV export of join rows for a single workout
        rows: PathBuf,

        /// Print the flattened rows instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// Interactive session against an in-memory store with shutdown flush
    Session,
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let snapshot_path = data_dir.join(&config.data.snapshot_file);

    match cli.command {
        Commands::Signup => cmd_signup(&snapshot_path),
        Commands::Get { user_id } => cmd_get(&snapshot_path, &user_id),
        Commands::Put {
            user_id,
            payload,
            payload_file,
        } => cmd_put(&snapshot_path, &user_id, payload, payload_file),
        Commands::Delete { user_id } => cmd_delete(&snapshot_path, &user_id),
        Commands::List => cmd_list(&snapshot_path),
        Commands::Workout { rows, flat } => cmd_workout(&rows, flat),
        Commands::Session => cmd_session(&snapshot_path),
    }
}

fn cmd_signup(snapshot_path: &std::path::Path) -> Result<()> {
    let store = UserStore::load_or_default(snapshot_path)?;
    let user_id = create_user(&store)?;
    store.save(snapshot_path)?;
    println!("new user created with id: {}", user_id);
    Ok(())
}

fn cmd_get(snapshot_path: &std::path::Path, user_id: &str) -> Result<()> {
    let store = UserStore::load_or_default(snapshot_path)?;
    match store.get(user_id) {
        Some(blob) => {
            println!("{}", blob);
            Ok(())
        }
        None => Err(Error::NotFound(format!("no such user: {}", user_id))),
    }
}

fn cmd_put(
    snapshot_path: &std::path::Path,
    user_id: &str,
    payload: Option<String>,
    payload_file: Option<PathBuf>,
) -> Result<()> {
    let payload = match (payload, payload_file) {
        (Some(p), _) => p,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            return Err(Error::Config(
                "either --payload or --payload-file is required".into(),
            ))
        }
    };

    // Well-formedness is checked here; the store accepts anything
    validate_payload(&payload)?;

    let store = UserStore::load_or_default(snapshot_path)?;
    if !store.exists(user_id) {
        // Unknown ids are an authorization concern for the caller; the
        // offline tool accepts them with a warning.
        tracing::warn!("Storing blob for previously unknown user {}", user_id);
    }
    store.store(user_id, payload);
    store.save(snapshot_path)?;

    println!("Saved data.");
    Ok(())
}

fn cmd_delete(snapshot_path: &std::path::Path, user_id: &str) -> Result<()> {
    let store = UserStore::load_or_default(snapshot_path)?;
    store.delete(user_id);
    store.save(snapshot_path)?;
    println!("Deleted {} (if present).", user_id);
    Ok(())
}

fn cmd_list(snapshot_path: &std::path::Path) -> Result<()> {
    let store = UserStore::load_or_default(snapshot_path)?;
    let snapshot = store.snapshot();

    if snapshot.is_empty() {
        println!("No users stored.");
        return Ok(());
    }

    for (user_id, blob) in &snapshot {
        println!("{}  ({} bytes)", user_id, blob.len());
    }
    println!("{} user(s) total.", snapshot.len());
    Ok(())
}

fn cmd_workout(rows_path: &std::path::Path, flat: bool) -> Result<()> {
    let source = CsvRowSource::open(rows_path)?;
    let workout = assemble_workout(source)?;

    if flat {
        for row in workout.flatten() {
            match row.set {
                Some(set) => println!(
                    "{}\t{}\t{} reps\t{} kg\torder {}",
                    row.exercise_id, row.exercise_name, set.reps, set.weight, set.order
                ),
                None => println!("{}\t{}\t(no sets)", row.exercise_id, row.exercise_name),
            }
        }
        return Ok(());
    }

    display_workout(&workout);
    Ok(())
}

fn cmd_session(snapshot_path: &std::path::Path) -> Result<()> {
    let store = Arc::new(UserStore::load_or_default(snapshot_path)?);

    // Final flush on SIGINT/SIGTERM so acknowledged writes survive
    let _flush = flush_on_signal(Arc::clone(&store), snapshot_path.to_path_buf())?;

    println!("session open ({} users). commands:", store.len());
    println!("  exists <id> | get <id> | put <id> <json> | delete <id> | signup | save | quit");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match run_session_command(&store, snapshot_path, line.trim()) {
            Ok(SessionOutcome::Continue) => {}
            Ok(SessionOutcome::Quit) => break,
            Err(e) => println!("error: {}", e),
        }
        print!("> ");
        io::stdout().flush()?;
    }

    // EOF or quit: one final durable save
    store.save(snapshot_path)?;
    println!("session closed, snapshot saved.");
    Ok(())
}

enum SessionOutcome {
    Continue,
    Quit,
}

fn run_session_command(
    store: &UserStore,
    snapshot_path: &std::path::Path,
    line: &str,
) -> Result<SessionOutcome> {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next().unwrap_or_default();

    match command {
        "" => {}
        "quit" | "exit" => return Ok(SessionOutcome::Quit),
        "save" => {
            store.save(snapshot_path)?;
            println!("saved {} user(s).", store.len());
        }
        "signup" => {
            let user_id = create_user(store)?;
            println!("new user created with id: {}", user_id);
        }
        "exists" => match parts.next() {
            Some(id) => println!("{}", store.exists(id)),
            None => println!("usage: exists <id>"),
        },
        "get" => match parts.next() {
            Some(id) => match store.get(id) {
                Some(blob) => println!("{}", blob),
                None => println!("no such user: {}", id),
            },
            None => println!("usage: get <id>"),
        },
        "put" => match (parts.next(), parts.next()) {
            (Some(id), Some(payload)) => {
                validate_payload(payload)?;
                store.store(id, payload);
                println!("stored.");
            }
            _ => println!("usage: put <id> <json>"),
        },
        "delete" => match parts.next() {
            Some(id) => {
                store.delete(id);
                println!("deleted (if present).");
            }
            None => println!("usage: delete <id>"),
        },
        other => println!("unknown command: {}", other),
    }

    Ok(SessionOutcome::Continue)
}

fn display_workout(workout: &Workout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT {}", workout.id);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", workout.name);
    println!("  User: {}", workout.user_id);
    println!(
        "  {} → {}",
        workout.started_at.format("%Y-%m-%d %H:%M"),
        workout.ended_at.format("%H:%M")
    );
    println!();

    for exercise in &workout.exercises {
        println!("  {} (#{})", exercise.name, exercise.id);
        if !exercise.notes.is_empty() {
            println!("    notes: {}", exercise.notes);
        }
        if exercise.sets.is_empty() {
            println!("    (no sets recorded)");
        }
        for set in &exercise.sets {
            println!(
                "    → {} reps @ {}  [{}s work / {}s rest]",
                set.reps,
                set.weight,
                set.duration_ms / 1000,
                set.rest_ms / 1000
            );
        }
        println!();
    }
}
