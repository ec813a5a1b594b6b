use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use workout_core::*;

mod display;
mod menu;
mod prompt;

#[derive(Parser)]
#[command(name = "wtrack")]
#[command(about = "Home workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu session (default)
    Menu,

    /// Record a new workout
    Add {
        /// Workout date, defaults to today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Workout type number (see `wtrack types`)
        #[arg(long = "type")]
        type_id: i32,

        #[arg(long)]
        sets: i32,

        /// Reps per set
        #[arg(long)]
        reps: i32,

        /// Duration in minutes
        #[arg(long)]
        duration: i32,
    },

    /// Show all workouts
    List,

    /// Show one workout
    Show { id: WorkoutId },

    /// Change fields of a workout; omitted fields are kept
    Update {
        id: WorkoutId,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        duration: Option<i32>,

        #[arg(long)]
        successful_reps: Option<i32>,

        #[arg(long)]
        sets: Option<i32>,

        #[arg(long)]
        reps_per_set: Option<i32>,
    },

    /// Delete a workout
    Delete { id: WorkoutId },

    /// List workout types and their example exercises
    Types,

    /// Export all workouts to a CSV file
    Export { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    workout_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let catalog = Catalog::builtin();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid catalog".into()));
    }

    if let Some(Commands::Types) = cli.command {
        return cmd_types(catalog);
    }

    let mut store = WorkoutStore::open(config.workout_file(), config.id_generator())?;
    if store.skipped_on_load() > 0 {
        eprintln!(
            "Warning: skipped {} malformed record(s) in {}; the file will be copied to {} before the next change",
            store.skipped_on_load(),
            config.workout_path().display(),
            config.workout_file().backup_path().display()
        );
    }

    let stdout = io::stdout();
    match cli.command {
        None | Some(Commands::Menu) => {
            let mut prompter = prompt::Prompter::new(io::stdin().lock(), stdout.lock());
            menu::run(&mut store, catalog, &mut prompter)
        }
        Some(Commands::Add {
            date,
            type_id,
            sets,
            reps,
            duration,
        }) => {
            let created = store.create(
                catalog,
                NewWorkout {
                    date: date.unwrap_or_else(today),
                    type_id,
                    sets,
                    reps_per_set: reps,
                    duration,
                },
            )?;
            println!("Workout added with ID: {}", created.id);
            Ok(())
        }
        Some(Commands::List) => {
            display::all_workouts(&mut stdout.lock(), store.list())?;
            Ok(())
        }
        Some(Commands::Show { id }) => {
            let workout = store.search(id)?;
            display::found(&mut stdout.lock(), workout)?;
            Ok(())
        }
        Some(Commands::Update {
            id,
            date,
            duration,
            successful_reps,
            sets,
            reps_per_set,
        }) => {
            let update = WorkoutUpdate {
                date,
                duration,
                successful_reps,
                sets,
                reps_per_set,
            };
            if update.is_empty() {
                tracing::info!("No fields given, rewriting workout {} unchanged", id);
            }
            let updated = store.update(id, update)?;
            println!("Updated: {}", updated);
            Ok(())
        }
        Some(Commands::Delete { id }) => {
            store.delete(id)?;
            println!("Workout with ID {} has been deleted.", id);
            Ok(())
        }
        Some(Commands::Export { path }) => {
            let count = export_csv(store.list(), &path)?;
            println!("✓ Exported {} workouts to {}", count, path.display());
            Ok(())
        }
        Some(Commands::Types) => cmd_types(catalog),
    }
}

fn cmd_types(catalog: &Catalog) -> Result<()> {
    let mut out = io::stdout().lock();
    display::workout_types(&mut out, catalog)?;
    for workout_type in catalog.iter() {
        writeln!(
            out,
            "  {}: {}",
            workout_type.name,
            workout_type.exercises.join(", ")
        )?;
    }
    Ok(())
}

/// Local date as `YYYY-MM-DD`
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
