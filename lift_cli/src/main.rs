use clap::{Parser, Subcommand};
use lift_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Progressive overload strength tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available workout programs
    Programs,

    /// Run a workout session
    Start {
        /// Program key (upper1, lower1, upper2, lower2)
        program: String,

        /// Record every set at this rep count without prompting (for testing)
        #[arg(long)]
        auto_reps: Option<u32>,
    },

    /// Show week, per-program counts and the recommended next workout
    Stats,

    /// List past sessions, newest first
    History {
        /// Maximum number of sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show or set baseline starting weights
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },

    /// Export all history to CSV
    Export {
        /// Output path (defaults to <data-dir>/history.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum BaselineAction {
    /// Show the current baseline weights
    Show,
    /// Set the baseline weight for one exercise
    Set { exercise: String, weight: f64 },
}

fn main() -> Result<()> {
    lift_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Programs => cmd_programs(),
        Commands::Start { program, auto_reps } => {
            cmd_start(data_dir, &program, auto_reps, &config)
        }
        Commands::Stats => cmd_stats(data_dir, &config),
        Commands::History { limit } => cmd_history(data_dir, limit),
        Commands::Baseline { action } => cmd_baseline(data_dir, action),
        Commands::Export { out } => cmd_export(data_dir, out),
    }
}

fn history_store(data_dir: &std::path::Path) -> JsonlHistoryStore {
    JsonlHistoryStore::new(data_dir.join("history.jsonl"))
}

fn baseline_store(data_dir: &std::path::Path) -> JsonBaselineStore {
    JsonBaselineStore::new(data_dir.join("baselines.json"))
}

fn cmd_programs() -> Result<()> {
    let catalog = get_default_catalog();
    for program in catalog.list() {
        println!("{}  {} ({})", program.key, program.name, program.description);
        for exercise in &program.exercises {
            println!(
                "    {:<12} {}×{}-{} rest {}s",
                exercise.id,
                exercise.sets,
                exercise.target_min(),
                exercise.target_max(),
                exercise.rest_seconds
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_start(
    data_dir: PathBuf,
    program_key: &str,
    auto_reps: Option<u32>,
    config: &Config,
) -> Result<()> {
    std::fs::create_dir_all(&data_dir)?;

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let mut history = history_store(&data_dir);
    let baselines = baseline_store(&data_dir).get()?;
    let policy = config.progression.policy_for(program_key).clone();
    let quantum = policy.quantum;

    let mut session = WorkoutSession::start(
        catalog,
        program_key,
        policy,
        &history,
        &baselines,
        Box::new(SystemTimer::new()),
        Box::new(NoopWakeLock),
    )?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}: {}", session.program().name, session.program().description);
    println!("╰─────────────────────────────────────────╯");

    while session.status() == SessionStatus::InProgress {
        let exercise = session.current_exercise().clone();
        let state = session.current_exercise_state();

        println!();
        println!(
            "▶ {} - set {} of {}",
            exercise.name,
            session.set_index() + 1,
            exercise.sets
        );
        println!(
            "  {} lbs · target {}-{} reps",
            session.current_target_weight(),
            exercise.target_min(),
            exercise.target_max()
        );
        print_progression_note(state);

        let action = match auto_reps {
            Some(reps) => SetAction::Reps(reps),
            None => prompt_set_action(quantum)?,
        };

        match action {
            SetAction::Reps(reps) => {
                let outcome = session.record_set(reps)?;
                print_adjustment(&outcome);
                if outcome.advance == Advance::NextSet {
                    if let Some(rest) = session.rest_remaining() {
                        println!("  Rest {}s before the next set.", rest);
                    }
                }
            }
            SetAction::Back => {
                if session.go_back() {
                    println!("  Went back one set.");
                } else {
                    println!("  Already at the first set.");
                }
            }
            SetAction::Adjust(delta) => {
                let weight = session.adjust_weight(delta)?;
                println!("  Weight adjusted to {} lbs.", weight);
            }
            SetAction::SaveAndQuit => {
                session.end(true, &mut history)?;
                println!("\n✓ Partial session saved.");
                return Ok(());
            }
            SetAction::Quit => {
                session.end(false, &mut history)?;
                println!("\nSession discarded.");
                return Ok(());
            }
        }
    }

    print_summary(&session);
    let entry = session.complete(&mut history)?;
    println!("\n✓ Session logged! ({} sets)", entry.total_sets());
    Ok(())
}

fn print_progression_note(state: &ExerciseSessionState) {
    match state.progression {
        ProgressionDirection::Increased => {
            if let Some(last) = state.last_weight {
                println!("  ↑ increased from last session ({} lbs)", last);
            }
        }
        ProgressionDirection::Decreased => {
            if let Some(last) = state.last_weight {
                println!("  ↓ decreased from last session ({} lbs)", last);
            }
        }
        ProgressionDirection::Maintained => println!("  → same weight as last session"),
        ProgressionDirection::New => {}
    }
}

fn print_adjustment(outcome: &SetOutcome) {
    match outcome.adjustment.direction {
        ProgressionDirection::Increased if outcome.adjustment.doubled => {
            println!(
                "  🔥 Double increase +{} lbs (weight too light)",
                outcome.adjustment.delta
            );
        }
        ProgressionDirection::Increased => {
            println!("  ↑ +{} lbs for the next set", outcome.adjustment.delta);
        }
        ProgressionDirection::Decreased => {
            println!("  ↓ -{} lbs for the next set", outcome.adjustment.delta);
        }
        _ => {}
    }
}

fn print_summary(session: &WorkoutSession) {
    println!("\n─────────────────────────────────────────");
    println!("Workout complete: {}", session.program().name);
    for exercise in &session.program().exercises {
        if let Some(state) = session.exercise_state(&exercise.id) {
            let total_reps: u32 = state.sets.iter().map(|s| s.reps).sum();
            println!(
                "  {:<24} {} sets · {} reps",
                exercise.name,
                state.sets.len(),
                total_reps
            );
        }
    }
}

enum SetAction {
    Reps(u32),
    Back,
    Adjust(f64),
    SaveAndQuit,
    Quit,
}

fn prompt_set_action(quantum: f64) -> Result<SetAction> {
    loop {
        println!("  reps done? (or '+'/'-' weight, 'b' back, 's' save+quit, 'q' quit)");
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // stdin closed; treat as quit-without-saving
            return Ok(SetAction::Quit);
        }

        match input.trim() {
            "b" => return Ok(SetAction::Back),
            "+" => return Ok(SetAction::Adjust(quantum)),
            "-" => return Ok(SetAction::Adjust(-quantum)),
            "s" => return Ok(SetAction::SaveAndQuit),
            "q" => return Ok(SetAction::Quit),
            other => {
                if let Ok(reps) = other.parse::<u32>() {
                    return Ok(SetAction::Reps(reps));
                }
                println!("  Didn't understand '{}'.", other);
            }
        }
    }
}

fn cmd_stats(data_dir: PathBuf, config: &Config) -> Result<()> {
    let history = history_store(&data_dir);
    let catalog = get_default_catalog();
    let stats = workout_stats(&history, catalog, config.program.cycle_length)?;

    println!(
        "Week {} · {} of {} workouts this week · {} total",
        stats.week, stats.workouts_this_week, config.program.cycle_length, stats.total_workouts
    );
    for (key, count) in &stats.counts {
        let marker = if Some(key.as_str()) == stats.next_program.as_deref() {
            "⭐"
        } else {
            "  "
        };
        println!("{} {:<8} {}", marker, key, count);
    }
    if let Some(next) = &stats.next_program {
        println!("Recommended next: {}", next);
    }
    Ok(())
}

fn cmd_history(data_dir: PathBuf, limit: usize) -> Result<()> {
    let history = history_store(&data_dir);
    let entries = history.query_all()?;

    if entries.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for entry in entries.iter().take(limit) {
        println!(
            "{}  {:<8} {} sets",
            entry.completed_at.format("%Y-%m-%d %H:%M"),
            entry.program_key,
            entry.total_sets()
        );
    }
    Ok(())
}

fn cmd_baseline(data_dir: PathBuf, action: BaselineAction) -> Result<()> {
    let mut store = baseline_store(&data_dir);

    match action {
        BaselineAction::Show => {
            let weights = store.get()?;
            if weights.is_empty() {
                println!("No baseline weights set.");
                return Ok(());
            }
            let mut ids: Vec<_> = weights.keys().collect();
            ids.sort();
            for id in ids {
                println!("{:<12} {} lbs", id, weights[id]);
            }
        }
        BaselineAction::Set { exercise, weight } => {
            let catalog = get_default_catalog();
            let known = catalog
                .list()
                .iter()
                .flat_map(|p| &p.exercises)
                .any(|e| e.id == exercise);
            if !known {
                return Err(Error::NotFound(format!("exercise '{}'", exercise)));
            }
            if weight < 0.0 {
                return Err(Error::Config("baseline weight must be non-negative".into()));
            }

            let mut weights = store.get()?;
            weights.insert(exercise.clone(), weight);
            store.set(&weights)?;
            println!("✓ Baseline for {} set to {} lbs", exercise, weight);
        }
    }
    Ok(())
}

fn cmd_export(data_dir: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let history = history_store(&data_dir);
    let csv_path = out.unwrap_or_else(|| data_dir.join("history.csv"));

    let rows = export_history(&history, &csv_path)?;
    println!("✓ Exported {} set rows", rows);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}
