use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use gym_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod store;

use store::FileStore;

#[derive(Parser)]
#[command(name = "gymtrack")]
#[command(about = "Strength training workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout session (default category comes from the suggestion engine)
    Start {
        /// Target category (push, pull, legs, jjb, mobility)
        #[arg(long)]
        category: Option<String>,

        /// Auto-complete (for testing) - complete every seeded set with its last values
        #[arg(long)]
        auto: bool,
    },

    /// Show the suggested next session
    Suggest,

    /// Show weekly statistics and current streak
    Stats,

    /// List recent workouts
    History {
        /// How many days back to look
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Manage training programs
    Program {
        #[command(subcommand)]
        command: ProgramCommands,
    },

    /// Roll up logged workouts to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },

    /// Run a rest countdown
    Rest {
        /// Countdown length (defaults to the configured rest interval)
        #[arg(long)]
        seconds: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Add an exercise to the catalog
    Add {
        name: String,

        /// Category (push, pull, legs, jjb, mobility)
        #[arg(long)]
        category: String,

        /// Muscle group (defaults to the category's primary group)
        #[arg(long)]
        muscle_group: Option<String>,
    },

    /// List the catalog grouped by category
    List,
}

#[derive(Subcommand)]
enum ProgramCommands {
    /// Create a program from a comma-separated rotation
    Add {
        name: String,

        /// Rotation, e.g. "push,pull,legs"
        #[arg(long)]
        rotation: String,

        /// Activate the new program immediately
        #[arg(long)]
        activate: bool,
    },

    /// List programs with their rotations
    List,

    /// Activate a program by name (deactivates the others)
    Activate { name: String },
}

fn main() -> Result<()> {
    gym_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Start { category, auto }) => cmd_start(data_dir, category, auto, &config),
        Some(Commands::Suggest) => cmd_suggest(data_dir),
        Some(Commands::Stats) => cmd_stats(data_dir),
        Some(Commands::History { days }) => cmd_history(data_dir, days),
        Some(Commands::Exercise { command }) => cmd_exercise(data_dir, command),
        Some(Commands::Program { command }) => cmd_program(data_dir, command),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(data_dir, cleanup),
        Some(Commands::Rest { seconds }) => cmd_rest(seconds, &config),
        None => cmd_suggest(data_dir),
    }
}

fn open_store(data_dir: &std::path::Path) -> Result<FileStore> {
    let mut store = FileStore::open(data_dir)?;
    let seeded = store.seed_catalog_if_empty(Utc::now())?;
    if seeded > 0 {
        println!("Seeded {} starter exercises into the catalog.", seeded);
    }
    Ok(store)
}

fn cmd_start(
    data_dir: PathBuf,
    category: Option<String>,
    auto: bool,
    config: &Config,
) -> Result<()> {
    let mut store = open_store(&data_dir)?;
    let exercises = store.exercises()?;
    let active_program = store.active_program()?;

    let target = match category.as_deref() {
        Some(raw) => Category::parse(raw)
            .ok_or_else(|| Error::Validation(format!("unknown category: {raw}")))?,
        None => {
            let recent = store.workouts_since(Utc::now() - Duration::days(30), false)?;
            suggest_next_session(active_program.as_ref(), &recent).unwrap_or(Category::Push)
        }
    };

    let session_config = SessionConfig {
        default_sets_per_exercise: config.session.default_sets_per_exercise,
        default_rest_seconds: config.session.default_rest_seconds,
    };
    let mut session = WorkoutSession::new(
        session_config,
        Arc::new(SystemClock),
        Arc::new(NullSink),
    );
    session.start_workout(target, &exercises)?;

    display_workout_header(&session, &exercises);

    if auto {
        auto_complete_sets(&mut session)?;
    } else {
        let finished = interactive_loop(&mut session, &exercises, config)?;
        if !finished {
            session.cancel_workout()?;
            println!("\nWorkout discarded - nothing saved.");
            return Ok(());
        }
    }

    finalize_workout(&mut store, &mut session)
}

/// Complete every pending set with the slot's last-performance stamp,
/// falling back to a light default for first-time exercises.
fn auto_complete_sets(session: &mut WorkoutSession) -> Result<()> {
    let pending: Vec<(uuid::Uuid, f64, i32)> = session
        .workout()
        .map(|w| {
            w.exercises
                .iter()
                .flat_map(|slot| {
                    let weight = slot.last_weight.unwrap_or(20.0);
                    let reps = slot.last_reps.unwrap_or(10);
                    slot.sets
                        .iter()
                        .filter(|s| !s.completed)
                        .map(move |s| (s.id, weight, reps))
                })
                .collect()
        })
        .unwrap_or_default();

    for (set_id, weight, reps) in pending {
        session.complete_set(set_id, weight, reps)?;
    }
    Ok(())
}

/// Commit the finished session: performance records onto the catalog,
/// program cursor advance, workout into the log.
fn finalize_workout(store: &mut FileStore, session: &mut WorkoutSession) -> Result<()> {
    let mut exercises = store.exercises()?;
    let mut active_program = store.active_program()?;

    let workout = session.complete_workout(&mut exercises, active_program.as_mut())?;

    for exercise in exercises {
        store.update_exercise(exercise)?;
    }
    if let Some(program) = active_program {
        store.update_program(program)?;
    }

    let volume = workout.total_volume();
    let sets = workout
        .exercises
        .iter()
        .map(|e| e.completed_set_count())
        .sum::<usize>();
    let duration = workout.duration_minutes(Utc::now());

    store.insert_workout(workout)?;
    store.save()?;

    println!("\n✓ Workout logged!");
    println!("  Duration: {} min", duration);
    println!("  Completed sets: {}", sets);
    println!("  Volume: {:.1} kg", volume);
    Ok(())
}

fn display_workout_header(session: &WorkoutSession, exercises: &[Exercise]) {
    let Some(workout) = session.workout() else {
        return;
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} WORKOUT", workout.category.label().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();

    for slot in &workout.exercises {
        let name = exercise_name(exercises, slot.exercise_id);
        match (slot.last_weight, slot.last_reps) {
            (Some(w), Some(r)) => {
                println!("  {} ({} sets, last: {:.1} kg x {})", name, slot.sets.len(), w, r)
            }
            _ => println!("  {} ({} sets, first time)", name, slot.sets.len()),
        }
    }
    println!();
}

fn exercise_name(exercises: &[Exercise], id: uuid::Uuid) -> String {
    exercises
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Drive the session from stdin. Returns true when the user finished
/// the workout, false when they quit without saving.
fn interactive_loop(
    session: &mut WorkoutSession,
    exercises: &[Exercise],
    config: &Config,
) -> Result<bool> {
    loop {
        let Some(slot) = session.current_exercise() else {
            println!("No exercises in this workout. Finish or quit.");
            match prompt_line("(f)inish / (q)uit > ")?.as_str() {
                "f" => return Ok(true),
                _ => return Ok(false),
            }
        };

        let name = exercise_name(exercises, slot.exercise_id);
        println!(
            "\n[{} {}/{}] {} - {}/{} sets done",
            session.workout().map(|w| w.category.label()).unwrap_or(""),
            session.selected_index() + 1,
            session.workout().map(|w| w.exercise_count()).unwrap_or(0),
            name,
            slot.completed_set_count(),
            slot.total_set_count(),
        );
        for set in &slot.sets {
            let mark = if set.completed { "✓" } else { " " };
            match (set.weight, set.reps) {
                (Some(w), Some(r)) => {
                    println!("  [{}] set {}: {:.1} kg x {}", mark, set.set_number, w, r)
                }
                _ => println!("  [ ] set {}: -", set.set_number),
            }
        }

        println!("─────────────────────────────────────────");
        println!("Enter: log next set  (n)ext/(p)rev exercise");
        println!("(a)dd set  (f)inish workout  (q)uit without saving");

        match prompt_line("> ")?.as_str() {
            "n" => session.next_exercise(),
            "p" => session.previous_exercise(),
            "a" => {
                let slot_id = session
                    .current_exercise()
                    .map(|s| s.id)
                    .ok_or_else(|| Error::InvalidState("no exercise selected".into()))?;
                session.add_set(slot_id, false)?;
            }
            "f" => return Ok(true),
            "q" => return Ok(false),
            _ => {
                if let Err(e) = log_next_set(session, config) {
                    eprintln!("  ! {}", e);
                }
            }
        }
    }
}

fn log_next_set(session: &mut WorkoutSession, config: &Config) -> Result<()> {
    let Some(slot) = session.current_exercise() else {
        return Err(Error::InvalidState("no exercise selected".into()));
    };

    let Some(next) = slot.sets.iter().find(|s| !s.completed) else {
        println!("  All sets done for this exercise.");
        return Ok(());
    };
    let set_id = next.id;

    // Default to the previous completed set, then the last-performance stamp
    let last_done = slot.sets.iter().rev().find(|s| s.completed);
    let default_weight = last_done
        .and_then(|s| s.weight)
        .or(slot.last_weight)
        .unwrap_or(20.0);
    let default_reps = last_done
        .and_then(|s| s.reps)
        .or(slot.last_reps)
        .unwrap_or(10);

    let weight = prompt_f64(&format!("  Weight kg [{:.1}]: ", default_weight), default_weight)?;
    let reps = prompt_i32(&format!("  Reps [{}]: ", default_reps), default_reps)?;

    if weight > config.session.max_weight {
        return Err(Error::Validation(format!(
            "weight above limit ({} kg)",
            config.session.max_weight
        )));
    }
    if reps > config.session.max_reps {
        return Err(Error::Validation(format!(
            "reps above limit ({})",
            config.session.max_reps
        )));
    }

    session.complete_set(set_id, weight, reps)?;
    println!("  ✓ Logged. Rest {}s (gymtrack rest)", session.config().default_rest_seconds);
    Ok(())
}

fn cmd_suggest(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::open(&data_dir)?;
    let active_program = store.active_program()?;
    let recent = store.workouts_since(Utc::now() - Duration::days(30), false)?;

    match suggest_next_session(active_program.as_ref(), &recent) {
        Some(category) => {
            println!("Next session: {}", category.label());
            match &active_program {
                Some(program) => println!("  (from program '{}')", program.name),
                None => println!("  (default Push → Pull → Legs rotation)"),
            }
        }
        None => println!("Active program has an empty rotation - nothing to suggest."),
    }
    Ok(())
}

fn cmd_stats(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::open(&data_dir)?;
    let now = Utc::now();
    let workouts = store.workouts_since(now - Duration::days(365), false)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  THIS WEEK");
    println!("╰─────────────────────────────────────────╯");
    println!("  Workouts: {}", stats::workouts_this_week(&workouts, now));
    println!("  Sets: {}", stats::sets_this_week(&workouts, now));
    println!("  Volume: {:.1} kg", stats::volume_this_week(&workouts, now));
    println!();
    println!("  Current streak: {} day(s)", stats::current_streak(&workouts, now.date_naive()));
    Ok(())
}

fn cmd_history(data_dir: PathBuf, days: i64) -> Result<()> {
    let store = FileStore::open(&data_dir)?;
    let workouts = store.workouts_since(Utc::now() - Duration::days(days), false)?;

    if workouts.is_empty() {
        println!("No workouts in the last {} days.", days);
        return Ok(());
    }

    println!("Workouts from the last {} days:", days);
    for workout in &workouts {
        let status = if workout.completed { "✓" } else { "✗" };
        println!(
            "  {} {} {:<8} {} exercises, {} sets, {:.1} kg",
            status,
            workout.date.format("%Y-%m-%d"),
            workout.category.label(),
            workout.exercise_count,
            workout.total_sets,
            workout.total_volume,
        );
    }
    Ok(())
}

fn cmd_exercise(data_dir: PathBuf, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::Add {
            name,
            category,
            muscle_group,
        } => {
            if name.trim().is_empty() {
                return Err(Error::Validation("exercise name is empty".into()));
            }
            let category = Category::parse(&category)
                .ok_or_else(|| Error::Validation(format!("unknown category: {category}")))?;
            let muscle_group = match muscle_group {
                Some(raw) => MuscleGroup::parse(&raw)
                    .ok_or_else(|| Error::Validation(format!("unknown muscle group: {raw}")))?,
                None => MuscleGroup::for_category(category)[0],
            };

            let mut store = open_store(&data_dir)?;
            let exercise = Exercise::new(name.trim(), category, muscle_group, Utc::now());
            println!("✓ Added {} ({}, {})", exercise.name, category.label(), muscle_group.label());
            store.insert_exercise(exercise)?;
            store.save()
        }
        ExerciseCommands::List => {
            let store = open_store(&data_dir)?;
            let exercises = store.exercises()?;

            for category in Category::ALL {
                let in_category: Vec<&Exercise> =
                    exercises.iter().filter(|e| e.category == category).collect();
                if in_category.is_empty() {
                    continue;
                }
                println!("\n{}", category.label());
                for exercise in in_category {
                    match gym_core::performance::personal_best(exercise) {
                        Some(best) => println!(
                            "  {} [{}] - PB {:.1} kg",
                            exercise.name,
                            exercise.muscle_group.label(),
                            best
                        ),
                        None => println!(
                            "  {} [{}] - no history",
                            exercise.name,
                            exercise.muscle_group.label()
                        ),
                    }
                }
            }
            Ok(())
        }
    }
}

fn cmd_program(data_dir: PathBuf, command: ProgramCommands) -> Result<()> {
    match command {
        ProgramCommands::Add {
            name,
            rotation,
            activate,
        } => {
            let parsed: Vec<Category> = rotation
                .split(',')
                .map(|raw| {
                    Category::parse(raw.trim())
                        .ok_or_else(|| Error::Validation(format!("unknown category: {raw}")))
                })
                .collect::<Result<_>>()?;
            validate_program(&name, &parsed)?;

            let mut store = open_store(&data_dir)?;
            let program = Program::new(name.trim(), parsed, false, Utc::now());
            let id = program.id;
            println!("✓ Added program '{}'", program.name);
            store.insert_program(program)?;

            if activate {
                let mut programs = store.programs()?;
                activate_program(&mut programs, id)?;
                for program in programs {
                    store.update_program(program)?;
                }
                println!("✓ Activated");
            }
            store.save()
        }
        ProgramCommands::List => {
            let store = open_store(&data_dir)?;
            let programs = store.programs()?;

            if programs.is_empty() {
                println!("No programs defined.");
                return Ok(());
            }
            for program in &programs {
                let marker = if program.is_active { "*" } else { " " };
                let rotation: Vec<&str> =
                    program.rotation.iter().map(|c| c.label()).collect();
                println!("{} {} [{}]", marker, program.name, rotation.join(" → "));
                match program.next_session() {
                    Some(next) => println!(
                        "    next: {} (session {}/{})",
                        next.label(),
                        program.current_index + 1,
                        program.total_sessions()
                    ),
                    None => println!("    empty rotation"),
                }
            }
            Ok(())
        }
        ProgramCommands::Activate { name } => {
            let mut store = open_store(&data_dir)?;
            let mut programs = store.programs()?;
            let id = programs
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&name))
                .map(|p| p.id)
                .ok_or_else(|| Error::NotFound(format!("program '{name}'")))?;

            activate_program(&mut programs, id)?;
            for program in programs {
                store.update_program(program)?;
            }
            store.save()?;
            println!("✓ Activated program '{}'", name);
            Ok(())
        }
    }
}

fn cmd_rollup(data_dir: PathBuf, cleanup: bool) -> Result<()> {
    let wal_dir = data_dir.join("wal");
    let wal_path = wal_dir.join("workouts.wal");
    let csv_path = data_dir.join("workouts.csv");

    if !wal_path.exists() {
        println!("No workout log found - nothing to roll up.");
        return Ok(());
    }

    let count = gym_core::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path)?;

    println!("✓ Rolled up {} workouts to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = gym_core::csv_rollup::cleanup_processed_wals(&wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

fn cmd_rest(seconds: Option<u32>, config: &Config) -> Result<()> {
    let duration = seconds.unwrap_or(config.session.default_rest_seconds);
    if duration == 0 {
        return Err(Error::Validation("rest duration must be positive".into()));
    }

    let mut timer = RestTimer::new(Arc::new(NullSink));
    timer.start(duration);

    println!("Rest for {} seconds", duration);
    while timer.state() == TimerState::Running {
        std::thread::sleep(std::time::Duration::from_secs(1));
        timer.tick();
        print!("\r  {:>3}s remaining ", timer.remaining_seconds());
        io::stdout().flush()?;
    }

    println!("\n✓ Rest over - back to work!");
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}

fn prompt_f64(prompt: &str, default: f64) -> Result<f64> {
    let input = prompt_line(prompt)?;
    if input.is_empty() {
        return Ok(default);
    }
    input
        .parse()
        .map_err(|_| Error::Validation(format!("not a number: {input}")))
}

fn prompt_i32(prompt: &str, default: i32) -> Result<i32> {
    let input = prompt_line(prompt)?;
    if input.is_empty() {
        return Ok(default);
    }
    input
        .parse()
        .map_err(|_| Error::Validation(format!("not a number: {input}")))
}
