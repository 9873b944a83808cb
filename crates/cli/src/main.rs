use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use circuit_domain::{Name, Random, SessionKey, format_time};
use circuit_storage::{FileStore, seed_exercises};
use circuit_web_app::{
    AnalysisPage, Form, HistoryPage, IndexPage, Planner, Response, SettingsService, TimerPage,
    log::Service as _,
};

/// Circuit - plans randomized circuit workouts and keeps their history
#[derive(Parser)]
#[command(name = "circuit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Key of the planner session
    #[arg(long, global = true, default_value = "default")]
    session: String,

    /// Most verbose level of log messages to record
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill an empty exercise catalog from a directory of JSON files
    Seed {
        #[arg(default_value = "exercises")]
        dir: PathBuf,
    },
    /// List active exercises grouped by muscle
    Exercises,
    /// Show the current workout
    Show(PlanArgs),
    /// Generate a new workout, keeping locked exercises in place
    Generate {
        #[command(flatten)]
        plan: PlanArgs,

        /// Ids of exercises to keep, comma separated
        #[arg(long)]
        locked: Option<String>,
    },
    /// Hand the current workout over to the timer
    Start(PlanArgs),
    /// Save the current workout without running the timer
    Save(PlanArgs),
    /// Show the schedule of the current workout
    Timer,
    /// Save the workout after it has been performed with the timer
    Finish,
    /// List past workouts of the session user
    History,
    /// Show time trends and weekly and monthly totals of the session user
    Analysis,
    /// List all users with saved workouts
    Users,
    /// Copy the data files into a timestamped backup directory
    Backup,
    /// Show the most recent log messages
    Log,
    /// Show or change the planner defaults
    Settings(SettingsArgs),
}

/// Form fields of the planner. Values are passed on unparsed and validated by the planner.
#[derive(Args, Debug, Default)]
struct PlanArgs {
    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    new_username: Option<String>,

    /// any, core or cardio
    #[arg(long)]
    workout_type: Option<String>,

    #[arg(long)]
    num_exercises: Option<String>,

    #[arg(long)]
    num_sets: Option<String>,

    /// Seconds per exercise
    #[arg(long)]
    ex_duration: Option<String>,

    /// Seconds between exercises
    #[arg(long)]
    rest_duration: Option<String>,

    /// Minutes between sets
    #[arg(long)]
    set_rest: Option<String>,

    /// Exercise ids in the order currently shown, comma separated
    #[arg(long)]
    order: Option<String>,
}

impl PlanArgs {
    fn form(&self, action: Option<&str>) -> Form {
        let mut form = Form::new();
        if let Some(action) = action {
            form.insert(action, "");
        }
        for (key, value) in [
            ("username", &self.username),
            ("new_username", &self.new_username),
            ("workout_type", &self.workout_type),
            ("num_exercises", &self.num_exercises),
            ("num_sets", &self.num_sets),
            ("ex_duration", &self.ex_duration),
            ("rest_duration", &self.rest_duration),
            ("set_rest", &self.set_rest),
            ("exercise_order", &self.order),
        ] {
            if let Some(value) = value {
                form.insert(key, value);
            }
        }
        form
    }
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    num_exercises: Option<usize>,

    #[arg(long)]
    num_sets: Option<i64>,

    /// Seconds per exercise
    #[arg(long)]
    exercise_duration: Option<i64>,

    /// Seconds between exercises
    #[arg(long)]
    rest_duration: Option<i64>,

    /// Seconds between sets
    #[arg(long)]
    set_rest: Option<i64>,

    #[arg(long, value_parser = ["any", "core", "cardio"])]
    workout_type: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = FileStore::new(&cli.data_dir);
    circuit_web_app::log::init(Arc::new(Mutex::new(store.clone())), cli.log_level)
        .context("failed to initialize logger")?;

    let key = SessionKey::from(cli.session);
    let ui = circuit_web_app::Service::new(store.clone());
    let planner = Planner::new(circuit_domain::Service::new(store.clone()), ui);

    match cli.command {
        Commands::Seed { dir } => {
            let count = seed_exercises(&circuit_domain::Service::new(store), &dir)
                .with_context(|| format!("failed to seed exercises from {}", dir.display()))?;
            println!("Added {count} exercises");
        }
        Commands::Exercises => {
            for (muscle, exercises) in planner.exercises().context("failed to read exercises")? {
                println!("{muscle}");
                for exercise in exercises {
                    println!("  {:>4}  {} ({})", exercise.id, exercise.name, exercise.kind);
                }
            }
        }
        Commands::Show(plan) => index(&planner, &key, &plan.form(None))?,
        Commands::Generate { plan, locked } => {
            let mut form = plan.form(Some("generate"));
            form.insert("locked_ids", locked.as_deref().unwrap_or_default());
            index(&planner, &key, &form)?;
        }
        Commands::Start(plan) => index(&planner, &key, &plan.form(Some("start")))?,
        Commands::Save(plan) => index(&planner, &key, &plan.form(Some("save")))?,
        Commands::Timer => match planner.timer(&key).context("failed to load workout")? {
            Some(page) => print_timer(&page),
            None => println!("No workout, generate one first"),
        },
        Commands::Finish => {
            let status = planner
                .save_current_workout(&key)
                .context("failed to save workout")?;
            println!("{}", capitalize(&status.to_string()));
        }
        Commands::History => print_history(&planner.history(&key).context("failed to load history")?),
        Commands::Analysis => {
            print_analysis(&planner.analysis(&key).context("failed to load history")?);
        }
        Commands::Users => {
            for user in planner.users().context("failed to read users")? {
                println!("{user}");
            }
        }
        Commands::Backup => {
            match store
                .backup(Local::now().naive_local())
                .context("failed to back up data")?
            {
                Some(path) => println!("Backed up to {}", path.display()),
                None => println!("Nothing to back up"),
            }
        }
        Commands::Log => {
            let service = circuit_web_app::Service::new(store);
            for entry in service
                .get_log_entries()
                .context("failed to read log entries")?
            {
                println!("{} {:<5} {}", entry.time, entry.level, entry.message);
            }
        }
        Commands::Settings(args) => settings(&circuit_web_app::Service::new(store), args)?,
    }

    Ok(())
}

fn index<D, U>(planner: &Planner<D, U>, key: &SessionKey, form: &Form) -> Result<()>
where
    D: circuit_domain::ExerciseService
        + circuit_domain::SessionService
        + circuit_domain::HistoryService,
    U: SettingsService,
{
    match planner
        .index(key, form, &mut Random::thread())
        .context("failed to process workout form")?
    {
        Response::Index(page) => print_index(&page),
        Response::Timer => match planner.timer(key).context("failed to load workout")? {
            Some(page) => print_timer(&page),
            None => println!("No workout, generate one first"),
        },
    }
    Ok(())
}

fn settings(service: &impl SettingsService, args: SettingsArgs) -> Result<()> {
    let mut settings = service.get_settings().map_err(anyhow::Error::msg)?;
    let SettingsArgs {
        username,
        num_exercises,
        num_sets,
        exercise_duration,
        rest_duration,
        set_rest,
        workout_type,
    } = args;
    let changed = username.is_some()
        || num_exercises.is_some()
        || num_sets.is_some()
        || exercise_duration.is_some()
        || rest_duration.is_some()
        || set_rest.is_some()
        || workout_type.is_some();

    if let Some(username) = username {
        settings.username = Name::new(&username)
            .context("invalid username")?
            .to_string();
    }
    settings.num_exercises = num_exercises.unwrap_or(settings.num_exercises);
    settings.num_sets = num_sets.unwrap_or(settings.num_sets);
    settings.exercise_duration = exercise_duration.unwrap_or(settings.exercise_duration);
    settings.rest_duration = rest_duration.unwrap_or(settings.rest_duration);
    settings.set_rest = set_rest.unwrap_or(settings.set_rest);
    settings.workout_type = workout_type.unwrap_or(settings.workout_type);

    if changed {
        service
            .set_settings(settings.clone())
            .map_err(anyhow::Error::msg)
            .context("failed to save settings")?;
    }

    println!("username:          {}", settings.username);
    println!("num_exercises:     {}", settings.num_exercises);
    println!("num_sets:          {}", settings.num_sets);
    println!("exercise_duration: {}s", settings.exercise_duration);
    println!("rest_duration:     {}s", settings.rest_duration);
    println!("set_rest:          {}s", settings.set_rest);
    println!("workout_type:      {}", settings.workout_type);

    Ok(())
}

fn print_index(page: &IndexPage) {
    if let Some(message) = &page.message {
        println!("{message}");
    }
    println!(
        "{} | {} | {} exercises | {} x {}s, {}s rest, {}s between sets",
        page.username,
        page.workout_type.name(),
        page.num_exercises,
        page.timing.num_sets,
        page.timing.exercise_duration,
        page.timing.rest_duration,
        page.timing.set_rest,
    );
    if page.workout.is_empty() {
        println!("No workout");
    } else {
        for (i, exercise) in page.workout.iter().enumerate() {
            let lock = if page.locked_ids.contains(&exercise.id) {
                "*"
            } else {
                " "
            };
            println!(
                "{lock}{:>2}. {} ({}) #{}",
                i + 1,
                exercise.name,
                exercise.muscle(),
                exercise.id
            );
        }
        println!("Total time: {}", page.total_time);
    }
    if !page.users.is_empty() {
        println!(
            "Users: {}",
            page.users
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn print_timer(page: &TimerPage) {
    println!("{}", page.username);
    for set in 1..=page.timing.num_sets {
        println!("Set {set}/{}", page.timing.num_sets);
        for (i, exercise) in page.workout.iter().enumerate() {
            println!(
                "  {:>2}. {} {}s",
                i + 1,
                exercise.name,
                page.timing.exercise_duration
            );
            if i + 1 < page.workout.len() {
                println!("      rest {}s", page.timing.rest_duration);
            }
        }
        if set < page.timing.num_sets {
            println!("  rest {}s", page.timing.set_rest);
        }
    }
}

fn print_history(page: &HistoryPage) {
    if page.entries.is_empty() {
        println!("No workouts of {}", page.username);
    }
    for entry in &page.entries {
        println!(
            "#{} {} | {} | {} x {}s | {}",
            entry.record.id,
            entry.record.timestamp.format("%Y-%m-%d %H:%M"),
            entry.record.location,
            entry.record.timing.num_sets,
            entry.record.timing.exercise_duration,
            entry.total_time
        );
        for exercise in &entry.exercises {
            println!("    {} ({})", exercise.name, exercise.muscle);
        }
    }
}

fn print_analysis(page: &AnalysisPage) {
    println!("Trend of {}", page.username);
    for point in &page.trend {
        println!(
            "  {}  exercise {}  rest {}",
            point.label,
            format_time(point.exercise_time),
            format_time(point.rest_time)
        );
    }
    for (bucket, totals) in &page.totals {
        println!("{}", bucket.name());
        for (period, totals) in totals {
            println!(
                "  {period}  {} workouts  exercise {}  rest {}",
                totals.workout_count,
                format_time(totals.exercise_time),
                format_time(totals.rest_time)
            );
            for (muscle, seconds) in &totals.muscles {
                println!("    {muscle}: {}", format_time(*seconds));
            }
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plan_args_form() {
        let cli = Cli::try_parse_from([
            "circuit",
            "generate",
            "--num-exercises",
            "4",
            "--set-rest",
            "1.5",
            "--order",
            "3,1,2",
            "--locked",
            "1",
        ])
        .unwrap();

        let Commands::Generate { plan, locked } = cli.command else {
            panic!("unexpected command");
        };

        assert_eq!(
            plan.form(Some("generate")),
            Form::new()
                .with("generate", "")
                .with("num_exercises", "4")
                .with("set_rest", "1.5")
                .with("exercise_order", "3,1,2")
        );
        assert_eq!(locked, Some("1".to_string()));
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from(["circuit", "history", "--session", "abc"]).unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.session, "abc");
        assert_eq!(cli.log_level, LevelFilter::Info);
    }

    #[rstest]
    #[case::saved("saved", "Saved")]
    #[case::no_workout("no workout", "No workout")]
    #[case::empty("", "")]
    fn test_capitalize(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(capitalize(value), expected);
    }
}
