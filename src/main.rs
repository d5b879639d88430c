//! Moodwell CLI
//!
//! Command-line front end for the mood wizard and history:
//! - Walk through the capture wizard one step per invocation (progress is
//!   kept in the data directory between runs)
//! - Submit the finished entry to the Moodwell API
//! - Browse, filter and summarize history

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use moodwell::backend::{AuthContext, HttpBackend, SessionAuth};
use moodwell::config::{generate_default_config, Config};
use moodwell::entries::{Emotion, MoodEntry, Trigger};
use moodwell::history::{FetchOutcome, HistoryEngine, HistorySelections, HistoryView, ALL};
use moodwell::wizard::{self, FileStore, WizardState, WizardStore, WIZARD_STEPS};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "moodwell")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track how you feel and look back on it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URL (overrides backend.base_url)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// User id (overrides user.id)
    #[arg(short, long, global = true)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a mood step by step
    Wizard {
        #[command(subcommand)]
        action: WizardAction,
    },

    /// Browse recorded moods
    History {
        /// Emotion to show ("all" for every emotion)
        #[arg(short, long, default_value = ALL)]
        emotion: String,
        /// Exact intensity 1-10 ("all" for any)
        #[arg(short, long, default_value = ALL)]
        intensity: String,
        /// Time range: today, week, month, quarter, year, all
        #[arg(short, long, default_value = ALL)]
        range: String,
        /// Sort by: created_at, intensity, stress_level, emotion
        #[arg(long, default_value = "created_at")]
        sort_by: String,
        /// Sort order: asc, desc
        #[arg(long, default_value = "desc")]
        order: String,
        /// Free-text search over emotion, triggers, tags and notes
        #[arg(short, long, default_value = "")]
        search: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum WizardAction {
    /// Show the current step and selections
    Show,
    /// Jump to a step (1-4)
    Step {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=WIZARD_STEPS as i64))]
        number: u8,
    },
    /// Go to the next step
    Next,
    /// Go to the previous step
    Back,
    /// Select the emotion
    Emotion { value: Emotion },
    /// Select the intensity
    Intensity {
        #[arg(value_parser = clap::value_parser!(i32).range(1..=10))]
        value: i32,
    },
    /// Select the trigger
    Trigger { value: Trigger },
    /// Set the free-text note
    Note { text: Vec<String> },
    /// Record the entry and start over
    Submit,
    /// Discard all selections
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.backend.base_url = url;
    }
    if let Some(user) = cli.user {
        config.user.id = Some(user);
    }

    moodwell::logging::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Wizard { action } => run_wizard(&config, action).await,
        Commands::History {
            emotion,
            intensity,
            range,
            sort_by,
            order,
            search,
            format,
        } => {
            let selections = HistorySelections::default()
                .emotion(emotion)
                .intensity(intensity)
                .time_range(range)
                .sort_by(sort_by)
                .sort_order(order)
                .search(search);
            run_history(&config, &selections, format).await
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

fn session(config: &Config) -> SessionAuth {
    let auth = SessionAuth::anonymous();
    if let Some(id) = &config.user.id {
        auth.sign_in(id.clone());
    }
    auth
}

fn backend(config: &Config) -> anyhow::Result<HttpBackend> {
    HttpBackend::new((&config.backend).into()).context("Failed to create HTTP client")
}

async fn run_wizard(config: &Config, action: WizardAction) -> anyhow::Result<()> {
    let store = WizardStore::open(FileStore::new(config.storage.data_path()));

    match action {
        WizardAction::Show => {}
        WizardAction::Step { number } => store.set_step(usize::from(number) - 1),
        WizardAction::Next => store.next_step(),
        WizardAction::Back => store.previous_step(),
        WizardAction::Emotion { value } => store.set_selected_value(value),
        WizardAction::Intensity { value } => store.set_selected_overall_number(value),
        WizardAction::Trigger { value } => store.set_selected_trigger(value),
        WizardAction::Note { text } => store.set_additional_note(text.join(" ")),
        WizardAction::Reset => {
            store.clear_all();
            println!("Wizard reset.");
        }
        WizardAction::Submit => {
            let auth = session(config);
            if auth.user_id().is_none() {
                bail!("No user configured. Set [user] id, MOODWELL_USER_ID or --user.");
            }
            let backend = backend(config)?;

            let entry = wizard::submit(&store, &backend, &auth).await?;
            println!("Recorded {} ({})", describe(&entry), entry.id);
            return Ok(());
        }
    }

    print_wizard(&store.state());
    Ok(())
}

fn print_wizard(state: &WizardState) {
    match state.current_step() {
        Some(step) => println!("Step {}/{}: {}", state.step + 1, WIZARD_STEPS, step.title()),
        None => println!("Step {}/{}", state.step + 1, WIZARD_STEPS),
    }
    println!();

    let emotion = state.selected_value.map(|e| e.label()).unwrap_or("-");
    let intensity = match state.selected_overall_number {
        0 => "-".to_string(),
        n => n.to_string(),
    };
    let trigger = state.selected_trigger.map(|t| t.label()).unwrap_or("-");
    let note = if state.additional_note.trim().is_empty() {
        "-"
    } else {
        state.additional_note.as_str()
    };

    println!("  {:<10} {}", "Emotion", emotion);
    println!("  {:<10} {}", "Intensity", intensity);
    println!("  {:<10} {}", "Trigger", trigger);
    println!("  {:<10} {}", "Note", note);
}

async fn run_history(
    config: &Config,
    selections: &HistorySelections,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let backend = Arc::new(backend(config)?);
    let engine = HistoryEngine::with_page_size(
        backend,
        Arc::new(session(config)),
        config.history.page_size,
    );

    if engine.sync(selections).await == FetchOutcome::NotSignedIn {
        bail!("No user configured. Set [user] id, MOODWELL_USER_ID or --user.");
    }

    let view = engine.view().await;
    engine.close().await;

    if let Some(message) = &view.error {
        bail!("{}", message);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => print_history(&view),
    }
    Ok(())
}

fn print_history(view: &HistoryView) {
    if view.entries.is_empty() {
        println!("No mood entries found.");
        return;
    }

    println!(
        "{:<17} {:<10} {:>9}  {:<24} {}",
        "When", "Emotion", "Intensity", "Triggers", "Note"
    );
    println!("{}", "-".repeat(80));
    for entry in &view.entries {
        println!(
            "{:<17} {:<10} {:>9}  {:<24} {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.emotion.as_deref().unwrap_or("-"),
            entry
                .intensity
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entry.triggers.join(", "),
            entry.description.as_deref().unwrap_or(""),
        );
    }

    let stats = &view.stats;
    println!();
    println!(
        "Showing {} of {} entries, average intensity {:.1}",
        stats.total, view.total, stats.average_intensity
    );

    if !stats.emotions.is_empty() {
        let emotions: Vec<String> = stats
            .emotions
            .iter()
            .map(|(emotion, count)| format!("{} {}", emotion, count))
            .collect();
        println!("Emotions: {}", emotions.join(", "));
    }
    if !stats.top_triggers.is_empty() {
        let triggers: Vec<String> = stats
            .top_triggers
            .iter()
            .map(|(trigger, count)| format!("{} {}", trigger, count))
            .collect();
        println!("Top triggers: {}", triggers.join(", "));
    }
}

fn describe(entry: &MoodEntry) -> String {
    match (entry.emotion.as_deref(), entry.intensity) {
        (Some(emotion), Some(intensity)) => format!("{} at {}/10", emotion, intensity),
        (Some(emotion), None) => emotion.to_string(),
        _ => "entry".to_string(),
    }
}
