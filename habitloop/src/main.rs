//! habitloop - habit tracker CLI
//!
//! Thin presentation layer over habitloop-core: signs in against the
//! configured backend, lists and creates habits, toggles completions,
//! and renders the stats snapshot as text.

mod render;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use habitloop_core::refresh::StatsRefresher;
use habitloop_core::stats::completed_on;
use habitloop_core::types::{Frequency, StatsFilter};
use habitloop_core::{ApiClient, Config, Session, SessionStore};

#[derive(Parser)]
#[command(name = "habitloop")]
#[command(about = "Habit tracker client")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// List habits and their completion state for a day
    Habits {
        /// Day to check (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Create a habit
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// daily, weekly, or monthly
        #[arg(short, long, default_value = "daily")]
        frequency: String,
        /// Tag names to attach (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Toggle a habit's completion for a day
    Done {
        habit_id: i64,
        /// Day to toggle (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Manage tags
    Tags {
        #[command(subcommand)]
        command: Option<TagCommand>,
    },
    /// Show the stats snapshot
    Stats {
        /// Restrict to one frequency (daily, weekly, monthly)
        #[arg(long)]
        frequency: Option<String>,
        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Restrict to habits carrying any of these tags (repeatable)
        #[arg(long)]
        tag: Vec<String>,
        /// Use the current month as the window
        #[arg(long)]
        month: bool,
    },
}

#[derive(Subcommand)]
enum TagCommand {
    /// Create a tag
    Add {
        name: String,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Rename or recolor a tag
    Update {
        id: i64,
        name: String,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a tag
    Rm { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, stdout stays clean for output)
    let _log_guard =
        habitloop_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let store = SessionStore::open_default();

    match args.command {
        Command::Login { email, password } => {
            let client = ApiClient::new(config.api.clone(), None)?;
            let data = client
                .login(&email, &password)
                .await
                .context("sign-in failed")?;
            let session = Session::from_login(data);
            store.store(&session).context("failed to store session")?;
            println!("Signed in as {}.", session.name);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let client = ApiClient::new(config.api.clone(), None)?;
            let id = client
                .register(&name, &email, &password)
                .await
                .context("registration failed")?;
            tracing::info!(user_id = id, "Account created");
            println!("Account created. Run `habitloop login {email}` to sign in.");
        }
        Command::Logout => {
            store.clear().context("failed to clear session")?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;
            let user = client.get_user().await?;
            println!("{} <{}> (id {})", user.name, user.email, user.id);
        }
        Command::Habits { date } => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;
            let day = parse_day_arg(date)?;
            let habits = client.get_all_habits(None, None).await?;

            if habits.is_empty() {
                println!("No habits yet. Create one with `habitloop add`.");
                return Ok(());
            }

            println!("Habits for {}:", habitloop_core::format::format_day(day));
            for habit in &habits {
                let mark = if completed_on(habit, day) { "x" } else { " " };
                let tags = if habit.tags.is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> = habit.tags.iter().map(|t| t.name.as_str()).collect();
                    format!("  [{}]", names.join(", "))
                };
                println!(
                    "  [{}] #{:<4} {} ({}){}",
                    mark, habit.id, habit.name, habit.frequency, tags
                );
            }
        }
        Command::Add {
            name,
            description,
            frequency,
            tag,
        } => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;
            let frequency = parse_frequency(&frequency)?;
            let id = client
                .create_habit(&name, description.as_deref(), frequency, &tag)
                .await?;
            println!("Created habit #{id} ({name}, {frequency}).");
        }
        Command::Done { habit_id, date } => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;
            let day = parse_day_arg(date)?;
            client.mark_completion(habit_id, day).await?;
            println!(
                "Toggled habit #{habit_id} for {}.",
                habitloop_core::format::format_day(day)
            );
        }
        Command::Tags { command } => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;
            match command {
                None => {
                    let tags = client.get_all_tags().await?;
                    if tags.is_empty() {
                        println!("No tags.");
                    }
                    for tag in tags {
                        println!("  #{:<4} {} ({})", tag.id, tag.name, tag.color);
                    }
                }
                Some(TagCommand::Add { name, color }) => {
                    let id = client.create_tag(&name, color.as_deref()).await?;
                    println!("Created tag #{id} ({name}).");
                }
                Some(TagCommand::Update { id, name, color }) => {
                    client.update_tag(id, &name, color.as_deref()).await?;
                    println!("Updated tag #{id}.");
                }
                Some(TagCommand::Rm { id }) => {
                    client.delete_tag(id).await?;
                    println!("Deleted tag #{id}.");
                }
            }
        }
        Command::Stats {
            frequency,
            from,
            to,
            tag,
            month,
        } => {
            let session = require_session(&store)?;
            let client = ApiClient::new(config.api.clone(), Some(&session))?;

            let mut filter = if month {
                StatsFilter::current_month()
            } else {
                StatsFilter::default()
            };
            if let Some(frequency) = frequency {
                filter.frequency = Some(parse_frequency(&frequency)?);
            }
            if let Some(from) = from {
                filter.start = Some(parse_day_str(&from)?);
            }
            if let Some(to) = to {
                filter.end = Some(parse_day_str(&to)?);
            }
            if !tag.is_empty() {
                filter.tags = Some(tag);
            }

            let refresher = StatsRefresher::new(client);
            // A single refresh can't be superseded, but don't panic on it.
            let report = refresher
                .refresh(&filter)
                .await
                .context("failed to load statistics")?
                .context("stats refresh was superseded")?;

            render::print_report(&report, &filter);
        }
    }

    Ok(())
}

fn require_session(store: &SessionStore) -> Result<Session> {
    match store.load()? {
        Some(session) => Ok(session),
        None => bail!("not signed in; run `habitloop login <email> --password <password>`"),
    }
}

fn parse_frequency(value: &str) -> Result<Frequency> {
    value
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{e} (expected daily, weekly, or monthly)"))
}

fn parse_day_str(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}' (expected YYYY-MM-DD)"))
}

fn parse_day_arg(value: Option<String>) -> Result<NaiveDate> {
    match value {
        Some(value) => parse_day_str(&value),
        None => Ok(Utc::now().date_naive()),
    }
}
