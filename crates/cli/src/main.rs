//! Lectio CLI - reading plan progress tracker.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use lectio_core::{Identity, ReadingStatus, UserProfile};
use lectio_engine::{EngineError, IdentityProvider, TrackerService};
use lectio_storage::{JsonStore, Store};
use tracing::Level;

#[derive(Parser)]
#[command(name = "lectio")]
#[command(about = "Reading plan progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's reading and your progress
    Status,
    /// Due readings you have not completed, oldest first
    Pending,
    /// Recent calendar entries with completion state
    Calendar {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Flip completion for a reading
    Toggle {
        /// Reading ID
        id: String,
    },
    /// Group ranking by completed readings
    Leaderboard,
    /// Active announcements
    Announcements,
    /// Sign in as a member (creates the profile on first use)
    Login {
        /// Display name
        name: String,
    },
    /// Sign out
    Logout,
}

/// File-backed session probe: the signed-in identity lives in
/// `session.json` next to the store.
struct FileSession {
    path: std::path::PathBuf,
}

#[async_trait]
impl IdentityProvider for FileSession {
    async fn current(&self) -> std::result::Result<Option<Identity>, EngineError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| EngineError::Session(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::Session(e.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .init();

    let cli = Cli::parse();

    let root = std::path::PathBuf::from(".lectio");
    let store = JsonStore::new(&root).await?;
    let service = TrackerService::new(store);
    let session = FileSession {
        path: root.join("session.json"),
    };

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Status => {
            let identity = require_identity(&session).await?;
            match service.get_today_reading(today).await? {
                Some(reading) => {
                    println!("Today's reading: {} ({})", reading.title, reading.passage)
                }
                None => println!("No reading scheduled today."),
            }

            let snap = service.get_snapshot(identity.user_id, today).await?;
            println!();
            println!("Progress for {}", identity.name);
            println!("  Completed:       {}", snap.completed_count);
            println!("  Remaining:       {}", snap.remaining_count);
            println!("  Behind schedule: {}", snap.overdue_count);
            println!("  Progress:        {:.1}%", snap.completion_percentage);
        }
        Commands::Pending => {
            let identity = require_identity(&session).await?;
            let pending = service.get_pending_readings(identity.user_id, today).await?;

            println!("Pending readings ({})", pending.len());
            for reading in pending {
                println!(
                    "  {} | {} | {} - {}",
                    reading.id, reading.date, reading.title, reading.passage,
                );
            }
        }
        Commands::Calendar { limit } => {
            let identity = require_identity(&session).await?;
            let entries = service.get_calendar(identity.user_id, today, limit).await?;

            for (reading, status) in entries {
                let marker = match status {
                    ReadingStatus::Completed => "[x]",
                    _ => "[ ]",
                };
                println!(
                    "  {} {} | {} | {} | {} - {}",
                    marker,
                    reading.id,
                    reading.date,
                    status.as_str(),
                    reading.title,
                    reading.passage,
                );
            }
        }
        Commands::Toggle { id } => {
            let identity = require_identity(&session).await?;
            let reading_id = id.parse().map_err(|_| anyhow::anyhow!("Invalid reading ID"))?;

            let record = service.toggle(identity.user_id, reading_id).await?;
            if record.state.is_completed() {
                println!("Marked complete.");
            } else {
                println!("Marked not complete.");
            }
        }
        Commands::Leaderboard => {
            let entries = service.get_leaderboard(today).await?;

            println!("Leaderboard ({})", entries.len());
            for (i, entry) in entries.iter().enumerate() {
                println!(
                    "  {:>2}. {} | {} read | {} behind | {:.1}%",
                    i + 1,
                    entry.profile.name,
                    entry.snapshot.completed_count,
                    entry.snapshot.overdue_count,
                    entry.snapshot.completion_percentage,
                );
            }
        }
        Commands::Announcements => {
            let announcements = service.list_announcements().await?;

            for announcement in announcements {
                println!(
                    "{} ({})",
                    announcement.title,
                    announcement.created_at.format("%Y-%m-%d"),
                );
                println!("  {}", announcement.content);
            }
        }
        Commands::Login { name } => {
            let storage = service.storage();
            let mut storage = storage.lock().await;

            let profile = match storage
                .list_profiles()
                .await?
                .into_iter()
                .find(|p| p.name == name)
            {
                Some(existing) => existing,
                None => {
                    let profile = UserProfile::new(name.as_str(), Utc::now());
                    storage.save_profile(&profile).await?;
                    profile
                }
            };

            let identity = Identity {
                user_id: profile.id,
                name: profile.name,
            };
            let json = serde_json::to_string_pretty(&identity)?;
            tokio::fs::write(root.join("session.json"), json.as_bytes()).await?;
            println!("Signed in as {}", identity.name);
        }
        Commands::Logout => match tokio::fs::remove_file(root.join("session.json")).await {
            Ok(()) => println!("Signed out."),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => println!("Not signed in."),
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}

async fn require_identity(session: &FileSession) -> Result<Identity> {
    match session.current().await? {
        Some(identity) => Ok(identity),
        None => anyhow::bail!("Not signed in. Run `lectio login <name>` first."),
    }
}
