use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use ergon_core::stats::{format_duration, recent};
use ergon_core::Config;

use super::{flush_focus, open_focus_store, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show the most recent completed sessions
    List {
        /// Maximum number of sessions to show
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all recorded sessions and reset today's focus total
    Clear,
}

fn local_clock(at: Option<DateTime<Utc>>, format: &str) -> String {
    at.map(|t| t.with_timezone(&Local).format(format).to_string())
        .unwrap_or_else(|| "?".into())
}

pub fn run(action: HistoryAction) -> CliResult {
    let config = Config::load_or_default();
    let mut store = open_focus_store(&config)?;

    match action {
        HistoryAction::List { limit, json } => {
            let sessions = recent(store.engine().sessions(), limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            if sessions.is_empty() {
                println!("no sessions recorded");
            }
            for session in sessions {
                let started = local_clock(session.started_at(), "%Y-%m-%d %H:%M");
                let ended = local_clock(session.ended_at(), "%H:%M");
                println!(
                    "{started}-{ended}  {:<8} {}",
                    session.kind.as_str(),
                    format_duration(session.duration)
                );
            }
        }
        HistoryAction::Clear => {
            store.clear_history();
            flush_focus(&mut store)?;
            println!("history cleared");
        }
    }
    Ok(())
}
