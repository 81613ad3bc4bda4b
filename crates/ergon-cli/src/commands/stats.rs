use chrono::Local;
use ergon_core::stats::format_duration;
use ergon_core::{Config, FocusStats};

use super::{open_focus_store, CliResult};

pub fn run(json: bool) -> CliResult {
    let config = Config::load_or_default();
    let store = open_focus_store(&config)?;
    let stats = FocusStats::from_engine(store.engine(), &Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Today:   {} sessions, {}", stats.today_sessions, format_duration(stats.today_focus_secs));
    println!("Week:    {} sessions, {}", stats.week_sessions, format_duration(stats.week_focus_secs));
    println!("Average: {} per day", format_duration(stats.daily_average_secs));
    println!("Total:   {} sessions, {}", stats.total_sessions, format_duration(stats.total_focus_secs));
    println!("Focus counter: {}", format_duration(stats.todays_total_focus_time));
    Ok(())
}
