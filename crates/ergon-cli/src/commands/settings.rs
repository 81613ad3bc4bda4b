use clap::Subcommand;
use ergon_core::{Config, ThemeMode, Toggle};

use super::{open_settings_store, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a boolean setting (e.g. "sound-enabled", "auto-start-breaks")
    Toggle { name: String },
    /// Set the theme mode: light, dark or system
    Theme { mode: String },
    /// Set the daily summary time (HH:mm)
    SummaryTime { time: String },
    /// Restore default settings
    Reset,
}

pub fn run(action: SettingsAction) -> CliResult {
    let config = Config::load_or_default();
    let mut store = open_settings_store(&config)?;

    match action {
        SettingsAction::Show { json } => {
            let settings = store.settings();
            if json {
                println!("{}", serde_json::to_string_pretty(settings)?);
            } else {
                println!("{:<18} {}", "themeMode", settings.theme_mode);
                for toggle in Toggle::ALL {
                    println!("{:<18} {}", toggle.key(), settings.get(toggle));
                }
                println!("{:<18} {}", "dailySummaryTime", settings.daily_summary_time);
            }
        }
        SettingsAction::Toggle { name } => {
            let toggle: Toggle = name.parse()?;
            let value = store.toggle(toggle);
            store.flush()?;
            println!("{} = {value}", toggle.key());
        }
        SettingsAction::Theme { mode } => {
            let mode: ThemeMode = mode.parse()?;
            store.set_theme_mode(mode);
            store.flush()?;
            println!("themeMode = {mode}");
        }
        SettingsAction::SummaryTime { time } => {
            store.set_daily_summary_time(&time)?;
            store.flush()?;
            println!("dailySummaryTime = {time}");
        }
        SettingsAction::Reset => {
            store.reset_settings();
            store.flush()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
