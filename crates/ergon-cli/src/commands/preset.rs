use clap::Subcommand;
use ergon_core::{Config, FocusPreset};

use super::{flush_focus, open_focus_store, CliResult};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List built-in and custom presets
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a preset active by id
    Use {
        /// Preset id (e.g. "pomodoro")
        id: String,
    },
    /// Change the work length of the active preset
    Work {
        /// Work duration in minutes
        minutes: u32,
    },
    /// Add a custom preset
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Work duration in minutes
        #[arg(long)]
        work: u32,
        /// Short break in minutes
        #[arg(long = "break")]
        short_break: u32,
        /// Long break in minutes
        #[arg(long)]
        long_break: u32,
        /// Work sessions before a long break
        #[arg(long, default_value = "4")]
        every: u32,
        /// Also make it the active preset
        #[arg(long)]
        activate: bool,
    },
}

pub fn run(action: PresetAction) -> CliResult {
    let config = Config::load_or_default();
    let mut store = open_focus_store(&config)?;

    match action {
        PresetAction::List { json } => {
            let presets = store.engine().all_presets();
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                let active = &store.engine().active_preset().id;
                for preset in &presets {
                    let marker = if &preset.id == active { "*" } else { " " };
                    println!("{marker} {:<12} {:<16} {}", preset.id, preset.name, preset.summary());
                }
            }
        }
        PresetAction::Use { id } => {
            let preset = store
                .engine()
                .find_preset(&id)
                .ok_or_else(|| format!("unknown preset: {id}"))?;
            store.set_active_preset(preset);
            flush_focus(&mut store)?;
            println!("active preset: {id}");
        }
        PresetAction::Work { minutes } => {
            let preset = store.engine().active_preset().with_work_duration(minutes);
            store.set_active_preset(preset);
            flush_focus(&mut store)?;
            println!("work duration: {minutes}m");
        }
        PresetAction::Add {
            id,
            name,
            work,
            short_break,
            long_break,
            every,
            activate,
        } => {
            let preset = FocusPreset {
                id: id.clone(),
                name,
                work_duration: work,
                break_duration: short_break,
                long_break_duration: long_break,
                sessions_before_long_break: every,
            };
            store.add_custom_preset(preset.clone());
            if activate {
                store.set_active_preset(preset);
            }
            flush_focus(&mut store)?;
            println!("added preset: {id}");
        }
    }
    Ok(())
}
