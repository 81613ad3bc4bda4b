use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use clap::Subcommand;
use ergon_core::stats::format_clock;
use ergon_core::{Config, Database, Event, FocusEngine, FocusStore, TickDriver};

use super::{open_focus_store, open_settings_store, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run sessions live, one tick per configured period
    Run {
        /// Number of sessions (work or break) to run before exiting
        #[arg(long, default_value = "1")]
        cycles: u32,
        /// Begin with the break the next completion would earn
        #[arg(long = "break")]
        start_with_break: bool,
    },
    /// Print current timer state as JSON
    Status,
}

type SharedStore = Arc<Mutex<FocusStore<Database>>>;

fn lock(store: &SharedStore) -> CliResult<MutexGuard<'_, FocusStore<Database>>> {
    store
        .lock()
        .map_err(|_| -> Box<dyn std::error::Error> { "focus store lock poisoned".into() })
}

fn render(event: &Event, engine: &FocusEngine) {
    match event {
        Event::TimerStarted { session_type, duration_secs, .. } => {
            println!("{} started ({})", session_type.label(), format_clock(*duration_secs));
        }
        Event::Ticked { session_type, remaining_secs, .. } => {
            print!("\r{:<12} {}", session_type.label(), format_clock(*remaining_secs));
            let _ = std::io::stdout().flush();
        }
        Event::SessionCompleted { finished, next, completed_sessions, .. } => {
            println!(
                "\r{:<12} done at {}. Next: {} ({}) · completed pomodoros: {}",
                finished.label(),
                event.at().with_timezone(&Local).format("%H:%M"),
                next.label(),
                format_clock(engine.time_remaining()),
                completed_sessions
            );
        }
        _ => {}
    }
}

/// Block until the user presses Enter.
async fn wait_for_enter(prompt: String) -> CliResult {
    print!("{prompt}");
    std::io::stdout().flush()?;
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await??;
    Ok(())
}

async fn run_live(config: Config, cycles: u32, start_with_break: bool) -> CliResult {
    let settings = open_settings_store(&config)?.settings().clone();
    let store: SharedStore = Arc::new(Mutex::new(open_focus_store(&config)?));
    let period = config.tick_period();

    {
        let mut guard = lock(&store)?;
        if start_with_break {
            guard.skip_to_break();
        }
        guard.subscribe(render);
    }

    let mut ran = 0;
    while ran < cycles {
        lock(&store)?.start_timer();
        let driver = TickDriver::spawn(store.clone(), period);

        let interrupted = tokio::select! {
            _ = driver.finished() => false,
            _ = tokio::signal::ctrl_c() => true,
        };
        if interrupted {
            let mut guard = lock(&store)?;
            guard.pause_timer();
            let remaining = guard.engine().time_remaining();
            tracing::info!(remaining_secs = remaining, "timer run interrupted");
            println!("\ninterrupted with {} left", format_clock(remaining));
            break;
        }

        ran += 1;
        if ran == cycles {
            break;
        }
        let next = lock(&store)?.engine().current_session_type();
        if !settings.should_auto_start(next) {
            wait_for_enter(format!("press Enter to start {}", next.label())).await?;
        }
    }

    let mut guard = lock(&store)?;
    if let Err(e) = guard.flush() {
        tracing::warn!(error = %e, "failed to save focus state after run");
        return Err(e.into());
    }
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load_or_default();

    match action {
        TimerAction::Run { cycles, start_with_break } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_live(config, cycles, start_with_break))?;
        }
        TimerAction::Status => {
            let store = open_focus_store(&config)?;
            println!("{}", serde_json::to_string_pretty(&store.engine().snapshot())?);
        }
    }
    Ok(())
}
