pub mod admin;
mod config;
pub mod error;
pub mod events;
pub mod persistence;
pub mod protection;
pub mod telemetry;
pub mod world;

pub use config::{AppConfig, GuardConfig};
pub use error::{AppError, ConfigError, EventParseError, StoreError};
pub use events::{parse_event_line, Actor, BlockEvent, EventKind, EventOutcome};
pub use protection::block_types::{default_block_types, Footprint, ProtectedBlockType};
pub use protection::guard::{Decision, Guard, Intent};
pub use protection::registry::OwnershipRegistry;
pub use world::position::Position;

use std::io::{BufRead, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub cancelled: usize,
    pub commands: usize,
    pub errors: usize,
}

pub fn run(args: &[String]) -> Result<(), AppError> {
    let config = AppConfig::from_args(args)?;
    telemetry::logging::init(&config.guard.log_level, config.guard.audit_log.as_deref())
        .map_err(AppError::Logging)?;
    let guard = config.guard.build_guard();
    log::info!(
        "blockguard: {} protected block types, data in {}, config {}",
        guard.block_types().len(),
        config.guard.data_dir.display(),
        config.config_path.display()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = match config.events_path.as_ref() {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|source| AppError::Input {
                path: path.display().to_string(),
                source,
            })?;
            replay(&guard, std::io::BufReader::new(file), &mut out)
        }
        None => replay(&guard, std::io::stdin().lock(), &mut out),
    }
    .map_err(AppError::Output)?;
    log::info!(
        "blockguard: replayed {} events ({} cancelled), {} commands, {} errors",
        summary.events,
        summary.cancelled,
        summary.commands,
        summary.errors
    );
    Ok(())
}

/// Feeds event lines through the guard, writing one decision line per input.
pub fn replay<R: BufRead, W: Write>(
    guard: &Guard,
    input: R,
    out: &mut W,
) -> std::io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((actor, message)) = split_command(trimmed) {
            summary.commands += 1;
            match admin::commands::parse_admin_command(message) {
                Ok(Some(command)) => {
                    let reply = admin::commands::execute_admin_command(guard, actor, &command);
                    writeln!(out, "reply: {reply}")?;
                }
                Ok(None) => {}
                Err(err) => {
                    summary.errors += 1;
                    writeln!(out, "error: {err}")?;
                }
            }
            continue;
        }
        match parse_event_line(trimmed) {
            Ok(event) => {
                summary.events += 1;
                let outcome = guard.handle(&event);
                if outcome.cancelled {
                    summary.cancelled += 1;
                }
                writeln!(out, "{}", format_outcome(&outcome))?;
            }
            Err(err) => {
                summary.errors += 1;
                log::warn!("skipping event line '{}': {}", trimmed, err);
                writeln!(out, "error: {err}")?;
            }
        }
    }
    out.flush()?;
    Ok(summary)
}

/// `<actor> !command ...`
fn split_command(line: &str) -> Option<(&str, &str)> {
    let (actor, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    rest.starts_with('!').then_some((actor, rest))
}

fn format_outcome(outcome: &EventOutcome) -> String {
    match (outcome.cancelled, outcome.message.as_deref()) {
        (true, Some(message)) => format!("cancel: {message}"),
        (true, None) => "cancel".to_string(),
        (false, Some(message)) => format!("allow: {message}"),
        (false, None) => "allow".to_string(),
    }
}
