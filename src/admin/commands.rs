use crate::error::EventParseError;
use crate::events::parse_position_args;
use crate::protection::guard::Guard;
use crate::world::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Owner { position: Position },
    Release { position: Position },
    Unknown(String),
}

pub fn parse_admin_command(message: &str) -> Result<Option<AdminCommand>, EventParseError> {
    let trimmed = message.trim();
    let Some(body) = trimmed.strip_prefix('!') else {
        return Ok(None);
    };

    let mut parts = body.split_whitespace();
    let command = parts
        .next()
        .ok_or(EventParseError::Missing("admin command name"))?
        .to_ascii_lowercase();
    let parsed = match command.as_str() {
        "owner" | "who" => AdminCommand::Owner {
            position: parse_position_args(&mut parts)?,
        },
        "release" | "unclaim" => AdminCommand::Release {
            position: parse_position_args(&mut parts)?,
        },
        _ => AdminCommand::Unknown(command),
    };
    if let Some(extra) = parts.next() {
        return Err(EventParseError::Trailing(extra.to_string()));
    }
    Ok(Some(parsed))
}

/// Runs a command on behalf of `actor` and returns the reply for them.
pub fn execute_admin_command(guard: &Guard, actor: &str, command: &AdminCommand) -> String {
    match command {
        AdminCommand::Owner { position } => {
            let owners = guard.owners_at(*position);
            if owners.is_empty() {
                return format!("{position}: unowned");
            }
            let listed: Vec<String> = owners
                .iter()
                .map(|(block_type, owner)| format!("{block_type}={owner}"))
                .collect();
            format!("{position}: {}", listed.join(", "))
        }
        AdminCommand::Release { position } => {
            if !guard.is_operator(actor) {
                log::warn!("{} tried to release {} without operator rights", actor, position);
                return "§cOnly operators may release protected blocks.".to_string();
            }
            match guard.release_at(*position, actor) {
                0 => format!("{position}: nothing to release"),
                count => format!("{position}: released {count} protected block type(s)"),
            }
        }
        AdminCommand::Unknown(name) => format!("unknown command '!{name}'"),
    }
}
