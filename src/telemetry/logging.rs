use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

const LOG_ENV: &str = "BLOCKGUARD_LOG";
const HEADER_LINE: &str = "-------------------------------------------------------------------------------";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global logger. `BLOCKGUARD_LOG` overrides `level`; with an
/// audit file every line is appended there instead of stderr.
pub fn init(level: &str, audit_log: Option<&Path>) -> Result<(), String> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, level));
    builder.format_timestamp_secs();

    if let Some(path) = audit_log {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("audit log directory create failed: {}", err))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| format!("open audit log {} failed: {}", path.display(), err))?;
        if file.metadata().map(|m| m.len()).unwrap_or(0) == 0 {
            writeln!(file, "{HEADER_LINE}\nblockguard protection audit\n{HEADER_LINE}")
                .map_err(|err| format!("audit log header write failed: {}", err))?;
        }
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|err| format!("logger already installed: {}", err))?;
    let _ = INITIALIZED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_header_and_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log").join("protection.log");
        init("info", Some(&path)).expect("init");
        init("debug", None).expect("second init is a no-op");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.starts_with(HEADER_LINE));
        assert!(contents.contains("blockguard protection audit"));
    }
}
