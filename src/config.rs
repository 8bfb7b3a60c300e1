use crate::error::ConfigError;
use crate::protection::block_types::{default_block_types, ProtectedBlockType};
use crate::protection::guard::Guard;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub events_path: Option<PathBuf>,
    pub guard: GuardConfig,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        if args.len() < 2 || args.len() > 3 {
            return Err(ConfigError::Usage);
        }
        let config_path = Path::new(&args[1]).to_path_buf();
        let events_path = args
            .get(2)
            .filter(|value| value.as_str() != "-")
            .map(PathBuf::from);
        let mut guard = GuardConfig::load(&config_path)?;
        if let Some(data_dir) = env_value("BLOCKGUARD_DATA_DIR") {
            guard.data_dir = PathBuf::from(data_dir);
        }
        guard.validate()?;
        Ok(Self {
            config_path,
            events_path,
            guard,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub audit_log: Option<PathBuf>,
    pub protect_from_non_players: bool,
    pub operators: Vec<String>,
    pub block_types: Vec<ProtectedBlockType>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("kubejs/data"),
            log_level: "info".to_string(),
            audit_log: None,
            protect_from_non_players: false,
            operators: vec![
                "ashbee404".to_string(),
                "neopreda".to_string(),
                "twisted974".to_string(),
            ],
            block_types: default_block_types(),
        }
    }
}

impl GuardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_types.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one block type is required".to_string(),
            ));
        }
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for block_type in &self.block_types {
            if block_type.name.trim().is_empty() {
                return Err(ConfigError::Invalid("block type with empty name".to_string()));
            }
            if !names.insert(block_type.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate block type name '{}'",
                    block_type.name
                )));
            }
            if block_type.ids.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "block type '{}' lists no block ids",
                    block_type.name
                )));
            }
            for id in &block_type.ids {
                if !ids.insert(id.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "block id '{}' is listed by more than one block type",
                        id
                    )));
                }
            }
            if block_type.placed_message.is_empty() || block_type.denied_message.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "block type '{}' needs both placed_message and denied_message",
                    block_type.name
                )));
            }
        }
        Ok(())
    }

    pub fn build_guard(&self) -> Guard {
        Guard::new(self.block_types.clone(), &self.operators, &self.data_dir)
            .with_non_player_protection(self.protect_from_non_players)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
