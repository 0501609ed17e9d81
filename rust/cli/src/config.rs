use serde::{Deserialize, Serialize};
use std::fs;

use holdem_engine::deck::shuffled;
use holdem_engine::game::{Blind, GameOptions};

/// Largest table the CLI will seat.
pub const MAX_PLAYERS: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Standard,
    Short,
}

impl Variant {
    fn parse(s: &str) -> Option<Variant> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Some(Variant::Standard),
            "short" => Some(Variant::Short),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub ante: i64,
    pub sb: i64,
    pub bb: i64,
    pub variant: Variant,
    pub players: usize,
    pub bankroll: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub ante: ValueSource,
    pub sb: ValueSource,
    pub bb: ValueSource,
    pub variant: ValueSource,
    pub players: ValueSource,
    pub bankroll: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            ante: ValueSource::Default,
            sb: ValueSource::Default,
            bb: ValueSource::Default,
            variant: ValueSource::Default,
            players: ValueSource::Default,
            bankroll: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            ante: 0,
            sb: 5,
            bb: 10,
            variant: Variant::Standard,
            players: 2,
            bankroll: 1_000,
        }
    }
}

impl Config {
    /// Engine options for one hand dealt from a deck shuffled with `seed`.
    pub fn to_options(&self, seed: u64) -> GameOptions {
        let base = match self.variant {
            Variant::Standard => GameOptions::standard(),
            Variant::Short => GameOptions::short_deck(),
        };
        let mut options = base.with_seats(self.players, self.bankroll);
        options.ante = self.ante;
        options.blind = Blind {
            dealer: 0,
            sb: self.sb,
            bb: self.bb,
        };
        options.deck = shuffled(options.deck, seed);
        options
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `HOLDEM_CONFIG`, then `HOLDEM_*`
/// environment overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.ante {
            cfg.ante = v;
            sources.ante = ValueSource::File;
        }
        if let Some(v) = f.sb {
            cfg.sb = v;
            sources.sb = ValueSource::File;
        }
        if let Some(v) = f.bb {
            cfg.bb = v;
            sources.bb = ValueSource::File;
        }
        if let Some(v) = f.variant {
            cfg.variant = v;
            sources.variant = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.bankroll {
            cfg.bankroll = v;
            sources.bankroll = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("HOLDEM_SEED") {
        cfg.seed = Some(parse_env("HOLDEM_SEED", &seed)?);
        sources.seed = ValueSource::Env;
    }
    if let Some(ante) = env_value("HOLDEM_ANTE") {
        cfg.ante = parse_env("HOLDEM_ANTE", &ante)?;
        sources.ante = ValueSource::Env;
    }
    if let Some(sb) = env_value("HOLDEM_SB") {
        cfg.sb = parse_env("HOLDEM_SB", &sb)?;
        sources.sb = ValueSource::Env;
    }
    if let Some(bb) = env_value("HOLDEM_BB") {
        cfg.bb = parse_env("HOLDEM_BB", &bb)?;
        sources.bb = ValueSource::Env;
    }
    if let Some(variant) = env_value("HOLDEM_VARIANT") {
        cfg.variant = Variant::parse(&variant).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid HOLDEM_VARIANT '{}': expected standard or short",
                variant
            ))
        })?;
        sources.variant = ValueSource::Env;
    }
    if let Some(players) = env_value("HOLDEM_PLAYERS") {
        cfg.players = parse_env("HOLDEM_PLAYERS", &players)?;
        sources.players = ValueSource::Env;
    }
    if let Some(bankroll) = env_value("HOLDEM_BANKROLL") {
        cfg.bankroll = parse_env("HOLDEM_BANKROLL", &bankroll)?;
        sources.bankroll = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    ante: Option<i64>,
    #[serde(default)]
    sb: Option<i64>,
    #[serde(default)]
    bb: Option<i64>,
    #[serde(default)]
    variant: Option<Variant>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    bankroll: Option<i64>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {} '{}'", key, raw)))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.players < 2 || cfg.players > MAX_PLAYERS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be between 2 and {}",
            MAX_PLAYERS
        )));
    }
    if cfg.bankroll <= 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: bankroll must be >0".into(),
        ));
    }
    if cfg.ante < 0 || cfg.sb < 0 || cfg.bb < 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: ante and blinds must be >=0".into(),
        ));
    }
    Ok(())
}
