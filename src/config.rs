use crate::error::GameError;

/// Default blind sizes and stack depth, declared next to the other
/// startup defaults below.
pub const DEFAULT_PLAYERS_PER_GAME: usize = 2;
pub const DEFAULT_STARTING_CHIPS: i64 = 1000;
pub const DEFAULT_SMALL_BLIND: i64 = 10;
pub const DEFAULT_BIG_BLIND: i64 = 20;
pub const DEFAULT_SNAPSHOT_INTERVAL_EVENTS: u64 = 50;
pub const DEFAULT_GRACE_SHUTDOWN_MS: u64 = 3_000;

/// Startup configuration the core recognizes. Transport, auth, and
/// persistence backends read this struct but are not part of it.
#[derive(Debug, Clone)]
pub struct Config {
    pub players_per_game: usize,
    pub starting_chips: i64,
    pub small_blind: i64,
    pub big_blind: i64,
    pub snapshot_interval_events: u64,
    pub token_secret: Vec<u8>,
    pub grace_shutdown_ms: u64,
}

impl Config {
    /// Reads overrides from the environment, falling back to the
    /// defaults declared above. `TOKEN_SECRET` is required: a missing
    /// or empty secret is a startup error, never a silent default.
    pub fn from_env() -> Result<Self, GameError> {
        let env_usize = |key: &str, default: usize| -> Result<usize, GameError> {
            match std::env::var(key) {
                Ok(v) => v
                    .parse()
                    .map_err(|_| GameError::InvalidInput(format!("{key} must be an integer"))),
                Err(_) => Ok(default),
            }
        };
        let env_i64 = |key: &str, default: i64| -> Result<i64, GameError> {
            match std::env::var(key) {
                Ok(v) => v
                    .parse()
                    .map_err(|_| GameError::InvalidInput(format!("{key} must be an integer"))),
                Err(_) => Ok(default),
            }
        };
        let env_u64 = |key: &str, default: u64| -> Result<u64, GameError> {
            match std::env::var(key) {
                Ok(v) => v
                    .parse()
                    .map_err(|_| GameError::InvalidInput(format!("{key} must be an integer"))),
                Err(_) => Ok(default),
            }
        };
        let token_secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| GameError::InvalidInput("TOKEN_SECRET must be set".into()))?
            .into_bytes();
        if token_secret.is_empty() {
            return Err(GameError::InvalidInput("TOKEN_SECRET must not be empty".into()));
        }
        let config = Self {
            players_per_game: env_usize("PLAYERS_PER_GAME", DEFAULT_PLAYERS_PER_GAME)?,
            starting_chips: env_i64("STARTING_CHIPS", DEFAULT_STARTING_CHIPS)?,
            small_blind: env_i64("SMALL_BLIND", DEFAULT_SMALL_BLIND)?,
            big_blind: env_i64("BIG_BLIND", DEFAULT_BIG_BLIND)?,
            snapshot_interval_events: env_u64(
                "SNAPSHOT_INTERVAL_EVENTS",
                DEFAULT_SNAPSHOT_INTERVAL_EVENTS,
            )?,
            token_secret,
            grace_shutdown_ms: env_u64("GRACE_SHUTDOWN_MS", DEFAULT_GRACE_SHUTDOWN_MS)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(2..=10).contains(&self.players_per_game) {
            return Err(GameError::InvalidInput(
                "players_per_game must be between 2 and 10".into(),
            ));
        }
        if self.big_blind <= self.small_blind {
            return Err(GameError::InvalidInput(
                "big_blind must be greater than small_blind".into(),
            ));
        }
        if self.small_blind <= 0 || self.starting_chips <= 0 {
            return Err(GameError::InvalidInput(
                "small_blind and starting_chips must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// CLI overlay for local/manual runs. Any flag left unset falls back
/// to the environment/default value already resolved into `Config`.
#[cfg(feature = "server")]
#[derive(Debug, clap::Parser)]
#[command(name = "shortstack", about = "Short-deck hold'em game server core")]
pub struct Cli {
    #[arg(long)]
    pub players_per_game: Option<usize>,
    #[arg(long)]
    pub starting_chips: Option<i64>,
    #[arg(long)]
    pub small_blind: Option<i64>,
    #[arg(long)]
    pub big_blind: Option<i64>,
}

#[cfg(feature = "server")]
impl Cli {
    pub fn overlay(self, mut config: Config) -> Result<Config, GameError> {
        if let Some(v) = self.players_per_game {
            config.players_per_game = v;
        }
        if let Some(v) = self.starting_chips {
            config.starting_chips = v;
        }
        if let Some(v) = self.small_blind {
            config.small_blind = v;
        }
        if let Some(v) = self.big_blind {
            config.big_blind = v;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            players_per_game: 6,
            starting_chips: 1000,
            small_blind: 10,
            big_blind: 20,
            snapshot_interval_events: 50,
            token_secret: vec![1, 2, 3],
            grace_shutdown_ms: 3000,
        }
    }

    #[test]
    fn rejects_big_blind_not_greater_than_small_blind() {
        let mut config = base();
        config.big_blind = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_table_size() {
        let mut config = base();
        config.players_per_game = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_valid_config() {
        assert!(base().validate().is_ok());
    }
}
