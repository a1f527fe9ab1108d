use log::*;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_POOL_SIZE: u32 = 5;

/**
 * Runtime configuration, read from the environment (and `.env` via dotenv)
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /**
     * Without a database url the service keeps its questions in memory
     */
    pub database_url: Option<String>,
    pub listen_addr: String,
    pub pool_size: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid DB_POOL_SIZE {:?}, using {}", raw, DEFAULT_POOL_SIZE);
                DEFAULT_POOL_SIZE
            }),
            None => DEFAULT_POOL_SIZE,
        };

        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            pool_size,
        }
    }
}
