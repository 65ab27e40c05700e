use crate::error::CoreError;
use std::env;

pub const DEFAULT_DATABASE_PATH: &str = "data.db";
pub const DEFAULT_API_PORT: u16 = 8080;

/// Resolved process configuration, built once in `main` and passed by
/// reference to everything that needs it.
#[derive(Clone, Debug)]
pub struct Config {
    pub summoner_id: String,
    pub database_path: String,
    pub api_port: u16,
}

impl Config {
    /// # Errors
    ///
    /// Will return `Err` if `SUMMONER_ID` is missing or `API_PORT` is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, CoreError> {
        let summoner_id = env::var("SUMMONER_ID")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CoreError::Config("SUMMONER_ID is not set".to_string()))?;

        let database_path = env::var("DATABASE_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let api_port = match env::var("API_PORT").ok().filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .map_err(|_| CoreError::Config(format!("API_PORT is not a valid port: {raw}")))?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            summoner_id,
            database_path,
            api_port,
        })
    }
}
