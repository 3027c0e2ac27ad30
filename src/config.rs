use std::env;
use std::io;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub seed_sample_elections: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed_sample_elections: true,
        }
    }
}

impl Config {
    /// Reads `SERVER_HOST`, `SERVER_PORT` and `SEED_SAMPLE_ELECTIONS`.
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("SERVER_HOST").unwrap_or(defaults.host);

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("SERVER_PORT must be a valid u16, got {:?}", raw),
                )
            })?,
            None => defaults.port,
        };

        let seed_sample_elections = match lookup("SEED_SAMPLE_ELECTIONS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("SEED_SAMPLE_ELECTIONS must be a boolean, got {:?}", raw),
                )
            })?,
            None => defaults.seed_sample_elections,
        };

        Ok(Config {
            host,
            port,
            seed_sample_elections,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
