use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absent means accounts are kept in memory
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { http_port: 8000 }
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: default_jwt_algorithm(),
            expiration_minutes: default_expiration_minutes(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    #[serde(default = "default_hashing_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    /// Upper bound on hash/verify operations running at once
    #[serde(default)]
    pub max_concurrent: Option<usize>,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: default_hashing_algorithm(),
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
            max_concurrent: None,
        }
    }
}

impl HashingConfig {
    pub fn params(&self) -> auth::HashingConfig {
        auth::HashingConfig {
            algorithm: self.algorithm.clone(),
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }

    pub fn permits(&self) -> usize {
        self.max_concurrent
            .filter(|n| *n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration_minutes() -> i64 {
    30
}

fn default_hashing_algorithm() -> String {
    "argon2id".to_string()
}

fn default_memory_kib() -> u32 {
    auth::HashingConfig::default().memory_kib
}

fn default_iterations() -> u32 {
    auth::HashingConfig::default().iterations
}

fn default_parallelism() -> u32 {
    auth::HashingConfig::default().parallelism
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__EXPIRATION_MINUTES=60 overrides jwt.expiration_minutes
            .add_source(environment())
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// Environment overrides stay strings until deserialization, so
/// `JWT__SECRET=000123` is read back exactly as written.
fn environment() -> Environment {
    Environment::default().separator("__")
}
