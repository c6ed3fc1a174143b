use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::PricingPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub pricing: PricingConfig,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub operator_email: String,
    pub operator_password: SecretString,
    pub token_secret: SecretString,
    pub access_ttl_secs: u64,
}

/// Rates are configured in centimes so the TOML stays integer-only; they are
/// exposed to the pricing engine as decimal CHF.
#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub transport_rate_centimes: u32,
    pub extra_km_rate_centimes: u32,
}

impl PricingConfig {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            transport_rate: Decimal::new(i64::from(self.transport_rate_centimes), 2),
            default_extra_km_rate: Decimal::new(i64::from(self.extra_km_rate_centimes), 2),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub thinking_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub operator_email: Option<String>,
    pub operator_password: Option<String>,
    pub token_secret: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig { data_dir: PathBuf::from("data") },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            auth: AuthConfig {
                operator_email: "operator@rentora.ch".to_string(),
                operator_password: String::new().into(),
                token_secret: String::new().into(),
                access_ttl_secs: 900,
            },
            pricing: PricingConfig { transport_rate_centimes: 200, extra_km_rate_centimes: 50 },
            assistant: AssistantConfig { thinking_delay_ms: 600 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    server: Option<ServerPatch>,
    auth: Option<AuthPatch>,
    pricing: Option<PricingPatch>,
    assistant: Option<AssistantPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthPatch {
    operator_email: Option<String>,
    operator_password: Option<String>,
    token_secret: Option<String>,
    access_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    transport_rate_centimes: Option<u32>,
    extra_km_rate_centimes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct AssistantPatch {
    thinking_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("rentora.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(data_dir) = storage.data_dir {
                self.storage.data_dir = data_dir;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(auth) = patch.auth {
            if let Some(operator_email) = auth.operator_email {
                self.auth.operator_email = operator_email;
            }
            if let Some(operator_password_value) = auth.operator_password {
                self.auth.operator_password = secret_value(operator_password_value);
            }
            if let Some(token_secret_value) = auth.token_secret {
                self.auth.token_secret = secret_value(token_secret_value);
            }
            if let Some(access_ttl_secs) = auth.access_ttl_secs {
                self.auth.access_ttl_secs = access_ttl_secs;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(transport_rate_centimes) = pricing.transport_rate_centimes {
                self.pricing.transport_rate_centimes = transport_rate_centimes;
            }
            if let Some(extra_km_rate_centimes) = pricing.extra_km_rate_centimes {
                self.pricing.extra_km_rate_centimes = extra_km_rate_centimes;
            }
        }

        if let Some(assistant) = patch.assistant {
            if let Some(thinking_delay_ms) = assistant.thinking_delay_ms {
                self.assistant.thinking_delay_ms = thinking_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RENTORA_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(value);
        }

        if let Some(value) = read_env("RENTORA_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("RENTORA_SERVER_PORT") {
            self.server.port = parse_u16("RENTORA_SERVER_PORT", &value)?;
        }

        if let Some(value) = read_env("RENTORA_AUTH_OPERATOR_EMAIL") {
            self.auth.operator_email = value;
        }
        if let Some(value) = read_env("RENTORA_AUTH_OPERATOR_PASSWORD") {
            self.auth.operator_password = secret_value(value);
        }
        if let Some(value) = read_env("RENTORA_AUTH_TOKEN_SECRET") {
            self.auth.token_secret = secret_value(value);
        }
        if let Some(value) = read_env("RENTORA_AUTH_ACCESS_TTL_SECS") {
            self.auth.access_ttl_secs = parse_u64("RENTORA_AUTH_ACCESS_TTL_SECS", &value)?;
        }

        if let Some(value) = read_env("RENTORA_PRICING_TRANSPORT_RATE_CENTIMES") {
            self.pricing.transport_rate_centimes =
                parse_u32("RENTORA_PRICING_TRANSPORT_RATE_CENTIMES", &value)?;
        }
        if let Some(value) = read_env("RENTORA_PRICING_EXTRA_KM_RATE_CENTIMES") {
            self.pricing.extra_km_rate_centimes =
                parse_u32("RENTORA_PRICING_EXTRA_KM_RATE_CENTIMES", &value)?;
        }

        if let Some(value) = read_env("RENTORA_ASSISTANT_THINKING_DELAY_MS") {
            self.assistant.thinking_delay_ms =
                parse_u64("RENTORA_ASSISTANT_THINKING_DELAY_MS", &value)?;
        }

        let log_level = read_env("RENTORA_LOGGING_LEVEL").or_else(|| read_env("RENTORA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RENTORA_LOGGING_FORMAT").or_else(|| read_env("RENTORA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.storage.data_dir = data_dir;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(operator_email) = overrides.operator_email {
            self.auth.operator_email = operator_email;
        }
        if let Some(operator_password) = overrides.operator_password {
            self.auth.operator_password = secret_value(operator_password);
        }
        if let Some(token_secret) = overrides.token_secret {
            self.auth.token_secret = secret_value(token_secret);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_server(&self.server)?;
        validate_auth(&self.auth)?;
        validate_pricing(&self.pricing)?;
        validate_assistant(&self.assistant)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("rentora.toml"), PathBuf::from("config/rentora.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("storage.data_dir must not be empty".to_string()));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    Ok(())
}

fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
    if !auth.operator_email.contains('@') {
        return Err(ConfigError::Validation(
            "auth.operator_email must be an email address".to_string(),
        ));
    }
    if auth.operator_password.expose_secret().is_empty() {
        return Err(ConfigError::Validation(
            "auth.operator_password is required (set it in rentora.toml or RENTORA_AUTH_OPERATOR_PASSWORD)"
                .to_string(),
        ));
    }
    if auth.token_secret.expose_secret().len() < 16 {
        return Err(ConfigError::Validation(
            "auth.token_secret must be at least 16 characters".to_string(),
        ));
    }
    if auth.access_ttl_secs == 0 || auth.access_ttl_secs > 86_400 {
        return Err(ConfigError::Validation(
            "auth.access_ttl_secs must be in range 1..=86400".to_string(),
        ));
    }
    Ok(())
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    if pricing.transport_rate_centimes == 0 {
        return Err(ConfigError::Validation(
            "pricing.transport_rate_centimes must be greater than zero".to_string(),
        ));
    }
    if pricing.extra_km_rate_centimes == 0 {
        return Err(ConfigError::Validation(
            "pricing.extra_km_rate_centimes must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_assistant(assistant: &AssistantConfig) -> Result<(), ConfigError> {
    if assistant.thinking_delay_ms > 10_000 {
        return Err(ConfigError::Validation(
            "assistant.thinking_delay_ms must be at most 10000".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
