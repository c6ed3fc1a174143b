use std::env;

use rentora_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;

/// Effective configuration dump with secrets redacted. Values set through a
/// `RENTORA_*` environment variable are marked, since those silently win
/// over the file.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let mut lines =
        vec!["effective config (source precedence: overrides > env > file > default):".to_string()];

    lines.push(render_line(
        "storage.data_dir",
        &config.storage.data_dir.display().to_string(),
        "RENTORA_DATA_DIR",
    ));
    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        "RENTORA_SERVER_BIND_ADDRESS",
    ));
    lines.push(render_line("server.port", &config.server.port.to_string(), "RENTORA_SERVER_PORT"));
    lines.push(render_line(
        "auth.operator_email",
        &config.auth.operator_email,
        "RENTORA_AUTH_OPERATOR_EMAIL",
    ));
    lines.push(render_line(
        "auth.operator_password",
        &redact(config.auth.operator_password.expose_secret()),
        "RENTORA_AUTH_OPERATOR_PASSWORD",
    ));
    lines.push(render_line(
        "auth.token_secret",
        &redact(config.auth.token_secret.expose_secret()),
        "RENTORA_AUTH_TOKEN_SECRET",
    ));
    lines.push(render_line(
        "auth.access_ttl_secs",
        &config.auth.access_ttl_secs.to_string(),
        "RENTORA_AUTH_ACCESS_TTL_SECS",
    ));
    lines.push(render_line(
        "pricing.transport_rate_centimes",
        &config.pricing.transport_rate_centimes.to_string(),
        "RENTORA_PRICING_TRANSPORT_RATE_CENTIMES",
    ));
    lines.push(render_line(
        "pricing.extra_km_rate_centimes",
        &config.pricing.extra_km_rate_centimes.to_string(),
        "RENTORA_PRICING_EXTRA_KM_RATE_CENTIMES",
    ));
    lines.push(render_line(
        "assistant.thinking_delay_ms",
        &config.assistant.thinking_delay_ms.to_string(),
        "RENTORA_ASSISTANT_THINKING_DELAY_MS",
    ));
    lines.push(render_line("logging.level", &config.logging.level, "RENTORA_LOGGING_LEVEL"));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_lowercase(),
        "RENTORA_LOGGING_FORMAT",
    ));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, env_key: &str) -> String {
    let source = if env_is_set(env_key) { format!(" (from {env_key})") } else { String::new() };
    format!("  {key} = {value}{source}")
}

fn env_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "<unset>".to_string()
    } else {
        format!("<redacted:{} chars>", secret.len())
    }
}
