use std::{collections::HashMap, fs, io::ErrorKind};

use anyhow::bail;
use mailer::MailSettings;
use server_api::Organization;
use tracing::warn;

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub mail: MailSettings,
    pub organization_name: String,
    pub organization_email: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/volunteers.db".into(),
            mail: MailSettings {
                server: "smtp.gmail.com".into(),
                port: 587,
                use_tls: true,
                username: None,
                password: None,
            },
            organization_name: "Waqiatul Cares Foundation".into(),
            organization_email: None,
        }
    }
}

impl Settings {
    /// The organization address falls back to the mail account.
    pub fn organization(&self) -> anyhow::Result<Organization> {
        let Some(email) = self
            .organization_email
            .clone()
            .or_else(|| self.mail.username.clone())
        else {
            bail!("organization email is not configured; set ORGANIZATION_EMAIL or MAIL_USERNAME");
        };
        Ok(Organization {
            name: self.organization_name.clone(),
            email,
        })
    }
}

/// Missing `app.env` and `server.toml` are fine; unreadable or malformed ones are
/// reported and skipped.
pub fn load_settings() -> Settings {
    match dotenvy::from_filename("app.env") {
        Ok(_) => {}
        Err(error) if error.not_found() => {}
        Err(error) => warn!(%error, "ignoring unreadable app.env"),
    }

    let mut settings = Settings::default();
    match fs::read_to_string("server.toml") {
        Ok(raw) => {
            if let Err(error) = apply_file(&mut settings, &raw) {
                warn!(%error, "ignoring malformed server.toml");
            }
        }
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => warn!(%error, "ignoring unreadable server.toml"),
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;

    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("mail_server") {
        settings.mail.server = v.clone();
    }
    if let Some(port) = file_cfg.get("mail_port").and_then(|v| v.parse().ok()) {
        settings.mail.port = port;
    }
    if let Some(flag) = file_cfg.get("mail_use_tls").and_then(|v| parse_flag(v)) {
        settings.mail.use_tls = flag;
    }
    if let Some(v) = file_cfg.get("organization_name") {
        settings.organization_name = v.clone();
    }
    if let Some(v) = file_cfg.get("organization_email") {
        settings.organization_email = Some(v.clone());
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let lookup = |plain: &str, prefixed: &str| var(prefixed).or_else(|| var(plain));

    if let Some(v) = lookup("SERVER_BIND", "APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("DATABASE_URL", "APP__DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("MAIL_SERVER", "APP__MAIL_SERVER") {
        settings.mail.server = v;
    }
    if let Some(port) = lookup("MAIL_PORT", "APP__MAIL_PORT").and_then(|v| v.parse().ok()) {
        settings.mail.port = port;
    }
    if let Some(flag) = lookup("MAIL_USE_TLS", "APP__MAIL_USE_TLS").and_then(|v| parse_flag(&v)) {
        settings.mail.use_tls = flag;
    }
    if let Some(v) = lookup("MAIL_USERNAME", "APP__MAIL_USERNAME") {
        settings.mail.username = Some(v);
    }
    if let Some(v) = lookup("MAIL_PASSWORD", "APP__MAIL_PASSWORD") {
        settings.mail.password = Some(v);
    }
    if let Some(v) = lookup("ORGANIZATION_NAME", "APP__ORGANIZATION_NAME") {
        settings.organization_name = v;
    }
    if let Some(v) = lookup("ORGANIZATION_EMAIL", "APP__ORGANIZATION_EMAIL") {
        settings.organization_email = Some(v);
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Turns a bare path into a `sqlite://` URL. `Storage::new` creates the parent directory.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
