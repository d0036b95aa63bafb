// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plantwise.toml` > `~/.config/plantwise/plantwise.toml`
//! > `/etc/plantwise/plantwise.toml`, with environment variable overrides via the
//! `PLANTWISE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PlantwiseConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG: &str = "/etc/plantwise/plantwise.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG: &str = "plantwise.toml";

/// Sections that environment variables may address.
const ENV_SECTIONS: [&str; 6] = [
    "assistant",
    "gemini",
    "retrieval",
    "guardrail",
    "audit",
    "session",
];

/// `~/.config/plantwise/plantwise.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plantwise/plantwise.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plantwise/plantwise.toml`
/// 3. `~/.config/plantwise/plantwise.toml`
/// 4. `./plantwise.toml`
/// 5. `PLANTWISE_*` environment variables
pub fn load_config() -> Result<PlantwiseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PlantwiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlantwiseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlantwiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlantwiseConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlantwiseConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `PLANTWISE_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PLANTWISE_SESSION_RETRY_WINDOW_SECS` must become
/// `session.retry_window_secs`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PLANTWISE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("gemini_api_key"), "gemini.api_key");
        assert_eq!(
            map_env_key("session_retry_window_secs"),
            "session.retry_window_secs"
        );
        assert_eq!(map_env_key("audit_capacity"), "audit.capacity");
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("telemetry_url"), "telemetry_url");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[gemini]\nmodel = \"from-file\"\n")?;
            jail.set_env("PLANTWISE_GEMINI_MODEL", "from-env");
            jail.set_env("PLANTWISE_AUDIT_CAPACITY", "12");
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.gemini.model, "from-env");
            assert_eq!(config.audit.capacity, 12);
            Ok(())
        });
    }
}
