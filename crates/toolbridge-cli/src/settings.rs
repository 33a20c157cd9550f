//! Layered server configuration
//!
//! Sources, lowest priority first:
//!
//! 1. a config file: `--config <path>`, else `<config dir>/toolbridge/config.{toml,yaml,json}` if present
//! 2. `TOOLBRIDGE_*` environment variables (`TOOLBRIDGE_SERVER_URL`,
//!    `TOOLBRIDGE_AUTH_TYPE`, `TOOLBRIDGE_TIMEOUT`,
//!    `TOOLBRIDGE_AUTH_CREDENTIALS__BEARER_TOKEN`, ...)
//! 3. command-line flags

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use toolbridge_client::ServerConfig;

use crate::cli::ConnectionArgs;
use crate::error::CliResult;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TOOLBRIDGE";

/// Default config file location, without extension.
pub fn default_config_stem() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("toolbridge").join("config"))
}

/// Load the server configuration from the process environment.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or the merged values
/// do not form a [`ServerConfig`].
pub fn load(config_file: Option<&Path>, overrides: &ConnectionArgs) -> CliResult<ServerConfig> {
    load_with_env(config_file, overrides, None)
}

/// Load the server configuration, reading environment variables from `env`
/// instead of the process when given.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(
    config_file: Option<&Path>,
    overrides: &ConnectionArgs,
    env: Option<HashMap<String, String>>,
) -> CliResult<ServerConfig> {
    let mut builder = Config::builder();

    builder = match config_file {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => match default_config_stem() {
            Some(stem) => builder.add_source(File::with_name(&stem.to_string_lossy()).required(false)),
            None => builder,
        },
    };

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let config = apply_overrides(builder, overrides)?.build()?;
    Ok(config.try_deserialize()?)
}

fn apply_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    args: &ConnectionArgs,
) -> CliResult<ConfigBuilder<DefaultState>> {
    if let Some(url) = &args.url {
        builder = builder.set_override("server_url", url.as_str())?;
    }
    if let Some(auth_type) = args.auth_type {
        builder = builder.set_override("auth_type", auth_type.as_str())?;
    }
    if let Some(timeout) = args.timeout {
        builder = builder.set_override("timeout", i64::from(timeout))?;
    }

    let credentials = [
        ("bearer_token", &args.token),
        ("api_key", &args.api_key),
        ("api_key_header", &args.api_key_header),
        ("username", &args.username),
        ("password", &args.password),
    ];
    for (key, value) in credentials {
        if let Some(value) = value {
            builder = builder.set_override(format!("auth_credentials.{key}"), value.as_str())?;
        }
    }

    Ok(builder)
}
