use serde::{Deserialize, Serialize};
use std::{fs::File, io, path::PathBuf};

use crate::{cmd::GlobalArgs, util};

pub const APP_NAME: &str = "bmk";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Bearer token sent to the grading server.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl GlobalConfig {
    pub const FILENAME: &str = "bmk.toml";
    pub const TOKEN_ENV_VAR: &str = "BATCHMARK_TOKEN";

    pub fn filepath() -> PathBuf {
        let dir = dirs::config_dir().expect("Failed to get user's config dir path");
        dir.join(APP_NAME).join(Self::FILENAME)
    }

    pub fn from_file_or_default() -> Self {
        let path = Self::filepath();
        let toml_str = match File::open(&path).and_then(io::read_to_string) {
            Ok(toml) => toml,
            _ => return GlobalConfig::default(),
        };
        toml::from_str(&toml_str).unwrap_or_else(|e| {
            log::error!(
                "Invalid config '{:?}': {:#}",
                util::replace_homedir_to_tilde(path),
                e
            );
            std::process::exit(1)
        })
    }

    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var(Self::TOKEN_ENV_VAR) {
            self.auth_token = Some(token);
        }
        self
    }

    pub fn with_args(mut self, args: &GlobalArgs) -> Self {
        let GlobalArgs { subcmd: _, token } = args;

        token.as_ref().map(|t| self.auth_token = Some(t.clone()));
        self
    }

    pub fn from_file_and_args(args: &GlobalArgs) -> Self {
        Self::from_file_or_default().with_env().with_args(args)
    }
}
