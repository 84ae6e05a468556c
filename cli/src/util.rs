use std::{
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use batchmark_core::Config;
use batchmark_webclient::Client;

use crate::{cmd::GlobalArgs, config::GlobalConfig};

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

pub fn replace_homedir_to_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Some(home_dir) = ::dirs::home_dir() else {
        return path
    };
    path.strip_prefix(home_dir)
        .map(|path| Path::new("~").join(path))
        .unwrap_or(path)
}

pub fn build_client(cfg: &Config, global_args: &GlobalArgs) -> Arc<dyn Client> {
    let global_cfg = GlobalConfig::from_file_and_args(global_args);
    batchmark_webclient::new_client(cfg.server.base_url.clone(), global_cfg.auth_token)
}

/// "0 Bytes", "1.5 KB", "2 MB". Two decimals with trailing zeros trimmed.
pub fn format_file_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let value = format!("{:.2}", value);
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", value, UNITS[exp])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_sizes_are_humanized() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3 MB");
    }
}
