use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Typed configuration loaded from the environment (with `.env` support).
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot credential. Required; startup fails without it.
    pub bot_token: String,

    /// Local catalog file written by the upstream pipeline.
    pub catalog_file: PathBuf,
    /// Optional remote catalog endpoint; takes precedence over the file.
    pub catalog_url: Option<String>,

    /// Directory for exported text files.
    pub cards_dir: PathBuf,
    /// Directory for the JSON sidecar written alongside each export.
    pub output_dir: PathBuf,

    /// Button labels longer than this are truncated with an ellipsis.
    pub button_label_max_length: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let catalog_file =
            env_path("CATALOG_FILE").unwrap_or_else(|| PathBuf::from("collocations.json"));
        let catalog_url = env_str("CATALOG_URL").and_then(non_empty);

        let cards_dir = env_path("CARDS_DIR").unwrap_or_else(|| PathBuf::from("cards"));
        let output_dir = env_path("OUTPUT_DIR").unwrap_or_else(|| PathBuf::from("."));

        let button_label_max_length = env_usize("BUTTON_LABEL_MAX_LENGTH").unwrap_or(40);

        // Ensure the export directory exists up front so the first save
        // does not race directory creation with the sidecar write.
        fs::create_dir_all(&cards_dir)?;

        Ok(Self {
            bot_token,
            catalog_file,
            catalog_url,
            cards_dir,
            output_dir,
            button_label_max_length,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
