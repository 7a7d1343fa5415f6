//! Environment and flag configuration.
//!
//! The API credential is environment-only. The save directory resolves in
//! order: `--save-dir` flag, `TALEWEAVER_SAVE_DIR`, the platform data dir.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;

use tw_engine::DEFAULT_MODEL;

/// Environment variable holding the Gemini API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the save directory.
pub const SAVE_DIR_VAR: &str = "TALEWEAVER_SAVE_DIR";

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(
    name = "taleweaver",
    about = "An LLM-narrated text adventure in the terminal",
    version
)]
pub struct Args {
    /// Gemini model to narrate with
    #[arg(long)]
    pub model: Option<String>,

    /// Directory to keep saves in (overrides TALEWEAVER_SAVE_DIR)
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The Gemini API credential.
    pub api_key: String,
    /// Model name passed to the generation endpoint.
    pub model: String,
    /// Root directory for saves and the log file.
    pub save_dir: PathBuf,
}

impl Config {
    /// Resolve configuration from flags and the process environment.
    ///
    /// A missing credential is startup-fatal; the error text names the
    /// variable and where to obtain a key.
    pub fn from_env(args: &Args) -> Result<Self, String> {
        Self::resolve(args, env::var(API_KEY_VAR).ok(), env::var(SAVE_DIR_VAR).ok())
    }

    fn resolve(
        args: &Args,
        api_key: Option<String>,
        save_dir_var: Option<String>,
    ) -> Result<Self, String> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                format!(
                    "{API_KEY_VAR} is not set.\n\n\
                     Taleweaver needs a Gemini API key to narrate the game.\n\
                     Get one at https://aistudio.google.com/apikey, then run:\n\n\
                     \x20   export {API_KEY_VAR}=<your key>"
                )
            })?;

        let save_dir = args
            .save_dir
            .clone()
            .or(save_dir_var.map(PathBuf::from))
            .unwrap_or_else(default_save_dir);

        Ok(Self {
            api_key,
            model: args.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            save_dir,
        })
    }
}

fn default_save_dir() -> PathBuf {
    ProjectDirs::from("", "", "taleweaver")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from(".taleweaver-saves"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_flags() -> Args {
        Args {
            model: None,
            save_dir: None,
        }
    }

    #[test]
    fn missing_api_key_names_the_variable() {
        let err = Config::resolve(&no_flags(), None, None).unwrap_err();
        assert!(err.contains(API_KEY_VAR));
        assert!(err.contains("export"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(Config::resolve(&no_flags(), Some("   ".to_string()), None).is_err());
    }

    #[test]
    fn model_defaults_when_flag_absent() {
        let config = Config::resolve(&no_flags(), Some("key".to_string()), None).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn model_flag_wins() {
        let args = Args {
            model: Some("gemini-2.5-pro".to_string()),
            save_dir: None,
        };
        let config = Config::resolve(&args, Some("key".to_string()), None).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn save_dir_flag_beats_env_var() {
        let args = Args {
            model: None,
            save_dir: Some(PathBuf::from("/tmp/flagged")),
        };
        let config = Config::resolve(
            &args,
            Some("key".to_string()),
            Some("/tmp/from-env".to_string()),
        )
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("/tmp/flagged"));
    }

    #[test]
    fn save_dir_env_var_used_without_flag() {
        let config = Config::resolve(
            &no_flags(),
            Some("key".to_string()),
            Some("/tmp/from-env".to_string()),
        )
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("/tmp/from-env"));
    }
}
