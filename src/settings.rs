use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_INPUT: &str = "pu-fal07-c8.xml";
pub const DEFAULT_OUT_DIR: &str = "out_csv";

/// Where to read from and where to write to. Defaults are relative to the
/// working directory; `TTCSV_INPUT` / `TTCSV_OUT_DIR` override them, and CLI
/// flags override both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub input: PathBuf,
    pub out_dir: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("TTCSV"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("input", DEFAULT_INPUT)?
            .set_default("out_dir", DEFAULT_OUT_DIR)?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn with_overrides(mut self, input: Option<PathBuf>, out_dir: Option<PathBuf>) -> Self {
        if let Some(input) = input {
            self.input = input;
        }
        if let Some(out_dir) = out_dir {
            self.out_dir = out_dir;
        }
        self
    }
}
