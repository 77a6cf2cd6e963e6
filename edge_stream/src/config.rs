// THEORY:
// Batch configuration, loadable from TOML. Every field has a default, so a file
// only names what it changes:
//
//   input_dir = "frames"
//   output_dir = "edges"
//   workers = 4
//
//   [pipeline]
//   mode = "staged"
//   channel_capacity = 256

use crate::error::EdgeError;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PREFIX: &str = "out_edge_";
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Prepended to each input file name to form the output file name.
    pub output_prefix: String,
    /// Accepted input extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Images processed concurrently. Each gets its own convolver state.
    pub workers: usize,
    pub pipeline: PipelineConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            workers: num_cpus::get(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl BatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EdgeError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EdgeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.workers == 0 {
            return Err(EdgeError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.pipeline.channel_capacity == 0 {
            return Err(EdgeError::InvalidConfig("pipeline.channel_capacity must be at least 1".into()));
        }
        if self.extensions.is_empty() {
            return Err(EdgeError::InvalidConfig("extensions must not be empty".into()));
        }
        Ok(())
    }
}
