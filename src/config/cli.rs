use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "homework-helper")]
#[command(about = "Read a photo of homework and explain it in simple language")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, env = "OCR_API_KEY", hide_env_values = true)]
    pub ocr_api_key: Option<String>,

    #[arg(long, global = true, env = "COHERE_API_KEY", hide_env_values = true)]
    pub cohere_api_key: Option<String>,

    #[arg(long, global = true)]
    pub ocr_endpoint: Option<String>,

    #[arg(long, global = true)]
    pub generation_endpoint: Option<String>,

    #[arg(long, global = true, help = "Generation model identifier")]
    pub model: Option<String>,

    #[arg(long, global = true, help = "Timeout for each remote call, in seconds")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read one image file and print the extracted text and explanation
    Explain {
        /// JPEG or PNG photo of the homework
        image: PathBuf,
    },
    /// Serve the upload page
    Serve {
        #[arg(long, help = "Address to listen on, e.g. 127.0.0.1:8501")]
        bind: Option<String>,
    },
}

impl CliConfig {
    pub fn overrides(&self) -> ConfigOverrides {
        let bind = match &self.command {
            Command::Serve { bind } => bind.clone(),
            Command::Explain { .. } => None,
        };
        ConfigOverrides {
            ocr_api_key: self.ocr_api_key.clone(),
            cohere_api_key: self.cohere_api_key.clone(),
            ocr_endpoint: self.ocr_endpoint.clone(),
            generation_endpoint: self.generation_endpoint.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            bind,
        }
    }
}
