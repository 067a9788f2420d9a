use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logofinder")]
#[command(about = "Extracts brand logo images from websites by rendering each page in a headless browser")]
#[command(version)]
pub struct Args {
    /// Create default configuration file at ./config/logofinder.toml
    #[arg(long)]
    pub init: bool,

    /// Text file with one URL per line
    #[arg(short, long, default_value = "urls.txt")]
    pub input_file: PathBuf,

    /// Results CSV file, appended to across runs (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for downloaded logo assets (overrides config)
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,

    /// Number of URLs processed in parallel; each in-flight URL owns one
    /// headless Chrome instance (overrides config)
    #[arg(short = 'j', long)]
    pub parallel_jobs: Option<usize>,

    /// Pause after page load for client-side rendering, in milliseconds
    /// (overrides config)
    #[arg(long, value_name = "MS")]
    pub settle_delay_ms: Option<u64>,

    /// Verbose logging (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(jobs) = self.parallel_jobs {
            if jobs == 0 {
                return Err("Parallel jobs must be greater than 0".to_string());
            }
            if jobs > 64 {
                return Err(
                    "Parallel jobs cannot exceed 64; each in-flight URL owns a Chrome instance"
                        .to_string(),
                );
            }
        }
        Ok(())
    }
}
