use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Landmark stream (JSON Lines), `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Monitor config file (TOML/JSON/YAML); DROWSY_* env vars override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame rate used to synthesize timestamps for records without `t_ms`
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Only print the final session summary
    #[arg(long, default_value_t = false)]
    pub summary_only: bool,

    /// Debug-level logging on stderr (`RUST_LOG` overrides)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
