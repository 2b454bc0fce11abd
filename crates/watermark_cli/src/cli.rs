use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use watermark_engine::{BASE_ORIGIN_ENV, DEFAULT_BASE_ORIGIN};

#[derive(Parser, Debug)]
#[command(name = "watermark", about = "Batch audio watermark embedding and detection", version)]
pub struct Cli {
    /// Base origin of the watermarking service
    #[arg(long, global = true, env = BASE_ORIGIN_ENV, default_value = DEFAULT_BASE_ORIGIN)]
    pub origin: String,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Embed a watermark into every audio file of a batch
    Embed {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Directory retrieved artifacts are saved to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Download every watermarked file individually
        #[arg(long)]
        download_each: bool,

        /// Download the batch archive, when the service offers one
        #[arg(long)]
        download_all: bool,
    },
    /// Detect watermarks in every audio file of a batch
    Detect {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Treat each path as a directory root and keep nested paths
    #[arg(short, long)]
    pub dir: bool,

    /// Audio files, or directories with --dir
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
