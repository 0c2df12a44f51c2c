use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{parse_buffer_blocks, Options};

/// pol-audio - PlayOnline BGW/SPW audio decoder
#[derive(Parser, Debug, Default)]
#[command(name = "pol-audio")]
#[command(version)]
#[command(about = "Inspect and decode PlayOnline BGW/SPW game audio", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// ADPCM blocks decoded per refill (1-1024)
    #[arg(long, value_name = "N", global = true)]
    pub buffer_blocks: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the header fields of one or more files
    Info {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// List the audio files of a directory
    Scan {
        /// Directory to scan (defaults to the configured music_dir)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Include unplayable files
        #[arg(short, long)]
        all: bool,
    },

    /// Decode a file to WAV (or raw PCM)
    Decode {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (defaults to INPUT with a .wav or .pcm extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Write raw PCM without the WAV header
        #[arg(long)]
        raw: bool,
    },
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref blocks) = self.buffer_blocks {
            opts.buffer_blocks =
                parse_buffer_blocks(blocks).context("Invalid --buffer-blocks value")?;
        }

        opts.log_level = opts.log_level.adjusted(self.verbose, self.quiet);

        if let Some(Command::Decode { raw: true, .. }) = self.command {
            opts.wav_header = false;
        }

        Ok(opts)
    }
}
