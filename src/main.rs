use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use pol_audio::catalog;
use pol_audio::cli::{Cli, Command};
use pol_audio::config::{self, Options};
use pol_audio::logging;
use pol_audio::sound::AudioFile;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration file, then let the command line override it
    let options = logging::bootstrap(|| config::load_config(cli.config.as_deref()))?;
    let options = cli.merge_into_options(options)?;

    logging::init(options.log_level)?;
    debug!(?options, "configuration");

    match &cli.command {
        Some(Command::Info { files }) => run_info(files),
        Some(Command::Scan { dir, all }) => run_scan(dir.as_deref(), *all, &options),
        Some(Command::Decode { input, output, .. }) => {
            run_decode(input, output.as_deref(), &options)
        }
        None => anyhow::bail!("No command given. Try --help"),
    }
}

fn run_info(files: &[PathBuf]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in files {
        let file = AudioFile::open(path);
        let header = file.header();
        writeln!(out, "{}", path.display())?;
        writeln!(out, "  container:     {:?}", file.variant())?;
        writeln!(out, "  format:        {}", header.sample_format)?;
        writeln!(out, "  playable:      {}", file.is_playable())?;
        writeln!(out, "  id:            {}", header.id)?;
        writeln!(out, "  channels:      {}", header.channels)?;
        writeln!(out, "  sample rate:   {}", header.sample_rate())?;
        writeln!(out, "  block size:    {}", header.block_size)?;
        writeln!(out, "  sample blocks: {}", header.sample_blocks)?;
        writeln!(out, "  length:        {:.3}s", header.length_seconds())?;
        if header.looped() {
            writeln!(out, "  loop start:    {:.3}s", header.loop_start_seconds())?;
        } else {
            writeln!(out, "  loop start:    none")?;
        }
    }
    Ok(())
}

fn run_scan(dir: Option<&Path>, all: bool, options: &Options) -> Result<()> {
    let dir = dir
        .or(options.music_dir.as_deref())
        .context("No directory given and no music_dir configured")?;

    let catalog = catalog::scan(dir, &options.extensions)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in catalog.entries.iter().filter(|e| all || e.playable) {
        let looped = if entry.looped {
            format!("loop@{:.3}s", entry.loop_start_seconds)
        } else {
            "once".to_string()
        };
        writeln!(
            out,
            "{:<24} {:<12} {:>9.3}s  {:<14} {}",
            entry.name(),
            format!("{:?}", entry.variant),
            entry.length_seconds,
            looped,
            if entry.playable { "" } else { "(unplayable)" }
        )?;
    }
    info!(
        total = catalog.len(),
        playable = catalog.playable().count(),
        "scan complete"
    );
    Ok(())
}

fn run_decode(input: &Path, output: Option<&Path>, options: &Options) -> Result<()> {
    let file = AudioFile::open(input);
    let mut stream = file
        .open_stream(options.to_stream_options())
        .with_context(|| format!("Failed to open {}", input.display()))?
        .with_context(|| {
            format!(
                "{} is not playable ({:?}, {})",
                input.display(),
                file.variant(),
                file.header().sample_format
            )
        })?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(if options.wav_header { "wav" } else { "pcm" }),
    };

    let expected = stream.length();
    let mut writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    let written = io::copy(&mut stream, &mut writer)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    writer.flush()?;
    stream.close();

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = written,
        expected,
        "decoded"
    );
    Ok(())
}
