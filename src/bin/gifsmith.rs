use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gifsmith::{convert_dir, preset_named, presets, BatchRunner, FfmpegEncoder};

#[derive(Parser, Debug)]
#[command(name = "gifsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available builder configurations.
    List,
    /// Create unique GIF files into a timestamped batch directory.
    Build(BuildArgs),
    /// Convert media files to MP4 (requires `ffmpeg` on PATH).
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Configuration name to build with (see `list`).
    #[arg(long, default_value = "58KiB")]
    config: String,

    /// Number of GIF files to create.
    #[arg(long, default_value_t = 1)]
    total: usize,

    /// Base directory; each run creates a timestamped directory inside.
    #[arg(long, default_value = "var/gifs")]
    destination: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Directory of source media files (.gif / .mp4).
    #[arg(long)]
    source: PathBuf,

    /// Directory for converted MP4 files.
    #[arg(long)]
    destination: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Build(args) => cmd_build(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn cmd_list() -> anyhow::Result<()> {
    println!("Available configurations:");
    println!();
    for (name, options) in presets() {
        println!("{name}");
        println!("  - Width: {}", options.width);
        println!("  - Colors: {:?}", options.colors);
        println!("  - Radius: {}", options.radius);
        println!("  - Step: {}", options.step);
        println!("  - Duration: {}", options.duration);
        println!();
    }
    Ok(())
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let config = preset_named(&args.config).with_context(|| {
        let names: Vec<&str> = presets().keys().copied().collect();
        format!(
            "unknown configuration '{}', available: {}",
            args.config,
            names.join(", ")
        )
    })?;

    println!("Destination: {}", args.destination.display());
    println!("Configuration: {}", args.config);
    println!("Total to create: {}", args.total);

    let configs = vec![config.clone(); args.total];
    let report = BatchRunner::new().run(&args.destination, &configs)?;

    println!();
    println!(
        "Created {} file(s) in {}",
        report.artifacts.len(),
        report.directory.display()
    );
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    if !gifsmith::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for conversion, but was not found on PATH");
    }

    let report = convert_dir(&args.source, &args.destination, &FfmpegEncoder)?;
    println!(
        "Converted {} file(s), skipped {} existing",
        report.converted.len(),
        report.skipped.len()
    );
    Ok(())
}
