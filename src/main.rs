//! modtick CLI: inspect a MOD file, play it, or render it to WAV.
//!
//! Usage:
//!   modtick song.mod
//!   modtick song.mod --samples --dump-pattern 0
//!   modtick song.mod --wav out.wav --seconds 60

use anyhow::{bail, Context, Result};
use clap::Parser;
use mt_ir::{format_cell, format_position, Song};
use mt_master::{Controller, PlayState, PlayerConfig};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser)]
#[command(name = "modtick")]
#[command(about = "Play and inspect ProTracker-style MOD modules")]
struct Args {
    /// Module file to load
    file: PathBuf,

    /// Render to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Seconds to play or render
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Sample rate for WAV rendering
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,

    /// Master volume, 0.0 to 1.0
    #[arg(long, default_value_t = 0.7)]
    volume: f32,

    /// Pattern-table position to start from
    #[arg(long, default_value_t = 0)]
    position: usize,

    /// Print the rows of this stored pattern and exit
    #[arg(long)]
    dump_pattern: Option<usize>,

    /// List the samples and exit
    #[arg(long)]
    samples: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let data = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::debug!(file = %args.file.display(), bytes = data.len(), "read module");
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let config = PlayerConfig {
        sample_rate: args.sample_rate,
        master_volume: args.volume,
        ..PlayerConfig::default()
    };
    let mut ctrl = Controller::new(config);
    let song = ctrl
        .load(&data, &name)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    print_summary(&song);

    if args.samples || args.dump_pattern.is_some() {
        if args.samples {
            print_samples(&song);
        }
        if let Some(index) = args.dump_pattern {
            print_pattern(&song, index)?;
        }
        return Ok(());
    }

    if args.position > 0 {
        let landed = ctrl.seek(args.position);
        println!("Starting at position {}", landed);
    }

    match args.wav {
        Some(path) => {
            ctrl.play();
            println!("Rendering {} s to {}...", args.seconds, path.display());
            let frames = ctrl.render_to_wav_file(&path, args.seconds)?;
            println!("Wrote {} frames.", frames);
        }
        None => play_audio(&mut ctrl, args.seconds)?,
    }
    Ok(())
}

fn print_summary(song: &Song) {
    println!("Title:    {}", song.title);
    println!("Format:   {} ({})", song.format.label(), String::from_utf8_lossy(&song.format.bytes()));
    println!("Channels: {}", song.channel_count());
    println!("Length:   {} positions", song.song_length());
    println!("Patterns: {}", song.patterns.len());
    println!("Samples:  {} (with data)", song.audible_samples().count());
    println!();
}

fn print_samples(song: &Song) {
    for (number, sample) in song.audible_samples() {
        let name = if sample.name.is_empty() {
            format!("Sample {}", number)
        } else {
            sample.name.to_string()
        };
        let looped = if sample.has_loop() { "loop" } else { "" };
        println!(
            "{:02} {:<22} {:>6} bytes  vol {:>2}  fine {:>2}  {}",
            number,
            name,
            sample.length,
            sample.volume,
            sample.finetune_offset(),
            looped
        );
    }
    println!();
}

fn print_pattern(song: &Song, index: usize) -> Result<()> {
    let Some(pattern) = song.patterns.get(index) else {
        bail!("pattern {} does not exist ({} stored)", index, song.patterns.len());
    };
    println!("Pattern {}", index);
    for (row, notes) in pattern.rows().enumerate() {
        let cells: Vec<String> = notes.iter().map(format_cell).collect();
        println!("{:02} | {}", row, cells.join(" | "));
    }
    Ok(())
}

fn play_audio(ctrl: &mut Controller, seconds: f32) -> Result<()> {
    let rate = ctrl.start_output().context("failed to open audio output")?;
    ctrl.play();
    println!("Playing at {} Hz...", rate);

    let started = Instant::now();
    let limit = Duration::from_secs_f32(seconds.max(0.0));
    while started.elapsed() < limit {
        if let Some(snapshot) = ctrl.snapshot() {
            let t = snapshot.transport;
            if t.state != PlayState::Playing {
                break;
            }
            print!(
                "\rPos {}  speed {:>2}  tempo {:>3}",
                format_position(t.position, t.row),
                t.ticks_per_row,
                t.tempo
            );
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    ctrl.stop();
    ctrl.stop_output();
    println!("\rDone.                              ");
    Ok(())
}
