//! `rep-counter` command line.
//!
//! - `rep-counter replay --config cfg.json --input frames.jsonl` replays a
//!   recorded landmark stream and prints one line per repetition.
//! - `rep-counter init-config --exercise sit_ups` prints the preset config.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use rep_counter::replay::replay;
use rep_counter::{Exercise, JsonLinesSink, Pipeline, SessionConfig};

#[derive(Parser)]
#[command(name = "rep-counter")]
#[command(about = "Count exercise repetitions from pose landmarks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines landmark recording through a detector
    Replay {
        /// Session config (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Frame records, one JSON object per line
        #[arg(long)]
        input: PathBuf,

        /// Append every repetition event to this JSON-lines file
        #[arg(long)]
        events: Option<PathBuf>,

        /// Write the final report (JSON) here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Log level: off, error, warn, info, debug, trace
        #[arg(long, default_value = "warn")]
        log_level: LevelFilter,
    },

    /// Write the preset config for an exercise
    InitConfig {
        /// vertical_jump, broad_jump, sit_and_reach, medicine_ball_throw or sit_ups
        #[arg(long, value_parser = parse_exercise)]
        exercise: Exercise,

        /// Output path; printed to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_exercise(raw: &str) -> Result<Exercise, String> {
    Exercise::ALL
        .into_iter()
        .find(|e| e.name() == raw)
        .ok_or_else(|| {
            let known: Vec<_> = Exercise::ALL.iter().map(|e| e.name()).collect();
            format!("unknown exercise `{raw}`, expected one of: {}", known.join(", "))
        })
}

fn init_logging(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    {
        let _ = level;
        rep_counter::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    rep_counter::core::init_with_level(level)?;
    Ok(())
}

fn run_replay(
    config: PathBuf,
    input: PathBuf,
    events: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::load_json(&config)?;
    let scale = config.frame_scale()?;
    let mut pipeline = Pipeline::from_config(&config)?;
    if let Some(path) = events {
        pipeline.add_sink(Box::new(JsonLinesSink::append(path)?));
    }

    let reader = BufReader::new(File::open(&input)?);
    let summary = replay(&mut pipeline, reader, scale, |event, status| {
        let fields = event
            .metrics
            .fields()
            .iter()
            .map(|(name, value)| format!(" {name}={value:.3}"))
            .collect::<String>();
        println!(
            "{} #{} frame {}{}",
            event.exercise, status.count, event.frame, fields
        );
    })?;

    println!(
        "{}: {} repetitions, {} frames, phase {}",
        summary.exercise, summary.status.count, summary.frames, summary.phase
    );
    if let Some(path) = report {
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            config,
            input,
            events,
            report,
            log_level,
        } => {
            init_logging(log_level)?;
            run_replay(config, input, events, report)
        }
        Commands::InitConfig { exercise, output } => {
            let config = SessionConfig::preset(exercise);
            match output {
                Some(path) => config.write_json(path)?,
                None => println!("{}", config.to_json()?),
            }
            Ok(())
        }
    }
}
