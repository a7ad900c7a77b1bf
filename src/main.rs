//! trackcut command line interface
//!
//! Normalizes a set of synchronized WAV recordings and cuts the pauses that
//! are silent in all of them.

use clap::Parser;
use log::info;
use std::path::PathBuf;
use trackcut::processor::{Pipeline, PipelineReport};
use trackcut::Config;

#[derive(Parser)]
#[command(name = "trackcut")]
#[command(about = "Normalize synchronized podcast tracks and cut their common silence", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Input WAV files, one per recorded track
    #[arg(value_name = "FILES", required = true)]
    inputs: Vec<PathBuf>,

    /// Suffix appended to output file names
    #[arg(short = 's', long, default_value = "_edited")]
    output_suffix: String,

    /// Target loudness in LUFS
    #[arg(short = 'l', long, default_value_t = -16.0, allow_negative_numbers = true)]
    target_loudness: f64,

    /// Silence threshold in dBFS (-120 to 0)
    #[arg(short = 't', long, default_value_t = -50.0, allow_negative_numbers = true)]
    silence_threshold: f64,

    /// Minimum silence duration in milliseconds
    #[arg(short = 'm', long, default_value_t = 500)]
    min_silence_duration: u32,

    /// Silence kept in place of each cut region, in milliseconds
    #[arg(short = 'k', long, default_value_t = 250)]
    keep_silence_duration: u32,

    /// Analysis chunk size in milliseconds
    #[arg(short = 'c', long, default_value_t = 10)]
    chunk_size: u32,

    /// Show detailed information about the audio content of each file
    #[arg(long)]
    debug_info: bool,

    /// Copy inputs to outputs without processing
    #[arg(long)]
    test_copy: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            input_files: self.inputs,
            output_suffix: self.output_suffix,
            target_loudness: self.target_loudness,
            silence_threshold: self.silence_threshold,
            min_silence_ms: self.min_silence_duration,
            keep_silence_ms: self.keep_silence_duration,
            chunk_size_ms: self.chunk_size,
            debug_info: self.debug_info,
            test_copy: self.test_copy,
        }
    }
}

fn print_config(config: &Config) {
    println!("trackcut started with {} input files", config.input_files.len());
    println!("Configuration:");
    println!("  Target Loudness: {:.1} LUFS", config.target_loudness);
    println!("  Silence Threshold: {:.1} dBFS", config.silence_threshold);
    println!("  Min Silence Duration: {} ms", config.min_silence_ms);
    println!("  Keep Silence Duration: {} ms", config.keep_silence_ms);
    println!("  Output Suffix: {}", config.output_suffix);
}

fn print_report(report: &PipelineReport) {
    for content in &report.content {
        println!("\n{}", content);
    }

    if !report.normalization.is_empty() {
        println!("\nLoudness Normalization Summary:");
        for (i, result) in report.normalization.iter().enumerate() {
            println!("[{}] {}", i + 1, result);
        }
        let at_risk = report.normalization.iter().filter(|r| r.clipping_risk).count();
        if at_risk > 0 {
            println!("{} file(s) have potential clipping risk", at_risk);
        }
    }

    if let Some(detection) = &report.detection {
        println!("\n{}", detection);
    }

    if !report.cutting.is_empty() {
        println!("Silence Cutting Summary:");
        for (i, result) in report.cutting.iter().enumerate() {
            println!("[{}] {}", i + 1, result);
        }

        let original: f64 = report.cutting.iter().map(|r| r.original_duration).sum();
        let new: f64 = report.cutting.iter().map(|r| r.new_duration).sum();
        let removed: f64 = report.cutting.iter().map(|r| r.removed_duration).sum();
        let percent = if original > 0.0 { removed / original * 100.0 } else { 0.0 };
        println!("  Original Total: {:.2}s", original);
        println!("  New Total: {:.2}s", new);
        println!("  Total Removed: {:.2}s ({:.1}%)", removed, percent);
    }

    println!("\nGenerated files:");
    for (path, duration) in &report.outputs {
        println!("  {} ({:.2}s)", path.display(), duration);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("trackcut {}", trackcut::VERSION);

    let config = cli.into_config();
    print_config(&config);

    let report = Pipeline::new(config).run()?;
    print_report(&report);

    println!("\nProcessing completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library() {
        let cli = Cli::parse_from(["trackcut", "a.wav", "b.wav"]);
        let config = cli.into_config();
        assert_eq!(config, Config::with_inputs(["a.wav", "b.wav"]));
    }

    #[test]
    fn test_negative_values_and_flags() {
        let cli = Cli::parse_from([
            "trackcut",
            "-t",
            "-60",
            "-l",
            "-14",
            "-m",
            "300",
            "-k",
            "100",
            "-c",
            "20",
            "-s",
            "_cut",
            "--debug-info",
            "--test-copy",
            "host.wav",
        ]);
        let config = cli.into_config();

        assert_eq!(config.silence_threshold, -60.0);
        assert_eq!(config.target_loudness, -14.0);
        assert_eq!(config.min_silence_ms, 300);
        assert_eq!(config.keep_silence_ms, 100);
        assert_eq!(config.chunk_size_ms, 20);
        assert_eq!(config.output_suffix, "_cut");
        assert!(config.debug_info);
        assert!(config.test_copy);
        assert_eq!(config.input_files, vec![PathBuf::from("host.wav")]);
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["trackcut"]).is_err());
    }
}
