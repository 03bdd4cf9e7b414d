// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frameit — command-line front end.
//
// Entry point. Initialises logging, loads the scanner configuration, and runs
// one of the subcommands against an image on disk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use frameit_bridge::{DocumentScanner, NativeScanner};
use frameit_core::error::{FrameitError, Result};
use frameit_core::human_errors::humanize_error;
use frameit_core::{ImagePoint, ScannerConfig};

#[derive(Parser)]
#[command(name = "frameit")]
#[command(about = "Find a document in a photo and crop it flat")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the four detected corners as JSON.
    Detect {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Scanner configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rectify the region inside four corners and write it as JPEG.
    Crop {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Corners as "x,y x,y x,y x,y": top-left, top-right, bottom-right,
        /// bottom-left.
        #[arg(long, value_parser = parse_points)]
        points: Points,

        /// Where to write the JPEG.
        #[arg(short, long)]
        output: PathBuf,

        /// Scanner configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON.
    Config,
}

#[derive(Debug, Clone, PartialEq)]
struct Points(Vec<ImagePoint>);

fn parse_points(input: &str) -> std::result::Result<Points, String> {
    let points = input
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("expected x,y but got {pair:?}"))?;
            let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in {pair:?}: {e}"))?;
            let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in {pair:?}: {e}"))?;
            Ok(ImagePoint::new(x, y))
        })
        .collect::<std::result::Result<Vec<_>, String>>()?;
    if points.len() != 4 {
        return Err(format!("expected 4 points, got {}", points.len()));
    }
    Ok(Points(points))
}

fn load_config(path: Option<&PathBuf>) -> Result<ScannerConfig> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading scanner configuration");
            ScannerConfig::load(path)
        }
        None => Ok(ScannerConfig::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect { image, config } => {
            let scanner = NativeScanner::new(load_config(config.as_ref())?);
            let points = scanner
                .detect_document_corners(&image)
                .map_err(|err| match err.code {
                    frameit_bridge::ErrorCode::FileNotFound => FrameitError::FileNotFound(image.clone()),
                    _ => FrameitError::Bridge(err.message),
                })?;
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        Commands::Crop {
            image,
            points,
            output,
            config,
        } => {
            let scanner = NativeScanner::new(load_config(config.as_ref())?);
            let jpeg = scanner.try_crop(&image, &points.0)?;
            std::fs::write(&output, &jpeg)?;
            tracing::info!(path = %output.display(), bytes = jpeg.len(), "Crop written");
        }
        Commands::Config => {
            println!("{}", ScannerConfig::default().to_json_pretty()?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}
