// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use sprig_cli::{background, detect};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Background(background::BackgroundArgs),
    Detect(detect::DetectArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Background(background_args)) => background::background(background_args),
        Some(Commands::Detect(detect_args)) => detect::detect(detect_args),
        None => {}
    }
}
