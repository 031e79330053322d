#![allow(clippy::all)]
use clap::{Parser, Subcommand};
use clap_markdown;

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
    clap_markdown::print_help_markdown::<Cli>();
}
