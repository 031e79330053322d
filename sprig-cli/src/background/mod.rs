// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use sprig_core::constant;
use sprig_core::im::SprigImage;
use sprig_core::ut::path::extension;

#[derive(Debug, Args)]
#[command(about = "Estimate the background colour of a sprite sheet.")]
pub struct BackgroundArgs {
    #[arg(short = 'i', long, help = "Sprite sheet image.", required = true)]
    pub image: Option<String>,

    #[arg(long, help = "Print the colour as a json object.")]
    pub json: bool,
}

pub fn background(args: &BackgroundArgs) {
    let image_path = args.image.to_owned().unwrap_or_default();

    match extension(&image_path) {
        Some(ext) if constant::SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) => {}
        _ => {
            eprintln!(
                "[sprig::background] ERROR: Invalid image extension. Must be one of: {:?}.",
                constant::SUPPORTED_IMAGE_FORMATS
            );
            std::process::exit(1);
        }
    }

    let color = SprigImage::open(&image_path)
        .and_then(|image| image.background())
        .unwrap_or_else(|err| {
            eprintln!("[sprig::background] ERROR: {}", err);
            std::process::exit(1);
        });

    if args.json {
        println!("{}", serde_json::json!({ "background": color }));
    } else {
        let channels: Vec<String> = color.iter().map(|c| c.to_string()).collect();
        println!("{}", channels.join(","));
    }
}
