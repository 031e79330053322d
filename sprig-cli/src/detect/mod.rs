// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sprig_core::constant;
use sprig_core::cv::{Connectivity, DetectOptions};
use sprig_core::error::SprigError;
use sprig_core::im;
use sprig_core::ut;

#[derive(Debug, Args)]
#[command(about = "Detect sprites packed in a sprite sheet and save their bounding boxes.")]
pub struct DetectArgs {
    #[arg(short = 'i', long, help = "Sprite sheet or sprite sheet directory.", required = true)]
    pub image: Option<String>,

    #[arg(short = 'o', long, help = "Output sprites file (.json) or directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        short = 'b',
        long,
        value_delimiter = ',',
        help = "Background colour as comma-separated channels (e.g. 255,255,255). Estimated if missing."
    )]
    pub background: Option<Vec<u32>>,

    #[arg(short = 'c', long, default_value = "8", help = "Pixel connectivity (4 or 8).")]
    pub connectivity: String,

    #[arg(long, default_value_t = 1, help = "Number of row bands labelled in parallel.")]
    pub bands: usize,

    #[arg(long, help = "Also save the label grid in this format (npy or png).")]
    pub labels: Option<String>,

    #[arg(
        long,
        help = "Treat pixels with zero alpha as background when no background colour is given."
    )]
    pub transparent: bool,

    #[arg(long, help = "Also save a colour-coded render of the detected sprites.")]
    pub render: bool,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Render canvas colour as r,g,b,a (e.g. 0,0,0,0). Opaque white if missing."
    )]
    pub canvas: Option<Vec<u8>>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,

    #[arg(long, help = "Substring specifying sprite sheets (e.g. _sheet).")]
    pub image_substring: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,
}

/// Per-image settings shared across a detection run
struct DetectSettings<'a> {
    background: Option<&'a [u32]>,
    options: DetectOptions,
    labels: Option<&'a str>,
    render: bool,
    canvas: Option<[u8; 4]>,
}

fn exit_with(message: &str) -> ! {
    eprintln!("[sprig::detect] ERROR: {}", message);
    std::process::exit(1);
}

pub fn detect(args: &DetectArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            exit_with("Threads must be set to a positive integer if provided.");
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap_or_else(|_| exit_with("Could not initialize the thread pool."));
    }

    let connectivity: Connectivity = args
        .connectivity
        .parse()
        .unwrap_or_else(|err: SprigError| exit_with(&err.to_string()));

    if args.bands < 1 {
        exit_with("Bands must be set to a positive integer.");
    }

    let labels = args.labels.as_deref().map(|format| format.to_lowercase());

    if let Some(format) = &labels {
        if !constant::LABEL_FORMATS.contains(&format.as_str()) {
            exit_with(&format!(
                "Invalid label format {}. Must be one of: {:?}.",
                format,
                constant::LABEL_FORMATS
            ));
        }
    }

    let canvas = args.canvas.as_deref().map(|canvas| {
        <[u8; 4]>::try_from(canvas)
            .unwrap_or_else(|_| exit_with("Canvas must have exactly four channels (r,g,b,a)."))
    });

    let settings = DetectSettings {
        background: args.background.as_deref(),
        options: DetectOptions {
            connectivity,
            bands: args.bands,
            transparent_alpha: args.transparent,
        },
        labels: labels.as_deref(),
        render: args.render,
        canvas,
    };

    let image_path = args.image.to_owned().unwrap_or_default();
    let mut output = PathBuf::from(args.output.to_owned().unwrap_or_default());

    let image_extension = ut::path::extension(&image_path);
    let output_extension = ut::path::extension(&output);

    let is_image_dir = if let Some(ext) = image_extension {
        if !constant::SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) {
            exit_with(&format!(
                "Invalid image extension {}. Must be one of: {:?}.",
                ext,
                constant::SUPPORTED_IMAGE_FORMATS
            ));
        }
        false
    } else {
        true
    };

    if let Some(ext) = output_extension {
        if is_image_dir {
            exit_with("If image input is a directory then output must be a directory.");
        }

        if !constant::SUPPORTED_ARRAY_FORMATS.contains(&ext.as_str()) {
            exit_with("Invalid file extension. Must end with .json.");
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                exit_with("Invalid file path. Parent directory of output file path does not exist.");
            }
        }

        let n_sprites = detect_sheet(Path::new(&image_path), &output, &settings)
            .unwrap_or_else(|err| exit_with(&err.to_string()));

        ut::track::progress_log(
            &format!(
                "Complete. {} sprites detected.",
                ut::track::thousands_format(n_sprites)
            ),
            args.verbose,
        );
    } else {
        if !is_image_dir {
            exit_with("If output is a directory then image input must be a directory.");
        }

        let image_files = ut::path::collect_file_paths(
            &image_path,
            constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
            args.image_substring.to_owned(),
        )
        .unwrap_or_else(|err| exit_with(&err.to_string()));

        if image_files.is_empty() {
            exit_with(
                "No sprite sheets were detected. Please check your path and/or substring identifier.",
            );
        }

        ut::track::progress_log(
            &format!(
                "Detected {} sprite sheets.",
                ut::track::thousands_format(image_files.len())
            ),
            args.verbose,
        );

        output = ut::path::create_directory(&output)
            .unwrap_or_else(|_| exit_with("Could not create directory."));

        let outputs = sheet_outputs(&image_files, &output)
            .unwrap_or_else(|err| exit_with(&err.to_string()));

        let pb = ut::track::progress_bar(image_files.len(), "Detecting sprites", args.verbose);

        let error: Mutex<Vec<(usize, SprigError)>> =
            Mutex::new(Vec::with_capacity(image_files.len()));

        (0..image_files.len())
            .into_par_iter()
            .tqdm_with_bar(pb)
            .for_each(|idx| {
                if let Err(err) = detect_sheet(&image_files[idx], &outputs[idx], &settings) {
                    if let Ok(mut error) = error.lock() {
                        error.push((idx, err));
                    }
                }
            });

        let mut error = error.into_inner().unwrap_or_default();
        error.sort_by_key(|(idx, _)| *idx);

        if args.verbose {
            println!()
        }

        for (idx, err) in &error {
            eprintln!(
                "[sprig::detect] ERROR: {}: {}",
                image_files[*idx].display(),
                err
            );
        }

        let message = if !error.is_empty() {
            format!(
                "Complete. {} sprite sheets succesfully processed. {} sprite sheets failed.",
                ut::track::thousands_format(image_files.len() - error.len()),
                ut::track::thousands_format(error.len())
            )
        } else {
            format!(
                "Complete. {} sprite sheets processed.",
                ut::track::thousands_format(image_files.len()),
            )
        };

        ut::track::progress_log(&message, args.verbose);

        if !error.is_empty() {
            std::process::exit(1);
        }
    }
}

/// Sprites file of every sheet inside an output directory
///
/// Sheets are named by file stem (`a.png` -> `a.json`). Sheets sharing a stem
/// keep their full file name instead (`a.png` -> `a.png.json`) so no two
/// sheets write to the same outputs.
fn sheet_outputs(image_files: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>, SprigError> {
    let stems = image_files
        .iter()
        .map(|path| file_stem(path))
        .collect::<Result<Vec<String>, SprigError>>()?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_insert(0) += 1;
    }

    let outputs = image_files
        .iter()
        .zip(&stems)
        .map(|(path, stem)| -> Result<PathBuf, SprigError> {
            if counts.get(stem.as_str()).copied().unwrap_or(0) > 1 {
                let name = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| SprigError::NoFileError(path.display().to_string()))?;
                Ok(output_dir.join(format!("{}.json", name)))
            } else {
                Ok(output_dir.join(format!("{}.json", stem)))
            }
        })
        .collect::<Result<Vec<PathBuf>, SprigError>>()?;

    let unique: HashSet<&PathBuf> = outputs.iter().collect();
    if unique.len() != outputs.len() {
        return Err(SprigError::DirError(
            "Several sprite sheets map to the same output file. Please rename them.".to_string(),
        ));
    }

    Ok(outputs)
}

fn file_stem(path: &Path) -> Result<String, SprigError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| SprigError::NoFileError(path.display().to_string()))
}

/// Detect the sprites of one sheet and write every requested output
///
/// Label grids and renders are written next to `json_path` as
/// `<stem>_labels.<ext>` and `<stem>_render.png`.
fn detect_sheet(
    image_path: &Path,
    json_path: &Path,
    settings: &DetectSettings,
) -> Result<usize, SprigError> {
    let image = im::SprigImage::open(image_path)?;
    let detection = image.detect(settings.background, &settings.options)?;

    detection
        .sprites
        .save(json_path, Some(detection.background.as_slice()))?;

    let stem = file_stem(json_path)?;

    if let Some(format) = settings.labels {
        detection
            .labels
            .save(json_path.with_file_name(format!("{}_labels.{}", stem, format)))?;
    }

    if settings.render {
        im::render_sprites(&detection.labels, &detection.sprites, settings.canvas)
            .save(json_path.with_file_name(format!("{}_render.png", stem)))
            .map_err(|_| SprigError::ImageWriteError)?;
    }

    Ok(detection.sprites.len())
}
