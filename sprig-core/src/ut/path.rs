// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::error::SprigError;

/// Create a directory, appending an incrementing suffix when it already exists
///
/// # Arguments
///
/// * `directory` - Path to new directory - existing directories are never reused
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sprig_core::ut::path::create_directory;
///
/// let base = Path::new("TEST_SPRIG_CREATE_DIRECTORY");
///
/// let first = create_directory(base).unwrap();
/// let second = create_directory(base).unwrap();
///
/// assert_eq!(first, base.to_path_buf());
/// assert_eq!(second, Path::new("TEST_SPRIG_CREATE_DIRECTORY_0").to_path_buf());
///
/// std::fs::remove_dir(first).unwrap();
/// std::fs::remove_dir(second).unwrap();
/// ```
pub fn create_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, SprigError> {
    let directory = directory.as_ref();

    if !directory.exists() {
        std::fs::create_dir(directory).map_err(|err| SprigError::DirError(err.to_string()))?;
        return Ok(directory.to_path_buf());
    }

    let parent = directory.parent().unwrap_or_else(|| Path::new("."));
    let base_name = directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SprigError::DirError("Invalid directory name".to_string()))?;

    for index in 0..30 {
        let new_dir = parent.join(format!("{}_{}", base_name, index));

        if !new_dir.exists() {
            std::fs::create_dir(&new_dir).map_err(|err| SprigError::DirError(err.to_string()))?;
            return Ok(new_dir);
        }
    }

    Err(SprigError::DirError(format!(
        "Could not create a directory in alotted increments. Check the directory path: {}",
        directory.display()
    )))
}

/// Collect sorted file paths from a directory with an optional substring filter
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Lowercase extensions to keep
/// * `substring` - Only include files containing this substring
///
/// # Examples
///
/// ```no_run
/// use sprig_core::ut::path::collect_file_paths;
/// use sprig_core::constant::SUPPORTED_IMAGE_FORMATS;
/// let files = collect_file_paths("sheets/", SUPPORTED_IMAGE_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<String>,
) -> Result<Vec<PathBuf>, SprigError>
where
    P: AsRef<Path>,
{
    let message = directory.as_ref().display().to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| SprigError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext.to_lowercase().as_str()))
        })
        .collect();

    if let Some(substring) = substring {
        files.retain(|f| {
            f.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(&substring))
        });
    }

    files.sort();

    Ok(files)
}

/// Lowercase extension of a path, if any
pub fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
