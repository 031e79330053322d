// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use npyz::{self, DType, NpyFile, TypeChar, WriterBuilder};

use crate::error::SprigError;
use crate::im::{Grid, Label, LabelGrid};

/// Write a numpy file from a slice of specified shape
///
/// # Arguments
///
/// * `path` - Path to output numpy file
/// * `data` - Slice of numeric type
/// * `shape` - Shape of the array (shape product must equal length of data)
pub fn write_numpy<T, P: AsRef<Path>>(path: P, data: &[T], shape: &[u64]) -> Result<(), SprigError>
where
    T: npyz::Serialize + npyz::AutoSerialize,
{
    if shape.iter().product::<u64>() != data.len() as u64 {
        return Err(SprigError::BufferSizeError);
    }

    let mut buffer = vec![];
    let mut writer = npyz::WriteOptions::<T>::new()
        .default_dtype()
        .shape(shape)
        .writer(&mut buffer)
        .begin_nd()
        .map_err(|_| SprigError::ImageWriteError)?;

    for d in data {
        writer.push(d).map_err(|_| SprigError::ImageWriteError)?;
    }

    writer.finish().map_err(|_| SprigError::ImageWriteError)?;
    std::fs::write(path, buffer).map_err(|_| SprigError::ImageWriteError)?;

    Ok(())
}

/// Read a (height, width) shaped numpy array of unsigned integers as labels
///
/// # Arguments
///
/// * `path` - Path to a .npy file holding u8, u16 or u32 values
pub fn read_numpy_labels<P: AsRef<Path>>(path: P) -> Result<LabelGrid, SprigError> {
    let bytes = std::fs::read(&path).map_err(|err| SprigError::NoFileError(err.to_string()))?;
    let npy = NpyFile::new(&bytes[..]).map_err(|_| SprigError::ImageReadError)?;

    let (h, w) = match npy.shape() {
        &[h, w] => (h as u32, w as u32),
        _ => return Err(SprigError::ImageReadError),
    };

    let labels: Vec<Label> = match npy.dtype() {
        DType::Plain(x) => match (x.type_char(), x.size_field()) {
            (TypeChar::Uint, 1) => npy
                .into_vec::<u8>()
                .map_err(|_| SprigError::ImageReadError)?
                .into_iter()
                .map(Label::from)
                .collect(),
            (TypeChar::Uint, 2) => npy
                .into_vec::<u16>()
                .map_err(|_| SprigError::ImageReadError)?
                .into_iter()
                .map(Label::from)
                .collect(),
            (TypeChar::Uint, 4) => npy
                .into_vec::<u32>()
                .map_err(|_| SprigError::ImageReadError)?,
            _ => return Err(SprigError::ImageReadError),
        },
        _ => return Err(SprigError::ImageReadError),
    };

    Grid::new(w, h, labels)
}
