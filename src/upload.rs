//! Storage for receipt images uploaded alongside transactions.
//!
//! Images live under `<root>/transaction_images/` and transactions store the
//! path relative to `<root>`, which is also the path they are served from
//! under [crate::endpoints::MEDIA].

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::Error;

/// The directory, relative to the upload root, that images are written to.
pub const IMAGE_DIRECTORY: &str = "transaction_images";

/// The longest file stem kept from an uploaded file name.
const MAX_STEM_LENGTH: usize = 64;

/// Writes uploaded files to a directory on disk.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store that keeps uploads under `root`.
    ///
    /// The directory is created on the first upload.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory uploads are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a new file named after `file_name` and return its path
    /// relative to the upload root.
    ///
    /// The extension comes from the detected image format, never from
    /// `file_name`. Existing files are never overwritten, a numeric suffix is
    /// added to the name instead.
    ///
    /// # Errors
    /// Returns an [Error::UploadError] if `bytes` is not an image or the
    /// directory or file cannot be written.
    pub fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<String, Error> {
        let extension = image_extension(bytes).ok_or_else(|| {
            tracing::warn!("Refusing to store upload {file_name:?}, it is not an image");
            Error::UploadError(format!("{file_name} is not an image"))
        })?;

        let directory = self.root.join(IMAGE_DIRECTORY);
        fs::create_dir_all(&directory).map_err(|error| {
            tracing::error!("Could not create upload directory {directory:?}: {error}");
            Error::UploadError(error.to_string())
        })?;

        let stem = sanitize_file_stem(file_name);

        let mut attempt = 0u32;

        loop {
            let candidate = match attempt {
                0 => format!("{stem}.{extension}"),
                n => format!("{stem}_{n}.{extension}"),
            };

            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(directory.join(&candidate));

            match file {
                Ok(mut file) => {
                    file.write_all(bytes).map_err(|error| {
                        tracing::error!("Could not write upload {candidate}: {error}");
                        Error::UploadError(error.to_string())
                    })?;

                    tracing::debug!("Saved upload '{candidate}' ({} bytes)", bytes.len());

                    return Ok(format!("{IMAGE_DIRECTORY}/{candidate}"));
                }
                Err(error) if error.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(error) => {
                    tracing::error!("Could not create upload {candidate}: {error}");
                    return Err(Error::UploadError(error.to_string()));
                }
            }
        }
    }

    /// Delete a previously saved upload given its path relative to the upload root.
    ///
    /// # Errors
    /// Returns an [Error::UploadError] if the file exists but cannot be removed.
    pub fn remove(&self, relative_path: &str) -> Result<(), Error> {
        match fs::remove_file(self.root.join(relative_path)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => {
                tracing::error!("Could not remove upload {relative_path}: {error}");
                Err(Error::UploadError(error.to_string()))
            }
        }
    }
}

/// The file extension of the image format `bytes` starts with, or `None` if
/// `bytes` is not a recognised image.
pub fn image_extension(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.extension())
}

/// Reduce an uploaded file name to a safe stem without its extension.
///
/// Directory components are dropped and any character that is not ASCII
/// alphanumeric, '-' or '_' is replaced with '_'.
fn sanitize_file_stem(file_name: &str) -> String {
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let stem = match base_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base_name,
    };

    let mut stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    stem.truncate(MAX_STEM_LENGTH);

    if stem.chars().all(|c| c == '_') {
        "upload".to_owned()
    } else {
        stem
    }
}
