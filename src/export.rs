//! PNG export of committed canvas pixels.

use crate::config::ExportConfig;
use crate::draw::{EngineError, Raster};
use chrono::Local;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create export directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] EngineError),
}

/// Where and how exports are named.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory exports are written to
    pub directory: PathBuf,
    /// Filename template (supports chrono format specifiers)
    pub filename_template: String,
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            directory: expand_tilde(&config.directory),
            filename_template: config.filename_template.clone(),
        }
    }
}

/// Generate a `.png` filename from the template and the current local time.
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.png", now.format(template))
}

/// Ensure the export directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory).map_err(|source| ExportError::Directory {
            path: directory.to_path_buf(),
            source,
        })?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Encodes `raster` as PNG at exactly `path`.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), ExportError> {
    let file = fs::File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    raster.write_png(&mut writer).map_err(|err| match err {
        EngineError::Io(source) => ExportError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => ExportError::Encode(other),
    })?;

    log::info!(
        "Exported {}x{} drawing to {}",
        raster.width(),
        raster.height(),
        path.display()
    );
    Ok(())
}

/// Saves `raster` into the configured directory under a timestamped name.
///
/// # Returns
/// Path to the saved file
pub fn save_png(raster: &Raster, options: &ExportOptions) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&options.directory)?;
    let file_path = directory.join(generate_filename(&options.filename_template));
    write_png(raster, &file_path)?;
    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
