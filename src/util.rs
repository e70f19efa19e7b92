use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a whole file into memory; both decoders need the complete buffer up front.
pub fn load_bytes(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;
    debug!("Read {} byte(s) from '{}'..!", bytes.len(), path.display());
    Ok(bytes)
}

/// `<out_dir>/<parent dir>/<stem>.json` for a chart such as `Charts/0042/FINALE.vsb`.
///
/// Keeping the parent directory stops the four difficulty files of different
/// songs from overwriting each other.
pub fn output_path_for(chart: &Path, out_dir: &Path) -> PathBuf {
    let stem = chart
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".into());

    let mut path = out_dir.to_path_buf();
    if let Some(parent) = chart.parent().and_then(|p| p.file_name()) {
        path.push(parent);
    }
    path.push(format!("{stem}.json"));
    path
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize JSON")
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, to_json(value, pretty)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}
