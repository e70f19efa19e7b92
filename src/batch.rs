use crate::converter::{ConvertedChart, convert_chart};
use crate::decoder::{decode_catalog, decode_chart};
use crate::model::catalog::Catalog;
use crate::model::chart::RawNoteEvent;
use crate::model::difficulty::Difficulty;
use crate::util::{load_bytes, output_path_for, write_json};
use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Read and decode a chart file without converting it.
pub fn import_chart_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawNoteEvent>> {
    let path = path.as_ref();
    let bytes = load_bytes(path)?;
    decode_chart(&bytes).map_err(|e| anyhow!("Failed to decode chart {}: {}", path.display(), e))
}

/// Read, decode and convert a chart file.
pub fn convert_chart_file<P: AsRef<Path>>(path: P) -> Result<ConvertedChart> {
    let path = path.as_ref();
    let bytes = load_bytes(path)?;
    convert_chart(&bytes).with_context(|| format!("Failed to convert chart {}", path.display()))
}

/// Read and decode a song catalog file.
pub fn import_catalog_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let bytes = load_bytes(path)?;
    let catalog = decode_catalog(&bytes)
        .with_context(|| format!("Failed to decode catalog {}", path.display()))?;

    if let Some(err) = &catalog.aborted {
        warn!(
            "Catalog '{}' stopped early after {} record(s): {}",
            path.display(),
            catalog.records.len(),
            err
        );
    }

    Ok(catalog)
}

/// The result of converting one chart in a batch.
#[derive(Debug)]
pub struct ChartOutcome {
    pub path: PathBuf,
    pub result: Result<ConvertedChart>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    pub notes: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ChartOutcome]) -> Self {
        outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                match &outcome.result {
                    Ok(chart) => {
                        summary.converted += 1;
                        summary.notes += chart.num_of_notes;
                    }
                    Err(_) => summary.failed += 1,
                }
                summary
            })
    }
}

/// Convert every chart independently on the rayon pool.
///
/// A failing chart does not affect the others. Outcomes are returned in the
/// order of `paths`.
pub fn convert_chart_files(paths: &[PathBuf]) -> Vec<ChartOutcome> {
    info!("Converting {} chart file(s)..!", paths.len());

    paths
        .par_iter()
        .map(|path| {
            let result = convert_chart_file(path);
            match &result {
                Ok(chart) => debug!(
                    "Converted '{}' into {} note(s)..!",
                    path.display(),
                    chart.num_of_notes
                ),
                Err(e) => warn!("{:#}", e),
            }
            ChartOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// Write every converted chart under `out_dir`.
///
/// A chart that failed to convert or to write counts as a failure and the
/// remaining charts are still written.
pub fn write_converted(outcomes: &[ChartOutcome], out_dir: &Path, pretty: bool) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for outcome in outcomes {
        let Ok(chart) = &outcome.result else {
            summary.failed += 1;
            continue;
        };

        let target = output_path_for(&outcome.path, out_dir);
        match write_json(&target, chart, pretty) {
            Ok(()) => {
                info!(
                    "Wrote {} [{}] with {} notes to '{}'..!",
                    outcome.path.display(),
                    difficulty_label(&outcome.path),
                    chart.num_of_notes,
                    target.display()
                );
                summary.converted += 1;
                summary.notes += chart.num_of_notes;
            }
            Err(e) => {
                warn!("{:#}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}

/// `OP`/`MD`/`FN`/`EC` for a chart path, or `??` for an unrecognised file name.
pub fn difficulty_label(path: &Path) -> &'static str {
    Difficulty::from_path(path)
        .map(Difficulty::abbreviation)
        .unwrap_or("??")
}
