use CHART_BRIDGE::{
    Args, Commands, convert_chart_file, convert_chart_files, difficulty_label,
    import_catalog_file, import_chart_file, to_json, write_converted, write_json,
};
use anyhow::{Result, bail};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Convert {
            files,
            out_dir,
            pretty,
            dry_run,
            dry_run_max,
        } => {
            if dry_run {
                return preview(&files, dry_run_max);
            }

            let outcomes = convert_chart_files(&files);
            let summary = write_converted(&outcomes, &out_dir, pretty);
            info!(
                "Converted {} chart(s) with {} notes, {} failed..!",
                summary.converted, summary.notes, summary.failed
            );
            if summary.converted == 0 && summary.failed > 0 {
                bail!("No charts could be converted..!");
            }
        }
        Commands::Dump { file } => {
            info!("Decoding chart: '{}'...", file.display());
            let events = import_chart_file(&file)?;
            debug!("Decoded {} raw events..!", events.len());
            println!("{}", to_json(&events, true)?);
        }
        Commands::Catalog {
            file,
            output,
            pretty,
        } => {
            info!("Decoding catalog: '{}'...", file.display());
            let catalog = import_catalog_file(&file)?;
            info!(
                "Read {} song(s) from catalog v{}..!",
                catalog.records.len(),
                catalog.version
            );

            match output {
                Some(path) => {
                    write_json(&path, &catalog.records, pretty)?;
                    info!("Wrote catalog to '{}'..!", path.display());
                }
                None => println!("{}", to_json(&catalog.records, pretty)?),
            }
        }
    }

    Ok(())
}

fn preview(files: &[PathBuf], max: usize) -> Result<()> {
    info!("Previewing at most {} notes per chart..!", max);
    for path in files {
        let chart = match convert_chart_file(path) {
            Ok(chart) => chart,
            Err(e) => {
                warn!("{:#}", e);
                continue;
            }
        };

        info!(
            "{} [{}]: {} notes",
            path.display(),
            difficulty_label(path),
            chart.num_of_notes
        );
        for (i, note) in chart.notes.iter().take(max).enumerate() {
            info!(
                "Note {}: type={} x={:.1} start={:?} end={:?} fake={}",
                i,
                note.kind.code(),
                note.lane_offset,
                note.start_time,
                note.end_time,
                note.is_fake()
            );
        }
    }
    Ok(())
}
