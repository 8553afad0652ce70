use anyhow::Result;
use mixatlas::{build_pack, ConvertConfig};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ConvertArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConvertConfig::from_json_file(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input_dir = input.clone();
        config.out_dir = input.clone();
    }
    if let Some(output) = &args.output { config.out_dir = output.clone() }
    if let Some(boundary) = &args.boundary { config.boundary_file = boundary.clone() }

    eprintln!("[convert] reading {}", config.input_dir.display());
    let report = build_pack(&config)?;

    if cli.verbose > 0 {
        for source in &report.sources {
            eprintln!(
                "[convert] {}: {} rows, {} kept, {} skipped",
                source.file, source.stats.rows, source.stats.kept, source.stats.skipped
            );
        }
    }

    let totals = report.totals();
    eprintln!(
        "[convert] {} points in {} shards ({} cities, {} unassigned, {} rows skipped) -> {}",
        totals.kept,
        report.shards(),
        report.cities,
        report.unassigned,
        totals.skipped,
        config.out_dir.display()
    );

    Ok(())
}
