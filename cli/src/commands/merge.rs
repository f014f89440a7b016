use anyhow::{Context, Result};
use polymerge::{Engine, EngineConfig, OriginStatistics, read_partition, write_partition};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::MergeArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./merged.geojson".into());

    let config = EngineConfig::from_path(&args.config)
        .with_context(|| format!("[merge] failed to load config from {}", args.config.display()))?;
    let engine = Engine::new(config)?;

    eprintln!("[merge] loading partition from {}", args.input.display());
    let mut partition = read_partition(&args.input)?;
    let records_in = partition.len();

    let report = if args.absorb_only {
        engine.absorb(&mut partition)?
    } else {
        let mut statistics = OriginStatistics::from_partition(&partition)
            .context("[merge] the conditional pass needs zonal statistics on every input feature")?;
        engine.run(&mut partition, &mut statistics)?
    };

    for pass in &report.passes {
        eprintln!(
            "[merge] {}: {} -> {} records ({} merges, {} isolated, {} rejected, {} declined{})",
            pass.pass, pass.initial_records, pass.final_records, pass.merges,
            pass.isolated, pass.rejected, pass.declined,
            if pass.converged { "" } else { ", did not converge" },
        );
    }
    eprintln!("[merge] {records_in} -> {} records", partition.len());

    eprintln!("[merge] writing partition to {}", out_path.display());
    write_partition(&partition, &out_path)?;

    Ok(())
}
