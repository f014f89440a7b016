use anyhow::Result;
use polymerge::read_partition;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let partition = read_partition(&args.input)?;

    let areas = partition.records().map(|record| record.area).collect::<Vec<_>>();
    let min = areas.iter().copied().fold(f64::INFINITY, f64::min);
    let max = areas.iter().copied().fold(0.0, f64::max);
    let road_splits = partition.records().filter(|record| record.is_road_split).count();

    println!("Number of records: {}", partition.len());
    println!("Total area: {:.3}", partition.total_area());
    if !areas.is_empty() {
        println!("Area range: {min:.3} .. {max:.3}");
    }
    println!("Road-split records: {road_splits}");
    println!("Zonal statistics attached: {}", partition.has_statistics());

    Ok(())
}
