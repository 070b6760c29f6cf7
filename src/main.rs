use std::path::PathBuf;

use clap::Parser;
use exopop_diag::analysis::AnalysisResult;
use exopop_diag::survey::{demo_result, DemoConfig};
use exopop_diag::{
    render_suite, summarize, write_distributions_csv, write_summary, PlotStyle,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Survey-comparison diagnostic plots for exoplanet population synthesis"
)]
struct Cli {
    /// Analysis result JSON; a demo result is generated when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Plot output base directory (overrides the result's plot directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Random seed of the demo result
    #[arg(long)]
    seed: Option<u64>,

    /// Number of systems per demo population
    #[arg(long)]
    systems: Option<usize>,

    /// Skip the Monte Carlo chart suite
    #[arg(long)]
    observed_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut result = match &cli.input {
        Some(path) => AnalysisResult::from_json_file(path)?,
        None => {
            let mut cfg = DemoConfig::default();
            if let Some(v) = cli.seed {
                cfg.seed = v;
            }
            if let Some(v) = cli.systems {
                cfg.systems = v;
            }
            demo_result(&cfg)?
        }
    };
    if let Some(dir) = cli.output {
        result.plotdir = dir;
    }
    result.validate()?;

    let style = PlotStyle::default();
    let mut paths = render_suite(&result, &style, false)?;
    if !cli.observed_only && result.synthetic.is_some() {
        paths.extend(render_suite(&result, &style, true)?);
    }

    let csv_path = result.plotdir.join("distributions.csv");
    write_distributions_csv(&result, &csv_path)?;

    let summary = summarize(&result, paths);
    let summary_path = result.plotdir.join("summary.json");
    write_summary(&summary_path, &summary)?;

    println!("Plot directory: {}", result.plotdir.display());
    for path in &summary.plots {
        println!("  {}", path.display());
    }
    println!("Distributions: {}", csv_path.display());
    println!("Summary: {}", summary_path.display());

    Ok(())
}
