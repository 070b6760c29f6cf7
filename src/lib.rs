//! exopop-diag - survey-comparison diagnostics for exoplanet population synthesis
//!
//! Renders observed vs Monte Carlo synthetic-survey distributions
//! (multiplicity, period ratio, innermost period, their cumulative forms,
//! and the period-radius plane) to PNG files under the analysis result's
//! plot directory, and dumps the binned series and sample medians next to
//! them.

pub mod analysis;
pub mod plots;
pub mod stats;
pub mod style;
pub mod survey;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

pub use analysis::{AnalysisResult, SurveyMetrics};
pub use style::{AxesWindow, PlotStyle};

/// Subdirectory of one render mode: synthetic-survey output vs observations.
pub fn mode_prefix(mc: bool) -> &'static str {
    if mc {
        "output"
    } else {
        "survey"
    }
}

/// Target path of one chart: `<plotdir>/<output|survey>/<name>.png`.
pub fn plot_path(result: &AnalysisResult, mc: bool, name: &str) -> PathBuf {
    result
        .plotdir
        .join(mode_prefix(mc))
        .join(format!("{name}.png"))
}

/// Render the full chart suite for one mode, returning the written paths.
pub fn render_suite(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let window = if mc {
        AxesWindow::Trim
    } else {
        AxesWindow::Observation
    };
    Ok(vec![
        plots::multiplicity(result, style, mc)?,
        plots::multiplicity_cdf(result, style, mc)?,
        plots::period_ratio(result, style, mc)?,
        plots::period_ratio_cdf(result, style, mc)?,
        plots::period_inner(result, style, mc)?,
        plots::period_inner_cdf(result, style, mc)?,
        plots::period_radius(result, style, mc, window)?,
    ])
}

/// Per-population diagnostics plus the written plot paths.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub name: String,
    pub observed: SurveyMetrics,
    pub obs_zoom: Option<SurveyMetrics>,
    pub synthetic: Option<SurveyMetrics>,
    pub plots: Vec<PathBuf>,
}

/// Summarize the populations of a result and the plots written for it.
pub fn summarize(result: &AnalysisResult, plots: Vec<PathBuf>) -> RenderSummary {
    RenderSummary {
        name: result.name.clone(),
        observed: SurveyMetrics::from_sample(&result.observed),
        obs_zoom: result.obs_zoom.as_ref().map(SurveyMetrics::from_sample),
        synthetic: result.synthetic.as_ref().map(SurveyMetrics::from_sample),
        plots,
    }
}

#[derive(Debug, Clone, Serialize)]
struct DistributionRow<'a> {
    series: &'a str,
    bin: f64,
    count: f64,
}

/// Write the multiplicity series of every population to one CSV.
pub fn write_distributions_csv(result: &AnalysisResult, path: &Path) -> anyhow::Result<()> {
    style::ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;

    write_multi_series(&mut writer, "observed", &result.observed.multi)?;
    if let Some(zoom) = &result.obs_zoom {
        write_multi_series(&mut writer, "obs_zoom", &zoom.multi)?;
    }
    if let Some(synthetic) = &result.synthetic {
        write_multi_series(&mut writer, "synthetic", &synthetic.multi)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_multi_series(
    writer: &mut csv::Writer<fs::File>,
    series: &str,
    multi: &analysis::MultiStats,
) -> anyhow::Result<()> {
    for (&bin, &count) in multi.bins.iter().zip(&multi.counts) {
        writer.serialize(DistributionRow { series, bin, count })?;
    }
    Ok(())
}

/// Write the render summary as pretty JSON.
pub fn write_summary(path: &Path, summary: &RenderSummary) -> anyhow::Result<()> {
    style::ensure_parent_dir(path)?;
    let data = serde_json::to_string_pretty(summary)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{demo_result, DemoConfig};

    #[test]
    fn test_plot_path_scheme() {
        let mut result = demo_result(&DemoConfig::default()).unwrap();
        result.plotdir = PathBuf::from("diag");
        assert_eq!(
            plot_path(&result, true, "multiplicity"),
            PathBuf::from("diag/output/multiplicity.png")
        );
        assert_eq!(
            plot_path(&result, false, "periodratio.cdf"),
            PathBuf::from("diag/survey/periodratio.cdf.png")
        );
    }

    #[test]
    fn test_distributions_csv_lists_all_populations() {
        let tmp = tempfile::tempdir().unwrap();
        let result = demo_result(&DemoConfig::default()).unwrap();
        let path = tmp.path().join("nested").join("distributions.csv");

        write_distributions_csv(&result, &path).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        assert!(data.starts_with("series,bin,count"));
        for series in ["observed", "obs_zoom", "synthetic"] {
            assert!(data.contains(series));
        }
        // one row per multiplicity bin per population, plus the header
        let rows = data.lines().count();
        assert_eq!(rows, 1 + 3 * result.observed.multi.bins.len());
    }

    #[test]
    fn test_summary_round_trips_to_json() {
        let tmp = tempfile::tempdir().unwrap();
        let result = demo_result(&DemoConfig::default()).unwrap();
        let summary = summarize(&result, vec![PathBuf::from("diag/survey/cdf.png")]);
        let path = tmp.path().join("summary.json");

        write_summary(&path, &summary).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["name"], result.name);
        assert!(value["observed"]["planets"].as_u64().unwrap() > 0);
        assert_eq!(value["plots"][0], "diag/survey/cdf.png");
    }
}
