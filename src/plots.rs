//! Chart renderers
//!
//! One function per diagnostic chart. Every renderer reads its series from
//! the analysis result, draws one figure, and writes exactly one PNG under
//! `<plotdir>/output/` (Monte Carlo mode) or `<plotdir>/survey/` (observed
//! mode), returning the written path.

use std::path::PathBuf;

use anyhow::Context;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::analysis::{AnalysisResult, PopulationKind};
use crate::plot_path;
use crate::stats;
use crate::style::{axes_limits, plot_target, radius_axis_label, AxesWindow, PlotStyle, GRAY};

/// Multiplicity axis range, planets per system.
const MULTI_XMAX: f64 = 9.0;
/// Systems-per-bin range of the multiplicity chart, log scaled.
const MULTI_YRANGE: (f64, f64) = (0.5, 1.0e4);
/// Period-ratio axis range, outer over inner.
const PRATIO_RANGE: (f64, f64) = (1.0, 10.0);
/// Log-spaced bin edges over the period-ratio range.
const PRATIO_BINS: usize = 15;
/// Log-spaced bin edges over the innermost-period range.
const INNER_BINS: usize = 50;
/// Grid points of the period-ratio fit overlay.
const FIT_GRID: usize = 50;
/// Empirical scale matching the fitted broken power law to observed counts.
const PRATIO_FIT_SCALE: f64 = 170.0;
/// Mean-motion resonances marked on the period-ratio CDF.
const RESONANCES: [f64; 2] = [2.0, 1.5];

fn zip_series(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().zip(ys).map(|(&x, &y)| (x, y)).collect()
}

/// Planet multiplicity: systems per multiplicity bin, observed vs synthetic.
pub fn multiplicity(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "multiplicity");
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;
        let ms = style.marker_size;

        let mut chart = ChartBuilder::on(&root)
            .caption("planet multiplicity", ("sans-serif", style.caption_font))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..MULTI_XMAX, (MULTI_YRANGE.0..MULTI_YRANGE.1).log_scale())?;

        chart
            .configure_mesh()
            .x_desc("planets per system")
            .y_desc("number of systems")
            .label_style(("sans-serif", style.label_font))
            .draw()?;

        if mc {
            let ss = result.synthetic_survey()?;
            chart
                .draw_series(ss.multi.bins.iter().zip(&ss.multi.counts).map(|(&x, &y)| {
                    Cross::new((x, y.max(MULTI_YRANGE.0)), ms, BLACK.stroke_width(lw))
                }))?
                .label(result.name.as_str())
                .legend(move |(x, y)| Cross::new((x + 10, y), ms, BLACK.stroke_width(lw)));

            let zoom = result.observed_subset()?;
            let points: Vec<(f64, f64)> = zoom
                .multi
                .bins
                .iter()
                .zip(&zoom.multi.counts)
                .map(|(&x, &y)| (x, y.max(MULTI_YRANGE.0)))
                .collect();
            chart
                .draw_series(LineSeries::new(
                    stats::steps_mid(&points),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });
        }

        let points: Vec<(f64, f64)> = result
            .observed
            .multi
            .bins
            .iter()
            .zip(&result.observed.multi.counts)
            .map(|(&x, &y)| (x, y.max(MULTI_YRANGE.0)))
            .collect();
        chart
            .draw_series(DashedLineSeries::new(
                stats::steps_mid(&points),
                style.dash.0,
                style.dash.1,
                GRAY.stroke_width(lw),
            ))?
            .label("observed all")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 25, y)], GRAY.stroke_width(lw))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.7))
            .label_font(("sans-serif", style.legend_font))
            .draw()?;

        root.present()?;
    }
    Ok(path)
}

/// Cumulative multiplicity: ECDF of per-system planet counts.
pub fn multiplicity_cdf(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "cdf");
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;

        let mut chart = ChartBuilder::on(&root)
            .caption("planet multiplicity", ("sans-serif", style.caption_font))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..MULTI_XMAX, -0.01..1.05)?;

        chart
            .configure_mesh()
            .x_desc("planets per system")
            .y_desc("cumulative fraction of systems")
            .label_style(("sans-serif", style.label_font))
            .draw()?;

        if mc {
            let ss = result.synthetic_survey()?;
            chart
                .draw_series(LineSeries::new(
                    stats::steps_mid(&stats::ecdf(&ss.multi.cdf)),
                    BLUE.stroke_width(lw),
                ))?
                .label(result.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(lw))
                });

            let zoom = result.observed_subset()?;
            chart
                .draw_series(LineSeries::new(
                    stats::steps_mid(&stats::ecdf(&zoom.multi.cdf)),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });
        } else {
            chart
                .draw_series(LineSeries::new(
                    stats::steps_mid(&stats::ecdf(&result.observed.multi.cdf)),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed all")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.7))
            .label_font(("sans-serif", style.legend_font))
            .draw()?;

        root.present()?;
    }
    Ok(path)
}

/// Period ratio of adjacent planets, histogram over log-spaced bins.
pub fn period_ratio(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "periodratio");
    let edges = stats::log_bins(PRATIO_RANGE.0, PRATIO_RANGE.1, PRATIO_BINS);
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;

        if mc {
            let ss = result.synthetic_survey()?;
            let zoom = result.observed_subset()?;
            let syn_counts = stats::histogram(&ss.multi.pratio, &edges);
            let zoom_counts = stats::histogram(&zoom.multi.pratio, &edges);
            let y_max = syn_counts
                .iter()
                .chain(&zoom_counts)
                .fold(1.0f64, |m, &c| m.max(c))
                * 1.15;

            let mut chart = ChartBuilder::on(&root)
                .caption("period ratio adjacent planets", ("sans-serif", style.caption_font))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    (PRATIO_RANGE.0..PRATIO_RANGE.1).log_scale(),
                    0.0..y_max,
                )?;

            chart
                .configure_mesh()
                .x_desc("period outer/inner")
                .y_desc("PDF")
                .x_label_formatter(&|x| format!("{x:.0}"))
                .label_style(("sans-serif", style.label_font))
                .draw()?;

            chart
                .draw_series(LineSeries::new(
                    stats::histogram_steps(&edges, &syn_counts),
                    BLUE.stroke_width(lw),
                ))?
                .label(result.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(lw))
                });
            let m = stats::median(&ss.multi.pratio);
            if m.is_finite() {
                chart.draw_series(DashedLineSeries::new(
                    vec![(m, 0.0), (m, y_max)],
                    style.dash.0,
                    style.dash.1,
                    BLUE.stroke_width(lw),
                ))?;
            }

            chart
                .draw_series(LineSeries::new(
                    stats::histogram_steps(&edges, &zoom_counts),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });
            let m = stats::median(&zoom.multi.pratio);
            if m.is_finite() {
                chart.draw_series(DashedLineSeries::new(
                    vec![(m, 0.0), (m, y_max)],
                    style.dash.0,
                    style.dash.1,
                    BLACK.stroke_width(lw),
                ))?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.7))
                .label_font(("sans-serif", style.legend_font))
                .draw()?;
        } else {
            let counts = stats::histogram(&result.observed.multi.pratio, &edges);
            let overlay = if result.population == PopulationKind::Parametric && !result.isotropic {
                let fit = result
                    .period_ratio_fit()
                    .context("period-ratio overlay requested")?;
                let grid = stats::log_bins(PRATIO_RANGE.0, PRATIO_RANGE.1, FIT_GRID);
                Some(
                    grid.into_iter()
                        .map(|x| (x, PRATIO_FIT_SCALE * fit.eval(x)))
                        .collect::<Vec<_>>(),
                )
            } else {
                None
            };
            let y_max = counts
                .iter()
                .chain(overlay.iter().flatten().map(|(_, y)| y))
                .fold(1.0f64, |m, &c| m.max(c))
                * 1.15;

            let mut chart = ChartBuilder::on(&root)
                .caption("period ratio adjacent planets", ("sans-serif", style.caption_font))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    (PRATIO_RANGE.0..PRATIO_RANGE.1).log_scale(),
                    0.0..y_max,
                )?;

            chart
                .configure_mesh()
                .x_desc("period outer/inner")
                .y_desc("PDF")
                .x_label_formatter(&|x| format!("{x:.0}"))
                .label_style(("sans-serif", style.label_font))
                .draw()?;

            chart
                .draw_series(edges.windows(2).zip(&counts).map(|(w, &c)| {
                    Rectangle::new([(w[0], 0.0), (w[1], c)], BLUE.mix(0.7).filled())
                }))?
                .label("observed all");
            let m = stats::median(&result.observed.multi.pratio);
            if m.is_finite() {
                chart.draw_series(DashedLineSeries::new(
                    vec![(m, 0.0), (m, y_max)],
                    style.dash.0,
                    style.dash.1,
                    BLUE.stroke_width(lw),
                ))?;
            }

            if let Some(curve) = overlay {
                chart.draw_series(DashedLineSeries::new(
                    curve,
                    style.dot.0,
                    style.dot.1,
                    RED.stroke_width(lw),
                ))?;
            }
        }

        root.present()?;
    }
    Ok(path)
}

/// Cumulative period-ratio distribution.
pub fn period_ratio_cdf(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "periodratio.cdf");
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;

        let mut chart = ChartBuilder::on(&root)
            .caption("period ratio adjacent planets", ("sans-serif", style.caption_font))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((PRATIO_RANGE.0..PRATIO_RANGE.1).log_scale(), -0.05..1.05)?;

        chart
            .configure_mesh()
            .x_desc("period outer/inner")
            .y_desc("CDF")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .label_style(("sans-serif", style.label_font))
            .draw()?;

        if mc {
            let ss = result.synthetic_survey()?;
            chart
                .draw_series(LineSeries::new(
                    stats::ecdf(&ss.multi.pratio),
                    BLUE.stroke_width(lw),
                ))?
                .label(result.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(lw))
                });

            let zoom = result.observed_subset()?;
            chart
                .draw_series(LineSeries::new(
                    stats::ecdf(&zoom.multi.pratio),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });
        } else {
            // mean-motion resonance guides
            for resonance in RESONANCES {
                chart.draw_series(DashedLineSeries::new(
                    vec![(resonance, -0.05), (resonance, 1.05)],
                    style.dot.0,
                    style.dot.1,
                    GREEN.stroke_width(lw),
                ))?;
            }
        }

        let color = if mc { GRAY } else { BLACK };
        chart
            .draw_series(LineSeries::new(
                stats::ecdf(&result.observed.multi.pratio),
                color.stroke_width(lw),
            ))?
            .label("observed all")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 25, y)], color.stroke_width(lw))
            });

        if mc {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.7))
                .label_font(("sans-serif", style.legend_font))
                .draw()?;
        }

        root.present()?;
    }
    Ok(path)
}

/// Orbital period of the innermost planet, histogram over the trim window.
pub fn period_inner(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "innerperiod");
    let (lo, hi) = result.xtrim;
    let edges = stats::log_bins(lo, hi, INNER_BINS);
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;

        if mc {
            let ss = result.synthetic_survey()?;
            let zoom = result.observed_subset()?;
            let syn_counts = stats::histogram(&ss.multi.pinner, &edges);
            let zoom_counts = stats::histogram(&zoom.multi.pinner, &edges);
            let y_max = syn_counts
                .iter()
                .chain(&zoom_counts)
                .fold(1.0f64, |m, &c| m.max(c))
                * 1.15;

            let mut chart = ChartBuilder::on(&root)
                .caption("period innermost planet", ("sans-serif", style.caption_font))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d((lo..hi).log_scale(), 0.0..y_max)?;

            chart
                .configure_mesh()
                .x_desc("Orbital Period [days]")
                .y_desc("PDF")
                .x_label_formatter(&|x| format!("{x:.0}"))
                .label_style(("sans-serif", style.label_font))
                .draw()?;

            chart
                .draw_series(LineSeries::new(
                    stats::histogram_steps(&edges, &syn_counts),
                    BLUE.stroke_width(lw),
                ))?
                .label(result.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(lw))
                });
            chart
                .draw_series(LineSeries::new(
                    stats::histogram_steps(&edges, &zoom_counts),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.7))
                .label_font(("sans-serif", style.legend_font))
                .draw()?;
        } else {
            let counts = stats::histogram(&result.observed.multi.pinner, &edges);
            let y_max = counts.iter().fold(1.0f64, |m, &c| m.max(c)) * 1.15;

            let mut chart = ChartBuilder::on(&root)
                .caption("period innermost planet", ("sans-serif", style.caption_font))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d((lo..hi).log_scale(), 0.0..y_max)?;

            chart
                .configure_mesh()
                .x_desc("Orbital Period [days]")
                .y_desc("PDF")
                .x_label_formatter(&|x| format!("{x:.0}"))
                .label_style(("sans-serif", style.label_font))
                .draw()?;

            chart
                .draw_series(edges.windows(2).zip(&counts).map(|(w, &c)| {
                    Rectangle::new([(w[0], 0.0), (w[1], c)], BLUE.mix(0.7).filled())
                }))?
                .label("observed all");
        }

        root.present()?;
    }
    Ok(path)
}

/// Cumulative innermost-period distribution.
pub fn period_inner_cdf(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "innerperiod.cdf");
    let (lo, hi) = result.xtrim;
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;

        let mut chart = ChartBuilder::on(&root)
            .caption("period innermost planet", ("sans-serif", style.caption_font))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((lo..hi).log_scale(), -0.05..1.05)?;

        chart
            .configure_mesh()
            .x_desc("Orbital Period [days]")
            .y_desc("CDF")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .label_style(("sans-serif", style.label_font))
            .draw()?;

        if mc {
            let ss = result.synthetic_survey()?;
            chart
                .draw_series(LineSeries::new(
                    stats::ecdf(&ss.multi.pinner),
                    BLUE.stroke_width(lw),
                ))?
                .label(result.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(lw))
                });

            let zoom = result.observed_subset()?;
            chart
                .draw_series(LineSeries::new(
                    stats::ecdf(&zoom.multi.pinner),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed subset")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(lw))
                });

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.7))
                .label_font(("sans-serif", style.legend_font))
                .draw()?;
        } else {
            chart
                .draw_series(LineSeries::new(
                    stats::ecdf(&result.observed.multi.pinner),
                    BLACK.stroke_width(lw),
                ))?
                .label("observed all");
        }

        root.present()?;
    }
    Ok(path)
}

/// Detected sample in the period-radius plane, log-log axes from the
/// chosen window.
pub fn period_radius(
    result: &AnalysisResult,
    style: &PlotStyle,
    mc: bool,
    window: AxesWindow,
) -> anyhow::Result<PathBuf> {
    let path = plot_path(result, mc, "period_radius");
    let ((x0, x1), (y0, y1)) = axes_limits(result, window);
    {
        let root = plot_target(&path, style)?;
        let lw = style.line_width;
        let ms = style.marker_size;

        let mut chart = ChartBuilder::on(&root)
            .caption("detected planets", ("sans-serif", style.caption_font))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())?;

        chart
            .configure_mesh()
            .x_desc("Orbital Period [days]")
            .y_desc(radius_axis_label(result.rv))
            .label_style(("sans-serif", style.label_font))
            .draw()?;

        if mc {
            let ss = result.synthetic_survey()?;
            chart
                .draw_series(
                    zip_series(&ss.period, &ss.radius)
                        .into_iter()
                        .map(|(p, r)| Circle::new((p, r), ms, BLUE.mix(0.5).filled())),
                )?
                .label(result.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), ms, BLUE.mix(0.5).filled()));

            let zoom = result.observed_subset()?;
            chart
                .draw_series(
                    zip_series(&zoom.period, &zoom.radius)
                        .into_iter()
                        .map(|(p, r)| Cross::new((p, r), ms, BLACK.stroke_width(lw))),
                )?
                .label("observed subset")
                .legend(move |(x, y)| Cross::new((x + 10, y), ms, BLACK.stroke_width(lw)));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.7))
                .label_font(("sans-serif", style.legend_font))
                .draw()?;
        } else {
            chart.draw_series(
                zip_series(&result.observed.period, &result.observed.radius)
                    .into_iter()
                    .map(|(p, r)| Circle::new((p, r), ms, BLACK.mix(0.5).filled())),
            )?;
        }

        root.present()?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{demo_result, DemoConfig};

    fn demo_with_plotdir(dir: &std::path::Path) -> AnalysisResult {
        let mut result = demo_result(&DemoConfig::default()).unwrap();
        result.plotdir = dir.to_path_buf();
        result
    }

    #[test]
    fn test_modes_never_share_a_path() {
        let result = demo_with_plotdir(std::path::Path::new("diagnostics"));
        for name in [
            "multiplicity",
            "cdf",
            "periodratio",
            "periodratio.cdf",
            "innerperiod",
            "innerperiod.cdf",
            "period_radius",
        ] {
            assert_ne!(
                plot_path(&result, true, name),
                plot_path(&result, false, name)
            );
        }
    }

    #[test]
    #[ignore = "font rendering unavailable in headless environments"]
    fn test_multiplicity_renders_both_modes() {
        let tmp = tempfile::tempdir().unwrap();
        let result = demo_with_plotdir(tmp.path());
        let style = PlotStyle::default();

        let survey = multiplicity(&result, &style, false).unwrap();
        let output = multiplicity(&result, &style, true).unwrap();
        assert!(survey.ends_with("survey/multiplicity.png"));
        assert!(output.ends_with("output/multiplicity.png"));
        assert!(survey.is_file());
        assert!(output.is_file());
    }

    #[test]
    #[ignore = "font rendering unavailable in headless environments"]
    fn test_renderers_create_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let result = demo_with_plotdir(&tmp.path().join("a").join("b"));
        let style = PlotStyle::default();

        let path = period_ratio_cdf(&result, &style, false).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_mc_mode_requires_synthetic_data() {
        let tmp = tempfile::tempdir().unwrap();
        let mut result = demo_with_plotdir(tmp.path());
        result.synthetic = None;
        let style = PlotStyle::default();
        assert!(period_ratio(&result, &style, true).is_err());
    }
}
