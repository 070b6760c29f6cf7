//! Plot styling and output targets
//!
//! Style is an explicit value handed to every renderer rather than
//! process-wide state, so charts rendered side by side in tests cannot
//! interfere. The axis-window helper selects between the trimmed,
//! efficiency, and observation limits of the period-radius plane.

use std::fs;
use std::path::Path;

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analysis::AnalysisResult;

/// Gray used for full-sample comparison series.
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Explicit style configuration shared by all charts.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    /// Bitmap canvas size [px]
    pub dims: (u32, u32),
    pub caption_font: u32,
    pub label_font: u32,
    pub legend_font: u32,
    /// Stroke width of data series [px]
    pub line_width: u32,
    /// Scatter marker half-size [px]
    pub marker_size: u32,
    /// Segment and gap length of dashed series [px]
    pub dash: (u32, u32),
    /// Segment and gap length of dotted series [px]
    pub dot: (u32, u32),
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            dims: (1280, 720),
            caption_font: 34,
            label_font: 20,
            legend_font: 18,
            line_width: 2,
            marker_size: 6,
            dash: (8, 5),
            dot: (2, 5),
        }
    }
}

/// Axis-limit window for period-radius charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxesWindow {
    /// Trimmed model range
    Trim,
    /// Detection-efficiency grid range
    Efficiency,
    /// Default observation window
    Observation,
}

/// x/y limits of the period-radius plane for the chosen window.
pub fn axes_limits(result: &AnalysisResult, window: AxesWindow) -> ((f64, f64), (f64, f64)) {
    match window {
        AxesWindow::Trim => (result.xtrim, result.ytrim),
        AxesWindow::Efficiency => (result.eff_xlim, result.eff_ylim),
        AxesWindow::Observation => (result.obs_xlim, result.obs_ylim),
    }
}

/// Vertical-axis label of the period-radius plane.
pub fn radius_axis_label(rv: bool) -> &'static str {
    if rv {
        "Planet M sin i [Earth masses]"
    } else {
        "Planet Radius [Earth radii]"
    }
}

/// Create any missing parent directories of an output file.
pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create plot directory {}", parent.display()))?;
    }
    Ok(())
}

/// Open a white-filled bitmap drawing area for one chart, creating parent
/// directories first. The PNG is written when the caller presents the area.
pub fn plot_target<'a>(
    path: &'a Path,
    style: &PlotStyle,
) -> anyhow::Result<DrawingArea<BitMapBackend<'a>, Shift>> {
    ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, style.dims).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{demo_result, DemoConfig};

    #[test]
    fn test_axes_limits_selects_window() {
        let result = demo_result(&DemoConfig::default()).unwrap();
        assert_eq!(
            axes_limits(&result, AxesWindow::Trim),
            (result.xtrim, result.ytrim)
        );
        assert_eq!(
            axes_limits(&result, AxesWindow::Efficiency),
            (result.eff_xlim, result.eff_ylim)
        );
        assert_eq!(
            axes_limits(&result, AxesWindow::Observation),
            (result.obs_xlim, result.obs_ylim)
        );
    }

    #[test]
    fn test_radius_axis_label_by_survey_kind() {
        assert!(radius_axis_label(false).contains("Radius"));
        assert!(radius_axis_label(true).contains("M sin i"));
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested_path() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b").join("c.png");
        assert!(!target.parent().unwrap().exists());
        ensure_parent_dir(&target).unwrap();
        assert!(target.parent().unwrap().is_dir());
        // idempotent
        ensure_parent_dir(&target).unwrap();
    }
}
