//! Analysis-result data model
//!
//! A population-synthesis run hands the plotting layer a read-only result
//! object: one sample per survey population plus the axis windows and
//! model flags the renderers branch on. The whole model round-trips
//! through JSON so results can be exported and re-plotted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::stats;

/// Population model behind the synthetic survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationKind {
    /// Parametric occurrence-rate model
    Parametric,
    /// Planet-formation model output
    ModelBased,
}

/// Fitted broken power law for the period-ratio distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrokenPowerLawFit {
    /// Break location
    pub x0: f64,
    /// Power-law index below the break
    pub a: f64,
    /// Power-law index above the break
    pub b: f64,
}

impl BrokenPowerLawFit {
    pub fn eval(&self, x: f64) -> f64 {
        stats::broken_power_law(x, self.x0, self.a, self.b)
    }
}

/// Multiplicity and spacing statistics for one survey population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiStats {
    /// Multiplicity bin centers (planets per system)
    pub bins: Vec<f64>,
    /// Number of systems per multiplicity bin
    pub counts: Vec<f64>,
    /// Per-system planet counts, one entry per system
    pub cdf: Vec<f64>,
    /// Period ratios of adjacent planet pairs
    pub pratio: Vec<f64>,
    /// Orbital period of the innermost planet per system [days]
    pub pinner: Vec<f64>,
}

/// One survey population: the detected planet sample and its statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveySample {
    /// Orbital periods of detected planets [days]
    pub period: Vec<f64>,
    /// Planet radii [Earth radii], or M sin i [Earth masses] for RV surveys
    pub radius: Vec<f64>,
    pub multi: MultiStats,
}

impl SurveySample {
    fn validate(&self, label: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.period.len() == self.radius.len(),
            "{label}: period and radius arrays differ in length"
        );
        anyhow::ensure!(
            self.multi.bins.len() == self.multi.counts.len(),
            "{label}: multiplicity bins and counts differ in length"
        );
        Ok(())
    }
}

/// Read-only analysis result consumed by the plotting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Display name of the population model
    pub name: String,
    /// Base directory for plot output
    pub plotdir: PathBuf,
    /// Radial-velocity survey: mass axis instead of radius axis
    pub rv: bool,
    pub population: PopulationKind,
    /// Isotropic inclinations; suppresses the period-ratio fit overlay
    pub isotropic: bool,
    /// Period-ratio fit, present for parametric non-isotropic runs
    pub pratio_fit: Option<BrokenPowerLawFit>,
    /// Trimmed model window, period [days]
    pub xtrim: (f64, f64),
    /// Trimmed model window, radius
    pub ytrim: (f64, f64),
    /// Detection-efficiency grid limits
    pub eff_xlim: (f64, f64),
    pub eff_ylim: (f64, f64),
    /// Default observation window
    pub obs_xlim: (f64, f64),
    pub obs_ylim: (f64, f64),
    /// Full observed survey
    pub observed: SurveySample,
    /// Observed planets restricted to the synthetic survey's range
    pub obs_zoom: Option<SurveySample>,
    /// Monte Carlo synthetic survey
    pub synthetic: Option<SurveySample>,
}

impl AnalysisResult {
    /// Load a result exported as JSON and validate it.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis result {}", path.display()))?;
        let result: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse analysis result {}", path.display()))?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.is_empty(), "analysis result needs a display name");
        for (label, (lo, hi)) in [
            ("xtrim", self.xtrim),
            ("ytrim", self.ytrim),
            ("eff_xlim", self.eff_xlim),
            ("eff_ylim", self.eff_ylim),
            ("obs_xlim", self.obs_xlim),
            ("obs_ylim", self.obs_ylim),
        ] {
            anyhow::ensure!(
                lo > 0.0 && hi > lo,
                "{label} must satisfy 0 < lo < hi for log axes"
            );
        }
        self.observed.validate("observed")?;
        if let Some(zoom) = &self.obs_zoom {
            zoom.validate("obs_zoom")?;
        }
        if let Some(synthetic) = &self.synthetic {
            synthetic.validate("synthetic")?;
        }
        Ok(())
    }

    /// Synthetic survey, required in Monte Carlo mode.
    pub fn synthetic_survey(&self) -> anyhow::Result<&SurveySample> {
        self.synthetic
            .as_ref()
            .context("analysis result carries no synthetic survey")
    }

    /// Observed subset over the synthetic survey's range, required in
    /// Monte Carlo mode.
    pub fn observed_subset(&self) -> anyhow::Result<&SurveySample> {
        self.obs_zoom
            .as_ref()
            .context("analysis result carries no observed subset")
    }

    /// Period-ratio fit parameters for the overlay curve.
    pub fn period_ratio_fit(&self) -> anyhow::Result<&BrokenPowerLawFit> {
        self.pratio_fit
            .as_ref()
            .context("parametric result carries no period-ratio fit")
    }
}

/// Sample counts and median diagnostics for one population.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyMetrics {
    pub planets: usize,
    pub systems: usize,
    pub median_pratio: f64,
    pub median_pinner: f64,
}

impl SurveyMetrics {
    pub fn from_sample(sample: &SurveySample) -> Self {
        Self {
            planets: sample.period.len(),
            systems: sample.multi.cdf.len(),
            median_pratio: stats::median(&sample.multi.pratio),
            median_pinner: stats::median(&sample.multi.pinner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_result() -> AnalysisResult {
        AnalysisResult {
            name: "test model".to_string(),
            plotdir: PathBuf::from("diagnostics"),
            rv: false,
            population: PopulationKind::Parametric,
            isotropic: false,
            pratio_fit: Some(BrokenPowerLawFit { x0: 1.8, a: 6.0, b: -2.5 }),
            xtrim: (2.0, 400.0),
            ytrim: (0.5, 16.0),
            eff_xlim: (1.0, 500.0),
            eff_ylim: (0.4, 18.0),
            obs_xlim: (0.5, 730.0),
            obs_ylim: (0.3, 20.0),
            observed: SurveySample {
                period: vec![3.0, 7.5],
                radius: vec![1.1, 2.4],
                multi: MultiStats {
                    bins: vec![1.0, 2.0],
                    counts: vec![1.0, 0.0],
                    cdf: vec![2.0],
                    pratio: vec![2.5],
                    pinner: vec![3.0],
                },
            },
            obs_zoom: None,
            synthetic: None,
        }
    }

    #[test]
    fn test_json_round_trip() {
        let result = minimal_result();
        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }

    #[test]
    fn test_missing_synthetic_is_an_error() {
        let result = minimal_result();
        assert!(result.synthetic_survey().is_err());
        assert!(result.observed_subset().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut result = minimal_result();
        result.xtrim = (400.0, 2.0);
        assert!(result.validate().is_err());
        result.xtrim = (0.0, 400.0);
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_sample() {
        let mut result = minimal_result();
        result.observed.radius.pop();
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_metrics_medians() {
        let metrics = SurveyMetrics::from_sample(&minimal_result().observed);
        assert_eq!(metrics.planets, 2);
        assert_eq!(metrics.systems, 1);
        assert!((metrics.median_pratio - 2.5).abs() < 1e-12);
        assert!((metrics.median_pinner - 3.0).abs() < 1e-12);
    }
}
