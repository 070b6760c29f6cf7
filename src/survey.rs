//! Demo survey generation
//!
//! Fabricates a seeded, fully-populated analysis result so the CLI can
//! render the chart suite without a population-synthesis run attached.
//! Multiplicities come from a weighted discrete draw; each system gets a
//! log-uniform innermost period stretched outward by log-normal spacing
//! ratios.

use std::path::PathBuf;

use anyhow::Context;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::analysis::{
    AnalysisResult, BrokenPowerLawFit, MultiStats, PopulationKind, SurveySample,
};

/// Largest multiplicity bin of the generated populations.
pub const MAX_MULTIPLICITY: usize = 8;

/// Relative frequency of 1..=8 planet systems.
const MULTIPLICITY_WEIGHTS: [f64; MAX_MULTIPLICITY] =
    [0.45, 0.22, 0.13, 0.08, 0.05, 0.035, 0.02, 0.015];

/// log10 mean (ratio 1.8) and spread of adjacent-planet period ratios.
const LOG_RATIO_MU: f64 = 0.2553;
const LOG_RATIO_SIGMA: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// RNG seed for reproducibility
    pub seed: u64,
    /// Number of planetary systems per population
    pub systems: usize,
    /// Display name of the fabricated model
    pub name: String,
    /// Base directory for plot output
    pub plotdir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 17,
            systems: 1200,
            name: "demo model".to_string(),
            plotdir: PathBuf::from("diagnostics"),
        }
    }
}

/// Build a deterministic, fully-populated analysis result.
pub fn demo_result(cfg: &DemoConfig) -> anyhow::Result<AnalysisResult> {
    let xtrim = (2.0, 400.0);
    let ytrim = (0.5, 16.0);
    let obs_xlim = (0.5, 730.0);
    let obs_ylim = (0.3, 20.0);

    let obs_systems = draw_systems(cfg.seed, cfg.systems, obs_xlim, obs_ylim)?;
    let syn_systems = draw_systems(cfg.seed ^ 0x5337_AB1E, cfg.systems, xtrim, ytrim)?;

    let observed = collect_sample(&obs_systems);
    let obs_zoom = collect_sample(&restrict_systems(&obs_systems, xtrim, ytrim));
    let synthetic = collect_sample(&syn_systems);

    Ok(AnalysisResult {
        name: cfg.name.clone(),
        plotdir: cfg.plotdir.clone(),
        rv: false,
        population: PopulationKind::Parametric,
        isotropic: false,
        pratio_fit: Some(BrokenPowerLawFit { x0: 1.8, a: 6.0, b: -2.5 }),
        xtrim,
        ytrim,
        eff_xlim: (1.0, 500.0),
        eff_ylim: (0.4, 18.0),
        obs_xlim,
        obs_ylim,
        observed,
        obs_zoom: Some(obs_zoom),
        synthetic: Some(synthetic),
    })
}

/// Draw planetary systems as `(period, radius)` lists, sorted by period.
fn draw_systems(
    seed: u64,
    n: usize,
    (p_lo, p_hi): (f64, f64),
    (r_lo, r_hi): (f64, f64),
) -> anyhow::Result<Vec<Vec<(f64, f64)>>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let multiplicity =
        WeightedIndex::new(MULTIPLICITY_WEIGHTS).context("invalid multiplicity weights")?;

    let mut systems = Vec::with_capacity(n);
    for _ in 0..n {
        let planets = multiplicity.sample(&mut rng) + 1;
        let mut system = Vec::with_capacity(planets);
        // innermost period lands in the lower third of the window so
        // multi-planet systems have room outward
        let mut period = log_uniform(&mut rng, p_lo, p_hi / 3.0);
        for _ in 0..planets {
            if period > p_hi {
                break;
            }
            let radius = log_uniform(&mut rng, r_lo, r_hi);
            system.push((period, radius));
            let z: f64 = rng.sample(StandardNormal);
            period *= 10f64.powf(LOG_RATIO_MU + LOG_RATIO_SIGMA * z).max(1.02);
        }
        systems.push(system);
    }
    Ok(systems)
}

fn log_uniform(rng: &mut ChaCha8Rng, lo: f64, hi: f64) -> f64 {
    10f64.powf(rng.gen_range(lo.log10()..hi.log10()))
}

/// Keep only planets inside the window, dropping emptied systems.
fn restrict_systems(
    systems: &[Vec<(f64, f64)>],
    (p_lo, p_hi): (f64, f64),
    (r_lo, r_hi): (f64, f64),
) -> Vec<Vec<(f64, f64)>> {
    systems
        .iter()
        .map(|system| {
            system
                .iter()
                .copied()
                .filter(|&(p, r)| p >= p_lo && p <= p_hi && r >= r_lo && r <= r_hi)
                .collect::<Vec<_>>()
        })
        .filter(|system| !system.is_empty())
        .collect()
}

/// Flatten systems into the per-population sample arrays.
fn collect_sample(systems: &[Vec<(f64, f64)>]) -> SurveySample {
    let mut sample = SurveySample {
        period: Vec::new(),
        radius: Vec::new(),
        multi: MultiStats {
            bins: (1..=MAX_MULTIPLICITY).map(|k| k as f64).collect(),
            counts: vec![0.0; MAX_MULTIPLICITY],
            ..MultiStats::default()
        },
    };

    for system in systems {
        if system.is_empty() {
            continue;
        }
        for &(p, r) in system {
            sample.period.push(p);
            sample.radius.push(r);
        }
        sample.multi.pinner.push(system[0].0);
        for pair in system.windows(2) {
            sample.multi.pratio.push(pair[1].0 / pair[0].0);
        }
        let k = system.len();
        sample.multi.counts[k.min(MAX_MULTIPLICITY) - 1] += 1.0;
        sample.multi.cdf.push(k as f64);
    }
    sample
}
