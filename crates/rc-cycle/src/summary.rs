//! Run summary over the on-time records of a batch.

use crate::anomaly::{AnomalyFlag, QualityBucket, SubcoolingSeverity};
use crate::engine::SampleRecord;
use rc_core::{Avail, ReasonKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; zero for a single value.
    pub stddev: f64,
}

impl MetricStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let count = values.len();
        if count == 0 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let stddev = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(Self {
            count,
            mean,
            min,
            max,
            stddev,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_samples: usize,
    pub on_time_samples: usize,
    pub percent_on_time: f64,
    /// Statistics of key metrics over on-time samples where they are available.
    pub metrics: BTreeMap<String, MetricStats>,
    pub flag_counts: BTreeMap<AnomalyFlag, usize>,
    pub quality_counts: BTreeMap<QualityBucket, usize>,
    pub subcooling_severity_counts: BTreeMap<SubcoolingSeverity, usize>,
    /// Number of samples with at least one unavailable value of each kind.
    pub unavailable_counts: BTreeMap<ReasonKind, usize>,
    pub heat_balance_warnings: usize,
    /// Mean on-time capacity times the on-time fraction [BTU/hr].
    pub duty_weighted_capacity_btu_hr: Option<f64>,
}

/// Metrics summarised per run and exportable as a series.
pub const SUMMARY_METRICS: [&str; 8] = [
    "suction_psig",
    "discharge_psig",
    "pressure_ratio",
    "superheat_f",
    "subcooling_f",
    "mass_flow_lb_hr",
    "capacity_btu_hr",
    "heat_balance_ratio",
];

/// A summary metric of one record by name; `None` for unknown names.
pub fn record_metric<'a>(record: &'a SampleRecord, name: &str) -> Option<&'a Avail<f64>> {
    let m = &record.metrics;
    match name {
        "suction_psig" => Some(&m.suction_psig),
        "discharge_psig" => Some(&m.discharge_psig),
        "pressure_ratio" => Some(&m.pressure_ratio),
        "superheat_f" => Some(&m.superheat_f),
        "subcooling_f" => Some(&m.subcooling_f),
        "mass_flow_lb_hr" => Some(&m.mass_flow_lb_hr),
        "capacity_btu_hr" => Some(&m.capacity_btu_hr),
        "heat_balance_ratio" => Some(&record.heat_balance.ratio),
        _ => None,
    }
}

impl RunSummary {
    pub fn from_records(total_samples: usize, records: &[SampleRecord]) -> Self {
        let on_time_samples = records.len();
        let percent_on_time = if total_samples == 0 {
            0.0
        } else {
            100.0 * on_time_samples as f64 / total_samples as f64
        };

        let metrics: BTreeMap<String, MetricStats> = SUMMARY_METRICS
            .iter()
            .filter_map(|name| {
                let values: Vec<f64> = records
                    .iter()
                    .filter_map(|r| record_metric(r, name).and_then(Avail::get))
                    .collect();
                MetricStats::from_values(&values).map(|s| (name.to_string(), s))
            })
            .collect();

        let mut flag_counts = BTreeMap::new();
        let mut quality_counts = BTreeMap::new();
        let mut subcooling_severity_counts = BTreeMap::new();
        let mut unavailable_counts = BTreeMap::new();
        for record in records {
            for flag in &record.anomalies.flags {
                *flag_counts.entry(*flag).or_insert(0) += 1;
            }
            *quality_counts.entry(record.anomalies.quality).or_insert(0) += 1;
            if let Some(severity) = record.anomalies.subcooling_severity {
                *subcooling_severity_counts.entry(severity).or_insert(0) += 1;
            }
            for kind in record.unavailable_kinds() {
                *unavailable_counts.entry(kind).or_insert(0) += 1;
            }
        }

        let heat_balance_warnings = records
            .iter()
            .filter(|r| r.heat_balance.is_divergent())
            .count();

        let duty_weighted_capacity_btu_hr = metrics
            .get("capacity_btu_hr")
            .map(|c| c.mean * percent_on_time / 100.0);

        Self {
            total_samples,
            on_time_samples,
            percent_on_time,
            metrics,
            flag_counts,
            quality_counts,
            subcooling_severity_counts,
            unavailable_counts,
            heat_balance_warnings,
            duty_weighted_capacity_btu_hr,
        }
    }

    pub fn flag_count(&self, flag: AnomalyFlag) -> usize {
        self.flag_counts.get(&flag).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Samples: {} total, {} on-time ({:.1}%)",
            self.total_samples, self.on_time_samples, self.percent_on_time
        )?;
        for (name, s) in &self.metrics {
            writeln!(
                f,
                "  {name:<20} n={:<5} mean={:>10.3} min={:>10.3} max={:>10.3} sd={:>8.3}",
                s.count, s.mean, s.min, s.max, s.stddev
            )?;
        }
        if let Some(q) = self.duty_weighted_capacity_btu_hr {
            writeln!(f, "Duty-weighted capacity: {q:.0} BTU/hr")?;
        }
        writeln!(f, "Flags:")?;
        for (flag, count) in &self.flag_counts {
            writeln!(f, "  {flag:?}: {count}")?;
        }
        writeln!(f, "Quality:")?;
        for (bucket, count) in &self.quality_counts {
            writeln!(f, "  {bucket:?}: {count}")?;
        }
        if !self.unavailable_counts.is_empty() {
            writeln!(f, "Samples with unavailable values:")?;
            for (kind, count) in &self.unavailable_counts {
                writeln!(f, "  {kind:?}: {count}")?;
            }
        }
        write!(f, "Heat-balance warnings: {}", self.heat_balance_warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_basic() {
        let s = MetricStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.stddev - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn stats_single_and_empty() {
        let s = MetricStats::from_values(&[7.0]).unwrap();
        assert_eq!(s.stddev, 0.0);
        assert!(MetricStats::from_values(&[]).is_none());
    }

    #[test]
    fn empty_batch() {
        let summary = RunSummary::from_records(0, &[]);
        assert_eq!(summary.percent_on_time, 0.0);
        assert!(summary.metrics.is_empty());
        assert_eq!(summary.duty_weighted_capacity_btu_hr, None);
    }
}
