//! Cycle engine and batch runner.

use crate::anomaly::{AnomalyReport, classify};
use crate::channels::{ChannelResolver, Field};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineResult};
use crate::heat_balance::HeatBalance;
use crate::mapping::SensorRoleMapping;
use crate::massflow::{VolumetricEfficiency, rated_suction_density};
use crate::metrics::DerivedMetrics;
use crate::on_time::OnTimeFilter;
use crate::path::{CyclePaths, build_paths};
use crate::point::{CyclePoint, ResolvedCycle};
use crate::resolver::StateResolver;
use crate::sample::SensorSample;
use crate::summary::RunSummary;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use rc_core::{Avail, Reason, ReasonKind};
use rc_fluids::{MemoizedProvider, PropertyProvider, Refrigerant, SaturationDome, saturation_dome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Everything computed for one on-time sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: NaiveDateTime,
    /// Available points, by id and circuit.
    pub points: Vec<CyclePoint>,
    /// Full resolution, including why points are unavailable.
    pub cycle: ResolvedCycle,
    pub metrics: DerivedMetrics,
    pub heat_balance: HeatBalance,
    pub anomalies: AnomalyReport,
    pub paths: CyclePaths,
}

impl SampleRecord {
    /// Categories of unavailable values in this record.
    pub fn unavailable_kinds(&self) -> BTreeSet<ReasonKind> {
        let common = &self.cycle.common;
        let states = [&common.p2b, &common.p3a, &common.p3b, &common.p4a]
            .into_iter()
            .chain(
                self.cycle
                    .circuits
                    .iter()
                    .flat_map(|c| [&c.p4b, &c.p1, &c.p2a]),
            )
            .filter_map(|s| s.reason());
        let metrics = [
            &self.metrics.mass_flow_g_s,
            &self.metrics.capacity_w,
            &self.metrics.superheat_f,
            &self.metrics.subcooling_f,
        ]
        .into_iter()
        .filter_map(|m| m.reason());

        states.chain(metrics).map(Reason::kind).collect()
    }
}

/// Records in timestamp order plus the run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<SampleRecord>,
    pub summary: RunSummary,
}

/// The reconstruction engine for one rig configuration.
///
/// Configuration, role mapping and provider are fixed for the engine's
/// lifetime, so they cannot change mid-batch.
pub struct CycleEngine<P> {
    config: EngineConfig,
    mapping: SensorRoleMapping,
    provider: P,
    refrigerant: Refrigerant,
    efficiency: VolumetricEfficiency,
}

impl<P: PropertyProvider> CycleEngine<P> {
    /// Validate the configuration and calibrate volumetric efficiency.
    ///
    /// Fails with a configuration error before any sample is seen.
    pub fn new(
        config: EngineConfig,
        mapping: SensorRoleMapping,
        provider: P,
    ) -> EngineResult<Self> {
        config.validate()?;
        let refrigerant = config.refrigerant()?;
        if !provider.supports(refrigerant) {
            return Err(ConfigError::UnsupportedRefrigerant {
                refrigerant: refrigerant.to_string(),
                provider: provider.name().to_string(),
            }
            .into());
        }

        let rated = config.rated_inputs()?;
        let rated_density = rated_suction_density(&provider, refrigerant, &rated)?;
        let efficiency = VolumetricEfficiency::from_rated(&rated, rated_density)?;
        if efficiency.eta > 1.0 {
            warn!(eta = efficiency.eta, "volumetric efficiency above 1, check the rated point");
        }

        for (channel, roles) in mapping.duplicate_channels() {
            warn!(channel, roles = ?roles, "channel referenced by more than one role");
        }

        info!(
            refrigerant = %refrigerant,
            provider = provider.name(),
            eta_vol = efficiency.eta,
            circuits = config.circuits.len(),
            roles = mapping.len(),
            "cycle engine ready"
        );

        Ok(Self {
            config,
            mapping,
            provider,
            refrigerant,
            efficiency,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mapping(&self) -> &SensorRoleMapping {
        &self.mapping
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn refrigerant(&self) -> Refrigerant {
        self.refrigerant
    }

    pub fn efficiency(&self) -> &VolumetricEfficiency {
        &self.efficiency
    }

    pub fn channels(&self) -> ChannelResolver<'_> {
        ChannelResolver::new(&self.config, &self.mapping)
    }

    pub fn on_time_filter(&self) -> OnTimeFilter {
        OnTimeFilter::new(self.config.on_time_pressure_threshold_psig)
    }

    pub fn is_on(&self, sample: &SensorSample) -> bool {
        self.on_time_filter().is_on_sample(&self.channels(), sample)
    }

    /// Resolve one sample regardless of on-time state.
    pub fn resolve_sample(&self, sample: &SensorSample) -> SampleRecord {
        self.evaluate(&self.provider, sample)
    }

    fn evaluate<Q: PropertyProvider + ?Sized>(
        &self,
        provider: &Q,
        sample: &SensorSample,
    ) -> SampleRecord {
        let channels = self.channels();
        let resolver = StateResolver::new(&self.config, channels, provider, self.refrigerant);

        let cycle = resolver.resolve(sample);
        let lookups = resolver.lookups(&cycle);
        let rpm = channels.read(sample, &Field::CompressorRpm);
        let metrics = DerivedMetrics::compute(&cycle, &lookups, rpm, &self.efficiency);

        let water_gpm = channels
            .read(sample, &Field::WaterFlow)
            .or(Avail::from_option(self.config.water_gpm, || {
                Reason::missing("water_flow")
            }));
        let heat_balance = HeatBalance::compute(
            water_gpm,
            channels.read(sample, &Field::WaterInTemp),
            channels.read(sample, &Field::WaterOutTemp),
            &metrics.heat_rejection_w,
            &metrics.heat_rejection_effect_kj_kg,
            self.config.heat_balance_tolerance,
        );
        if heat_balance.is_divergent() {
            debug!(
                timestamp = %sample.timestamp,
                ratio = ?heat_balance.ratio.get(),
                "heat balance outside tolerance"
            );
        }

        let anomalies = classify(&cycle, &metrics, &self.config);
        let paths = build_paths(&cycle);

        SampleRecord {
            timestamp: sample.timestamp,
            points: cycle.points(),
            cycle,
            metrics,
            heat_balance,
            anomalies,
            paths,
        }
    }

    /// Filter, resolve in parallel and summarise a batch.
    ///
    /// Off-time samples produce no record. Records come back in timestamp
    /// order; ties keep input order.
    pub fn run_batch(&self, samples: &[SensorSample]) -> BatchResult {
        info!(samples = samples.len(), "batch started");
        let filter = self.on_time_filter();
        let channels = self.channels();
        let memo = MemoizedProvider::new(&self.provider);

        let mut records: Vec<SampleRecord> = samples
            .par_iter()
            .filter(|s| filter.is_on_sample(&channels, s))
            .map(|s| self.evaluate(&memo, s))
            .collect();
        records.sort_by_key(|r| r.timestamp);

        let summary = RunSummary::from_records(samples.len(), &records);
        let stats = memo.stats();
        debug!(hits = stats.hits, misses = stats.misses, entries = stats.entries, "property cache");
        if summary.heat_balance_warnings > 0 {
            warn!(
                samples = summary.heat_balance_warnings,
                tolerance = self.config.heat_balance_tolerance,
                "refrigerant and water heat diverge beyond tolerance"
            );
        }
        info!(
            on_time = summary.on_time_samples,
            percent_on_time = summary.percent_on_time,
            "batch finished"
        );
        BatchResult { records, summary }
    }

    /// Saturation dome over the configured pressure range.
    pub fn saturation_dome(&self) -> SaturationDome {
        let dome = &self.config.dome;
        saturation_dome(
            &self.provider,
            self.refrigerant,
            dome.p_min_kpa,
            dome.p_max_kpa,
            dome.points,
        )
    }
}
