//! rc-cycle: refrigeration cycle reconstruction from rig sensor data.
//!
//! Each on-time sample is turned into the canonical state points
//! (`2b`, `3a`, `3b`, `4a` shared, `4b`, `1`, `2a` per circuit), derived
//! metrics, a water-side heat balance, anomaly flags and diagram paths.
//!
//! ```text
//! SensorSample -> OnTimeFilter -> StateResolver -> metrics / heat balance
//!              -> anomaly classifier -> path builder -> SampleRecord
//! ```
//!
//! [`CycleEngine`] owns the validated configuration, the role mapping and
//! the property provider; [`CycleEngine::run_batch`] evaluates samples in
//! parallel and summarises the run.

pub mod anomaly;
pub mod channels;
pub mod config;
pub mod engine;
pub mod error;
pub mod heat_balance;
pub mod mapping;
pub mod massflow;
pub mod metrics;
pub mod on_time;
pub mod path;
pub mod point;
pub mod resolver;
pub mod sample;
pub mod summary;

pub use anomaly::{AnomalyFlag, AnomalyReport, QualityBucket, SubcoolingSeverity, classify};
pub use channels::{ChannelResolver, Field};
pub use config::{CircuitConfig, ComponentIds, DomeConfig, EngineConfig, RatedPoint};
pub use engine::{BatchResult, CycleEngine, SampleRecord};
pub use error::{ConfigError, EngineError, EngineResult};
pub use heat_balance::HeatBalance;
pub use mapping::{RoleKey, SensorRoleMapping};
pub use massflow::VolumetricEfficiency;
pub use metrics::{CircuitMetrics, DerivedMetrics};
pub use on_time::OnTimeFilter;
pub use path::{CyclePath, CyclePaths, PathPoint, PathSegment, build_paths};
pub use point::{
    CircuitCycle, CircuitPoints, CircuitTag, CommonPoints, CyclePoint, PointId, RefrigerantState,
    ResolvedCycle,
};
pub use resolver::StateResolver;
pub use sample::{SensorSample, load_samples_json};
pub use summary::{MetricStats, RunSummary, SUMMARY_METRICS, record_metric};
