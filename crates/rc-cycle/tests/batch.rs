use chrono::{NaiveDate, NaiveDateTime};
use rc_core::ReasonKind;
use rc_cycle::{
    AnomalyFlag, CycleEngine, EngineConfig, EngineError, QualityBucket, RatedPoint,
    SensorRoleMapping, SensorSample,
};
use rc_fluids::{Refrigerant, SurrogateProvider};

const CONFIG_YAML: &str = r#"
refrigerant: R290
on_time_pressure_threshold_psig: 85
rated:
  mass_flow_lb_hr: 211
  compressor_hz: 75
  displacement_in3: 2.82
  suction_density_lb_ft3: 0.50031
circuits:
  - label: LH
  - label: CTR
  - label: RH
"#;

fn engine() -> CycleEngine<SurrogateProvider> {
    let config = EngineConfig::from_yaml_str(CONFIG_YAML).unwrap();
    CycleEngine::new(config, SensorRoleMapping::empty(), SurrogateProvider::new()).unwrap()
}

fn ts(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, minute, 0)
        .unwrap()
}

fn running(minute: u32) -> SensorSample {
    SensorSample::new(ts(minute))
        .with("P_suc", 70.0)
        .with("P_cond", 200.0)
        .with("T_2b", 55.0)
        .with("T_3a", 160.0)
        .with("T_4a", 95.0)
        .with("T_4b-lh", 90.0)
        .with("Compressor RPM", 3600.0)
}

fn idle(minute: u32) -> SensorSample {
    SensorSample::new(ts(minute))
        .with("P_suc", 95.0)
        .with("P_cond", 60.0)
}

#[test]
fn off_time_samples_are_dropped_and_records_sorted() {
    let samples = vec![running(7), idle(1), running(3), idle(4), running(5)];
    let result = engine().run_batch(&samples);

    let stamps: Vec<NaiveDateTime> = result.records.iter().map(|r| r.timestamp).collect();
    assert_eq!(stamps, vec![ts(3), ts(5), ts(7)]);

    let summary = &result.summary;
    assert_eq!(summary.total_samples, 5);
    assert_eq!(summary.on_time_samples, 3);
    assert!((summary.percent_on_time - 60.0).abs() < 1e-9);
}

#[test]
fn empty_batch() {
    let result = engine().run_batch(&[]);
    assert!(result.records.is_empty());
    assert_eq!(result.summary.on_time_samples, 0);
    assert_eq!(result.summary.percent_on_time, 0.0);
    assert!(result.summary.metrics.is_empty());
}

#[test]
fn batch_matches_single_sample_resolution() {
    let engine = engine();
    let samples = vec![running(2), running(1)];
    let result = engine.run_batch(&samples);
    // Cached lookups give the same numbers as the uncached path.
    assert_eq!(result.records[0], engine.resolve_sample(&samples[1]));
    assert_eq!(result.records[1], engine.resolve_sample(&samples[0]));
}

#[test]
fn summary_statistics_and_duty_weighting() {
    let samples = vec![
        running(0),
        running(1).with("Compressor RPM", 3000.0),
        idle(2),
        idle(3),
    ];
    let result = engine().run_batch(&samples);
    let summary = &result.summary;

    let capacity = &summary.metrics["capacity_btu_hr"];
    assert_eq!(capacity.count, 2);
    assert!(capacity.min < capacity.max);
    assert!(capacity.stddev > 0.0);
    let expected = capacity.mean * 0.5;
    let duty = summary.duty_weighted_capacity_btu_hr.unwrap();
    assert!((duty - expected).abs() < 1e-6, "duty = {duty}, expected {expected}");

    assert_eq!(summary.flag_count(AnomalyFlag::Ok), 2);
    assert_eq!(summary.quality_counts.get(&QualityBucket::Good), Some(&2));

    let text = summary.to_string();
    assert!(text.contains("50.0"), "{text}");
}

#[test]
fn heat_balance_within_tolerance_and_divergent() {
    let engine = engine();

    let balanced = running(0)
        .with("T_waterin", 70.0)
        .with("T_waterout", 94.8)
        .with("Total Water Flow Meter", 3.0);
    let record = engine.resolve_sample(&balanced);
    let hb = &record.heat_balance;
    let ratio = hb.ratio.get().unwrap();
    assert!((ratio - 1.0).abs() < 0.05, "ratio = {ratio}");
    assert_eq!(hb.within_tolerance, Some(true));
    assert!(!hb.is_divergent());

    let diverging = running(1)
        .with("T_waterin", 70.0)
        .with("T_waterout", 94.8)
        .with("Total Water Flow Meter", 6.0);
    let result = engine.run_batch(&[balanced, diverging]);
    assert_eq!(result.summary.heat_balance_warnings, 1);
    assert_eq!(result.records[1].heat_balance.within_tolerance, Some(false));
}

#[test]
fn unavailable_reasons_are_counted() {
    let no_rpm = SensorSample::new(ts(0))
        .with("P_suc", 70.0)
        .with("P_cond", 200.0)
        .with("T_2b", 55.0)
        .with("T_4b-lh", 90.0);
    let out_of_band = running(1).with("h_3a", 900.0);
    let result = engine().run_batch(&[no_rpm, out_of_band]);

    let counts = &result.summary.unavailable_counts;
    assert_eq!(counts.get(&ReasonKind::Missing), Some(&2));
    assert_eq!(counts.get(&ReasonKind::Implausible), Some(&1));
    assert!(result.records[1]
        .unavailable_kinds()
        .contains(&ReasonKind::Implausible));
}

#[test]
fn config_errors_name_the_parameter() {
    let mut config = EngineConfig::from_yaml_str(CONFIG_YAML).unwrap();
    config.rated.as_mut().unwrap().displacement_in3 = None;
    let err = CycleEngine::new(config, SensorRoleMapping::empty(), SurrogateProvider::new())
        .err()
        .unwrap();
    match err {
        EngineError::Configuration(e) => assert_eq!(e.parameter(), Some("rated.displacement_in3")),
        other => panic!("unexpected error: {other}"),
    }

    let config = EngineConfig {
        refrigerant: "R744".to_string(),
        ..EngineConfig::from_yaml_str(CONFIG_YAML).unwrap()
    };
    let err = CycleEngine::new(config, SensorRoleMapping::empty(), SurrogateProvider::new())
        .err()
        .unwrap();
    assert!(err.to_string().contains("R744"), "{err}");

    assert!(EngineConfig::from_yaml_str("refrigerant: R290\n").is_err());
    assert!(EngineConfig::from_yaml_str(&format!("{CONFIG_YAML}bogus: 1\n")).is_err());
}

#[test]
fn rated_density_from_temperatures() {
    let config = EngineConfig {
        rated: Some(RatedPoint {
            mass_flow_lb_hr: Some(211.0),
            compressor_hz: Some(75.0),
            displacement_in3: Some(2.82),
            suction_density_lb_ft3: None,
            evaporating_temp_f: Some(20.0),
            return_gas_temp_f: Some(35.0),
        }),
        ..EngineConfig::default()
    };
    let engine =
        CycleEngine::new(config, SensorRoleMapping::empty(), SurrogateProvider::new()).unwrap();
    let eta = engine.efficiency().eta;
    assert!(eta > 0.5 && eta < 1.5, "eta = {eta}");
    assert_eq!(engine.refrigerant(), Refrigerant::R290);
}

#[test]
fn dome_spans_configured_range() {
    let dome = engine().saturation_dome();
    assert!(!dome.is_empty());
    assert!(dome.len() <= 50);
    let first = &dome.points[0];
    assert!(first.pressure_kpa >= 100.0 - 1e-6);
    assert!(first.h_liquid < first.h_vapor);
}
