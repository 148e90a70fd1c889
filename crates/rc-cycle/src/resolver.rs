//! State-point resolver.
//!
//! Turns one sample into the canonical cycle points. Each sample is resolved
//! on its own; nothing carries over between samples.

use crate::channels::{ChannelResolver, Field};
use crate::config::EngineConfig;
use crate::point::{CircuitPoints, CommonPoints, RefrigerantState, ResolvedCycle};
use crate::sample::SensorSample;
use rc_core::convert::{fahrenheit_to_kelvin, psig_to_pa_abs};
use rc_core::units::{k, kpa};
use rc_core::{Avail, Reason};
use rc_fluids::{PropertyProvider, Refrigerant, StateInput};
use tracing::debug;

/// Property lookups that depend on a resolved cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLookups {
    pub t_sat_suction_k: Avail<f64>,
    pub t_sat_discharge_k: Avail<f64>,
    /// Density at the compressor inlet [kg/m³].
    pub suction_density_kg_m3: Avail<f64>,
}

pub struct StateResolver<'a, P: ?Sized> {
    config: &'a EngineConfig,
    channels: ChannelResolver<'a>,
    provider: &'a P,
    refrigerant: Refrigerant,
}

impl<'a, P: PropertyProvider + ?Sized> StateResolver<'a, P> {
    pub fn new(
        config: &'a EngineConfig,
        channels: ChannelResolver<'a>,
        provider: &'a P,
        refrigerant: Refrigerant,
    ) -> Self {
        Self {
            config,
            channels,
            provider,
            refrigerant,
        }
    }

    /// Absolute pressure [kPa] from a psig channel.
    pub fn pressure_kpa(&self, sample: &SensorSample, field: &Field) -> Avail<f64> {
        self.channels
            .read(sample, field)
            .map(|psig| psig_to_pa_abs(psig) / 1000.0)
    }

    pub fn resolve(&self, sample: &SensorSample) -> ResolvedCycle {
        let suction = self.pressure_kpa(sample, &Field::SuctionPressure);
        let discharge = self.pressure_kpa(sample, &Field::DischargePressure);

        let common = CommonPoints {
            p2b: self.measured_point(
                "2b",
                &suction,
                self.channels.read(sample, &Field::CompressorInletTemp),
                self.channels.read(sample, &Field::CompressorInletEnthalpy),
            ),
            p3a: self.measured_point(
                "3a",
                &discharge,
                self.channels.read(sample, &Field::CompressorOutletTemp),
                self.channels.read(sample, &Field::CompressorOutletEnthalpy),
            ),
            p3b: self.measured_point(
                "3b",
                &discharge,
                self.channels.read(sample, &Field::CondenserInletTemp),
                self.channels.read(sample, &Field::CondenserInletEnthalpy),
            ),
            p4a: self.measured_point(
                "4a",
                &discharge,
                self.channels.read(sample, &Field::CondenserOutletTemp),
                self.channels.read(sample, &Field::CondenserOutletEnthalpy),
            ),
        };

        let circuits = self
            .config
            .circuits
            .iter()
            .map(|circuit| {
                let label = circuit.label.clone();
                let p4b = self.measured_point(
                    &format!("4b {label}"),
                    &discharge,
                    self.channels
                        .read(sample, &Field::TxvInletTemp(label.clone())),
                    self.channels
                        .read(sample, &Field::TxvInletEnthalpy(label.clone())),
                );
                let p1 = self.expansion_outlet(&p4b, &suction);
                let p2a = self.measured_point(
                    &format!("2a {label}"),
                    &suction,
                    self.channels
                        .read_mean(sample, &Field::EvapOutletTemp(label.clone())),
                    self.channels
                        .read(sample, &Field::EvapOutletEnthalpy(label.clone())),
                );
                CircuitPoints { label, p4b, p1, p2a }
            })
            .collect();

        ResolvedCycle {
            suction_kpa: suction,
            discharge_kpa: discharge,
            common,
            circuits,
        }
    }

    /// A point fixed by a measured temperature [°F] and the line pressure.
    ///
    /// A direct enthalpy channel is preferred over a (P, T) lookup.
    fn measured_point(
        &self,
        what: &str,
        pressure_kpa: &Avail<f64>,
        temperature_f: Avail<f64>,
        direct_enthalpy: Avail<f64>,
    ) -> Avail<RefrigerantState> {
        let p_kpa = match pressure_kpa {
            Avail::Available(p) => *p,
            Avail::Unavailable(reason) => return Avail::Unavailable(reason.clone()),
        };
        let t_k = temperature_f.get().map(fahrenheit_to_kelvin);

        let h = match (direct_enthalpy.get(), t_k) {
            (Some(h), _) => h,
            (None, Some(t)) => {
                let input = StateInput::PT {
                    p: kpa(p_kpa),
                    t: k(t),
                };
                match self.provider.enthalpy(self.refrigerant, input) {
                    Ok(h) => h,
                    Err(e) => {
                        debug!(point = what, p_kpa, t_k = t, error = %e, "enthalpy lookup failed");
                        return Avail::Unavailable(Reason::lookup(what, e));
                    }
                }
            }
            (None, None) => {
                return Avail::Unavailable(
                    temperature_f
                        .reason()
                        .cloned()
                        .unwrap_or_else(|| Reason::missing(what)),
                );
            }
        };

        self.accept_enthalpy(what, h).map(|h| RefrigerantState {
            pressure_kpa: p_kpa,
            temperature_k: t_k,
            enthalpy_kj_kg: h,
            quality: None,
        })
    }

    /// Evaporator inlet: isenthalpic from the TXV inlet, at suction pressure.
    fn expansion_outlet(
        &self,
        p4b: &Avail<RefrigerantState>,
        suction_kpa: &Avail<f64>,
    ) -> Avail<RefrigerantState> {
        p4b.as_ref()
            .zip(suction_kpa.as_ref())
            .map(|(txv_inlet, &p_kpa)| {
                let h = txv_inlet.enthalpy_kj_kg;
                let input = StateInput::PH { p: kpa(p_kpa), h };
                RefrigerantState {
                    pressure_kpa: p_kpa,
                    temperature_k: self.provider.temperature(self.refrigerant, input).ok(),
                    enthalpy_kj_kg: h,
                    quality: self.provider.quality(self.refrigerant, input).ok(),
                }
            })
    }

    fn accept_enthalpy(&self, what: &str, h: f64) -> Avail<f64> {
        let (low, high) = self.config.enthalpy_band_kj_kg;
        if h.is_finite() && (low..=high).contains(&h) {
            Avail::Available(h)
        } else {
            debug!(point = what, h, low, high, "enthalpy outside acceptance band, discarded");
            Avail::Unavailable(Reason::implausible(what, h))
        }
    }

    pub fn saturation_temperature_k(&self, what: &str, pressure_kpa: &Avail<f64>) -> Avail<f64> {
        pressure_kpa.as_ref().and_then(|&p| {
            let result = self
                .provider
                .saturation_temperature(self.refrigerant, kpa(p));
            if let Err(e) = &result {
                debug!(what, p_kpa = p, error = %e, "saturation lookup failed");
            }
            Avail::from((result, what))
        })
    }

    /// Density at a resolved state; (P, T) when the temperature is known, else (P, h).
    pub fn density_kg_m3(&self, what: &str, state: &Avail<RefrigerantState>) -> Avail<f64> {
        state.as_ref().and_then(|s| {
            let input = match s.temperature_k {
                Some(t) => StateInput::PT {
                    p: kpa(s.pressure_kpa),
                    t: k(t),
                },
                None => StateInput::PH {
                    p: kpa(s.pressure_kpa),
                    h: s.enthalpy_kj_kg,
                },
            };
            Avail::from((self.provider.density(self.refrigerant, input), what))
        })
    }

    pub fn lookups(&self, cycle: &ResolvedCycle) -> PropertyLookups {
        PropertyLookups {
            t_sat_suction_k: self.saturation_temperature_k("saturation at suction", &cycle.suction_kpa),
            t_sat_discharge_k: self
                .saturation_temperature_k("saturation at discharge", &cycle.discharge_kpa),
            suction_density_kg_m3: self.density_kg_m3("suction density", &cycle.common.p2b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SensorRoleMapping;
    use chrono::NaiveDateTime;
    use rc_core::ReasonKind;
    use rc_fluids::SurrogateProvider;

    fn base_sample() -> SensorSample {
        SensorSample::new(NaiveDateTime::default())
            .with("P_suc", 70.0)
            .with("P_cond", 200.0)
            .with("T_2b", 55.0)
            .with("T_4b-lh", 90.0)
            .with("T_2a-LH", 50.0)
    }

    fn resolve(config: &EngineConfig, sample: &SensorSample) -> ResolvedCycle {
        let mapping = SensorRoleMapping::empty();
        let provider = SurrogateProvider::new();
        let channels = ChannelResolver::new(config, &mapping);
        StateResolver::new(config, channels, &provider, Refrigerant::R290).resolve(sample)
    }

    #[test]
    fn suction_and_discharge_in_kpa_abs() {
        let cycle = resolve(&EngineConfig::default(), &base_sample());
        let suc = cycle.suction_kpa.get().unwrap();
        let dis = cycle.discharge_kpa.get().unwrap();
        assert!((suc - 583.958).abs() < 1e-3, "suction = {suc}");
        assert!((dis - 1480.287).abs() < 1e-3, "discharge = {dis}");
    }

    #[test]
    fn expansion_is_isenthalpic() {
        let cycle = resolve(&EngineConfig::default(), &base_sample());
        let lh = cycle.circuit("LH").unwrap();
        let h4b = lh.p4b.get().unwrap();
        let h1 = lh.p1.get().unwrap();
        assert_eq!(h1.enthalpy_kj_kg, h4b.enthalpy_kj_kg);
        assert_eq!(h1.pressure_kpa, cycle.suction_kpa.get().unwrap());
        // Flashing liquid: point 1 sits inside the dome.
        let x = h1.quality.unwrap();
        assert!(x > 0.0 && x < 0.5, "x = {x}");
    }

    #[test]
    fn direct_enthalpy_preferred() {
        let sample = base_sample().with("h_2b", 600.0);
        let cycle = resolve(&EngineConfig::default(), &sample);
        let p2b = cycle.common.p2b.get().unwrap();
        assert_eq!(p2b.enthalpy_kj_kg, 600.0);
        assert!(p2b.temperature_k.is_some());
    }

    #[test]
    fn enthalpy_outside_band_is_implausible() {
        let sample = base_sample().with("h_3a", 750.0);
        let cycle = resolve(&EngineConfig::default(), &sample);
        assert_eq!(
            cycle.common.p3a.reason().map(|r| r.kind()),
            Some(ReasonKind::Implausible)
        );
    }

    #[test]
    fn enthalpy_band_is_inclusive() {
        let config = EngineConfig::default();
        let verdict = |h: f64| {
            let sample = base_sample().with("h_4a", h);
            resolve(&config, &sample).common.p4a
        };
        for h in [200.0, 700.0] {
            assert_eq!(verdict(h).get().map(|s| s.enthalpy_kj_kg), Some(h));
        }
        for h in [199.9, 700.1] {
            assert_eq!(
                verdict(h).reason().map(|r| r.kind()),
                Some(ReasonKind::Implausible),
                "h = {h}"
            );
        }
    }

    #[test]
    fn missing_temperature_and_pressure() {
        let cycle = resolve(&EngineConfig::default(), &base_sample());
        // No T_4a channel
        assert_eq!(
            cycle.common.p4a.reason().map(|r| r.kind()),
            Some(ReasonKind::Missing)
        );
        // CTR has no TXV temperature, so neither 4b nor 1 resolve.
        let ctr = cycle.circuit("CTR").unwrap();
        assert!(!ctr.p4b.is_available());
        assert!(!ctr.p1.is_available());

        let no_suction = SensorSample::new(NaiveDateTime::default())
            .with("P_cond", 200.0)
            .with("T_2b", 55.0);
        let cycle = resolve(&EngineConfig::default(), &no_suction);
        assert_eq!(
            cycle.common.p2b.reason().map(|r| r.what()),
            Some("suction_pressure")
        );
    }
}
