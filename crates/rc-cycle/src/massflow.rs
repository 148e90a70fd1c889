//! Mass flow and capacity from compressor displacement.
//!
//! `m_dot = rho_suction * eta_vol * V_displacement * f_rotation`, with the
//! volumetric efficiency calibrated once from the rated point:
//! `eta_vol = m_dot_rated / (rho_rated * V_displacement * f_rated)`.

use crate::config::{RatedDensity, RatedInputs};
use crate::error::{ConfigError, EngineResult};
use rc_core::convert::{
    fahrenheit_to_kelvin, g_per_s_from_lb_per_hr, in3_to_m3, lb_per_ft3_to_kg_per_m3, rpm_to_hz,
};
use rc_core::units::{Density, Frequency, MassRate, Volume, hz, k, kg_m3, kgps, m3, pa};
use rc_core::{Avail, Reason};
use rc_fluids::{PropertyProvider, Refrigerant, StateInput};
use uom::si::mass_rate::gram_per_second;

/// Calibrated volumetric efficiency for one compressor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumetricEfficiency {
    pub eta: f64,
    pub displacement: Volume,
}

impl VolumetricEfficiency {
    /// Calibrate from the rated point and the rated suction density [kg/m³].
    pub fn from_rated(rated: &RatedInputs, rated_density_kg_m3: f64) -> EngineResult<Self> {
        let displacement = m3(in3_to_m3(rated.displacement_in3));
        let rated_flow: MassRate = kgps(g_per_s_from_lb_per_hr(rated.mass_flow_lb_hr) / 1000.0);
        let swept: MassRate = kg_m3(rated_density_kg_m3) * displacement * hz(rated.compressor_hz);

        let eta = (rated_flow / swept).value;
        if !eta.is_finite() || eta <= 0.0 {
            return Err(ConfigError::invalid(
                "rated",
                eta,
                "rated point gives a non-positive volumetric efficiency",
            )
            .into());
        }
        Ok(Self { eta, displacement })
    }

    /// Refrigerant mass flow [g/s].
    ///
    /// Unavailable (never zero) when density or speed is missing.
    pub fn mass_flow_g_s(&self, suction_density_kg_m3: &Avail<f64>, rpm: &Avail<f64>) -> Avail<f64> {
        suction_density_kg_m3
            .as_ref()
            .zip(rpm.as_ref())
            .and_then(|(&rho, &rpm)| {
                if rpm < 0.0 {
                    return Avail::Unavailable(Reason::implausible("compressor_rpm", rpm));
                }
                let density: Density = kg_m3(rho);
                let speed: Frequency = hz(rpm_to_hz(rpm));
                let flow: MassRate = density * self.displacement * speed * self.eta;
                Avail::Available(flow.get::<gram_per_second>())
            })
    }
}

/// Rated suction density [kg/m³], either given or looked up from the rated temperatures.
pub fn rated_suction_density<P: PropertyProvider + ?Sized>(
    provider: &P,
    refrigerant: Refrigerant,
    rated: &RatedInputs,
) -> EngineResult<f64> {
    match rated.density {
        RatedDensity::Direct { lb_ft3 } => Ok(lb_per_ft3_to_kg_per_m3(lb_ft3)),
        RatedDensity::FromTemperatures {
            evaporating_f,
            return_gas_f,
        } => {
            let lookup_failed = |e: rc_fluids::FluidError| ConfigError::InvalidValue {
                parameter: "rated.evaporating_temp_f".to_string(),
                value: evaporating_f.to_string(),
                reason: format!("rated density lookup failed: {e}"),
            };
            let p_sat = provider
                .saturation_pressure(refrigerant, k(fahrenheit_to_kelvin(evaporating_f)))
                .map_err(lookup_failed)?;
            let rho = provider
                .density(
                    refrigerant,
                    StateInput::PT {
                        p: pa(p_sat),
                        t: k(fahrenheit_to_kelvin(return_gas_f)),
                    },
                )
                .map_err(lookup_failed)?;
            tracing::debug!(p_sat_pa = p_sat, rho, "rated suction density from rated temperatures");
            Ok(rho)
        }
    }
}

/// `m_dot * delta_h`; g/s × kJ/kg = W.
pub fn heat_rate_w(mass_flow_g_s: &Avail<f64>, delta_h_kj_kg: &Avail<f64>) -> Avail<f64> {
    mass_flow_g_s
        .as_ref()
        .zip(delta_h_kj_kg.as_ref())
        .map(|(&m, &dh)| m * dh)
}
