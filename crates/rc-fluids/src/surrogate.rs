//! Closed-form surrogate refrigerant model.
//!
//! A lightweight stand-in for CoolProp, used for tests, offline analysis and
//! machines without the native library. It combines:
//! - a two-constant vapor-pressure curve `ln P = A - B / T`
//! - linear saturated-liquid enthalpy and latent heat in temperature
//! - constant vapor heat capacity for superheat
//! - linear liquid density and ideal-gas vapor density
//!
//! Accuracy is a few percent around typical evaporating and condensing
//! conditions, which is adequate for cycle diagnostics, not for rating.

use crate::error::{FluidError, FluidResult};
use crate::provider::PropertyProvider;
use crate::refrigerant::Refrigerant;
use crate::state::{Property, StateInput};
use rc_core::Tolerances;
use std::collections::BTreeMap;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

/// Gas constant value [J/(kmol·K)]
const R_UNIVERSAL: f64 = 8314.462618;
/// Reference temperature for the linear fits [K].
const T_REF: f64 = 273.15;

/// Coefficients for one refrigerant. Enthalpies in kJ/kg, temperatures in K.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurrogateCoefficients {
    /// Vapor-pressure constant A (with P in Pa).
    pub antoine_a: f64,
    /// Vapor-pressure constant B [K].
    pub antoine_b: f64,
    /// Saturated-liquid enthalpy at 0 °C.
    pub h_liquid_ref: f64,
    /// Liquid heat capacity [kJ/(kg·K)].
    pub cp_liquid: f64,
    /// Latent heat at 0 °C.
    pub h_fg_ref: f64,
    /// Latent-heat slope [kJ/(kg·K)].
    pub h_fg_slope: f64,
    /// Vapor heat capacity [kJ/(kg·K)].
    pub cp_vapor: f64,
    /// Liquid density at 0 °C [kg/m³].
    pub rho_liquid_ref: f64,
    /// Liquid density slope [kg/(m³·K)].
    pub rho_liquid_slope: f64,
    /// Molar mass [kg/kmol].
    pub molar_mass: f64,
    /// Critical pressure [Pa].
    pub p_crit: f64,
    /// Critical temperature [K].
    pub t_crit: f64,
}

impl SurrogateCoefficients {
    /// Built-in fits, where available.
    pub fn for_refrigerant(refrigerant: Refrigerant) -> Option<Self> {
        match refrigerant {
            Refrigerant::R290 => Some(Self {
                antoine_a: 21.366,
                antoine_b: 2266.0,
                h_liquid_ref: 200.0,
                cp_liquid: 2.5,
                h_fg_ref: 375.0,
                h_fg_slope: -1.6,
                cp_vapor: 1.9,
                rho_liquid_ref: 528.0,
                rho_liquid_slope: -1.6,
                molar_mass: Refrigerant::R290.molar_mass(),
                p_crit: 4.2512e6,
                t_crit: 369.89,
            }),
            Refrigerant::R600a => Some(Self {
                antoine_a: 21.494,
                antoine_b: 2603.0,
                h_liquid_ref: 200.0,
                cp_liquid: 2.4,
                h_fg_ref: 355.0,
                h_fg_slope: -1.4,
                cp_vapor: 1.75,
                rho_liquid_ref: 580.0,
                rho_liquid_slope: -1.3,
                molar_mass: Refrigerant::R600a.molar_mass(),
                p_crit: 3.629e6,
                t_crit: 407.8,
            }),
            _ => None,
        }
    }

    /// Saturation temperature [K] at pressure [Pa].
    pub fn t_sat(&self, p_pa: f64) -> FluidResult<f64> {
        if p_pa >= self.p_crit {
            return Err(FluidError::OutOfRange {
                what: "pressure at or above critical",
            });
        }
        let denom = self.antoine_a - p_pa.ln();
        if denom <= 0.0 {
            return Err(FluidError::OutOfRange {
                what: "pressure outside vapor-pressure fit",
            });
        }
        Ok(self.antoine_b / denom)
    }

    /// Saturation pressure [Pa] at temperature [K].
    pub fn p_sat(&self, t_k: f64) -> FluidResult<f64> {
        if t_k >= self.t_crit {
            return Err(FluidError::OutOfRange {
                what: "temperature at or above critical",
            });
        }
        Ok((self.antoine_a - self.antoine_b / t_k).exp())
    }

    fn h_liquid(&self, t_k: f64) -> f64 {
        self.h_liquid_ref + self.cp_liquid * (t_k - T_REF)
    }

    fn h_fg(&self, t_k: f64) -> f64 {
        (self.h_fg_ref + self.h_fg_slope * (t_k - T_REF)).max(0.0)
    }

    fn rho_liquid(&self, t_k: f64) -> f64 {
        self.rho_liquid_ref + self.rho_liquid_slope * (t_k - T_REF)
    }

    fn rho_vapor(&self, p_pa: f64, t_k: f64) -> f64 {
        p_pa / (R_UNIVERSAL / self.molar_mass * t_k)
    }
}

/// Resolved state inside the surrogate model.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    p: f64,
    t: f64,
    h: f64,
    /// `Some` only inside the two-phase region (including its boundaries).
    x: Option<f64>,
    rho: f64,
}

/// Surrogate property provider.
#[derive(Debug, Clone)]
pub struct SurrogateProvider {
    coefficients: BTreeMap<Refrigerant, SurrogateCoefficients>,
}

impl Default for SurrogateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SurrogateProvider {
    /// Provider with every built-in fit loaded.
    pub fn new() -> Self {
        let coefficients = Refrigerant::ALL
            .iter()
            .filter_map(|r| SurrogateCoefficients::for_refrigerant(*r).map(|c| (*r, c)))
            .collect();
        Self { coefficients }
    }

    /// Add or replace the fit for one refrigerant.
    pub fn with_coefficients(
        mut self,
        refrigerant: Refrigerant,
        coefficients: SurrogateCoefficients,
    ) -> Self {
        self.coefficients.insert(refrigerant, coefficients);
        self
    }

    fn coefficients(&self, refrigerant: Refrigerant) -> FluidResult<&SurrogateCoefficients> {
        self.coefficients
            .get(&refrigerant)
            .ok_or(FluidError::NotSupported {
                what: "refrigerant has no surrogate fit",
            })
    }

    fn resolve(&self, c: &SurrogateCoefficients, input: StateInput) -> FluidResult<Resolved> {
        match input {
            StateInput::PT { p, t } => {
                let (p, t) = (p.get::<pascal>(), t.get::<kelvin>());
                let t_sat = c.t_sat(p)?;
                if Tolerances::ROUNDING.close(t, t_sat) {
                    return Err(FluidError::OutOfRange {
                        what: "P-T pair lies on the saturation line",
                    });
                }
                if t < t_sat {
                    Ok(Resolved {
                        p,
                        t,
                        h: c.h_liquid(t),
                        x: None,
                        rho: c.rho_liquid(t),
                    })
                } else {
                    let h_g = c.h_liquid(t_sat) + c.h_fg(t_sat);
                    Ok(Resolved {
                        p,
                        t,
                        h: h_g + c.cp_vapor * (t - t_sat),
                        x: None,
                        rho: c.rho_vapor(p, t),
                    })
                }
            }
            StateInput::PQ { p, q } => {
                let p = p.get::<pascal>();
                let t_sat = c.t_sat(p)?;
                Ok(self.saturated(c, p, t_sat, q))
            }
            StateInput::TQ { t, q } => {
                let t = t.get::<kelvin>();
                let p = c.p_sat(t)?;
                Ok(self.saturated(c, p, t, q))
            }
            StateInput::PH { p, h } => {
                let p = p.get::<pascal>();
                let t_sat = c.t_sat(p)?;
                let h_f = c.h_liquid(t_sat);
                let h_fg = c.h_fg(t_sat);
                let h_g = h_f + h_fg;
                if h < h_f {
                    let t = T_REF + (h - c.h_liquid_ref) / c.cp_liquid;
                    if t <= 0.0 {
                        return Err(FluidError::OutOfRange {
                            what: "enthalpy below liquid fit",
                        });
                    }
                    Ok(Resolved {
                        p,
                        t,
                        h,
                        x: None,
                        rho: c.rho_liquid(t),
                    })
                } else if h > h_g {
                    let t = t_sat + (h - h_g) / c.cp_vapor;
                    Ok(Resolved {
                        p,
                        t,
                        h,
                        x: None,
                        rho: c.rho_vapor(p, t),
                    })
                } else {
                    let q = if h_fg > 0.0 { (h - h_f) / h_fg } else { 1.0 };
                    Ok(self.saturated(c, p, t_sat, q))
                }
            }
        }
    }

    fn saturated(&self, c: &SurrogateCoefficients, p: f64, t: f64, q: f64) -> Resolved {
        let rho_l = c.rho_liquid(t);
        let rho_v = c.rho_vapor(p, t);
        let specific_volume = (1.0 - q) / rho_l + q / rho_v;
        Resolved {
            p,
            t,
            h: c.h_liquid(t) + q * c.h_fg(t),
            x: Some(q),
            rho: 1.0 / specific_volume,
        }
    }
}

impl PropertyProvider for SurrogateProvider {
    fn name(&self) -> &str {
        "Surrogate"
    }

    fn supports(&self, refrigerant: Refrigerant) -> bool {
        self.coefficients.contains_key(&refrigerant)
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        input.validate()?;
        let c = self.coefficients(refrigerant)?;
        let state = self.resolve(c, input)?;
        let value = match output {
            Property::Enthalpy => state.h,
            Property::Temperature => state.t,
            Property::Pressure => state.p,
            Property::Density => state.rho,
            Property::Quality => state.x.ok_or(FluidError::OutOfRange {
                what: "state is not two-phase",
            })?,
        };
        if !value.is_finite() || (output == Property::Density && value <= 0.0) {
            return Err(FluidError::NonPhysical {
                what: "surrogate produced a non-physical value",
            });
        }
        Ok(value)
    }
}
