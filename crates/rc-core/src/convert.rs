//! Rig unit conversions.
//!
//! The test rig logs gauge pressures in psig, temperatures in °F, water flow in
//! GPM and reports mass flow in lb/hr and capacity in BTU/hr. Everything inside
//! the engine is SI. These functions are the only place the two meet.

use crate::units::constants::{PA_PER_PSI, P_ATM_PSI};

/// g/s to lb/hr.
pub const LB_HR_PER_G_S: f64 = 7.93664;

/// W to BTU/hr.
pub const BTU_HR_PER_W: f64 = 3.41214;

/// kJ/kg to BTU/lb.
pub const BTU_LB_PER_KJ_KG: f64 = 0.4299;

/// lbm/ft³ to kg/m³.
pub const KG_M3_PER_LB_FT3: f64 = 16.018_463;

/// in³ to m³.
pub const M3_PER_IN3: f64 = 1.638_706_4e-5;

/// US gallon per minute to m³/s.
pub const M3_S_PER_GPM: f64 = 6.309_020e-5;

/// Water-side heat constant [BTU/hr per (GPM·°F)]: 8.34 lb/gal × 60 min/hr × 1 BTU/(lb·°F).
pub const WATER_BTU_HR_PER_GPM_F: f64 = 500.4;

/// Gauge pressure [psig] to absolute pressure [Pa].
#[inline]
pub fn psig_to_pa_abs(psig: f64) -> f64 {
    (psig + P_ATM_PSI) * PA_PER_PSI
}

/// Absolute pressure [Pa] to gauge pressure [psig].
#[inline]
pub fn pa_abs_to_psig(pa: f64) -> f64 {
    pa / PA_PER_PSI - P_ATM_PSI
}

/// Gauge pressure [psig] to absolute pressure [psia].
#[inline]
pub fn psig_to_psia(psig: f64) -> f64 {
    psig + P_ATM_PSI
}

#[inline]
pub fn fahrenheit_to_kelvin(f: f64) -> f64 {
    (f - 32.0) / 1.8 + 273.15
}

#[inline]
pub fn kelvin_to_fahrenheit(k: f64) -> f64 {
    (k - 273.15) * 1.8 + 32.0
}

/// Temperature difference [K] to temperature difference [°F].
#[inline]
pub fn delta_k_to_delta_f(dk: f64) -> f64 {
    dk * 1.8
}

#[inline]
pub fn delta_f_to_delta_k(df: f64) -> f64 {
    df / 1.8
}

#[inline]
pub fn lb_per_hr_from_g_per_s(g_s: f64) -> f64 {
    g_s * LB_HR_PER_G_S
}

#[inline]
pub fn g_per_s_from_lb_per_hr(lb_hr: f64) -> f64 {
    lb_hr / LB_HR_PER_G_S
}

#[inline]
pub fn w_to_btu_per_hr(w: f64) -> f64 {
    w * BTU_HR_PER_W
}

#[inline]
pub fn btu_per_hr_to_w(btu_hr: f64) -> f64 {
    btu_hr / BTU_HR_PER_W
}

#[inline]
pub fn kj_per_kg_to_btu_per_lb(kj_kg: f64) -> f64 {
    kj_kg * BTU_LB_PER_KJ_KG
}

#[inline]
pub fn lb_per_ft3_to_kg_per_m3(lb_ft3: f64) -> f64 {
    lb_ft3 * KG_M3_PER_LB_FT3
}

#[inline]
pub fn in3_to_m3(in3: f64) -> f64 {
    in3 * M3_PER_IN3
}

#[inline]
pub fn gpm_to_m3_per_s(gpm: f64) -> f64 {
    gpm * M3_S_PER_GPM
}

#[inline]
pub fn m3_per_s_to_gpm(m3_s: f64) -> f64 {
    m3_s / M3_S_PER_GPM
}

#[inline]
pub fn rpm_to_hz(rpm: f64) -> f64 {
    rpm / 60.0
}
