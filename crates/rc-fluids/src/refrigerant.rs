//! Refrigerant definitions.

/// Working fluids a test rig may be charged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Refrigerant {
    /// Propane
    R290,
    /// Isobutane
    R600a,
    /// Propylene
    R1270,
    /// Tetrafluoroethane
    R134a,
    /// Difluoromethane
    R32,
    /// Pentafluoroethane
    R125,
    /// HFO-1234yf
    R1234yf,
    /// Carbon dioxide
    R744,
    /// Ammonia
    R717,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 9] = [
        Refrigerant::R290,
        Refrigerant::R600a,
        Refrigerant::R1270,
        Refrigerant::R134a,
        Refrigerant::R32,
        Refrigerant::R125,
        Refrigerant::R1234yf,
        Refrigerant::R744,
        Refrigerant::R717,
    ];

    /// ASHRAE designation, also the canonical configuration key.
    pub fn key(&self) -> &'static str {
        match self {
            Refrigerant::R290 => "R290",
            Refrigerant::R600a => "R600a",
            Refrigerant::R1270 => "R1270",
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R125 => "R125",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::R744 => "R744",
            Refrigerant::R717 => "R717",
        }
    }

    /// CoolProp fluid name.
    pub fn coolprop_name(&self) -> &'static str {
        match self {
            Refrigerant::R290 => "n-Propane",
            Refrigerant::R600a => "Isobutane",
            Refrigerant::R1270 => "Propylene",
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R125 => "R125",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::R744 => "CarbonDioxide",
            Refrigerant::R717 => "Ammonia",
        }
    }

    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Refrigerant::R290 => Pure::nPropane,
            Refrigerant::R600a => Pure::Isobutane,
            Refrigerant::R1270 => Pure::Propylene,
            Refrigerant::R134a => Pure::R134a,
            Refrigerant::R32 => Pure::R32,
            Refrigerant::R125 => Pure::R125,
            Refrigerant::R1234yf => Pure::R1234yf,
            Refrigerant::R744 => Pure::CarbonDioxide,
            Refrigerant::R717 => Pure::Ammonia,
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Refrigerant::R290 => "R290 (Propane)",
            Refrigerant::R600a => "R600a (Isobutane)",
            Refrigerant::R1270 => "R1270 (Propylene)",
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R125 => "R125",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::R744 => "R744 (CO2)",
            Refrigerant::R717 => "R717 (Ammonia)",
        }
    }

    /// Get molar mass [kg/kmol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Refrigerant::R290 => 44.097,
            Refrigerant::R600a => 58.122,
            Refrigerant::R1270 => 42.081,
            Refrigerant::R134a => 102.031,
            Refrigerant::R32 => 52.024,
            Refrigerant::R125 => 120.022,
            Refrigerant::R1234yf => 114.042,
            Refrigerant::R744 => 44.010,
            Refrigerant::R717 => 17.031,
        }
    }
}

impl std::fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Refrigerant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "R290" | "R-290" | "PROPANE" | "N-PROPANE" => Ok(Refrigerant::R290),
            "R600A" | "R-600A" | "ISOBUTANE" => Ok(Refrigerant::R600a),
            "R1270" | "R-1270" | "PROPYLENE" => Ok(Refrigerant::R1270),
            "R134A" | "R-134A" => Ok(Refrigerant::R134a),
            "R32" | "R-32" => Ok(Refrigerant::R32),
            "R125" | "R-125" => Ok(Refrigerant::R125),
            "R1234YF" | "R-1234YF" => Ok(Refrigerant::R1234yf),
            "R744" | "R-744" | "CO2" | "CARBONDIOXIDE" => Ok(Refrigerant::R744),
            "R717" | "R-717" | "NH3" | "AMMONIA" => Ok(Refrigerant::R717),
            _ => Err("unknown refrigerant"),
        }
    }
}
