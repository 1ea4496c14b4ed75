use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical category of a unit. Units convert linearly only within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    /// Pure ratios (one, percent, ppm)
    Dimensionless,
    /// Detector counts
    Counts,
    /// Arbitrary intensity units
    Arbitrary,
    /// Time
    Time,
    /// Length (wavelength)
    Length,
    /// Reciprocal length (wavenumber)
    WaveNumber,
    /// Frequency
    Frequency,
    /// Mass
    Mass,
    /// Mass-to-charge ratio
    MassToCharge,
    /// Temperature
    Temperature,
    /// Energy
    Energy,
    /// Pressure
    Pressure,
    /// Plane angle
    Angle,
}

/// How a unit relates to the standard unit of its category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitScale {
    /// `standard = value * rate`
    Linear(f64),
    /// `standard = value * scale + offset`
    Affine {
        /// Multiplier applied first
        scale: f64,
        /// Offset added after scaling
        offset: f64,
    },
    /// No relation to any other unit (e.g. arbitrary units)
    Unscaled,
}

/// A registered physical unit
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Unique lookup key (e.g. "Hz", "cm-1", "one")
    pub key: &'static str,
    /// Display symbol; may be empty for plain numbers
    pub symbol: &'static str,
    /// Descriptive name
    pub name: &'static str,
    /// Category this unit belongs to
    pub category: UnitCategory,
    /// Relation to the category's standard unit
    pub scale: UnitScale,
}

impl Unit {
    const fn linear(
        key: &'static str,
        symbol: &'static str,
        name: &'static str,
        category: UnitCategory,
        rate: f64,
    ) -> Self {
        Self {
            key,
            symbol,
            name,
            category,
            scale: UnitScale::Linear(rate),
        }
    }

    /// Whether this is the standard unit of its category
    pub fn is_standard(&self) -> bool {
        matches!(self.scale, UnitScale::Linear(rate) if rate == 1.0)
    }

    /// Whether values in this unit can be brought to the category standard
    pub fn is_scaled(&self) -> bool {
        !matches!(self.scale, UnitScale::Unscaled)
    }

    /// Convert a value in this unit to the category's standard unit
    pub fn to_standard(&self, value: f64) -> Option<f64> {
        match self.scale {
            UnitScale::Linear(rate) => Some(value * rate),
            UnitScale::Affine { scale, offset } => Some(value * scale + offset),
            UnitScale::Unscaled => None,
        }
    }

    /// Convert a value in the category's standard unit to this unit
    pub fn from_standard(&self, value: f64) -> Option<f64> {
        match self.scale {
            UnitScale::Linear(rate) => Some(value / rate),
            UnitScale::Affine { scale, offset } => Some((value - offset) / scale),
            UnitScale::Unscaled => None,
        }
    }

    /// Convert a value to another unit of the same category
    pub fn convert_to(&self, value: f64, target: &Unit) -> Option<f64> {
        if self.key == target.key {
            return Some(value);
        }
        if self.category != target.category {
            return None;
        }
        // same rate: skip the round trip through the standard unit
        if let (UnitScale::Linear(r0), UnitScale::Linear(r1)) = (self.scale, target.scale) {
            return Some(value * r0 / r1);
        }
        self.to_standard(value)
            .and_then(|standard| target.from_standard(standard))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}

/// Keys of the built-in units
pub mod unit_keys {
    /// Dimensionless "one"
    pub const ONE: &str = "one";
    /// Percent
    pub const PERCENT: &str = "%";
    /// Parts per million
    pub const PPM: &str = "ppm";
    /// Detector counts
    pub const COUNTS: &str = "counts";
    /// Arbitrary units
    pub const ARBITRARY: &str = "arb";
    /// Second
    pub const SECOND: &str = "s";
    /// Meter
    pub const METER: &str = "m";
    /// Centimeter
    pub const CENTIMETER: &str = "cm";
    /// Micrometer
    pub const MICROMETER: &str = "μm";
    /// Nanometer
    pub const NANOMETER: &str = "nm";
    /// Reciprocal meter
    pub const RECIPROCAL_METER: &str = "m-1";
    /// Reciprocal centimeter
    pub const RECIPROCAL_CENTIMETER: &str = "cm-1";
    /// Hertz
    pub const HERTZ: &str = "Hz";
    /// Kilohertz
    pub const KILOHERTZ: &str = "kHz";
    /// Megahertz
    pub const MEGAHERTZ: &str = "MHz";
    /// Thomson (m/z)
    pub const THOMSON: &str = "Th";
    /// Kelvin
    pub const KELVIN: &str = "K";
    /// Degree Celsius
    pub const CELSIUS: &str = "℃";
    /// Electronvolt
    pub const ELECTRONVOLT: &str = "eV";
}

use UnitCategory::*;

static UNITS: &[Unit] = &[
    Unit::linear("one", "", "one", Dimensionless, 1.0),
    Unit::linear("%", "%", "percent", Dimensionless, 1e-2),
    Unit::linear("‰", "‰", "permille", Dimensionless, 1e-3),
    Unit::linear("ppm", "ppm", "parts per million", Dimensionless, 1e-6),
    Unit::linear("counts", "", "counts", Counts, 1.0),
    Unit {
        key: "arb",
        symbol: "arb",
        name: "arbitrary",
        category: Arbitrary,
        scale: UnitScale::Unscaled,
    },
    Unit::linear("s", "s", "second", Time, 1.0),
    Unit::linear("min", "min", "minute", Time, 60.0),
    Unit::linear("hr", "hr", "hour", Time, 3600.0),
    Unit::linear("ms", "ms", "millisecond", Time, 1e-3),
    Unit::linear("μs", "μs", "microsecond", Time, 1e-6),
    Unit::linear("ns", "ns", "nanosecond", Time, 1e-9),
    Unit::linear("m", "m", "meter", Length, 1.0),
    Unit::linear("cm", "cm", "centimeter", Length, 1e-2),
    Unit::linear("mm", "mm", "millimeter", Length, 1e-3),
    Unit::linear("μm", "μm", "micrometer", Length, 1e-6),
    Unit::linear("nm", "nm", "nanometer", Length, 1e-9),
    Unit::linear("Å", "Å", "angstrom", Length, 1e-10),
    Unit::linear("m-1", "m⁻¹", "reciprocal meter", WaveNumber, 1.0),
    Unit::linear("cm-1", "cm⁻¹", "reciprocal centimeter", WaveNumber, 1e2),
    Unit::linear("Hz", "Hz", "hertz", Frequency, 1.0),
    Unit::linear("kHz", "kHz", "kilohertz", Frequency, 1e3),
    Unit::linear("MHz", "MHz", "megahertz", Frequency, 1e6),
    Unit::linear("GHz", "GHz", "gigahertz", Frequency, 1e9),
    Unit::linear("kg", "kg", "kilogram", Mass, 1.0),
    Unit::linear("g", "g", "gram", Mass, 1e-3),
    Unit::linear("Th", "m/z", "thomson", MassToCharge, 1.0),
    Unit::linear("K", "K", "kelvin", Temperature, 1.0),
    Unit {
        key: "℃",
        symbol: "℃",
        name: "celsius",
        category: Temperature,
        scale: UnitScale::Affine {
            scale: 1.0,
            offset: 273.15,
        },
    },
    Unit::linear("J", "J", "joule", Energy, 1.0),
    Unit::linear("cal", "cal", "calorie", Energy, 4.184),
    Unit::linear("kcal", "kcal", "kilocalorie", Energy, 4184.0),
    Unit::linear("eV", "eV", "electronvolt", Energy, 1.602_177_33e-19),
    Unit::linear("Pa", "Pa", "pascal", Pressure, 1.0),
    Unit::linear("bar", "bar", "bar", Pressure, 1e5),
    Unit::linear("atm", "atm", "atmosphere", Pressure, 1.013_250_27e5),
    Unit::linear("rad", "rad", "radian", Angle, 1.0),
    Unit::linear("deg", "°", "degree", Angle, 0.017_453_29),
];

/// All built-in units
pub fn all_units() -> &'static [Unit] {
    UNITS
}

/// Look up a unit by key, then by symbol or name (case-insensitive)
pub fn find_unit(key: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|u| u.key == key).or_else(|| {
        UNITS.iter().find(|u| {
            (!u.symbol.is_empty() && u.symbol.eq_ignore_ascii_case(key))
                || u.name.eq_ignore_ascii_case(key)
        })
    })
}

/// The standard unit of a category, if it has one
pub fn standard_unit(category: UnitCategory) -> Option<&'static Unit> {
    UNITS
        .iter()
        .find(|u| u.category == category && u.is_standard())
}

/// All units of a category
pub fn units_in_category(category: UnitCategory) -> impl Iterator<Item = &'static Unit> {
    UNITS.iter().filter(move |u| u.category == category)
}
