use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One data item: a value per local variable, in local-variable order.
/// Omitted values are stored as NaN.
pub type DataItem = Vec<f64>;

/// Storage mode of a data section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataMode {
    /// A sampled curve with implied ordering and spacing (IR, UV, FID...)
    #[default]
    Continuous,
    /// Discrete, sparse peaks (peak tables)
    Peak,
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Continuous => write!(f, "continuous"),
            DataMode::Peak => write!(f, "peak"),
        }
    }
}

/// Item values as supplied by a producer: positional or keyed by symbol.
/// Resolved into positional form when it enters a section.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemInput {
    /// Values in local-variable order
    Positional(Vec<f64>),
    /// Values keyed by variable symbol; missing symbols are omitted
    Keyed(BTreeMap<String, f64>),
}

impl ItemInput {
    /// Build a keyed input from `(symbol, value)` pairs
    pub fn keyed<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        ItemInput::Keyed(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Vec<f64>> for ItemInput {
    fn from(values: Vec<f64>) -> Self {
        ItemInput::Positional(values)
    }
}

impl From<&[f64]> for ItemInput {
    fn from(values: &[f64]) -> Self {
        ItemInput::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ItemInput {
    fn from(values: [f64; N]) -> Self {
        ItemInput::Positional(values.to_vec())
    }
}

impl From<BTreeMap<String, f64>> for ItemInput {
    fn from(values: BTreeMap<String, f64>) -> Self {
        ItemInput::Keyed(values)
    }
}

impl From<HashMap<String, f64>> for ItemInput {
    fn from(values: HashMap<String, f64>) -> Self {
        ItemInput::Keyed(values.into_iter().collect())
    }
}

/// A closed `[min, max]` interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl DataRange {
    /// Create a range from two bounds in any order
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// `max - min`
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `value` lies inside the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Smallest range covering both
    pub fn merge(&self, other: &DataRange) -> DataRange {
        DataRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Extend the range to include `value` (NaN is ignored)
    pub fn include(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// First and last value of an evenly spaced variable; intermediate values may
/// be omitted and are reconstructed from their index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousRange {
    /// Value at the first item
    pub from_value: f64,
    /// Value at the last item
    pub to_value: f64,
}

impl ContinuousRange {
    /// Create a continuous range
    pub fn new(from_value: f64, to_value: f64) -> Self {
        Self {
            from_value,
            to_value,
        }
    }

    /// Value at `index` in a section of `count` items
    pub fn value_at_index(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.from_value;
        }
        let intervals = (count - 1) as f64;
        self.from_value + (index as f64 / intervals) * (self.to_value - self.from_value)
    }
}

/// Shape of a peak
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeakShape {
    /// Sharp peak
    Sharp,
    /// Broad peak
    Broad,
    /// Any other codec-specific shape name
    Other(String),
}

impl FromStr for PeakShape {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "sharp" => PeakShape::Sharp,
            "broad" => PeakShape::Broad,
            _ => PeakShape::Other(s.to_string()),
        })
    }
}

impl fmt::Display for PeakShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakShape::Sharp => write!(f, "sharp"),
            PeakShape::Broad => write!(f, "broad"),
            PeakShape::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Multiplicity of an NMR peak
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeakMultiplicity {
    /// s
    Singlet,
    /// d
    Doublet,
    /// t
    Triplet,
    /// q
    Quartet,
    /// quint
    Quintet,
    /// sext
    Sextuplet,
    /// m
    Multiplet,
    /// Any other codec-specific multiplicity name
    Other(String),
}

impl FromStr for PeakMultiplicity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "singlet" | "s" => PeakMultiplicity::Singlet,
            "doublet" | "d" => PeakMultiplicity::Doublet,
            "triplet" | "t" => PeakMultiplicity::Triplet,
            "quartet" | "q" => PeakMultiplicity::Quartet,
            "quintet" => PeakMultiplicity::Quintet,
            "sextuplet" | "sextet" => PeakMultiplicity::Sextuplet,
            "multiplet" | "m" => PeakMultiplicity::Multiplet,
            _ => PeakMultiplicity::Other(s.to_string()),
        })
    }
}

impl fmt::Display for PeakMultiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeakMultiplicity::Singlet => "singlet",
            PeakMultiplicity::Doublet => "doublet",
            PeakMultiplicity::Triplet => "triplet",
            PeakMultiplicity::Quartet => "quartet",
            PeakMultiplicity::Quintet => "quintet",
            PeakMultiplicity::Sextuplet => "sextuplet",
            PeakMultiplicity::Multiplet => "multiplet",
            PeakMultiplicity::Other(name) => name,
        };
        write!(f, "{}", name)
    }
}

/// Side-channel metadata attached to one data item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
    /// Peak shape
    pub shape: Option<PeakShape>,
    /// Peak multiplicity
    pub multiplicity: Option<PeakMultiplicity>,
    /// References to assigned structure objects (atom ids, group ids...)
    pub assignments: Vec<String>,
    /// Generic key/value details carried by codecs
    pub details: BTreeMap<String, String>,
}

impl ExtraInfo {
    /// Extra info carrying a peak shape
    pub fn with_shape(mut self, shape: PeakShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Extra info carrying a multiplicity
    pub fn with_multiplicity(mut self, multiplicity: PeakMultiplicity) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }

    /// Add an assignment reference
    pub fn with_assignment(mut self, reference: impl Into<String>) -> Self {
        self.assignments.push(reference.into());
        self
    }

    /// Add a generic detail
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// An empty extra info is equivalent to none at all
    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
            && self.multiplicity.is_none()
            && self.assignments.is_empty()
            && self.details.is_empty()
    }
}

/// Serde adapter storing omitted (NaN) values as `null`
pub(crate) mod omitted_values {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DataItem;

    pub fn serialize<S: Serializer>(items: &[DataItem], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            let row: Vec<Option<f64>> = item
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect();
            seq.serialize_element(&row)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DataItem>, D::Error> {
        let rows: Vec<Vec<Option<f64>>> = Vec::deserialize(deserializer)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect())
    }
}
