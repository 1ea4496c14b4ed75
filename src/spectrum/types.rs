use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of spectroscopy a dataset comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectrumType {
    /// Nuclear magnetic resonance
    Nmr,
    /// Infrared
    Ir,
    /// Mass spectrometry
    Ms,
    /// Ultraviolet / visible
    UvVis,
    /// Ion mobility
    Ims,
    /// Raman
    Raman,
    /// Anything else
    #[default]
    General,
}

impl SpectrumType {
    /// Short display name
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectrumType::Nmr => "NMR",
            SpectrumType::Ir => "IR",
            SpectrumType::Ms => "MS",
            SpectrumType::UvVis => "UV/Vis",
            SpectrumType::Ims => "IMS",
            SpectrumType::Raman => "Raman",
            SpectrumType::General => "general",
        }
    }
}

impl fmt::Display for SpectrumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
