//! Observed-nucleus detection
//!
//! Bucket limits and sizes depend on the nucleus an axis observes. Processed axes
//! name it directly (`##$AXNUC= <13C>`); for acquisition files it is estimated from
//! the spectrometer frequencies, taking the highest `BFn` as the proton frequency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;

/// Spin-1/2 nuclei handled by the bucketing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nucleus {
    /// Proton
    #[serde(rename = "1H")]
    H1,
    /// Carbon 13
    #[serde(rename = "13C")]
    C13,
    /// Nitrogen 15
    #[serde(rename = "15N")]
    N15,
    /// Fluorine 19
    #[serde(rename = "19F")]
    F19,
    /// Silicon 29
    #[serde(rename = "29Si")]
    Si29,
    /// Phosphorus 31
    #[serde(rename = "31P")]
    P31,
}

impl Nucleus {
    /// Every supported nucleus
    pub const ALL: [Nucleus; 6] = [
        Nucleus::H1,
        Nucleus::C13,
        Nucleus::N15,
        Nucleus::F19,
        Nucleus::Si29,
        Nucleus::P31,
    ];

    /// Resonance frequency relative to 1H at the same field (IUPAC Xi / 100)
    pub fn frequency_ratio(self) -> f64 {
        match self {
            Nucleus::H1 => 1.0,
            Nucleus::C13 => 0.251_450_20,
            Nucleus::N15 => 0.101_367_67,
            Nucleus::F19 => 0.940_940_11,
            Nucleus::Si29 => 0.198_671_87,
            Nucleus::P31 => 0.404_807_42,
        }
    }

    /// Conventional label (`1H`, `13C`, ...)
    pub fn label(self) -> &'static str {
        match self {
            Nucleus::H1 => "1H",
            Nucleus::C13 => "13C",
            Nucleus::N15 => "15N",
            Nucleus::F19 => "19F",
            Nucleus::Si29 => "29Si",
            Nucleus::P31 => "31P",
        }
    }

    /// Nucleus declared by a processed axis (`AXNUC`)
    pub fn from_processing(procs: &ParameterSet) -> Option<Self> {
        procs.scalar("$AXNUC").and_then(|v| v.parse().ok())
    }

    /// Estimate the observed nucleus from `BF1` and the proton frequency
    pub fn from_acquisition(acqus: &ParameterSet) -> Option<Self> {
        let observed = acqus.number("BF1")?;
        let proton = (1..=8)
            .filter_map(|i| acqus.number(&format!("BF{}", i)))
            .fold(0.0_f64, f64::max);
        if proton <= 0.0 {
            return None;
        }

        let mut best = None;
        let mut min_distance = proton;
        for nucleus in Self::ALL {
            let distance = (nucleus.frequency_ratio() * proton - observed).abs();
            if distance < min_distance {
                best = Some(nucleus);
                min_distance = distance;
            }
        }
        best
    }
}

impl fmt::Display for Nucleus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Nucleus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('<').trim_end_matches('>').trim();
        Self::ALL
            .into_iter()
            .find(|n| n.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| format!("Unknown nucleus: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::parse_str;

    #[test]
    fn test_from_label() {
        assert_eq!("1H".parse::<Nucleus>(), Ok(Nucleus::H1));
        assert_eq!("<13C>".parse::<Nucleus>(), Ok(Nucleus::C13));
        assert_eq!(" 19f ".parse::<Nucleus>(), Ok(Nucleus::F19));
        assert!("off".parse::<Nucleus>().is_err());
    }

    #[test]
    fn test_from_processing() {
        let procs = parse_str("##$AXNUC= <31P>\n##$SF= 242.9\n").unwrap();
        assert_eq!(Nucleus::from_processing(&procs), Some(Nucleus::P31));
        assert_eq!(Nucleus::from_processing(&parse_str("##$SF= 1\n").unwrap()), None);
    }

    #[test]
    fn test_from_acquisition() {
        let proton = parse_str("##$BF1= 600.13\n##$BF2= 150.9\n##$BF3= 60.8\n").unwrap();
        assert_eq!(Nucleus::from_acquisition(&proton), Some(Nucleus::H1));

        let carbon = parse_str("##$BF1= 150.9\n##$BF2= 600.13\n##$BF3= 60.8\n").unwrap();
        assert_eq!(Nucleus::from_acquisition(&carbon), Some(Nucleus::C13));

        let fluorine = parse_str("##$BF1= 564.7\n##$BF2= 600.13\n").unwrap();
        assert_eq!(Nucleus::from_acquisition(&fluorine), Some(Nucleus::F19));
    }

    #[test]
    fn test_from_acquisition_without_frequencies() {
        assert_eq!(Nucleus::from_acquisition(&ParameterSet::new()), None);
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Nucleus::Si29).unwrap(), "\"29Si\"");
    }
}
