use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nucleus::Nucleus;

/// Zoom limits and bucket sizes for one nucleus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NucleusBuckets {
    /// Zoom range in ppm
    pub limits: (f64, f64),
    /// Bucket size of 1-D spectra
    pub size_1d: f64,
    /// Bucket size of this nucleus' axis in 2-D spectra
    pub size_2d: f64,
}

/// Bucketing settings of a batch run
///
/// Per-nucleus settings are keyed by nucleus label so the TOML form reads
/// `[bucket.nuclei.1H]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Bucket size of the diffusion axis of DOSY spectra
    pub dosy_size: f64,
    /// Report skewness and kurtosis columns
    pub moments: bool,
    /// Settings per nucleus label
    pub nuclei: BTreeMap<String, NucleusBuckets>,
}

impl Default for BucketConfig {
    fn default() -> Self {
        let nuclei = [
            (Nucleus::H1, (0.5, 9.5), 0.01, 0.03),
            (Nucleus::C13, (-10.0, 150.0), 0.03, 1.0),
            (Nucleus::F19, (-220.0, -40.0), 0.1, 1.0),
        ]
        .into_iter()
        .map(|(nucleus, limits, size_1d, size_2d)| {
            (
                nucleus.label().to_string(),
                NucleusBuckets {
                    limits,
                    size_1d,
                    size_2d,
                },
            )
        })
        .collect();

        Self {
            dosy_size: 0.1,
            moments: false,
            nuclei,
        }
    }
}

impl BucketConfig {
    /// Settings for `nucleus`, if configured
    pub fn for_nucleus(&self, nucleus: Nucleus) -> Option<&NucleusBuckets> {
        self.nuclei.get(nucleus.label())
    }
}
