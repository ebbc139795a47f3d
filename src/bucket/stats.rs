use serde::Serialize;

/// Higher moments of a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    /// Population skewness
    pub skew: f64,
    /// Population excess kurtosis
    pub kurtosis: f64,
}

/// Aggregate statistics over the samples of one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    /// Number of samples
    pub count: usize,
    /// Sum of samples, 0 for an empty window
    pub sum: f64,
    /// Largest sample, NaN for an empty window
    pub max: f64,
    /// Smallest sample, NaN for an empty window
    pub min: f64,
    /// Population standard deviation, NaN for an empty window
    pub std: f64,
    /// Skewness and kurtosis, when requested
    pub moments: Option<Moments>,
}

impl WindowStats {
    /// Compute statistics in two passes over `samples`
    pub fn compute<I>(samples: I, with_moments: bool) -> Self
    where
        I: Iterator<Item = f64> + Clone,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for x in samples.clone() {
            count += 1;
            sum += x;
            max = max.max(x);
            min = min.min(x);
        }

        if count == 0 {
            return Self {
                count,
                sum,
                max: f64::NAN,
                min: f64::NAN,
                std: f64::NAN,
                moments: with_moments.then_some(Moments {
                    skew: f64::NAN,
                    kurtosis: f64::NAN,
                }),
            };
        }

        let n = count as f64;
        let mean = sum / n;
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for x in samples {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;

        let moments = with_moments.then(|| {
            if m2 > 0.0 {
                Moments {
                    skew: m3 / m2.powf(1.5),
                    kurtosis: m4 / (m2 * m2) - 3.0,
                }
            } else {
                // constant window
                Moments {
                    skew: f64::NAN,
                    kurtosis: f64::NAN,
                }
            }
        });

        Self {
            count,
            sum,
            max,
            min,
            std: m2.sqrt(),
            moments,
        }
    }

    /// Whether no sample fell in the window
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
