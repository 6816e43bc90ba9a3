//! Regression fit metrics.

use serde::Serialize;

/// Goodness of fit on one partition.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct FitMetrics {
    /// Coefficient of determination. 1.0 for a perfect fit; 0.0 when the
    /// targets are constant and the fit is not exact.
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl FitMetrics {
    /// Compare `predicted` against `actual`. Both slices must have equal length.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());
        let n = actual.len();
        if n == 0 {
            return Self::default();
        }
        let nf = n as f64;
        let mean = actual.iter().sum::<f64>() / nf;

        let mut abs_err = 0.0;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (&a, &p) in actual.iter().zip(predicted) {
            let e = a - p;
            abs_err += e.abs();
            ss_res += e * e;
            ss_tot += (a - mean) * (a - mean);
        }

        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Self {
            r2,
            mae: abs_err / nf,
            rmse: (ss_res / nf).sqrt(),
        }
    }
}
