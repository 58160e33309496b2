//! Per-feature standardization
//!
//! Zero mean, unit variance, fitted on training data only and reused verbatim
//! at scoring time. Standard deviations are floored so constant columns scale
//! to zero instead of dividing by zero.

const STD_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations over the given rows.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let n = rows.len().max(1) as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            for (col, &v) in row.iter().enumerate() {
                means[col] += v;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for (col, &v) in row.iter().enumerate() {
                let diff = v - means[col];
                stds[col] += diff * diff;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt().max(STD_FLOOR);
        }

        StandardScaler { means, stds }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(&v, (&mean, &std))| (v - mean) / std)
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scaled_columns_are_centered() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 20.0], vec![5.0, 30.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_all(&rows);

        for col in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[col]).sum::<f64>() / 3.0;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        }
        // Symmetric columns: first and last rows mirror each other
        assert_relative_eq!(scaled[0][0], -scaled[2][0], epsilon = 1e-12);
    }

    #[test]
    fn constant_column_scales_to_zero() {
        let rows = vec![vec![7.0], vec![7.0], vec![7.0]];
        let scaler = StandardScaler::fit(&rows);
        for row in scaler.transform_all(&rows) {
            assert_relative_eq!(row[0], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn transform_uses_fitted_parameters() {
        let rows = vec![vec![0.0], vec![2.0]];
        let scaler = StandardScaler::fit(&rows);
        // mean 1, std 1
        assert_relative_eq!(scaler.transform(&[4.0])[0], 3.0, epsilon = 1e-12);
    }
}
