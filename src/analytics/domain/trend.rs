//! Linear trend fitting and summary statistics for display.

use serde::Serialize;

/// Least-squares line over `(bucket index, value)` points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    /// Change per bucket.
    pub slope: f64,
    /// Fitted value at bucket index zero.
    pub intercept: f64,
}

impl TrendLine {
    /// Fits a line through `values`, indexed from zero.
    ///
    /// Fewer than two points cannot define a slope; the line is then flat at
    /// the single value, or at zero for an empty series.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifeline::analytics::domain::TrendLine;
    ///
    /// let line = TrendLine::fit(&[1, 3, 5, 7]);
    /// assert!((line.slope - 2.0).abs() < 1e-9);
    /// assert!((line.intercept - 1.0).abs() < 1e-9);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "least-squares fitting is floating-point by definition; counts stay far below 2^52"
    )]
    pub fn fit(values: &[usize]) -> Self {
        let n = values.len() as f64;
        match values {
            [] => Self::flat(0.0),
            [only] => Self::flat(*only as f64),
            _ => {
                let mean_x = (n - 1.0) / 2.0;
                let mean_y = values.iter().sum::<usize>() as f64 / n;
                let (sxx, sxy) = values.iter().enumerate().fold(
                    (0.0, 0.0),
                    |(sxx, sxy), (index, value)| {
                        let dx = index as f64 - mean_x;
                        (sxx + dx * dx, sxy + dx * (*value as f64 - mean_y))
                    },
                );
                let slope = sxy / sxx;
                Self {
                    slope,
                    intercept: mean_y - slope * mean_x,
                }
            }
        }
    }

    const fn flat(value: f64) -> Self {
        Self {
            slope: 0.0,
            intercept: value,
        }
    }

    /// Returns the fitted value at bucket `index`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "evaluating the fitted line"
    )]
    pub fn value_at(&self, index: usize) -> f64 {
        self.slope.mul_add(index as f64, self.intercept)
    }

    /// Returns fitted values for the first `len` buckets.
    #[must_use]
    pub fn project(&self, len: usize) -> Vec<f64> {
        (0..len).map(|index| self.value_at(index)).collect()
    }
}

/// Summary statistics of one counter series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Sum of all buckets.
    pub total: usize,
    /// Arithmetic mean per bucket.
    pub mean: f64,
    /// Smallest bucket value.
    pub min: usize,
    /// Largest bucket value.
    pub max: usize,
    /// Value of the last bucket.
    pub current: usize,
}

impl SeriesSummary {
    /// Summarises `values`; every field is zero for an empty series.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "mean of bucket counts"
    )]
    pub fn of(values: &[usize]) -> Self {
        let total = values.iter().sum::<usize>();
        let mean = if values.is_empty() {
            0.0
        } else {
            total as f64 / values.len() as f64
        };
        Self {
            total,
            mean,
            min: values.iter().copied().min().unwrap_or_default(),
            max: values.iter().copied().max().unwrap_or_default(),
            current: values.last().copied().unwrap_or_default(),
        }
    }
}
