//! Pairwise Pearson correlation.

/// Square correlation matrix; `None` marks an undefined coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Build the matrix from named columns of equal length.
    ///
    /// Each pair uses only rows where both values are present.
    pub fn compute(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let labels = columns.iter().map(|(name, _)| name.clone()).collect();
        let values = columns
            .iter()
            .map(|(_, a)| columns.iter().map(|(_, b)| pearson(a, b)).collect())
            .collect();
        Self { labels, values }
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pearson coefficient over complete pairs. Undefined for fewer than two
/// pairs or zero variance.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn col(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn perfect_positive_and_negative() {
        let a = col(&[1.0, 2.0, 3.0]);
        let b = col(&[2.0, 4.0, 6.0]);
        let c = col(&[3.0, 2.0, 1.0]);
        assert_relative_eq!(pearson(&a, &b).unwrap(), 1.0);
        assert_relative_eq!(pearson(&a, &c).unwrap(), -1.0);
    }

    #[test]
    fn skips_incomplete_pairs() {
        let a = vec![Some(1.0), Some(2.0), None, Some(3.0)];
        let b = vec![Some(1.0), Some(2.0), Some(100.0), Some(3.0)];
        assert_relative_eq!(pearson(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn undefined_for_constant_or_short_input() {
        assert_eq!(pearson(&col(&[1.0, 1.0, 1.0]), &col(&[1.0, 2.0, 3.0])), None);
        assert_eq!(pearson(&col(&[1.0]), &col(&[2.0])), None);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let matrix = CorrelationMatrix::compute(&[
            ("Closed PnL".to_string(), col(&[10.0, -5.0, 3.0, 8.0])),
            ("Leverage".to_string(), col(&[2.0, 10.0, 5.0, 1.0])),
        ]);
        assert_eq!(matrix.len(), 2);
        assert_relative_eq!(matrix.get("Closed PnL", "Closed PnL").unwrap(), 1.0);
        assert_eq!(
            matrix.get("Closed PnL", "Leverage"),
            matrix.get("Leverage", "Closed PnL")
        );
        assert!(matrix.get("Closed PnL", "Leverage").unwrap() < 0.0);
    }
}
