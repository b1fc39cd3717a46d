//! Ordinary least squares on small in-memory datasets.

use linea_core::{LineaError, LineaResult};

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Sums that make up the closed-form solution, kept for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsTerms {
    pub x_mean: f64,
    pub y_mean: f64,
    /// Σ (x - x̄)(y - ȳ)
    pub numerator: f64,
    /// Σ (x - x̄)²
    pub denominator: f64,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn ols_terms(xs: &[f64], ys: &[f64]) -> LineaResult<OlsTerms> {
    if xs.len() != ys.len() {
        return Err(LineaError::Validation(format!(
            "{} x values but {} y values",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(LineaError::Validation(
            "a line fit needs at least two points".into(),
        ));
    }
    let x_mean = mean(xs).unwrap_or_default();
    let y_mean = mean(ys).unwrap_or_default();
    let numerator = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    Ok(OlsTerms {
        x_mean,
        y_mean,
        numerator,
        denominator,
    })
}

/// Closed-form least-squares line through `(xs[i], ys[i])`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> LineaResult<LinearFit> {
    let terms = ols_terms(xs, ys)?;
    if terms.denominator == 0.0 {
        return Err(LineaError::Validation(
            "all x values are equal; the slope is undefined".into(),
        ));
    }
    let slope = terms.numerator / terms.denominator;
    Ok(LinearFit::new(slope, terms.y_mean - slope * terms.x_mean))
}

/// Observed minus predicted, per point.
pub fn residuals(fit: &LinearFit, xs: &[f64], ys: &[f64]) -> Vec<f64> {
    xs.iter().zip(ys).map(|(x, y)| y - fit.predict(*x)).collect()
}

/// Sum of squared residuals.
pub fn ssr(fit: &LinearFit, xs: &[f64], ys: &[f64]) -> f64 {
    residuals(fit, xs, ys).iter().map(|e| e * e).sum()
}

/// Coefficient of determination. `None` when y has no variance.
pub fn r_squared(fit: &LinearFit, xs: &[f64], ys: &[f64]) -> Option<f64> {
    let y_mean = mean(ys)?;
    let total: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    if total == 0.0 {
        return None;
    }
    Some(1.0 - ssr(fit, xs, ys) / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAYS: [f64; 7] = [2.0, 5.0, 1.0, 7.0, 3.0, 4.0, 6.0];
    const GRADES: [f64; 7] = [60.0, 85.0, 60.0, 88.0, 75.0, 72.0, 80.0];

    #[test]
    fn test_exact_line_is_recovered() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = fit_line(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!(ssr(&fit, &xs, &ys) < 1e-20);
        assert!((r_squared(&fit, &xs, &ys).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_study_days_dataset() {
        let terms = ols_terms(&DAYS, &GRADES).unwrap();
        assert!((terms.x_mean - 4.0).abs() < 1e-12);
        assert!((terms.y_mean - 74.2857).abs() < 1e-4);
        assert!((terms.numerator - 134.0).abs() < 1e-9);
        assert!((terms.denominator - 28.0).abs() < 1e-12);

        let fit = fit_line(&DAYS, &GRADES).unwrap();
        assert!((fit.slope - 4.7857).abs() < 1e-4);
        assert!((fit.intercept - 55.1429).abs() < 1e-4);
        assert!((fit.predict(4.5) - 76.6786).abs() < 1e-4);
        let r2 = r_squared(&fit, &DAYS, &GRADES).unwrap();
        assert!(r2 > 0.8 && r2 < 0.9, "r2 = {}", r2);
    }

    #[test]
    fn test_residuals_sum_to_zero_at_optimum() {
        let fit = fit_line(&DAYS, &GRADES).unwrap();
        let sum: f64 = residuals(&fit, &DAYS, &GRADES).iter().sum();
        assert!(sum.abs() < 1e-9);
        let worse = LinearFit::new(fit.slope + 0.5, fit.intercept);
        assert!(ssr(&worse, &DAYS, &GRADES) > ssr(&fit, &DAYS, &GRADES));
    }

    #[test]
    fn test_degenerate_inputs_are_rejected() {
        assert!(fit_line(&[1.0], &[2.0]).is_err());
        assert!(fit_line(&[1.0, 2.0], &[2.0]).is_err());
        assert!(fit_line(&[3.0, 3.0], &[1.0, 2.0]).is_err());
        assert_eq!(mean(&[]), None);
        assert_eq!(r_squared(&LinearFit::new(0.0, 1.0), &[0.0, 1.0], &[1.0, 1.0]), None);
    }
}
