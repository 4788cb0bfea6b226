//! Composite Simpson quadrature over sampled time histories.
//!
//! The rule works on arbitrarily spaced abscissae. Each pair of intervals
//! `[x0, x1, x2]` with widths `h0`, `h1` contributes
//!
//! ```text
//! (h0 + h1) / 6 * (y0 * (2 - h1 / h0) + y1 * (h0 + h1)^2 / (h0 * h1) + y2 * (2 - h0 / h1))
//! ```
//!
//! which reduces to the familiar `h / 3 * (y0 + 4 y1 + y2)` on uniform grids.
//! An odd number of samples composes exactly; an even number needs a separate
//! treatment of one interval, selected with [`EvenSamples`].

use crate::errors::IntegrationError;

/// How the leftover interval is handled when the sample count is even.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvenSamples {
    /// Average Simpson-then-trapezoid with trapezoid-then-Simpson.
    #[default]
    Average,
    /// Simpson on all but the last interval, then Cartwright's three-point
    /// correction for the last one.
    Cartwright,
}

/// Time integrals of the reduced quantities for one submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratedQuantities {
    /// Integral of the y-force.
    pub y_force: f64,
    /// Integral of the work integrand, i.e. the total work.
    pub work: f64,
    /// Integral of the mass.
    pub mass: f64,
}

/// Integrate force, work integrand and mass over `time`.
///
/// Mass error is deliberately absent: it is plotted but not reduced.
///
/// # Errors
///
/// Returns [`IntegrationError::LengthMismatch`] when a series differs in length
/// from `time`.
///
/// # Examples
/// ```
/// use cylinder_histories::{integrate_quantities, EvenSamples};
///
/// let time = [0.0, 0.5, 1.0];
/// let quantities =
///     integrate_quantities(&time, &[0.0, 1.0, 0.0], &[1.0; 3], &[2.0; 3], EvenSamples::Average)
///         .unwrap();
/// assert!((quantities.y_force - 2.0 / 3.0).abs() < 1e-12);
/// assert!((quantities.mass - 2.0).abs() < 1e-12);
/// ```
pub fn integrate_quantities(
    time: &[f64],
    y_force: &[f64],
    work: &[f64],
    mass: &[f64],
    even: EvenSamples,
) -> Result<IntegratedQuantities, IntegrationError> {
    Ok(IntegratedQuantities {
        y_force: simpson(y_force, time, even)?,
        work: simpson(work, time, even)?,
        mass: simpson(mass, time, even)?,
    })
}

/// Integrate samples `y` taken at abscissae `x` with the composite Simpson rule.
///
/// Two samples reduce to the trapezoid rule and fewer integrate to zero.
///
/// # Errors
///
/// Returns [`IntegrationError::LengthMismatch`] when `y` and `x` differ in length.
pub fn simpson(y: &[f64], x: &[f64], even: EvenSamples) -> Result<f64, IntegrationError> {
    if y.len() != x.len() {
        return Err(IntegrationError::LengthMismatch {
            times: x.len(),
            values: y.len(),
        });
    }
    let n = y.len();
    if n < 2 {
        return Ok(0.0);
    }
    if n == 2 {
        return Ok(trapezoid(y, x, 0));
    }
    if n % 2 == 1 {
        return Ok(simpson_pairs(y, x, 0, n - 1));
    }

    let result = match even {
        EvenSamples::Average => {
            let simpson_first = simpson_pairs(y, x, 0, n - 2) + trapezoid(y, x, n - 2);
            let simpson_last = trapezoid(y, x, 0) + simpson_pairs(y, x, 1, n - 1);
            (simpson_first + simpson_last) / 2.0
        }
        EvenSamples::Cartwright => {
            let h0 = x[n - 2] - x[n - 3];
            let h1 = x[n - 1] - x[n - 2];
            let alpha = (2.0 * h1 * h1 + 3.0 * h0 * h1) / (6.0 * (h0 + h1));
            let beta = (h1 * h1 + 3.0 * h0 * h1) / (6.0 * h0);
            let eta = h1 * h1 * h1 / (6.0 * h0 * (h0 + h1));
            simpson_pairs(y, x, 0, n - 2) + alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3]
        }
    };
    Ok(result)
}

/// Trapezoid over the single interval starting at sample `i`.
fn trapezoid(y: &[f64], x: &[f64], i: usize) -> f64 {
    0.5 * (x[i + 1] - x[i]) * (y[i] + y[i + 1])
}

/// Simpson over interval pairs from sample `first` up to sample `last`.
///
/// `last - first` must be even.
fn simpson_pairs(y: &[f64], x: &[f64], first: usize, last: usize) -> f64 {
    (first..last)
        .step_by(2)
        .map(|i| {
            let h0 = x[i + 1] - x[i];
            let h1 = x[i + 2] - x[i + 1];
            let hsum = h0 + h1;
            let hprod = h0 * h1;
            let h0divh1 = h0 / h1;
            hsum / 6.0
                * (y[i] * (2.0 - 1.0 / h0divh1)
                    + y[i + 1] * (hsum * hsum / hprod)
                    + y[i + 2] * (2.0 - h0divh1))
        })
        .sum()
}
