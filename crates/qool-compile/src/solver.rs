//! Bounded bisection for objective-driven profiles.

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::profile::BisectionConfig;

/// Find a root of `f` in `[lower, upper]`.
///
/// Requires a sign change between the ends. Stops when the bracket is
/// narrower than `config.tolerance` relative to its midpoint; running out of
/// iterations first is reported as [`CompileError::NonConvergence`].
pub fn bisect(
    name: &str,
    mut f: impl FnMut(f64) -> f64,
    lower: f64,
    upper: f64,
    config: &BisectionConfig,
) -> CompileResult<f64> {
    let (mut lo, mut hi) = (lower, upper);
    let (f_lo, f_hi) = (f(lo), f(hi));

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(CompileError::NoBracket {
            objective: name.to_string(),
            lower,
            upper,
        });
    }

    let lo_positive = f_lo > 0.0;
    for iteration in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid == 0.0 || (hi - lo) <= config.tolerance * mid.abs() {
            debug!("Bisection '{}' converged after {} iterations: {}", name, iteration, mid);
            return Ok(mid);
        }
        if !f_mid.is_finite() {
            break;
        }
        if (f_mid > 0.0) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(CompileError::NonConvergence {
        objective: name.to_string(),
        iterations: config.max_iterations,
        lower: lo,
        upper: hi,
    })
}
