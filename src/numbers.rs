//! Generic floats and complex numbers
//!
//! This module re-exports [`num::Complex`] as [`Complex`] and provides a
//! [`Float`] trait, which is implemented by [`f32`] and [`f64`]. Audio
//! samples may be supplied in either precision, while accumulated powers are
//! always carried as [`f64`] (see [`widen`]).

use rustfft::FftNum;

pub use num::Complex;

/// Trait implemented for [`f32`] and [`f64`]
///
/// Used as bound on the estimator and the streaming blocks so that callers
/// can pick single or double precision for the spectral transform.
pub trait Float
where
    Self: 'static + Send + Sync,
    Self: num::traits::Float,
    Self: num::traits::FloatConst,
    Self: num::traits::NumAssignOps,
    Self: FftNum,
{
}
impl<T> Float for T
where
    T: 'static + Send + Sync,
    T: num::traits::Float,
    T: num::traits::FloatConst,
    T: num::traits::NumAssignOps,
    T: FftNum,
{
}

/// Macro to convert a number into the generic [`Float`] type, which must be
/// in scope as "`Flt`"
///
/// # Example
///
/// ```
/// use radiosinad::{flt, numbers::Float};
///
/// fn half<Flt: Float>(arg: Flt) -> Flt {
///     arg * flt!(0.5)
/// }
///
/// assert_eq!(half(3.0f32), 1.5);
/// ```
#[macro_export]
macro_rules! flt {
    ($x:expr) => {
        Flt::from($x).expect("could not convert number into float")
    };
}

/// Convert a generic float into [`f64`]
///
/// Never fails for `f32` or `f64`; any other type that cannot be represented
/// yields NaN, which downstream checks treat as an overflow.
pub fn widen<Flt: Float>(x: Flt) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// Position of the first sample that is NaN or infinite
pub fn first_non_finite<Flt: Float>(samples: &[Flt]) -> Option<usize> {
    samples.iter().position(|x| !x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_flt_macro_f32() {
        fn inner<Flt: Float>(x: Flt) -> Flt {
            flt!(2) * x
        }
        assert_eq!(inner(3.5f32), 7.0f32);
    }
    #[test]
    fn test_flt_macro_f64() {
        fn inner<Flt: Float>(x: Flt) -> Flt {
            flt!(0.25) + x
        }
        assert_eq!(inner(1.0f64), 1.25f64);
    }
    #[test]
    fn test_widen() {
        assert_eq!(widen(0.5f32), 0.5);
        assert_eq!(widen(-3.0f64), -3.0);
        assert!(widen(f32::INFINITY).is_infinite());
    }
    #[test]
    fn test_first_non_finite() {
        assert_eq!(first_non_finite::<f64>(&[]), None);
        assert_eq!(first_non_finite(&[0.0f32, 1.0, -2.5]), None);
        assert_eq!(first_non_finite(&[0.0, f64::NAN, f64::INFINITY]), Some(1));
        assert_eq!(first_non_finite(&[f32::NEG_INFINITY]), Some(0));
    }
}
