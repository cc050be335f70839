use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{AddAssign, SubAssign};

use num::{Float, FromPrimitive};

use crate::progress::{trait_combiner, MaybeSend, MaybeSync};

trait_combiner!(CurveFloat: Float+FromPrimitive+Sum+AddAssign+SubAssign+Debug+MaybeSend+MaybeSync);

/// Count as a float. Counts beyond the type's range become infinity, which
/// for `f16` means anything above 65504: window means over more than that
/// many elements are not representable in half precision.
#[inline(always)]
pub(crate) fn from_count<F: CurveFloat>(n: usize) -> F {
	F::from_usize(n).unwrap_or_else(F::infinity)
}


#[test]
fn test_from_count() {
	assert_eq!(from_count::<f64>(0), 0.0);
	assert_eq!(from_count::<f32>(17), 17.0);
}

#[cfg(feature="half")]
#[test]
fn test_half_is_curve_float() {
	use half::f16;
	fn accepts<F: CurveFloat>(v: F) -> F { v + from_count::<F>(1) }
	assert_eq!(accepts(f16::from_f32(1.5)), f16::from_f32(2.5));
}
