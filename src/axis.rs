use crate::{UnitVector3, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::Neg;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{AxisAngle, Frame};

/// A unit direction whose components are expressed in the [`Frame`] `In`.
///
/// Axes serve two roles in this crate: as configuration (the twist reference
/// of a [swing-twist split](crate::twist::SwingTwist), the fitted major axis
/// of a [principal-axis decomposition](crate::principal::PrincipalAxes)) and
/// as the direction half of every [`AxisAngle`] step a decomposition emits.
///
/// The basis axes of `In` itself are available through [`Axis::x`],
/// [`Axis::y`], and [`Axis::z`]; arbitrary directions go through the
/// validating [`Axis::build`].
///
/// <div class="warning">
///
/// Note that this type implements `Deserialize` without re-checking unit
/// length, and the frame of the deserialized value is _not_ checked either --
/// the same foot-gun the constructors otherwise guard against.
///
/// </div>
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Axis<In> {
    pub(crate) inner: UnitVector3,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) frame: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Axis<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Axis<In> {}

impl<In> PartialEq<Self> for Axis<In> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<In> Axis<In> {
    /// The positive X basis axis of `In` (anterior under the ISB convention).
    #[must_use]
    pub fn x() -> Self {
        Self::from_unit(UnitVector3::new_unchecked(Vector3::x()))
    }

    /// The positive Y basis axis of `In` (superior under the ISB convention --
    /// the long axis of a bone segment).
    #[must_use]
    pub fn y() -> Self {
        Self::from_unit(UnitVector3::new_unchecked(Vector3::y()))
    }

    /// The positive Z basis axis of `In` (to the subject's right under the
    /// ISB convention).
    #[must_use]
    pub fn z() -> Self {
        Self::from_unit(UnitVector3::new_unchecked(Vector3::z()))
    }

    /// Constructs a unit axis pointing along `(x, y, z)` in `In`.
    ///
    /// The components do not need to be pre-normalized. Returns `None` if the
    /// given vector is too close to zero (or not finite) to carry a reliable
    /// direction.
    #[must_use]
    pub fn build(x: f64, y: f64, z: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return None;
        }
        UnitVector3::try_new(Vector3::new(x, y, z), 1e-12).map(Self::from_unit)
    }

    pub(crate) fn from_unit(inner: UnitVector3) -> Self {
        Self {
            inner,
            frame: PhantomData,
        }
    }

    /// Wraps a vector that is _almost always_ unit length without
    /// renormalizing.
    ///
    /// Used for the axis of a near-zero rotation, where the extraction leaves
    /// a tiny (finite, but not unit) vector whose direction is physically
    /// immaterial.
    pub(crate) fn from_raw(vector: Vector3) -> Self {
        Self::from_unit(UnitVector3::new_unchecked(vector))
    }

    /// Returns the X component of this axis in `In`.
    #[must_use]
    pub fn x_component(&self) -> f64 {
        self.inner.x
    }

    /// Returns the Y component of this axis in `In`.
    #[must_use]
    pub fn y_component(&self) -> f64 {
        self.inner.y
    }

    /// Returns the Z component of this axis in `In`.
    #[must_use]
    pub fn z_component(&self) -> f64 {
        self.inner.z
    }

    pub(crate) fn unit(&self) -> &UnitVector3 {
        &self.inner
    }
}

impl<In> Neg for Axis<In> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_unit(UnitVector3::new_unchecked(-self.inner.into_inner()))
    }
}

impl<In> Display for Axis<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}]",
            self.inner.x, self.inner.y, self.inner.z
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Axis<In> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner
            .as_ref()
            .abs_diff_eq(other.inner.as_ref(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Axis<In> {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner
            .as_ref()
            .relative_eq(other.inner.as_ref(), epsilon, max_relative)
    }
}

#[cfg(test)]
impl<In> quickcheck::Arbitrary for Axis<In>
where
    In: 'static,
{
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // quickcheck will give us awkward f64 values -- we ignore those and
        // keep drawing until the components make a normalizable direction
        loop {
            let candidate = [
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
            ];
            if candidate.iter().all(|c| c.is_finite()) {
                if let Some(axis) = Axis::build(candidate[0], candidate[1], candidate[2]) {
                    return axis;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Axis;
    use approx::assert_relative_eq;
    use rstest::rstest;

    frame!(struct Torso);

    #[test]
    fn basis_axes_have_expected_components() {
        assert_eq!(Axis::<Torso>::x().x_component(), 1.0);
        assert_eq!(Axis::<Torso>::y().y_component(), 1.0);
        assert_eq!(Axis::<Torso>::z().z_component(), 1.0);
    }

    #[rstest]
    #[case(3.0, 0.0, 4.0, [0.6, 0.0, 0.8])]
    #[case(0.0, -2.0, 0.0, [0.0, -1.0, 0.0])]
    #[case(1.0, 1.0, 1.0, [0.57735026919, 0.57735026919, 0.57735026919])]
    fn build_normalizes(#[case] x: f64, #[case] y: f64, #[case] z: f64, #[case] expected: [f64; 3]) {
        let axis = Axis::<Torso>::build(x, y, z).expect("vector is normalizable");
        assert_relative_eq!(axis.x_component(), expected[0], epsilon = 1e-9);
        assert_relative_eq!(axis.y_component(), expected[1], epsilon = 1e-9);
        assert_relative_eq!(axis.z_component(), expected[2], epsilon = 1e-9);
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0)]
    #[case(1e-13, -1e-14, 0.0)]
    #[case(f64::NAN, 1.0, 0.0)]
    #[case(f64::INFINITY, 0.0, 0.0)]
    fn build_rejects_degenerate_vectors(#[case] x: f64, #[case] y: f64, #[case] z: f64) {
        assert!(Axis::<Torso>::build(x, y, z).is_none());
    }

    #[test]
    fn negation_flips_every_component() {
        let axis = Axis::<Torso>::build(1.0, -2.0, 3.0).unwrap();
        let negated = -axis;
        assert_relative_eq!(negated.x_component(), -axis.x_component());
        assert_relative_eq!(negated.y_component(), -axis.y_component());
        assert_relative_eq!(negated.z_component(), -axis.z_component());
    }

    quickcheck::quickcheck! {
        fn arbitrary_axes_are_unit_length(axis: Axis<Torso>) -> bool {
            let norm = (axis.x_component().powi(2)
                + axis.y_component().powi(2)
                + axis.z_component().powi(2))
            .sqrt();
            (norm - 1.0).abs() < 1e-9
        }
    }
}
