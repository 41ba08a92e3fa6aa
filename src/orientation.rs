use crate::axis::Axis;
use crate::sequence::AxisAngle;
use crate::util::wrap_to_signed;
use crate::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use nalgebra::Rotation3;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::Mul;
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::Frame;

/// The orientation of a body segment whose components are expressed in the
/// [`Frame`] `In`.
///
/// Mathematically speaking, this is a type-safe wrapper around a [unit
/// quaternion]: the rotation that carries the basis axes of `In` onto the
/// segment's body axes. Equivalently, the columns of
/// [`Orientation::to_rotation_matrix`] are the segment's body axes expressed
/// in `In`.
///
/// Orientations can be built [from quaternion
/// components](Orientation::from_quaternion), [from a rotation
/// matrix](Orientation::from_rotation_matrix) (the two are interchangeable --
/// pick whichever your capture pipeline produces), or [from a single
/// axis-angle rotation](Orientation::from_axis_angle). They compose with `*`
/// following the matrix convention: in `a * b`, `b` is applied first.
///
/// <div class="warning">
///
/// No orthonormality validation is performed anywhere: a rotation matrix that
/// is not actually a rotation produces garbage, not an error. Quaternions are
/// normalized at construction, which counters drift but cannot repair a
/// genuinely malformed input.
///
/// </div>
///
/// [unit quaternion]: https://en.wikipedia.org/wiki/Versor
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Orientation<In> {
    pub(crate) inner: UnitQuaternion,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) frame: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Orientation<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Orientation<In> {}

impl<In> PartialEq<Self> for Orientation<In> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<In> Default for Orientation<In> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<In> Orientation<In> {
    /// Constructs the orientation whose body axes coincide with the basis
    /// axes of `In`.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_unit_quaternion(UnitQuaternion::identity())
    }

    /// Constructs an orientation from the components of a quaternion, given
    /// as `w` (the scalar/real part) and `i`, `j`, `k` (the vector/imaginary
    /// part).
    ///
    /// The quaternion is normalized internally, so the input does not need to
    /// be exactly unit length -- but it must be non-zero, since a zero
    /// quaternion has no meaningful rotation associated with it.
    #[must_use]
    pub fn from_quaternion(w: f64, i: f64, j: f64, k: f64) -> Self {
        debug_assert_ne!(
            [w, i, j, k],
            [0.0, 0.0, 0.0, 0.0],
            "quaternion must be non-zero"
        );
        Self::from_unit_quaternion(UnitQuaternion::new_normalize(Quaternion::new(w, i, j, k)))
    }

    /// Constructs an orientation from a rotation matrix, given as three rows.
    ///
    /// The matrix must be orthonormal with determinant +1; this is _not_
    /// validated (garbage in, garbage out). Its columns are taken to be the
    /// segment's body axes expressed in `In`.
    #[must_use]
    pub fn from_rotation_matrix(rows: [[f64; 3]; 3]) -> Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = rows;
        let matrix = Matrix3::new(m00, m01, m02, m10, m11, m12, m20, m21, m22);
        Self::from_unit_quaternion(UnitQuaternion::from_rotation_matrix(
            &Rotation3::from_matrix_unchecked(matrix),
        ))
    }

    /// Constructs the orientation reached by rotating from identity about
    /// `axis` by `angle` (right-hand rule).
    #[must_use]
    pub fn from_axis_angle(axis: &Axis<In>, angle: impl Into<Angle>) -> Self {
        Self::from_unit_quaternion(UnitQuaternion::from_axis_angle(
            axis.unit(),
            angle.into().get::<radian>(),
        ))
    }

    pub(crate) fn from_unit_quaternion(inner: UnitQuaternion) -> Self {
        Self {
            inner,
            frame: PhantomData,
        }
    }

    /// Returns the components of the unit quaternion representing this
    /// orientation as `(w, i, j, k)` where `w` is the scalar/real part.
    #[must_use]
    pub fn to_quaternion(&self) -> (f64, f64, f64, f64) {
        let q = self.inner.quaternion();
        (q.w, q.i, q.j, q.k)
    }

    /// Returns the rotation matrix equivalent of this orientation as three
    /// rows.
    ///
    /// The columns of the returned matrix are the segment's body axes
    /// expressed in `In`.
    #[must_use]
    pub fn to_rotation_matrix(&self) -> [[f64; 3]; 3] {
        let m = self.matrix();
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    pub(crate) fn matrix(&self) -> Matrix3 {
        *self.inner.to_rotation_matrix().matrix()
    }

    /// Returns the segment's body X axis (anterior) expressed in `In`.
    #[must_use]
    pub fn x_axis(&self) -> Axis<In> {
        Axis::from_unit(nalgebra::Unit::new_normalize(self.matrix() * Vector3::x()))
    }

    /// Returns the segment's body Y axis expressed in `In` -- the long axis of
    /// a bone segment under the ISB convention.
    ///
    /// This is the axis the [axial-rotation](crate::axial) and
    /// [principal-axis](crate::principal) computations project onto.
    #[must_use]
    pub fn long_axis(&self) -> Axis<In> {
        Axis::from_unit(nalgebra::Unit::new_normalize(self.matrix() * Vector3::y()))
    }

    /// Returns the segment's body Z axis expressed in `In`.
    #[must_use]
    pub fn z_axis(&self) -> Axis<In> {
        Axis::from_unit(nalgebra::Unit::new_normalize(self.matrix() * Vector3::z()))
    }

    /// Returns the equal-but-opposite orientation, ie, the rotation that
    /// undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_unit_quaternion(self.inner.inverse())
    }

    /// Returns the magnitude of the rotation separating `self` from `other`.
    ///
    /// Antipodal quaternion representations of the same orientation are zero
    /// apart.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> Angle {
        Angle::new::<radian>(self.inner.angle_to(&other.inner))
    }

    /// Decomposes this orientation into the single shortest rotation taking
    /// identity to it.
    ///
    /// The returned angle lies in `(-π, π]`; a quaternion past the half-turn
    /// (negative scalar part) comes back with a negated angle rather than one
    /// beyond π. The axis is the quaternion's vector part normalized -- except
    /// for near-zero rotations, where the division by `sin(angle/2)` is
    /// numerically unstable and the tiny raw vector part is kept as-is
    /// (finite, direction immaterial at zero angle, never NaN).
    #[must_use]
    pub fn to_axis_angle(&self) -> AxisAngle<In> {
        let (axis, angle) = extract_axis_angle(&self.inner);
        AxisAngle::new(Axis::from_raw(axis), Angle::new::<radian>(angle))
    }
}

/// Shortest-path extraction shared by every place that needs to turn a
/// quaternion into an axis-angle step.
pub(crate) fn extract_axis_angle(q: &UnitQuaternion) -> (Vector3, f64) {
    // acos is only defined on [-1, 1]; a unit-norm w can drift a hair past
    let w = q.w.clamp(-1.0, 1.0);
    let angle = wrap_to_signed(2.0 * w.acos());
    let s = (1.0 - w * w).sqrt();
    let axis = if s < 1e-3 { q.imag() } else { q.imag() / s };
    (axis, angle)
}

// Orientation<In> * Orientation<In> applies the right-hand side first, per the
// matrix convention.
impl<In> Mul for Orientation<In> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_unit_quaternion(self.inner * rhs.inner)
    }
}

impl<In> Display for Orientation<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Quaternion: {}", self.inner)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Orientation<In> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // this is very accurate in radians
        0.000_000_001
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // compare the angular distance so that antipodal quaternion
        // representations of the same orientation compare equal
        self.inner.angle_to(&other.inner).abs() <= epsilon
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Orientation<In> {
    fn default_max_relative() -> Self::Epsilon {
        Self::default_epsilon()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        // angular distances are compared against zero, where a relative
        // tolerance has nothing to scale by; treat both bounds as absolute
        self.abs_diff_eq(other, epsilon) || self.abs_diff_eq(other, max_relative)
    }
}

#[cfg(test)]
impl<In> quickcheck::Arbitrary for Orientation<In>
where
    In: 'static,
{
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // quickcheck will give us awkward f64 values -- we ignore those and
        // keep drawing until the four components make a normalizable quaternion
        loop {
            let candidate = [
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
                f64::arbitrary(g).rem_euclid(2.0) - 1.0,
            ];
            if !candidate.iter().all(|c| c.is_finite()) {
                continue;
            }
            let norm = candidate.iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm > 0.1 {
                return Self::from_quaternion(candidate[0], candidate[1], candidate[2], candidate[3]);
            }
        }
    }
}
