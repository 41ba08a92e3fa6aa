use crate::axis::Axis;
use crate::orientation::Orientation;
use crate::{Quaternion, UnitQuaternion};
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::Frame;

/// One elementary rotation step: a signed angle about a unit [`Axis`] in the
/// [`Frame`] `In`.
///
/// The sign convention is the right-hand rule: the angle's sign combined with
/// the axis direction always reproduces the step's rotation, so `-30°` about
/// `+Z` and `+30°` about `-Z` are the same step written two ways.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct AxisAngle<In> {
    axis: Axis<In>,
    angle: Angle,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for AxisAngle<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for AxisAngle<In> {}

impl<In> PartialEq<Self> for AxisAngle<In> {
    fn eq(&self, other: &Self) -> bool {
        self.axis.eq(&other.axis) && self.angle.eq(&other.angle)
    }
}

impl<In> AxisAngle<In> {
    /// Constructs a rotation step of `angle` about `axis`.
    #[must_use]
    pub fn new(axis: Axis<In>, angle: impl Into<Angle>) -> Self {
        Self {
            axis,
            angle: angle.into(),
        }
    }

    /// Returns the rotation axis of this step.
    #[must_use]
    pub fn axis(&self) -> Axis<In> {
        self.axis
    }

    /// Returns the signed rotation angle of this step.
    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    /// Returns the orientation reached by applying just this step from
    /// identity.
    #[must_use]
    pub fn to_orientation(&self) -> Orientation<In> {
        Orientation::from_unit_quaternion(self.quaternion())
    }

    pub(crate) fn quaternion(&self) -> UnitQuaternion {
        let half = self.angle.get::<radian>() / 2.0;
        // built from parts (rather than nalgebra's axis-angle constructor) so
        // that a degenerate near-zero axis still yields a finite rotation
        UnitQuaternion::new_normalize(Quaternion::from_parts(
            half.cos(),
            self.axis.unit().as_ref() * half.sin(),
        ))
    }
}

impl<In> Display for AxisAngle<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}° about {}", self.angle.get::<degree>(), self.axis)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for AxisAngle<In> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.axis.abs_diff_eq(&other.axis, epsilon)
            && self
                .angle
                .get::<radian>()
                .abs_diff_eq(&other.angle.get::<radian>(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for AxisAngle<In> {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.axis.relative_eq(&other.axis, epsilon, max_relative)
            && self.angle.get::<radian>().relative_eq(
                &other.angle.get::<radian>(),
                epsilon,
                max_relative,
            )
    }
}

/// An ordered list of [`AxisAngle`] steps that jointly reconstruct one
/// orientation.
///
/// This is the output type of every decomposition in this crate. The steps
/// are listed in application order, each about an axis fixed in the parent
/// [`Frame`] `In`: composing step 1, then step 2 (and so on) from identity --
/// which is what [`RotationSequence::reconstruct`] does -- recovers the
/// orientation that was decomposed, to within floating-point tolerance. That
/// round-trip is the contract; what differs between decomposition methods is
/// only how the total rotation is apportioned between the steps.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
// no need for the "steps": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RotationSequence<In> {
    steps: Vec<AxisAngle<In>>,
}

// manual impl of Clone to avoid requiring In: Clone
impl<In> Clone for RotationSequence<In> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<In> PartialEq<Self> for RotationSequence<In> {
    fn eq(&self, other: &Self) -> bool {
        self.steps.eq(&other.steps)
    }
}

impl<In> RotationSequence<In> {
    pub(crate) fn new(steps: Vec<AxisAngle<In>>) -> Self {
        Self { steps }
    }

    /// Returns the steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[AxisAngle<In>] {
        &self.steps
    }

    /// Returns the number of steps (1, 2, or 3 depending on the method that
    /// produced this sequence).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Composes the steps in listed order and returns the resulting
    /// orientation.
    ///
    /// For a sequence produced by a decomposition, this recovers the
    /// decomposed orientation to within floating-point tolerance.
    #[must_use]
    pub fn reconstruct(&self) -> Orientation<In> {
        let composed = self
            .steps
            .iter()
            .fold(UnitQuaternion::identity(), |acc, step| {
                step.quaternion() * acc
            });
        Orientation::from_unit_quaternion(composed)
    }
}

impl<'a, In> IntoIterator for &'a RotationSequence<In> {
    type Item = &'a AxisAngle<In>;
    type IntoIter = std::slice::Iter<'a, AxisAngle<In>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl<In> Display for RotationSequence<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ", then ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
