//! Swing-twist decomposition.
//!
//! Splits a rotation into the part *about* a designated axis (the twist) and
//! the part orthogonal to it (the swing). For a long bone, twisting about the
//! shaft is clinically distinct from swinging the shaft around, and the
//! Cardan conventions conflate the two near their singularities -- this split
//! never does, which is why it is the preferred way to isolate axial
//! rotation.

use crate::axis::Axis;
use crate::orientation::{extract_axis_angle, Orientation};
use crate::sequence::{AxisAngle, RotationSequence};
use crate::{Quaternion, UnitQuaternion, UnitVector3};
use uom::si::angle::radian;
use uom::si::f64::Angle;

/// Projects a rotation onto the component about `axis`.
///
/// Keeps the scalar part and the vector part's projection onto the axis, then
/// renormalizes. At a half-turn twist the projection can vanish entirely;
/// normalization then amplifies whatever residual sign the projection
/// produced, which is the documented numerical edge of this construction --
/// deliberately not special-cased further.
pub(crate) fn twist_about(q: &UnitQuaternion, axis: &UnitVector3) -> UnitQuaternion {
    let projected = axis.as_ref() * q.imag().dot(axis);
    UnitQuaternion::new_normalize(Quaternion::from_parts(q.w, projected))
}

/// Extracts an [`AxisAngle`] step whose axis is *forced* to be `axis`,
/// encoding direction purely in the angle's sign.
///
/// The raw axis-angle extraction of a rotation known to be about ±`axis`
/// returns whichever of the two signs the quaternion happened to land on;
/// consumers comparing twist angles across frames need the axis pinned and
/// the sign moved into the angle.
pub(crate) fn forced_axis_step<In>(q: &UnitQuaternion, axis: Axis<In>) -> AxisAngle<In> {
    let (raw_axis, angle) = extract_axis_angle(q);
    let angle = if raw_axis.dot(axis.unit()) < 0.0 {
        -angle
    } else {
        angle
    };
    AxisAngle::new(axis, Angle::new::<radian>(angle))
}

/// Swing-twist decomposition relative to a caller-supplied twist axis.
///
/// The decomposition emits two steps, `[swing, twist]` in application order:
/// the swing carries the orientation's long-axis direction to where it
/// points, and the twist then spins about the configured axis. The twist
/// step's axis always equals the configured axis exactly (never a derived or
/// rotated copy); its sign lives in the angle.
///
/// # Examples
///
/// ```
/// use torsia::{frame, Axis, Orientation};
/// use torsia::twist::SwingTwist;
/// use uom::si::f64::Angle;
/// use uom::si::angle::degree;
///
/// frame!(struct Torso);
///
/// // pure axial rotation about the long axis: all twist, no swing
/// let spin = Orientation::<Torso>::from_axis_angle(&Axis::y(), Angle::new::<degree>(35.));
/// let split = SwingTwist::about(Axis::y()).decompose(&spin);
/// let [swing, twist] = [split.steps()[0], split.steps()[1]];
/// assert!(swing.angle().get::<degree>().abs() < 1e-9);
/// assert!((twist.angle().get::<degree>() - 35.).abs() < 1e-9);
/// assert_eq!(twist.axis(), Axis::y());
/// ```
#[derive(Debug)]
pub struct SwingTwist<In> {
    twist_axis: Axis<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for SwingTwist<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for SwingTwist<In> {}

impl<In> SwingTwist<In> {
    /// Configures a swing-twist split about `twist_axis`.
    #[must_use]
    pub fn about(twist_axis: Axis<In>) -> Self {
        Self { twist_axis }
    }

    /// Returns the configured twist axis.
    #[must_use]
    pub fn twist_axis(&self) -> Axis<In> {
        self.twist_axis
    }

    /// Splits an orientation into `[swing, twist]`.
    ///
    /// The twist is the projection of the rotation onto the configured axis;
    /// the swing is the residual `twist⁻¹ · q`, renormalized. Composing the
    /// two steps in listed order reconstructs the input.
    #[must_use]
    pub fn decompose(&self, orientation: &Orientation<In>) -> RotationSequence<In> {
        let q = orientation.inner;
        let twist = twist_about(&q, self.twist_axis.unit());
        let mut swing = twist.inverse() * q;
        swing.renormalize();

        let (swing_axis, swing_angle) = extract_axis_angle(&swing);
        let swing_step = AxisAngle::new(
            Axis::from_raw(swing_axis),
            Angle::new::<radian>(swing_angle),
        );
        let twist_step = forced_axis_step(&twist, self.twist_axis);
        RotationSequence::new(vec![swing_step, twist_step])
    }
}
