//! Angular velocity and path-independent ("true") axial rotation.
//!
//! Frame-by-frame decompositions report axial rotation relative to a
//! convention, which wraps at ±180° and picks up artifacts whenever the
//! motion passes near the convention's singularity. The trajectory-level
//! quantity computed here sidesteps both: differentiate the orientation
//! sequence numerically, project the angular velocity onto the segment's own
//! long axis at every instant, and integrate that axial speed back up. The
//! result winds monotonically with the physical spin of the bone and can
//! exceed ±360° without wrapping -- which is what makes it usable as a ground
//! truth to compare the conventions against.

use crate::axis::Axis;
use crate::trajectory::Trajectory;
use crate::{Matrix3, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::angle::radian;
use uom::si::angular_velocity::radian_per_second;
use uom::si::f64::{Angle, AngularVelocity};

#[cfg(doc)]
use crate::Frame;

/// The angular velocity of a segment at one frame, expressed in the parent
/// [`Frame`] `In`.
#[derive(Debug)]
pub struct SegmentAngularVelocity<In> {
    /// Components in radians per second.
    inner: Vector3,
    frame: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for SegmentAngularVelocity<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for SegmentAngularVelocity<In> {}

impl<In> PartialEq<Self> for SegmentAngularVelocity<In> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<In> SegmentAngularVelocity<In> {
    fn new(inner: Vector3) -> Self {
        Self {
            inner,
            frame: PhantomData,
        }
    }

    /// The component about the parent X axis.
    #[must_use]
    pub fn about_x(&self) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(self.inner.x)
    }

    /// The component about the parent Y axis.
    #[must_use]
    pub fn about_y(&self) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(self.inner.y)
    }

    /// The component about the parent Z axis.
    #[must_use]
    pub fn about_z(&self) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(self.inner.z)
    }

    /// The component about an arbitrary axis in `In`.
    #[must_use]
    pub fn about(&self, axis: &Axis<In>) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(self.inner.dot(axis.unit()))
    }
}

impl<In> Display for SegmentAngularVelocity<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}] rad/s",
            self.inner.x, self.inner.y, self.inner.z
        )
    }
}

/// Estimates the per-frame angular velocity of a trajectory.
///
/// The rotation-matrix sequence is differentiated symmetrically -- central
/// difference at interior frames, forward/backward difference at the two
/// boundary frames -- and each derivative is turned into the angular-velocity
/// tensor `Ω = dR·Rᵀ`, whose skew-symmetric entries hold the velocity vector.
///
/// A single-frame trajectory has no derivative to estimate; its one entry is
/// zero.
#[must_use]
pub fn angular_velocities<In>(trajectory: &Trajectory<In>) -> Vec<SegmentAngularVelocity<In>> {
    let matrices: Vec<Matrix3> = trajectory.iter().map(|frame| frame.matrix()).collect();
    angular_velocity_vectors(&matrices, trajectory.frame_period_seconds())
        .into_iter()
        .map(SegmentAngularVelocity::new)
        .collect()
}

pub(crate) fn angular_velocity_vectors(rotations: &[Matrix3], dt: f64) -> Vec<Vector3> {
    let n = rotations.len();
    if n < 2 {
        return vec![Vector3::zeros(); n];
    }
    (0..n)
        .map(|i| {
            let dr = if i == 0 {
                (rotations[1] - rotations[0]) / dt
            } else if i == n - 1 {
                (rotations[n - 1] - rotations[n - 2]) / dt
            } else {
                (rotations[i + 1] - rotations[i - 1]) / (2.0 * dt)
            };
            let tensor = dr * rotations[i].transpose();
            // vee of the skew tensor: with Ω_ij = -Ω_ji, the vector is
            // (Ω₃₂, Ω₁₃, Ω₂₁), ie (row, col) = (2,1), (0,2), (1,0) here
            Vector3::new(tensor[(2, 1)], tensor[(0, 2)], tensor[(1, 0)])
        })
        .collect()
}

/// Computes the cumulative, unwrapped axial rotation of a trajectory: one
/// angle per frame.
///
/// Each frame's [angular velocity](angular_velocities) is projected onto that
/// frame's own long axis to get an axial angular speed, and the speeds are
/// integrated with the trapezoidal rule (inherently sequential: each value
/// builds on the previous, in frame order).
///
/// The integration constant comes from frame 0's shortest-path decomposition
/// as `angle × axis·y` -- the resting-pose axial offset collapsed into one
/// scalar via its Y component. That is a simplifying approximation rather
/// than a rigorous projection, and it is preserved as-is so that series
/// computed here line up with published ones.
#[must_use]
pub fn true_axial_rotation<In>(trajectory: &Trajectory<In>) -> Vec<Angle> {
    let matrices: Vec<Matrix3> = trajectory.iter().map(|frame| frame.matrix()).collect();
    let dt = trajectory.frame_period_seconds();
    let omegas = angular_velocity_vectors(&matrices, dt);
    let axial_speeds: Vec<f64> = omegas
        .iter()
        .zip(&matrices)
        .map(|(omega, rotation)| omega.dot(&(rotation * Vector3::y())))
        .collect();

    let seed = {
        let step = trajectory.frames()[0].to_axis_angle();
        step.angle().get::<radian>() * step.axis().y_component()
    };

    let mut cumulative = seed;
    let mut out = Vec::with_capacity(axial_speeds.len());
    out.push(Angle::new::<radian>(cumulative));
    for i in 1..axial_speeds.len() {
        cumulative += 0.5 * (axial_speeds[i] + axial_speeds[i - 1]) * dt;
        out.push(Angle::new::<radian>(cumulative));
    }
    out
}
