use crate::orientation::Orientation;
use thiserror::Error;
use uom::si::f64::Time;
use uom::si::time::second;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::Frame;

/// The ways a [`Trajectory`] can fail to be constructed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryError {
    /// The frame list was empty; a trajectory must hold at least one
    /// orientation.
    #[error("trajectory must contain at least one frame")]
    Empty,

    /// The frame period was zero, negative, or not finite.
    #[error("frame period must be positive and finite")]
    NonPositiveFramePeriod,
}

/// A motion-capture trial: per-frame orientations of one segment, expressed
/// in the [`Frame`] `In` and sampled at a fixed frame period.
///
/// A trajectory is loaded once and immutable thereafter. The trajectory-level
/// computations -- [`principal::PrincipalAxes::fit`](crate::principal::PrincipalAxes::fit)
/// and [`axial::true_axial_rotation`](crate::axial::true_axial_rotation) --
/// consume the whole sequence up front; the per-frame decompositions simply
/// index into [`Trajectory::frames`].
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since the frames skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Trajectory<In> {
    frames: Vec<Orientation<In>>,
    frame_period: Time,
}

// manual impl of Clone to avoid requiring In: Clone
impl<In> Clone for Trajectory<In> {
    fn clone(&self) -> Self {
        Self {
            frames: self.frames.clone(),
            frame_period: self.frame_period,
        }
    }
}

impl<In> PartialEq<Self> for Trajectory<In> {
    fn eq(&self, other: &Self) -> bool {
        self.frames.eq(&other.frames) && self.frame_period.eq(&other.frame_period)
    }
}

impl<In> Trajectory<In> {
    /// Constructs a trajectory from per-frame orientations sampled
    /// `frame_period` apart.
    ///
    /// At least one frame is required (a single frame is a legal static
    /// trial), and the frame period must be positive and finite.
    pub fn new(
        frames: Vec<Orientation<In>>,
        frame_period: Time,
    ) -> Result<Self, TrajectoryError> {
        if frames.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        if !(frame_period.get::<second>() > 0.0) || !frame_period.get::<second>().is_finite() {
            return Err(TrajectoryError::NonPositiveFramePeriod);
        }
        Ok(Self {
            frames,
            frame_period,
        })
    }

    /// Returns the per-frame orientations in capture order.
    #[must_use]
    pub fn frames(&self) -> &[Orientation<In>] {
        &self.frames
    }

    /// Returns the sampling interval between consecutive frames.
    #[must_use]
    pub fn frame_period(&self) -> Time {
        self.frame_period
    }

    /// Returns the number of frames; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: an empty trajectory cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the orientation at frame `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Orientation<In>> {
        self.frames.get(index)
    }

    /// Returns an iterator over the frames in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, Orientation<In>> {
        self.frames.iter()
    }

    pub(crate) fn frame_period_seconds(&self) -> f64 {
        self.frame_period.get::<second>()
    }
}

impl<'a, In> IntoIterator for &'a Trajectory<In> {
    type Item = &'a Orientation<In>;
    type IntoIter = std::slice::Iter<'a, Orientation<In>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Trajectory, TrajectoryError};
    use crate::{Axis, Orientation};
    use uom::si::f64::{Angle, Time};
    use uom::si::{angle::degree, time::second};

    frame!(struct Torso);

    fn ramp(count: usize) -> Vec<Orientation<Torso>> {
        (0..count)
            .map(|i| {
                Orientation::from_axis_angle(&Axis::y(), Angle::new::<degree>(i as f64))
            })
            .collect()
    }

    #[test]
    fn rejects_empty_frame_list() {
        assert_eq!(
            Trajectory::<Torso>::new(Vec::new(), Time::new::<second>(0.01)).unwrap_err(),
            TrajectoryError::Empty,
        );
    }

    #[test]
    fn rejects_bad_frame_periods() {
        for period in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            assert_eq!(
                Trajectory::new(ramp(3), Time::new::<second>(period)).unwrap_err(),
                TrajectoryError::NonPositiveFramePeriod,
            );
        }
    }

    #[test]
    fn accepts_a_single_frame() {
        let trajectory = Trajectory::new(ramp(1), Time::new::<second>(0.01)).unwrap();
        assert_eq!(trajectory.len(), 1);
        assert!(!trajectory.is_empty());
    }

    #[test]
    fn frames_are_kept_in_capture_order() {
        let trajectory = Trajectory::new(ramp(5), Time::new::<second>(0.005)).unwrap();
        assert_eq!(trajectory.len(), 5);
        assert_eq!(trajectory.get(0), Some(&trajectory.frames()[0]));
        assert_eq!(trajectory.get(5), None);
        assert_eq!(trajectory.iter().count(), 5);
        assert_eq!(trajectory.frame_period().get::<second>(), 0.005);
    }
}
