//! This library provides hard-to-misuse rotation decompositions for researchers
//! with other things to worry about than quaternion algebra.
//!
//! Motion-capture pipelines report a bone's orientation as a unit quaternion or
//! rotation matrix, but clinicians reason about *sequences of elementary
//! rotations*: "plane of elevation, then elevation, then axial rotation". The
//! catch is that there is no single correct way to slice an orientation into
//! such a sequence -- the Euler/Cardan conventions, swing-twist, and
//! principal-axis decompositions all give different (and differently
//! misleading) answers near their respective singularities. This crate
//! implements the common conventions side by side so they can be compared on
//! the same trajectory.
//!
//! First and foremost, the library provides [`Orientation`] and [`Axis`] types
//! for representing rotations and unit directions. They are all generic over a
//! [`Frame`] so that values expressed relative to one reference segment cannot
//! (easily) be misused as though they were expressed relative to a different
//! one. The [`frame!`] macro allows you to define additional frames such that
//! you can distinguish between, say, the humerus measured in `Thorax` and the
//! same humerus measured in `ScapulaPlane`.
//!
//! Every decomposition produces a [`RotationSequence`]: an ordered list of
//! [`AxisAngle`] steps whose composition (in listed order, about axes fixed in
//! the parent frame) reconstructs the input orientation. The available methods
//! are:
//!
//! - [`cardan::CardanSequence`] -- four intrinsic Euler/Cardan angle sequences
//!   (`Yxy`, `Xzy`, `Yxz`, `Zxy`), each with five equivalent factorizations of
//!   the same three angles;
//! - [`Orientation::to_axis_angle`] -- the single shortest-path rotation;
//! - [`twist::SwingTwist`] -- swing-twist split about a caller-supplied axis;
//! - [`principal::PrincipalAxes`] -- a trajectory-fitted principal-axis
//!   decomposition (major, minor, axial);
//! - [`axial::true_axial_rotation`] -- not a per-frame decomposition but a
//!   numerically integrated, unwrap-free cumulative axial rotation across a
//!   whole [`Trajectory`].
//!
//! # Examples
//!
//! Assume the humerus of a subject is tracked relative to their torso while
//! the arm sweeps forward through 90° of elevation:
//!
//! ```
//! use torsia::{frame, Axis, Orientation, Trajectory};
//! use torsia::cardan::{CardanSequence, StepOrder};
//! use torsia::principal::PrincipalAxes;
//! use torsia::twist::SwingTwist;
//! use torsia::axial::true_axial_rotation;
//! use uom::si::f64::{Angle, Time};
//! use uom::si::{angle::degree, time::second};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // orientations from one mocap trial are all expressed in the torso frame
//! // of this subject, so give that frame its own type:
//! frame!(struct Torso);
//!
//! // the humerus elevating about the torso's +Z axis, sampled at 100 Hz:
//! let frames: Vec<Orientation<Torso>> = (0..=90)
//!     .map(|deg| {
//!         Orientation::from_axis_angle(&Axis::z(), Angle::new::<degree>(f64::from(deg)))
//!     })
//!     .collect();
//! let trajectory = Trajectory::new(frames, Time::new::<second>(0.01))?;
//! let elevated = trajectory.frames()[45];
//!
//! // the same orientation sliced under different conventions:
//! let isb = CardanSequence::Yxy.decompose(&elevated);
//! assert_eq!(isb.steps(StepOrder::FirstSecondThird).len(), 3);
//!
//! let split = SwingTwist::about(Axis::y()).decompose(&elevated);
//! assert_eq!(split.len(), 2);
//!
//! // trajectory-level methods consume the whole trial up front:
//! let principal = PrincipalAxes::fit(&trajectory)?;
//! assert_eq!(principal.decompose(&elevated).len(), 3);
//!
//! let axial = true_axial_rotation(&trajectory);
//! assert_eq!(axial.len(), trajectory.len());
//! # Ok(())
//! # }
//! ```
//!
//! Every sequence above reconstructs `elevated` when its steps are composed in
//! listed order -- that round-trip is the output contract of each method, and
//! the honest basis for comparing what the conventions *disagree* about: how
//! the total rotation is apportioned between the steps.
//!
//! # What this crate does not do
//!
//! No validation is performed on the orthonormality of caller-supplied
//! rotation matrices or the scale of quaternions beyond normalization at
//! construction; a malformed input produces a malformed output rather than an
//! error. Singular configurations (gimbal lock, zero rotation, the 180° twist
//! ambiguity) are *expected* inputs handled by explicit branching, never
//! errors.

#[macro_use]
mod frames;

mod axis;
mod decompose;
mod orientation;
mod sequence;
mod trajectory;
mod util;

pub mod axial;
pub mod cardan;
pub mod principal;
pub mod twist;

pub(crate) type Vector2 = nalgebra::Vector2<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type Matrix3 = nalgebra::Matrix3<f64>;
pub(crate) type Quaternion = nalgebra::Quaternion<f64>;
pub(crate) type UnitQuaternion = nalgebra::Unit<Quaternion>;
pub(crate) type UnitVector3 = nalgebra::Unit<Vector3>;

pub use axis::Axis;
pub use decompose::Decomposition;
pub use frames::{Frame, Thorax};
pub use orientation::Orientation;
pub use sequence::{AxisAngle, RotationSequence};
pub use trajectory::{Trajectory, TrajectoryError};
