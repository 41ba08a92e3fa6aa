#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{Axis, Orientation};

/// Marks a type as a reference frame for orientations and axes.
///
/// A frame is a zero-sized type used only to tag values like [`Orientation`]
/// and [`Axis`] with the frame their components are expressed in. A frame does
/// not know its relation to any other frame.
///
/// All frames are right-handed Cartesian triads following the ISB
/// recommendation for body segments:
///
/// - Positive X points anteriorly (forwards out of the segment).
/// - Positive Y points superiorly, along the segment's long axis.
/// - Positive Z points to the subject's right.
///
/// While you _can_ implement this trait directly, prefer using
/// [`frame!`](crate::frame).
pub trait Frame {}

/// Defines a new reference frame.
///
/// Note that the frame is a zero-sized type used only to mark things like
/// [`Orientation`] and [`Axis`] with what frame their components are expressed
/// in. Two mocap trials of the same joint still get distinct frames, since the
/// subject (and thus the meaning of each coordinate) differs between them:
///
/// ```rust
/// # use torsia::frame;
/// frame!(pub struct SubjectOneTorso);
/// frame!(pub struct SubjectTwoTorso);
/// ```
///
/// You can include doc comments and attributes directly in the invocation of
/// `frame!` to add docs and derived traits to your type:
///
/// ```rust
/// torsia::frame! {
///     /// Torso of the patient, digitized at the start of the session.
///     #[derive(Hash)]
///     pub(crate) struct PatientTorso
/// }
/// ```
#[macro_export]
macro_rules! frame {
    {
        $(#[$attr:meta])*
        $vis:vis struct $name:ident
    } => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::Frame for $name {}
    };
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $crate::frame!($(#[$attr])* $vis struct $name);
    };
}

frame! {
    /// The thorax frame of the ISB shoulder convention.
    ///
    /// - Positive X points anteriorly.
    /// - Positive Y points superiorly (towards the head), along the line
    ///   connecting the midpoints of the xiphoid/T8 and the incisura/C7.
    /// - Positive Z points to the subject's right.
    ///
    /// Provided as a convenience since nearly every shoulder analysis
    /// expresses humerus and scapula orientation relative to the thorax.
    /// Note that two subjects (or two trials) should _not_ share this type if
    /// there is any chance of mixing their data; declare per-trial frames with
    /// [`frame!`](crate::frame) instead.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Thorax
}

#[cfg(test)]
mod tests {
    frame!(struct LocalScratch);

    #[test]
    fn declared_frames_are_zero_sized() {
        assert_eq!(std::mem::size_of::<LocalScratch>(), 0);
        assert_eq!(std::mem::size_of::<super::Thorax>(), 0);
    }
}
