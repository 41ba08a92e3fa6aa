//! Euler/Cardan angle decompositions.
//!
//! A Cardan decomposition slices an orientation into three sequential
//! rotations about a convention-fixed triple of axes (eg, Y, then X, then Y
//! again). Which triple -- and therefore which clinical meaning the three
//! angles carry -- differs per joint; the conventions here are the ones in
//! common use for the shoulder complex:
//!
//! - [`CardanSequence::Yxy`] -- the ISB-recommended humerothoracic sequence
//!   (plane of elevation, elevation, axial rotation);
//! - [`CardanSequence::Xzy`] -- the Phadke sequence, re-expressed with the
//!   flexion axis first;
//! - [`CardanSequence::Yxz`] -- the scapulothoracic sequence (protraction,
//!   lateral rotation, tilt);
//! - [`CardanSequence::Zxy`] -- the trunk sequence.
//!
//! Every sequence has a singular configuration ("gimbal lock") where its
//! first and third rotation axes align and the split between them becomes
//! non-unique. The extraction detects that boundary with exact comparisons
//! (not a tolerance band), pins the middle angle to its boundary value, and
//! by convention assigns the whole residual rotation to the first angle.
//!
//! Be aware that rotational angles have high ambiguities in literature and
//! are easy to use wrong, especially because different fields tend to use the
//! same term with different meanings (eg, "Euler angles" mean something else
//! in aerospace than in mathematics).

use crate::axis::Axis;
use crate::orientation::Orientation;
use crate::sequence::{AxisAngle, RotationSequence};
use crate::{Matrix3, UnitQuaternion, Vector3};
use nalgebra::Unit;
use std::f64::consts::{FRAC_PI_2, PI};
use std::marker::PhantomData;
use uom::si::angle::radian;
use uom::si::f64::Angle;

/// An intrinsic Cardan angle sequence: which axis triple the three extracted
/// angles rotate about.
///
/// "Intrinsic" means each subsequent rotation is about an axis of the frame
/// produced by the rotations before it: the second angle rotates about the
/// once-rotated middle axis, the third about the twice-rotated last axis.
/// [`CardanAngles::steps`] can re-express the same three angles in other
/// application orders; the convention itself only fixes which axes carry
/// which angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardanSequence {
    /// Y, then X, then Y again -- the ISB humerothoracic convention.
    ///
    /// The middle angle comes from an arccosine and lies in `[0°, 180°]`; the
    /// singular configurations are a zero and a half-turn middle rotation.
    Yxy,

    /// X, then Z, then Y -- the Phadke humerothoracic sequence with the
    /// flexion axis leading.
    ///
    /// The middle angle comes from an arcsine and lies in `[-90°, 90°]`; the
    /// singular configurations are at exactly ±90°.
    Xzy,

    /// Y, then X, then Z -- the ISB scapulothoracic convention.
    ///
    /// Middle angle and singularities as for [`CardanSequence::Xzy`].
    Yxz,

    /// Z, then X, then Y -- the trunk convention.
    ///
    /// Middle angle and singularities as for [`CardanSequence::Xzy`].
    Zxy,
}

impl CardanSequence {
    /// Extracts the three Cardan angles of this sequence from an orientation.
    ///
    /// Defined for every orientation; at a gimbal-lock boundary the returned
    /// angles follow the documented degenerate convention (middle angle
    /// pinned, third angle zero) rather than failing.
    #[must_use]
    pub fn decompose<In>(self, orientation: &Orientation<In>) -> CardanAngles<In> {
        let (first, second, third) = self.extract(&orientation.matrix());
        CardanAngles {
            sequence: self,
            first,
            second,
            third,
            frame: PhantomData,
        }
    }

    /// The convention's axis triple as unit basis vectors of the parent
    /// frame.
    pub(crate) fn axes(self) -> [Vector3; 3] {
        match self {
            CardanSequence::Yxy => [Vector3::y(), Vector3::x(), Vector3::y()],
            CardanSequence::Xzy => [Vector3::x(), Vector3::z(), Vector3::y()],
            CardanSequence::Yxz => [Vector3::y(), Vector3::x(), Vector3::z()],
            CardanSequence::Zxy => [Vector3::z(), Vector3::x(), Vector3::y()],
        }
    }

    /// Closed-form angle extraction from a rotation matrix.
    ///
    /// The element picked for the middle angle, and the off-diagonal pairs
    /// fed to `atan2` for the outer angles, are the defining characteristic
    /// of each sequence; a wrong sign here silently flips a rotation
    /// direction, so the formulas below are each derived from the literal
    /// product of the three elementary rotation matrices.
    ///
    /// The gimbal-lock boundary is detected with exact `< 1` / `> -1`
    /// comparisons. This also keeps the inverse trigonometry in-domain when a
    /// quaternion-derived matrix element drifts a hair past ±1.
    pub(crate) fn extract(self, m: &Matrix3) -> (f64, f64, f64) {
        match self {
            // R = Ry(a) · Rx(b) · Ry(c), middle element m11 = cos b
            CardanSequence::Yxy => {
                let m11 = m[(1, 1)];
                if m11 < 1.0 {
                    if m11 > -1.0 {
                        (
                            f64::atan2(m[(0, 1)], m[(2, 1)]),
                            m11.acos(),
                            f64::atan2(m[(1, 0)], -m[(1, 2)]),
                        )
                    } else {
                        // b == 180°: only a - c is observable
                        (f64::atan2(-m[(0, 2)], m[(0, 0)]), PI, 0.0)
                    }
                } else {
                    // b == 0: only a + c is observable
                    (f64::atan2(m[(0, 2)], m[(0, 0)]), 0.0, 0.0)
                }
            }
            // R = Rx(a) · Rz(b) · Ry(c), middle element m01 = -sin b
            CardanSequence::Xzy => {
                let m01 = m[(0, 1)];
                if m01 < 1.0 {
                    if m01 > -1.0 {
                        (
                            f64::atan2(m[(2, 1)], m[(1, 1)]),
                            (-m01).asin(),
                            f64::atan2(m[(0, 2)], m[(0, 0)]),
                        )
                    } else {
                        // b == 90°: only a - c is observable
                        (f64::atan2(m[(2, 0)], m[(2, 2)]), FRAC_PI_2, 0.0)
                    }
                } else {
                    // b == -90°: only a + c is observable
                    (f64::atan2(-m[(2, 0)], m[(2, 2)]), -FRAC_PI_2, 0.0)
                }
            }
            // R = Ry(a) · Rx(b) · Rz(c), middle element m12 = -sin b
            CardanSequence::Yxz => {
                let m12 = m[(1, 2)];
                if m12 < 1.0 {
                    if m12 > -1.0 {
                        (
                            f64::atan2(m[(0, 2)], m[(2, 2)]),
                            (-m12).asin(),
                            f64::atan2(m[(1, 0)], m[(1, 1)]),
                        )
                    } else {
                        // b == 90°: only a - c is observable
                        (f64::atan2(m[(0, 1)], m[(0, 0)]), FRAC_PI_2, 0.0)
                    }
                } else {
                    // b == -90°: only a + c is observable
                    (f64::atan2(-m[(0, 1)], m[(0, 0)]), -FRAC_PI_2, 0.0)
                }
            }
            // R = Rz(a) · Rx(b) · Ry(c), middle element m21 = sin b
            CardanSequence::Zxy => {
                let m21 = m[(2, 1)];
                if m21 < 1.0 {
                    if m21 > -1.0 {
                        (
                            f64::atan2(-m[(0, 1)], m[(1, 1)]),
                            m21.asin(),
                            f64::atan2(-m[(2, 0)], m[(2, 2)]),
                        )
                    } else {
                        // b == -90°: only a - c is observable
                        (f64::atan2(-m[(0, 2)], m[(0, 0)]), -FRAC_PI_2, 0.0)
                    }
                } else {
                    // b == 90°: only a + c is observable
                    (f64::atan2(m[(0, 2)], m[(0, 0)]), FRAC_PI_2, 0.0)
                }
            }
        }
    }
}

/// One of the five equivalent application orders in which the three extracted
/// angles of a [`CardanAngles`] can be replayed.
///
/// The three angles of a Cardan decomposition are extracted once; the same
/// physical rotation can then be written as five different compositions of
/// those angles, differing in which step is applied first and, consequently,
/// in which axes the steps rotate about (an axis whose angle is applied
/// *after* a rotation that temporally preceded it in the convention must be
/// expressed pre-rotated by it). Downstream consumers -- say, a view that
/// animates "rotation about the fixed Z first" -- pick the order they need;
/// every order reconstructs the same orientation.
///
/// The variant names give the application order of the convention's first,
/// second, and third angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOrder {
    /// Fully intrinsic: the order the convention names. The second step's
    /// axis is rotated by the first, the third step's axis by the first two.
    FirstSecondThird,

    /// Fully extrinsic: all three axes stay fixed in the parent frame, at
    /// the cost of applying the angles in reverse.
    ThirdSecondFirst,

    /// Mixed: third and first about fixed axes, second about the
    /// once-rotated middle axis.
    ThirdFirstSecond,

    /// Mixed: second about its fixed axis, third about the middle-rotated
    /// last axis, first about its fixed axis.
    SecondThirdFirst,

    /// Mixed: first about its fixed axis, then third and second about
    /// first-rotated axes.
    FirstThirdSecond,
}

impl StepOrder {
    /// All five application orders.
    pub const ALL: [StepOrder; 5] = [
        StepOrder::FirstSecondThird,
        StepOrder::ThirdSecondFirst,
        StepOrder::ThirdFirstSecond,
        StepOrder::SecondThirdFirst,
        StepOrder::FirstThirdSecond,
    ];
}

/// The three angles of one Cardan decomposition, plus the machinery to
/// replay them as [`RotationSequence`]s in any of the five equivalent
/// [`StepOrder`]s.
///
/// The angle accessors are the axis-identity → angle mapping: whatever order
/// the steps are later replayed in, [`CardanAngles::first`] is always the
/// rotation about the convention's first axis, and so on. Re-expressing the
/// decomposition in another order never recomputes the angles.
#[derive(Debug)]
pub struct CardanAngles<In> {
    sequence: CardanSequence,
    /// Angles in radians, in convention order.
    first: f64,
    second: f64,
    third: f64,
    frame: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for CardanAngles<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for CardanAngles<In> {}

impl<In> PartialEq<Self> for CardanAngles<In> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence.eq(&other.sequence)
            && self.first.eq(&other.first)
            && self.second.eq(&other.second)
            && self.third.eq(&other.third)
    }
}

impl<In> CardanAngles<In> {
    /// The convention these angles were extracted under.
    #[must_use]
    pub fn sequence(&self) -> CardanSequence {
        self.sequence
    }

    /// The rotation about the convention's first axis.
    #[must_use]
    pub fn first(&self) -> Angle {
        Angle::new::<radian>(self.first)
    }

    /// The rotation about the convention's second (middle) axis.
    #[must_use]
    pub fn second(&self) -> Angle {
        Angle::new::<radian>(self.second)
    }

    /// The rotation about the convention's third axis.
    #[must_use]
    pub fn third(&self) -> Angle {
        Angle::new::<radian>(self.third)
    }

    /// All three angles in convention order.
    #[must_use]
    pub fn angles(&self) -> (Angle, Angle, Angle) {
        (self.first(), self.second(), self.third())
    }

    /// Replays the three angles as an ordered [`RotationSequence`] in the
    /// requested application order.
    ///
    /// Whatever the order, the sequence reconstructs the orientation these
    /// angles were extracted from; the orders differ only in which axes the
    /// steps end up about (fixed parent axes versus pre-rotated ones).
    #[must_use]
    pub fn steps(&self, order: StepOrder) -> RotationSequence<In> {
        let [e1, e2, e3] = self.sequence.axes();
        let q1 = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(e1), self.first);
        let q2 = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(e2), self.second);

        let step = |axis: Vector3, radians: f64| {
            AxisAngle::new(
                Axis::from_unit(Unit::new_normalize(axis)),
                Angle::new::<radian>(radians),
            )
        };

        let steps = match order {
            StepOrder::FirstSecondThird => vec![
                step(e1, self.first),
                step(q1 * e2, self.second),
                step(q1 * (q2 * e3), self.third),
            ],
            StepOrder::ThirdSecondFirst => vec![
                step(e3, self.third),
                step(e2, self.second),
                step(e1, self.first),
            ],
            StepOrder::ThirdFirstSecond => vec![
                step(e3, self.third),
                step(e1, self.first),
                step(q1 * e2, self.second),
            ],
            StepOrder::SecondThirdFirst => vec![
                step(e2, self.second),
                step(q2 * e3, self.third),
                step(e1, self.first),
            ],
            StepOrder::FirstThirdSecond => vec![
                step(e1, self.first),
                step(q1 * e3, self.third),
                step(q1 * e2, self.second),
            ],
        };
        RotationSequence::new(steps)
    }

    /// The intrinsic replay -- the order the convention itself names.
    #[must_use]
    pub fn intrinsic_steps(&self) -> RotationSequence<In> {
        self.steps(StepOrder::FirstSecondThird)
    }
}

#[cfg(test)]
mod tests {
    use super::{CardanSequence, StepOrder};
    use crate::{Axis, Matrix3, Orientation};
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};
    use uom::si::angle::radian;
    use uom::si::f64::Angle;

    frame!(struct Torso);

    const SEQUENCES: [CardanSequence; 4] = [
        CardanSequence::Yxy,
        CardanSequence::Xzy,
        CardanSequence::Yxz,
        CardanSequence::Zxy,
    ];

    fn r(radians: f64) -> Angle {
        Angle::new::<radian>(radians)
    }

    /// Composes the intrinsic sequence directly from elementary rotations.
    fn intrinsic(sequence: CardanSequence, a: f64, b: f64, c: f64) -> Orientation<Torso> {
        let axis = |v: nalgebra::Vector3<f64>| {
            Axis::<Torso>::build(v.x, v.y, v.z).expect("basis axes are unit length")
        };
        let [e1, e2, e3] = sequence.axes();
        Orientation::from_axis_angle(&axis(e1), r(a))
            * Orientation::from_axis_angle(&axis(e2), r(b))
            * Orientation::from_axis_angle(&axis(e3), r(c))
    }

    #[rstest]
    #[case(CardanSequence::Yxy, 0.5, 0.7, -0.9)]
    #[case(CardanSequence::Yxy, -2.1, 2.8, 0.3)]
    #[case(CardanSequence::Xzy, 0.5, 0.7, -0.9)]
    #[case(CardanSequence::Xzy, -2.1, -1.2, 0.3)]
    #[case(CardanSequence::Yxz, 0.5, 0.7, -0.9)]
    #[case(CardanSequence::Yxz, -2.1, -1.2, 0.3)]
    #[case(CardanSequence::Zxy, 0.5, 0.7, -0.9)]
    #[case(CardanSequence::Zxy, -2.1, -1.2, 0.3)]
    fn recovers_known_angles(
        #[case] sequence: CardanSequence,
        #[case] a: f64,
        #[case] b: f64,
        #[case] c: f64,
    ) {
        let angles = sequence.decompose(&intrinsic(sequence, a, b, c));
        assert_relative_eq!(angles.first().get::<radian>(), a, epsilon = 1e-9);
        assert_relative_eq!(angles.second().get::<radian>(), b, epsilon = 1e-9);
        assert_relative_eq!(angles.third().get::<radian>(), c, epsilon = 1e-9);
    }

    // Boundary matrices with the middle-angle element at exactly ±1; built by
    // hand since a quaternion round-trip would smudge the exact value. In all
    // of them the residual first-axis rotation is 0.7 rad.
    #[rstest]
    #[case::yxy_zero(
        CardanSequence::Yxy,
        // Ry(0.7): middle element m11 == +1
        Matrix3::new(
            0.7648421872844885, 0.0, 0.644217687237691,
            0.0, 1.0, 0.0,
            -0.644217687237691, 0.0, 0.7648421872844885,
        ),
        (0.7, 0.0, 0.0)
    )]
    #[case::yxy_half_turn(
        CardanSequence::Yxy,
        // Ry(0.7)·Rx(π): middle element m11 == -1
        Matrix3::new(
            0.7648421872844885, 0.0, -0.644217687237691,
            0.0, -1.0, 0.0,
            -0.644217687237691, 0.0, -0.7648421872844885,
        ),
        (0.7, PI, 0.0)
    )]
    #[case::xzy_positive(
        CardanSequence::Xzy,
        // Rx(0.7)·Rz(π/2): middle element m01 == -1
        Matrix3::new(
            0.0, -1.0, 0.0,
            0.7648421872844885, 0.0, -0.644217687237691,
            0.644217687237691, 0.0, 0.7648421872844885,
        ),
        (0.7, FRAC_PI_2, 0.0)
    )]
    #[case::xzy_negative(
        CardanSequence::Xzy,
        // Rx(0.7)·Rz(-π/2): middle element m01 == +1
        Matrix3::new(
            0.0, 1.0, 0.0,
            -0.7648421872844885, 0.0, -0.644217687237691,
            -0.644217687237691, 0.0, 0.7648421872844885,
        ),
        (0.7, -FRAC_PI_2, 0.0)
    )]
    #[case::yxz_positive(
        CardanSequence::Yxz,
        // Ry(0.7)·Rx(π/2): middle element m12 == -1
        Matrix3::new(
            0.7648421872844885, 0.644217687237691, 0.0,
            0.0, 0.0, -1.0,
            -0.644217687237691, 0.7648421872844885, 0.0,
        ),
        (0.7, FRAC_PI_2, 0.0)
    )]
    #[case::yxz_negative(
        CardanSequence::Yxz,
        // Ry(0.7)·Rx(-π/2): middle element m12 == +1
        Matrix3::new(
            0.7648421872844885, -0.644217687237691, 0.0,
            0.0, 0.0, 1.0,
            -0.644217687237691, -0.7648421872844885, 0.0,
        ),
        (0.7, -FRAC_PI_2, 0.0)
    )]
    #[case::zxy_positive(
        CardanSequence::Zxy,
        // Rz(0.7)·Rx(π/2): middle element m21 == +1
        Matrix3::new(
            0.7648421872844885, 0.0, 0.644217687237691,
            0.644217687237691, 0.0, -0.7648421872844885,
            0.0, 1.0, 0.0,
        ),
        (0.7, FRAC_PI_2, 0.0)
    )]
    #[case::zxy_negative(
        CardanSequence::Zxy,
        // Rz(0.7)·Rx(-π/2): middle element m21 == -1
        Matrix3::new(
            0.7648421872844885, 0.0, -0.644217687237691,
            0.644217687237691, 0.0, 0.7648421872844885,
            0.0, -1.0, 0.0,
        ),
        (0.7, -FRAC_PI_2, 0.0)
    )]
    fn gimbal_boundary_extracts_degenerate_triple(
        #[case] sequence: CardanSequence,
        #[case] matrix: Matrix3,
        #[case] expected: (f64, f64, f64),
    ) {
        let (a, b, c) = sequence.extract(&matrix);
        assert!(a.is_finite() && b.is_finite() && c.is_finite());
        assert_relative_eq!(a, expected.0, epsilon = 1e-12);
        assert_relative_eq!(b, expected.1, epsilon = 1e-12);
        assert_relative_eq!(c, expected.2, epsilon = 1e-12);
    }

    #[test]
    fn intrinsic_steps_use_the_convention_axes() {
        let angles = CardanSequence::Xzy.decompose(&intrinsic(CardanSequence::Xzy, 0.4, 0.2, -0.3));
        let steps = angles.intrinsic_steps();
        // first step is about the untouched first axis; the later axes are
        // pre-rotated and generally differ from the basis axes
        assert_relative_eq!(steps.steps()[0].axis(), Axis::x(), epsilon = 1e-12);
        assert_relative_eq!(
            steps.steps()[0].angle().get::<radian>(),
            0.4,
            epsilon = 1e-9
        );
    }

    #[test]
    fn extrinsic_steps_use_fixed_axes_in_reverse_order() {
        let angles = CardanSequence::Yxz.decompose(&intrinsic(CardanSequence::Yxz, 0.4, 0.2, -0.3));
        let steps = angles.steps(StepOrder::ThirdSecondFirst);
        assert_relative_eq!(steps.steps()[0].axis(), Axis::z(), epsilon = 1e-12);
        assert_relative_eq!(steps.steps()[1].axis(), Axis::x(), epsilon = 1e-12);
        assert_relative_eq!(steps.steps()[2].axis(), Axis::y(), epsilon = 1e-12);
        assert_relative_eq!(
            steps.steps()[0].angle().get::<radian>(),
            -0.3,
            epsilon = 1e-9
        );
    }

    quickcheck::quickcheck! {
        fn every_factorization_round_trips(orientation: Orientation<Torso>) -> () {
            for sequence in SEQUENCES {
                let angles = sequence.decompose(&orientation);
                for order in StepOrder::ALL {
                    assert_relative_eq!(
                        angles.steps(order).reconstruct(),
                        orientation,
                        epsilon = 1e-9
                    );
                }
            }
        }

        fn factorizations_agree_on_the_angles(orientation: Orientation<Torso>) -> bool {
            SEQUENCES.iter().all(|sequence| {
                let angles = sequence.decompose(&orientation);
                let by_angle = |order: StepOrder| {
                    let steps = angles.steps(order);
                    let mut extracted: Vec<f64> = steps
                        .steps()
                        .iter()
                        .map(|s| s.angle().get::<radian>())
                        .collect();
                    extracted.sort_by(f64::total_cmp);
                    extracted
                };
                let reference = by_angle(StepOrder::FirstSecondThird);
                StepOrder::ALL.iter().all(|order| by_angle(*order) == reference)
            })
        }
    }
}
