use crate::cardan::{CardanSequence, StepOrder};
use crate::orientation::Orientation;
use crate::principal::PrincipalAxes;
use crate::sequence::RotationSequence;
use crate::twist::SwingTwist;

/// One decomposition method, with its method-specific configuration, behind a
/// single dispatch surface.
///
/// Useful when the method is chosen at runtime -- a plot selector, a config
/// file -- and the caller just wants `method.decompose(&frame)` regardless of
/// which it is. Each variant carries exactly the configuration its method
/// needs: the Cardan variant its [`CardanSequence`], swing-twist its
/// reference axis, the principal-axis variant its pre-fitted
/// [`PrincipalAxes`] (which must have been built from the trajectory under
/// analysis -- a construction-order dependency, not a runtime check).
///
/// When the method is known at compile time, calling it directly is clearer.
#[derive(Debug)]
pub enum Decomposition<In> {
    /// An intrinsic Cardan sequence, replayed in its own
    /// [`StepOrder::FirstSecondThird`] order (3 steps).
    Cardan(CardanSequence),

    /// The single shortest rotation from identity (1 step). See
    /// [`Orientation::to_axis_angle`].
    ShortestPath,

    /// Swing-twist about a configured axis (2 steps).
    SwingTwist(SwingTwist<In>),

    /// Major/minor/axial against a trajectory-fitted axis (3 steps).
    PrincipalAxes(PrincipalAxes<In>),
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Decomposition<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Decomposition<In> {}

impl<In> Decomposition<In> {
    /// Decomposes one orientation under this method.
    ///
    /// Whatever the method, the returned sequence reconstructs `orientation`
    /// when composed in listed order.
    #[must_use]
    pub fn decompose(&self, orientation: &Orientation<In>) -> RotationSequence<In> {
        match self {
            Decomposition::Cardan(sequence) => sequence
                .decompose(orientation)
                .steps(StepOrder::FirstSecondThird),
            Decomposition::ShortestPath => {
                RotationSequence::new(vec![orientation.to_axis_angle()])
            }
            Decomposition::SwingTwist(split) => split.decompose(orientation),
            Decomposition::PrincipalAxes(fitted) => fitted.decompose(orientation),
        }
    }
}
