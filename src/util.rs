use std::f64::consts::{PI, TAU};

/// Wraps an angle in radians into `(-π, π]`.
///
/// The half-open end is on the negative side so that a half turn keeps its
/// sign: an input of exactly `π` stays `π`, while anything past it comes back
/// around negative. This is the range the shortest-path extraction promises
/// for its angle.
pub(crate) fn wrap_to_signed(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
