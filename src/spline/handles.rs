//! Tangent handle editing.
//!
//! A knot shows two handles: the incoming one at `knot - d_in / 3` and the
//! outgoing one at `knot + d_out / 3`. Dragging a handle sets that side's
//! derivative; the knot's `TangentMode` decides what happens to the other:
//!
//! - Smooth: the sibling takes the same derivative, so its handle is the
//!   point reflection of the edited one through the knot
//! - Straight: the sibling turns to stay collinear and keeps its length
//! - Corner: the sibling is left alone

use crate::domain::{HandleSide, Point, Tangent, TangentMode, coords, point};
use crate::spline::state::TangentPair;

/// Set `side` of `pair` to `d` and propagate to the sibling per `mode`.
pub fn edit_handle(pair: &mut TangentPair, side: HandleSide, d: Tangent, mode: TangentMode) {
    pair.set(side, d);
    let sibling = side.sibling();
    match mode {
        TangentMode::Smooth => pair.set(sibling, d),
        TangentMode::Straight => {
            let len = pair.get(sibling).norm();
            // A zero-length edit has no direction to follow.
            if let Some(dir) = d.try_normalize(0.0) {
                pair.set(sibling, dir * len);
            }
        }
        TangentMode::Corner => {}
    }
}

/// Where the handle for derivative `d` on `side` is drawn.
pub fn handle_position(knot: &Point, d: &Tangent, side: HandleSide) -> Point {
    let offset = d / 3.0;
    let k = coords(knot);
    let p = match side {
        HandleSide::Incoming => k - offset,
        HandleSide::Outgoing => k + offset,
    };
    point(p.x, p.y)
}

/// Derivative implied by a handle dragged to `handle`.
pub fn tangent_from_handle(knot: &Point, handle: &Point, side: HandleSide) -> Tangent {
    let offset = (coords(handle) - coords(knot)) * 3.0;
    match side {
        HandleSide::Incoming => -offset,
        HandleSide::Outgoing => offset,
    }
}
