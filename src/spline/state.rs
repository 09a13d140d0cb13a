//! Per-curve spline state.
//!
//! Moments and tangent handles live in knot-indexed arrays that grow and
//! shrink with the point sequence. The moment arrays double as the warm
//! start for the next relaxation, so they are kept across solves instead of
//! being rebuilt.

use crate::domain::{HandleSide, Tangent};
use crate::error::FitError;

/// The two one-sided derivatives at a knot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TangentPair {
    pub incoming: Tangent,
    pub outgoing: Tangent,
}

impl TangentPair {
    pub fn new(incoming: Tangent, outgoing: Tangent) -> Self {
        Self { incoming, outgoing }
    }

    /// Same derivative on both sides.
    pub fn both(d: Tangent) -> Self {
        Self::new(d, d)
    }

    pub fn get(&self, side: HandleSide) -> Tangent {
        match side {
            HandleSide::Incoming => self.incoming,
            HandleSide::Outgoing => self.outgoing,
        }
    }

    pub fn set(&mut self, side: HandleSide, d: Tangent) {
        match side {
            HandleSide::Incoming => self.incoming = d,
            HandleSide::Outgoing => self.outgoing = d,
        }
    }
}

/// Moments `M_x`, `M_y` and tangent pairs, one slot per knot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplineState {
    mx: Vec<f64>,
    my: Vec<f64>,
    tangents: Vec<TangentPair>,
}

impl SplineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroed state for `n` knots.
    pub fn with_len(n: usize) -> Self {
        Self {
            mx: vec![0.0; n],
            my: vec![0.0; n],
            tangents: vec![TangentPair::default(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.mx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mx.is_empty()
    }

    pub fn moments_x(&self) -> &[f64] {
        &self.mx
    }

    pub fn moments_y(&self) -> &[f64] {
        &self.my
    }

    pub fn tangents(&self) -> &[TangentPair] {
        &self.tangents
    }

    pub fn tangent(&self, index: usize) -> Result<&TangentPair, FitError> {
        let len = self.len();
        self.tangents
            .get(index)
            .ok_or(FitError::IndexOutOfRange { index, len })
    }

    pub fn tangent_mut(&mut self, index: usize) -> Result<&mut TangentPair, FitError> {
        let len = self.len();
        self.tangents
            .get_mut(index)
            .ok_or(FitError::IndexOutOfRange { index, len })
    }

    /// Add a slot for a knot appended at the end.
    pub fn push_knot(&mut self) {
        self.mx.push(0.0);
        self.my.push(0.0);
        self.tangents.push(TangentPair::default());
    }

    pub fn pop_knot(&mut self) {
        self.mx.pop();
        self.my.pop();
        self.tangents.pop();
    }

    /// Drop the slot of knot `index`, shifting later knots down.
    pub fn remove_knot(&mut self, index: usize) -> Result<(), FitError> {
        let len = self.len();
        if index >= len {
            return Err(FitError::IndexOutOfRange { index, len });
        }
        self.mx.remove(index);
        self.my.remove(index);
        self.tangents.remove(index);
        Ok(())
    }

    /// Grow (with zeroed slots) or shrink to `n` knots.
    pub fn resize(&mut self, n: usize) {
        self.mx.resize(n, 0.0);
        self.my.resize(n, 0.0);
        self.tangents.resize(n, TangentPair::default());
    }

    pub fn clear(&mut self) {
        self.mx.clear();
        self.my.clear();
        self.tangents.clear();
    }

    pub(crate) fn moments_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.mx, &mut self.my)
    }

    pub(crate) fn tangents_mut(&mut self) -> &mut [TangentPair] {
        &mut self.tangents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_the_point_sequence() {
        let mut state = SplineState::new();
        assert!(state.is_empty());
        state.push_knot();
        state.push_knot();
        state.push_knot();
        assert_eq!(state.len(), 3);
        assert_eq!(state.tangents().len(), 3);

        state.pop_knot();
        assert_eq!(state.len(), 2);

        state.resize(5);
        assert_eq!(state.moments_y().len(), 5);

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn remove_knot_shifts_later_slots() {
        let mut state = SplineState::with_len(3);
        state.tangent_mut(2).unwrap().outgoing = Tangent::new(1.0, 2.0);
        state.remove_knot(0).unwrap();
        assert_eq!(state.tangent(1).unwrap().outgoing, Tangent::new(1.0, 2.0));
        assert_eq!(
            state.remove_knot(2),
            Err(FitError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn pair_accessors_by_side() {
        let mut pair = TangentPair::both(Tangent::new(1.0, 0.0));
        pair.set(HandleSide::Incoming, Tangent::new(0.0, 1.0));
        assert_eq!(pair.get(HandleSide::Incoming), Tangent::new(0.0, 1.0));
        assert_eq!(pair.get(HandleSide::Outgoing), Tangent::new(1.0, 0.0));
    }
}
