//! Interactive curve editing context.
//!
//! `CurveSession` owns everything an editor keeps between frames: the
//! committed points, one tangent mode per knot, the spline state (moments
//! and tangent pairs) and the current selection. Structural edits keep all
//! per-knot arrays the same length as the point list.
//!
//! Spline mode follows the edits:
//! - editing a handle switches to Hermite (the handles now drive the curve)
//! - adding or removing knots, replacing the points, or `reset_tangents`
//!   switches back to Natural, which re-derives every tangent on the next
//!   solve
//! - moving a knot keeps the current mode

use crate::domain::{
    FitMethod, HandleSide, ParamKind, Point, SolverOptions, SplineMode, Tangent, TangentMode,
    coords,
};
use crate::error::FitError;
use crate::eval::{PARAM_STEP, sample_spline};
use crate::fit::{ParametricFit, fit_parametric};
use crate::param::parametrize;
use crate::spline::{
    SolveReport, SplineCurve, SplineState, TangentPair, edit_handle, solve_moments,
    tangent_from_handle,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CurveSession {
    points: Vec<Point>,
    modes: Vec<TangentMode>,
    state: SplineState,
    param: ParamKind,
    spline_mode: SplineMode,
    solver: SolverOptions,
    step: f64,
    selected: Option<usize>,
}

impl Default for CurveSession {
    fn default() -> Self {
        Self::new(ParamKind::default(), SolverOptions::default())
    }
}

impl CurveSession {
    pub fn new(param: ParamKind, solver: SolverOptions) -> Self {
        Self {
            points: Vec::new(),
            modes: Vec::new(),
            state: SplineState::new(),
            param,
            spline_mode: SplineMode::Natural,
            solver,
            step: PARAM_STEP,
            selected: None,
        }
    }

    /// Parameter step used when sampling the spline.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn param(&self) -> ParamKind {
        self.param
    }

    pub fn set_param(&mut self, param: ParamKind) {
        self.param = param;
    }

    /// Switch to the next parametrization scheme and return it.
    pub fn cycle_param(&mut self) -> ParamKind {
        self.param = self.param.next();
        self.param
    }

    pub fn spline_mode(&self) -> SplineMode {
        self.spline_mode
    }

    pub fn state(&self) -> &SplineState {
        &self.state
    }

    pub fn tangent_modes(&self) -> &[TangentMode] {
        &self.modes
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Append a committed point.
    pub fn push_point(&mut self, p: Point) {
        self.points.push(p);
        self.modes.push(TangentMode::default());
        self.state.push_knot();
        self.spline_mode = SplineMode::Natural;
    }

    /// Remove the last point, if any.
    pub fn pop_point(&mut self) -> Option<Point> {
        let p = self.points.pop()?;
        self.modes.pop();
        self.state.pop_knot();
        self.spline_mode = SplineMode::Natural;
        if self.selected == Some(self.points.len()) {
            self.selected = None;
        }
        Some(p)
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Point, FitError> {
        self.check_index(index)?;
        self.state.remove_knot(index)?;
        self.modes.remove(index);
        self.spline_mode = SplineMode::Natural;
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        Ok(self.points.remove(index))
    }

    /// Drop every point and all per-knot state.
    pub fn clear(&mut self) {
        self.points.clear();
        self.modes.clear();
        self.state.clear();
        self.spline_mode = SplineMode::Natural;
        self.selected = None;
    }

    /// Replace the whole sequence (import).
    pub fn replace_points(&mut self, points: Vec<Point>) {
        self.clear();
        self.modes = vec![TangentMode::default(); points.len()];
        self.state = SplineState::with_len(points.len());
        self.points = points;
    }

    /// Move knot `index` to `p`; its tangents travel with it.
    pub fn move_point(&mut self, index: usize, p: Point) -> Result<(), FitError> {
        self.check_index(index)?;
        self.points[index] = p;
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Result<(), FitError> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn set_tangent_mode(&mut self, index: usize, mode: TangentMode) -> Result<(), FitError> {
        self.check_index(index)?;
        self.modes[index] = mode;
        Ok(())
    }

    /// Drag one handle of knot `index` to `handle` and switch to Hermite.
    ///
    /// In Natural mode the tangents are refreshed first, so the untouched
    /// handles keep the shape currently on screen.
    pub fn drag_handle(
        &mut self,
        index: usize,
        side: HandleSide,
        handle: Point,
    ) -> Result<TangentPair, FitError> {
        self.check_index(index)?;
        let d = tangent_from_handle(&self.points[index], &handle, side);
        self.set_tangent(index, side, d)
    }

    /// Set one derivative of knot `index` and switch to Hermite.
    pub fn set_tangent(
        &mut self,
        index: usize,
        side: HandleSide,
        d: Tangent,
    ) -> Result<TangentPair, FitError> {
        self.check_index(index)?;
        if !d.iter().all(|v| v.is_finite()) {
            return Err(FitError::invalid("tangent", "components must be finite"));
        }
        if self.spline_mode == SplineMode::Natural {
            self.solve()?;
        }
        let mode = self.modes[index];
        let pair = self.state.tangent_mut(index)?;
        edit_handle(pair, side, d, mode);
        let updated = *pair;
        self.spline_mode = SplineMode::Hermite;
        Ok(updated)
    }

    /// Install a full set of tangent pairs and switch to Hermite.
    pub fn load_tangents(&mut self, pairs: &[TangentPair]) -> Result<(), FitError> {
        if pairs.len() != self.points.len() {
            return Err(FitError::ShapeMismatch {
                expected: self.points.len(),
                actual: pairs.len(),
            });
        }
        self.state.resize(pairs.len());
        for (i, pair) in pairs.iter().enumerate() {
            *self.state.tangent_mut(i)? = *pair;
        }
        self.spline_mode = SplineMode::Hermite;
        Ok(())
    }

    /// Drop edited handles and go back to the natural spline.
    pub fn reset_tangents(&mut self) -> Result<SolveReport, FitError> {
        self.spline_mode = SplineMode::Natural;
        self.solve()
    }

    /// Parameter vector of the committed points.
    pub fn parameters(&self) -> Result<Vec<f64>, FitError> {
        parametrize(self.param, &self.points)
    }

    /// Run the moment solve (Natural mode only; Hermite has nothing to solve).
    pub fn solve(&mut self) -> Result<SolveReport, FitError> {
        if self.spline_mode == SplineMode::Hermite {
            return Ok(SolveReport {
                knots: self.points.len(),
                ..SolveReport::default()
            });
        }
        let t = self.parameters()?;
        solve_moments(&self.points, &t, &mut self.state, &self.solver)
    }

    /// Solve if needed and compile the committed curve.
    pub fn curve(&mut self) -> Result<SplineCurve, FitError> {
        self.solve_curve().map(|(_, curve)| curve)
    }

    /// Like [`CurveSession::curve`], also returning the report of the one
    /// solve it ran.
    pub fn solve_curve(&mut self) -> Result<(SolveReport, SplineCurve), FitError> {
        let report = self.solve()?;
        let t = self.parameters()?;
        let curve = SplineCurve::build(self.spline_mode, &self.points, &t, &self.state)?;
        Ok((report, curve))
    }

    /// Fit `x(t), y(t)` through the committed points with a linear method.
    pub fn fit(&self, method: &FitMethod) -> Result<ParametricFit, FitError> {
        fit_parametric(method, self.param, &self.points)
    }

    /// Dense polyline of the spline, optionally extended to an uncommitted
    /// `live` point (the cursor while placing the next knot).
    ///
    /// A live point equal to the last committed point is skipped, since it
    /// would make a zero-length step. With fewer than two knots the knots
    /// themselves are returned.
    pub fn preview(&mut self, live: Option<Point>) -> Result<Vec<Point>, FitError> {
        let live = match live {
            Some(p) if self.points.last() == Some(&p) => {
                log::debug!("live point coincides with the last knot; skipped");
                None
            }
            other => other,
        };
        let Some(live) = live else {
            if self.points.len() < 2 {
                return Ok(self.points.clone());
            }
            let curve = self.curve()?;
            return Ok(sample_spline(&curve, self.step)?.collect());
        };

        let mut points = self.points.clone();
        points.push(live);
        if points.len() < 2 {
            return Ok(points);
        }
        let t = parametrize(self.param, &points)?;

        match self.spline_mode {
            SplineMode::Natural => {
                // Solve in place so the committed knots keep a warm start.
                let n = self.points.len();
                let result = solve_moments(&points, &t, &mut self.state, &self.solver).and_then(
                    |_| SplineCurve::build(SplineMode::Natural, &points, &t, &self.state),
                );
                self.state.resize(n);
                let curve = result?;
                Ok(sample_spline(&curve, self.step)?.collect())
            }
            SplineMode::Hermite => {
                let mut state = self.state.clone();
                let n = points.len();
                let secant = (coords(&points[n - 1]) - coords(&points[n - 2])) / (t[n - 1] - t[n - 2]);
                state.push_knot();
                *state.tangent_mut(n - 1)? = TangentPair::both(secant);
                let curve = SplineCurve::build(SplineMode::Hermite, &points, &t, &state)?;
                Ok(sample_spline(&curve, self.step)?.collect())
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), FitError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(FitError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point;
    use crate::spline::handle_position;

    fn session_with(points: &[(f64, f64)]) -> CurveSession {
        let mut s = CurveSession::default();
        for &(x, y) in points {
            s.push_point(point(x, y));
        }
        s
    }

    #[test]
    fn arrays_stay_in_lockstep() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        assert_eq!(s.state().len(), 4);
        assert_eq!(s.tangent_modes().len(), 4);

        s.remove_point(1).unwrap();
        assert_eq!(s.points(), &[point(0.0, 0.0), point(2.0, 0.0), point(3.0, 1.0)]);
        assert_eq!(s.state().len(), 3);

        s.pop_point();
        assert_eq!(s.state().len(), 2);
        assert_eq!(s.tangent_modes().len(), 2);

        s.clear();
        assert!(s.is_empty());
        assert!(s.state().is_empty());
    }

    #[test]
    fn selection_follows_removals() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        s.select(2).unwrap();
        s.remove_point(0).unwrap();
        assert_eq!(s.selected(), Some(1));
        s.remove_point(1).unwrap();
        assert_eq!(s.selected(), None);
        assert!(matches!(s.select(5), Err(FitError::IndexOutOfRange { index: 5, len: 1 })));
    }

    #[test]
    fn preview_skips_coincident_live_point() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0)]);
        let without = s.preview(None).unwrap();
        let with_dup = s.preview(Some(point(1.0, 1.0))).unwrap();
        assert_eq!(without, with_dup);
    }

    #[test]
    fn preview_extends_to_live_point_without_committing() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let line = s.preview(Some(point(3.0, 2.0))).unwrap();
        assert!((*line.last().unwrap() - point(3.0, 2.0)).norm() < 1e-5);
        assert_eq!(s.len(), 3);
        assert_eq!(s.state().len(), 3);
    }

    #[test]
    fn preview_with_few_points_returns_knots() {
        let mut s = CurveSession::default();
        assert!(s.preview(None).unwrap().is_empty());
        assert_eq!(s.preview(Some(point(1.0, 2.0))).unwrap(), vec![point(1.0, 2.0)]);
    }

    #[test]
    fn dragging_a_smooth_handle_mirrors_it() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let knot = s.points()[1];
        let target = point(1.5, 1.5);
        let pair = s.drag_handle(1, HandleSide::Outgoing, target).unwrap();
        assert_eq!(s.spline_mode(), SplineMode::Hermite);
        assert_eq!(pair.incoming, pair.outgoing);
        let opposite = handle_position(&knot, &pair.incoming, HandleSide::Incoming);
        assert!((opposite - point(0.5, 0.5)).norm() < 1e-5);
    }

    #[test]
    fn corner_handles_are_independent() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        s.solve().unwrap();
        let before = s.state().tangents()[1];
        s.set_tangent_mode(1, TangentMode::Corner).unwrap();
        let pair = s
            .set_tangent(1, HandleSide::Incoming, Tangent::new(0.0, 4.0))
            .unwrap();
        assert_eq!(pair.incoming, Tangent::new(0.0, 4.0));
        assert!((pair.outgoing - before.outgoing).norm() < 1e-9);
    }

    #[test]
    fn edited_curve_passes_through_knots_and_resets() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        let natural = s.preview(None).unwrap();
        s.set_tangent(2, HandleSide::Outgoing, Tangent::new(5.0, 5.0)).unwrap();
        let edited = s.preview(None).unwrap();
        assert_ne!(natural, edited);
        s.reset_tangents().unwrap();
        assert_eq!(s.spline_mode(), SplineMode::Natural);
        let again = s.preview(None).unwrap();
        assert_eq!(again.len(), natural.len());
        for (a, b) in again.iter().zip(&natural) {
            assert!((a - b).norm() < 1e-5);
        }
    }

    #[test]
    fn load_tangents_checks_length() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            s.load_tangents(&[TangentPair::default()]),
            Err(FitError::ShapeMismatch { .. })
        ));
        let d = TangentPair::both(Tangent::new(1.0, 1.0));
        s.load_tangents(&[d, d]).unwrap();
        assert_eq!(s.spline_mode(), SplineMode::Hermite);
    }

    #[test]
    fn cycling_param_wraps() {
        let mut s = CurveSession::default();
        assert_eq!(s.cycle_param(), ParamKind::Centripetal);
        s.set_param(ParamKind::Foley);
        assert_eq!(s.cycle_param(), ParamKind::Chord);
    }

    #[test]
    fn replace_points_resets_state() {
        let mut s = session_with(&[(0.0, 0.0), (1.0, 1.0)]);
        s.set_tangent(0, HandleSide::Outgoing, Tangent::new(1.0, 0.0)).unwrap();
        s.replace_points(vec![point(5.0, 5.0), point(6.0, 5.0), point(7.0, 6.0)]);
        assert_eq!(s.spline_mode(), SplineMode::Natural);
        assert_eq!(s.state().len(), 3);
        assert_eq!(s.tangent_modes().len(), 3);
    }
}
