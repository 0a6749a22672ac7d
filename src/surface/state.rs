use kurbo::{Affine, BezPath, PathEl, Point, Shape as _, Vec2};

use crate::{
    foundation::core::Color,
    surface::context::{CompositeOperation, Shadow},
};

/// Style and transform state covered by `save`/`restore`.
#[derive(Clone, Debug)]
pub(crate) struct DrawState<X: Clone> {
    pub transform: Affine,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f64,
    pub global_alpha: f64,
    pub composite: CompositeOperation,
    pub shadow: Option<Shadow>,
    /// Backend-specific extra state (the CPU surface keeps its clip paths here).
    pub extra: X,
}

impl<X: Clone + Default> Default for DrawState<X> {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            global_alpha: 1.0,
            composite: CompositeOperation::SourceOver,
            shadow: None,
            extra: X::default(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StateStack<X: Clone> {
    pub current: DrawState<X>,
    saved: Vec<DrawState<X>>,
}

impl<X: Clone + Default> StateStack<X> {
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.current.transform *= Affine::translate(Vec2::new(x, y));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.current.transform *= Affine::rotate(angle);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform *= Affine::scale_non_uniform(sx, sy);
    }
}

/// Current path, stored in device space.
#[derive(Debug, Default)]
pub(crate) struct PathBuilder {
    path: BezPath,
    subpath_start: Option<Point>,
    open: bool,
}

impl PathBuilder {
    pub fn begin(&mut self) {
        self.path = BezPath::new();
        self.subpath_start = None;
        self.open = false;
    }

    pub fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
        self.subpath_start = Some(p);
        self.open = true;
    }

    /// Without a current point this starts a subpath, matching canvas behavior.
    pub fn line_to(&mut self, p: Point) {
        match (self.open, self.subpath_start) {
            (true, _) => self.path.line_to(p),
            (false, Some(start)) => {
                self.path.move_to(start);
                self.path.line_to(p);
                self.open = true;
            }
            (false, None) => self.move_to(p),
        }
    }

    pub fn close(&mut self) {
        if self.open {
            self.path.close_path();
            self.open = false;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// The path with every subpath closed, as filling and hit-testing see it.
    pub fn closed(&self) -> BezPath {
        let mut out = BezPath::new();
        let mut open = false;
        for el in self.path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if open {
                        out.close_path();
                    }
                    out.move_to(p);
                    open = true;
                }
                PathEl::ClosePath => {
                    if open {
                        out.close_path();
                    }
                    open = false;
                }
                other => out.push(other),
            }
        }
        if open {
            out.close_path();
        }
        out
    }

    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty() && self.closed().winding(p) != 0
    }
}
