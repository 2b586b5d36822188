//! Dependency arrow routing.
//!
//! Paths are kept as structured segments so they can be serialized to SVG
//! path data or flattened to polylines for immediate-mode painters.

use std::f32::consts::FRAC_PI_2;
use std::fmt::Write;

use super::{num, Rect};

/// Horizontal step used to walk the arrow start left of the bar midpoint.
const START_STEP: f32 = 10.0;
/// Gap between the arrow tip and the dependent bar.
const END_GAP: f32 = 13.0;
const HEAD_SIZE: f32 = 5.0;
const ARC_SAMPLES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f32, f32),
    /// Relative move, starting a new subpath.
    MoveBy(f32, f32),
    LineTo(f32, f32),
    LineBy(f32, f32),
    HorizontalTo(f32),
    VerticalTo(f32),
    VerticalBy(f32),
    /// Quarter-circle arc ending at the current point plus `(dx, dy)`.
    Arc {
        radius: f32,
        sweep: bool,
        dx: f32,
        dy: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Single stem and corner into a dependent further right.
    Forward,
    /// Detour around the source for a dependent starting at or before it.
    Backward,
}

/// Fixed dimensions the router works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowParams {
    pub header_height: f32,
    pub bar_height: f32,
    pub padding: f32,
    pub curve: f32,
    /// A dependent starting before `from.x + backward_threshold` is routed
    /// backward.
    pub backward_threshold: f32,
}

/// One end of an arrow: the bar rectangle and its row slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub rect: Rect,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGeometry {
    pub from_id: String,
    pub to_id: String,
    pub route: Route,
    pub clockwise: bool,
    pub segments: Vec<PathSegment>,
}

impl ArrowGeometry {
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        from: Endpoint,
        to: Endpoint,
        params: &ArrowParams,
    ) -> Self {
        let (route, clockwise, segments) = route(from, to, params);
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            route,
            clockwise,
            segments,
        }
    }

    /// Re-route after either bar moved.
    pub fn update(&mut self, from: Endpoint, to: Endpoint, params: &ArrowParams) {
        let (route, clockwise, segments) = route(from, to, params);
        self.route = route;
        self.clockwise = clockwise;
        self.segments = segments;
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from_id == id || self.to_id == id
    }

    /// SVG path data.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for seg in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match *seg {
                PathSegment::MoveTo(x, y) => write!(d, "M {} {}", num(x), num(y)),
                PathSegment::MoveBy(x, y) => write!(d, "m {} {}", num(x), num(y)),
                PathSegment::LineTo(x, y) => write!(d, "L {} {}", num(x), num(y)),
                PathSegment::LineBy(x, y) => write!(d, "l {} {}", num(x), num(y)),
                PathSegment::HorizontalTo(x) => write!(d, "H {}", num(x)),
                PathSegment::VerticalTo(y) => write!(d, "V {}", num(y)),
                PathSegment::VerticalBy(y) => write!(d, "v {}", num(y)),
                PathSegment::Arc {
                    radius,
                    sweep,
                    dx,
                    dy,
                } => write!(
                    d,
                    "a {r} {r} 0 0 {} {} {}",
                    u8::from(sweep),
                    num(dx),
                    num(dy),
                    r = num(radius)
                ),
            };
        }
        d
    }

    /// Flatten into polylines, one per subpath. Arcs are sampled.
    pub fn polylines(&self) -> Vec<Vec<[f32; 2]>> {
        let mut lines: Vec<Vec<[f32; 2]>> = Vec::new();
        let mut pen = [0.0_f32, 0.0_f32];
        for seg in &self.segments {
            let next = match *seg {
                PathSegment::MoveTo(x, y) => {
                    pen = [x, y];
                    lines.push(vec![pen]);
                    continue;
                }
                PathSegment::MoveBy(x, y) => {
                    pen = [pen[0] + x, pen[1] + y];
                    lines.push(vec![pen]);
                    continue;
                }
                PathSegment::LineTo(x, y) => [x, y],
                PathSegment::LineBy(x, y) => [pen[0] + x, pen[1] + y],
                PathSegment::HorizontalTo(x) => [x, pen[1]],
                PathSegment::VerticalTo(y) => [pen[0], y],
                PathSegment::VerticalBy(y) => [pen[0], pen[1] + y],
                PathSegment::Arc { sweep, dx, dy, .. } => {
                    let end = [pen[0] + dx, pen[1] + dy];
                    if let Some(line) = lines.last_mut() {
                        line.extend(sample_quarter_arc(pen, end, sweep));
                    }
                    pen = end;
                    continue;
                }
            };
            if let Some(line) = lines.last_mut() {
                line.push(next);
            }
            pen = next;
        }
        lines
    }
}

fn route(from: Endpoint, to: Endpoint, params: &ArrowParams) -> (Route, bool, Vec<PathSegment>) {
    let padding = params.padding;
    let row = params.padding + params.bar_height;

    let mut start_x = from.rect.mid_x();
    while to.rect.x < start_x + padding && start_x > from.rect.x + padding {
        start_x -= START_STEP;
    }
    start_x -= START_STEP;

    let start_y =
        params.header_height + params.bar_height + row * from.index as f32 + padding / 2.0;
    let end_x = to.rect.x - END_GAP;
    let end_y =
        params.header_height + params.bar_height / 2.0 + row * to.index as f32 + padding / 2.0;

    let from_is_below = from.index > to.index;
    let clockwise = from_is_below;
    let mut curve = params.curve.max(0.0);
    let signed = |c: f32| if from_is_below { -c } else { c };

    let mut segments = vec![PathSegment::MoveTo(start_x, start_y)];
    let route = if to.rect.x <= from.rect.x + params.backward_threshold {
        let mut down = padding / 2.0 - curve;
        if down < 0.0 {
            down = 0.0;
            curve = padding / 2.0;
        }
        let curve_y = signed(curve);
        let down_to = to.rect.mid_y() - curve_y;
        let left = to.rect.x - padding;
        segments.extend([
            PathSegment::VerticalBy(down),
            PathSegment::Arc {
                radius: curve,
                sweep: true,
                dx: -curve,
                dy: curve,
            },
            PathSegment::HorizontalTo(left),
            PathSegment::Arc {
                radius: curve,
                sweep: clockwise,
                dx: -curve,
                dy: curve_y,
            },
            PathSegment::VerticalTo(down_to),
            PathSegment::Arc {
                radius: curve,
                sweep: clockwise,
                dx: curve,
                dy: curve_y,
            },
            PathSegment::LineTo(end_x, end_y),
        ]);
        Route::Backward
    } else {
        if end_x < start_x + curve {
            curve = (end_x - start_x).max(0.0);
        }
        let curve_y = signed(curve);
        let offset = end_y - curve_y;
        segments.extend([
            PathSegment::VerticalTo(offset),
            PathSegment::Arc {
                radius: curve,
                sweep: clockwise,
                dx: curve,
                dy: curve_y,
            },
            PathSegment::LineTo(end_x, end_y),
        ]);
        Route::Forward
    };
    segments.extend([
        PathSegment::MoveBy(-HEAD_SIZE, -HEAD_SIZE),
        PathSegment::LineBy(HEAD_SIZE, HEAD_SIZE),
        PathSegment::LineBy(-HEAD_SIZE, HEAD_SIZE),
    ]);
    (route, clockwise, segments)
}

/// Points along the quarter circle from `a` to `b`, excluding `a`.
///
/// The center is whichever corner of the bounding square makes the turn go
/// in the `sweep` direction (positive angles in y-down coordinates).
fn sample_quarter_arc(a: [f32; 2], b: [f32; 2], sweep: bool) -> Vec<[f32; 2]> {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    if dx == 0.0 || dy == 0.0 || (dx.abs() - dy.abs()).abs() > 0.01 {
        return vec![b];
    }
    let radius = dx.abs();
    let candidates = [[b[0], a[1]], [a[0], b[1]]];
    let center = candidates
        .into_iter()
        .find(|c| {
            let start = (a[1] - c[1]).atan2(a[0] - c[0]);
            let end = (b[1] - c[1]).atan2(b[0] - c[0]);
            (normalize_angle(end - start) > 0.0) == sweep
        })
        .unwrap_or(candidates[0]);
    let start = (a[1] - center[1]).atan2(a[0] - center[0]);
    let delta = if sweep { FRAC_PI_2 } else { -FRAC_PI_2 };
    (1..=ARC_SAMPLES)
        .map(|i| {
            let t = start + delta * i as f32 / ARC_SAMPLES as f32;
            [center[0] + radius * t.cos(), center[1] + radius * t.sin()]
        })
        .collect()
}

fn normalize_angle(mut a: f32) -> f32 {
    use std::f32::consts::PI;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}
