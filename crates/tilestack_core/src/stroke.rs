//! Line rasterization for paint strokes
//!
//! Pointer samples arrive sparsely during a fast drag, so the cells between
//! two consecutive samples are filled in with an integer line.

use serde::{Deserialize, Serialize};

/// How consecutive cells of an interpolated stroke may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrokeConnectivity {
    /// Bresenham stepping: one cell per step along the major axis,
    /// diagonal neighbours allowed
    #[default]
    EightWay,
    /// Step along one axis at a time, so cells always share an edge
    FourWay,
}

/// All cells on the line from `from` to `to`, both ends included, in drawing
/// order and without repeats.
///
/// One entry is produced per cell, so callers painting into a bounded grid
/// should bring a far-away `from` closer first with [`clip_start`].
pub fn line_cells(
    from: (i32, i32),
    to: (i32, i32),
    connectivity: StrokeConnectivity,
) -> Vec<(i32, i32)> {
    match connectivity {
        StrokeConnectivity::EightWay => eight_way_line(from, to),
        StrokeConnectivity::FourWay => four_way_line(from, to),
    }
}

/// Move `from` along the segment toward `to` until it lies at most one cell
/// outside a `width x height` grid. `to` must be inside the grid. Points
/// already that close are returned unchanged.
pub fn clip_start(from: (i32, i32), to: (i32, i32), width: u32, height: u32) -> (i32, i32) {
    let (fx, fy) = (f64::from(from.0), f64::from(from.1));
    let (dx, dy) = (f64::from(to.0) - fx, f64::from(to.1) - fy);
    let (max_x, max_y) = (f64::from(width), f64::from(height));

    // Liang-Barsky entry parameter against the grid plus a one-cell margin
    let mut t: f64 = 0.0;
    for (p, q) in [(-dx, fx + 1.0), (dx, max_x - fx), (-dy, fy + 1.0), (dy, max_y - fy)] {
        if p < 0.0 {
            t = t.max(q / p);
        }
    }
    let t = t.min(1.0);

    let x = (fx + t * dx).round().clamp(-1.0, max_x);
    let y = (fy + t * dy).round().clamp(-1.0, max_y);
    (x as i32, y as i32)
}

/// Integer midpoint line that takes one step along the longer axis per
/// cell, stepping the shorter axis too when the error crosses half a cell
fn eight_way_line((x0, y0): (i32, i32), (x1, y1): (i32, i32)) -> Vec<(i32, i32)> {
    let (dx, dy) = (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0));
    let (sx, sy) = (dx.signum(), dy.signum());
    let x_major = dx.abs() >= dy.abs();
    let (major, minor) = if x_major {
        (dx.abs(), dy.abs())
    } else {
        (dy.abs(), dx.abs())
    };

    let mut points = Vec::with_capacity(major as usize + 1);
    points.push((x0, y0));
    let (mut x, mut y) = (i64::from(x0), i64::from(y0));
    let mut err = 0;

    for _ in 0..major {
        err += 2 * minor;
        let side_step = err > major;
        if side_step {
            err -= 2 * major;
        }
        if x_major {
            x += sx;
            if side_step {
                y += sy;
            }
        } else {
            y += sy;
            if side_step {
                x += sx;
            }
        }
        // Both stay between the endpoints, so they fit back into i32
        points.push((x as i32, y as i32));
    }

    points
}

/// Midpoint stepping that never moves diagonally. Visits `1 + |dx| + |dy|`
/// cells; a tie steps along y first.
fn four_way_line((x0, y0): (i32, i32), (x1, y1): (i32, i32)) -> Vec<(i32, i32)> {
    let (dx, dy) = (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0));
    let (sx, sy) = (dx.signum(), dy.signum());
    let (dx, dy) = (dx.abs(), dy.abs());
    let mut error = dx - dy;

    let steps = 1 + dx + dy;
    let mut points = Vec::with_capacity(steps as usize);
    let (mut x, mut y) = (i64::from(x0), i64::from(y0));

    for _ in 0..steps {
        points.push((x as i32, y as i32));
        if error > 0 {
            x += sx;
            error -= 2 * dy;
        } else {
            y += sy;
            error += 2 * dx;
        }
    }

    points
}
