use alloc::vec::Vec;

use crate::coord::Point;

/// Bresenham-style line between two real-valued points, advanced at a
/// fractional `step` along the major axis. An error accumulator carries the
/// minor-axis slope; once it passes 0.5 the minor axis advances and the
/// accumulator drops back by one. Both endpoints appear in the output.
pub fn line(start: Point, end: Point, step: f64) -> Vec<Point> {
    let mut points = alloc::vec![start];
    let delta = end - start;
    if delta.x == 0.0 && delta.y == 0.0 {
        return points;
    }
    let step = if step > 0.0 { step } else { 1.0 };

    let (major, minor, swapped) = if libm::fabs(delta.x) >= libm::fabs(delta.y) {
        (delta.x, delta.y, false)
    } else {
        (delta.y, delta.x, true)
    };
    let slope = libm::fabs(minor / major);
    let major_sign = if major > 0.0 { step } else { -step };
    let minor_sign = if minor > 0.0 { step } else { -step };

    let mut a = 0.0f64;
    let mut b = 0.0f64;
    let mut error = 0.0f64;
    let span = libm::fabs(major);
    let steps = libm::floor(span / step) as u64;
    for _ in 0..steps {
        a += major_sign;
        error += slope * step;
        if error >= 0.5 {
            b += minor_sign;
            error -= 1.0;
        }
        let point = if swapped {
            Point::new(start.x + b, start.y + a)
        } else {
            Point::new(start.x + a, start.y + b)
        };
        points.push(point);
    }

    // Floating steps rarely land exactly on the target; pin the endpoint.
    match points.last_mut() {
        Some(last) if nearly(*last, end) => *last = end,
        _ => points.push(end),
    }
    points
}

fn nearly(a: Point, b: Point) -> bool {
    libm::fabs(a.x - b.x) < 1e-9 && libm::fabs(a.y - b.y) < 1e-9
}
