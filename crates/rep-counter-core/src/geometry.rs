use crate::Point;

/// Limb vectors shorter than this (pixels) carry no usable direction.
const MIN_LIMB_LENGTH: f64 = 1e-4;

/// Angle at `vertex` between the segments towards `a` and `c`, in degrees.
///
/// Returns `None` when either segment is degenerate. The cosine is clamped to
/// `[-1, 1]` before `acos`, so collinear points never produce NaN.
pub fn joint_angle(a: &Point, vertex: &Point, c: &Point) -> Option<f64> {
    let v1 = a - vertex;
    let v2 = c - vertex;
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 < MIN_LIMB_LENGTH || n2 < MIN_LIMB_LENGTH {
        return None;
    }
    let cos = (v1.dot(&v2) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_limb_is_180_degrees() {
        let angle = joint_angle(
            &Point::new(0.0, 0.0),
            &Point::new(50.0, 0.0),
            &Point::new(100.0, 0.0),
        )
        .expect("angle");
        assert_relative_eq!(angle, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn right_angle() {
        let angle = joint_angle(
            &Point::new(0.0, 0.0),
            &Point::new(50.0, 0.0),
            &Point::new(50.0, 50.0),
        )
        .expect("angle");
        assert_relative_eq!(angle, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_segment_has_no_angle() {
        let p = Point::new(10.0, 10.0);
        assert!(joint_angle(&p, &p, &Point::new(20.0, 10.0)).is_none());
    }
}
