//! Narrow-phase circle tests. Independent of the grid.

use super::body::Circle;

/// Returns true if two circles touch or overlap.
///
/// `dist <= a.radius + b.radius`, evaluated on squared distances.
#[inline]
#[must_use]
pub fn check_collision(a: Circle, b: Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) <= reach * reach
}

/// Penetration depth of two circles; zero or negative means apart.
#[inline]
#[must_use]
pub fn penetration(a: Circle, b: Circle) -> f32 {
    a.radius + b.radius - a.center.distance(b.center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_counts_as_collision() {
        let a = Circle::at(0.0, 0.0, 5.0);
        let b = Circle::at(10.0, 0.0, 5.0);
        assert!(check_collision(a, b));
        assert_eq!(penetration(a, b), 0.0);
    }

    #[test]
    fn test_apart() {
        let a = Circle::at(0.0, 0.0, 5.0);
        let b = Circle::at(10.0, 0.1, 4.0);
        assert!(!check_collision(a, b));
        assert!(penetration(a, b) < 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = Circle::at(3.0, -2.0, 1.5);
        let b = Circle::at(4.0, -1.0, 0.25);
        assert_eq!(check_collision(a, b), check_collision(b, a));
    }
}
