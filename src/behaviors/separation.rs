use bevy::prelude::*;

use crate::SMALL_THRESHOLD;

/// Push two overlapping movers apart until they are exactly
/// `contact_distance` apart. `a_to_b` is the vector from `a` to `b`
/// measured before the correction. Both positions move by half the
/// overlap, in opposite directions along the collision axis. Movers on
/// the exact same point have no axis and are left alone.
pub fn separate_hard(a: &mut Vec3, b: &mut Vec3, a_to_b: Vec3, contact_distance: f32) {
    let distance = a_to_b.length();
    if distance < SMALL_THRESHOLD {
        return;
    }
    let axis = a_to_b / distance;
    let offset = (contact_distance - distance) / 2.0;
    *a -= axis * offset;
    *b += axis * offset;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separates_to_contact() {
        let mut a = Vec3::ZERO;
        let mut b = Vec3::new(0.1, 0.0, 0.0);
        let a_to_b = b - a;
        separate_hard(&mut a, &mut b, a_to_b, 0.5);
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
        assert!(a.abs_diff_eq(Vec3::new(-0.2, 0.0, 0.0), 1e-6));
        assert!(b.abs_diff_eq(Vec3::new(0.3, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_displacement_is_symmetric() {
        let start_a = Vec3::new(1.0, 1.0, 0.0);
        let start_b = Vec3::new(1.2, 1.1, 0.0);
        let (mut a, mut b) = (start_a, start_b);
        separate_hard(&mut a, &mut b, start_b - start_a, 0.5);

        let moved_a = a - start_a;
        let moved_b = b - start_b;
        assert!((moved_a + moved_b).abs_diff_eq(Vec3::ZERO, 1e-6));
        // Displacement is along the collision axis
        let axis = (start_b - start_a).normalize();
        assert!(moved_b.normalize().abs_diff_eq(axis, 1e-5));
        assert!((a.distance(b) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_movers_are_left_alone() {
        let mut a = Vec3::new(2.0, 2.0, 0.0);
        let mut b = a;
        separate_hard(&mut a, &mut b, Vec3::ZERO, 0.5);
        assert_eq!(a, Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(b, Vec3::new(2.0, 2.0, 0.0));
    }
}
