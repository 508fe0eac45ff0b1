//! Reflection and refraction directions.

use whitted_math::Vec3;

/// Reflect `direction` about `normal`.
///
/// Both inputs are expected to be unit length; the result then is too.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    let cos_theta = -normal.dot(direction);
    direction + 2.0 * cos_theta * normal
}

/// Refract `direction` through a surface with relative index `eta`
/// (incident over transmitted) using Snell's law.
///
/// Total internal reflection is not handled: when the radicand goes
/// negative the result has NaN components.
#[inline]
pub fn refract(direction: Vec3, normal: Vec3, eta: f64) -> Vec3 {
    let cos_theta_1 = -normal.dot(direction);
    let cos_theta_2 = (1.0 - eta * eta * (1.0 - cos_theta_1 * cos_theta_1)).sqrt();
    eta * direction + (eta * cos_theta_1 - cos_theta_2) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let len_sq = v.length_squared();
            if len_sq > 1e-6 && len_sq <= 1.0 {
                return v / len_sq.sqrt();
            }
        }
    }

    #[test]
    fn test_reflect_off_floor() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(incoming, Vec3::Y);
        assert!((reflected - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-12);
    }

    #[test]
    fn test_reflect_is_involution() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let d = random_unit(&mut rng);
            let n = random_unit(&mut rng);
            let twice = reflect(reflect(d, n), n);
            assert!((twice - d).length() < 1e-9);
            assert!((reflect(d, n).length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_refract_with_matching_index_is_straight() {
        let d = Vec3::new(0.3, -1.0, 0.2).normalize();
        let refracted = refract(d, Vec3::Y, 1.0);
        assert!((refracted - d).length() < 1e-12);
    }

    #[test]
    fn test_refract_follows_snell() {
        let eta = 1.0 / 1.5;
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::Y;
        let t = refract(d, n, eta);

        assert!((t.length() - 1.0).abs() < 1e-12);
        // Bends toward the normal entering the denser medium
        let sin_in = d.cross(-n).length();
        let sin_out = t.cross(-n).length();
        assert!((sin_in * eta - sin_out).abs() < 1e-12);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_refract_head_on() {
        let t = refract(Vec3::NEG_Y, Vec3::Y, 1.0 / 1.33);
        assert!((t - Vec3::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_total_internal_reflection_yields_nan() {
        // Grazing exit from glass: the radicand is negative
        let d = Vec3::new(1.0, -0.1, 0.0).normalize();
        let t = refract(d, Vec3::Y, 1.5);
        assert!(t.is_nan());
    }
}
