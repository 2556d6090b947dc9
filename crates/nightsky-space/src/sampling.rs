//! Random sampling inside and on the unit sphere.

use glam::Vec3;
use rand::Rng;

/// Random unit vector, uniform over the sphere's surface.
///
/// The polar angle is `acos(2v - 1)` rather than `v * PI`; drawing it
/// uniformly would bunch directions at the poles.
pub fn unit_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Random point uniformly distributed by volume inside a sphere of `radius`
/// centered at the origin.
///
/// The cube root on the radial draw compensates for volume growing as r³.
pub fn sample_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let direction = unit_direction(rng);
    let r = radius * rng.random::<f32>().cbrt();
    direction * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SAMPLES: usize = 20_000;

    fn samples(seed: u64, radius: f32) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..SAMPLES).map(|_| sample_in_sphere(&mut rng, radius)).collect()
    }

    fn fraction(points: &[Vec3], pred: impl Fn(&Vec3) -> bool) -> f32 {
        points.iter().filter(|p| pred(p)).count() as f32 / points.len() as f32
    }

    #[test]
    fn test_samples_stay_inside_radius() {
        for radius in [0.5_f32, 50.0, 300.0] {
            for (i, p) in samples(1, radius).iter().enumerate() {
                assert!(
                    p.length() <= radius * (1.0 + 1e-5),
                    "Sample {i} at distance {} exceeds radius {radius}",
                    p.length()
                );
            }
        }
    }

    #[test]
    fn test_unit_directions_have_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            let d = unit_direction(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_radial_distribution_follows_cubic_cdf() {
        let radius = 200.0;
        let points = samples(42, radius);
        for x in [0.25_f32, 0.5, 0.75, 0.9] {
            let observed = fraction(&points, |p| p.length() <= x * radius);
            let expected = x.powi(3);
            assert!(
                (observed - expected).abs() < 0.02,
                "P(d <= {x}r) = {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_samples_do_not_cluster_at_center() {
        // Uniform-in-radius sampling would put half the points inside r/2.
        let points = samples(7, 1.0);
        let inner = fraction(&points, |p| p.length() < 0.5);
        assert!(inner < 0.15, "{inner} of samples inside half radius");
    }

    #[test]
    fn test_azimuth_is_uniform() {
        let points = samples(11, 10.0);
        let mut bins = [0usize; 8];
        for p in &points {
            let theta = p.y.atan2(p.x).rem_euclid(std::f32::consts::TAU);
            let bin = ((theta / std::f32::consts::TAU) * 8.0) as usize;
            bins[bin.min(7)] += 1;
        }
        for (i, &count) in bins.iter().enumerate() {
            let share = count as f32 / SAMPLES as f32;
            assert!(
                (share - 0.125).abs() < 0.015,
                "Azimuth bin {i} holds {share}, expected 0.125"
            );
        }
    }

    #[test]
    fn test_polar_cosine_is_uniform() {
        let points = samples(13, 10.0);
        let mut bins = [0usize; 4];
        for p in &points {
            let cos_phi = p.z / p.length();
            let bin = (((cos_phi + 1.0) / 2.0) * 4.0) as usize;
            bins[bin.min(3)] += 1;
        }
        for (i, &count) in bins.iter().enumerate() {
            let share = count as f32 / SAMPLES as f32;
            assert!(
                (share - 0.25).abs() < 0.02,
                "cos(phi) bin {i} holds {share}, expected 0.25"
            );
        }
    }

    #[test]
    fn test_same_seed_produces_same_points() {
        let a = samples(99, 5.0);
        let b = samples(99, 5.0);
        assert_eq!(a, b);
    }
}
