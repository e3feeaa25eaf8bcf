use crate::camera::Float;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// x: right
///
/// y: up
///
/// z: backward (cameras look down -z by default)
pub type Vec3 = nalgebra::Vector3<Float>;
pub type Point3 = Vec3;
pub type Color = Vec3;

pub trait Vec3Ext: Sized {
    fn near_zero(&self) -> bool;
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_range<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self;
    fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_on_hemisphere<R: Rng + ?Sized>(rng: &mut R, normal: &Vec3) -> Self;
    fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn reflect(&self, normal: &Vec3) -> Self;
    fn refract(&self, normal: &Vec3, eta_ratio: Float) -> Self;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        let e = 1e-8;
        self.x.abs() < e && self.y.abs() < e && self.z.abs() < e
    }

    /// Uniform in [0, 1) on every axis
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Vec3::new(rng.gen(), rng.gen(), rng.gen())
    }

    /// Uniform in [min, max) on every axis. Panics if `min >= max`.
    fn random_range<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self {
        let range = Uniform::new(min, max);
        Vec3::new(range.sample(rng), range.sample(rng), range.sample(rng))
    }

    /// Rejection sampling from the [-1, 1) cube. The ball fills ~52% of the cube,
    /// so this takes ~1.9 draws on average.
    fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let p = Self::random_range(rng, -1.0, 1.0);
            if p.norm_squared() <= 1.0 {
                return p;
            }
        }
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::random_in_unit_sphere(rng).normalize()
    }

    fn random_on_hemisphere<R: Rng + ?Sized>(rng: &mut R, normal: &Vec3) -> Self {
        let unit_vector = Self::random_unit(rng);
        if unit_vector.dot(normal) > 0.0 {
            unit_vector
        } else {
            -unit_vector
        }
    }

    /// Returns random point in the x-y unit disc (~1.27 draws on average)
    fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let range = Uniform::new(-1.0, 1.0);
        loop {
            let p = Vec3::new(range.sample(rng), range.sample(rng), 0.0);
            if p.norm_squared() <= 1.0 {
                return p;
            }
        }
    }

    fn reflect(&self, normal: &Vec3) -> Self {
        *self - *normal * (2.0 * self.dot(normal))
    }

    /// Snell's law for a unit incident vector. Does not check for total internal
    /// reflection: when `eta_ratio * sin_theta > 1` the result is meaningless.
    fn refract(&self, normal: &Vec3, eta_ratio: Float) -> Self {
        let cos_theta = (-self.dot(normal)).min(1.0);
        let r_out_perp = (*self + *normal * cos_theta) * eta_ratio;
        let r_out_parallel = *normal * -(1.0 - r_out_perp.norm_squared()).abs().sqrt();
        r_out_perp + r_out_parallel
    }
}
