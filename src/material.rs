use crate::{
    camera::Float,
    intersection::HitRecord,
    ray::Ray,
    vec3::{Color, Vec3, Vec3Ext},
};
use enum_dispatch::enum_dispatch;
use rand::{Rng, RngCore};

#[enum_dispatch]
pub trait Scatter {
    /// Returns the attenuation and the bounced ray, or `None` if the ray is absorbed
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<(Color, Ray)>;
}

#[enum_dispatch(Scatter)]
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Lambertian,
    Metal,
    Dielectric,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lambertian {
    pub albedo: Color,
}

/// Reflected fraction per channel can't exceed 1 or drop below 0
fn clamp_albedo(albedo: Color) -> Color {
    albedo.map(|c| c.clamp(0.0, 1.0))
}

impl Lambertian {
    /// `albedo` channels are clamped to [0, 1]
    pub fn new(albedo: Color) -> Self {
        Lambertian {
            albedo: clamp_albedo(albedo),
        }
    }

    pub fn new_rgb(r: Float, g: Float, b: Float) -> Self {
        Lambertian::new(Color::new(r, g, b))
    }
}

impl Scatter for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        let mut scatter_dir = hit.normal + Vec3::random_unit(rng);
        // The random vector can land almost exactly opposite the normal
        if scatter_dir.near_zero() {
            scatter_dir = hit.normal;
        }
        Some((self.albedo, Ray::new(hit.point, scatter_dir)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metal {
    pub albedo: Color,
    /// 0 is a perfect mirror, 1 is very rough
    pub fuzz: Float,
}

impl Metal {
    /// `albedo` channels and `fuzz` are clamped to [0, 1]
    pub fn new(albedo: Color, fuzz: Float) -> Self {
        Metal {
            albedo: clamp_albedo(albedo),
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        let reflected = ray_in.direction.reflect(&hit.normal).normalize();
        let direction = reflected + Vec3::random_unit(rng) * self.fuzz;
        // Fuzz can push a grazing reflection below the surface. Those rays are absorbed.
        if direction.dot(&hit.normal) > 0.0 {
            Some((self.albedo, Ray::new(hit.point, direction)))
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// refractive index over the refractive index of the enclosing media
    pub refractive_index: Float,
}

impl Dielectric {
    pub fn new(refractive_index: Float) -> Self {
        Dielectric { refractive_index }
    }
}

impl Scatter for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        let ri = if hit.is_front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction.dot(&hit.normal)).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || reflectance(cos_theta, ri) > rng.gen::<Float>() {
            unit_direction.reflect(&hit.normal)
        } else {
            unit_direction.refract(&hit.normal, ri)
        };
        Some((Color::new(1.0, 1.0, 1.0), Ray::new(hit.point, direction)))
    }
}

/// Returns Schlick's approximation for reflectance at a given angle.
pub fn reflectance(cosine: Float, refractive_index: Float) -> Float {
    let r0 = (1.0 - refractive_index) / (1.0 + refractive_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
