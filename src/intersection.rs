use crate::{
    camera::Float,
    material::Material,
    ray::Ray,
    vec3::{Point3, Vec3},
};

/// Result of a successful ray/surface query. Borrows the material from the
/// shape that produced it, so it cannot outlive the scene.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    pub point: Point3,
    /// Unit length, always facing against the incoming ray
    pub normal: Vec3,
    pub material: &'a Material,
    pub t: Float,
    pub is_front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// `outward_normal` must be unit length. The stored normal is flipped when
    /// the ray comes from inside the surface.
    pub fn new(
        ray: &Ray,
        point: Point3,
        outward_normal: Vec3,
        t: Float,
        material: &'a Material,
    ) -> Self {
        let is_front_face = Self::is_front_face(ray, &outward_normal);
        let normal = if is_front_face {
            outward_normal
        } else {
            -outward_normal
        };
        HitRecord {
            point,
            normal,
            material,
            t,
            is_front_face,
        }
    }

    pub fn is_front_face(ray: &Ray, outward_normal: &Vec3) -> bool {
        ray.direction.dot(outward_normal) < 0.0
    }
}
