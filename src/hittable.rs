use crate::{
    camera::Float,
    intersection::HitRecord,
    interval::Interval,
    material::Material,
    ray::Ray,
    vec3::{Point3, Vec3},
};
use enum_dispatch::enum_dispatch;
use std::sync::Arc;

/// Rays closer to parallel with a triangle's plane than this are treated as misses
const PARALLEL_EPSILON: Float = 1e-8;

#[enum_dispatch]
pub trait Hit {
    /// Nearest intersection with `t` strictly inside `interval`
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<HitRecord<'_>>;

    /// Unit geometric normal at a point on the surface, ignoring which side a ray came from
    fn outward_normal(&self, point: &Point3) -> Vec3;
}

#[enum_dispatch(Hit)]
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere,
    Triangle,
}

/// Every shape in the scene. No acceleration structure: each query tests every shape.
#[derive(Clone, Debug, Default)]
pub struct World {
    shapes: Vec<Shape>,
}

impl World {
    pub fn new() -> Self {
        World { shapes: Vec::new() }
    }

    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns nearest hit to the ray origin within the given range
    pub fn hit(&self, ray: &Ray, interval: Interval) -> Option<HitRecord<'_>> {
        // Anything farther than the closest hit so far can't win, so shrink the range as we go
        let mut nearest_hit = None;
        let mut closest_so_far = interval.max;

        for shape in &self.shapes {
            if let Some(hit) = shape.hit(ray, interval.with_max(closest_so_far)) {
                closest_so_far = hit.t;
                nearest_hit = Some(hit);
            }
        }

        nearest_hit
    }
}

impl FromIterator<Shape> for World {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        World {
            shapes: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Point3,
    pub radius: Float,
    pub material: Arc<Material>,
}

impl Sphere {
    /// Negative radii are clamped to 0
    pub fn new(center: Point3, radius: Float, material: Arc<Material>) -> Self {
        Sphere {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<HitRecord<'_>> {
        // Half-b form of the quadratic: b = -2h, so the 2s and 4 cancel out
        let oc = self.center - ray.origin;
        let a = ray.direction.norm_squared();
        let h = ray.direction.dot(&oc);
        let c = oc.norm_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let mut t = (h - sqrt_disc) / a; // near root
        if !interval.surrounds(t) {
            t = (h + sqrt_disc) / a; // far root
            if !interval.surrounds(t) {
                return None;
            }
        }

        let point = ray.at(t);
        let outward_normal = self.outward_normal(&point);
        Some(HitRecord::new(ray, point, outward_normal, t, &self.material))
    }

    fn outward_normal(&self, point: &Point3) -> Vec3 {
        (point - self.center) / self.radius
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub vertices: [Point3; 3],
    pub material: Arc<Material>,
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3, material: Arc<Material>) -> Self {
        Triangle {
            vertices: [a, b, c],
            material,
        }
    }

    /// Unit normal following the right-hand rule over `a -> b -> c`
    pub fn plane_normal(&self) -> Vec3 {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a)).normalize()
    }

    /// True when `point` (assumed on the plane) is strictly left of all three
    /// edges. Points exactly on an edge are outside.
    fn is_interior(&self, point: &Point3, normal: &Vec3) -> bool {
        let [a, b, c] = &self.vertices;
        [(a, b), (b, c), (c, a)]
            .into_iter()
            .all(|(start, end)| normal.dot(&(end - start).cross(&(point - start))) > 0.0)
    }
}

impl Hit for Triangle {
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<HitRecord<'_>> {
        let normal = self.plane_normal();
        let normal_dot_dir = normal.dot(&ray.direction);
        if normal_dot_dir.abs() < PARALLEL_EPSILON {
            return None;
        }

        // Plane: dot(normal, p) = dot(normal, a)
        let plane_offset = normal.dot(&self.vertices[0]);
        let t = (plane_offset - normal.dot(&ray.origin)) / normal_dot_dir;
        if !interval.surrounds(t) {
            return None;
        }

        let point = ray.at(t);
        if !self.is_interior(&point, &normal) {
            return None;
        }

        Some(HitRecord::new(ray, point, normal, t, &self.material))
    }

    fn outward_normal(&self, _point: &Point3) -> Vec3 {
        self.plane_normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn gray() -> Arc<Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)).into())
    }

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            gray(),
        )
    }

    /// Barycentric weights of `p` relative to the triangle's vertices
    fn barycentric(triangle: &Triangle, p: &Point3) -> (Float, Float, Float) {
        let [a, b, c] = &triangle.vertices;
        let v0 = b - a;
        let v1 = c - a;
        let v2 = p - a;
        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);
        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }

    #[test]
    fn test_negative_radius_clamps() {
        let sphere = Sphere::new(Vec3::zeros(), -2.0, gray());
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn test_sphere_hit_front() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let hit = sphere.hit(&ray, Interval::new(0.001, Float::INFINITY)).unwrap();
        assert_abs_diff_eq!(hit.t, 0.5, epsilon = 1e-12);
        assert!(hit.is_front_face);
        assert_abs_diff_eq!(hit.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::zeros(), 2.0, gray());
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let hit = sphere.hit(&ray, Interval::new(0.001, Float::INFINITY)).unwrap();
        assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1e-12);
        assert!(!hit.is_front_face);
        assert_abs_diff_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_miss_and_interval_bounds() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let miss = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&miss, Interval::UNIVERSE).is_none());

        // Both roots (0.5 and 1.5) are excluded when they sit exactly on the bounds
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, Interval::new(0.5, 1.5)).is_none());
        assert!(sphere.hit(&ray, Interval::new(0.0, 0.4)).is_none());
    }

    #[test]
    fn test_sphere_hit_point_lies_on_surface() {
        let mut rng = StdRng::seed_from_u64(11);
        let center = Vec3::new(0.3, -0.2, -2.0);
        let sphere = Sphere::new(center, 0.75, gray());
        let mut hits = 0;
        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(0.0..1.0),
            );
            let target = center
                + Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
            let ray = Ray::new(origin, (target - origin) * rng.gen_range(0.1..3.0));
            if let Some(hit) = sphere.hit(&ray, Interval::new(0.001, Float::INFINITY)) {
                hits += 1;
                let p = ray.at(hit.t);
                assert_abs_diff_eq!((p - center).norm(), 0.75, epsilon = 1e-9);
                assert_abs_diff_eq!(hit.normal.norm(), 1.0, epsilon = 1e-9);
                assert!(ray.direction.dot(&hit.normal) <= 0.0);
                assert_eq!(
                    hit.is_front_face,
                    ray.direction.dot(&sphere.outward_normal(&p)) < 0.0
                );
            }
        }
        assert!(hits > 100);
    }

    #[test]
    fn test_triangle_hit_center() {
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = triangle.hit(&ray, Interval::new(0.001, Float::INFINITY)).unwrap();
        assert_abs_diff_eq!(hit.t, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.point, Vec3::new(0.25, 0.25, 0.0), epsilon = 1e-12);
        assert!(hit.is_front_face);
        assert_abs_diff_eq!(hit.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_normal_opposes_ray_from_behind() {
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = triangle.hit(&ray, Interval::new(0.001, Float::INFINITY)).unwrap();
        assert!(!hit.is_front_face);
        assert_abs_diff_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_rejects_edges_and_outside() {
        let triangle = unit_triangle();
        let down = Vec3::new(0.0, 0.0, -1.0);
        let interval = Interval::new(0.001, Float::INFINITY);
        for origin in [
            Vec3::new(0.5, 0.0, 1.0), // on edge a-b
            Vec3::new(0.0, 0.5, 1.0), // on edge c-a
            Vec3::new(0.5, 0.5, 1.0), // on edge b-c
            Vec3::new(0.0, 0.0, 1.0), // on a vertex
            Vec3::new(0.8, 0.8, 1.0), // outside
        ] {
            assert!(triangle.hit(&Ray::new(origin, down), interval).is_none());
        }
    }

    #[test]
    fn test_triangle_rejects_parallel_and_out_of_range() {
        let triangle = unit_triangle();
        let parallel = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(triangle.hit(&parallel, Interval::UNIVERSE).is_none());

        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.hit(&ray, Interval::new(0.001, 1.0)).is_none());
        let behind = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(triangle.hit(&behind, Interval::new(0.001, Float::INFINITY)).is_none());
    }

    #[test]
    fn test_triangle_hits_are_interior() {
        let mut rng = StdRng::seed_from_u64(3);
        let triangle = Triangle::new(
            Vec3::new(-1.0, -0.5, -2.0),
            Vec3::new(1.5, -0.3, -2.5),
            Vec3::new(0.2, 1.2, -1.5),
            gray(),
        );
        let mut hits = 0;
        for _ in 0..2000 {
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.5..-0.5),
            );
            let ray = Ray::new(Vec3::zeros(), direction);
            if let Some(hit) = triangle.hit(&ray, Interval::new(0.001, Float::INFINITY)) {
                hits += 1;
                let (u, v, w) = barycentric(&triangle, &hit.point);
                for weight in [u, v, w] {
                    assert!((-1e-9..=1.0 + 1e-9).contains(&weight));
                }
                assert_abs_diff_eq!(u + v + w, 1.0, epsilon = 1e-9);
                assert!(ray.direction.dot(&hit.normal) < 0.0);
            }
        }
        assert!(hits > 20);
    }

    #[test]
    fn test_world_returns_nearest() {
        let mut world = World::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray()));
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, gray()));
        world.add(unit_triangle());
        assert_eq!(world.len(), 3);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let hit = world.hit(&ray, Interval::new(0.001, Float::INFINITY)).unwrap();
        assert_abs_diff_eq!(hit.t, 1.5, epsilon = 1e-12);

        let capped = world.hit(&ray, Interval::new(0.001, 1.0));
        assert!(capped.is_none());

        world.clear();
        assert!(world.is_empty());
        assert!(world.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_shape_dispatch() {
        let shape: Shape = Sphere::new(Vec3::zeros(), 2.0, gray()).into();
        assert_abs_diff_eq!(
            shape.outward_normal(&Vec3::new(0.0, 2.0, 0.0)),
            Vec3::new(0.0, 1.0, 0.0)
        );
        let shape: Shape = unit_triangle().into();
        assert_abs_diff_eq!(
            shape.outward_normal(&Vec3::new(0.2, 0.2, 0.0)),
            Vec3::new(0.0, 0.0, 1.0)
        );
    }
}
