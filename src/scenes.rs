use crate::{
    camera::{CameraConfig, Float, SkyGradient},
    hittable::{Shape, Sphere, Triangle, World},
    material::{Dielectric, Lambertian, Material, Metal},
    vec3::{Color, Point3, Vec3},
};
use std::sync::Arc;

pub const ASPECT_RATIO: Float = 16.0 / 9.0;

/// Glass with an air bubble, diffuse, fuzzy and polished metal balls on a huge ground sphere
pub fn showcase() -> World {
    let ground: Arc<Material> = Arc::new(Lambertian::new_rgb(0.8, 0.8, 0.0).into());
    let center: Arc<Material> = Arc::new(Lambertian::new_rgb(0.1, 0.2, 0.5).into());
    let glass: Arc<Material> = Arc::new(Dielectric::new(1.5).into());
    let bubble: Arc<Material> = Arc::new(Dielectric::new(1.0 / 1.5).into());
    let brushed: Arc<Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.9).into());
    let polished: Arc<Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.01).into());

    let mut world = World::new();
    world.add(Sphere::new(Point3::new(0.0, -10000.55, -1.0), 10000.0, ground));
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.2), 0.5, center));
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass));
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.48, bubble));
    world.add(Sphere::new(Point3::new(-3.0, 0.0, -4.0), 0.5, polished));
    world.add(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, brushed));
    world
}

/// Looks down -z from the origin with a mint sky tilted off the y axis
pub fn showcase_camera() -> CameraConfig {
    CameraConfig {
        aspect_ratio: ASPECT_RATIO,
        image_width: 400,
        samples_per_pixel: 1,
        max_depth: 100,
        sky: SkyGradient::new(
            Vec3::new(1.0, 3.0, 0.0),
            Color::new(1.0, 1.0, 1.0),
            Color::new(0.5, 1.0, 0.7),
        ),
        ..Default::default()
    }
}

/// One diffuse ball resting on a ground sphere
pub fn two_spheres() -> World {
    let ground: Arc<Material> = Arc::new(Lambertian::new_rgb(0.5, 0.5, 0.5).into());
    let ball: Arc<Material> = Arc::new(Lambertian::new_rgb(0.5, 0.5, 0.5).into());

    let mut world = World::new();
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, ball));
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    world
}

pub fn two_spheres_camera() -> CameraConfig {
    CameraConfig {
        aspect_ratio: ASPECT_RATIO,
        image_width: 400,
        samples_per_pixel: 10,
        max_depth: 10,
        ..Default::default()
    }
}

/// A floor made of two triangles with a red triangle and a glass ball standing on it
pub fn triangles() -> World {
    let floor: Arc<Material> = Arc::new(Lambertian::new_rgb(0.2, 0.3, 0.1).into());
    let red: Arc<Material> = Arc::new(Lambertian::new_rgb(0.7, 0.1, 0.1).into());
    let mirror: Arc<Material> = Arc::new(Metal::new(Color::new(0.95, 0.95, 0.95), 0.0).into());
    let glass: Arc<Material> = Arc::new(Dielectric::new(1.5).into());

    let mut world: World = ground_plane(8.0, 8.0, -0.5, -2.0, floor)
        .into_iter()
        .map(Shape::from)
        .collect();
    world.add(Triangle::new(
        Point3::new(-1.2, -0.5, -2.2),
        Point3::new(0.2, -0.5, -2.6),
        Point3::new(-0.5, 0.8, -2.4),
        red,
    ));
    world.add(Triangle::new(
        Point3::new(0.6, -0.5, -3.0),
        Point3::new(2.0, -0.5, -2.6),
        Point3::new(1.3, 1.0, -3.0),
        mirror,
    ));
    world.add(Sphere::new(Point3::new(0.4, -0.1, -1.5), 0.4, glass));
    world
}

pub fn triangles_camera() -> CameraConfig {
    CameraConfig {
        aspect_ratio: ASPECT_RATIO,
        image_width: 400,
        samples_per_pixel: 10,
        max_depth: 20,
        vertical_fov: 60.0,
        lookfrom: Point3::new(0.0, 0.6, 1.0),
        lookat: Point3::new(0.0, 0.0, -2.0),
        ..Default::default()
    }
}

/// Two triangles forming a `width` by `length` rectangle at height `y`,
/// centered on `(0, y, z)` and facing up
pub fn ground_plane(
    width: Float,
    length: Float,
    y: Float,
    z: Float,
    material: Arc<Material>,
) -> [Triangle; 2] {
    let half_width = width / 2.0;
    let half_length = length / 2.0;

    let a = Point3::new(-half_width, y, z + half_length);
    let b = Point3::new(half_width, y, z + half_length);
    let c = Point3::new(half_width, y, z - half_length);
    let d = Point3::new(-half_width, y, z - half_length);

    [
        Triangle::new(a, b, c, material.clone()),
        Triangle::new(a, c, d, material),
    ]
}
