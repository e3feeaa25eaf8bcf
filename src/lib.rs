pub mod camera;
pub mod hittable;
pub mod intersection;
pub mod interval;
pub mod material;
pub mod output;
pub mod ppm;
pub mod ray;
pub mod scenes;
pub mod vec3;
pub mod window;
