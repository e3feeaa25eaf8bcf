use crate::{
    camera::Float,
    vec3::{Point3, Vec3},
};

/// `direction` is not normalized. Anything that needs a unit direction
/// normalizes it itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }
}
