use crate::{
    hittable::World,
    interval::Interval,
    material::Scatter,
    ray::Ray,
    vec3::{Color, Point3, Vec3},
};
use itertools::iproduct;
use rand::{Rng, RngCore};

pub type Float = f64;

/// Lower bound on hit distance for every traced ray. Keeps bounced rays from
/// re-hitting the surface they start on due to rounding (shadow acne).
pub const SHADOW_ACNE_EPSILON: Float = 0.001;

/// Quantization range for final pixel intensities. Stops at 0.999 so 1.0 doesn't round up to 256.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Background for rays that escape the scene: a blend from `horizon` to
/// `zenith` keyed on how closely the ray lines up with `up`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyGradient {
    up: Vec3,
    horizon: Color,
    zenith: Color,
}

impl SkyGradient {
    /// `up` is normalized here, so any nonzero direction works
    pub fn new(up: Vec3, horizon: Color, zenith: Color) -> Self {
        SkyGradient {
            up: up.normalize(),
            horizon,
            zenith,
        }
    }

    /// Unit length
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn horizon(&self) -> Color {
        self.horizon
    }

    pub fn zenith(&self) -> Color {
        self.zenith
    }

    pub fn color(&self, direction: &Vec3) -> Color {
        let a = 0.5 * (direction.normalize().dot(&self.up) + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }

    /// Brightest channel the gradient can produce
    pub fn max_channel(&self) -> Float {
        self.horizon.max().max(self.zenith.max())
    }
}

impl Default for SkyGradient {
    fn default() -> Self {
        SkyGradient {
            up: Vec3::new(0.0, 1.0, 0.0),
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

/// Everything the driver chooses about a render. [`Camera::new`] derives the rest.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Image width over height
    pub aspect_ratio: Float,
    pub image_width: usize,
    /// Samples averaged per pixel in batch renders
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per path
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vertical_fov: Float,
    pub lookfrom: Point3,
    pub lookat: Point3,
    /// Camera-relative up direction
    pub vup: Vec3,
    pub sky: SkyGradient,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vertical_fov: 90.0,
            lookfrom: Point3::new(0.0, 0.0, 0.0),
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            sky: SkyGradient::default(),
        }
    }
}

/// Receives finished pixels from [`Camera::render`]
pub trait PixelSink {
    fn start(&mut self, _width: usize, _height: usize) {}

    fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]);

    /// Called each time another whole percent of the image is done
    fn progress(&mut self, _percent: u32) {}
}

/// Take a color value in linear space and convert it to gamma 2
pub fn linear_to_gamma(linear_color_value: Float) -> Float {
    if linear_color_value > 0.0 {
        linear_color_value.sqrt()
    } else {
        0.0
    }
}

/// Gamma-corrects a linear color and quantizes it to bytes. Non-finite and
/// out of range channels are clamped.
pub fn to_rgb8(color: &Color) -> [u8; 3] {
    let quantize = |c: Float| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// The derived, immutable viewing setup for one render
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub center: Point3,
    pub image_width: usize,
    pub image_height: usize,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub sky: SkyGradient,
    pixel00_loc: Point3,
    pixel_du: Vec3,
    pixel_dv: Vec3,
    // Camera frame basis vectors
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let image_width = config.image_width;
        let image_height = ((image_width as Float / config.aspect_ratio) as usize).max(1);

        let focal_length = (config.lookat - config.lookfrom).norm();
        let h = (config.vertical_fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width = viewport_height * image_width as Float / image_height as Float;

        let w = (config.lookfrom - config.lookat) / focal_length;
        let u = config.vup.cross(&w).normalize();
        let v = w.cross(&u);

        // Displacement vectors from left to right and top to bottom of viewport
        let viewport_u = u * viewport_width;
        let viewport_v = -v * viewport_height;

        let pixel_du = viewport_u / image_width as Float;
        let pixel_dv = viewport_v / image_height as Float;

        let viewport_upper_left =
            config.lookfrom - w * focal_length - (viewport_u + viewport_v) / 2.0;
        // Top left pixel center
        let pixel00_loc = viewport_upper_left + (pixel_du + pixel_dv) / 2.0;

        Camera {
            center: config.lookfrom,
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel.max(1),
            max_depth: config.max_depth,
            sky: config.sky,
            pixel00_loc,
            pixel_du,
            pixel_dv,
            u,
            v,
            w,
        }
    }

    /// A zero-width image has nothing to render
    pub fn is_empty(&self) -> bool {
        self.image_width == 0 || self.image_height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.image_width * self.image_height
    }

    /// Right, up and backward unit vectors of the camera frame
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Center of pixel `(x, y)` on the viewport, without jitter
    pub fn pixel_center(&self, x: usize, y: usize) -> Point3 {
        self.pixel00_loc + self.pixel_du * x as Float + self.pixel_dv * y as Float
    }

    /// Return a camera ray directed at a random point within pixel `(x, y)`.
    pub fn get_ray(&self, x: usize, y: usize, rng: &mut dyn RngCore) -> Ray {
        // Offsets uniformly distributed within 1/2 pixel ensure 100% coverage with 0 overlap
        let x_offset: Float = rng.gen_range(-0.5..0.5);
        let y_offset: Float = rng.gen_range(-0.5..0.5);
        let pixel_sample = self.pixel00_loc
            + self.pixel_du * (x as Float + x_offset)
            + self.pixel_dv * (y as Float + y_offset);
        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Linear radiance carried back along `ray`, following at most `depth` bounces
    pub fn ray_color(&self, world: &World, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        // Out of bounces: the path is truncated and contributes nothing
        if depth == 0 {
            return Color::zeros();
        }

        match world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, Float::INFINITY)) {
            Some(hit) => match hit.material.scatter(ray, &hit, rng) {
                Some((attenuation, scattered)) => {
                    attenuation.component_mul(&self.ray_color(world, &scattered, depth - 1, rng))
                }
                None => Color::zeros(),
            },
            None => self.sky.color(&ray.direction),
        }
    }

    /// Sum (not the average) of `samples` jittered paths through pixel `(x, y)`
    pub fn sample_pixel(
        &self,
        world: &World,
        x: usize,
        y: usize,
        samples: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        (0..samples)
            .map(|_| {
                let ray = self.get_ray(x, y, rng);
                self.ray_color(world, &ray, self.max_depth, rng)
            })
            .sum()
    }

    /// Renders every pixel with `samples_per_pixel` samples, top row first,
    /// handing each finished pixel to `sink`.
    pub fn render(&self, world: &World, sink: &mut impl PixelSink, rng: &mut dyn RngCore) {
        if self.is_empty() {
            return;
        }
        sink.start(self.image_width, self.image_height);

        let total = self.pixel_count();
        let mut reported = 0;
        for (done, (y, x)) in iproduct!(0..self.image_height, 0..self.image_width).enumerate() {
            let sum = self.sample_pixel(world, x, y, self.samples_per_pixel, rng);
            sink.put_pixel(x, y, to_rgb8(&(sum / self.samples_per_pixel as Float)));

            let percent = ((done + 1) * 100 / total) as u32;
            if percent > reported {
                reported = percent;
                sink.progress(percent);
            }
        }
    }
}

/// Running per-pixel sums for progressive rendering. Each pass adds one
/// sample to every pixel, and the displayed value is the running average.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    width: usize,
    height: usize,
    sums: Vec<Color>,
    passes: u32,
}

impl SampleBuffer {
    pub fn new(camera: &Camera) -> Self {
        SampleBuffer {
            width: camera.image_width,
            height: camera.image_height,
            sums: vec![Color::zeros(); camera.pixel_count()],
            passes: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples accumulated into every pixel
    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn clear(&mut self) {
        self.sums.fill(Color::zeros());
        self.passes = 0;
    }

    /// Adds one sample to every pixel
    pub fn accumulate_pass(&mut self, camera: &Camera, world: &World, rng: &mut dyn RngCore) {
        if self.sums.is_empty() {
            return;
        }
        for (y, x) in iproduct!(0..self.height, 0..self.width) {
            self.sums[y * self.width + x] += camera.sample_pixel(world, x, y, 1, rng);
        }
        self.passes += 1;
    }

    /// Linear average of the samples so far. Black before the first pass.
    pub fn average(&self, x: usize, y: usize) -> Color {
        if self.passes == 0 {
            return Color::zeros();
        }
        self.sums[y * self.width + x] / self.passes as Float
    }

    /// Quantized, gamma-corrected colors in row-major order
    pub fn rgb8(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        iproduct!(0..self.height, 0..self.width).map(|(y, x)| to_rgb8(&self.average(x, y)))
    }

    /// Writes the current image into an RGBA frame of `width * height * 4` bytes
    pub fn write_rgba(&self, frame: &mut [u8]) {
        for (pixel, [r, g, b]) in frame.chunks_exact_mut(4).zip(self.rgb8()) {
            pixel.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    /// Copies the current image into `sink`, top row first
    pub fn emit(&self, sink: &mut impl PixelSink) {
        sink.start(self.width, self.height);
        for (i, rgb) in self.rgb8().enumerate() {
            sink.put_pixel(i % self.width, i / self.width, rgb);
        }
    }
}
