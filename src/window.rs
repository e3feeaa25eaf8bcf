use crate::{
    camera::{Camera, SampleBuffer},
    hittable::World,
    ppm::{self, Image, PpmError},
};
use log::{debug, error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Instant,
};
use thiserror::Error;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

/// Logical width of the preview window. The image is scaled to fit.
pub const WINDOW_WIDTH: u32 = 1440;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Couldn't create the preview window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Couldn't create the pixel surface: {0}")]
    Pixels(#[from] pixels::Error),
}

/// Opens a window and refines the image forever, one sample per pixel per frame,
/// until the window is closed. Rendering happens on this thread between
/// event polls, so the window only responds once a pass has finished.
///
/// If `snapshot` is set, the image as it is at close time is written there as PPM.
pub fn render_with_preview(
    camera: Camera,
    world: World,
    snapshot: Option<PathBuf>,
) -> Result<(), PreviewError> {
    if camera.is_empty() {
        warn!("Image has no pixels, nothing to preview");
        return Ok(());
    }

    let width = camera.image_width as u32;
    let height = camera.image_height as u32;
    let scale = WINDOW_WIDTH as f64 / width as f64;

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Ray Tracer Preview")
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, height as f64 * scale))
        .build(&event_loop)?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(width, height, surface_texture)?
    };

    let mut samples = SampleBuffer::new(&camera);
    let mut rng = StdRng::from_entropy();
    let start_time = Instant::now();
    info!("Previewing {}x{} image, close the window to stop", width, height);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!(
                    "Rendered {} samples per pixel in {:.1} seconds",
                    samples.passes(),
                    start_time.elapsed().as_secs_f64()
                );
                if let Some(path) = &snapshot {
                    match save_snapshot(&samples, path) {
                        Ok(()) => info!("Wrote {}", path.display()),
                        Err(err) => error!("Couldn't write {}: {}", path.display(), err),
                    }
                }
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(new_size),
                ..
            } => {
                if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                    error!("pixels.resize_surface error {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                let pass_start = Instant::now();
                samples.accumulate_pass(&camera, &world, &mut rng);
                debug!(
                    "Pass {} took {:.3} seconds",
                    samples.passes(),
                    pass_start.elapsed().as_secs_f64()
                );
                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                samples.write_rgba(pixels.frame_mut());
                if let Err(err) = pixels.render() {
                    error!("pixels.render error {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => (),
        }
    })
}

fn save_snapshot(samples: &SampleBuffer, path: &Path) -> Result<(), PpmError> {
    let mut image = Image::new(samples.width(), samples.height());
    samples.emit(&mut image);
    ppm::write_ppm(&image, File::create(path)?)?;
    Ok(())
}
