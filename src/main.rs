use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::thread_rng;
use rt::{
    camera::{Camera, CameraConfig},
    hittable::World,
    output::{self, WithProgress},
    ppm::{self, Image},
    scenes, window,
};
use std::{fs, io, path::PathBuf, time::Instant};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Refine the image in a window until it is closed
    Window,
    /// Render once with a fixed sample count and write a PPM file
    Ppm,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scene {
    Showcase,
    TwoSpheres,
    Triangles,
}

impl Scene {
    fn build(self) -> (CameraConfig, World) {
        match self {
            Scene::Showcase => (scenes::showcase_camera(), scenes::showcase()),
            Scene::TwoSpheres => (scenes::two_spheres_camera(), scenes::two_spheres()),
            Scene::Triangles => (scenes::triangles_camera(), scenes::triangles()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rt", version, about = "CPU path tracer with a progressive preview")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Window)]
    mode: Mode,

    #[arg(long, value_enum, default_value_t = Scene::Showcase)]
    scene: Scene,

    /// Image width in pixels (defaults to the scene's)
    #[arg(long)]
    width: Option<usize>,

    /// Samples per pixel for ppm renders (defaults to the scene's)
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounces per path (defaults to the scene's)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Directory that ppm renders are written into
    #[arg(long, default_value = output::RESULTS_DIR)]
    results_dir: PathBuf,

    /// Output name without extension. Asked for interactively if missing.
    #[arg(long)]
    output: Option<String>,

    /// Where the window preview writes its image on close
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (mut config, world) = cli.scene.build();
    if let Some(width) = cli.width {
        config.image_width = width;
    }
    if let Some(samples) = cli.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }

    let camera = Camera::new(&config);
    info!(
        "{:?} scene: {} shapes, {}x{} pixels, max depth {}",
        cli.scene,
        world.len(),
        camera.image_width,
        camera.image_height,
        camera.max_depth
    );

    match cli.mode {
        Mode::Ppm => render_to_file(&cli, &camera, &world)?,
        Mode::Window => window::render_with_preview(camera, world, cli.snapshot)
            .context("Window preview failed")?,
    }
    Ok(())
}

fn render_to_file(cli: &Cli, camera: &Camera, world: &World) -> Result<()> {
    if camera.is_empty() {
        warn!("Image has no pixels, nothing to render");
        return Ok(());
    }

    fs::create_dir_all(&cli.results_dir)
        .with_context(|| format!("Couldn't create {}", cli.results_dir.display()))?;

    let (path, file) = match &cli.output {
        Some(name) => {
            let path = output::output_path(&cli.results_dir, name);
            let file = fs::File::create(&path)
                .with_context(|| format!("Couldn't create {}", path.display()))?;
            (path, file)
        }
        None => output::prompt_output_file(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            &cli.results_dir,
        )?,
    };

    info!(
        "Rendering {} samples per pixel into {}",
        camera.samples_per_pixel,
        path.display()
    );
    let start_time = Instant::now();
    let mut image = Image::new(camera.image_width, camera.image_height);
    let mut sink = WithProgress::new(&mut image, output::percent_bar());
    camera.render(world, &mut sink, &mut thread_rng());
    sink.finish();
    info!(
        "Total rendering time: {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    ppm::write_ppm(&image, file).with_context(|| format!("Couldn't write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
