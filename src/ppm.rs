//! Plain-text PPM ("P3") images.
//!
//! The writer always emits `P3\n<width> <height>\n255\n` followed by one
//! `R G B` line per pixel, top row first. The reader accepts any whitespace
//! layout and `#` comments, but only a max value of 255.

use crate::camera::PixelSink;
use std::io::{self, BufWriter, Read, Write};
use thiserror::Error;

pub const MAX_VALUE: u32 = 255;

#[derive(Error, Debug)]
pub enum PpmError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a plain PPM file (magic number {0:?}, expected \"P3\")")]
    BadMagic(String),

    #[error("Missing {0} in PPM header")]
    MissingField(&'static str),

    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Unsupported max color value {0}, expected 255")]
    UnsupportedMaxValue(u32),

    #[error("Color sample {0} is larger than the max value")]
    SampleOutOfRange(u32),

    #[error("Image of {width}x{height} pixels is too large")]
    ImageTooLarge { width: usize, height: usize },

    #[error("Expected {expected} color samples, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// An 8-bit RGB image stored row-major, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Image {
    /// All black
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            width,
            height,
            pixels: vec![[0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.pixels[y * self.width + x] = rgb;
    }
}

impl PixelSink for Image {
    fn start(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Image::new(width, height);
        }
    }

    fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.set(x, y, rgb);
    }
}

pub fn write_ppm<W: Write>(image: &Image, out: W) -> io::Result<()> {
    let mut buf_writer = BufWriter::new(out);
    write!(buf_writer, "P3\n{} {}\n{}\n", image.width, image.height, MAX_VALUE)?;
    for [r, g, b] in &image.pixels {
        writeln!(buf_writer, "{} {} {}", r, g, b)?;
    }
    buf_writer.flush()
}

pub fn read_ppm<R: Read>(mut input: R) -> Result<Image, PpmError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    // Comments run from '#' to the end of the line
    let mut tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace);

    let magic = tokens.next().ok_or(PpmError::MissingField("magic number"))?;
    if magic != "P3" {
        return Err(PpmError::BadMagic(magic.to_string()));
    }

    let mut header_field = |name: &'static str| -> Result<u32, PpmError> {
        let token = tokens.next().ok_or(PpmError::MissingField(name))?;
        parse_number(token)
    };
    let width = header_field("width")? as usize;
    let height = header_field("height")? as usize;
    let max_value = header_field("max color value")?;
    if max_value != MAX_VALUE {
        return Err(PpmError::UnsupportedMaxValue(max_value));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(PpmError::ImageTooLarge { width, height })?;
    let samples = tokens
        .map(|token| {
            let sample = parse_number(token)?;
            u8::try_from(sample).map_err(|_| PpmError::SampleOutOfRange(sample))
        })
        .collect::<Result<Vec<u8>, PpmError>>()?;
    if samples.len() != expected {
        return Err(PpmError::Truncated {
            expected,
            found: samples.len(),
        });
    }

    let pixels = samples
        .chunks_exact(3)
        .map(|rgb| [rgb[0], rgb[1], rgb[2]])
        .collect();
    Ok(Image {
        width,
        height,
        pixels,
    })
}

fn parse_number(token: &str) -> Result<u32, PpmError> {
    token
        .parse()
        .map_err(|_| PpmError::InvalidNumber(token.to_string()))
}
