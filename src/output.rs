use crate::camera::PixelSink;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

pub const RESULTS_DIR: &str = "results";

/// `<dir>/<name>.ppm`
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.ppm"))
}

/// Asks for a file name until one can be created inside `dir`.
///
/// Blank answers are asked again. Running out of input is an error, since
/// nobody is left to answer.
pub fn prompt_output_file<R: BufRead, W: Write>(
    input: &mut R,
    prompt: &mut W,
    dir: &Path,
) -> io::Result<(PathBuf, File)> {
    loop {
        write!(prompt, "Output file name: ")?;
        prompt.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no output file name given",
            ));
        }
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        let path = output_path(dir, name);
        match File::create(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) => {
                warn!("Couldn't open {}: {}", path.display(), err);
                writeln!(prompt, "Couldn't open {}, try another name.", path.display())?;
            }
        }
    }
}

/// A 0-100% bar on stderr, styled like `[=====>    ]  42 %`
pub fn percent_bar() -> ProgressBar {
    let style = ProgressStyle::with_template("[{bar:50}] {pos:>3} %")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(100).with_style(style)
}

/// Forwards pixels to another sink and mirrors render progress on a bar
pub struct WithProgress<'a, S: PixelSink> {
    inner: &'a mut S,
    bar: ProgressBar,
}

impl<'a, S: PixelSink> WithProgress<'a, S> {
    pub fn new(inner: &'a mut S, bar: ProgressBar) -> Self {
        WithProgress { inner, bar }
    }

    pub fn finish(self) {
        self.bar.finish();
    }
}

impl<S: PixelSink> PixelSink for WithProgress<'_, S> {
    fn start(&mut self, width: usize, height: usize) {
        self.bar.set_position(0);
        self.inner.start(width, height);
    }

    fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.inner.put_pixel(x, y, rgb);
    }

    fn progress(&mut self, percent: u32) {
        self.bar.set_position(percent as u64);
        self.inner.progress(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppm::Image;
    use std::{fs, io::Cursor};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rt-output-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("results"), "spheres"),
            Path::new("results").join("spheres.ppm")
        );
    }

    #[test]
    fn test_prompt_retries_until_a_file_opens() {
        let dir = scratch_dir("retry");
        let mut input = Cursor::new("\nmissing/dir/name\n  good  \n");
        let mut prompt = Vec::new();

        let (path, _file) = prompt_output_file(&mut input, &mut prompt, &dir).unwrap();
        assert_eq!(path, dir.join("good.ppm"));
        assert!(path.exists());

        let prompt = String::from_utf8(prompt).unwrap();
        assert_eq!(prompt.matches("Output file name: ").count(), 3);
        assert!(prompt.contains("try another name"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_prompt_fails_at_end_of_input() {
        let dir = scratch_dir("eof");
        let mut input = Cursor::new("");
        let err = prompt_output_file(&mut input, &mut io::sink(), &dir).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_progress_forwards_pixels() {
        let mut image = Image::new(0, 0);
        let bar = ProgressBar::hidden();
        let mut sink = WithProgress::new(&mut image, bar.clone());
        sink.start(2, 1);
        sink.put_pixel(1, 0, [4, 5, 6]);
        sink.progress(50);
        assert_eq!(bar.position(), 50);
        sink.finish();
        assert_eq!(image.get(1, 0), [4, 5, 6]);
    }
}
