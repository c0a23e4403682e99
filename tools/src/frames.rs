//
// Frame extraction: walks a simulation log once and writes each run of
// width * height pixel records to its own PPM file. Records map to the
// raster in arrival order, row-major from the top-left.
//
// Frames are only delimited by counting. If the configured geometry
// doesn't match the simulated mode, frames silently come out sheared;
// strict mode catches this using the frame-start flag.
//

use std::fs::{self, File};
use std::io::{BufRead, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::ppm::PpmWriter;
use crate::record::PixelRecord;
use crate::variant::FrameConfig;
use crate::{Error, Result};

pub const DEFAULT_PREFIX: &str = "frame";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub frames_written: usize,
    pub pixel_records: usize,
    pub lines_read: usize,
    /// Records of the trailing partial frame, whose file was removed.
    pub discarded_pixels: usize,
    pub paths: Vec<PathBuf>,
}

struct OpenFrame {
    path: PathBuf,
    ppm: PpmWriter<BufWriter<File>>,
}

pub struct FrameExtractor {
    config: FrameConfig,
    output_dir: PathBuf,
    prefix: String,
    strict: bool,

    frame_index: usize,
    pixel_count: usize,
    current: Option<OpenFrame>,
    summary: ExtractSummary,
}

impl FrameExtractor {
    pub fn new(config: FrameConfig, output_dir: impl Into<PathBuf>) -> Self {
        FrameExtractor {
            config,
            output_dir: output_dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            strict: false,
            frame_index: 0,
            pixel_count: 0,
            current: None,
            summary: ExtractSummary::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Fail on a frame-start flag that doesn't land on a frame boundary.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{:03}.ppm", self.prefix, index))
    }

    /// Feed every line of `reader`. Line numbers carry on across calls,
    /// so several inputs read like one concatenated log.
    pub fn feed<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.split(b'\n') {
            let line = line?;
            // Simulator output isn't guaranteed to be clean UTF-8.
            self.feed_line(&String::from_utf8_lossy(&line))?;
        }
        Ok(())
    }

    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.summary.lines_read += 1;
        let line_no = self.summary.lines_read;

        let record = match PixelRecord::parse(line_no, line)? {
            Some(record) => record,
            None => return Ok(()),
        };

        let frame_size = self.config.geometry.frame_size();
        if self.pixel_count == frame_size {
            self.frame_index += 1;
            self.pixel_count = 0;
        }

        if self.strict && record.flags.frame_start && self.pixel_count != 0 {
            return Err(Error::GeometryMismatch {
                line: line_no,
                pixel_count: self.pixel_count,
                frame_size,
            });
        }

        if self.pixel_count == 0 {
            self.open_frame()?;
            info!(
                "first line of frame {} (line {}): {}",
                self.frame_index,
                line_no,
                line.trim()
            );
        }

        let rgb = record.resolve(line_no, &self.config)?;
        if let Some(frame) = self.current.as_mut() {
            frame.ppm.write_pixel(rgb)?;
        }
        self.pixel_count += 1;
        self.summary.pixel_records += 1;

        if self.pixel_count == frame_size {
            self.close_frame()?;
        }
        Ok(())
    }

    fn open_frame(&mut self) -> Result<()> {
        let path = self.frame_path(self.frame_index);
        let file = BufWriter::new(File::create(&path)?);
        let ppm = PpmWriter::new(file, &self.config.geometry)?;
        self.current = Some(OpenFrame { path, ppm });
        Ok(())
    }

    fn close_frame(&mut self) -> Result<()> {
        if let Some(frame) = self.current.take() {
            frame.ppm.finish()?;
            debug!("wrote {}", frame.path.display());
            self.summary.frames_written += 1;
            self.summary.paths.push(frame.path);
        }
        Ok(())
    }

    /// End of input: the frame still open is short, so its file goes.
    pub fn finish(mut self) -> Result<ExtractSummary> {
        if let Some(frame) = self.current.take() {
            let pixels = frame.ppm.pixels();
            drop(frame.ppm);
            fs::remove_file(&frame.path)?;
            warn!(
                "discarded partial frame {} ({} of {} pixels)",
                self.frame_index,
                pixels,
                self.config.geometry.frame_size()
            );
            self.summary.discarded_pixels = pixels;
        }
        Ok(self.summary)
    }
}

/// Run one reader through a fresh extractor writing into `output_dir`.
pub fn extract<R: BufRead>(
    reader: R,
    config: FrameConfig,
    output_dir: &Path,
) -> Result<ExtractSummary> {
    let mut extractor = FrameExtractor::new(config, output_dir);
    extractor.feed(reader)?;
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Rgb;
    use crate::variant::FrameGeometry;
    use std::io::Cursor;

    fn tiny_config() -> FrameConfig {
        FrameConfig {
            geometry: FrameGeometry {
                width: 2,
                height: 2,
                max_channel_value: 63,
            },
            calibration: Some(Rgb::new(255, 255, 0)),
            sync_marker: 32,
        }
    }

    fn pixels(n: usize) -> String {
        (0..n).map(|i| format!("## 0000 {} 0 0\n", i)).collect()
    }

    #[test]
    fn names_are_zero_padded() {
        let dir = tempfile::TempDir::new().unwrap();
        let extractor = FrameExtractor::new(tiny_config(), dir.path()).with_prefix("testbench");
        assert_eq!(
            extractor.frame_path(7),
            dir.path().join("testbench_007.ppm")
        );
        assert_eq!(
            extractor.frame_path(1234),
            dir.path().join("testbench_1234.ppm")
        );
    }

    #[test]
    fn counts_lines_across_inputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut extractor = FrameExtractor::new(tiny_config(), dir.path());
        extractor.feed(Cursor::new("noise\n## 0000 1 1 1\n")).unwrap();
        extractor.feed(Cursor::new("## 0000 2 2 2\nmore noise\n")).unwrap();
        let summary = extractor.finish().unwrap();
        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.pixel_records, 2);
        assert_eq!(summary.discarded_pixels, 2);
    }

    #[test]
    fn no_records_leaves_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let summary = extract(Cursor::new("hello\nworld\n"), tiny_config(), dir.path()).unwrap();
        assert_eq!(summary.frames_written, 0);
        assert_eq!(summary.discarded_pixels, 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn exact_frames_are_kept() {
        let dir = tempfile::TempDir::new().unwrap();
        let summary = extract(Cursor::new(pixels(8)), tiny_config(), dir.path()).unwrap();
        assert_eq!(summary.frames_written, 2);
        assert_eq!(summary.discarded_pixels, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("frame_001.ppm")).unwrap(),
            "P3\n2 2 63\n4 0 0\n5 0 0\n6 0 0\n7 0 0\n"
        );
    }

    #[test]
    fn strict_mode_flags_misaligned_frame_start() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = "## 0001 0 0 0\n## 0000 0 0 0\n## 0001 0 0 0\n";

        let mut lenient = FrameExtractor::new(tiny_config(), dir.path());
        lenient.feed(Cursor::new(log)).unwrap();

        let mut strict = FrameExtractor::new(tiny_config(), dir.path()).strict(true);
        let err = strict.feed(Cursor::new(log)).unwrap_err();
        assert!(matches!(
            err,
            Error::GeometryMismatch {
                line: 3,
                pixel_count: 2,
                frame_size: 4
            }
        ));
    }

    #[test]
    fn strict_mode_accepts_aligned_frame_start() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = "## 0001 0 0 0\n## 0000 0 0 0\n## 0000 0 0 0\n## 0000 0 0 0\n## 0001 0 0 0\n";
        let mut strict = FrameExtractor::new(tiny_config(), dir.path()).strict(true);
        strict.feed(Cursor::new(log)).unwrap();
        let summary = strict.finish().unwrap();
        assert_eq!(summary.frames_written, 1);
        assert_eq!(summary.discarded_pixels, 1);
    }
}
