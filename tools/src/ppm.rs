//
// Plain (P3) portable pixmap output: a text header followed by one
// "r g b" line per pixel in row-major order.
//

use std::io::{self, Write};

use crate::record::Rgb;
use crate::variant::FrameGeometry;

pub struct PpmWriter<W: Write> {
    inner: W,
    pixels: usize,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(mut inner: W, geometry: &FrameGeometry) -> io::Result<Self> {
        writeln!(inner, "P3")?;
        writeln!(
            inner,
            "{} {} {}",
            geometry.width, geometry.height, geometry.max_channel_value
        )?;
        Ok(PpmWriter { inner, pixels: 0 })
    }

    pub fn write_pixel(&mut self, rgb: Rgb) -> io::Result<()> {
        writeln!(self.inner, "{}", rgb)?;
        self.pixels += 1;
        Ok(())
    }

    /// Pixels written so far.
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
