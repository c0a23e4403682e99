//
// Video timing modes. The simulator emits one record per pixel clock,
// blanking included, so a frame covers the whole raster.
//

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMode {
    pub name: String,
    pub h_active: usize,
    pub v_active: usize,
    pub h_front: usize,
    pub h_sync: usize,
    pub h_back: usize,
    pub v_front: usize,
    pub v_sync: usize,
    pub v_back: usize,
}

impl VideoMode {
    /// Standard 640x480@60 timing.
    pub fn vga_640x480() -> Self {
        VideoMode {
            name: "640x480".to_string(),
            h_active: 640,
            v_active: 480,
            h_front: 16,
            h_sync: 96,
            h_back: 48,
            v_front: 10,
            v_sync: 2,
            v_back: 33,
        }
    }

    /// The tiny raster used by the Vivado IP testbench.
    pub fn testbench() -> Self {
        VideoMode {
            name: "testbench".to_string(),
            h_active: 64,
            v_active: 48,
            h_front: 2,
            h_sync: 4,
            h_back: 2,
            v_front: 1,
            v_sync: 2,
            v_back: 1,
        }
    }

    pub fn total_width(&self) -> usize {
        self.h_active
            .saturating_add(self.h_front)
            .saturating_add(self.h_sync)
            .saturating_add(self.h_back)
    }

    pub fn total_height(&self) -> usize {
        self.v_active
            .saturating_add(self.v_front)
            .saturating_add(self.v_sync)
            .saturating_add(self.v_back)
    }

    /// Width, height and pixels per frame, or `None` if any of them
    /// doesn't fit in a `usize`.
    pub fn checked_raster(&self) -> Option<(usize, usize, usize)> {
        let width = self
            .h_active
            .checked_add(self.h_front)?
            .checked_add(self.h_sync)?
            .checked_add(self.h_back)?;
        let height = self
            .v_active
            .checked_add(self.v_front)?
            .checked_add(self.v_sync)?
            .checked_add(self.v_back)?;
        Some((width, height, width.checked_mul(height)?))
    }

    /// Parse one modes-file line:
    /// `name h_active v_active h_front h_sync h_back v_front v_sync v_back`.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 9 {
            return Err(Error::InvalidMode {
                line: line_no,
                reason: format!("expected 9 fields, found {}", tokens.len()),
            });
        }

        let mut values = [0usize; 8];
        for (value, token) in values.iter_mut().zip(&tokens[1..9]) {
            *value = token.parse().map_err(|_| Error::InvalidMode {
                line: line_no,
                reason: format!("{:?} is not a pixel count", token),
            })?;
        }
        let [h_active, v_active, h_front, h_sync, h_back, v_front, v_sync, v_back] = values;

        let mode = VideoMode {
            name: tokens[0].to_string(),
            h_active,
            v_active,
            h_front,
            h_sync,
            h_back,
            v_front,
            v_sync,
            v_back,
        };
        match mode.checked_raster() {
            None => Err(Error::InvalidMode {
                line: line_no,
                reason: format!("mode {} raster is too large", mode.name),
            }),
            Some((_, _, 0)) => Err(Error::InvalidMode {
                line: line_no,
                reason: format!("mode {} has an empty raster", mode.name),
            }),
            Some(_) => Ok(mode),
        }
    }

    /// Find `name` in a modes listing. Later definitions win.
    pub fn find<R: BufRead>(reader: R, name: &str) -> Result<Option<Self>> {
        let mut found = None;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.split_whitespace().next() == Some(name) {
                found = Some(Self::parse_line(idx + 1, trimmed)?);
            }
        }
        Ok(found)
    }

    pub fn from_file(path: &Path, name: &str) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Self::find(reader, name)?.ok_or_else(|| Error::UnknownMode {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}
