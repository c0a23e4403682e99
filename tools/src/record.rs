//
// Pixel records in the simulation log:
//
//     ## <flags> <r> <g> <b>
//
// The flags token mirrors the stream's user bits, one character each;
// character 1 is hsync, 2 is vsync and 3 marks the first pixel of a
// frame. Colour fields are decimal, or X when the core leaves them
// undriven. Every other log line is simulator chatter.
//

use std::fmt;

use crate::variant::FrameConfig;
use crate::{Error, Result};

pub const MARKER: &str = "##";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl Rgb {
    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Decimal(i64),
    /// `X` in the log; replaced by the variant's calibration value.
    Calibrated,
}

impl Channel {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("x") {
            return Some(Channel::Calibrated);
        }
        token.parse().ok().map(Channel::Decimal)
    }

    fn resolve(self, calibration: Option<u32>) -> Option<i64> {
        match self {
            Channel::Decimal(n) => Some(n),
            Channel::Calibrated => calibration.map(i64::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncFlags {
    pub hsync: bool,
    pub vsync: bool,
    pub frame_start: bool,
}

impl SyncFlags {
    fn parse(token: &str) -> Option<Self> {
        let bits = token.as_bytes();
        if bits.len() < 3 {
            return None;
        }
        Some(SyncFlags {
            hsync: bits[1] == b'1',
            vsync: bits[2] == b'1',
            frame_start: bits.get(3) == Some(&b'1'),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRecord {
    pub flags: SyncFlags,
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

const CHANNEL_NAMES: [&str; 3] = ["red", "green", "blue"];

impl PixelRecord {
    /// Returns `Ok(None)` for lines that are not pixel records. A line
    /// carrying the marker and five tokens must be well formed.
    pub fn parse(line_no: usize, line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 5 || tokens[0] != MARKER {
            return Ok(None);
        }

        let flags = SyncFlags::parse(tokens[1]).ok_or_else(|| Error::MalformedRecord {
            line: line_no,
            reason: format!("flags {:?} too short", tokens[1]),
        })?;

        let mut channels = [Channel::Calibrated; 3];
        for (i, token) in tokens[2..].iter().enumerate() {
            channels[i] = Channel::parse(token).ok_or_else(|| Error::MalformedRecord {
                line: line_no,
                reason: format!("{} value {:?} is not a number", CHANNEL_NAMES[i], token),
            })?;
        }
        let [red, green, blue] = channels;

        Ok(Some(PixelRecord {
            flags,
            red,
            green,
            blue,
        }))
    }

    /// Resolve to the colour written to the frame: placeholders first,
    /// then sync overrides, then clamp to the geometry's channel range.
    pub fn resolve(&self, line_no: usize, config: &FrameConfig) -> Result<Rgb> {
        let cal = config.calibration;
        let slots = [
            (self.red, cal.map(|c| c.r)),
            (self.green, cal.map(|c| c.g)),
            (self.blue, cal.map(|c| c.b)),
        ];

        let mut values = [0i64; 3];
        for (i, (channel, calibration)) in slots.into_iter().enumerate() {
            values[i] = channel.resolve(calibration).ok_or_else(|| Error::MalformedRecord {
                line: line_no,
                reason: format!(
                    "{} is X but this variant has no calibration values",
                    CHANNEL_NAMES[i]
                ),
            })?;
        }

        let marker = i64::from(config.sync_marker);
        if self.flags.hsync {
            values[0] = marker;
        }
        if self.flags.vsync {
            values[1] = marker;
        }

        let max = i64::from(config.geometry.max_channel_value);
        let [r, g, b] = values.map(|v| v.clamp(0, max) as u32);
        Ok(Rgb::new(r, g, b))
    }
}
