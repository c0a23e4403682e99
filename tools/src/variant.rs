//
// The two hardware builds that dump pixels from simulation. They share
// the log format but not the raster, channel depth or placeholder values.
//

use crate::mode::VideoMode;
use crate::record::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
    pub max_channel_value: u32,
}

impl FrameGeometry {
    pub fn for_mode(mode: &VideoMode, max_channel_value: u32) -> Self {
        FrameGeometry {
            width: mode.total_width(),
            height: mode.total_height(),
            max_channel_value,
        }
    }

    /// Pixel records per frame. Parsed modes are checked to fit, so
    /// saturation only applies to hand-built geometries.
    pub fn frame_size(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub geometry: FrameGeometry,
    /// Values substituted for `X` channels, per slot. `None` means the
    /// build never drives undefined colours and `X` is an error.
    pub calibration: Option<Rgb>,
    /// Forced into red on hsync and green on vsync.
    pub sync_marker: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Variant {
    /// svo core under Verilator, 6 bits per channel.
    #[default]
    Svo,
    /// Vivado IP testbench, 8 bits per channel.
    VivadoIp,
}

impl Variant {
    pub fn default_mode(self) -> VideoMode {
        match self {
            Variant::Svo => VideoMode::vga_640x480(),
            Variant::VivadoIp => VideoMode::testbench(),
        }
    }

    /// Build the frame configuration, taking the raster from `mode` if
    /// given and from the variant's own mode otherwise.
    pub fn config(self, mode: Option<&VideoMode>) -> FrameConfig {
        let default_mode = self.default_mode();
        let mode = mode.unwrap_or(&default_mode);

        match self {
            Variant::Svo => FrameConfig {
                geometry: FrameGeometry::for_mode(mode, 63),
                calibration: Some(Rgb::new(255, 255, 0)),
                sync_marker: 32,
            },
            Variant::VivadoIp => FrameConfig {
                geometry: FrameGeometry::for_mode(mode, 255),
                calibration: None,
                sync_marker: 128,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let svo = Variant::Svo.config(None);
        assert_eq!(svo.geometry.width, 800);
        assert_eq!(svo.geometry.height, 525);
        assert_eq!(svo.geometry.max_channel_value, 63);
        assert_eq!(svo.calibration, Some(Rgb::new(255, 255, 0)));
        assert_eq!(svo.sync_marker, 32);

        let ip = Variant::VivadoIp.config(None);
        assert_eq!(ip.geometry.frame_size(), 72 * 52);
        assert_eq!(ip.geometry.max_channel_value, 255);
        assert_eq!(ip.calibration, None);
        assert_eq!(ip.sync_marker, 128);
    }

    #[test]
    fn mode_overrides_raster_only() {
        let mode = VideoMode::testbench();
        let config = Variant::Svo.config(Some(&mode));
        assert_eq!(config.geometry.width, 72);
        assert_eq!(config.geometry.height, 52);
        assert_eq!(config.geometry.max_channel_value, 63);
        assert_eq!(config.sync_marker, 32);
    }
}
