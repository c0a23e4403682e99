//
// svo-tools: helpers for the svo VGA core's simulation and synthesis
// flow. Dumps simulated video output to PPM frames, turns the 8x8 font
// bitmap into a Verilog table, and summarises synthesis cell usage.
//

mod error;

pub mod font;
pub mod frames;
pub mod mode;
pub mod ppm;
pub mod record;
pub mod report;
pub mod variant;

pub use error::Error;
pub use frames::{ExtractSummary, FrameExtractor};
pub use mode::VideoMode;
pub use record::{Channel, PixelRecord, Rgb};
pub use variant::{FrameConfig, FrameGeometry, Variant};

pub type Result<T> = std::result::Result<T, Error>;
