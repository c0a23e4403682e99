//
// svo-tools: Quick tools for the svo simulation and synthesis flow.
//

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use svo_tools::font::FontImage;
use svo_tools::frames::DEFAULT_PREFIX;
use svo_tools::report::SynthReport;
use svo_tools::{FrameExtractor, Result, Variant, VideoMode};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a simulation pixel log into one PPM file per frame.
    Frames {
        /// Log files, read in order. Defaults to stdin.
        inputs: Vec<PathBuf>,
        /// Hardware build that produced the log.
        #[arg(long, value_enum, default_value_t)]
        variant: Variant,
        /// Take the raster size from a modes file instead.
        #[arg(long)]
        modes: Option<PathBuf>,
        /// Mode to look up in the modes file.
        #[arg(long, default_value = "640x480", requires = "modes")]
        mode: String,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Output files are named <prefix>_NNN.ppm.
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
        /// Fail if a frame-start flag doesn't fall on a frame boundary.
        #[arg(long)]
        strict: bool,
    },
    /// Convert the 8x8 font bitmap into a Verilog ROM.
    Font {
        #[arg(default_value = "8x8font.png")]
        input: PathBuf,
        /// One row per line, with a comment per glyph.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Tabulate cell usage from Vivado synthesis logs.
    Report {
        /// Log files, read in order. Defaults to stdin.
        inputs: Vec<PathBuf>,
    },
}

/// Call `f` with each named input, or with stdin if there are none.
/// "-" also means stdin.
fn for_each_input<F>(inputs: &[PathBuf], mut f: F) -> Result<()>
where
    F: FnMut(&mut dyn io::BufRead) -> Result<()>,
{
    if inputs.is_empty() {
        return f(&mut io::stdin().lock());
    }
    for path in inputs {
        if path.as_os_str() == "-" {
            f(&mut io::stdin().lock())?;
        } else {
            tracing::debug!("reading {}", path.display());
            f(&mut BufReader::new(File::open(path)?))?;
        }
    }
    Ok(())
}

fn frames(
    inputs: &[PathBuf],
    variant: Variant,
    modes: Option<&Path>,
    mode: &str,
    output_dir: &Path,
    prefix: &str,
    strict: bool,
) -> Result<()> {
    let mode = match modes {
        Some(path) => Some(VideoMode::from_file(path, mode)?),
        None => None,
    };
    let config = variant.config(mode.as_ref());
    info!(
        "{:?}: {}x{} frames, maxval {}",
        variant,
        config.geometry.width,
        config.geometry.height,
        config.geometry.max_channel_value
    );

    fs::create_dir_all(output_dir)?;
    let mut extractor = FrameExtractor::new(config, output_dir)
        .with_prefix(prefix)
        .strict(strict);
    for_each_input(inputs, |r| extractor.feed(r))?;
    let summary = extractor.finish()?;

    info!(
        "{} frames from {} pixel records ({} lines)",
        summary.frames_written, summary.pixel_records, summary.lines_read
    );
    Ok(())
}

fn font(input: &Path, verbose: bool) -> Result<()> {
    let image = FontImage::decode(BufReader::new(File::open(input)?))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    image.write_verilog(&mut out, verbose)?;
    out.flush()?;
    Ok(())
}

fn report(inputs: &[PathBuf]) -> Result<()> {
    let mut report = SynthReport::new();
    for_each_input(inputs, |r| report.feed(r))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report.write_table(&mut out)?;
    out.flush()?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Frames {
            inputs,
            variant,
            modes,
            mode,
            output_dir,
            prefix,
            strict,
        } => frames(
            &inputs,
            variant,
            modes.as_deref(),
            &mode,
            &output_dir,
            &prefix,
            strict,
        ),
        Command::Font { input, verbose } => font(&input, verbose),
        Command::Report { inputs } => report(&inputs),
    }
}

fn main() -> ExitCode {
    // Tables go to stdout, so keep the log on stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
