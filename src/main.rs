use anyhow::Context;
use clap::Parser;
use image::ImageReader;
use std::path::{Path, PathBuf};

use resistor_reader::config::RotationMode;
use resistor_reader::{ReaderConfig, ReaderError, ResistorReader};

#[derive(Parser)]
#[command(name = "resistor-reader")]
#[command(about = "Read the resistance of an axial resistor from its colour bands")]
struct Cli {
    /// Path to captured frame
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Greyscale template of the resistor body used for localization
    #[arg(long, value_name = "FILE", default_value = "assets/resistor_template.jpg")]
    template: PathBuf,

    /// Reference image of the same scene used for white balancing
    #[arg(long, value_name = "FILE", default_value = "assets/reference.jpg")]
    reference: PathBuf,

    /// JSON file overriding pipeline parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rotate by pushing source pixels forward (reproduces unfilled gaps)
    #[arg(long)]
    forward_rotation: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn load_image(path: &Path) -> anyhow::Result<image::DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => ReaderConfig::from_json_file(path)?,
        None => ReaderConfig::default(),
    };
    if args.forward_rotation {
        config.rotation.mode = RotationMode::Forward;
    }

    let frame = load_image(&args.image_path)?.to_rgb8();
    let template = load_image(&args.template)?.to_luma8();
    let reference = load_image(&args.reference)?.to_rgb8();

    if args.verbose {
        println!("Image loaded: {}x{}\n", frame.width(), frame.height());
    }

    let mut reader = ResistorReader::new(template, reference)
        .with_config(config)
        .with_verbose(args.verbose);
    if let Some(debug_dir) = args.debug_out {
        reader = reader.with_debug(debug_dir)?;
    }

    match reader.run(&frame) {
        Ok(report) => {
            println!("Colours in order: {}", report.reading);
            println!("Resistance Value: {}", report.resistance);
        }
        Err(err) => {
            // Pipeline failures get a retry prompt; anything else is a real error
            let Some(reader_err) = err.downcast_ref::<ReaderError>() else {
                return Err(err);
            };
            match reader_err {
                ReaderError::NoForegroundDetected => println!("ERROR: No Resistor Detected!"),
                _ => println!("Oops, please try again"),
            }
            if args.verbose {
                println!("  ({})", reader_err);
            }
        }
    }

    Ok(())
}
