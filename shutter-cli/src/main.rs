//! Shutter CLI: apply DICOM display shutters to image files
//!
//! Run with: cargo run --bin shutter -- input.png -o out.png --presentation pr.json
//!
//! Logging goes to stderr through `tracing`; `-v` enables debug output and
//! `RUST_LOG` overrides both.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use image::{DynamicImage, GenericImageView};
use owo_colors::OwoColorize;
use shutter_core::common::RgbColor;
use shutter_core::{
    CropRect, ImageHandle, ImageInstance, ImageOpEvent, Occlusion, PresentationDocument,
    PresentationState, ShutterOp,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Shutter: composite display shutters onto images
#[derive(Parser, Debug)]
#[command(name = "shutter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Apply the shutter of a presentation state
    shutter chest.png -o chest-shuttered.png --presentation collimated.json

    # Use a shutter embedded in the image instead
    shutter chest.png -o out.png --image-shutter embedded.json

    # Show a 256x256 window of the image, shutter re-anchored to the window
    shutter chest.png -o out.png --presentation pr.json --crop 100,80,256,256

    # Fill the shutter region itself instead of its surroundings
    shutter chest.png -o out.png --image-shutter roi.json --occlusion inside
"#)]
struct Cli {
    /// Source image (any format the `image` crate reads)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Where to write the result
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Presentation state document to apply
    #[arg(short, long, value_name = "JSON")]
    presentation: Option<PathBuf>,

    /// Shutter document embedded in the source image
    #[arg(long, value_name = "JSON")]
    image_shutter: Option<PathBuf>,

    /// Zero-based frame index of the source image
    #[arg(long, default_value = "0")]
    frame: u32,

    /// Display only a window of the image, as `x,y,width,height`
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_crop)]
    crop: Option<Crop>,

    /// Turn the shutter off
    #[arg(long)]
    hide: bool,

    /// Which side of the shutter region is filled
    #[arg(long, value_enum, default_value_t = OcclusionArg::Outside)]
    occlusion: OcclusionArg,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Occlusion as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OcclusionArg {
    /// The region is the visible area
    Outside,
    /// The region is blanked
    Inside,
}

impl From<OcclusionArg> for Occlusion {
    fn from(arg: OcclusionArg) -> Self {
        match arg {
            OcclusionArg::Outside => Self::Outside,
            OcclusionArg::Inside => Self::Inside,
        }
    }
}

/// A display window within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Crop {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Crop {
    fn to_rect(self) -> Result<CropRect> {
        let x = i32::try_from(self.x).context("crop x is out of range")?;
        let y = i32::try_from(self.y).context("crop y is out of range")?;
        Ok(CropRect::new(x, y, self.width, self.height))
    }
}

fn parse_crop(value: &str) -> Result<Crop, String> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid crop component: {e}"))?;
    match parts[..] {
        [x, y, width, height] if width > 0 && height > 0 => Ok(Crop {
            x,
            y,
            width,
            height,
        }),
        [_, _, _, _] => Err("crop width and height must be positive".to_string()),
        _ => Err(format!("expected x,y,width,height, got {value:?}")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

/// Install the stderr subscriber.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let source = image::open(&cli.input)
        .with_context(|| format!("failed to read image {}", cli.input.display()))?;
    let (width, height) = source.dimensions();
    debug!(width, height, color = ?source.color(), "loaded source image");

    let mut instance = ImageInstance::new(height, width).with_frame(cli.frame);
    if let Some(path) = &cli.image_shutter {
        instance = load_document(path)?.embed_in(instance);
    }
    let image: Arc<dyn ImageHandle> = Arc::new(instance);

    let presentation = cli
        .presentation
        .as_deref()
        .map(|path| -> Result<Arc<dyn PresentationState>> {
            let pr = load_document(path)?
                .to_presentation_state()
                .with_context(|| {
                    format!("failed to build presentation state from {}", path.display())
                })?;
            if let Some(label) = pr.label() {
                info!(label, "loaded presentation state");
            }
            let pr: Arc<dyn PresentationState> = Arc::new(pr);
            Ok(pr)
        })
        .transpose()?;

    let view = match cli.crop {
        Some(crop) => {
            if crop.x.saturating_add(crop.width) > width || crop.y.saturating_add(crop.height) > height
            {
                bail!("crop window {crop:?} exceeds the {width}x{height} image");
            }
            if presentation.is_none() {
                warn!("crop only re-anchors presentation state shutters");
            }
            source.crop_imm(crop.x, crop.y, crop.width, crop.height)
        }
        None => source,
    };

    let mut op = ShutterOp::new();
    op.set_occlusion(cli.occlusion.into());
    op.set_show(!cli.hide);
    op.handle_event(&ImageOpEvent::image_change(Some(Arc::clone(&image))));
    if let Some(pr) = presentation {
        let crop = cli.crop.map(Crop::to_rect).transpose()?;
        op.handle_event(&ImageOpEvent::apply_presentation_state(
            Some(image),
            Some(pr),
            crop,
        ));
    }

    let output = op.process(&view).context("failed to composite shutter")?;
    save(&output, &cli.output)?;
    print_summary(&op, &cli.output);
    Ok(())
}

fn load_document(path: &Path) -> Result<PresentationDocument> {
    PresentationDocument::from_path(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn save(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn print_summary(op: &ShutterOp, output: &Path) {
    let params = op.parameters();
    if !params.is_active() {
        println!(
            "{} no active shutter, wrote {}",
            "-".dimmed(),
            output.display()
        );
        return;
    }
    let fill = params.fill();
    println!(
        "{} shutter applied ({} fill {} from {}), wrote {}",
        "✓".green(),
        params.occlusion,
        hex(fill.color).bold(),
        fill.source,
        output.display()
    );
}

fn hex(color: RgbColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}
