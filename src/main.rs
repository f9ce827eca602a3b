use clap::Parser;
use std::path::PathBuf;
use wallfit::imaging::CropConfig;
use wallfit::{config, output, process, scan};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "wallfit")]
#[command(about = "Optimise wallpaper images for a display resolution")]
#[command(long_about = "\
Optimise wallpaper images for a display resolution

Instead of center-cropping, wallfit finds the visually interesting region of
each image (by edge density) and anchors the crop there. Images whose aspect
ratio already matches the target are resized directly; images that already
fit are copied through untouched.

Outputs land in the output directory as {stem}-{width}w@{ratio}.{ext}, e.g.

  forest.jpg → output-images/forest-1920w@16x9.jpg

Inputs may be files or directories (walked recursively). Unreadable or
unsupported inputs are skipped with a note; a failure in one image never
stops the batch.

Defaults can be stored in wallfit.toml — including your display resolution,
so plain `wallfit ~/Pictures` works. Run 'wallfit --gen-config' to print a
documented starter config.")]
#[command(version = version_string())]
struct Cli {
    /// Source image files or directories
    #[arg(value_name = "IMAGE", required_unless_present = "gen_config")]
    images: Vec<PathBuf>,

    /// Desired wallpaper width (or set target.width in wallfit.toml)
    #[arg(short = 'x', long)]
    width: Option<u32>,

    /// Desired wallpaper height (or set target.height in wallfit.toml)
    #[arg(short = 'y', long)]
    height: Option<u32>,

    /// Allow images to be scaled up, rather than only down
    #[arg(short, long)]
    upscale: bool,

    /// Output directory for generated wallpapers
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable centre masking (forces feature detection to focus on edges)
    #[arg(short, long)]
    mask: bool,

    /// Use gradient centre masking (only meaningful with --mask)
    #[arg(short, long)]
    gradient_mask: bool,

    /// Threshold for feature detection, between 0 and 255
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=255))]
    threshold: Option<u32>,

    /// Disable the processing cache — force re-encoding of all images
    #[arg(long)]
    no_cache: bool,

    /// Config file (default: ./wallfit.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show per-image fitting decisions
    #[arg(short, long)]
    verbose: bool,

    /// Print a stock wallfit.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let file_config = config::WallfitConfig::load_or_default(cli.config.as_deref())?;

    let width = cli.width.or(file_config.target.width).ok_or(
        "target width required: pass -x/--width or set target.width in wallfit.toml",
    )?;
    let height = cli.height.or(file_config.target.height).ok_or(
        "target height required: pass -y/--height or set target.height in wallfit.toml",
    )?;
    let output_dir = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&file_config.output));

    let crop = CropConfig {
        allow_upscale: cli.upscale || file_config.fit.upscale,
        threshold: cli.threshold.unwrap_or(file_config.fit.threshold),
        use_mask: cli.mask || file_config.fit.mask,
        use_mask_gradient: cli.gradient_mask || file_config.fit.gradient_mask,
    };

    init_thread_pool(&file_config.processing);

    output::print_run_header(width, height);
    let scanned = scan::scan(&cli.images);
    output::print_scan_summary(&scanned);
    if scanned.images.is_empty() {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let verbose = cli.verbose;
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event, verbose) {
                println!("{}", line);
            }
        }
    });

    let options = process::ProcessOptions {
        target_width: width,
        target_height: height,
        crop,
        use_cache: !cli.no_cache,
    };
    let outcome = process::process(&scanned.images, &output_dir, &options, Some(tx))?;
    printer.join().unwrap();

    output::print_run_summary(&outcome);
    if !outcome.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
