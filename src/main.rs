use buoyscan_cv::classify::StructuringElement;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(name = "buoyscan")]
#[command(about = "Color-histogram buoy detection")]
struct Cli {
    /// Log per-image details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a color model from an annotated dataset
    Analyze {
        /// Dataset directory containing BUOY_PRESENT/ and BUOY_MASK_IMAGES/
        base_path: PathBuf,
        /// Where to write the model
        #[arg(long, default_value = buoyscan_cv::model::DEFAULT_MODEL_FILE)]
        output: PathBuf,
        /// Mask luma level above which a pixel is buoy
        #[arg(long, default_value_t = buoyscan_cv::utils::image::DEFAULT_MASK_THRESHOLD)]
        mask_threshold: u8,
    },
    /// Locate buoy pixels in a single image or in every image of a dataset
    Find {
        /// Image file, or dataset directory containing BUOY_PRESENT/
        input: PathBuf,
        /// Color model written by `analyze`
        #[arg(long, default_value = buoyscan_cv::model::DEFAULT_MODEL_FILE)]
        model: PathBuf,
        /// JSON finder configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Relevance threshold (0-255)
        #[arg(long)]
        threshold: Option<u8>,
        /// Opening element, e.g. 2x2
        #[arg(long)]
        open: Option<StructuringElement>,
        /// Closing element, e.g. 12x12
        #[arg(long)]
        close: Option<StructuringElement>,
        /// Directory for relevance maps and masks
        #[arg(long, default_value = "found")]
        output_dir: PathBuf,
        /// Write per-image statistics as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            base_path,
            output,
            mask_threshold,
        } => commands::analyze(&base_path, &output, mask_threshold),
        Commands::Find {
            input,
            model,
            config,
            threshold,
            open,
            close,
            output_dir,
            report,
        } => {
            let overrides = commands::Overrides {
                threshold,
                open,
                close,
            };
            commands::find(&commands::FindArgs {
                input,
                model,
                config,
                overrides,
                output_dir,
                report,
            })
        }
    }
}
