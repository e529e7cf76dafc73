use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use flipbook::{
    AcceptedContainer, CompositeOptions, GeometryPolicy, OperationType, OverlayMode,
    ProgressCallback, ProgressInfo, SheetOptions, ValidationOptions, validate_file,
};

const CLI_AFTER_HELP: &str = "Examples:\n  flipbook info animation.gif --json\n  flipbook frames animation.gif --out frames --progress\n  flipbook sheet animation.gif --out sheets --columns 3 --rows 4 --cell-width 400\n  flipbook validate animation.gif\n  flipbook completions zsh > _flipbook";

#[derive(Debug, Parser)]
#[command(
    name = "flipbook",
    version,
    about = "Turn animated GIFs into printable flipbook frames",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging on stderr (`RUST_LOG` takes precedence).
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while compositing and writing.
    #[arg(long)]
    progress: bool,

    /// Allow writing into an existing output directory.
    #[arg(long)]
    overwrite: bool,

    /// Largest accepted input in MiB (default 10).
    #[arg(long)]
    max_size_mib: Option<u64>,

    /// Worker threads for parallel export (requires the `rayon` feature).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print container metadata.
    #[command(
        about = "Print GIF metadata",
        visible_alias = "probe",
        after_help = "Examples:\n  flipbook info animation.gif\n  flipbook info animation.gif --json"
    )]
    Info {
        /// Input GIF path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check a GIF and print a validation report.
    #[command(
        about = "Validate a GIF file",
        after_help = "Examples:\n  flipbook validate animation.gif"
    )]
    Validate {
        /// Input GIF path.
        input: PathBuf,
    },

    /// Write every composited frame as a PNG.
    #[command(
        about = "Extract composited frames",
        after_help = "Examples:\n  flipbook frames animation.gif --out frames\n  flipbook frames animation.gif --out frames --policy skip --skip-transparent"
    )]
    Frames {
        /// Input GIF path.
        input: PathBuf,
        /// Output directory for frame images.
        #[arg(long)]
        out: PathBuf,
        /// Out-of-bounds patch policy: clip | skip | reject.
        #[arg(long, default_value = "clip")]
        policy: String,
        /// Let transparent patch pixels show the previous frame through.
        #[arg(long)]
        skip_transparent: bool,
    },

    /// Lay composited frames out on printable pages.
    #[command(
        about = "Render printable sheets",
        after_help = "Examples:\n  flipbook sheet animation.gif --out sheets\n  flipbook sheet animation.gif --out sheets --columns 2 --rows 5 --cell-width 600 --no-guides"
    )]
    Sheet {
        /// Input GIF path.
        input: PathBuf,
        /// Output directory for sheet images.
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 3)]
        columns: u32,
        #[arg(long, default_value_t = 4)]
        rows: u32,
        /// Cell width in pixels (height keeps the aspect ratio).
        #[arg(long)]
        cell_width: Option<u32>,
        /// Gutter size in pixels.
        #[arg(long, default_value_t = 16)]
        margin: u32,
        /// Omit the dashed cut guides.
        #[arg(long)]
        no_guides: bool,
        /// Out-of-bounds patch policy: clip | skip | reject.
        #[arg(long, default_value = "clip")]
        policy: String,
        /// Let transparent patch pixels show the previous frame through.
        #[arg(long)]
        skip_transparent: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `RUST_LOG` overrides this.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().default_filter_or(default_log_filter(verbose));
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
}

fn parse_policy(value: &str) -> Option<GeometryPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "clip" => Some(GeometryPolicy::Clip),
        "skip" => Some(GeometryPolicy::Skip),
        "reject" | "strict" => Some(GeometryPolicy::Reject),
        _ => None,
    }
}

fn validation_options(global: &GlobalOptions) -> ValidationOptions {
    match global.max_size_mib {
        Some(mib) => ValidationOptions::new().with_max_input_bytes(mib.saturating_mul(1024 * 1024)),
        None => ValidationOptions::new(),
    }
}

fn open_input(
    input: &Path,
    global: &GlobalOptions,
) -> Result<AcceptedContainer, Box<dyn std::error::Error>> {
    Ok(AcceptedContainer::open_with_options(
        input,
        &validation_options(global),
    )?)
}

fn prepare_output_dir(out: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if out.exists() {
        if !overwrite {
            return Err(format!(
                "output directory already exists: {} (use --overwrite)",
                out.display()
            )
            .into());
        }
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("writing into existing directory {}", out.display()).yellow()
        );
    }
    fs::create_dir_all(out)?;
    Ok(())
}

fn composite_options(
    global: &GlobalOptions,
    policy: &str,
    skip_transparent: bool,
    progress: &TerminalProgress,
) -> Result<CompositeOptions, Box<dyn std::error::Error>> {
    let policy = parse_policy(policy).ok_or(format!("unsupported --policy: {policy}"))?;
    let overlay = if skip_transparent {
        OverlayMode::SkipTransparent
    } else {
        OverlayMode::Replace
    };

    let mut options = CompositeOptions::new()
        .with_geometry_policy(policy)
        .with_overlay_mode(overlay);
    if global.progress {
        options = options.with_progress(Arc::new(progress.clone()));
    }
    Ok(options)
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(global.verbose)?;

    #[cfg(feature = "rayon")]
    if let Some(threads) = global.threads {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }
    }

    #[cfg(not(feature = "rayon"))]
    if global.threads.is_some() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            "--threads requires building with the `rayon` feature".yellow()
        );
    }

    Ok(())
}

/// Drives an indicatif bar from library progress reports.
#[derive(Clone)]
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(visible: bool) -> Result<Self, Box<dyn std::error::Error>> {
        if !visible {
            return Ok(Self {
                bar: ProgressBar::hidden(),
            });
        }
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {msg:<12} {bar:40.cyan/blue} {pos}/{len}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let label = match info.operation {
            OperationType::Compositing => "compositing",
            OperationType::FrameExport => "writing",
            OperationType::SheetLayout => "layout",
            _ => "working",
        };
        self.bar.set_message(label);
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Info { input, json } => {
            let decoded = open_input(&input, &cli.global)?.decode()?;
            let metadata = decoded.metadata();
            if json {
                let payload = json!({
                    "version": metadata.version.to_string(),
                    "width": metadata.width,
                    "height": metadata.height,
                    "frame_count": metadata.frame_count,
                    "byte_len": metadata.byte_len,
                    "global_palette": metadata.has_global_palette,
                    "disposal_frames": metadata.disposal_frames,
                    "overflowing_frames": metadata.overflowing_frames,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Version: {}", metadata.version);
                println!("Logical screen: {}x{}", metadata.width, metadata.height);
                println!("Frames: {}", metadata.frame_count);
                println!("Size: {} bytes", metadata.byte_len);
                println!(
                    "Global palette: {}",
                    if metadata.has_global_palette { "yes" } else { "no" }
                );
                if metadata.disposal_frames > 0 {
                    println!("Frames with restoring disposal: {}", metadata.disposal_frames);
                }
                if metadata.overflowing_frames > 0 {
                    println!("Frames exceeding the canvas: {}", metadata.overflowing_frames);
                }
            }
        }
        Commands::Validate { input } => {
            let report = validate_file(&input, &validation_options(&cli.global))?;
            print!("{report}");
            if !report.is_valid() {
                return Err(format!("{} is not printable", input.display()).into());
            }
        }
        Commands::Frames {
            input,
            out,
            policy,
            skip_transparent,
        } => {
            let progress = TerminalProgress::new(cli.global.progress)?;
            let options =
                composite_options(&cli.global, &policy, skip_transparent, &progress)?;
            let flipbook = open_input(&input, &cli.global)?
                .decode()?
                .composite_with_options(&options)?;

            prepare_output_dir(&out, cli.global.overwrite)?;
            let paths = flipbook.save_frames_with_options(&out, &options)?;
            progress.finish();

            if cli.global.verbose {
                for path in &paths {
                    eprintln!("saved {}", path.display());
                }
            }
            report_skipped(&flipbook.skipped_frames());

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Wrote {} frame(s) to {}", paths.len(), out.display()).green()
            );
        }
        Commands::Sheet {
            input,
            out,
            columns,
            rows,
            cell_width,
            margin,
            no_guides,
            policy,
            skip_transparent,
        } => {
            let progress = TerminalProgress::new(cli.global.progress)?;
            let options =
                composite_options(&cli.global, &policy, skip_transparent, &progress)?;
            let flipbook = open_input(&input, &cli.global)?
                .decode()?
                .composite_with_options(&options)?;
            progress.finish();

            let mut sheet_options = SheetOptions::new(columns, rows)
                .with_margin(margin)
                .with_guides(!no_guides);
            if let Some(width) = cell_width {
                sheet_options = sheet_options.with_cell_width(width);
            }

            prepare_output_dir(&out, cli.global.overwrite)?;
            let paths = flipbook.save_sheets(&out, &sheet_options)?;
            report_skipped(&flipbook.skipped_frames());

            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Laid out {} frame(s) on {} sheet(s) in {}",
                    flipbook.len(),
                    paths.len(),
                    out.display()
                )
                .green()
            );
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "flipbook", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn report_skipped(skipped: &[usize]) {
    if skipped.is_empty() {
        return;
    }
    let numbers: Vec<String> = skipped.iter().map(|index| (index + 1).to_string()).collect();
    eprintln!(
        "{} {}",
        "warning:".yellow().bold(),
        format!(
            "frame(s) {} were out of bounds and left unchanged",
            numbers.join(", ")
        )
        .yellow()
    );
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
