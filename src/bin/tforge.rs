//! Thesis Forge CLI - Word → LaTeX → PDF thesis toolchain

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use thesis_forge::{
    config::ForgeConfig,
    core::figures::{apply_mapping_file, write_mapping_report, DEFAULT_REPORT_FILE},
    core::inspect::{render_table, scan_folder},
    core::splitter::split_file,
    pipeline::{smoke_test, Pipeline, PipelineOptions, PipelineSummary},
    ForgeError, ForgeResult,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tforge")]
#[command(version)]
#[command(about = "Thesis Forge - convert Word theses to LaTeX, split chapters and build PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults to $TFORGE_CONFIG, then built-in layout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert the Word sources, split them and compile every PDF variant
    Pipeline {
        /// Skip Word → LaTeX conversion (only compile)
        #[arg(long)]
        skip_conversion: bool,

        /// Skip the chapter split (only compile)
        #[arg(long)]
        skip_split: bool,

        /// Variant to compile ("all" for every variant)
        #[arg(long = "version", value_name = "NAME", default_value = "all")]
        variant: String,
    },

    /// Split a converted .tex file into part/chapter/front-matter files
    Split {
        /// Converted LaTeX file (e.g. source/thesis_full.tex)
        input: PathBuf,

        /// Output directory (chosen from the file name if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Map converter-extracted images to your own figure files
    Figures {
        #[command(subcommand)]
        action: FigureCommands,
    },

    /// Report pixel size and DPI of the PNG/PDF figures in a folder
    Inspect {
        /// Folder to scan (defaults to the configured figures directory)
        folder: Option<PathBuf>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a single engine pass over one variant to surface errors
    CompileTest {
        /// Variant name (lists the available variants if omitted)
        variant: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum FigureCommands {
    /// Write a report of all figures plus a mapping template
    Report {
        /// Converted LaTeX file
        input: PathBuf,

        /// Report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder holding your own figures
        #[arg(long)]
        figures_dir: Option<PathBuf>,
    },

    /// Rewrite image paths using an edited mapping file
    Apply {
        /// Converted LaTeX file
        input: PathBuf,

        /// Mapping file with `source_path|user_path` lines
        mapping: PathBuf,

        /// Where to write the rewritten LaTeX
        output: PathBuf,

        /// Root that mapped paths are placed under
        #[arg(long)]
        figures_dir: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = if verbose {
        "thesis_forge=debug,tforge=debug"
    } else {
        "thesis_forge=info,tforge=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> ForgeResult<()> {
    let config = ForgeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Pipeline {
            skip_conversion,
            skip_split,
            variant,
        } => {
            let options = PipelineOptions {
                skip_conversion,
                skip_split,
                version: Some(variant),
            };
            let summary = Pipeline::new(&config).run(&options)?;
            print_pipeline_summary(&config, &summary);
            if !summary.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Split { input, output } => {
            let output = output.unwrap_or_else(|| config.chapters_dir_for(&input));
            let summary = split_file(&input, &output)?;
            println!(
                "✓ Split completed: {} files in {}",
                summary.files.len(),
                summary.output_dir.display()
            );
        }

        Commands::Figures { action } => match action {
            FigureCommands::Report {
                input,
                output,
                figures_dir,
            } => {
                let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE));
                let figures_dir = figures_dir.unwrap_or_else(|| config.paths.figures_dir.clone());
                let report = write_mapping_report(&input, &figures_dir, &output)?;
                println!(
                    "✓ {}: {} converter figures, {} user figures",
                    output.display(),
                    report.figures.len(),
                    report.user_figures.len()
                );
            }
            FigureCommands::Apply {
                input,
                mapping,
                output,
                figures_dir,
            } => {
                let figures_dir = figures_dir.unwrap_or_else(|| config.paths.figures_dir.clone());
                let outcome = apply_mapping_file(&input, &mapping, &output, &figures_dir)?;
                println!(
                    "✓ {}: {} figures replaced, {} not found",
                    output.display(),
                    outcome.replaced.len(),
                    outcome.missing.len()
                );
            }
        },

        Commands::Inspect { folder, json } => {
            let folder = folder.unwrap_or_else(|| config.paths.figures_dir.clone());
            let results = scan_folder(&folder)?;
            if json {
                let serialized = serde_json::to_string_pretty(&results)
                    .map_err(|e| ForgeError::config(e.to_string()))?;
                println!("{}", serialized);
            } else {
                print!("{}", render_table(&results));
            }
        }

        Commands::CompileTest { variant } => {
            let Some(variant) = variant else {
                eprintln!("Usage: tforge compile-test <variant>");
                eprintln!();
                eprintln!("Available variants:");
                for name in config.variant_names() {
                    eprintln!("  - {}", name);
                }
                return Err(ForgeError::config("no variant given"));
            };
            smoke_test(&config, &variant)?;
            println!("✓ First pass of {} completed", variant);
            println!("If you see errors above, fix them before continuing.");
            println!("If everything looks fine, run the full pipeline.");
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_pipeline_summary(config: &ForgeConfig, summary: &PipelineSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("FINAL SUMMARY");
    println!("{}", "=".repeat(60));
    println!(
        "PDFs built successfully: {}/{}",
        summary.built.len(),
        summary.attempted()
    );
    if summary.is_success() {
        println!("\n✓ Pipeline completed successfully!");
        println!("PDFs available in: {}", absolute(&config.paths.output_dir).display());
    } else {
        println!("\n✗ Some PDFs were not generated: {}", summary.failed.join(", "));
        println!("Check the errors above for details.");
    }
}

#[cfg(feature = "cli")]
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
}
