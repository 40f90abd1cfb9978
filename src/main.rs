use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use sukashi::{
    Config,
    batch::{self, BatchOptions},
    compositor::{OutputFormat, Position, WatermarkConfig, color},
    interactive, startup_checks,
    templates::TemplateManager,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// A bare path watermarks it without naming the apply command.
    #[command(flatten)]
    apply: ApplyArgs,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "sukashi.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark a file or directory (default if no command specified)
    Apply(ApplyArgs),

    /// Manage saved watermark templates
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Menu-driven console mode
    Interactive,
}

/// Style flags shared by apply runs and template saves. Everything is
/// optional so config-file and template values show through.
#[derive(Args, Debug, Clone)]
struct StyleArgs {
    /// Watermark text; a blank run stamps each photo's capture date
    #[arg(long)]
    text: Option<String>,

    /// Image overlaid as a watermark
    #[arg(long)]
    image_watermark: Option<PathBuf>,

    /// Font size in pixels, 1-200
    #[arg(long)]
    font_size: Option<u32>,

    /// Color name or R,G,B
    #[arg(long)]
    color: Option<String>,

    /// Anchor name such as bottom-right
    #[arg(long)]
    position: Option<String>,

    /// Watermark opacity, 0-100
    #[arg(long)]
    opacity: Option<u8>,

    /// Margin from the anchored horizontal edge, in pixels
    #[arg(long)]
    offset_x: Option<u32>,

    /// Margin from the anchored vertical edge, in pixels
    #[arg(long)]
    offset_y: Option<u32>,

    /// Rotation in degrees counter-clockwise, -180 to 180
    #[arg(long)]
    rotation: Option<i32>,

    /// Scale factor applied to the image watermark
    #[arg(long)]
    image_scale: Option<f32>,

    /// Output format, JPEG or PNG
    #[arg(long)]
    format: Option<String>,

    /// JPEG quality, 1-100
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Args, Debug, Clone)]
struct ApplyArgs {
    /// Image file or directory to watermark
    input: Option<PathBuf>,

    /// Output file for a single image, output directory for a batch
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start from a saved template
    #[arg(short, long)]
    template: Option<String>,

    /// Also process subdirectories
    #[arg(short, long)]
    recursive: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Subcommand, Debug)]
enum TemplateCommands {
    /// List saved templates
    List,
    /// Save a template built from style flags
    Save {
        /// Template name
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Replace an existing template with the same name
        #[arg(long)]
        overwrite: bool,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// Delete a template
    Delete {
        /// Template name
        name: String,
    },
    /// Write one template to its own JSON file
    Export {
        /// Template name
        name: String,

        /// Destination file
        output: PathBuf,
    },
    /// Read a template from a JSON file into the store
    Import {
        /// Source file
        input: PathBuf,

        /// Replace an existing template with the same name
        #[arg(long)]
        overwrite: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = if config_found {
        let config_content = std::fs::read_to_string(&cli.config)?;
        toml_edit::de::from_str::<Config>(&config_content)?
    } else {
        Config::default()
    };

    // CLI level wins; the config file's app.log_level is the fallback.
    let level_name = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.app.log_level)
        .to_lowercase();
    let level = match level_name.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config_found {
        info!("Configuration loaded from {:?}", cli.config);
    } else {
        info!("Config file not found at {:?}, using defaults", cli.config);
    }

    match cli.command {
        Some(Commands::Template(cmd)) => handle_template_command(cmd, &config),
        Some(Commands::Interactive) => {
            run_startup_checks(&config)?;
            interactive::run(&config)?;
            Ok(())
        }
        Some(Commands::Apply(args)) => run_apply(args, &config),
        None => run_apply(cli.apply, &config),
    }
}

fn run_apply(args: ApplyArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = args.input.clone() else {
        eprintln!("Error: no input given. Pass a file or directory, or run `sukashi interactive`.");
        std::process::exit(1);
    };

    run_startup_checks(config)?;

    let watermark = match build_watermark_config(config, &args) {
        Ok(watermark) => watermark,
        Err(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    };

    let options = BatchOptions {
        output: args.output.clone(),
        recursive: args.recursive,
        directory_suffix: config.output.directory_suffix.clone(),
    };

    let summary = match batch::run(&input, &watermark, &options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if summary.all_succeeded() {
        Ok(())
    } else {
        if summary.total == 0 {
            eprintln!("No images were processed");
        } else {
            eprintln!(
                "{} of {} files failed",
                summary.total - summary.succeeded,
                summary.total
            );
        }
        std::process::exit(1);
    }
}

/// Layered config: config-file defaults, then the named template, then
/// explicit flags on top. Range violations are fatal here, at the boundary.
fn build_watermark_config(config: &Config, args: &ApplyArgs) -> Result<WatermarkConfig, String> {
    let mut watermark = match &args.template {
        Some(name) => {
            let manager = TemplateManager::load(&config.templates.store_path)
                .map_err(|e| format!("cannot open template store: {e}"))?;
            let template = manager
                .get(name)
                .ok_or_else(|| format!("template '{name}' not found"))?;
            info!("Using template '{name}'");
            template.config.clone()
        }
        None => config.watermark.clone(),
    };
    if watermark.font_path.is_none() {
        watermark.font_path = config.fonts.font_path.clone();
    }

    apply_style(&mut watermark, &args.style)?;
    watermark.validate()?;
    Ok(watermark)
}

fn apply_style(watermark: &mut WatermarkConfig, style: &StyleArgs) -> Result<(), String> {
    if let Some(text) = &style.text {
        watermark.text = Some(text.clone());
    }
    if let Some(path) = &style.image_watermark {
        watermark.watermark_image = Some(path.clone());
    }
    if let Some(size) = style.font_size {
        watermark.font_size = size;
    }
    if let Some(value) = &style.color {
        // parse_color logs its own fallback warning.
        watermark.font_color = color::parse_color(value).into_value();
    }
    if let Some(name) = &style.position {
        let resolved = Position::parse(name);
        if let Some(fallback) = resolved.fallback() {
            warn!(
                "Unknown position '{}', using bottom-right",
                fallback.requested
            );
        }
        watermark.position = resolved.into_value();
    }
    if let Some(opacity) = style.opacity {
        watermark.opacity = opacity;
    }
    if let Some(offset) = style.offset_x {
        watermark.offset_x = offset;
    }
    if let Some(offset) = style.offset_y {
        watermark.offset_y = offset;
    }
    if let Some(degrees) = style.rotation {
        watermark.rotation_degrees = degrees;
    }
    if let Some(scale) = style.image_scale {
        watermark.image_scale = scale;
    }
    if let Some(format) = &style.format {
        watermark.output_format = OutputFormat::parse(format)
            .ok_or_else(|| format!("unknown output format '{format}', expected JPEG or PNG"))?;
    }
    if let Some(quality) = style.quality {
        watermark.jpeg_quality = quality;
    }
    Ok(())
}

fn handle_template_command(
    cmd: TemplateCommands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = match TemplateManager::load(&config.templates.store_path) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: cannot open template store: {e}");
            std::process::exit(1);
        }
    };

    match cmd {
        TemplateCommands::List => {
            let summaries = manager.list();
            if summaries.is_empty() {
                println!("No templates saved in {:?}", manager.store_path());
            } else {
                println!("Templates in {:?}:", manager.store_path());
                for summary in summaries {
                    println!();
                    println!("  {}", summary.name);
                    if !summary.description.is_empty() {
                        println!("    {}", summary.description);
                    }
                    println!("    {}", summary.summary);
                    println!("    created {}", summary.created_at.format("%Y-%m-%d"));
                }
            }
        }
        TemplateCommands::Save {
            name,
            description,
            overwrite,
            style,
        } => {
            let mut watermark = config.watermark.clone();
            if let Err(message) = apply_style(&mut watermark, &style) {
                eprintln!("Error: {message}");
                std::process::exit(1);
            }
            match manager.save(&name, watermark, description, overwrite) {
                Ok(()) => println!("Saved template '{}'", name),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        TemplateCommands::Delete { name } => match manager.delete(&name) {
            Ok(()) => println!("Deleted template '{}'", name),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        TemplateCommands::Export { name, output } => match manager.export(&name, &output) {
            Ok(()) => println!("Exported template '{}' to {:?}", name, output),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        TemplateCommands::Import { input, overwrite } => match manager.import(&input, overwrite) {
            Ok(name) => println!("Imported template '{}'", name),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn run_startup_checks(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match startup_checks::perform_startup_checks(config) {
        Ok(()) => Ok(()),
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }
            let critical = errors.iter().any(|e| e.is_critical());
            if critical {
                tracing::error!("Critical startup check failed, exiting");
                Err("Critical startup check failed".into())
            } else {
                tracing::warn!("Non-critical startup checks failed, continuing");
                Ok(())
            }
        }
    }
}
