use crate::Config;
use crate::batch::{self, BatchEvent, BatchOptions};
use crate::compositor::{OutputFormat, Position, WatermarkConfig, color};
use crate::templates::TemplateManager;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// Menu-driven console front-end. Builds a `WatermarkConfig` from prompts
/// and hands it to the same batch driver the CLI uses.
pub fn run(config: &Config) -> io::Result<()> {
    println!("sukashi interactive mode");

    loop {
        print_menu();
        let choice = match read_line("Choose an action (0-5): ") {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };

        let outcome = match choice.as_str() {
            "0" => break,
            "1" => text_watermark(config),
            "2" => image_watermark(config),
            "3" => apply_template(config),
            "4" => manage_templates(config),
            "5" => batch_process(config),
            _ => {
                println!("Enter a number between 0 and 5");
                Ok(())
            }
        };
        match outcome {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }

    println!("Goodbye");
    Ok(())
}

fn print_menu() {
    println!();
    println!("1. Text watermark");
    println!("2. Image watermark");
    println!("3. Apply a saved template");
    println!("4. Manage templates");
    println!("5. Batch process a directory");
    println!("0. Quit");
}

/// Prompts on stdout and reads one trimmed line. A closed stdin surfaces as
/// `UnexpectedEof` so menu loops can exit instead of spinning.
fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

/// Asks for an existing file, giving up after three misses like a polite
/// form would.
fn prompt_existing_file(prompt: &str) -> io::Result<Option<PathBuf>> {
    for _ in 0..3 {
        let line = read_line(prompt)?;
        if line.is_empty() {
            println!("Cancelled");
            return Ok(None);
        }
        let path = PathBuf::from(&line);
        if path.is_file() {
            return Ok(Some(path));
        }
        println!("File not found: {line}");
    }
    Ok(None)
}

fn prompt_output_path(input: &Path, format: OutputFormat) -> io::Result<Option<PathBuf>> {
    let default = batch::default_single_output(input, format);
    let line = read_line(&format!("Output path (default {}): ", default.display()))?;
    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(line)))
    }
}

/// Shared style prompts. Every field defaults to its current value so a run
/// of empty inputs keeps the configured look.
fn prompt_style(mut config: WatermarkConfig) -> io::Result<WatermarkConfig> {
    let line = read_line(&format!("Font size (default {}): ", config.font_size))?;
    if !line.is_empty() {
        match line.parse::<u32>() {
            Ok(size) => config.font_size = size,
            Err(_) => println!("Not a number, keeping {}", config.font_size),
        }
    }

    let current = format!(
        "{},{},{}",
        config.font_color[0], config.font_color[1], config.font_color[2]
    );
    let line = read_line(&format!("Color name or R,G,B (default {current}): "))?;
    if !line.is_empty() {
        // parse_color logs the fallback itself.
        config.font_color = color::parse_color(&line).into_value();
    }

    config.position = prompt_position(config.position)?;

    let line = read_line(&format!("Opacity 0-100 (default {}): ", config.opacity))?;
    if !line.is_empty() {
        match line.parse::<u8>() {
            Ok(value) if value <= 100 => config.opacity = value,
            _ => println!("Opacity must be 0-100, keeping {}", config.opacity),
        }
    }

    let line = read_line(&format!(
        "Output format JPEG/PNG (default {}): ",
        config.output_format.name()
    ))?;
    if !line.is_empty() {
        match OutputFormat::parse(&line) {
            Some(format) => config.output_format = format,
            None => println!("Unknown format, keeping {}", config.output_format.name()),
        }
    }

    Ok(config)
}

fn prompt_position(current: Position) -> io::Result<Position> {
    println!("Positions:");
    println!("  1. top-left      2. top-center     3. top-right");
    println!("  4. center-left   5. center         6. center-right");
    println!("  7. bottom-left   8. bottom-center  9. bottom-right");
    let line = read_line(&format!("Choose a position 1-9 (default {current}): "))?;
    if line.is_empty() {
        return Ok(current);
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=9).contains(&n) => Ok(Position::ALL[n - 1]),
        _ => {
            println!("Invalid choice, keeping {current}");
            Ok(current)
        }
    }
}

/// Base config for a session: the config file's watermark defaults with the
/// fonts section folded in.
fn base_config(config: &Config) -> WatermarkConfig {
    let mut base = config.watermark.clone();
    if base.font_path.is_none() {
        base.font_path = config.fonts.font_path.clone();
    }
    base
}

fn text_watermark(config: &Config) -> io::Result<()> {
    println!();
    println!("Text watermark");
    let Some(input) = prompt_existing_file("Image file: ")? else {
        return Ok(());
    };

    let mut watermark = base_config(config);
    let text = read_line("Watermark text: ")?;
    if text.is_empty() {
        println!("Watermark text must not be empty");
        return Ok(());
    }
    watermark.text = Some(text);
    watermark.watermark_image = None;
    let watermark = prompt_style(watermark)?;

    let output = prompt_output_path(&input, watermark.output_format)?;
    apply_to_file(&input, output, &watermark, config);
    Ok(())
}

fn image_watermark(config: &Config) -> io::Result<()> {
    println!();
    println!("Image watermark");
    let Some(input) = prompt_existing_file("Image file: ")? else {
        return Ok(());
    };
    let Some(overlay) = prompt_existing_file("Watermark image file: ")? else {
        return Ok(());
    };

    let mut watermark = base_config(config);
    watermark.watermark_image = Some(overlay);
    let text = read_line("Extra text (blank uses each photo's capture date): ")?;
    watermark.text = (!text.is_empty()).then_some(text);

    let line = read_line(&format!("Scale factor (default {}): ", watermark.image_scale))?;
    if !line.is_empty() {
        match line.parse::<f32>() {
            Ok(scale) if scale.is_finite() && scale > 0.0 => watermark.image_scale = scale,
            _ => println!("Scale must be positive, keeping {}", watermark.image_scale),
        }
    }

    let watermark = prompt_style(watermark)?;
    let output = prompt_output_path(&input, watermark.output_format)?;
    apply_to_file(&input, output, &watermark, config);
    Ok(())
}

fn apply_template(config: &Config) -> io::Result<()> {
    println!();
    println!("Apply a template");
    let manager = match TemplateManager::load(&config.templates.store_path) {
        Ok(manager) => manager,
        Err(e) => {
            println!("Template store error: {e}");
            return Ok(());
        }
    };

    let summaries = manager.list();
    if summaries.is_empty() {
        println!("No templates saved yet");
        return Ok(());
    }
    for (i, summary) in summaries.iter().enumerate() {
        println!("{}. {} ({})", i + 1, summary.name, summary.summary);
    }

    let line = read_line("Choose a template number: ")?;
    let Some(summary) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| summaries.get(i))
    else {
        println!("Invalid choice");
        return Ok(());
    };
    let Some(template) = manager.get(&summary.name) else {
        println!("Template '{}' not found", summary.name);
        return Ok(());
    };
    let watermark = template.config.clone();

    let Some(input) = prompt_existing_file("Image file: ")? else {
        return Ok(());
    };
    let output = prompt_output_path(&input, watermark.output_format)?;
    apply_to_file(&input, output, &watermark, config);
    Ok(())
}

fn manage_templates(config: &Config) -> io::Result<()> {
    println!();
    println!("Manage templates");
    println!("1. List templates");
    println!("2. Save a new template");
    println!("3. Delete a template");
    println!("0. Back");

    let mut manager = match TemplateManager::load(&config.templates.store_path) {
        Ok(manager) => manager,
        Err(e) => {
            println!("Template store error: {e}");
            return Ok(());
        }
    };

    match read_line("Choose an action (0-3): ")?.as_str() {
        "1" => list_templates(&manager),
        "2" => return save_template_flow(&mut manager, base_config(config)),
        "3" => return delete_template_flow(&mut manager),
        "0" => {}
        _ => println!("Enter a number between 0 and 3"),
    }
    Ok(())
}

fn list_templates(manager: &TemplateManager) {
    let summaries = manager.list();
    if summaries.is_empty() {
        println!("No templates saved yet");
        return;
    }
    for summary in summaries {
        println!();
        println!("{}", summary.name);
        if !summary.description.is_empty() {
            println!("  {}", summary.description);
        }
        println!("  {}", summary.summary);
        println!("  created {}", summary.created_at.format("%Y-%m-%d"));
    }
}

fn save_template_flow(manager: &mut TemplateManager, base: WatermarkConfig) -> io::Result<()> {
    println!();
    println!("Save a new template");
    let name = read_line("Template name: ")?;
    if name.is_empty() {
        println!("Template name must not be empty");
        return Ok(());
    }
    let description = read_line("Description (optional): ")?;

    let mut watermark = prompt_style(base)?;
    let text = read_line("Default text (blank for none): ")?;
    watermark.text = (!text.is_empty()).then_some(text);

    match manager.save(&name, watermark.clone(), description.clone(), false) {
        Ok(()) => println!("Template '{name}' saved"),
        Err(crate::templates::TemplateError::AlreadyExists(_)) => {
            let confirm = read_line(&format!("Template '{name}' exists. Overwrite? (y/N): "))?;
            if confirm.eq_ignore_ascii_case("y") {
                match manager.save(&name, watermark, description, true) {
                    Ok(()) => println!("Template '{name}' saved"),
                    Err(e) => println!("Failed to save template: {e}"),
                }
            } else {
                println!("Cancelled");
            }
        }
        Err(e) => println!("Failed to save template: {e}"),
    }
    Ok(())
}

fn delete_template_flow(manager: &mut TemplateManager) -> io::Result<()> {
    let summaries = manager.list();
    if summaries.is_empty() {
        println!("No templates to delete");
        return Ok(());
    }
    println!();
    for (i, summary) in summaries.iter().enumerate() {
        println!("{}. {}", i + 1, summary.name);
    }

    let line = read_line("Choose a template number to delete: ")?;
    let Some(summary) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| summaries.get(i))
    else {
        println!("Invalid choice");
        return Ok(());
    };

    let confirm = read_line(&format!("Delete template '{}'? (y/N): ", summary.name))?;
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled");
        return Ok(());
    }
    match manager.delete(&summary.name) {
        Ok(()) => println!("Template '{}' deleted", summary.name),
        Err(e) => println!("Failed to delete template: {e}"),
    }
    Ok(())
}

/// Batch runs happen on a worker thread so this thread can keep the console.
/// The worker posts progress over a channel; nothing else writes output
/// while it runs.
fn batch_process(config: &Config) -> io::Result<()> {
    println!();
    println!("Batch process a directory");
    let line = read_line("Input directory: ")?;
    if line.is_empty() {
        println!("Cancelled");
        return Ok(());
    }
    let input = PathBuf::from(&line);
    if !input.is_dir() {
        println!("Directory not found: {line}");
        return Ok(());
    }

    let suffix = &config.output.directory_suffix;
    let default_out = batch::default_directory_output(&input, suffix);
    let line = read_line(&format!("Output directory (default {}): ", default_out.display()))?;
    let output = (!line.is_empty()).then(|| PathBuf::from(line));

    let mut watermark = base_config(config);
    let text = read_line("Watermark text (blank uses each photo's capture date): ")?;
    watermark.text = (!text.is_empty()).then_some(text);
    let watermark = prompt_style(watermark)?;

    let recursive = read_line("Include subdirectories? (y/N): ")?.eq_ignore_ascii_case("y");
    let options = BatchOptions {
        output,
        recursive,
        directory_suffix: suffix.clone(),
    };

    if let Err(e) = watermark.validate() {
        println!("Invalid settings: {e}");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        batch::run_with_events(&input, &watermark, &options, &mut |event| {
            // A closed receiver just means nobody is watching anymore.
            let _ = tx.send(event);
        })
    });

    for event in rx {
        match event {
            BatchEvent::Started { total } => println!("Processing {total} files..."),
            BatchEvent::FileFinished {
                source,
                ok,
                completed,
                total,
            } => {
                let status = if ok { "ok" } else { "failed" };
                println!("[{completed}/{total}] {} ... {status}", source.display());
            }
            BatchEvent::Finished(summary) => {
                println!(
                    "Done: {}/{} files watermarked",
                    summary.succeeded, summary.total
                );
            }
        }
    }

    match worker.join() {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => println!("Batch failed: {e}"),
        Err(_) => println!("Batch worker stopped unexpectedly"),
    }
    Ok(())
}

/// Single-file run shared by the text, image, and template actions.
fn apply_to_file(
    input: &Path,
    output: Option<PathBuf>,
    watermark: &WatermarkConfig,
    config: &Config,
) {
    if let Err(e) = watermark.validate() {
        println!("Invalid settings: {e}");
        return;
    }
    let dest = output
        .clone()
        .unwrap_or_else(|| batch::default_single_output(input, watermark.output_format));
    let options = BatchOptions {
        output,
        recursive: false,
        directory_suffix: config.output.directory_suffix.clone(),
    };
    match batch::run(input, watermark, &options) {
        Ok(summary) if summary.all_succeeded() => {
            println!("Watermark written to {}", dest.display());
        }
        Ok(_) => println!("Watermarking failed, see the log for details"),
        Err(e) => println!("Error: {e}"),
    }
}
