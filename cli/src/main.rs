//! mdocx CLI - markup to document model rendering tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdocx::{DocumentBlock, ImageMap, RenderOptions};

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(version)]
#[command(about = "Render markup into a structured document model", long_about = None)]
struct Cli {
    /// Input markup file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markup file to a JSON document model
    Convert {
        /// Input markup file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compact JSON output
        #[arg(long)]
        compact: bool,

        /// Attach an image as `id=path`
        #[arg(long = "image", value_name = "ID=PATH")]
        images: Vec<String>,

        #[command(flatten)]
        render: RenderFlags,
    },

    /// Render multiple markup files, one JSON model per input
    Batch {
        /// Input markup files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        render: RenderFlags,
    },

    /// Show a block summary of a rendered markup file
    Info {
        /// Input markup file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        render: RenderFlags,
    },
}

#[derive(Args, Clone)]
struct RenderFlags {
    /// Maximum heading level (1-9)
    #[arg(long, default_value = "9")]
    max_heading: u8,

    /// Reserved page-break marker literal
    #[arg(long, default_value = "\\newpage")]
    page_break_marker: String,

    /// Keep block math embedded in its paragraph instead of splitting
    #[arg(long)]
    no_math_split: bool,

    /// Maximum image display width in pixels
    #[arg(long, default_value = "600")]
    image_max_width: u32,
}

impl RenderFlags {
    fn to_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_max_heading(self.max_heading)
            .with_page_break_marker(self.page_break_marker.clone())
            .with_block_math_split(!self.no_math_split)
            .with_image_max_width(self.image_max_width)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            compact,
            images,
            render,
        }) => cmd_convert(&input, output.as_deref(), compact, &images, &render),
        Some(Commands::Batch {
            inputs,
            output,
            render,
        }) => cmd_batch(&inputs, &output, &render),
        Some(Commands::Info { input, render }) => cmd_info(&input, &render),
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, &[], &cli.render)
            } else {
                println!("{}", "Usage: mdocx <FILE> [OUTPUT]".yellow());
                println!("       mdocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    image_args: &[String],
    flags: &RenderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = fs::read_to_string(input)?;
    let images = load_images(image_args)?;

    let doc = mdocx::convert_with_images(&markup, &flags.to_options(), &images)?;

    let json = if compact {
        serde_json::to_string(&doc)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!(
                "{} {} -> {}",
                "Rendered".green().bold(),
                input.display(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    flags: &RenderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let markups: Vec<String> = inputs
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<_, _>>()?;
    let refs: Vec<&str> = markups.iter().map(|s| s.as_str()).collect();

    let options = flags.to_options();
    let results = mdocx::convert_batch(&refs, &options);

    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        pb.set_message(input.display().to_string());
        match result {
            Ok(doc) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let path = output_dir.join(format!("{}.json", stem));
                fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
            }
            Err(e) => {
                failures += 1;
                pb.println(format!(
                    "{} {}: {}",
                    "Failed".red().bold(),
                    input.display(),
                    e
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if failures > 0 {
        return Err(format!("{} of {} inputs failed", failures, inputs.len()).into());
    }
    println!(
        "{} {} files -> {}",
        "Rendered".green().bold(),
        inputs.len(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_info(input: &Path, flags: &RenderFlags) -> Result<(), Box<dyn std::error::Error>> {
    let markup = fs::read_to_string(input)?;
    let doc = mdocx::convert_str_with_options(&markup, &flags.to_options())?;

    let mut headings = 0;
    let mut paragraphs = 0;
    let mut list_items = 0;
    let mut table_rows = 0;
    let mut code_lines = 0;
    let mut rules = 0;
    let mut page_breaks = 0;
    let mut images = 0;
    let mut math_spans = 0;

    for block in &doc.blocks {
        match block {
            DocumentBlock::Heading { .. } => headings += 1,
            DocumentBlock::Paragraph { runs, .. } => {
                paragraphs += 1;
                math_spans += runs.iter().filter(|r| r.is_math()).count();
            }
            DocumentBlock::ListItem { .. } => list_items += 1,
            DocumentBlock::TableRow { .. } => table_rows += 1,
            DocumentBlock::CodeLine(_) => code_lines += 1,
            DocumentBlock::Rule => rules += 1,
            DocumentBlock::PageBreak => page_breaks += 1,
            DocumentBlock::Image { .. } => images += 1,
        }
    }

    println!("{}", input.display().to_string().bold());
    println!("  blocks:      {}", doc.block_count());
    println!("  headings:    {}", headings);
    println!("  paragraphs:  {}", paragraphs);
    println!("  list items:  {}", list_items);
    println!("  table rows:  {}", table_rows);
    println!("  code lines:  {}", code_lines);
    println!("  rules:       {}", rules);
    println!("  page breaks: {}", page_breaks);
    println!("  images:      {}", images);
    println!("  math spans:  {}", math_spans);
    println!(
        "  styles:      {}",
        doc.styles
            .definitions
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

/// Parse `id=path` arguments into an image map.
fn load_images(args: &[String]) -> Result<ImageMap, Box<dyn std::error::Error>> {
    let mut images = ImageMap::new();
    for arg in args {
        let (id, path) = arg
            .split_once('=')
            .ok_or_else(|| format!("invalid --image argument {:?}, expected ID=PATH", arg))?;
        images.insert(id, fs::read(path)?);
    }
    Ok(images)
}
