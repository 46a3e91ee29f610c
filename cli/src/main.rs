//! pdfnav CLI - incremental PDF navigation tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use pdfnav::{to_json, ExtractedImage, JsonFormat, NavOptions, Navigator, PageImages};

#[derive(Parser)]
#[command(name = "pdfnav")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Navigate long PDFs: outline, sections, page ranges, search, images",
    long_about = None
)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Maximum pages returned by `pages`
    #[arg(long, global = true, env = "PDFNAV_MAX_PAGES", default_value_t = 10)]
    max_pages: u32,

    /// Maximum pages returned by `section`
    #[arg(long, global = true, env = "PDFNAV_MAX_SECTION_PAGES", default_value_t = 15)]
    max_section_pages: u32,

    /// Default number of search snippets
    #[arg(long, global = true, env = "PDFNAV_MAX_RESULTS", default_value_t = 10)]
    max_results: usize,

    /// Process pages on one thread
    #[arg(long, global = true)]
    sequential: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show metadata, text probe and table of contents
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the table of contents only
    Toc {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read a page range (1-based, inclusive)
    Pages {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// First page
        #[arg(allow_negative_numbers = true)]
        start: i64,

        /// Last page (defaults to START)
        #[arg(allow_negative_numbers = true)]
        end: Option<i64>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read the section whose title best matches QUERY
    Section {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Section title or part of it
        query: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Case-insensitive full-text search
    Search {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Text to find
        query: String,

        /// Number of snippets to show
        #[arg(short = 'n', long)]
        max: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the images on one page
    Images {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(allow_negative_numbers = true)]
        page: i64,

        /// Directory to write image files into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Minimum width and height in pixels
        #[arg(long, default_value_t = 50)]
        min_size: u32,
    },

    /// Save a Markdown summary as <DIR>/<pdf name>_summary.md
    Summary {
        /// The PDF the summary belongs to
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Markdown file to save (stdin if omitted or "-")
        #[arg(value_name = "MARKDOWN")]
        markdown: Option<PathBuf>,

        /// Summary directory
        #[arg(long, value_name = "DIR", default_value = "Summaries")]
        dir: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = NavOptions::default()
        .with_max_pages_per_read(cli.max_pages)
        .with_max_pages_per_section(cli.max_section_pages)
        .with_default_max_results(cli.max_results)
        .with_parallel(!cli.sequential);
    let json = cli.json;

    let result = match cli.command {
        Some(Commands::Info { input, output }) => {
            cmd_info(&navigator(options), &input, output.as_deref(), json)
        }
        Some(Commands::Toc { input, output }) => {
            cmd_toc(&navigator(options), &input, output.as_deref(), json)
        }
        Some(Commands::Pages {
            input,
            start,
            end,
            output,
        }) => cmd_pages(&navigator(options), &input, start, end, output.as_deref(), json),
        Some(Commands::Section {
            input,
            query,
            output,
        }) => cmd_section(&navigator(options), &input, &query, output.as_deref(), json),
        Some(Commands::Search {
            input,
            query,
            max,
            output,
        }) => cmd_search(&navigator(options), &input, &query, max, output.as_deref(), json),
        Some(Commands::Images {
            input,
            page,
            output,
            min_size,
        }) => {
            let nav = navigator(options.with_min_image_dimension(min_size));
            cmd_images(&nav, &input, page, output.as_deref(), json)
        }
        Some(Commands::Summary {
            input,
            markdown,
            dir,
        }) => {
            let nav = navigator(options.with_summary_dir(dir));
            cmd_summary(&nav, &input, markdown.as_deref())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfnav <COMMAND> <FILE> [ARGS]".yellow());
            println!("       pdfnav --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn navigator(options: NavOptions) -> Navigator {
    Navigator::new().with_options(options)
}

/// Write to `output` when given, stdout otherwise.
fn emit(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(
    nav: &Navigator,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = nav.info(input)?;
    let content = if json {
        to_json(&info, JsonFormat::Pretty)?
    } else {
        info.to_string()
    };
    emit(&content, output)
}

fn cmd_toc(
    nav: &Navigator,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let toc = nav.toc(input)?;
    let content = if json {
        to_json(&toc, JsonFormat::Pretty)?
    } else {
        toc.to_string()
    };
    emit(&content, output)
}

fn cmd_pages(
    nav: &Navigator,
    input: &Path,
    start: i64,
    end: Option<i64>,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let read = nav.read_pages(input, start, end)?;
    let content = if json {
        to_json(&read, JsonFormat::Pretty)?
    } else {
        read.to_string()
    };
    emit(&content, output)
}

fn cmd_section(
    nav: &Navigator,
    input: &Path,
    query: &str,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let section = nav.read_section(input, query)?;
    let content = if json {
        to_json(&section, JsonFormat::Pretty)?
    } else {
        section.to_string()
    };
    emit(&content, output)
}

fn cmd_search(
    nav: &Navigator,
    input: &Path,
    query: &str,
    max: Option<usize>,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = nav.search(input, query, max)?;
    let content = if json {
        to_json(&results, JsonFormat::Pretty)?
    } else {
        results.to_string()
    };
    emit(&content, output)
}

fn cmd_images(
    nav: &Navigator,
    input: &Path,
    page: i64,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = nav.page_images(input, page)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&images_json(&result)?)?);
    } else {
        println!("{}", result);
    }

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
        let mut count = 0;
        for image in result.images() {
            let path = dir.join(image_file_name(result.page(), image));
            fs::write(&path, &image.bytes)?;
            log::debug!("wrote {} ({} bytes)", path.display(), image.size());
            count += 1;
        }
        if count > 0 {
            println!(
                "{} {} image(s) to {}",
                "Saved".green(),
                count,
                dir.display()
            );
        }
    }

    Ok(())
}

/// JSON for a page's images with the encoded bytes inlined as base64.
fn images_json(result: &PageImages) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(result)?;
    if let Some(entries) = value.get_mut("images").and_then(Value::as_array_mut) {
        for (entry, image) in entries.iter_mut().zip(result.images()) {
            if let Some(obj) = entry.as_object_mut() {
                obj.insert("data".to_string(), Value::String(BASE64.encode(&image.bytes)));
            }
        }
    }
    Ok(value)
}

fn image_file_name(page: u32, image: &ExtractedImage) -> String {
    format!("page{}_image{}.{}", page, image.index, image.extension())
}

fn cmd_summary(
    nav: &Navigator,
    input: &Path,
    markdown: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match markdown {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let saved = nav.save_summary(input, &content)?;
    println!("{} {}", "Summary saved to".green(), saved.display());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfnav".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Incremental PDF navigation tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfnav".dimmed());
    println!("License: MIT");
}
