use std::path::{Path, PathBuf};
use std::process::ExitCode;

use comic_convert::config;
use comic_convert::config::options::{ConvertOptions, OutputFormat};
use comic_convert::pipeline::batch::{self, CancelFlag};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: comic_convert <input_file_or_directory> [output_directory] [options]");
    eprintln!("Options:");
    eprintln!("  --cbz                Create a CBZ (Comic Book Archive) file from the extracted images");
    eprintln!("  --clean              Remove individual image files after creating CBZ (requires --cbz)");
    eprintln!("  --format <format>    Output format: png or jpeg (default: jpeg)");
    eprintln!("  --quality <1-100>    JPEG quality (default: 80, ignored for PNG)");
    eprintln!("  --dpi <value>        DPI for page extraction (default: 150)");
    eprintln!("  --pdf                Convert CBZ archives to PDF documents (JPEG pages only)");
    eprintln!("  --settings <path>    Settings YAML overriding the built-in defaults");
    eprintln!("Examples:");
    eprintln!("  comic_convert document.pdf ./extracted_images");
    eprintln!("  comic_convert /path/to/pdfs/ ./converted_comics --cbz --clean");
    eprintln!("  comic_convert document.pdf ./output --format png --dpi 300");
    eprintln!("  comic_convert comic.cbz ./output --pdf");
}

struct CliArgs {
    input_path: PathBuf,
    output_dir: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    create_cbz: bool,
    clean_images: bool,
    to_pdf: bool,
    format: Option<OutputFormat>,
    quality: Option<u8>,
    dpi: Option<u32>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut settings_path = None;
    let mut create_cbz = false;
    let mut clean_images = false;
    let mut to_pdf = false;
    let mut format = None;
    let mut quality = None;
    let mut dpi = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--cbz" => create_cbz = true,
            "--clean" => clean_images = true,
            "--pdf" => to_pdf = true,
            "--format" => {
                let value = iter.next().ok_or("--format requires a value")?;
                format = Some(
                    OutputFormat::parse(value)
                        .ok_or_else(|| format!("format must be 'png' or 'jpeg', got '{value}'"))?,
                );
            }
            "--quality" => {
                let value = iter.next().ok_or("--quality requires a value")?;
                quality = Some(
                    value
                        .parse::<u8>()
                        .map_err(|_| format!("invalid quality value '{value}'"))?,
                );
            }
            "--dpi" => {
                let value = iter.next().ok_or("--dpi requires a value")?;
                dpi = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| format!("invalid dpi value '{value}'"))?,
                );
            }
            "--settings" => {
                let value = iter.next().ok_or("--settings requires a value")?;
                settings_path = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{other}'"));
            }
            other => positional.push(PathBuf::from(other)),
        }
    }

    if positional.is_empty() {
        return Err("missing input path".to_owned());
    }
    if positional.len() > 2 {
        return Err("too many positional arguments".to_owned());
    }

    let input_path = positional.remove(0);
    let output_dir = positional.pop();

    Ok(CliArgs {
        input_path,
        output_dir,
        settings_path,
        create_cbz,
        clean_images,
        to_pdf,
        format,
        quality,
        dpi,
    })
}

fn extension_matches(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// Resolve the list of input files for the batch: a matching single file,
/// or a directory scan for the mode's extension.
fn discover_inputs(input_path: &Path, to_pdf: bool) -> Result<Vec<PathBuf>, String> {
    let (extension, kind) = if to_pdf { ("cbz", "CBZ") } else { ("pdf", "PDF") };

    if input_path.is_dir() {
        let finder = if to_pdf {
            batch::find_cbz_files
        } else {
            batch::find_pdf_files
        };
        let files = finder(input_path)
            .map_err(|e| format!("cannot read directory {}: {e}", input_path.display()))?;
        if files.is_empty() {
            return Err(format!(
                "no {kind} files found in directory: {}",
                input_path.display()
            ));
        }
        Ok(files)
    } else if input_path.is_file() {
        if !extension_matches(input_path, extension) {
            return Err(format!(
                "input file is not a {kind}: {}",
                input_path.display()
            ));
        }
        Ok(vec![input_path.to_path_buf()])
    } else {
        Err(format!(
            "input path does not exist or is not accessible: {}",
            input_path.display()
        ))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("comic_convert {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("ERROR: {e}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let settings = match config::load_settings(cli.settings_path.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = ConvertOptions {
        format: cli.format.unwrap_or(settings.format),
        quality: cli.quality.unwrap_or(settings.quality),
        dpi: cli.dpi.unwrap_or(settings.dpi),
        create_cbz: cli.create_cbz,
        clean_images: cli.clean_images,
        to_pdf: cli.to_pdf,
    };

    // Option validation happens before any input is touched.
    if let Err(e) = options.validate() {
        eprintln!("ERROR: {e}");
        return ExitCode::FAILURE;
    }

    let input_files = match discover_inputs(&cli.input_path, options.to_pdf) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output_dir = cli.output_dir.unwrap_or_else(|| settings.output_dir.clone());

    let summary = batch::run_batch(&input_files, &output_dir, &options, &CancelFlag::new());

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
