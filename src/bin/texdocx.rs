//! texdocx CLI - Export mixed text/LaTeX to styled HTML and Word documents

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use texdocx::{
    diagnostics::{check_document, format_diagnostics},
    segment,
    utils::config::load_options_from_toml,
    ConversionWarning, ExportOptions, Exporter, OutputStyle,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texdocx")]
#[command(version)]
#[command(about = "texdocx - Export mixed text/LaTeX as styled HTML and Word documents", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Subcommand to run (defaults to `export`)
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    export: ExportArgs,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Strict mode: exit with error if any formula could not be rendered
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Args, Clone)]
struct ExportArgs {
    /// Input file path (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output style (standard, minimal, worksheet, notes, two-column,
    /// landscape, large-print, draft, flashcards)
    #[arg(short, long, value_parser = parse_style)]
    style: Option<OutputStyle>,

    /// Treat text as HTML and pass it through untouched
    #[arg(long)]
    rich: bool,

    /// Document title
    #[arg(short, long)]
    title: Option<String>,

    /// TOML file with export options (flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Export a `.docx` file (default action)
    Export(ExportArgs),

    /// Write the HTML preview document
    Html(ExportArgs),

    /// Print the text/math segments as JSON
    Segments {
        /// Input file path
        input: Option<PathBuf>,
    },

    /// Check every formula for problems
    Check {
        /// Input file to check
        input: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List the output styles and their layouts
    Styles,

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn parse_style(s: &str) -> Result<OutputStyle, String> {
    s.parse::<OutputStyle>().map_err(|e| e.to_string())
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        None => run_export(&cli.export, cli.quiet, cli.strict),
        Some(Commands::Export(ref args)) => run_export(args, cli.quiet, cli.strict),
        Some(Commands::Html(ref args)) => run_html(args, cli.quiet, cli.strict),
        Some(Commands::Segments { ref input }) => {
            let content = read_input(input.as_deref())?;
            let json = serde_json::to_string_pretty(&segment(&content))
                .map_err(io::Error::other)?;
            println!("{}", json);
            Ok(())
        }
        Some(Commands::Check {
            ref input,
            no_color,
        }) => run_check(input.as_deref(), !no_color),
        Some(Commands::Styles) => {
            print_styles();
            Ok(())
        }
        Some(Commands::Info) => {
            print_info();
            Ok(())
        }
    }
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Config file first, then command-line flags on top
#[cfg(feature = "cli")]
fn resolve_options(args: &ExportArgs) -> ExportOptions {
    let mut options = match args.config {
        Some(ref path) => match load_options_from_toml(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
        None => ExportOptions::default(),
    };

    if let Some(style) = args.style {
        options.style = style;
    }
    if args.rich {
        options.rich_text = true;
    }
    if let Some(ref title) = args.title {
        options.title = Some(title.clone());
    }
    options
}

#[cfg(feature = "cli")]
fn run_export(args: &ExportArgs, quiet: bool, strict: bool) -> io::Result<()> {
    let output = match (&args.output, &args.input) {
        (Some(path), _) => path.clone(),
        (None, Some(input)) => input.with_extension("docx"),
        (None, None) => {
            eprintln!("Error: an output path (-o) is required when reading from stdin");
            std::process::exit(2);
        }
    };

    let content = read_input(args.input.as_deref())?;
    let options = resolve_options(args);

    let result = match Exporter::default().export_with_warnings(&content, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    report_warnings(&result.warnings, quiet, strict);

    fs::write(&output, &result.bytes)?;
    if result.warnings.is_empty() {
        eprintln!("✓ Output written to: {}", output.display());
    } else {
        eprintln!(
            "⚠ Output written to: {} ({} warning(s))",
            output.display(),
            result.warnings.len()
        );
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn run_html(args: &ExportArgs, quiet: bool, strict: bool) -> io::Result<()> {
    let content = read_input(args.input.as_deref())?;
    let options = resolve_options(args);
    let result = Exporter::default().render(&content, &options);

    report_warnings(&result.warnings, quiet, strict);

    match args.output {
        Some(ref path) => {
            let mut file = fs::File::create(path)?;
            file.write_all(result.document.html.as_bytes())?;
            eprintln!("✓ Output written to: {}", path.display());
        }
        None => {
            print!("{}", result.document.html);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn run_check(input: Option<&Path>, use_color: bool) -> io::Result<()> {
    let content = read_input(input)?;
    let findings = check_document(&content);

    println!("{}", format_diagnostics(&findings, use_color));

    if findings.iter().any(|(_, _, result)| result.has_errors()) {
        std::process::exit(1);
    }
    Ok(())
}

/// Print warnings to stderr (unless quiet) and stop in strict mode
#[cfg(feature = "cli")]
fn report_warnings(warnings: &[ConversionWarning], quiet: bool, strict: bool) {
    if !quiet && !warnings.is_empty() {
        eprintln!();
        eprintln!("\x1b[33mExport Warnings ({}):\x1b[0m", warnings.len());
        eprintln!();
        for warning in warnings {
            eprintln!("  {}", warning);
            if let Some(ref suggestion) = warning.suggestion {
                eprintln!("    hint: {}", suggestion);
            }
        }
        eprintln!();
    }

    if strict && !warnings.is_empty() {
        eprintln!("Error: {} export warning(s) in strict mode", warnings.len());
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn print_styles() {
    for style in OutputStyle::ALL {
        let layout = style.layout();
        let m = &layout.margins;
        println!("{:<12} {}", style.name(), style.description());
        println!(
            "             margins {}/{}/{}/{} in, {:?}, {}pt {:?}, line height {}, {} column(s), accents {}",
            m.top,
            m.right,
            m.bottom,
            m.left,
            layout.orientation,
            layout.font_size_pt,
            layout.font_family,
            layout.line_height,
            layout.columns,
            if layout.accent_colors { "on" } else { "off" }
        );
    }
}

#[cfg(feature = "cli")]
fn print_info() {
    println!("texdocx - Export mixed text/LaTeX as styled HTML and Word documents");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Features:");
    println!("  ✓ Lossless text/math segmentation ($$, \\[, \\(, $)");
    println!("  ✓ Nine output styles");
    println!("  ✓ Section and sub-item highlighting (Câu/Bài, a) b) c))");
    println!("  ✓ LaTeX → MathML rendering");
    println!("  ✓ .docx export (altChunk)");
    println!("  ✓ Formula diagnostics");
    println!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texdocx --features cli");
    eprintln!("  texdocx [OPTIONS] [INPUT_FILE]");
}
