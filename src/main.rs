//! The `mathdollar` binary.

use mathdollar::nodes::NodeKind;
use mathdollar::transform::ArenaHost;
use mathdollar::{
    normalize_display_blocks, parse_document, replace_math, rst, scan, xml, Arena, ExclusionSet,
    Options, SegmentKind,
};

use std::error::Error;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

const EXIT_SUCCESS: i32 = 0;
const EXIT_PARSE_CONFIG: i32 = 2;
const EXIT_READ_INPUT: i32 = 3;

#[derive(Debug, Parser)]
#[command(about, author, version)]
#[command(
    after_help = "By default, mathdollar will attempt to read command-line options from a config file specified by --config-file.  This behaviour can be disabled by passing --config-file none.  It is not an error if the config file does not exist."
)]
struct Cli {
    /// File(s) to convert; or standard input if none passed
    #[arg(value_name = "FILE")]
    files: Option<Vec<PathBuf>>,

    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH", default_value = get_default_config_path())]
    config_file: String,

    /// Specify output format
    #[arg(short = 't', long = "to", value_enum, default_value_t = Format::Rst)]
    format: Format,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Node kinds whose text is never scanned for math, replacing the default set; 'none' to
    /// scan everything
    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "KIND",
        value_delimiter = ',',
        value_parser = parse_exclusion,
    )]
    exclude: Option<Vec<Exclusion>>,

    /// Leave \[ ... \] display blocks as they are
    #[arg(long)]
    no_display_blocks: bool,

    /// Log diagnostics to stderr (also enabled by setting MATH_DOLLAR_DEBUG)
    #[arg(long)]
    debug: bool,

    /// Include source positions in XML output
    #[arg(long)]
    sourcepos: bool,

    /// With --to segments, print only segments of this kind
    #[arg(long, value_name = "KIND", value_parser = parse_segment_kind)]
    only: Option<SegmentKind>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// reStructuredText, with :math: roles and .. math:: directives
    Rst,
    /// The document tree as pseudo-XML
    Xml,
    /// The raw tokenizer output, one segment per line
    Segments,
}

#[derive(Debug, Clone, Copy)]
struct Exclusion(Option<NodeKind>);

fn parse_exclusion(s: &str) -> Result<Exclusion, mathdollar::Error> {
    if s == "none" {
        return Ok(Exclusion(None));
    }
    s.parse().map(|kind| Exclusion(Some(kind)))
}

fn parse_segment_kind(s: &str) -> Result<SegmentKind, mathdollar::Error> {
    s.parse()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = {
        let cli = Cli::parse();
        if cli.config_file == "none" {
            cli
        } else {
            let mut args = std::env::args_os().collect::<Vec<_>>();
            if let Ok(config_args) = fs::read_to_string(&cli.config_file) {
                match shell_words::split(&config_args) {
                    Ok(parsed) => {
                        for (i, arg) in parsed.into_iter().enumerate() {
                            args.insert(i + 1, arg.into());
                        }
                    }
                    Err(e) => {
                        eprintln!("failed to parse {}: {}", cli.config_file, e);
                        process::exit(EXIT_PARSE_CONFIG);
                    }
                }
            }
            Cli::parse_from(args)
        }
    };

    let mut options = Options::from_env();
    options.parse.display_blocks = !cli.no_display_blocks;
    options.render.sourcepos = cli.sourcepos;
    if cli.debug {
        options.transform.diagnostics = true;
    }
    if let Some(ref exclude) = cli.exclude {
        options.transform.exclude = exclude.iter().filter_map(|e| e.0).collect::<ExclusionSet>();
    }

    if options.transform.diagnostics {
        init_tracing();
    }

    let mut s: Vec<u8> = Vec::with_capacity(2048);

    match cli.files {
        None => {
            io::stdin().read_to_end(&mut s)?;
        }
        Some(ref paths) => {
            for path in paths {
                match fs::File::open(path) {
                    Ok(mut io) => {
                        io.read_to_end(&mut s)?;
                    }
                    Err(e) => {
                        eprintln!("failed to read {}: {}", path.display(), e);
                        process::exit(EXIT_READ_INPUT);
                    }
                }
            }
        }
    };

    let input = String::from_utf8(s)?;
    let out = render(&input, &cli, &options)?;

    if let Some(output_filename) = cli.output {
        let mut bw = BufWriter::new(fs::File::create(output_filename)?);
        bw.write_all(out.as_bytes())?;
        bw.flush()?;
    } else {
        let stdout = io::stdout();
        let mut bw = BufWriter::new(stdout.lock());
        bw.write_all(out.as_bytes())?;
        bw.flush()?;
    };

    process::exit(EXIT_SUCCESS);
}

fn render(input: &str, cli: &Cli, options: &Options) -> Result<String, mathdollar::Error> {
    let mut out = String::new();

    if let Format::Segments = cli.format {
        let text = if options.parse.display_blocks {
            normalize_display_blocks(input)
        } else {
            input.into()
        };
        let mut segments = scan(&text);
        for segment in segments.by_ref() {
            if cli.only.map_or(true, |kind| kind == segment.kind) {
                out.push_str(&format!(
                    "{}\t{}..{}\t{:?}\n",
                    segment.kind, segment.span.start, segment.span.end, segment.content
                ));
            }
        }
        if options.transform.diagnostics {
            for diagnostic in segments.diagnostics() {
                tracing::warn!("{}", diagnostic);
            }
        }
        return Ok(out);
    }

    let arena = Arena::new();
    let root = parse_document(&arena, input, options);
    let report = replace_math(&ArenaHost::new(&arena, root), &options.transform);
    tracing::debug!(
        scanned = report.scanned,
        replaced = report.replaced,
        skipped = report.skipped,
        "math replaced"
    );

    match cli.format {
        Format::Xml => xml::format_document(root, options, &mut out)?,
        _ => rst::format_document(root, &mut out)?,
    }
    Ok(out)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mathdollar=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn get_default_config_path() -> String {
    if let Ok(xdg_dirs) = xdg::BaseDirectories::with_prefix("mathdollar") {
        if let Ok(path) = xdg_dirs.place_config_file("config") {
            if let Some(path_str) = path.to_str() {
                return path_str.into();
            }
        }
    }

    "mathdollar.config".into()
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn get_default_config_path() -> String {
    "mathdollar.config".into()
}
