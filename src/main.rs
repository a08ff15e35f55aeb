//! CLI for odftools - inspect, convert and rewrite ODF documents

use clap::{Parser, ValueEnum};
use odftools::discover::{list_documents, split_path_and_filter, DiscoverOptions};
use odftools::{container, ConvertOptions, Document, Error, OdfConverter, OutputFormat, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Text,
    Html,
    Xml,
    Odf,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files, directories or filters such as `docs/*.odt`
    #[arg(required_unless_present = "stdin")]
    inputs: Vec<String>,

    /// Read one document from stdin before the other inputs
    #[arg(short = 'i', long)]
    stdin: bool,

    /// Output format [default: text, or odf when --replace is given]
    #[arg(long, value_enum)]
    to: Option<Target>,

    /// Output file (single input document only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory to write all output files to
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Append the output format's extension to each output file name
    #[arg(long, conflicts_with = "extension_replace")]
    extension_append: bool,

    /// Replace the extension of each output file name
    #[arg(long)]
    extension_replace: bool,

    /// Replace text matching the SEARCH regex with REPLACEMENT
    #[arg(short, long, num_args = 2, value_names = ["SEARCH", "REPLACEMENT"])]
    replace: Option<Vec<String>>,

    /// Print the authors of all input documents
    #[arg(long)]
    list_authors: bool,

    /// Write embedded pictures matching FILTER to the output directory
    #[arg(long, value_name = "FILTER")]
    extract: Option<String>,

    /// Ignore case for every file name match
    #[arg(long)]
    ignore_case: bool,

    /// Search directories recursively
    #[arg(long)]
    recursive: bool,

    /// Maximum recursion level
    #[arg(long, value_name = "LEVEL", requires = "recursive")]
    max_depth: Option<usize>,

    /// Found files must match this pattern
    #[arg(long, value_name = "PATTERN")]
    include: Option<String>,

    /// Found files must not match this pattern
    #[arg(long, value_name = "PATTERN")]
    exclude: Option<String>,

    /// Keep blank lines in text output
    #[arg(long)]
    keep_blank_lines: bool,

    /// HTML title (default: the input file name)
    #[arg(long)]
    title: Option<String>,

    /// Encoding label for the XML declaration
    #[arg(long)]
    encoding: Option<String>,

    /// Overwrite existing output files
    #[arg(long)]
    force: bool,

    /// Print debug messages
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Name reported for the document read from stdin.
const STDIN_NAME: &str = "stdin";

/// A document to process: a package piped through stdin or a file on disk.
enum Input {
    Stdin(Vec<u8>),
    File(PathBuf),
}

impl Input {
    fn path(&self) -> &Path {
        match self {
            Input::Stdin(_) => Path::new(STDIN_NAME),
            Input::File(path) => path,
        }
    }

    fn load(&self) -> Result<Document> {
        match self {
            Input::Stdin(bytes) => container::loads(bytes),
            Input::File(path) => container::load(path),
        }
    }
}

/// Processes every discovered document. Returns false if any of them failed.
fn run(args: &Args) -> Result<bool> {
    let mut inputs = Vec::new();
    if args.stdin {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            warn!("No input file data on stdin (use `cat a.odt | odftools --stdin`)");
        } else {
            inputs.push(Input::Stdin(bytes));
        }
    }
    inputs.extend(discover(args)?.into_iter().map(Input::File));

    if inputs.is_empty() {
        eprintln!("No input files given or found.");
        return Ok(false);
    }
    if let Some(dir) = &args.directory {
        if !dir.is_dir() {
            return Err(Error::PathNotFound(dir.clone()));
        }
    }
    if args.output.is_some() && inputs.len() > 1 {
        eprintln!(
            "--output takes a single input document but {} were found; use --directory",
            inputs.len()
        );
        return Ok(false);
    }

    let target = match args.to {
        Some(target) => Some(target),
        None if args.replace.is_some() => Some(Target::Odf),
        None if args.list_authors || args.extract.is_some() => None,
        None => Some(Target::Text),
    };

    let mut authors: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut success = true;
    for input in &inputs {
        let file = input.path();
        debug!("Processing {}", file.display());
        match input.load().and_then(|document| process(args, target, file, document)) {
            Ok(author) => {
                if !author.is_empty() {
                    authors.entry(author).or_default().push(file.to_path_buf());
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", file.display(), e);
                success = false;
            }
        }
    }

    if args.list_authors {
        for (author, files) in &authors {
            println!("{}", author);
            for file in files {
                println!("  {}", file.display());
            }
        }
    }
    Ok(success)
}

fn discover(args: &Args) -> Result<Vec<PathBuf>> {
    let options = DiscoverOptions {
        ignore_case: args.ignore_case,
        recursive: args.recursive,
        max_depth: args.max_depth,
        include: args.include.clone(),
        exclude: args.exclude.clone(),
    };

    let mut files = Vec::new();
    for input in &args.inputs {
        if Path::new(input).is_file() {
            files.push(PathBuf::from(input));
            continue;
        }
        match split_path_and_filter(input, true) {
            Ok((dir, filter)) => files.extend(list_documents(&dir, &filter, &options)?),
            Err(Error::PathNotFound(path)) => {
                warn!(
                    "Skipping input {}: path does not exist: {}",
                    input,
                    path.display()
                );
            }
            Err(e) => return Err(e),
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Runs the requested actions on one document and returns its author.
fn process(
    args: &Args,
    target: Option<Target>,
    file: &Path,
    mut document: Document,
) -> Result<String> {
    if let Some([search, replacement]) = args.replace.as_deref() {
        let changed = document.replace(search, replacement);
        info!("Replaced text in {} node(s) of {}", changed, file.display());
    }

    if let Some(filter) = &args.extract {
        extract(args, &document, filter)?;
    }

    match target {
        None => {}
        Some(Target::Odf) => {
            let extension = match file.extension().and_then(|ext| ext.to_str()) {
                Some(ext) => ext,
                None if !document.extension().is_empty() => document.extension(),
                None => "odf",
            };
            let Some(dest) = destination(args, file, extension, false) else {
                warn!("No output file for {}", file.display());
                return Ok(document.author());
            };
            if dest == file && !args.force {
                warn!(
                    "Not overwriting input file {} (pass --force to allow)",
                    file.display()
                );
            } else if dest != file && dest.exists() && !args.force {
                warn!("Skipping already existing output file {}", dest.display());
            } else {
                container::dump(&document, &dest)?;
                info!("Wrote {}", dest.display());
            }
        }
        Some(target) => {
            let format = match target {
                Target::Html => OutputFormat::Html,
                Target::Xml => OutputFormat::Xml,
                _ => OutputFormat::Text,
            };
            let options = ConvertOptions {
                skip_blank_lines: !args.keep_blank_lines,
                html_title: args.title.clone().unwrap_or_else(|| file_name(file)),
                xml_encoding: args.encoding.clone(),
                ..Default::default()
            };
            let output = OdfConverter::new(options).convert_document(&document, format)?;

            match destination(args, file, format.extension(), true) {
                Some(dest) if dest == file => {
                    warn!("Cannot overwrite input file {} with {:?} output", file.display(), format);
                }
                Some(dest) => write_output(&dest, output.as_bytes(), args.force)?,
                None => println!("{}", output),
            }
        }
    }

    Ok(document.author())
}

fn extract(args: &Args, document: &Document, filter: &str) -> Result<()> {
    let dir = args.directory.clone().unwrap_or_else(|| PathBuf::from("."));
    for (name, data) in document.embedded_objects(Some(filter), args.ignore_case)? {
        let Some(dest) = enclosed_path(&dir, name) else {
            warn!("Skipping embedded object with unsafe name {:?}", name);
            continue;
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(Error::Write)?;
        }
        write_output(&dest, data, args.force)?;
    }
    Ok(())
}

/// Joins an archive member name onto `dir`, or `None` if the name could
/// resolve outside of it.
fn enclosed_path(dir: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    (plain && !name.is_empty()).then(|| dir.join(relative))
}

/// Output path for `file` converted to `extension`; `None` means stdout for
/// text output and no destination for packages.
fn destination(args: &Args, file: &Path, extension: &str, text: bool) -> Option<PathBuf> {
    let renamed = args.extension_append || args.extension_replace;
    let base = match (&args.output, &args.directory) {
        (Some(output), _) => output.clone(),
        (None, Some(dir)) => dir.join(file.file_name()?),
        (None, None) if text && !renamed => return None,
        (None, None) => file.to_path_buf(),
    };
    let dest = if args.extension_append {
        append_extension(&base, extension)
    } else if args.extension_replace || (text && args.output.is_none()) {
        base.with_extension(extension)
    } else {
        base
    };
    Some(dest)
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn write_output(dest: &Path, data: &[u8], force: bool) -> Result<()> {
    if dest.exists() && !force {
        warn!("Skipping already existing output file {}", dest.display());
        return Ok(());
    }
    fs::write(dest, data).map_err(Error::Write)?;
    info!("Wrote {}", dest.display());
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
