//! CLI tool for inspecting XML documents through the simplexml tree.
//!
//! Parses each input file and either prints a debug view of the tree or
//! extracts a single value addressed by a dot path such as
//! `product.0.name` (tag names and sibling indices; a missing index means
//! the first sibling). Extracted values are printed with automatic type
//! coercion unless `--raw` is given.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use simplexml::{Node, ParseOptions};

/// sxmlget -- parse XML files and extract values by dot path.
#[derive(Parser, Debug)]
#[command(name = "sxmlget", version, about, long_about = None)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Extract the value at a dot path, e.g. `product.0.name`.
    #[arg(long, value_name = "PATH")]
    get: Option<String>,

    /// Print the extracted value without type coercion.
    #[arg(long)]
    raw: bool,

    /// Print a debug representation of the document tree.
    #[arg(long)]
    debug: bool,

    /// Print timing information for parsing.
    #[arg(long)]
    timing: bool,

    /// Maximum element nesting depth.
    #[arg(long, value_name = "N", default_value_t = 256)]
    max_depth: u32,
}

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_LOOKUP_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut worst_exit: u8 = EXIT_SUCCESS;

    for file in &cli.files {
        let exit = process_file(&cli, file);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str) -> u8 {
    let bytes = match read_input(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_PARSE_ERROR;
        }
    };

    let start_parse = Instant::now();
    let options = ParseOptions::default().max_depth(cli.max_depth);
    let root = match simplexml::parse_bytes_with_options(&bytes, &options) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{filename}: {e}");
            return EXIT_PARSE_ERROR;
        }
    };
    if cli.timing {
        eprintln!("Parsing {filename} took {:?}", start_parse.elapsed());
    }

    if let Some(ref path) = cli.get {
        return print_path(filename, &root, path, cli.raw);
    }

    if cli.debug {
        print!("{}", format_debug_tree(&root));
    } else {
        // Default: show the root tag and its immediate shape.
        println!("{filename}: <{}> with {} child(ren)", root.tag(), root.child_nodes().count());
    }
    EXIT_SUCCESS
}

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

/// Resolves a dot path against the tree and prints the addressed value.
fn print_path(filename: &str, root: &Node, path: &str, raw: bool) -> u8 {
    let node = match resolve_path(root, path) {
        Ok(node) => node,
        Err(msg) => {
            eprintln!("{filename}: {msg}");
            return EXIT_LOOKUP_ERROR;
        }
    };

    if raw {
        println!("{}", node.text());
        return EXIT_SUCCESS;
    }
    match node.value() {
        Ok(value) => {
            println!("{value}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("{filename}: {e}");
            EXIT_LOOKUP_ERROR
        }
    }
}

/// Walks a dot path of tag names and optional sibling indices.
///
/// `product.0.name` selects the first `product` child of the root, then the
/// first `name` child of that. An index segment applies to the preceding
/// tag segment; without one, index 0 is assumed.
fn resolve_path<'n>(root: &'n Node, path: &str) -> Result<&'n Node, String> {
    let mut current = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(format!("empty segment in path '{path}'"));
        }
        let siblings = current.children(segment);
        if siblings.is_empty() {
            return Err(format!("<{}> has no child named '{segment}'", current.tag()));
        }
        // Optional numeric index following the tag segment.
        let next_is_index = segments
            .peek()
            .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
        let index = if next_is_index {
            let next = segments.next().unwrap_or_default();
            next.parse::<usize>()
                .map_err(|_| format!("invalid index '{next}' in path '{path}'"))?
        } else {
            0
        };
        current = siblings.get(index).ok_or_else(|| {
            format!(
                "index {index} out of range: <{}> has {} '{segment}' child(ren)",
                current.tag(),
                siblings.len()
            )
        })?;
    }
    Ok(current)
}

/// Produces a textual debug representation of the tree.
fn format_debug_tree(root: &Node) -> String {
    let mut output = String::new();
    format_debug_node(root, 0, &mut output);
    output
}

/// Recursively formats a node for debug output.
fn format_debug_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str("ELEMENT ");
    out.push_str(node.tag());
    out.push('\n');
    for (name, value) in node.attributes() {
        let _ = writeln!(out, "{indent}  ATTRIBUTE {name}={value}");
    }
    if !node.text().is_empty() {
        let display = node.text().replace('\n', "\\n");
        let _ = writeln!(out, "{indent}  TEXT {display}");
    }
    for child in node.child_nodes() {
        format_debug_node(child, depth + 1, out);
    }
}
