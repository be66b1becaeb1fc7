#![doc = include_str!("../README.md")]
//! jschema CLI tool
//!
//! Every subcommand reads its documents from files (or `-` for stdin),
//! reports problems on stderr with source context, and prints results on
//! stdout, as text or, with `--json`, as one JSON document.

use std::io::{self, Read};
use std::process::ExitCode;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand, ValueEnum};
use jschema::{
    BuildError, FormatOptions, JsonParser, Marker, MarkerMessage, ParseRequest, ParserOptions,
    PredictRequest, Severity, Style, StyleKind, Value, ariadne_config, compute_styles, get_errors,
    get_json_parser, parse_value, set_lang, stringify_value, stringify_with_options,
    to_json_value, to_serde, validate,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: u8 = 0;
const EXIT_SYNTAX_ERROR: u8 = 1;
const EXIT_VALIDATION_ERROR: u8 = 2;
const EXIT_IO_ERROR: u8 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

/// Check, validate, complete and format JSON documents against a JSON Schema.
#[derive(Parser, Debug)]
#[command(name = "jschema", version, about, long_about = None)]
struct Cli {
    /// Language for messages (`en`, `fr`, ...)
    #[arg(long, global = true, env = "JSCHEMA_LANG")]
    lang: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report syntax and schema problems with source context
    Check {
        /// Document to check
        file: String,

        /// Schema to validate against (default: accept anything)
        #[arg(long)]
        schema: Option<String>,

        /// What the document must be
        #[arg(long, value_enum, default_value_t = AxiomArg::Value)]
        axiom: AxiomArg,
    },

    /// Validate a document, listing errors, renderers and formats
    Validate {
        /// Schema file
        schema: String,

        /// Document to validate
        file: String,
    },

    /// Propose values for a node of a document
    Propose {
        /// Schema file
        schema: String,

        /// Document holding the node
        file: String,

        /// Dot-delimited path of the node (empty for the root)
        #[arg(long, default_value = "")]
        path: String,

        /// Depth below which proposed children are null (-1: node only)
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        depth: i32,
    },

    /// Complete a document at a byte offset
    Predict {
        /// Document to complete
        file: String,

        /// Cursor position, in bytes
        #[arg(long)]
        offset: usize,

        /// Schema to complete from (default: grammar only)
        #[arg(long)]
        schema: Option<String>,

        /// Depth for proposed values (-1: node only)
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        depth: i32,
    },

    /// Show highlighting spans
    Highlight {
        /// Document to highlight
        file: String,

        /// Print the document with terminal colors instead of the spans
        #[arg(long)]
        ansi: bool,
    },

    /// Reformat a document
    Fmt {
        /// Document to format
        file: String,

        /// Single-line output
        #[arg(long)]
        compact: bool,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<String>,

        /// Rewrite the input file
        #[arg(long)]
        in_place: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AxiomArg {
    Value,
    Object,
    Array,
}

impl AxiomArg {
    fn as_str(self) -> &'static str {
        match self {
            AxiomArg::Value => "value",
            AxiomArg::Object => "object",
            AxiomArg::Array => "array",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Some(lang) = &cli.lang {
        set_lang(lang);
    }
    debug!(command = ?cli.command, json = cli.json, "starting");

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            match &e {
                CliError::ParseDiagnostic {
                    error: BuildError::Syntax(parse_error),
                    source,
                    filename,
                } => parse_error.write_report(filename, source, io::stderr()),
                _ => eprintln!("error: {e}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<u8, CliError> {
    match &cli.command {
        Command::Check {
            file,
            schema,
            axiom,
        } => run_check(file, schema.as_deref(), *axiom, cli.json),
        Command::Validate { schema, file } => run_validate(schema, file, cli.json),
        Command::Propose {
            schema,
            file,
            path,
            depth,
        } => run_propose(schema, file, path, *depth, cli.json),
        Command::Predict {
            file,
            offset,
            schema,
            depth,
        } => run_predict(file, *offset, schema.as_deref(), *depth, cli.json),
        Command::Highlight { file, ansi } => run_highlight(file, *ansi, cli.json),
        Command::Fmt {
            file,
            compact,
            output,
            in_place,
        } => run_fmt(file, *compact, output.as_deref(), *in_place),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    ParseDiagnostic {
        error: BuildError,
        source: String,
        filename: String,
    },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::ParseDiagnostic { .. } => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_SYNTAX_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::ParseDiagnostic {
                error, filename, ..
            } => write!(f, "{filename}: {error}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

// ============================================================================
// Subcommand implementations
// ============================================================================

fn run_check(
    file: &str,
    schema: Option<&str>,
    axiom: AxiomArg,
    json_out: bool,
) -> Result<u8, CliError> {
    let parser = load_parser(schema, ParserOptions::new())?;
    let source = read_input(file)?;
    let result = parser.parse(&ParseRequest::new(&source).with_axiom(axiom.as_str()));
    if !result.success {
        let message = result.error.unwrap_or_default();
        return Err(CliError::Usage(format!("{}: {message}", display_name(file))));
    }

    if json_out {
        let markers: Vec<_> = result.markers.iter().map(marker_to_json).collect();
        println!("{}", json!({ "markers": markers }));
    } else {
        for marker in &result.markers {
            write_marker_report(marker, display_name(file), &source, io::stderr());
        }
    }

    Ok(check_exit_code(&result.markers))
}

fn run_validate(schema_file: &str, file: &str, json_out: bool) -> Result<u8, CliError> {
    let (_, schema) = load_document(schema_file)?;
    let (source, value) = load_document(file)?;
    let result = validate(&schema, &value);
    let errors = get_errors(&result, "");

    if json_out {
        let errors: Vec<_> = errors
            .iter()
            .map(|e| json!({ "path": e.path, "message": e.message }))
            .collect();
        let renderers: serde_json::Map<String, serde_json::Value> = result
            .renderers()
            .iter()
            .map(|(path, renderer)| {
                let metadata: serde_json::Map<String, serde_json::Value> = renderer
                    .metadata()
                    .map(|(key, value)| (key.to_string(), to_serde(value)))
                    .collect();
                (
                    path.clone(),
                    json!({ "key": renderer.key, "metadata": metadata }),
                )
            })
            .collect();
        let formats: serde_json::Map<String, serde_json::Value> = result
            .all_formats()
            .iter()
            .map(|(path, formats)| (path.clone(), json!(formats)))
            .collect();
        println!(
            "{}",
            json!({
                "valid": result.is_valid(),
                "errors": errors,
                "renderers": renderers,
                "formats": formats,
            })
        );
    } else {
        for error in &errors {
            println!("error {}: {}", display_path(&error.path), error.message);
        }
        for (path, renderer) in result.renderers() {
            println!("renderer {}: {}", display_path(path), renderer.key);
        }
        for (path, formats) in result.all_formats() {
            println!("format {}: {}", display_path(path), formats.join(", "));
        }
        if !result.is_valid() {
            result.write_report(display_name(file), &source, io::stderr());
        }
    }

    if result.is_valid() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_VALIDATION_ERROR)
    }
}

fn run_propose(
    schema_file: &str,
    file: &str,
    path: &str,
    depth: i32,
    json_out: bool,
) -> Result<u8, CliError> {
    let (_, schema) = load_document(schema_file)?;
    let (_, value) = load_document(file)?;
    let result = validate(&schema, &value);
    let proposals = jschema::propose(&result, path, depth);
    debug!(path, depth, count = proposals.len(), "proposed");

    if json_out {
        let proposals: Vec<_> = proposals.iter().map(to_json_value).collect();
        println!("{}", json!({ "path": path, "proposals": proposals }));
    } else {
        for proposal in &proposals {
            println!("{}", stringify_value(proposal));
        }
    }
    Ok(EXIT_SUCCESS)
}

fn run_predict(
    file: &str,
    offset: usize,
    schema: Option<&str>,
    depth: i32,
    json_out: bool,
) -> Result<u8, CliError> {
    let parser = load_parser(schema, ParserOptions::new().proposal_depth(depth))?;
    let source = read_input(file)?;
    let result = parser.predict(&PredictRequest::new(&source, offset));
    if !result.success {
        return Err(CliError::Usage(result.error.unwrap_or_default()));
    }

    if json_out {
        let proposals: Vec<_> = result
            .proposals
            .iter()
            .map(|p| {
                json!({
                    "text": p.text,
                    "replace": p.replace.map(|span| json!({ "start": span.start, "end": span.end })),
                })
            })
            .collect();
        println!("{}", json!({ "proposals": proposals }));
    } else {
        for proposal in &result.proposals {
            match proposal.replace {
                Some(span) => println!("{}\t{}..{}", proposal.text, span.start, span.end),
                None => println!("{}", proposal.text),
            }
        }
    }
    Ok(EXIT_SUCCESS)
}

fn run_highlight(file: &str, ansi: bool, json_out: bool) -> Result<u8, CliError> {
    let source = read_input(file)?;
    let styles = compute_styles(&source);

    if json_out {
        let styles: Vec<_> = styles
            .iter()
            .map(|s| json!({ "offset": s.offset, "length": s.length, "kind": s.name() }))
            .collect();
        println!("{}", json!({ "styles": styles }));
    } else if ansi {
        print!("{}", highlight_json(&source, &styles));
    } else {
        for style in &styles {
            println!("{}\t{}\t{}", style.offset, style.length, style.name());
        }
    }
    Ok(EXIT_SUCCESS)
}

fn run_fmt(
    file: &str,
    compact: bool,
    output: Option<&str>,
    in_place: bool,
) -> Result<u8, CliError> {
    let (_, value) = load_document(file)?;
    let options = if compact {
        FormatOptions::new().compact()
    } else {
        FormatOptions::new().pretty()
    };
    let mut formatted = stringify_with_options(&value, &options);
    formatted.push('\n');

    if in_place {
        if file == "-" {
            return Err(CliError::Usage("--in-place needs a file, not stdin".into()));
        }
        std::fs::write(file, &formatted)?;
    } else {
        write_output(output.unwrap_or("-"), &formatted)?;
    }
    Ok(EXIT_SUCCESS)
}

// ============================================================================
// Loading
// ============================================================================

/// Read and parse a document, keeping the source for reports.
fn load_document(file: &str) -> Result<(String, Value), CliError> {
    let source = read_input(file)?;
    match parse_value(&source) {
        Ok(value) => Ok((source, value)),
        Err(error) => Err(CliError::ParseDiagnostic {
            error,
            source,
            filename: display_name(file).to_string(),
        }),
    }
}

fn load_parser(schema: Option<&str>, options: ParserOptions) -> Result<JsonParser, CliError> {
    let schema = match schema {
        Some(file) => load_document(file)?.1,
        None => Value::object(Vec::<(String, Value)>::new()),
    };
    Ok(get_json_parser(schema).with_options(options))
}

fn read_input(file: &str) -> Result<String, io::Error> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

fn write_output(path: &str, content: &str) -> Result<(), io::Error> {
    if path == "-" {
        print!("{content}");
        Ok(())
    } else {
        std::fs::write(path, content)
    }
}

fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "(root)" } else { path }
}

// ============================================================================
// Markers
// ============================================================================

/// Syntax errors win over validation errors; warnings do not fail.
fn check_exit_code(markers: &[Marker]) -> u8 {
    let errors = markers.iter().filter(|m| m.severity == Severity::Error);
    let mut code = EXIT_SUCCESS;
    for marker in errors {
        match marker.message {
            MarkerMessage::Syntax(_) => return EXIT_SYNTAX_ERROR,
            MarkerMessage::Validation(_) => code = EXIT_VALIDATION_ERROR,
        }
    }
    code
}

fn marker_to_json(marker: &Marker) -> serde_json::Value {
    json!({
        "offset": marker.offset,
        "length": marker.length,
        "severity": marker.severity.as_str(),
        "message": marker.message(),
    })
}

fn write_marker_report<W: io::Write>(marker: &Marker, filename: &str, source: &str, writer: W) {
    let start = marker.offset as usize;
    let range = start..start + marker.length as usize;
    let (kind, color) = match marker.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
        Severity::Info => (ReportKind::Advice, Color::Blue),
    };
    let label = match marker.message {
        MarkerMessage::Syntax(_) => "syntax",
        MarkerMessage::Validation(_) => "schema",
    };
    let message = marker.message();
    let _ = Report::build(kind, (filename, range.clone()))
        .with_message(message)
        .with_label(
            Label::new((filename, range))
                .with_message(label)
                .with_color(color),
        )
        .with_config(ariadne_config())
        .finish()
        .write((filename, Source::from(source)), writer);
}

// ============================================================================
// Highlighting for terminal output
// ============================================================================

/// ANSI color codes for style kinds
mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const STRING: &str = "\x1b[38;5;214m"; // Orange
    pub const NUMBER: &str = "\x1b[38;5;141m"; // Purple
    pub const KEYWORD: &str = "\x1b[38;5;203m"; // Red
    pub const PROPERTY: &str = "\x1b[38;5;75m"; // Blue
}

fn ansi_color_for_style(kind: StyleKind) -> &'static str {
    match kind {
        StyleKind::Property => ansi::PROPERTY,
        StyleKind::String => ansi::STRING,
        StyleKind::Number => ansi::NUMBER,
        StyleKind::Keyword => ansi::KEYWORD,
    }
}

/// Wrap each styled span of `source` in ANSI color codes.
fn highlight_json(source: &str, styles: &[Style]) -> String {
    let mut result = String::with_capacity(source.len() * 2);
    let mut last_end = 0;

    for style in styles {
        let start = style.offset as usize;
        let end = start + style.length as usize;
        if start > last_end {
            result.push_str(&source[last_end..start]);
        }
        result.push_str(ansi_color_for_style(style.kind));
        result.push_str(&source[start..end]);
        result.push_str(ansi::RESET);
        last_end = end;
    }

    if last_end < source.len() {
        result.push_str(&source[last_end..]);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["jschema", "validate", "s.json", "d.json"]).unwrap();
        assert!(matches!(cli.command, Command::Validate { .. }));
        assert!(!cli.json);

        let cli = Cli::try_parse_from([
            "jschema", "propose", "s.json", "d.json", "--path", "a.b", "--depth", "-1", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Propose { path, depth, .. } => {
                assert_eq!(path, "a.b");
                assert_eq!(depth, -1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.json);
    }

    #[test]
    fn test_cli_axiom_and_conflicts() {
        let cli =
            Cli::try_parse_from(["jschema", "check", "d.json", "--axiom", "object"]).unwrap();
        match cli.command {
            Command::Check { axiom, schema, .. } => {
                assert_eq!(axiom.as_str(), "object");
                assert_eq!(schema, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(
            Cli::try_parse_from(["jschema", "fmt", "d.json", "-o", "x.json", "--in-place"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["jschema", "predict", "d.json"]).is_err());
    }

    #[test]
    fn test_check_exit_code() {
        let parser = get_json_parser(parse_value(r#"{"type": "object"}"#).unwrap());

        let result = parser.parse(&ParseRequest::new("{}"));
        assert_eq!(check_exit_code(&result.markers), EXIT_SUCCESS);

        let result = parser.parse(&ParseRequest::new("[]"));
        assert_eq!(check_exit_code(&result.markers), EXIT_VALIDATION_ERROR);

        let result = parser.parse(&ParseRequest::new("[1,]"));
        assert_eq!(check_exit_code(&result.markers), EXIT_SYNTAX_ERROR);

        let result = parser.parse(&ParseRequest::new(r#"{"a": 1, "a": 2}"#));
        assert_eq!(check_exit_code(&result.markers), EXIT_SUCCESS);
    }

    #[test]
    fn test_marker_report_mentions_message() {
        let source = "true";
        let parser = get_json_parser(parse_value(r#"{"type": "string"}"#).unwrap())
            .with_options(ParserOptions::new().lang("en"));
        let result = parser.parse(&ParseRequest::new(source));
        let mut out = Vec::new();
        write_marker_report(&result.markers[0], "doc.json", source, &mut out);
        let text = strip(&String::from_utf8(out).unwrap());
        assert!(text.contains("Invalid type: expected string"), "{text}");
        assert!(text.contains("doc.json"), "{text}");
    }

    #[test]
    fn test_highlight_preserves_content() {
        let source = "{\"name\": [1, true, \"x\"]}\n";
        let highlighted = highlight_json(source, &compute_styles(source));
        assert!(highlighted.contains(ansi::PROPERTY));
        assert!(highlighted.contains(ansi::NUMBER));
        assert!(highlighted.contains(ansi::KEYWORD));
        assert!(highlighted.contains(ansi::STRING));
        assert_eq!(strip(&highlighted), source);
    }

    #[test]
    fn test_highlight_empty_source() {
        assert_eq!(highlight_json("", &compute_styles("")), "");
        assert_eq!(highlight_json("  \n", &compute_styles("  \n")), "  \n");
    }
}
