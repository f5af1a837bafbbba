use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use nested_form::{DecodeOptions, FormData, Payload, Value};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "nested-form",
    version,
    about = "Decode bracket-notation form keys into nested JSON"
)]
struct Args {
    /// Input file path (.json or urlencoded form). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Input format (default: auto-detected from extension, then content).
    #[arg(short, long, value_enum, value_name = "format")]
    format: Option<InputFormat>,

    /// Indentation size; 0 prints compact JSON (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Decode empty strings to null.
    #[arg(long = "no-allow-blank", action = ArgAction::SetFalse, default_value_t = true)]
    allow_blank: bool,

    /// Keep empty arrays and objects instead of decoding them to null.
    #[arg(long)]
    allow_empty: bool,

    /// Fail when the input has no nested keys instead of echoing it back.
    #[arg(long)]
    strict: bool,

    /// Only check whether the input is nested; exit status 0 when it is.
    #[arg(long, conflicts_with = "output")]
    check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Form,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR  {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let format = resolve_format(args.format, &input_source, &input_text);
    tracing::debug!(?format, ?input_source, "read input");
    let payload = parse_payload(&input_text, format)?;

    if args.check {
        return Ok(if nested_form::is_nested(payload) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let options = DecodeOptions::new()
        .with_allow_blank(args.allow_blank)
        .with_allow_empty(args.allow_empty);
    let value = if args.strict {
        nested_form::decode_with_options(payload, &options)?
    } else {
        nested_form::resolve_with_options(payload, &options)?
    };

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        write_json(writer, &value, args.indent)
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(&input_source, path);
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve_format(explicit: Option<InputFormat>, source: &InputSource, input: &str) -> InputFormat {
    if let Some(format) = explicit {
        return format;
    }
    if let InputSource::File(path) = source {
        let ext = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => return InputFormat::Json,
            Some("form" | "urlencoded") => return InputFormat::Form,
            _ => {}
        }
    }
    match input.trim_start().as_bytes().first() {
        Some(b'{' | b'[') => InputFormat::Json,
        _ => InputFormat::Form,
    }
}

fn parse_payload(input: &str, format: InputFormat) -> Result<Payload, Box<dyn Error>> {
    match format {
        InputFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(input)?;
            Ok(Payload::from(value))
        }
        InputFormat::Form => {
            let pairs = url::form_urlencoded::parse(input.trim().as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()));
            Ok(Payload::Flat(FormData::from_pairs(pairs)))
        }
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json(writer: &mut dyn Write, value: &Value, indent: usize) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn report_status(input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    println!("✔ Decoded {input_label} → {output_path}");
}
