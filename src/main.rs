use anyhow::{Context, Result};
use clap::Parser;
use mlinvert::{
    invert,
    load::{self, DEFAULT_ENCODING_LABEL},
    preset::PresetBook,
    render::{self, DisplayHeaders, Format},
    InvertError,
};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Invert a CSV of lists and their newline-separated members into
/// member → lists.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV file to read
    #[arg(required_unless_present = "list_presets")]
    file: Option<PathBuf>,

    /// Named column preset
    #[arg(short, long)]
    preset: Option<String>,

    /// Key column name (overrides the preset)
    #[arg(short, long)]
    key: Option<String>,

    /// Value column name (overrides the preset)
    #[arg(short, long)]
    value: Option<String>,

    /// YAML file with presets, replacing the built-in ones
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Input encoding label; a BOM takes precedence
    #[arg(short, long, default_value = DEFAULT_ENCODING_LABEL)]
    encoding: String,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title of the member column in text/CSV output
    #[arg(long)]
    member_header: Option<String>,

    /// Title of the keys column in text/CSV output
    #[arg(long)]
    keys_header: Option<String>,

    /// Print the known presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // ─── 2) column presets ───────────────────────────────────────────
    let book = match &args.presets {
        Some(path) => PresetBook::from_yaml_file(path)?,
        None => PresetBook::default(),
    };
    if args.list_presets {
        for p in &book.presets {
            let marker = if p.name == book.default { "*" } else { " " };
            println!("{} {}\t{}\t{}", marker, p.name, p.key, p.value);
        }
        return Ok(());
    }
    let spec = book.resolve(args.preset.as_deref(), args.key, args.value)?;
    info!(
        key = %spec.key,
        value = %spec.value,
        preset = book.matching(&spec).unwrap_or("<custom>"),
        "columns"
    );

    // ─── 3) load & invert ────────────────────────────────────────────
    let file = args.file.context("no input file given")?;
    let encoding = load::encoding_for_label(&args.encoding)?;
    let table = load::load_table(&file, encoding)?;
    let inverted = invert(&table, &spec)?;
    info!(rows = table.rows.len(), members = inverted.len(), "inverted");

    // ─── 4) render ───────────────────────────────────────────────────
    let defaults = DisplayHeaders::default();
    let headers = DisplayHeaders {
        member: args.member_header.unwrap_or(defaults.member),
        keys: args.keys_header.unwrap_or(defaults.keys),
    };
    let out = render::render(&inverted, args.format, &headers)?;
    match &args.output {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("writing {:?}", path))?;
            info!(path = %path.display(), "wrote result");
        }
        None => print!("{}", out),
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<InvertError>() {
        Some(InvertError::ColumnNotFound {
            which,
            searched,
            available,
        }) => {
            error!(column = %which, searched = %searched, "column not found");
            eprintln!("Could not find the {} column `{}`.", which, searched);
            eprintln!("Pick the {} column with --{} from:", which, which);
            for name in available {
                eprintln!("  {}", name);
            }
        }
        Some(InvertError::DownstreamParseFailure { message }) => {
            error!(%message, "CSV parse failed");
            eprintln!("Could not parse the CSV file: {}", message);
        }
        None => {
            error!("{:#}", err);
        }
    }
}
