//! idmlpack - Lay out article HTML as an IDML package

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use idmlpack::{Article, FORMAT_TYPE, FormatterConfig, IdmlFormatter, format_article};

#[derive(Parser)]
#[command(name = "idmlpack")]
#[command(version, about = "Lay out article HTML as an IDML package", long_about = None)]
#[command(after_help = "EXAMPLES:
    idmlpack body.html article.idml           Format an HTML body
    idmlpack article.json article.idml        Format a JSON article record
    idmlpack -i body.html                     Show the layout without writing")]
struct Cli {
    /// Input file: an HTML body, or a JSON article with a `body_html` field
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output .idml file
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<PathBuf>,

    /// JSON file overriding layout settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Publish sequence number passed through to the output
    #[arg(long, default_value = "1000")]
    seq: String,

    /// Show spreads and frames without writing a package
    #[arg(short, long)]
    info: bool,

    /// Log pagination decisions
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = if cli.info {
        show_info(&cli)
    } else {
        convert(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FormatterConfig, String> {
    let Some(path) = path else {
        return Ok(FormatterConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn load_article(path: &Path) -> Result<Article, String> {
    let bytes = fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return serde_json::from_slice(&bytes).map_err(|e| format!("{}: {e}", path.display()));
    }

    let mut article = Article::new(idmlpack::util::decode_text(&bytes, None));
    article.guid = path.display().to_string();
    Ok(article)
}

fn formatter(cli: &Cli) -> Result<IdmlFormatter, String> {
    let config = load_config(cli.config.as_deref())?;
    Ok(IdmlFormatter::new().with_config(config))
}

fn show_info(cli: &Cli) -> Result<(), String> {
    let article = load_article(&cli.input)?;
    let package = formatter(cli)?
        .build_package(&article.body_html)
        .map_err(|e| e.to_string())?;

    println!("File: {}", cli.input.display());
    if let Some(ref headline) = article.headline {
        println!("Headline: {headline}");
    }
    for spread in package.spreads() {
        println!("{} ({} frames)", spread.filename(), spread.frames().len());
        for frame in spread.frames() {
            println!(
                "  {} -> {}  height {:.1}  at {}",
                frame.self_id, frame.parent_story, frame.height, frame.transform
            );
        }
    }
    println!("Entries: {}", package.len());

    Ok(())
}

fn convert(cli: &Cli) -> Result<(), String> {
    let Some(output) = cli.output.as_deref() else {
        return Err("an output file is required".to_string());
    };

    let article = load_article(&cli.input)?;
    let item = format_article(&formatter(cli)?, FORMAT_TYPE, &article, &cli.seq)
        .map_err(|e| e.to_string())?;
    fs::write(output, &item.encoded_item).map_err(|e| format!("{}: {e}", output.display()))?;

    if !cli.quiet {
        println!(
            "{} -> {} (seq {}, {} bytes)",
            cli.input.display(),
            output.display(),
            item.published_seq_num,
            item.encoded_item.len()
        );
    }
    Ok(())
}
