use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::Level;

const USAGE: &str = "Usage: sdc-cli <input-path> <output-path>";

#[derive(Parser, Debug)]
#[command(
    name = "sdc-cli",
    about = "Convert documents between JSON, YAML and XML (format follows the file extension)",
    version
)]
struct Cli {
    /// Source document (.json, .yml, .yaml or .xml)
    #[arg(allow_hyphen_values = true)]
    input: PathBuf,
    /// Destination document (.json, .yml, .yaml or .xml)
    #[arg(allow_hyphen_values = true)]
    output: PathBuf,
    /// Indentation width for JSON and XML output (0 = compact)
    #[arg(long, value_name = "N")]
    indent: Option<usize>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            println!("{}", USAGE);
            std::process::exit(1);
        }
    });
    init_logging(cli.verbose);

    let req = sdc_core::ConversionRequest::new(&cli.input, &cli.output).unwrap_or_else(|e| {
        tracing::debug!("rejected request: {}", e);
        println!("{}", sdc_core::SUPPORTED_FORMATS_MSG);
        std::process::exit(1);
    });

    let mut opts = sdc_core::ConvertOpts::default();
    if let Some(n) = cli.indent {
        opts.json_indent = n;
        opts.xml_indent = n;
    }
    if let Err(e) = sdc_core::convert(&req, &opts) {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
