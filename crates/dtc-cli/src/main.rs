//! DTC table generator CLI
//!
//! Converts a vendor DTC export into C tables using a directory of templates.
//! The generated text goes to stdout; warnings go to stderr (see `RUST_LOG`).

use clap::Parser;
use dtc_core::{parse_export, render, ExportFormat, RenderOptions, Templates};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtc-gen")]
#[command(about = "Generate DTC and ECU tables from vendor exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Export layout: annotated (aleksi) or delimited (richard)
    #[arg(value_parser = parse_format)]
    format: ExportFormat,

    /// Export file to convert
    input: PathBuf,

    /// Directory holding the dtc, dtc_list, ecu, prefix and suffix templates
    template_dir: PathBuf,

    /// Name substituted (uppercased) into the header and footer
    name: String,
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: dtc_core::Error| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> dtc_core::Result<()> {
    let export = parse_export(&cli.input, cli.format)?;
    log::info!(
        "Parsed {} codes for {} ECUs from {}",
        export.dtc_count(),
        export.ecu_count(),
        cli.input.display()
    );
    if !export.warnings.is_empty() {
        log::info!("{} descriptions left unresolved", export.warnings.len());
    }

    let templates = Templates::load(&cli.template_dir)?;
    let output = render(&export, &templates, &cli.name, &RenderOptions::default());

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_positionals() {
        let cli = Cli::try_parse_from(["dtc-gen", "aleksi", "in.txt", "templates", "xiaotec"]).unwrap();
        assert_eq!(cli.format, ExportFormat::Annotated);
        assert_eq!(cli.input, PathBuf::from("in.txt"));
        assert_eq!(cli.template_dir, PathBuf::from("templates"));
        assert_eq!(cli.name, "xiaotec");
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["dtc-gen", "csv", "in.txt", "templates", "x"]).is_err());
    }

    #[test]
    fn test_cli_rejects_wrong_argument_count() {
        assert!(Cli::try_parse_from(["dtc-gen", "delimited", "in.txt", "templates"]).is_err());
        assert!(Cli::try_parse_from(["dtc-gen", "delimited", "in.txt", "templates", "x", "extra"]).is_err());
    }
}
