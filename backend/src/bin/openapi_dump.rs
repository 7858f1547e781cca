//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use users_api::doc::ApiDoc;
use utoipa::OpenApi;

/// Export the Users API OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about)]
struct Cli {
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let json = if cli.pretty {
        doc.to_pretty_json()
    } else {
        doc.to_json()
    }
    .wrap_err("failed to serialise OpenAPI document")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").wrap_err("failed to write OpenAPI document")?;
    Ok(())
}
