use bank2ofxlib::{
    convert::assemble,
    dialect::Dialect,
    error::{ConvertError, Result},
    formats::ofx::Ofx,
};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DialectArg {
    /// Detect from file content
    Auto,
    Delavska,
    N26,
}

#[derive(Parser, Debug)]
#[command(name = "bank2ofx", version, about = "Convert bank CSV exports to OFX")]
struct Cli {
    /// CSV exports to convert (default stdin, output to stdout)
    files: Vec<PathBuf>,

    /// Account number for exports that do not carry one (N26)
    #[arg(long = "account-number")]
    account_number: Option<String>,

    /// Export dialect
    #[arg(long = "dialect", value_enum, default_value_t = DialectArg::Auto)]
    dialect: DialectArg,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut raw = Vec::new();
        io::stdin().read_to_end(&mut raw)?;
        let out = convert(&raw, &cli)?;
        let mut stdout = io::stdout();
        stdout.write_all(out.as_bytes())?;
        return stdout.flush().map_err(ConvertError::from);
    }

    for path in &cli.files {
        let raw = fs::read(path)?;
        let out = convert(&raw, &cli)?;
        let target = path.with_extension("ofx");
        write_output(&target, &out)?;
        info!(input = %path.display(), output = %target.display(), "converted");
    }
    Ok(())
}

/// Parses one export and renders it fully in memory.
fn convert(raw: &[u8], cli: &Cli) -> Result<String> {
    let dialect = match cli.dialect {
        DialectArg::Auto => Dialect::sniff(raw).ok_or(ConvertError::UnknownDialect)?,
        DialectArg::Delavska => Dialect::Delavska,
        DialectArg::N26 => Dialect::N26,
    };

    let mut export = dialect.parse(&dialect.decode(raw)?)?;
    if let Some(n) = &cli.account_number {
        export = export.with_account_number(n.as_str());
    }
    export.ensure_account_number()?;

    Ofx::render(&assemble(&export, Utc::now()))
}

/// Writes next to `target` first and renames into place, so a failed write
/// never leaves a truncated `target`.
fn write_output(target: &Path, contents: &str) -> Result<()> {
    let tmp = target.with_extension("ofx.tmp");
    let written = fs::File::create(&tmp).and_then(|mut f| {
        f.write_all(contents.as_bytes())?;
        f.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp, target)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
