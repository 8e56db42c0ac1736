use bank2ofxlib::{convert::assemble, dialect::Dialect, formats::ofx::Ofx, traits::WriteFormat};
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: any supported export on stdin -> OFX on stdout.
    // N26 exports need the account number as the first argument.
    let mut raw = Vec::new();
    std::io::stdin().read_to_end(&mut raw)?;
    let mut export = Dialect::detect_and_parse(&raw)?;
    if let Some(n) = std::env::args().nth(1) {
        export = export.with_account_number(n);
    }
    export.ensure_account_number()?;
    Ofx::write(std::io::stdout(), &assemble(&export, chrono::Utc::now()))?;
    Ok(())
}
