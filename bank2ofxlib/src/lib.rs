//! bank2ofxlib — normalizes bank CSV exports (Delavska hranilnica, N26) into OFX statements.
//!
//! raw text → [`dialect::Dialect`] → [`model::AccountExport`] → [`convert::assemble`]
//! → [`document::OfxDocument`] → [`formats::ofx::Ofx`].

pub mod convert;
pub mod dialect;
pub mod document;
pub mod error;
pub mod identity;
pub mod lexing;
pub mod model;
pub mod traits;

pub mod formats {
    pub mod delavska;
    pub mod n26;
    pub mod ofx;
}
