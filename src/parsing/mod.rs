//! Parsers for the documents EDGAR serves: XBRL instance documents and filing index pages.

pub mod html;
pub mod utils;
pub mod xbrl;
