//! # Ledger Module
//!
//! Durable record of the videos that have been fully handled, either summarized
//! or confirmed to have no usable transcript. A recurring scan consults it so the
//! same video is never processed twice.
//!
//! [`FileLedger`] keeps the record as a newline-delimited text file.

mod ledger;

pub use ledger::file::FileLedger;
pub use ledger::Ledger;
