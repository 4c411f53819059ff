#![allow(dead_code)]

pub mod completion;
pub mod ledger;
pub mod playlist;
pub mod transcripts;
