//! apicalls core library
//!
//! Turns the excon debug log of an integration test run into a report of the
//! API calls made against each service of the cloud's catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod scanner;
pub mod scrubber;

pub use crate::{
    catalog::{Catalog, CatalogEntry, Endpoint},
    config::Config,
    error::{Error, Result},
    pipeline::run,
    report::Report,
    request::{RequestRecord, Target},
    scanner::{LinePattern, ScanOutput},
    scrubber::Scrubber,
};
