// Service exports
pub mod airtable;

pub use airtable::{AirtableClient, AirtableError, AirtableTables, RetryPolicy};
