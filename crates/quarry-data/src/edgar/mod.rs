//! SEC EDGAR filing discovery.
//!
//! This module locates a company's regulatory filings:
//! - CIK lookup from a ticker via the browse-edgar Atom endpoint
//! - Latest 10-K / 10-Q selection from the structured submissions JSON
//! - Raw primary-document retrieval
//!
//! # Example
//!
//! ```no_run
//! use quarry_data::edgar::{EdgarClient, FormType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new()?;
//!     let cik = client.lookup_cik("AAPL").await?;
//!     if let Some(filing) = client.latest_filing(&cik, FormType::TenK).await? {
//!         println!("Latest 10-K filed {}", filing.filing_date);
//!         let html = client.fetch_document(&cik, &filing).await?;
//!         println!("Document size: {} bytes", html.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::{EdgarClient, Filing, FormType, RecentFilings, Submissions, pad_cik, sec_user_agent};
