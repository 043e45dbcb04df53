#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factorline/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod convert;
pub mod export;

pub use convert::{filing_markdown, to_markdown};
pub use export::{ExportError, filing_filename, transcript_filename, write_filing, write_transcript};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
