//! Error types for sitemap generation.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sitemap generation operations.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// No domain was supplied, or it was blank.
    #[error("A domain is required (e.g. 'component-model.bytecodealliance.org')")]
    MissingDomain,

    /// The domain does not form a valid `https://` base URL.
    #[error("Invalid domain '{domain}': {source}")]
    InvalidDomain {
        domain: String,
        #[source]
        source: url::ParseError,
    },

    /// A link target could not be resolved against the base URL.
    #[error("Link target '{path}' does not resolve to a URL: {source}")]
    UnresolvableLink {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The table of contents file does not exist.
    #[error("Failed to find summary file [{}]", .0.display())]
    SummaryNotFound(PathBuf),

    /// The summary path exists but is not a regular file.
    #[error("Summary path is not a file [{}]", .0.display())]
    SummaryNotAFile(PathBuf),

    /// The directory that should contain the output file does not exist.
    #[error("Failed to find output dir [{}]", .0.display())]
    OutputDirNotFound(PathBuf),

    /// The output path points at a directory.
    #[error("Output path is a directory [{}]", .0.display())]
    OutputIsDirectory(PathBuf),

    /// A line contains the link marker but no closing parenthesis.
    #[error("Malformed link on line {line_number}: no closing ')' after '](' in {line:?}")]
    MalformedLine { line_number: usize, line: String },

    /// Writing or reading the sitemap XML failed.
    #[error("Sitemap XML error: {0}")]
    XmlError(String),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SitemapError {
    /// True for errors caused by invalid user-supplied configuration, which are reported before any work happens.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDomain
                | Self::InvalidDomain { .. }
                | Self::SummaryNotFound(_)
                | Self::SummaryNotAFile(_)
                | Self::OutputDirNotFound(_)
                | Self::OutputIsDirectory(_)
        )
    }
}

/// Type alias for Result with SitemapError
pub type Result<T> = std::result::Result<T, SitemapError>;
