//! Configuration for sitemap generation: what to generate, and where to read from / write to.

use std::path::{Path, PathBuf};

use url::Url;

use crate::errors::{Result, SitemapError};

/// Default location of the table of contents, relative to the book root.
pub const DEFAULT_SUMMARY_MD_PATH: &str = "src/SUMMARY.md";

/// Default location of the generated sitemap, relative to the book root.
pub const DEFAULT_SITEMAP_XML_PATH: &str = "book/html/sitemap.xml";

/// What to do with a table of contents link that cannot be used: a line with a `](` but no
/// closing `)`, or a target that does not resolve against the base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedLinePolicy {
    /// Log a warning and leave the line out of the sitemap.
    #[default]
    Skip,
    /// Fail the whole run before any output is produced.
    Fail,
}

/// Configuration options for the sitemap builder.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Domain the book is served from, without scheme (e.g. `component-model.bytecodealliance.org`)
    pub domain: String,
    /// Optional subsection (e.g. `design`) whose pages get priority 0.8
    pub higher_priority_section: Option<String>,
    /// Handling of unterminated or unresolvable links in the table of contents
    pub malformed_lines: MalformedLinePolicy,
}

impl SitemapOptions {
    /// Creates a new builder for SitemapOptions.
    pub fn builder() -> SitemapOptionsBuilder {
        SitemapOptionsBuilder::default()
    }

    /// The `https://{domain}/` URL every link target is resolved against.
    pub fn base_url(&self) -> Result<Url> {
        base_url(&self.domain)
    }

    /// The higher-priority section, if one was given.
    pub fn section(&self) -> Option<&str> {
        self.higher_priority_section.as_deref()
    }
}

/// Builder for SitemapOptions.
#[derive(Debug, Clone, Default)]
pub struct SitemapOptionsBuilder {
    domain: Option<String>,
    higher_priority_section: Option<String>,
    malformed_lines: MalformedLinePolicy,
}

impl SitemapOptionsBuilder {
    /// Sets the domain. Required.
    pub fn domain(mut self, domain: String) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets the higher-priority section. An empty name means no section.
    pub fn higher_priority_section(mut self, section: String) -> Self {
        self.higher_priority_section = Some(section).filter(|s| !s.trim().is_empty());
        self
    }

    /// Sets how unterminated or unresolvable links are handled.
    pub fn malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }

    /// Builds the SitemapOptions, checking that the domain forms a valid base URL.
    pub fn build(self) -> Result<SitemapOptions> {
        let domain = self
            .domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or(SitemapError::MissingDomain)?;

        base_url(&domain)?;

        Ok(SitemapOptions {
            domain,
            higher_priority_section: self.higher_priority_section,
            malformed_lines: self.malformed_lines,
        })
    }
}

/// Parses `https://{domain}/` into the base URL.
///
/// The trailing `/` is always present, so a domain carrying a path (`example.org/docs`)
/// keeps that path as the prefix of every resolved link.
pub fn base_url(domain: &str) -> Result<Url> {
    let host_and_path = domain.trim_end_matches('/');
    Url::parse(&format!("https://{host_and_path}/")).map_err(|source| SitemapError::InvalidDomain {
        domain: domain.to_string(),
        source,
    })
}

/// Where the table of contents is read from and where the sitemap is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapPaths {
    pub summary_md_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for SitemapPaths {
    fn default() -> Self {
        Self {
            summary_md_path: PathBuf::from(DEFAULT_SUMMARY_MD_PATH),
            output_path: PathBuf::from(DEFAULT_SITEMAP_XML_PATH),
        }
    }
}

impl SitemapPaths {
    /// Checks both paths before any generation work happens.
    pub fn validate(&self) -> Result<()> {
        check_summary_file(&self.summary_md_path)?;
        check_output_file(&self.output_path)?;
        Ok(())
    }
}

/// The table of contents must exist and be a regular file.
pub fn check_summary_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SitemapError::SummaryNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SitemapError::SummaryNotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// The output must not be a directory, and its parent directory must already exist.
pub fn check_output_file(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(SitemapError::OutputIsDirectory(path.to_path_buf()));
    }

    // a bare file name has an empty parent: the current directory
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err(SitemapError::OutputDirNotFound(parent.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = SitemapOptions::builder()
            .domain("example.org".to_string())
            .higher_priority_section("design".to_string())
            .malformed_lines(MalformedLinePolicy::Fail)
            .build()
            .unwrap();

        assert_eq!(options.domain, "example.org");
        assert_eq!(options.section(), Some("design"));
        assert_eq!(options.malformed_lines, MalformedLinePolicy::Fail);
        assert_eq!(options.base_url().unwrap().as_str(), "https://example.org/");
    }

    #[test]
    fn test_builder_defaults() {
        let options = SitemapOptions::builder()
            .domain("  example.org ".to_string())
            .higher_priority_section("   ".to_string())
            .build()
            .unwrap();

        assert_eq!(options.domain, "example.org");
        assert_eq!(options.section(), None);
        assert_eq!(options.malformed_lines, MalformedLinePolicy::Skip);
    }

    #[test]
    fn test_builder_requires_domain() {
        assert!(matches!(
            SitemapOptions::builder().build(),
            Err(SitemapError::MissingDomain)
        ));
        assert!(matches!(
            SitemapOptions::builder().domain("".to_string()).build(),
            Err(SitemapError::MissingDomain)
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_domain() {
        let result = SitemapOptions::builder().domain("exa mple.org".to_string()).build();
        assert!(matches!(result, Err(SitemapError::InvalidDomain { .. })));
    }

    #[test]
    fn test_base_url_ends_in_slash() {
        assert_eq!(base_url("example.org").unwrap().as_str(), "https://example.org/");
        assert_eq!(base_url("example.org/").unwrap().as_str(), "https://example.org/");
        assert_eq!(base_url("example.org/docs").unwrap().as_str(), "https://example.org/docs/");
        assert_eq!(base_url("example.org/docs//").unwrap().as_str(), "https://example.org/docs/");

        let docs = base_url("example.org/docs").unwrap();
        assert_eq!(docs.join("./a.html").unwrap().as_str(), "https://example.org/docs/a.html");
        assert_eq!(docs.join("").unwrap().as_str(), "https://example.org/docs/");
    }

    #[test]
    fn test_default_paths() {
        let paths = SitemapPaths::default();
        assert_eq!(paths.summary_md_path, PathBuf::from("src/SUMMARY.md"));
        assert_eq!(paths.output_path, PathBuf::from("book/html/sitemap.xml"));
    }

    #[test]
    fn test_check_summary_file() {
        let missing = Path::new("/definitely/not/here/SUMMARY.md");
        assert!(matches!(
            check_summary_file(missing),
            Err(SitemapError::SummaryNotFound(_))
        ));

        let dir = std::env::temp_dir();
        assert!(matches!(check_summary_file(&dir), Err(SitemapError::SummaryNotAFile(_))));
    }

    #[test]
    fn test_check_output_file() {
        assert!(check_output_file(Path::new("sitemap.xml")).is_ok());
        assert!(check_output_file(&std::env::temp_dir().join("sitemap.xml")).is_ok());
        assert!(matches!(
            check_output_file(&std::env::temp_dir()),
            Err(SitemapError::OutputIsDirectory(_))
        ));
        assert!(matches!(
            check_output_file(Path::new("/definitely/not/here/sitemap.xml")),
            Err(SitemapError::OutputDirNotFound(_))
        ));
    }
}
