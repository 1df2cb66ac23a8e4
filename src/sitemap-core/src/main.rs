use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sitemap_core::common::logging::{DEFAULT_LOG_SETTINGS, setup_logging};
use sitemap_core::config::{DEFAULT_SITEMAP_XML_PATH, DEFAULT_SUMMARY_MD_PATH, check_summary_file};
use sitemap_core::{MalformedLinePolicy, SitemapError, SitemapOptions, SitemapPaths, generate_document, parse_sitemap};

#[derive(Parser)]
#[command(name = "book-sitemap")]
#[command(about = "Generate a sitemap for mdBook", long_about = None)]
struct SitemapCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sitemap.xml from the book's SUMMARY.md
    Generate(GenerateArgs),

    /// Validate that a file is a well-formed sitemap.
    Validate {
        /// The sitemap file to parse and validate.
        #[arg(short, long, value_parser = validate_sitemap_file)]
        file: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Domain for the mdBook site (e.g., 'component-model.bytecodealliance.org')
    #[arg(short, long, env = "SITEMAP_DOMAIN")]
    domain: String,

    /// Output path for the sitemap file
    #[arg(short, long, default_value = DEFAULT_SITEMAP_XML_PATH)]
    output_path: PathBuf,

    /// Path to SUMMARY.md
    #[arg(short, long, default_value = DEFAULT_SUMMARY_MD_PATH, value_parser = validate_summary_file)]
    summary_md_path: PathBuf,

    /// Subsection path (e.g., 'design') to assign a higher priority of 0.8
    #[arg(short = 'p', long)]
    higher_priority: Option<String>,

    /// Fail on links with no closing ')' or that do not resolve to a URL, instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Print the sitemap to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,
}

fn validate_summary_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    check_summary_file(&path).map_err(|e| e.to_string())?;
    Ok(path)
}

fn validate_sitemap_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Sitemap path does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Sitemap path is not a file: {}", path.display()));
    }

    Ok(path)
}

fn main() {
    // Load environment variables from .env file, if it exists
    dotenvy::dotenv().ok();

    let cli = SitemapCli::parse();
    setup_logging(DEFAULT_LOG_SETTINGS);

    if let Err(e) = run(cli) {
        tracing::debug!("Exiting on error: {e:?}");
        eprintln!("ERROR: {e}");
        let code = if e.is_configuration_error() { 2 } else { 1 };
        std::process::exit(code)
    }
}

fn run(cli: SitemapCli) -> Result<(), SitemapError> {
    match cli.command {
        Commands::Generate(args) => generate(args),

        Commands::Validate { file } => {
            let content = std::fs::read_to_string(&file)?;
            let sitemap = parse_sitemap(&content)?;
            println!("Valid sitemap file ({} URLs): {file:?}", sitemap.urls.len());
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs) -> Result<(), SitemapError> {
    let policy = if args.strict {
        MalformedLinePolicy::Fail
    } else {
        MalformedLinePolicy::Skip
    };

    let mut builder = SitemapOptions::builder().domain(args.domain).malformed_lines(policy);
    if let Some(section) = args.higher_priority {
        builder = builder.higher_priority_section(section);
    }
    let options = builder.build()?;

    let paths = SitemapPaths {
        summary_md_path: args.summary_md_path,
        output_path: args.output_path,
    };
    if args.stdout {
        check_summary_file(&paths.summary_md_path)?;
    } else {
        paths.validate()?;
    }

    let toc = std::fs::read_to_string(&paths.summary_md_path)?;
    let document = generate_document(&toc, &options)?;
    let xml = document.render()?;

    if args.stdout {
        println!("{xml}");
    } else {
        std::fs::write(&paths.output_path, xml)?;
        tracing::info!(urls = document.len(), output = %paths.output_path.display(), "Wrote sitemap");
        println!(
            "Wrote sitemap ({} URLs) to {}",
            document.len(),
            paths.output_path.display()
        );
    }
    Ok(())
}
