use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use spdlog::{info, warn};

use wxr2html::logger::configure_logger;
use wxr2html::media::http_fetcher::HttpFetcher;
use wxr2html::media::MediaFetcher;
use wxr2html::site_writer::generate_site;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "wxr2html.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// WordPress export (WXR) file
    input_xml: PathBuf,

    /// Output directory, replaces paths.output_dir
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Site title, replaces the title of the export
    #[arg(long)]
    site_title: Option<String>,

    /// Download remote media into <output>/assets
    #[arg(long)]
    download_media: bool,

    /// Config path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Directory with template overrides and theme includes
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let config = open_config(args.config_path)?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let mut options = config.site_options();
    if let Some(output) = args.output {
        options.output_dir = output;
    }
    if let Some(template_dir) = args.template_dir {
        options.template_dir = template_dir;
    }
    if args.site_title.is_some() {
        options.site_title = args.site_title;
    }

    let fetcher = if args.download_media || config.media.download {
        info!("Media download enabled, timeout {}s", config.media.timeout_secs);
        Some(HttpFetcher::new(config.media.timeout(), config.media.max_bytes()))
    } else {
        None
    };

    info!("Converting {} into {}", args.input_xml.display(), options.output_dir.display());
    let report = generate_site(&args.input_xml, &options, fetcher.as_ref().map(|f| f as &dyn MediaFetcher))?;

    println!("Wrote {} pages and {} posts to {}", report.pages_written, report.posts_written, options.output_dir.display());
    if report.media_downloaded > 0 {
        println!("Downloaded {} media files", report.media_downloaded);
    }
    if !report.warnings.is_empty() {
        println!("{} warnings:", report.warnings.len());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if !args.input_xml.is_file() {
        eprintln!("ERROR: input file not found: {}", args.input_xml.display());
        return ExitCode::from(2);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            ExitCode::from(1)
        }
    }
}
