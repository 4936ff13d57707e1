use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Aggregate manga feeds into a searchable, paginated gallery
#[derive(Parser)]
#[command(name = "manga-gallery")]
#[command(about = "Aggregate manga feeds listed in a registry and render them as HTML", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the per-user config file when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry document location (URL or local path)
    #[arg(long, global = true, value_name = "LOCATION")]
    pub registry: Option<String>,

    /// Items per gallery page
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Only titles containing this text (case-insensitive)
    #[arg(short, long)]
    pub query: Option<String>,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of the aggregated listing
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Render one gallery page as HTML
    Page {
        #[command(flatten)]
        page: PageArgs,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Render every gallery page into a directory
    Build {
        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "site")]
        out: PathBuf,
    },
    /// Render the chapter list for a detail link
    Detail {
        /// Detail link or bare query string (`title=..&cover=..&chapters=..`)
        link: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}
