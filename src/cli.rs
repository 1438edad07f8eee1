use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Language of the subtitles to fetch (e.g. "tur", "eng")
    #[arg(short, long)]
    pub language: String,

    /// Extension of the video files to organize (e.g. ".mp4")
    #[arg(short, long)]
    pub extension: String,

    /// Root directory containing the video files
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Match the extension anywhere in the filename instead of at the end
    #[arg(long)]
    pub substring_match: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
