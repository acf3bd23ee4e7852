//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use kurbo::Size;
use slidekit_render::RenderMode;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "slidekit", version, about = "Render and inspect slide decks")]
pub struct Cli {
    /// Editor config (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one slide.
    Render {
        /// Deck JSON file.
        deck: PathBuf,
        /// Zero-based slide index.
        #[arg(long, default_value_t = 0)]
        slide: usize,
        #[arg(long, default_value = "export")]
        mode: RenderMode,
        /// Explicit scale; overrides --viewport.
        #[arg(long)]
        scale: Option<f64>,
        /// Fit the slide into a WIDTHxHEIGHT surface.
        #[arg(long, value_parser = parse_size)]
        viewport: Option<Size>,
        #[arg(long, value_enum, default_value_t = Format::Svg)]
        format: Format,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render every slide as a thumbnail.
    Thumbnails {
        deck: PathBuf,
        #[arg(long, default_value_t = 0.2)]
        scale: f64,
        #[arg(long, value_enum, default_value_t = Format::Svg)]
        format: Format,
        /// Output directory.
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Print a summary of a deck.
    Info { deck: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Svg,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Svg => "svg",
        }
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(value: &str) -> Result<Size, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid dimension {s:?}"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920x1080").unwrap(), Size::new(1920.0, 1080.0));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::parse_from([
            "slidekit", "render", "deck.json", "--mode", "Thumbnail", "--viewport", "480x270", "--format", "json",
        ]);
        let Command::Render {
            mode, viewport, format, ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(mode, RenderMode::Thumbnail);
        assert_eq!(viewport, Some(Size::new(480.0, 270.0)));
        assert_eq!(format, Format::Json);
    }
}
