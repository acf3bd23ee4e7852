//! Command-line entry point.

mod cli;
mod export;

use clap::Parser;
use cli::{Cli, Command};
use export::AppResult;
use std::io::Write;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = export::load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Render {
            deck,
            slide,
            mode,
            scale,
            viewport,
            format,
            out,
        } => {
            let slide_size = config.slide_size();
            let editor = export::load_editor(&deck, config)?;
            let scale = match (scale, viewport) {
                (Some(scale), _) => scale,
                (None, Some(surface)) => slidekit_render::fit_scale(slide_size, surface),
                (None, None) => 1.0,
            };
            log::info!("Rendering slide {slide} in {mode} mode at scale {scale}");
            let tree = export::render_tree(&editor, slide, mode, scale)?;
            let body = export::encode(&tree, format)?;
            match out {
                Some(path) => std::fs::write(path, body)?,
                None => std::io::stdout().write_all(body.as_bytes())?,
            }
        }
        Command::Thumbnails {
            deck,
            scale,
            format,
            out,
        } => {
            let editor = export::load_editor(&deck, config)?;
            for path in export::write_thumbnails(&editor, scale, format, &out)? {
                println!("{}", path.display());
            }
        }
        Command::Info { deck } => {
            let editor = export::load_editor(&deck, config)?;
            println!("{}", serde_json::to_string_pretty(&export::summarize(editor.deck()))?);
        }
    }
    Ok(())
}
