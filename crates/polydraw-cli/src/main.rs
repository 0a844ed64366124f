//! `polydraw` command-line entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use polydraw_cli::{FontChoice, ReplayOptions, Script, replay};
use polydraw_core::EditorConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON editing script and write the drawing as a PNG.
    Replay {
        script: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// TrueType/OpenType font used for text.
        #[arg(long)]
        font: Option<PathBuf>,
        /// Match text fonts against the installed system fonts.
        #[arg(long, conflicts_with = "font")]
        system_fonts: bool,
        /// Include tool previews still on screen at the end of the script.
        #[arg(long)]
        overlay: bool,
    },
    /// Print the default editor configuration as JSON.
    Config,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Replay {
            script,
            output,
            font,
            system_fonts,
            overlay,
        } => {
            let fonts = match (font, system_fonts) {
                (Some(path), _) => FontChoice::File(path),
                (None, true) => FontChoice::System,
                (None, false) => FontChoice::None,
            };
            let options = ReplayOptions {
                fonts,
                overlay,
                base_dir: script.parent().map(PathBuf::from).unwrap_or_default(),
            };
            let parsed = Script::from_file(&script)?;
            let surface = replay(&parsed, &options)?;
            let png = surface.to_png()?;
            std::fs::write(&output, &png).with_context(|| format!("cannot write {}", output.display()))?;
            log::info!("Wrote {} ({} bytes)", output.display(), png.len());
        }
        Command::Config => {
            println!("{}", EditorConfig::default().to_json()?);
        }
    }
    Ok(())
}
