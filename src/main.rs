use anyhow::Context;
use clap::{ArgAction, Parser};
use sketchboard::export::{self, ExportOptions};
use sketchboard::{Config, InputDispatcher, script};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sketchboard")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SKETCHBOARD_GIT_HASH"), ")"),
    about = "Replay drawing event scripts onto a raster canvas"
)]
struct Cli {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Event script to replay (reads stdin when omitted or "-")
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the PNG here instead of the configured export directory
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let source = read_script(cli.script.as_ref())?;
    let commands = script::parse(&source).with_context(|| match &cli.script {
        Some(path) => format!("Failed to parse script {}", path.display()),
        None => "Failed to parse script from stdin".to_string(),
    })?;
    log::info!("Replaying {} script command(s)", commands.len());

    let mut dispatcher = InputDispatcher::from_config(cli.width, cli.height, &config)
        .context("Failed to create canvas")?;
    script::run(&mut dispatcher, &commands);

    if dispatcher.is_button_held() {
        log::warn!("Script ended mid-drag; applying the configured cancel policy");
        dispatcher.on_pointer_leave();
    }

    let raster = dispatcher.canvas().export_pixels()?;
    let path = match cli.output {
        Some(path) => {
            export::write_png(&raster, &path)?;
            path
        }
        None => export::save_png(&raster, &ExportOptions::from(&config.export))?,
    };

    println!("Saved drawing to {}", path.display());
    Ok(())
}

fn read_script(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read script from stdin")?;
            Ok(source)
        }
    }
}
