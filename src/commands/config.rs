use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::McmConfig;
use crate::{paths, ui};

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => path(),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let file = paths::config_file()?;
    let config = McmConfig::load_from(&file)?;

    if ctx.quiet {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    ui::header("Configuration");
    ui::kv("File", &file.display().to_string());
    if !file.exists() {
        ui::dim("Not found, using defaults");
    }
    ui::kv("Hash", config.hash.as_str());
    ui::kv("Pretty output", &config.output.pretty.to_string());
    println!();
    Ok(())
}

fn path() -> Result<()> {
    println!("{}", paths::config_file()?.display());
    Ok(())
}
