use anyhow::{Context as _, Result};
use catalog::Catalog;

use crate::Context;
use crate::cli::DotArgs;

pub fn run(_ctx: &Context, args: DotArgs) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::read_from(path)
            .with_context(|| format!("Could not read catalog {}", path.display()))?,
        None => Catalog::from_reader(std::io::stdin().lock())
            .context("Could not read catalog from stdin")?,
    };

    let mut stdout = std::io::stdout().lock();
    catalog.write_dot(&mut stdout)?;
    Ok(())
}
