use anyhow::{Context as _, Result};
use std::io::Write;

use crate::Context;
use crate::cli::CompileArgs;
use crate::config::McmConfig;
use crate::declaration::{self, Document};
use crate::ui;

pub fn run(ctx: &Context, args: CompileArgs) -> Result<()> {
    let config = McmConfig::load()?;
    let algorithm = args.hash.map_or(config.hash, Into::into);
    let pretty = args.pretty || config.output.pretty;

    let doc = Document::load(&args.input)?;
    if doc.resource.is_empty() && !ctx.quiet {
        ui::warn(&format!("No resources declared in {}", args.input.display()));
    }

    let catalog = declaration::compile(&doc, algorithm.hasher())?;

    match &args.output {
        Some(path) => {
            catalog
                .write_to(path, pretty)
                .with_context(|| format!("Could not write catalog to {}", path.display()))?;
            if !ctx.quiet {
                ui::success(&format!(
                    "Compiled {} resource(s) into {}",
                    catalog.len(),
                    path.display()
                ));
                if ctx.verbose > 0 {
                    for node in &catalog {
                        ui::dim(&node.display_name());
                    }
                }
            }
        }
        None => {
            let json = if pretty {
                catalog.to_json_pretty()?
            } else {
                catalog.to_json()?
            };
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
