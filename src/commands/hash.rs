use anyhow::Result;
use catalog::IdHasher;

use crate::Context;
use crate::cli::HashArgs;
use crate::config::McmConfig;

pub fn run(_ctx: &Context, args: HashArgs) -> Result<()> {
    let algorithm = match args.hash {
        Some(arg) => arg.into(),
        None => McmConfig::load()?.hash,
    };
    let hasher = algorithm.hasher();

    for label in &args.labels {
        println!("{}", format_line(&hasher, label));
    }
    Ok(())
}

/// `<decimal id>\t<hex id>\t<label>`
fn format_line(hasher: &IdHasher, label: &str) -> String {
    let id = hasher.derive(label);
    format!("{id}\t{id:#018x}\t{label}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::HashAlgorithm;

    #[test]
    fn test_format_line() {
        let line = format_line(&IdHasher::default(), "foo");
        assert_eq!(
            line,
            format!("{}\t0x131381e8715bb9e1\tfoo", 0x1313_81e8_715b_b9e1_u64)
        );
    }

    #[test]
    fn test_format_line_keeps_label_verbatim() {
        let line = format_line(&HashAlgorithm::Blake3.hasher(), "nginx config");
        assert!(line.ends_with("\tnginx config"));
        assert_eq!(line.split('\t').count(), 3);
    }
}
