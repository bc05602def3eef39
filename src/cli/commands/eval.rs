use std::path::Path;

use anyhow::{Result, anyhow, bail};

use super::util::{evaluate_and_report, load_registry};
use crate::cli::OutputArgs;
use hydra::dsl::terms;
use hydra::{Name, parse_term, parse_term_from_file};

pub(crate) fn cmd_eval(expr: Option<&str>, file: Option<&Path>, output: &OutputArgs) -> Result<()> {
    let registry = load_registry()?;
    let term = match (expr, file) {
        (Some(text), None) => parse_term(text, &registry)?,
        (None, Some(path)) => parse_term_from_file(path, &registry)?,
        _ => bail!("specify an expression or --file PATH"),
    };
    evaluate_and_report(&registry, term, output)
}

pub(crate) fn cmd_call(name: &str, args: &[String], output: &OutputArgs) -> Result<()> {
    let registry = load_registry()?;
    let primitive = registry
        .lookup(&Name::from(name))
        .ok_or_else(|| anyhow!("primitive `{name}` not found"))?;
    if args.len() != primitive.arity() {
        bail!(
            "`{name}` takes {} arguments but {} were given",
            primitive.arity(),
            args.len()
        );
    }
    let arguments = args
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            parse_term(text, &registry).map_err(|err| anyhow!("argument {}: {err:#}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    let term = terms::apply_all(primitive.term(), arguments);
    evaluate_and_report(&registry, term, output)
}
