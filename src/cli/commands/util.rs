use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::OutputArgs;
use hydra::{Graph, Registry, Term, Trace, evaluate, standard_registry};

pub(crate) fn load_registry() -> Result<Registry> {
    standard_registry().context("failed to build the standard primitive registry")
}

/// Evaluate against an empty graph and print the value, or return the
/// failure so `main` reports it.
pub(crate) fn evaluate_and_report(registry: &Registry, term: Term, output: &OutputArgs) -> Result<()> {
    let trace = match output.max_depth {
        Some(limit) => Trace::with_max_depth(limit),
        None => Trace::new(),
    };
    log::debug!("evaluating {term}");
    let graph = Graph::empty();
    let state = evaluate(registry, term).run_with(&graph, trace);
    if output.trace {
        for message in state.trace.messages() {
            eprintln!("trace: {message}");
        }
    }

    if output.json {
        let body = match &state.value {
            Ok(value) => json!({ "value": value, "messages": state.trace.messages() }),
            Err(err) => json!({ "error": err, "messages": state.trace.messages() }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        if let Err(err) = state.value {
            return Err(err.into());
        }
        return Ok(());
    }

    let value = state.value?;
    println!("{value}");
    Ok(())
}
