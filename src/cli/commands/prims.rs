use anyhow::{Result, anyhow};

use super::util::load_registry;
use hydra::Name;

pub(crate) fn cmd_prims(prefix: Option<&str>) -> Result<()> {
    let registry = load_registry()?;
    let mut shown = 0usize;
    for primitive in registry.iter() {
        if prefix.is_some_and(|p| !primitive.name.as_str().starts_with(p)) {
            continue;
        }
        println!("{} : {}", primitive.name, primitive.ty);
        shown += 1;
    }
    if shown == 0 {
        println!("no primitives registered");
    }
    Ok(())
}

pub(crate) fn cmd_show(name: &str) -> Result<()> {
    let registry = load_registry()?;
    let primitive = registry
        .lookup(&Name::from(name))
        .ok_or_else(|| anyhow!("primitive `{name}` not found"))?;
    println!("{} : {}", primitive.name, primitive.ty);
    println!("arity: {}", primitive.arity());
    Ok(())
}
