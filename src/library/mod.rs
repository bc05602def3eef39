//! The standard primitive library, one module per `hydra/lib/*` namespace.
//!
//! Each module exports its primitive names as constants, the native kernels
//! that do the actual work, and a `primitives()` constructor wrapping every
//! kernel in a decode/compute/encode primitive.

use crate::annotated::Meta;
use crate::prim::{Registry, RegistryError};

pub mod equality;
pub mod lists;
pub mod literals;
pub mod maps;
pub mod math;
pub mod optionals;
pub mod sets;
pub mod strings;

/// A registry holding every standard primitive.
pub fn standard_registry<A: Meta>() -> Result<Registry<A>, RegistryError> {
    let mut registry = Registry::new();
    registry.extend(equality::primitives())?;
    registry.extend(lists::primitives())?;
    registry.extend(literals::primitives())?;
    registry.extend(maps::primitives())?;
    registry.extend(math::primitives())?;
    registry.extend(optionals::primitives())?;
    registry.extend(sets::primitives())?;
    registry.extend(strings::primitives())?;
    log::debug!("standard registry holds {} primitives", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use crate::prim::type_arity;

    #[test]
    fn standard_names_are_unique_and_namespaced() -> anyhow::Result<()> {
        let registry = standard_registry::<()>()?;
        assert!(registry.len() > 60);
        for prim in registry.iter() {
            assert!(
                prim.name.as_str().starts_with("hydra/lib/"),
                "unexpected name {}",
                prim.name
            );
            assert_eq!(prim.arity(), type_arity(&prim.ty));
        }
        assert!(registry.lookup(&Name::from(math::ADD)).is_some());
        assert!(registry.lookup(&Name::from(lists::CONS)).is_some());
        Ok(())
    }
}
