//! `hydra/lib/optionals`: the optional type.

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::Flow;
use crate::prim::{Primitive, binary, unary};
use crate::types::Type;

pub const FROM_MAYBE: &str = "hydra/lib/optionals.fromMaybe";
pub const IS_JUST: &str = "hydra/lib/optionals.isJust";
pub const IS_NOTHING: &str = "hydra/lib/optionals.isNothing";
pub const MAP: &str = "hydra/lib/optionals.map";
pub const PURE: &str = "hydra/lib/optionals.pure";

pub fn from_maybe<X>(default: X, value: Option<X>) -> X {
    value.unwrap_or(default)
}

pub fn is_just<X>(value: &Option<X>) -> bool {
    value.is_some()
}

pub fn is_nothing<X>(value: &Option<X>) -> bool {
    value.is_none()
}

fn x<A>() -> Type<A> {
    types::var("x")
}

fn y<A>() -> Type<A> {
    types::var("y")
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        binary(
            FROM_MAYBE,
            types::lambda("x", types::curried([x(), types::optional(x())], x())),
            |default, value| {
                expect::optional(expect::term, value).map(move |value| from_maybe(default, value))
            },
        ),
        unary(
            IS_JUST,
            types::lambda("x", types::function(types::optional(x()), types::boolean())),
            |value| {
                expect::optional(expect::term, value).map(|value| terms::boolean(is_just(&value)))
            },
        ),
        unary(
            IS_NOTHING,
            types::lambda("x", types::function(types::optional(x()), types::boolean())),
            |value| {
                expect::optional(expect::term, value)
                    .map(|value| terms::boolean(is_nothing(&value)))
            },
        ),
        // The function is applied lazily: the result is `just(f(x))` for the
        // interpreter to reduce.
        binary(
            MAP,
            types::lambdas(
                &["x", "y"],
                types::curried(
                    [types::function(x(), y()), types::optional(x())],
                    types::optional(y()),
                ),
            ),
            |f, value| {
                expect::optional(expect::term, value)
                    .map(move |value| terms::optional(value.map(|x| terms::apply(f, x))))
            },
        ),
        unary(
            PURE,
            types::lambda("x", types::function(x(), types::optional(x()))),
            |value| Flow::pure(terms::just(value)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::term::Term;

    fn call(name: &str, args: Vec<Term>) -> anyhow::Result<Term> {
        let prim = primitives()
            .into_iter()
            .find(|p: &Primitive| p.name.as_str() == name)
            .ok_or_else(|| anyhow::anyhow!("missing {name}"))?;
        Ok(prim.call(args).run(&Graph::empty()).into_result()?)
    }

    #[test]
    fn defaults_apply_only_to_nothing() -> anyhow::Result<()> {
        let fallback: Term = terms::int32(0);
        assert_eq!(
            call(FROM_MAYBE, vec![fallback.clone(), terms::just(terms::int32(3))])?,
            terms::int32(3)
        );
        assert_eq!(call(FROM_MAYBE, vec![fallback, terms::nothing()])?, terms::int32(0));
        Ok(())
    }

    #[test]
    fn predicates() -> anyhow::Result<()> {
        assert_eq!(call(IS_JUST, vec![terms::nothing()])?, terms::boolean(false));
        assert_eq!(call(IS_NOTHING, vec![terms::nothing()])?, terms::boolean(true));
        assert_eq!(call(PURE, vec![terms::int32(1)])?, terms::just(terms::int32(1)));
        Ok(())
    }

    #[test]
    fn map_builds_application() -> anyhow::Result<()> {
        let f: Term = terms::variable("f");
        assert_eq!(
            call(MAP, vec![f.clone(), terms::just(terms::int32(1))])?,
            terms::just(terms::apply(f.clone(), terms::int32(1)))
        );
        assert_eq!(call(MAP, vec![f, terms::nothing()])?, terms::nothing());
        Ok(())
    }
}
