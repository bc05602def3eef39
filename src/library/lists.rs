//! `hydra/lib/lists`: polymorphic list operations.
//!
//! Higher-order primitives (`apply`, `bind`, `map`) do not call their
//! function arguments. They return application terms which the interpreter
//! reduces afterwards.

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::{ErrorKind, Flow};
use crate::prim::{Primitive, binary, unary};
use crate::term::Term;
use crate::types::Type;

pub const APPLY: &str = "hydra/lib/lists.apply";
pub const BIND: &str = "hydra/lib/lists.bind";
pub const CONCAT: &str = "hydra/lib/lists.concat";
pub const CONCAT2: &str = "hydra/lib/lists.concat2";
pub const CONS: &str = "hydra/lib/lists.cons";
pub const HEAD: &str = "hydra/lib/lists.head";
pub const LAST: &str = "hydra/lib/lists.last";
pub const LENGTH: &str = "hydra/lib/lists.length";
pub const MAP: &str = "hydra/lib/lists.map";
pub const PURE: &str = "hydra/lib/lists.pure";
pub const REVERSE: &str = "hydra/lib/lists.reverse";
pub const SAFE_HEAD: &str = "hydra/lib/lists.safeHead";

/// Every function applied to every argument, function-major.
pub fn apply<F: Clone, X: Clone>(functions: &[F], arguments: &[X]) -> Vec<(F, X)> {
    functions
        .iter()
        .flat_map(|f| arguments.iter().map(move |x| (f.clone(), x.clone())))
        .collect()
}

pub fn concat<X>(lists: Vec<Vec<X>>) -> Vec<X> {
    lists.into_iter().flatten().collect()
}

pub fn concat2<X>(mut first: Vec<X>, second: Vec<X>) -> Vec<X> {
    first.extend(second);
    first
}

pub fn cons<X>(head: X, mut tail: Vec<X>) -> Vec<X> {
    tail.insert(0, head);
    tail
}

pub fn head<X>(list: Vec<X>) -> Result<X, ErrorKind> {
    list.into_iter()
        .next()
        .ok_or_else(|| ErrorKind::failed("head of empty list"))
}

pub fn last<X>(list: Vec<X>) -> Result<X, ErrorKind> {
    list.into_iter()
        .next_back()
        .ok_or_else(|| ErrorKind::failed("last of empty list"))
}

pub fn length<X>(list: &[X]) -> Result<i32, ErrorKind> {
    i32::try_from(list.len()).map_err(|_| ErrorKind::failed("list length exceeds int32"))
}

pub fn pure<X>(value: X) -> Vec<X> {
    vec![value]
}

pub fn reverse<X>(mut list: Vec<X>) -> Vec<X> {
    list.reverse();
    list
}

pub fn safe_head<X>(list: Vec<X>) -> Option<X> {
    list.into_iter().next()
}

fn x<A>() -> Type<A> {
    types::var("x")
}

fn y<A>() -> Type<A> {
    types::var("y")
}

fn list_of<A>(inner: Type<A>) -> Type<A> {
    types::list(inner)
}

fn applications<A: Meta>(pairs: Vec<(Term<A>, Term<A>)>) -> Term<A> {
    terms::list(pairs.into_iter().map(|(f, x)| terms::apply(f, x)).collect())
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        binary(
            APPLY,
            types::lambdas(
                &["x", "y"],
                types::curried([list_of(types::function(x(), y())), list_of(x())], list_of(y())),
            ),
            |fs, xs| {
                expect::list(expect::term, fs)
                    .map2(expect::list(expect::term, xs), |fs, xs| applications(apply(&fs, &xs)))
            },
        ),
        binary(
            BIND,
            types::lambdas(
                &["x", "y"],
                types::curried([list_of(x()), types::function(x(), list_of(y()))], list_of(y())),
            ),
            |xs, f| {
                expect::list(expect::term, xs).map(move |xs| {
                    let nested = xs.into_iter().map(|x| terms::apply(f.clone(), x)).collect();
                    terms::apply(terms::primitive(CONCAT), terms::list(nested))
                })
            },
        ),
        unary(
            CONCAT,
            types::lambda("x", types::function(list_of(list_of(x())), list_of(x()))),
            |xss| {
                expect::list(|xs| expect::list(expect::term, xs), xss)
                    .map(|xss| terms::list(concat(xss)))
            },
        ),
        binary(
            CONCAT2,
            types::lambda("x", types::curried([list_of(x()), list_of(x())], list_of(x()))),
            |xs, ys| {
                expect::list(expect::term, xs)
                    .map2(expect::list(expect::term, ys), concat2)
                    .map(terms::list)
            },
        ),
        binary(
            CONS,
            types::lambda("x", types::curried([x(), list_of(x())], list_of(x()))),
            |head, tail| expect::list(expect::term, tail).map(move |tail| terms::list(cons(head, tail))),
        ),
        unary(HEAD, types::lambda("x", types::function(list_of(x()), x())), |xs| {
            expect::list(expect::term, xs).and_then(head)
        }),
        unary(LAST, types::lambda("x", types::function(list_of(x()), x())), |xs| {
            expect::list(expect::term, xs).and_then(last)
        }),
        unary(
            LENGTH,
            types::lambda("x", types::function(list_of(x()), types::int32())),
            |xs| {
                expect::list(expect::term, xs)
                    .and_then(|xs| length(&xs))
                    .map(terms::int32)
            },
        ),
        binary(
            MAP,
            types::lambdas(
                &["x", "y"],
                types::curried([types::function(x(), y()), list_of(x())], list_of(y())),
            ),
            |f, xs| {
                expect::list(expect::term, xs).map(move |xs| {
                    terms::list(xs.into_iter().map(|x| terms::apply(f.clone(), x)).collect())
                })
            },
        ),
        unary(PURE, types::lambda("x", types::function(x(), list_of(x()))), |x| {
            Flow::pure(terms::list(pure(x)))
        }),
        unary(
            REVERSE,
            types::lambda("x", types::function(list_of(x()), list_of(x()))),
            |xs| expect::list(expect::term, xs).map(|xs| terms::list(reverse(xs))),
        ),
        unary(
            SAFE_HEAD,
            types::lambda("x", types::function(list_of(x()), types::optional(x()))),
            |xs| expect::list(expect::term, xs).map(|xs| terms::optional(safe_head(xs))),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::name::Name;
    use crate::prim::Registry;

    fn call(registry: &Registry, name: &str, args: Vec<Term>) -> anyhow::Result<Term> {
        let prim = registry
            .lookup(&Name::from(name))
            .ok_or_else(|| anyhow::anyhow!("missing {name}"))?;
        Ok(prim.call(args).run(&Graph::empty()).into_result()?)
    }

    fn registry() -> anyhow::Result<Registry> {
        let mut registry = Registry::new();
        registry.extend(primitives())?;
        Ok(registry)
    }

    fn strings(values: &[&str]) -> Term {
        terms::list(values.iter().map(|s| terms::string(*s)).collect())
    }

    #[test]
    fn cons_prepends() -> anyhow::Result<()> {
        let registry = registry()?;
        let out = call(&registry, CONS, vec![terms::string("a"), strings(&["b", "c"])])?;
        assert_eq!(out, strings(&["a", "b", "c"]));
        let out = call(&registry, CONS, vec![terms::string("a"), strings(&[])])?;
        assert_eq!(out, strings(&["a"]));
        Ok(())
    }

    #[test]
    fn cons_rejects_non_list_tail() -> anyhow::Result<()> {
        let registry = registry()?;
        let err = call(&registry, CONS, vec![terms::string("a"), terms::string("b")]).unwrap_err();
        assert!(err.to_string().contains("expected list, found string"));
        Ok(())
    }

    #[test]
    fn apply_is_function_major() -> anyhow::Result<()> {
        let registry = registry()?;
        let f: Term = terms::variable("f");
        let g: Term = terms::variable("g");
        let out = call(&registry, APPLY, vec![
            terms::list(vec![f.clone(), g.clone()]),
            terms::list(vec![terms::int32(1), terms::int32(2)]),
        ])?;
        assert_eq!(
            out,
            terms::list(vec![
                terms::apply(f.clone(), terms::int32(1)),
                terms::apply(f, terms::int32(2)),
                terms::apply(g.clone(), terms::int32(1)),
                terms::apply(g, terms::int32(2)),
            ])
        );
        Ok(())
    }

    #[test]
    fn head_and_last_fail_on_empty() -> anyhow::Result<()> {
        let registry = registry()?;
        assert_eq!(call(&registry, HEAD, vec![strings(&["a", "b"])])?, terms::string("a"));
        assert_eq!(call(&registry, LAST, vec![strings(&["a", "b"])])?, terms::string("b"));
        assert!(call(&registry, HEAD, vec![strings(&[])]).is_err());
        assert!(call(&registry, LAST, vec![strings(&[])]).is_err());
        assert_eq!(call(&registry, SAFE_HEAD, vec![strings(&[])])?, terms::nothing());
        Ok(())
    }

    #[test]
    fn structural_operations() -> anyhow::Result<()> {
        let registry = registry()?;
        assert_eq!(call(&registry, LENGTH, vec![strings(&["a", "b"])])?, terms::int32(2));
        assert_eq!(call(&registry, REVERSE, vec![strings(&["a", "b"])])?, strings(&["b", "a"]));
        assert_eq!(
            call(&registry, CONCAT, vec![terms::list(vec![strings(&["a"]), strings(&[]), strings(&["b"])])])?,
            strings(&["a", "b"])
        );
        assert_eq!(
            call(&registry, CONCAT2, vec![strings(&["a"]), strings(&["b"])])?,
            strings(&["a", "b"])
        );
        assert_eq!(call(&registry, PURE, vec![terms::string("a")])?, strings(&["a"]));
        Ok(())
    }

    #[test]
    fn bind_defers_to_concat() -> anyhow::Result<()> {
        let registry = registry()?;
        let f: Term = terms::variable("f");
        let out = call(&registry, BIND, vec![strings(&["a"]), f.clone()])?;
        assert_eq!(
            out,
            terms::apply(
                terms::primitive(CONCAT),
                terms::list(vec![terms::apply(f, terms::string("a"))])
            )
        );
        Ok(())
    }

    #[test]
    fn kernels() {
        assert_eq!(apply(&["f", "g"], &[1, 2]), vec![("f", 1), ("f", 2), ("g", 1), ("g", 2)]);
        assert_eq!(cons(0, vec![1]), vec![0, 1]);
        assert_eq!(head(Vec::<i32>::new()), Err(ErrorKind::failed("head of empty list")));
        assert_eq!(length(&[1, 2, 3]), Ok(3));
    }
}
