//! `hydra/lib/sets`: finite sets of terms.

use std::collections::BTreeSet;

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::ErrorKind;
use crate::prim::{Primitive, binary, unary};
use crate::term::Term;
use crate::types::Type;

pub const FROM_LIST: &str = "hydra/lib/sets.fromList";
pub const INSERT: &str = "hydra/lib/sets.insert";
pub const MEMBER: &str = "hydra/lib/sets.member";
pub const REMOVE: &str = "hydra/lib/sets.remove";
pub const SIZE: &str = "hydra/lib/sets.size";
pub const TO_LIST: &str = "hydra/lib/sets.toList";

pub fn from_list<X: Ord>(list: Vec<X>) -> BTreeSet<X> {
    list.into_iter().collect()
}

pub fn insert<X: Ord>(element: X, mut set: BTreeSet<X>) -> BTreeSet<X> {
    set.insert(element);
    set
}

pub fn member<X: Ord>(element: &X, set: &BTreeSet<X>) -> bool {
    set.contains(element)
}

pub fn remove<X: Ord>(element: &X, mut set: BTreeSet<X>) -> BTreeSet<X> {
    set.remove(element);
    set
}

/// Elements in ascending order.
pub fn to_list<X>(set: BTreeSet<X>) -> Vec<X> {
    set.into_iter().collect()
}

fn x<A>() -> Type<A> {
    types::var("x")
}

fn sig<A>(domains: Vec<Type<A>>, codomain: Type<A>) -> Type<A> {
    types::lambda("x", types::curried(domains, codomain))
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        unary(FROM_LIST, sig(vec![types::list(x())], types::set(x())), |list| {
            expect::list(expect::term, list).map(|list| Term::Set(from_list(list)))
        }),
        binary(
            INSERT,
            sig(vec![x(), types::set(x())], types::set(x())),
            |element, set| {
                expect::set(expect::term, set).map(move |set| Term::Set(insert(element, set)))
            },
        ),
        binary(
            MEMBER,
            sig(vec![x(), types::set(x())], types::boolean()),
            |element, set| {
                expect::set(expect::term, set).map(move |set| terms::boolean(member(&element, &set)))
            },
        ),
        binary(
            REMOVE,
            sig(vec![x(), types::set(x())], types::set(x())),
            |element, set| {
                expect::set(expect::term, set).map(move |set| Term::Set(remove(&element, set)))
            },
        ),
        unary(SIZE, sig(vec![types::set(x())], types::int32()), |set| {
            expect::set(expect::term, set).and_then(|set| {
                i32::try_from(set.len())
                    .map(terms::int32)
                    .map_err(|_| ErrorKind::failed("set size exceeds int32"))
            })
        }),
        unary(TO_LIST, sig(vec![types::set(x())], types::list(x())), |set| {
            expect::set(expect::term, set).map(|set| terms::list(to_list(set)))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn call(name: &str, args: Vec<Term>) -> anyhow::Result<Term> {
        let prim = primitives()
            .into_iter()
            .find(|p: &Primitive| p.name.as_str() == name)
            .ok_or_else(|| anyhow::anyhow!("missing {name}"))?;
        Ok(prim.call(args).run(&Graph::empty()).into_result()?)
    }

    #[test]
    fn from_list_deduplicates_and_sorts() -> anyhow::Result<()> {
        let list: Term = terms::list(vec![terms::int32(3), terms::int32(1), terms::int32(3)]);
        let set = call(FROM_LIST, vec![list])?;
        assert_eq!(set, terms::set(vec![terms::int32(1), terms::int32(3)]));
        assert_eq!(call(SIZE, vec![set.clone()])?, terms::int32(2));
        assert_eq!(
            call(TO_LIST, vec![set])?,
            terms::list(vec![terms::int32(1), terms::int32(3)])
        );
        Ok(())
    }

    #[test]
    fn membership() -> anyhow::Result<()> {
        let set: Term = terms::set(vec![terms::string("a")]);
        assert_eq!(call(MEMBER, vec![terms::string("a"), set.clone()])?, terms::boolean(true));
        let grown = call(INSERT, vec![terms::string("b"), set.clone()])?;
        assert_eq!(call(MEMBER, vec![terms::string("b"), grown.clone()])?, terms::boolean(true));
        let shrunk = call(REMOVE, vec![terms::string("a"), grown])?;
        assert_eq!(call(MEMBER, vec![terms::string("a"), shrunk])?, terms::boolean(false));
        assert!(call(MEMBER, vec![terms::string("a"), terms::list(vec![])]).is_err());
        Ok(())
    }
}
