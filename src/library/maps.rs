//! `hydra/lib/maps`: finite maps keyed by terms.

use std::collections::BTreeMap;

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::{ErrorKind, Flow};
use crate::prim::{Primitive, binary, nullary, ternary, unary};
use crate::term::Term;
use crate::types::Type;

pub const EMPTY: &str = "hydra/lib/maps.empty";
pub const FROM_LIST: &str = "hydra/lib/maps.fromList";
pub const INSERT: &str = "hydra/lib/maps.insert";
pub const KEYS: &str = "hydra/lib/maps.keys";
pub const LOOKUP: &str = "hydra/lib/maps.lookup";
pub const REMOVE: &str = "hydra/lib/maps.remove";
pub const SIZE: &str = "hydra/lib/maps.size";
pub const TO_LIST: &str = "hydra/lib/maps.toList";
pub const VALUES: &str = "hydra/lib/maps.values";

/// Build a map from entries; a later entry replaces an earlier one with the
/// same key. Also returns each key that was overwritten, once per overwrite.
pub fn from_list<K: Ord + Clone, V>(entries: Vec<(K, V)>) -> (BTreeMap<K, V>, Vec<K>) {
    let mut map = BTreeMap::new();
    let mut overwritten = Vec::new();
    for (key, value) in entries {
        if map.insert(key.clone(), value).is_some() {
            overwritten.push(key);
        }
    }
    (map, overwritten)
}

pub fn insert<K: Ord, V>(key: K, value: V, mut map: BTreeMap<K, V>) -> BTreeMap<K, V> {
    map.insert(key, value);
    map
}

pub fn lookup<K: Ord, V>(key: &K, mut map: BTreeMap<K, V>) -> Option<V> {
    map.remove(key)
}

pub fn remove<K: Ord, V>(key: &K, mut map: BTreeMap<K, V>) -> BTreeMap<K, V> {
    map.remove(key);
    map
}

pub fn to_list<K, V>(map: BTreeMap<K, V>) -> Vec<(K, V)> {
    map.into_iter().collect()
}

fn k<A>() -> Type<A> {
    types::var("k")
}

fn v<A>() -> Type<A> {
    types::var("v")
}

fn kv<A>() -> Type<A> {
    types::map(k(), v())
}

fn sig<A>(domains: Vec<Type<A>>, codomain: Type<A>) -> Type<A> {
    types::lambdas(&["k", "v"], types::curried(domains, codomain))
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        nullary(EMPTY, types::lambdas(&["k", "v"], kv()), || {
            Flow::pure(Term::Map(BTreeMap::new()))
        }),
        unary(
            FROM_LIST,
            sig(vec![types::list(types::pair(k(), v()))], kv()),
            |pairs| {
                expect::list(
                    |pair| expect::pair(expect::term, expect::term, pair),
                    pairs,
                )
                .bind(|pairs| {
                    let (map, overwritten) = from_list(pairs);
                    overwritten.into_iter().fold(Flow::pure(Term::Map(map)), |flow, key| {
                        flow.warn(format!("{FROM_LIST}: duplicate key {key}, keeping the last value"))
                    })
                })
            },
        ),
        ternary(INSERT, sig(vec![k(), v(), kv()], kv()), |key, value, map| {
            expect::map(expect::term, expect::term, map)
                .map(move |map| Term::Map(insert(key, value, map)))
        }),
        unary(KEYS, sig(vec![kv()], types::list(k())), |map| {
            expect::map(expect::term, expect::term, map)
                .map(|map| terms::list(map.into_keys().collect()))
        }),
        binary(
            LOOKUP,
            sig(vec![k(), kv()], types::optional(v())),
            |key, map| {
                expect::map(expect::term, expect::term, map)
                    .map(move |map| terms::optional(lookup(&key, map)))
            },
        ),
        binary(REMOVE, sig(vec![k(), kv()], kv()), |key, map| {
            expect::map(expect::term, expect::term, map)
                .map(move |map| Term::Map(remove(&key, map)))
        }),
        unary(SIZE, sig(vec![kv()], types::int32()), |map| {
            expect::map(expect::term, expect::term, map).and_then(|map| {
                i32::try_from(map.len())
                    .map(terms::int32)
                    .map_err(|_| ErrorKind::failed("map size exceeds int32"))
            })
        }),
        unary(
            TO_LIST,
            sig(vec![kv()], types::list(types::pair(k(), v()))),
            |map| {
                expect::map(expect::term, expect::term, map).map(|map| {
                    terms::list(
                        to_list(map)
                            .into_iter()
                            .map(|(key, value)| terms::pair(key, value))
                            .collect(),
                    )
                })
            },
        ),
        unary(VALUES, sig(vec![kv()], types::list(v())), |map| {
            expect::map(expect::term, expect::term, map)
                .map(|map| terms::list(map.into_values().collect()))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowState;
    use crate::graph::Graph;

    fn run(prim: Primitive, args: Vec<Term>) -> FlowState<Term> {
        prim.call(args).run(&Graph::empty())
    }

    fn find(name: &str) -> anyhow::Result<Primitive> {
        primitives()
            .into_iter()
            .find(|p| p.name.as_str() == name)
            .ok_or_else(|| anyhow::anyhow!("missing {name}"))
    }

    #[test]
    fn from_list_keeps_last_value_and_warns() -> anyhow::Result<()> {
        let pairs: Term = terms::list(vec![
            terms::pair(terms::int32(1), terms::string("a")),
            terms::pair(terms::int32(1), terms::string("b")),
        ]);
        let state = run(find(FROM_LIST)?, vec![pairs]);
        assert_eq!(state.trace.messages().len(), 1);
        assert!(state.trace.messages()[0].starts_with("Warning: "));
        let out = state.into_result()?;
        assert_eq!(out, terms::map(vec![(terms::int32(1), terms::string("b"))]));
        Ok(())
    }

    #[test]
    fn lookup_insert_remove() -> anyhow::Result<()> {
        let m: Term = terms::map(vec![(terms::string("a"), terms::int32(1))]);
        let found = run(find(LOOKUP)?, vec![terms::string("a"), m.clone()]).into_result()?;
        assert_eq!(found, terms::just(terms::int32(1)));
        let missing = run(find(LOOKUP)?, vec![terms::string("z"), m.clone()]).into_result()?;
        assert_eq!(missing, terms::nothing());

        let grown = run(find(INSERT)?, vec![terms::string("b"), terms::int32(2), m.clone()])
            .into_result()?;
        let size = run(find(SIZE)?, vec![grown.clone()]).into_result()?;
        assert_eq!(size, terms::int32(2));
        let keys = run(find(KEYS)?, vec![grown.clone()]).into_result()?;
        assert_eq!(keys, terms::list(vec![terms::string("a"), terms::string("b")]));

        let shrunk = run(find(REMOVE)?, vec![terms::string("a"), grown]).into_result()?;
        assert_eq!(shrunk, terms::map(vec![(terms::string("b"), terms::int32(2))]));
        Ok(())
    }

    #[test]
    fn empty_is_nullary() -> anyhow::Result<()> {
        let prim = find(EMPTY)?;
        assert_eq!(prim.arity(), 0);
        assert_eq!(run(prim, vec![]).into_result()?, terms::map(vec![]));
        Ok(())
    }

    #[test]
    fn kernel_reports_each_overwrite() {
        let (map, overwritten) = from_list(vec![(1, 'a'), (2, 'b'), (1, 'c'), (1, 'd')]);
        assert_eq!(map.get(&1), Some(&'d'));
        assert_eq!(overwritten, vec![1, 1]);
    }
}
