//! The schema environment: named elements that terms can refer to.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::annotated::Meta;
use crate::flow::{ErrorKind, Flow};
use crate::name::{FieldName, Name};
use crate::term::Term;
use crate::types::Type;

/// A named term, optionally typed, optionally carrying metadata.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Element<A = ()> {
    pub name: Name,
    pub term: Term<A>,
    #[serde(rename = "type")]
    pub ty: Option<Type<A>>,
    pub meta: Option<A>,
}

impl<A: Clone> Element<A> {
    pub fn new(name: impl Into<Name>, term: Term<A>) -> Self {
        Self {
            name: name.into(),
            term,
            ty: None,
            meta: None,
        }
    }

    pub fn with_name(&self, name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_term(&self, term: Term<A>) -> Self {
        Self {
            term,
            ..self.clone()
        }
    }

    pub fn with_type(&self, ty: Option<Type<A>>) -> Self {
        Self {
            ty,
            ..self.clone()
        }
    }

    pub fn with_meta(&self, meta: Option<A>) -> Self {
        Self {
            meta,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("element `{0}` is defined more than once")]
    DuplicateElement(Name),
    #[error("type of element `{element}` declares field `{field}` twice in row `{row}`")]
    DuplicateField {
        element: Name,
        row: Name,
        field: FieldName,
    },
}

/// An immutable set of elements keyed by name. Never mutated once built, so
/// one graph can back any number of concurrent evaluations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Graph<A = ()> {
    elements: BTreeMap<Name, Element<A>>,
}

impl<A> Default for Graph<A> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }
}

impl<A: Meta> Graph<A> {
    /// Build a graph, rejecting repeated names and row types that declare
    /// the same field twice.
    pub fn new(elements: impl IntoIterator<Item = Element<A>>) -> Result<Self, GraphError> {
        let mut map = BTreeMap::new();
        for element in elements {
            if let Some(ty) = &element.ty {
                for row in ty.rows() {
                    if let Some(field) = row.duplicate_field() {
                        return Err(GraphError::DuplicateField {
                            element: element.name.clone(),
                            row: row.type_name.clone(),
                            field: field.clone(),
                        });
                    }
                }
            }
            if map.contains_key(&element.name) {
                return Err(GraphError::DuplicateElement(element.name));
            }
            map.insert(element.name.clone(), element);
        }
        log::debug!("built graph with {} elements", map.len());
        Ok(Self { elements: map })
    }

    /// Fetch an element by name inside a flow, failing with
    /// `UnresolvedReference` when it is absent.
    pub fn require_element<'a>(name: Name) -> Flow<'a, Graph<A>, Element<A>> {
        Flow::with_state(move |graph: &Graph<A>| {
            graph
                .lookup(&name)
                .cloned()
                .ok_or(ErrorKind::UnresolvedReference(name))
        })
    }
}

impl<A> Graph<A> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &Name) -> Option<&Element<A>> {
        self.elements.get(name)
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.elements.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.elements.keys()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element<A>> {
        self.elements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{terms, types};

    fn sample() -> anyhow::Result<Graph> {
        Ok(Graph::new(vec![
            Element::new("ns.one", terms::int32(1)).with_type(Some(types::int32())),
            Element::new("ns.greeting", terms::string("hi")),
        ])?)
    }

    #[test]
    fn lookup_by_name() -> anyhow::Result<()> {
        let graph = sample()?;
        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&Name::from("ns.one")));
        let element = graph.lookup(&Name::from("ns.greeting")).map(|e| &e.term);
        assert_eq!(element, Some(&terms::string("hi")));
        assert!(graph.lookup(&Name::from("ns.missing")).is_none());
        let names: Vec<&str> = graph.names().map(Name::as_str).collect();
        assert_eq!(names, vec!["ns.greeting", "ns.one"]);
        Ok(())
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Graph::<()>::new(vec![
            Element::new("ns.x", terms::int32(1)),
            Element::new("ns.x", terms::int32(2)),
        ])
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateElement(Name::from("ns.x")));
    }

    #[test]
    fn duplicate_row_fields_are_rejected() {
        let ty = types::record("ns.P", vec![
            types::field("a", types::int32()),
            types::field("a", types::int32()),
        ]);
        let err = Graph::<()>::new(vec![
            Element::new("ns.p", terms::unit()).with_type(Some(ty)),
        ])
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateField { ref field, .. } if field.as_str() == "a"));
    }

    #[test]
    fn missing_element_fails_without_poisoning_later_lookups() -> anyhow::Result<()> {
        let graph = sample()?;
        let missing = Graph::require_element(Name::from("ns.missing")).run(&graph);
        let err = missing.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnresolvedReference(Name::from("ns.missing")));

        let found = Graph::require_element(Name::from("ns.one")).run(&graph).into_result()?;
        assert_eq!(found.term, terms::int32(1));
        assert_eq!(found.ty, Some(types::int32()));
        Ok(())
    }

    #[test]
    fn element_updates_copy() {
        let element: Element = Element::new("ns.a", terms::int32(1));
        let updated = element.with_meta(Some(())).with_name("ns.b");
        assert_eq!(element.meta, None);
        assert_eq!(updated.meta, Some(()));
        assert_eq!(updated.name, Name::from("ns.b"));
        assert_eq!(updated.term, element.term);
    }
}
