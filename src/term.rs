//! The term side of the algebra: values and expressions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::annotated::Annotated;
use crate::literal::Literal;
use crate::name::{FieldName, Name};

/// A term. Mirrors `Type` constructor for constructor; `A` is the annotation
/// parameter carried by `Annotated` nodes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Term<A = ()> {
    Annotated(Annotated<Term<A>, A>),
    Application(Application<A>),
    Function(Function<A>),
    Literal(Literal),
    List(Vec<Term<A>>),
    Map(#[serde(serialize_with = "serialize_entries")] BTreeMap<Term<A>, Term<A>>),
    Optional(Option<Box<Term<A>>>),
    Product(Vec<Term<A>>),
    Record(Record<A>),
    Set(BTreeSet<Term<A>>),
    Union(Injection<A>),
    Variable(Name),
    Wrap(WrappedTerm<A>),
}

// JSON object keys must be strings, so maps go out as `[[key, value], ...]`.
fn serialize_entries<S, K, V>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    serializer.collect_seq(map.iter())
}

/// Tag identifying a `Term` constructor, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermVariant {
    Annotated,
    Application,
    Function,
    Literal,
    List,
    Map,
    Optional,
    Product,
    Record,
    Set,
    Union,
    Variable,
    Wrap,
}

impl TermVariant {
    pub fn as_atom(self) -> &'static str {
        match self {
            TermVariant::Annotated => "annotated",
            TermVariant::Application => "application",
            TermVariant::Function => "function",
            TermVariant::Literal => "literal",
            TermVariant::List => "list",
            TermVariant::Map => "map",
            TermVariant::Optional => "optional",
            TermVariant::Product => "product",
            TermVariant::Record => "record",
            TermVariant::Set => "set",
            TermVariant::Union => "union",
            TermVariant::Variable => "variable",
            TermVariant::Wrap => "wrap",
        }
    }
}

impl fmt::Display for TermVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_atom())
    }
}

impl<A> Term<A> {
    pub fn variant(&self) -> TermVariant {
        match self {
            Term::Annotated(_) => TermVariant::Annotated,
            Term::Application(_) => TermVariant::Application,
            Term::Function(_) => TermVariant::Function,
            Term::Literal(_) => TermVariant::Literal,
            Term::List(_) => TermVariant::List,
            Term::Map(_) => TermVariant::Map,
            Term::Optional(_) => TermVariant::Optional,
            Term::Product(_) => TermVariant::Product,
            Term::Record(_) => TermVariant::Record,
            Term::Set(_) => TermVariant::Set,
            Term::Union(_) => TermVariant::Union,
            Term::Variable(_) => TermVariant::Variable,
            Term::Wrap(_) => TermVariant::Wrap,
        }
    }

    /// Describe the term's shape for diagnostics; literals report their
    /// literal type rather than just `literal`.
    pub fn describe(&self) -> String {
        match self {
            Term::Literal(lit) => lit.literal_type().to_string(),
            Term::Annotated(annotated) => annotated.subject.describe(),
            other => other.variant().to_string(),
        }
    }
}

/// Application of a function term to a single argument.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Application<A = ()> {
    pub function: Box<Term<A>>,
    pub argument: Box<Term<A>>,
}

impl<A: Clone> Application<A> {
    pub fn new(function: Term<A>, argument: Term<A>) -> Self {
        Self {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    pub fn with_function(&self, function: Term<A>) -> Self {
        Self {
            function: Box::new(function),
            argument: self.argument.clone(),
        }
    }

    pub fn with_argument(&self, argument: Term<A>) -> Self {
        Self {
            function: self.function.clone(),
            argument: Box::new(argument),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Function<A = ()> {
    Elimination(Elimination<A>),
    Lambda(Lambda<A>),
    Primitive(Name),
}

/// Functions which take apart a value of a particular shape.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Elimination<A = ()> {
    Optional(OptionalCases<A>),
    Record(Projection),
    Union(CaseStatement<A>),
    Wrap(Name),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Lambda<A = ()> {
    pub parameter: Name,
    pub body: Box<Term<A>>,
}

impl<A: Clone> Lambda<A> {
    pub fn new(parameter: impl Into<Name>, body: Term<A>) -> Self {
        Self {
            parameter: parameter.into(),
            body: Box::new(body),
        }
    }

    pub fn with_parameter(&self, parameter: impl Into<Name>) -> Self {
        Self {
            parameter: parameter.into(),
            body: self.body.clone(),
        }
    }

    pub fn with_body(&self, body: Term<A>) -> Self {
        Self {
            parameter: self.parameter.clone(),
            body: Box::new(body),
        }
    }
}

/// Selects one field out of a record of the named type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub type_name: Name,
    pub field: FieldName,
}

impl Projection {
    pub fn new(type_name: impl Into<Name>, field: impl Into<FieldName>) -> Self {
        Self {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            field: self.field.clone(),
        }
    }

    pub fn with_field(&self, field: impl Into<FieldName>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            field: field.into(),
        }
    }
}

/// A case per union field; each case term is a function of the field's value.
/// `default` is used as-is when no case matches.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStatement<A = ()> {
    pub type_name: Name,
    pub default: Option<Box<Term<A>>>,
    pub cases: Vec<Field<A>>,
}

impl<A: Clone> CaseStatement<A> {
    pub fn new(type_name: impl Into<Name>, default: Option<Term<A>>, cases: Vec<Field<A>>) -> Self {
        Self {
            type_name: type_name.into(),
            default: default.map(Box::new),
            cases,
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            default: self.default.clone(),
            cases: self.cases.clone(),
        }
    }

    pub fn with_default(&self, default: Option<Term<A>>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            default: default.map(Box::new),
            cases: self.cases.clone(),
        }
    }

    pub fn with_cases(&self, cases: Vec<Field<A>>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            default: self.default.clone(),
            cases,
        }
    }
}

/// Eliminates an optional: `nothing` is the result for an absent value,
/// `just` is applied to a present one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OptionalCases<A = ()> {
    pub nothing: Box<Term<A>>,
    pub just: Box<Term<A>>,
}

impl<A: Clone> OptionalCases<A> {
    pub fn new(nothing: Term<A>, just: Term<A>) -> Self {
        Self {
            nothing: Box::new(nothing),
            just: Box::new(just),
        }
    }

    pub fn with_nothing(&self, nothing: Term<A>) -> Self {
        Self {
            nothing: Box::new(nothing),
            just: self.just.clone(),
        }
    }

    pub fn with_just(&self, just: Term<A>) -> Self {
        Self {
            nothing: self.nothing.clone(),
            just: Box::new(just),
        }
    }
}

/// A field name paired with its value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Field<A = ()> {
    pub name: FieldName,
    pub term: Term<A>,
}

impl<A: Clone> Field<A> {
    pub fn new(name: impl Into<FieldName>, term: Term<A>) -> Self {
        Self {
            name: name.into(),
            term,
        }
    }

    pub fn with_name(&self, name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            term: self.term.clone(),
        }
    }

    pub fn with_term(&self, term: Term<A>) -> Self {
        Self {
            name: self.name.clone(),
            term,
        }
    }
}

/// A record value: one field per field of its row type, in declared order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<A = ()> {
    pub type_name: Name,
    pub fields: Vec<Field<A>>,
}

impl<A: Clone> Record<A> {
    pub fn new(type_name: impl Into<Name>, fields: Vec<Field<A>>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: self.fields.clone(),
        }
    }

    pub fn with_fields(&self, fields: Vec<Field<A>>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            fields,
        }
    }
}

impl<A> Record<A> {
    pub fn field(&self, name: &FieldName) -> Option<&Field<A>> {
        self.fields.iter().find(|field| &field.name == name)
    }
}

/// A union value: exactly one tagged field of its row type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Injection<A = ()> {
    pub type_name: Name,
    pub field: Box<Field<A>>,
}

impl<A: Clone> Injection<A> {
    pub fn new(type_name: impl Into<Name>, field: Field<A>) -> Self {
        Self {
            type_name: type_name.into(),
            field: Box::new(field),
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            field: self.field.clone(),
        }
    }

    pub fn with_field(&self, field: Field<A>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            field: Box::new(field),
        }
    }
}

/// A nominal (newtype) value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedTerm<A = ()> {
    pub type_name: Name,
    pub object: Box<Term<A>>,
}

impl<A: Clone> WrappedTerm<A> {
    pub fn new(type_name: impl Into<Name>, object: Term<A>) -> Self {
        Self {
            type_name: type_name.into(),
            object: Box::new(object),
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            object: self.object.clone(),
        }
    }

    pub fn with_object(&self, object: Term<A>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            object: Box::new(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;
    use crate::dsl::terms;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> Vec<Term> {
        vec![
            terms::int32(1),
            terms::int64(1),
            terms::string("1"),
            terms::list(vec![terms::int32(1), terms::int32(2)]),
            terms::list(vec![terms::int32(2), terms::int32(1)]),
            terms::record("P", vec![
                terms::field("a", terms::int32(1)),
                terms::field("b", terms::int32(2)),
            ]),
            terms::record("P", vec![
                terms::field("b", terms::int32(2)),
                terms::field("a", terms::int32(1)),
            ]),
            terms::inject("U", terms::field("a", terms::unit())),
            terms::apply(terms::primitive("f"), terms::int32(1)),
            terms::annot((), terms::int32(1)),
        ]
    }

    #[test]
    fn equality_is_structural_and_order_sensitive() {
        let items = sample();
        let copies = sample();
        for (i, a) in items.iter().enumerate() {
            for (j, b) in copies.iter().enumerate() {
                assert_eq!(a == b, i == j, "comparing #{i} with #{j}");
                if a == b {
                    assert_eq!(hash_of(a), hash_of(b));
                }
            }
        }
    }

    #[test]
    fn equality_is_transitive_on_deep_copies() {
        let a = terms::map::<()>(vec![(terms::string("k"), terms::list(vec![terms::int32(3)]))]);
        let b = a.clone();
        let c = b.clone();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, c);
        assert_eq!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn annotations_take_part_in_equality() {
        let plain: Term<u32> = terms::int32(1);
        let tagged = terms::annot(7u32, terms::int32(1));
        let retagged = terms::annot(8u32, terms::int32(1));
        assert_ne!(plain, tagged);
        assert_ne!(tagged, retagged);
        let Term::Annotated(annotated) = &tagged else { unreachable!() };
        assert_eq!(Term::Annotated(annotated.with_annotation(8)), retagged);
    }

    #[test]
    fn describe_reports_literal_types() {
        assert_eq!(terms::uint64::<()>(7).describe(), "uint64");
        assert_eq!(terms::list::<()>(vec![]).describe(), "list");
        assert_eq!(terms::annot((), terms::string("x")).describe(), "string");
    }

    #[test]
    fn map_serializes_as_pairs() {
        let map = terms::map::<()>(vec![(terms::int32(1), terms::string("a"))]);
        let json = serde_json::to_value(&map).unwrap();
        let entries = json.get("map").and_then(|v| v.as_array()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_array().map(|pair| pair.len()), Some(2));
    }
}
