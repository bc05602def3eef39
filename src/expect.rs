//! Decoders from terms to native Rust values.
//!
//! Every decoder peels annotations, checks the term's shape, and yields a
//! flow that fails with `TypeMismatch` naming the expected and actual shapes.
//! Decoders are generic over the flow state so primitives can use them
//! against a graph while tests use `()`.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigInt;

use crate::flow::{ErrorKind, Flow, traverse};
use crate::literal::{FloatValue, IntegerValue, Literal};
use crate::name::{FieldName, Name};
use crate::rewrite::into_stripped_term;
use crate::term::{Field, Record, Term};
use crate::types::RowType;

fn mismatch<A>(expected: impl Into<String>, actual: &Term<A>) -> ErrorKind {
    ErrorKind::mismatch(expected, actual.describe())
}

/// Accept any term unchanged.
pub fn term<'a, S: 'a, A: 'a>(term: Term<A>) -> Flow<'a, S, Term<A>> {
    Flow::pure(term)
}

pub fn literal<'a, S: 'a, A: 'a>(term: Term<A>) -> Flow<'a, S, Literal> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Literal(lit) => Ok(lit),
        other => Err(mismatch("literal", &other)),
    })
}

macro_rules! literal_decoder {
    ($name:ident, $native:ty, $expected:literal, $pattern:pat => $value:expr) => {
        pub fn $name<'a, S: 'a, A: 'a>(term: Term<A>) -> Flow<'a, S, $native> {
            Flow::from_result(match into_stripped_term(term) {
                Term::Literal($pattern) => Ok($value),
                other => Err(mismatch($expected, &other)),
            })
        }
    };
}

literal_decoder!(binary, Vec<u8>, "binary", Literal::Binary(bytes) => bytes);
literal_decoder!(boolean, bool, "boolean", Literal::Boolean(value) => value);
literal_decoder!(string, String, "string", Literal::String(value) => value);
literal_decoder!(int8, i8, "int8", Literal::Integer(IntegerValue::Int8(v)) => v);
literal_decoder!(int16, i16, "int16", Literal::Integer(IntegerValue::Int16(v)) => v);
literal_decoder!(int32, i32, "int32", Literal::Integer(IntegerValue::Int32(v)) => v);
literal_decoder!(int64, i64, "int64", Literal::Integer(IntegerValue::Int64(v)) => v);
literal_decoder!(uint8, u8, "uint8", Literal::Integer(IntegerValue::Uint8(v)) => v);
literal_decoder!(uint16, u16, "uint16", Literal::Integer(IntegerValue::Uint16(v)) => v);
literal_decoder!(uint32, u32, "uint32", Literal::Integer(IntegerValue::Uint32(v)) => v);
literal_decoder!(uint64, u64, "uint64", Literal::Integer(IntegerValue::Uint64(v)) => v);
literal_decoder!(bigint, BigInt, "bigint", Literal::Integer(IntegerValue::Bigint(v)) => v);
literal_decoder!(float32, f32, "float32", Literal::Float(FloatValue::Float32(v)) => v.into_inner());
literal_decoder!(float64, f64, "float64", Literal::Float(FloatValue::Float64(v)) => v.into_inner());
literal_decoder!(bigfloat, f64, "bigfloat", Literal::Float(FloatValue::Bigfloat(v)) => v.into_inner());

/// Decode each element in order. A failure carries a `list element {i}`
/// frame naming the offending index.
pub fn list<'a, S, A, X, F>(decoder: F, term: Term<A>) -> Flow<'a, S, Vec<X>>
where
    S: 'a,
    A: 'a,
    X: 'a,
    F: Fn(Term<A>) -> Flow<'a, S, X> + 'a,
{
    match into_stripped_term(term) {
        Term::List(items) => traverse(items.into_iter().enumerate(), move |(idx, item)| {
            decoder(item).with_trace(format!("list element {idx}"))
        }),
        other => Flow::fail(mismatch("list", &other)),
    }
}

pub fn set<'a, S, A, X, F>(decoder: F, term: Term<A>) -> Flow<'a, S, BTreeSet<X>>
where
    S: 'a,
    A: 'a,
    X: Ord + 'a,
    F: Fn(Term<A>) -> Flow<'a, S, X> + 'a,
{
    match into_stripped_term(term) {
        Term::Set(items) => traverse(items, decoder).map(|decoded| decoded.into_iter().collect()),
        other => Flow::fail(mismatch("set", &other)),
    }
}

pub fn map<'a, S, A, K, V, FK, FV>(
    key_decoder: FK,
    value_decoder: FV,
    term: Term<A>,
) -> Flow<'a, S, BTreeMap<K, V>>
where
    S: 'a,
    A: 'a,
    K: Ord + 'a,
    V: 'a,
    FK: Fn(Term<A>) -> Flow<'a, S, K> + 'a,
    FV: Fn(Term<A>) -> Flow<'a, S, V> + 'a,
{
    match into_stripped_term(term) {
        Term::Map(entries) => traverse(entries, move |(key, value)| {
            key_decoder(key).map2(value_decoder(value), |k, v| (k, v))
        })
        .map(|decoded| decoded.into_iter().collect()),
        other => Flow::fail(mismatch("map", &other)),
    }
}

pub fn optional<'a, S, A, X, F>(decoder: F, term: Term<A>) -> Flow<'a, S, Option<X>>
where
    S: 'a,
    A: 'a,
    X: 'a,
    F: FnOnce(Term<A>) -> Flow<'a, S, X>,
{
    match into_stripped_term(term) {
        Term::Optional(None) => Flow::pure(None),
        Term::Optional(Some(inner)) => decoder(*inner).map(Some),
        other => Flow::fail(mismatch("optional", &other)),
    }
}

/// A two-element product, decoded left component first.
pub fn pair<'a, S, A, X, Y, FX, FY>(
    first: FX,
    second: FY,
    term: Term<A>,
) -> Flow<'a, S, (X, Y)>
where
    S: 'a,
    A: 'a,
    X: 'a,
    Y: 'a,
    FX: FnOnce(Term<A>) -> Flow<'a, S, X>,
    FY: FnOnce(Term<A>) -> Flow<'a, S, Y> + 'a,
{
    match into_stripped_term(term) {
        Term::Product(items) => match <[Term<A>; 2]>::try_from(items) {
            Ok([left, right]) => first(left).bind(move |x| second(right).map(move |y| (x, y))),
            Err(items) => Flow::fail(ErrorKind::mismatch(
                "pair",
                format!("product of {} components", items.len()),
            )),
        },
        other => Flow::fail(mismatch("pair", &other)),
    }
}

pub fn product<'a, S: 'a, A: 'a>(term: Term<A>) -> Flow<'a, S, Vec<Term<A>>> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Product(items) => Ok(items),
        other => Err(mismatch("product", &other)),
    })
}

/// The fields of a record of the named type.
pub fn record<'a, S: 'a, A: 'a>(type_name: &Name, term: Term<A>) -> Flow<'a, S, Vec<Field<A>>> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Record(record) if &record.type_name == type_name => Ok(record.fields),
        Term::Record(record) => Err(ErrorKind::mismatch(
            format!("record of type {type_name}"),
            format!("record of type {}", record.type_name),
        )),
        other => Err(mismatch(format!("record of type {type_name}"), &other)),
    })
}

/// A record supplying exactly the row's fields, in declared order.
pub fn conforming_record<'a, S: 'a, A: 'a, B>(
    row: &RowType<B>,
    term: Term<A>,
) -> Flow<'a, S, Record<A>> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Record(record) => row.check_record(&record).map(|()| record),
        other => Err(mismatch(format!("record of type {}", row.type_name), &other)),
    })
}

/// Decode the named field out of a record's fields.
pub fn field<'a, S, A, X, F>(name: &FieldName, decoder: F, fields: &[Field<A>]) -> Flow<'a, S, X>
where
    S: 'a,
    A: Clone + 'a,
    X: 'a,
    F: FnOnce(Term<A>) -> Flow<'a, S, X>,
{
    match fields.iter().find(|field| &field.name == name) {
        Some(found) => decoder(found.term.clone()).with_trace(format!("field {name}")),
        None => Flow::fail(ErrorKind::mismatch(
            format!("field {name}"),
            "no such field",
        )),
    }
}

/// The selected field of an injection into the named union.
pub fn injection<'a, S: 'a, A: 'a>(type_name: &Name, term: Term<A>) -> Flow<'a, S, Field<A>> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Union(injection) if &injection.type_name == type_name => Ok(*injection.field),
        Term::Union(injection) => Err(ErrorKind::mismatch(
            format!("injection of type {type_name}"),
            format!("injection of type {}", injection.type_name),
        )),
        other => Err(mismatch(format!("injection of type {type_name}"), &other)),
    })
}

/// The object inside a wrapper of the named type.
pub fn wrap<'a, S: 'a, A: 'a>(type_name: &Name, term: Term<A>) -> Flow<'a, S, Term<A>> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Wrap(wrapped) if &wrapped.type_name == type_name => Ok(*wrapped.object),
        Term::Wrap(wrapped) => Err(ErrorKind::mismatch(
            format!("wrapper of type {type_name}"),
            format!("wrapper of type {}", wrapped.type_name),
        )),
        other => Err(mismatch(format!("wrapper of type {type_name}"), &other)),
    })
}

pub fn variable<'a, S: 'a, A: 'a>(term: Term<A>) -> Flow<'a, S, Name> {
    Flow::from_result(match into_stripped_term(term) {
        Term::Variable(name) => Ok(name),
        other => Err(mismatch("variable", &other)),
    })
}
