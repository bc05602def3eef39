use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigInt;
use ordered_float::OrderedFloat;

use crate::annotated::Annotated;
use crate::literal::{FloatValue, IntegerValue, Literal};
use crate::name::{FieldName, Name};
use crate::term::{
    Application, CaseStatement, Elimination, Field, Function, Injection, Lambda, OptionalCases,
    Projection, Record, Term, WrappedTerm,
};

use super::types::UNIT_TYPE_NAME;

pub fn literal<A>(lit: Literal) -> Term<A> {
    Term::Literal(lit)
}

pub fn binary<A>(bytes: impl Into<Vec<u8>>) -> Term<A> {
    literal(Literal::Binary(bytes.into()))
}

pub fn boolean<A>(value: bool) -> Term<A> {
    literal(Literal::Boolean(value))
}

pub fn string<A>(value: impl Into<String>) -> Term<A> {
    literal(Literal::String(value.into()))
}

pub fn integer<A>(value: IntegerValue) -> Term<A> {
    literal(Literal::Integer(value))
}

pub fn float<A>(value: FloatValue) -> Term<A> {
    literal(Literal::Float(value))
}

pub fn int8<A>(value: i8) -> Term<A> {
    integer(IntegerValue::Int8(value))
}

pub fn int16<A>(value: i16) -> Term<A> {
    integer(IntegerValue::Int16(value))
}

pub fn int32<A>(value: i32) -> Term<A> {
    integer(IntegerValue::Int32(value))
}

pub fn int64<A>(value: i64) -> Term<A> {
    integer(IntegerValue::Int64(value))
}

pub fn uint8<A>(value: u8) -> Term<A> {
    integer(IntegerValue::Uint8(value))
}

pub fn uint16<A>(value: u16) -> Term<A> {
    integer(IntegerValue::Uint16(value))
}

pub fn uint32<A>(value: u32) -> Term<A> {
    integer(IntegerValue::Uint32(value))
}

pub fn uint64<A>(value: u64) -> Term<A> {
    integer(IntegerValue::Uint64(value))
}

pub fn bigint<A>(value: impl Into<BigInt>) -> Term<A> {
    integer(IntegerValue::Bigint(value.into()))
}

pub fn float32<A>(value: f32) -> Term<A> {
    float(FloatValue::Float32(OrderedFloat(value)))
}

pub fn float64<A>(value: f64) -> Term<A> {
    float(FloatValue::Float64(OrderedFloat(value)))
}

pub fn bigfloat<A>(value: f64) -> Term<A> {
    float(FloatValue::Bigfloat(OrderedFloat(value)))
}

pub fn list<A>(elements: Vec<Term<A>>) -> Term<A> {
    Term::List(elements)
}

pub fn set<A: Ord>(elements: Vec<Term<A>>) -> Term<A> {
    Term::Set(elements.into_iter().collect::<BTreeSet<_>>())
}

/// Later entries replace earlier ones with an equal key.
pub fn map<A: Ord>(entries: Vec<(Term<A>, Term<A>)>) -> Term<A> {
    Term::Map(entries.into_iter().collect::<BTreeMap<_, _>>())
}

pub fn product<A>(components: Vec<Term<A>>) -> Term<A> {
    Term::Product(components)
}

pub fn pair<A>(first: Term<A>, second: Term<A>) -> Term<A> {
    product(vec![first, second])
}

pub fn optional<A>(value: Option<Term<A>>) -> Term<A> {
    Term::Optional(value.map(Box::new))
}

pub fn just<A>(value: Term<A>) -> Term<A> {
    optional(Some(value))
}

pub fn nothing<A>() -> Term<A> {
    optional(None)
}

pub fn apply<A>(function: Term<A>, argument: Term<A>) -> Term<A> {
    Term::Application(Application {
        function: Box::new(function),
        argument: Box::new(argument),
    })
}

/// Curried application of `function` to each argument in turn.
pub fn apply_all<A>(function: Term<A>, arguments: impl IntoIterator<Item = Term<A>>) -> Term<A> {
    arguments.into_iter().fold(function, apply)
}

pub fn lambda<A>(parameter: impl Into<Name>, body: Term<A>) -> Term<A> {
    Term::Function(Function::Lambda(Lambda {
        parameter: parameter.into(),
        body: Box::new(body),
    }))
}

pub fn primitive<A>(name: impl Into<Name>) -> Term<A> {
    Term::Function(Function::Primitive(name.into()))
}

pub fn variable<A>(name: impl Into<Name>) -> Term<A> {
    Term::Variable(name.into())
}

pub fn field<A>(name: impl Into<FieldName>, term: Term<A>) -> Field<A> {
    Field {
        name: name.into(),
        term,
    }
}

pub fn record<A>(type_name: impl Into<Name>, fields: Vec<Field<A>>) -> Term<A> {
    Term::Record(Record {
        type_name: type_name.into(),
        fields,
    })
}

pub fn unit<A>() -> Term<A> {
    record(UNIT_TYPE_NAME, Vec::new())
}

pub fn inject<A>(type_name: impl Into<Name>, field: Field<A>) -> Term<A> {
    Term::Union(Injection {
        type_name: type_name.into(),
        field: Box::new(field),
    })
}

/// Injection of a unit-valued alternative.
pub fn enum_value<A>(type_name: impl Into<Name>, alternative: impl Into<FieldName>) -> Term<A> {
    inject(type_name, field(alternative, unit()))
}

pub fn wrap<A>(type_name: impl Into<Name>, object: Term<A>) -> Term<A> {
    Term::Wrap(WrappedTerm {
        type_name: type_name.into(),
        object: Box::new(object),
    })
}

pub fn project<A>(type_name: impl Into<Name>, field: impl Into<FieldName>) -> Term<A> {
    Term::Function(Function::Elimination(Elimination::Record(Projection {
        type_name: type_name.into(),
        field: field.into(),
    })))
}

pub fn unwrap<A>(type_name: impl Into<Name>) -> Term<A> {
    Term::Function(Function::Elimination(Elimination::Wrap(type_name.into())))
}

pub fn cases<A>(
    type_name: impl Into<Name>,
    default: Option<Term<A>>,
    cases: Vec<Field<A>>,
) -> Term<A> {
    Term::Function(Function::Elimination(Elimination::Union(CaseStatement {
        type_name: type_name.into(),
        default: default.map(Box::new),
        cases,
    })))
}

pub fn match_optional<A>(nothing: Term<A>, just: Term<A>) -> Term<A> {
    Term::Function(Function::Elimination(Elimination::Optional(OptionalCases {
        nothing: Box::new(nothing),
        just: Box::new(just),
    })))
}

pub fn annot<A>(annotation: A, subject: Term<A>) -> Term<A> {
    Term::Annotated(Annotated {
        subject: Box::new(subject),
        annotation,
    })
}
