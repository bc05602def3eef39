use crate::annotated::Annotated;
use crate::literal::{FloatType, IntegerType, LiteralType};
use crate::name::{FieldName, Name};
use crate::types::{
    ApplicationType, FieldType, FunctionType, LambdaType, MapType, RowType, Type, WrappedType,
};

/// Name of the zero-field record standing in for "no information".
pub const UNIT_TYPE_NAME: &str = "hydra/core.Unit";

pub fn literal<A>(lt: LiteralType) -> Type<A> {
    Type::Literal(lt)
}

pub fn binary<A>() -> Type<A> {
    literal(LiteralType::Binary)
}

pub fn boolean<A>() -> Type<A> {
    literal(LiteralType::Boolean)
}

pub fn string<A>() -> Type<A> {
    literal(LiteralType::String)
}

pub fn integer<A>(it: IntegerType) -> Type<A> {
    literal(LiteralType::Integer(it))
}

pub fn float<A>(ft: FloatType) -> Type<A> {
    literal(LiteralType::Float(ft))
}

pub fn int8<A>() -> Type<A> {
    integer(IntegerType::Int8)
}

pub fn int16<A>() -> Type<A> {
    integer(IntegerType::Int16)
}

pub fn int32<A>() -> Type<A> {
    integer(IntegerType::Int32)
}

pub fn int64<A>() -> Type<A> {
    integer(IntegerType::Int64)
}

pub fn uint8<A>() -> Type<A> {
    integer(IntegerType::Uint8)
}

pub fn uint16<A>() -> Type<A> {
    integer(IntegerType::Uint16)
}

pub fn uint32<A>() -> Type<A> {
    integer(IntegerType::Uint32)
}

pub fn uint64<A>() -> Type<A> {
    integer(IntegerType::Uint64)
}

pub fn bigint<A>() -> Type<A> {
    integer(IntegerType::Bigint)
}

pub fn float32<A>() -> Type<A> {
    float(FloatType::Float32)
}

pub fn float64<A>() -> Type<A> {
    float(FloatType::Float64)
}

pub fn bigfloat<A>() -> Type<A> {
    float(FloatType::Bigfloat)
}

pub fn list<A>(element: Type<A>) -> Type<A> {
    Type::List(Box::new(element))
}

pub fn set<A>(element: Type<A>) -> Type<A> {
    Type::Set(Box::new(element))
}

pub fn map<A>(keys: Type<A>, values: Type<A>) -> Type<A> {
    Type::Map(MapType {
        keys: Box::new(keys),
        values: Box::new(values),
    })
}

pub fn optional<A>(inner: Type<A>) -> Type<A> {
    Type::Optional(Box::new(inner))
}

pub fn product<A>(components: Vec<Type<A>>) -> Type<A> {
    Type::Product(components)
}

pub fn pair<A>(first: Type<A>, second: Type<A>) -> Type<A> {
    product(vec![first, second])
}

pub fn field<A>(name: impl Into<FieldName>, ty: Type<A>) -> FieldType<A> {
    FieldType {
        name: name.into(),
        ty,
    }
}

pub fn row<A>(type_name: impl Into<Name>, fields: Vec<FieldType<A>>) -> RowType<A> {
    RowType {
        type_name: type_name.into(),
        extends: None,
        fields,
    }
}

pub fn record<A>(type_name: impl Into<Name>, fields: Vec<FieldType<A>>) -> Type<A> {
    Type::Record(row(type_name, fields))
}

pub fn union<A>(type_name: impl Into<Name>, fields: Vec<FieldType<A>>) -> Type<A> {
    Type::Union(row(type_name, fields))
}

/// A union whose every alternative carries the unit type.
pub fn enum_<A>(type_name: impl Into<Name>, alternatives: &[&str]) -> Type<A> {
    union(
        type_name,
        alternatives.iter().map(|alt| field(*alt, unit())).collect(),
    )
}

pub fn unit<A>() -> Type<A> {
    record(UNIT_TYPE_NAME, Vec::new())
}

pub fn wrap<A>(type_name: impl Into<Name>, object: Type<A>) -> Type<A> {
    Type::Wrap(WrappedType {
        type_name: type_name.into(),
        object: Box::new(object),
    })
}

pub fn function<A>(domain: Type<A>, codomain: Type<A>) -> Type<A> {
    Type::Function(FunctionType {
        domain: Box::new(domain),
        codomain: Box::new(codomain),
    })
}

/// `d1 -> d2 -> ... -> codomain`.
pub fn curried<A>(domains: impl IntoIterator<Item = Type<A>>, codomain: Type<A>) -> Type<A> {
    let domains: Vec<Type<A>> = domains.into_iter().collect();
    domains
        .into_iter()
        .rev()
        .fold(codomain, |acc, domain| function(domain, acc))
}

pub fn lambda<A>(parameter: impl Into<Name>, body: Type<A>) -> Type<A> {
    Type::Lambda(LambdaType {
        parameter: parameter.into(),
        body: Box::new(body),
    })
}

/// Bind several type parameters, outermost first.
pub fn lambdas<A>(parameters: &[&str], body: Type<A>) -> Type<A> {
    parameters
        .iter()
        .rev()
        .fold(body, |acc, parameter| lambda(*parameter, acc))
}

pub fn var<A>(name: impl Into<Name>) -> Type<A> {
    Type::Variable(name.into())
}

pub fn apply<A>(function: Type<A>, argument: Type<A>) -> Type<A> {
    Type::Application(ApplicationType {
        function: Box::new(function),
        argument: Box::new(argument),
    })
}

pub fn annot<A>(annotation: A, subject: Type<A>) -> Type<A> {
    Type::Annotated(Annotated {
        subject: Box::new(subject),
        annotation,
    })
}
