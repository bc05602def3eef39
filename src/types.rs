//! The type side of the algebra: shapes that terms inhabit.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::annotated::Annotated;
use crate::flow::ErrorKind;
use crate::literal::LiteralType;
use crate::name::{FieldName, Name};
use crate::term::{Injection, Record};

/// A data type. `A` is the annotation parameter carried by `Annotated` nodes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Type<A = ()> {
    Annotated(Annotated<Type<A>, A>),
    Application(ApplicationType<A>),
    Function(FunctionType<A>),
    Lambda(LambdaType<A>),
    List(Box<Type<A>>),
    Literal(LiteralType),
    Map(MapType<A>),
    Optional(Box<Type<A>>),
    Product(Vec<Type<A>>),
    Record(RowType<A>),
    Set(Box<Type<A>>),
    Union(RowType<A>),
    Variable(Name),
    Wrap(WrappedType<A>),
}

/// Tag identifying a `Type` constructor, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeVariant {
    Annotated,
    Application,
    Function,
    Lambda,
    List,
    Literal,
    Map,
    Optional,
    Product,
    Record,
    Set,
    Union,
    Variable,
    Wrap,
}

impl TypeVariant {
    pub fn as_atom(self) -> &'static str {
        match self {
            TypeVariant::Annotated => "annotated",
            TypeVariant::Application => "application",
            TypeVariant::Function => "function",
            TypeVariant::Lambda => "lambda",
            TypeVariant::List => "list",
            TypeVariant::Literal => "literal",
            TypeVariant::Map => "map",
            TypeVariant::Optional => "optional",
            TypeVariant::Product => "product",
            TypeVariant::Record => "record",
            TypeVariant::Set => "set",
            TypeVariant::Union => "union",
            TypeVariant::Variable => "variable",
            TypeVariant::Wrap => "wrap",
        }
    }
}

impl fmt::Display for TypeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_atom())
    }
}

impl<A> Type<A> {
    pub fn variant(&self) -> TypeVariant {
        match self {
            Type::Annotated(_) => TypeVariant::Annotated,
            Type::Application(_) => TypeVariant::Application,
            Type::Function(_) => TypeVariant::Function,
            Type::Lambda(_) => TypeVariant::Lambda,
            Type::List(_) => TypeVariant::List,
            Type::Literal(_) => TypeVariant::Literal,
            Type::Map(_) => TypeVariant::Map,
            Type::Optional(_) => TypeVariant::Optional,
            Type::Product(_) => TypeVariant::Product,
            Type::Record(_) => TypeVariant::Record,
            Type::Set(_) => TypeVariant::Set,
            Type::Union(_) => TypeVariant::Union,
            Type::Variable(_) => TypeVariant::Variable,
            Type::Wrap(_) => TypeVariant::Wrap,
        }
    }

    /// Every row type reachable from this type, outermost first.
    pub fn rows(&self) -> Vec<&RowType<A>> {
        let mut out = Vec::new();
        collect_rows(self, &mut out);
        out
    }
}

fn collect_rows<'t, A>(ty: &'t Type<A>, out: &mut Vec<&'t RowType<A>>) {
    match ty {
        Type::Annotated(annotated) => collect_rows(&annotated.subject, out),
        Type::Application(app) => {
            collect_rows(&app.function, out);
            collect_rows(&app.argument, out);
        }
        Type::Function(fun) => {
            collect_rows(&fun.domain, out);
            collect_rows(&fun.codomain, out);
        }
        Type::Lambda(lambda) => collect_rows(&lambda.body, out),
        Type::List(inner) | Type::Optional(inner) | Type::Set(inner) => collect_rows(inner, out),
        Type::Literal(_) | Type::Variable(_) => {}
        Type::Map(map) => {
            collect_rows(&map.keys, out);
            collect_rows(&map.values, out);
        }
        Type::Product(types) => {
            for ty in types {
                collect_rows(ty, out);
            }
        }
        Type::Record(row) | Type::Union(row) => {
            out.push(row);
            for field in &row.fields {
                collect_rows(&field.ty, out);
            }
        }
        Type::Wrap(wrapped) => collect_rows(&wrapped.object, out),
    }
}

/// Type-level application of a type function to an argument.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ApplicationType<A = ()> {
    pub function: Box<Type<A>>,
    pub argument: Box<Type<A>>,
}

impl<A: Clone> ApplicationType<A> {
    pub fn new(function: Type<A>, argument: Type<A>) -> Self {
        Self {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    pub fn with_function(&self, function: Type<A>) -> Self {
        Self {
            function: Box::new(function),
            argument: self.argument.clone(),
        }
    }

    pub fn with_argument(&self, argument: Type<A>) -> Self {
        Self {
            function: self.function.clone(),
            argument: Box::new(argument),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FunctionType<A = ()> {
    pub domain: Box<Type<A>>,
    pub codomain: Box<Type<A>>,
}

impl<A: Clone> FunctionType<A> {
    pub fn new(domain: Type<A>, codomain: Type<A>) -> Self {
        Self {
            domain: Box::new(domain),
            codomain: Box::new(codomain),
        }
    }

    pub fn with_domain(&self, domain: Type<A>) -> Self {
        Self {
            domain: Box::new(domain),
            codomain: self.codomain.clone(),
        }
    }

    pub fn with_codomain(&self, codomain: Type<A>) -> Self {
        Self {
            domain: self.domain.clone(),
            codomain: Box::new(codomain),
        }
    }
}

/// A type abstraction binding one type parameter.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LambdaType<A = ()> {
    pub parameter: Name,
    pub body: Box<Type<A>>,
}

impl<A: Clone> LambdaType<A> {
    pub fn new(parameter: impl Into<Name>, body: Type<A>) -> Self {
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

    pub fn with_body(&self, body: Type<A>) -> Self {
        Self {
            parameter: self.parameter.clone(),
            body: Box::new(body),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MapType<A = ()> {
    pub keys: Box<Type<A>>,
    pub values: Box<Type<A>>,
}

impl<A: Clone> MapType<A> {
    pub fn new(keys: Type<A>, values: Type<A>) -> Self {
        Self {
            keys: Box::new(keys),
            values: Box::new(values),
        }
    }

    pub fn with_keys(&self, keys: Type<A>) -> Self {
        Self {
            keys: Box::new(keys),
            values: self.values.clone(),
        }
    }

    pub fn with_values(&self, values: Type<A>) -> Self {
        Self {
            keys: self.keys.clone(),
            values: Box::new(values),
        }
    }
}

/// A named field paired with its declared type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FieldType<A = ()> {
    pub name: FieldName,
    #[serde(rename = "type")]
    pub ty: Type<A>,
}

impl<A: Clone> FieldType<A> {
    pub fn new(name: impl Into<FieldName>, ty: Type<A>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn with_name(&self, name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            ty: self.ty.clone(),
        }
    }

    pub fn with_type(&self, ty: Type<A>) -> Self {
        Self {
            name: self.name.clone(),
            ty,
        }
    }
}

/// A named, ordered list of fields; the basis of record and union types.
///
/// Field order is part of the row's identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowType<A = ()> {
    pub type_name: Name,
    pub extends: Option<Name>,
    pub fields: Vec<FieldType<A>>,
}

impl<A: Clone> RowType<A> {
    pub fn new(type_name: impl Into<Name>, fields: Vec<FieldType<A>>) -> Self {
        Self {
            type_name: type_name.into(),
            extends: None,
            fields,
        }
    }

    pub fn with_type_name(&self, type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            extends: self.extends.clone(),
            fields: self.fields.clone(),
        }
    }

    pub fn with_extends(&self, extends: Option<Name>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            extends,
            fields: self.fields.clone(),
        }
    }

    pub fn with_fields(&self, fields: Vec<FieldType<A>>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            extends: self.extends.clone(),
            fields,
        }
    }
}

impl<A> RowType<A> {
    pub fn field(&self, name: &FieldName) -> Option<&FieldType<A>> {
        self.fields.iter().find(|field| &field.name == name)
    }

    /// The first field name declared more than once, if any.
    pub fn duplicate_field(&self) -> Option<&FieldName> {
        let mut seen = BTreeSet::new();
        self.fields
            .iter()
            .map(|field| &field.name)
            .find(|name| !seen.insert(*name))
    }

    /// Check that a record supplies exactly this row's fields, in declared order.
    pub fn check_record<B>(&self, record: &Record<B>) -> Result<(), ErrorKind> {
        if record.type_name != self.type_name {
            return Err(ErrorKind::TypeMismatch {
                expected: format!("record of type {}", self.type_name),
                actual: format!("record of type {}", record.type_name),
            });
        }
        let expected: Vec<&FieldName> = self.fields.iter().map(|f| &f.name).collect();
        let actual: Vec<&FieldName> = record.fields.iter().map(|f| &f.name).collect();
        if expected != actual {
            return Err(ErrorKind::TypeMismatch {
                expected: format!("fields [{}]", join_names(&expected)),
                actual: format!("fields [{}]", join_names(&actual)),
            });
        }
        Ok(())
    }

    /// Check that an injection names this row and one of its fields.
    pub fn check_injection<B>(&self, injection: &Injection<B>) -> Result<(), ErrorKind> {
        if injection.type_name != self.type_name {
            return Err(ErrorKind::TypeMismatch {
                expected: format!("injection of type {}", self.type_name),
                actual: format!("injection of type {}", injection.type_name),
            });
        }
        if self.field(&injection.field.name).is_none() {
            return Err(ErrorKind::TypeMismatch {
                expected: format!("a field of {}", self.type_name),
                actual: format!("field {}", injection.field.name),
            });
        }
        Ok(())
    }
}

fn join_names(names: &[&FieldName]) -> String {
    names
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A nominal wrapper around another type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedType<A = ()> {
    pub type_name: Name,
    pub object: Box<Type<A>>,
}

impl<A: Clone> WrappedType<A> {
    pub fn new(type_name: impl Into<Name>, object: Type<A>) -> Self {
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

    pub fn with_object(&self, object: Type<A>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            object: Box::new(object),
        }
    }
}
