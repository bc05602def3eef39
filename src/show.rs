//! Human-readable rendering of types and terms.
//!
//! Terms render in the same textual syntax `syntax::parse_term` reads back for
//! data values: literals, containers, optionals, primitives and applications.
//! Records, unions, wraps and functions render in a descriptive form only.

use std::fmt;

use crate::term::{Elimination, Field, Function, Term};
use crate::types::{FieldType, RowType, Type};

impl<A> fmt::Display for Type<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Annotated(annotated) => write!(f, "{}", annotated.subject),
            Type::Application(app) => write!(f, "({} @ {})", app.function, app.argument),
            Type::Function(fun) => {
                if matches!(*fun.domain, Type::Function(_)) {
                    write!(f, "({}) -> {}", fun.domain, fun.codomain)
                } else {
                    write!(f, "{} -> {}", fun.domain, fun.codomain)
                }
            }
            Type::Lambda(lambda) => write!(f, "forall {}. {}", lambda.parameter, lambda.body),
            Type::List(inner) => write!(f, "list<{inner}>"),
            Type::Literal(lt) => write!(f, "{lt}"),
            Type::Map(map) => write!(f, "map<{}, {}>", map.keys, map.values),
            Type::Optional(inner) => write!(f, "optional<{inner}>"),
            Type::Product(types) => {
                f.write_str("(")?;
                write_separated(f, types, ", ")?;
                f.write_str(")")
            }
            Type::Record(row) => write_row(f, "record", row),
            Type::Set(inner) => write!(f, "set<{inner}>"),
            Type::Union(row) => write_row(f, "union", row),
            Type::Variable(name) => write!(f, "{name}"),
            Type::Wrap(wrapped) => write!(f, "{}({})", wrapped.type_name, wrapped.object),
        }
    }
}

fn write_row<A>(f: &mut fmt::Formatter<'_>, keyword: &str, row: &RowType<A>) -> fmt::Result {
    write!(f, "{keyword} {}", row.type_name)?;
    if let Some(base) = &row.extends {
        write!(f, " extends {base}")?;
    }
    f.write_str("{")?;
    for (idx, FieldType { name, ty }) in row.fields.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}: {ty}")?;
    }
    f.write_str("}")
}

impl<A> fmt::Display for Term<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Annotated(annotated) => write!(f, "{}", annotated.subject),
            Term::Application(_) => {
                let mut head = self;
                let mut args = Vec::new();
                while let Term::Application(app) = head {
                    args.push(app.argument.as_ref());
                    head = app.function.as_ref();
                }
                args.reverse();
                write!(f, "{head}(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
            Term::Function(function) => write!(f, "{function}"),
            Term::Literal(lit) => write!(f, "{lit}"),
            Term::List(items) => {
                f.write_str("[")?;
                write_separated(f, items, ", ")?;
                f.write_str("]")
            }
            Term::Map(map) => {
                if map.is_empty() {
                    return f.write_str("{=>}");
                }
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                f.write_str("}")
            }
            Term::Optional(None) => f.write_str("nothing"),
            Term::Optional(Some(inner)) => write!(f, "just({inner})"),
            Term::Product(items) => {
                f.write_str("(")?;
                write_separated(f, items, ", ")?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Term::Record(record) => {
                write!(f, "{}", record.type_name)?;
                write_fields(f, &record.fields)
            }
            Term::Set(items) => {
                f.write_str("{")?;
                write_separated(f, items, ", ")?;
                f.write_str("}")
            }
            Term::Union(injection) => {
                write!(f, "inject({})", injection.type_name)?;
                write_fields(f, std::slice::from_ref(injection.field.as_ref()))
            }
            Term::Variable(name) => write!(f, "{name}"),
            Term::Wrap(wrapped) => write!(f, "wrap({}){{{}}}", wrapped.type_name, wrapped.object),
        }
    }
}

impl<A> fmt::Display for Function<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Lambda(lambda) => write!(f, "\\{}. {}", lambda.parameter, lambda.body),
            Function::Primitive(name) => write!(f, "{name}"),
            Function::Elimination(Elimination::Record(projection)) => {
                write!(f, "project({}){{{}}}", projection.type_name, projection.field)
            }
            Function::Elimination(Elimination::Union(cases)) => {
                write!(f, "cases({})", cases.type_name)?;
                write_fields(f, &cases.cases)?;
                if let Some(default) = &cases.default {
                    write!(f, " else {default}")?;
                }
                Ok(())
            }
            Function::Elimination(Elimination::Wrap(name)) => write!(f, "unwrap({name})"),
            Function::Elimination(Elimination::Optional(cases)) => {
                write!(f, "optional{{nothing={}, just={}}}", cases.nothing, cases.just)
            }
        }
    }
}

fn write_fields<A>(f: &mut fmt::Formatter<'_>, fields: &[Field<A>]) -> fmt::Result {
    f.write_str("{")?;
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", field.name, field.term)?;
    }
    f.write_str("}")
}

fn write_separated<I>(f: &mut fmt::Formatter<'_>, items: I, separator: &str) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::dsl::{terms, types};
    use crate::term::Term;
    use crate::types::Type;

    #[test]
    fn shows_curried_signatures() {
        let ty: Type = types::lambda(
            "x",
            types::curried([types::var("x"), types::list(types::var("x"))], types::list(types::var("x"))),
        );
        assert_eq!(ty.to_string(), "forall x. x -> list<x> -> list<x>");

        let higher: Type = types::function(
            types::function(types::int32(), types::int32()),
            types::int32(),
        );
        assert_eq!(higher.to_string(), "(int32 -> int32) -> int32");
    }

    #[test]
    fn shows_rows() {
        let ty: Type = types::record("Point", vec![
            types::field("x", types::float64()),
            types::field("y", types::float64()),
        ]);
        assert_eq!(ty.to_string(), "record Point{x: float64, y: float64}");
    }

    #[test]
    fn shows_applications_flattened() {
        let term: Term = terms::apply_all(
            terms::primitive("hydra/lib/math.add"),
            [terms::int32(2), terms::int32(3)],
        );
        assert_eq!(term.to_string(), "hydra/lib/math.add(2, 3)");
    }

    #[test]
    fn shows_containers() {
        let term: Term = terms::list(vec![
            terms::just(terms::string("a")),
            terms::nothing(),
            terms::pair(terms::uint64(7), terms::boolean(true)),
        ]);
        assert_eq!(term.to_string(), "[just(\"a\"), nothing, (7:uint64, true)]");
        assert_eq!(terms::map::<()>(vec![]).to_string(), "{=>}");
        assert_eq!(terms::set::<()>(vec![]).to_string(), "{}");
        assert_eq!(
            terms::map::<()>(vec![(terms::int32(1), terms::string("b"))]).to_string(),
            "{1 => \"b\"}"
        );
    }
}
