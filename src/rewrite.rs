//! Immutable traversals over terms and types.

use std::collections::BTreeSet;

use crate::annotated::Annotated;
use crate::name::Name;
use crate::term::{
    Application, CaseStatement, Elimination, Field, Function, Injection, Lambda, OptionalCases,
    Record, Term, WrappedTerm,
};
use crate::types::Type;

/// Peel any `Annotated` wrappers off a term.
pub fn strip_term<A>(term: &Term<A>) -> &Term<A> {
    let mut current = term;
    while let Term::Annotated(annotated) = current {
        current = &annotated.subject;
    }
    current
}

/// Owned variant of [`strip_term`].
pub fn into_stripped_term<A>(term: Term<A>) -> Term<A> {
    let mut current = term;
    while let Term::Annotated(annotated) = current {
        current = *annotated.subject;
    }
    current
}

/// Peel any `Annotated` wrappers off a type.
pub fn strip_type<A>(ty: &Type<A>) -> &Type<A> {
    let mut current = ty;
    while let Type::Annotated(annotated) = current {
        current = &annotated.subject;
    }
    current
}

/// Rebuild `term` with `f` applied to each immediate subterm, left to right.
pub fn map_subterms<A, F>(term: Term<A>, mut f: F) -> Term<A>
where
    A: Ord,
    F: FnMut(Term<A>) -> Term<A>,
{
    let mut boxed = |t: Box<Term<A>>| Box::new(f(*t));
    match term {
        Term::Annotated(Annotated {
            subject,
            annotation,
        }) => Term::Annotated(Annotated {
            subject: boxed(subject),
            annotation,
        }),
        Term::Application(Application { function, argument }) => {
            let function = boxed(function);
            let argument = boxed(argument);
            Term::Application(Application { function, argument })
        }
        Term::Function(function) => Term::Function(map_function(function, &mut boxed)),
        Term::Literal(lit) => Term::Literal(lit),
        Term::List(items) => Term::List(items.into_iter().map(|t| *boxed(Box::new(t))).collect()),
        Term::Map(map) => Term::Map(
            map.into_iter()
                .map(|(k, v)| (*boxed(Box::new(k)), *boxed(Box::new(v))))
                .collect(),
        ),
        Term::Optional(inner) => Term::Optional(inner.map(boxed)),
        Term::Product(items) => {
            Term::Product(items.into_iter().map(|t| *boxed(Box::new(t))).collect())
        }
        Term::Record(Record { type_name, fields }) => Term::Record(Record {
            type_name,
            fields: map_fields(fields, &mut boxed),
        }),
        Term::Set(items) => Term::Set(items.into_iter().map(|t| *boxed(Box::new(t))).collect()),
        Term::Union(Injection { type_name, field }) => Term::Union(Injection {
            type_name,
            field: Box::new(Field {
                name: field.name,
                term: *boxed(Box::new(field.term)),
            }),
        }),
        Term::Variable(name) => Term::Variable(name),
        Term::Wrap(WrappedTerm { type_name, object }) => Term::Wrap(WrappedTerm {
            type_name,
            object: boxed(object),
        }),
    }
}

fn map_function<A, F>(function: Function<A>, boxed: &mut F) -> Function<A>
where
    F: FnMut(Box<Term<A>>) -> Box<Term<A>>,
{
    match function {
        Function::Lambda(Lambda { parameter, body }) => Function::Lambda(Lambda {
            parameter,
            body: boxed(body),
        }),
        Function::Primitive(name) => Function::Primitive(name),
        Function::Elimination(Elimination::Record(projection)) => {
            Function::Elimination(Elimination::Record(projection))
        }
        Function::Elimination(Elimination::Wrap(name)) => {
            Function::Elimination(Elimination::Wrap(name))
        }
        Function::Elimination(Elimination::Union(CaseStatement {
            type_name,
            default,
            cases,
        })) => {
            let default = default.map(&mut *boxed);
            let cases = map_fields(cases, boxed);
            Function::Elimination(Elimination::Union(CaseStatement {
                type_name,
                default,
                cases,
            }))
        }
        Function::Elimination(Elimination::Optional(OptionalCases { nothing, just })) => {
            let nothing = boxed(nothing);
            let just = boxed(just);
            Function::Elimination(Elimination::Optional(OptionalCases { nothing, just }))
        }
    }
}

fn map_fields<A, F>(fields: Vec<Field<A>>, boxed: &mut F) -> Vec<Field<A>>
where
    F: FnMut(Box<Term<A>>) -> Box<Term<A>>,
{
    fields
        .into_iter()
        .map(|field| Field {
            name: field.name,
            term: *boxed(Box::new(field.term)),
        })
        .collect()
}

/// The immediate subterms of a term, in traversal order.
pub fn subterms<A>(term: &Term<A>) -> Vec<&Term<A>> {
    match term {
        Term::Annotated(annotated) => vec![&annotated.subject],
        Term::Application(app) => vec![&app.function, &app.argument],
        Term::Function(Function::Lambda(lambda)) => vec![&lambda.body],
        Term::Function(Function::Primitive(_)) => Vec::new(),
        Term::Function(Function::Elimination(elimination)) => match elimination {
            Elimination::Record(_) | Elimination::Wrap(_) => Vec::new(),
            Elimination::Union(cases) => cases
                .default
                .iter()
                .map(|d| d.as_ref())
                .chain(cases.cases.iter().map(|c| &c.term))
                .collect(),
            Elimination::Optional(cases) => vec![&cases.nothing, &cases.just],
        },
        Term::Literal(_) | Term::Variable(_) => Vec::new(),
        Term::List(items) | Term::Product(items) => items.iter().collect(),
        Term::Map(map) => map.iter().flat_map(|(k, v)| [k, v]).collect(),
        Term::Optional(inner) => inner.iter().map(|t| t.as_ref()).collect(),
        Term::Record(record) => record.fields.iter().map(|f| &f.term).collect(),
        Term::Set(items) => items.iter().collect(),
        Term::Union(injection) => vec![&injection.field.term],
        Term::Wrap(wrapped) => vec![&wrapped.object],
    }
}

/// Variables occurring in `term` that no enclosing lambda binds.
pub fn free_variables<A>(term: &Term<A>) -> BTreeSet<Name> {
    let mut out = BTreeSet::new();
    collect_free(term, &mut Vec::new(), &mut out);
    out
}

fn collect_free<'t, A>(term: &'t Term<A>, bound: &mut Vec<&'t Name>, out: &mut BTreeSet<Name>) {
    match term {
        Term::Variable(name) => {
            if !bound.contains(&name) {
                out.insert(name.clone());
            }
        }
        Term::Function(Function::Lambda(lambda)) => {
            bound.push(&lambda.parameter);
            collect_free(&lambda.body, bound, out);
            bound.pop();
        }
        other => {
            for sub in subterms(other) {
                collect_free(sub, bound, out);
            }
        }
    }
}

/// Replace free occurrences of `name` with `replacement`. Lambdas rebinding
/// `name` shadow it and are left untouched; lambdas binding a free variable
/// of `replacement` are renamed first so it is never captured.
pub fn substitute<A>(name: &Name, replacement: &Term<A>, term: Term<A>) -> Term<A>
where
    A: Clone + Ord,
{
    let free = free_variables(replacement);
    substitute_avoiding(name, replacement, &free, term)
}

fn substitute_avoiding<A>(
    name: &Name,
    replacement: &Term<A>,
    free: &BTreeSet<Name>,
    term: Term<A>,
) -> Term<A>
where
    A: Clone + Ord,
{
    match term {
        Term::Variable(var) if &var == name => replacement.clone(),
        Term::Function(Function::Lambda(lambda)) if &lambda.parameter == name => {
            Term::Function(Function::Lambda(lambda))
        }
        Term::Function(Function::Lambda(Lambda { parameter, body }))
            if free.contains(&parameter) =>
        {
            let body_free = free_variables(&body);
            if !body_free.contains(name) {
                return Term::Function(Function::Lambda(Lambda { parameter, body }));
            }
            let fresh = fresh_name(&parameter, |candidate| {
                candidate == name || free.contains(candidate) || body_free.contains(candidate)
            });
            log::trace!("renaming \\{parameter} to \\{fresh} to avoid capture");
            let renamed = substitute(&parameter, &Term::Variable(fresh.clone()), *body);
            Term::Function(Function::Lambda(Lambda {
                parameter: fresh,
                body: Box::new(substitute_avoiding(name, replacement, free, renamed)),
            }))
        }
        other => map_subterms(other, |sub| substitute_avoiding(name, replacement, free, sub)),
    }
}

/// `base` with the smallest numeric suffix that `taken` rejects.
fn fresh_name(base: &Name, taken: impl Fn(&Name) -> bool) -> Name {
    (1..)
        .map(|n| Name::new(format!("{base}{n}")))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::terms;

    #[test]
    fn strips_nested_annotations() {
        let term: Term<u8> = terms::annot(1, terms::annot(2, terms::int32(3)));
        assert_eq!(strip_term(&term), &terms::int32(3));
        assert_eq!(into_stripped_term(term), terms::int32(3));
    }

    #[test]
    fn free_variables_respect_binders() {
        let term: Term = terms::apply(
            terms::lambda("x", terms::apply(terms::variable("x"), terms::variable("y"))),
            terms::variable("z"),
        );
        let free: Vec<String> = free_variables(&term)
            .into_iter()
            .map(|n| n.as_str().to_string())
            .collect();
        assert_eq!(free, vec!["y", "z"]);
    }

    #[test]
    fn substitution_stops_at_shadowing_lambda() {
        let body: Term = terms::list(vec![
            terms::variable("x"),
            terms::lambda("x", terms::variable("x")),
            terms::lambda("y", terms::variable("x")),
        ]);
        let result = substitute(&Name::from("x"), &terms::int32(1), body);
        assert_eq!(
            result,
            terms::list(vec![
                terms::int32(1),
                terms::lambda("x", terms::variable("x")),
                terms::lambda("y", terms::int32(1)),
            ])
        );
    }

    #[test]
    fn substitution_avoids_capture() {
        // \w. x with x := \z. w must not bind the replacement's free w.
        let body: Term = terms::lambda("w", terms::apply(terms::variable("x"), terms::variable("w")));
        let replacement: Term = terms::lambda("z", terms::variable("w"));
        let result = substitute(&Name::from("x"), &replacement, body);
        assert_eq!(
            result,
            terms::lambda(
                "w1",
                terms::apply(terms::lambda("z", terms::variable("w")), terms::variable("w1"))
            )
        );
        assert!(free_variables(&result).contains(&Name::from("w")));
    }

    #[test]
    fn renaming_skips_names_already_in_use() {
        let body: Term = terms::lambda(
            "w",
            terms::list(vec![terms::variable("x"), terms::variable("w"), terms::variable("w1")]),
        );
        let result = substitute(&Name::from("x"), &terms::variable("w"), body);
        assert_eq!(
            result,
            terms::lambda(
                "w2",
                terms::list(vec![terms::variable("w"), terms::variable("w2"), terms::variable("w1")])
            )
        );
    }

    #[test]
    fn binder_clash_without_occurrence_is_left_alone() {
        let body: Term = terms::lambda("w", terms::variable("w"));
        let result = substitute(&Name::from("x"), &terms::variable("w"), body.clone());
        assert_eq!(result, body);
    }

    #[test]
    fn substitution_reaches_case_branches() {
        let cases: Term = terms::cases(
            "U",
            Some(terms::variable("x")),
            vec![terms::field("a", terms::lambda("v", terms::variable("x")))],
        );
        let result = substitute(&Name::from("x"), &terms::string("s"), cases);
        assert_eq!(
            result,
            terms::cases(
                "U",
                Some(terms::string("s")),
                vec![terms::field("a", terms::lambda("v", terms::string("s")))],
            )
        );
    }

    #[test]
    fn subterms_are_ordered() {
        let term: Term = terms::record("R", vec![
            terms::field("a", terms::int32(1)),
            terms::field("b", terms::int32(2)),
        ]);
        assert_eq!(subterms(&term), vec![&terms::int32(1), &terms::int32(2)]);
    }

    #[test]
    fn map_subterms_is_shallow() {
        let term: Term = terms::list(vec![terms::list(vec![terms::int32(1)])]);
        let mut visited = 0;
        let rebuilt = map_subterms(term.clone(), |t| {
            visited += 1;
            t
        });
        assert_eq!(visited, 1);
        assert_eq!(rebuilt, term);
    }
}
