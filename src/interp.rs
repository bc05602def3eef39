//! Call-by-value term reduction against a graph and a primitive registry.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::annotated::{Annotated, Meta};
use crate::dsl::terms;
use crate::flow::{ErrorKind, Flow, FlowError, Trace};
use crate::graph::Graph;
use crate::name::Name;
use crate::prim::{Primitive, Registry};
use crate::rewrite::{into_stripped_term, substitute};
use crate::term::{Elimination, Field, Function, Injection, Record, Term, WrappedTerm};

type Spine<A> = SmallVec<[Term<A>; 4]>;

/// Reduce `term` to a value. Run the returned flow against the graph that
/// variables should resolve through.
pub fn evaluate<'r, A: Meta>(registry: &'r Registry<A>, term: Term<A>) -> Flow<'r, Graph<A>, Term<A>> {
    Flow::new(move |graph, trace| Reducer { registry, graph }.reduce(term, trace))
}

struct Reducer<'r, 'g, A> {
    registry: &'r Registry<A>,
    graph: &'g Graph<A>,
}

impl<A: Meta> Reducer<'_, '_, A> {
    fn reduce(&self, term: Term<A>, trace: &mut Trace) -> Result<Term<A>, FlowError> {
        match term {
            Term::Annotated(Annotated {
                subject,
                annotation,
            }) => {
                let subject = self.reduce(*subject, trace)?;
                Ok(Term::Annotated(Annotated {
                    subject: Box::new(subject),
                    annotation,
                }))
            }
            Term::Application(_) => {
                let (head, args) = spine(term);
                let head = self.reduce(head, trace)?;
                self.apply(head, args, trace)
            }
            Term::Function(Function::Primitive(name)) => {
                let prim = self.primitive(&name, trace)?;
                if prim.arity() == 0 {
                    self.call(prim, Vec::new(), trace)
                } else {
                    Ok(Term::Function(Function::Primitive(name)))
                }
            }
            Term::Function(_) | Term::Literal(_) => Ok(term),
            Term::List(items) => Ok(Term::List(self.reduce_all(items, trace)?)),
            Term::Map(entries) => {
                let mut reduced = BTreeMap::new();
                for (key, value) in entries {
                    let key = self.reduce(key, trace)?;
                    let value = self.reduce(value, trace)?;
                    if reduced.contains_key(&key) {
                        trace.warn(format!("map key {key} occurs more than once, keeping the last value"));
                    }
                    reduced.insert(key, value);
                }
                Ok(Term::Map(reduced))
            }
            Term::Optional(None) => Ok(Term::Optional(None)),
            Term::Optional(Some(inner)) => {
                Ok(Term::Optional(Some(Box::new(self.reduce(*inner, trace)?))))
            }
            Term::Product(items) => Ok(Term::Product(self.reduce_all(items, trace)?)),
            Term::Record(Record { type_name, fields }) => {
                let fields = fields
                    .into_iter()
                    .map(|field| self.reduce_field(field, trace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Term::Record(Record { type_name, fields }))
            }
            Term::Set(items) => {
                let reduced = self.reduce_all(items.into_iter().collect(), trace)?;
                Ok(Term::Set(reduced.into_iter().collect()))
            }
            Term::Union(Injection { type_name, field }) => Ok(Term::Union(Injection {
                type_name,
                field: Box::new(self.reduce_field(*field, trace)?),
            })),
            Term::Variable(name) => self.resolve(name, trace),
            Term::Wrap(WrappedTerm { type_name, object }) => Ok(Term::Wrap(WrappedTerm {
                type_name,
                object: Box::new(self.reduce(*object, trace)?),
            })),
        }
    }

    fn reduce_all(&self, items: Vec<Term<A>>, trace: &mut Trace) -> Result<Vec<Term<A>>, FlowError> {
        items.into_iter().map(|item| self.reduce(item, trace)).collect()
    }

    fn reduce_field(&self, field: Field<A>, trace: &mut Trace) -> Result<Field<A>, FlowError> {
        Ok(Field {
            name: field.name,
            term: self.reduce(field.term, trace)?,
        })
    }

    fn resolve(&self, name: Name, trace: &mut Trace) -> Result<Term<A>, FlowError> {
        let Some(element) = self.graph.lookup(&name) else {
            return Err(trace.failure(ErrorKind::UnresolvedReference(name)));
        };
        log::trace!("resolving element {name}");
        trace.scoped(format!("element {name}"), |trace| {
            self.reduce(element.term.clone(), trace)
        })
    }

    fn primitive(&self, name: &Name, trace: &mut Trace) -> Result<&Primitive<A>, FlowError> {
        self.registry
            .lookup(name)
            .ok_or_else(|| trace.failure(ErrorKind::UnresolvedReference(name.clone())))
    }

    fn call(
        &self,
        prim: &Primitive<A>,
        args: Vec<Term<A>>,
        trace: &mut Trace,
    ) -> Result<Term<A>, FlowError> {
        log::debug!("calling primitive {} with {} arguments", prim.name, args.len());
        trace.scoped(format!("primitive {}", prim.name), |trace| {
            let result = prim.call(args).execute(self.graph, trace)?;
            self.reduce(result, trace)
        })
    }

    /// Apply an already reduced head to unreduced arguments.
    fn apply(&self, head: Term<A>, args: Spine<A>, trace: &mut Trace) -> Result<Term<A>, FlowError> {
        if args.is_empty() {
            return Ok(head);
        }
        match into_stripped_term(head) {
            // A partial application produced by an earlier step.
            partial @ Term::Application(_) => {
                let (inner, mut inner_args) = spine(partial);
                inner_args.extend(args);
                self.apply(inner, inner_args, trace)
            }
            Term::Function(Function::Lambda(lambda)) => {
                let mut args = args.into_iter();
                let Some(arg) = args.next() else {
                    return Ok(Term::Function(Function::Lambda(lambda)));
                };
                let arg = self.reduce(arg, trace)?;
                log::trace!("substituting into \\{}", lambda.parameter);
                let body = substitute(&lambda.parameter, &arg, *lambda.body);
                let result = trace.scoped(format!("lambda {}", lambda.parameter), |trace| {
                    self.reduce(body, trace)
                })?;
                self.apply(result, args.collect(), trace)
            }
            Term::Function(Function::Primitive(name)) => {
                let prim = self.primitive(&name, trace)?;
                let arity = prim.arity();
                if args.len() < arity {
                    let reduced = self.reduce_all(args.into_vec(), trace)?;
                    return Ok(terms::apply_all(terms::primitive(name), reduced));
                }
                let mut rest = args;
                let now: Vec<Term<A>> = rest.drain(..arity).collect();
                let now = self.reduce_all(now, trace)?;
                let result = self.call(prim, now, trace)?;
                self.apply(result, rest, trace)
            }
            Term::Function(Function::Elimination(elimination)) => {
                let mut args = args.into_iter();
                let Some(arg) = args.next() else {
                    return Ok(Term::Function(Function::Elimination(elimination)));
                };
                let arg = self.reduce(arg, trace)?;
                let result = self.eliminate(elimination, arg, trace)?;
                self.apply(result, args.collect(), trace)
            }
            other => Err(trace.failure(ErrorKind::mismatch("function", other.describe()))),
        }
    }

    fn eliminate(
        &self,
        elimination: Elimination<A>,
        arg: Term<A>,
        trace: &mut Trace,
    ) -> Result<Term<A>, FlowError> {
        match (elimination, into_stripped_term(arg)) {
            (Elimination::Record(projection), Term::Record(record))
                if record.type_name == projection.type_name =>
            {
                match record.fields.into_iter().find(|f| f.name == projection.field) {
                    Some(field) => Ok(field.term),
                    None => Err(trace.failure(ErrorKind::mismatch(
                        format!("field {} of {}", projection.field, projection.type_name),
                        "no such field",
                    ))),
                }
            }
            (Elimination::Record(projection), other) => Err(trace.failure(ErrorKind::mismatch(
                format!("record of type {}", projection.type_name),
                nominal(&other),
            ))),
            (Elimination::Union(cases), Term::Union(injection))
                if injection.type_name == cases.type_name =>
            {
                let Field { name, term } = *injection.field;
                match cases.cases.into_iter().find(|case| case.name == name) {
                    Some(case) => self.reduce(terms::apply(case.term, term), trace),
                    None => match cases.default {
                        Some(default) => self.reduce(*default, trace),
                        None => Err(trace.failure(ErrorKind::mismatch(
                            format!("a case for {name} in {}", cases.type_name),
                            "no matching case",
                        ))),
                    },
                }
            }
            (Elimination::Union(cases), other) => Err(trace.failure(ErrorKind::mismatch(
                format!("injection of type {}", cases.type_name),
                nominal(&other),
            ))),
            (Elimination::Wrap(type_name), Term::Wrap(wrapped)) if wrapped.type_name == type_name => {
                Ok(*wrapped.object)
            }
            (Elimination::Wrap(type_name), other) => Err(trace.failure(ErrorKind::mismatch(
                format!("wrapper of type {type_name}"),
                nominal(&other),
            ))),
            (Elimination::Optional(cases), Term::Optional(None)) => self.reduce(*cases.nothing, trace),
            (Elimination::Optional(cases), Term::Optional(Some(value))) => {
                self.reduce(terms::apply(*cases.just, *value), trace)
            }
            (Elimination::Optional(_), other) => {
                Err(trace.failure(ErrorKind::mismatch("optional", other.describe())))
            }
        }
    }
}

/// Flatten nested applications into a head and its arguments, first
/// argument first.
fn spine<A>(term: Term<A>) -> (Term<A>, Spine<A>) {
    let mut args = Spine::new();
    let mut head = into_stripped_term(term);
    while let Term::Application(app) = head {
        args.push(*app.argument);
        head = into_stripped_term(*app.function);
    }
    args.reverse();
    (head, args)
}

fn nominal<A>(term: &Term<A>) -> String {
    match term {
        Term::Record(record) => format!("record of type {}", record.type_name),
        Term::Union(injection) => format!("injection of type {}", injection.type_name),
        Term::Wrap(wrapped) => format!("wrapper of type {}", wrapped.type_name),
        other => other.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowState;
    use crate::graph::Element;
    use crate::library::{lists, maps, math, standard_registry};

    fn eval(graph: &Graph, term: Term) -> anyhow::Result<FlowState<Term>> {
        let registry: Registry = standard_registry()?;
        Ok(evaluate(&registry, term).run(graph))
    }

    fn value(term: Term) -> anyhow::Result<Term> {
        Ok(eval(&Graph::empty(), term)?.into_result()?)
    }

    fn add(x: Term, y: Term) -> Term {
        terms::apply_all(terms::primitive(math::ADD), [x, y])
    }

    #[test]
    fn adds_and_wraps() -> anyhow::Result<()> {
        assert_eq!(value(add(terms::int32(2), terms::int32(3)))?, terms::int32(5));
        assert_eq!(value(add(terms::int32(i32::MAX), terms::int32(1)))?, terms::int32(i32::MIN));
        Ok(())
    }

    #[test]
    fn arguments_are_reduced_first() -> anyhow::Result<()> {
        let nested = add(add(terms::int32(1), terms::int32(2)), terms::int32(3));
        assert_eq!(value(nested)?, terms::int32(6));
        Ok(())
    }

    #[test]
    fn beta_reduction() -> anyhow::Result<()> {
        let double = terms::lambda("x", add(terms::variable("x"), terms::variable("x")));
        assert_eq!(value(terms::apply(double, terms::int32(21)))?, terms::int32(42));
        Ok(())
    }

    #[test]
    fn partial_application_is_a_value() -> anyhow::Result<()> {
        let partial = terms::apply(terms::primitive(math::ADD), terms::int32(1));
        assert_eq!(value(partial.clone())?, partial);
        assert_eq!(value(terms::apply(partial, terms::int32(2)))?, terms::int32(3));
        Ok(())
    }

    #[test]
    fn apply_reduces_generated_applications() -> anyhow::Result<()> {
        let fs = terms::list(vec![
            terms::apply(terms::primitive(math::ADD), terms::int32(1)),
            terms::apply(terms::primitive(math::ADD), terms::int32(10)),
        ]);
        let xs = terms::list(vec![terms::int32(1), terms::int32(2)]);
        let out = value(terms::apply_all(terms::primitive(lists::APPLY), [fs, xs]))?;
        assert_eq!(
            out,
            terms::list(vec![terms::int32(2), terms::int32(3), terms::int32(11), terms::int32(12)])
        );
        Ok(())
    }

    #[test]
    fn bind_and_map() -> anyhow::Result<()> {
        let twice = terms::lambda(
            "x",
            terms::list(vec![terms::variable("x"), terms::variable("x")]),
        );
        let xs = terms::list(vec![terms::int32(1), terms::int32(2)]);
        let bound = value(terms::apply_all(terms::primitive(lists::BIND), [xs.clone(), twice]))?;
        assert_eq!(
            bound,
            terms::list(vec![terms::int32(1), terms::int32(1), terms::int32(2), terms::int32(2)])
        );

        let inc = terms::apply(terms::primitive(math::ADD), terms::int32(1));
        let mapped = value(terms::apply_all(terms::primitive(lists::MAP), [inc, xs]))?;
        assert_eq!(mapped, terms::list(vec![terms::int32(2), terms::int32(3)]));
        Ok(())
    }

    #[test]
    fn from_list_warning_reaches_trace() -> anyhow::Result<()> {
        let pairs = terms::list(vec![
            terms::pair(terms::int32(1), terms::string("a")),
            terms::pair(terms::int32(1), terms::string("b")),
        ]);
        let state = eval(&Graph::empty(), terms::apply(terms::primitive(maps::FROM_LIST), pairs))?;
        assert_eq!(state.trace.messages().len(), 1);
        assert_eq!(
            state.into_result()?,
            terms::map(vec![(terms::int32(1), terms::string("b"))])
        );
        Ok(())
    }

    #[test]
    fn map_keys_that_reduce_to_the_same_value_warn() -> anyhow::Result<()> {
        let sum = terms::apply_all(terms::primitive(math::ADD), [terms::int32(1), terms::int32(1)]);
        let map = terms::map(vec![
            (sum, terms::string("a")),
            (terms::int32(2), terms::string("b")),
        ]);
        let state = eval(&Graph::empty(), map)?;
        assert_eq!(state.trace.messages().len(), 1);
        assert!(state.trace.messages()[0].contains("map key 2"));
        assert_eq!(state.into_result()?.to_string(), "{2 => \"b\"}");
        Ok(())
    }

    #[test]
    fn injection_payload_is_reduced() -> anyhow::Result<()> {
        let sum = terms::apply_all(terms::primitive(math::ADD), [terms::int32(2), terms::int32(3)]);
        let shape = terms::inject("ns.Shape", terms::field("square", sum));
        assert_eq!(
            value(shape)?,
            terms::inject("ns.Shape", terms::field("square", terms::int32(5)))
        );
        Ok(())
    }

    #[test]
    fn nullary_primitive_is_called() -> anyhow::Result<()> {
        assert_eq!(value(terms::primitive(maps::EMPTY))?, terms::map(vec![]));
        Ok(())
    }

    #[test]
    fn variables_resolve_through_the_graph() -> anyhow::Result<()> {
        let graph: Graph = Graph::new(vec![
            Element::new("ns.two", terms::int32(2)),
            Element::new("ns.four", add(terms::variable("ns.two"), terms::variable("ns.two"))),
        ])?;
        let state = eval(&graph, terms::variable("ns.four"))?;
        assert_eq!(state.into_result()?, terms::int32(4));

        let missing = eval(&graph, terms::variable("ns.absent"))?.into_result().unwrap_err();
        assert_eq!(missing.kind, ErrorKind::UnresolvedReference(Name::from("ns.absent")));
        let found = eval(&graph, terms::variable("ns.two"))?.into_result()?;
        assert_eq!(found, terms::int32(2));
        Ok(())
    }

    #[test]
    fn failures_carry_the_element_and_primitive_frames() -> anyhow::Result<()> {
        let graph: Graph = Graph::new(vec![Element::new(
            "ns.bad",
            add(terms::int32(1), terms::string("one")),
        )])?;
        let err = eval(&graph, terms::variable("ns.bad"))?.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::mismatch("int32", "string"));
        assert_eq!(
            err.stack,
            vec!["element ns.bad".to_string(), format!("primitive {}", math::ADD)]
        );
        Ok(())
    }

    #[test]
    fn self_reference_exceeds_depth() -> anyhow::Result<()> {
        let graph: Graph = Graph::new(vec![Element::new("ns.loop", terms::variable("ns.loop"))])?;
        let registry: Registry = standard_registry()?;
        let state = evaluate(&registry, terms::variable("ns.loop"))
            .run_with(&graph, Trace::with_max_depth(16));
        let err = state.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthExceeded(16));
        assert_eq!(err.stack.len(), 16);
        Ok(())
    }

    #[test]
    fn non_function_head_is_a_mismatch() -> anyhow::Result<()> {
        let over = terms::apply(add(terms::int32(1), terms::int32(2)), terms::int32(3));
        let err = eval(&Graph::empty(), over)?.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::mismatch("function", "int32"));
        Ok(())
    }

    #[test]
    fn unknown_primitive() -> anyhow::Result<()> {
        let err = eval(&Graph::empty(), terms::primitive("hydra/lib/nope.nothing"))?
            .into_result()
            .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnresolvedReference(Name::from("hydra/lib/nope.nothing"))
        );
        Ok(())
    }

    #[test]
    fn eliminations() -> anyhow::Result<()> {
        let point = terms::record("ns.Point", vec![
            terms::field("x", terms::int32(1)),
            terms::field("y", terms::int32(2)),
        ]);
        assert_eq!(value(terms::apply(terms::project("ns.Point", "y"), point.clone()))?, terms::int32(2));
        assert!(value(terms::apply(terms::project("ns.Other", "y"), point)).is_err());

        let shape = terms::inject("ns.Shape", terms::field("square", terms::int32(3)));
        let area = terms::cases(
            "ns.Shape",
            Some(terms::int32(0)),
            vec![terms::field(
                "square",
                terms::lambda("s", terms::apply_all(terms::primitive(math::MUL), [
                    terms::variable("s"),
                    terms::variable("s"),
                ])),
            )],
        );
        assert_eq!(value(terms::apply(area.clone(), shape))?, terms::int32(9));
        let circle = terms::inject("ns.Shape", terms::field("circle", terms::int32(1)));
        assert_eq!(value(terms::apply(area, circle))?, terms::int32(0));

        let age = terms::wrap("ns.Age", terms::int32(30));
        assert_eq!(value(terms::apply(terms::unwrap("ns.Age"), age))?, terms::int32(30));

        let or_zero = terms::match_optional(terms::int32(0), terms::lambda("v", terms::variable("v")));
        assert_eq!(value(terms::apply(or_zero.clone(), terms::just(terms::int32(5))))?, terms::int32(5));
        assert_eq!(value(terms::apply(or_zero, terms::nothing()))?, terms::int32(0));
        Ok(())
    }

    #[test]
    fn containers_reduce_left_to_right() -> anyhow::Result<()> {
        let term = terms::list(vec![
            add(terms::int32(1), terms::int32(1)),
            terms::just(add(terms::int32(2), terms::int32(2))),
        ]);
        assert_eq!(
            value(term)?,
            terms::list(vec![terms::int32(2), terms::just(terms::int32(4))])
        );
        Ok(())
    }
}
