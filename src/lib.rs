//! Hydra core: a typed term/type algebra, a graph of named elements, traced
//! evaluation flows and the primitive library the interpreter dispatches to.

pub mod annotated;
pub mod dsl;
pub mod expect;
pub mod flow;
pub mod graph;
pub mod interp;
pub mod library;
pub mod literal;
pub mod name;
pub mod prim;
pub mod rewrite;
pub mod show;
pub mod syntax;
pub mod term;
pub mod types;

pub type Result<T> = anyhow::Result<T>;

pub use annotated::{Annotated, Meta};
pub use flow::{DEFAULT_MAX_TRACE_DEPTH, ErrorKind, Flow, FlowError, FlowState, Trace};
pub use graph::{Element, Graph, GraphError};
pub use interp::evaluate;
pub use library::standard_registry;
pub use literal::{FloatType, FloatValue, IntegerType, IntegerValue, Literal, LiteralType};
pub use name::{FieldName, Name, Namespace, QualifiedName};
pub use prim::{Primitive, PrimitiveFlow, Registry, RegistryError};
pub use syntax::{parse_term, parse_term_from_file};
pub use term::{Field, Function, Term};
pub use types::{FieldType, RowType, Type};
