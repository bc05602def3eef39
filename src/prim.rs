//! Primitive functions and the registry the interpreter dispatches through.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::annotated::Meta;
use crate::dsl::terms;
use crate::flow::{ErrorKind, Flow};
use crate::graph::Graph;
use crate::name::Name;
use crate::rewrite::strip_type;
use crate::term::Term;
use crate::types::Type;

/// The flow a primitive implementation returns.
pub type PrimitiveFlow<A> = Flow<'static, Graph<A>, Term<A>>;

type Implementation<A> = Arc<dyn Fn(Vec<Term<A>>) -> PrimitiveFlow<A> + Send + Sync>;

/// A named operation with a declared (possibly polymorphic, curried)
/// signature. Implementations decode their own arguments and fail at call
/// time on a shape mismatch; no static checking happens here.
#[derive(Clone)]
pub struct Primitive<A = ()> {
    pub name: Name,
    pub ty: Type<A>,
    implementation: Implementation<A>,
}

impl<A> fmt::Debug for Primitive<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("name", &self.name)
            .field("type", &self.ty.to_string())
            .field("arity", &type_arity(&self.ty))
            .finish()
    }
}

impl<A: Meta> Primitive<A> {
    pub fn new(
        name: impl Into<Name>,
        ty: Type<A>,
        implementation: impl Fn(Vec<Term<A>>) -> PrimitiveFlow<A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            implementation: Arc::new(implementation),
        }
    }

    pub fn arity(&self) -> usize {
        type_arity(&self.ty)
    }

    /// Invoke the implementation, rejecting the wrong number of arguments.
    pub fn call(&self, args: Vec<Term<A>>) -> PrimitiveFlow<A> {
        let arity = self.arity();
        if args.len() != arity {
            return Flow::fail(argument_count_mismatch(&self.name, arity, args.len()));
        }
        (self.implementation)(args)
    }

    /// A term referring to this primitive.
    pub fn term(&self) -> Term<A> {
        terms::primitive(self.name.clone())
    }
}

/// Number of function arrows in a signature once type lambdas and
/// annotations are stripped.
pub fn type_arity<A>(ty: &Type<A>) -> usize {
    match strip_type(ty) {
        Type::Lambda(lambda) => type_arity(&lambda.body),
        Type::Function(fun) => 1 + type_arity(&fun.codomain),
        _ => 0,
    }
}

fn argument_count_mismatch(name: &Name, expected: usize, actual: usize) -> ErrorKind {
    ErrorKind::mismatch(
        format!("{expected} arguments to {name}"),
        format!("{actual} arguments"),
    )
}

pub fn nullary<A: Meta>(
    name: &str,
    ty: Type<A>,
    f: impl Fn() -> PrimitiveFlow<A> + Send + Sync + 'static,
) -> Primitive<A> {
    let owner = Name::from(name);
    Primitive::new(name, ty, move |args| {
        if args.is_empty() {
            f()
        } else {
            Flow::fail(argument_count_mismatch(&owner, 0, args.len()))
        }
    })
}

pub fn unary<A: Meta>(
    name: &str,
    ty: Type<A>,
    f: impl Fn(Term<A>) -> PrimitiveFlow<A> + Send + Sync + 'static,
) -> Primitive<A> {
    let owner = Name::from(name);
    Primitive::new(name, ty, move |args| match <[Term<A>; 1]>::try_from(args) {
        Ok([x]) => f(x),
        Err(args) => Flow::fail(argument_count_mismatch(&owner, 1, args.len())),
    })
}

pub fn binary<A: Meta>(
    name: &str,
    ty: Type<A>,
    f: impl Fn(Term<A>, Term<A>) -> PrimitiveFlow<A> + Send + Sync + 'static,
) -> Primitive<A> {
    let owner = Name::from(name);
    Primitive::new(name, ty, move |args| match <[Term<A>; 2]>::try_from(args) {
        Ok([x, y]) => f(x, y),
        Err(args) => Flow::fail(argument_count_mismatch(&owner, 2, args.len())),
    })
}

pub fn ternary<A: Meta>(
    name: &str,
    ty: Type<A>,
    f: impl Fn(Term<A>, Term<A>, Term<A>) -> PrimitiveFlow<A> + Send + Sync + 'static,
) -> Primitive<A> {
    let owner = Name::from(name);
    Primitive::new(name, ty, move |args| match <[Term<A>; 3]>::try_from(args) {
        Ok([x, y, z]) => f(x, y, z),
        Err(args) => Flow::fail(argument_count_mismatch(&owner, 3, args.len())),
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("primitive `{0}` is already registered")]
    Duplicate(Name),
}

/// Append-only table of primitives keyed by name.
#[derive(Clone)]
pub struct Registry<A = ()> {
    primitives: BTreeMap<Name, Primitive<A>>,
}

impl<A> Default for Registry<A> {
    fn default() -> Self {
        Self {
            primitives: BTreeMap::new(),
        }
    }
}

impl<A> fmt::Debug for Registry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.primitives.keys()).finish()
    }
}

impl<A: Meta> Registry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<Name>,
        signature: Type<A>,
        implementation: impl Fn(Vec<Term<A>>) -> PrimitiveFlow<A> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        self.insert(Primitive::new(name, signature, implementation))
    }

    pub fn insert(&mut self, primitive: Primitive<A>) -> Result<(), RegistryError> {
        if self.primitives.contains_key(&primitive.name) {
            log::warn!("rejecting duplicate primitive {}", primitive.name);
            return Err(RegistryError::Duplicate(primitive.name));
        }
        log::trace!("registered primitive {} : {}", primitive.name, primitive.ty);
        self.primitives.insert(primitive.name.clone(), primitive);
        Ok(())
    }

    pub fn extend(
        &mut self,
        primitives: impl IntoIterator<Item = Primitive<A>>,
    ) -> Result<(), RegistryError> {
        for primitive in primitives {
            self.insert(primitive)?;
        }
        Ok(())
    }
}

impl<A> Registry<A> {
    pub fn lookup(&self, name: &Name) -> Option<&Primitive<A>> {
        self.primitives.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.primitives.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive<A>> {
        self.primitives.values()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
