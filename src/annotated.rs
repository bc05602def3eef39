//! Open annotations attached to type and term nodes.

use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

/// Bounds shared by every annotation parameter threaded through the algebra.
///
/// Annotations take part in structural equality and ordering, and graphs
/// carrying them must be shareable across threads.
pub trait Meta: Clone + Debug + Ord + Hash + Send + Sync + 'static {}

impl<T> Meta for T where T: Clone + Debug + Ord + Hash + Send + Sync + 'static {}

/// A node (`Type` or `Term`) paired with an annotation of type `A`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Annotated<X, A> {
    pub subject: Box<X>,
    pub annotation: A,
}

impl<X: Clone, A: Clone> Annotated<X, A> {
    pub fn new(subject: X, annotation: A) -> Self {
        Self {
            subject: Box::new(subject),
            annotation,
        }
    }

    pub fn with_subject(&self, subject: X) -> Self {
        Self {
            subject: Box::new(subject),
            annotation: self.annotation.clone(),
        }
    }

    pub fn with_annotation(&self, annotation: A) -> Self {
        Self {
            subject: self.subject.clone(),
            annotation,
        }
    }
}
