//! Shorthand constructors for building types and terms in Rust code.
//!
//! Everything here is generic over the annotation parameter; call sites with
//! no annotations fix it to `()` through a type ascription.

pub mod terms;
pub mod types;
