//! `hydra/lib/equality`: value equality per literal type, plus structural
//! equality on arbitrary terms.

use num_bigint::BigInt;

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::Flow;
use crate::graph::Graph;
use crate::prim::{Primitive, binary};
use crate::rewrite::strip_term;
use crate::term::Term;
use crate::types::Type;

pub const EQUAL_TERM: &str = "hydra/lib/equality.equalTerm";

macro_rules! typed_equalities {
    ($($constant:ident = $name:literal, $kernel:ident($native:ty), $ty:ident;)*) => {
        $(
            pub const $constant: &str = $name;

            pub fn $kernel(left: $native, right: $native) -> bool {
                left == right
            }
        )*

        fn typed<A: Meta>() -> Vec<Primitive<A>> {
            vec![$(equality($constant, types::$ty(), expect::$ty, $kernel)),*]
        }
    };
}

typed_equalities! {
    EQUAL_BINARY = "hydra/lib/equality.equalBinary", equal_binary(Vec<u8>), binary;
    EQUAL_BOOLEAN = "hydra/lib/equality.equalBoolean", equal_boolean(bool), boolean;
    EQUAL_BIGINT = "hydra/lib/equality.equalBigint", equal_bigint(BigInt), bigint;
    EQUAL_FLOAT32 = "hydra/lib/equality.equalFloat32", equal_float32(f32), float32;
    EQUAL_FLOAT64 = "hydra/lib/equality.equalFloat64", equal_float64(f64), float64;
    EQUAL_INT8 = "hydra/lib/equality.equalInt8", equal_int8(i8), int8;
    EQUAL_INT16 = "hydra/lib/equality.equalInt16", equal_int16(i16), int16;
    EQUAL_INT32 = "hydra/lib/equality.equalInt32", equal_int32(i32), int32;
    EQUAL_INT64 = "hydra/lib/equality.equalInt64", equal_int64(i64), int64;
    EQUAL_STRING = "hydra/lib/equality.equalString", equal_string(String), string;
    EQUAL_UINT8 = "hydra/lib/equality.equalUint8", equal_uint8(u8), uint8;
    EQUAL_UINT16 = "hydra/lib/equality.equalUint16", equal_uint16(u16), uint16;
    EQUAL_UINT32 = "hydra/lib/equality.equalUint32", equal_uint32(u32), uint32;
    EQUAL_UINT64 = "hydra/lib/equality.equalUint64", equal_uint64(u64), uint64;
}

/// Structural equality, ignoring annotations at the top of either side.
pub fn equal_term<A: PartialEq>(left: &Term<A>, right: &Term<A>) -> bool {
    strip_term(left) == strip_term(right)
}

fn equality<A: Meta, X: 'static>(
    name: &str,
    ty: Type<A>,
    decode: fn(Term<A>) -> Flow<'static, Graph<A>, X>,
    kernel: fn(X, X) -> bool,
) -> Primitive<A> {
    binary(
        name,
        types::curried([ty.clone(), ty], types::boolean()),
        move |left, right| {
            decode(left)
                .map2(decode(right), kernel)
                .map(terms::boolean)
        },
    )
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    let mut primitives = typed();
    primitives.push(binary(
        EQUAL_TERM,
        types::lambda(
            "x",
            types::curried([types::var("x"), types::var("x")], types::boolean()),
        ),
        |left, right| Flow::pure(terms::boolean(equal_term(&left, &right))),
    ));
    primitives
}
