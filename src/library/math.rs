//! `hydra/lib/math`: int32 arithmetic.
//!
//! `add`, `sub`, `mul` and `neg` wrap on overflow (two's complement).
//! `div`, `mod` and `rem` fail on a zero divisor; `div` truncates toward
//! zero and wraps `i32::MIN / -1` to `i32::MIN`, `mod` takes the sign of the
//! divisor, `rem` the sign of the dividend.

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::ErrorKind;
use crate::prim::{Primitive, binary, unary};

pub const ADD: &str = "hydra/lib/math.add";
pub const DIV: &str = "hydra/lib/math.div";
pub const MOD: &str = "hydra/lib/math.mod";
pub const MUL: &str = "hydra/lib/math.mul";
pub const NEG: &str = "hydra/lib/math.neg";
pub const REM: &str = "hydra/lib/math.rem";
pub const SUB: &str = "hydra/lib/math.sub";

pub fn add(augend: i32, addend: i32) -> i32 {
    augend.wrapping_add(addend)
}

pub fn sub(minuend: i32, subtrahend: i32) -> i32 {
    minuend.wrapping_sub(subtrahend)
}

pub fn mul(multiplier: i32, multiplicand: i32) -> i32 {
    multiplier.wrapping_mul(multiplicand)
}

pub fn neg(value: i32) -> i32 {
    value.wrapping_neg()
}

pub fn div(dividend: i32, divisor: i32) -> Result<i32, ErrorKind> {
    nonzero(divisor)?;
    Ok(dividend.wrapping_div(divisor))
}

pub fn modulo(dividend: i32, divisor: i32) -> Result<i32, ErrorKind> {
    nonzero(divisor)?;
    let rem = dividend.wrapping_rem(divisor);
    if rem != 0 && (rem < 0) != (divisor < 0) {
        Ok(rem.wrapping_add(divisor))
    } else {
        Ok(rem)
    }
}

pub fn rem(dividend: i32, divisor: i32) -> Result<i32, ErrorKind> {
    nonzero(divisor)?;
    Ok(dividend.wrapping_rem(divisor))
}

fn nonzero(divisor: i32) -> Result<(), ErrorKind> {
    if divisor == 0 {
        Err(ErrorKind::failed("division by zero"))
    } else {
        Ok(())
    }
}

fn total<A: Meta>(name: &str, kernel: fn(i32, i32) -> i32) -> Primitive<A> {
    binary(
        name,
        types::curried([types::int32(), types::int32()], types::int32()),
        move |x, y| {
            expect::int32(x)
                .map2(expect::int32(y), kernel)
                .map(terms::int32)
        },
    )
}

fn partial<A: Meta>(name: &str, kernel: fn(i32, i32) -> Result<i32, ErrorKind>) -> Primitive<A> {
    binary(
        name,
        types::curried([types::int32(), types::int32()], types::int32()),
        move |x, y| {
            expect::int32(x)
                .map2(expect::int32(y), |a, b| (a, b))
                .and_then(move |(a, b)| kernel(a, b))
                .map(terms::int32)
        },
    )
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        total(ADD, add),
        partial(DIV, div),
        partial(MOD, modulo),
        total(MUL, mul),
        unary(NEG, types::function(types::int32(), types::int32()), |x| {
            expect::int32(x).map(neg).map(terms::int32)
        }),
        partial(REM, rem),
        total(SUB, sub),
    ]
}
