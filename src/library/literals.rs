//! `hydra/lib/literals`: conversions between literal types.

use num_bigint::BigInt;

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::ErrorKind;
use crate::literal::Literal;
use crate::prim::{Primitive, unary};

pub const BIGINT_TO_INT32: &str = "hydra/lib/literals.bigintToInt32";
pub const INT32_TO_BIGINT: &str = "hydra/lib/literals.int32ToBigint";
pub const SHOW_INT32: &str = "hydra/lib/literals.showInt32";
pub const SHOW_STRING: &str = "hydra/lib/literals.showString";
pub const UINT16_TO_BIGINT: &str = "hydra/lib/literals.uint16ToBigint";
pub const UINT64_TO_BIGINT: &str = "hydra/lib/literals.uint64ToBigint";

pub fn int32_to_bigint(value: i32) -> BigInt {
    BigInt::from(value)
}

pub fn uint16_to_bigint(value: u16) -> BigInt {
    BigInt::from(value)
}

pub fn uint64_to_bigint(value: u64) -> BigInt {
    BigInt::from(value)
}

/// Fails rather than truncating when the value is outside the int32 range.
pub fn bigint_to_int32(value: BigInt) -> Result<i32, ErrorKind> {
    i32::try_from(&value)
        .map_err(|_| ErrorKind::failed(format!("bigint {value} is out of range for int32")))
}

pub fn show_int32(value: i32) -> String {
    value.to_string()
}

/// The string as a quoted, escaped literal.
pub fn show_string(value: String) -> String {
    Literal::String(value).to_string()
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        unary(
            BIGINT_TO_INT32,
            types::function(types::bigint(), types::int32()),
            |x| expect::bigint(x).and_then(bigint_to_int32).map(terms::int32),
        ),
        unary(
            INT32_TO_BIGINT,
            types::function(types::int32(), types::bigint()),
            |x| expect::int32(x).map(int32_to_bigint).map(terms::bigint),
        ),
        unary(
            SHOW_INT32,
            types::function(types::int32(), types::string()),
            |x| expect::int32(x).map(show_int32).map(terms::string),
        ),
        unary(
            SHOW_STRING,
            types::function(types::string(), types::string()),
            |x| expect::string(x).map(show_string).map(terms::string),
        ),
        unary(
            UINT16_TO_BIGINT,
            types::function(types::uint16(), types::bigint()),
            |x| expect::uint16(x).map(uint16_to_bigint).map(terms::bigint),
        ),
        unary(
            UINT64_TO_BIGINT,
            types::function(types::uint64(), types::bigint()),
            |x| expect::uint64(x).map(uint64_to_bigint).map(terms::bigint),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::term::Term;

    fn call(name: &str, arg: Term) -> anyhow::Result<Term> {
        let prim = primitives()
            .into_iter()
            .find(|p: &Primitive| p.name.as_str() == name)
            .ok_or_else(|| anyhow::anyhow!("missing {name}"))?;
        Ok(prim.call(vec![arg]).run(&Graph::empty()).into_result()?)
    }

    #[test]
    fn widening_to_bigint() -> anyhow::Result<()> {
        assert_eq!(
            call(UINT16_TO_BIGINT, terms::uint16(u16::MAX))?,
            terms::bigint(u16::MAX)
        );
        assert_eq!(
            call(UINT64_TO_BIGINT, terms::uint64(u64::MAX))?,
            terms::bigint(u64::MAX)
        );
        assert_eq!(call(INT32_TO_BIGINT, terms::int32(-5))?, terms::bigint(-5));
        Ok(())
    }

    #[test]
    fn narrowing_checks_range() -> anyhow::Result<()> {
        assert_eq!(call(BIGINT_TO_INT32, terms::bigint(i32::MIN))?, terms::int32(i32::MIN));
        let too_big = call(BIGINT_TO_INT32, terms::bigint(i64::from(i32::MAX) + 1));
        assert!(too_big.is_err());
        Ok(())
    }

    #[test]
    fn show() -> anyhow::Result<()> {
        assert_eq!(call(SHOW_INT32, terms::int32(-42))?, terms::string("-42"));
        assert_eq!(call(SHOW_STRING, terms::string("a\"b"))?, terms::string("\"a\\\"b\""));
        Ok(())
    }
}
