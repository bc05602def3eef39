//! `hydra/lib/strings`: operations on Unicode strings.

use crate::annotated::Meta;
use crate::dsl::{terms, types};
use crate::expect;
use crate::flow::ErrorKind;
use crate::prim::{Primitive, binary, unary};

pub const CAT: &str = "hydra/lib/strings.cat";
pub const LENGTH: &str = "hydra/lib/strings.length";
pub const SPLIT_ON: &str = "hydra/lib/strings.splitOn";
pub const TO_LOWER: &str = "hydra/lib/strings.toLower";
pub const TO_UPPER: &str = "hydra/lib/strings.toUpper";

pub fn cat(parts: Vec<String>) -> String {
    parts.concat()
}

/// Length in Unicode scalar values.
pub fn length(value: &str) -> Result<i32, ErrorKind> {
    i32::try_from(value.chars().count())
        .map_err(|_| ErrorKind::failed("string length exceeds int32"))
}

/// Split around every occurrence of `separator`. An empty separator splits
/// between characters.
pub fn split_on(separator: &str, value: &str) -> Vec<String> {
    if separator.is_empty() {
        if value.is_empty() {
            return vec![String::new()];
        }
        return value.chars().map(String::from).collect();
    }
    value.split(separator).map(str::to_string).collect()
}

pub fn to_lower(value: &str) -> String {
    value.to_lowercase()
}

pub fn to_upper(value: &str) -> String {
    value.to_uppercase()
}

pub fn primitives<A: Meta>() -> Vec<Primitive<A>> {
    vec![
        unary(
            CAT,
            types::function(types::list(types::string()), types::string()),
            |parts| expect::list(expect::string, parts).map(cat).map(terms::string),
        ),
        unary(
            LENGTH,
            types::function(types::string(), types::int32()),
            |s| expect::string(s).and_then(|s| length(&s)).map(terms::int32),
        ),
        binary(
            SPLIT_ON,
            types::curried([types::string(), types::string()], types::list(types::string())),
            |separator, s| {
                expect::string(separator)
                    .map2(expect::string(s), |separator, s| split_on(&separator, &s))
                    .map(|parts| terms::list(parts.into_iter().map(terms::string).collect()))
            },
        ),
        unary(
            TO_LOWER,
            types::function(types::string(), types::string()),
            |s| expect::string(s).map(|s| terms::string(to_lower(&s))),
        ),
        unary(
            TO_UPPER,
            types::function(types::string(), types::string()),
            |s| expect::string(s).map(|s| terms::string(to_upper(&s))),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_scalars() {
        assert_eq!(length("héllo"), Ok(5));
        assert_eq!(length(""), Ok(0));
    }

    #[test]
    fn split_edge_cases() {
        assert_eq!(split_on(",", "a,b,,c"), vec!["a", "b", "", "c"]);
        assert_eq!(split_on(",", ""), vec![""]);
        assert_eq!(split_on("", "ab"), vec!["a", "b"]);
        assert_eq!(split_on("::", "a::b"), vec!["a", "b"]);
    }

    #[test]
    fn case_and_concatenation() {
        assert_eq!(to_upper("Straße"), "STRASSE");
        assert_eq!(to_lower("ABC"), "abc");
        assert_eq!(cat(vec!["a".into(), "".into(), "b".into()]), "ab");
    }
}
