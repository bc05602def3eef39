//! Compact textual syntax for terms, used by the command-line driver.
//!
//! Unsuffixed integers are int32 and unsuffixed floats are float64; other
//! widths take a `:type` suffix (`7:uint64`, `1.5:float32`). Identifiers
//! naming a registered primitive become primitive references, anything else
//! a variable. `f(a, b)` is curried application. `#` starts a line comment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use num_bigint::BigInt;

use crate::annotated::Meta;
use crate::dsl::terms;
use crate::literal::{FloatType, IntegerType};
use crate::name::Name;
use crate::prim::Registry;
use crate::term::Term;

pub fn parse_term<A: Meta>(input: &str, registry: &Registry<A>) -> Result<Term<A>> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        registry,
    };
    let term = parser.expr()?;
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        bail!("unexpected `{c}` at offset {}", parser.pos);
    }
    Ok(term)
}

pub fn parse_term_from_file<A: Meta>(path: &Path, registry: &Registry<A>) -> Result<Term<A>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_term(&text, registry).with_context(|| format!("failed to parse {}", path.display()))
}

struct Parser<'s, 'r, A> {
    src: &'s str,
    pos: usize,
    registry: &'r Registry<A>,
}

impl<'s, A: Meta> Parser<'s, '_, A> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    let line_end = self.rest().find('\n').unwrap_or(self.rest().len());
                    self.pos += line_end;
                }
                _ => return,
            }
        }
    }

    /// Consume `token` (after whitespace) if it is next.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            return Ok(());
        }
        match self.peek() {
            Some(c) => bail!("expected `{token}` but found `{c}` at offset {}", self.pos),
            None => bail!("expected `{token}` but reached end of input"),
        }
    }

    fn expr(&mut self) -> Result<Term<A>> {
        let mut term = self.atom()?;
        while self.eat("(") {
            let args = self.items(")")?;
            if args.is_empty() {
                bail!("application of {term} needs at least one argument");
            }
            term = terms::apply_all(term, args);
        }
        Ok(term)
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    fn items(&mut self, close: &str) -> Result<Vec<Term<A>>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(",")?;
        }
    }

    fn atom(&mut self) -> Result<Term<A>> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            None => bail!("unexpected end of input"),
            Some('"') => self.string(),
            Some('[') => {
                self.bump();
                Ok(terms::list(self.items("]")?))
            }
            Some('{') => {
                self.bump();
                self.braces()
            }
            Some('(') => {
                self.bump();
                self.parens()
            }
            Some('0') if self.rest().starts_with("0x") => {
                self.pos += 2;
                self.binary()
            }
            Some(_) if self.non_finite().is_some() => self.non_finite_float(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            Some(c) => bail!("unexpected `{c}` at offset {start}"),
        }
    }

    /// `NaN`, `inf` or `-inf` at the cursor, as printed for non-finite floats.
    fn non_finite(&self) -> Option<&'static str> {
        let rest = self.rest();
        ["-inf", "inf", "NaN"].into_iter().find(|word| {
            rest.strip_prefix(word).is_some_and(|after| {
                !after
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '.' | '-'))
            })
        })
    }

    fn non_finite_float(&mut self) -> Result<Term<A>> {
        let Some(word) = self.non_finite() else {
            bail!("expected NaN or inf at offset {}", self.pos);
        };
        self.pos += word.len();
        match self.suffix() {
            None => float_literal(word, FloatType::Float64),
            Some(atom) => match FloatType::from_atom(atom) {
                Some(ty) => float_literal(word, ty),
                None => bail!("`{word}` is only valid as a float, not `{atom}`"),
            },
        }
    }

    fn parens(&mut self) -> Result<Term<A>> {
        if self.eat(")") {
            return Ok(terms::product(Vec::new()));
        }
        let first = self.expr()?;
        if self.eat(")") {
            return Ok(first);
        }
        self.expect(",")?;
        let mut components = vec![first];
        components.extend(self.items(")")?);
        Ok(terms::product(components))
    }

    fn braces(&mut self) -> Result<Term<A>> {
        if self.eat("=>") {
            self.expect("}")?;
            return Ok(terms::map(Vec::new()));
        }
        if self.eat("}") {
            return Ok(terms::set(Vec::new()));
        }
        let first = self.expr()?;
        if !self.eat("=>") {
            let mut elements = vec![first];
            if !self.eat("}") {
                self.expect(",")?;
                elements.extend(self.items("}")?);
            }
            return Ok(terms::set(elements));
        }
        let mut entries = vec![(first, self.expr()?)];
        while !self.eat("}") {
            self.expect(",")?;
            let key = self.expr()?;
            self.expect("=>")?;
            entries.push((key, self.expr()?));
        }
        Ok(terms::map(entries))
    }

    fn identifier(&mut self) -> Result<Term<A>> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '.' | '-') {
                self.bump();
            } else {
                break;
            }
        }
        let src = self.src;
        let ident = &src[start..self.pos];
        let term = match ident {
            "true" => terms::boolean(true),
            "false" => terms::boolean(false),
            "nothing" => terms::nothing(),
            "just" => {
                self.expect("(")?;
                let inner = self.expr()?;
                self.expect(")")?;
                terms::just(inner)
            }
            _ => {
                let name = Name::from(ident);
                if self.registry.lookup(&name).is_some() {
                    terms::primitive(name)
                } else {
                    terms::variable(name)
                }
            }
        };
        Ok(term)
    }

    fn string(&mut self) -> Result<Term<A>> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => bail!("unterminated string starting at offset {start}"),
                Some('"') => return Ok(terms::string(out)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => bail!("unknown escape `\\{other}` at offset {}", self.pos - 1),
                        None => bail!("unterminated string starting at offset {start}"),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn binary(&mut self) -> Result<Term<A>> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.bump();
        }
        let digits = &self.src[start..self.pos];
        if digits.len() % 2 != 0 {
            bail!("binary literal 0x{digits} has an odd number of hex digits");
        }
        let bytes = (0..digits.len())
            .step_by(2)
            .map(|idx| u8::from_str_radix(&digits[idx..idx + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .with_context(|| format!("invalid binary literal 0x{digits}"))?;
        Ok(terms::binary(bytes))
    }

    fn number(&mut self) -> Result<Term<A>> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if matches!(c, '.' | 'e' | 'E') {
                is_float = true;
                self.bump();
                if matches!(c, 'e' | 'E') && matches!(self.peek(), Some('-' | '+')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        let src = self.src;
        let text = &src[start..self.pos];
        if text == "-" {
            bail!("expected digits after `-` at offset {start}");
        }
        let suffix = self.suffix();
        match suffix {
            None if is_float => float_literal(text, FloatType::Float64),
            None => integer_literal(text, IntegerType::Int32),
            Some(atom) => {
                if let Some(ty) = FloatType::from_atom(atom) {
                    float_literal(text, ty)
                } else if let Some(ty) = IntegerType::from_atom(atom) {
                    if is_float {
                        bail!("`{text}` is not an integer but is suffixed `{atom}`");
                    }
                    integer_literal(text, ty)
                } else {
                    bail!("unknown literal type `{atom}`")
                }
            }
        }
    }

    /// An optional `:type` suffix directly after a numeral.
    fn suffix(&mut self) -> Option<&'s str> {
        let rest = self.rest().strip_prefix(':')?;
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let src = self.src;
        let start = self.pos + 1;
        self.pos = start + len;
        Some(&src[start..self.pos])
    }
}

fn integer_literal<A>(text: &str, ty: IntegerType) -> Result<Term<A>> {
    let out_of_range = || anyhow!("`{text}` is not a valid {ty}");
    let term = match ty {
        IntegerType::Bigint => terms::bigint(text.parse::<BigInt>().map_err(|_| out_of_range())?),
        IntegerType::Int8 => terms::int8(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Int16 => terms::int16(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Int32 => terms::int32(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Int64 => terms::int64(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Uint8 => terms::uint8(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Uint16 => terms::uint16(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Uint32 => terms::uint32(text.parse().map_err(|_| out_of_range())?),
        IntegerType::Uint64 => terms::uint64(text.parse().map_err(|_| out_of_range())?),
    };
    Ok(term)
}

fn float_literal<A>(text: &str, ty: FloatType) -> Result<Term<A>> {
    let invalid = || anyhow!("`{text}` is not a valid {ty}");
    let term = match ty {
        FloatType::Float32 => terms::float32(text.parse().map_err(|_| invalid())?),
        FloatType::Float64 => terms::float64(text.parse().map_err(|_| invalid())?),
        FloatType::Bigfloat => terms::bigfloat(text.parse().map_err(|_| invalid())?),
    };
    Ok(term)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::library::{self, math};

    fn registry() -> anyhow::Result<Registry> {
        Ok(library::standard_registry()?)
    }

    #[test]
    fn literals_with_and_without_suffixes() -> anyhow::Result<()> {
        let reg = registry()?;
        assert_eq!(parse_term(" 42 ", &reg)?, terms::int32(42));
        assert_eq!(parse_term("-1:int8", &reg)?, terms::int8(-1));
        assert_eq!(parse_term("7:uint64", &reg)?, terms::uint64(7));
        assert_eq!(
            parse_term("123456789012345678901234567890:bigint", &reg)?,
            terms::bigint("123456789012345678901234567890".parse::<BigInt>()?)
        );
        assert_eq!(parse_term("1.5", &reg)?, terms::float64(1.5));
        assert_eq!(parse_term("1.5:float32", &reg)?, terms::float32(1.5));
        assert_eq!(parse_term("2:bigfloat", &reg)?, terms::bigfloat(2.0));
        assert_eq!(parse_term("1e-3", &reg)?, terms::float64(0.001));
        assert_eq!(parse_term("true", &reg)?, terms::boolean(true));
        assert_eq!(parse_term("0x00ff", &reg)?, terms::binary(vec![0x00, 0xff]));
        assert_eq!(
            parse_term(r#""a\"b\\c\n""#, &reg)?,
            terms::string("a\"b\\c\n")
        );
        Ok(())
    }

    #[test]
    fn non_finite_floats() -> anyhow::Result<()> {
        let reg = registry()?;
        assert_eq!(parse_term("inf", &reg)?, terms::float64(f64::INFINITY));
        assert_eq!(parse_term("-inf:float32", &reg)?, terms::float32(f32::NEG_INFINITY));
        assert_eq!(parse_term("NaN:bigfloat", &reg)?, terms::bigfloat(f64::NAN));
        assert_eq!(
            parse_term("[NaN, -inf]", &reg)?,
            terms::list(vec![terms::float64(f64::NAN), terms::float64(f64::NEG_INFINITY)])
        );
        assert!(parse_term("inf:int32", &reg).is_err());
        assert_eq!(parse_term("info", &reg)?, terms::variable("info"));
        Ok(())
    }

    #[test]
    fn containers() -> anyhow::Result<()> {
        let reg = registry()?;
        assert_eq!(
            parse_term("[1, 2]", &reg)?,
            terms::list(vec![terms::int32(1), terms::int32(2)])
        );
        assert_eq!(parse_term("[]", &reg)?, terms::list(vec![]));
        assert_eq!(
            parse_term("{2, 1, 2}", &reg)?,
            terms::set(vec![terms::int32(1), terms::int32(2)])
        );
        assert_eq!(parse_term("{}", &reg)?, terms::set(vec![]));
        assert_eq!(parse_term("{=>}", &reg)?, terms::map(vec![]));
        assert_eq!(
            parse_term(r#"{1 => "a", 2 => "b"}"#, &reg)?,
            terms::map(vec![
                (terms::int32(1), terms::string("a")),
                (terms::int32(2), terms::string("b")),
            ])
        );
        assert_eq!(
            parse_term("(1, \"x\")", &reg)?,
            terms::pair(terms::int32(1), terms::string("x"))
        );
        assert_eq!(parse_term("(7)", &reg)?, terms::int32(7));
        assert_eq!(parse_term("just(nothing)", &reg)?, terms::just(terms::nothing()));
        Ok(())
    }

    #[test]
    fn identifiers_resolve_against_the_registry() -> anyhow::Result<()> {
        let reg = registry()?;
        assert_eq!(
            parse_term("hydra/lib/math.add(2, 3)", &reg)?,
            terms::apply_all(terms::primitive(math::ADD), [terms::int32(2), terms::int32(3)])
        );
        assert_eq!(parse_term("ns.thing", &reg)?, terms::variable("ns.thing"));
        Ok(())
    }

    #[test]
    fn malformed_input_is_reported() -> anyhow::Result<()> {
        let reg = registry()?;
        for bad in ["[1, 2", "\"open", "300:int8", "1.5:int32", "7:word", "0xabc", "f()", "1 2", "-"] {
            assert!(parse_term(bad, &reg).is_err(), "{bad} should not parse");
        }
        Ok(())
    }

    #[test]
    fn reads_terms_from_files() -> anyhow::Result<()> {
        let reg = registry()?;
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "# sum of a list")?;
        writeln!(file, "hydra/lib/lists.length([1, 2, 3])")?;
        let term = parse_term_from_file(file.path(), &reg)?;
        assert_eq!(
            term,
            terms::apply(
                terms::primitive("hydra/lib/lists.length"),
                terms::list(vec![terms::int32(1), terms::int32(2), terms::int32(3)])
            )
        );
        let missing = parse_term_from_file(Path::new("/nonexistent/term.txt"), &reg);
        assert!(missing.is_err());
        Ok(())
    }
}
