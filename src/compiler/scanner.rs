//! The lexer (component E, §4.5): turns a UTF-8 source buffer into a stream
//! of [`Token`]s, tracking [`Position`] exactly the way the parser's
//! `ATTRIBUTES`/statement nodes need it. Token kinds are a superset of
//! [`super::ast::NodeKind`] (modifier keywords like `public`/`abstract`
//! never become persistent tree nodes, only attributes), so they live in
//! their own enum here rather than overloading the tree's kind space.

use std::cell::RefCell;
use std::str::Chars;

use crate::diagnostics::{Code, DiagnosticSink, Level, Message, Position};
use crate::options::{Option_, OptionSet};

use super::ast::{NodeId, NodeKind, Payload, Tree};
use super::escapes::{decode_number, decode_string_body, Number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    Eof,
    Identifier,
    Integer,
    FloatingPoint,
    String,
    RegularExpression,
    TemplateLiteral,

    // Keywords that become statement/declaration nodes directly.
    Var,
    Function,
    Class,
    If,
    Else,
    While,
    For,
    Return,
    This,
    Super,
    True,
    False,
    Null,
    Undefined,
    Typeof,
    Instanceof,
    New,
    Delete,
    Void,
    Yield,
    As,
    Is,
    In,
    Break,
    Continue,
    Goto,
    Import,
    Export,
    Interface,
    Namespace,
    Package,
    Catch,
    Throw,
    Try,
    Do,
    Switch,
    Case,
    Default,
    With,
    Use,
    Enum,
    Debugger,
    Native,
    Infinity,
    Nan,
    DunderLine,
    DunderFile,

    // Modifier / type keywords that never get their own tree node: they are
    // folded into attributes or type annotations by the parser.
    Abstract,
    Implements,
    Extends,
    Public,
    Private,
    Protected,
    Static,
    Final,
    Finally,
    Throws,
    Ensure,
    Invariant,
    Require,
    Inline,
    Transient,
    Volatile,
    Synchronized,
    Then,
    Byte,
    Char,
    Short,
    Long,
    Float,
    Double,
    Boolean,

    // Punctuation / operators — named after the produced `NodeKind` where
    // one exists; purely syntactic ones (parens, braces, colon) have their
    // own variants.
    Add,
    Increment,
    AssignmentAdd,
    Subtract,
    Decrement,
    AssignmentSubtract,
    Multiply,
    Power,
    AssignmentMultiply,
    AssignmentPower,
    Divide,
    AssignmentDivide,
    Modulo,
    AssignmentModulo,
    Assignment,
    Equal,
    StrictlyEqual,
    LogicalNot,
    NotEqual,
    StrictlyNotEqual,
    NotMatch,
    Less,
    LessEqual,
    ShiftLeft,
    AssignmentShiftLeft,
    Compare,
    RotateLeft,
    AssignmentRotateLeft,
    Minimum,
    AssignmentMinimum,
    LessGreater,
    Greater,
    GreaterEqual,
    ShiftRight,
    ShiftRightUnsigned,
    AssignmentShiftRight,
    AssignmentShiftRightUnsigned,
    RotateRight,
    AssignmentRotateRight,
    Maximum,
    AssignmentMaximum,
    BitwiseAnd,
    LogicalAnd,
    AssignmentBitwiseAnd,
    AssignmentLogicalAnd,
    BitwiseOr,
    LogicalOr,
    AssignmentBitwiseOr,
    AssignmentLogicalOr,
    BitwiseXor,
    LogicalXor,
    AssignmentBitwiseXor,
    AssignmentLogicalXor,
    BitwiseNot,
    Match,
    SmartMatch,
    NotMatchBang,
    Dot,
    Range,
    Rest,
    Colon,
    Scope,
    ColonAssign,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Question,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Payload,
    pub position: Position,
}

/// One recognized operator/punctuator spelling, longest-match first.
struct OperatorEntry {
    text: &'static str,
    kind: TokenKind,
    extended: bool,
}

/// Longest-match table (§4.5.3). Ordering within a shared prefix matters:
/// longer entries must precede shorter ones sharing the same start.
fn operator_table() -> &'static [OperatorEntry] {
    macro_rules! op {
        ($text:expr, $kind:ident) => {
            OperatorEntry {
                text: $text,
                kind: TokenKind::$kind,
                extended: false,
            }
        };
        ($text:expr, $kind:ident, ext) => {
            OperatorEntry {
                text: $text,
                kind: TokenKind::$kind,
                extended: true,
            }
        };
    }
    &[
        op!("**=", AssignmentPower, ext),
        op!(">>>=", AssignmentShiftRightUnsigned),
        op!("<<=", AssignmentShiftLeft),
        op!(">>=", AssignmentShiftRight),
        op!("<%=", AssignmentRotateLeft, ext),
        op!(">%=", AssignmentRotateRight, ext),
        op!("<?=", AssignmentMinimum, ext),
        op!(">?=", AssignmentMaximum, ext),
        op!("&&=", AssignmentLogicalAnd, ext),
        op!("||=", AssignmentLogicalOr, ext),
        op!("^^=", AssignmentLogicalXor, ext),
        op!("<=>", Compare, ext),
        op!("...", Rest),
        op!(">>>", ShiftRightUnsigned),
        op!("===", StrictlyEqual),
        op!("!==", StrictlyNotEqual),
        op!("**", Power, ext),
        op!("++", Increment),
        op!("+=", AssignmentAdd),
        op!("--", Decrement),
        op!("-=", AssignmentSubtract),
        op!("*=", AssignmentMultiply),
        op!("/=", AssignmentDivide),
        op!("%=", AssignmentModulo),
        op!("==", Equal),
        op!("!=", NotEqual),
        op!("!~", NotMatch, ext),
        op!("<=", LessEqual),
        op!("<<", ShiftLeft),
        op!("<%", RotateLeft, ext),
        op!("<?", Minimum, ext),
        op!("<>", LessGreater, ext),
        op!(">=", GreaterEqual),
        op!(">>", ShiftRight),
        op!(">%", RotateRight, ext),
        op!(">?", Maximum, ext),
        op!("&&", LogicalAnd),
        op!("&=", AssignmentBitwiseAnd),
        op!("||", LogicalOr),
        op!("|=", AssignmentBitwiseOr),
        op!("^^", LogicalXor, ext),
        op!("^=", AssignmentBitwiseXor),
        op!("~=", Match, ext),
        op!("~~", SmartMatch, ext),
        op!("~!", NotMatchBang, ext),
        op!("..", Range, ext),
        op!("::", Scope),
        op!(":=", ColonAssign, ext),
        op!("+", Add),
        op!("-", Subtract),
        op!("*", Multiply),
        op!("/", Divide),
        op!("%", Modulo),
        op!("=", Assignment),
        op!("!", LogicalNot),
        op!("<", Less),
        op!(">", Greater),
        op!("&", BitwiseAnd),
        op!("|", BitwiseOr),
        op!("^", BitwiseXor),
        op!("~", BitwiseNot),
        op!(".", Dot),
        op!(":", Colon),
        op!("(", LeftParen),
        op!(")", RightParen),
        op!("[", LeftBracket),
        op!("]", RightBracket),
        op!("{", LeftBrace),
        op!("}", RightBrace),
        op!(",", Comma),
        op!(";", Semicolon),
        op!("?", Question),
    ]
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match word {
        "var" => Var,
        "function" => Function,
        "class" => Class,
        "if" => If,
        "else" => Else,
        "while" => While,
        "for" => For,
        "return" => Return,
        "this" => This,
        "super" => Super,
        "true" => True,
        "false" => False,
        "null" => Null,
        "undefined" => Undefined,
        "typeof" => Typeof,
        "instanceof" => Instanceof,
        "new" => New,
        "delete" => Delete,
        "void" => Void,
        "yield" => Yield,
        "abstract" => Abstract,
        "as" => As,
        "is" => Is,
        "in" => In,
        "break" => Break,
        "continue" => Continue,
        "goto" => Goto,
        "implements" => Implements,
        "import" => Import,
        "export" => Export,
        "extends" => Extends,
        "interface" => Interface,
        "namespace" => Namespace,
        "package" => Package,
        "public" => Public,
        "private" => Private,
        "protected" => Protected,
        "static" => Static,
        "final" => Final,
        "finally" => Finally,
        "catch" => Catch,
        "throw" => Throw,
        "throws" => Throws,
        "try" => Try,
        "do" => Do,
        "switch" => Switch,
        "case" => Case,
        "default" => Default,
        "with" => With,
        "use" => Use,
        "enum" => Enum,
        "debugger" => Debugger,
        "ensure" => Ensure,
        "invariant" => Invariant,
        "require" => Require,
        "native" => Native,
        "inline" => Inline,
        "transient" => Transient,
        "volatile" => Volatile,
        "synchronized" => Synchronized,
        "then" => Then,
        "byte" => Byte,
        "char" => Char,
        "short" => Short,
        "long" => Long,
        "float" => Float,
        "double" => Double,
        "boolean" => Boolean,
        "Infinity" => Infinity,
        "NaN" => Nan,
        "__LINE__" => DunderLine,
        "__FILE__" => DunderFile,
        _ => return None,
    })
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_xid::UnicodeXID::is_xid_start(c)
}

fn is_identifier_continue(c: char) -> bool {
    c == '$' || unicode_xid::UnicodeXID::is_xid_continue(c)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{b}' | '\u{c}') || c.is_whitespace()
}

#[derive(Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    chars: Vec<char>,
    cursor: usize,
    position: Position,
    /// Shared with the parser (§4.6.3's `use` pragmas mutate it mid-parse);
    /// a `RefCell` so each side only ever takes a short-lived borrow rather
    /// than holding a live reference for the whole parse.
    options: &'a RefCell<OptionSet>,
    sink: &'a dyn DiagnosticSink,
    /// Set by the parser before each `get_next_token` call (§4.6.4): tells
    /// the scanner whether a `/` at the current position should start a
    /// regular expression literal or be the divide operator.
    pub expecting_literal: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(filename: impl Into<String>, source: &'a str, options: &'a RefCell<OptionSet>, sink: &'a dyn DiagnosticSink) -> Self {
        Scanner {
            source,
            chars: source.chars().collect(),
            cursor: 0,
            position: Position::new(filename),
            options,
            sink,
            expecting_literal: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        match c {
            '\u{c}' => self.position.new_page(),
            '\u{2029}' => {
                self.position.new_line();
                self.position.new_paragraph();
            }
            '\n' => self.position.new_line(),
            '\r' => {
                if self.peek() == Some('\n') {
                    self.cursor += 1;
                }
                self.position.new_line();
            }
            '\u{2028}' => self.position.new_line(),
            _ => {}
        }
        Some(c)
    }

    fn diagnostic(&self, level: Level, code: Code) -> Message<'a> {
        Message::new(level, code, self.position.clone(), self.sink)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if is_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => break,
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Reads the raw operator/punctuator starting at the cursor using
    /// longest-match, honoring the `EXTENDED_OPERATORS` gate.
    fn match_operator(&mut self) -> Option<Token> {
        let remaining: String = self.chars[self.cursor..].iter().collect();
        let extended_on = self.options.borrow().is_set(Option_::ExtendedOperators);
        for entry in operator_table() {
            if entry.extended && !extended_on {
                continue;
            }
            if remaining.starts_with(entry.text) {
                let position = self.position.clone();
                for _ in 0..entry.text.chars().count() {
                    self.advance();
                }
                return Some(Token {
                    kind: entry.kind,
                    payload: Payload::None,
                    position,
                });
            }
        }
        None
    }

    fn scan_identifier(&mut self) -> Token {
        let position = self.position.clone();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                if let Some(decoded) = self.try_decode_identifier_escape() {
                    text.push(decoded);
                    continue;
                }
            }
            let ok = if text.is_empty() {
                is_identifier_start(c)
            } else {
                is_identifier_continue(c)
            };
            if !ok {
                break;
            }
            text.push(c);
            self.advance();
        }
        if let Some(kind) = keyword_kind(&text) {
            let payload = match kind {
                TokenKind::Infinity => Payload::Float(crate::numbers::Float::infinity()),
                TokenKind::Nan => Payload::Float(crate::numbers::Float::nan()),
                TokenKind::DunderLine => {
                    Payload::Integer(crate::numbers::Integer::new(position.line as i64))
                }
                TokenKind::DunderFile => Payload::String(position.filename.clone()),
                _ => Payload::None,
            };
            let token_kind = match kind {
                TokenKind::Infinity | TokenKind::Nan => TokenKind::FloatingPoint,
                TokenKind::DunderLine => TokenKind::Integer,
                TokenKind::DunderFile => TokenKind::String,
                other => other,
            };
            return Token {
                kind: token_kind,
                payload,
                position,
            };
        }
        Token {
            kind: TokenKind::Identifier,
            payload: Payload::String(text),
            position,
        }
    }

    /// Attempts to decode a `\xHH`/`\uHHHH`/`\UHHHHHH`/octal escape at the
    /// cursor for use inside an identifier; returns `None` (leaving the
    /// cursor untouched) if what follows `\` isn't a recognized identifier
    /// escape.
    fn try_decode_identifier_escape(&mut self) -> Option<char> {
        let remaining: String = self.chars[self.cursor..].iter().take(10).collect();
        let extended = self.options.borrow().is_set(Option_::ExtendedEscapeSequences);
        let decoded = decode_string_body(&remaining, extended);
        let octal_len = remaining
            .chars()
            .skip(1)
            .take(3)
            .take_while(|c| ('0'..='7').contains(c))
            .count();
        let consumed_text = if remaining.starts_with("\\u") {
            6
        } else if remaining.starts_with("\\U") && extended {
            8
        } else if remaining.starts_with("\\x") {
            4
        } else if extended && octal_len > 0 {
            1 + octal_len
        } else {
            return None;
        };
        for _ in 0..consumed_text {
            self.advance();
        }
        decoded.value.chars().next()
    }

    fn scan_number(&mut self) -> Token {
        let position = self.position.clone();
        let mut text = String::new();
        let octal_allowed = self.options.borrow().is_set(Option_::Octal);
        let binary_allowed = self.options.borrow().is_set(Option_::Binary);

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            text.push(self.advance().unwrap());
            text.push(self.advance().unwrap());
            self.consume_digit_run(&mut text, |c| c.is_ascii_hexdigit());
        } else if binary_allowed && self.peek() == Some('0') && matches!(self.peek_at(1), Some('b') | Some('B')) {
            text.push(self.advance().unwrap());
            text.push(self.advance().unwrap());
            self.consume_digit_run(&mut text, |c| c == '0' || c == '1');
        } else {
            self.consume_digit_run(&mut text, |c| c.is_ascii_digit());
            if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(true) {
                text.push(self.advance().unwrap());
                self.consume_digit_run(&mut text, |c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let mut lookahead = 1;
                if matches!(self.peek_at(1), Some('+') | Some('-')) {
                    lookahead += 1;
                }
                if self.peek_at(lookahead).map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    text.push(self.advance().unwrap());
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        text.push(self.advance().unwrap());
                    }
                    self.consume_digit_run(&mut text, |c| c.is_ascii_digit());
                }
            }
        }

        // A letter immediately following the literal (no intervening
        // whitespace) is an error, not the start of a new token (§4.5.4).
        let trailing_letter = self.peek().map(is_identifier_start).unwrap_or(false);

        let number = decode_number(&text, octal_allowed, binary_allowed);
        if trailing_letter {
            self.diagnostic(Level::Error, Code::InvalidNumber)
                .append_str("number immediately followed by an identifier character")
                .emit();
            return Token {
                kind: TokenKind::Integer,
                payload: Payload::Integer(crate::numbers::Integer::new(-1)),
                position,
            };
        }

        match number {
            Number::Integer(i) => Token {
                kind: TokenKind::Integer,
                payload: Payload::Integer(i),
                position,
            },
            Number::Float(f) => Token {
                kind: TokenKind::FloatingPoint,
                payload: Payload::Float(f),
                position,
            },
            Number::Invalid => {
                self.diagnostic(Level::Error, Code::InvalidNumber)
                    .append_str("malformed numeric literal '")
                    .append_str(&text)
                    .append_str("'")
                    .emit();
                Token {
                    kind: TokenKind::Integer,
                    payload: Payload::Integer(crate::numbers::Integer::new(-1)),
                    position,
                }
            }
        }
    }

    fn consume_digit_run(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if c == '\'' {
                self.advance();
                continue;
            }
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
    }

    fn scan_string(&mut self, quote: char) -> Token {
        let position = self.position.clone();
        self.advance();
        let mut raw = String::new();
        let mut unterminated = false;
        loop {
            match self.peek() {
                None => {
                    unterminated = true;
                    break;
                }
                Some(c) if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') => {
                    unterminated = true;
                    break;
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    raw.push(self.advance().unwrap());
                    if let Some(escaped) = self.peek() {
                        raw.push(escaped);
                        self.advance();
                    }
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
        if unterminated {
            self.diagnostic(Level::Error, Code::UnterminatedString)
                .append_str("unterminated string literal")
                .emit();
        }
        let extended = self.options.borrow().is_set(Option_::ExtendedEscapeSequences);
        let decoded = decode_string_body(&raw, extended);
        for error in &decoded.errors {
            self.diagnostic(Level::Error, error.code)
                .append_str("unknown escape sequence")
                .emit();
        }
        Token {
            kind: TokenKind::String,
            payload: Payload::String(decoded.value),
            position,
        }
    }

    fn scan_regex(&mut self, delimiter: char) -> Token {
        let position = self.position.clone();
        self.advance();
        let mut body = String::new();
        while let Some(c) = self.peek() {
            if c == delimiter {
                self.advance();
                break;
            }
            if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                self.diagnostic(Level::Error, Code::UnterminatedString)
                    .append_str("unterminated regular expression literal")
                    .emit();
                break;
            }
            body.push(c);
            self.advance();
        }
        // Trailing identifier characters are the regex's flags.
        while let Some(c) = self.peek() {
            if !is_identifier_continue(c) {
                break;
            }
            body.push(c);
            self.advance();
        }
        Token {
            kind: TokenKind::RegularExpression,
            payload: Payload::String(body),
            position,
        }
    }

    /// Produces the next token, honoring [`Scanner::expecting_literal`] to
    /// disambiguate `/` between divide and a JS-style regex literal.
    pub fn get_next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let Some(c) = self.peek() else {
            return Token {
                kind: TokenKind::Eof,
                payload: Payload::None,
                position: self.position.clone(),
            };
        };

        if c == '`' {
            return self.scan_regex('`');
        }
        if c == '/' && self.expecting_literal {
            return self.scan_regex('/');
        }
        if c == '"' || c == '\'' {
            return self.scan_string(c);
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false)) {
            return self.scan_number();
        }
        if is_identifier_start(c) || c == '\\' {
            return self.scan_identifier();
        }
        if let Some(token) = self.match_operator() {
            return token;
        }

        let position = self.position.clone();
        let bad = self.advance().unwrap();
        self.diagnostic(Level::Error, Code::UnexpectedPunctuation)
            .append_str("unexpected character '")
            .append_char(bad)
            .append_str("'")
            .emit();
        Token {
            kind: TokenKind::Eof,
            payload: Payload::None,
            position,
        }
    }

    /// Creates a new tree node at the scanner's current position, for the
    /// parser to use when it needs a node not directly produced by a token
    /// (e.g. a synthetic `DIRECTIVE_LIST`).
    pub fn get_new_node(&self, tree: &mut Tree, kind: NodeKind) -> NodeId {
        tree.alloc(kind, self.position.clone())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn at_eof(&self) -> bool {
        self.cursor >= self.chars.len()
    }
}

/// `Chars` re-export kept for callers building their own lookahead helpers
/// around a raw `&str` the way [`super::escapes`] does.
pub type SourceChars<'a> = Chars<'a>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::global;

    fn tokens(source: &str) -> Vec<Token> {
        let options = RefCell::new(OptionSet::new());
        let sink = global();
        let mut scanner = Scanner::new("test.as", source, &options, sink);
        let mut out = Vec::new();
        loop {
            let token = scanner.get_next_token();
            let done = token.kind == TokenKind::Eof;
            out.push(token);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn tokenizes_a_simple_assignment() {
        let result = tokens("var x = 1 + 2;");
        let kinds: Vec<_> = result.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Assignment,
                TokenKind::Integer,
                TokenKind::Add,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_match_prefers_triple_over_double_operator() {
        let options = RefCell::new(OptionSet::new());
        let sink = global();
        let mut scanner = Scanner::new("test.as", "===", &options, sink);
        assert_eq!(scanner.get_next_token().kind, TokenKind::StrictlyEqual);
        assert_eq!(scanner.get_next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn extended_operators_require_the_option() {
        let options = RefCell::new(OptionSet::new());
        let sink = global();
        let mut scanner = Scanner::new("test.as", "<=>", &options, sink);
        // COMPARE is gated; without EXTENDED_OPERATORS it falls back to `<=` then `>`.
        assert_eq!(scanner.get_next_token().kind, TokenKind::LessEqual);
        assert_eq!(scanner.get_next_token().kind, TokenKind::Greater);
    }

    #[test]
    fn tracks_line_numbers_across_terminators() {
        let options = RefCell::new(OptionSet::new());
        let sink = global();
        let mut scanner = Scanner::new("test.as", "a\nb\r\nc", &options, sink);
        let first = scanner.get_next_token();
        assert_eq!(first.position.line, 1);
        let second = scanner.get_next_token();
        assert_eq!(second.position.line, 2);
        let third = scanner.get_next_token();
        assert_eq!(third.position.line, 3);
    }

    #[test]
    fn dunder_line_and_file_produce_literals() {
        let result = tokens("__LINE__ __FILE__");
        assert_eq!(result[0].kind, TokenKind::Integer);
        assert_eq!(result[1].kind, TokenKind::String);
    }
}
