//! Position tracking and the diagnostic sink (component A).
//!
//! A [`Position`] is value-copied into every node at construction time.
//! A [`Diagnostic`] carries a level, an error code, a position, and a
//! message; it is built up with a streaming [`Message`] builder and handed
//! to a [`DiagnosticSink`] for delivery. A thin process-wide default sink
//! (behind a `Mutex`-guarded `OnceLock`) preserves "install one callback,
//! see every diagnostic" for callers that don't want to thread an explicit
//! sink through the lexer/parser/compiler, while every pipeline stage also
//! accepts an explicit `&dyn DiagnosticSink` so a future multi-threaded
//! caller can opt out of the singleton per-compilation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

/// Source position: filename, enclosing function name, and the
/// page/paragraph/line counters the lexer maintains as it scans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub filename: String,
    pub function: String,
    pub line: u32,
    pub page: u32,
    pub page_line: u32,
    pub paragraph: u32,
}

impl Position {
    pub fn new(filename: impl Into<String>) -> Self {
        Position {
            filename: filename.into(),
            function: String::new(),
            line: 1,
            page: 1,
            page_line: 1,
            paragraph: 1,
        }
    }

    /// LF, CR, CR+LF (as one terminator), and U+2028 all call this.
    pub fn new_line(&mut self) {
        self.line += 1;
        self.page_line += 1;
    }

    /// FF calls this: a new page resets the page-line and paragraph counters.
    pub fn new_page(&mut self) {
        self.page += 1;
        self.page_line = 1;
        self.paragraph = 1;
    }

    /// U+2029 (PARAGRAPH SEPARATOR) calls this in addition to `new_line`.
    pub fn new_paragraph(&mut self) {
        self.paragraph += 1;
    }

    pub fn set_function(&mut self, function: impl Into<String>) {
        self.function = function.into();
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// Diagnostic severity. Declaration order is significant: it is also the
/// verbosity order used by the process-wide filter (`OFF` least verbose,
/// `TRACE` most).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Off,
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl Level {
    /// FATAL and ERROR are never suppressed by the process-wide filter.
    pub fn always_delivered(&self) -> bool {
        matches!(self, Level::Fatal | Level::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Off => "off",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        write!(f, "{s}")
    }
}

/// Closed set of error codes. This covers every code named in the lexer,
/// parser, and compiler sections plus a representative extension set; it is
/// not a literal transcription of the ~90-code original enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Code {
    None,
    InvalidNumber,
    UnterminatedString,
    UnknownEscapeSequence,
    UnexpectedPunctuation,
    UnexpectedToken,
    UnexpectedEof,
    SemicolonExpected,
    CommaExpected,
    ParenthesisExpected,
    SquareBracketsExpected,
    CurvlyBracketsExpected,
    ExpressionExpected,
    IdentifierExpected,
    UnknownPragma,
    BadPragma,
    CannotCompile,
    Incompatible,
    MismatchFuncVar,
    CannotOverload,
    Duplicates,
    InvalidType,
    InvalidAttributes,
    Native,
    Static,
    TypeNotLinked,
    LabelNotFound,
    NotFound,
    NotAllowed,
    InaccessibleStatement,
    UnexpectedDatabase,
    InternalError,
    InvalidData,
    UnknownOperator,
    LoopUsingConst,
    UnknownEscapeCharacter,
    UnsupportedVersion,
}

impl Code {
    pub fn name(&self) -> &'static str {
        match self {
            Code::None => "NONE",
            Code::InvalidNumber => "INVALID_NUMBER",
            Code::UnterminatedString => "UNTERMINATED_STRING",
            Code::UnknownEscapeSequence => "UNKNOWN_ESCAPE_SEQUENCE",
            Code::UnexpectedPunctuation => "UNEXPECTED_PUNCTUATION",
            Code::UnexpectedToken => "UNEXPECTED_TOKEN",
            Code::UnexpectedEof => "UNEXPECTED_EOF",
            Code::SemicolonExpected => "SEMICOLON_EXPECTED",
            Code::CommaExpected => "COMMA_EXPECTED",
            Code::ParenthesisExpected => "PARENTHESIS_EXPECTED",
            Code::SquareBracketsExpected => "SQUARE_BRACKETS_EXPECTED",
            Code::CurvlyBracketsExpected => "CURVLY_BRACKETS_EXPECTED",
            Code::ExpressionExpected => "EXPRESSION_EXPECTED",
            Code::IdentifierExpected => "IDENTIFIER_EXPECTED",
            Code::UnknownPragma => "UNKNOWN_PRAGMA",
            Code::BadPragma => "BAD_PRAGMA",
            Code::CannotCompile => "CANNOT_COMPILE",
            Code::Incompatible => "INCOMPATIBLE",
            Code::MismatchFuncVar => "MISMATCH_FUNC_VAR",
            Code::CannotOverload => "CANNOT_OVERLOAD",
            Code::Duplicates => "DUPLICATES",
            Code::InvalidType => "INVALID_TYPE",
            Code::InvalidAttributes => "INVALID_ATTRIBUTES",
            Code::Native => "NATIVE",
            Code::Static => "STATIC",
            Code::TypeNotLinked => "TYPE_NOT_LINKED",
            Code::LabelNotFound => "LABEL_NOT_FOUND",
            Code::NotFound => "NOT_FOUND",
            Code::NotAllowed => "NOT_ALLOWED",
            Code::InaccessibleStatement => "INACCESSIBLE_STATEMENT",
            Code::UnexpectedDatabase => "UNEXPECTED_DATABASE",
            Code::InternalError => "INTERNAL_ERROR",
            Code::InvalidData => "INVALID_DATA",
            Code::UnknownOperator => "UNKNOWN_OPERATOR",
            Code::LoopUsingConst => "LOOP_USING_CONST",
            Code::UnknownEscapeCharacter => "UNKNOWN_ESCAPE_CHARACTER",
            Code::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }

    /// Numeric code used in the TypeScript-style `ASnnnn` banner. Stable
    /// across releases.
    pub fn number(&self) -> u32 {
        1000 + (*self as u32)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single delivered diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Code,
    pub position: Position,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}:{}) - {} AS{}: {}",
            self.position.filename,
            self.position.line,
            self.position.page_line,
            self.level,
            self.code.number(),
            self.message
        )
    }
}

/// Receives non-suppressed diagnostics and counts warnings/errors.
pub trait DiagnosticSink: Send + Sync {
    fn current_level(&self) -> Level;
    fn set_current_level(&self, level: Level);
    fn record(&self, diagnostic: Diagnostic);
    fn error_count(&self) -> u64;
    fn warning_count(&self) -> u64;

    /// Whether `level` would actually reach the callback right now.
    fn accepts(&self, level: Level) -> bool {
        level.always_delivered() || level <= self.current_level()
    }
}

type Callback = Box<dyn Fn(&Diagnostic) + Send + Sync>;

/// The process-wide default sink. A thin `Mutex`/`OnceLock`-guarded
/// singleton, matching the "thin process-wide default" design note while
/// every lexer/parser/compiler instance can also be handed an explicit sink.
pub struct GlobalSink {
    level: Mutex<Level>,
    errors: AtomicU64,
    warnings: AtomicU64,
    callback: Mutex<Option<Callback>>,
}

impl GlobalSink {
    fn new() -> Self {
        GlobalSink {
            level: Mutex::new(Level::Warning),
            errors: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
            callback: Mutex::new(None),
        }
    }

    /// Install a callback; pass `None` to detach it.
    pub fn set_callback(&self, callback: Option<Callback>) {
        *self.callback.lock().unwrap() = callback;
    }

    pub fn reset_counters(&self) {
        self.errors.store(0, Ordering::SeqCst);
        self.warnings.store(0, Ordering::SeqCst);
    }
}

impl DiagnosticSink for GlobalSink {
    fn current_level(&self) -> Level {
        *self.level.lock().unwrap()
    }

    fn set_current_level(&self, level: Level) {
        *self.level.lock().unwrap() = level;
    }

    fn record(&self, diagnostic: Diagnostic) {
        if !self.accepts(diagnostic.level) {
            return;
        }
        match diagnostic.level {
            Level::Fatal | Level::Error => {
                self.errors.fetch_add(1, Ordering::SeqCst);
            }
            Level::Warning => {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        if let Some(cb) = self.callback.lock().unwrap().as_ref() {
            cb(&diagnostic);
        }
    }

    fn error_count(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    fn warning_count(&self) -> u64 {
        self.warnings.load(Ordering::SeqCst)
    }
}

static GLOBAL: OnceLock<GlobalSink> = OnceLock::new();

/// The process-wide default sink.
pub fn global() -> &'static GlobalSink {
    GLOBAL.get_or_init(GlobalSink::new)
}

/// Builder-style diagnostic: construct with level+code(+position), stream
/// in pieces of the message, and deliver it. If `.emit()` is never called
/// the `Drop` impl flushes it to the sink recorded at construction time,
/// giving the same "destructor delivers the message" guarantee the
/// original's streaming-operator-into-a-temporary pattern had, without
/// leaning on an actual C++-style destructor side effect.
pub struct Message<'a> {
    level: Level,
    code: Code,
    position: Position,
    text: String,
    sink: &'a dyn DiagnosticSink,
    emitted: bool,
}

impl<'a> Message<'a> {
    pub fn new(level: Level, code: Code, position: Position, sink: &'a dyn DiagnosticSink) -> Self {
        Message {
            level,
            code,
            position,
            text: String::new(),
            sink,
            emitted: false,
        }
    }

    pub fn append_str(mut self, s: &str) -> Self {
        self.text.push_str(s);
        self
    }

    pub fn append_char(mut self, c: char) -> Self {
        self.text.push(c);
        self
    }

    pub fn append_wide_char(mut self, c: char) -> Self {
        self.append_char(c)
    }

    pub fn append_bool(mut self, b: bool) -> Self {
        self.text.push_str(if b { "true" } else { "false" });
        self
    }

    pub fn append_integer(mut self, n: i64) -> Self {
        self.text.push_str(&n.to_string());
        self
    }

    pub fn append_float(mut self, n: f64) -> Self {
        self.text.push_str(&n.to_string());
        self
    }

    pub fn append_pointer(mut self, address: usize) -> Self {
        self.text.push_str(&format!("{address:#x}"));
        self
    }

    pub fn append_utf16(self, units: &[u16]) -> Self {
        let decoded: String = char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        self.append_str(&decoded)
    }

    pub fn append_utf32(self, code_points: &[u32]) -> Self {
        let decoded: String = code_points
            .iter()
            .map(|cp| char::from_u32(*cp).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        self.append_str(&decoded)
    }

    pub fn append_number(self, n: &crate::numbers::Integer) -> Self {
        self.append_integer(n.get())
    }

    pub fn append_real(self, n: &crate::numbers::Float) -> Self {
        self.append_float(n.get())
    }

    /// Deliver the message now; safe to call at most once (further appends
    /// would be lost since this consumes `self`).
    pub fn emit(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        if self.emitted || self.text.is_empty() {
            self.emitted = true;
            return;
        }
        self.emitted = true;
        self.sink.record(Diagnostic {
            level: self.level,
            code: self.code,
            position: self.position.clone(),
            message: std::mem::take(&mut self.text),
        });
    }
}

impl Drop for Message<'_> {
    fn drop(&mut self) {
        if !self.emitted {
            self.flush();
        }
    }
}

/// Programmer-error / invariant-violation category (§7.2): illegal payload
/// access, disallowed flag/attribute sets, locked-node destruction, null
/// lexer inputs. These are not recoverable; call sites that the
/// specification marks non-recoverable `panic!` with this type's `Display`
/// text instead of returning a `Result` a caller could paper over.
#[derive(Debug, Clone)]
pub struct InternalError {
    pub message: String,
}

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        InternalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for InternalError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        level: Mutex<Level>,
        errors: AtomicU64,
        warnings: AtomicU64,
        seen: Mutex<Vec<Diagnostic>>,
    }

    impl Recorder {
        fn new(level: Level) -> Self {
            Recorder {
                level: Mutex::new(level),
                errors: AtomicU64::new(0),
                warnings: AtomicU64::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl DiagnosticSink for Recorder {
        fn current_level(&self) -> Level {
            *self.level.lock().unwrap()
        }
        fn set_current_level(&self, level: Level) {
            *self.level.lock().unwrap() = level;
        }
        fn record(&self, diagnostic: Diagnostic) {
            if !self.accepts(diagnostic.level) {
                return;
            }
            match diagnostic.level {
                Level::Fatal | Level::Error => {
                    self.errors.fetch_add(1, Ordering::SeqCst);
                }
                Level::Warning => {
                    self.warnings.fetch_add(1, Ordering::SeqCst);
                }
                _ => {}
            }
            self.seen.lock().unwrap().push(diagnostic);
        }
        fn error_count(&self) -> u64 {
            self.errors.load(Ordering::SeqCst)
        }
        fn warning_count(&self) -> u64 {
            self.warnings.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn message_flushes_on_drop() {
        let sink = Recorder::new(Level::Warning);
        {
            let msg = Message::new(Level::Error, Code::NotFound, Position::new("a.as"), &sink);
            let _ = msg.append_str("identifier '").append_str("foo").append_str("' not found");
        }
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.seen.lock().unwrap()[0].message, "identifier 'foo' not found");
    }

    #[test]
    fn filter_never_suppresses_error_or_fatal() {
        let sink = Recorder::new(Level::Off);
        Message::new(Level::Error, Code::CannotCompile, Position::new("a.as"), &sink)
            .append_str("boom")
            .emit();
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn filter_suppresses_verbose_levels() {
        let sink = Recorder::new(Level::Warning);
        Message::new(Level::Trace, Code::None, Position::new("a.as"), &sink)
            .append_str("trace note")
            .emit();
        assert!(sink.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_message_never_delivers() {
        let sink = Recorder::new(Level::Warning);
        let _ = Message::new(Level::Warning, Code::None, Position::new("a.as"), &sink);
        assert!(sink.seen.lock().unwrap().is_empty());
        assert_eq!(sink.warning_count(), 0);
    }
}
