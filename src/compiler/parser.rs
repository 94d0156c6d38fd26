//! The parser (component F, §4.6): recursive descent over the token stream
//! the scanner produces, building the tree directly (there is no separate
//! untyped CST). The expression grammar is a precedence-climbing table
//! rather than eighteen separate mutually-recursive functions — the two
//! are semantically identical, but the table reads closer to §4.6.2's own
//! tabular presentation and avoids eighteen near-identical functions.

use std::cell::RefCell;

use crate::diagnostics::{Code, DiagnosticSink, Level, Message, Position};
use crate::options::{Option_, OptionSet};

use super::ast::{Link, NodeFlags, NodeId, NodeKind, Payload, Tree};
use super::scanner::{Scanner, Token, TokenKind};

/// Associativity of a binary operator level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// One entry in the binary-operator precedence table (§4.6.2, levels 5-15;
/// level 2's assignment operators and level 16's unary/level-17's postfix
/// operators are handled by dedicated functions since they aren't plain
/// left-to-right binary folds).
struct BinOp {
    token: TokenKind,
    kind: NodeKind,
    precedence: u8,
    assoc: Assoc,
    extended: bool,
}

fn binary_table() -> &'static [BinOp] {
    macro_rules! bin {
        ($tok:ident, $kind:ident, $prec:expr) => {
            BinOp {
                token: TokenKind::$tok,
                kind: NodeKind::$kind,
                precedence: $prec,
                assoc: Assoc::Left,
                extended: false,
            }
        };
        ($tok:ident, $kind:ident, $prec:expr, ext) => {
            BinOp {
                token: TokenKind::$tok,
                kind: NodeKind::$kind,
                precedence: $prec,
                assoc: Assoc::Left,
                extended: true,
            }
        };
    }
    &[
        bin!(LogicalOr, LogicalOr, 5),
        bin!(LogicalXor, LogicalXor, 5, ext),
        bin!(LogicalAnd, LogicalAnd, 6),
        bin!(BitwiseOr, BitwiseOr, 7),
        bin!(BitwiseXor, BitwiseXor, 8),
        bin!(BitwiseAnd, BitwiseAnd, 9),
        bin!(Equal, Equal, 10),
        bin!(NotEqual, NotEqual, 10),
        bin!(StrictlyEqual, StrictlyEqual, 10),
        bin!(StrictlyNotEqual, StrictlyNotEqual, 10),
        bin!(Compare, Compare, 10, ext),
        bin!(SmartMatch, SmartMatch, 10, ext),
        bin!(Less, Less, 11),
        bin!(LessEqual, LessEqual, 11),
        bin!(Greater, Greater, 11),
        bin!(GreaterEqual, GreaterEqual, 11),
        bin!(Is, Is, 11),
        bin!(As, As, 11),
        bin!(In, In, 11),
        bin!(Instanceof, Instanceof, 11),
        bin!(Match, Match, 11, ext),
        bin!(NotMatch, NotMatch, 11, ext),
        bin!(Minimum, Minimum, 11, ext),
        bin!(Maximum, Maximum, 11, ext),
        bin!(ShiftLeft, ShiftLeft, 12),
        bin!(ShiftRight, ShiftRight, 12),
        bin!(ShiftRightUnsigned, ShiftRightUnsigned, 12),
        bin!(RotateLeft, RotateLeft, 12, ext),
        bin!(RotateRight, RotateRight, 12, ext),
        bin!(Add, Add, 13),
        bin!(Subtract, Subtract, 13),
        bin!(Multiply, Multiply, 14),
        bin!(Divide, Divide, 14),
        bin!(Modulo, Modulo, 14),
    ]
}

const POWER_PRECEDENCE: u8 = 15;

fn assignment_kind(token: TokenKind) -> Option<NodeKind> {
    use NodeKind::*;
    use TokenKind as T;
    Some(match token {
        T::Assignment => Assignment,
        T::AssignmentAdd => AssignmentAdd,
        T::AssignmentSubtract => AssignmentSubtract,
        T::AssignmentMultiply => AssignmentMultiply,
        T::AssignmentDivide => AssignmentDivide,
        T::AssignmentModulo => AssignmentModulo,
        T::AssignmentPower => AssignmentPower,
        T::AssignmentShiftLeft => AssignmentShiftLeft,
        T::AssignmentShiftRight => AssignmentShiftRight,
        T::AssignmentShiftRightUnsigned => AssignmentShiftRightUnsigned,
        T::AssignmentRotateLeft => AssignmentRotateLeft,
        T::AssignmentRotateRight => AssignmentRotateRight,
        T::AssignmentBitwiseAnd => AssignmentBitwiseAnd,
        T::AssignmentBitwiseOr => AssignmentBitwiseOr,
        T::AssignmentBitwiseXor => AssignmentBitwiseXor,
        T::AssignmentLogicalAnd => AssignmentLogicalAnd,
        T::AssignmentLogicalOr => AssignmentLogicalOr,
        T::AssignmentLogicalXor => AssignmentLogicalXor,
        T::AssignmentMinimum => AssignmentMinimum,
        T::AssignmentMaximum => AssignmentMaximum,
        _ => return None,
    })
}

/// Maps an operator token back to the `NodeKind` whose `operator_symbol`
/// spells it, for parsing a class member's overload-declaration name
/// (`function +(a, b) { ... }`, §4.7.4). Plain `=` is deliberately excluded:
/// `Assignment` itself isn't overloadable.
fn overload_operator_kind(token: TokenKind) -> Option<NodeKind> {
    use TokenKind as T;
    if let Some(entry) = binary_table().iter().find(|entry| entry.token == token) {
        return Some(entry.kind);
    }
    if let Some(kind) = assignment_kind(token) {
        if kind != NodeKind::Assignment {
            return Some(kind);
        }
    }
    Some(match token {
        T::BitwiseNot => NodeKind::BitwiseNot,
        T::LogicalNot => NodeKind::LogicalNot,
        T::Increment => NodeKind::Increment,
        T::Decrement => NodeKind::Decrement,
        T::Power => NodeKind::Power,
        _ => return None,
    })
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    tree: &'a mut Tree,
    /// Shared with the scanner; `use` pragmas (§4.6.3) borrow this
    /// mutably for the one statement that parses them, never for longer.
    options: &'a RefCell<OptionSet>,
    sink: &'a dyn DiagnosticSink,
    current: Token,
    /// Nesting depth of `class`/`interface` bodies, so `parse_function` knows
    /// whether an operator token in name position is a legal overload name.
    class_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(mut scanner: Scanner<'a>, tree: &'a mut Tree, options: &'a RefCell<OptionSet>, sink: &'a dyn DiagnosticSink) -> Self {
        scanner.expecting_literal = true;
        let current = scanner.get_next_token();
        Parser {
            scanner,
            tree,
            options,
            sink,
            current,
            class_depth: 0,
        }
    }

    fn position(&self) -> Position {
        self.current.position.clone()
    }

    fn diagnostic(&self, level: Level, code: Code) -> Message<'a> {
        Message::new(level, code, self.position(), self.sink)
    }

    /// Advances to the next token. `expecting_literal` tells the scanner
    /// whether the upcoming `/` should be read as a regex (§4.6.4).
    fn bump(&mut self, expecting_literal: bool) -> Token {
        let previous = self.current.clone();
        self.scanner.expecting_literal = expecting_literal;
        self.current = self.scanner.get_next_token();
        previous
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind, code: Code) -> bool {
        if self.at(kind) {
            self.bump(true);
            true
        } else {
            self.diagnostic(Level::Error, code)
                .append_str("unexpected token")
                .emit();
            self.resynchronize();
            false
        }
    }

    /// Error recovery (§4.6.5): skip forward to the next `;`, a closing
    /// brace, or EOF.
    fn resynchronize(&mut self) {
        loop {
            match self.current.kind {
                TokenKind::Semicolon => {
                    self.bump(true);
                    break;
                }
                TokenKind::RightBrace | TokenKind::Eof => break,
                _ => {
                    self.bump(true);
                }
            }
        }
    }

    fn new_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        self.tree.alloc(kind, position)
    }

    // -- entry point -------------------------------------------------------

    /// `parse()` (§4.6.7): returns the root node, or `None` only on the
    /// programmer-misuse paths the scanner itself fails fast on (this
    /// parser never returns `None` for ordinary syntax errors — those are
    /// reported as diagnostics and recovered from).
    pub fn parse(&mut self) -> Option<NodeId> {
        let root = self.new_node(NodeKind::Root, self.position());
        let program = self.new_node(NodeKind::Program, self.position());
        self.tree.append_child(root, program);

        while !self.at(TokenKind::Eof) {
            if self.consume_pragma() {
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                self.tree.append_child(program, statement);
            }
        }
        Some(root)
    }

    /// `use <name>(<int>);` (§4.6.3): mutates the shared `OptionSet` and
    /// leaves no residual tree node. Returns `true` if a pragma directive
    /// was consumed (whether or not it was well-formed).
    fn consume_pragma(&mut self) -> bool {
        if !self.at(TokenKind::Use) {
            return false;
        }
        self.bump(false);
        let name = match self.current.payload.as_str().map(str::to_string) {
            Some(name) if self.at(TokenKind::Identifier) => name,
            _ => {
                self.diagnostic(Level::Error, Code::BadPragma)
                    .append_str("expected pragma name after 'use'")
                    .emit();
                self.resynchronize();
                return true;
            }
        };
        self.bump(true);
        if !self.expect(TokenKind::LeftParen, Code::ParenthesisExpected) {
            return true;
        }
        let value = if let Payload::Integer(i) = &self.current.payload {
            let value = i.get() as i32;
            self.bump(true);
            Some(value)
        } else {
            None
        };
        if !self.expect(TokenKind::RightParen, Code::ParenthesisExpected) {
            return true;
        }
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);

        match (Option_::from_pragma_name(&name), value) {
            (Some(option), Some(value)) => self.options.borrow_mut().set(option, value),
            (Some(_), None) => {
                self.diagnostic(Level::Error, Code::BadPragma)
                    .append_str("pragma argument must be an integer literal")
                    .emit();
            }
            (None, _) => {
                self.diagnostic(Level::Error, Code::UnknownPragma)
                    .append_str("unknown pragma '")
                    .append_str(&name)
                    .append_str("'")
                    .emit();
            }
        }
        true
    }

    // -- statements ----------------------------------------------------------

    fn parse_statement(&mut self) -> Option<NodeId> {
        match self.current.kind {
            TokenKind::LeftBrace => Some(self.parse_block()),
            TokenKind::Var => Some(self.parse_var_statement()),
            TokenKind::If => Some(self.parse_if()),
            TokenKind::While => Some(self.parse_while()),
            TokenKind::Do => Some(self.parse_do_while()),
            TokenKind::For => Some(self.parse_for()),
            TokenKind::Switch => Some(self.parse_switch()),
            TokenKind::Try => Some(self.parse_try()),
            TokenKind::Throw => Some(self.parse_throw()),
            TokenKind::Break => Some(self.parse_break_continue_goto(NodeKind::Break)),
            TokenKind::Continue => Some(self.parse_break_continue_goto(NodeKind::Continue)),
            TokenKind::Goto => Some(self.parse_break_continue_goto(NodeKind::Goto)),
            TokenKind::Return => Some(self.parse_return()),
            TokenKind::With => Some(self.parse_with()),
            TokenKind::Debugger => Some(self.parse_debugger()),
            TokenKind::Function => Some(self.parse_function()),
            TokenKind::Class => Some(self.parse_class()),
            TokenKind::Interface => Some(self.parse_class()),
            TokenKind::Enum => Some(self.parse_enum()),
            TokenKind::Import => Some(self.parse_import()),
            TokenKind::Package => Some(self.parse_package()),
            TokenKind::Namespace => Some(self.parse_namespace()),
            TokenKind::Semicolon => {
                self.bump(true);
                Some(self.new_node(NodeKind::Empty, self.position()))
            }
            TokenKind::Identifier if self.is_label_ahead() => Some(self.parse_label()),
            TokenKind::Eof => None,
            _ => Some(self.parse_expression_statement()),
        }
    }

    fn is_label_ahead(&self) -> bool {
        // A label is `identifier :` not followed by `:` (which would be
        // `::` scope resolution, already its own token). `self.current` is
        // the identifier; clone the scanner to peek the following token
        // without consuming it for real.
        let next = self.scanner.clone().get_next_token();
        next.kind == TokenKind::Colon
    }

    fn parse_block(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let block = self.new_node(NodeKind::DirectiveList, position);
        while !self.at(TokenKind::RightBrace) && !self.at(TokenKind::Eof) {
            if self.consume_pragma() {
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                self.tree.append_child(block, statement);
            }
        }
        self.expect(TokenKind::RightBrace, Code::CurvlyBracketsExpected);
        block
    }

    /// A statement body that may be a block or a single statement; when
    /// `EXTENDED_STATEMENTS` is set, a bare (unbraced) body is diagnosed
    /// (§6.1: 1 = warn, 2 = silent still requires braces be absent to warn).
    fn parse_body(&mut self) -> NodeId {
        if self.at(TokenKind::LeftBrace) {
            return self.parse_block();
        }
        let level = self.options.borrow().get(Option_::ExtendedStatements);
        if level == 1 {
            self.diagnostic(Level::Warning, Code::CannotCompile)
                .append_str("statement body should be wrapped in braces")
                .emit();
        }
        let position = self.position();
        let wrapper = self.new_node(NodeKind::DirectiveList, position);
        if let Some(statement) = self.parse_statement() {
            self.tree.append_child(wrapper, statement);
        }
        wrapper
    }

    fn parse_var_statement(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let var = self.new_node(NodeKind::Var, position);
        loop {
            let variable = self.parse_variable_declarator();
            self.tree.append_child(var, variable);
            self.tree.get_mut(var).variables.push(variable);
            if self.at(TokenKind::Comma) {
                self.bump(true);
                continue;
            }
            break;
        }
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        var
    }

    fn parse_variable_declarator(&mut self) -> NodeId {
        let position = self.position();
        let variable = self.new_node(NodeKind::Variable, position);
        if let Payload::String(name) = self.current.payload.clone() {
            self.tree.set_string(variable, name);
        }
        self.expect(TokenKind::Identifier, Code::IdentifierExpected);
        if self.at(TokenKind::Colon) {
            self.bump(true);
            self.tree.set_flag(variable, NodeFlags::VARIABLE_ATTRIBUTES, false);
            let type_expr = self.parse_assignment_expression();
            self.tree.set_link(variable, Link::Type, Some(type_expr));
        }
        if self.at(TokenKind::Assignment) {
            self.bump(true);
            let initializer = self.parse_assignment_expression();
            self.tree.append_child(variable, initializer);
        }
        variable
    }

    fn parse_if(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::If, position);
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let condition = self.parse_expression();
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.append_child(node, condition);
        let then_branch = self.parse_body();
        self.tree.append_child(node, then_branch);
        if self.at(TokenKind::Else) {
            self.bump(true);
            let else_branch = self.parse_body();
            self.tree.append_child(node, else_branch);
        }
        node
    }

    fn parse_while(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::While, position);
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let condition = self.parse_expression();
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.append_child(node, condition);
        let body = self.parse_body();
        self.tree.append_child(node, body);
        node
    }

    fn parse_do_while(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Do, position);
        let body = self.parse_body();
        self.tree.append_child(node, body);
        self.expect(TokenKind::While, Code::ExpressionExpected);
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let condition = self.parse_expression();
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.append_child(node, condition);
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        node
    }

    fn parse_for(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let is_each = if self.at(TokenKind::Identifier) && self.current.payload.as_str() == Some("each") {
            self.bump(true);
            true
        } else {
            false
        };
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);

        let init = if self.at(TokenKind::Var) {
            Some(self.parse_var_statement_no_semicolon())
        } else if !self.at(TokenKind::Semicolon) {
            Some(self.parse_expression())
        } else {
            None
        };

        if self.at(TokenKind::In) {
            self.bump(true);
            let collection = self.parse_expression();
            self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
            let kind = if is_each { NodeKind::ForEach } else { NodeKind::ForIn };
            let node = self.new_node(kind, position);
            self.tree.set_flag(node, if is_each { NodeFlags::FOR_FOREACH } else { NodeFlags::FOR_IN }, true);
            if let Some(init) = init {
                self.tree.append_child(node, init);
            }
            self.tree.append_child(node, collection);
            let body = self.parse_body();
            self.tree.append_child(node, body);
            return node;
        }

        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        let condition = if !self.at(TokenKind::Semicolon) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        let update = if !self.at(TokenKind::RightParen) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);

        let node = self.new_node(NodeKind::For, position);
        if let Some(init) = init {
            self.tree.append_child(node, init);
        }
        if let Some(condition) = condition {
            self.tree.append_child(node, condition);
        }
        if let Some(update) = update {
            self.tree.append_child(node, update);
        }
        let body = self.parse_body();
        self.tree.append_child(node, body);
        node
    }

    fn parse_var_statement_no_semicolon(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let var = self.new_node(NodeKind::Var, position);
        let variable = self.parse_variable_declarator();
        self.tree.append_child(var, variable);
        self.tree.get_mut(var).variables.push(variable);
        var
    }

    fn parse_switch(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Switch, position);
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let discriminant = self.parse_expression();
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.append_child(node, discriminant);
        // Default comparison operator unless an explicit `use pragma`
        // or extended-operator form selects one; recorded in the side slot.
        self.tree.get_mut(node).switch_operator = Some(NodeKind::StrictlyEqual);
        self.expect(TokenKind::LeftBrace, Code::CurvlyBracketsExpected);
        let mut saw_default = false;
        while self.at(TokenKind::Case) || self.at(TokenKind::Default) {
            if self.at(TokenKind::Case) {
                let case_position = self.position();
                self.bump(true);
                let test = self.parse_expression();
                self.expect(TokenKind::Colon, Code::ExpressionExpected);
                let case_node = self.new_node(NodeKind::Case, case_position);
                self.tree.append_child(case_node, test);
                while !matches!(
                    self.current.kind,
                    TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
                ) {
                    if let Some(statement) = self.parse_statement() {
                        self.tree.append_child(case_node, statement);
                    }
                }
                self.tree.append_child(node, case_node);
            } else {
                let default_position = self.position();
                self.bump(true);
                self.expect(TokenKind::Colon, Code::ExpressionExpected);
                let default_node = self.new_node(NodeKind::Default, default_position);
                while !matches!(
                    self.current.kind,
                    TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
                ) {
                    if let Some(statement) = self.parse_statement() {
                        self.tree.append_child(default_node, statement);
                    }
                }
                self.tree.append_child(node, default_node);
                saw_default = true;
            }
        }
        self.expect(TokenKind::RightBrace, Code::CurvlyBracketsExpected);
        self.tree.set_flag(node, NodeFlags::SWITCH_DEFAULT, saw_default);
        node
    }

    fn parse_try(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Try, position);
        let body = self.parse_block();
        self.tree.append_child(node, body);
        while self.at(TokenKind::Catch) {
            let catch_position = self.position();
            self.bump(true);
            self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
            let catch_node = self.new_node(NodeKind::Catch, catch_position);
            if let Payload::String(name) = self.current.payload.clone() {
                let param = self.new_node(NodeKind::Param, self.position());
                self.tree.set_string(param, name);
                self.bump(true);
                if self.at(TokenKind::Colon) {
                    self.bump(true);
                    self.tree.set_flag(catch_node, NodeFlags::CATCH_TYPED, true);
                    let type_expr = self.parse_assignment_expression();
                    self.tree.set_link(param, Link::Type, Some(type_expr));
                }
                self.tree.append_child(catch_node, param);
            }
            self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
            let catch_body = self.parse_block();
            self.tree.append_child(catch_node, catch_body);
            self.tree.append_child(node, catch_node);
        }
        if self.at(TokenKind::Finally) {
            self.bump(true);
            let finally_body = self.parse_block();
            let finally_node = self.new_node(NodeKind::Finally, self.position());
            self.tree.append_child(finally_node, finally_body);
            self.tree.append_child(node, finally_node);
        }
        node
    }

    fn parse_throw(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Throw, position);
        let expr = self.parse_expression();
        self.tree.append_child(node, expr);
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        node
    }

    fn parse_break_continue_goto(&mut self, kind: NodeKind) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(kind, position);
        if let Payload::String(label) = self.current.payload.clone() {
            if self.at(TokenKind::Identifier) {
                self.tree.set_string(node, label);
                self.bump(true);
            }
        }
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        node
    }

    fn parse_return(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Return, position);
        if !self.at(TokenKind::Semicolon) {
            let expr = self.parse_expression();
            self.tree.append_child(node, expr);
        }
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        node
    }

    fn parse_with(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        if self.options.borrow().get(Option_::AllowWith) == 0 {
            self.diagnostic(Level::Warning, Code::NotAllowed)
                .append_str("'with' is not allowed (enable ALLOW_WITH)")
                .emit();
        }
        let node = self.new_node(NodeKind::With, position);
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let object = self.parse_expression();
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.append_child(node, object);
        let body = self.parse_body();
        self.tree.append_child(node, body);
        node
    }

    fn parse_debugger(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        self.new_node(NodeKind::Debugger, position)
    }

    fn parse_label(&mut self) -> NodeId {
        let position = self.position();
        let name = self.current.payload.as_str().unwrap_or_default().to_string();
        self.bump(true);
        self.bump(true); // consume ':'
        let node = self.new_node(NodeKind::Label, position);
        self.tree.set_string(node, name);
        node
    }

    fn parse_function(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Function, position);
        if let Payload::String(name) = self.current.payload.clone() {
            if self.at(TokenKind::Identifier) {
                self.tree.set_string(node, name);
                self.bump(true);
            }
        } else if self.class_depth > 0 {
            if let Some(kind) = overload_operator_kind(self.current.kind) {
                let is_prefix = matches!(kind, NodeKind::Increment | NodeKind::Decrement);
                self.tree.set_string(node, kind.operator_symbol(is_prefix).to_string());
                self.bump(true);
            }
        }
        let params = self.parse_param_list();
        self.tree.append_child(node, params);
        if self.at(TokenKind::Colon) {
            self.bump(true);
            let return_type = self.parse_assignment_expression();
            self.tree.set_link(node, Link::Type, Some(return_type));
        }
        if self.at(TokenKind::LeftBrace) {
            let body = self.parse_block();
            self.tree.append_child(node, body);
        } else {
            self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        }
        node
    }

    fn parse_param_list(&mut self) -> NodeId {
        let position = self.position();
        self.expect(TokenKind::LeftParen, Code::ParenthesisExpected);
        let params = self.new_node(NodeKind::Params, position);
        let mut count: u32 = 0;
        while !self.at(TokenKind::RightParen) && !self.at(TokenKind::Eof) {
            let param_position = self.position();
            let param = self.new_node(NodeKind::Param, param_position);
            if self.at(TokenKind::Rest) {
                self.bump(true);
                self.tree.set_flag(param, NodeFlags::PARAM_REST, true);
            }
            if let Payload::String(name) = self.current.payload.clone() {
                self.tree.set_string(param, name);
            }
            self.expect(TokenKind::Identifier, Code::IdentifierExpected);
            if self.at(TokenKind::Colon) {
                self.bump(true);
                let type_expr = self.parse_assignment_expression();
                self.tree.set_link(param, Link::Type, Some(type_expr));
            }
            if self.at(TokenKind::Assignment) {
                self.bump(true);
                let default_value = self.parse_assignment_expression();
                self.tree.append_child(param, default_value);
            }
            self.tree.append_child(params, param);
            count += 1;
            if self.at(TokenKind::Comma) {
                self.bump(true);
                continue;
            }
            break;
        }
        self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
        self.tree.get_mut(params).param_count = Some(count);
        params
    }

    fn parse_class(&mut self) -> NodeId {
        let position = self.position();
        let is_interface = self.at(TokenKind::Interface);
        self.bump(true);
        let node = self.new_node(if is_interface { NodeKind::Interface } else { NodeKind::Class }, position);
        if let Payload::String(name) = self.current.payload.clone() {
            if self.at(TokenKind::Identifier) {
                self.tree.set_string(node, name);
                self.bump(true);
            }
        }
        if self.at(TokenKind::Extends) {
            self.bump(true);
            let base = self.parse_assignment_expression();
            self.tree.append_child(node, base);
        }
        if self.at(TokenKind::Implements) {
            self.bump(true);
            loop {
                let iface = self.parse_assignment_expression();
                self.tree.append_child(node, iface);
                if self.at(TokenKind::Comma) {
                    self.bump(true);
                    continue;
                }
                break;
            }
        }
        self.class_depth += 1;
        let body = self.parse_block();
        self.class_depth -= 1;
        self.tree.append_child(node, body);
        node
    }

    fn parse_enum(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Enum, position);
        if let Payload::String(name) = self.current.payload.clone() {
            if self.at(TokenKind::Identifier) {
                self.tree.set_string(node, name);
                self.bump(true);
            }
        }
        self.expect(TokenKind::LeftBrace, Code::CurvlyBracketsExpected);
        while !self.at(TokenKind::RightBrace) && !self.at(TokenKind::Eof) {
            let member_position = self.position();
            let member = self.new_node(NodeKind::EnumMember, member_position);
            if let Payload::String(name) = self.current.payload.clone() {
                self.tree.set_string(member, name);
            }
            self.expect(TokenKind::Identifier, Code::IdentifierExpected);
            if self.at(TokenKind::Assignment) {
                self.bump(true);
                let value = self.parse_assignment_expression();
                self.tree.append_child(member, value);
            }
            self.tree.append_child(node, member);
            if self.at(TokenKind::Comma) {
                self.bump(true);
                continue;
            }
            break;
        }
        self.expect(TokenKind::RightBrace, Code::CurvlyBracketsExpected);
        node
    }

    fn parse_import(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Import, position);
        let mut path = String::new();
        if let Payload::String(name) = self.current.payload.clone() {
            path.push_str(&name);
        }
        self.expect(TokenKind::Identifier, Code::IdentifierExpected);
        while self.at(TokenKind::Dot) {
            self.bump(true);
            if let Payload::String(name) = self.current.payload.clone() {
                path.push('.');
                path.push_str(&name);
            }
            self.expect(TokenKind::Identifier, Code::IdentifierExpected);
        }
        self.tree.set_string(node, path);
        if self.at(TokenKind::Implements) {
            self.bump(true);
            self.tree.set_flag(node, NodeFlags::IMPORT_IMPLEMENTS, true);
            let _ = self.parse_assignment_expression();
        }
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        node
    }

    fn parse_package(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Package, position);
        if let Payload::String(name) = self.current.payload.clone() {
            self.tree.set_string(node, name);
        }
        if self.at(TokenKind::Identifier) {
            self.bump(true);
        }
        let body = self.parse_block();
        self.tree.append_child(node, body);
        node
    }

    fn parse_namespace(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::Namespace, position);
        if let Payload::String(name) = self.current.payload.clone() {
            self.tree.set_string(node, name);
        }
        self.expect(TokenKind::Identifier, Code::IdentifierExpected);
        let body = self.parse_block();
        self.tree.append_child(node, body);
        node
    }

    fn parse_expression_statement(&mut self) -> NodeId {
        let position = self.position();
        let expr = self.parse_expression();
        self.expect(TokenKind::Semicolon, Code::SemicolonExpected);
        let statement = self.new_node(NodeKind::ExpressionStatement, position);
        self.tree.append_child(statement, expr);
        statement
    }

    // -- expressions ---------------------------------------------------------

    /// Level 1: comma-separated expression list.
    fn parse_expression(&mut self) -> NodeId {
        let first = self.parse_assignment_expression();
        if !self.at(TokenKind::Comma) {
            return first;
        }
        let position = self.tree.get(first).position.clone();
        let comma_node = self.new_node(NodeKind::Comma, position);
        self.tree.append_child(comma_node, first);
        while self.at(TokenKind::Comma) {
            self.bump(true);
            let next = self.parse_assignment_expression();
            self.tree.append_child(comma_node, next);
        }
        comma_node
    }

    /// Level 2: assignment operators, right-associative.
    fn parse_assignment_expression(&mut self) -> NodeId {
        let left = self.parse_conditional_expression();
        if let Some(kind) = assignment_kind(self.current.kind) {
            let position = self.tree.get(left).position.clone();
            self.bump(true);
            let right = self.parse_assignment_expression();
            let node = self.new_node(kind, position);
            self.tree.append_child(node, left);
            self.tree.append_child(node, right);
            return node;
        }
        left
    }

    /// Level 3: `? :`, right-associative.
    fn parse_conditional_expression(&mut self) -> NodeId {
        let condition = self.parse_range_expression();
        if !self.at(TokenKind::Question) {
            return condition;
        }
        let position = self.tree.get(condition).position.clone();
        self.bump(true);
        let consequent = self.parse_assignment_expression();
        self.expect(TokenKind::Colon, Code::ExpressionExpected);
        let alternate = self.parse_assignment_expression();
        let node = self.new_node(NodeKind::Conditional, position);
        self.tree.append_child(node, condition);
        self.tree.append_child(node, consequent);
        self.tree.append_child(node, alternate);
        node
    }

    /// Level 4: `..` range, `...` rest (as a prefix inside argument/array
    /// contexts, folded in here since both share the lowest non-assignment
    /// binding level).
    fn parse_range_expression(&mut self) -> NodeId {
        let left = self.parse_binary_expression(5);
        let extended = self.options.borrow().is_set(Option_::ExtendedOperators);
        if extended && self.at(TokenKind::Range) {
            let position = self.tree.get(left).position.clone();
            self.bump(true);
            let right = self.parse_binary_expression(5);
            let node = self.new_node(NodeKind::Range, position);
            self.tree.append_child(node, left);
            self.tree.append_child(node, right);
            return node;
        }
        left
    }

    /// Levels 5-14: standard left-associative binary precedence climbing.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeId {
        let mut left = self.parse_power_expression();
        loop {
            let extended = self.options.borrow().is_set(Option_::ExtendedOperators);
            let entry = binary_table()
                .iter()
                .find(|e| e.token == self.current.kind && (!e.extended || extended) && e.precedence >= min_precedence);
            let Some(entry) = entry else { break };
            let position = self.tree.get(left).position.clone();
            self.bump(true);
            let next_min = match entry.assoc {
                Assoc::Left => entry.precedence + 1,
                Assoc::Right => entry.precedence,
            };
            let right = self.parse_binary_expression(next_min);
            let node = self.new_node(entry.kind, position);
            self.tree.append_child(node, left);
            self.tree.append_child(node, right);
            left = node;
        }
        left
    }

    /// Level 15: `**`, right-associative.
    fn parse_power_expression(&mut self) -> NodeId {
        let base = self.parse_unary_expression();
        let extended = self.options.borrow().is_set(Option_::ExtendedOperators);
        if extended && self.at(TokenKind::Power) {
            let position = self.tree.get(base).position.clone();
            self.bump(true);
            let exponent = self.parse_power_expression();
            let node = self.new_node(NodeKind::Power, position);
            self.tree.append_child(node, base);
            self.tree.append_child(node, exponent);
            return node;
        }
        base
    }

    /// Level 16: unary prefix operators.
    fn parse_unary_expression(&mut self) -> NodeId {
        let position = self.position();
        let kind = match self.current.kind {
            TokenKind::LogicalNot => Some(NodeKind::LogicalNot),
            TokenKind::BitwiseNot => Some(NodeKind::BitwiseNot),
            TokenKind::Add => Some(NodeKind::UnaryPlus),
            TokenKind::Subtract => Some(NodeKind::UnaryMinus),
            TokenKind::Increment => Some(NodeKind::Increment),
            TokenKind::Decrement => Some(NodeKind::Decrement),
            TokenKind::Typeof => Some(NodeKind::Typeof),
            TokenKind::Delete => Some(NodeKind::Delete),
            TokenKind::Void => Some(NodeKind::Void),
            TokenKind::New => Some(NodeKind::New),
            TokenKind::Yield => Some(NodeKind::Yield),
            _ => None,
        };
        if let Some(kind) = kind {
            self.bump(true);
            let operand = self.parse_unary_expression();
            let node = self.new_node(kind, position);
            self.tree.append_child(node, operand);
            return node;
        }
        self.parse_postfix_expression()
    }

    /// Level 17: postfix `++`/`--`, call, index, member, scope.
    fn parse_postfix_expression(&mut self) -> NodeId {
        let mut expr = self.parse_primary_expression();
        loop {
            match self.current.kind {
                TokenKind::Increment => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(false);
                    let node = self.new_node(NodeKind::PostIncrement, position);
                    self.tree.append_child(node, expr);
                    expr = node;
                }
                TokenKind::Decrement => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(false);
                    let node = self.new_node(NodeKind::PostDecrement, position);
                    self.tree.append_child(node, expr);
                    expr = node;
                }
                TokenKind::Dot => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(true);
                    let member_position = self.position();
                    let member_name = self.current.payload.as_str().unwrap_or_default().to_string();
                    self.expect(TokenKind::Identifier, Code::IdentifierExpected);
                    let member = self.new_node(NodeKind::Member, position);
                    self.tree.append_child(member, expr);
                    let name_node = self.new_node(NodeKind::Identifier, member_position);
                    self.tree.set_string(name_node, member_name);
                    self.tree.append_child(member, name_node);
                    expr = member;
                }
                TokenKind::Scope => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(true);
                    let name_position = self.position();
                    let name = self.current.payload.as_str().unwrap_or_default().to_string();
                    self.expect(TokenKind::Identifier, Code::IdentifierExpected);
                    let node = self.new_node(NodeKind::Scope, position);
                    self.tree.append_child(node, expr);
                    let name_node = self.new_node(NodeKind::Identifier, name_position);
                    self.tree.set_string(name_node, name);
                    self.tree.append_child(node, name_node);
                    expr = node;
                }
                TokenKind::LeftBracket => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(true);
                    let index = self.parse_expression();
                    self.expect(TokenKind::RightBracket, Code::SquareBracketsExpected);
                    let node = self.new_node(NodeKind::Index, position);
                    self.tree.append_child(node, expr);
                    self.tree.append_child(node, index);
                    expr = node;
                }
                TokenKind::LeftParen => {
                    let position = self.tree.get(expr).position.clone();
                    self.bump(true);
                    let call = self.new_node(NodeKind::Call, position);
                    self.tree.append_child(call, expr);
                    let mut argument_count: u32 = 0;
                    while !self.at(TokenKind::RightParen) && !self.at(TokenKind::Eof) {
                        let argument = self.parse_assignment_expression();
                        self.tree.append_child(call, argument);
                        argument_count += 1;
                        if self.at(TokenKind::Comma) {
                            self.bump(true);
                            continue;
                        }
                        break;
                    }
                    self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
                    self.tree.get_mut(call).param_count = Some(argument_count);
                    expr = call;
                }
                _ => break,
            }
        }
        expr
    }

    /// Level 18: primaries.
    fn parse_primary_expression(&mut self) -> NodeId {
        let position = self.position();
        match self.current.kind {
            TokenKind::Identifier => {
                let name = self.current.payload.as_str().unwrap_or_default().to_string();
                self.bump(false);
                let node = self.new_node(NodeKind::Identifier, position);
                self.tree.set_string(node, name);
                node
            }
            TokenKind::Integer => {
                let value = self.current.payload.as_integer().copied().unwrap_or_default();
                self.bump(false);
                let node = self.new_node(NodeKind::Integer, position);
                self.tree.set_integer(node, value);
                node
            }
            TokenKind::FloatingPoint => {
                let value = self.current.payload.as_float().copied().unwrap_or_default();
                self.bump(false);
                let node = self.new_node(NodeKind::FloatingPoint, position);
                self.tree.set_float(node, value);
                node
            }
            TokenKind::String => {
                let value = self.current.payload.as_str().unwrap_or_default().to_string();
                self.bump(false);
                let node = self.new_node(NodeKind::String, position);
                self.tree.set_string(node, value);
                node
            }
            TokenKind::RegularExpression => {
                let value = self.current.payload.as_str().unwrap_or_default().to_string();
                self.bump(false);
                let node = self.new_node(NodeKind::RegularExpression, position);
                self.tree.set_string(node, value);
                node
            }
            TokenKind::This => {
                self.bump(false);
                self.new_node(NodeKind::This, position)
            }
            TokenKind::Super => {
                self.bump(false);
                self.new_node(NodeKind::Super, position)
            }
            TokenKind::Null => {
                self.bump(false);
                self.new_node(NodeKind::Null, position)
            }
            TokenKind::Undefined => {
                self.bump(false);
                self.new_node(NodeKind::Undefined, position)
            }
            TokenKind::True => {
                self.bump(false);
                self.new_node(NodeKind::True, position)
            }
            TokenKind::False => {
                self.bump(false);
                self.new_node(NodeKind::False, position)
            }
            TokenKind::LeftParen => {
                self.bump(true);
                let inner = self.parse_expression();
                self.expect(TokenKind::RightParen, Code::ParenthesisExpected);
                inner
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            _ => {
                self.diagnostic(Level::Error, Code::ExpressionExpected)
                    .append_str("expected an expression")
                    .emit();
                self.bump(true);
                self.new_node(NodeKind::Undefined, position)
            }
        }
    }

    fn parse_array_literal(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::ArrayLiteral, position);
        while !self.at(TokenKind::RightBracket) && !self.at(TokenKind::Eof) {
            let element = self.parse_assignment_expression();
            self.tree.append_child(node, element);
            if self.at(TokenKind::Comma) {
                self.bump(true);
                continue;
            }
            break;
        }
        self.expect(TokenKind::RightBracket, Code::SquareBracketsExpected);
        node
    }

    fn parse_object_literal(&mut self) -> NodeId {
        let position = self.position();
        self.bump(true);
        let node = self.new_node(NodeKind::ObjectLiteral, position);
        while !self.at(TokenKind::RightBrace) && !self.at(TokenKind::Eof) {
            let property_position = self.position();
            let key = self.current.payload.as_str().unwrap_or_default().to_string();
            self.bump(true);
            self.expect(TokenKind::Colon, Code::ExpressionExpected);
            let value = self.parse_assignment_expression();
            let property = self.new_node(NodeKind::ObjectProperty, property_position);
            self.tree.set_string(property, key);
            self.tree.append_child(property, value);
            self.tree.append_child(node, property);
            if self.at(TokenKind::Comma) {
                self.bump(true);
                continue;
            }
            break;
        }
        self.expect(TokenKind::RightBrace, Code::CurvlyBracketsExpected);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::global;

    fn parse_source(source: &str) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let options = RefCell::new(OptionSet::new());
        let sink = global();
        let source_owned = source.to_string();
        let leaked: &'static str = Box::leak(source_owned.into_boxed_str());
        let scanner = Scanner::new("test.as", leaked, &options, sink);
        let mut parser = Parser::new(scanner, &mut tree, &options, sink);
        let root = parser.parse().expect("parse should succeed");
        (tree, root)
    }

    #[test]
    fn parses_var_declaration_with_initializer() {
        let (tree, root) = parse_source("var x = 1 + 2;");
        let program = tree.get(root).children[0];
        let var = tree.get(program).children[0];
        assert_eq!(tree.get(var).kind, NodeKind::Var);
        let variable = tree.get(var).children[0];
        assert_eq!(tree.get(variable).payload.as_str(), Some("x"));
        let initializer = tree.get(variable).children[0];
        assert_eq!(tree.get(initializer).kind, NodeKind::Add);
    }

    #[test]
    fn respects_additive_before_multiplicative_precedence() {
        let (tree, root) = parse_source("var x = 1 + 2 * 3;");
        let program = tree.get(root).children[0];
        let var = tree.get(program).children[0];
        let variable = tree.get(var).children[0];
        let add = tree.get(variable).children[0];
        assert_eq!(tree.get(add).kind, NodeKind::Add);
        let rhs = tree.get(add).children[1];
        assert_eq!(tree.get(rhs).kind, NodeKind::Multiply);
    }

    #[test]
    fn pragma_mutates_option_set_and_leaves_no_node() {
        let (tree, root) = parse_source("use binary(1); var x = 0b101;");
        let program = tree.get(root).children[0];
        assert_eq!(tree.get(program).children.len(), 1);
        let var = tree.get(program).children[0];
        let variable = tree.get(var).children[0];
        let initializer = tree.get(variable).children[0];
        assert_eq!(tree.get(initializer).payload.as_integer().unwrap().get(), 5);
    }

    #[test]
    fn if_else_parses_both_branches() {
        let (tree, root) = parse_source("if (x) { y; } else { z; }");
        let program = tree.get(root).children[0];
        let if_node = tree.get(program).children[0];
        assert_eq!(tree.get(if_node).kind, NodeKind::If);
        assert_eq!(tree.get(if_node).children.len(), 3);
    }
}
