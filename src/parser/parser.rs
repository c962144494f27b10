//! Parser implementation for MiniJava
//!
//! A recursive descent parser over the token stream. The descent structure
//! resolves the dangling-else ambiguity (an `else` binds to the innermost
//! open `if`) and rejects multidimensional array allocation syntactically:
//! an index suffix may not follow a fresh `new int[..]`.

use super::error::ParseError;
use super::lexer::{Lexer, LexicalToken, Token};
use crate::ast::*;
use crate::common::error::{Error, Result};

/// Parser for MiniJava
pub struct Parser {
    tokens: Vec<LexicalToken>,
    current: usize,
    next_node: u32,
}

impl Parser {
    /// Create a new parser from source code
    pub fn new(source: &str) -> Result<Self> {
        let tokens = Lexer::new(source).tokenize().map_err(Error::Lexical)?;

        Ok(Self {
            tokens,
            current: 0,
            next_node: 0,
        })
    }

    /// Parse the source code into a program
    ///
    /// The first parse error halts parsing.
    pub fn parse(mut self) -> Result<Program> {
        let start = self.current_location();
        let main_class = self.parse_main_class()?;

        let mut classes = Vec::new();
        while !self.is_at_end() {
            classes.push(self.parse_class_decl()?);
        }
        log::debug!(
            "parse: main class '{}' plus {} classes, {} expression nodes",
            main_class.name.name,
            classes.len(),
            self.next_node
        );

        let span = Span::new(start, self.previous_location());
        Ok(Program {
            main_class,
            classes,
            node_count: self.next_node as usize,
            span,
        })
    }

    // Helper methods

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&LexicalToken> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    fn peek_next_kind(&self) -> Option<Token> {
        self.tokens.get(self.current + 1).map(|t| t.token)
    }

    fn check(&self, token_type: &Token) -> bool {
        self.peek_kind().as_ref() == Some(token_type)
    }

    fn advance(&mut self) -> LexicalToken {
        let token = self.tokens[self.current].clone();
        self.current += 1;
        token
    }

    fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_location(&self) -> Location {
        match self.peek() {
            Some(token) => token.location(),
            None => self.previous_location(),
        }
    }

    fn previous_location(&self) -> Location {
        if self.current == 0 {
            Location::start()
        } else {
            self.tokens[self.current - 1].location()
        }
    }

    fn consume(&mut self, token_type: &Token) -> Result<LexicalToken> {
        if self.check(token_type) {
            return Ok(self.advance());
        }
        match self.peek() {
            Some(current) => Err(ParseError::unexpected_token(
                &format!("{:?}", token_type),
                &format!("{:?}", current.token_type()),
                current.location(),
            )
            .into()),
            None => Err(ParseError::unexpected_end_of_input(
                &format!("{:?}", token_type),
                self.previous_location(),
            )
            .into()),
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;
        id
    }

    fn parse_identifier(&mut self) -> Result<Identifier> {
        let token = self.consume(&Token::Identifier)?;
        Ok(Identifier {
            name: token.lexeme().to_string(),
            location: token.location(),
        })
    }

    // Declarations

    fn parse_main_class(&mut self) -> Result<MainClassDecl> {
        let start = self.current_location();
        self.consume(&Token::Class)?;
        let name = self.parse_identifier()?;
        self.consume(&Token::LBrace)?;

        self.consume(&Token::Public)?;
        self.consume(&Token::Static)?;
        self.consume(&Token::Void)?;
        let method_name = self.parse_identifier()?;
        self.consume(&Token::LParen)?;
        self.consume(&Token::String)?;
        self.consume(&Token::LBracket)?;
        self.consume(&Token::RBracket)?;
        let arg_name = self.parse_identifier()?;
        self.consume(&Token::RParen)?;

        self.consume(&Token::LBrace)?;
        let locals = self.parse_var_decls()?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unexpected_end_of_input(
                    "statement or '}'",
                    self.previous_location(),
                )
                .into());
            }
            statements.push(self.parse_statement()?);
        }
        self.consume(&Token::RBrace)?;
        self.consume(&Token::RBrace)?;

        let span = Span::new(start, self.previous_location());
        Ok(MainClassDecl {
            name,
            method_name,
            arg_name,
            locals,
            statements,
            span,
        })
    }

    fn parse_class_decl(&mut self) -> Result<ClassDecl> {
        let start = self.current_location();
        self.consume(&Token::Class)?;
        let name = self.parse_identifier()?;
        self.consume(&Token::LBrace)?;

        // All fields precede all methods; a field after a method is a
        // parse error.
        let mut fields = Vec::new();
        while !self.check(&Token::Public) && !self.check(&Token::RBrace) {
            fields.push(self.parse_field_decl()?);
        }

        let mut methods = Vec::new();
        while self.check(&Token::Public) {
            methods.push(self.parse_method_decl()?);
        }
        self.consume(&Token::RBrace)?;

        let span = Span::new(start, self.previous_location());
        Ok(ClassDecl {
            name,
            fields,
            methods,
            span,
        })
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl> {
        let start = self.current_location();
        let type_ref = self.parse_type()?;
        let name = self.parse_identifier()?;
        self.consume(&Token::Semicolon)?;
        let span = Span::new(start, self.previous_location());
        Ok(FieldDecl { type_ref, name, span })
    }

    fn parse_method_decl(&mut self) -> Result<MethodDecl> {
        let start = self.current_location();
        self.consume(&Token::Public)?;
        let return_type = self.parse_type()?;
        let name = self.parse_identifier()?;

        self.consume(&Token::LParen)?;
        let mut formals = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                formals.push(self.parse_formal()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RParen)?;

        self.consume(&Token::LBrace)?;
        let locals = self.parse_var_decls()?;
        let mut statements = Vec::new();
        while !self.check(&Token::Return) {
            if self.is_at_end() {
                return Err(ParseError::unexpected_end_of_input(
                    "statement or 'return'",
                    self.previous_location(),
                )
                .into());
            }
            statements.push(self.parse_statement()?);
        }
        self.consume(&Token::Return)?;
        let return_expr = self.parse_expression()?;
        self.consume(&Token::Semicolon)?;
        self.consume(&Token::RBrace)?;

        let span = Span::new(start, self.previous_location());
        Ok(MethodDecl {
            return_type,
            name,
            formals,
            locals,
            statements,
            return_expr,
            span,
        })
    }

    fn parse_formal(&mut self) -> Result<Formal> {
        let start = self.current_location();
        let type_ref = self.parse_type()?;
        let name = self.parse_identifier()?;
        let span = Span::new(start, self.previous_location());
        Ok(Formal { type_ref, name, span })
    }

    /// Whether the cursor sits on a variable declaration
    ///
    /// `int`/`boolean` can only start a declaration; an identifier starts one
    /// exactly when another identifier follows (a class-typed declaration).
    fn at_var_decl(&self) -> bool {
        match self.peek_kind() {
            Some(Token::Int) | Some(Token::Boolean) => true,
            Some(Token::Identifier) => matches!(self.peek_next_kind(), Some(Token::Identifier)),
            _ => false,
        }
    }

    fn parse_var_decls(&mut self) -> Result<Vec<VarDecl>> {
        let mut decls = Vec::new();
        while self.at_var_decl() {
            decls.push(self.parse_var_decl()?);
        }
        Ok(decls)
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl> {
        let start = self.current_location();
        let type_ref = self.parse_type()?;
        let name = self.parse_identifier()?;
        self.consume(&Token::Semicolon)?;
        let span = Span::new(start, self.previous_location());
        Ok(VarDecl { type_ref, name, span })
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        let start = self.current_location();
        let kind = if self.match_token(&Token::Int) {
            if self.match_token(&Token::LBracket) {
                self.consume(&Token::RBracket)?;
                TypeKind::IntArray
            } else {
                TypeKind::Int
            }
        } else if self.match_token(&Token::Boolean) {
            TypeKind::Boolean
        } else {
            let id = self.parse_identifier()?;
            TypeKind::Class(id.name)
        };
        let span = Span::new(start, self.previous_location());
        Ok(TypeRef { kind, span })
    }

    // Statements

    fn parse_statement(&mut self) -> Result<Stmt> {
        match self.peek_kind() {
            Some(Token::LBrace) => self.parse_block_stmt(),
            Some(Token::If) => self.parse_if_stmt(),
            Some(Token::While) => self.parse_while_stmt(),
            Some(Token::Println) => self.parse_println_stmt(),
            Some(Token::Identifier) => self.parse_assign_stmt(),
            Some(other) => Err(ParseError::unexpected_token(
                "statement",
                &format!("{:?}", other),
                self.current_location(),
            )
            .into()),
            None => Err(ParseError::unexpected_end_of_input(
                "statement",
                self.previous_location(),
            )
            .into()),
        }
    }

    fn parse_block_stmt(&mut self) -> Result<Stmt> {
        let start = self.consume(&Token::LBrace)?.location();
        let locals = self.parse_var_decls()?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unexpected_end_of_input(
                    "statement or '}'",
                    self.previous_location(),
                )
                .into());
            }
            statements.push(self.parse_statement()?);
        }
        let end = self.consume(&Token::RBrace)?.location();
        Ok(Stmt::Block(BlockStmt {
            locals,
            statements,
            span: Span::new(start, end),
        }))
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt> {
        let start = self.consume(&Token::If)?.location();
        self.consume(&Token::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(&Token::RParen)?;
        let then_branch = Box::new(self.parse_statement()?);
        // An `else` binds to the innermost unmatched `if`.
        let else_branch = if self.match_token(&Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        let span = Span::new(start, self.previous_location());
        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span,
        }))
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt> {
        let start = self.consume(&Token::While)?.location();
        self.consume(&Token::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(&Token::RParen)?;
        let body = Box::new(self.parse_statement()?);
        let span = Span::new(start, self.previous_location());
        Ok(Stmt::While(WhileStmt { condition, body, span }))
    }

    fn parse_println_stmt(&mut self) -> Result<Stmt> {
        let start = self.consume(&Token::Println)?.location();
        self.consume(&Token::LParen)?;
        let value = self.parse_expression()?;
        self.consume(&Token::RParen)?;
        self.consume(&Token::Semicolon)?;
        let span = Span::new(start, self.previous_location());
        Ok(Stmt::Println(PrintlnStmt { value, span }))
    }

    fn parse_assign_stmt(&mut self) -> Result<Stmt> {
        let name = self.parse_identifier()?;
        if self.check(&Token::LBracket) {
            self.advance();
            let index = self.parse_expression()?;
            self.consume(&Token::RBracket)?;
            let assign_location = self.consume(&Token::Assign)?.location();
            let value = self.parse_expression()?;
            self.consume(&Token::Semicolon)?;
            let span = Span::new(name.location, self.previous_location());
            Ok(Stmt::ArrayAssign(ArrayAssignStmt {
                name,
                index,
                value,
                assign_location,
                span,
            }))
        } else {
            let assign_location = self.consume(&Token::Assign)?.location();
            let value = self.parse_expression()?;
            self.consume(&Token::Semicolon)?;
            let span = Span::new(name.location, self.previous_location());
            Ok(Stmt::Assign(AssignStmt {
                name,
                value,
                assign_location,
                span,
            }))
        }
    }

    // Expressions, lowest precedence first

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or_expr()
    }

    fn make_binary(&mut self, operator: BinaryOp, left: Expr, right: Expr, op_location: Location) -> Expr {
        let span = Span::new(left.span().start, right.span().end);
        Expr::Binary(BinaryExpr {
            id: self.next_id(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
            op_location,
            span,
        })
    }

    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_and_expr()?;
        while self.check(&Token::OrOr) {
            let op_location = self.advance().location();
            let right = self.parse_and_expr()?;
            expr = self.make_binary(BinaryOp::Or, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_equality_expr()?;
        while self.check(&Token::AndAnd) {
            let op_location = self.advance().location();
            let right = self.parse_equality_expr()?;
            expr = self.make_binary(BinaryOp::And, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_relational_expr()?;
        loop {
            let operator = match self.peek_kind() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                _ => break,
            };
            let op_location = self.advance().location();
            let right = self.parse_relational_expr()?;
            expr = self.make_binary(operator, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_relational_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_additive_expr()?;
        loop {
            let operator = match self.peek_kind() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            let op_location = self.advance().location();
            let right = self.parse_additive_expr()?;
            expr = self.make_binary(operator, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_additive_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_multiplicative_expr()?;
        loop {
            let operator = match self.peek_kind() {
                Some(Token::Plus) => BinaryOp::Plus,
                Some(Token::Minus) => BinaryOp::Minus,
                _ => break,
            };
            let op_location = self.advance().location();
            let right = self.parse_multiplicative_expr()?;
            expr = self.make_binary(operator, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary_expr()?;
        while self.check(&Token::Star) {
            let op_location = self.advance().location();
            let right = self.parse_unary_expr()?;
            expr = self.make_binary(BinaryOp::Times, expr, right, op_location);
        }
        Ok(expr)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        if self.check(&Token::Bang) {
            let start = self.advance().location();
            let operand = self.parse_unary_expr()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::Not(NotExpr {
                id: self.next_id(),
                operand: Box::new(operand),
                span,
            }));
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.check(&Token::Dot) {
                self.advance();
                if self.check(&Token::Length) {
                    let length_location = self.advance().location();
                    let span = Span::new(expr.span().start, length_location);
                    expr = Expr::ArrayLength(ArrayLengthExpr {
                        id: self.next_id(),
                        array: Box::new(expr),
                        length_location,
                        span,
                    });
                } else {
                    let name = self.parse_identifier()?;
                    self.consume(&Token::LParen)?;
                    let mut arguments = Vec::new();
                    if !self.check(&Token::RParen) {
                        loop {
                            arguments.push(self.parse_expression()?);
                            if !self.match_token(&Token::Comma) {
                                break;
                            }
                        }
                    }
                    let end = self.consume(&Token::RParen)?.location();
                    let span = Span::new(expr.span().start, end);
                    expr = Expr::MethodCall(MethodCallExpr {
                        id: self.next_id(),
                        receiver: Box::new(expr),
                        name,
                        arguments,
                        span,
                    });
                }
            } else if self.check(&Token::LBracket) {
                // No multidimensional arrays: indexing a fresh allocation
                // has no semantic interpretation and is a grammar error.
                if matches!(expr, Expr::NewIntArray(_)) {
                    return Err(ParseError::invalid_syntax(
                        "array access on newly allocated array",
                        self.current_location(),
                    )
                    .into());
                }
                let bracket_location = self.advance().location();
                let index = self.parse_expression()?;
                let end = self.consume(&Token::RBracket)?.location();
                let span = Span::new(expr.span().start, end);
                expr = Expr::ArrayAccess(ArrayAccessExpr {
                    id: self.next_id(),
                    array: Box::new(expr),
                    index: Box::new(index),
                    bracket_location,
                    span,
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            Some(Token::Integer) => {
                let token = self.advance();
                Ok(Expr::IntegerLit(IntegerLitExpr {
                    id: self.next_id(),
                    text: token.lexeme().to_string(),
                    span: Span::single(token.location()),
                }))
            }
            Some(Token::True) => {
                let token = self.advance();
                Ok(Expr::BooleanLit(BooleanLitExpr {
                    id: self.next_id(),
                    value: true,
                    span: Span::single(token.location()),
                }))
            }
            Some(Token::False) => {
                let token = self.advance();
                Ok(Expr::BooleanLit(BooleanLitExpr {
                    id: self.next_id(),
                    value: false,
                    span: Span::single(token.location()),
                }))
            }
            Some(Token::This) => {
                let token = self.advance();
                Ok(Expr::This(ThisExpr {
                    id: self.next_id(),
                    span: Span::single(token.location()),
                }))
            }
            Some(Token::Identifier) => {
                let token = self.advance();
                Ok(Expr::Identifier(IdentifierExpr {
                    id: self.next_id(),
                    name: token.lexeme().to_string(),
                    span: Span::single(token.location()),
                }))
            }
            Some(Token::New) => {
                let start = self.advance().location();
                if self.match_token(&Token::Int) {
                    self.consume(&Token::LBracket)?;
                    let size = self.parse_expression()?;
                    let end = self.consume(&Token::RBracket)?.location();
                    Ok(Expr::NewIntArray(NewIntArrayExpr {
                        id: self.next_id(),
                        size: Box::new(size),
                        span: Span::new(start, end),
                    }))
                } else {
                    let class_name = self.parse_identifier()?;
                    self.consume(&Token::LParen)?;
                    let end = self.consume(&Token::RParen)?.location();
                    Ok(Expr::NewInstance(NewInstanceExpr {
                        id: self.next_id(),
                        class_name,
                        span: Span::new(start, end),
                    }))
                }
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(&Token::RParen)?;
                Ok(expr)
            }
            Some(other) => Err(ParseError::unexpected_token(
                "expression",
                &format!("{:?}", other),
                self.current_location(),
            )
            .into()),
            None => Err(ParseError::unexpected_end_of_input(
                "expression",
                self.previous_location(),
            )
            .into()),
        }
    }
}
