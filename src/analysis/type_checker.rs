//! Type checker
//!
//! Takes an abstract syntax tree and a symbol table and performs
//! type-checking of the program. Errors are collected during the checking;
//! if any exist afterwards the compiler should abort and not proceed with
//! later stages.
//!
//! Expressions are typed bottom-up; statements impose their context top-down.
//! An operand whose type is `Undefined` satisfies every rule, so one faulty
//! subexpression produces one diagnostic instead of a cascade.

use crate::ast::*;
use crate::common::error::{Diagnostic, ErrorKind};
use crate::symbol::SymbolTable;
use crate::types::Type;

/// Node→type association for expression nodes
///
/// Backed by a dense vector indexed by `NodeId`; every slot starts out
/// `Undefined` and is written exactly once per checker run. A well-typed
/// program has no `Undefined` left anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    types: Vec<Type>,
}

impl TypeMap {
    fn new(node_count: usize) -> Self {
        Self {
            types: vec![Type::Undefined; node_count],
        }
    }

    pub fn get(&self, id: NodeId) -> &Type {
        &self.types[id.index()]
    }

    fn set(&mut self, id: NodeId, ty: Type) {
        self.types[id.index()] = ty;
    }

    /// Whether every expression node has a defined type
    pub fn is_fully_typed(&self) -> bool {
        self.types.iter().all(|ty| !ty.is_undefined())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Result of a variable lookup
enum Lookup {
    Variable(Type),
    Class,
    NotFound,
}

/// Type checker
pub struct TypeChecker {
    types: TypeMap,
    errors: Vec<Diagnostic>,
    current_class: String,
    current_method: String,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            types: TypeMap::new(0),
            errors: Vec::new(),
            current_class: String::new(),
            current_method: String::new(),
        }
    }

    /// Perform type-checking on the given tree using the given symbol table
    ///
    /// Returns true if checking completed without errors. Checking the same
    /// tree twice yields identical types and errors.
    pub fn check(&mut self, program: &Program, symbols: &mut SymbolTable) -> bool {
        self.types = TypeMap::new(program.node_count);
        self.errors.clear();

        self.check_main_class(&program.main_class, symbols);
        for class in &program.classes {
            self.check_class(class, symbols);
        }

        self.errors
            .sort_by_key(|d| (d.location.line, d.location.column));
        log::debug!(
            "type check: {} expression nodes, {} errors",
            self.types.len(),
            self.errors.len()
        );
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    pub fn into_parts(self) -> (TypeMap, Vec<Diagnostic>) {
        (self.types, self.errors)
    }

    fn error(&mut self, kind: ErrorKind, location: Location) {
        self.errors.push(Diagnostic::new(kind, location));
    }

    // Declarations

    fn check_main_class(&mut self, main: &MainClassDecl, symbols: &mut SymbolTable) {
        self.current_class = main.name.name.clone();
        self.current_method = main.method_name.name.clone();
        if !self.enter_method(symbols) {
            return;
        }
        for stmt in &main.statements {
            self.check_stmt(stmt, symbols);
        }
        self.leave_method(symbols);
    }

    fn check_class(&mut self, class: &ClassDecl, symbols: &mut SymbolTable) {
        // Only the surviving declaration of a duplicated class is checked.
        let surviving = symbols
            .class_info(&class.name.name)
            .map(|info| info.declared_at() == class.name.location)
            .unwrap_or(false);
        if !surviving {
            return;
        }
        self.current_class = class.name.name.clone();

        for method in &class.methods {
            let Some(info) = symbols
                .class_info(&class.name.name)
                .and_then(|c| c.method(&method.name.name))
            else {
                continue;
            };
            if info.declared_at() != method.name.location {
                continue;
            }
            let return_type = info.return_type().clone();

            self.current_method = method.name.name.clone();
            self.enter_method(symbols);
            for stmt in &method.statements {
                self.check_stmt(stmt, symbols);
            }
            let actual = self.check_expr(&method.return_expr, symbols);
            if !actual.is_assignable_to(&return_type) {
                self.error(
                    ErrorKind::WrongReturnType {
                        method_name: method.name.name.clone(),
                        expected: return_type,
                    },
                    method.name.location,
                );
            }
            self.leave_method(symbols);
        }
    }

    // Block-scope bookkeeping on the current method

    fn enter_method(&mut self, symbols: &mut SymbolTable) -> bool {
        match symbols
            .class_info_mut(&self.current_class)
            .and_then(|c| c.method_mut(&self.current_method))
        {
            Some(method) => {
                method.enter_method();
                true
            }
            None => false,
        }
    }

    fn leave_method(&mut self, symbols: &mut SymbolTable) {
        if let Some(method) = symbols
            .class_info_mut(&self.current_class)
            .and_then(|c| c.method_mut(&self.current_method))
        {
            method.leave_method();
        }
    }

    fn enter_block(&mut self, symbols: &mut SymbolTable) {
        if let Some(method) = symbols
            .class_info_mut(&self.current_class)
            .and_then(|c| c.method_mut(&self.current_method))
        {
            method.enter_block();
        }
    }

    fn leave_block(&mut self, symbols: &mut SymbolTable) {
        if let Some(method) = symbols
            .class_info_mut(&self.current_class)
            .and_then(|c| c.method_mut(&self.current_method))
        {
            method.leave_block();
        }
    }

    /// Look up a name: innermost visible local, then parameter, then field,
    /// then class name.
    fn lookup_variable(&self, name: &str, symbols: &SymbolTable) -> Lookup {
        if let Some(class) = symbols.class_info(&self.current_class) {
            if let Some(method) = class.method(&self.current_method) {
                if let Some(local) = method.local(name) {
                    return Lookup::Variable(local.ty().clone());
                }
                if let Some(parameter) = method.parameter(name) {
                    return Lookup::Variable(parameter.ty().clone());
                }
            }
            if let Some(field) = class.field(name) {
                return Lookup::Variable(field.ty().clone());
            }
        }
        if symbols.class_info(name).is_some() {
            return Lookup::Class;
        }
        Lookup::NotFound
    }

    // Statements

    fn check_stmt(&mut self, stmt: &Stmt, symbols: &mut SymbolTable) {
        match stmt {
            Stmt::Block(block) => {
                self.enter_block(symbols);
                for stmt in &block.statements {
                    self.check_stmt(stmt, symbols);
                }
                self.leave_block(symbols);
            }
            Stmt::If(if_stmt) => {
                let condition = self.check_expr(&if_stmt.condition, symbols);
                if !(condition.is_boolean() || condition.is_undefined()) {
                    self.error(ErrorKind::WrongIfConditionType, if_stmt.span.start);
                }
                self.check_stmt(&if_stmt.then_branch, symbols);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_stmt(else_branch, symbols);
                }
            }
            Stmt::While(while_stmt) => {
                let condition = self.check_expr(&while_stmt.condition, symbols);
                if !(condition.is_boolean() || condition.is_undefined()) {
                    self.error(ErrorKind::WrongWhileConditionType, while_stmt.span.start);
                }
                self.check_stmt(&while_stmt.body, symbols);
            }
            Stmt::Println(println_stmt) => {
                let value = self.check_expr(&println_stmt.value, symbols);
                if !(value.is_int() || value.is_undefined()) {
                    self.error(ErrorKind::UnprintableType(value), println_stmt.span.start);
                }
            }
            Stmt::Assign(assign) => self.check_assign(assign, symbols),
            Stmt::ArrayAssign(assign) => self.check_array_assign(assign, symbols),
        }
    }

    fn check_assign(&mut self, assign: &AssignStmt, symbols: &mut SymbolTable) {
        let value = self.check_expr(&assign.value, symbols);

        match self.lookup_variable(&assign.name.name, symbols) {
            Lookup::Variable(target) => {
                if !value.is_assignable_to(&target) {
                    self.error(
                        ErrorKind::InvalidAssignment {
                            found: value,
                            expected: target,
                        },
                        assign.assign_location,
                    );
                }
            }
            Lookup::Class => self.error(
                ErrorKind::ExpectedVariableGotClass(assign.name.name.clone()),
                assign.assign_location,
            ),
            Lookup::NotFound => self.error(
                ErrorKind::UndeclaredIdentifier(assign.name.name.clone()),
                assign.assign_location,
            ),
        }
    }

    fn check_array_assign(&mut self, assign: &ArrayAssignStmt, symbols: &mut SymbolTable) {
        let index = self.check_expr(&assign.index, symbols);
        let value = self.check_expr(&assign.value, symbols);

        if !(index.is_int() || index.is_undefined()) {
            self.error(ErrorKind::WrongIndexType(index), assign.assign_location);
        }

        match self.lookup_variable(&assign.name.name, symbols) {
            Lookup::Variable(target) => {
                if target.is_int_array() {
                    if !(value.is_int() || value.is_undefined()) {
                        self.error(
                            ErrorKind::InvalidAssignment {
                                found: value,
                                expected: Type::Int,
                            },
                            assign.assign_location,
                        );
                    }
                } else if !target.is_undefined() {
                    self.error(ErrorKind::NotArrayType(target), assign.assign_location);
                }
            }
            Lookup::Class => self.error(
                ErrorKind::ExpectedVariableGotClass(assign.name.name.clone()),
                assign.assign_location,
            ),
            Lookup::NotFound => self.error(
                ErrorKind::UndeclaredIdentifier(assign.name.name.clone()),
                assign.assign_location,
            ),
        }
    }

    // Expressions

    /// Type an expression, recording the result in the node→type table
    fn check_expr(&mut self, expr: &Expr, symbols: &mut SymbolTable) -> Type {
        let ty = match expr {
            Expr::Binary(binary) => self.check_binary(binary, symbols),
            Expr::Not(not) => {
                let operand = self.check_expr(&not.operand, symbols);
                if !(operand.is_boolean() || operand.is_undefined()) {
                    self.error(ErrorKind::NegationExpectedBoolean(operand), not.span.start);
                }
                Type::Boolean
            }
            Expr::MethodCall(call) => self.check_method_call(call, symbols),
            Expr::ArrayAccess(access) => {
                let array = self.check_expr(&access.array, symbols);
                let index = self.check_expr(&access.index, symbols);
                if !(index.is_int() || index.is_undefined()) {
                    self.error(ErrorKind::WrongIndexType(index), access.bracket_location);
                }
                if !(array.is_int_array() || array.is_undefined()) {
                    self.error(ErrorKind::NotArrayType(array), access.bracket_location);
                }
                // Guess int even on error, to bound cascades.
                Type::Int
            }
            Expr::ArrayLength(length) => {
                let array = self.check_expr(&length.array, symbols);
                if !(array.is_array() || array.is_undefined()) {
                    self.error(ErrorKind::LengthOnNonArrayType(array), length.length_location);
                }
                Type::Int
            }
            Expr::NewInstance(new) => match symbols.class_info(&new.class_name.name) {
                Some(class) => class.class_type(),
                None => {
                    self.error(
                        ErrorKind::UndeclaredClass(new.class_name.name.clone()),
                        new.class_name.location,
                    );
                    Type::Undefined
                }
            },
            Expr::NewIntArray(new) => {
                let size = self.check_expr(&new.size, symbols);
                if !(size.is_int() || size.is_undefined()) {
                    self.error(ErrorKind::WrongSizeType(size), new.span.start);
                }
                Type::IntArray
            }
            Expr::IntegerLit(literal) => {
                if literal.text.parse::<i32>().is_err() {
                    self.error(
                        ErrorKind::InvalidIntLiteral(literal.text.clone()),
                        literal.span.start,
                    );
                }
                Type::Int
            }
            Expr::BooleanLit(_) => Type::Boolean,
            Expr::Identifier(identifier) => {
                match self.lookup_variable(&identifier.name, symbols) {
                    Lookup::Variable(ty) => ty,
                    Lookup::Class => {
                        self.error(
                            ErrorKind::ExpectedVariableGotClass(identifier.name.clone()),
                            identifier.span.start,
                        );
                        Type::Undefined
                    }
                    Lookup::NotFound => {
                        self.error(
                            ErrorKind::UndeclaredIdentifier(identifier.name.clone()),
                            identifier.span.start,
                        );
                        Type::Undefined
                    }
                }
            }
            Expr::This(_) => Type::Class(self.current_class.clone()),
        };
        self.types.set(expr.id(), ty.clone());
        ty
    }

    fn check_binary(&mut self, binary: &BinaryExpr, symbols: &mut SymbolTable) -> Type {
        let left = self.check_expr(&binary.left, symbols);
        let right = self.check_expr(&binary.right, symbols);
        let operator = binary.operator;
        let location = binary.op_location;

        match operator {
            BinaryOp::And | BinaryOp::Or => {
                if !(left.is_boolean() || left.is_undefined()) {
                    self.error(ErrorKind::InvalidLeftOperand { operator, found: left }, location);
                }
                if !(right.is_boolean() || right.is_undefined()) {
                    self.error(ErrorKind::InvalidRightOperand { operator, found: right }, location);
                }
                Type::Boolean
            }
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                if !(left.is_int() && right.is_int()
                    || left.is_undefined()
                    || right.is_undefined())
                {
                    self.error(
                        ErrorKind::InvalidComparison { operator, left, right },
                        location,
                    );
                }
                Type::Boolean
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let comparable = left.is_int() && right.is_int()
                    || left.is_int_array() && right.is_int_array()
                    || left.is_boolean() && right.is_boolean()
                    || left.is_class() && right.is_class() && right.is_assignable_to(&left)
                    || left.is_undefined()
                    || right.is_undefined();
                if !comparable {
                    self.error(
                        ErrorKind::InvalidComparison { operator, left, right },
                        location,
                    );
                }
                Type::Boolean
            }
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times => {
                if !(left.is_int() || left.is_undefined()) {
                    self.error(ErrorKind::InvalidLeftOperand { operator, found: left }, location);
                }
                if !(right.is_int() || right.is_undefined()) {
                    self.error(ErrorKind::InvalidRightOperand { operator, found: right }, location);
                }
                Type::Int
            }
        }
    }

    fn check_method_call(&mut self, call: &MethodCallExpr, symbols: &mut SymbolTable) -> Type {
        let receiver = self.check_expr(&call.receiver, symbols);
        let argument_types: Vec<Type> = call
            .arguments
            .iter()
            .map(|argument| self.check_expr(argument, symbols))
            .collect();
        let anchor = call.name.location;

        let Some(class_name) = receiver.class_name().map(str::to_string) else {
            if !receiver.is_undefined() {
                self.error(ErrorKind::MethodCallOnNonClassType(receiver), anchor);
            }
            return Type::Undefined;
        };

        let Some(method) = symbols
            .class_info(&class_name)
            .and_then(|c| c.method(&call.name.name))
        else {
            self.error(
                ErrorKind::UndeclaredMethod {
                    method_name: call.name.name.clone(),
                    class_name,
                },
                anchor,
            );
            return Type::Undefined;
        };

        let return_type = method.return_type().clone();
        let formal_types: Vec<Type> = method.parameters().iter().map(|p| p.ty().clone()).collect();

        if argument_types.len() == formal_types.len() {
            for (index, (actual, formal)) in
                argument_types.iter().zip(formal_types.iter()).enumerate()
            {
                if !actual.is_assignable_to(formal) {
                    self.error(
                        ErrorKind::WrongParameterType {
                            method_name: call.name.name.clone(),
                            index,
                            found: actual.clone(),
                            expected: formal.clone(),
                        },
                        anchor,
                    );
                }
            }
        } else {
            self.error(
                ErrorKind::WrongParameterCount {
                    method_name: call.name.name.clone(),
                    found: argument_types.len(),
                    expected: formal_types.len(),
                },
                anchor,
            );
        }
        return_type
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
