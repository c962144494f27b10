//! Symbol-table construction
//!
//! Two sweeps over the AST. The declaration sweep registers every class name
//! first (so forward class references resolve), then fields and method
//! signatures; duplicates are reported and the first declaration wins. The
//! body sweep collects method locals with block scoping.
//!
//! Declared types are resolved once all class names are known. A field or
//! local of an undeclared class type is not recorded; its uses surface as
//! undeclared identifiers in the type checker. A formal keeps its slot with
//! the undefined type so arity checking still works.

use std::collections::HashSet;

use crate::ast::{ClassDecl, MainClassDecl, MethodDecl, Program, Stmt, TypeKind, TypeRef, VarDecl};
use crate::common::error::{Diagnostic, ErrorKind};
use crate::symbol::{ClassInfo, MethodInfo, SymbolTable, VariableInfo};
use crate::types::Type;

/// Builds the symbol table for a program, collecting declaration errors
pub struct SymbolTableBuilder {
    errors: Vec<Diagnostic>,
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Build the symbol table
    ///
    /// Errors accumulate and the traversal always completes; the caller
    /// decides whether to abort afterwards.
    pub fn build(&mut self, program: &Program) -> SymbolTable {
        let mut table = SymbolTable::new();

        self.declare_classes(program, &mut table);
        let known: HashSet<String> = table.classes().map(|c| c.name().to_string()).collect();
        self.declare_members(program, &known, &mut table);
        self.collect_bodies(program, &known, &mut table);

        log::debug!(
            "symbol table built: {} classes, {} errors",
            table.len(),
            self.errors.len()
        );
        self.errors
            .sort_by_key(|d| (d.location.line, d.location.column));
        table
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    fn error(&mut self, kind: ErrorKind, location: crate::ast::Location) {
        self.errors.push(Diagnostic::new(kind, location));
    }

    // Declaration sweep, part one: class name shells

    fn declare_classes(&mut self, program: &Program, table: &mut SymbolTable) {
        let main = &program.main_class;
        table.add_class(ClassInfo::new(main.name.name.clone(), main.name.location));

        for class in &program.classes {
            if table.contains_class(&class.name.name) {
                self.error(
                    ErrorKind::DuplicateClass(class.name.name.clone()),
                    class.name.location,
                );
            } else {
                table.add_class(ClassInfo::new(class.name.name.clone(), class.name.location));
            }
        }
    }

    // Declaration sweep, part two: fields and method signatures

    fn declare_members(&mut self, program: &Program, known: &HashSet<String>, table: &mut SymbolTable) {
        let main = &program.main_class;
        if let Some(info) = table.class_info_mut(&main.name.name) {
            // The main method takes no usable parameters (its String[]
            // argument is outside the type family) and returns nothing.
            info.add_method(MethodInfo::new(
                main.method_name.name.clone(),
                Type::Undefined,
                main.method_name.location,
            ));
        }

        for class in &program.classes {
            if !self.is_surviving_class(class, table) {
                continue;
            }
            self.declare_class_members(class, known, table);
        }
    }

    fn declare_class_members(
        &mut self,
        class: &ClassDecl,
        known: &HashSet<String>,
        table: &mut SymbolTable,
    ) {
        let Some(info) = table.class_info_mut(&class.name.name) else {
            return;
        };

        for field in &class.fields {
            if info.has_field(&field.name.name) {
                self.error(
                    ErrorKind::DuplicateField(field.name.name.clone()),
                    field.name.location,
                );
                continue;
            }
            if let Some(ty) = resolve_type(&field.type_ref, known) {
                info.add_field(VariableInfo::field(
                    field.name.name.clone(),
                    ty,
                    field.name.location,
                ));
            }
        }

        for method in &class.methods {
            if info.has_method(&method.name.name) {
                self.error(
                    ErrorKind::DuplicateMethod(method.name.name.clone()),
                    method.name.location,
                );
                continue;
            }
            let method_info = self.declare_method(method, known);
            info.add_method(method_info);
        }
    }

    fn declare_method(&mut self, method: &MethodDecl, known: &HashSet<String>) -> MethodInfo {
        let return_type = resolve_type(&method.return_type, known).unwrap_or(Type::Undefined);
        let mut info = MethodInfo::new(method.name.name.clone(), return_type, method.name.location);

        for formal in &method.formals {
            if info.parameter(&formal.name.name).is_some() {
                self.error(
                    ErrorKind::DuplicateParameter(formal.name.name.clone()),
                    formal.name.location,
                );
                continue;
            }
            let ty = resolve_type(&formal.type_ref, known).unwrap_or(Type::Undefined);
            info.add_parameter(VariableInfo::parameter(
                formal.name.name.clone(),
                ty,
                formal.name.location,
            ));
        }
        info
    }

    // Body sweep: locals with block scoping

    fn collect_bodies(&mut self, program: &Program, known: &HashSet<String>, table: &mut SymbolTable) {
        self.collect_main_body(&program.main_class, known, table);

        for class in &program.classes {
            if !self.is_surviving_class(class, table) {
                continue;
            }
            for method in &class.methods {
                let Some(info) = table
                    .class_info_mut(&class.name.name)
                    .and_then(|c| c.method_mut(&method.name.name))
                else {
                    continue;
                };
                // Only the surviving declaration's body feeds its MethodInfo.
                if info.declared_at() != method.name.location {
                    continue;
                }
                info.enter_method();
                self.collect_method_body(&method.locals, &method.statements, known, info);
                info.leave_method();
            }
        }
    }

    fn collect_main_body(
        &mut self,
        main: &MainClassDecl,
        known: &HashSet<String>,
        table: &mut SymbolTable,
    ) {
        let Some(info) = table
            .class_info_mut(&main.name.name)
            .and_then(|c| c.method_mut(&main.method_name.name))
        else {
            return;
        };
        if info.declared_at() != main.method_name.location {
            return;
        }
        info.enter_method();
        self.collect_method_body(&main.locals, &main.statements, known, info);
        info.leave_method();
    }

    fn collect_method_body(
        &mut self,
        locals: &[VarDecl],
        statements: &[Stmt],
        known: &HashSet<String>,
        method: &mut MethodInfo,
    ) {
        for local in locals {
            self.declare_local(local, known, method);
        }
        for stmt in statements {
            self.collect_stmt(stmt, known, method);
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt, known: &HashSet<String>, method: &mut MethodInfo) {
        match stmt {
            Stmt::Block(block) => {
                method.enter_block();
                self.collect_method_body(&block.locals, &block.statements, known, method);
                method.leave_block();
            }
            Stmt::If(if_stmt) => {
                self.collect_stmt(&if_stmt.then_branch, known, method);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.collect_stmt(else_branch, known, method);
                }
            }
            Stmt::While(while_stmt) => {
                self.collect_stmt(&while_stmt.body, known, method);
            }
            Stmt::Println(_) | Stmt::Assign(_) | Stmt::ArrayAssign(_) => {}
        }
    }

    fn declare_local(&mut self, decl: &VarDecl, known: &HashSet<String>, method: &mut MethodInfo) {
        // A local may shadow a parameter or field, but not a local visible
        // from an enclosing block.
        if method.local(&decl.name.name).is_some() {
            self.error(
                ErrorKind::DuplicateLocal(decl.name.name.clone()),
                decl.name.location,
            );
            return;
        }
        if let Some(ty) = resolve_type(&decl.type_ref, known) {
            method.add_local(VariableInfo::local(
                decl.name.name.clone(),
                ty,
                decl.name.location,
            ));
        }
    }

    fn is_surviving_class(&self, class: &ClassDecl, table: &SymbolTable) -> bool {
        table
            .class_info(&class.name.name)
            .map(|info| info.declared_at() == class.name.location)
            .unwrap_or(false)
    }
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a declared type against the set of known class names
///
/// `None` means the type names an undeclared class.
fn resolve_type(type_ref: &TypeRef, known: &HashSet<String>) -> Option<Type> {
    match &type_ref.kind {
        TypeKind::Int => Some(Type::Int),
        TypeKind::IntArray => Some(Type::IntArray),
        TypeKind::Boolean => Some(Type::Boolean),
        TypeKind::Class(name) => {
            if known.contains(name) {
                Some(Type::Class(name.clone()))
            } else {
                None
            }
        }
    }
}
