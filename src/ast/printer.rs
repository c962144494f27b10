use super::nodes::*;

/// AST pretty printer
///
/// Renders a program back to source form. The output is canonical: parsing
/// it again yields a structurally equal tree, and printing that tree yields
/// the same text.
pub struct AstPrinter {
    indent_level: usize,
    output: String,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn print(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent_level = 0;

        self.print_main_class(&program.main_class);
        for class in &program.classes {
            self.output.push('\n');
            self.print_class(class);
        }
        self.output.clone()
    }

    fn indent(&mut self) {
        self.indent_level += 4;
    }

    fn dedent(&mut self) {
        if self.indent_level >= 4 {
            self.indent_level -= 4;
        }
    }

    fn writeln(&mut self, s: &str) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn print_main_class(&mut self, main: &MainClassDecl) {
        self.writeln(&format!("class {} {{", main.name));
        self.indent();
        self.writeln(&format!(
            "public static void {}(String[] {}) {{",
            main.method_name, main.arg_name
        ));
        self.indent();
        for local in &main.locals {
            self.print_var_decl(local);
        }
        for stmt in &main.statements {
            self.print_stmt(stmt);
        }
        self.dedent();
        self.writeln("}");
        self.dedent();
        self.writeln("}");
    }

    fn print_class(&mut self, class: &ClassDecl) {
        self.writeln(&format!("class {} {{", class.name));
        self.indent();
        let mut first = true;
        for field in &class.fields {
            self.writeln(&format!("{} {};", field.type_ref.kind, field.name));
            first = false;
        }
        for method in &class.methods {
            if !first {
                self.output.push('\n');
            }
            self.print_method(method);
            first = false;
        }
        self.dedent();
        self.writeln("}");
    }

    fn print_method(&mut self, method: &MethodDecl) {
        let formals: Vec<String> = method
            .formals
            .iter()
            .map(|f| format!("{} {}", f.type_ref.kind, f.name))
            .collect();
        self.writeln(&format!(
            "public {} {}({}) {{",
            method.return_type.kind,
            method.name,
            formals.join(", ")
        ));
        self.indent();
        for local in &method.locals {
            self.print_var_decl(local);
        }
        for stmt in &method.statements {
            self.print_stmt(stmt);
        }
        self.writeln(&format!("return {};", Self::expr_text(&method.return_expr)));
        self.dedent();
        self.writeln("}");
    }

    fn print_var_decl(&mut self, decl: &VarDecl) {
        self.writeln(&format!("{} {};", decl.type_ref.kind, decl.name));
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.writeln("{");
                self.indent();
                for local in &block.locals {
                    self.print_var_decl(local);
                }
                for stmt in &block.statements {
                    self.print_stmt(stmt);
                }
                self.dedent();
                self.writeln("}");
            }
            Stmt::If(if_stmt) => {
                self.writeln(&format!("if ({})", Self::expr_text(&if_stmt.condition)));
                self.indent();
                self.print_stmt(&if_stmt.then_branch);
                self.dedent();
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.writeln("else");
                    self.indent();
                    self.print_stmt(else_branch);
                    self.dedent();
                }
            }
            Stmt::While(while_stmt) => {
                self.writeln(&format!("while ({})", Self::expr_text(&while_stmt.condition)));
                self.indent();
                self.print_stmt(&while_stmt.body);
                self.dedent();
            }
            Stmt::Println(println_stmt) => {
                self.writeln(&format!(
                    "System.out.println({});",
                    Self::expr_text(&println_stmt.value)
                ));
            }
            Stmt::Assign(assign) => {
                self.writeln(&format!(
                    "{} = {};",
                    assign.name,
                    Self::expr_text(&assign.value)
                ));
            }
            Stmt::ArrayAssign(assign) => {
                self.writeln(&format!(
                    "{}[{}] = {};",
                    assign.name,
                    Self::expr_text(&assign.index),
                    Self::expr_text(&assign.value)
                ));
            }
        }
    }

    /// Source text of an expression
    ///
    /// Binary operands are always parenthesised, so the printed form encodes
    /// the tree shape regardless of precedence.
    fn expr_text(expr: &Expr) -> String {
        match expr {
            Expr::Binary(binary) => format!(
                "({} {} {})",
                Self::expr_text(&binary.left),
                binary.operator,
                Self::expr_text(&binary.right)
            ),
            Expr::Not(not) => format!("!{}", Self::expr_text(&not.operand)),
            Expr::MethodCall(call) => {
                let arguments: Vec<String> =
                    call.arguments.iter().map(Self::expr_text).collect();
                format!(
                    "{}.{}({})",
                    Self::expr_text(&call.receiver),
                    call.name,
                    arguments.join(", ")
                )
            }
            Expr::ArrayAccess(access) => format!(
                "{}[{}]",
                Self::expr_text(&access.array),
                Self::expr_text(&access.index)
            ),
            Expr::ArrayLength(length) => {
                format!("{}.length", Self::expr_text(&length.array))
            }
            Expr::NewInstance(new) => format!("new {}()", new.class_name),
            Expr::NewIntArray(new) => format!("new int[{}]", Self::expr_text(&new.size)),
            Expr::IntegerLit(literal) => literal.text.clone(),
            Expr::BooleanLit(literal) => {
                if literal.value { "true".into() } else { "false".into() }
            }
            Expr::Identifier(identifier) => identifier.name.clone(),
            Expr::This(_) => "this".into(),
        }
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}
