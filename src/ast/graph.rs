use super::nodes::*;

/// GraphViz AST emitter
///
/// Renders the tree as a `digraph` in dot syntax, one graph node per AST
/// node, for inspection with GraphViz tooling.
pub struct GraphPrinter {
    output: String,
    next_node: usize,
}

impl GraphPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            next_node: 0,
        }
    }

    pub fn print(&mut self, program: &Program) -> String {
        self.output.clear();
        self.next_node = 0;
        self.output.push_str("digraph ast {\n");
        self.output.push_str("  node [shape=box, fontname=\"monospace\"];\n");

        let root = self.node("Program");
        let main = self.visit_main_class(&program.main_class);
        self.edge(root, main);
        for class in &program.classes {
            let class_node = self.visit_class(class);
            self.edge(root, class_node);
        }

        self.output.push_str("}\n");
        self.output.clone()
    }

    fn node(&mut self, label: &str) -> usize {
        let id = self.next_node;
        self.next_node += 1;
        self.output
            .push_str(&format!("  n{} [label=\"{}\"];\n", id, label));
        id
    }

    fn edge(&mut self, from: usize, to: usize) {
        self.output.push_str(&format!("  n{} -> n{};\n", from, to));
    }

    fn visit_main_class(&mut self, main: &MainClassDecl) -> usize {
        let node = self.node(&format!("MainClass {}", main.name));
        let method = self.node(&format!("Main method {}({})", main.method_name, main.arg_name));
        self.edge(node, method);
        for local in &main.locals {
            let decl = self.node(&format!("VarDecl {} {}", local.type_ref.kind, local.name));
            self.edge(method, decl);
        }
        for stmt in &main.statements {
            let stmt_node = self.visit_stmt(stmt);
            self.edge(method, stmt_node);
        }
        node
    }

    fn visit_class(&mut self, class: &ClassDecl) -> usize {
        let node = self.node(&format!("Class {}", class.name));
        for field in &class.fields {
            let decl = self.node(&format!("Field {} {}", field.type_ref.kind, field.name));
            self.edge(node, decl);
        }
        for method in &class.methods {
            let method_node = self.visit_method(method);
            self.edge(node, method_node);
        }
        node
    }

    fn visit_method(&mut self, method: &MethodDecl) -> usize {
        let node = self.node(&format!(
            "Method {} {}",
            method.return_type.kind, method.name
        ));
        for formal in &method.formals {
            let decl = self.node(&format!("Formal {} {}", formal.type_ref.kind, formal.name));
            self.edge(node, decl);
        }
        for local in &method.locals {
            let decl = self.node(&format!("VarDecl {} {}", local.type_ref.kind, local.name));
            self.edge(node, decl);
        }
        for stmt in &method.statements {
            let stmt_node = self.visit_stmt(stmt);
            self.edge(node, stmt_node);
        }
        let ret = self.node("Return");
        let value = self.visit_expr(&method.return_expr);
        self.edge(ret, value);
        self.edge(node, ret);
        node
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> usize {
        match stmt {
            Stmt::Block(block) => {
                let node = self.node("Block");
                for local in &block.locals {
                    let decl =
                        self.node(&format!("VarDecl {} {}", local.type_ref.kind, local.name));
                    self.edge(node, decl);
                }
                for stmt in &block.statements {
                    let child = self.visit_stmt(stmt);
                    self.edge(node, child);
                }
                node
            }
            Stmt::If(if_stmt) => {
                let node = self.node(if if_stmt.else_branch.is_some() {
                    "IfElse"
                } else {
                    "If"
                });
                let condition = self.visit_expr(&if_stmt.condition);
                self.edge(node, condition);
                let then_branch = self.visit_stmt(&if_stmt.then_branch);
                self.edge(node, then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    let else_node = self.visit_stmt(else_branch);
                    self.edge(node, else_node);
                }
                node
            }
            Stmt::While(while_stmt) => {
                let node = self.node("While");
                let condition = self.visit_expr(&while_stmt.condition);
                self.edge(node, condition);
                let body = self.visit_stmt(&while_stmt.body);
                self.edge(node, body);
                node
            }
            Stmt::Println(println_stmt) => {
                let node = self.node("Println");
                let value = self.visit_expr(&println_stmt.value);
                self.edge(node, value);
                node
            }
            Stmt::Assign(assign) => {
                let node = self.node(&format!("Assign {}", assign.name));
                let value = self.visit_expr(&assign.value);
                self.edge(node, value);
                node
            }
            Stmt::ArrayAssign(assign) => {
                let node = self.node(&format!("ArrayAssign {}", assign.name));
                let index = self.visit_expr(&assign.index);
                self.edge(node, index);
                let value = self.visit_expr(&assign.value);
                self.edge(node, value);
                node
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> usize {
        match expr {
            Expr::Binary(binary) => {
                let node = self.node(&format!("{}", binary.operator));
                let left = self.visit_expr(&binary.left);
                self.edge(node, left);
                let right = self.visit_expr(&binary.right);
                self.edge(node, right);
                node
            }
            Expr::Not(not) => {
                let node = self.node("!");
                let operand = self.visit_expr(&not.operand);
                self.edge(node, operand);
                node
            }
            Expr::MethodCall(call) => {
                let node = self.node(&format!("Call {}", call.name));
                let receiver = self.visit_expr(&call.receiver);
                self.edge(node, receiver);
                for argument in &call.arguments {
                    let argument_node = self.visit_expr(argument);
                    self.edge(node, argument_node);
                }
                node
            }
            Expr::ArrayAccess(access) => {
                let node = self.node("ArrayAccess");
                let array = self.visit_expr(&access.array);
                self.edge(node, array);
                let index = self.visit_expr(&access.index);
                self.edge(node, index);
                node
            }
            Expr::ArrayLength(length) => {
                let node = self.node("ArrayLength");
                let array = self.visit_expr(&length.array);
                self.edge(node, array);
                node
            }
            Expr::NewInstance(new) => self.node(&format!("New {}", new.class_name)),
            Expr::NewIntArray(new) => {
                let node = self.node("NewIntArray");
                let size = self.visit_expr(&new.size);
                self.edge(node, size);
                node
            }
            Expr::IntegerLit(literal) => self.node(&literal.text),
            Expr::BooleanLit(literal) => {
                self.node(if literal.value { "true" } else { "false" })
            }
            Expr::Identifier(identifier) => self.node(&identifier.name),
            Expr::This(_) => self.node("this"),
        }
    }
}

impl Default for GraphPrinter {
    fn default() -> Self {
        Self::new()
    }
}
