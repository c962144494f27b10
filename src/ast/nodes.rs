use super::{Location, Span};
use std::fmt;

/// Identity of an expression node, assigned by the parser in creation order.
///
/// The type checker keeps its node→type association in a dense vector indexed
/// by `NodeId`, so lookups are O(1) and the map is trivially comparable in
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An identifier with its source location
#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    pub location: Location,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Root node of a compilation unit
#[derive(Debug, Clone)]
pub struct Program {
    pub main_class: MainClassDecl,
    pub classes: Vec<ClassDecl>,
    /// Number of expression nodes allocated by the parser; sizes the
    /// type checker's node→type table.
    pub node_count: usize,
    pub span: Span,
}

/// The mandatory main class: `class N { public static void M(String[] P) { ... } }`
#[derive(Debug, Clone)]
pub struct MainClassDecl {
    pub name: Identifier,
    pub method_name: Identifier,
    pub arg_name: Identifier,
    pub locals: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Identifier,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub type_ref: TypeRef,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub type_ref: TypeRef,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Formal {
    pub type_ref: TypeRef,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub return_type: TypeRef,
    pub name: Identifier,
    pub formals: Vec<Formal>,
    pub locals: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
    pub return_expr: Expr,
    pub span: Span,
}

/// A declared type as written in the source
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Int,
    IntArray,
    Boolean,
    Class(String),
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Int => write!(f, "int"),
            TypeKind::IntArray => write!(f, "int[]"),
            TypeKind::Boolean => write!(f, "boolean"),
            TypeKind::Class(name) => write!(f, "{}", name),
        }
    }
}

// Statements

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    Println(PrintlnStmt),
    Assign(AssignStmt),
    ArrayAssign(ArrayAssignStmt),
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub locals: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// `if` with optional `else`; an `else` always belongs to the innermost
/// unmatched `if`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    /// Span starts at the `if` keyword, the anchor for condition diagnostics.
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PrintlnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub name: Identifier,
    pub value: Expr,
    /// Location of the `=` token, the anchor for assignment diagnostics.
    pub assign_location: Location,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayAssignStmt {
    pub name: Identifier,
    pub index: Expr,
    pub value: Expr,
    pub assign_location: Location,
    pub span: Span,
}

// Expressions

#[derive(Debug, Clone)]
pub enum Expr {
    Binary(BinaryExpr),
    Not(NotExpr),
    MethodCall(MethodCallExpr),
    ArrayAccess(ArrayAccessExpr),
    ArrayLength(ArrayLengthExpr),
    NewInstance(NewInstanceExpr),
    NewIntArray(NewIntArrayExpr),
    IntegerLit(IntegerLitExpr),
    BooleanLit(BooleanLitExpr),
    Identifier(IdentifierExpr),
    This(ThisExpr),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Binary(e) => e.id,
            Expr::Not(e) => e.id,
            Expr::MethodCall(e) => e.id,
            Expr::ArrayAccess(e) => e.id,
            Expr::ArrayLength(e) => e.id,
            Expr::NewInstance(e) => e.id,
            Expr::NewIntArray(e) => e.id,
            Expr::IntegerLit(e) => e.id,
            Expr::BooleanLit(e) => e.id,
            Expr::Identifier(e) => e.id,
            Expr::This(e) => e.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Binary(e) => e.span,
            Expr::Not(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::ArrayAccess(e) => e.span,
            Expr::ArrayLength(e) => e.span,
            Expr::NewInstance(e) => e.span,
            Expr::NewIntArray(e) => e.span,
            Expr::IntegerLit(e) => e.span,
            Expr::BooleanLit(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::This(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Plus,
    Minus,
    Times,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub operator: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    /// Location of the operator token, the anchor for operand diagnostics.
    pub op_location: Location,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NotExpr {
    pub id: NodeId,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub id: NodeId,
    pub receiver: Box<Expr>,
    pub name: Identifier,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayAccessExpr {
    pub id: NodeId,
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    /// Location of the `[` token.
    pub bracket_location: Location,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayLengthExpr {
    pub id: NodeId,
    pub array: Box<Expr>,
    /// Location of the `length` keyword.
    pub length_location: Location,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewInstanceExpr {
    pub id: NodeId,
    pub class_name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewIntArrayExpr {
    pub id: NodeId,
    pub size: Box<Expr>,
    pub span: Span,
}

/// Integer literal with its source text; 32-bit range validation happens in
/// the type checker.
#[derive(Debug, Clone)]
pub struct IntegerLitExpr {
    pub id: NodeId,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BooleanLitExpr {
    pub id: NodeId,
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub id: NodeId,
    pub span: Span,
}
