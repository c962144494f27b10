use mjc::analysis::{SymbolTableBuilder, TypeChecker};
use mjc::ast::{BinaryOp, Stmt};
use mjc::parser::parse;
use mjc::types::Type;
use mjc::{Diagnostic, ErrorKind};

fn check(source: &str) -> Vec<Diagnostic> {
    let analysis = mjc::analyze(source).expect("pipeline failed");
    analysis.diagnostics
}

fn kinds(source: &str) -> Vec<ErrorKind> {
    check(source).into_iter().map(|d| d.kind).collect()
}

/// Wrap statements into a main class whose locals are given first
fn main_program(locals: &str, statements: &str) -> String {
    format!(
        "class Main {{\n    public static void main(String[] args) {{\n{}{}    }}\n}}\n",
        locals, statements
    )
}

#[test]
fn well_typed_program_has_no_diagnostics() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        System.out.println(new Fib().compute(10));
    }
}

class Fib {
    public int compute(int n) {
        int a;
        int b;
        int t;
        a = 0;
        b = 1;
        while (0 < n) {
            t = a + b;
            a = b;
            b = t;
            n = n - 1;
        }
        return a;
    }
}
"#;

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis.types.is_fully_typed());
}

#[test]
fn println_requires_int() {
    let source = main_program("", "        System.out.println(true);\n");
    assert_eq!(kinds(&source), vec![ErrorKind::UnprintableType(Type::Boolean)]);
}

#[test]
fn if_and_while_conditions_must_be_boolean() {
    let source = main_program(
        "        int x;\n",
        "        if (1) x = 1; else x = 2;\n        while (x) x = 0;\n",
    );
    assert_eq!(
        kinds(&source),
        vec![
            ErrorKind::WrongIfConditionType,
            ErrorKind::WrongWhileConditionType,
        ]
    );
}

#[test]
fn array_index_must_be_int() {
    let source = main_program("        int[] ia;\n", "        ia[true] = 1;\n");
    assert_eq!(kinds(&source), vec![ErrorKind::WrongIndexType(Type::Boolean)]);
}

#[test]
fn array_assignment_rules() {
    let source = main_program(
        "        int i;\n        int[] ia;\n        boolean b;\n",
        "        i[0] = 1;\n        ia[0] = true;\n",
    );
    assert_eq!(
        kinds(&source),
        vec![
            ErrorKind::NotArrayType(Type::Int),
            ErrorKind::InvalidAssignment {
                found: Type::Boolean,
                expected: Type::Int,
            },
        ]
    );
}

#[test]
fn assignment_requires_assignable_value() {
    let source = main_program("        int x;\n", "        x = true;\n");
    assert_eq!(
        kinds(&source),
        vec![ErrorKind::InvalidAssignment {
            found: Type::Boolean,
            expected: Type::Int,
        }]
    );
}

#[test]
fn assignment_to_class_name_is_rejected() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        Helper = 1;
    }
}

class Helper {
}
"#;
    assert_eq!(
        kinds(source),
        vec![ErrorKind::ExpectedVariableGotClass("Helper".into())]
    );
}

#[test]
fn arithmetic_operands_must_be_int() {
    let source = r#"
class Main {
    public static void main(String[] args) {
    }
}

class C {
    public int f(int x) {
        return x + true;
    }
}
"#;

    let program = parse(source).expect("Failed to parse");
    let mut builder = SymbolTableBuilder::new();
    let mut symbols = builder.build(&program);
    let mut checker = TypeChecker::new();
    assert!(!checker.check(&program, &mut symbols));

    assert_eq!(checker.errors().len(), 1);
    assert_eq!(
        checker.errors()[0].kind,
        ErrorKind::InvalidRightOperand {
            operator: BinaryOp::Plus,
            found: Type::Boolean,
        }
    );

    // Even the faulty sum types as int, bounding cascades.
    let sum = &program.classes[0].methods[0].return_expr;
    assert_eq!(checker.types().get(sum.id()), &Type::Int);
}

#[test]
fn logical_operands_must_be_boolean() {
    let source = main_program(
        "        boolean b;\n",
        "        b = 1 && true;\n        b = true || 2;\n",
    );
    assert_eq!(
        kinds(&source),
        vec![
            ErrorKind::InvalidLeftOperand {
                operator: BinaryOp::And,
                found: Type::Int,
            },
            ErrorKind::InvalidRightOperand {
                operator: BinaryOp::Or,
                found: Type::Int,
            },
        ]
    );
}

#[test]
fn comparison_rules() {
    let source = main_program(
        "        boolean b;\n        int[] ia;\n        int[] ib;\n",
        "        b = true < 1;\n        b = ia == ib;\n        b = ia != 1;\n",
    );
    assert_eq!(
        kinds(&source),
        vec![
            ErrorKind::InvalidComparison {
                operator: BinaryOp::Lt,
                left: Type::Boolean,
                right: Type::Int,
            },
            ErrorKind::InvalidComparison {
                operator: BinaryOp::Ne,
                left: Type::IntArray,
                right: Type::Int,
            },
        ]
    );
}

#[test]
fn class_equality_requires_same_class() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        boolean b;
        b = new A() == new A();
        b = new A() == new B();
    }
}

class A {
}

class B {
}
"#;
    assert_eq!(
        kinds(source),
        vec![ErrorKind::InvalidComparison {
            operator: BinaryOp::Eq,
            left: Type::Class("A".into()),
            right: Type::Class("B".into()),
        }]
    );
}

#[test]
fn negation_expects_boolean() {
    let source = main_program("        boolean b;\n", "        b = !1;\n");
    assert_eq!(
        kinds(&source),
        vec![ErrorKind::NegationExpectedBoolean(Type::Int)]
    );
}

#[test]
fn array_length_requires_array() {
    let source = main_program(
        "        int i;\n        int[] ia;\n",
        "        i = ia.length;\n        i = i.length;\n",
    );
    assert_eq!(
        kinds(&source),
        vec![ErrorKind::LengthOnNonArrayType(Type::Int)]
    );
}

#[test]
fn new_array_size_must_be_int() {
    let source = main_program("        int[] ia;\n", "        ia = new int[true];\n");
    assert_eq!(kinds(&source), vec![ErrorKind::WrongSizeType(Type::Boolean)]);
}

#[test]
fn integer_literal_must_fit_32_bits() {
    let source = main_program("", "        System.out.println(9999999999);\n");
    assert_eq!(
        kinds(&source),
        vec![ErrorKind::InvalidIntLiteral("9999999999".into())]
    );

    // Leading zeros are fine, the value is what matters.
    let source = main_program("", "        System.out.println(022);\n");
    assert!(kinds(&source).is_empty());
}

#[test]
fn method_call_checking() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        int x;
        x = new Calc().add(1, 2);
        x = new Calc().add(1);
        x = new Calc().add(true, 2);
        x = new Calc().missing();
        x = x.add(1, 2);
    }
}

class Calc {
    public int add(int a, int b) {
        return a + b;
    }
}
"#;
    assert_eq!(
        kinds(source),
        vec![
            ErrorKind::WrongParameterCount {
                method_name: "add".into(),
                found: 1,
                expected: 2,
            },
            ErrorKind::WrongParameterType {
                method_name: "add".into(),
                index: 0,
                found: Type::Boolean,
                expected: Type::Int,
            },
            ErrorKind::UndeclaredMethod {
                method_name: "missing".into(),
                class_name: "Calc".into(),
            },
            ErrorKind::MethodCallOnNonClassType(Type::Int),
        ]
    );
}

#[test]
fn this_is_the_current_class() {
    let source = r#"
class Main {
    public static void main(String[] args) {
    }
}

class Node {
    public Node self() {
        return this;
    }

    public int twice(int n) {
        return this.self().twice2(n);
    }

    public int twice2(int n) {
        return n + n;
    }
}
"#;
    assert!(kinds(source).is_empty());
}

#[test]
fn wrong_return_type_is_reported() {
    let source = r#"
class Main {
    public static void main(String[] args) {
    }
}

class C {
    public int f() {
        return true;
    }
}
"#;
    assert_eq!(
        kinds(source),
        vec![ErrorKind::WrongReturnType {
            method_name: "f".into(),
            expected: Type::Int,
        }]
    );
}

#[test]
fn lookup_prefers_local_over_parameter_over_field() {
    let source = r#"
class Main {
    public static void main(String[] args) {
    }
}

class C {
    int v;

    public boolean shadowed(int v) {
        boolean b;
        {
            boolean v;
            v = true;
            b = v;
        }
        v = v + 1;
        return b;
    }
}
"#;
    assert!(kinds(source).is_empty());
}

#[test]
fn undefined_silences_cascades() {
    // One undeclared identifier produces exactly one diagnostic even though
    // it flows through arithmetic, comparison and assignment rules.
    let source = main_program(
        "        int x;\n",
        "        x = ghost + 1;\n        if (ghost < 2) x = ghost;\n",
    );
    let kinds = kinds(&source);
    assert_eq!(
        kinds,
        vec![
            ErrorKind::UndeclaredIdentifier("ghost".into()),
            ErrorKind::UndeclaredIdentifier("ghost".into()),
            ErrorKind::UndeclaredIdentifier("ghost".into()),
        ]
    );
}

#[test]
fn checker_is_idempotent() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        int x;
        x = ghost + true;
    }
}
"#;
    let program = parse(source).expect("Failed to parse");
    let mut builder = SymbolTableBuilder::new();
    let mut symbols = builder.build(&program);

    let mut first = TypeChecker::new();
    first.check(&program, &mut symbols);
    let (first_types, first_errors) = first.into_parts();

    let mut second = TypeChecker::new();
    second.check(&program, &mut symbols);
    let (second_types, second_errors) = second.into_parts();

    assert_eq!(first_types, second_types);
    assert_eq!(first_errors, second_errors);
}

#[test]
fn block_scoped_locals_are_visible_to_the_checker() {
    let source = r#"
class Main {
    public static void main(String[] args) {
    }
}

class C {
    public int m() {
        int total;
        total = 0;
        {
            int inner;
            inner = 5;
            total = total + inner;
        }
        {
            boolean inner;
            inner = true;
            if (inner) total = total + 1;
        }
        return total;
    }
}
"#;
    assert!(kinds(source).is_empty());
}

#[test]
fn statement_types_recorded_for_main_statements() {
    let source = main_program(
        "        int x;\n",
        "        x = 1 + 2;\n",
    );
    let analysis = mjc::analyze(&source).expect("pipeline failed");
    let Stmt::Assign(assign) = &analysis.program.main_class.statements[0] else {
        panic!("expected assignment");
    };
    assert_eq!(analysis.types.get(assign.value.id()), &Type::Int);
}
