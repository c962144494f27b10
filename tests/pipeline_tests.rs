use std::fs;
use std::io::Write;

use mjc::ast::{AstPrinter, GraphPrinter, Stmt};
use mjc::parser::parse;
use mjc::types::Type;
use mjc::ErrorKind;

#[test]
fn sums_with_a_helper_class() {
    let source = "class M { public static void main(String[] a){ \
                  System.out.println(new S().sum1to(100)); } } \
                  class S { public int sum1to(int n){ int i; i=1; \
                  while(i<n+1){ i=i+1; } return i; } }";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis.types.is_fully_typed());

    // The call expression itself types as int.
    let Stmt::Println(println_stmt) = &analysis.program.main_class.statements[0] else {
        panic!("expected println");
    };
    assert_eq!(analysis.types.get(println_stmt.value.id()), &Type::Int);
}

#[test]
fn undeclared_class_produces_exactly_two_diagnostics() {
    let source = "class M{ public static void main(String[] a){ X x; x = new X(); } }";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert_eq!(analysis.diagnostics.len(), 2, "{:?}", analysis.diagnostics);

    let kinds: Vec<&ErrorKind> = analysis.diagnostics.iter().map(|d| &d.kind).collect();
    assert!(kinds.contains(&&ErrorKind::UndeclaredClass("X".into())));
    assert!(kinds.contains(&&ErrorKind::UndeclaredIdentifier("x".into())));
}

#[test]
fn duplicate_class_produces_one_diagnostic() {
    let source = "class M{ public static void main(String[] a){} } class A{} class A{}";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].kind, ErrorKind::DuplicateClass("A".into()));
}

#[test]
fn semantic_passes_run_even_after_symbol_errors() {
    // One symbol error and one type error, both reported.
    let source = "class M{ public static void main(String[] a){ System.out.println(true); } } \
                  class A{} class A{}";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    let kinds: Vec<&ErrorKind> = analysis.diagnostics.iter().map(|d| &d.kind).collect();
    assert!(kinds.contains(&&ErrorKind::DuplicateClass("A".into())));
    assert!(kinds.contains(&&ErrorKind::UnprintableType(Type::Boolean)));
}

#[test]
fn pretty_printing_round_trips() {
    let source = r#"
class Main {
    public static void main(String[] args) {
        int[] data;
        int i;
        data = new int[10];
        i = 0;
        while (i < data.length) {
            data[i] = i * i;
            i = i + 1;
        }
        if (!(data[9] == 81) || false)
            System.out.println(0);
        else {
            boolean done;
            done = true;
            if (done && true) System.out.println(new Summer().total(data));
        }
    }
}

class Summer {
    int carry;

    public int total(int[] values) {
        int i;
        int sum;
        i = 0;
        sum = 0 - carry;
        while (i < values.length) {
            sum = sum + values[i];
            i = i + 1;
        }
        return sum;
    }
}
"#;

    let first = parse(source).expect("Failed to parse");
    let printed = AstPrinter::new().print(&first);
    let second = parse(&printed).unwrap_or_else(|e| panic!("reparse failed: {}\n{}", e, printed));
    let reprinted = AstPrinter::new().print(&second);
    assert_eq!(printed, reprinted);

    // The round trip preserves semantics too.
    let analysis = mjc::analyze(&printed).expect("pipeline failed");
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn graph_output_is_well_formed() {
    let source = "class M{ public static void main(String[] a){ System.out.println(1+2); } }";
    let program = parse(source).expect("Failed to parse");
    let dot = GraphPrinter::new().print(&program);

    assert!(dot.starts_with("digraph ast {"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains("MainClass M"));
    assert!(dot.contains("->"));
}

#[test]
fn analyze_reads_from_disk_like_the_driver() {
    let source = "class M{ public static void main(String[] a){ System.out.println(42); } }";

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(source.as_bytes()).expect("write source");

    let read_back = fs::read_to_string(file.path()).expect("read source");
    let analysis = mjc::analyze(&read_back).expect("pipeline failed");
    assert!(!analysis.has_errors());
}

#[test]
fn well_typed_program_has_no_undefined_types() {
    let source = "class M{ public static void main(String[] a){ \
                  System.out.println(new P().get()); } } \
                  class P{ int v; public int get(){ return v; } }";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert!(analysis.diagnostics.is_empty());
    assert!(analysis.types.is_fully_typed());
}

#[test]
fn ill_typed_program_leaves_undefined_marks() {
    let source = "class M{ public static void main(String[] a){ int x; x = new X(); } }";

    let analysis = mjc::analyze(source).expect("pipeline failed");
    assert!(analysis.has_errors());
    assert!(!analysis.types.is_fully_typed());
}
