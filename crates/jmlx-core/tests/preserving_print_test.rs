//! Integration tests for printing edited trees while keeping untouched text

use jmlx_core::{ChangeTracker, NodeKind, ParserConfiguration, PrettyPrinter, PrinterConfiguration, Property, parse};

const COUNTER: &str = "public class Counter {
    // current value
    private int  count;

    //@ requires count < 10;
    public void increment() {
        count = count   + 1;
    }
}
";

#[test]
fn untouched_file_is_reproduced_exactly() {
    let mut parsed = parse(COUNTER, &ParserConfiguration::default()).unwrap();
    let mut tracker = ChangeTracker::attach(&mut parsed.ast);
    let printed = PrettyPrinter::preserving(&PrinterConfiguration::default(), tracker.touched())
        .print(&parsed.ast, parsed.root)
        .unwrap();
    assert_eq!(printed, COUNTER);
}

#[test]
fn edits_only_reprint_what_changed() {
    let source = "public class Counter {
    // current value
    private int  count;

    public void increment() {
        count = count   + 1;
    }
}
";
    let mut parsed = parse(source, &ParserConfiguration::default()).unwrap();
    let ast = &mut parsed.ast;
    let mut tracker = ChangeTracker::attach(ast);
    let method = ast.find_all(parsed.root, NodeKind::MethodDeclaration)[0];
    let name = ast.child(method, Property::Name).unwrap();
    ast.set_value(name, Property::Identifier, "bump").unwrap();

    let printed = PrettyPrinter::preserving(&PrinterConfiguration::default(), tracker.touched())
        .print(ast, parsed.root)
        .unwrap();
    // the odd spacing inside untouched nodes survives
    assert_eq!(
        printed,
        "public class Counter {

    // current value
    private int  count;

    public void bump() {
        count = count   + 1;
    }
}
"
    );
}

#[test]
fn plain_printing_normalises_layout() {
    let parsed = parse(COUNTER, &ParserConfiguration::default()).unwrap();
    let printed = PrettyPrinter::new(&PrinterConfiguration::default())
        .print(&parsed.ast, parsed.root)
        .unwrap();
    assert!(printed.contains("    private int count;\n"), "{printed}");
    assert!(printed.contains("        count = count + 1;\n"), "{printed}");
    assert!(printed.contains("    //@ requires count < 10;\n    public void increment() {"));
}

#[test]
fn declaration_order_when_interleaving_is_off() {
    let source = "class A {
    void f() {
        a();
        // between

        b();
    }
}
";
    let mut parsed = parse(source, &ParserConfiguration::default()).unwrap();
    let ast = &mut parsed.ast;
    let body = ast.find_all(parsed.root, NodeKind::BlockStmt)[0];
    assert_eq!(ast.orphan_comments(body).len(), 1);

    let empty = ast.build(NodeKind::EmptyStmt).finish().unwrap();
    ast.list_insert(body, Property::Statements, 0, empty).unwrap();

    let in_place = PrettyPrinter::new(&PrinterConfiguration::default())
        .print(ast, parsed.root)
        .unwrap();
    assert!(
        in_place.contains("{\n        ;\n        a();\n        // between\n        b();\n    }"),
        "{in_place}"
    );

    let config = PrinterConfiguration {
        position_interleaving: false,
        ..PrinterConfiguration::default()
    };
    let appended = PrettyPrinter::new(&config).print(ast, parsed.root).unwrap();
    assert!(
        appended.contains("{\n        ;\n        a();\n        b();\n        // between\n    }"),
        "{appended}"
    );
}
