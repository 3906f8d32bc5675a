use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::BlockExpr,
    },
    errors::errors::{Error, ErrorImpl},
    parse_source,
    sema::{
        module_collector::collect,
        name_resolution::resolve,
        scope::{ScopeKind, ScopeTree},
        symbol::SymbolKind,
    },
    SourceFile,
};

fn run(source: &str) -> Result<(Vec<Stmt>, ScopeTree), Error> {
    let source = SourceFile::new("test.arco", source);
    let mut ast = parse_source(&source)?;
    let mut scopes = ScopeTree::new("test");

    collect(&mut ast, &mut scopes)?;
    resolve(&mut ast, &mut scopes)?;
    Ok((ast, scopes))
}

fn run_err(source: &str) -> Error {
    match run(source) {
        Ok(_) => panic!("expected name resolution to fail"),
        Err(error) => error,
    }
}

fn fn_body(stmt: &Stmt) -> &BlockExpr {
    match stmt {
        Stmt::FnDecl(decl) => match &decl.body {
            Expr::Block(block) => block,
            other => panic!("expected a block body, found {:?}", other),
        },
        other => panic!("expected a function, found {:?}", other),
    }
}

fn trailing_symbol(block: &BlockExpr) -> &Expr {
    match block.body.last() {
        Some(Stmt::Expression(stmt)) => &stmt.expression,
        other => panic!("expected a trailing expression, found {:?}", other),
    }
}

fn symbol_of(expr: &Expr) -> crate::sema::symbol::SymbolId {
    match expr {
        Expr::Symbol(symbol) => symbol.symbol.expect("identifier was not resolved"),
        other => panic!("expected an identifier, found {:?}", other),
    }
}

#[test]
fn test_scope_tree_lookup() {
    let mut scopes = ScopeTree::new("test");
    let module = scopes.module_scope();
    let span = crate::Span::null();

    let outer = scopes.add_var(module, "a", true, false, &span).unwrap();
    let block = scopes.push_scope(module, ScopeKind::Block);
    assert_eq!(scopes.resolve(block, "a"), Some(outer));

    let inner = scopes.add_var(block, "a", false, false, &span).unwrap();
    assert_eq!(scopes.resolve(block, "a"), Some(inner));
    assert_eq!(scopes.resolve(module, "a"), Some(outer));
    assert_eq!(scopes.resolve(block, "b"), None);

    assert!(!scopes.can_be_reassigned(outer));
    assert!(scopes.can_be_reassigned(inner));
    assert!(scopes.is_global(outer));
    assert!(!scopes.is_global(inner));
}

#[test]
fn test_scope_tree_double_definition() {
    let mut scopes = ScopeTree::new("test");
    let module = scopes.module_scope();
    let span = crate::Span::null();

    scopes.add_var(module, "a", true, false, &span).unwrap();
    let error = scopes.add_param(module, "a", &span).unwrap_err();
    assert_eq!(
        error.get_error(),
        &ErrorImpl::DoubleDefinition {
            id: String::from("a")
        }
    );
}

#[test]
fn test_module_name_is_not_resolvable() {
    let scopes = ScopeTree::new("test");
    assert_eq!(scopes.module_name(), "test");
    assert_eq!(scopes.resolve(scopes.module_scope(), "test"), None);
}

#[test]
#[should_panic]
fn test_get_symbol_before_resolution_panics() {
    let scopes = ScopeTree::new("test");
    scopes.get_symbol(scopes.module_scope(), "missing");
}

#[test]
fn test_collector_registers_forward_functions() {
    let (ast, scopes) = run(
        "fun main() of int = later(1)\n\
         fun later(a of int) of int = a\n",
    )
    .unwrap();

    let later = scopes.resolve(scopes.module_scope(), "later").unwrap();
    assert!(scopes.is_function(later));

    match &ast[0] {
        Stmt::FnDecl(decl) => match &decl.body {
            Expr::Call(call) => assert_eq!(call.symbol, Some(later)),
            other => panic!("expected a call, found {:?}", other),
        },
        other => panic!("expected a function, found {:?}", other),
    }
}

#[test]
fn test_collector_rejects_module_level_expressions() {
    let error = run_err("1 + 2\n");
    assert_eq!(error.get_error(), &ErrorImpl::ModuleCollectorError);

    let error = run_err("var a = 1\na = 2\n");
    assert_eq!(error.get_error(), &ErrorImpl::ModuleCollectorError);
    assert_eq!(error.get_span().start.line, 2);
}

#[test]
fn test_collector_rejects_external_main() {
    let error = run_err("external fun main() of int\n");
    assert_eq!(error.get_error(), &ErrorImpl::ExternalEntryPoint);
}

#[test]
fn test_printf_is_builtin() {
    run("external fun printf(format of string, ...) of unit\n\
         fun main() of int = {\n printf(\"%d\", 1)\n 0\n}\n")
    .unwrap();

    let error = run_err("fun printf() of unit = {}\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::DoubleDefinition {
            id: String::from("printf")
        }
    );
}

#[test]
fn test_shadowing_resolves_innermost() {
    let (ast, scopes) = run(
        "fun main() of int = {\n\
           let x = 1\n\
           let y = { let x = 2\n x }\n\
           x\n\
         }\n",
    )
    .unwrap();

    let body = fn_body(&ast[0]);
    let outer = symbol_of(trailing_symbol(body));

    let inner = match &body.body[1] {
        Stmt::VarDecl(decl) => match &decl.value {
            Expr::Block(block) => symbol_of(trailing_symbol(block)),
            other => panic!("expected a block, found {:?}", other),
        },
        other => panic!("expected a declaration, found {:?}", other),
    };

    assert!(outer != inner);
    assert_eq!(scopes.symbol(outer).name, "x");
    assert_eq!(scopes.symbol(inner).name, "x");

    // The outer `x` lives in the function body block, the inner one in the nested block.
    let body_scope = body.scope.unwrap();
    assert_eq!(scopes.symbol(outer).scope, body_scope);
    assert_eq!(scopes.scope(scopes.symbol(inner).scope).parent, Some(body_scope));
}

#[test]
fn test_double_definition_in_one_block() {
    let error = run_err("fun main() of int = {\n let x = 1\n let x = 2\n x\n}\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::DoubleDefinition {
            id: String::from("x")
        }
    );
    assert_eq!(error.get_span().start.line, 3);
}

#[test]
fn test_redeclaration_in_nested_block() {
    run("fun main() of int = {\n let x = 1\n { let x = 2 }\n x\n}\n").unwrap();
}

#[test]
fn test_unknown_identifier() {
    let error = run_err("fun main() of int = y\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnknownIdentifier {
            id: String::from("y")
        }
    );
    assert_eq!(error.get_span().start.column, 21);

    let error = run_err("fun main() of int = missing()\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnknownIdentifier {
            id: String::from("missing")
        }
    );
}

#[test]
fn test_wrong_symbol_kind() {
    let error = run_err("fun f() of int = 1\nfun main() of int = f\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::WrongSymbolKind {
            id: String::from("f"),
            kind: String::from("function"),
        }
    );

    let error = run_err("fun main(a of int) of int = a()\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::WrongSymbolKind {
            id: String::from("a"),
            kind: String::from("function parameter"),
        }
    );
}

#[test]
fn test_entry_point_call() {
    let error = run_err("fun f() of int = main()\nfun main() of int = 0\n");
    assert_eq!(error.get_error(), &ErrorImpl::EntryPointCall);
}

#[test]
fn test_assignment_targets() {
    run("fun main() of int = {\n var a = 1\n a = 2\n a\n}\n").unwrap();
    run("fun main(a of int) of int = {\n a = 2\n a\n}\n").unwrap();

    let error = run_err("fun main() of int = {\n let a = 1\n a = 2\n a\n}\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotReassignable {
            id: String::from("a")
        }
    );
}

#[test]
fn test_self_reference_resolves() {
    let (ast, _) = run("fun main() of int = {\n let x = x\n 0\n}\n").unwrap();
    let body = fn_body(&ast[0]);

    match &body.body[0] {
        Stmt::VarDecl(decl) => assert_eq!(Some(symbol_of(&decl.value)), decl.symbol),
        other => panic!("expected a declaration, found {:?}", other),
    }
}

#[test]
fn test_nested_functions() {
    let (_, scopes) = run(
        "let offset = 10\n\
         fun main() of int = {\n\
           fun add(a of int) of int = a + offset\n\
           add(1)\n\
         }\n",
    )
    .unwrap();

    let main = scopes.resolve(scopes.module_scope(), "main").unwrap();
    assert!(matches!(
        scopes.symbol(main).kind,
        SymbolKind::Function { .. }
    ));

    let error = run_err(
        "fun main() of int = {\n\
           let local = 1\n\
           fun get() of int = local\n\
           get()\n\
         }\n",
    );
    assert_eq!(
        error.get_error(),
        &ErrorImpl::IllegalCapture {
            id: String::from("local")
        }
    );
}

#[test]
fn test_externals_are_marked() {
    let (ast, scopes) = run(
        "external fun puts(s of string) of int\n\
         fun main() of int = {\n\
           external fun abs(x of int) of int\n\
           abs(puts(\"hi\"))\n\
         }\n",
    )
    .unwrap();

    let puts = scopes.resolve(scopes.module_scope(), "puts").unwrap();
    assert!(scopes.symbol(puts).is_external());

    let main = scopes.resolve(scopes.module_scope(), "main").unwrap();
    assert!(!scopes.symbol(main).is_external());

    let abs = match &fn_body(&ast[1]).body[0] {
        Stmt::ExternDecl(decl) => decl.signature.symbol.unwrap(),
        other => panic!("expected an external declaration, found {:?}", other),
    };
    assert!(scopes.symbol(abs).is_external());
    assert!(!scopes.is_global(abs));
}
