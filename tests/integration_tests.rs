//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public pipeline from source text through parsing,
//! semantic analysis and LLVM IR generation, and run the result through the
//! JIT where the host supports it.

use arco::{analyze, compile_source, compiler::compiler::compile, display_error, SourceFile};
use inkwell::{
    context::Context,
    targets::{InitializationConfig, Target},
    OptimizationLevel,
};
use pretty_assertions::assert_eq;

const FIB: &str = "\
# Iterative Fibonacci
internal let limit = 10

fun fib(n of int) of int = {
    var a = 0
    var b = 1
    var i = 0
    while i < n {
        let next = a + b
        a = b
        b = next
        i = i + 1
    }
    a
}

fun main() of int = fib(limit)
";

fn source(text: &str) -> SourceFile {
    SourceFile::new("test.arco", text)
}

fn emit(text: &str) -> String {
    let context = Context::create();
    let ir = match compile_source(&source(text), &context) {
        Ok(module) => module.print_to_string().to_string(),
        Err(error) => panic!("{}", display_error(&error, &source(text))),
    };
    ir
}

fn diagnostic(text: &str) -> String {
    let context = Context::create();
    let rendered = match compile_source(&source(text), &context) {
        Ok(_) => panic!("expected {:?} to fail", text),
        Err(error) => display_error(&error, &source(text)),
    };
    rendered
}

/// Runs `main` through the JIT. Returns `None` when the host can't JIT.
fn run(text: &str) -> Option<i32> {
    Target::initialize_native(&InitializationConfig::default()).ok()?;

    let context = Context::create();
    let module = match compile_source(&source(text), &context) {
        Ok(module) => module,
        Err(error) => panic!("{}", display_error(&error, &source(text))),
    };

    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .ok()?;
    let main = unsafe { engine.get_function::<unsafe extern "C" fn() -> i32>("main") }
        .unwrap_or_else(|error| panic!("main wasn't emitted: {:?}", error));

    Some(unsafe { main.call() })
}

#[test]
fn test_compile_program() {
    let ir = emit(FIB);

    for fragment in [
        "; ModuleID = 'test'",
        "@limit = internal constant i32 10",
        "define i32 @fib(i32 %0)",
        "define i32 @main()",
        "while.cond:",
        "while.body:",
        "while.end:",
        "load i32, i32* @limit",
        "call i32 @fib(i32",
    ] {
        assert!(ir.contains(fragment), "missing {:?} in:\n{}", fragment, ir);
    }

    // The body's value is returned directly, nothing is synthesized.
    assert!(!ir.contains("ret i32 0"));
}

#[test]
fn test_compile_after_analysis() {
    let analysis = match analyze(&source(FIB)) {
        Ok(analysis) => analysis,
        Err(error) => panic!("{}", error),
    };

    let context = Context::create();
    let module = compile(&analysis.ast, &analysis.scopes, &analysis.types, &context)
        .unwrap_or_else(|error| panic!("{}", error));

    assert_eq!(module.get_name().to_str(), Ok("test"));
    assert!(module.get_function("fib").is_some());
    assert!(module.get_function("main").is_some());
    assert!(module.get_function("printf").is_some());
}

#[test]
fn test_resolution_error_diagnostic() {
    assert_eq!(
        diagnostic("let x = y + 1"),
        "test.arco:1:9: Unknown Identifier: y\n 1 | let x = y + 1\n   |         ^\n"
    );
}

#[test]
fn test_type_error_diagnostic() {
    assert_eq!(
        diagnostic("fun main() of string = \"x\""),
        "test.arco:1:15: Type Error: The main function has to have a return type of int\n \
         1 | fun main() of string = \"x\"\n   |               ^^^^^^\n"
    );
}

#[test]
fn test_codegen_error_diagnostic() {
    assert_eq!(
        diagnostic("fun one() of int = 1\nlet x = one()\n"),
        "test.arco:2:9: Codegen Error: module-level initializers must be constant\n \
         2 | let x = one()\n   |         ^^^^^\n"
    );
}

#[test]
fn test_each_phase_reports_errors() {
    let cases = [
        ("let s = \"\\q\"", "SyntaxError"),
        ("let x = (1 + 2", "SyntaxError"),
        ("fun main() of int = 0\nfun main() of int = 1", "DoubleDefinition"),
        ("fun main() of int = {\n let a = 1\n a = 2\n a\n}", "NotReassignable"),
        ("printf(\"hi\")", "ModuleCollectorError"),
        ("let x of int = 1.5", "AnnoMismatch"),
        ("fun main() of int = main()", "EntryPointCall"),
    ];

    for (text, expected) in cases {
        let context = Context::create();
        match compile_source(&source(text), &context) {
            Ok(_) => panic!("expected {:?} to fail", text),
            Err(error) => assert_eq!(error.get_error_name(), expected, "{}", error),
        };
    }
}

#[test]
fn test_run_fibonacci() {
    if let Some(code) = run(FIB) {
        assert_eq!(code, 55);
    }
}

#[test]
fn test_run_strings_and_chars() {
    let program = "\
fun main() of int = {
    let greeting = \"Hello, \" ^ \"world\"
    let same = greeting == \"Hello, world\"
    let ordered = 'a' < 'b' and \"abc\" < \"abd\"
    if same and ordered then 1 else 0
}
";

    if let Some(code) = run(program) {
        assert_eq!(code, 1);
    }
}

#[test]
fn test_run_nested_functions_and_floats() {
    let program = "\
fun half(x of float) of float = x / 2.0

fun main() of int = {
    fun square(x of int) of int = x * x

    var total = 0
    var i = 1
    while i <= 3 {
        total = total + square(i)
        i = i + 1
    }

    if half(5.0) > 2.4 then total else -1
}
";

    if let Some(code) = run(program) {
        assert_eq!(code, 14);
    }
}
