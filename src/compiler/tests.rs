use inkwell::context::Context;
use pretty_assertions::assert_eq;

use crate::{compile_source, errors::errors::Error, SourceFile};

fn compile_str(source: &str) -> Result<String, Error> {
    let context = Context::create();
    let module = compile_source(&SourceFile::new("test.arco", source), &context)?;
    Ok(module.print_to_string().to_string())
}

fn ir(source: &str) -> String {
    match compile_str(source) {
        Ok(ir) => ir,
        Err(error) => panic!("failed to compile {:?}: {}", source, error),
    }
}

fn assert_contains(ir: &str, fragments: &[&str]) {
    for fragment in fragments {
        assert!(ir.contains(fragment), "missing {:?} in:\n{}", fragment, ir);
    }
}

#[test]
fn test_module_is_named_after_the_file() {
    let ir = ir("fun main() of int = 0\n");
    assert_contains(&ir, &["; ModuleID = 'test'", "define i32 @main()", "ret i32 0"]);
}

#[test]
fn test_function_calls() {
    let ir = ir("fun add(a of int, b of int) of int = a + b\nfun main() of int = add(1, 2)\n");

    assert_contains(
        &ir,
        &[
            "define i32 @add(i32 %0, i32 %1)",
            "%a = alloca i32",
            "%b = alloca i32",
            "add i32",
            "call i32 @add(i32 1, i32 2)",
        ],
    );
}

#[test]
fn test_forward_and_recursive_calls() {
    let ir = ir(
        "fun main() of int = fact(5)\nfun fact(n of int) of int = if n <= 1 then 1 else n * fact(n - 1)\n",
    );

    assert_contains(&ir, &["call i32 @fact(i32 5)", "icmp sle i32", "mul i32"]);
    assert_eq!(ir.matches("define i32 @fact").count(), 1);
}

#[test]
fn test_local_variables() {
    let ir = ir("fun main() of int = {\n var x = 1\n x = x + 41\n x\n}\n");

    assert_contains(
        &ir,
        &["%x = alloca i32", "store i32 1, i32* %x", "load i32, i32* %x", "add i32"],
    );
}

#[test]
fn test_shadowed_variables_get_their_own_slots() {
    let ir = ir("fun main() of int = {\n let x = 1\n let y = {\n  let x = 2.5\n  x\n }\n x\n}\n");

    assert_contains(&ir, &["alloca i32", "alloca double", "store double 2.500000e+00"]);
}

#[test]
fn test_while_loop_blocks() {
    let ir = ir("fun main() of int = {\n var i = 0\n while i < 10 {\n  i = i + 1\n }\n i\n}\n");

    assert_contains(
        &ir,
        &[
            "br label %while.cond",
            "while.cond:",
            "icmp slt i32",
            "while.body:",
            "while.end:",
        ],
    );
    assert_eq!(ir.matches("br label %while.cond").count(), 2);
}

#[test]
fn test_if_expression_phi() {
    let ir = ir("fun pick(c of bool) of int = if c then 1 else 2\n");

    assert_contains(
        &ir,
        &["then:", "else:", "ifcont:", "phi i32 [ 1, %then ], [ 2, %else ]"],
    );
}

#[test]
fn test_unit_if_has_no_phi() {
    let ir = ir("fun log(c of bool) of unit = if c then printf(\"yes\")\n");

    assert_contains(&ir, &["define void @log(i1 %0)", "then:", "ifcont:", "ret void"]);
    assert!(!ir.contains("phi"));
    assert!(!ir.contains("else:"));
}

#[test]
fn test_printf_promotions() {
    let ir = ir("fun main() of int = {\n printf(\"%d %c %f\\n\", 42, 'a', 1.5)\n 0\n}\n");

    assert_contains(
        &ir,
        &[
            "declare i32 @printf(i8*, ...)",
            "call i32 (i8*, ...) @printf(",
            "i32 42, i32 97, double 1.500000e+00)",
        ],
    );
}

#[test]
fn test_variadic_externs() {
    let ir = ir(
        "external fun sum(count of int, ...) of int\nfun main() of int = sum(2, 'a', true)\n",
    );

    assert_contains(
        &ir,
        &["declare i32 @sum(i32, ...)", "call i32 (i32, ...) @sum(i32 2, i32 97, i32 1)"],
    );
}

#[test]
fn test_string_operators() {
    let ir = ir(
        "fun same(a of string, b of string) of bool = a == b\n\
         fun before(a of string, b of string) of bool = a < b\n\
         fun join(a of string, b of string) of string = a ^ b\n",
    );

    assert_contains(
        &ir,
        &[
            "call i32 @strcmp",
            "icmp eq i32",
            "icmp slt i32",
            "call i64 @strlen",
            "call i8* @malloc",
            "call i8* @strcpy",
            "call i8* @strcat",
        ],
    );
    assert_eq!(ir.matches("declare i32 @strcmp").count(), 1);
}

#[test]
fn test_float_char_and_bool_operators() {
    let ir = ir(
        "fun lt(a of float, b of float) of bool = a < b\n\
         fun neg(a of float) of float = -a % a\n\
         fun lower(a of char, b of char) of bool = a < b\n\
         fun logic(a of bool, b of bool) of bool = not a and b or a == b\n\
         fun div(a of int, b of int) of int = -a / b % a\n",
    );

    assert_contains(
        &ir,
        &[
            "fcmp olt double",
            "fneg double",
            "frem double",
            "icmp ult i8",
            "xor i1",
            "and i1",
            "or i1",
            "icmp eq i1",
            "sub i32 0",
            "sdiv i32",
            "srem i32",
        ],
    );
}

#[test]
fn test_unit_values() {
    let ir = ir(
        "fun nothing(u of unit) of unit = u\nfun main() of int = {\n let u = nothing({})\n nothing(u)\n 0\n}\n",
    );

    assert_contains(&ir, &["define void @nothing({} %0)", "call void @nothing({} zeroinitializer)"]);
    assert!(!ir.contains("%u = alloca"));
}

#[test]
fn test_module_level_globals() {
    let ir = ir(
        "let answer = 42\n\
         internal var counter = -1\n\
         let ratio = +0.5\n\
         let greeting = \"hi\"\n\
         internal fun helper() of int = answer\n\
         fun main() of int = {\n counter = counter + helper()\n counter\n}\n",
    );

    assert_contains(
        &ir,
        &[
            "@answer = constant i32 42",
            "@counter = internal global i32 -1",
            "@ratio = constant double 5.000000e-01",
            "@greeting = constant i8*",
            "c\"hi\\00\"",
            "define internal i32 @helper()",
            "load i32, i32* @counter",
            "store i32",
        ],
    );
}

#[test]
fn test_non_constant_global_initializer() {
    let error = compile_str("fun one() of int = 1\nlet x = one()\n").unwrap_err();

    assert_eq!(error.get_error_name(), "CodegenError");
    assert_eq!(
        error.get_message(),
        "Codegen Error: module-level initializers must be constant"
    );
    assert_eq!(error.get_span().start.line, 2);
    assert_eq!(error.get_span().start.column, 9);
}

#[test]
fn test_external_named_like_a_runtime_function() {
    let ir = ir(
        "external fun strlen(s of string) of int\n\
         fun main() of int = {\n let s = \"a\" ^ \"b\"\n strlen(s)\n}\n",
    );

    assert_contains(
        &ir,
        &[
            "declare i32 @strlen(i8*)",
            "bitcast (i32 (i8*)* @strlen to i64 (i8*)*)",
            "call i32 @strlen(",
        ],
    );
    assert!(!ir.contains("@strlen."));
}

#[test]
fn test_definitions_named_like_runtime_functions() {
    let ir = ir(
        "let strcmp = 1\n\
         fun malloc(n of int) of int = n\n\
         fun main() of int = {\n let s = \"a\" ^ \"b\"\n if s == \"ab\" then strcmp else malloc(2)\n}\n",
    );

    assert_contains(
        &ir,
        &[
            "@strcmp.",
            "define i32 @malloc.",
            "call i32 @malloc.",
            "declare i8* @malloc(i64)",
            "call i8* @malloc(i64",
            "declare i32 @strcmp(i8*, i8*)",
            "call i32 @strcmp(",
        ],
    );
    assert!(!ir.contains("declare i32 @strcmp."));
    assert!(!ir.contains("declare i8* @malloc."));
}

#[test]
fn test_nested_externals_keep_their_name() {
    let ir = ir("fun main() of int = {\n external fun abs(x of int) of int\n abs(-3)\n}\n");

    assert_contains(&ir, &["declare i32 @abs(i32)", "call i32 @abs(i32"]);
    assert!(!ir.contains("@abs."));
}

#[test]
fn test_nested_functions_are_renamed() {
    let ir = ir(
        "fun main() of int = {\n fun twice(x of int) of int = x * 2\n twice(21)\n}\nfun twice(x of int) of int = x\n",
    );

    assert_contains(&ir, &["define i32 @twice(i32 %0)", "define i32 @twice.", "call i32 @twice."]);
}
