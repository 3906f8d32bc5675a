use std::{fs, path::PathBuf, process, time::Instant};

use arco::{
    analyze_ast, compiler::compiler::compile, display_error, errors::errors::Error, parse_source,
    sema::ENTRY_POINT, SourceFile,
};
use clap::Parser;
use inkwell::{
    context::Context,
    module::Module,
    targets::{InitializationConfig, Target},
    OptimizationLevel,
};

#[derive(Parser, Debug)]
#[command(name = "arco")]
#[command(about = "Compiler for the arco language", long_about = None)]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Print the parsed AST and exit
    #[arg(long)]
    ast: bool,

    /// Print the generated LLVM IR instead of running the program
    #[arg(long = "emit-llvm")]
    emit_llvm: bool,

    /// Write the generated LLVM IR to a file instead of running the program
    #[arg(short = 'o', value_name = "OUT")]
    output: Option<PathBuf>,
}

/// Only sets up logging when `RUST_LOG` asks for it.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let source = match SourceFile::open(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", cli.file.display(), error);
            process::exit(1);
        }
    };

    let context = Context::create();
    let module = match build(&cli, &source, &context) {
        Ok(Some(module)) => module,
        Ok(None) => return,
        Err(error) => {
            print!("{}", display_error(&error, &source));
            process::exit(1);
        }
    };

    let ir = module.print_to_string().to_string();

    if let Some(output) = &cli.output {
        if let Err(error) = fs::write(output, &ir) {
            eprintln!("Failed to write {}: {}", output.display(), error);
            process::exit(1);
        }
    }

    if cli.emit_llvm {
        print!("{}", ir);
    }

    if cli.emit_llvm || cli.output.is_some() {
        return;
    }

    match execute(&module) {
        Ok(code) => process::exit(code),
        Err(message) => {
            eprintln!("Failed to run {}: {}", cli.file.display(), message);
            process::exit(1);
        }
    }
}

/// Runs the pipeline. Returns `None` when only the AST was asked for.
fn build<'ctx>(
    cli: &Cli,
    source: &SourceFile,
    context: &'ctx Context,
) -> Result<Option<Module<'ctx>>, Error> {
    let start = Instant::now();

    let ast = parse_source(source)?;
    tracing::info!(elapsed = ?start.elapsed(), "parsed");

    if cli.ast {
        println!("{:#?}", ast);
        return Ok(None);
    }

    let analysis_start = Instant::now();
    let analysis = analyze_ast(ast, &source.module_name())?;
    tracing::info!(elapsed = ?analysis_start.elapsed(), "analyzed");

    let compile_start = Instant::now();
    let module = compile(&analysis.ast, &analysis.scopes, &analysis.types, context)?;
    tracing::info!(elapsed = ?compile_start.elapsed(), "generated IR");
    tracing::info!(elapsed = ?start.elapsed(), "total");

    Ok(Some(module))
}

/// JIT compiles the module and calls its entry point.
fn execute(module: &Module) -> Result<i32, String> {
    Target::initialize_native(&InitializationConfig::default())?;

    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|error| error.to_string())?;

    let main = unsafe { engine.get_function::<unsafe extern "C" fn() -> i32>(ENTRY_POINT) }
        .map_err(|error| format!("{:?}", error))?;

    Ok(unsafe { main.call() })
}
