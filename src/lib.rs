#![allow(clippy::module_inception)]

use std::{fs, io, path::Path, rc::Rc};

use inkwell::{context::Context, module::Module};

use crate::{
    ast::ast::Stmt,
    compiler::compiler::compile,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    sema::{module_collector::collect, name_resolution::resolve, scope::ScopeTree},
    type_checker::type_checker::type_check,
    types::types::TypeUniverse,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod sema;
pub mod type_checker;
pub mod types;

extern crate regex;

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A source range. `start.column` is inclusive, `end.column` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub file: Rc<String>,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(file: Rc<String>, start: Position, end: Position) -> Self {
        Span { file, start, end }
    }

    pub fn null() -> Self {
        Span {
            file: Rc::new(String::from("<null>")),
            start: Position::default(),
            end: Position::default(),
        }
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            file: Rc::clone(&self.file),
            start: self.start,
            end: other.end,
        }
    }

    /// Returns a single-line span `width` columns wide, `offset` columns into `self`.
    pub fn slice(&self, offset: u32, width: u32) -> Span {
        let column = self.start.column + offset;
        Span {
            file: Rc::clone(&self.file),
            start: Position::new(self.start.line, column),
            end: Position::new(self.start.line, column + width),
        }
    }
}

/// Source text split into lines, each line ending in `\n`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: Rc<String>,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(name: &str, text: &str) -> Self {
        let mut lines: Vec<String> = text
            .split_inclusive('\n')
            .map(|line| {
                if line.ends_with('\n') {
                    line.to_string()
                } else {
                    format!("{}\n", line)
                }
            })
            .collect();

        if lines.is_empty() {
            lines.push(String::from("\n"));
        }

        SourceFile {
            name: Rc::new(name.to_string()),
            lines,
        }
    }

    pub fn open(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(SourceFile::new(&path.to_string_lossy(), &text))
    }

    pub fn get_line(&self, line: u32) -> Option<&str> {
        (line as usize)
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The file name without directories or extension.
    pub fn module_name(&self) -> String {
        Path::new(self.name.as_str())
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("module"))
    }

    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Renders an error as a three line diagnostic.
///
/// ```text
/// test.arco:2:9: Unknown Identifier: y
///  2 | let x = y + 1
///    |         ^
/// ```
pub fn display_error(error: &Error, source: &SourceFile) -> String {
    let span = error.get_span();
    let line_text = source.get_line(span.start.line).unwrap_or("\n");
    let line_number = span.start.line.to_string();

    let width = if span.end.line == span.start.line {
        span.end.column.saturating_sub(span.start.column)
    } else {
        (line_text.trim_end_matches('\n').chars().count() as u32 + 1).saturating_sub(span.start.column)
    };

    format!(
        "{}\n {} | {}{}  | {}{}\n",
        error,
        line_number,
        line_text,
        " ".repeat(line_number.len()),
        " ".repeat(span.start.column.saturating_sub(1) as usize),
        "^".repeat(width.max(1) as usize)
    )
}

/// The analysed program: its AST plus the tables the passes filled in.
#[derive(Debug)]
pub struct Analysis {
    pub ast: Vec<Stmt>,
    pub scopes: ScopeTree,
    pub types: TypeUniverse,
}

/// Tokenizes and parses a source file.
pub fn parse_source(source: &SourceFile) -> Result<Vec<Stmt>, Error> {
    let tokens = tokenize(&source.text(), Rc::clone(&source.name))?;
    parse(tokens, Rc::clone(&source.name))
}

/// Runs every pass up to and including type checking.
pub fn analyze(source: &SourceFile) -> Result<Analysis, Error> {
    let ast = parse_source(source)?;
    analyze_ast(ast, &source.module_name())
}

/// Runs the semantic passes over an already parsed module.
pub fn analyze_ast(mut ast: Vec<Stmt>, module_name: &str) -> Result<Analysis, Error> {
    let mut scopes = ScopeTree::new(module_name);
    let mut types = TypeUniverse::new();

    collect(&mut ast, &mut scopes)?;
    resolve(&mut ast, &mut scopes)?;
    type_check(&mut ast, &mut scopes, &mut types)?;

    Ok(Analysis { ast, scopes, types })
}

/// Compiles a source file into a verified LLVM module.
pub fn compile_source<'ctx>(source: &SourceFile, context: &'ctx Context) -> Result<Module<'ctx>, Error> {
    let analysis = analyze(source)?;
    compile(&analysis.ast, &analysis.scopes, &analysis.types, context)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::SourceFile;

    #[test]
    fn test_source_file_lines() {
        let source = SourceFile::new("test.arco", "let a = 1\nlet b = 2");
        assert_eq!(source.len(), 2);
        assert_eq!(source.get_line(1), Some("let a = 1\n"));
        assert_eq!(source.get_line(2), Some("let b = 2\n"));
        assert_eq!(source.get_line(3), None);
        assert_eq!(source.get_line(0), None);
    }

    #[test]
    fn test_empty_source_file() {
        let source = SourceFile::new("empty.arco", "");
        assert_eq!(source.len(), 1);
        assert_eq!(source.text(), "\n");
    }
}
