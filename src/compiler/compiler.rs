use std::collections::HashMap;

use inkwell::{
    basic_block::BasicBlock,
    builder::{Builder, BuilderError},
    context::Context,
    module::{Linkage, Module},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType, PointerType, StructType},
    values::{
        BasicMetadataValueEnum, BasicValueEnum, CallSiteValue, CallableValue, FunctionValue,
        PointerValue,
    },
    AddressSpace,
};

use crate::{
    ast::{ast::Stmt, statements::FnSignature},
    errors::errors::Error,
    sema::{scope::ScopeTree, symbol::SymbolId},
    type_checker::format::PRINT_BUILTIN,
    types::types::{Type, TypeId, TypeUniverse},
    Span,
};

use super::stmt::gen_statement;

/// Turns inkwell builder failures into codegen errors at a source location.
pub trait LlvmResultExt<T> {
    fn at(self, span: &Span) -> Result<T, Error>;
}

impl<T> LlvmResultExt<T> for Result<T, BuilderError> {
    fn at(self, span: &Span) -> Result<T, Error> {
        self.map_err(|error| Error::codegen_error(error.to_string(), span))
    }
}

/// C runtime functions the generated code relies on. They are declared on
/// first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFunction {
    Strcmp,
    Strlen,
    Malloc,
    Strcpy,
    Strcat,
}

impl RuntimeFunction {
    pub const ALL: [RuntimeFunction; 5] = [
        RuntimeFunction::Strcmp,
        RuntimeFunction::Strlen,
        RuntimeFunction::Malloc,
        RuntimeFunction::Strcpy,
        RuntimeFunction::Strcat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeFunction::Strcmp => "strcmp",
            RuntimeFunction::Strlen => "strlen",
            RuntimeFunction::Malloc => "malloc",
            RuntimeFunction::Strcpy => "strcpy",
            RuntimeFunction::Strcat => "strcat",
        }
    }
}

/// Names the generated code links against. Definitions in the module
/// must not take them over.
pub fn is_reserved(name: &str) -> bool {
    name == PRINT_BUILTIN || RuntimeFunction::ALL.iter().any(|runtime| runtime.name() == name)
}

/// Code generation state for one module.
///
/// The builder is the single insertion cursor. Storage locations and
/// emitted functions are keyed by the symbols name resolution bound, so
/// shadowed names never collide.
pub struct Compiler<'a, 'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub scopes: &'a ScopeTree,
    pub types: &'a TypeUniverse,
    pub printf: FunctionValue<'ctx>,
    pub named_allocas: HashMap<SymbolId, PointerValue<'ctx>>,
    functions: HashMap<SymbolId, FunctionValue<'ctx>>,
}

impl<'a, 'ctx> Compiler<'a, 'ctx> {
    pub fn new(context: &'ctx Context, scopes: &'a ScopeTree, types: &'a TypeUniverse) -> Self {
        let module = context.create_module(scopes.module_name());
        let builder = context.create_builder();

        // i32 printf(i8*, ...)
        let i8_ptr_type = context.i8_type().ptr_type(AddressSpace::default());
        let printf_type = context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        let printf = module.add_function(PRINT_BUILTIN, printf_type, Some(Linkage::External));

        Compiler {
            context,
            module,
            builder,
            scopes,
            types,
            printf,
            named_allocas: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn string_type(&self) -> PointerType<'ctx> {
        self.context.i8_type().ptr_type(AddressSpace::default())
    }

    /// Unit parameters still need a slot in the LLVM signature.
    pub fn unit_struct_type(&self) -> StructType<'ctx> {
        self.context.struct_type(&[], false)
    }

    /// Maps a value type to its LLVM type. Unit has no representation.
    ///
    /// # Panics
    ///
    /// Panics on function types, which never appear as values.
    pub fn basic_type(&self, ty: TypeId) -> Option<BasicTypeEnum<'ctx>> {
        match self.types.get(ty) {
            Type::Int => Some(self.context.i32_type().into()),
            Type::Float => Some(self.context.f64_type().into()),
            Type::Char => Some(self.context.i8_type().into()),
            Type::String => Some(self.string_type().into()),
            Type::Bool => Some(self.context.bool_type().into()),
            Type::Unit => None,
            Type::Function { .. } => {
                panic!("function types have no value representation")
            }
        }
    }

    fn parameter_type(&self, ty: TypeId) -> BasicMetadataTypeEnum<'ctx> {
        match self.basic_type(ty) {
            Some(basic_type) => basic_type.into(),
            None => self.unit_struct_type().into(),
        }
    }

    /// Lowers a signature. The annotations are enough here, so this works
    /// before the type checker has reached the declaration.
    pub fn function_type(&self, signature: &FnSignature) -> FunctionType<'ctx> {
        let parameters = signature
            .parameters
            .iter()
            .map(|parameter| self.parameter_type(TypeUniverse::from_anno(parameter.anno.kind)))
            .collect::<Vec<BasicMetadataTypeEnum<'ctx>>>();

        match self.basic_type(TypeUniverse::from_anno(signature.return_anno.kind)) {
            Some(return_type) => return_type.fn_type(&parameters, signature.is_variadic),
            None => self
                .context
                .void_type()
                .fn_type(&parameters, signature.is_variadic),
        }
    }

    /// External functions and module-level definitions keep their name.
    /// Nested definitions get the symbol index appended, since the same name
    /// may be declared in several scopes, and so do definitions named like
    /// one of the C functions the generated code calls.
    pub fn symbol_name(&self, symbol: SymbolId) -> String {
        let declared = self.scopes.symbol(symbol);

        if declared.is_external() || (self.scopes.is_global(symbol) && !is_reserved(&declared.name)) {
            declared.name.clone()
        } else {
            format!("{}.{}", declared.name, symbol.index())
        }
    }

    /// The LLVM type calls to a function symbol are built against.
    pub fn declared_type(&self, symbol: SymbolId) -> FunctionType<'ctx> {
        let declared = self.scopes.symbol(symbol);
        let signature = declared
            .signature()
            .unwrap_or_else(|| panic!("{} is not a function", declared.name));
        self.function_type(signature)
    }

    /// Returns the LLVM function for a function symbol, declaring it the
    /// first time it is asked for.
    ///
    /// # Panics
    ///
    /// Panics if the symbol isn't a function.
    pub fn get_function(&mut self, symbol: SymbolId) -> FunctionValue<'ctx> {
        if let Some(function) = self.functions.get(&symbol) {
            return *function;
        }

        let scopes = self.scopes;
        let declared = scopes.symbol(symbol);
        let signature = declared
            .signature()
            .unwrap_or_else(|| panic!("{} is not a function", declared.name));

        let name = self.symbol_name(symbol);
        // Externals share the C symbol with any earlier declaration of it.
        let existing = if declared.is_external() {
            self.module.get_function(&name)
        } else {
            None
        };
        let function = match existing {
            Some(function) => function,
            None => {
                let linkage = if declared.is_internal() {
                    Linkage::Internal
                } else {
                    Linkage::External
                };
                self.module
                    .add_function(&name, self.function_type(signature), Some(linkage))
            }
        };

        tracing::trace!(function = %name, "declared function");
        self.functions.insert(symbol, function);
        function
    }

    pub fn runtime_type(&self, runtime: RuntimeFunction) -> FunctionType<'ctx> {
        let string_type = self.string_type();
        let size_type = self.context.i64_type();

        match runtime {
            RuntimeFunction::Strcmp => self
                .context
                .i32_type()
                .fn_type(&[string_type.into(), string_type.into()], false),
            RuntimeFunction::Strlen => size_type.fn_type(&[string_type.into()], false),
            RuntimeFunction::Malloc => string_type.fn_type(&[size_type.into()], false),
            RuntimeFunction::Strcpy | RuntimeFunction::Strcat => {
                string_type.fn_type(&[string_type.into(), string_type.into()], false)
            }
        }
    }

    /// Declares a runtime function on first use. A user `external` of the
    /// same name is the same C symbol and is reused, whatever signature it
    /// was given.
    pub fn runtime_function(&self, runtime: RuntimeFunction) -> FunctionValue<'ctx> {
        match self.module.get_function(runtime.name()) {
            Some(function) => function,
            None => self.module.add_function(
                runtime.name(),
                self.runtime_type(runtime),
                Some(Linkage::External),
            ),
        }
    }

    /// Calls `function` as if it had `function_type`. The pointer is cast
    /// when the module declared the symbol with another signature.
    pub fn build_call_as(
        &self,
        function: FunctionValue<'ctx>,
        function_type: FunctionType<'ctx>,
        arguments: &[BasicMetadataValueEnum<'ctx>],
        span: &Span,
    ) -> Result<CallSiteValue<'ctx>, Error> {
        if function.get_type() == function_type {
            return self.builder.build_call(function, arguments, "").at(span);
        }

        let pointer = function
            .as_global_value()
            .as_pointer_value()
            .const_cast(function_type.ptr_type(AddressSpace::default()));
        let callable = CallableValue::try_from(pointer)
            .unwrap_or_else(|_| panic!("{:?} is not a function pointer", pointer));

        self.builder.build_call(callable, arguments, "").at(span)
    }

    /// Calls a runtime function and returns its result.
    pub fn call_runtime(
        &self,
        runtime: RuntimeFunction,
        arguments: &[BasicMetadataValueEnum<'ctx>],
        span: &Span,
    ) -> Result<BasicValueEnum<'ctx>, Error> {
        let function = self.runtime_function(runtime);

        self.build_call_as(function, self.runtime_type(runtime), arguments, span)?
            .try_as_basic_value()
            .left()
            .ok_or_else(|| {
                Error::codegen_error(format!("{} didn't return a value", runtime.name()), span)
            })
    }

    /// # Panics
    ///
    /// Panics if the builder isn't positioned inside a function.
    pub fn current_block(&self) -> BasicBlock<'ctx> {
        self.builder
            .get_insert_block()
            .unwrap_or_else(|| panic!("the builder is not positioned in a block"))
    }

    pub fn current_function(&self) -> FunctionValue<'ctx> {
        self.current_block()
            .get_parent()
            .unwrap_or_else(|| panic!("the current block has no parent function"))
    }

    /// Closes the current block with a jump to `target`, unless something
    /// already terminated it.
    pub fn branch_if_open(&self, target: BasicBlock<'ctx>, span: &Span) -> Result<(), Error> {
        if self.current_block().get_terminator().is_none() {
            self.builder.build_unconditional_branch(target).at(span)?;
        }
        Ok(())
    }

    /// Allocates a stack slot in the entry block of the current function,
    /// so slots declared inside loops aren't allocated once per iteration.
    pub fn create_entry_block_alloca(
        &self,
        ty: BasicTypeEnum<'ctx>,
        name: &str,
        span: &Span,
    ) -> Result<PointerValue<'ctx>, Error> {
        let builder = self.context.create_builder();
        let entry = self
            .current_function()
            .get_first_basic_block()
            .unwrap_or_else(|| panic!("the current function has no entry block"));

        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        builder.build_alloca(ty, name).at(span)
    }

    /// Storage location of a variable or parameter.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was never given storage, which only unit-typed
    /// symbols lack.
    pub fn storage(&self, symbol: SymbolId) -> PointerValue<'ctx> {
        *self.named_allocas.get(&symbol).unwrap_or_else(|| {
            panic!("{} has no storage location", self.scopes.symbol(symbol).name)
        })
    }

    /// A private, null terminated string constant usable in global
    /// initializers.
    pub fn const_string_ptr(&self, value: &str) -> PointerValue<'ctx> {
        let string = self.context.const_string(value.as_bytes(), true);
        let global = self.module.add_global(string.get_type(), None, ".str");
        global.set_initializer(&string);
        global.set_constant(true);
        global.set_linkage(Linkage::Private);

        global.as_pointer_value().const_cast(self.string_type())
    }

    fn verify(&self) -> Result<(), Error> {
        self.module
            .verify()
            .map_err(|message| Error::codegen_error(message.to_string(), &Span::null()))
    }
}

/// Lowers a type checked AST into a verified LLVM module named after the
/// module symbol.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile<'ctx>(
    ast: &[Stmt],
    scopes: &ScopeTree,
    types: &TypeUniverse,
    context: &'ctx Context,
) -> Result<Module<'ctx>, Error> {
    let mut compiler = Compiler::new(context, scopes, types);

    for stmt in ast.iter() {
        gen_statement(&mut compiler, stmt)?;
    }

    compiler.verify()?;

    tracing::debug!(
        module = scopes.module_name(),
        functions = compiler.module.get_functions().count(),
        "generated module"
    );
    Ok(compiler.module)
}
