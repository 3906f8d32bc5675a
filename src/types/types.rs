use std::collections::HashMap;

use crate::ast::types::TypeAnnoKind;

/// Handle to an interned type. Equal handles mean structurally equal types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const FLOAT: TypeId = TypeId(1);
    pub const CHAR: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const UNIT: TypeId = TypeId(5);

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_numeric(&self) -> bool {
        *self == TypeId::INT || *self == TypeId::FLOAT
    }
}

/// Structural key of a type. Function types refer to their parts by handle,
/// so keys stay small and hashing never recurses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Char,
    String,
    Bool,
    Unit,
    Function {
        parameters: Vec<TypeId>,
        return_type: TypeId,
    },
}

/// Append-only interning table owning every type of a compilation.
#[derive(Debug)]
pub struct TypeUniverse {
    types: Vec<Type>,
    lookup: HashMap<Type, TypeId>,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    pub fn new() -> Self {
        let mut universe = TypeUniverse {
            types: vec![],
            lookup: HashMap::new(),
        };

        // Order matches the TypeId constants.
        for primitive in [
            Type::Int,
            Type::Float,
            Type::Char,
            Type::String,
            Type::Bool,
            Type::Unit,
        ] {
            universe.intern(primitive);
        }

        universe
    }

    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(id) = self.lookup.get(&ty) {
            return *id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    pub fn function(&mut self, parameters: Vec<TypeId>, return_type: TypeId) -> TypeId {
        self.intern(Type::Function {
            parameters,
            return_type,
        })
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the parameter and return types if `id` is a function type.
    pub fn as_function(&self, id: TypeId) -> Option<(&[TypeId], TypeId)> {
        match self.get(id) {
            Type::Function {
                parameters,
                return_type,
            } => Some((parameters, *return_type)),
            _ => None,
        }
    }

    pub fn from_anno(kind: TypeAnnoKind) -> TypeId {
        match kind {
            TypeAnnoKind::Int => TypeId::INT,
            TypeAnnoKind::Float => TypeId::FLOAT,
            TypeAnnoKind::Char => TypeId::CHAR,
            TypeAnnoKind::String => TypeId::STRING,
            TypeAnnoKind::Bool => TypeId::BOOL,
            TypeAnnoKind::Unit => TypeId::UNIT,
        }
    }

    /// Source-level spelling, e.g. `int` or `(int, float) -> bool`.
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Int => String::from("int"),
            Type::Float => String::from("float"),
            Type::Char => String::from("char"),
            Type::String => String::from("string"),
            Type::Bool => String::from("bool"),
            Type::Unit => String::from("unit"),
            Type::Function {
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| self.display(*parameter))
                    .collect::<Vec<String>>()
                    .join(", ");
                format!("({}) -> {}", parameters, self.display(*return_type))
            }
        }
    }
}
