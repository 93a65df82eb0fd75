// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolved type descriptors.
//!
//! Types are interned in a [`TypeTable`] owned by the compilation context.
//! Structurally identical types share a [`TypeId`], so id equality is type
//! equality. Struct types are nominal: each declaration gets its own id.

use std::collections::HashMap;
use std::fmt;

/// Index of a type in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Nil,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
}

impl BuiltinKind {
    const ALL: [BuiltinKind; 13] = [
        BuiltinKind::Nil,
        BuiltinKind::Bool,
        BuiltinKind::Int8,
        BuiltinKind::Int16,
        BuiltinKind::Int32,
        BuiltinKind::Int64,
        BuiltinKind::UInt8,
        BuiltinKind::UInt16,
        BuiltinKind::UInt32,
        BuiltinKind::UInt64,
        BuiltinKind::Float32,
        BuiltinKind::Float64,
        BuiltinKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Nil => "nil",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Int8 => "int8",
            BuiltinKind::Int16 => "int16",
            BuiltinKind::Int32 => "int32",
            BuiltinKind::Int64 => "int64",
            BuiltinKind::UInt8 => "uint8",
            BuiltinKind::UInt16 => "uint16",
            BuiltinKind::UInt32 => "uint32",
            BuiltinKind::UInt64 => "uint64",
            BuiltinKind::Float32 => "float32",
            BuiltinKind::Float64 => "float64",
            BuiltinKind::String => "string",
        }
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            BuiltinKind::Int8 | BuiltinKind::Int16 | BuiltinKind::Int32 | BuiltinKind::Int64
        )
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            BuiltinKind::UInt8 | BuiltinKind::UInt16 | BuiltinKind::UInt32 | BuiltinKind::UInt64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_float(self) -> bool {
        matches!(self, BuiltinKind::Float32 | BuiltinKind::Float64)
    }

    /// Width in bytes for numeric kinds.
    pub fn size(self) -> Option<u32> {
        match self {
            BuiltinKind::Int8 | BuiltinKind::UInt8 => Some(1),
            BuiltinKind::Int16 | BuiltinKind::UInt16 => Some(2),
            BuiltinKind::Int32 | BuiltinKind::UInt32 | BuiltinKind::Float32 => Some(4),
            BuiltinKind::Int64 | BuiltinKind::UInt64 | BuiltinKind::Float64 => Some(8),
            _ => None,
        }
    }
}

/// A struct field after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
}

/// A type in TPL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(BuiltinKind),
    Pointer(TypeId),
    /// `[N]T`, or `[*]T` when the length is unknown.
    Array { len: Option<u64>, elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Function { params: Vec<TypeId>, ret: TypeId },
    Struct { name: String, fields: Vec<StructField> },
}

/// Central registry of all types in one compilation.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    interned: HashMap<Type, TypeId>,
    builtin_names: HashMap<&'static str, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::new(),
            interned: HashMap::new(),
            builtin_names: HashMap::new(),
        };
        table.register_builtins();
        table
    }

    fn register_builtins(&mut self) {
        for kind in BuiltinKind::ALL {
            let id = self.intern(Type::Builtin(kind));
            self.builtin_names.insert(kind.name(), id);
        }
        // Aliases
        self.builtin_names.insert("void", self.builtin(BuiltinKind::Nil));
        self.builtin_names.insert("int", self.builtin(BuiltinKind::Int32));
        self.builtin_names.insert("uint", self.builtin(BuiltinKind::UInt32));
        self.builtin_names.insert("float", self.builtin(BuiltinKind::Float32));
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    /// The id of a primitive type. Builtins are registered first, in
    /// `BuiltinKind::ALL` order, so this is a direct index.
    pub fn builtin(&self, kind: BuiltinKind) -> TypeId {
        TypeId(kind as u32)
    }

    /// Look up a builtin type (or alias) by name.
    pub fn lookup_builtin(&self, name: &str) -> Option<TypeId> {
        self.builtin_names.get(name).copied()
    }

    pub fn pointer_to(&mut self, base: TypeId) -> TypeId {
        self.intern(Type::Pointer(base))
    }

    pub fn array_of(&mut self, len: Option<u64>, elem: TypeId) -> TypeId {
        self.intern(Type::Array { len, elem })
    }

    pub fn map_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(Type::Map { key, value })
    }

    pub fn function(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.intern(Type::Function { params, ret })
    }

    /// Register a new, initially empty struct type. Fields are attached with
    /// [`TypeTable::set_struct_fields`] once they are resolved, which lets a
    /// struct refer to itself through a pointer.
    pub fn declare_struct(&mut self, name: impl Into<String>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type::Struct { name: name.into(), fields: Vec::new() });
        id
    }

    pub fn set_struct_fields(&mut self, id: TypeId, new_fields: Vec<StructField>) {
        if let Some(Type::Struct { fields, .. }) = self.types.get_mut(id.0 as usize) {
            *fields = new_fields;
        }
    }

    /// Get a type by id.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn builtin_kind(&self, id: TypeId) -> Option<BuiltinKind> {
        match self.get(id) {
            Type::Builtin(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_nil(&self, id: TypeId) -> bool {
        self.builtin_kind(id) == Some(BuiltinKind::Nil)
    }

    pub fn is_bool(&self, id: TypeId) -> bool {
        self.builtin_kind(id) == Some(BuiltinKind::Bool)
    }

    pub fn is_string(&self, id: TypeId) -> bool {
        self.builtin_kind(id) == Some(BuiltinKind::String)
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        self.builtin_kind(id).is_some_and(BuiltinKind::is_integer)
    }

    pub fn is_float(&self, id: TypeId) -> bool {
        self.builtin_kind(id).is_some_and(BuiltinKind::is_float)
    }

    pub fn is_numeric(&self, id: TypeId) -> bool {
        self.is_integer(id) || self.is_float(id)
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Pointer(_))
    }

    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            Type::Pointer(base) => Some(*base),
            _ => None,
        }
    }

    /// Look up a field of a struct type.
    pub fn struct_field(&self, id: TypeId, name: &str) -> Option<TypeId> {
        match self.get(id) {
            Type::Struct { fields, .. } => fields.iter().find(|f| f.name == name).map(|f| f.ty),
            _ => None,
        }
    }

    /// Displayable form of a type, e.g. `*[10]int32`.
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { table: self, id }
    }
}

/// Formats a [`TypeId`] through its table.
pub struct TypeDisplay<'t> {
    table: &'t TypeTable,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.table;
        match t.get(self.id) {
            Type::Builtin(kind) => write!(f, "{}", kind.name()),
            Type::Pointer(base) => write!(f, "*{}", t.display(*base)),
            Type::Array { len: Some(n), elem } => write!(f, "[{}]{}", n, t.display(*elem)),
            Type::Array { len: None, elem } => write!(f, "[*]{}", t.display(*elem)),
            Type::Map { key, value } => write!(f, "map[{}]{}", t.display(*key), t.display(*value)),
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", t.display(*p))?;
                }
                write!(f, ")->{}", t.display(*ret))
            }
            Type::Struct { name, .. } => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_builtins() {
        let table = TypeTable::new();
        assert_eq!(table.lookup_builtin("int"), Some(table.builtin(BuiltinKind::Int32)));
        assert_eq!(table.lookup_builtin("void"), Some(table.builtin(BuiltinKind::Nil)));
        assert_eq!(table.lookup_builtin("float64"), Some(table.builtin(BuiltinKind::Float64)));
        assert_eq!(table.lookup_builtin("Row"), None);
    }

    #[test]
    fn composite_types_are_interned() {
        let mut table = TypeTable::new();
        let int = table.builtin(BuiltinKind::Int32);
        let a = table.array_of(Some(10), int);
        let b = table.array_of(Some(10), int);
        let c = table.array_of(None, int);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let p = table.pointer_to(a);
        assert_eq!(table.display(p).to_string(), "*[10]int32");
        assert_eq!(table.display(c).to_string(), "[*]int32");
    }

    #[test]
    fn structs_are_nominal() {
        let mut table = TypeTable::new();
        let a = table.declare_struct("S");
        let b = table.declare_struct("S");
        assert_ne!(a, b);

        let ptr = table.pointer_to(a);
        table.set_struct_fields(a, vec![StructField { name: "next".into(), ty: ptr }]);
        assert_eq!(table.struct_field(a, "next"), Some(ptr));
        assert_eq!(table.struct_field(a, "missing"), None);
    }

    #[test]
    fn function_display() {
        let mut table = TypeTable::new();
        let int = table.builtin(BuiltinKind::Int32);
        let nil = table.builtin(BuiltinKind::Nil);
        let f = table.function(vec![int, int], nil);
        assert_eq!(table.display(f).to_string(), "(int32,int32)->nil");
    }
}
