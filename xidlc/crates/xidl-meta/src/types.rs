//! Type descriptors.
//!
//! Every IDL-representable type is one case of [`TypeDesc`]. Descriptors
//! live in the [`Repository`](crate::Repository) and reference each other
//! through [`TypeId`] handles, never by ownership, so an interface can
//! refer to itself or to types defined later.

use crate::guid::Guid;

/// Name of the pseudo-parameter at index 0 of every method and delegate,
/// carrying the return type with mode [`PassMode::Return`].
pub const RETURN_PARAM_NAME: &str = "<<return>>";

/// The closed set of type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Bool,
    Octet,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    WChar,
    String,
    WString,
    Any,
    Enum,
    Array,
    Sequence,
    Struct,
    Exception,
    Interface,
    Delegate,
}

impl TypeKind {
    /// All built-in kinds, in repository pre-population order.
    pub const BUILTINS: [TypeKind; 13] = [
        TypeKind::Void,
        TypeKind::Bool,
        TypeKind::Octet,
        TypeKind::Short,
        TypeKind::Int,
        TypeKind::Long,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::Char,
        TypeKind::WChar,
        TypeKind::String,
        TypeKind::WString,
        TypeKind::Any,
    ];

    pub fn is_builtin(self) -> bool {
        !matches!(
            self,
            TypeKind::Enum
                | TypeKind::Array
                | TypeKind::Sequence
                | TypeKind::Struct
                | TypeKind::Exception
                | TypeKind::Interface
                | TypeKind::Delegate
        )
    }

    /// The IDL keyword naming a built-in kind.
    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            TypeKind::Void => "void",
            TypeKind::Bool => "bool",
            TypeKind::Octet => "octet",
            TypeKind::Short => "short",
            TypeKind::Int => "int",
            TypeKind::Long => "long",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::Char => "char",
            TypeKind::WChar => "wchar",
            TypeKind::String => "string",
            TypeKind::WString => "wstring",
            TypeKind::Any => "any",
            _ => return None,
        })
    }

    /// Built-in kind for an IDL keyword.
    pub fn from_keyword(keyword: &str) -> Option<TypeKind> {
        TypeKind::BUILTINS
            .into_iter()
            .find(|kind| kind.keyword() == Some(keyword))
    }

    /// Whether the kind can appear as a structure, array, sequence or
    /// exception member or as a method argument.
    pub fn can_be_data_member(self) -> bool {
        !matches!(self, TypeKind::Void | TypeKind::Exception)
    }
}

/// How a parameter crosses the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassMode {
    In,
    Out,
    InOut,
    Return,
}

/// Handle to a descriptor inside its repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        TypeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A struct or exception member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
}

/// A method or delegate parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub mode: PassMode,
    pub ty: TypeId,
    pub name: String,
}

impl Param {
    /// The return pseudo-parameter for the given type.
    pub fn returning(ty: TypeId) -> Self {
        Param {
            mode: PassMode::Return,
            ty,
            name: RETURN_PARAM_NAME.to_owned(),
        }
    }
}

/// One interface method. `params[0]` is the return pseudo-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
}

impl Method {
    pub fn return_param(&self) -> &Param {
        &self.params[0]
    }

    /// The real arguments, without the return pseudo-parameter.
    pub fn args(&self) -> &[Param] {
        &self.params[1..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionDef {
    pub name: String,
    pub base: Option<TypeId>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDef {
    pub name: String,
    pub element: TypeId,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDef {
    pub name: String,
    pub element: TypeId,
}

/// An interface descriptor.
///
/// Created in the forward state when only the name is known; a full
/// definition later satisfies it in place, which keeps every handle to it
/// valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    pub name: String,
    pub iid: Guid,
    pub base: Option<TypeId>,
    pub methods: Vec<Method>,
    forward: bool,
}

impl InterfaceDef {
    /// A forward-declared interface: name only, no iid, base or methods.
    pub fn forward(name: impl Into<String>) -> Self {
        InterfaceDef {
            name: name.into(),
            iid: Guid::NIL,
            base: None,
            methods: Vec::new(),
            forward: true,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Complete a forward declaration with its iid and base.
    pub fn satisfy_forward(&mut self, iid: Guid, base: Option<TypeId>) {
        self.iid = iid;
        self.base = base;
        self.forward = false;
    }
}

/// A delegate: one free-standing method signature as a first-class type.
/// `params[0]` is the return pseudo-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateDef {
    pub name: String,
    pub params: Vec<Param>,
}

impl DelegateDef {
    pub fn return_param(&self) -> &Param {
        &self.params[0]
    }

    pub fn args(&self) -> &[Param] {
        &self.params[1..]
    }
}

/// A type descriptor: one case per type kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Builtin(TypeKind),
    Enum(EnumDef),
    Struct(StructDef),
    Exception(ExceptionDef),
    Array(ArrayDef),
    Sequence(SequenceDef),
    Interface(InterfaceDef),
    Delegate(DelegateDef),
}

impl TypeDesc {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDesc::Builtin(kind) => *kind,
            TypeDesc::Enum(_) => TypeKind::Enum,
            TypeDesc::Struct(_) => TypeKind::Struct,
            TypeDesc::Exception(_) => TypeKind::Exception,
            TypeDesc::Array(_) => TypeKind::Array,
            TypeDesc::Sequence(_) => TypeKind::Sequence,
            TypeDesc::Interface(_) => TypeKind::Interface,
            TypeDesc::Delegate(_) => TypeKind::Delegate,
        }
    }

    /// Fully qualified dotted name; built-ins have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeDesc::Builtin(_) => None,
            TypeDesc::Enum(def) => Some(&def.name),
            TypeDesc::Struct(def) => Some(&def.name),
            TypeDesc::Exception(def) => Some(&def.name),
            TypeDesc::Array(def) => Some(&def.name),
            TypeDesc::Sequence(def) => Some(&def.name),
            TypeDesc::Interface(def) => Some(&def.name),
            TypeDesc::Delegate(def) => Some(&def.name),
        }
    }

    /// True for an interface descriptor still in the forward state.
    pub fn is_forward_interface(&self) -> bool {
        matches!(self, TypeDesc::Interface(def) if def.is_forward())
    }
}
