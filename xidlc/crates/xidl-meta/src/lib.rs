//! xidl-meta - Type metadata for the XIDL compiler.
//!
//! Holds the pieces the parser produces and the code generator consumes:
//! the [`TypeDesc`] tagged variant describing every IDL-representable
//! type, the [`Repository`] that owns all descriptors for one compilation,
//! the generation [`Hint`] records, and the interface [`Guid`].

pub mod guid;
pub mod hint;
pub mod repository;
pub mod types;

pub use guid::{Guid, GuidParseError};
pub use hint::{Hint, HintKind};
pub use repository::Repository;
pub use types::{
    ArrayDef, DelegateDef, EnumDef, ExceptionDef, InterfaceDef, Member, Method, Param, PassMode,
    SequenceDef, StructDef, TypeDesc, TypeId, TypeKind, RETURN_PARAM_NAME,
};
