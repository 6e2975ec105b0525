//! Per-type ABI decoration rules.
//!
//! For every type the generator asks the same questions: the owning and
//! raw C++ forms, how a parameter is declared and forwarded on each side
//! of the raw boundary, and whether crossing that boundary needs explicit
//! detach/adopt bridging ("complex" types). The answers are grouped per
//! type kind: basic scalars, strings, composites and interfaces.

use rustc_hash::FxHashMap;

use xidl_meta::{PassMode, Repository, TypeDesc, TypeId, TypeKind};

use crate::helper::{builtin_cpp_name, cpp_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    /// Scalars, enums and void: identical owning and raw forms.
    Basic,
    /// Strings: owning wrapper over a raw character pointer.
    Str,
    /// Structs, exceptions, arrays, sequences and delegates.
    Composite,
    /// Refcounted interfaces passed as raw pointers.
    Interface,
}

/// The decoration queries for one type. Values are C++ renderings against
/// the xcom runtime, but their meaning is language-agnostic.
pub struct TypeRules {
    kind: RuleKind,
    complex: bool,
    name: String,
    raw_name: String,
}

impl TypeRules {
    /// Whether the ABI needs detach/adopt bridging for this type.
    pub fn is_complex(&self) -> bool {
        self.complex
    }

    /// The owning form's type name.
    pub fn normal_type(&self) -> &str {
        &self.name
    }

    /// The raw ABI-layout form's type name.
    pub fn raw_type(&self) -> &str {
        &self.raw_name
    }

    /// Parameter rendering in the owning signature.
    pub fn make_param(&self, mode: PassMode, param: &str) -> String {
        let name = &self.name;
        let raw = &self.raw_name;
        match (self.kind, mode) {
            (RuleKind::Basic, PassMode::In) => format!("{name} {param}"),
            (RuleKind::Basic, PassMode::Out | PassMode::InOut) => format!("{name}& {param}"),

            (RuleKind::Str, PassMode::In) => format!("const {raw} {param}"),
            (RuleKind::Str, PassMode::Out | PassMode::InOut) => format!("{name}& {param}"),

            (RuleKind::Composite | RuleKind::Interface, PassMode::In) => {
                format!("{name} const& {param}")
            }
            (RuleKind::Composite | RuleKind::Interface, PassMode::Out | PassMode::InOut) => {
                format!("{name}& {param}")
            }

            (_, PassMode::Return) => "<<invalid>>".to_owned(),
        }
    }

    /// Expression adapting a raw-signature parameter back to the owning
    /// form at the callee side.
    pub fn as_param(&self, mode: PassMode, param: &str) -> String {
        let name = &self.name;
        match (self.kind, mode) {
            (RuleKind::Basic, PassMode::In) => param.to_owned(),
            (RuleKind::Basic, PassMode::Out | PassMode::InOut) => format!("*{param}"),

            (RuleKind::Str, PassMode::In) => param.to_owned(),
            (RuleKind::Str, PassMode::Out | PassMode::InOut) => format!("*({name}*){param}"),

            (RuleKind::Composite, PassMode::In | PassMode::Out | PassMode::InOut) => {
                format!("*({name}*){param}")
            }

            (RuleKind::Interface, PassMode::In) => format!("*({name}*)&{param}"),
            (RuleKind::Interface, PassMode::Out | PassMode::InOut) => format!("*({name}*){param}"),

            (_, PassMode::Return) => "<<invalid>>".to_owned(),
        }
    }

    /// Parameter rendering in the raw signature.
    pub fn make_raw_param(&self, mode: PassMode, param: &str) -> String {
        let name = &self.name;
        let raw = &self.raw_name;
        match (self.kind, mode) {
            (RuleKind::Basic, PassMode::In) => format!("{name} {param}"),
            (RuleKind::Basic, PassMode::Out | PassMode::InOut) => format!("{name}* {param}"),

            (RuleKind::Str, PassMode::In) => format!("const {raw} {param}"),
            (RuleKind::Str, PassMode::Out | PassMode::InOut) => format!("{raw}* {param}"),

            (RuleKind::Composite, PassMode::In) => format!("{raw} const* {param}"),
            (RuleKind::Composite, PassMode::Out | PassMode::InOut) => format!("{raw}* {param}"),

            (RuleKind::Interface, PassMode::In) => format!("{raw} {param}"),
            (RuleKind::Interface, PassMode::Out | PassMode::InOut) => format!("{raw}* {param}"),

            (_, PassMode::Return) => "<<invalid>>".to_owned(),
        }
    }

    /// Expression adapting an owning parameter to the raw signature at
    /// the caller side.
    pub fn as_raw_param(&self, mode: PassMode, param: &str) -> String {
        let raw = &self.raw_name;
        match (self.kind, mode) {
            (RuleKind::Basic, PassMode::In) => param.to_owned(),
            (RuleKind::Basic, PassMode::Out | PassMode::InOut) => format!("&{param}"),

            (RuleKind::Str, PassMode::In) => param.to_owned(),
            (RuleKind::Str, PassMode::Out | PassMode::InOut) => format!("({raw}*)&{param}"),

            (RuleKind::Composite, PassMode::In) => format!("({raw} const*)&{param}"),
            (RuleKind::Composite, PassMode::Out | PassMode::InOut) => format!("({raw}*)&{param}"),

            (RuleKind::Interface, PassMode::In) => format!("({raw}){param}.ptr_"),
            (RuleKind::Interface, PassMode::Out | PassMode::InOut) => {
                format!("({raw}*)&{param}.ptr_")
            }

            (_, PassMode::Return) => "<<invalid>>".to_owned(),
        }
    }

    pub fn return_type(&self) -> &str {
        &self.name
    }

    pub fn raw_return_type(&self) -> &str {
        match self.kind {
            RuleKind::Basic => &self.name,
            _ => &self.raw_name,
        }
    }
}

/// Builds and caches one [`TypeRules`] per distinct descriptor.
///
/// Lookups are idempotent; complexity for composites recurses through the
/// base itself, relying on the cache to terminate at leaves (the IDL has
/// no self-referential data types).
#[derive(Default)]
pub struct RuleBase {
    rules: FxHashMap<TypeId, TypeRules>,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules for a type, building them on first use.
    pub fn for_type(&mut self, repo: &Repository, id: TypeId) -> &TypeRules {
        if !self.rules.contains_key(&id) {
            let rules = self.build(repo, id);
            self.rules.insert(id, rules);
        }
        &self.rules[&id]
    }

    /// Shorthand for the complexity query.
    pub fn is_complex(&mut self, repo: &Repository, id: TypeId) -> bool {
        self.for_type(repo, id).is_complex()
    }

    fn members_complex(&mut self, repo: &Repository, members: &[xidl_meta::Member]) -> bool {
        members.iter().any(|m| self.is_complex(repo, m.ty))
    }

    fn build(&mut self, repo: &Repository, id: TypeId) -> TypeRules {
        match repo.get(id) {
            TypeDesc::Builtin(kind) => match kind {
                TypeKind::String | TypeKind::WString => {
                    let (name, raw_name) = if *kind == TypeKind::String {
                        ("xcom::String", "xcom::Char*")
                    } else {
                        ("xcom::WString", "xcom::WChar*")
                    };
                    TypeRules {
                        kind: RuleKind::Str,
                        complex: true,
                        name: name.to_owned(),
                        raw_name: raw_name.to_owned(),
                    }
                }
                other => {
                    let name = builtin_cpp_name(*other).to_owned();
                    TypeRules {
                        kind: RuleKind::Basic,
                        complex: false,
                        name: name.clone(),
                        raw_name: name,
                    }
                }
            },

            // Enums travel as plain integers.
            TypeDesc::Enum(_) => TypeRules {
                kind: RuleKind::Basic,
                complex: false,
                name: "xcom::Int".to_owned(),
                raw_name: "xcom::Int".to_owned(),
            },

            TypeDesc::Struct(def) => {
                let members = def.members.clone();
                let name = cpp_name(&def.name);
                let complex = self.members_complex(repo, &members);
                let raw_name = if complex {
                    format!("{name}Data")
                } else {
                    name.clone()
                };
                TypeRules {
                    kind: RuleKind::Composite,
                    complex,
                    name,
                    raw_name,
                }
            }

            TypeDesc::Exception(def) => {
                let members = def.members.clone();
                let base = def.base;
                let name = cpp_name(&def.name);
                let mut complex = self.members_complex(repo, &members);
                if let Some(base_id) = base {
                    complex = complex || self.is_complex(repo, base_id);
                }
                let raw_name = if complex {
                    format!("{name}Data")
                } else {
                    name.clone()
                };
                TypeRules {
                    kind: RuleKind::Composite,
                    complex,
                    name,
                    raw_name,
                }
            }

            TypeDesc::Array(def) => {
                let element = def.element;
                let name = cpp_name(&def.name);
                let complex = self.is_complex(repo, element);
                let raw_name = if complex {
                    format!("{name}::RawType")
                } else {
                    name.clone()
                };
                TypeRules {
                    kind: RuleKind::Composite,
                    complex,
                    name,
                    raw_name,
                }
            }

            TypeDesc::Sequence(def) => {
                let name = cpp_name(&def.name);
                TypeRules {
                    kind: RuleKind::Composite,
                    complex: true,
                    raw_name: format!("{name}::RawType"),
                    name,
                }
            }

            TypeDesc::Delegate(def) => {
                let name = cpp_name(&def.name);
                TypeRules {
                    kind: RuleKind::Composite,
                    complex: true,
                    raw_name: name.clone(),
                    name,
                }
            }

            TypeDesc::Interface(def) => {
                let name = cpp_name(&def.name);
                TypeRules {
                    kind: RuleKind::Interface,
                    complex: true,
                    raw_name: format!("{name}Raw*"),
                    name,
                }
            }
        }
    }
}
