//! The type repository.

use indexmap::IndexMap;

use crate::types::{TypeDesc, TypeId, TypeKind};

/// Insertion-ordered catalogue of all types known to one compilation.
///
/// The repository owns every descriptor it admits and hands out [`TypeId`]
/// handles that stay valid for its whole lifetime. A fresh repository
/// holds exactly one descriptor per built-in kind, discoverable both by
/// IDL keyword and by kind. User types are added with fully qualified
/// dotted names; the repository never deduplicates them silently, callers
/// check for clashes before inserting.
pub struct Repository {
    types: Vec<TypeDesc>,
    by_name: IndexMap<String, TypeId>,
    builtins: Vec<(TypeKind, TypeId)>,
}

impl Repository {
    pub fn new() -> Self {
        let mut repo = Repository {
            types: Vec::new(),
            by_name: IndexMap::new(),
            builtins: Vec::new(),
        };

        for kind in TypeKind::BUILTINS {
            let id = TypeId::from_index(repo.types.len());
            repo.types.push(TypeDesc::Builtin(kind));
            repo.builtins.push((kind, id));
        }

        repo
    }

    /// Add a descriptor, taking ownership. Named descriptors become
    /// findable under their fully qualified name.
    pub fn add(&mut self, desc: TypeDesc) -> TypeId {
        let id = TypeId::from_index(self.types.len());

        if let Some(name) = desc.name() {
            debug_assert!(
                !self.by_name.contains_key(name),
                "duplicate type name admitted: {name}"
            );
            self.by_name.insert(name.to_owned(), id);
        }

        self.types.push(desc);
        id
    }

    /// Look a type up by fully qualified dotted name, or by IDL keyword
    /// for the built-ins.
    pub fn find(&self, name: &str) -> Option<TypeId> {
        if let Some(kind) = TypeKind::from_keyword(name) {
            return Some(self.builtin(kind));
        }

        self.by_name.get(name).copied()
    }

    /// The canonical descriptor for a built-in kind.
    pub fn builtin(&self, kind: TypeKind) -> TypeId {
        debug_assert!(kind.is_builtin());
        self.builtins
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| TypeId::from_index(0))
    }

    pub fn get(&self, id: TypeId) -> &TypeDesc {
        &self.types[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeDesc {
        &mut self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDesc)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, desc)| (TypeId::from_index(index), desc))
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
