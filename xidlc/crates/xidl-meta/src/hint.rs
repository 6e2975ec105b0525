//! Generation hints.
//!
//! The parser emits one hint per main-file declaration; the code
//! generator replays them in order. The hint stream is the only thing
//! that distinguishes main-file declarations from imported ones.

/// What the emitter should do at this point of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// Include the bindings for an imported IDL file; parameter is the
    /// literal path as written in the `import` statement.
    GenImport,
    /// Emit the full definition of a type; parameter is its fully
    /// qualified name.
    GenType,
    /// Emit a forward declaration; parameter is a fully qualified
    /// interface name.
    GenForward,
    /// Open a namespace; parameter is one namespace segment.
    EnterNamespace,
    /// Close the matching namespace; parameter is the same segment.
    LeaveNamespace,
}

/// One record of the generation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub kind: HintKind,
    pub parameter: String,
}

impl Hint {
    pub fn new(kind: HintKind, parameter: impl Into<String>) -> Self {
        Hint {
            kind,
            parameter: parameter.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_new() {
        let hint = Hint::new(HintKind::GenType, "m.E");
        assert_eq!(hint.kind, HintKind::GenType);
        assert_eq!(hint.parameter, "m.E");
    }
}
