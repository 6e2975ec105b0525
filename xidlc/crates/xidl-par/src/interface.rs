//! Interface and delegate declarations.

use xidl_lex::TokenKind;
use xidl_meta::{
    DelegateDef, Guid, HintKind, InterfaceDef, Method, Param, PassMode, TypeDesc, TypeKind,
};
use xidl_util::{scoped_name, Error, Result};

use crate::Parser;

/// Dotted name of the one interface allowed to have no base.
const ROOT_INTERFACE: &str = "xcom.IUnknown";

impl Parser<'_> {
    /// One parameter: optional mode keyword (default `in`), type, name.
    fn read_parameter(&mut self) -> Result<Param> {
        let token = self.lexer().expect_any()?;
        let mode = match token.kind() {
            TokenKind::In => PassMode::In,
            TokenKind::Out => PassMode::Out,
            TokenKind::InOut => PassMode::InOut,
            _ => {
                self.lexer().unget();
                PassMode::In
            }
        };

        let ty_tok = self.read_type_or_identifier()?;
        let ty = self.type_must_be_defined(&ty_tok)?;
        let name = self.lexer().expect(TokenKind::Identifier)?.text().to_owned();

        Ok(Param { mode, ty, name })
    }

    /// `return-type Ident ( params ) ;`, one method signature. The
    /// stored parameter 0 carries the return type.
    fn read_method(&mut self) -> Result<Method> {
        let ret_tok = self.read_type_or_identifier()?;
        let ret_ty = self.type_must_be_defined(&ret_tok)?;
        let mut params = vec![Param::returning(ret_ty)];

        let name = self.lexer().expect(TokenKind::Identifier)?.text().to_owned();

        self.lexer().discard(TokenKind::LParen)?;
        loop {
            let token = self.lexer().expect_any()?;
            if token.kind() == TokenKind::RParen {
                break;
            }

            self.lexer().unget();
            params.push(self.read_parameter()?);

            let token = self.lexer().expect_any()?;
            if token.kind() == TokenKind::RParen {
                break;
            }
            if token.kind() != TokenKind::Comma {
                return Err(self.lexer().raise(", or ) expected", &token));
            }
        }

        self.lexer().discard(TokenKind::Semicolon)?;

        Ok(Method { name, params })
    }

    /// Methods of an interface body up to the closing curly.
    fn read_interface_members(&mut self) -> Result<Vec<Method>> {
        let mut methods = Vec::new();

        self.lexer().discard(TokenKind::LCurly)?;
        loop {
            let token = self.lexer().expect_any()?;
            if token.kind() == TokenKind::RCurly {
                break;
            }
            self.lexer().unget();
            methods.push(self.read_method()?);
        }

        Ok(methods)
    }

    /// `interface Ident ;` (forward) or
    /// `interface Ident ( "guid" ) (extends type-ident)? { method* }`
    /// with `interface` read.
    pub(crate) fn handle_interface(&mut self) -> Result<()> {
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        let name = scoped_name(&self.namespaces, name_tok.text());

        // Whatever follows, an existing type under this name must be an
        // interface still in the forward state.
        let existing = self.repo.find(&name);
        if let Some(id) = existing {
            if !self.repo.get(id).is_forward_interface() {
                return Err(self
                    .lexer()
                    .raise_semantic("type already defined", &name_tok));
            }
        }

        if self.lexer().expect_any()?.kind() == TokenKind::Semicolon {
            // Forward declaration; never added twice.
            if existing.is_none() {
                let id = self
                    .repo
                    .add(TypeDesc::Interface(InterfaceDef::forward(name.clone())));
                self.forwards.push(id);
            }

            if self.in_main_file() {
                self.add_hint(HintKind::GenForward, name);
            }
            return Ok(());
        }

        // Full definition. Register the descriptor up front so the body
        // can refer to the interface itself.
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self
                    .repo
                    .add(TypeDesc::Interface(InterfaceDef::forward(name.clone())));
                self.forwards.push(id);
                id
            }
        };

        self.lexer().unget();
        self.lexer().discard(TokenKind::LParen)?;
        let iid_tok = self.lexer().expect(TokenKind::StringLiteral)?;
        let iid: Guid = iid_tok.text().parse().map_err(|_| {
            self.lexer()
                .raise_semantic("the guid string is not a valid guid", &iid_tok)
        })?;
        self.lexer().discard(TokenKind::RParen)?;

        let mut base = None;
        let token = self.lexer().expect_any()?;
        if token.kind() == TokenKind::Extends {
            let base_tok = self.lexer().expect(TokenKind::Identifier)?;
            let base_id = self.type_must_be_defined(&base_tok)?;

            if self.repo.get(base_id).kind() != TypeKind::Interface {
                return Err(self
                    .lexer()
                    .raise_semantic("base must be an interface", &base_tok));
            }
            if self.repo.get(base_id).is_forward_interface() {
                return Err(self.lexer().raise_semantic(
                    "cannot inherit from a forward declared interface",
                    &base_tok,
                ));
            }
            base = Some(base_id);
        } else {
            self.lexer().unget();
        }

        if base.is_none() && name != ROOT_INTERFACE {
            return Err(self
                .lexer()
                .raise_semantic("must specify base interface", &name_tok));
        }

        if let TypeDesc::Interface(def) = self.repo.get_mut(id) {
            def.satisfy_forward(iid, base);
        }
        self.forwards.retain(|forward| *forward != id);

        let methods = self.read_interface_members()?;
        if let TypeDesc::Interface(def) = self.repo.get_mut(id) {
            def.methods = methods;
        }

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }

    /// `delegate return-type Ident ( params ) ;` with `delegate` read:
    /// one method signature as a first-class type.
    pub(crate) fn handle_delegate(&mut self) -> Result<()> {
        let signature = self.read_method()?;
        let name = scoped_name(&self.namespaces, &signature.name);

        if self.repo.find(&name).is_some() {
            let (filename, line) = {
                let lexer = self.lexer();
                (lexer.filename().to_owned(), lexer.line())
            };
            return Err(Error::Semantic {
                filename,
                line,
                message: "type already defined".into(),
                offending: signature.name,
            });
        }

        self.repo.add(TypeDesc::Delegate(DelegateDef {
            name: name.clone(),
            params: signature.params,
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::parse_source;
    use xidl_meta::{PassMode, TypeDesc};

    const PRELUDE: &str = "namespace xcom {\n\
        interface IUnknown(\"6e9e44bf-d0f4-4617-b880-0ba98a0b0897\") {}\n\
        }\n";

    #[test]
    fn test_parameter_modes() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
             void f(in int a, out int b, inout int c, int d);\n\
             }}\n\
             }}\n"
        );
        let (result, repo) = parse_source(&source);
        result.unwrap();

        match repo.get(repo.find("m.I").unwrap()) {
            TypeDesc::Interface(def) => {
                let modes: Vec<_> = def.methods[0].args().iter().map(|p| p.mode).collect();
                assert_eq!(
                    modes,
                    vec![PassMode::In, PassMode::Out, PassMode::InOut, PassMode::In]
                );
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_self_referencing_method() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface Node(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
             Node next();\n\
             }}\n\
             }}\n"
        );
        let (result, repo) = parse_source(&source);
        result.unwrap();

        let id = repo.find("m.Node").unwrap();
        match repo.get(id) {
            TypeDesc::Interface(def) => {
                assert_eq!(def.methods[0].return_param().ty, id);
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_guid_rejected() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I(\"not-a-guid\") extends xcom::IUnknown {{}}\n\
             }}\n"
        );
        let (result, _) = parse_source(&source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("not a valid guid"));
    }

    #[test]
    fn test_missing_base_rejected() {
        let source = "namespace m {\n\
            interface I(\"01234567-89ab-cdef-0123-456789abcdef\") {}\n\
            }\n";
        let (result, _) = parse_source(source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("must specify base interface"));
    }

    #[test]
    fn test_root_interface_needs_no_base() {
        let (result, repo) = parse_source(PRELUDE);
        result.unwrap();
        match repo.get(repo.find("xcom.IUnknown").unwrap()) {
            TypeDesc::Interface(def) => {
                assert!(def.base.is_none());
                assert!(!def.is_forward());
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_non_interface_base_rejected() {
        let source = "namespace m {\n\
            enum E { A }\n\
            interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends E {}\n\
            }\n";
        let (result, _) = parse_source(source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("base must be an interface"));
    }

    #[test]
    fn test_forward_base_rejected() {
        let source = "namespace m {\n\
            interface Fwd;\n\
            interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends Fwd {}\n\
            }\n";
        let (result, _) = parse_source(source);
        let err = result.unwrap_err();
        assert!(err
            .to_string()
            .contains("cannot inherit from a forward declared interface"));
    }

    #[test]
    fn test_second_full_definition_rejected() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I;\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{}}\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{}}\n\
             }}\n"
        );
        let (result, _) = parse_source(&source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("type already defined"));
    }

    #[test]
    fn test_forward_after_definition_rejected() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{}}\n\
             interface I;\n\
             }}\n"
        );
        let (result, _) = parse_source(&source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("type already defined"));
    }

    #[test]
    fn test_repeated_forward_is_silent() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I;\n\
             interface I;\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{}}\n\
             }}\n"
        );
        let (result, repo) = parse_source(&source);
        result.unwrap();

        // Exactly one descriptor for m.I despite two forwards.
        let count = repo
            .iter()
            .filter(|(_, desc)| desc.name() == Some("m.I"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_delegate_duplicate_rejected() {
        let source = "delegate void Cb(in int x);\ndelegate void Cb(in int x);";
        let (result, _) = parse_source(source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("type already defined"));
    }

    #[test]
    fn test_method_parameter_separator_diagnostics() {
        let source = format!(
            "{PRELUDE}namespace m {{\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
             void f(in int a; in int b);\n\
             }}\n\
             }}\n"
        );
        let (result, _) = parse_source(&source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains(", or ) expected"));
    }
}
