//! Data-type declarations: array, sequence, struct, exception, enum.

use xidl_lex::{Token, TokenKind};
use xidl_meta::{
    ArrayDef, EnumDef, ExceptionDef, HintKind, Member, SequenceDef, StructDef, TypeDesc, TypeId,
    TypeKind,
};
use xidl_util::{scoped_name, Result};

use crate::Parser;

impl Parser<'_> {
    /// Read the next token, which must name a type: a built-in keyword or
    /// an identifier.
    pub(crate) fn read_type_or_identifier(&mut self) -> Result<Token> {
        let token = self.lexer().next();
        if !token.kind().is_builtin_type() && token.kind() != TokenKind::Identifier {
            return Err(self.lexer().raise("type or identifier expected", &token));
        }
        Ok(token)
    }

    /// Error out unless the resolved type can be used as a data member
    /// (anything but `void` and exceptions).
    pub(crate) fn check_data_member(&mut self, ty: TypeId, token: &Token) -> Result<()> {
        if !self.repo.get(ty).kind().can_be_data_member() {
            return Err(self
                .lexer()
                .raise_semantic("type cannot be used as a data member", token));
        }
        Ok(())
    }

    /// `array < element-type , positive-int > Ident ;` with `array` read.
    pub(crate) fn handle_array(&mut self) -> Result<()> {
        self.lexer().discard(TokenKind::LessThan)?;
        let element_tok = self.read_type_or_identifier()?;
        self.lexer().discard(TokenKind::Comma)?;
        let size_tok = self.lexer().expect(TokenKind::PositiveInt)?;
        self.lexer().discard(TokenKind::GreaterThan)?;
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.lexer().discard(TokenKind::Semicolon)?;

        let element = self.type_must_be_defined(&element_tok)?;
        self.check_data_member(element, &element_tok)?;
        self.check_duplicate_definition(&name_tok)?;

        let name = scoped_name(&self.namespaces, name_tok.text());
        self.repo.add(TypeDesc::Array(ArrayDef {
            name: name.clone(),
            element,
            size: size_tok.value(),
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }

    /// `sequence < element-type > Ident ;` with `sequence` read.
    pub(crate) fn handle_sequence(&mut self) -> Result<()> {
        self.lexer().discard(TokenKind::LessThan)?;
        let element_tok = self.read_type_or_identifier()?;
        let element = self.type_must_be_defined(&element_tok)?;
        self.lexer().discard(TokenKind::GreaterThan)?;

        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.check_data_member(element, &name_tok)?;
        self.check_duplicate_definition(&name_tok)?;
        self.lexer().discard(TokenKind::Semicolon)?;

        let name = scoped_name(&self.namespaces, name_tok.text());
        self.repo.add(TypeDesc::Sequence(SequenceDef {
            name: name.clone(),
            element,
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }

    /// Members of a struct or exception, starting at the opening curly.
    fn read_struct_members(&mut self) -> Result<Vec<Member>> {
        let mut members = Vec::new();

        self.lexer().discard(TokenKind::LCurly)?;
        loop {
            let token = self.lexer().expect_any()?;
            if token.kind() == TokenKind::RCurly {
                break;
            }
            if !token.kind().is_builtin_type() && token.kind() != TokenKind::Identifier {
                return Err(self.lexer().raise("unexpected token", &token));
            }

            let ty = self.type_must_be_defined(&token)?;
            self.check_data_member(ty, &token)?;

            let name = self.lexer().expect(TokenKind::Identifier)?.text().to_owned();
            members.push(Member { name, ty });
            self.lexer().discard(TokenKind::Semicolon)?;
        }

        Ok(members)
    }

    /// `struct Ident { member* }` with `struct` read. At least one member.
    pub(crate) fn handle_struct(&mut self) -> Result<()> {
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.check_duplicate_definition(&name_tok)?;

        let members = self.read_struct_members()?;
        if members.is_empty() {
            return Err(self
                .lexer()
                .raise_semantic("structs with no elements are not allowed", &name_tok));
        }

        let name = scoped_name(&self.namespaces, name_tok.text());
        self.repo.add(TypeDesc::Struct(StructDef {
            name: name.clone(),
            members,
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }

    /// `exception Ident (extends type-ident)? { member* }` with
    /// `exception` read. Exceptions may be empty.
    pub(crate) fn handle_exception(&mut self) -> Result<()> {
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.check_duplicate_definition(&name_tok)?;

        let mut base = None;
        let token = self.lexer().expect_any()?;
        if token.kind() == TokenKind::Extends {
            let base_tok = self.read_type_or_identifier()?;
            let base_id = self.type_must_be_defined(&base_tok)?;
            if self.repo.get(base_id).kind() != TypeKind::Exception {
                return Err(self
                    .lexer()
                    .raise_semantic("base must be an exception", &base_tok));
            }
            base = Some(base_id);
        } else {
            self.lexer().unget();
        }

        let members = self.read_struct_members()?;

        let name = scoped_name(&self.namespaces, name_tok.text());
        self.repo.add(TypeDesc::Exception(ExceptionDef {
            name: name.clone(),
            base,
            members,
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }

    /// `enum Ident { Ident (, Ident)* }` with `enum` read. At least one
    /// enumerator.
    pub(crate) fn handle_enum(&mut self) -> Result<()> {
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.check_duplicate_definition(&name_tok)?;

        let mut elements = Vec::new();

        self.lexer().discard(TokenKind::LCurly)?;
        let first = self.lexer().expect_any()?;
        if first.kind() != TokenKind::RCurly {
            self.lexer().unget();
            loop {
                let element = self.lexer().expect(TokenKind::Identifier)?;
                elements.push(element.text().to_owned());

                let sep = self.lexer().expect_any()?;
                if sep.kind() != TokenKind::Comma {
                    self.lexer().unget();
                    self.lexer().discard(TokenKind::RCurly)?;
                    break;
                }
            }
        }

        if elements.is_empty() {
            return Err(self
                .lexer()
                .raise_semantic("an enumeration with no element", &name_tok));
        }

        let name = scoped_name(&self.namespaces, name_tok.text());
        self.repo.add(TypeDesc::Enum(EnumDef {
            name: name.clone(),
            elements,
        }));

        if self.in_main_file() {
            self.add_hint(HintKind::GenType, name);
        }
        Ok(())
    }
}
