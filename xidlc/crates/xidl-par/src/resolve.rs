//! Name resolution against the repository.

use xidl_lex::Token;
use xidl_meta::TypeId;
use xidl_util::{is_rooted, join_dotted, scoped_name, split_scoped, Result};

use crate::Parser;

impl Parser<'_> {
    /// Resolve a type reference, which is either a built-in keyword or an
    /// identifier in `::xx::yy::zz` form (the leading `::` optional).
    ///
    /// Rooted names and built-in keywords are looked up as written.
    /// Everything else walks the namespace stack from innermost to
    /// outermost, then falls back to a bare lookup. Failure is a fatal
    /// diagnostic at the token's line.
    pub fn type_must_be_defined(&mut self, token: &Token) -> Result<TypeId> {
        let text = token.text();
        let parts = split_scoped(text);

        let mut found = None;

        if is_rooted(text) || token.kind().is_builtin_type() {
            found = self.repo.find(&join_dotted(&parts));
        } else {
            let mut scope = self.namespaces.clone();
            while !scope.is_empty() {
                let mut full = scope.clone();
                full.extend(parts.iter().cloned());
                if let Some(id) = self.repo.find(&join_dotted(&full)) {
                    found = Some(id);
                    break;
                }
                scope.pop();
            }

            if found.is_none() {
                found = self.repo.find(&join_dotted(&parts));
            }
        }

        match found {
            Some(id) => Ok(id),
            None => Err(self.lexer().raise_semantic("type not found", token)),
        }
    }

    /// Error out if a type with this name already exists in the current
    /// namespace. Forward interfaces being satisfied in place never reach
    /// this check.
    pub(crate) fn check_duplicate_definition(&mut self, token: &Token) -> Result<()> {
        let name = scoped_name(&self.namespaces, token.text());
        if self.repo.find(&name).is_some() {
            return Err(self.lexer().raise_semantic("type already defined", token));
        }
        Ok(())
    }
}
