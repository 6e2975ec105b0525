//! Edge case tests for xidl-lex.
