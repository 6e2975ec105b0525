//! Edge case tests for xidl-par.
