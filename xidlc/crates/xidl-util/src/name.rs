//! Scoped-name helpers.
//!
//! IDL source spells qualified names with `::` separators and an optional
//! leading `::` for rooted lookups. The repository stores fully qualified
//! names in dotted form (`xcom.IUnknown`). These helpers convert between
//! the two and split/merge scope vectors.

/// True if the identifier names an absolute scope (leading `::`).
pub fn is_rooted(name: &str) -> bool {
    name.starts_with(':')
}

/// Split a `::xx::yy::zz` identifier into its segments.
///
/// The leading `::` may or may not be present. Assumes the identifier has
/// already passed the lexer's validity check.
pub fn split_scoped(name: &str) -> Vec<String> {
    let trimmed = name.strip_prefix("::").unwrap_or(name);
    trimmed.split("::").map(str::to_owned).collect()
}

/// Merge name segments into a dotted repository name.
pub fn join_dotted(parts: &[String]) -> String {
    parts.join(".")
}

/// Dotted name of `id` declared inside the namespace `scope`.
pub fn scoped_name(scope: &[String], id: &str) -> String {
    if scope.is_empty() {
        return id.to_owned();
    }
    format!("{}.{}", scope.join("."), id)
}

/// Scope part of a dotted name: `xx.yy` for `xx.yy.zz`, empty if unscoped.
pub fn scope_part(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[..pos],
        None => "",
    }
}

/// Base part of a dotted name: `zz` for `xx.yy.zz`.
pub fn base_part(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
