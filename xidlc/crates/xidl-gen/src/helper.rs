//! Helper functions for the C++ code generator.

use xidl_meta::TypeKind;

/// Convert a name in the form `xx.yy.zz` to `xx::yy::zz`.
pub fn cpp_name(idl_name: &str) -> String {
    idl_name.replace('.', "::")
}

/// C++ spelling of a built-in type.
pub fn builtin_cpp_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Void => "void",
        TypeKind::Bool => "xcom::Bool",
        TypeKind::Octet => "xcom::Octet",
        TypeKind::Short => "xcom::Short",
        TypeKind::Int => "xcom::Int",
        TypeKind::Long => "xcom::Long",
        TypeKind::Float => "xcom::Float",
        TypeKind::Double => "xcom::Double",
        TypeKind::Char => "xcom::Char",
        TypeKind::WChar => "xcom::WChar",
        TypeKind::String => "xcom::String",
        TypeKind::WString => "xcom::WString",
        TypeKind::Any => "xcom::Any",
        _ => "",
    }
}

/// Filename portion of a path.
pub fn strip_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Rewrite the last `.idl` occurrence to `.hpp`.
pub fn replace_idl_extension(path: &str) -> String {
    match path.rfind(".idl") {
        Some(pos) => {
            let mut result = String::with_capacity(path.len());
            result.push_str(&path[..pos]);
            result.push_str(".hpp");
            result.push_str(&path[pos + 4..]);
            result
        }
        None => path.to_owned(),
    }
}

/// A unique, reproducible header guard in the form
/// `INC_UPPERCASE_FILENAME_GUID_WITH_UNDERSCORES`. The guid portion is
/// derived from the filename so identical inputs produce identical
/// output files.
pub fn header_guard(filename: &str) -> String {
    let mut mapped = String::with_capacity(filename.len());
    for ch in filename.chars() {
        if ch.is_ascii_alphabetic() {
            mapped.push(ch.to_ascii_uppercase());
        } else {
            mapped.push('_');
        }
    }

    let lo = fnv1a(filename.as_bytes(), 0xcbf2_9ce4_8422_2325);
    let hi = fnv1a(filename.as_bytes(), 0x6c62_272e_07bb_0142);
    let digest = format!("{hi:016X}{lo:016X}");

    format!(
        "INC_{}_{}_{}_{}_{}_{}",
        mapped,
        &digest[0..8],
        &digest[8..12],
        &digest[12..16],
        &digest[16..20],
        &digest[20..32],
    )
}

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = seed;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
