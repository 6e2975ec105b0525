//! xidl-gen - C++ binding-header generation.
//!
//! Consumes the type repository and hint stream produced by the parser
//! and writes the binding header(s). The [`rules::RuleBase`] answers, per
//! type, how values cross the raw ABI boundary; [`header`] renders the
//! actual text.

pub mod header;
pub mod helper;
pub mod indent;
pub mod rules;
pub mod tmpl;

use std::path::{Path, PathBuf};

use xidl_meta::{Hint, Repository};
use xidl_util::{Error, Result};

use helper::{header_guard, strip_path};

/// The code generator, configured with the driver's pass-through options.
pub struct CodeGen {
    options: Vec<String>,
    out_dir: PathBuf,
}

impl CodeGen {
    /// A generator writing into the current directory.
    pub fn new(options: Vec<String>) -> Self {
        CodeGen {
            options,
            out_dir: PathBuf::from("."),
        }
    }

    /// Redirect output into another directory.
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    fn have_option(&self, opt: &str, alt: &str) -> bool {
        self.options.iter().any(|o| o == opt || o == alt)
    }

    /// Generate the binding header(s) for one parsed IDL file into the
    /// current directory. Returns the paths written.
    ///
    /// By default the common header and the tie header go to separate
    /// files (`Name.hpp`, `NameTie.hpp`); `-s` / `--single-header`
    /// combines them.
    pub fn generate(
        &self,
        repo: &Repository,
        hints: &[Hint],
        idl_file_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let stem = file_stem(idl_file_name);

        if self.have_option("-s", "--single-header") {
            let filename = format!("{stem}.hpp");
            let mut content = String::new();
            header::gen_common_header(repo, hints, &mut content)?;
            header::gen_tie_header(repo, hints, &mut content)?;
            let path = self.out_dir.join(&filename);
            write_guarded(&path, &filename, &content)?;
            return Ok(vec![path]);
        }

        let common_name = format!("{stem}.hpp");
        let common_path = self.out_dir.join(&common_name);
        let mut common = String::new();
        header::gen_common_header(repo, hints, &mut common)?;
        write_guarded(&common_path, &common_name, &common)?;

        let mut tie = String::new();
        header::gen_tie_header(repo, hints, &mut tie)?;
        if tie.is_empty() {
            return Ok(vec![common_path]);
        }

        let tie_name = format!("{stem}Tie.hpp");
        let tie_path = self.out_dir.join(&tie_name);
        let tie_content = format!("\n#include \"{common_name}\"\n{tie}");
        write_guarded(&tie_path, &tie_name, &tie_content)?;

        Ok(vec![common_path, tie_path])
    }
}

/// Output name stem: the filename up to its first dot.
fn file_stem(idl_file_name: &str) -> String {
    let name = strip_path(idl_file_name);
    match name.find('.') {
        Some(pos) => name[..pos].to_owned(),
        None => name.to_owned(),
    }
}

fn write_guarded(path: &Path, filename: &str, content: &str) -> Result<()> {
    let guard = header_guard(filename);
    let text = format!("#ifndef {guard}\n#define {guard}\n{content}#endif\n");
    std::fs::write(path, text)
        .map_err(|_| Error::internal(format!("cannot write output file: {filename}")))
}
