//! xidl-drv - Compiler driver.
//!
//! Assembles the pipeline: argument filtering, one parse per input file
//! against a fresh repository, then header generation. A failed file is
//! reported and the batch continues; the exit status reflects whether
//! anything failed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use xidl_gen::CodeGen;
use xidl_meta::Repository;
use xidl_par::Parser;

/// Driver configuration distilled from the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Import search paths, in command-line order.
    pub include_paths: Vec<PathBuf>,

    /// Options forwarded to the code generator.
    pub options: Vec<String>,

    /// Positional IDL inputs.
    pub idl_files: Vec<String>,

    /// Progress lines on stderr.
    pub verbose: bool,
}

impl Config {
    /// Filter the raw arguments: `-I path` and `-Ipath` collect include
    /// paths, every other `-` argument is forwarded to the generator,
    /// the rest are inputs.
    pub fn from_args(args: Vec<String>) -> Result<Config> {
        let mut config = Config::default();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "-I" {
                match iter.next() {
                    Some(path) => config.include_paths.push(PathBuf::from(path)),
                    None => bail!("an argument must follow a '-I'"),
                }
            } else if let Some(path) = arg.strip_prefix("-I") {
                config.include_paths.push(PathBuf::from(path));
            } else if arg.starts_with('-') {
                config.options.push(arg);
            } else {
                config.idl_files.push(arg);
            }
        }

        config.verbose = config.options.iter().any(|o| o == "--verbose");
        Ok(config)
    }
}

/// Compile every input file in order. Returns the collected per-file
/// failure messages; an empty list means full success.
pub fn compile(config: &Config) -> Vec<String> {
    let mut messages = Vec::new();

    for idl_file in &config.idl_files {
        if config.verbose {
            eprintln!("Parsing: {idl_file}");
        }

        let mut repo = Repository::new();
        let parsed =
            Parser::new(config.include_paths.clone(), &mut repo).parse(Path::new(idl_file));

        let hints = match parsed {
            Ok(hints) => hints,
            Err(err) => {
                messages.push(err.to_string());
                continue;
            }
        };

        if config.verbose {
            eprintln!("Generating bindings for: {idl_file}");
        }

        let generator = CodeGen::new(config.options.clone());
        if let Err(err) = generator.generate(&repo, &hints, idl_file) {
            messages.push(err.to_string());
        }
    }

    messages
}

/// Full command-line entry: returns the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };

    if config.idl_files.is_empty() {
        eprintln!("usage: xidlc [-I include-path]... [options] idl-file...");
        return 2;
    }

    let messages = compile(&config);
    for message in &messages {
        eprintln!("{message}");
    }

    if messages.is_empty() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_args_separated_include() {
        let config = Config::from_args(args(&["-I", "/usr/idl", "main.idl"])).unwrap();
        assert_eq!(config.include_paths, vec![PathBuf::from("/usr/idl")]);
        assert_eq!(config.idl_files, vec!["main.idl"]);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_from_args_joined_include() {
        let config = Config::from_args(args(&["-I/a", "-I/b", "x.idl"])).unwrap();
        assert_eq!(
            config.include_paths,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_from_args_pass_through_options() {
        let config =
            Config::from_args(args(&["-s", "--single-header", "a.idl", "b.idl"])).unwrap();
        assert_eq!(config.options, vec!["-s", "--single-header"]);
        assert_eq!(config.idl_files, vec!["a.idl", "b.idl"]);
    }

    #[test]
    fn test_from_args_trailing_include_fails() {
        let err = Config::from_args(args(&["main.idl", "-I"])).unwrap_err();
        assert!(err.to_string().contains("must follow a '-I'"));
    }

    #[test]
    fn test_from_args_verbose_detected() {
        let config = Config::from_args(args(&["--verbose", "a.idl"])).unwrap();
        assert!(config.verbose);
        // Still forwarded; the generator ignores unknown options.
        assert_eq!(config.options, vec!["--verbose"]);
    }

    #[test]
    fn test_compile_collects_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.idl").display().to_string();
        let broken = dir.path().join("broken.idl");
        std::fs::write(&broken, "enum Empty { }").unwrap();

        let config = Config {
            include_paths: Vec::new(),
            options: Vec::new(),
            idl_files: vec![missing.clone(), broken.display().to_string()],
            verbose: false,
        };

        let messages = compile(&config);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("cannot open idl file"));
        assert!(messages[1].contains("an enumeration with no element"));
    }
}
