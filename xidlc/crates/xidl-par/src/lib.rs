//! xidl-par - Recursive-descent IDL parser.
//!
//! The parser drives the lexer stack over the root file and its import
//! closure, accumulates type descriptors in the repository, and produces
//! the generation-hint stream for the code generator. Declarations made
//! in imported files land in the repository but emit no hints; only the
//! main file (lexer stack depth one) generates output.

mod decls;
mod edge_cases;
mod interface;
mod resolve;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use xidl_lex::{Lexer, LexerStack, TokenKind};
use xidl_meta::{Hint, HintKind, Repository, TypeDesc, TypeId};
use xidl_util::{Error, Result};

/// Parses IDL files into a repository of types plus a hint stream.
///
/// One parser may be run over several root files in turn; the repository
/// accumulates across runs while the hint stream is specific to the last
/// root file.
pub struct Parser<'a> {
    include_paths: Vec<PathBuf>,
    repo: &'a mut Repository,

    // Per-parse state.
    namespaces: Vec<String>,
    hints: Vec<Hint>,
    lexers: LexerStack,
    processed_files: Vec<String>,
    forwards: Vec<TypeId>,
    last_line: u32,
}

impl<'a> Parser<'a> {
    /// A parser resolving imports against `include_paths` and writing
    /// type information into `repo`.
    pub fn new(include_paths: Vec<PathBuf>, repo: &'a mut Repository) -> Self {
        Parser {
            include_paths,
            repo,
            namespaces: Vec::new(),
            hints: Vec::new(),
            lexers: LexerStack::new(),
            processed_files: Vec::new(),
            forwards: Vec::new(),
            last_line: 1,
        }
    }

    /// Parse one root IDL file and return its hint stream.
    ///
    /// Types accumulate in the repository across calls; hints, the
    /// namespace stack and the processed-file list reset per call.
    /// Interfaces still forward-declared once the lexer stack drains are
    /// a semantic error naming the first such interface.
    pub fn parse(&mut self, idl_file: &Path) -> Result<Vec<Hint>> {
        self.hints.clear();
        self.namespaces.clear();
        self.lexers.clear();
        self.processed_files.clear();

        self.enter_idl_file(idl_file)?;

        while !self.lexers.is_empty() {
            let token = self.lexer().next();

            match token.kind() {
                TokenKind::Eof => {
                    self.last_line = self.lexer().line();
                    self.lexers.pop();
                }
                TokenKind::Import => self.handle_import()?,
                TokenKind::Namespace => self.handle_namespace_start()?,
                TokenKind::RCurly => self.handle_namespace_end(&token)?,
                TokenKind::Array => self.handle_array()?,
                TokenKind::Sequence => self.handle_sequence()?,
                TokenKind::Struct => self.handle_struct()?,
                TokenKind::Exception => self.handle_exception()?,
                TokenKind::Interface => self.handle_interface()?,
                TokenKind::Delegate => self.handle_delegate()?,
                TokenKind::Enum => self.handle_enum()?,
                _ => return Err(self.lexer().raise("unexpected token", &token)),
            }
        }

        if let Some(open) = self.namespaces.last() {
            return Err(Error::Semantic {
                filename: idl_file.display().to_string(),
                line: self.last_line,
                message: "namespace is not closed".into(),
                offending: open.clone(),
            });
        }

        if let Some(&id) = self.forwards.first() {
            let name = match self.repo.get(id) {
                TypeDesc::Interface(def) => def.name.clone(),
                _ => String::new(),
            };
            return Err(Error::Semantic {
                filename: idl_file.display().to_string(),
                line: self.last_line,
                message: "forward declaration for interface is not satisfied".into(),
                offending: name,
            });
        }

        Ok(std::mem::take(&mut self.hints))
    }

    /// The active lexer (top of the stack).
    fn lexer(&mut self) -> &mut Lexer {
        self.lexers.top_mut()
    }

    /// True while parsing the main IDL file.
    fn in_main_file(&self) -> bool {
        self.lexers.depth() == 1
    }

    fn add_hint(&mut self, kind: HintKind, parameter: impl Into<String>) {
        self.hints.push(Hint::new(kind, parameter));
    }

    /// Open the root file and push its lexer.
    fn enter_idl_file(&mut self, path: &Path) -> Result<()> {
        let filename = path.display().to_string();
        let file = File::open(path).map_err(|_| Error::IoOpen {
            filename: filename.clone(),
        })?;
        self.lexers.push(Box::new(BufReader::new(file)), filename);
        Ok(())
    }

    /// Try the import name against each include path in order.
    ///
    /// Deduplication later compares the resolved path string; the same
    /// file reached through two include prefixes is not detected.
    fn open_idl_file(&self, name: &str) -> Option<(Box<dyn BufRead>, String)> {
        for path in &self.include_paths {
            let candidate = path.join(name);
            if let Ok(file) = File::open(&candidate) {
                let stream: Box<dyn BufRead> = Box::new(BufReader::new(file));
                return Some((stream, candidate.display().to_string()));
            }
        }
        None
    }

    fn imported_before(&self, file: &str) -> bool {
        self.processed_files.iter().any(|f| f == file)
    }

    /// `import "path" ;` whose `import` keyword is already read.
    fn handle_import(&mut self) -> Result<()> {
        let filename_tok = self.lexer().expect(TokenKind::StringLiteral)?;
        self.lexer().discard(TokenKind::Semicolon)?;

        let (stream, full_path) = match self.open_idl_file(filename_tok.text()) {
            Some(found) => found,
            None => {
                return Err(Error::IoOpen {
                    filename: filename_tok.text().to_owned(),
                })
            }
        };

        if self.imported_before(&full_path) {
            return Ok(());
        }

        self.lexers.push(stream, full_path.clone());
        self.processed_files.push(full_path);

        // The import statement itself sits one level below the new top.
        if self.lexers.depth() == 2 {
            self.add_hint(HintKind::GenImport, filename_tok.text());
        }

        Ok(())
    }

    /// `namespace Ident {` whose keyword is already read.
    fn handle_namespace_start(&mut self) -> Result<()> {
        let name_tok = self.lexer().expect(TokenKind::Identifier)?;
        self.lexer().discard(TokenKind::LCurly)?;
        self.namespaces.push(name_tok.text().to_owned());

        if self.in_main_file() {
            self.add_hint(HintKind::EnterNamespace, name_tok.text());
        }
        Ok(())
    }

    /// An unmatched `}` at top level closes the deepest namespace.
    fn handle_namespace_end(&mut self, token: &xidl_lex::Token) -> Result<()> {
        match self.namespaces.pop() {
            Some(name) => {
                if self.in_main_file() {
                    self.add_hint(HintKind::LeaveNamespace, name);
                }
                Ok(())
            }
            None => Err(self.lexer().raise("unexpected token", token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidl_meta::{PassMode, TypeKind};

    pub(crate) fn parse_source(source: &str) -> (Result<Vec<Hint>>, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.idl");
        std::fs::write(&path, source).unwrap();

        let mut repo = Repository::new();
        let result = Parser::new(Vec::new(), &mut repo).parse(&path);
        (result, repo)
    }

    const IUNKNOWN: &str = "namespace xcom {\n\
        interface IUnknown(\"6e9e44bf-d0f4-4617-b880-0ba98a0b0897\") {}\n\
        }\n";

    #[test]
    fn test_empty_file() {
        let (result, repo) = parse_source("");
        assert!(result.unwrap().is_empty());
        assert_eq!(repo.len(), TypeKind::BUILTINS.len());
    }

    #[test]
    fn test_enum_round_trip() {
        let (result, repo) = parse_source("namespace m { enum E { A, B } }");
        let hints = result.unwrap();

        assert_eq!(
            hints,
            vec![
                Hint::new(HintKind::EnterNamespace, "m"),
                Hint::new(HintKind::GenType, "m.E"),
                Hint::new(HintKind::LeaveNamespace, "m"),
            ]
        );

        let id = repo.find("m.E").unwrap();
        match repo.get(id) {
            TypeDesc::Enum(def) => {
                assert_eq!(def.name, "m.E");
                assert_eq!(def.elements, vec!["A", "B"]);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn test_struct_members() {
        let (result, repo) =
            parse_source("namespace m { struct P { int x; int y; string label; } }");
        result.unwrap();

        let id = repo.find("m.P").unwrap();
        match repo.get(id) {
            TypeDesc::Struct(def) => {
                assert_eq!(def.members.len(), 3);
                assert_eq!(def.members[0].name, "x");
                assert_eq!(repo.get(def.members[2].ty).kind(), TypeKind::String);
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn test_array_and_sequence() {
        let (result, repo) =
            parse_source("namespace m { array<double, 16> Matrix; sequence<int> Ints; }");
        result.unwrap();

        match repo.get(repo.find("m.Matrix").unwrap()) {
            TypeDesc::Array(def) => {
                assert_eq!(def.size, 16);
                assert_eq!(repo.get(def.element).kind(), TypeKind::Double);
            }
            other => panic!("expected array, got {other:?}"),
        }
        match repo.get(repo.find("m.Ints").unwrap()) {
            TypeDesc::Sequence(def) => {
                assert_eq!(repo.get(def.element).kind(), TypeKind::Int);
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_interface_forward_then_define() {
        let source = format!(
            "{IUNKNOWN}namespace m {{\n\
             interface I;\n\
             interface I(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
             int count();\n\
             }}\n\
             }}\n"
        );
        let (result, repo) = parse_source(&source);
        let hints = result.unwrap();

        let m_hints: Vec<_> = hints
            .iter()
            .filter(|h| h.parameter == "m.I")
            .map(|h| h.kind)
            .collect();
        assert_eq!(m_hints, vec![HintKind::GenForward, HintKind::GenType]);

        let id = repo.find("m.I").unwrap();
        match repo.get(id) {
            TypeDesc::Interface(def) => {
                assert!(!def.is_forward());
                assert_eq!(def.methods.len(), 1);
                assert_eq!(def.methods[0].name, "count");
                assert_eq!(def.methods[0].return_param().mode, PassMode::Return);
                assert_eq!(def.base, repo.find("xcom.IUnknown"));
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_unsatisfied_forward() {
        let (result, _) = parse_source("namespace m { interface I; }");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("m.I"), "got: {err}");
        assert!(err.to_string().contains("forward declaration"));
    }

    #[test]
    fn test_delegate() {
        let (result, repo) = parse_source("delegate void Callback(in int event);");
        let hints = result.unwrap();
        assert_eq!(hints, vec![Hint::new(HintKind::GenType, "Callback")]);

        match repo.get(repo.find("Callback").unwrap()) {
            TypeDesc::Delegate(def) => {
                assert_eq!(def.return_param().mode, PassMode::Return);
                assert_eq!(repo.get(def.return_param().ty).kind(), TypeKind::Void);
                assert_eq!(def.args().len(), 1);
                assert_eq!(def.args()[0].name, "event");
            }
            other => panic!("expected delegate, got {other:?}"),
        }
    }

    #[test]
    fn test_namespace_resolution_innermost_wins() {
        let source = "namespace a {\n\
            enum C { One }\n\
            namespace b {\n\
            sequence<C> S;\n\
            }\n\
            }\n";
        let (result, repo) = parse_source(source);
        result.unwrap();

        let seq = repo.find("a.b.S").unwrap();
        match repo.get(seq) {
            TypeDesc::Sequence(def) => {
                assert_eq!(def.element, repo.find("a.C").unwrap());
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_hints_balance() {
        let source = "namespace a { namespace b { enum E { X } } namespace c { } }";
        let (result, _) = parse_source(source);
        let hints = result.unwrap();

        let mut depth = 0usize;
        let mut stack = Vec::new();
        for hint in &hints {
            match hint.kind {
                HintKind::EnterNamespace => {
                    depth += 1;
                    stack.push(hint.parameter.clone());
                }
                HintKind::LeaveNamespace => {
                    assert_eq!(stack.pop().as_deref(), Some(hint.parameter.as_str()));
                    depth -= 1;
                }
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_determinism() {
        let source = format!(
            "{IUNKNOWN}namespace m {{\n\
             enum E {{ A }}\n\
             struct S {{ int v; E e; }}\n\
             sequence<S> Seq;\n\
             }}\n"
        );
        let (first_hints, first_repo) = parse_source(&source);
        let (second_hints, second_repo) = parse_source(&source);

        assert_eq!(first_hints.unwrap(), second_hints.unwrap());

        let first_names: Vec<_> = first_repo
            .iter()
            .filter_map(|(_, d)| d.name().map(str::to_owned))
            .collect();
        let second_names: Vec<_> = second_repo
            .iter()
            .filter_map(|(_, d)| d.name().map(str::to_owned))
            .collect();
        assert_eq!(first_names, second_names);
    }

    #[test]
    fn test_import_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.idl"), "namespace i { enum A { X } }").unwrap();

        let root = dir.path().join("main.idl");
        std::fs::write(&root, "import \"a.idl\";\nimport \"a.idl\";\n").unwrap();

        let mut repo = Repository::new();
        let hints = Parser::new(vec![dir.path().to_path_buf()], &mut repo)
            .parse(&root)
            .unwrap();

        let imports: Vec<_> = hints
            .iter()
            .filter(|h| h.kind == HintKind::GenImport)
            .collect();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].parameter, "a.idl");
        assert!(repo.find("i.A").is_some());
    }

    #[test]
    fn test_imported_declarations_emit_no_hints() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dep.idl"),
            "namespace dep { enum Hidden { X } }",
        )
        .unwrap();

        let root = dir.path().join("main.idl");
        std::fs::write(&root, "import \"dep.idl\";\nnamespace m { enum E { A } }").unwrap();

        let mut repo = Repository::new();
        let hints = Parser::new(vec![dir.path().to_path_buf()], &mut repo)
            .parse(&root)
            .unwrap();

        assert!(hints.iter().all(|h| h.parameter != "dep.Hidden"));
        assert!(hints.iter().all(|h| h.parameter != "dep"));
        assert!(repo.find("dep.Hidden").is_some());

        assert_eq!(
            hints,
            vec![
                Hint::new(HintKind::GenImport, "dep.idl"),
                Hint::new(HintKind::EnterNamespace, "m"),
                Hint::new(HintKind::GenType, "m.E"),
                Hint::new(HintKind::LeaveNamespace, "m"),
            ]
        );
    }

    #[test]
    fn test_missing_import_fails() {
        let (result, _) = parse_source("import \"nowhere.idl\";");
        let err = result.unwrap_err();
        assert!(matches!(err, Error::IoOpen { .. }));
        assert!(err.to_string().contains("nowhere.idl"));
    }

    #[test]
    fn test_unopenable_root_fails() {
        let mut repo = Repository::new();
        let err = Parser::new(Vec::new(), &mut repo)
            .parse(Path::new("/definitely/not/here.idl"))
            .unwrap_err();
        assert!(matches!(err, Error::IoOpen { .. }));
    }

    #[test]
    fn test_stray_closing_brace_fails() {
        let (result, _) = parse_source("}");
        assert!(result.is_err());
    }

    #[test]
    fn test_nothrow_is_rejected() {
        let (result, _) = parse_source("nothrow");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("nothrow"));
    }

    #[test]
    fn test_repository_accumulates_across_parses() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.idl");
        let second = dir.path().join("second.idl");
        std::fs::write(&first, "namespace a { enum E { X } }").unwrap();
        std::fs::write(&second, "namespace b { sequence<a::E> S; }").unwrap();

        let mut repo = Repository::new();
        let mut parser = Parser::new(Vec::new(), &mut repo);
        parser.parse(&first).unwrap();
        let hints = parser.parse(&second).unwrap();

        assert!(hints.iter().any(|h| h.parameter == "b.S"));
        assert!(hints.iter().all(|h| h.parameter != "a.E"));
        drop(parser);
        assert!(repo.find("a.E").is_some());
        assert!(repo.find("b.S").is_some());
    }
}
