//! Lookup of named types for component macros.
//!
//! Types are looked up in the component's own script regions first, then
//! followed through relative imports. Imported files are read through a
//! [`TypeSourceLoader`] and parsed once per transform.

use crate::error::TransformError;
use crate::parse::{parse_module, ParsedSource};
use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use swc_ecma_ast::*;

/// How deep type references are followed before giving up.
pub(crate) const MAX_DEPTH: usize = 24;

/// Reads type source files on behalf of the macro resolver.
pub trait TypeSourceLoader: Send + Sync {
    /// Reads the file at `path`, returning `Ok(None)` when there is no such
    /// file.
    fn load(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Loads type sources from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl TypeSourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<Option<String>> {
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(path).map(Some)
    }
}

/// A named type declaration.
#[derive(Debug, Clone)]
pub(crate) enum TypeDecl {
    Interface(TsInterfaceDecl),
    Alias(TsTypeAliasDecl),
    Enum(TsEnumDecl),
}

/// A declaration and the module its spans belong to.
#[derive(Debug, Clone)]
pub(crate) struct Found {
    pub module: usize,
    pub decl: TypeDecl,
}

struct LoadedModule {
    parsed: ParsedSource,
    dir: PathBuf,
    /// One of the component's own script regions.
    local: bool,
}

pub(crate) struct TypeResolver<'a> {
    file_name: &'a str,
    loader: &'a dyn TypeSourceLoader,
    modules: Vec<LoadedModule>,
    by_path: FxHashMap<PathBuf, usize>,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over the component's parsed script regions.
    pub fn new(
        file_name: &'a str,
        loader: &'a dyn TypeSourceLoader,
        regions: Vec<ParsedSource>,
    ) -> Self {
        let dir = Path::new(file_name)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let modules = regions
            .into_iter()
            .map(|parsed| LoadedModule {
                parsed,
                dir: dir.clone(),
                local: true,
            })
            .collect();
        Self {
            file_name,
            loader,
            modules,
            by_path: FxHashMap::default(),
        }
    }

    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    pub fn parsed(&self, module: usize) -> &ParsedSource {
        &self.modules[module].parsed
    }

    pub fn unresolvable(&self, type_name: impl Into<String>, reason: impl Into<String>) -> TransformError {
        TransformError::unresolvable(self.file_name, type_name, reason)
    }

    /// Finds the declaration `name` refers to when used in `module`.
    pub fn lookup(&mut self, module: usize, name: &str) -> Result<Option<Found>, TransformError> {
        self.lookup_at(module, name, 0)
    }

    fn lookup_at(
        &mut self,
        module: usize,
        name: &str,
        depth: usize,
    ) -> Result<Option<Found>, TransformError> {
        if depth > MAX_DEPTH {
            return Err(self.unresolvable(name, "import chain is too deep"));
        }
        let scope: Vec<usize> = if self.modules[module].local {
            (0..self.modules.len())
                .filter(|&i| self.modules[i].local)
                .collect()
        } else {
            vec![module]
        };

        for &m in &scope {
            if let Some(decl) = find_declaration(self.modules[m].parsed.module(), name) {
                return Ok(Some(Found { module: m, decl }));
            }
        }
        for &m in &scope {
            let Some((source, imported)) = find_import(self.modules[m].parsed.module(), name)
            else {
                continue;
            };
            let target = self.load_relative(m, &source, name)?;
            return match self.lookup_at(target, &imported, depth + 1)? {
                Some(found) => Ok(Some(found)),
                None => Err(self.unresolvable(
                    name,
                    format!("`{}` has no type named `{}`", source, imported),
                )),
            };
        }
        Ok(None)
    }

    /// Loads the module `source` imported from `from`.
    fn load_relative(
        &mut self,
        from: usize,
        source: &str,
        type_name: &str,
    ) -> Result<usize, TransformError> {
        if !source.starts_with("./") && !source.starts_with("../") {
            return Err(self.unresolvable(
                type_name,
                format!("types imported from package `{}` cannot be resolved", source),
            ));
        }
        let base = normalize(&self.modules[from].dir.join(source));
        for path in candidates(&base) {
            if let Some(&index) = self.by_path.get(&path) {
                return Ok(index);
            }
            let text = match self.loader.load(&path) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(source) => return Err(TransformError::Io { path, source }),
            };
            log::debug!("loading macro types from {}", path.display());
            let parsed = parse_module(text, &path.to_string_lossy())?;
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            self.modules.push(LoadedModule {
                parsed,
                dir,
                local: false,
            });
            let index = self.modules.len() - 1;
            self.by_path.insert(path, index);
            return Ok(index);
        }
        Err(self.unresolvable(type_name, format!("no file found for `{}`", source)))
    }
}

/// Paths tried for an import specifier, in order.
fn candidates(base: &Path) -> Vec<PathBuf> {
    let with_suffix = |suffix: &str| {
        let mut path: OsString = base.as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    };
    let mut paths = Vec::new();
    if base.extension().is_some_and(|ext| ext == "js") {
        paths.push(base.with_extension("ts"));
    }
    paths.extend([
        base.to_path_buf(),
        with_suffix(".ts"),
        with_suffix(".d.ts"),
        with_suffix(".tsx"),
        base.join("index.ts"),
        base.join("index.d.ts"),
    ]);
    paths
}

/// Removes `.` components and folds `..` into the preceding component.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// A top-level type declaration named `name`.
fn find_declaration(module: &Module, name: &str) -> Option<TypeDecl> {
    module.body.iter().find_map(|item| {
        let decl = match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
            _ => return None,
        };
        match decl {
            Decl::TsInterface(d) if &*d.id.sym == name => Some(TypeDecl::Interface((**d).clone())),
            Decl::TsTypeAlias(d) if &*d.id.sym == name => Some(TypeDecl::Alias((**d).clone())),
            Decl::TsEnum(d) if &*d.id.sym == name => Some(TypeDecl::Enum((**d).clone())),
            _ => None,
        }
    })
}

/// The module and exported name a local binding is imported from, including
/// `export { X } from` re-exports.
fn find_import(module: &Module, name: &str) -> Option<(String, String)> {
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                for specifier in &import.specifiers {
                    if let ImportSpecifier::Named(named) = specifier {
                        if &*named.local.sym == name {
                            let imported = named
                                .imported
                                .as_ref()
                                .map_or_else(|| name.to_string(), export_name);
                            return Some((import.src.value.to_string_lossy().into_owned(), imported));
                        }
                    }
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(export)) => {
                let Some(src) = &export.src else {
                    continue;
                };
                for specifier in &export.specifiers {
                    if let ExportSpecifier::Named(named) = specifier {
                        let exported = named.exported.as_ref().unwrap_or(&named.orig);
                        if export_name(exported) == name {
                            return Some((
                                src.value.to_string_lossy().into_owned(),
                                export_name(&named.orig),
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLoader {
        files: FxHashMap<PathBuf, String>,
        reads: Mutex<Vec<PathBuf>>,
    }

    impl TypeSourceLoader for MemoryLoader {
        fn load(&self, path: &Path) -> io::Result<Option<String>> {
            self.reads.lock().unwrap().push(path.to_path_buf());
            Ok(self.files.get(path).cloned())
        }
    }

    fn region(source: &str) -> ParsedSource {
        parse_module(source.to_string(), "src/App.vue.ts").unwrap()
    }

    #[test]
    fn test_lookup_across_regions() {
        let loader = MemoryLoader::default();
        let mut resolver = TypeResolver::new(
            "src/App.vue",
            &loader,
            vec![region("const a = 1;\n"), region("export interface Props { a: string }\n")],
        );
        let found = resolver.lookup(0, "Props").unwrap().unwrap();
        assert_eq!(found.module, 1);
        assert!(matches!(found.decl, TypeDecl::Interface(_)));
        assert!(resolver.lookup(0, "Missing").unwrap().is_none());
    }

    #[test]
    fn test_lookup_through_relative_import() {
        let mut loader = MemoryLoader::default();
        loader.files.insert(
            PathBuf::from("src/types.ts"),
            "export { Size as Dimension } from './size';\n".to_string(),
        );
        loader.files.insert(
            PathBuf::from("src/size.ts"),
            "export type Size = 'sm' | 'lg';\n".to_string(),
        );
        let mut resolver = TypeResolver::new(
            "src/App.vue",
            &loader,
            vec![region("import type { Dimension } from './types';\n")],
        );
        let found = resolver.lookup(0, "Dimension").unwrap().unwrap();
        assert!(matches!(found.decl, TypeDecl::Alias(ref a) if &*a.id.sym == "Size"));
        let reads = loader.reads.lock().unwrap();
        assert_eq!(reads[0], PathBuf::from("src/types"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_package_import_is_unresolvable() {
        let loader = MemoryLoader::default();
        let mut resolver = TypeResolver::new(
            "App.vue",
            &loader,
            vec![region("import type { Props } from 'lib';\n")],
        );
        let err = resolver.lookup(0, "Props").unwrap_err();
        assert!(matches!(err, TransformError::UnresolvableType { .. }));
    }
}
