use crate::err::SolveError;
use crate::ids::FileId;
use ahash::HashMap;
use serde::Serialize;

/// How a file is fed to the external compilers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum CompileClass {
  /// Emitted verbatim, never handed to a compiler.
  Uncompiled,
  /// Compiled, but not managed by the namespace resolver.
  NonNamespaced,
  /// Compiled and dependency-ordered by the upstream namespace resolver.
  Namespaced,
}

/// Interns file paths to dense identifiers in first-occurrence order and
/// remembers each file's compile class. Paths arrive already `/`-normalized;
/// the registry does not normalize.
#[derive(Debug, Default)]
pub struct FileRegistry {
  paths: Vec<String>,
  classes: Vec<CompileClass>,
  by_path: HashMap<String, FileId>,
}

impl FileRegistry {
  /// Returns the file's id and whether this was its first occurrence.
  /// A path re-offered with a different compile class is rejected.
  pub fn intern(&mut self, path: &str, class: CompileClass) -> Result<(FileId, bool), SolveError> {
    if let Some(&id) = self.by_path.get(path) {
      if self.classes[id.index()] != class {
        return Err(SolveError::MixedCompileClass {
          path: path.to_string(),
        });
      };
      return Ok((id, false));
    }
    let id = FileId(self.paths.len() as u32);
    self.paths.push(path.to_string());
    self.classes.push(class);
    self.by_path.insert(path.to_string(), id);
    Ok((id, true))
  }

  pub fn path(&self, file: FileId) -> &str {
    &self.paths[file.index()]
  }

  pub fn class(&self, file: FileId) -> CompileClass {
    self.classes[file.index()]
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  /// All file ids in first-occurrence order.
  pub fn ids(&self) -> impl Iterator<Item = FileId> {
    (0..self.paths.len() as u32).map(FileId)
  }
}
