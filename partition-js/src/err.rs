use thiserror::Error;

/// Fatal, unrecoverable error during a solve call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
  #[error("module `{module}` is declared more than once")]
  DuplicateModule { module: String },
  #[error("module `{module}` depends on unknown module `{dep}`")]
  UnknownDepModule { module: String, dep: String },
  #[error("module dependency cycle involving {}", names.join(", "))]
  ModuleCycle { names: Vec<String> },
  #[error("module `{module}` transitively depends on multiple root modules: {}", roots.join(", "))]
  MultipleRoots { module: String, roots: Vec<String> },
  #[error("file `{path}` is declared with conflicting compile classes")]
  MixedCompileClass { path: String },
  #[error("inferred file ordering cycle involving {}", paths.join(", "))]
  InferredFileCycle { paths: Vec<String> },
}
