use anyhow::Context;
use anyhow::Result;
use globset::GlobBuilder;
use globset::GlobSetBuilder;
use partition_js::ModuleDecl;
use partition_js::ProjectSpec;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Expands glob patterns in the unordered file lists of every module.
/// Namespaced lists are dependency-ordered upstream and pass through
/// untouched apart from separator normalization. Modules expand in parallel;
/// results keep declaration order.
pub fn expand_project(root: &Path, spec: ProjectSpec) -> Result<ProjectSpec> {
  let modules = spec
    .modules
    .into_par_iter()
    .map(|decl| expand_decl(root, decl))
    .collect::<Result<Vec<_>>>()?;
  Ok(ProjectSpec { modules })
}

fn expand_decl(root: &Path, mut decl: ModuleDecl) -> Result<ModuleDecl> {
  decl.uncompiled = resolve(root, &decl.uncompiled)
    .with_context(|| format!("expand uncompiled files of module `{}`", decl.name))?;
  decl.non_namespaced = resolve(root, &decl.non_namespaced)
    .with_context(|| format!("expand non-namespaced files of module `{}`", decl.name))?;
  decl.namespaced_ordered = decl
    .namespaced_ordered
    .iter()
    .map(|p| normalize(p))
    .collect();
  Ok(decl)
}

/// Resolves a pattern list against a root directory: literal entries pass
/// through as-is, glob entries expand to their sorted matches relative to the
/// root. Duplicates are dropped, keeping the first occurrence.
pub fn resolve(root: &Path, patterns: &[String]) -> Result<Vec<String>> {
  let mut out = Vec::new();
  let mut seen = HashSet::new();
  // The walk is shared by every glob in the list but skipped entirely for
  // literal-only lists.
  let mut walked: Option<Vec<String>> = None;

  for pattern in patterns {
    if is_glob(pattern) {
      let glob = GlobBuilder::new(&normalize(pattern))
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob `{pattern}`"))?;
      let mut builder = GlobSetBuilder::new();
      builder.add(glob);
      let set = builder
        .build()
        .with_context(|| format!("invalid glob `{pattern}`"))?;

      if walked.is_none() {
        walked = Some(walk(root)?);
      }
      for file in walked.as_ref().unwrap() {
        if set.is_match(file.as_str()) && seen.insert(file.clone()) {
          out.push(file.clone());
        };
      }
    } else {
      let path = normalize(pattern);
      if seen.insert(path.clone()) {
        out.push(path);
      };
    }
  }
  Ok(out)
}

fn is_glob(pattern: &str) -> bool {
  pattern.contains(['*', '?', '[', '{'])
}

fn normalize(path: &str) -> String {
  path.replace('\\', "/")
}

/// All files under the root, as sorted `/`-separated paths relative to it.
fn walk(root: &Path) -> Result<Vec<String>> {
  let mut files = Vec::new();
  for entry in WalkDir::new(root) {
    let entry = entry.with_context(|| format!("walk {}", root.display()))?;
    if !entry.file_type().is_file() {
      continue;
    };
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    files.push(normalize(&rel.to_string_lossy()));
  }
  files.sort();
  Ok(files)
}
