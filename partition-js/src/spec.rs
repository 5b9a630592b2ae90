use serde::Deserialize;
use serde::Serialize;

/// One declared output module and its input file lists.
///
/// `namespaced_ordered` comes pre-ordered by the upstream namespace resolver;
/// the solver preserves that order as declared dependency order. All paths use
/// `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDecl {
  pub name: String,
  #[serde(default)]
  pub direct_deps: Vec<String>,
  #[serde(default)]
  pub uncompiled: Vec<String>,
  #[serde(default)]
  pub non_namespaced: Vec<String>,
  #[serde(default)]
  pub namespaced_ordered: Vec<String>,
}

/// A full project: the module declarations of one build invocation.
///
/// Declaration order is significant (the solver's determinism guarantee is
/// relative to it), so this is an ordered list rather than a map keyed by
/// name. Module names must still be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
  pub modules: Vec<ModuleDecl>,
}
