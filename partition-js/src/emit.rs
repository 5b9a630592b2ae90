use crate::file_registry::FileRegistry;
use crate::module_graph::ModuleGraph;
use crate::place::Placement;
use serde::Deserialize;
use serde::Serialize;

/// One module of the final plan: its post-injection direct deps and its two
/// ordered file lists. The surrounding concatenation layer writes the
/// dont-compile list first, then the compiled list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOutput {
  pub name: String,
  pub direct_deps: Vec<String>,
  pub compiled_input_files: Vec<String>,
  pub dont_compile_input_files: Vec<String>,
}

/// Emits one record per module in topological order, roots first. The
/// placement buckets were filled dependents-first, so reversing them restores
/// the forward inferred-predecessor order within each module.
pub fn emit(
  module_graph: &ModuleGraph,
  registry: &FileRegistry,
  placement: &Placement,
) -> Vec<ModuleOutput> {
  module_graph
    .topo_order()
    .iter()
    .map(|&m| {
      let module = module_graph.module(m);
      ModuleOutput {
        name: module.name.clone(),
        direct_deps: module
          .direct_deps
          .iter()
          .map(|&d| module_graph.name(d).to_string())
          .collect(),
        compiled_input_files: placement.compiled[m.index()]
          .iter()
          .rev()
          .map(|&f| registry.path(f).to_string())
          .collect(),
        dont_compile_input_files: placement.dont_compile[m.index()]
          .iter()
          .rev()
          .map(|&f| registry.path(f).to_string())
          .collect(),
      }
    })
    .collect()
}
