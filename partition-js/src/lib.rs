//! Module placement solver for multi-module JavaScript builds.
//!
//! A project declares output modules, the dependency edges between them, and
//! per-module input file lists in three compile classes. The solver validates
//! the module DAG (injecting a virtual root when the declared modules have
//! more than one), infers load-order constraints from every occurrence of
//! every file, assigns each file to the lowest module ancestral to everything
//! that needs it, and emits per-module ordered file lists for the surrounding
//! build layers to compile and concatenate.
//!
//! The solver is synchronous and pure: in-memory input, in-memory output, no
//! logging, no global state, deterministic for a fixed declaration order.

pub mod emit;
pub mod err;
pub mod file_registry;
pub mod graph;
pub mod ids;
pub mod module_graph;
pub mod order;
pub mod place;
pub mod spec;

pub use emit::ModuleOutput;
pub use err::SolveError;
pub use file_registry::CompileClass;
pub use ids::FileId;
pub use ids::ModuleId;
pub use module_graph::VIRTUAL_BASE_MODULE;
pub use spec::ModuleDecl;
pub use spec::ProjectSpec;

use module_graph::ModuleGraph;

/// Solves one build invocation: validates the module DAG, infers file order
/// constraints, places every file in exactly one module, and emits the plan
/// in module topological order. A project with zero modules is a valid empty
/// plan.
pub fn solve(spec: &ProjectSpec) -> Result<Vec<ModuleOutput>, SolveError> {
  let module_graph = ModuleGraph::build(spec)?;
  if module_graph.is_empty() {
    return Ok(Vec::new());
  }
  let mut inference = order::infer(&module_graph, spec)?;
  let placement = place::place(&module_graph, &mut inference);
  Ok(emit::emit(&module_graph, &inference.registry, &placement))
}
