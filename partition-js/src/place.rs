use crate::file_registry::CompileClass;
use crate::graph;
use crate::ids::FileId;
use crate::ids::ModuleId;
use crate::module_graph::ModuleGraph;
use crate::order::Inference;
use ahash::HashMap;
use ahash::HashMapExt;
use itertools::Itertools;

/// The chosen module for every file, with per-module emission buckets.
/// Buckets are filled dependents-first and reversed at emission, which
/// restores the forward inferred-predecessor order within each module.
#[derive(Debug)]
pub struct Placement {
  pub compiled: Vec<Vec<FileId>>,
  pub dont_compile: Vec<Vec<FileId>>,
  pub assigned: Vec<ModuleId>,
}

/// Assigns each file to the lowest module that is an ancestor of every module
/// needing it. Files are visited dependents-first so that by the time a
/// predecessor is placed, every dependent's `needed_in` contribution has
/// already been registered.
pub fn place(module_graph: &ModuleGraph, inference: &mut Inference) -> Placement {
  let Inference {
    registry,
    preds,
    needed_in,
    file_topo,
  } = inference;

  let mut compiled = vec![Vec::new(); module_graph.len()];
  let mut dont_compile = vec![Vec::new(); module_graph.len()];
  let mut assigned = vec![ModuleId(0); registry.len()];
  let mut lca_cache = HashMap::<Vec<ModuleId>, Vec<ModuleId>>::new();

  for &f in file_topo.iter().rev() {
    // Every file was declared in at least one module, and root uniqueness
    // guarantees a common ancestor exists for any needed_in set.
    let key = needed_in[f.index()].iter().copied().sorted().collect_vec();
    let candidates = lca_cache
      .entry(key)
      .or_insert_with_key(|needed| lowest_common_ancestors(module_graph, needed))
      .clone();

    let m = if candidates.len() == 1 {
      candidates[0]
    } else {
      // Among equally deep candidates, minimize the predecessors that would
      // have to move along; candidates are sorted, so ties fall to the
      // smallest module id.
      let mut best = candidates[0];
      let mut best_moves = usize::MAX;
      for &c in &candidates {
        let moves = preds[f.index()]
          .iter()
          .filter(|p| !needed_in[p.index()].contains(&c))
          .count();
        if moves < best_moves {
          best = c;
          best_moves = moves;
        };
      }
      best
    };

    let newly_reached = !needed_in[f.index()].contains(&m);
    assigned[f.index()] = m;
    match registry.class(f) {
      CompileClass::Uncompiled => dont_compile[m.index()].push(f),
      CompileClass::NonNamespaced | CompileClass::Namespaced => compiled[m.index()].push(f),
    }

    // Placing f above every module that declared it drags its predecessors
    // up too: they must be loadable wherever f now loads.
    if newly_reached {
      for &p in &preds[f.index()] {
        needed_in[p.index()].insert(m);
      }
    };
  }

  Placement {
    compiled,
    dont_compile,
    assigned,
  }
}

/// The modules ancestral to every member of `needed`, filtered to those of
/// maximal depth (largest transitive-ancestor set), sorted by id.
fn lowest_common_ancestors(module_graph: &ModuleGraph, needed: &[ModuleId]) -> Vec<ModuleId> {
  let mut common = module_graph.module(needed[0]).trans_ancestors.clone();
  for &m in &needed[1..] {
    common = graph::intersect(&common, &module_graph.module(m).trans_ancestors);
  }
  let depth = |m: ModuleId| module_graph.module(m).trans_ancestors.len();
  let max_depth = common.iter().map(|&m| depth(m)).max().unwrap_or(0);
  common
    .into_iter()
    .filter(|&m| depth(m) == max_depth)
    .sorted()
    .collect()
}
