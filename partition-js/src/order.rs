use crate::err::SolveError;
use crate::file_registry::CompileClass;
use crate::file_registry::FileRegistry;
use crate::graph;
use crate::ids::FileId;
use crate::ids::ModuleId;
use crate::module_graph::ModuleGraph;
use crate::spec::ProjectSpec;
use ahash::HashMap;
use ahash::HashSet;
use itertools::Itertools;

/// Everything the placer consumes: the interned files, each file's inferred
/// predecessor set (files seen before it in *every* observed occurrence), the
/// modules each file must be loadable in, and a predecessors-first order over
/// all files.
#[derive(Debug)]
pub struct Inference {
  pub registry: FileRegistry,
  pub preds: Vec<HashSet<FileId>>,
  pub needed_in: Vec<HashSet<ModuleId>>,
  /// Every file appears after all of its inferred predecessors.
  pub file_topo: Vec<FileId>,
}

/// Walks the modules in topological order as if each loaded its ancestors'
/// files and then its own in class order (uncompiled, then non-namespaced,
/// then namespaced), recording for every occurrence of a file which files the
/// staged load order had already seen.
pub fn infer(graph: &ModuleGraph, spec: &ProjectSpec) -> Result<Inference, SolveError> {
  let mut registry = FileRegistry::default();
  let mut preds: Vec<HashSet<FileId>> = Vec::new();
  let mut needed_in: Vec<HashSet<ModuleId>> = Vec::new();

  let mut uncompiled_seen: Vec<HashSet<FileId>> = vec![HashSet::default(); graph.len()];
  // Uncompiled and non-namespaced files together: the staged prefix loaded
  // before any namespaced file.
  let mut pre_namespaced_seen: Vec<HashSet<FileId>> = vec![HashSet::default(); graph.len()];

  for &m in graph.topo_order() {
    let mut seen_uncompiled = HashSet::<FileId>::default();
    let mut seen_pre_ns = HashSet::<FileId>::default();
    for &d in &graph.module(m).direct_deps {
      graph::union_into(&mut seen_uncompiled, &uncompiled_seen[d.index()]);
      graph::union_into(&mut seen_pre_ns, &pre_namespaced_seen[d.index()]);
    }
    // Namespaced files are not inherited across modules; each module brings
    // its own already-dep-ordered namespaced list.
    let mut seen_ns_here = HashSet::<FileId>::default();

    // The virtual root has no declaration and no input files.
    if let Some(decl) = spec.modules.get(m.index()) {
      for path in &decl.uncompiled {
        let (f, first) = registry.intern(path, CompileClass::Uncompiled)?;
        record(f, first, &seen_uncompiled, &mut preds, &mut needed_in, m);
        seen_uncompiled.insert(f);
        seen_pre_ns.insert(f);
      }
      for path in &decl.non_namespaced {
        let (f, first) = registry.intern(path, CompileClass::NonNamespaced)?;
        record(f, first, &seen_pre_ns, &mut preds, &mut needed_in, m);
        seen_pre_ns.insert(f);
      }
      for path in &decl.namespaced_ordered {
        let (f, first) = registry.intern(path, CompileClass::Namespaced)?;
        let mut deps_before = seen_pre_ns.clone();
        graph::union_into(&mut deps_before, &seen_ns_here);
        record(f, first, &deps_before, &mut preds, &mut needed_in, m);
        seen_ns_here.insert(f);
      }
    }

    uncompiled_seen[m.index()] = seen_uncompiled;
    pre_namespaced_seen[m.index()] = seen_pre_ns;
  }

  let adjacency = registry
    .ids()
    .map(|f| (f, preds[f.index()].clone()))
    .collect::<HashMap<_, _>>();
  let file_topo = topological_file_order(&adjacency, &registry)?;

  Ok(Inference {
    registry,
    preds,
    needed_in,
    file_topo,
  })
}

/// A file g is a predecessor of f iff g precedes f in every observed
/// occurrence of f: first sight takes the whole seen-set, later sights
/// intersect it away.
fn record(
  f: FileId,
  first_seen: bool,
  deps_before: &HashSet<FileId>,
  preds: &mut Vec<HashSet<FileId>>,
  needed_in: &mut Vec<HashSet<ModuleId>>,
  m: ModuleId,
) {
  if first_seen {
    preds.push(deps_before.clone());
    needed_in.push(HashSet::default());
  } else {
    preds[f.index()] = graph::intersect(&preds[f.index()], deps_before);
  }
  needed_in[f.index()].insert(m);
}

fn topological_file_order(
  adjacency: &HashMap<FileId, HashSet<FileId>>,
  registry: &FileRegistry,
) -> Result<Vec<FileId>, SolveError> {
  graph::topological_sort(adjacency).map_err(|cycle| SolveError::InferredFileCycle {
    paths: cycle
      .into_iter()
      .map(|f| registry.path(f).to_string())
      .sorted()
      .collect(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::spec::ModuleDecl;

  fn infer_project(modules: Vec<ModuleDecl>) -> Inference {
    let spec = ProjectSpec { modules };
    let graph = ModuleGraph::build(&spec).unwrap();
    infer(&graph, &spec).unwrap()
  }

  fn file(inference: &Inference, path: &str) -> FileId {
    inference
      .registry
      .ids()
      .find(|&f| inference.registry.path(f) == path)
      .unwrap()
  }

  fn pred_paths(inference: &Inference, path: &str) -> Vec<String> {
    let f = file(inference, path);
    inference.preds[f.index()]
      .iter()
      .map(|&p| inference.registry.path(p).to_string())
      .sorted()
      .collect()
  }

  #[test]
  fn class_order_is_uncompiled_then_non_namespaced_then_namespaced() {
    let inference = infer_project(vec![ModuleDecl {
      name: "base".to_string(),
      uncompiled: vec!["u.js".to_string()],
      non_namespaced: vec!["p.js".to_string()],
      namespaced_ordered: vec!["n.js".to_string()],
      ..Default::default()
    }]);
    assert_eq!(pred_paths(&inference, "u.js"), Vec::<String>::new());
    assert_eq!(pred_paths(&inference, "p.js"), vec!["u.js"]);
    assert_eq!(pred_paths(&inference, "n.js"), vec!["p.js", "u.js"]);
  }

  #[test]
  fn uncompiled_files_do_not_see_non_namespaced_ones() {
    let inference = infer_project(vec![
      ModuleDecl {
        name: "base".to_string(),
        non_namespaced: vec!["p.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "client".to_string(),
        direct_deps: vec!["base".to_string()],
        uncompiled: vec!["u.js".to_string()],
        ..Default::default()
      },
    ]);
    // Uncompiled files load before every non-namespaced file, including
    // those of ancestor modules.
    assert_eq!(pred_paths(&inference, "u.js"), Vec::<String>::new());
  }

  #[test]
  fn predecessors_intersect_across_occurrences() {
    let inference = infer_project(vec![
      ModuleDecl {
        name: "base".to_string(),
        namespaced_ordered: vec!["base.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "client".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["a.js".to_string(), "common.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "server".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["b.js".to_string(), "common.js".to_string()],
        ..Default::default()
      },
    ]);
    // a.js precedes common.js only in client, b.js only in server; neither
    // survives the intersection.
    assert_eq!(pred_paths(&inference, "common.js"), Vec::<String>::new());
    assert_eq!(pred_paths(&inference, "a.js"), Vec::<String>::new());
  }

  #[test]
  fn namespaced_files_are_not_inherited_across_modules() {
    let inference = infer_project(vec![
      ModuleDecl {
        name: "base".to_string(),
        namespaced_ordered: vec!["base.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "client".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["client.js".to_string()],
        ..Default::default()
      },
    ]);
    assert_eq!(pred_paths(&inference, "client.js"), Vec::<String>::new());
  }

  #[test]
  fn non_namespaced_files_are_inherited_across_modules() {
    let inference = infer_project(vec![
      ModuleDecl {
        name: "base".to_string(),
        non_namespaced: vec!["lib.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "client".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["client.js".to_string()],
        ..Default::default()
      },
    ]);
    assert_eq!(pred_paths(&inference, "client.js"), vec!["lib.js"]);
  }

  #[test]
  fn needed_in_collects_every_declaring_module() {
    let inference = infer_project(vec![
      ModuleDecl {
        name: "base".to_string(),
        ..Default::default()
      },
      ModuleDecl {
        name: "client".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["common.js".to_string()],
        ..Default::default()
      },
      ModuleDecl {
        name: "server".to_string(),
        direct_deps: vec!["base".to_string()],
        namespaced_ordered: vec!["common.js".to_string()],
        ..Default::default()
      },
    ]);
    let f = file(&inference, "common.js");
    let expected = [ModuleId(1), ModuleId(2)].into_iter().collect::<HashSet<_>>();
    assert_eq!(inference.needed_in[f.index()], expected);
  }

  #[test]
  fn file_topo_puts_predecessors_first() {
    let inference = infer_project(vec![ModuleDecl {
      name: "base".to_string(),
      namespaced_ordered: vec!["a.js".to_string(), "b.js".to_string(), "c.js".to_string()],
      ..Default::default()
    }]);
    let positions: HashMap<FileId, usize> = inference
      .file_topo
      .iter()
      .enumerate()
      .map(|(i, &f)| (f, i))
      .collect();
    for f in inference.registry.ids() {
      for &p in &inference.preds[f.index()] {
        assert!(positions[&p] < positions[&f]);
      }
    }
  }

  #[test]
  fn conflicting_classes_are_rejected() {
    let spec = ProjectSpec {
      modules: vec![
        ModuleDecl {
          name: "base".to_string(),
          uncompiled: vec!["a.js".to_string()],
          ..Default::default()
        },
        ModuleDecl {
          name: "client".to_string(),
          direct_deps: vec!["base".to_string()],
          non_namespaced: vec!["a.js".to_string()],
          ..Default::default()
        },
      ],
    };
    let graph = ModuleGraph::build(&spec).unwrap();
    assert_eq!(infer(&graph, &spec).unwrap_err(), SolveError::MixedCompileClass {
      path: "a.js".to_string(),
    });
  }
}
