use crate::err::SolveError;
use crate::graph;
use crate::ids::ModuleId;
use crate::spec::ProjectSpec;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use itertools::Itertools;

/// Name of the module synthesized when the declared modules have more than
/// one root.
pub const VIRTUAL_BASE_MODULE: &str = "virtual_base_module";

/// A named node in the module DAG. Created during ingestion and never mutated
/// afterwards, apart from gaining an edge to the virtual root.
#[derive(Debug)]
pub struct Module {
  pub name: String,
  /// Direct deps in declaration order, deduplicated. The virtual root, when
  /// injected into a prior root, appends.
  pub direct_deps: Vec<ModuleId>,
  pub dep_set: HashSet<ModuleId>,
  /// Declared zero direct deps. The injected virtual root is not flagged.
  pub is_root: bool,
  /// Transitive ancestors, including self: every module loaded at or before
  /// this one.
  pub trans_ancestors: HashSet<ModuleId>,
}

/// The validated module DAG: interned names, resolved deps, optional virtual
/// root, topological order, and per-module transitive ancestor sets.
#[derive(Debug)]
pub struct ModuleGraph {
  modules: Vec<Module>,
  /// Every module appears after all modules it depends on, roots first.
  topo: Vec<ModuleId>,
  virtual_root: Option<ModuleId>,
}

impl ModuleGraph {
  pub fn build(spec: &ProjectSpec) -> Result<Self, SolveError> {
    let mut by_name = HashMap::<String, ModuleId>::with_capacity(spec.modules.len());
    for (i, decl) in spec.modules.iter().enumerate() {
      if by_name.insert(decl.name.clone(), ModuleId(i as u32)).is_some() {
        return Err(SolveError::DuplicateModule {
          module: decl.name.clone(),
        });
      };
    }

    let mut modules = Vec::with_capacity(spec.modules.len() + 1);
    for decl in &spec.modules {
      let mut direct_deps = Vec::new();
      let mut dep_set = HashSet::<ModuleId>::default();
      for dep in &decl.direct_deps {
        let Some(&id) = by_name.get(dep) else {
          return Err(SolveError::UnknownDepModule {
            module: decl.name.clone(),
            dep: dep.clone(),
          });
        };
        if dep_set.insert(id) {
          direct_deps.push(id);
        };
      }
      modules.push(Module {
        name: decl.name.clone(),
        is_root: direct_deps.is_empty(),
        direct_deps,
        dep_set,
        trans_ancestors: HashSet::default(),
      });
    }

    let roots = modules
      .iter()
      .enumerate()
      .filter(|(_, m)| m.is_root)
      .map(|(i, _)| ModuleId(i as u32))
      .collect_vec();

    // With a single root the DAG already converges. With several, synthesize
    // a common base every prior root loads first.
    let mut virtual_root = None;
    if roots.len() >= 2 {
      let vr = ModuleId(modules.len() as u32);
      modules.push(Module {
        name: VIRTUAL_BASE_MODULE.to_string(),
        direct_deps: Vec::new(),
        dep_set: HashSet::default(),
        is_root: false,
        trans_ancestors: HashSet::default(),
      });
      for &r in &roots {
        modules[r.index()].direct_deps.push(vr);
        modules[r.index()].dep_set.insert(vr);
      }
      virtual_root = Some(vr);
    }

    let adjacency = modules
      .iter()
      .enumerate()
      .map(|(i, m)| (ModuleId(i as u32), m.dep_set.clone()))
      .collect::<HashMap<_, _>>();
    let topo = graph::topological_sort(&adjacency).map_err(|cycle| SolveError::ModuleCycle {
      names: cycle
        .into_iter()
        .map(|id| modules[id.index()].name.clone())
        .sorted()
        .collect(),
    })?;

    // trans(m) = {m} ∪ trans(deps), valid because topo order visits deps
    // before their dependents.
    for &m in &topo {
      let mut trans = HashSet::<ModuleId>::default();
      trans.insert(m);
      let deps = modules[m.index()].direct_deps.clone();
      for d in deps {
        graph::union_into(&mut trans, &modules[d.index()].trans_ancestors);
      }
      modules[m.index()].trans_ancestors = trans;
    }

    let root_set = roots.iter().copied().collect::<HashSet<_>>();
    for m in &modules {
      let reachable_roots = m
        .trans_ancestors
        .iter()
        .copied()
        .filter(|r| root_set.contains(r))
        .collect_vec();
      if reachable_roots.len() > 1 {
        return Err(SolveError::MultipleRoots {
          module: m.name.clone(),
          roots: reachable_roots
            .iter()
            .map(|r| modules[r.index()].name.clone())
            .sorted()
            .collect(),
        });
      };
    }

    Ok(Self {
      modules,
      topo,
      virtual_root,
    })
  }

  pub fn module(&self, id: ModuleId) -> &Module {
    &self.modules[id.index()]
  }

  pub fn name(&self, id: ModuleId) -> &str {
    &self.modules[id.index()].name
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Module ids in topological order, roots first.
  pub fn topo_order(&self) -> &[ModuleId] {
    &self.topo
  }

  pub fn virtual_root(&self) -> Option<ModuleId> {
    self.virtual_root
  }
}
