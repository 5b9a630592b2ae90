#![allow(dead_code)]

use partition_js::ModuleDecl;
use partition_js::ModuleOutput;
use partition_js::ProjectSpec;

pub fn project(modules: Vec<ModuleDecl>) -> ProjectSpec {
  ProjectSpec { modules }
}

/// Declares a module: deps, then the three file lists in class order
/// (uncompiled, non-namespaced, namespaced).
pub fn decl(
  name: &str,
  deps: &[&str],
  uncompiled: &[&str],
  non_namespaced: &[&str],
  namespaced: &[&str],
) -> ModuleDecl {
  let strings = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect();
  ModuleDecl {
    name: name.to_string(),
    direct_deps: strings(deps),
    uncompiled: strings(uncompiled),
    non_namespaced: strings(non_namespaced),
    namespaced_ordered: strings(namespaced),
  }
}

pub fn find<'a>(plan: &'a [ModuleOutput], name: &str) -> &'a ModuleOutput {
  plan
    .iter()
    .find(|m| m.name == name)
    .unwrap_or_else(|| panic!("no module `{name}` in plan"))
}

/// Every emitted path across both buckets of every module, in emission order.
pub fn all_emitted(plan: &[ModuleOutput]) -> Vec<String> {
  plan
    .iter()
    .flat_map(|m| {
      m.dont_compile_input_files
        .iter()
        .chain(m.compiled_input_files.iter())
        .cloned()
    })
    .collect()
}

/// Both buckets of one module, sorted, for membership assertions that should
/// not pin an order.
pub fn sorted_files(output: &ModuleOutput) -> Vec<String> {
  let mut files = output
    .dont_compile_input_files
    .iter()
    .chain(output.compiled_input_files.iter())
    .cloned()
    .collect::<Vec<_>>();
  files.sort();
  files
}
