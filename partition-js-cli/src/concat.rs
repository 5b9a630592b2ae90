use anyhow::Context;
use anyhow::Result;
use partition_js::ModuleOutput;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Writes `<module>.js` for every plan module: the dont-compile files first,
/// then the compiled files, each streamed byte-for-byte in plan order.
pub fn concat_modules(root: Option<&Path>, dir: &Path, plan: &[ModuleOutput]) -> Result<()> {
  fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
  for module in plan {
    let target = dir.join(format!("{}.js", module.name));
    let mut out =
      File::create(&target).with_context(|| format!("create {}", target.display()))?;
    let paths = module
      .dont_compile_input_files
      .iter()
      .chain(module.compiled_input_files.iter());
    concatenate(root, paths, &mut out)?;
  }
  Ok(())
}

/// Streams each file into `out`, preserving order. Fails on the first
/// unreadable input, naming it.
pub fn concatenate<'a>(
  root: Option<&Path>,
  paths: impl Iterator<Item = &'a String>,
  out: &mut impl Write,
) -> Result<()> {
  for path in paths {
    let full = match root {
      Some(root) => root.join(path),
      None => PathBuf::from(path),
    };
    let mut file = File::open(&full).with_context(|| format!("open input file `{path}`"))?;
    io::copy(&mut file, out).with_context(|| format!("concatenate `{path}`"))?;
  }
  Ok(())
}
