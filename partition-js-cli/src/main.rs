use anyhow::Context;
use clap::Parser;
use partition_js::solve;
use partition_js::ProjectSpec;
use std::fs;
use std::io::stdin;
use std::io::Read;
use std::path::PathBuf;
use std::process::exit;

mod concat;
mod glob;

/// Decides which output module owns each input file of a multi-module
/// JavaScript project and writes the ordered per-module file lists as a JSON
/// plan.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
  /// Project spec JSON; stdin when omitted.
  spec: Option<PathBuf>,
  /// Source root. Enables glob expansion of the uncompiled and
  /// non-namespaced file lists and normalizes path separators.
  #[arg(long)]
  root: Option<PathBuf>,
  /// Write the plan here instead of stdout.
  #[arg(long)]
  out: Option<PathBuf>,
  /// Concatenate each module's files (dont-compile first, then compiled)
  /// into `<module>.js` under this directory, resolving inputs against
  /// --root when given.
  #[arg(long)]
  concat_dir: Option<PathBuf>,
  /// Pretty-print the plan JSON.
  #[arg(long)]
  pretty: bool,
}

fn main() -> anyhow::Result<()> {
  let args = Cli::parse();

  let raw = match &args.spec {
    Some(path) => {
      fs::read_to_string(path).with_context(|| format!("read spec {}", path.display()))?
    }
    None => {
      let mut buf = String::new();
      stdin()
        .read_to_string(&mut buf)
        .context("read spec from stdin")?;
      buf
    }
  };
  let mut spec: ProjectSpec = serde_json::from_str(&raw).context("parse spec JSON")?;

  if let Some(root) = &args.root {
    spec = glob::expand_project(root, spec)?;
  }

  let plan = match solve(&spec) {
    Ok(plan) => plan,
    Err(err) => {
      eprintln!("{err}");
      exit(1);
    }
  };

  let json = if args.pretty {
    serde_json::to_string_pretty(&plan)?
  } else {
    serde_json::to_string(&plan)?
  };
  match &args.out {
    Some(path) => fs::write(path, json + "\n")
      .with_context(|| format!("write plan {}", path.display()))?,
    None => println!("{json}"),
  }

  if let Some(dir) = &args.concat_dir {
    concat::concat_modules(args.root.as_deref(), dir, &plan)?;
  }

  Ok(())
}
