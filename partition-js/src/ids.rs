use serde::Serialize;

/// A stable identifier for a module in a project.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct ModuleId(pub u32);

/// A stable identifier for an input file in a project.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct FileId(pub u32);

impl ModuleId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl FileId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}
