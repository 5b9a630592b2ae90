use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Sorts a `node -> outgoing set` adjacency so that every node appears after
/// all nodes in its outgoing set (leaves first). Ready nodes are taken
/// smallest-first, so the order is deterministic for a fixed input.
///
/// Fails with the nodes that lie on cycles when no such order exists.
pub fn topological_sort<K>(adjacency: &HashMap<K, HashSet<K>>) -> Result<Vec<K>, Vec<K>>
where
  K: Copy + Eq + Hash + Ord,
{
  let mut nodes = HashSet::<K>::default();
  for (&n, outs) in adjacency {
    nodes.insert(n);
    for &t in outs {
      nodes.insert(t);
    }
  }

  let mut out_count = HashMap::<K, usize>::with_capacity(nodes.len());
  // Target -> nodes blocked on it.
  let mut waiters = HashMap::<K, Vec<K>>::new();
  for &n in &nodes {
    out_count.insert(n, 0);
  }
  for (&n, outs) in adjacency {
    for &t in outs {
      *out_count.get_mut(&n).unwrap() += 1;
      waiters.entry(t).or_default().push(n);
    }
  }

  let mut ready = out_count
    .iter()
    .filter(|(_, &c)| c == 0)
    .map(|(&n, _)| Reverse(n))
    .collect::<BinaryHeap<_>>();
  let mut sorted = Vec::with_capacity(nodes.len());
  while let Some(Reverse(n)) = ready.pop() {
    sorted.push(n);
    for &w in waiters.get(&n).map(Vec::as_slice).unwrap_or_default() {
      let c = out_count.get_mut(&w).unwrap();
      *c -= 1;
      if *c == 0 {
        ready.push(Reverse(w));
      };
    }
  }

  if sorted.len() == nodes.len() {
    Ok(sorted)
  } else {
    // A node with a nonzero outgoing count never became ready.
    let remaining = nodes
      .iter()
      .copied()
      .filter(|n| out_count[n] > 0)
      .collect::<HashSet<_>>();
    Err(cycle_core(adjacency, &remaining))
  }
}

/// Trims a failed sort's remainder down to the nodes actually on cycles, by
/// iteratively peeling nodes nothing in the remainder points at. A dependent
/// hanging off a cycle is not part of it and should not be reported.
fn cycle_core<K>(adjacency: &HashMap<K, HashSet<K>>, remaining: &HashSet<K>) -> Vec<K>
where
  K: Copy + Eq + Hash + Ord,
{
  let mut incoming = HashMap::<K, usize>::with_capacity(remaining.len());
  for &n in remaining {
    incoming.insert(n, 0);
  }
  for &n in remaining {
    for t in adjacency.get(&n).into_iter().flatten() {
      if remaining.contains(t) {
        *incoming.get_mut(t).unwrap() += 1;
      };
    }
  }

  let mut queue = incoming
    .iter()
    .filter(|(_, &c)| c == 0)
    .map(|(&n, _)| n)
    .collect_vec();
  let mut peeled = HashSet::<K>::default();
  while let Some(n) = queue.pop() {
    peeled.insert(n);
    for t in adjacency.get(&n).into_iter().flatten() {
      if remaining.contains(t) && !peeled.contains(t) {
        let c = incoming.get_mut(t).unwrap();
        *c -= 1;
        if *c == 0 {
          queue.push(*t);
        };
      };
    }
  }

  let mut core = remaining.difference(&peeled).copied().collect_vec();
  core.sort_unstable();
  core
}

/// Intersection of two sets, iterating the smaller one.
pub fn intersect<K>(a: &HashSet<K>, b: &HashSet<K>) -> HashSet<K>
where
  K: Copy + Eq + Hash,
{
  let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
  small.iter().filter(|&k| large.contains(k)).copied().collect()
}

pub fn union_into<K>(dst: &mut HashSet<K>, src: &HashSet<K>)
where
  K: Copy + Eq + Hash,
{
  for &k in src {
    dst.insert(k);
  }
}
