//! Permutation operators for session orderings. Every operator here keeps
//! the ordering a permutation of `0..n`.

use crate::data::SessionId;
use rand::seq::SliceRandom;
use rand::Rng;

pub fn random_permutation<R: Rng>(n_sessions: usize, rng: &mut R) -> Vec<SessionId> {
  let mut order: Vec<SessionId> = (0..n_sessions).collect();
  order.shuffle(rng);

  return order;
}

/// Ordered crossover (OX). Two cut points `a < b` are drawn; the first child
/// takes `[a..=b]` from `second` and fills the remaining positions, starting
/// after `b` and wrapping, with the genes of `first` in the order they appear
/// after `b`. The second child is built symmetrically.
pub fn ordered_crossover<R: Rng>(
  first: &[SessionId],
  second: &[SessionId],
  rng: &mut R,
) -> (Vec<SessionId>, Vec<SessionId>) {
  let size = first.len().min(second.len());
  if size < 2 {
    return (first.to_vec(), second.to_vec());
  }

  let a = rng.gen_range(0, size);
  let mut b = rng.gen_range(0, size - 1);
  if b >= a {
    b += 1;
  }
  let (a, b) = if a < b { (a, b) } else { (b, a) };

  return (
    ordered_child(&second[..size], &first[..size], a, b),
    ordered_child(&first[..size], &second[..size], a, b),
  );
}

fn ordered_child(
  segment_parent: &[SessionId],
  order_parent: &[SessionId],
  a: usize,
  b: usize,
) -> Vec<SessionId> {
  let size = segment_parent.len();
  let mut taken = vec![false; size];
  let mut child = vec![0; size];

  for i in a..=b {
    child[i] = segment_parent[i];
    taken[segment_parent[i]] = true;
  }

  let mut next = (b + 1) % size;
  for offset in 0..size {
    let gene = order_parent[(b + 1 + offset) % size];
    if !taken[gene] {
      child[next] = gene;
      next = (next + 1) % size;
    }
  }

  return child;
}

/// Swaps each position, with probability `probability`, with another uniformly chosen position.
pub fn shuffle_indexes<R: Rng>(order: &mut [SessionId], probability: f64, rng: &mut R) {
  let size = order.len();
  if size < 2 {
    return;
  }

  for i in 0..size {
    if rng.gen::<f64>() < probability {
      let mut j = rng.gen_range(0, size - 1);
      if j >= i {
        j += 1;
      }
      order.swap(i, j);
    }
  }
}

pub fn is_permutation(order: &[SessionId]) -> bool {
  let mut seen = vec![false; order.len()];
  for &gene in order {
    if gene >= order.len() || seen[gene] {
      return false;
    }
    seen[gene] = true;
  }

  return true;
}
