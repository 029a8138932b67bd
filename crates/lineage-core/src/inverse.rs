//! Inverse-resolution rules.
//!
//! Given a directed edge and the inverse type its relationship type declares,
//! decide which mirrored row (if any) must exist alongside it. The store's
//! relationship writer applies the resulting [`InversePlan`] inside its
//! transaction; nothing here touches storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// "`subject` is `type_id` of `object`", without a row identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
  pub subject: Uuid,
  pub type_id: Uuid,
  pub object:  Uuid,
}

impl Edge {
  pub fn new(subject: Uuid, type_id: Uuid, object: Uuid) -> Self {
    Self { subject, type_id, object }
  }

  /// The same relationship read from the other side.
  pub fn mirrored(self, inverse_type: Uuid) -> Self {
    Self { subject: self.object, type_id: inverse_type, object: self.subject }
  }

  pub fn is_self_loop(&self) -> bool { self.subject == self.object }
}

/// What the writer must do about the inverse of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InversePlan {
  /// The type declares no inverse.
  NoInverse,
  /// Self-inverse type on a self-loop: the mirror would be the edge itself.
  SelfLoop,
  /// The mirrored edge that should exist (on create/update) or be removed
  /// (on update/delete).
  Mirror(Edge),
}

impl InversePlan {
  pub fn mirror(&self) -> Option<Edge> {
    match self {
      Self::Mirror(edge) => Some(*edge),
      Self::NoInverse | Self::SelfLoop => None,
    }
  }
}

/// Resolve the inverse plan for `edge` given its type's declared inverse.
pub fn plan(edge: Edge, inverse_type: Option<Uuid>) -> InversePlan {
  match inverse_type {
    None => InversePlan::NoInverse,
    Some(inverse) if inverse == edge.type_id && edge.is_self_loop() => {
      InversePlan::SelfLoop
    }
    Some(inverse) => InversePlan::Mirror(edge.mirrored(inverse)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids() -> (Uuid, Uuid, Uuid, Uuid) {
    (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
  }

  #[test]
  fn no_inverse_declared() {
    let (a, b, t, _) = ids();
    assert_eq!(plan(Edge::new(a, t, b), None), InversePlan::NoInverse);
  }

  #[test]
  fn distinct_inverse_swaps_members_and_type() {
    let (a, b, parent, child) = ids();
    let got = plan(Edge::new(a, parent, b), Some(child));
    assert_eq!(got, InversePlan::Mirror(Edge::new(b, child, a)));
  }

  #[test]
  fn self_inverse_between_two_members_mirrors() {
    let (a, b, spouse, _) = ids();
    let got = plan(Edge::new(a, spouse, b), Some(spouse));
    assert_eq!(got, InversePlan::Mirror(Edge::new(b, spouse, a)));
  }

  #[test]
  fn self_inverse_self_loop_is_skipped() {
    let (a, _, spouse, _) = ids();
    assert_eq!(plan(Edge::new(a, spouse, a), Some(spouse)), InversePlan::SelfLoop);
    assert_eq!(InversePlan::SelfLoop.mirror(), None);
  }

  #[test]
  fn self_loop_with_distinct_inverse_still_mirrors() {
    let (a, _, parent, child) = ids();
    let got = plan(Edge::new(a, parent, a), Some(child));
    assert_eq!(got.mirror(), Some(Edge::new(a, child, a)));
  }

  #[test]
  fn mirroring_twice_with_the_inverse_pair_round_trips() {
    let (a, b, parent, child) = ids();
    let edge = Edge::new(a, parent, b);
    assert_eq!(edge.mirrored(child).mirrored(parent), edge);
  }
}
