// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-to-frame mark diffing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::{Mark, MarkId, MarkKind, MarkPayload};

/// A change between two consecutive [`Scene::tick`] calls.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark appeared.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Z-index of the new mark.
        z_index: i32,
        /// New payload.
        new: Box<MarkPayload>,
        /// Bounds of the new payload, if known.
        bounds: Option<Rect>,
    },
    /// A mark changed payload or z-index.
    Update {
        /// Mark id.
        id: MarkId,
        /// Mark kind (of the new payload).
        kind: MarkKind,
        /// Previous z-index.
        old_z_index: i32,
        /// New z-index.
        new_z_index: i32,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
        /// Bounds of the new payload, if known.
        bounds: Option<Rect>,
    },
    /// A mark disappeared.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// Returns the id of the mark this diff refers to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// The retained set of marks of one surface.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scene contents with `marks` and returns what changed.
    ///
    /// Enter/update diffs follow the order of `marks`; exits follow ascending id order.
    /// If `marks` repeats an id, the last occurrence wins.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::with_capacity(marks.len());
        let mut order: Vec<MarkId> = Vec::with_capacity(marks.len());
        for mark in marks {
            let id = mark.id;
            if next.insert(id, mark).is_some() {
                tracing::warn!(id = id.0, "duplicate mark id in one tick; keeping the last");
            } else {
                order.push(id);
            }
        }

        let mut diffs = Vec::new();
        for id in &order {
            let new = &next[id];
            match self.marks.remove(id) {
                None => diffs.push(MarkDiff::Enter {
                    id: *id,
                    kind: new.kind(),
                    z_index: new.z_index,
                    new: Box::new(new.payload.clone()),
                    bounds: new.payload.bounds(),
                }),
                Some(old) if old.z_index == new.z_index && old.payload == new.payload => {}
                Some(old) => diffs.push(MarkDiff::Update {
                    id: *id,
                    kind: new.kind(),
                    old_z_index: old.z_index,
                    new_z_index: new.z_index,
                    old: Box::new(old.payload),
                    new: Box::new(new.payload.clone()),
                    bounds: new.payload.bounds(),
                }),
            }
        }

        let mut exits: Vec<Mark> = self.marks.drain().map(|(_, m)| m).collect();
        exits.sort_by_key(|m| m.id);
        diffs.extend(exits.into_iter().map(|m| MarkDiff::Exit {
            id: m.id,
            kind: m.kind(),
            old: Box::new(m.payload),
        }));

        tracing::trace!(marks = next.len(), diffs = diffs.len(), "scene tick");
        self.marks = next;
        diffs
    }

    /// Removes every mark, returning the exit diffs.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.tick(Vec::new())
    }

    /// Returns the mark with the given id.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Returns the number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if the scene holds no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns all marks in paint order (`(z_index, id)` ascending).
    pub fn marks_in_paint_order(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Returns the union of all known mark bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.marks
            .values()
            .filter_map(|m| m.payload.bounds())
            .reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::BezPath;
    use peniko::color::palette::css;

    use super::*;

    fn rect_mark(id: u64, x: f64) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .rect()
            .rect(Rect::new(x, 0.0, x + 10.0, 10.0))
            .fill(css::TOMATO)
            .build()
    }

    #[test]
    fn unchanged_marks_produce_no_diffs() {
        let mut scene = Scene::new();
        let first = scene.tick(vec![rect_mark(1, 0.0), rect_mark(2, 20.0)]);
        assert_eq!(first.len(), 2);
        let second = scene.tick(vec![rect_mark(1, 0.0), rect_mark(2, 20.0)]);
        assert!(second.is_empty(), "expected no diffs, got {second:?}");
    }

    #[test]
    fn changed_added_and_removed_marks_are_reported() {
        let mut scene = Scene::new();
        scene.tick(vec![rect_mark(1, 0.0), rect_mark(2, 20.0)]);
        let diffs = scene.tick(vec![rect_mark(1, 5.0), rect_mark(3, 40.0)]);

        let [
            MarkDiff::Update { id: updated, .. },
            MarkDiff::Enter { id: entered, .. },
            MarkDiff::Exit { id: exited, .. },
        ] = &diffs[..]
        else {
            panic!("unexpected diffs: {diffs:?}");
        };
        assert_eq!(*updated, MarkId::from_raw(1));
        assert_eq!(*entered, MarkId::from_raw(3));
        assert_eq!(*exited, MarkId::from_raw(2));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn empty_path_has_no_bounds() {
        let mark = Mark::builder(MarkId::from_raw(9))
            .path()
            .path(BezPath::new())
            .build();
        assert_eq!(mark.payload.bounds(), None);
    }

    #[test]
    fn paint_order_sorts_by_z_then_id() {
        let mut scene = Scene::new();
        let top = Mark::builder(MarkId::from_raw(1))
            .rect()
            .z_index(10)
            .build();
        let bottom = Mark::builder(MarkId::from_raw(2)).rect().z_index(-5).build();
        scene.tick(vec![top, bottom]);
        let ids: Vec<u64> = scene
            .marks_in_paint_order()
            .iter()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(ids, [2, 1]);
    }
}
