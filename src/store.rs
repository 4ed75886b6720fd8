//! The document-wide object store: a flat `(object#, generation#) → value`
//! table plus the circular free-object linked list rooted at the zeroth
//! object `(0, 65535)`. Grounded on the original's `PdfIndirectObject`
//! `attach`/`release` lifecycle and `free_object_list_tail` pointer
//! (`pdf.py`) — this module keeps the same two operations (`attach` gives an
//! object an identity, `free` moves it onto the free list with a bumped
//! generation) without the original's single-object-at-a-time class wrapper,
//! since Rust's ownership model lets the store hold values directly.

use crate::error::{PdfError, Result};
use crate::object::{ObjId, Value};
use std::collections::BTreeMap;

/// A single cross-reference entry, as it will be written.
#[derive(Debug, Clone, PartialEq)]
pub enum XrefEntry {
    InUse { offset: u64 },
    Free { next_free: u32, generation: u16 },
}

pub struct ObjectStore {
    contents: BTreeMap<ObjId, Value>,
    /// Generation currently in use for each live object number (absent once
    /// freed, since the slot moves to `free_next`/`free_gen`).
    live_generation: BTreeMap<u32, u16>,
    free_next: BTreeMap<u32, u32>,
    free_gen: BTreeMap<u32, u16>,
    free_tail: u32,
    next_object_number: u32,
}

impl ObjectStore {
    pub fn new() -> Self {
        let mut free_next = BTreeMap::new();
        let mut free_gen = BTreeMap::new();
        // The zeroth object heads (and, with nothing else freed yet,
        // terminates) the circular free list.
        free_next.insert(0, 0);
        free_gen.insert(0, 65535);
        ObjectStore {
            contents: BTreeMap::new(),
            live_generation: BTreeMap::new(),
            free_next,
            free_gen,
            free_tail: 0,
            next_object_number: 1,
        }
    }

    /// Give a fresh value an identity at the next unused object number,
    /// generation 0.
    pub fn attach(&mut self, value: Value) -> ObjId {
        let number = self.next_object_number;
        self.next_object_number += 1;
        let id = ObjId::new(number, 0);
        self.contents.insert(id, value);
        self.live_generation.insert(number, 0);
        id
    }

    /// Place a value at an explicit id (used when rebuilding a store from a
    /// parsed file, where object numbers are dictated by the source). A
    /// second attach at an already-attached or already-freed number is a
    /// build error.
    pub fn attach_with_id(&mut self, id: ObjId, value: Value) -> Result<()> {
        if self.live_generation.contains_key(&id.0) || self.free_gen.contains_key(&id.0) {
            return Err(PdfError::build(format!("object {} is already attached", id.0)));
        }
        self.contents.insert(id, value);
        self.live_generation.insert(id.0, id.1);
        if id.0 >= self.next_object_number {
            self.next_object_number = id.0 + 1;
        }
        Ok(())
    }

    /// Overwrite the contents of an already-live object (an incremental
    /// update to the same `(object#, generation#)` slot).
    pub fn set(&mut self, id: ObjId, value: Value) -> Result<()> {
        let current_gen = self
            .live_generation
            .get(&id.0)
            .ok_or_else(|| PdfError::build(format!("object {} is not live", id.0)))?;
        if *current_gen != id.1 {
            return Err(PdfError::build(format!(
                "object {} generation mismatch: slot is at generation {}",
                id.0, current_gen
            )));
        }
        self.contents.insert(id, value);
        Ok(())
    }

    pub fn get(&self, id: ObjId) -> Option<&Value> {
        self.contents.get(&id)
    }

    pub fn current_id(&self, number: u32) -> Option<ObjId> {
        self.live_generation.get(&number).map(|&gen| ObjId::new(number, gen))
    }

    /// Move a live object onto the free list, bumping its generation
    /// (capped at 65535, which permanently retires the slot).
    pub fn free(&mut self, id: ObjId) -> Result<()> {
        let current_gen = self
            .live_generation
            .get(&id.0)
            .copied()
            .ok_or_else(|| PdfError::build(format!("object {} is not in use", id.0)))?;
        if current_gen != id.1 {
            return Err(PdfError::build(format!("object {} generation mismatch on free", id.0)));
        }
        self.contents.remove(&id);
        self.live_generation.remove(&id.0);
        let next_gen = current_gen.saturating_add(1).min(65535);

        // Splice id.0 in just before the head (object 0), which is always
        // the tail's current successor.
        let head = self.free_next[&0];
        self.free_next.insert(self.free_tail, id.0);
        self.free_next.insert(id.0, head);
        self.free_gen.insert(id.0, next_gen);
        self.free_tail = id.0;
        Ok(())
    }

    pub fn highest_object_number(&self) -> u32 {
        self.next_object_number.saturating_sub(1)
    }

    /// Every object number ever assigned, in ascending order, with its
    /// current xref entry.
    pub fn entries(&self) -> Vec<(u32, XrefEntry)> {
        let mut out = Vec::new();
        for number in 0..self.next_object_number {
            if let Some(&gen) = self.live_generation.get(&number) {
                out.push((number, XrefEntry::InUse { offset: 0 }));
                let _ = gen;
            } else if let Some(&next) = self.free_next.get(&number) {
                out.push((
                    number,
                    XrefEntry::Free {
                        next_free: next,
                        generation: self.free_gen[&number],
                    },
                ));
            }
        }
        out
    }

    pub fn live_ids(&self) -> Vec<ObjId> {
        self.contents.keys().copied().collect()
    }

    /// Replace the free list wholesale from `(object#, next_free, generation)`
    /// triples read back from a file's xref tables. Used only when
    /// reconstructing a store from parsed input, where the linkage is
    /// dictated by the file rather than built incrementally via `free`.
    pub fn rebuild_free_list(&mut self, links: Vec<(u32, u32, u16)>) {
        if links.is_empty() {
            return;
        }
        self.free_next.clear();
        self.free_gen.clear();
        for (number, next, gen) in &links {
            self.free_next.insert(*number, *next);
            self.free_gen.insert(*number, *gen);
            if *number >= self.next_object_number {
                self.next_object_number = number + 1;
            }
        }
        if !self.free_next.contains_key(&0) {
            self.free_next.insert(0, 0);
            self.free_gen.insert(0, 65535);
        }
        self.free_tail = self
            .free_next
            .iter()
            .find(|&(&k, &v)| v == 0 && k != 0)
            .map(|(&k, _)| k)
            .unwrap_or(0);
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
