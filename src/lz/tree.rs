//! The match index: 256 binary search trees (one per possible first byte)
//! over window positions, implemented as an arena of fixed-size arrays
//! rather than heap-allocated nodes — window position doubles as node
//! index, so no separate allocation is needed per insert.
//!
//! This is the classic LZSS incremental-tree structure (insert newest,
//! delete oldest, descend comparing the look-ahead string) with one
//! addition: [`Tree::insert`] applies the VRAM-safety rule, refusing to
//! record a match against the position immediately behind the cursor.

use super::window::{Window, LOOKAHEAD, WIN_SIZE};

/// Sentinel meaning "no child" / "not yet indexed".
const NIL: u32 = WIN_SIZE as u32;
/// One BST root per possible first byte of a look-ahead string.
const ROOT_BASE: u32 = WIN_SIZE as u32 + 1;
const ARENA_LEN: usize = WIN_SIZE + 1 + 256;

/// A candidate match: byte-count matched and the window position it was
/// found at. `length < MIN_MATCH` means "nothing worth tokenizing".
#[derive(Clone, Copy, Debug, Default)]
pub struct Match {
    pub position: u32,
    pub length: usize,
}

pub struct Tree {
    left: Vec<u32>,
    right: Vec<u32>,
    parent: Vec<u32>,
}

impl Tree {
    pub fn new() -> Self {
        // the 256 root slots (indices ROOT_BASE..) store their live child
        // in `right`; `left` is unused for them but kept uniform so every
        // index can be addressed through the same three arrays.
        Tree {
            left: vec![NIL; ARENA_LEN],
            right: vec![NIL; ARENA_LEN],
            parent: vec![NIL; ARENA_LEN],
        }
    }

    /// Insert the string at window position `r`, returning the best match
    /// found during the descent (and leaving `r` indexed in the tree
    /// either way, per the classic algorithm: a match of the full
    /// look-ahead length replaces the old node in place instead of
    /// inserting a new one).
    pub fn insert(&mut self, window: &Window, r: u32) -> Match {
        let key = window.string_at(r as usize);
        let mut cmp;
        let mut p = ROOT_BASE + key[0] as u32;
        self.left[r as usize] = NIL;
        self.right[r as usize] = NIL;
        let mut best = Match::default();

        loop {
            let child_slot;
            // descend: compare at the current node (skip for the root
            // sentinel itself, which carries no string).
            if p < ROOT_BASE {
                let candidate = window.string_at(p as usize);
                let mut i = 1;
                while i < LOOKAHEAD && key[i] == candidate[i] {
                    i += 1;
                }
                cmp = if i < LOOKAHEAD {
                    key[i] as i16 - candidate[i] as i16
                } else {
                    0
                };
                let vram_unsafe = p == (r + WIN_SIZE as u32 - 1) % WIN_SIZE as u32;
                if i > best.length && !vram_unsafe {
                    best = Match { position: p, length: i };
                    if best.length >= LOOKAHEAD {
                        self.replace(p, r);
                        return best;
                    }
                }
                child_slot = if cmp >= 0 { Side::Right } else { Side::Left };
            } else {
                // at a root: any existing subtree is the right child slot
                child_slot = Side::Right;
            }

            let next = match child_slot {
                Side::Left => self.left[p as usize],
                Side::Right => self.right[p as usize],
            };
            if next == NIL {
                match child_slot {
                    Side::Left => self.left[p as usize] = r,
                    Side::Right => self.right[p as usize] = r,
                }
                self.parent[r as usize] = p;
                return best;
            }
            p = next;
        }
    }

    /// Replace node `p` in place with node `r` (used when a full-length
    /// match is found: `r` is a better anchor for future matches than the
    /// aging `p`, so it inherits `p`'s position in the tree wholesale).
    fn replace(&mut self, p: u32, r: u32) {
        let dad = self.parent[p as usize];
        self.parent[r as usize] = dad;
        self.left[r as usize] = self.left[p as usize];
        self.right[r as usize] = self.right[p as usize];
        if self.left[r as usize] != NIL {
            self.parent[self.left[r as usize] as usize] = r;
        }
        if self.right[r as usize] != NIL {
            self.parent[self.right[r as usize] as usize] = r;
        }
        if self.right[dad as usize] == p {
            self.right[dad as usize] = r;
        } else {
            self.left[dad as usize] = r;
        }
        self.parent[p as usize] = NIL;
    }

    /// Remove window position `p` from whichever tree currently holds it.
    /// A no-op if `p` was never indexed (e.g. during start-up).
    pub fn delete(&mut self, p: u32) {
        if self.parent[p as usize] == NIL {
            return;
        }
        let replacement = match (self.left[p as usize], self.right[p as usize]) {
            (NIL, NIL) => NIL,
            (q, NIL) | (NIL, q) => q,
            (left, right) => {
                // descend as far right as possible under `left`; that
                // node is the in-order predecessor and takes `p`'s place.
                if self.right[left as usize] == NIL {
                    self.right[left as usize] = right;
                    self.parent[right as usize] = left;
                    left
                } else {
                    let mut q = self.right[left as usize];
                    while self.right[q as usize] != NIL {
                        q = self.right[q as usize];
                    }
                    let q_parent = self.parent[q as usize];
                    self.right[q_parent as usize] = self.left[q as usize];
                    if self.left[q as usize] != NIL {
                        self.parent[self.left[q as usize] as usize] = q_parent;
                    }
                    self.left[q as usize] = left;
                    self.parent[left as usize] = q;
                    self.right[q as usize] = right;
                    self.parent[right as usize] = q;
                    q
                }
            }
        };
        let dad = self.parent[p as usize];
        if replacement != NIL {
            self.parent[replacement as usize] = dad;
        }
        if self.right[dad as usize] == p {
            self.right[dad as usize] = replacement;
        } else {
            self.left[dad as usize] = replacement;
        }
        self.parent[p as usize] = NIL;
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}
