//! Arranges a post's flat comment list into reply threads.
//!
//! Top-level comments have no parent. Every other comment is attached to the reply
//! list of the comment it names as parent, whatever that parent's own depth is.
//! Siblings are ordered oldest first; equal timestamps keep input order. Nesting stops
//! at [`MAX_THREAD_DEPTH`] and anything deeper is listed flat under the last level.
//!
//! A comment that cannot be reached from a top-level comment (its parent is gone, or
//! the parent links loop) is returned in [`CommentThreads::orphans`] instead of being
//! dropped silently. Orphans are ordered by timestamp, then id.

use super::entity::{Comment, CommentView};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

pub trait Threadable {
    fn thread_id(&self) -> Uuid;
    fn thread_parent(&self) -> Option<Uuid>;
    fn thread_created_at(&self) -> DateTime<Utc>;
}

impl Threadable for Comment {
    fn thread_id(&self) -> Uuid {
        self.id
    }
    fn thread_parent(&self) -> Option<Uuid> {
        self.parent_id
    }
    fn thread_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Threadable for CommentView {
    fn thread_id(&self) -> Uuid {
        self.comment.id
    }
    fn thread_parent(&self) -> Option<Uuid> {
        self.comment.parent_id
    }
    fn thread_created_at(&self) -> DateTime<Utc> {
        self.comment.created_at
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Thread<T> {
    #[serde(flatten)]
    pub comment: T,
    pub replies: Vec<Thread<T>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentThreads<T> {
    pub threads: Vec<Thread<T>>,
    pub orphans: Vec<T>,
    pub total: usize,
}

/// Deepest reply nesting a thread carries. Replies below this level hang off their
/// ancestor at the last allowed level, so rendering and dropping a thread stay bounded.
pub const MAX_THREAD_DEPTH: usize = 64;

pub fn thread_comments<T: Threadable>(mut comments: Vec<T>) -> CommentThreads<T> {
    let total = comments.len();
    // Stable: ties keep their input order.
    comments.sort_by_key(|c| c.thread_created_at());

    let index: HashMap<Uuid, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.thread_id(), i))
        .collect();

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    for (i, comment) in comments.iter().enumerate() {
        match comment.thread_parent() {
            None => roots.push(i),
            Some(parent) => {
                if let Some(&p) = index.get(&parent).filter(|&&p| p != i) {
                    children[p].push(i);
                }
            }
        }
    }

    // Breadth-first from the roots. `slot[i]` is the node whose replies hold `i`.
    let mut depth = vec![0usize; comments.len()];
    let mut slot: Vec<Option<usize>> = vec![None; comments.len()];
    let mut reached = vec![false; comments.len()];
    let mut order = Vec::with_capacity(comments.len());
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    for &root in &roots {
        reached[root] = true;
    }
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &child in &children[node] {
            if reached[child] {
                continue;
            }
            reached[child] = true;
            if depth[node] < MAX_THREAD_DEPTH {
                depth[child] = depth[node] + 1;
                slot[child] = Some(node);
            } else {
                depth[child] = depth[node];
                slot[child] = slot[node];
            }
            queue.push_back(child);
        }
    }

    let mut attached: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    for &node in &order {
        if let Some(holder) = slot[node] {
            attached[holder].push(node);
        }
    }

    let mut pending: Vec<Option<T>> = comments.into_iter().map(Some).collect();
    let mut orphans: Vec<T> = Vec::new();
    for (i, seen) in reached.iter().enumerate() {
        if !seen {
            orphans.extend(pending[i].take());
        }
    }
    orphans.sort_by_key(|c| (c.thread_created_at(), c.thread_id()));

    // Deepest first, so every reply is finished before the comment holding it.
    let mut built: Vec<Option<Thread<T>>> = (0..pending.len()).map(|_| None).collect();
    for &node in order.iter().rev() {
        let mut held = std::mem::take(&mut attached[node]);
        held.sort_unstable();
        let replies = held.into_iter().filter_map(|i| built[i].take()).collect();
        if let Some(comment) = pending[node].take() {
            built[node] = Some(Thread { comment, replies });
        }
    }

    let threads = roots.into_iter().filter_map(|i| built[i].take()).collect();

    CommentThreads {
        threads,
        orphans,
        total,
    }
}
