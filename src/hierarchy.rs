//! Parent/child reconstruction of a flat task list.
//!
//! The forest is rebuilt from a snapshot on every call and never cached.

use std::collections::{HashMap, HashSet};

use crate::task::Task;

/// A task with its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub task: Task,
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Depth-first, pre-order walk yielding `(depth, task)`. A task id is
    /// yielded at most once even if the tree was assembled by hand with
    /// repeated nodes.
    pub fn walk(&self) -> Vec<(usize, &Task)> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        walk_into(self, 0, &mut seen, &mut out);
        out
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TaskNode::size).sum::<usize>()
    }
}

fn walk_into<'a>(
    node: &'a TaskNode,
    depth: usize,
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<(usize, &'a Task)>,
) {
    if !seen.insert(node.task.id.as_str()) {
        return;
    }
    out.push((depth, &node.task));
    for child in &node.children {
        walk_into(child, depth + 1, seen, out);
    }
}

/// Walk a whole forest in order, sharing one visited set across roots.
pub fn walk_forest(forest: &[TaskNode]) -> Vec<(usize, &Task)> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for root in forest {
        walk_into(root, 0, &mut seen, &mut out);
    }
    out
}

/// Find a node by task id anywhere in the forest.
pub fn find_node<'a>(nodes: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
    for node in nodes {
        if node.task.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Whether re-parenting `id` under `parent` would close a cycle, i.e.
/// `parent` is `id` itself or one of its descendants.
pub fn would_cycle(tasks: &[Task], id: &str, parent: &str) -> bool {
    if id == parent {
        return true;
    }
    let forest = build_forest(tasks);
    match find_node(&forest, id) {
        Some(node) => node.walk().iter().any(|(_, t)| t.id == parent),
        // Already orphaned in a cycle; follow parent links instead.
        None => {
            let mut cur = Some(parent);
            let mut hops = 0;
            while let Some(pid) = cur {
                if pid == id {
                    return true;
                }
                hops += 1;
                if hops > tasks.len() {
                    break;
                }
                cur = tasks.iter().find(|t| t.id == pid).and_then(|t| t.parent_id.as_deref());
            }
            false
        }
    }
}

/// Build the parent/child forest for `tasks`.
///
/// Every id is indexed before any linking so input order does not matter.
/// A task whose `parent_id` is absent or names an unknown task becomes a root.
/// Siblings and roots keep their input order. Tasks caught in a parent cycle
/// are attached to each other but never to a root, so they are simply absent
/// from the result (see [`unreachable_ids`]).
pub fn build_forest(tasks: &[Task]) -> Vec<TaskNode> {
    // First occurrence of an id owns it.
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
    for (i, t) in tasks.iter().enumerate() {
        index.entry(t.id.as_str()).or_insert(i);
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (i, t) in tasks.iter().enumerate() {
        match t.parent_id.as_deref().and_then(|p| index.get(p)) {
            Some(&parent) => children.entry(parent).or_default().push(i),
            None => roots.push(i),
        }
    }

    let mut placed = vec![false; tasks.len()];
    roots
        .into_iter()
        .filter_map(|i| assemble(i, tasks, &children, &mut placed))
        .collect()
}

fn assemble(
    i: usize,
    tasks: &[Task],
    children: &HashMap<usize, Vec<usize>>,
    placed: &mut [bool],
) -> Option<TaskNode> {
    if placed[i] {
        return None;
    }
    placed[i] = true;
    let kids = children
        .get(&i)
        .map(|ids| {
            ids.iter()
                .filter_map(|&c| assemble(c, tasks, children, placed))
                .collect()
        })
        .unwrap_or_default();
    Some(TaskNode { task: tasks[i].clone(), children: kids })
}

/// Ids of tasks that do not appear anywhere in `forest`, in input order.
/// For a forest produced by [`build_forest`] these are the members of parent
/// cycles and their descendants.
pub fn unreachable_ids(tasks: &[Task], forest: &[TaskNode]) -> Vec<String> {
    let reachable: HashSet<&str> = walk_forest(forest)
        .into_iter()
        .map(|(_, t)| t.id.as_str())
        .collect();
    tasks
        .iter()
        .filter(|t| !reachable.contains(t.id.as_str()))
        .map(|t| t.id.clone())
        .collect()
}
