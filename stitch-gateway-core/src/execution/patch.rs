//! Batch replacement over immutable trees.
//!
//! Replacements are computed independently (and typically concurrently) from
//! one tree snapshot, then applied together in a single pass that rebuilds
//! only the spine above each replaced node and structurally reuses every
//! untouched subtree. Locations are child index paths taken in the same
//! snapshot, so applying one replacement never invalidates another; callers
//! must only hand in disjoint locations (no location nested under another).
//! This module is pure tree algebra: no I/O, no scheduling.

use std::collections::HashMap;
use std::sync::Arc;

/// A tree that can be traversed and rebuilt one level at a time.
pub(crate) trait TreeNode: Sized {
    fn children(&self) -> &[Arc<Self>];

    /// The same node with a different child list.
    fn with_children(&self, children: Vec<Arc<Self>>) -> Self;
}

/// The location of a node in a tree snapshot: child indexes from the root.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) struct NodePath(pub(crate) Vec<usize>);

/// Find every node matching `predicate` and return it with its location.
///
/// Matched nodes are not descended into, so the returned locations are
/// always disjoint and safe to patch as one batch.
pub(crate) fn collect_nodes<N, P>(root: &Arc<N>, predicate: P) -> Vec<(NodePath, Arc<N>)>
where
    N: TreeNode,
    P: Fn(&N) -> bool,
{
    let mut found = Vec::new();
    collect_into(root, &mut Vec::new(), &predicate, &mut found);
    found
}

fn collect_into<N, P>(
    node: &Arc<N>,
    prefix: &mut Vec<usize>,
    predicate: &P,
    found: &mut Vec<(NodePath, Arc<N>)>,
) where
    N: TreeNode,
    P: Fn(&N) -> bool,
{
    if predicate(node) {
        found.push((NodePath(prefix.clone()), Arc::clone(node)));
        return;
    }
    for (index, child) in node.children().iter().enumerate() {
        prefix.push(index);
        collect_into(child, prefix, predicate, found);
        prefix.pop();
    }
}

/// Apply a batch of `{location, replacement}` pairs to a snapshot, producing
/// a new tree. The batch is order independent; untouched subtrees are reused
/// as-is.
pub(crate) fn patch_tree<N: TreeNode>(
    root: &Arc<N>,
    patches: Vec<(NodePath, Arc<N>)>,
) -> Arc<N> {
    patch_at(
        root,
        patches
            .into_iter()
            .map(|(path, node)| (path.0, node))
            .collect(),
    )
}

fn patch_at<N: TreeNode>(node: &Arc<N>, patches: Vec<(Vec<usize>, Arc<N>)>) -> Arc<N> {
    if patches.is_empty() {
        return Arc::clone(node);
    }
    if let Some((_, replacement)) = patches.iter().find(|(path, _)| path.is_empty()) {
        return Arc::clone(replacement);
    }

    let mut per_child: HashMap<usize, Vec<(Vec<usize>, Arc<N>)>> = HashMap::new();
    for (mut path, replacement) in patches {
        let head = path.remove(0);
        per_child.entry(head).or_default().push((path, replacement));
    }

    let children = node
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| match per_child.remove(&index) {
            Some(child_patches) => patch_at(child, child_patches),
            None => Arc::clone(child),
        })
        .collect();
    Arc::new(node.with_children(children))
}
