//! Dependency Graph Builder & Topological Evaluator
//!
//! For one parent, every `Pos::View` / `Dim::View` reference inside a
//! child's expressions becomes an edge `(target, child)`: the child can only
//! be resolved once the target's frame is final. References to the parent
//! itself are not edges, the parent's content rect is known before its
//! children are laid out.
//!
//! Edges are rebuilt on every pass and never stored on the views.
//!
//! # Ordering
//!
//! Edges from a further ancestor of the child are set aside first: that
//! ancestor is already resolved, and the edge is deferred. Then Kahn's
//! algorithm runs over the sibling set, children without incoming edges
//! first, in child order. Edges left over afterwards are either resolved by
//! a fallback or reported as a [`LayoutError`]:
//!
//! | leftover edge `(a, b)`           | outcome                              |
//! |----------------------------------|--------------------------------------|
//! | `a == b`                         | `b` appended once                    |
//! | `a`, `b` siblings (cycle)        | `a`, then `b`, appended if missing   |
//! | `a` destroyed                    | [`LayoutError::Dangling`]            |
//! | `a` a descendant of `b`          | [`LayoutError::ReferencesSubview`]   |
//! | anything else                    | [`LayoutError::Unattached`]          |
//!
//! Deferred edges are replayed by the resolver after the sibling pass,
//! using the ancestor's frame as the coordinate space.

use std::collections::VecDeque;

use crate::error::{LayoutError, Result};
use crate::tree::ViewTree;
use crate::view::ViewId;

/// `to` waits for `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: ViewId,
    pub to: ViewId,
}

/// Evaluation order for one sibling set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOrder {
    /// Children in the order they must be resolved.
    pub order: Vec<ViewId>,
    /// Cross-level references to replay after `order` is done.
    pub deferred: Vec<Edge>,
}

/// Collect the dependency edges among `parent`'s children.
///
/// Deduplicated; insertion order follows child order, then X, Y, Width,
/// Height.
pub fn collect_edges(tree: &ViewTree, parent: ViewId) -> Result<Vec<Edge>> {
    let view = tree.get(parent)?;
    let mut edges: Vec<Edge> = Vec::new();
    let mut targets = Vec::new();

    for &child in &view.children {
        let child_view = tree.get(child)?;
        if child_view.is_absolute() {
            continue;
        }

        targets.clear();
        child_view.x.collect_targets(&mut targets);
        child_view.y.collect_targets(&mut targets);
        child_view.width.collect_targets(&mut targets);
        child_view.height.collect_targets(&mut targets);

        for &target in &targets {
            if target == parent {
                continue;
            }
            let edge = Edge { from: target, to: child };
            if !edges.contains(&edge) {
                edges.push(edge);
            }
        }
    }

    Ok(edges)
}

/// Build the evaluation order for `parent`'s children.
pub fn layout_order(tree: &ViewTree, parent: ViewId) -> Result<LayoutOrder> {
    let edges = collect_edges(tree, parent)?;
    topological_sort(tree, parent, tree.children(parent), edges)
}

/// Order `nodes` so every edge's `from` precedes its `to`.
pub fn topological_sort(
    tree: &ViewTree,
    parent: ViewId,
    nodes: &[ViewId],
    mut edges: Vec<Edge>,
) -> Result<LayoutOrder> {
    let mut deferred = Vec::new();
    edges.retain(|edge| {
        let cross_level = edge.from != edge.to && tree.is_ancestor(edge.from, edge.to);
        if cross_level {
            deferred.push(*edge);
        }
        !cross_level
    });

    let mut order: Vec<ViewId> = Vec::with_capacity(nodes.len());
    let mut ready: VecDeque<ViewId> = nodes
        .iter()
        .copied()
        .filter(|node| !edges.iter().any(|edge| edge.to == *node))
        .collect();

    while let Some(node) = ready.pop_front() {
        if node != parent {
            order.push(node);
        }

        let released: Vec<ViewId> = edges
            .iter()
            .filter(|edge| edge.from == node)
            .map(|edge| edge.to)
            .collect();
        edges.retain(|edge| edge.from != node);

        for next in released {
            if next != parent
                && !edges.iter().any(|edge| edge.to == next)
                && !ready.contains(&next)
                && !order.contains(&next)
            {
                ready.push_back(next);
            }
        }
    }

    for Edge { from, to } in edges {
        if from == to {
            log::debug!("\"{}\" references itself, using its previous frame", tree.name_of(to));
            push_unique(&mut order, to);
            continue;
        }

        if !tree.contains(from) {
            return Err(LayoutError::Dangling { dependent: tree.name_of(to), target: from });
        }

        if tree.parent(from) == tree.parent(to) {
            log::debug!(
                "dependency cycle between siblings \"{}\" and \"{}\", resolving in child order",
                tree.name_of(from),
                tree.name_of(to)
            );
            push_unique(&mut order, from);
            push_unique(&mut order, to);
            continue;
        }

        if tree.is_ancestor(to, from) {
            return Err(LayoutError::ReferencesSubview {
                dependent: tree.name_of(to),
                target: tree.name_of(from),
            });
        }

        return Err(LayoutError::Unattached {
            dependent: tree.name_of(to),
            target: tree.name_of(from),
            parent: tree.name_of(parent),
        });
    }

    Ok(LayoutOrder { order, deferred })
}

fn push_unique(order: &mut Vec<ViewId>, id: ViewId) {
    if !order.contains(&id) {
        order.push(id);
    }
}

// =============================================================================
// Tests
// =============================================================================
