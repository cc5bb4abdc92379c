//! Virtual base resolution
//!
//! A virtual base is shared: however many inheritance paths reach it, a
//! derived object holds it once. The full virtual base list of a type is
//! therefore a de-duplicated walk over its whole inheritance graph.
//!
//! The walk is defined by two mutually recursive folds:
//!
//! - *normal*(bases): for each base `B`, fold `B`'s direct virtual bases
//!   with *virtual*, then `B`'s direct bases with *normal*. Regular bases
//!   are never collected themselves.
//! - *virtual*(bases): for each virtual base `V`, fold `V`'s direct
//!   virtual bases with *virtual*, `V`'s direct bases with *normal*, then
//!   append `V` unless it is already collected.
//!
//! `virtual_bases(T) = virtual(T.virtual_bases, normal(T.bases, []))`.
//!
//! [`collect_virtual_bases`] runs the same walk over an explicit stack so
//! inheritance depth never touches the call stack. Every node is expanded
//! at most once per fold kind: a repeated expansion can only rediscover
//! bases that were already collected, so skipping it keeps the output
//! identical while bounding the walk to O(V + E). The same rule makes the
//! walk terminate on a cyclic graph, which only a faulty external
//! registration can produce.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Read access to direct inheritance edges
pub trait InheritanceGraph {
    /// Node identity
    type Node: Copy + Eq + Hash;

    /// Direct non-virtual bases of `node`, in declaration order
    fn bases(&self, node: Self::Node) -> &[Self::Node];

    /// Direct virtual bases of `node`, in declaration order
    fn virtual_bases(&self, node: Self::Node) -> &[Self::Node];
}

enum Step<N> {
    /// Fold the bases reachable through a regular base
    Normal(N),
    /// Fold the bases of a virtual base, then collect it
    Virtual(N),
    /// Collect a virtual base whose ancestors are done
    Collect(N),
}

fn push_normal<N: Copy>(stack: &mut Vec<Step<N>>, nodes: &[N]) {
    stack.extend(nodes.iter().rev().map(|&node| Step::Normal(node)));
}

fn push_virtual<N: Copy>(stack: &mut Vec<Step<N>>, nodes: &[N]) {
    stack.extend(nodes.iter().rev().map(|&node| Step::Virtual(node)));
}

/// All virtual bases of `root`, each once, in first-discovery order
pub fn collect_virtual_bases<G: InheritanceGraph>(graph: &G, root: G::Node) -> Vec<G::Node> {
    let mut collected = Vec::new();
    let mut seen = FxHashSet::default();
    let mut expanded_normal = FxHashSet::default();
    let mut expanded_virtual = FxHashSet::default();

    // The stack pops in reverse push order: push what runs last first.
    let mut stack = Vec::new();
    push_virtual(&mut stack, graph.virtual_bases(root));
    push_normal(&mut stack, graph.bases(root));

    while let Some(step) = stack.pop() {
        match step {
            Step::Normal(node) => {
                if !expanded_normal.insert(node) {
                    continue;
                }
                push_normal(&mut stack, graph.bases(node));
                push_virtual(&mut stack, graph.virtual_bases(node));
            }
            Step::Virtual(node) => {
                if seen.contains(&node) || !expanded_virtual.insert(node) {
                    continue;
                }
                stack.push(Step::Collect(node));
                push_normal(&mut stack, graph.bases(node));
                push_virtual(&mut stack, graph.virtual_bases(node));
            }
            Step::Collect(node) => {
                if seen.insert(node) {
                    collected.push(node);
                }
            }
        }
    }

    collected
}

/// Every transitive base of `root`, virtual or not, each once, depth-first
pub fn ancestors<G: InheritanceGraph>(graph: &G, root: G::Node) -> Vec<G::Node> {
    let mut found = Vec::new();
    let mut seen = FxHashSet::default();
    seen.insert(root);

    let mut stack: Vec<G::Node> = Vec::new();
    let push = |stack: &mut Vec<G::Node>, node: G::Node| {
        stack.extend(graph.virtual_bases(node).iter().rev().copied());
        stack.extend(graph.bases(node).iter().rev().copied());
    };
    push(&mut stack, root);

    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        found.push(node);
        push(&mut stack, node);
    }

    found
}
