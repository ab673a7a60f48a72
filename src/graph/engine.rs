//! The dependency graph and its traversal queries.
//!
//! Edges point from a dependent module to the module it depends on.
//! "Impacting" modules are reached by following edges forward, "impacted"
//! modules by following them backward. Every traversal keeps a visited set
//! and uses an explicit queue, so cycles in the corpus are harmless.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::debug;

use super::types::*;
use crate::error::{Result, YangDepsError};

/// The module dependency graph. Immutable once built; queries return
/// owned views.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<ModuleNode, Relation>,
    /// Index: module name -> node index. Ordered, so iteration is lexical.
    name_index: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: BTreeMap::new(),
        }
    }

    /// Access the underlying petgraph (for plotting).
    pub(crate) fn inner_graph(&self) -> &DiGraph<ModuleNode, Relation> {
        &self.graph
    }

    // ─── Construction ───────────────────────────────────────────

    /// Insert a module, or upgrade an existing stub to a local definition.
    /// A local definition is never downgraded back to a stub.
    pub(crate) fn add_module(&mut self, node: ModuleNode) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(&node.name) {
            if node.origin.is_local() || self.graph[idx].is_stub() {
                self.graph[idx] = node;
            }
            return idx;
        }
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.name_index.insert(name, idx);
        idx
    }

    /// Add a dependency edge, collapsing repeats onto the strongest relation.
    /// Self-loops are refused; returns `false` when nothing was added.
    pub(crate) fn add_dependency(
        &mut self,
        dependent: NodeIndex,
        dependency: NodeIndex,
        relation: Relation,
    ) -> bool {
        if dependent == dependency {
            return false;
        }
        match self.graph.find_edge(dependent, dependency) {
            Some(edge) => {
                let current = self.graph[edge];
                self.graph[edge] = current.strongest(relation);
            }
            None => {
                self.graph.add_edge(dependent, dependency, relation);
            }
        }
        true
    }

    // ─── Lookup ─────────────────────────────────────────────────

    /// Number of modules, stubs included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleNode> {
        self.name_index.get(name).map(|&idx| &self.graph[idx])
    }

    /// All modules in lexical name order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> + '_ {
        self.name_index.values().map(move |&idx| &self.graph[idx])
    }

    /// All module names in lexical order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.name_index.keys().map(String::as_str)
    }

    pub(crate) fn find_node(&self, name: &str) -> Result<NodeIndex> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| YangDepsError::ModuleNotFound(name.to_string()))
    }

    /// Direct dependencies of a module, by name.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<(&str, Relation)>> {
        let idx = self.find_node(name)?;
        Ok(self.neighbors_sorted(idx, Direction::Outgoing))
    }

    /// Modules that directly depend on this one, by name.
    pub fn dependents_of(&self, name: &str) -> Result<Vec<(&str, Relation)>> {
        let idx = self.find_node(name)?;
        Ok(self.neighbors_sorted(idx, Direction::Incoming))
    }

    /// Every edge, ordered by (dependent, dependency).
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_references()
            .map(|edge| DependencyEdge {
                dependent: self.graph[edge.source()].name.clone(),
                dependency: self.graph[edge.target()].name.clone(),
                relation: *edge.weight(),
            })
            .collect();
        edges.sort_by(|a, b| {
            (&a.dependent, &a.dependency).cmp(&(&b.dependent, &b.dependency))
        });
        edges
    }

    // ─── Queries ────────────────────────────────────────────────

    /// Everything `name` transitively depends on, in lexical order.
    /// The module itself is never included, even when it sits on a cycle.
    pub fn impacting_modules(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.find_node(name)?;
        Ok(self.reachable_names(idx, Direction::Outgoing))
    }

    /// Everything that transitively depends on `name`, in lexical order.
    pub fn impacted_modules(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.find_node(name)?;
        Ok(self.reachable_names(idx, Direction::Incoming))
    }

    /// `impacting_modules` for every module, keyed by name.
    pub fn all_impacting(&self) -> BTreeMap<String, Vec<String>> {
        self.name_index
            .iter()
            .map(|(name, &idx)| (name.clone(), self.reachable_names(idx, Direction::Outgoing)))
            .collect()
    }

    /// `impacted_modules` for every module, keyed by name.
    pub fn all_impacted(&self) -> BTreeMap<String, Vec<String>> {
        self.name_index
            .iter()
            .map(|(name, &idx)| (name.clone(), self.reachable_names(idx, Direction::Incoming)))
            .collect()
    }

    /// The induced subgraph over `name`, its impacting set and its
    /// impacted set.
    pub fn subgraph(&self, name: &str) -> Result<DependencyGraph> {
        let idx = self.find_node(name)?;
        let mut keep: HashSet<NodeIndex> = HashSet::new();
        keep.insert(idx);
        keep.extend(self.reachable(idx, Direction::Outgoing));
        keep.extend(self.reachable(idx, Direction::Incoming));

        debug!(module = %name, size = keep.len(), "Extracted subgraph");
        Ok(self.induced(|node_idx, _| keep.contains(&node_idx)))
    }

    /// A copy without modules that have neither dependencies nor dependents.
    pub fn prune_standalone(&self) -> DependencyGraph {
        self.induced(|idx, graph| graph.neighbors_undirected(idx).next().is_some())
    }

    /// A copy restricted to modules whose names pass `keep`.
    pub fn retain_names(&self, keep: impl Fn(&str) -> bool) -> DependencyGraph {
        self.induced(|idx, graph| keep(&graph[idx].name))
    }

    /// Nested dependency tree rooted at `name`.
    ///
    /// Children are expanded breadth-first in lexical order. Each reachable
    /// module is expanded once, under the first parent that discovers it;
    /// every later occurrence, including the root reached through a cycle,
    /// is a leaf with `reference` set.
    pub fn dependency_tree(&self, name: &str) -> Result<DependencyTree> {
        let idx = self.find_node(name)?;
        self.build_forest(&[idx])
            .pop()
            .ok_or_else(|| YangDepsError::ModuleNotFound(name.to_string()))
    }

    /// Dependency trees covering the whole graph.
    ///
    /// Roots are the modules nothing depends on, in lexical order, followed
    /// by any module still unexpanded afterwards (members of cycles with no
    /// entry point). Expansion state is shared across roots, so every module
    /// is expanded exactly once in the forest.
    pub fn dependency_forest(&self) -> Vec<DependencyTree> {
        let mut roots: Vec<NodeIndex> = self
            .name_index
            .values()
            .copied()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        let mut covered: HashSet<NodeIndex> = roots.iter().copied().collect();
        for &root in &roots {
            covered.extend(self.reachable(root, Direction::Outgoing));
        }
        for &idx in self.name_index.values() {
            if covered.insert(idx) {
                roots.push(idx);
                covered.extend(self.reachable(idx, Direction::Outgoing));
            }
        }

        self.build_forest(&roots)
    }

    /// Summary counts.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_modules: self.graph.node_count(),
            total_edges: self.graph.edge_count(),
            ..GraphStats::default()
        };

        for node in self.graph.node_weights() {
            match node.origin.provenance() {
                Some(Provenance::Rfc) => stats.rfc_modules += 1,
                Some(Provenance::Draft) => stats.draft_modules += 1,
                None => stats.stub_modules += 1,
            }
            if node.kind == ModuleKind::Submodule {
                stats.submodules += 1;
            }
        }
        for relation in self.graph.edge_weights() {
            match relation {
                Relation::Import => stats.import_edges += 1,
                Relation::Include => stats.include_edges += 1,
            }
        }

        stats
    }

    // ─── Internal Helpers ───────────────────────────────────────

    fn neighbors_sorted(&self, idx: NodeIndex, direction: Direction) -> Vec<(&str, Relation)> {
        let mut out: Vec<(&str, Relation)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].name.as_str(), *edge.weight())
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Successors of `idx` with the edge relation, in lexical name order.
    fn successors_sorted(&self, idx: NodeIndex) -> Vec<(NodeIndex, Relation)> {
        let mut out: Vec<(NodeIndex, Relation)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
            .collect();
        out.sort_by(|a, b| self.graph[a.0].name.cmp(&self.graph[b.0].name));
        out
    }

    /// Breadth-first reachability from `start`, excluding `start`.
    fn reachable(&self, start: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        let mut found = Vec::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, direction) {
                if visited.insert(next) {
                    found.push(next);
                    queue.push_back(next);
                }
            }
        }

        found
    }

    fn reachable_names(&self, start: NodeIndex, direction: Direction) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .reachable(start, direction)
            .into_iter()
            .map(|idx| self.graph[idx].name.as_str())
            .collect();
        names.into_iter().map(String::from).collect()
    }

    fn induced(
        &self,
        keep: impl Fn(NodeIndex, &DiGraph<ModuleNode, Relation>) -> bool,
    ) -> DependencyGraph {
        let mut out = DependencyGraph::new();
        for &idx in self.name_index.values() {
            if keep(idx, &self.graph) {
                out.add_module(self.graph[idx].clone());
            }
        }
        for edge in self.graph.edge_references() {
            let dependent = &self.graph[edge.source()].name;
            let dependency = &self.graph[edge.target()].name;
            if let (Some(&from), Some(&to)) = (
                out.name_index.get(dependent),
                out.name_index.get(dependency),
            ) {
                out.add_dependency(from, to, *edge.weight());
            }
        }
        out
    }

    /// Expand trees from each root in turn with a shared claim set.
    ///
    /// Tree slots live in an arena; a slot's children are always created
    /// after it, so assembling in reverse creation order never recurses.
    fn build_forest(&self, roots: &[NodeIndex]) -> Vec<DependencyTree> {
        struct Slot {
            node: NodeIndex,
            relation: Option<Relation>,
            reference: bool,
            children: Vec<usize>,
        }

        let mut arena: Vec<Slot> = Vec::new();
        let mut claimed: HashSet<NodeIndex> = HashSet::new();
        let mut root_slots = Vec::with_capacity(roots.len());

        for &root in roots {
            let expand = claimed.insert(root);
            root_slots.push(arena.len());
            arena.push(Slot {
                node: root,
                relation: None,
                reference: !expand,
                children: Vec::new(),
            });
            if !expand {
                continue;
            }

            let mut queue: VecDeque<usize> = VecDeque::from([arena.len() - 1]);
            while let Some(slot) = queue.pop_front() {
                let node = arena[slot].node;
                for (child, relation) in self.successors_sorted(node) {
                    let expand = claimed.insert(child);
                    let child_slot = arena.len();
                    arena.push(Slot {
                        node: child,
                        relation: Some(relation),
                        reference: !expand,
                        children: Vec::new(),
                    });
                    arena[slot].children.push(child_slot);
                    if expand {
                        queue.push_back(child_slot);
                    }
                }
            }
        }

        let mut built: Vec<Option<DependencyTree>> = Vec::with_capacity(arena.len());
        built.resize_with(arena.len(), || None);
        for i in (0..arena.len()).rev() {
            let slot = &arena[i];
            let children = slot
                .children
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            built[i] = Some(DependencyTree {
                name: self.graph[slot.node].name.clone(),
                relation: slot.relation,
                reference: slot.reference,
                children,
            });
        }

        root_slots
            .into_iter()
            .filter_map(|slot| built[slot].take())
            .collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Query Result Types ─────────────────────────────────────────

/// One edge, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub dependent: String,
    pub dependency: String,
    pub relation: Relation,
}

/// A node of a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    pub name: String,
    /// Relation on the edge from the parent; `None` at a root.
    pub relation: Option<Relation>,
    /// Already expanded elsewhere in the tree; has no children here.
    pub reference: bool,
    pub children: Vec<DependencyTree>,
}

impl DependencyTree {
    /// Every name below the root that is expanded, in breadth-first order.
    pub fn expanded_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&DependencyTree> = self.children.iter().collect();
        while let Some(node) = queue.pop_front() {
            if !node.reference {
                out.push(node.name.as_str());
                queue.extend(node.children.iter());
            }
        }
        out
    }

    /// Distinct names appearing below the root, root excluded, lexical.
    pub fn flatten(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<&DependencyTree> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            if node.name != self.name {
                names.insert(node.name.as_str());
            }
            stack.extend(node.children.iter());
        }
        names.into_iter().map(String::from).collect()
    }

    /// Drop children (and their subtrees) whose name fails `keep`.
    pub fn prune(&mut self, keep: &impl Fn(&str) -> bool) {
        self.children.retain(|child| keep(&child.name));
        for child in &mut self.children {
            child.prune(keep);
        }
    }
}

/// Statistics about the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_modules: usize,
    pub rfc_modules: usize,
    pub draft_modules: usize,
    pub stub_modules: usize,
    pub submodules: usize,
    pub total_edges: usize,
    pub import_edges: usize,
    pub include_edges: usize,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::export::{render_json, to_hierarchy};
    use crate::filter::FilterSpec;
    use crate::query::{impact_report, impact_report_for};
    use proptest::prelude::*;
    use std::path::PathBuf;

    pub(crate) fn local(name: &str) -> ModuleNode {
        ModuleNode {
            name: name.to_string(),
            kind: ModuleKind::Module,
            origin: Origin::DefinedLocally {
                provenance: Provenance::Rfc,
                revision: None,
                path: PathBuf::from(format!("{name}.yang")),
            },
        }
    }

    /// Build a graph from (dependent, dependency, relation) triples.
    pub(crate) fn graph_of(edges: &[(&str, &str, Relation)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for &(from, to, relation) in edges {
            let a = graph.add_module(local(from));
            let b = graph.add_module(local(to));
            graph.add_dependency(a, b, relation);
        }
        graph
    }

    fn chain() -> DependencyGraph {
        graph_of(&[("A", "B", Relation::Import), ("B", "C", Relation::Include)])
    }

    fn leaf(name: &str, relation: Relation, reference: bool) -> DependencyTree {
        DependencyTree {
            name: name.into(),
            relation: Some(relation),
            reference,
            children: vec![],
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.stats(), GraphStats::default());
        assert!(graph.dependency_forest().is_empty());
    }

    #[test]
    fn test_chain_queries() {
        let graph = chain();

        let tree = graph.dependency_tree("A").unwrap();
        assert_eq!(
            tree,
            DependencyTree {
                name: "A".into(),
                relation: None,
                reference: false,
                children: vec![DependencyTree {
                    name: "B".into(),
                    relation: Some(Relation::Import),
                    reference: false,
                    children: vec![leaf("C", Relation::Include, false)],
                }],
            }
        );

        assert_eq!(graph.impacting_modules("A").unwrap(), vec!["B", "C"]);
        assert_eq!(graph.impacted_modules("C").unwrap(), vec!["A", "B"]);
        assert!(graph.impacted_modules("A").unwrap().is_empty());
        assert_eq!(tree.flatten(), graph.impacting_modules("A").unwrap());
    }

    #[test]
    fn test_unknown_module_is_lookup_error() {
        let graph = chain();
        assert!(matches!(
            graph.dependency_tree("Z"),
            Err(YangDepsError::ModuleNotFound(name)) if name == "Z"
        ));
        assert!(graph.impacting_modules("Z").is_err());
        assert!(graph.impacted_modules("Z").is_err());
        assert!(graph.subgraph("Z").is_err());
    }

    #[test]
    fn test_cycle_tree_is_finite() {
        let graph = graph_of(&[
            ("A", "B", Relation::Import),
            ("B", "C", Relation::Import),
            ("C", "A", Relation::Import),
        ]);

        let tree = graph.dependency_tree("A").unwrap();
        assert_eq!(tree.expanded_names(), vec!["B", "C"]);

        let c = &tree.children[0].children[0];
        assert_eq!(c.name, "C");
        assert_eq!(c.children, vec![leaf("A", Relation::Import, true)]);

        assert_eq!(graph.impacting_modules("A").unwrap(), vec!["B", "C"]);
        assert_eq!(graph.impacted_modules("A").unwrap(), vec!["B", "C"]);
    }

    #[test]
    fn test_diamond_expands_shared_node_once() {
        let graph = graph_of(&[
            ("top", "left", Relation::Import),
            ("top", "right", Relation::Import),
            ("left", "base", Relation::Import),
            ("right", "base", Relation::Import),
        ]);

        let tree = graph.dependency_tree("top").unwrap();
        assert_eq!(tree.expanded_names(), vec!["left", "right", "base"]);
        assert_eq!(tree.children[0].children, vec![DependencyTree {
            name: "base".into(),
            relation: Some(Relation::Import),
            reference: false,
            children: vec![],
        }]);
        assert_eq!(
            tree.children[1].children,
            vec![leaf("base", Relation::Import, true)]
        );
    }

    #[test]
    fn test_shallowest_parent_expands() {
        // "d" is reachable directly from the root and through "b"
        let graph = graph_of(&[
            ("a", "b", Relation::Import),
            ("a", "d", Relation::Import),
            ("b", "d", Relation::Import),
            ("d", "e", Relation::Import),
        ]);
        let tree = graph.dependency_tree("a").unwrap();
        assert_eq!(tree.children[0].children, vec![leaf("d", Relation::Import, true)]);
        assert_eq!(tree.children[1].name, "d");
        assert_eq!(tree.children[1].children.len(), 1);
    }

    #[test]
    fn test_repeated_edges_collapse_to_strongest() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_module(local("a"));
        let b = graph.add_module(local("b"));
        assert!(graph.add_dependency(a, b, Relation::Import));
        assert!(graph.add_dependency(a, b, Relation::Include));
        assert!(graph.add_dependency(a, b, Relation::Import));
        assert!(!graph.add_dependency(a, a, Relation::Import));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependencies_of("a").unwrap(), vec![("b", Relation::Include)]);
        assert_eq!(graph.dependents_of("b").unwrap(), vec![("a", Relation::Include)]);
    }

    #[test]
    fn test_stub_upgrades_but_never_downgrades() {
        let mut graph = DependencyGraph::new();
        graph.add_module(ModuleNode::stub("x"));
        assert!(graph.module("x").unwrap().is_stub());

        graph.add_module(local("x"));
        assert!(!graph.module("x").unwrap().is_stub());

        graph.add_module(ModuleNode::stub("x"));
        assert!(!graph.module("x").unwrap().is_stub());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_subgraph_members_and_edges() {
        let graph = graph_of(&[
            ("app", "mid", Relation::Import),
            ("mid", "base", Relation::Import),
            ("other", "base", Relation::Import),
            ("unrelated", "lonely", Relation::Import),
        ]);

        let sub = graph.subgraph("mid").unwrap();
        let names: Vec<_> = sub.module_names().collect();
        assert_eq!(names, vec!["app", "base", "mid"]);
        // other -> base is outside the induced set
        assert_eq!(sub.edge_count(), 2);
    }

    #[test]
    fn test_prune_standalone() {
        let mut graph = chain();
        graph.add_module(local("alone"));
        let pruned = graph.prune_standalone();
        assert!(!pruned.contains("alone"));
        assert_eq!(pruned.len(), 3);
        assert!(graph.contains("alone"));
    }

    #[test]
    fn test_forest_covers_rootless_cycles() {
        let graph = graph_of(&[
            ("app", "lib", Relation::Import),
            ("x", "y", Relation::Import),
            ("y", "x", Relation::Import),
        ]);
        let forest = graph.dependency_forest();
        let roots: Vec<_> = forest.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(roots, vec!["app", "x"]);
        assert_eq!(forest[1].children[0].children, vec![leaf("x", Relation::Import, true)]);
    }

    #[test]
    fn test_stats() {
        let mut graph = chain();
        graph.add_module(ModuleNode::stub("ghost"));
        let stats = graph.stats();
        assert_eq!(stats.total_modules, 4);
        assert_eq!(stats.rfc_modules, 3);
        assert_eq!(stats.stub_modules, 1);
        assert_eq!(stats.import_edges, 1);
        assert_eq!(stats.include_edges, 1);
    }

    fn graph_from_edges(edges: &[(u8, u8, bool)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for i in 0..8u8 {
            graph.add_module(local(&format!("m{i}")));
        }
        for &(from, to, include) in edges {
            let a = graph.find_node(&format!("m{from}")).unwrap();
            let b = graph.find_node(&format!("m{to}")).unwrap();
            let relation = if include { Relation::Include } else { Relation::Import };
            graph.add_dependency(a, b, relation);
        }
        graph
    }

    fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8, bool)>> {
        proptest::collection::vec((0u8..8, 0u8..8, any::<bool>()), 0..24)
    }

    fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
        arb_edges().prop_map(|edges| graph_from_edges(&edges))
    }

    fn arb_filter() -> impl Strategy<Value = FilterSpec> {
        (
            proptest::collection::btree_set(0u8..8, 0..4),
            proptest::option::of(0u8..8),
        )
            .prop_map(|(exact, partial)| {
                FilterSpec::new(
                    exact.into_iter().map(|i| format!("m{i}")),
                    partial.map(|i| i.to_string()),
                )
            })
    }

    type QueryAnswers = Vec<(Vec<String>, Vec<String>, Vec<String>)>;

    fn answers(graph: &DependencyGraph) -> QueryAnswers {
        graph
            .module_names()
            .map(|x| {
                let sub = graph.subgraph(x).unwrap();
                (
                    graph.impacting_modules(x).unwrap(),
                    graph.impacted_modules(x).unwrap(),
                    sub.module_names().map(String::from).collect(),
                )
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_impacting_is_closed(graph in arb_graph()) {
            for name in graph.module_names() {
                let closure: BTreeSet<String> = graph.impacting_modules(name).unwrap().into_iter().collect();
                for member in &closure {
                    for further in graph.impacting_modules(member).unwrap() {
                        prop_assert!(further == name || closure.contains(&further));
                    }
                }
            }
        }

        #[test]
        fn prop_impact_duality(graph in arb_graph()) {
            for x in graph.module_names() {
                let impacted = graph.impacted_modules(x).unwrap();
                for y in graph.module_names() {
                    let forward = impacted.iter().any(|n| n == y);
                    let backward = graph.impacting_modules(y).unwrap().iter().any(|n| n == x);
                    prop_assert_eq!(forward, backward);
                }
            }
        }

        #[test]
        fn prop_subgraph_containment(graph in arb_graph()) {
            for x in graph.module_names() {
                let mut expected: BTreeSet<String> = BTreeSet::new();
                expected.insert(x.to_string());
                expected.extend(graph.impacting_modules(x).unwrap());
                expected.extend(graph.impacted_modules(x).unwrap());

                let sub = graph.subgraph(x).unwrap();
                let actual: BTreeSet<String> = sub.module_names().map(String::from).collect();
                prop_assert_eq!(actual, expected);
            }
        }

        #[test]
        fn prop_tree_expands_each_reachable_once(graph in arb_graph()) {
            for x in graph.module_names() {
                let tree = graph.dependency_tree(x).unwrap();
                let mut expanded = tree.expanded_names();
                let total = expanded.len();
                expanded.sort_unstable();
                expanded.dedup();
                prop_assert_eq!(total, expanded.len());
                prop_assert!(!expanded.contains(&x));
                prop_assert_eq!(tree.flatten(), graph.impacting_modules(x).unwrap());
            }
        }

        #[test]
        fn prop_render_is_deterministic(edges in arb_edges(), filter in arb_filter()) {
            let forward = graph_from_edges(&edges);
            let reversed: Vec<_> = edges.iter().rev().copied().collect();
            let backward = graph_from_edges(&reversed);

            let first = render_json(&to_hierarchy(&forward, &filter, None)).unwrap();
            let again = render_json(&to_hierarchy(&forward, &filter, None)).unwrap();
            let other = render_json(&to_hierarchy(&backward, &filter, None)).unwrap();
            prop_assert_eq!(&first, &again);
            prop_assert_eq!(&first, &other);

            for x in forward.module_names() {
                let a = render_json(&impact_report_for(&forward, x, &filter).unwrap()).unwrap();
                let b = render_json(&impact_report_for(&backward, x, &filter).unwrap()).unwrap();
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_filter_does_not_change_queries(graph in arb_graph(), filter in arb_filter()) {
            let before = answers(&graph);

            let _ = to_hierarchy(&graph, &filter, None);
            let _ = impact_report(&graph, &filter);
            let _ = graph.retain_names(|name| filter.keeps(name));

            prop_assert_eq!(answers(&graph), before);

            // filtering is applied to traversal results, never to the traversal
            for x in graph.module_names() {
                let report = impact_report_for(&graph, x, &filter).unwrap();
                prop_assert_eq!(
                    &report.impacting_modules[x],
                    &filter.apply(graph.impacting_modules(x).unwrap())
                );
                let impacted = filter.apply(graph.impacted_modules(x).unwrap());
                prop_assert_eq!(
                    report.impacted_modules.get(x).cloned().unwrap_or_default(),
                    impacted
                );
            }
        }
    }
}
