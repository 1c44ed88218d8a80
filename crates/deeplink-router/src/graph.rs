//! Routing graph
//!
//! The trie that every registered pattern is merged into. Vertices live in
//! an arena and are addressed by [`VertexId`]; each vertex is reachable
//! through exactly one incoming edge, so the structure is a strict tree.
//!
//! The graph is append-only. Nothing here removes a vertex or an edge, and
//! a vertex's pattern identifier is never overwritten once set.

use std::collections::HashMap;
use std::fmt;

/// Key of an exact-match transition
///
/// Equality and hashing are structural, keyed on (variant, payload).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteEdge {
    Slash,
    Dot,
    Literal(String),
}

impl fmt::Display for RouteEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteEdge::Slash => f.write_str("/"),
            RouteEdge::Dot => f.write_str("."),
            RouteEdge::Literal(value) => f.write_str(value),
        }
    }
}

/// Handle of a vertex inside one [`RoutingGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

/// The single named transition of a vertex that captures any literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEdge {
    name: String,
    target: VertexId,
}

impl ParameterEdge {
    /// Parameter name bound when this edge is taken
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> VertexId {
        self.target
    }
}

/// A node of the routing trie
#[derive(Debug, Clone)]
pub struct Vertex<I> {
    exact_edges: HashMap<RouteEdge, VertexId>,
    parameter_edge: Option<ParameterEdge>,
    pattern_identifier: Option<I>,
}

impl<I> Vertex<I> {
    fn new() -> Self {
        Self {
            exact_edges: HashMap::new(),
            parameter_edge: None,
            pattern_identifier: None,
        }
    }

    /// A terminal vertex completes a registered route
    pub fn is_terminal(&self) -> bool {
        self.pattern_identifier.is_some()
    }

    /// A final vertex has no outgoing transitions at all
    pub fn is_final(&self) -> bool {
        self.exact_edges.is_empty() && self.parameter_edge.is_none()
    }

    pub fn pattern_identifier(&self) -> Option<&I> {
        self.pattern_identifier.as_ref()
    }

    pub fn exact_edge(&self, edge: &RouteEdge) -> Option<VertexId> {
        self.exact_edges.get(edge).copied()
    }

    pub fn parameter_edge(&self) -> Option<&ParameterEdge> {
        self.parameter_edge.as_ref()
    }

    /// Exact edges in a stable (sorted) order
    pub fn exact_edges(&self) -> Vec<(&RouteEdge, VertexId)> {
        let mut edges: Vec<_> = self.exact_edges.iter().map(|(edge, id)| (edge, *id)).collect();
        edges.sort_by(|a, b| a.0.cmp(b.0));
        edges
    }
}

/// Arena-backed routing trie
///
/// The root vertex is created with the graph and lives as long as it does.
///
/// # Examples
///
/// ```
/// use deeplink_router::{RouteEdge, RouterCore};
///
/// let mut core = RouterCore::new();
/// core.register("/users/:id").unwrap();
///
/// let graph = core.graph();
/// let users = graph
///     .walk(&[RouteEdge::Slash, RouteEdge::Literal("users".to_string()), RouteEdge::Slash])
///     .unwrap();
/// assert_eq!(graph.parameter(users).map(|edge| edge.name()), Some("id"));
/// ```
#[derive(Debug, Clone)]
pub struct RoutingGraph<I> {
    vertices: Vec<Vertex<I>>,
}

impl<I> Default for RoutingGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> RoutingGraph<I> {
    pub fn new() -> Self {
        Self {
            vertices: vec![Vertex::new()],
        }
    }

    pub fn root(&self) -> VertexId {
        VertexId(0)
    }

    /// Number of vertices, root included
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// A graph always holds its root, so it is empty when nothing hangs off it
    pub fn is_empty(&self) -> bool {
        self.vertex(self.root()).is_final()
    }

    /// # Panics
    ///
    /// If `id` was handed out by an unrelated graph with fewer vertices.
    pub fn vertex(&self, id: VertexId) -> &Vertex<I> {
        &self.vertices[id.0]
    }

    /// Follows one exact edge
    pub fn next(&self, from: VertexId, edge: &RouteEdge) -> Option<VertexId> {
        self.vertex(from).exact_edge(edge)
    }

    pub fn parameter(&self, from: VertexId) -> Option<&ParameterEdge> {
        self.vertex(from).parameter_edge()
    }

    /// Follows a chain of exact edges from the root
    pub fn walk(&self, edges: &[RouteEdge]) -> Option<VertexId> {
        edges
            .iter()
            .try_fold(self.root(), |current, edge| self.next(current, edge))
    }

    /// Terminal vertices reachable from `from`, depth-first, `from` included
    ///
    /// Read-only pass; callers mutate only after collecting.
    pub fn terminals_under(&self, from: VertexId) -> Vec<VertexId> {
        let mut found = Vec::new();
        self.collect_terminals(from, &mut found);
        found
    }

    fn collect_terminals(&self, id: VertexId, found: &mut Vec<VertexId>) {
        let vertex = self.vertex(id);
        if vertex.is_terminal() {
            found.push(id);
        }
        for (_, child) in vertex.exact_edges() {
            self.collect_terminals(child, found);
        }
        if let Some(parameter) = vertex.parameter_edge() {
            self.collect_terminals(parameter.target, found);
        }
    }

    fn push_vertex(&mut self) -> VertexId {
        self.vertices.push(Vertex::new());
        VertexId(self.vertices.len() - 1)
    }

    /// Reuses the exact edge `edge` out of `from`, creating it if missing
    pub(crate) fn descend(&mut self, from: VertexId, edge: RouteEdge) -> VertexId {
        if let Some(existing) = self.next(from, &edge) {
            return existing;
        }
        let child = self.push_vertex();
        self.vertices[from.0].exact_edges.insert(edge, child);
        child
    }

    /// Reuses the parameter edge out of `from`, creating it under `name` if missing
    ///
    /// A vertex has at most one parameter edge; an existing edge keeps the
    /// name it was first registered with.
    pub(crate) fn descend_parameter(&mut self, from: VertexId, name: &str) -> VertexId {
        if let Some(existing) = self.parameter(from) {
            return existing.target;
        }
        let child = self.push_vertex();
        self.vertices[from.0].parameter_edge = Some(ParameterEdge {
            name: name.to_string(),
            target: child,
        });
        child
    }

    /// First writer wins: an identifier already present is kept
    pub(crate) fn mark_terminal(&mut self, id: VertexId, identifier: &I)
    where
        I: Clone,
    {
        let vertex = &mut self.vertices[id.0];
        if vertex.pattern_identifier.is_none() {
            vertex.pattern_identifier = Some(identifier.clone());
        }
    }

    fn fmt_vertex(&self, f: &mut fmt::Formatter<'_>, id: VertexId, depth: usize) -> fmt::Result
    where
        I: fmt::Debug,
    {
        let vertex = self.vertex(id);
        let indent = "  ".repeat(depth);
        for (edge, child) in vertex.exact_edges() {
            write!(f, "{}\"{}\"", indent, edge)?;
            self.fmt_identifier(f, child)?;
            self.fmt_vertex(f, child, depth + 1)?;
        }
        if let Some(parameter) = vertex.parameter_edge() {
            write!(f, "{}:{}", indent, parameter.name)?;
            self.fmt_identifier(f, parameter.target)?;
            self.fmt_vertex(f, parameter.target, depth + 1)?;
        }
        Ok(())
    }

    fn fmt_identifier(&self, f: &mut fmt::Formatter<'_>, id: VertexId) -> fmt::Result
    where
        I: fmt::Debug,
    {
        match self.vertex(id).pattern_identifier() {
            Some(identifier) => writeln!(f, " => {:?}", identifier),
            None => writeln!(f),
        }
    }
}

/// Indented tree dump, one edge per line, for debugging registrations
impl<I: fmt::Debug> fmt::Display for RoutingGraph<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<root>")?;
        self.fmt_identifier(f, self.root())?;
        self.fmt_vertex(f, self.root(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(value: &str) -> RouteEdge {
        RouteEdge::Literal(value.to_string())
    }

    #[test]
    fn test_new_graph_has_final_root() {
        let graph: RoutingGraph<String> = RoutingGraph::new();
        assert_eq!(graph.len(), 1);
        assert!(graph.is_empty());
        assert!(graph.vertex(graph.root()).is_final());
        assert!(!graph.vertex(graph.root()).is_terminal());
    }

    #[test]
    fn test_descend_reuses_edges() {
        let mut graph: RoutingGraph<String> = RoutingGraph::new();
        let root = graph.root();
        let first = graph.descend(root, RouteEdge::Slash);
        let second = graph.descend(root, RouteEdge::Slash);
        assert_eq!(first, second);
        assert_eq!(graph.len(), 2);
        assert!(!graph.vertex(root).is_final());
    }

    #[test]
    fn test_literal_dot_does_not_collide_with_dot() {
        let mut graph: RoutingGraph<String> = RoutingGraph::new();
        let root = graph.root();
        let dot = graph.descend(root, RouteEdge::Dot);
        let literal_dot = graph.descend(root, literal("."));
        assert_ne!(dot, literal_dot);
    }

    #[test]
    fn test_parameter_edge_keeps_first_name() {
        let mut graph: RoutingGraph<String> = RoutingGraph::new();
        let root = graph.root();
        let first = graph.descend_parameter(root, "id");
        let second = graph.descend_parameter(root, "slug");
        assert_eq!(first, second);
        assert_eq!(graph.parameter(root).map(ParameterEdge::name), Some("id"));
    }

    #[test]
    fn test_first_writer_wins() {
        let mut graph: RoutingGraph<String> = RoutingGraph::new();
        let root = graph.root();
        let child = graph.descend(root, RouteEdge::Slash);
        graph.mark_terminal(child, &"first".to_string());
        graph.mark_terminal(child, &"second".to_string());
        assert_eq!(
            graph.vertex(child).pattern_identifier(),
            Some(&"first".to_string())
        );
    }

    #[test]
    fn test_terminals_under_is_depth_first() {
        let mut graph: RoutingGraph<&str> = RoutingGraph::new();
        let root = graph.root();
        let slash = graph.descend(root, RouteEdge::Slash);
        let a = graph.descend(slash, literal("a"));
        let param = graph.descend_parameter(slash, "id");
        let a_json = graph.descend(a, RouteEdge::Dot);
        graph.mark_terminal(slash, &"slash");
        graph.mark_terminal(a, &"a");
        graph.mark_terminal(a_json, &"a.");
        graph.mark_terminal(param, &"id");

        assert_eq!(graph.terminals_under(slash), vec![slash, a, a_json, param]);
        assert_eq!(graph.terminals_under(a), vec![a, a_json]);
        assert!(graph.terminals_under(root).contains(&param));
    }

    #[test]
    fn test_walk() {
        let mut graph: RoutingGraph<String> = RoutingGraph::new();
        let root = graph.root();
        let slash = graph.descend(root, RouteEdge::Slash);
        let users = graph.descend(slash, literal("users"));
        assert_eq!(graph.walk(&[RouteEdge::Slash, literal("users")]), Some(users));
        assert_eq!(graph.walk(&[RouteEdge::Slash, literal("posts")]), None);
        assert_eq!(graph.walk(&[]), Some(root));
    }

    #[test]
    fn test_display_dump() {
        let mut graph: RoutingGraph<&str> = RoutingGraph::new();
        let root = graph.root();
        let slash = graph.descend(root, RouteEdge::Slash);
        let users = graph.descend(slash, literal("users"));
        let id = graph.descend_parameter(users, "id");
        graph.mark_terminal(users, &"/users");
        graph.mark_terminal(id, &"/users/:id");

        assert_eq!(
            graph.to_string(),
            "<root>\n  \"/\"\n    \"users\" => \"/users\"\n      :id => \"/users/:id\"\n"
        );
    }
}
