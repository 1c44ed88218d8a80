//! Pattern compiler
//!
//! Recursive descent over a validated token slice. Every production reads
//! tokens through an explicit `Range<usize>` cursor into the same immutable
//! slice, so optional-group sub-runs are plain sub-ranges and error context
//! is always `tokens[..position]`.

use std::ops::Range;

use super::{render, PatternToken};
use crate::error::PatternRegisterError;
use crate::graph::{RouteEdge, RoutingGraph, VertexId};
use crate::path::PathScanner;

type CompileResult = Result<(), PatternRegisterError>;

/// Merges one pattern into a routing graph under `identifier`
///
/// The graph handed in should be a staging copy: an error can surface after
/// some edges were already added.
pub(crate) struct PatternCompiler<'a, I> {
    graph: &'a mut RoutingGraph<I>,
    tokens: &'a [PatternToken],
    identifier: I,
}

impl<'a, I: Clone> PatternCompiler<'a, I> {
    pub(crate) fn new(graph: &'a mut RoutingGraph<I>, tokens: &'a [PatternToken], identifier: I) -> Self {
        Self {
            graph,
            tokens,
            identifier,
        }
    }

    pub(crate) fn compile(mut self) -> CompileResult {
        let root = self.graph.root();
        match self.tokens.first() {
            Some(PatternToken::Slash) => self.parse_slash(root, 1..self.tokens.len()),
            Some(_) => Err(PatternRegisterError::MissingPrefixSlash),
            None => Err(PatternRegisterError::Empty),
        }
    }

    fn unexpected(&self, position: usize) -> PatternRegisterError {
        PatternRegisterError::UnexpectedToken {
            after: render(&self.tokens[..position]),
        }
    }

    fn peek(&self, run: &Range<usize>) -> Option<&'a PatternToken> {
        let tokens: &'a [PatternToken] = self.tokens;
        if run.is_empty() {
            None
        } else {
            tokens.get(run.start)
        }
    }

    fn mark_terminal(&mut self, vertex: VertexId) {
        self.graph.mark_terminal(vertex, &self.identifier);
    }

    /// `/` was consumed; `run` is what follows it
    fn parse_slash(&mut self, context: VertexId, run: Range<usize>) -> CompileResult {
        let next = self.graph.descend(context, RouteEdge::Slash);
        let Some(token) = self.peek(&run) else {
            self.mark_terminal(next);
            return Ok(());
        };

        let rest = run.start + 1..run.end;
        match token {
            PatternToken::Literal(value) => self.parse_literal(next, value, rest),
            PatternToken::Symbol(name) => self.parse_symbol(next, name, rest),
            PatternToken::Star(name) => self.parse_star(next, name, rest),
            PatternToken::LParen => self.parse_group(next, rest, true),
            _ => Err(self.unexpected(run.start)),
        }
    }

    /// `.` was consumed; a separator with nothing after it is an error
    fn parse_dot(&mut self, context: VertexId, run: Range<usize>) -> CompileResult {
        let Some(token) = self.peek(&run) else {
            return Err(self.unexpected(run.start));
        };

        let next = self.graph.descend(context, RouteEdge::Dot);
        let rest = run.start + 1..run.end;
        match token {
            PatternToken::Literal(value) => self.parse_literal(next, value, rest),
            PatternToken::Symbol(name) => self.parse_symbol(next, name, rest),
            _ => Err(self.unexpected(run.start)),
        }
    }

    /// A literal that embeds `.` is laid down as the same edge chain the path
    /// scanner produces for that text, so `sprockets.js` matches `/sprockets.js`.
    fn parse_literal(&mut self, context: VertexId, value: &str, run: Range<usize>) -> CompileResult {
        let next = PathScanner::new(value).fold(context, |vertex, token| {
            self.graph.descend(vertex, RouteEdge::from(token))
        });
        self.parse_segment_end(next, run)
    }

    fn parse_symbol(&mut self, context: VertexId, name: &str, run: Range<usize>) -> CompileResult {
        let next = self.graph.descend_parameter(context, name);
        self.parse_segment_end(next, run)
    }

    /// Globbing closes its run; only the enclosing group's `)` may follow,
    /// and that is already outside `run`.
    fn parse_star(&mut self, context: VertexId, name: &str, run: Range<usize>) -> CompileResult {
        if !run.is_empty() {
            return Err(self.unexpected(run.start));
        }
        let next = self.graph.descend_parameter(context, name);
        self.mark_terminal(next);
        Ok(())
    }

    /// Shared continuation after a literal or a symbol
    fn parse_segment_end(&mut self, vertex: VertexId, run: Range<usize>) -> CompileResult {
        let Some(token) = self.peek(&run) else {
            self.mark_terminal(vertex);
            return Ok(());
        };

        let rest = run.start + 1..run.end;
        match token {
            PatternToken::Slash => self.parse_slash(vertex, rest),
            PatternToken::Dot => self.parse_dot(vertex, rest),
            PatternToken::LParen => self.parse_group(vertex, rest, true),
            _ => Err(self.unexpected(run.start)),
        }
    }

    /// `(` was consumed; `run` starts inside the group
    ///
    /// The inner run is applied once per terminal already reachable from
    /// `context` (collected before any mutation), which is how a sibling
    /// group `(/a)(/b)` extends both `context` and `context/a`.
    fn parse_group(&mut self, context: VertexId, run: Range<usize>, first_enter: bool) -> CompileResult {
        if first_enter && !self.graph.vertex(context).is_final() {
            return Err(PatternRegisterError::AmbiguousOptionalPattern);
        }
        self.mark_terminal(context);

        let close = self.closing_paren(&run)?;
        let inner = run.start..close;

        if let Some(token) = self.peek(&inner) {
            let targets = self.graph.terminals_under(context);
            let inner_rest = inner.start + 1..inner.end;
            for target in targets {
                match token {
                    PatternToken::Slash => self.parse_slash(target, inner_rest.clone())?,
                    PatternToken::Dot => self.parse_dot(target, inner_rest.clone())?,
                    _ => return Err(self.unexpected(inner.start)),
                }
            }
        }

        let after = close + 1..run.end;
        match self.peek(&after) {
            None => Ok(()),
            Some(PatternToken::LParen) => self.parse_group(context, after.start + 1..after.end, false),
            Some(_) => Err(self.unexpected(after.start)),
        }
    }

    /// Index of the `)` that closes the group whose body starts at `run.start`
    fn closing_paren(&self, run: &Range<usize>) -> Result<usize, PatternRegisterError> {
        let mut depth = 0usize;
        for position in run.clone() {
            match self.tokens[position] {
                PatternToken::LParen => depth += 1,
                PatternToken::RParen if depth == 0 => return Ok(position),
                PatternToken::RParen => depth -= 1,
                _ => {}
            }
        }
        Err(PatternRegisterError::UnbalancedParenthesis)
    }
}
