//! Bounded breadth-first exploration of the decoding graph
//!
//! Nodes are byte strings, edges are decoder applications. The FIFO queue
//! guarantees depth-nondecreasing emission order within one input unit;
//! the depth bound is the only pruning — visited contents are not
//! deduplicated, so cost is O(|registry|^depth · content length).

use std::collections::VecDeque;

use crate::decode::DecoderRegistry;
use crate::report::{MatchRecord, MatchSink, MAX_MATCHES_PER_NODE};

use super::matcher::PatternMatcher;

/// Immutable pieces shared by every node expansion of one run.
pub(crate) struct BfsContext<'a> {
    pub registry: &'a DecoderRegistry,
    pub matcher: &'a PatternMatcher,
    pub max_depth: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub sink: &'a dyn MatchSink,
}

struct SearchState {
    content: Vec<u8>,
    applied: Vec<&'static str>,
    depth: usize,
}

/// Explore every decoder composition of `root` up to the depth bound,
/// emitting a record for each pattern hit along the way.
pub(crate) fn explore(ctx: &BfsContext<'_>, root: Vec<u8>, file: &str) {
    let mut queue = VecDeque::new();
    queue.push_back(SearchState {
        content: root,
        applied: Vec::new(),
        depth: 0,
    });

    while let Some(state) = queue.pop_front() {
        if ctx.matcher.is_hit(&state.content) {
            emit_node(ctx, file, &state);
        }

        if state.depth >= ctx.max_depth {
            continue;
        }

        for (name, decoder) in ctx.registry.iter() {
            match decoder(&state.content) {
                Ok(decoded) if !decoded.is_empty() && decoded != state.content => {
                    let mut applied = state.applied.clone();
                    applied.push(name);
                    queue.push_back(SearchState {
                        content: decoded,
                        applied,
                        depth: state.depth + 1,
                    });
                }
                // failure or identity: no edge
                _ => {}
            }
        }
    }
}

fn emit_node(ctx: &BfsContext<'_>, file: &str, state: &SearchState) {
    let spans = ctx.matcher.find_all(&state.content, MAX_MATCHES_PER_NODE + 1);
    for (i, &(start, end)) in spans.iter().enumerate() {
        if i >= MAX_MATCHES_PER_NODE {
            ctx.sink.emit_overflow(file, &state.applied);
            break;
        }
        let context_start = start.saturating_sub(ctx.context_before);
        let context_end = (end + ctx.context_after).min(state.content.len());
        ctx.sink.emit(&MatchRecord {
            file: file.to_string(),
            decoders: state.applied.clone(),
            matched: state.content[start..end].to_vec(),
            context: state.content[context_start..context_end].to_vec(),
            offset: start,
            context_match_start: start - context_start,
        });
    }
}
