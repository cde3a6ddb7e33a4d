//! Structural matching of pattern trees against change records.
//!
//! Interior pattern nodes AND their declared keys; leaves OR their
//! alternatives; a pattern list ORs its patterns. Every level short-circuits.

use streamfilter_model::EventNode;

use super::normalize::normalize;
use crate::pattern::{FilterPattern, PatternNode};

/// Returns `true` if `event` matches at least one of `patterns`.
///
/// An empty slice matches nothing. Callers that want "no patterns means no
/// filtering" should check for emptiness first, as [`crate::EventFilter`] does.
#[must_use]
pub fn allow_event(patterns: &[FilterPattern], event: &EventNode) -> bool {
    patterns.iter().any(|pattern| pattern.matches(event))
}

impl FilterPattern {
    /// Returns `true` if every declared constraint holds for `event`.
    #[must_use]
    pub fn matches(&self, event: &EventNode) -> bool {
        match_children(&self.root, Some(event))
    }
}

impl PatternNode {
    /// Match this node against the event value at the same position.
    ///
    /// `event` is `None` when the record has no such attribute.
    #[must_use]
    pub fn matches(&self, event: Option<&EventNode>) -> bool {
        match self {
            Self::Leaf(filter) => filter.matches(&normalize(event)),
            Self::Object(children) => match_children(children, event),
        }
    }
}

fn match_children<'a, I>(children: I, event: Option<&EventNode>) -> bool
where
    I: IntoIterator<Item = (&'a String, &'a PatternNode)>,
{
    // A scalar where the pattern expects a map leaves every child absent.
    let fields = event.and_then(EventNode::as_object);
    children
        .into_iter()
        .all(|(key, child)| child.matches(fields.and_then(|f| f.get(key))))
}
