//! Term links between aligned topics.
//!
//! A term link joins the same vocabulary term in a parent topic and one of its
//! children, so a view can draw a line between the two term positions.

use serde::Serialize;

use topicdiff_types::{ModelSequence, TopicRef};

use crate::forest::AlignmentForest;

/// A term shared by a parent topic and its child.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermLink {
    pub parent: TopicRef,
    pub child: TopicRef,
    pub term: String,
    pub parent_probability: f64,
    pub child_probability: f64,
}

/// Collect term links along every forest edge.
///
/// A link is kept when the child's probability for the term is at least
/// `min_probability`. Links follow edge order, then the parent's term order,
/// then the child's term order.
pub fn term_links(
    forest: &AlignmentForest,
    models: &ModelSequence,
    min_probability: f64,
) -> Vec<TermLink> {
    let mut links = Vec::new();

    for edge in forest.edges() {
        let (Some(parent), Some(child)) = (models.topic(edge.parent), models.topic(edge.child))
        else {
            continue;
        };

        for s in parent.iter() {
            for t in child.iter() {
                if s.name == t.name && t.probability >= min_probability {
                    links.push(TermLink {
                        parent: edge.parent,
                        child: edge.child,
                        term: t.name.clone(),
                        parent_probability: s.probability,
                        child_probability: t.probability,
                    });
                }
            }
        }
    }

    links
}
