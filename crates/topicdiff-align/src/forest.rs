//! Alignment forest construction.
//!
//! Links every topic of model `k` to its nearest topic in model `k - 1`.
//! Topics of the first model are the roots. A parent may gain several
//! children or none, since consecutive models may grow or shrink.

use std::collections::VecDeque;
use std::mem;

use serde::Serialize;
use tracing::{debug, instrument};

use topicdiff_types::{ModelSequence, TopicRef};

use crate::error::AlignError;
use crate::similarity::topic_distance;

/// Index of a node within an [`AlignmentForest`].
pub type NodeId = usize;

/// A topic placed in the forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestNode {
    /// Topic this node stands for
    pub topic: TopicRef,
    /// Parent node; `None` for roots
    pub parent: Option<NodeId>,
    /// Distance to the parent topic; `None` for roots
    pub distance: Option<f64>,
    /// Children, nearest first
    pub children: Vec<NodeId>,
}

/// Parent/child relationship between topics of consecutive models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentEdge {
    pub parent: TopicRef,
    pub child: TopicRef,
    pub distance: f64,
}

/// Forest of topic trees, one rooted at each topic of the first model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentForest {
    nodes: Vec<ForestNode>,
    roots: Vec<NodeId>,
}

impl AlignmentForest {
    /// Root nodes in first-model order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&ForestNode> {
        self.nodes.get(id)
    }

    /// All nodes, in model order then topic order.
    pub fn nodes(&self) -> &[ForestNode] {
        &self.nodes
    }

    /// Children of a node, nearest first. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Node standing for a topic.
    pub fn find(&self, topic: TopicRef) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.topic == topic)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes level by level, left to right.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<NodeId> = self.roots.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id].children.iter().copied());
        }
        order
    }

    /// Nodes in pre-order, roots left to right.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        order
    }

    /// Left-to-right order of one model's topics in the forest.
    pub fn layer(&self, model: usize) -> Vec<TopicRef> {
        self.breadth_first()
            .into_iter()
            .map(|id| self.nodes[id].topic)
            .filter(|t| t.model == model)
            .collect()
    }

    /// Every parent/child edge, in breadth-first order of the parents.
    pub fn edges(&self) -> Vec<AlignmentEdge> {
        self.breadth_first()
            .into_iter()
            .flat_map(|id| {
                let parent = &self.nodes[id];
                parent.children.iter().map(move |&c| {
                    let child = &self.nodes[c];
                    AlignmentEdge {
                        parent: parent.topic,
                        child: child.topic,
                        distance: child.distance.unwrap_or_default(),
                    }
                })
            })
            .collect()
    }
}

/// Build the alignment forest for a model sequence.
///
/// A topic `c` of model `k` becomes a child of the topic `p` of model `k - 1`
/// with the smallest distance to `c`; ties go to the earliest `p`. Once all
/// of model `k` is attached, each parent's children are sorted by ascending
/// distance (stable).
///
/// # Errors
///
/// - `EmptySequence` if there are no models
/// - `EmptyPredecessor` if a model with topics follows an empty model
/// - `InvalidInput` if every candidate distance for a topic is NaN
#[instrument(skip(models), fields(models = models.len()))]
pub fn build_forest(models: &ModelSequence) -> Result<AlignmentForest, AlignError> {
    let Some(first) = models.models().first() else {
        return Err(AlignError::EmptySequence);
    };

    let mut forest = AlignmentForest {
        nodes: Vec::with_capacity(models.total_topics()),
        roots: Vec::with_capacity(first.len()),
    };

    // Node ids of the previous model's topics, by topic index
    let mut layer: Vec<NodeId> = Vec::with_capacity(first.len());
    for t in 0..first.len() {
        let id = forest.nodes.len();
        forest.nodes.push(ForestNode {
            topic: TopicRef::new(0, t),
            parent: None,
            distance: None,
            children: Vec::new(),
        });
        forest.roots.push(id);
        layer.push(id);
    }

    for (k, window) in models.models().windows(2).enumerate() {
        let k = k + 1;
        let (previous, current) = (&window[0], &window[1]);

        if current.is_empty() {
            debug!(model = k, "Model has no topics");
            layer.clear();
            continue;
        }
        if previous.is_empty() {
            return Err(AlignError::EmptyPredecessor {
                model: k,
                previous: k - 1,
            });
        }

        let mut next_layer = Vec::with_capacity(current.len());
        for (c, child) in current.topics.iter().enumerate() {
            let mut nearest: Option<(usize, f64)> = None;
            for (p, parent) in previous.topics.iter().enumerate() {
                let d = topic_distance(parent, child);
                if d.is_nan() {
                    continue;
                }
                if nearest.map_or(true, |(_, min)| d < min) {
                    nearest = Some((p, d));
                }
            }

            let Some((p, distance)) = nearest else {
                return Err(AlignError::InvalidInput(format!(
                    "topic {} has no comparable topic in model {}",
                    TopicRef::new(k, c),
                    k - 1
                )));
            };

            let parent_id = layer[p];
            let id = forest.nodes.len();
            forest.nodes.push(ForestNode {
                topic: TopicRef::new(k, c),
                parent: Some(parent_id),
                distance: Some(distance),
                children: Vec::new(),
            });
            forest.nodes[parent_id].children.push(id);
            next_layer.push(id);
        }

        for &parent_id in &layer {
            let mut children = mem::take(&mut forest.nodes[parent_id].children);
            children.sort_by(|&a, &b| {
                let da = forest.nodes[a].distance.unwrap_or_default();
                let db = forest.nodes[b].distance.unwrap_or_default();
                da.total_cmp(&db)
            });
            forest.nodes[parent_id].children = children;
        }

        debug!(
            model = k,
            parents = previous.len(),
            children = current.len(),
            childless = layer
                .iter()
                .filter(|&&id| forest.nodes[id].children.is_empty())
                .count(),
            "Attached model to forest"
        );
        layer = next_layer;
    }

    Ok(forest)
}
