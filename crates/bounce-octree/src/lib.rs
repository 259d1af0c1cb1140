//! Fixed-depth octree over payloads keyed by bounding boxes.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use bounce_geom::{Aabb, Vec3};

pub const MAX_OCTREE_DEPTH: u8 = 3;

#[derive(Clone, Debug)]
enum NodeKind<T> {
    Leaf(Vec<(Aabb, T)>),
    // indices into the node arena, one per octant
    Internal([usize; 8]),
}

#[derive(Clone, Debug)]
struct Node<T> {
    bbox: Aabb,
    depth: u8,
    kind: NodeKind<T>,
}

/// Octree with nodes stored in a single arena; node 0 is the root.
///
/// A payload is stored in every leaf its box touches, so queries deduplicate
/// by payload value. A leaf above [`MAX_OCTREE_DEPTH`] turns into an internal
/// node on its first insert; objects already held by a leaf are never moved
/// down, and leaves at the max depth keep accumulating.
#[derive(Clone, Debug)]
pub struct Octree<T> {
    nodes: Vec<Node<T>>,
}

impl<T: Copy + Ord> Octree<T> {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            nodes: vec![Node {
                bbox: bounds,
                depth: 0,
                kind: NodeKind::Leaf(Vec::new()),
            }],
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bbox
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when no payload has been inserted.
    pub fn is_empty(&self) -> bool {
        matches!(&self.nodes[0].kind, NodeKind::Leaf(objs) if objs.is_empty())
    }

    /// Inserts `obj` under `bbox`.
    ///
    /// # Panics
    /// When `bbox` is not contained by the root bounds.
    pub fn insert(&mut self, bbox: Aabb, obj: T) {
        assert!(
            self.bounds().contains(&bbox),
            "octree insert outside root bounds: {:?} not in {:?}",
            bbox,
            self.bounds()
        );
        self.insert_at(0, bbox, obj);
    }

    fn insert_at(&mut self, node: usize, bbox: Aabb, obj: T) {
        let split = {
            let n = &self.nodes[node];
            matches!(n.kind, NodeKind::Leaf(_)) && n.depth < MAX_OCTREE_DEPTH
        };
        if split {
            self.split(node);
        }

        let children = match &mut self.nodes[node].kind {
            NodeKind::Leaf(objs) => {
                objs.push((bbox, obj));
                return;
            }
            NodeKind::Internal(children) => *children,
        };
        for child in children {
            if let Some(clipped) = bbox.intersect(&self.nodes[child].bbox) {
                self.insert_at(child, clipped, obj);
            }
        }
    }

    fn split(&mut self, node: usize) {
        let (bbox, depth) = {
            let n = &self.nodes[node];
            match &n.kind {
                NodeKind::Leaf(objs) => {
                    assert!(objs.is_empty(), "octree leaf split with stored objects");
                }
                NodeKind::Internal(_) => panic!("octree node already has children"),
            }
            (n.bbox, n.depth)
        };
        let mut children = [0usize; 8];
        for (i, slot) in children.iter_mut().enumerate() {
            *slot = self.nodes.len();
            self.nodes.push(Node {
                bbox: bbox.octant(i),
                depth: depth + 1,
                kind: NodeKind::Leaf(Vec::new()),
            });
        }
        self.nodes[node].kind = NodeKind::Internal(children);
    }

    /// Every payload whose box touches `query`, each reported once, sorted.
    pub fn query_touching_bbox(&self, query: &Aabb) -> Vec<T> {
        let mut dest = BTreeSet::new();
        self.query_at(0, query, &mut dest);
        dest.into_iter().collect()
    }

    fn query_at(&self, node: usize, query: &Aabb, dest: &mut BTreeSet<T>) {
        match &self.nodes[node].kind {
            NodeKind::Leaf(objs) => {
                for (bbox, obj) in objs {
                    if !query.disjoint(bbox) {
                        dest.insert(*obj);
                    }
                }
            }
            NodeKind::Internal(children) => {
                for &child in children {
                    if let Some(sub) = query.intersect(&self.nodes[child].bbox) {
                        self.query_at(child, &sub, dest);
                    }
                }
            }
        }
    }

    /// Payloads touching `point`.
    pub fn query_point(&self, point: Vec3) -> Vec<T> {
        self.query_touching_bbox(&Aabb::from_point(point))
    }
}

/// Builds a tree bounding the union of `objects` and inserts them all.
/// An empty set gives a single empty leaf with zero bounds.
pub fn make_octree<T: Copy + Ord>(objects: &[(Aabb, T)]) -> Octree<T> {
    let Some(((first, _), rest)) = objects.split_first() else {
        return Octree::new(Aabb::default());
    };
    let bounds = rest.iter().fold(*first, |acc, (b, _)| acc.union(b));
    let mut tree = Octree::new(bounds);
    for (b, obj) in objects {
        tree.insert(*b, *obj);
    }
    tree
}
