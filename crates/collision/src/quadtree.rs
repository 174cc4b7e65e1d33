//! Arena-based point quadtree for neighbourhood queries.
//!
//! Nodes are stored contiguously in a `Vec` and reference their children by
//! index. Entries are indices into the caller's particle slice together with
//! the position sampled at insertion time, so the tree never borrows the
//! particles and they stay free to be mutated while the tree is queried.
//!
//! The tree is meant to be rebuilt from scratch every step: there is no
//! removal or incremental update.
//!
//! # Example
//!
//! ```rust
//! use collision::particle::Particle;
//! use collision::quadtree::{BoundaryRegion, QuadTree};
//!
//! let particles = vec![
//!     Particle::new([100.0, 100.0], 20.0, [0.0, 0.0]),
//!     Particle::new([700.0, 500.0], 20.0, [0.0, 0.0]),
//! ];
//!
//! let arena = BoundaryRegion::from_arena(800.0, 600.0);
//! let tree = QuadTree::build(&particles, arena, 4, 24);
//!
//! let mut found = Vec::new();
//! tree.query(&BoundaryRegion::square([100.0, 100.0].into(), 60.0), &mut found);
//! assert_eq!(found, vec![0]);
//! ```

use nalgebra::Point2;

use crate::particle::Particle;

/// Default number of entries a node holds before it subdivides.
pub const DEFAULT_CAPACITY: usize = 4;

/// Default depth below which nodes stop subdividing.
pub const DEFAULT_MAX_DEPTH: usize = 24;

/// Axis-aligned box described by its centre and half extents.
///
/// Uses screen coordinates (`y` grows downward), so "north" is the half with
/// the smaller `y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryRegion {
    pub center: Point2<f64>,
    pub half_width: f64,
    pub half_height: f64,
}

impl BoundaryRegion {
    pub fn new(center: Point2<f64>, half_width: f64, half_height: f64) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    /// Region covering an arena whose top-left corner is the origin.
    pub fn from_arena(width: f64, height: f64) -> Self {
        Self::new(
            Point2::new(width / 2.0, height / 2.0),
            width / 2.0,
            height / 2.0,
        )
    }

    /// Square region centred on `center`.
    pub fn square(center: Point2<f64>, half_extent: f64) -> Self {
        Self::new(center, half_extent, half_extent)
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.half_width
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.half_width
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.half_height
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.half_height
    }

    /// Inclusive membership test.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Separating-axis overlap test. Boxes that only touch intersect.
    pub fn intersects(&self, other: &BoundaryRegion) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.top() > self.bottom()
            || other.bottom() < self.top())
    }

    /// Splits the region into four equal quadrants.
    ///
    /// Quadrant layout (index order is NW, NE, SW, SE):
    /// ```text
    /// +-------+-------+
    /// |   0   |   1   |  (north-west, north-east)
    /// +-------+-------+
    /// |   2   |   3   |  (south-west, south-east)
    /// +-------+-------+
    /// ```
    pub fn subdivide(&self) -> [BoundaryRegion; 4] {
        let hw = self.half_width / 2.0;
        let hh = self.half_height / 2.0;
        let (cx, cy) = (self.center.x, self.center.y);
        [
            Self::new(Point2::new(cx - hw, cy - hh), hw, hh),
            Self::new(Point2::new(cx + hw, cy - hh), hw, hh),
            Self::new(Point2::new(cx - hw, cy + hh), hw, hh),
            Self::new(Point2::new(cx + hw, cy + hh), hw, hh),
        ]
    }

    /// Index of the first quadrant (NW, NE, SW, SE) whose inclusive bounds
    /// hold `point`, assuming the point lies inside this region.
    ///
    /// Decided against the centre rather than the child boxes so that points
    /// on a shared edge land in exactly one child, even where the child
    /// bounds do not meet exactly in floating point.
    fn quadrant(&self, point: &Point2<f64>) -> usize {
        let east = (point.x > self.center.x) as usize;
        let south = (point.y > self.center.y) as usize;
        east | (south << 1)
    }
}

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A particle index stored in the tree, with the position it was filed under.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Entry {
    index: usize,
    position: Point2<f64>,
}

/// A node in the arena-based quadtree.
///
/// Holds entries only while undivided. Once divided the buffer is empty and
/// every entry lives in exactly one of the four children.
#[derive(Clone, Debug)]
pub struct QuadTreeNode {
    boundary: BoundaryRegion,
    depth: usize,
    entries: Vec<Entry>,
    /// Children in NW, NE, SW, SE order
    children: Option<[NodeId; 4]>,
}

impl QuadTreeNode {
    fn new(boundary: BoundaryRegion, depth: usize) -> Self {
        Self {
            boundary,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }

    pub fn boundary(&self) -> &BoundaryRegion {
        &self.boundary
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }
}

/// Point quadtree over particle indices.
///
/// The root is always node 0. Each node buffers up to `capacity` entries
/// before subdividing; nodes at `max_depth` keep accepting entries past
/// capacity instead, so coincident particles cannot recurse without bound.
#[derive(Clone, Debug)]
pub struct QuadTree {
    nodes: Vec<QuadTreeNode>,
    capacity: usize,
    max_depth: usize,
    len: usize,
}

impl QuadTree {
    /// Creates an empty tree covering `boundary`.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(boundary: BoundaryRegion, capacity: usize) -> Self {
        Self {
            nodes: vec![QuadTreeNode::new(boundary, 0)],
            capacity: capacity.max(1),
            max_depth: DEFAULT_MAX_DEPTH,
            len: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds a tree holding every particle of the slice by index.
    ///
    /// Particles outside `boundary` are skipped.
    pub fn build(
        particles: &[Particle],
        boundary: BoundaryRegion,
        capacity: usize,
        max_depth: usize,
    ) -> Self {
        let mut tree = Self::new(boundary, capacity).with_max_depth(max_depth);
        for (index, particle) in particles.iter().enumerate() {
            if !tree.insert(index, particle.position) {
                log::debug!(
                    "particle {} at ({:.2}, {:.2}) lies outside the tree boundary",
                    index,
                    particle.position.x,
                    particle.position.y
                );
            }
        }
        tree
    }

    /// Inserts a particle index filed under `position`.
    ///
    /// Returns `false`, leaving the tree untouched, when the position lies
    /// outside the root boundary.
    pub fn insert(&mut self, index: usize, position: Point2<f64>) -> bool {
        if !self.nodes[0].boundary.contains(&position) {
            return false;
        }
        self.insert_at(NodeId::new(0), Entry { index, position });
        self.len += 1;
        true
    }

    /// Files an entry under `node_id`, whose boundary already holds it.
    fn insert_at(&mut self, node_id: NodeId, entry: Entry) {
        let mut current = node_id;
        loop {
            let node = &self.nodes[current.index()];
            let quadrant = node.boundary.quadrant(&entry.position);

            if let Some(children) = node.children {
                current = children[quadrant];
                continue;
            }

            if node.entries.len() < self.capacity || node.depth >= self.max_depth {
                if node.entries.len() == self.capacity {
                    log::debug!(
                        "quadtree node at max depth {} grows past capacity {}",
                        node.depth,
                        self.capacity
                    );
                }
                self.nodes[current.index()].entries.push(entry);
                return;
            }

            // Full leaf above the depth cap: split and push the buffer down
            let children = self.subdivide(current);
            let boundary = self.nodes[current.index()].boundary;
            let buffered = std::mem::take(&mut self.nodes[current.index()].entries);
            for moved in buffered {
                self.insert_at(children[boundary.quadrant(&moved.position)], moved);
            }
            current = children[quadrant];
        }
    }

    /// Creates the four children of an undivided node.
    fn subdivide(&mut self, node_id: NodeId) -> [NodeId; 4] {
        let parent = &self.nodes[node_id.index()];
        let depth = parent.depth + 1;
        let quadrants = parent.boundary.subdivide();

        let children: [NodeId; 4] = std::array::from_fn(|q| {
            let id = NodeId::new(self.nodes.len());
            self.nodes.push(QuadTreeNode::new(quadrants[q], depth));
            id
        });
        self.nodes[node_id.index()].children = Some(children);
        children
    }

    /// Appends the index of every entry whose stored position lies in `range`.
    ///
    /// Subtrees whose boundary does not intersect `range` are pruned. Results
    /// come out in tree order, not index order.
    pub fn query(&self, range: &BoundaryRegion, found: &mut Vec<usize>) {
        self.query_recursive(NodeId::new(0), range, found);
    }

    fn query_recursive(&self, node_id: NodeId, range: &BoundaryRegion, found: &mut Vec<usize>) {
        let node = &self.nodes[node_id.index()];
        if !range.intersects(&node.boundary) {
            return;
        }

        found.extend(
            node.entries
                .iter()
                .filter(|entry| range.contains(&entry.position))
                .map(|entry| entry.index),
        );

        if let Some(children) = node.children {
            for child in children {
                self.query_recursive(child, range, found);
            }
        }
    }

    /// Number of accepted entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the arena (for diagnostics)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn root(&self) -> &QuadTreeNode {
        &self.nodes[0]
    }

    pub fn boundary(&self) -> &BoundaryRegion {
        &self.nodes[0].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
