//! Bounding volume hierarchy for accelerated nearest-hit queries.
//!
//! Median-split BVH over facet bounding boxes. Brings the per-ray cost of
//! [`SurfaceQuery::nearest_hit`] from O(facets) down to O(log facets) on
//! well-shaped meshes, which is what makes dense per-pixel sampling
//! practical for large inputs.

use rayon::prelude::*;
use smallvec::SmallVec;
use vox_types::{Aabb, TriMesh};

use crate::query::{hit_improves, ray_facet_intersect, Ray, SurfaceHit, SurfaceQuery};

/// Default maximum facets per leaf.
const DEFAULT_LEAF_SIZE: usize = 8;

/// Subtree size above which construction recurses on rayon workers.
const PARALLEL_THRESHOLD: usize = 4096;

/// BVH node containing either leaf facets or child nodes.
#[derive(Debug)]
enum BvhNode {
    /// Leaf node containing facet indices.
    Leaf {
        /// Bounding box of all facets in this leaf.
        bbox: Aabb,
        /// Facet indices stored in this leaf.
        facets: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all facets in this subtree.
        bbox: Aabb,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding volume hierarchy over the facets of a mesh.
///
/// Borrows the mesh: the hierarchy stores only indices and boxes, and the
/// mesh is immutable for the lifetime of a run anyway.
///
/// # Example
///
/// ```
/// use vox_slice::{FacetBvh, Ray, SurfaceQuery};
/// use vox_types::{cube, Point3};
///
/// let mesh = cube(10.0);
/// let bvh = FacetBvh::build(&mesh);
///
/// let hit = bvh.nearest_hit(&Ray::downward(Point3::new(5.0, 5.0, 5.0)));
/// assert!(hit.is_some());
/// ```
#[derive(Debug)]
pub struct FacetBvh<'a> {
    mesh: &'a TriMesh,
    root: Option<BvhNode>,
}

impl<'a> FacetBvh<'a> {
    /// Build a BVH with the default leaf size.
    #[must_use]
    pub fn build(mesh: &'a TriMesh) -> Self {
        Self::build_with_leaf_size(mesh, DEFAULT_LEAF_SIZE)
    }

    /// Build a BVH with an explicit maximum leaf size.
    ///
    /// Large subtrees are constructed on rayon workers.
    #[must_use]
    pub fn build_with_leaf_size(mesh: &'a TriMesh, max_leaf_size: usize) -> Self {
        if mesh.is_empty() {
            return Self { mesh, root: None };
        }

        let boxes: Vec<Aabb> = mesh.facets.par_iter().map(vox_types::Facet::bounds).collect();

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: facet indices are u32, meshes beyond that are unsupported
        let indices: Vec<u32> = (0..boxes.len() as u32).collect();

        let root = build_recursive(&boxes, indices, max_leaf_size.max(1));
        Self {
            mesh,
            root: Some(root),
        }
    }

    /// Check if the BVH indexes no facets.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get statistics about the tree structure.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if let Some(ref root) = self.root {
            collect_stats(root, 0, &mut stats);
        }
        stats
    }

    fn descend(&self, node: &BvhNode, ray: &Ray, best: &mut Option<SurfaceHit>) {
        match node {
            BvhNode::Leaf { facets, .. } => {
                for &i in facets {
                    if let Some((depth, back_face)) =
                        ray_facet_intersect(ray, &self.mesh.facets[i as usize])
                    {
                        if hit_improves(best.as_ref(), depth, i) {
                            *best = Some(SurfaceHit {
                                depth,
                                back_face,
                                facet: i,
                            });
                        }
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                let t_left = ray_box_entry(left.bbox(), ray, best_depth(best.as_ref()));
                let t_right = ray_box_entry(right.bbox(), ray, best_depth(best.as_ref()));

                // Visit the nearer child first so its hits prune the other
                match (t_left, t_right) {
                    (Some(tl), Some(tr)) => {
                        let (first, second) = if tl <= tr {
                            (left, right)
                        } else {
                            (right, left)
                        };
                        self.descend(first, ray, best);
                        if ray_box_entry(second.bbox(), ray, best_depth(best.as_ref())).is_some() {
                            self.descend(second, ray, best);
                        }
                    }
                    (Some(_), None) => self.descend(left, ray, best),
                    (None, Some(_)) => self.descend(right, ray, best),
                    (None, None) => {}
                }
            }
        }
    }
}

impl SurfaceQuery for FacetBvh<'_> {
    fn nearest_hit(&self, ray: &Ray) -> Option<SurfaceHit> {
        let root = self.root.as_ref()?;
        let mut best = None;
        if ray_box_entry(root.bbox(), ray, f64::INFINITY).is_some() {
            self.descend(root, ray, &mut best);
        }
        best
    }
}

fn best_depth(best: Option<&SurfaceHit>) -> f64 {
    best.map_or(f64::INFINITY, |h| h.depth)
}

/// Slab test: entry parameter of the ray into the box, if the box overlaps
/// `[0, t_max]` along the ray.
fn ray_box_entry(bbox: &Aabb, ray: &Ray, t_max: f64) -> Option<f64> {
    let mut t0: f64 = 0.0;
    let mut t1 = t_max;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.dir[axis];
        let (min, max) = (bbox.min[axis], bbox.max[axis]);

        if dir.abs() < f64::EPSILON {
            if origin < min || origin > max {
                return None;
            }
        } else {
            let inv = 1.0 / dir;
            let (near, far) = if inv >= 0.0 {
                ((min - origin) * inv, (max - origin) * inv)
            } else {
                ((max - origin) * inv, (min - origin) * inv)
            };
            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }
    }

    Some(t0)
}

fn build_recursive(boxes: &[Aabb], indices: Vec<u32>, max_leaf_size: usize) -> BvhNode {
    let mut bbox = Aabb::empty();
    for &i in &indices {
        bbox.expand_to_include_aabb(&boxes[i as usize]);
    }

    if indices.len() <= max_leaf_size {
        return BvhNode::Leaf {
            bbox,
            facets: SmallVec::from_iter(indices),
        };
    }

    // Median split on the longest axis of the node box
    let axis = longest_axis(&bbox);
    let mut sorted = indices;
    sorted.sort_by(|&a, &b| {
        let ca = center_on_axis(&boxes[a as usize], axis);
        let cb = center_on_axis(&boxes[b as usize], axis);
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = sorted.len() / 2;
    let right_indices = sorted.split_off(mid);
    let left_indices = sorted;

    let (left, right) = if left_indices.len() >= PARALLEL_THRESHOLD {
        rayon::join(
            || build_recursive(boxes, left_indices, max_leaf_size),
            || build_recursive(boxes, right_indices, max_leaf_size),
        )
    } else {
        (
            build_recursive(boxes, left_indices, max_leaf_size),
            build_recursive(boxes, right_indices, max_leaf_size),
        )
    };

    BvhNode::Internal {
        bbox,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn longest_axis(bbox: &Aabb) -> usize {
    let size = bbox.size();
    if size.x >= size.y && size.x >= size.z {
        0
    } else if size.y >= size.z {
        1
    } else {
        2
    }
}

fn center_on_axis(bbox: &Aabb, axis: usize) -> f64 {
    (bbox.min[axis] + bbox.max[axis]) * 0.5
}

/// Statistics about the tree structure.
#[derive(Debug, Default, Clone)]
pub struct BvhStats {
    /// Number of internal (branch) nodes.
    pub internal_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Maximum depth of the tree.
    pub max_depth: usize,
    /// Total facets stored across all leaves.
    pub total_facets_in_leaves: usize,
}

fn collect_stats(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
    stats.max_depth = stats.max_depth.max(depth);

    match node {
        BvhNode::Leaf { facets, .. } => {
            stats.leaf_count += 1;
            stats.total_facets_in_leaves += facets.len();
        }
        BvhNode::Internal { left, right, .. } => {
            stats.internal_count += 1;
            collect_stats(left, depth + 1, stats);
            collect_stats(right, depth + 1, stats);
        }
    }
}
