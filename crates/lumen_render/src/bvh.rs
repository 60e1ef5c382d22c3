//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once over the shared primitive handles of a scene.
//! Leaves are the primitives themselves, so the tree and the flat list it
//! replaces reference the same objects.

use crate::hittable::{HitRecord, Hittable, HittableList};
use lumen_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// BVH node: a branch over two children, or nothing at all.
///
/// A single object is stored as a branch whose children are both that
/// object, so there is no separate leaf case.
pub enum BvhNode {
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Built from an empty list; never hit.
    Empty,
}

impl BvhNode {
    /// Build a BVH over the objects of `list`. The list is left untouched.
    pub fn new(list: &HittableList) -> Self {
        Self::from_objects(list.objects().to_vec())
    }

    /// Build a BVH over the given handles.
    pub fn from_objects(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let mut depth = 0;
        let root = Self::build(&mut objects, 1, &mut depth);
        log::debug!("Built BVH over {} objects, depth {}", objects.len(), depth);
        root
    }

    /// Recursive construction over a non-empty slice.
    ///
    /// Splits at the median after sorting by box minimum along the longest
    /// axis of the slice's bounds.
    fn build(objects: &mut [Arc<dyn Hittable>], level: usize, depth: &mut usize) -> Self {
        *depth = (*depth).max(level);

        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box())
        });
        let axis = bounds.longest_axis();

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            _ => {
                objects.sort_unstable_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = objects.len() / 2;
                let (left_objects, right_objects) = objects.split_at_mut(mid);
                (
                    Arc::new(Self::build(left_objects, level + 1, depth)),
                    Arc::new(Self::build(right_objects, level + 1, depth)),
                )
            }
        };

        // Children's boxes, not `bounds`, so the node is as tight as its subtrees
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

        BvhNode::Branch { left, right, bbox }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let BvhNode::Branch { left, right, bbox } = self else {
            return None;
        };

        if !bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = left.hit(ray, ray_t);

        // Only check right up to closest hit
        let right_t = hit_left
            .as_ref()
            .map_or(ray_t, |rec| ray_t.with_max(rec.t));
        let hit_right = right.hit(ray, right_t);

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
