//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives. Each level sorts its
//! primitives along a randomly chosen axis by bounding-box minimum and
//! splits at the midpoint, which yields balanced trees in expectation
//! without computing centroids or surface-area costs.

use std::cmp::Ordering;

use crate::error::BuildError;
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Ray;
use kiln_math::{Aabb, Interval};
use rand::{Rng, RngCore};

/// BVH node - either a branch with two children or a leaf with one primitive.
///
/// Every node caches the box enclosing everything beneath it. The tree is
/// immutable once built.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf owning a single primitive.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
}

/// A primitive paired with its box for the shutter interval.
type Bounded = (Box<dyn Hittable>, Aabb);

impl BvhNode {
    /// Build a BVH over `objects`, using boxes for the shutter interval
    /// [time0, time1].
    ///
    /// Fails if the list is empty or any primitive reports no bounding box.
    pub fn new(
        objects: Vec<Box<dyn Hittable>>,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::EmptyScene);
        }

        let count = objects.len();
        let bounded = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| match object.bounding_box(time0, time1) {
                Some(bbox) => Ok((object, bbox)),
                None => Err(BuildError::MissingBoundingBox {
                    index,
                    kind: object.kind(),
                }),
            })
            .collect::<Result<Vec<Bounded>, _>>()?;

        let root = Self::build(bounded, rng);
        log::debug!(
            "BVH built over {} primitives: {} nodes, depth {}",
            count,
            root.node_count(),
            root.depth()
        );

        Ok(root)
    }

    /// Build a BVH from a hittable list, consuming it.
    pub fn from_list(
        list: HittableList,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        Self::new(list.into_objects(), time0, time1, rng)
    }

    fn build(mut objects: Vec<Bounded>, rng: &mut dyn RngCore) -> Self {
        if objects.len() == 1 {
            if let Some((object, bbox)) = objects.pop() {
                return BvhNode::Leaf { object, bbox };
            }
        }

        let axis = rng.gen_range(0..3);
        objects.sort_unstable_by(|a, b| box_compare(&a.1, &b.1, axis));

        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        let left = Self::build(objects, rng);
        let right = Self::build(right_objects, rng);
        let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Box enclosing this subtree.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

fn box_compare(a: &Aabb, b: &Aabb, axis: usize) -> Ordering {
    a.axis_interval(axis)
        .min
        .total_cmp(&b.axis_interval(axis).min)
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AaRect, Lambertian, Material, Sphere};
    use kiln_math::random::{gen_range, random_unit_vector, random_vec3};
    use kiln_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn material(rng: &mut StdRng) -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(random_vec3(rng, 0.0, 1.0)))
    }

    /// A mix of spheres and rectangles, each with its own material.
    fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Box<dyn Hittable>> {
        (0..count)
            .map(|i| -> Box<dyn Hittable> {
                let center = random_vec3(rng, -10.0, 10.0);
                if i % 5 == 0 {
                    let (w, h) = (gen_range(rng, 0.5, 3.0), gen_range(rng, 0.5, 3.0));
                    Box::new(AaRect::xy(
                        center.x,
                        center.x + w,
                        center.y,
                        center.y + h,
                        center.z,
                        material(rng),
                    ))
                } else {
                    let radius = gen_range(rng, 0.2, 1.5);
                    Box::new(Sphere::new(center, radius, material(rng)))
                }
            })
            .collect()
    }

    /// Forwards to a primitive owned by another container.
    struct Shared(&'static dyn Hittable);

    impl Hittable for Shared {
        fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
            self.0.hit(ray, ray_t)
        }

        fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
            self.0.bounding_box(time0, time1)
        }
    }

    fn material_ptr(rec: &HitRecord) -> *const () {
        rec.material as *const dyn Material as *const ()
    }

    #[test]
    fn test_bvh_matches_linear_list() {
        let mut rng = StdRng::seed_from_u64(7);

        // The BVH is built over the list's own primitives so materials compare by address
        let list: &'static HittableList = Box::leak(Box::new(HittableList::from(random_scene(
            &mut StdRng::seed_from_u64(70),
            60,
        ))));
        let shared: Vec<Box<dyn Hittable>> = list
            .objects()
            .iter()
            .map(|object| Box::new(Shared(object.as_ref())) as Box<dyn Hittable>)
            .collect();
        let bvh = BvhNode::new(shared, 0.0, 1.0, &mut rng).unwrap();

        let mut hits = 0;
        for _ in 0..1000 {
            let origin = random_vec3(&mut rng, -15.0, 15.0);
            let target = random_vec3(&mut rng, -10.0, 10.0);
            let direction = if (target - origin).length_squared() > 1e-6 {
                target - origin
            } else {
                random_unit_vector(&mut rng)
            };
            let ray = Ray::new(origin, direction, 0.0);
            let ray_t = Interval::new(0.001, f64::INFINITY);

            match (list.hit(&ray, ray_t), bvh.hit(&ray, ray_t)) {
                (Some(expected), Some(actual)) => {
                    hits += 1;
                    assert_eq!(expected.t, actual.t);
                    assert_eq!(expected.p, actual.p);
                    assert_eq!(expected.normal, actual.normal);
                    assert_eq!(expected.u, actual.u);
                    assert_eq!(expected.v, actual.v);
                    assert_eq!(material_ptr(&expected), material_ptr(&actual));
                }
                (None, None) => {}
                (expected, actual) => panic!(
                    "list hit = {}, bvh hit = {}",
                    expected.is_some(),
                    actual.is_some()
                ),
            }
        }
        assert!(hits > 100, "only {hits} rays hit anything");
    }

    #[test]
    fn test_bvh_hit_returns_material_of_nearest() {
        let mut rng = StdRng::seed_from_u64(8);
        let near = material(&mut rng);
        let far = material(&mut rng);
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, far.clone())),
            Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, near.clone())),
            Box::new(Sphere::new(Vec3::new(5.0, 0.0, -3.0), 1.0, far.clone())),
        ];
        let bvh = BvhNode::new(objects, 0.0, 1.0, &mut rng).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert_eq!(material_ptr(&rec), Arc::as_ptr(&near) as *const ());
    }

    #[test]
    fn test_bvh_single_primitive_is_leaf() {
        let mut rng = StdRng::seed_from_u64(9);
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::from_color(Color::splat(0.5))),
        ))];
        let bvh = BvhNode::new(objects, 0.0, 1.0, &mut rng).unwrap();

        assert!(matches!(bvh, BvhNode::Leaf { .. }));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_some());
    }

    #[test]
    fn test_bvh_root_box_covers_everything() {
        let mut rng = StdRng::seed_from_u64(10);
        let objects = random_scene(&mut rng, 50);
        let boxes: Vec<Aabb> = objects
            .iter()
            .map(|o| o.bounding_box(0.0, 1.0).unwrap())
            .collect();

        let bvh = BvhNode::new(objects, 0.0, 1.0, &mut rng).unwrap();
        let root = bvh.bounding_box(0.0, 1.0).unwrap();
        for bbox in boxes {
            for corner in bbox.corners() {
                assert!(root.contains_point(corner));
            }
        }
        assert_eq!(bvh.node_count(), 2 * 50 - 1);
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let mut rng = StdRng::seed_from_u64(11);
        let result = BvhNode::new(Vec::new(), 0.0, 1.0, &mut rng);
        assert!(matches!(result, Err(BuildError::EmptyScene)));
    }

    #[test]
    fn test_unbounded_primitive_is_an_error() {
        let mut rng = StdRng::seed_from_u64(12);
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::ZERO, 1.0, material(&mut rng))),
            // An empty list has no box
            Box::new(HittableList::new()),
        ];

        match BvhNode::new(objects, 0.0, 1.0, &mut rng) {
            Err(BuildError::MissingBoundingBox { index, kind }) => {
                assert_eq!(index, 1);
                assert!(kind.contains("HittableList"));
            }
            _ => panic!("expected a missing bounding box error"),
        }
    }
}
