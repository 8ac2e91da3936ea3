use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
pub(super) struct Bounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Bounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            if !point.is_finite() {
                return None;
            }
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let span = (max - min).max(vec2(1.0, 1.0));
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: (span.max_elem() * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extent && offset.y <= self.half_extent
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    fn quadrant(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign_x = if quadrant & 1 == 0 { -1.0 } else { 1.0 };
        let sign_y = if quadrant & 2 == 0 { -1.0 } else { 1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half_extent: quarter,
        }
    }

    /// Squared distance from `point` to the nearest point of the cell, 0 inside.
    fn distance_sq_to(self, point: Vec2) -> f32 {
        let outside = ((point - self.center).abs() - Vec2::splat(self.half_extent)).max(Vec2::ZERO);
        outside.length_sq()
    }
}

/// Barnes–Hut cell. Leaves hold member indices; inner cells only aggregate mass.
pub(super) struct Quadtree {
    pub(super) bounds: Bounds,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<Quadtree>>; 4],
}

impl Quadtree {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let bounds = Bounds::enclosing(points)?;
        let members = (0..points.len()).collect();
        Some(Self::build_cell(bounds, members, points, 0))
    }

    fn build_cell(bounds: Bounds, members: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let mass = members.len() as f32;
        let center_of_mass = if members.is_empty() {
            bounds.center
        } else {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + points[index])
                / mass
        };

        let mut cell = Self {
            bounds,
            center_of_mass,
            mass,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &cell.members {
            buckets[bounds.quadrant(points[index])].push(index);
        }

        // Stacked points never separate; splitting would only burn depth.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            cell.children[quadrant] = Some(Box::new(Self::build_cell(
                bounds.child(quadrant),
                bucket,
                points,
                depth + 1,
            )));
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &Quadtree> {
        self.children.iter().filter_map(|child| child.as_deref())
    }

    /// Calls `visit` for every member whose cell lies within `range` of `point`.
    pub(super) fn visit_near(&self, point: Vec2, range: f32, visit: &mut impl FnMut(usize)) {
        if self.bounds.distance_sq_to(point) > range * range {
            return;
        }

        if self.is_leaf() {
            self.members.iter().copied().for_each(&mut *visit);
            return;
        }

        for child in self.children() {
            child.visit_near(point, range, visit);
        }
    }
}
