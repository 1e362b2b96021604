//! Cursor-repulsion interaction math.
//!
//! Drives the "button that runs away from the pointer" demo: inside a fixed
//! radius the control is pushed along the pointer-to-center axis with
//! inverse-distance force, clamped to its container, and when it gets
//! cornered it teleports to a random spot away from the pointer. All state
//! lives in the caller; this module is pure geometry plus a seeded RNG so the
//! behavior is reproducible in tests.

// ============================================================================
// Geometry
// ============================================================================

/// A point (or offset) in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

// ============================================================================
// Seeded RNG
// ============================================================================

/// Small xorshift32 generator so teleport escapes are reproducible under a
/// fixed seed.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a generator from a seed; zero is remapped to a fixed non-zero
    /// constant because xorshift has an all-zero fixed point.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

// ============================================================================
// Repulsion policy
// ============================================================================

/// Tuning constants for the dodge behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionConfig {
    /// Pointer distance (from the control's center) at which repulsion kicks
    /// in.
    pub radius: f32,
    /// Force multiplier.
    pub intensity: f32,
    /// Fraction of the raw force applied per update.
    pub damping: f32,
    /// Distance from a container edge below which the control counts as
    /// "near" that edge.
    pub edge_threshold: f32,
    /// Margin kept from the container edges when teleporting.
    pub escape_padding: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            intensity: 200.0,
            damping: 0.1,
            edge_threshold: 60.0,
            escape_padding: 100.0,
        }
    }
}

/// Computes the control's next offset for one pointer update.
///
/// `offset` is the control's current translation from its layout position and
/// `control` its current on-screen rectangle (layout position plus offset).
/// Outside the repulsion radius the offset is returned unchanged. Inside it,
/// the control is pushed away and clamped into `container`; if it is already
/// pinned near two perpendicular edges and the pointer keeps closing in, it
/// instead teleports to a random offset (relative to the container center)
/// that tries to land well clear of the pointer.
pub fn dodge(
    offset: Point,
    control: Rect,
    container: Rect,
    pointer: Point,
    config: &RepulsionConfig,
    rng: &mut XorShift32,
) -> Point {
    let center = control.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance >= config.radius {
        return offset;
    }

    let near_left = control.left - container.left < config.edge_threshold;
    let near_right = container.right() - control.right() < config.edge_threshold;
    let near_top = control.top - container.top < config.edge_threshold;
    let near_bottom = container.bottom() - control.bottom() < config.edge_threshold;
    let cornered = (near_left || near_right) && (near_top || near_bottom);

    if cornered && distance < config.radius * 0.8 {
        return teleport(control, container, pointer, config, rng);
    }

    let force = (config.radius - distance) / config.radius;
    let angle = dy.atan2(dx);
    let push_x = -angle.cos() * force * config.intensity;
    let push_y = -angle.sin() * force * config.intensity;

    let new_x = offset.x + push_x * config.damping;
    let new_y = offset.y + push_y * config.damping;

    // Clamp the moved rectangle back inside the container.
    let moved_left = control.left + new_x - offset.x;
    let moved_right = control.right() + new_x - offset.x;
    let moved_top = control.top + new_y - offset.y;
    let moved_bottom = control.bottom() + new_y - offset.y;

    let mut clamped_x = new_x;
    let mut clamped_y = new_y;
    if moved_left < container.left {
        clamped_x += container.left - moved_left;
    } else if moved_right > container.right() {
        clamped_x -= moved_right - container.right();
    }
    if moved_top < container.top {
        clamped_y += container.top - moved_top;
    } else if moved_bottom > container.bottom() {
        clamped_y -= moved_bottom - container.bottom();
    }

    Point::new(clamped_x, clamped_y)
}

/// Picks a random escape offset around the container center, rejection
/// sampling a bounded number of times for a spot comfortably away from the
/// pointer before settling for whatever came last.
fn teleport(
    control: Rect,
    container: Rect,
    pointer: Point,
    config: &RepulsionConfig,
    rng: &mut XorShift32,
) -> Point {
    let max_x = ((container.width - control.width - config.escape_padding * 2.0) / 2.0).max(0.0);
    let max_y = ((container.height - control.height - config.escape_padding * 2.0) / 2.0).max(0.0);
    let center = container.center();

    let mut escape = Point::default();
    for attempt in 0..20 {
        escape = Point::new(
            (rng.next_f32() - 0.5) * max_x * 2.0,
            (rng.next_f32() - 0.5) * max_y * 2.0,
        );

        let landed_x = center.x + escape.x;
        let landed_y = center.y + escape.y;
        let clearance =
            ((pointer.x - landed_x).powi(2) + (pointer.y - landed_y).powi(2)).sqrt();
        if clearance > config.radius * 1.5 || attempt >= 10 {
            break;
        }
    }
    escape
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn control_at(left: f32, top: f32) -> Rect {
        Rect::new(left, top, 120.0, 48.0)
    }

    #[test]
    fn pointer_outside_radius_leaves_offset_unchanged() {
        let offset = Point::new(5.0, -3.0);
        let result = dodge(
            offset,
            control_at(400.0, 300.0),
            container(),
            Point::new(0.0, 0.0),
            &RepulsionConfig::default(),
            &mut XorShift32::new(1),
        );
        assert_eq!(result, offset);
    }

    #[test]
    fn pointer_inside_radius_pushes_away() {
        let control = control_at(400.0, 300.0);
        let center = control.center();
        // Pointer just left of center: the control should move right.
        let pointer = Point::new(center.x - 50.0, center.y);

        let result = dodge(
            Point::default(),
            control,
            container(),
            pointer,
            &RepulsionConfig::default(),
            &mut XorShift32::new(1),
        );

        assert!(result.x > 0.0);
        assert!(result.y.abs() < 1e-3);
    }

    #[test]
    fn force_grows_as_pointer_closes_in() {
        let control = control_at(400.0, 300.0);
        let center = control.center();
        let config = RepulsionConfig::default();

        let far = dodge(
            Point::default(),
            control,
            container(),
            Point::new(center.x - 140.0, center.y),
            &config,
            &mut XorShift32::new(1),
        );
        let near = dodge(
            Point::default(),
            control,
            container(),
            Point::new(center.x - 30.0, center.y),
            &config,
            &mut XorShift32::new(1),
        );

        assert!(near.x > far.x);
    }

    #[test]
    fn displacement_is_clamped_to_container() {
        // Control flush against the right edge, pointer closing from the left
        // but still outside the corner threshold vertically.
        let control = control_at(680.0, 276.0);
        let center = control.center();
        let pointer = Point::new(center.x - 40.0, center.y);

        let result = dodge(
            Point::default(),
            control,
            container(),
            pointer,
            &RepulsionConfig::default(),
            &mut XorShift32::new(1),
        );

        // Already flush: clamping cancels the push entirely.
        assert!(result.x.abs() < 1e-3);
    }

    #[test]
    fn cornered_control_teleports_within_padded_bounds() {
        let container = container();
        // Bottom-right corner, pointer nearly on top of the control.
        let control = control_at(670.0, 545.0);
        let center = control.center();
        let pointer = Point::new(center.x - 10.0, center.y - 10.0);
        let config = RepulsionConfig::default();

        let escape = dodge(
            Point::default(),
            control,
            container,
            pointer,
            &config,
            &mut XorShift32::new(42),
        );

        let max_x = (container.width - control.width - config.escape_padding * 2.0) / 2.0;
        let max_y = (container.height - control.height - config.escape_padding * 2.0) / 2.0;
        assert!(escape.x.abs() <= max_x);
        assert!(escape.y.abs() <= max_y);
        // It actually moved somewhere rather than staying pinned.
        assert!(escape.x != 0.0 || escape.y != 0.0);
    }

    #[test]
    fn teleport_is_reproducible_under_a_fixed_seed() {
        let control = control_at(670.0, 545.0);
        let center = control.center();
        let pointer = Point::new(center.x - 10.0, center.y - 10.0);

        let a = dodge(
            Point::default(),
            control,
            container(),
            pointer,
            &RepulsionConfig::default(),
            &mut XorShift32::new(7),
        );
        let b = dodge(
            Point::default(),
            control,
            container(),
            pointer,
            &RepulsionConfig::default(),
            &mut XorShift32::new(7),
        );

        assert_eq!(a, b);
    }

    #[test]
    fn rng_is_uniformish_in_unit_interval() {
        let mut rng = XorShift32::new(123);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
