//! Orbital camera: eye and target are the only degrees of freedom.
//!
//! Pointer gestures resolve to one [`DragMode`] at gesture start and keep it
//! until the buttons are released, so a second button pressed mid-drag never
//! flips the mode. All matrices derive from eye/target/up plus the fixed
//! projection parameters; call [`OrbitalCamera::update_matrices`] after
//! mutating the pose and before rendering.

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::{Mat4, Vec2, Vec3};

/// Keeps the polar angle strictly inside (0, pi); at the poles the azimuth
/// is undefined and the orbit would snap.
const POLAR_EPSILON: f32 = 0.001;

/// Interaction mode for one pointer-drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    /// Rotate the eye around the target, preserving distance.
    Orbit,
    /// Change the eye-target distance along the view direction.
    Dolly,
    /// Translate eye and target together, preserving orientation.
    Pan,
}

impl DragMode {
    /// Picks the mode from the pointer button bitmask (bit 0 = left,
    /// bit 1 = right, bit 2 = middle), lowest set bit winning.
    pub fn from_buttons(buttons: u32) -> Option<Self> {
        if buttons & 1 != 0 {
            Some(Self::Orbit)
        } else if buttons & 2 != 0 {
            Some(Self::Dolly)
        } else if buttons & 4 != 0 {
            Some(Self::Pan)
        } else {
            None
        }
    }

    /// Picks the mode from the full input state. Holding Space drags with
    /// the keyboard: Space+Shift orbits, Space+Ctrl dollies, Space alone
    /// pans. Without Space the pointer buttons decide.
    pub fn from_input(buttons: u32, space: bool, shift: bool, ctrl: bool) -> Option<Self> {
        if space {
            if shift {
                Some(Self::Orbit)
            } else if ctrl {
                Some(Self::Dolly)
            } else {
                Some(Self::Pan)
            }
        } else {
            Self::from_buttons(buttons)
        }
    }
}

pub struct OrbitalCamera {
    pub eye: Vec3,
    pub target: Vec3,
    up: Vec3,
    yfov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

impl OrbitalCamera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            target,
            up: Vec3::Y,
            yfov: FRAC_PI_4,
            aspect,
            near: 0.01,
            far: 1024.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_matrices();
    }

    /// Rederives view, projection, view-projection and its inverse from the
    /// current pose. Matrices are otherwise left stale while a gesture
    /// mutates the pose; refresh before consuming them.
    pub fn update_matrices(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.target, self.up);
        self.projection = Mat4::perspective_rh(self.yfov, self.aspect, self.near, self.far);
        self.view_projection = self.projection * self.view;
        self.inverse_view_projection = self.view_projection.inverse();
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Applies one pointer movement. `position` is the pointer location in
    /// viewport pixels after the movement, `delta` the movement itself.
    pub fn drag(&mut self, mode: DragMode, position: Vec2, delta: Vec2, viewport: Vec2) {
        match mode {
            DragMode::Orbit => self.orbit(delta, viewport),
            DragMode::Dolly => self.dolly(position, delta, viewport),
            DragMode::Pan => self.pan(position, delta, viewport),
        }
        self.update_matrices();
    }

    fn orbit(&mut self, delta: Vec2, viewport: Vec2) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        let dir = offset / radius;

        let mut azimuth = dir.x.atan2(dir.z);
        let mut polar = dir.y.clamp(-1.0, 1.0).acos();
        azimuth -= delta.x / viewport.x * TAU;
        polar -= delta.y / viewport.y * PI;
        polar = polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let dir = Vec3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        );
        self.eye = self.target + radius * dir;
    }

    fn pan(&mut self, position: Vec2, delta: Vec2, viewport: Vec2) {
        let current = self.touch_point(position, viewport);
        let previous = self.touch_point(position - delta, viewport);
        // Negated so the touched world point follows the pointer.
        let shift = current - previous;
        self.eye -= shift;
        self.target -= shift;
    }

    fn dolly(&mut self, position: Vec2, delta: Vec2, viewport: Vec2) {
        let current = self.touch_point(position, viewport);
        let previous = self.touch_point(position - delta, viewport);

        let axis = if delta.x != 0.0 { delta.x } else { delta.y };
        let radial = -axis.signum() * current.distance(previous);

        let offset = self.eye - self.target;
        let radius = offset.length();
        let next = (radius + radial).max(self.near);
        self.eye = self.target + offset * (next / radius);
    }

    /// World-space point the pointer touches on the plane through the target
    /// that faces the camera. The pointer position unprojects to the near
    /// plane (depth 0 in clip space) through the inverse view-projection;
    /// the ray from the eye through that point then intersects the plane.
    fn touch_point(&self, position: Vec2, viewport: Vec2) -> Vec3 {
        let ndc = Vec2::new(
            position.x / viewport.x * 2.0 - 1.0,
            1.0 - position.y / viewport.y * 2.0,
        );
        let near_point = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.0));

        let normal = (self.target - self.eye).normalize();
        let ray = near_point - self.eye;
        let t = (self.target - near_point).dot(normal) / ray.dot(normal);
        near_point + ray * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn camera() -> OrbitalCamera {
        OrbitalCamera::new(Vec3::splat(2.0), Vec3::ZERO, VIEWPORT.x / VIEWPORT.y)
    }

    #[test]
    fn target_sits_straight_ahead_in_view_space() {
        let camera = camera();
        let viewed = camera.view().transform_point3(camera.target);
        let distance = camera.eye.distance(camera.target);
        assert!(viewed.x.abs() < 1e-5);
        assert!(viewed.y.abs() < 1e-5);
        assert!((viewed.z + distance).abs() < 1e-4);
    }

    #[test]
    fn orbit_with_zero_movement_is_a_no_op() {
        let mut camera = camera();
        let (eye, target) = (camera.eye, camera.target);
        camera.drag(DragMode::Orbit, VIEWPORT / 2.0, Vec2::ZERO, VIEWPORT);
        assert!(camera.eye.distance(eye) < 1e-5);
        assert_eq!(camera.target, target);
    }

    #[test]
    fn orbit_preserves_the_radius() {
        let mut camera = camera();
        let radius = camera.eye.distance(camera.target);
        for step in 0..20 {
            let delta = Vec2::new(17.0, -9.0 + step as f32);
            camera.drag(DragMode::Orbit, VIEWPORT / 2.0, delta, VIEWPORT);
            assert!((camera.eye.distance(camera.target) - radius).abs() < 1e-3);
        }
    }

    #[test]
    fn orbit_clamps_short_of_the_poles() {
        let mut camera = camera();
        // Drag far past vertical in both directions.
        for _ in 0..50 {
            camera.drag(DragMode::Orbit, VIEWPORT / 2.0, Vec2::new(0.0, -200.0), VIEWPORT);
        }
        let dir = (camera.eye - camera.target).normalize();
        assert!(dir.y < POLAR_EPSILON.cos());
        for _ in 0..100 {
            camera.drag(DragMode::Orbit, VIEWPORT / 2.0, Vec2::new(0.0, 200.0), VIEWPORT);
        }
        let dir = (camera.eye - camera.target).normalize();
        assert!(dir.y > -POLAR_EPSILON.cos());
        assert!(camera.eye.is_finite());
    }

    #[test]
    fn pan_preserves_distance_and_orientation() {
        let mut camera = camera();
        let radius = camera.eye.distance(camera.target);
        let forward = (camera.target - camera.eye).normalize();
        camera.drag(
            DragMode::Pan,
            VIEWPORT / 2.0 + Vec2::new(40.0, -25.0),
            Vec2::new(40.0, -25.0),
            VIEWPORT,
        );
        assert!((camera.eye.distance(camera.target) - radius).abs() < 1e-3);
        let panned_forward = (camera.target - camera.eye).normalize();
        assert!(forward.dot(panned_forward) > 1.0 - 1e-5);
    }

    #[test]
    fn pan_makes_the_touched_point_follow_the_pointer() {
        let mut camera = camera();
        let before = camera.target;
        // Pointer moves right; the scene should follow, so the camera pair
        // shifts the opposite way along its own right axis.
        camera.drag(
            DragMode::Pan,
            VIEWPORT / 2.0 + Vec2::new(60.0, 0.0),
            Vec2::new(60.0, 0.0),
            VIEWPORT,
        );
        assert!(camera.target.distance(before) > 1e-3);
    }

    #[test]
    fn dolly_away_from_target_grows_the_radius_monotonically() {
        let mut camera = camera();
        let mut radius = camera.eye.distance(camera.target);
        for _ in 0..10 {
            camera.drag(DragMode::Dolly, VIEWPORT / 2.0, Vec2::new(-12.0, 0.0), VIEWPORT);
            let next = camera.eye.distance(camera.target);
            assert!(next > radius);
            radius = next;
        }
    }

    #[test]
    fn dolly_toward_target_never_crosses_it() {
        let mut camera = camera();
        for _ in 0..500 {
            camera.drag(DragMode::Dolly, VIEWPORT / 2.0, Vec2::new(12.0, 0.0), VIEWPORT);
        }
        let offset = camera.eye - camera.target;
        assert!(offset.length() >= 0.01 - 1e-6);
        // Still on the original side of the target.
        assert!(offset.dot(Vec3::splat(1.0)) > 0.0);
    }

    #[test]
    fn drag_mode_follows_the_button_bits() {
        assert_eq!(DragMode::from_buttons(0b001), Some(DragMode::Orbit));
        assert_eq!(DragMode::from_buttons(0b010), Some(DragMode::Dolly));
        assert_eq!(DragMode::from_buttons(0b100), Some(DragMode::Pan));
        assert_eq!(DragMode::from_buttons(0b011), Some(DragMode::Orbit));
        assert_eq!(DragMode::from_buttons(0), None);
    }

    #[test]
    fn space_with_modifiers_drags_without_buttons() {
        assert_eq!(DragMode::from_input(0, true, true, false), Some(DragMode::Orbit));
        assert_eq!(DragMode::from_input(0, true, false, true), Some(DragMode::Dolly));
        assert_eq!(DragMode::from_input(0, true, false, false), Some(DragMode::Pan));
        // Shift wins when both modifiers are down.
        assert_eq!(DragMode::from_input(0, true, true, true), Some(DragMode::Orbit));
        assert_eq!(DragMode::from_input(0, false, false, false), None);
    }

    #[test]
    fn modifiers_without_space_defer_to_the_buttons() {
        assert_eq!(DragMode::from_input(0b010, false, true, false), Some(DragMode::Dolly));
        assert_eq!(DragMode::from_input(0b001, false, false, true), Some(DragMode::Orbit));
        assert_eq!(DragMode::from_input(0, false, true, true), None);
    }
}
