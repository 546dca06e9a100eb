use glam::Vec2;

use crate::anim::{Placement, SpriteAnimator};
use crate::assets::{FRAME_H, FRAME_W};
use crate::input::{Button, PadEvent, AXIS_X, AXIS_Y};

/// Native handheld screen size the demos are authored against.
pub const SCREEN_W: u32 = 480;
pub const SCREEN_H: u32 = 272;

/// Pixels moved per d-pad press.
const NUDGE: i32 = 5;
/// Nub-driven rectangle speed at full deflection (pixels/second).
const NUB_SPEED: f32 = 120.0;

/// Which demo scene is active. Select cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Sprite,
    Rects,
    Audio,
}

impl Demo {
    pub fn label(self) -> &'static str {
        match self {
            Demo::Sprite => "Sprite",
            Demo::Rects => "Rects",
            Demo::Audio => "Audio",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Demo::Sprite => Demo::Rects,
            Demo::Rects => Demo::Audio,
            Demo::Audio => Demo::Sprite,
        }
    }
}

/// Cheetah over the forest backdrop. The sheet animates on its own clock;
/// the d-pad nudges the destination rectangle, unclamped, so the cheetah can
/// run off-screen just like on the handheld.
pub struct SpriteScene {
    pub animator: SpriteAnimator,
    pub placement: Placement,
}

impl SpriteScene {
    pub fn new() -> Self {
        // Drawn at 2x frame size, centered on the native screen.
        let w = FRAME_W * 2;
        let h = FRAME_H * 2;
        Self {
            animator: SpriteAnimator::new(FRAME_W, FRAME_H),
            placement: Placement::new(
                (SCREEN_W as i32 - w as i32) / 2,
                (SCREEN_H as i32 - h as i32) / 2,
                w,
                h,
            ),
        }
    }

    pub fn handle_event(&mut self, event: &PadEvent) {
        if let PadEvent::ButtonDown { button, .. } = event {
            match button {
                Button::Left => self.placement.reposition(-NUDGE, 0),
                Button::Right => self.placement.reposition(NUDGE, 0),
                Button::Up => self.placement.reposition(0, -NUDGE),
                Button::Down => self.placement.reposition(0, NUDGE),
                _ => {}
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.animator.advance(dt);
    }
}

/// Two colored rectangles: one stepped by the d-pad, one glided by the
/// analog nub. Cross re-rolls the colors.
pub struct RectsScene {
    pub pad_rect: Placement,
    pub nub_pos: Vec2,
    pub colors: [u32; 2],
    nub_axis: Vec2,
    rng: fastrand::Rng,
}

impl RectsScene {
    pub const RECT_W: u32 = 60;
    pub const RECT_H: u32 = 40;

    pub fn new() -> Self {
        let mut rng = fastrand::Rng::new();
        let colors = [random_color(&mut rng), random_color(&mut rng)];
        Self {
            pad_rect: Placement::new(80, 100, Self::RECT_W, Self::RECT_H),
            nub_pos: Vec2::new(300.0, 100.0),
            colors,
            nub_axis: Vec2::ZERO,
            rng,
        }
    }

    pub fn handle_event(&mut self, event: &PadEvent) {
        match event {
            PadEvent::ButtonDown { button, .. } => match button {
                Button::Left => self.pad_rect.reposition(-NUDGE, 0),
                Button::Right => self.pad_rect.reposition(NUDGE, 0),
                Button::Up => self.pad_rect.reposition(0, -NUDGE),
                Button::Down => self.pad_rect.reposition(0, NUDGE),
                Button::Cross => {
                    self.colors = [random_color(&mut self.rng), random_color(&mut self.rng)];
                }
                _ => {}
            },
            PadEvent::AxisMotion { axis, value, .. } => match *axis {
                AXIS_X => self.nub_axis.x = *value,
                AXIS_Y => self.nub_axis.y = *value,
                _ => {}
            },
            PadEvent::Quit => {}
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.nub_pos += self.nub_axis * NUB_SPEED * dt;
    }
}

fn random_color(rng: &mut fastrand::Rng) -> u32 {
    let palette: &[[u8; 3]] = &[
        [230, 70, 70],   // red
        [70, 160, 230],  // blue
        [90, 200, 90],   // green
        [240, 200, 60],  // yellow
        [200, 90, 220],  // violet
        [60, 210, 200],  // teal
    ];
    let [r, g, b] = palette[rng.usize(0..palette.len())];
    pack_rgba(r, g, b, 255)
}

/// RGBA packed big-endian, the layout the quad shader unpacks.
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32
}

/// All scene state plus the active selector.
pub struct DemoState {
    pub current: Demo,
    pub sprite: SpriteScene,
    pub rects: RectsScene,
}

impl DemoState {
    pub fn new() -> Self {
        Self {
            current: Demo::Sprite,
            sprite: SpriteScene::new(),
            rects: RectsScene::new(),
        }
    }

    /// Advance to the next scene, returning its label for logging.
    pub fn cycle(&mut self) -> &'static str {
        self.current = self.current.next();
        self.current.label()
    }

    /// Route a pad event to the active scene.
    pub fn handle_event(&mut self, event: &PadEvent) {
        match self.current {
            Demo::Sprite => self.sprite.handle_event(event),
            Demo::Rects => self.rects.handle_event(event),
            Demo::Audio => {}
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.current {
            Demo::Sprite => self.sprite.update(dt),
            Demo::Rects => self.rects.update(dt),
            Demo::Audio => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PAD0;

    fn press(button: Button) -> PadEvent {
        PadEvent::ButtonDown { pad: PAD0, button }
    }

    #[test]
    fn cycle_visits_every_demo_and_closes() {
        let mut demos = DemoState::new();
        assert_eq!(demos.current, Demo::Sprite);
        demos.cycle();
        assert_eq!(demos.current, Demo::Rects);
        demos.cycle();
        assert_eq!(demos.current, Demo::Audio);
        demos.cycle();
        assert_eq!(demos.current, Demo::Sprite);
    }

    #[test]
    fn dpad_press_pair_returns_sprite_to_origin() {
        let mut scene = SpriteScene::new();
        let before = scene.placement;
        scene.handle_event(&press(Button::Left));
        scene.handle_event(&press(Button::Right));
        assert_eq!(scene.placement, before);
    }

    #[test]
    fn sprite_can_leave_the_screen() {
        let mut scene = SpriteScene::new();
        for _ in 0..200 {
            scene.handle_event(&press(Button::Left));
        }
        assert!(scene.placement.x < -(scene.placement.w as i32));
    }

    #[test]
    fn nub_deflection_glides_the_rect() {
        let mut scene = RectsScene::new();
        let start = scene.nub_pos;
        scene.handle_event(&PadEvent::AxisMotion { pad: PAD0, axis: AXIS_X, value: 1.0 });
        scene.update(0.5);
        assert!(scene.nub_pos.x > start.x);
        assert_eq!(scene.nub_pos.y, start.y);

        // Center the nub; the rect stops.
        scene.handle_event(&PadEvent::AxisMotion { pad: PAD0, axis: AXIS_X, value: 0.0 });
        let held = scene.nub_pos;
        scene.update(0.5);
        assert_eq!(scene.nub_pos, held);
    }

    #[test]
    fn events_only_reach_the_active_scene() {
        let mut demos = DemoState::new();
        demos.cycle(); // Rects
        let sprite_before = demos.sprite.placement;
        demos.handle_event(&press(Button::Left));
        assert_eq!(demos.sprite.placement, sprite_before);
        assert_eq!(demos.rects.pad_rect.x, 80 - NUDGE);
    }
}
