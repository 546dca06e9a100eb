use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

/// The single pad the demos listen to.
pub const PAD0: u8 = 0;

/// Analog nub axes.
pub const AXIS_X: u8 = 0;
pub const AXIS_Y: u8 = 1;

/// Logical pad buttons, numbered like the handheld SDK's joystick buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Cross,
    Square,
    Down,
    Left,
    Up,
    Right,
    Select,
    Start,
}

impl Button {
    /// Raw button id as reported by the original pad driver.
    pub fn id(self) -> u8 {
        match self {
            Button::Cross => 2,
            Button::Square => 3,
            Button::Down => 6,
            Button::Left => 7,
            Button::Up => 8,
            Button::Right => 9,
            Button::Select => 10,
            Button::Start => 11,
        }
    }
}

/// Discrete input event, the shape the demo scenes consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    Quit,
    ButtonDown { pad: u8, button: Button },
    AxisMotion { pad: u8, axis: u8, value: f32 },
}

/// Translate a keyboard key into a pad event. Desktop stand-in for the
/// handheld's pad: arrows = d-pad, Enter = Start, Tab = Select, Z = Cross,
/// X = Square, WASD = analog nub (press = full deflection, release = center).
///
/// Buttons fire on press only; key repeats are ignored.
pub fn translate_key(key: &Key, state: ElementState, repeat: bool) -> Option<PadEvent> {
    if repeat {
        return None;
    }
    let pressed = state == ElementState::Pressed;

    let button = |b: Button| {
        if pressed {
            Some(PadEvent::ButtonDown { pad: PAD0, button: b })
        } else {
            None
        }
    };
    let axis = |axis: u8, deflection: f32| {
        Some(PadEvent::AxisMotion {
            pad: PAD0,
            axis,
            value: if pressed { deflection } else { 0.0 },
        })
    };

    match key.as_ref() {
        Key::Named(NamedKey::ArrowLeft) => button(Button::Left),
        Key::Named(NamedKey::ArrowRight) => button(Button::Right),
        Key::Named(NamedKey::ArrowUp) => button(Button::Up),
        Key::Named(NamedKey::ArrowDown) => button(Button::Down),
        Key::Named(NamedKey::Enter) => button(Button::Start),
        Key::Named(NamedKey::Tab) => button(Button::Select),
        Key::Named(NamedKey::Escape) => {
            if pressed {
                Some(PadEvent::Quit)
            } else {
                None
            }
        }
        // Shift/CapsLock turn the logical key into "Z", "X", ...; the pad
        // mapping doesn't care about case.
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "z" => button(Button::Cross),
            "x" => button(Button::Square),
            "a" => axis(AXIS_X, -1.0),
            "d" => axis(AXIS_X, 1.0),
            "w" => axis(AXIS_Y, -1.0),
            "s" => axis(AXIS_Y, 1.0),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn named(k: NamedKey) -> Key {
        Key::Named(k)
    }

    fn ch(s: &str) -> Key {
        Key::Character(SmolStr::new(s))
    }

    #[test]
    fn dpad_maps_to_button_down() {
        assert_eq!(
            translate_key(&named(NamedKey::ArrowLeft), ElementState::Pressed, false),
            Some(PadEvent::ButtonDown { pad: PAD0, button: Button::Left })
        );
        assert_eq!(
            translate_key(&named(NamedKey::ArrowRight), ElementState::Pressed, false),
            Some(PadEvent::ButtonDown { pad: PAD0, button: Button::Right })
        );
    }

    #[test]
    fn buttons_ignore_release_and_repeat() {
        assert_eq!(
            translate_key(&named(NamedKey::ArrowLeft), ElementState::Released, false),
            None
        );
        assert_eq!(
            translate_key(&named(NamedKey::ArrowLeft), ElementState::Pressed, true),
            None
        );
    }

    #[test]
    fn nub_keys_deflect_and_center() {
        assert_eq!(
            translate_key(&ch("a"), ElementState::Pressed, false),
            Some(PadEvent::AxisMotion { pad: PAD0, axis: AXIS_X, value: -1.0 })
        );
        assert_eq!(
            translate_key(&ch("a"), ElementState::Released, false),
            Some(PadEvent::AxisMotion { pad: PAD0, axis: AXIS_X, value: 0.0 })
        );
        assert_eq!(
            translate_key(&ch("s"), ElementState::Pressed, false),
            Some(PadEvent::AxisMotion { pad: PAD0, axis: AXIS_Y, value: 1.0 })
        );
    }

    #[test]
    fn character_keys_match_regardless_of_case() {
        assert_eq!(
            translate_key(&ch("Z"), ElementState::Pressed, false),
            Some(PadEvent::ButtonDown { pad: PAD0, button: Button::Cross })
        );
        assert_eq!(
            translate_key(&ch("X"), ElementState::Pressed, false),
            Some(PadEvent::ButtonDown { pad: PAD0, button: Button::Square })
        );
        assert_eq!(
            translate_key(&ch("A"), ElementState::Pressed, false),
            Some(PadEvent::AxisMotion { pad: PAD0, axis: AXIS_X, value: -1.0 })
        );
    }

    #[test]
    fn escape_quits() {
        assert_eq!(
            translate_key(&named(NamedKey::Escape), ElementState::Pressed, false),
            Some(PadEvent::Quit)
        );
    }

    #[test]
    fn button_ids_match_pad_driver_numbering() {
        assert_eq!(Button::Left.id(), 7);
        assert_eq!(Button::Right.id(), 9);
        assert_eq!(Button::Start.id(), 11);
    }
}
