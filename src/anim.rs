/// Seconds of accumulated frame time per animation step (10 steps/second).
const STEP_INTERVAL: f32 = 0.1;

/// A source sub-rectangle into a sprite sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Steps through a 4x2 sprite sheet: four columns left to right, then the
/// row toggles and the columns repeat. Eight frames per full cycle.
///
/// Time is fed in through `advance`; one accumulated `STEP_INTERVAL` moves
/// the source rectangle by exactly one column. The accumulator resets to
/// zero on each step, so any surplus past the threshold is discarded rather
/// than carried into the next interval.
#[derive(Debug, Clone)]
pub struct SpriteAnimator {
    frame_w: u32,
    frame_h: u32,
    src: FrameRect,
    accumulator: f32,
}

impl SpriteAnimator {
    /// Start at frame (0, 0) with an empty accumulator.
    pub fn new(frame_w: u32, frame_h: u32) -> Self {
        Self {
            frame_w,
            frame_h,
            src: FrameRect {
                x: 0,
                y: 0,
                w: frame_w,
                h: frame_h,
            },
            accumulator: 0.0,
        }
    }

    /// Accumulate `dt` seconds; step at most one column per call.
    ///
    /// The wrap check is strictly greater-than, so the fourth column sits at
    /// `3 * frame_w` for one full interval before wrapping back to zero and
    /// toggling the row.
    pub fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
        if self.accumulator >= STEP_INTERVAL {
            self.src.x += self.frame_w;

            if self.src.x > 3 * self.frame_w {
                self.src.x = 0;
                self.src.y = if self.src.y == 0 { self.frame_h } else { 0 };
            }

            self.accumulator = 0.0;
        }
    }

    /// The sub-rectangle to sample for the current frame.
    pub fn current_frame(&self) -> FrameRect {
        self.src
    }
}

/// Destination rectangle on the output surface. Width and height are fixed
/// at construction; only the origin moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Placement {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Shift the origin instantly. No clamping against the output surface;
    /// the rectangle may move partially or fully off-screen.
    pub fn reposition(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FW: u32 = 128;
    const FH: u32 = 126;

    fn cross(anim: &mut SpriteAnimator, n: usize) {
        for _ in 0..n {
            anim.advance(0.1);
        }
    }

    #[test]
    fn starts_at_origin_frame() {
        let anim = SpriteAnimator::new(FW, FH);
        assert_eq!(
            anim.current_frame(),
            FrameRect { x: 0, y: 0, w: FW, h: FH }
        );
    }

    #[test]
    fn column_follows_crossing_count_mod_four() {
        let mut anim = SpriteAnimator::new(FW, FH);
        for n in 1..=12usize {
            anim.advance(0.1);
            assert_eq!(anim.current_frame().x, (n as u32 % 4) * FW, "crossing {n}");
        }
    }

    #[test]
    fn row_toggles_every_four_crossings() {
        let mut anim = SpriteAnimator::new(FW, FH);
        cross(&mut anim, 3);
        assert_eq!(anim.current_frame().y, 0);
        anim.advance(0.1);
        assert_eq!(anim.current_frame().y, FH);
        cross(&mut anim, 4);
        assert_eq!(anim.current_frame().y, 0);
    }

    #[test]
    fn accumulation_is_associative_across_calls() {
        let mut split = SpriteAnimator::new(FW, FH);
        split.advance(0.05);
        split.advance(0.05);

        let mut whole = SpriteAnimator::new(FW, FH);
        whole.advance(0.1);

        assert_eq!(split.current_frame(), whole.current_frame());
        assert_eq!(split.current_frame().x, FW);
    }

    #[test]
    fn surplus_past_threshold_is_discarded() {
        let mut anim = SpriteAnimator::new(FW, FH);
        anim.advance(0.19);
        assert_eq!(anim.current_frame().x, FW);
        // The 0.09 surplus was dropped, so another 0.09 must not step again.
        anim.advance(0.09);
        assert_eq!(anim.current_frame().x, FW);
        anim.advance(0.01);
        assert_eq!(anim.current_frame().x, 2 * FW);
    }

    #[test]
    fn fourth_column_holds_before_wrap() {
        let mut anim = SpriteAnimator::new(FW, FH);
        cross(&mut anim, 3);
        assert_eq!(anim.current_frame().x, 3 * FW);
        assert_eq!(anim.current_frame().y, 0);
    }

    #[test]
    fn wrap_resets_column_and_toggles_row() {
        let mut anim = SpriteAnimator::new(FW, FH);
        cross(&mut anim, 4);
        assert_eq!(anim.current_frame().x, 0);
        assert_eq!(anim.current_frame().y, FH);
    }

    #[test]
    fn eight_crossings_close_the_cycle() {
        let mut anim = SpriteAnimator::new(FW, FH);
        cross(&mut anim, 8);
        assert_eq!(
            anim.current_frame(),
            FrameRect { x: 0, y: 0, w: FW, h: FH }
        );
    }

    #[test]
    fn reposition_pair_is_inverse() {
        let mut placement = Placement::new(112, 10, 256, 252);
        let before = placement;
        placement.reposition(-5, 0);
        placement.reposition(5, 0);
        assert_eq!(placement, before);
    }

    #[test]
    fn reposition_is_unclamped() {
        let mut placement = Placement::new(0, 0, 256, 252);
        placement.reposition(-500, -500);
        assert_eq!((placement.x, placement.y), (-500, -500));
    }
}
