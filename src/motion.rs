//! Pointer geometry for the custom cursor and the magnetic hover boxes.

const TOC_BOX_PAD_X: f64 = 10.0;
const TOC_BOX_PAD_Y: f64 = 6.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Raw pointer target plus the smoothed follower position.
#[derive(Clone, Debug)]
pub struct FollowerState {
    target: Point,
    current: Point,
    revealed: bool,
    smoothing: f64,
}

impl FollowerState {
    pub fn new(smoothing: f64) -> Self {
        Self {
            target: Point::default(),
            current: Point::default(),
            revealed: false,
            smoothing,
        }
    }

    /// Records a pointer move. Returns `true` for the first move, after which
    /// the follower has been snapped onto the pointer.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        self.target = Point::new(x, y);
        if self.revealed {
            return false;
        }

        self.revealed = true;
        self.current = self.target;
        true
    }

    pub fn tick(&mut self) -> Point {
        self.current.x += (self.target.x - self.current.x) * self.smoothing;
        self.current.y += (self.target.y - self.current.y) * self.smoothing;
        self.current
    }

    pub fn current(&self) -> Point {
        self.current
    }
}

/// Opacity bookkeeping for the dot and the follower.
///
/// Suppressing regions nest (a `code` inside a `pre`), so suppression is a
/// depth counter rather than a flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorVisibility {
    revealed: bool,
    suppress_depth: u32,
    follower_hidden: bool,
}

impl CursorVisibility {
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn enter_suppressed(&mut self) {
        self.suppress_depth = self.suppress_depth.saturating_add(1);
    }

    pub fn leave_suppressed(&mut self) {
        self.suppress_depth = self.suppress_depth.saturating_sub(1);
    }

    pub fn set_follower_hidden(&mut self, hidden: bool) {
        self.follower_hidden = hidden;
    }

    pub fn suppressed(self) -> bool {
        self.suppress_depth > 0
    }

    pub fn dot_opacity(self) -> &'static str {
        if self.revealed && !self.suppressed() {
            "1"
        } else {
            "0"
        }
    }

    pub fn follower_opacity(self) -> &'static str {
        if self.revealed && !self.suppressed() && !self.follower_hidden {
            "1"
        } else {
            "0"
        }
    }
}

/// Offset of the hover box for a pointer inside `rect`.
pub fn magnetic_offset(rect: Rect, pointer: Point, strength: f64) -> Point {
    let center = rect.center();
    Point::new(
        (pointer.x - center.x) * strength,
        (pointer.y - center.y) * strength,
    )
}

pub fn translate_css(offset: Point) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

/// Hover box for a TOC link, in the scrollable dropdown's content coordinates.
pub fn toc_hover_box(link: Rect, dropdown: Rect, scroll: Point) -> Rect {
    let relative_top = link.top - dropdown.top + scroll.y;
    let relative_left = link.left - dropdown.left + scroll.x;

    Rect {
        left: relative_left - TOC_BOX_PAD_X,
        top: relative_top - TOC_BOX_PAD_Y,
        width: link.width + TOC_BOX_PAD_X * 2.0,
        height: link.height + TOC_BOX_PAD_Y * 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn first_move_snaps_follower_to_pointer() {
        let mut follower = FollowerState::new(0.15);
        assert_eq!(follower.current(), Point::default());

        assert!(follower.pointer_moved(320.0, 180.0));
        assert_eq!(follower.current(), Point::new(320.0, 180.0));

        assert!(!follower.pointer_moved(400.0, 180.0));
        assert_eq!(follower.current(), Point::new(320.0, 180.0));

        let next = follower.tick();
        assert!((next.x - 332.0).abs() < EPSILON);
        assert!((next.y - 180.0).abs() < EPSILON);
    }

    #[test]
    fn tick_moves_fifteen_percent_of_remaining_distance() {
        let mut follower = FollowerState::new(0.15);
        follower.pointer_moved(0.0, 0.0);
        follower.pointer_moved(100.0, -200.0);

        let next = follower.tick();
        assert!((next.x - 15.0).abs() < EPSILON);
        assert!((next.y + 30.0).abs() < EPSILON);

        let next = follower.tick();
        assert!((next.x - 27.75).abs() < EPSILON);
    }

    #[test]
    fn follower_lags_until_rest() {
        let mut follower = FollowerState::new(0.15);
        follower.pointer_moved(0.0, 0.0);
        follower.pointer_moved(50.0, 50.0);

        for _ in 0..10 {
            let current = follower.tick();
            assert!(current.x < 50.0);
        }
        for _ in 0..400 {
            follower.tick();
        }
        assert!((follower.current().x - 50.0).abs() < 1e-6);
    }

    #[test]
    fn magnetic_offset_scales_distance_from_center() {
        let rect = Rect {
            left: 100.0,
            top: 40.0,
            width: 80.0,
            height: 20.0,
        };

        let offset = magnetic_offset(rect, Point::new(180.0, 40.0), 0.3);
        assert!((offset.x - 12.0).abs() < EPSILON);
        assert!((offset.y + 3.0).abs() < EPSILON);

        assert_eq!(magnetic_offset(rect, rect.center(), 0.3), Point::default());
        assert_eq!(translate_css(Point::new(12.0, -3.0)), "translate(12px, -3px)");
    }

    #[test]
    fn toc_box_accounts_for_scroll_and_padding() {
        let link = Rect {
            left: 420.0,
            top: 300.0,
            width: 120.0,
            height: 18.0,
        };
        let dropdown = Rect {
            left: 400.0,
            top: 100.0,
            width: 260.0,
            height: 320.0,
        };

        let hover = toc_hover_box(link, dropdown, Point::new(0.0, 150.0));
        assert_eq!(
            hover,
            Rect {
                left: 10.0,
                top: 344.0,
                width: 140.0,
                height: 30.0,
            }
        );
    }

    #[test]
    fn visibility_respects_reveal_suppression_and_magnetic_hover() {
        let mut visibility = CursorVisibility::default();
        assert_eq!(visibility.dot_opacity(), "0");

        visibility.reveal();
        assert_eq!(visibility.dot_opacity(), "1");
        assert_eq!(visibility.follower_opacity(), "1");

        visibility.set_follower_hidden(true);
        assert_eq!(visibility.dot_opacity(), "1");
        assert_eq!(visibility.follower_opacity(), "0");
        visibility.set_follower_hidden(false);

        visibility.enter_suppressed();
        visibility.enter_suppressed();
        visibility.leave_suppressed();
        assert!(visibility.suppressed());
        assert_eq!(visibility.dot_opacity(), "0");
        assert_eq!(visibility.follower_opacity(), "0");

        visibility.leave_suppressed();
        visibility.leave_suppressed();
        assert!(!visibility.suppressed());
        assert_eq!(visibility.follower_opacity(), "1");
    }

    proptest! {
        #[test]
        fn follower_never_overshoots_fixed_target(
            start in (-2_000.0f64..2_000.0, -2_000.0f64..2_000.0),
            target in (-2_000.0f64..2_000.0, -2_000.0f64..2_000.0),
            smoothing in 0.01f64..0.5,
            ticks in 1usize..200,
        ) {
            let mut follower = FollowerState::new(smoothing);
            follower.pointer_moved(start.0, start.1);
            follower.pointer_moved(target.0, target.1);

            let mut previous = follower.current();
            for _ in 0..ticks {
                let next = follower.tick();
                for (prev, now, goal) in [(previous.x, next.x, target.0), (previous.y, next.y, target.1)] {
                    prop_assert!((now - goal).abs() <= (prev - goal).abs() + EPSILON);
                    prop_assert!((now - goal) * (prev - goal) >= -EPSILON);
                }
                previous = next;
            }
        }

        #[test]
        fn magnetic_offset_stays_within_scaled_half_extent(
            width in 1.0f64..600.0,
            height in 1.0f64..200.0,
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
            strength in 0.0f64..=1.0,
        ) {
            let rect = Rect { left: 25.0, top: 75.0, width, height };
            let pointer = Point::new(rect.left + width * fx, rect.top + height * fy);
            let offset = magnetic_offset(rect, pointer, strength);

            prop_assert!(offset.x.abs() <= width / 2.0 * strength + EPSILON);
            prop_assert!(offset.y.abs() <= height / 2.0 * strength + EPSILON);
        }
    }
}
