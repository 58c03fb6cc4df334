//! Viewport drawing and the geometry behind it.
//!
//! The geometry half (`bubble_geometry`, `hit_test`) is plain math so the
//! click targets can be tested natively; `draw_frame` is the canvas half.

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::game::{LetterId, LetterStore, LetterToken, Symbol};

pub const BUBBLE_RADIUS: f64 = 25.0;
/// How long the pop burst plays, in ms.
pub const POP_ANIMATION_MS: f64 = 500.0;
const LABEL_ANIMATION_MS: f64 = 800.0;
const LABEL_DELAY_MS: f64 = 100.0;

const BUBBLE_COLOR: &str = "#f59e0b";
const BUBBLE_FLASH: &str = "#fbbf24";
const BUBBLE_GLOW: &str = "#fde047";
const LETTER_COLOR: &str = "#dc2626";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleGeom {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
    /// 0 until popped, then pop animation progress in `[0, 1]`.
    pub pop_progress: f64,
}

fn ease_in(t: f64) -> f64 {
    t * t
}

/// Piecewise-linear keyframes over `[0, 1]`.
fn keyframes(t: f64, times: [f64; 3], values: [f64; 3]) -> f64 {
    if t <= times[0] {
        return values[0];
    }
    for i in 0..2 {
        if t <= times[i + 1] {
            let span = times[i + 1] - times[i];
            let local = if span > 0.0 { (t - times[i]) / span } else { 1.0 };
            return values[i] + (values[i + 1] - values[i]) * local;
        }
    }
    values[2]
}

/// Where and how a letter is drawn at `now`. Letters start fully below the
/// bottom edge and finish fully above the top edge.
pub fn bubble_geometry(token: &LetterToken, now: f64, vp: Viewport) -> BubbleGeom {
    let progress = ease_in(token.rise_progress(now));
    let start_y = vp.height + BUBBLE_RADIUS;
    let end_y = -BUBBLE_RADIUS;
    let y = start_y + (end_y - start_y) * progress;
    let x = token.horizontal_position / 100.0 * vp.width + BUBBLE_RADIUS;

    match token.popped_at() {
        None => {
            let scale = keyframes(token.rise_progress(now), [0.0, 0.3, 1.0], [0.5, 1.1, 1.1]);
            BubbleGeom { x, y, radius: BUBBLE_RADIUS * scale, opacity: 1.0, pop_progress: 0.0 }
        }
        Some(popped_at) => {
            let t = ((now - popped_at) / POP_ANIMATION_MS).clamp(0.0, 1.0);
            let scale = keyframes(t, [0.0, 0.5, 1.0], [1.0, 1.1, 1.2]);
            let opacity = keyframes(t, [0.0, 0.5, 1.0], [1.0, 1.0, 0.0]);
            BubbleGeom { x, y, radius: BUBBLE_RADIUS * 1.1 * scale, opacity, pop_progress: t }
        }
    }
}

/// Topmost (most recently spawned) un-popped letter under the point.
pub fn hit_test<'a, I>(letters: I, x: f64, y: f64, now: f64, vp: Viewport) -> Option<LetterId>
where
    I: IntoIterator<Item = &'a LetterToken>,
    I::IntoIter: DoubleEndedIterator,
{
    letters
        .into_iter()
        .rev()
        .filter(|l| !l.is_popped())
        .find(|l| {
            let g = bubble_geometry(l, now, vp);
            let (dx, dy) = (x - g.x, y - g.y);
            dx * dx + dy * dy <= g.radius * g.radius
        })
        .map(|l| l.id)
}

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    background: &HtmlImageElement,
    letters: &LetterStore,
    now: f64,
    vp: Viewport,
) {
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str("#4b5563");
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
    if background.complete() && background.natural_width() > 0 {
        draw_cover(ctx, background, vp);
    }

    for letter in letters {
        let g = bubble_geometry(letter, now, vp);
        if g.y - g.radius > vp.height || g.y + g.radius < 0.0 {
            continue;
        }
        draw_bubble(ctx, letter.symbol, &g);
        if letter.is_popped() {
            let age = now - letter.popped_at().unwrap_or(now);
            draw_reaction(ctx, letter.symbol, &g, age);
        }
    }
    ctx.set_global_alpha(1.0);
}

// object-fit: cover
fn draw_cover(ctx: &CanvasRenderingContext2d, img: &HtmlImageElement, vp: Viewport) {
    let (iw, ih) = (img.natural_width() as f64, img.natural_height() as f64);
    let scale = (vp.width / iw).max(vp.height / ih);
    let (dw, dh) = (iw * scale, ih * scale);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        img,
        (vp.width - dw) / 2.0,
        (vp.height - dh) / 2.0,
        dw,
        dh,
    )
    .ok();
}

fn draw_bubble(ctx: &CanvasRenderingContext2d, symbol: Symbol, g: &BubbleGeom) {
    let fill = if g.pop_progress == 0.0 {
        BUBBLE_COLOR
    } else if g.pop_progress < 0.5 {
        BUBBLE_FLASH
    } else {
        BUBBLE_GLOW
    };
    ctx.set_global_alpha(g.opacity);
    ctx.begin_path();
    ctx.arc(g.x, g.y, g.radius, 0.0, std::f64::consts::TAU).ok();
    ctx.set_fill_style_str(fill);
    ctx.fill();

    // The glyph collapses faster than the bubble.
    let glyph_t = (g.pop_progress * POP_ANIMATION_MS / 300.0).min(1.0);
    let glyph_alpha = keyframes(glyph_t, [0.0, 0.5, 1.0], [1.0, 0.5, 0.0]);
    let glyph_scale = keyframes(glyph_t, [0.0, 0.5, 1.0], [1.0, 1.2, 0.0]);
    if glyph_scale <= 0.0 {
        return;
    }
    ctx.set_global_alpha(g.opacity.min(glyph_alpha));
    ctx.set_fill_style_str(LETTER_COLOR);
    ctx.set_font(&format!("800 {:.0}px sans-serif", 20.0 * glyph_scale * g.radius / BUBBLE_RADIUS));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(symbol.as_str(), g.x, g.y).ok();
}

fn draw_reaction(ctx: &CanvasRenderingContext2d, symbol: Symbol, g: &BubbleGeom, age_ms: f64) {
    let t = ((age_ms - LABEL_DELAY_MS) / LABEL_ANIMATION_MS).clamp(0.0, 1.0);
    let lift = 20.0 * (1.0 - t);
    let scale = 0.8 + 0.2 * t;
    let glow = if symbol.is_target() { "#ff8c00" } else { "#ef4444" };
    ctx.set_global_alpha(0.8 + 0.2 * t);
    ctx.set_shadow_color(glow);
    ctx.set_shadow_blur(20.0);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font(&format!("800 {:.0}px sans-serif", 24.0 * scale));
    ctx.set_text_align("center");
    ctx.fill_text(symbol.reaction(), g.x, g.y - 48.0 + lift).ok();
    ctx.set_shadow_blur(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Timing;

    const VP: Viewport = Viewport { width: 375.0, height: 360.0 };

    fn letter(id: u64, position: f64) -> LetterToken {
        LetterToken::new(
            LetterId(id),
            Symbol::W,
            position,
            Timing { fall_duration: 4.0, entry_delay: 0.0 },
            1,
            0.0,
        )
    }

    #[test]
    fn rise_goes_bottom_to_top() {
        let l = letter(1, 0.0);
        let start = bubble_geometry(&l, 0.0, VP);
        let end = bubble_geometry(&l, 4_000.0, VP);
        assert!(start.y - start.radius >= VP.height - BUBBLE_RADIUS);
        assert!(end.y + end.radius <= BUBBLE_RADIUS * 0.2);
        assert_eq!(start.x, BUBBLE_RADIUS);
    }

    #[test]
    fn popped_letter_freezes_and_fades() {
        let l = letter(1, 50.0).into_popped(2_000.0);
        let a = bubble_geometry(&l, 2_000.0, VP);
        let b = bubble_geometry(&l, 2_500.0, VP);
        assert_eq!(a.y, b.y);
        assert_eq!(a.opacity, 1.0);
        assert_eq!(b.opacity, 0.0);
        assert!(b.radius > a.radius);
    }

    #[test]
    fn hit_test_finds_letter_under_point() {
        let l = letter(1, 40.0);
        let g = bubble_geometry(&l, 2_000.0, VP);
        let letters = vec![l];
        assert_eq!(hit_test(&letters, g.x, g.y, 2_000.0, VP), Some(LetterId(1)));
        assert_eq!(hit_test(&letters, g.x + 200.0, g.y, 2_000.0, VP), None);
    }

    #[test]
    fn hit_test_prefers_newest_and_skips_popped() {
        let older = letter(1, 40.0);
        let newer = letter(2, 40.0);
        let g = bubble_geometry(&older, 2_000.0, VP);
        let letters = vec![older.clone(), newer.clone()];
        assert_eq!(hit_test(&letters, g.x, g.y, 2_000.0, VP), Some(LetterId(2)));
        let letters = vec![older, newer.into_popped(1_900.0)];
        assert_eq!(hit_test(&letters, g.x, g.y, 2_000.0, VP), Some(LetterId(1)));
    }

    #[test]
    fn keyframes_interpolate() {
        assert_eq!(keyframes(0.0, [0.0, 0.3, 1.0], [0.5, 1.1, 1.1]), 0.5);
        assert!((keyframes(0.15, [0.0, 0.3, 1.0], [0.5, 1.1, 1.1]) - 0.8).abs() < 1e-9);
        assert_eq!(keyframes(2.0, [0.0, 0.3, 1.0], [0.5, 1.1, 1.1]), 1.1);
    }
}
