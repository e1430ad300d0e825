use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Class;

// ---------------------------------------------------------------------------
// Class colors
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Fixed series colour per class: cool blue for legitimate traffic,
/// warm red for fraud.
pub fn class_color(class: Class) -> Color32 {
    match class {
        Class::Legitimate => hsl_to_color32(Hsl::new(210.0, 0.70, 0.55)),
        Class::Fraudulent => hsl_to_color32(Hsl::new(2.0, 0.80, 0.55)),
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation in [-1, 1] onto a blue → white → red scale.
pub fn diverging_color(t: f64) -> Color32 {
    let t = t.clamp(-1.0, 1.0) as f32;

    let blue = Srgb::new(0.13, 0.40, 0.67);
    let white = Srgb::new(0.97, 0.97, 0.97);
    let red = Srgb::new(0.70, 0.09, 0.17);

    let (from, to, f) = if t < 0.0 {
        (white, blue, -t)
    } else {
        (white, red, t)
    };

    let mix = Srgb::new(
        from.red + (to.red - from.red) * f,
        from.green + (to.green - from.green) * f,
        from.blue + (to.blue - from.blue) * f,
    );

    Color32::from_rgb(
        (mix.red * 255.0) as u8,
        (mix.green * 255.0) as u8,
        (mix.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_colors_are_distinct() {
        assert_ne!(class_color(Class::Legitimate), class_color(Class::Fraudulent));
    }

    #[test]
    fn diverging_scale_endpoints() {
        let lo = diverging_color(-1.0);
        let mid = diverging_color(0.0);
        let hi = diverging_color(1.0);

        // Negative end is blue-dominant, positive end red-dominant,
        // midpoint near-white.
        assert!(lo.b() > lo.r());
        assert!(hi.r() > hi.b());
        assert!(mid.r() > 230 && mid.g() > 230 && mid.b() > 230);

        // Out-of-range input clamps.
        assert_eq!(diverging_color(-5.0), lo);
        assert_eq!(diverging_color(5.0), hi);
    }
}
