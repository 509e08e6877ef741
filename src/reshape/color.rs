//! Deterministic series colors.

use crate::domain::{Palette, Rgb};

/// Scatter panel palette (one color per district).
pub const SCATTER_PALETTE: Palette<'static> = Palette::new(&[
    Rgb(0xff, 0x63, 0x84),
    Rgb(0x36, 0xa2, 0xeb),
    Rgb(0xff, 0xce, 0x56),
    Rgb(0x4b, 0xc0, 0xc0),
    Rgb(0x99, 0x66, 0xff),
    Rgb(0xff, 0x9f, 0x40),
]);

/// High-contrast palette for the forecast panel (red, green, yellow, blue,
/// orange, purple, cyan, magenta, lime, pink).
pub const FORECAST_PALETTE: Palette<'static> = Palette::new(&[
    Rgb(0xe6, 0x19, 0x4b),
    Rgb(0x3c, 0xb4, 0x4b),
    Rgb(0xff, 0xe1, 0x19),
    Rgb(0x43, 0x63, 0xd8),
    Rgb(0xf5, 0x82, 0x31),
    Rgb(0x91, 0x1e, 0xb4),
    Rgb(0x46, 0xf0, 0xf0),
    Rgb(0xf0, 0x32, 0xe6),
    Rgb(0xbc, 0xf6, 0x0c),
    Rgb(0xfa, 0xbe, 0xbe),
]);

pub const ORANGE: Rgb = Rgb(0xff, 0xa5, 0x00);
pub const BLUE: Rgb = Rgb(0x00, 0x00, 0xff);
pub const REVENUE_NAVY: Rgb = Rgb(0x1e, 0x3a, 0x8a);
pub const GVA_GREEN: Rgb = Rgb(0x10, 0xb9, 0x81);

/// Color for the series at `index`; cycles once the palette is exhausted.
pub fn assign(index: usize, palette: Palette<'_>) -> Rgb {
    palette.colors()[index % palette.len()]
}

/// Hue (degrees) for a quarter of a given year.
///
/// Shifting by `year * 5` keeps the same quarter visually distinct across years.
pub fn quarter_hue(quarter_index: usize, year: i32) -> f64 {
    let raw = (quarter_index as i64) * 60 + i64::from(year) * 5;
    raw.rem_euclid(360) as f64
}

/// `hsl(quarter_hue, 70%, 50%)`.
pub fn quarter_color(quarter_index: usize, year: i32) -> Rgb {
    Rgb::from_hsl(quarter_hue(quarter_index, year), 0.7, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn assign_cycles_through_palette() {
        assert_eq!(assign(0, SCATTER_PALETTE), Rgb(0xff, 0x63, 0x84));
        assert_eq!(assign(5, SCATTER_PALETTE), Rgb(0xff, 0x9f, 0x40));
        assert_eq!(assign(6, SCATTER_PALETTE), assign(0, SCATTER_PALETTE));
        assert_eq!(assign(13, FORECAST_PALETTE), Rgb(0x43, 0x63, 0xd8));
    }

    #[test]
    fn single_color_palette_always_returns_it() {
        let only = [Rgb(1, 2, 3)];
        let palette = Palette::try_new(&only).unwrap();
        for i in 0..20 {
            assert_eq!(assign(i, palette), Rgb(1, 2, 3));
        }
    }

    #[test]
    fn quarter_hue_wraps() {
        // 2023 * 5 = 10115 -> 10115 mod 360 = 35
        assert_eq!(quarter_hue(0, 2023), 35.0);
        assert_eq!(quarter_hue(1, 2023), 95.0);
        assert_eq!(quarter_hue(3, 2023), 215.0);
        assert_eq!(quarter_hue(6, 0), 0.0);
    }

    #[test]
    fn quarters_differ_within_a_year() {
        let colors: Vec<Rgb> = (0..4).map(|q| quarter_color(q, 2024)).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    proptest! {
        #[test]
        fn assign_is_periodic_in_palette_length(
            index in 0usize..10_000,
            raw in prop::collection::vec(any::<(u8, u8, u8)>(), 1..16),
        ) {
            let colors: Vec<Rgb> = raw.into_iter().map(|(r, g, b)| Rgb(r, g, b)).collect();
            let palette = Palette::try_new(&colors).unwrap();
            prop_assert_eq!(assign(index, palette), assign(index + palette.len(), palette));
        }
    }
}
