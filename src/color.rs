use sidemenu::preferences::Dimming;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Fully transparent; the background of hosted surfaces.
    pub fn clear() -> Color {
        Color::default()
    }

    pub fn black(a: f64) -> Color {
        Color {
            r: 0.,
            g: 0.,
            b: 0.,
            a,
        }
    }

    /// Overlay drawn above the content while the menu is `fraction` revealed.
    ///
    /// Blur is left to the host and yields no color.
    pub fn dimming(dimming: Dimming, fraction: f64) -> Option<Color> {
        match dimming {
            Dimming::Color { alpha } if fraction > 0. => {
                Some(Color::black(alpha * fraction.min(1.)))
            }
            Dimming::Color { .. } | Dimming::None | Dimming::Blur(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimming_follows_the_reveal() {
        let dimming = Dimming::Color { alpha: 0.4 };
        assert_eq!(Color::dimming(dimming, 0.), None);
        assert_eq!(Color::dimming(dimming, 0.5), Some(Color::black(0.2)));
        assert_eq!(Color::dimming(dimming, 1.), Some(Color::black(0.4)));
        assert_eq!(Color::dimming(Dimming::None, 1.), None);
    }
}
