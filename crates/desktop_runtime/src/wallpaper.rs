//! Desktop wallpaper selection.

use crate::model::Viewport;

/// Default wallpaper.
pub const DEFAULT_WALLPAPER: &str = "./assets/gui/desktop/bliss.webp";
/// Wallpaper for ultrawide screens.
pub const ULTRAWIDE_WALLPAPER: &str = "./assets/gui/desktop/bliss-ultrawide.webp";
/// Aspect ratio at and above which the ultrawide wallpaper is used.
pub const ULTRAWIDE_ASPECT_RATIO: f64 = 2.1;

/// Picks the wallpaper for the current viewport shape.
pub fn wallpaper_for(viewport: Viewport) -> &'static str {
    if viewport.height <= 0 {
        return DEFAULT_WALLPAPER;
    }
    let ratio = f64::from(viewport.width) / f64::from(viewport.height);
    if ratio >= ULTRAWIDE_ASPECT_RATIO {
        ULTRAWIDE_WALLPAPER
    } else {
        DEFAULT_WALLPAPER
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ultrawide_viewports_get_the_wide_wallpaper() {
        assert_eq!(wallpaper_for(Viewport::new(1920, 1080)), DEFAULT_WALLPAPER);
        assert_eq!(wallpaper_for(Viewport::new(3440, 1440)), ULTRAWIDE_WALLPAPER);
        assert_eq!(wallpaper_for(Viewport::new(2100, 1000)), ULTRAWIDE_WALLPAPER);
        assert_eq!(wallpaper_for(Viewport::new(800, 0)), DEFAULT_WALLPAPER);
    }
}
