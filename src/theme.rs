use ratatui::style::Color;

use crate::efficiency::Rating;

/// Region palette, cycled by color slot. Slot assignment is stable for a
/// given layout, so a child keeps its color across re-renders.
pub const REGION_PALETTE: [Color; 6] = [
    Color::Rgb(255, 99, 132),
    Color::Rgb(54, 162, 235),
    Color::Rgb(255, 206, 86),
    Color::Rgb(75, 192, 192),
    Color::Rgb(153, 102, 255),
    Color::Rgb(255, 159, 64),
];

/// Theme data structure containing all colors used in the application
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub active_border: Color,
    pub inactive_border: Color,

    // Explorer listing
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub directory: Color,
    pub file: Color,
    pub size_column: Color,
    pub breadcrumb: Color,

    // Layer table
    pub layer_index: Color,
    pub layer_size: Color,

    // Efficiency ratings
    pub rating_good: Color,
    pub rating_fair: Color,
    pub rating_poor: Color,
    pub anomaly: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_help_text: Color,

    // General UI
    pub panel_title: Color,
    pub text_default: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Panel borders
            active_border: Color::Yellow,
            inactive_border: Color::DarkGray,

            // Explorer listing
            selected_bg: Color::White,
            selected_fg: Color::Black,
            directory: Color::Blue,
            file: Color::Reset,
            size_column: Color::Green,
            breadcrumb: Color::Cyan,

            // Layer table
            layer_index: Color::Yellow,
            layer_size: Color::Green,

            // Efficiency ratings
            rating_good: Color::Green,
            rating_fair: Color::Yellow,
            rating_poor: Color::Red,
            anomaly: Color::Red,

            // Status bar
            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_help_text: Color::Gray,

            // General UI
            panel_title: Color::Gray,
            text_default: Color::Reset,
        }
    }
}

impl Theme {
    /// Color for a region's palette slot.
    pub fn region_color(&self, color_slot: usize) -> Color {
        REGION_PALETTE[color_slot % REGION_PALETTE.len()]
    }

    pub fn rating_color(&self, rating: Rating) -> Color {
        match rating {
            Rating::Good => self.rating_good,
            Rating::Fair => self.rating_fair,
            Rating::Poor => self.rating_poor,
        }
    }
}

/// Get the current theme
pub fn get_theme() -> Theme {
    Theme::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_theme_returns_valid_theme() {
        let theme = get_theme();

        assert_eq!(theme.active_border, Color::Yellow);
        assert_eq!(theme.inactive_border, Color::DarkGray);
        assert_eq!(theme.status_bar_bg, Color::DarkGray);
    }

    #[test]
    fn test_region_colors_cycle_past_palette_end() {
        let theme = get_theme();
        assert_eq!(theme.region_color(0), REGION_PALETTE[0]);
        assert_eq!(theme.region_color(6), REGION_PALETTE[0]);
        assert_eq!(theme.region_color(7), REGION_PALETTE[1]);
    }

    #[test]
    fn test_rating_colors_follow_thresholds() {
        let theme = get_theme();
        assert_eq!(theme.rating_color(Rating::Good), Color::Green);
        assert_eq!(theme.rating_color(Rating::Fair), Color::Yellow);
        assert_eq!(theme.rating_color(Rating::Poor), Color::Red);
    }
}
