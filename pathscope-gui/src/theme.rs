//! Window theme: color palettes and egui visual overrides.
//!
//! Chrome drawing code takes its colors from [`Palette`] rather than
//! hardcoding them, so that both themes stay consistent.

use egui::{Color32, Rounding, Stroke, Vec2, Visuals};

/// Application theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Bright backgrounds, dark text.
    Light,
    /// Deep backgrounds, light text.
    Dark,
}

impl Theme {
    /// Return the opposite theme.
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon for the *action* of switching: a moon while light, a sun while
    /// dark.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "\u{1f319}",
            Self::Dark => "\u{2600}\u{fe0f}",
        }
    }

    /// Colors for this theme.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::DARK,
            Self::Light => Palette::LIGHT,
        }
    }

    /// Apply visuals and spacing to the context.
    pub fn apply(self, ctx: &egui::Context) {
        let p = self.palette();
        let mut v = match self {
            Self::Dark => Visuals::dark(),
            Self::Light => Visuals::light(),
        };

        v.panel_fill = p.surface;
        v.window_fill = p.surface;
        v.extreme_bg_color = p.canvas;
        v.hyperlink_color = p.accent;
        v.selection.bg_fill = p.selection;
        v.selection.stroke = Stroke::new(1.0, p.accent);

        let rounding = Rounding::same(4.0);
        v.widgets.noninteractive.bg_stroke = Stroke::new(1.0, p.border);
        v.widgets.noninteractive.fg_stroke = Stroke::new(1.0, p.text);
        v.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
        v.widgets.inactive.rounding = rounding;
        v.widgets.hovered.rounding = rounding;
        v.widgets.active.rounding = rounding;
        v.widgets.active.bg_stroke = Stroke::new(1.0, p.accent);

        ctx.set_visuals(v);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::new(8.0, 4.0);
        style.spacing.button_padding = Vec2::new(8.0, 3.0);
        ctx.set_style(style);
    }
}

/// Semantic colors of the window chrome and the page preview.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Page preview background.
    pub canvas: Color32,
    /// Panels: toolbar, inspector, status bar.
    pub surface: Color32,
    /// Element boxes in the preview and separator lines.
    pub border: Color32,
    /// Body text.
    pub text: Color32,
    /// Tag labels, hints, the status line.
    pub text_muted: Color32,
    /// Outline color used when an inline outline's color cannot be read.
    pub accent: Color32,
    /// Selected tree row background.
    pub selection: Color32,
}

impl Palette {
    const DARK: Self = Self {
        canvas: Color32::from_rgb(13, 14, 18),
        surface: Color32::from_rgb(19, 20, 26),
        border: Color32::from_rgb(52, 53, 66),
        text: Color32::from_rgb(232, 233, 237),
        text_muted: Color32::from_rgb(128, 129, 145),
        accent: Color32::from_rgb(59, 130, 246),
        selection: Color32::from_rgba_premultiplied(15, 33, 62, 64),
    };

    const LIGHT: Self = Self {
        canvas: Color32::from_rgb(255, 255, 255),
        surface: Color32::from_rgb(248, 249, 251),
        border: Color32::from_rgb(209, 211, 220),
        text: Color32::from_rgb(26, 27, 35),
        text_muted: Color32::from_rgb(107, 108, 126),
        accent: Color32::from_rgb(37, 99, 235),
        selection: Color32::from_rgba_premultiplied(5, 12, 29, 32),
    };
}
