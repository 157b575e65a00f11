//! Rose Pine Color Palette Module
//! Based on the official Rose Pine theme: https://rosepinetheme.com/
//! Dark mode uses the main variant, light mode uses Rose Pine Dawn.

use crate::models::Theme;
use ratatui::style::Color;

pub struct RosePine;

impl RosePine {
    pub const BASE: Color = Color::Rgb(25, 23, 36);
    pub const SURFACE: Color = Color::Rgb(31, 29, 46);
    pub const TEXT: Color = Color::Rgb(224, 222, 244);
    pub const SUBTLE: Color = Color::Rgb(144, 140, 170);
    pub const MUTED: Color = Color::Rgb(110, 106, 134);
    pub const LOVE: Color = Color::Rgb(235, 111, 146);
    pub const GOLD: Color = Color::Rgb(246, 193, 119);
    pub const ROSE: Color = Color::Rgb(235, 188, 186);
    pub const PINE: Color = Color::Rgb(49, 116, 143);
    pub const FOAM: Color = Color::Rgb(156, 207, 216);
    pub const IRIS: Color = Color::Rgb(196, 167, 231);
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(82, 79, 103);
    pub const HIGHLIGHT_LOW: Color = Color::Rgb(33, 32, 46);
}

pub struct RosePineDawn;

impl RosePineDawn {
    pub const BASE: Color = Color::Rgb(250, 244, 237);
    pub const SURFACE: Color = Color::Rgb(255, 250, 243);
    pub const TEXT: Color = Color::Rgb(87, 82, 121);
    pub const SUBTLE: Color = Color::Rgb(121, 117, 147);
    pub const MUTED: Color = Color::Rgb(152, 147, 165);
    pub const LOVE: Color = Color::Rgb(180, 99, 122);
    pub const GOLD: Color = Color::Rgb(234, 157, 52);
    pub const ROSE: Color = Color::Rgb(215, 130, 126);
    pub const PINE: Color = Color::Rgb(40, 105, 131);
    pub const FOAM: Color = Color::Rgb(86, 148, 159);
    pub const IRIS: Color = Color::Rgb(144, 122, 169);
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(206, 202, 205);
    pub const HIGHLIGHT_LOW: Color = Color::Rgb(244, 237, 232);
}

/// The colours every widget draws with, picked from the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Color,
    pub surface: Color,
    pub text: Color,
    pub subtle: Color,
    pub muted: Color,
    pub love: Color,
    pub gold: Color,
    pub rose: Color,
    pub pine: Color,
    pub foam: Color,
    pub iris: Color,
    pub highlight_high: Color,
    pub highlight_low: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        base: RosePine::BASE,
        surface: RosePine::SURFACE,
        text: RosePine::TEXT,
        subtle: RosePine::SUBTLE,
        muted: RosePine::MUTED,
        love: RosePine::LOVE,
        gold: RosePine::GOLD,
        rose: RosePine::ROSE,
        pine: RosePine::PINE,
        foam: RosePine::FOAM,
        iris: RosePine::IRIS,
        highlight_high: RosePine::HIGHLIGHT_HIGH,
        highlight_low: RosePine::HIGHLIGHT_LOW,
    };

    pub const LIGHT: Palette = Palette {
        base: RosePineDawn::BASE,
        surface: RosePineDawn::SURFACE,
        text: RosePineDawn::TEXT,
        subtle: RosePineDawn::SUBTLE,
        muted: RosePineDawn::MUTED,
        love: RosePineDawn::LOVE,
        gold: RosePineDawn::GOLD,
        rose: RosePineDawn::ROSE,
        pine: RosePineDawn::PINE,
        foam: RosePineDawn::FOAM,
        iris: RosePineDawn::IRIS,
        highlight_high: RosePineDawn::HIGHLIGHT_HIGH,
        highlight_low: RosePineDawn::HIGHLIGHT_LOW,
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::DARK,
            Theme::Light => Self::LIGHT,
        }
    }

    /// syntect theme that reads well on this palette's background
    pub fn syntax_theme(&self) -> &'static str {
        if *self == Self::DARK {
            "base16-mocha.dark"
        } else {
            "InspiredGitHub"
        }
    }
}
