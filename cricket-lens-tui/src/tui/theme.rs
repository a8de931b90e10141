use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub muted: Color,
    pub home: Color,
    pub away: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            muted: Color::DarkGray,
            home: Color::Rgb(59, 130, 246),
            away: Color::Rgb(239, 68, 68),
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::LightGreen,
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            muted: Color::Gray,
            home: Color::Blue,
            away: Color::Red,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            muted: Color::Rgb(76, 86, 106),
            home: Color::Rgb(129, 161, 193),
            away: Color::Rgb(191, 97, 106),
            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            success: Color::Rgb(163, 190, 140),
        }
    }
    pub fn colorblind() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            muted: Color::DarkGray,
            home: Color::Rgb(0x00, 0x80, 0xFF),
            away: Color::Rgb(0xFF, 0x8C, 0x00), // orange instead of red
            error: Color::Rgb(0xFF, 0x8C, 0x00),
            warning: Color::LightYellow,
            success: Color::Rgb(0x00, 0x80, 0xFF),
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }
}
