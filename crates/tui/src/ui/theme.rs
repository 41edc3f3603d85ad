use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub panel: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(160, 160, 160),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(110, 150, 200),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(110, 150, 200),
            positive: Color::Rgb(90, 180, 120),
            negative: Color::Rgb(210, 100, 100),
            warning: Color::Rgb(210, 170, 90),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
