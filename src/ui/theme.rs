use ratatui::style::Color;

pub const C_BG: Color = Color::Rgb(14, 16, 26);
pub const C_PANEL: Color = Color::Rgb(38, 40, 64);
pub const C_MUTED: Color = Color::Rgb(136, 140, 170);
pub const C_TEXT: Color = Color::Rgb(228, 230, 244);
pub const C_PRIMARY: Color = Color::Rgb(150, 140, 255);
pub const C_SUCCESS: Color = Color::Rgb(112, 220, 142);
pub const C_WARNING: Color = Color::Rgb(255, 196, 100);
/// Background of the highlighted catalog row.
pub const C_HIGHLIGHT: Color = Color::Rgb(44, 42, 86);
