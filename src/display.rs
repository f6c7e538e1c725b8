use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use embedded_graphics::{
    pixelcolor::{Rgb565, Rgb888},
    prelude::*,
};
use u8g2_fonts::{
    fonts,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
    FontRenderer,
};

use crate::{
    clock::{self, DateStyle},
    config::{ClockConfig, ColorConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub time: Rgb565,
    pub date: Rgb565,
    pub label: Rgb565,
}

impl Palette {
    pub fn from_colors(colors: &ColorConfig) -> Self {
        Self {
            background: parse_color(&colors.background, Rgb565::BLACK),
            time: parse_color(&colors.time, Rgb565::new(31, 35, 0)),
            date: parse_color(&colors.date, Rgb565::new(19, 40, 20)),
            label: parse_color(&colors.label, Rgb565::new(19, 40, 20)),
        }
    }
}

fn parse_color(input: &str, fallback: Rgb565) -> Rgb565 {
    let trimmed = input.trim();
    let hex = trimmed.trim_start_matches('#');
    if hex.len() == 6 {
        if let Ok(value) = u32::from_str_radix(hex, 16) {
            let r = ((value >> 16) & 0xFF) as u8;
            let g = ((value >> 8) & 0xFF) as u8;
            let b = (value & 0xFF) as u8;
            return Rgb565::from(Rgb888::new(r, g, b));
        }
    }
    fallback
}

/// One rendered frame of the clock. The date string may hold two lines for
/// the weekday styles; an empty date hides the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFrame {
    pub label: Option<String>,
    pub time: String,
    pub date: String,
}

impl ClockFrame {
    pub fn compose(config: &ClockConfig, style: DateStyle, now: NaiveDateTime) -> Self {
        let label = if config.label.show && !config.label.text.trim().is_empty() {
            Some(config.label.text.clone())
        } else {
            None
        };
        Self {
            label,
            time: clock::format_time(now.time(), config.format.clock_24hr),
            date: clock::format_date(now.date(), style),
        }
    }

    pub fn date_lines(&self) -> usize {
        if self.date.is_empty() {
            0
        } else {
            self.date.lines().count()
        }
    }
}

/// Row heights for the centered column of label, time and date. The font
/// sizes are fixed, so only the vertical placement depends on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockLayout {
    pub width_px: u32,
    pub height_px: u32,
    pub label_row_px: u32,
    pub time_row_px: u32,
    pub date_row_px: u32,
    pub row_gap_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    pub label_y: Option<i32>,
    pub time_y: i32,
    pub date_ys: Vec<i32>,
}

impl ClockLayout {
    pub fn from_dimensions(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            label_row_px: 22,
            time_row_px: 54,
            date_row_px: 24,
            row_gap_px: 10,
        }
    }

    pub fn center_x(&self) -> i32 {
        (self.width_px / 2) as i32
    }

    /// Stacks the visible rows and centers the stack vertically. Row values
    /// are the center y of each row, top to bottom.
    pub fn rows(&self, show_label: bool, date_lines: usize) -> RowPlan {
        let mut rows = 1u32 + date_lines as u32;
        let mut total = self.time_row_px + self.date_row_px * date_lines as u32;
        if show_label {
            rows += 1;
            total += self.label_row_px;
        }
        total += self.row_gap_px * rows.saturating_sub(1);

        let gap = self.row_gap_px as i32;
        let mut cursor = (self.height_px.saturating_sub(total) / 2) as i32;

        let label_y = if show_label {
            let y = cursor + (self.label_row_px / 2) as i32;
            cursor += self.label_row_px as i32 + gap;
            Some(y)
        } else {
            None
        };

        let time_y = cursor + (self.time_row_px / 2) as i32;
        cursor += self.time_row_px as i32 + gap;

        let mut date_ys = Vec::with_capacity(date_lines);
        for _ in 0..date_lines {
            date_ys.push(cursor + (self.date_row_px / 2) as i32);
            cursor += self.date_row_px as i32 + gap;
        }

        RowPlan {
            label_y,
            time_y,
            date_ys,
        }
    }
}

/// Clears the surface and draws one frame. Works against any Rgb565 target
/// so the framebuffer and the simulator window share the same path.
pub fn draw_frame<D>(
    target: &mut D,
    layout: &ClockLayout,
    palette: &Palette,
    frame: &ClockFrame,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    target
        .clear(palette.background)
        .map_err(|err| anyhow!("clearing frame: {err:?}"))?;

    let plan = layout.rows(frame.label.is_some(), frame.date_lines());
    let center_x = layout.center_x();

    if let (Some(text), Some(y)) = (frame.label.as_deref(), plan.label_y) {
        let font = FontRenderer::new::<fonts::u8g2_font_logisoso16_tf>();
        font.render_aligned(
            text,
            Point::new(center_x, y),
            VerticalPosition::Center,
            HorizontalAlignment::Center,
            FontColor::Transparent(palette.label),
            target,
        )
        .map_err(|err| anyhow!("drawing label: {err:?}"))?;
    }

    let font = FontRenderer::new::<fonts::u8g2_font_logisoso42_tf>();
    font.render_aligned(
        frame.time.as_str(),
        Point::new(center_x, plan.time_y),
        VerticalPosition::Center,
        HorizontalAlignment::Center,
        FontColor::Transparent(palette.time),
        target,
    )
    .map_err(|err| anyhow!("drawing time: {err:?}"))?;

    if !frame.date.is_empty() {
        let font = FontRenderer::new::<fonts::u8g2_font_logisoso18_tf>();
        for (line, y) in frame.date.lines().zip(plan.date_ys.iter()) {
            font.render_aligned(
                line,
                Point::new(center_x, *y),
                VerticalPosition::Center,
                HorizontalAlignment::Center,
                FontColor::Transparent(palette.date),
                target,
            )
            .map_err(|err| anyhow!("drawing date: {err:?}"))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn colors_parse_with_and_without_hash() {
        let orange = Rgb565::from(Rgb888::new(0xff, 0x8c, 0x00));
        assert_eq!(parse_color("#ff8c00", Rgb565::BLACK), orange);
        assert_eq!(parse_color("ff8c00", Rgb565::BLACK), orange);
        assert_eq!(parse_color("  #ff8c00 ", Rgb565::BLACK), orange);
    }

    #[test]
    fn malformed_colors_fall_back() {
        assert_eq!(parse_color("", Rgb565::WHITE), Rgb565::WHITE);
        assert_eq!(parse_color("#12345", Rgb565::WHITE), Rgb565::WHITE);
        assert_eq!(parse_color("#gggggg", Rgb565::WHITE), Rgb565::WHITE);
        assert_eq!(parse_color("orange", Rgb565::WHITE), Rgb565::WHITE);
    }

    #[test]
    fn palette_defaults_follow_the_color_config() {
        let palette = Palette::from_colors(&ColorConfig::default());
        assert_eq!(palette.background, Rgb565::BLACK);
        assert_eq!(palette.time, Rgb565::from(Rgb888::new(0xff, 0x8c, 0x00)));
        assert_eq!(palette.date, Rgb565::from(Rgb888::new(0x9a, 0xa0, 0xa6)));
        assert_eq!(palette.label, palette.date);
    }

    #[test]
    fn full_column_is_centered() {
        let layout = ClockLayout::from_dimensions(320, 240);
        let plan = layout.rows(true, 2);

        let top = plan.label_y.unwrap() - (layout.label_row_px / 2) as i32;
        let bottom = plan.date_ys[1] + (layout.date_row_px / 2) as i32;
        assert!(top >= 0);
        assert!(bottom <= 240);

        let mid = (top + bottom) / 2;
        assert!((mid - 120).abs() <= 1, "column midpoint {mid}");
    }

    #[test]
    fn lone_time_row_sits_at_dead_center() {
        for (w, h) in [(320u32, 240u32), (480, 320)] {
            let layout = ClockLayout::from_dimensions(w, h);
            let plan = layout.rows(false, 0);
            assert_eq!(plan.time_y, (h / 2) as i32);
            assert_eq!(plan.label_y, None);
            assert!(plan.date_ys.is_empty());
        }
    }

    #[test]
    fn rows_stack_top_to_bottom() {
        let layout = ClockLayout::from_dimensions(320, 240);
        let plan = layout.rows(true, 2);
        let label_y = plan.label_y.unwrap();
        assert!(label_y < plan.time_y);
        assert!(plan.time_y < plan.date_ys[0]);
        assert!(plan.date_ys[0] < plan.date_ys[1]);
    }

    #[test]
    fn column_fits_common_panels() {
        for (w, h) in [(320u32, 240u32), (480, 320)] {
            let layout = ClockLayout::from_dimensions(w, h);
            for (label, lines) in [(true, 2), (true, 1), (false, 2), (false, 0)] {
                let plan = layout.rows(label, lines);
                if let Some(y) = plan.label_y {
                    assert!(y - (layout.label_row_px / 2) as i32 >= 0);
                }
                let bottom = match plan.date_ys.last() {
                    Some(y) => y + (layout.date_row_px / 2) as i32,
                    None => plan.time_y + (layout.time_row_px / 2) as i32,
                };
                assert!(bottom <= h as i32, "{w}x{h} overflows");
            }
        }
    }

    #[test]
    fn compose_honors_label_visibility() {
        let now = NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(22, 8, 24)
            .unwrap();

        let mut config = ClockConfig::default();
        let frame = ClockFrame::compose(&config, DateStyle::WeekdayMdy, now);
        assert_eq!(frame.label.as_deref(), Some("BOTSERVER-HK"));
        assert_eq!(frame.time, "10:08:24 PM");
        assert_eq!(frame.date, "Thursday\n02-19-2026");
        assert_eq!(frame.date_lines(), 2);

        config.label.show = false;
        let frame = ClockFrame::compose(&config, DateStyle::None, now);
        assert_eq!(frame.label, None);
        assert_eq!(frame.date_lines(), 0);
    }

    #[test]
    fn compose_hides_blank_labels() {
        let now = NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let mut config = ClockConfig::default();
        config.label.text = "   ".to_string();
        let frame = ClockFrame::compose(&config, DateStyle::Iso, now);
        assert_eq!(frame.label, None);
    }
}
