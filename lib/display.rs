use core::fmt::Write;
use embedded_graphics::fonts::{Font6x8, Text};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{Drawable, Point, Primitive};
use embedded_graphics::primitives::Line;
use embedded_graphics::style::{PrimitiveStyle, TextStyle};
use heapless::String;

use crate::config::{LCD_HEIGHT, LCD_WIDTH};
use crate::error::{Error, Result};
use crate::state::ModeState;

/// Seam to the LCD driver; the concrete panel lives in `hw`.
pub trait Lcd {
    type Error;
    fn clear(&mut self, color: Rgb565) -> core::result::Result<(), Self::Error>;
    fn draw<D: Drawable<Rgb565>>(&mut self, drawable: D)
        -> core::result::Result<(), Self::Error>;
}

/// Display consumer: redraws the grid, the processed trace and the mode
/// labels every refresh.
pub struct Display<LCD, LCDER>
where
    LCD: Lcd<Error = LCDER>,
{
    lcd: LCD,
}

impl<LCD, LCDER> Display<LCD, LCDER>
where
    LCD: Lcd<Error = LCDER>,
{
    pub fn new(lcd: LCD) -> Result<Self, LCDER> {
        let mut display = Display { lcd };
        display.lcd.clear(Color::BACKGROUND).map_err(Error::Lcd)?;
        Ok(display)
    }

    pub fn refresh(
        &mut self,
        pixels: &[i16; LCD_WIDTH],
        mode: &ModeState,
        load_percent: u32,
    ) -> Result<(), LCDER> {
        self.lcd.clear(Color::BACKGROUND).map_err(Error::Lcd)?;
        self.draw_grid(mode.spectrum_mode)?;
        self.draw_trace(pixels)?;
        self.draw_labels(mode, load_percent)?;
        Ok(())
    }

    fn draw_grid(&mut self, spectrum_mode: bool) -> Result<(), LCDER> {
        let style = PrimitiveStyle::with_stroke(Color::GRID, 1);
        let mut i = 1;
        while i < LCD_WIDTH as i32 {
            let vertical = Line::new(at(i, 0), at(i, LCD_HEIGHT as i32)).into_styled(style);
            self.lcd.draw(&vertical).map_err(Error::Lcd)?;
            let horizontal = Line::new(at(0, i), at(LCD_WIDTH as i32, i)).into_styled(style);
            self.lcd.draw(&horizontal).map_err(Error::Lcd)?;
            i += Layout::GRID_STEP;
        }

        let style = PrimitiveStyle::with_stroke(Color::CENTER, 1);
        if spectrum_mode {
            let baseline = Line::new(
                at(0, Layout::BASELINE_ROW),
                at(LCD_WIDTH as i32, Layout::BASELINE_ROW),
            )
            .into_styled(style);
            self.lcd.draw(&baseline).map_err(Error::Lcd)?;
        } else {
            let center = (LCD_WIDTH / 2) as i32;
            let vertical =
                Line::new(at(center, 0), at(center, LCD_HEIGHT as i32)).into_styled(style);
            self.lcd.draw(&vertical).map_err(Error::Lcd)?;
            let horizontal =
                Line::new(at(0, center), at(LCD_WIDTH as i32, center)).into_styled(style);
            self.lcd.draw(&horizontal).map_err(Error::Lcd)?;
        }
        Ok(())
    }

    fn draw_trace(&mut self, pixels: &[i16; LCD_WIDTH]) -> Result<(), LCDER> {
        let style = PrimitiveStyle::with_stroke(Color::TRACE, 1);
        for x in 1..LCD_WIDTH {
            let from = at(x as i32 - 1, clamp_row(pixels[x - 1]));
            let to = at(x as i32, clamp_row(pixels[x]));
            self.lcd
                .draw(&Line::new(from, to).into_styled(style))
                .map_err(Error::Lcd)?;
        }
        Ok(())
    }

    fn draw_labels(&mut self, mode: &ModeState, load_percent: u32) -> Result<(), LCDER> {
        self.draw_text(mode.time_label(), at(Layout::TIME_X, Layout::LABEL_Y))?;
        self.draw_text(mode.scale_label(), at(Layout::SCALE_X, Layout::LABEL_Y))?;
        if let Some(slope) = mode.slope_label() {
            self.draw_text(slope, at(Layout::SLOPE_X, Layout::LABEL_Y))?;
        }

        let mut buffer = String::<16>::new();
        write!(&mut buffer, "CPU {}%", load_percent).map_err(|_| Error::BufferWrite)?;
        self.draw_text(&buffer, at(Layout::TIME_X, Layout::LOAD_Y))?;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Point) -> Result<(), LCDER> {
        let styled = Text::new(text, position).into_styled(TextStyle::new(Font6x8, Color::TEXT));
        self.lcd.draw(&styled).map_err(Error::Lcd)
    }
}

fn at(x: i32, y: i32) -> Point {
    Point::new(Layout::ORIGIN_X + x, Layout::ORIGIN_Y + y)
}

fn clamp_row(pixel: i16) -> i32 {
    pixel.max(0).min(LCD_HEIGHT as i16 - 1) as i32
}

struct Layout;

impl Layout {
    // scope area offset inside the panel
    const ORIGIN_X: i32 = 10;
    const ORIGIN_Y: i32 = 10;

    const GRID_STEP: i32 = 21;
    // 0 dB reference row in spectrum mode
    const BASELINE_ROW: i32 = 22;

    const LABEL_Y: i32 = 5;
    const LOAD_Y: i32 = LCD_HEIGHT as i32 - 10;
    const TIME_X: i32 = 7;
    const SCALE_X: i32 = LCD_WIDTH as i32 / 2 - 20;
    const SLOPE_X: i32 = LCD_WIDTH as i32 / 2 + 20;
}

struct Color;

impl Color {
    const BACKGROUND: Rgb565 = Rgb565::BLACK;
    const GRID: Rgb565 = Rgb565::BLUE;
    const CENTER: Rgb565 = Rgb565::new(0, 0, 12);
    const TRACE: Rgb565 = Rgb565::YELLOW;
    const TEXT: Rgb565 = Rgb565::WHITE;
}
