//! Best-effort status rendering on a small text display.

use crate::fmt::Dbg;
use crate::time::sleep;
use crate::traits::display::{StatusSink, TextDisplay};
use core::fmt::{Display, Write};
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use heapless::String;

/// Characters per row with an 8 px font on a 128 px wide panel.
pub const COLUMNS: usize = 16;
/// Rows with an 8 px font on a 64 px tall panel.
pub const ROWS: usize = 8;
const ROW_HEIGHT: u8 = 8;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusError<E> {
    /// The status text does not fit on the panel.
    Format,
    Render(E),
}

impl<E> From<E> for StatusError<E> {
    fn from(e: E) -> StatusError<E> {
        StatusError::Render(e)
    }
}

/// Clears the panel, draws a status value, commits it and then holds it on
/// screen for a fixed pacing delay.
pub struct StatusDisplay<T, D>
where
    T: TextDisplay,
    D: DelayNs,
{
    display: T,
    delay: D,
    pacing: Duration,
}

impl<T, D> StatusDisplay<T, D>
where
    T: TextDisplay,
    D: DelayNs,
{
    pub fn new(display: T, delay: D, pacing: Duration) -> Self {
        Self {
            display,
            delay,
            pacing,
        }
    }

    pub fn release(self) -> (T, D) {
        (self.display, self.delay)
    }

    async fn render(&mut self, text: &str) -> Result<(), StatusError<T::Error>> {
        self.display.clear().await?;
        let mut y = 0;
        for row in Rows::new(text).take(ROWS) {
            self.display.text(row, 0, y).await?;
            y += ROW_HEIGHT;
        }
        self.display.flush().await?;
        Ok(())
    }
}

impl<T, D> StatusSink for StatusDisplay<T, D>
where
    T: TextDisplay,
    D: DelayNs,
{
    type Error = StatusError<T::Error>;

    async fn show<V: Display>(&mut self, status: V) -> Result<(), Self::Error> {
        let mut text: String<{ COLUMNS * ROWS }> = String::new();
        write!(text, "{}", status).map_err(|_| StatusError::Format)?;

        let result = self.render(&text).await;
        if let Err(e) = &result {
            debug!("status not displayed: {:?}", Dbg(e));
        }
        sleep(&mut self.delay, self.pacing).await;
        result
    }
}

/// Splits text into display rows at line breaks and at the column limit.
struct Rows<'a> {
    remaining: &'a str,
}

impl<'a> Rows<'a> {
    fn new(text: &'a str) -> Self {
        Self { remaining: text }
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let line_end = self.remaining.find('\n').unwrap_or(self.remaining.len());
        let split = self
            .remaining
            .char_indices()
            .nth(COLUMNS)
            .map(|(i, _)| i)
            .filter(|i| *i < line_end)
            .unwrap_or(line_end);

        let row = &self.remaining[..split];
        self.remaining = &self.remaining[split..];
        if split == line_end && !self.remaining.is_empty() {
            // drop the line break itself
            self.remaining = &self.remaining[1..];
        }
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn rows(text: &str) -> Vec<&str> {
        Rows::new(text).collect()
    }

    #[test]
    fn short_text_is_one_row() {
        assert_eq!(std::vec!["publish"], rows("publish"));
    }

    #[test]
    fn long_text_wraps_at_column_limit() {
        assert_eq!(
            std::vec!["0123456789abcdef", "ghij"],
            rows("0123456789abcdefghij")
        );
    }

    #[test]
    fn line_breaks_start_new_rows() {
        assert_eq!(std::vec!["link", "up"], rows("link\nup"));
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(rows("").is_empty());
    }
}
