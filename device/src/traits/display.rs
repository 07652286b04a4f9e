use core::fmt::Display;

/// Minimal text surface of a monochrome display.
///
/// Drawing goes to a frame buffer; nothing is visible until `flush`.
#[allow(async_fn_in_trait)]
pub trait TextDisplay {
    type Error: core::fmt::Debug;

    /// Blanks the whole frame buffer.
    async fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draws `text` with its top-left corner at pixel (`x`, `y`).
    async fn text(&mut self, text: &str, x: u8, y: u8) -> Result<(), Self::Error>;

    /// Pushes the frame buffer to the panel.
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    type Error = T::Error;

    async fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self).await
    }

    async fn text(&mut self, text: &str, x: u8, y: u8) -> Result<(), Self::Error> {
        T::text(self, text, x, y).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self).await
    }
}

/// Best-effort status output.
///
/// A failed refresh is returned to the caller but must never stop telemetry.
#[allow(async_fn_in_trait)]
pub trait StatusSink {
    type Error: core::fmt::Debug;

    async fn show<V: Display>(&mut self, status: V) -> Result<(), Self::Error>;
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    type Error = T::Error;

    async fn show<V: Display>(&mut self, status: V) -> Result<(), Self::Error> {
        T::show(self, status).await
    }
}
