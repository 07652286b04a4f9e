/// Discards all process state and starts over.
///
/// On hardware this never returns. Host builds and tests may return, in which
/// case the caller rebuilds the pipeline from scratch.
pub trait Reset {
    fn reset(&mut self);
}

impl<T: Reset + ?Sized> Reset for &mut T {
    fn reset(&mut self) {
        T::reset(self)
    }
}

/// Requests a system reset through the Cortex-M SCB.
#[cfg(feature = "cortex-m")]
pub struct SystemReset;

#[cfg(feature = "cortex-m")]
impl Reset for SystemReset {
    fn reset(&mut self) {
        cortex_m::peripheral::SCB::sys_reset()
    }
}
