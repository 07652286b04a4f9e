use crate::traits::led::Led;
use embedded_hal::digital::OutputPin;

pub struct GpioLed<P>
where
    P: OutputPin,
{
    pin: P,
    state: bool,
}

impl<P> GpioLed<P>
where
    P: OutputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin, state: false }
    }

    fn set(&mut self, state: bool) -> Result<(), P::Error> {
        match state {
            true => self.pin.set_high(),
            false => self.pin.set_low(),
        }?;
        self.state = state;
        Ok(())
    }
}

impl<P> Led for GpioLed<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn state(&self) -> bool {
        self.state
    }
}

impl<P> From<P> for GpioLed<P>
where
    P: OutputPin,
{
    fn from(pin: P) -> Self {
        Self::new(pin)
    }
}
