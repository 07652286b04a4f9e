pub trait Led {
    type Error: core::fmt::Debug;
    fn on(&mut self) -> Result<(), Self::Error>;
    fn off(&mut self) -> Result<(), Self::Error>;
    fn state(&self) -> bool;
}

impl<T: Led + ?Sized> Led for &mut T {
    type Error = T::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        T::on(self)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        T::off(self)
    }

    fn state(&self) -> bool {
        T::state(self)
    }
}
