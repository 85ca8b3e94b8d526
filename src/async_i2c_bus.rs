//! One I2C bus, several async devices
//!
//! The sensor and the display sit on the same two wires. Each driver owns a
//! [`SharedI2c`] handle; every transaction takes the bus lock for its whole
//! duration so the sensor's write/read pairs never interleave with a display
//! flush.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

/// Handle to a bus shared through an `embassy-sync` async mutex.
///
/// ```
/// use core::convert::Infallible;
///
/// use co2_sparkline::async_i2c_bus::SharedI2c;
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
/// use embassy_sync::mutex::Mutex;
/// use embedded_hal_async::i2c::{ErrorType, I2c, Operation};
///
/// struct Bus;
///
/// impl ErrorType for Bus {
///     type Error = Infallible;
/// }
///
/// impl I2c for Bus {
///     async fn transaction(
///         &mut self,
///         _address: u8,
///         _operations: &mut [Operation<'_>],
///     ) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
///
/// let bus = Mutex::<NoopRawMutex, _>::new(Bus);
/// let mut sensor = SharedI2c::new(&bus);
/// let mut display = sensor.clone();
///
/// embassy_futures::block_on(async {
///     sensor.write(0x61, &[0x01, 0x04]).await.unwrap();
///     display.write(0x3C, &[0x00, 0xAF]).await.unwrap();
/// });
/// ```
///
/// On the target the bus lives in a `StaticCell` with a
/// `CriticalSectionRawMutex`, see the firmware's `hardware` module.
pub struct SharedI2c<'a, M: RawMutex, T> {
    bus: &'a Mutex<M, T>,
}

impl<'a, M: RawMutex, T> SharedI2c<'a, M, T> {
    pub const fn new(bus: &'a Mutex<M, T>) -> Self {
        Self { bus }
    }
}

impl<M: RawMutex, T> Clone for SharedI2c<'_, M, T> {
    fn clone(&self) -> Self {
        Self { bus: self.bus }
    }
}

impl<M: RawMutex, T: ErrorType> ErrorType for SharedI2c<'_, M, T> {
    type Error = T::Error;
}

impl<M: RawMutex, T: I2c> I2c for SharedI2c<'_, M, T> {
    #[inline]
    async fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.lock().await.read(address, read).await
    }

    #[inline]
    async fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        self.bus.lock().await.write(address, write).await
    }

    #[inline]
    async fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus.lock().await.write_read(address, write, read).await
    }

    #[inline]
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.bus.lock().await.transaction(address, operations).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    /// Bus that records which address each transaction went to
    #[derive(Default)]
    struct RecordingBus {
        addresses: Vec<u8>,
    }

    impl ErrorType for RecordingBus {
        type Error = Infallible;
    }

    impl I2c for RecordingBus {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter_mut() {
                if let Operation::Read(buf) = op {
                    buf.fill(address);
                }
            }
            self.addresses.push(address);
            Ok(())
        }
    }

    #[test]
    fn test_devices_share_one_bus() {
        let bus = Mutex::<NoopRawMutex, _>::new(RecordingBus::default());
        let mut sensor = SharedI2c::new(&bus);
        let mut display = sensor.clone();

        block_on(async {
            sensor.write(0x61, &[0x02, 0x02]).await.unwrap();
            display.write(0x3C, &[0x00]).await.unwrap();

            let mut buf = [0u8; 2];
            sensor.write_read(0x61, &[0x03, 0x00], &mut buf).await.unwrap();
            assert_eq!(buf, [0x61, 0x61]);
        });

        assert_eq!(block_on(bus.lock()).addresses, [0x61, 0x3C, 0x61]);
    }
}
