pub mod device;
mod error;
pub mod hello;
pub mod server;

pub use device::{Device, DeviceType, MAX_DEVICE_PATH, ReadMetrics, Reopened};
pub use error::{DeviceError, HelloError, ServerError, USAGE_ERROR_CODE};
