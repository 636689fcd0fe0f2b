//! Windows backend: raw handles through the Win32 storage stack.

use std::ffi::c_void;
use std::iter::once;
use std::mem;
use std::ptr;

use windows_sys::Win32::Foundation::{
    CloseHandle, GENERIC_READ, GENERIC_WRITE, GetLastError, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_BEGIN, FILE_SHARE_READ, FILE_SHARE_WRITE,
    OPEN_EXISTING, ReadFile, SetFilePointerEx,
};
use windows_sys::Win32::System::IO::DeviceIoControl;
use windows_sys::Win32::System::Ioctl::{
    IOCTL_STORAGE_QUERY_PROPERTY, PropertyStandardQuery, STORAGE_DEVICE_DESCRIPTOR,
    STORAGE_PROPERTY_QUERY, StorageDeviceProperty,
};

use crate::device::classify::{DeviceType, classify_storage_bus};
use crate::error::DeviceError;

/// Scratch space for the storage-property response. The descriptor has a
/// variable-length tail; only the fixed prefix is decoded.
const PROPERTY_SCRATCH_LEN: usize = 1024;

#[derive(Debug)]
pub(crate) struct Backend {
    handle: HANDLE,
}

// The handle is exclusively owned and never aliased.
unsafe impl Send for Backend {}

impl Backend {
    pub(crate) fn open(path: &str) -> Result<Self, DeviceError> {
        let wide: Vec<u16> = path.encode_utf16().chain(once(0)).collect();

        // The device must already exist; OPEN_EXISTING never creates one.
        let handle = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                ptr::null(),
                OPEN_EXISTING,
                FILE_ATTRIBUTE_NORMAL,
                ptr::null_mut(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            return Err(last_os_error());
        }

        Ok(Self { handle })
    }

    pub(crate) fn device_type(&self) -> DeviceType {
        let mut query: STORAGE_PROPERTY_QUERY = unsafe { mem::zeroed() };
        query.PropertyId = StorageDeviceProperty;
        query.QueryType = PropertyStandardQuery;

        let mut scratch = [0u8; PROPERTY_SCRATCH_LEN];
        let mut returned = 0u32;

        let ok = unsafe {
            DeviceIoControl(
                self.handle,
                IOCTL_STORAGE_QUERY_PROPERTY,
                &query as *const STORAGE_PROPERTY_QUERY as *const c_void,
                mem::size_of::<STORAGE_PROPERTY_QUERY>() as u32,
                scratch.as_mut_ptr() as *mut c_void,
                PROPERTY_SCRATCH_LEN as u32,
                &mut returned,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return DeviceType::Unknown;
        }

        let descriptor = scratch.as_ptr() as *const STORAGE_DEVICE_DESCRIPTOR;
        classify_storage_bus(unsafe { (*descriptor).BusType } as u32)
    }

    pub(crate) fn read_at(&mut self, buffer: &mut [u8], offset: u64) -> Result<(), DeviceError> {
        let ok = unsafe {
            SetFilePointerEx(self.handle, offset as i64, ptr::null_mut(), FILE_BEGIN)
        };
        if ok == 0 {
            return Err(last_os_error());
        }

        let mut bytes_read = 0u32;
        let ok = unsafe {
            ReadFile(
                self.handle,
                buffer.as_mut_ptr(),
                buffer.len() as u32,
                &mut bytes_read,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(last_os_error());
        }

        Ok(())
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.handle) };
    }
}

fn last_os_error() -> DeviceError {
    DeviceError::Os(unsafe { GetLastError() } as i32)
}
