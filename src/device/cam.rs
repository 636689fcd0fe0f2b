//! FreeBSD backend: devices reached through the CAM transport layer.
//!
//! Open and classification go through libcam; positioned reads use the file
//! descriptor embedded in the CAM device handle. The declarations below
//! mirror the parts of `<camlib.h>` and `<cam/cam_ccb.h>` this backend
//! touches; the rest of the CCB union is never read or written.

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};

use rustix::fd::BorrowedFd;
use rustix::fs::SeekFrom;

use crate::device::classify::{DeviceType, classify_cam_protocol};
use crate::error::DeviceError;

const MAXPATHLEN: usize = 1024;
const DEV_IDLEN: usize = 15;
const SIM_IDLEN: usize = 15;

/// `XPT_GDEV_TYPE` function code: get device type information.
const XPT_GDEV_TYPE: u32 = 0x02;

/// Mirror of `struct cam_device`. Only `fd` is read from Rust, but the
/// preceding fields must keep their native sizes for its offset to hold.
#[repr(C)]
#[allow(dead_code)]
struct CamDevice {
    device_path: [c_char; MAXPATHLEN],
    given_dev_name: [c_char; DEV_IDLEN + 1],
    given_unit_number: u32,
    device_name: [c_char; DEV_IDLEN + 1],
    dev_unit_num: u32,
    sim_name: [c_char; SIM_IDLEN + 1],
    sim_unit_number: u32,
    bus_id: u32,
    target_lun: u64,
    target_id: u32,
    path_id: u32,
    pd_type: u16,
    inq_data: [u8; 256],
    serial_num: [u8; 252],
    serial_num_len: u8,
    sync_period: u8,
    bus_width: u8,
    fd: c_int,
}

#[repr(C)]
#[allow(dead_code)]
struct CamPinfo {
    priority: u32,
    generation: u32,
    index: c_int,
}

/// Queue linkage union; two pointers on every supported ABI.
#[repr(C)]
#[allow(dead_code)]
struct CamqEntry {
    next: *mut c_void,
    prev: *mut c_void,
}

#[repr(C)]
#[allow(dead_code)]
struct CcbQosArea {
    etime: u64,
    sim_data: usize,
    periph_data: usize,
}

/// Mirror of `struct ccb_hdr`.
#[repr(C)]
#[allow(dead_code)]
struct CcbHdr {
    pinfo: CamPinfo,
    xpt_links: CamqEntry,
    sim_links: CamqEntry,
    periph_links: CamqEntry,
    retry_count: u32,
    cbfcnp: *mut c_void,
    func_code: u32,
    status: u32,
    path: *mut c_void,
    path_id: u32,
    target_id: u32,
    target_lun: u64,
    flags: u32,
    xflags: u32,
    periph_priv: [*mut c_void; 2],
    sim_priv: [*mut c_void; 2],
    qos: CcbQosArea,
    timeout: u32,
    softtimeout: libc::timeval,
}

/// The `cgd` arm of `union ccb`: header plus the reported protocol. The
/// inquiry and identify payloads that follow are left untouched, so only the
/// leading fields are declared.
#[repr(C)]
#[allow(dead_code)]
struct CcbGetdev {
    ccb_h: CcbHdr,
    protocol: u32,
}

unsafe extern "C" {
    fn cam_open_device(path: *const c_char, flags: c_int) -> *mut CamDevice;
    fn cam_close_device(dev: *mut CamDevice);
    fn cam_getccb(dev: *mut CamDevice) -> *mut CcbGetdev;
    fn cam_send_ccb(dev: *mut CamDevice, ccb: *mut CcbGetdev) -> c_int;
    fn cam_freeccb(ccb: *mut CcbGetdev);
}

#[derive(Debug)]
pub(crate) struct Backend {
    dev: *mut CamDevice,
}

// The handle is exclusively owned and never aliased.
unsafe impl Send for Backend {}

impl Backend {
    pub(crate) fn open(path: &str) -> Result<Self, DeviceError> {
        let c_path = CString::new(path).map_err(|_| DeviceError::Os(libc::EINVAL))?;

        let dev = unsafe { cam_open_device(c_path.as_ptr(), libc::O_RDWR) };
        if dev.is_null() {
            return Err(last_os_error());
        }

        Ok(Self { dev })
    }

    pub(crate) fn device_type(&self) -> DeviceType {
        let ccb = unsafe { cam_getccb(self.dev) };
        if ccb.is_null() {
            return DeviceType::Unknown;
        }

        let device_type = unsafe {
            (*ccb).ccb_h.func_code = XPT_GDEV_TYPE;

            if cam_send_ccb(self.dev, ccb) < 0 {
                DeviceType::Unknown
            } else {
                classify_cam_protocol((*ccb).protocol)
            }
        };

        unsafe { cam_freeccb(ccb) };

        device_type
    }

    pub(crate) fn read_at(&mut self, buffer: &mut [u8], offset: u64) -> Result<(), DeviceError> {
        let fd = unsafe { BorrowedFd::borrow_raw((*self.dev).fd) };

        rustix::fs::seek(fd, SeekFrom::Start(offset))
            .map_err(|e| DeviceError::Os(e.raw_os_error()))?;
        rustix::io::read(fd, buffer).map_err(|e| DeviceError::Os(e.raw_os_error()))?;

        Ok(())
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        unsafe { cam_close_device(self.dev) };
    }
}

fn last_os_error() -> DeviceError {
    DeviceError::Os(
        std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(libc::EIO),
    )
}
