//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::error::{Error, Result};
use crate::report::{self, Report, REPORT_LEN};
use tracing::trace;

/// Abstraction over raw HID report I/O.
pub trait HidTransport {
    /// Write an output report (byte 0 is the report ID).
    fn write_report(&self, data: &[u8]) -> Result<usize>;

    /// Send a feature report (byte 0 is the report ID).
    fn send_feature_report(&self, data: &[u8]) -> Result<()>;

    /// Read an input report, waiting at most `timeout_ms`.
    ///
    /// Returns the number of bytes read; 0 means the timeout elapsed.
    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}

impl HidTransport for hidapi::HidDevice {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        trace!(report_hex = format_args!("{:02X?}", data), "HID output TX");
        self.write(data)
            .map_err(|e| Error::TransportWrite(e.to_string()))
    }

    fn send_feature_report(&self, data: &[u8]) -> Result<()> {
        trace!(report_hex = format_args!("{:02X?}", data), "HID feature TX");
        hidapi::HidDevice::send_feature_report(self, data)
            .map_err(|e| Error::TransportWrite(e.to_string()))
    }

    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        let n = self
            .read_timeout(buf, timeout_ms)
            .map_err(|e| Error::TransportRead(e.to_string()))?;
        trace!(report_hex = format_args!("{:02X?}", &buf[..n]), "HID RX");
        Ok(n)
    }
}

/// Response timeout for register reads.
pub const REGISTER_READ_TIMEOUT_MS: i32 = 20;

/// Wait for one response to operation `op` and check its header.
///
/// A read that times out becomes `Error::Timeout`, naming `what`.
pub fn read_response(
    transport: &dyn HidTransport,
    op: u8,
    timeout_ms: i32,
    what: &str,
) -> Result<Report> {
    let mut buf = [0u8; 64];
    let n = transport.read_report(&mut buf, timeout_ms)?;
    if n == 0 {
        return Err(Error::Timeout(format!(
            "no {what} response after {timeout_ms}ms"
        )));
    }
    report::check_response(&buf[..n], op)?;

    let mut response = [0u8; REPORT_LEN];
    response.copy_from_slice(&buf[..REPORT_LEN]);
    Ok(response)
}

/// Mock transport and host for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::device::{HidHost, InterfaceInfo};
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    /// How a report reached the device.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ReportKind {
        Output,
        Feature,
    }

    /// Mock transport that records writes and replays queued input reports.
    pub struct MockTransport {
        written: Mutex<Vec<(ReportKind, Vec<u8>)>>,
        responses: Mutex<VecDeque<Vec<u8>>>,
        write_error: Mutex<Option<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                written: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
                write_error: Mutex::new(None),
            }
        }

        /// Make every subsequent write fail with `msg`.
        pub fn fail_writes(&self, msg: &str) {
            *self.write_error.lock().unwrap() = Some(msg.to_string());
        }

        /// Queue an input report for the next read.
        pub fn push_response(&self, data: Vec<u8>) {
            self.responses.lock().unwrap().push_back(data);
        }

        /// Every report written so far, in order.
        pub fn written(&self) -> Vec<(ReportKind, Vec<u8>)> {
            self.written.lock().unwrap().clone()
        }

        fn record(&self, kind: ReportKind, data: &[u8]) -> Result<()> {
            if let Some(msg) = self.write_error.lock().unwrap().as_ref() {
                return Err(Error::TransportWrite(msg.clone()));
            }
            self.written.lock().unwrap().push((kind, data.to_vec()));
            Ok(())
        }
    }

    impl HidTransport for MockTransport {
        fn write_report(&self, data: &[u8]) -> Result<usize> {
            self.record(ReportKind::Output, data)?;
            Ok(data.len())
        }

        fn send_feature_report(&self, data: &[u8]) -> Result<()> {
            self.record(ReportKind::Feature, data)
        }

        fn read_report(&self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
            match self.responses.lock().unwrap().pop_front() {
                Some(resp) => {
                    let n = resp.len().min(buf.len());
                    buf[..n].copy_from_slice(&resp[..n]);
                    Ok(n)
                }
                None => Ok(0),
            }
        }
    }

    /// Mock HID host with a fixed enumeration list.
    pub struct MockHost {
        pub interfaces: Vec<InterfaceInfo>,
        /// Paths whose open attempt fails.
        pub unopenable: HashSet<String>,
        opened: Mutex<Vec<String>>,
    }

    impl MockHost {
        pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
            Self {
                interfaces,
                unopenable: HashSet::new(),
                opened: Mutex::new(Vec::new()),
            }
        }

        pub fn refuse(mut self, path: &str) -> Self {
            self.unopenable.insert(path.to_string());
            self
        }

        /// Paths for which an open was attempted, in order.
        pub fn open_attempts(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl HidHost for MockHost {
        type Handle = MockTransport;

        fn interfaces(&self) -> Vec<InterfaceInfo> {
            self.interfaces.clone()
        }

        fn open(&self, info: &InterfaceInfo) -> Result<MockTransport> {
            self.opened.lock().unwrap().push(info.path.clone());
            if self.unopenable.contains(&info.path) {
                return Err(Error::Open(format!("permission denied: {}", info.path)));
            }
            Ok(MockTransport::new())
        }
    }

    /// Interface entry with the given product and interface number.
    pub fn interface(pid: u16, interface_number: i32, path: &str) -> InterfaceInfo {
        InterfaceInfo {
            vid: crate::VXE_VID,
            pid,
            interface_number,
            path: path.to_string(),
            serial: None,
            product: None,
        }
    }
}
