//! Command dispatch: turns a setting request into device writes.
//!
//! Each requested setting is validated, encoded and written on its own. A
//! failed setting is recorded in its [`Outcome`] and does not stop the
//! remaining ones. Success means the write call returned without a
//! transport error; nothing is read back.

use crate::debounce::{self, Debounce};
use crate::device::DeviceVariant;
use crate::dpi_stage;
use crate::error::Result;
use crate::polling_rate::{self, PollingRate};
use crate::report::Report;
use crate::safety;
use crate::sensor::{self, SensorMode};
use crate::sleep::{self, SleepTimeout};
use crate::transport::HidTransport;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause after feature-report settings before the next report is sent.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Settings requested in one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingRequest {
    pub dpi_stage: Option<i32>,
    pub polling_rate: Option<PollingRate>,
    pub sensor_mode: Option<SensorMode>,
    pub debounce: Option<Debounce>,
    pub sleep_timeout: Option<SleepTimeout>,
}

impl SettingRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Populated fields in dispatch order.
    pub fn settings(&self) -> Vec<Setting> {
        let mut settings = Vec::new();
        if let Some(stage) = self.dpi_stage {
            settings.push(Setting::DpiStage(stage));
        }
        if let Some(rate) = self.polling_rate {
            settings.push(Setting::PollingRate(rate));
        }
        if let Some(mode) = self.sensor_mode {
            settings.push(Setting::SensorMode(mode));
        }
        if let Some(debounce) = self.debounce {
            settings.push(Setting::Debounce(debounce));
        }
        if let Some(timeout) = self.sleep_timeout {
            settings.push(Setting::SleepTimeout(timeout));
        }
        settings
    }
}

/// A single setting with its requested value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    DpiStage(i32),
    PollingRate(PollingRate),
    SensorMode(SensorMode),
    Debounce(Debounce),
    SleepTimeout(SleepTimeout),
}

impl Setting {
    /// Human-readable setting name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DpiStage(_) => "DPI stage",
            Self::PollingRate(_) => "polling rate",
            Self::SensorMode(_) => "sensor setting",
            Self::Debounce(_) => "debounce time",
            Self::SleepTimeout(_) => "sleep timeout",
        }
    }
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DpiStage(stage) => write!(f, "{stage}"),
            Self::PollingRate(rate) => write!(f, "{rate}"),
            Self::SensorMode(mode) => write!(f, "{mode}"),
            Self::Debounce(debounce) => write!(f, "{debounce}"),
            Self::SleepTimeout(timeout) => write!(f, "{timeout}"),
        }
    }
}

/// Result of dispatching one setting.
#[derive(Debug)]
pub struct Outcome {
    pub setting: Setting,
    pub result: Result<()>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Writes settings to an open device.
pub struct Dispatcher<'a> {
    transport: &'a dyn HidTransport,
    variant: DeviceVariant,
    settle: Duration,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn HidTransport, variant: DeviceVariant) -> Self {
        Self {
            transport,
            variant,
            settle: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Override the pause inserted after feature-report settings.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Dispatch every populated field of `request`, in order.
    pub fn apply(&self, request: &SettingRequest) -> Vec<Outcome> {
        request
            .settings()
            .into_iter()
            .map(|setting| {
                let result = self.apply_one(setting);
                match &result {
                    Ok(()) => info!(setting = setting.label(), value = %setting, "Setting applied"),
                    Err(e) => warn!(setting = setting.label(), value = %setting, error = %e, "Setting failed"),
                }
                Outcome { setting, result }
            })
            .collect()
    }

    /// Dispatch a single setting.
    pub fn apply_one(&self, setting: Setting) -> Result<()> {
        match setting {
            Setting::DpiStage(stage) => self.set_dpi_stage(stage),
            Setting::PollingRate(rate) => self.set_polling_rate(rate),
            Setting::SensorMode(mode) => self.set_sensor_mode(mode),
            Setting::Debounce(debounce) => self.set_debounce(debounce),
            Setting::SleepTimeout(timeout) => self.set_sleep_timeout(timeout),
        }
    }

    pub fn set_dpi_stage(&self, stage: i32) -> Result<()> {
        self.write_output(&dpi_stage::encode_dpi_stage(stage))
    }

    /// Rates above the variant's cap are rejected without writing.
    pub fn set_polling_rate(&self, rate: PollingRate) -> Result<()> {
        safety::check_rate_capability(self.variant, rate)?;
        self.write_output(&polling_rate::encode_polling_rate(rate))
    }

    pub fn set_sensor_mode(&self, mode: SensorMode) -> Result<()> {
        self.write_feature(&sensor::encode_sensor_mode(mode))?;
        self.settle();
        Ok(())
    }

    pub fn set_debounce(&self, debounce: Debounce) -> Result<()> {
        if !safety::is_debounce_recommended(debounce) {
            warn!(
                debounce_ms = debounce.as_ms(),
                "Debounce times under {} ms are not recommended",
                safety::DEBOUNCE_RECOMMENDED_MIN_MS
            );
        }
        self.write_feature(&debounce::encode_debounce(debounce))?;
        self.settle();
        Ok(())
    }

    pub fn set_sleep_timeout(&self, timeout: SleepTimeout) -> Result<()> {
        let [value, confirm] = sleep::encode_sleep_timeout(timeout);
        self.write_feature(&value)?;
        self.settle();
        self.write_feature(&confirm)
    }

    fn write_output(&self, report: &Report) -> Result<()> {
        debug!(report_hex = format_args!("{:02X?}", report), "Writing output report");
        self.transport.write_report(report)?;
        Ok(())
    }

    fn write_feature(&self, report: &Report) -> Result<()> {
        debug!(report_hex = format_args!("{:02X?}", report), "Writing feature report");
        self.transport.send_feature_report(report)
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::mock::{MockTransport, ReportKind};

    fn dispatcher(mock: &MockTransport, variant: DeviceVariant) -> Dispatcher<'_> {
        Dispatcher::new(mock, variant).with_settle_delay(Duration::ZERO)
    }

    #[test]
    fn wired_2000hz_is_rejected_without_write() {
        let mock = MockTransport::new();
        let request = SettingRequest {
            polling_rate: Some(PollingRate::Hz2000),
            ..Default::default()
        };

        let outcomes = dispatcher(&mock, DeviceVariant::Wired).apply(&request);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].result,
            Err(Error::CapabilityMismatch {
                requested_hz: 2000,
                ..
            })
        ));
        assert!(mock.written().is_empty());
    }

    #[test]
    fn wired_1000hz_writes_once() {
        let mock = MockTransport::new();
        let request = SettingRequest {
            polling_rate: Some(PollingRate::Hz1000),
            ..Default::default()
        };

        let outcomes = dispatcher(&mock, DeviceVariant::Wired).apply(&request);
        assert!(outcomes[0].is_ok());
        assert_eq!(
            mock.written(),
            vec![(
                ReportKind::Output,
                polling_rate::encode_polling_rate(PollingRate::Hz1000).to_vec()
            )]
        );
    }

    #[test]
    fn dpi_and_rate_on_wireless_write_twice() {
        let mock = MockTransport::new();
        let request = SettingRequest {
            dpi_stage: Some(3),
            polling_rate: Some(PollingRate::Hz500),
            ..Default::default()
        };

        let outcomes = dispatcher(&mock, DeviceVariant::Wireless).apply(&request);
        assert!(outcomes.iter().all(Outcome::is_ok));

        let written: Vec<Vec<u8>> = mock.written().into_iter().map(|(_, r)| r).collect();
        assert_eq!(written.len(), 2);
        assert!(written.contains(&dpi_stage::encode_dpi_stage(3).to_vec()));
        assert!(written.contains(&polling_rate::encode_polling_rate(PollingRate::Hz500).to_vec()));
    }

    #[test]
    fn rejected_rate_does_not_block_dpi_stage() {
        let mock = MockTransport::new();
        let request = SettingRequest {
            dpi_stage: Some(2),
            polling_rate: Some(PollingRate::Hz8000),
            ..Default::default()
        };

        let outcomes = dispatcher(&mock, DeviceVariant::Wired).apply(&request);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert_eq!(mock.written().len(), 1);
    }

    #[test]
    fn write_failure_is_reported_per_setting() {
        let mock = MockTransport::new();
        mock.fail_writes("No such device");
        let request = SettingRequest {
            dpi_stage: Some(1),
            polling_rate: Some(PollingRate::Hz250),
            ..Default::default()
        };

        let outcomes = dispatcher(&mock, DeviceVariant::Wireless).apply(&request);
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(matches!(outcome.result, Err(Error::TransportWrite(ref m)) if m == "No such device"));
        }
    }

    #[test]
    fn out_of_range_stage_is_forwarded() {
        let mock = MockTransport::new();
        dispatcher(&mock, DeviceVariant::Wireless)
            .set_dpi_stage(300)
            .unwrap();
        let written = mock.written();
        assert_eq!(written[0].1[10], 300u16 as u8);
    }

    #[test]
    fn sleep_timeout_sends_two_feature_reports() {
        let mock = MockTransport::new();
        dispatcher(&mock, DeviceVariant::Wireless)
            .set_sleep_timeout(SleepTimeout::Min1)
            .unwrap();

        let written = mock.written();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|(kind, _)| *kind == ReportKind::Feature));
        assert_eq!(written[0].1[4], 0xA9);
        assert_eq!(written[1].1[4], 0xB5);
    }

    #[test]
    fn empty_request_does_nothing() {
        let mock = MockTransport::new();
        let request = SettingRequest::default();
        assert!(request.is_empty());
        assert!(dispatcher(&mock, DeviceVariant::Wired).apply(&request).is_empty());
        assert!(mock.written().is_empty());
    }

    #[test]
    fn settings_follow_dispatch_order() {
        let request = SettingRequest {
            dpi_stage: Some(4),
            polling_rate: Some(PollingRate::Hz125),
            sensor_mode: Some(SensorMode::Max),
            debounce: Some(Debounce::Ms4),
            sleep_timeout: Some(SleepTimeout::Min5),
        };
        let labels: Vec<&str> = request.settings().iter().map(Setting::label).collect();
        assert_eq!(
            labels,
            vec![
                "DPI stage",
                "polling rate",
                "sensor setting",
                "debounce time",
                "sleep timeout"
            ]
        );
    }

    #[test]
    fn setting_display_values() {
        assert_eq!(Setting::DpiStage(-2).to_string(), "-2");
        assert_eq!(Setting::PollingRate(PollingRate::Hz4000).to_string(), "4000 Hz");
        assert_eq!(Setting::Debounce(Debounce::Ms15).to_string(), "15 ms");
        assert_eq!(Setting::SleepTimeout(SleepTimeout::Sec30).to_string(), "30s");
    }
}
