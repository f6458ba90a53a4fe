//! Per-stage DPI and LED colour.
//!
//! Stages are stored in pairs, one 8-byte register per pair (stages 1+2,
//! 3+4, ...). DPI pair registers start at `0x04`, colour pair registers at
//! `0x24`, both 8 addresses apart. Payload bytes 6..14 hold the two stages:
//!
//! ```text
//! DPI: x_lo y_lo hi cs | x_lo y_lo hi cs
//! RGB: r    g    b  cs | r    g    b  cs
//! ```
//!
//! A DPI is stored as `dpi / 50 - 1`. The low bytes of the X and Y values
//! go in `x_lo`/`y_lo`; their high bits share `hi` as
//! `(y_high << 6) | (x_high << 2)`. Each `cs` is `0x55` minus the three
//! bytes before it.
//!
//! Changing one stage is a read-modify-write of its pair so the neighbour
//! keeps its value. All pair I/O uses feature reports.

use crate::error::{Error, Result};
use crate::report::{self, Report};
use crate::safety;
use crate::transport::{read_response, HidTransport, REGISTER_READ_TIMEOUT_MS};
use tracing::{debug, info};

/// Address of the first DPI pair register.
pub const DPI_BASE: u8 = 0x04;
/// Address of the first colour pair register.
pub const RGB_BASE: u8 = 0x24;
const PAIR_STRIDE: u8 = 0x08;
const PAIR_LEN: u8 = 0x08;

/// X/Y sensitivity of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StageDpi {
    pub x: u16,
    pub y: u16,
}

impl StageDpi {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// LED colour shown while a stage is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = Error;

    /// Parse `R,G,B` with each component in 0-255.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::OutOfRange {
            field: "rgb",
            value: s.to_string(),
            allowed: "R,G,B with each component 0-255",
        };
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<u8>>>()?;
        match parts[..] {
            [r, g, b] => Ok(Self { r, g, b }),
            _ => Err(invalid()),
        }
    }
}

fn pair_address(base: u8, stage: u8) -> u8 {
    base + stage.div_ceil(2) * PAIR_STRIDE
}

/// Register holding the DPI pair that contains `stage` (1-based).
pub fn dpi_address(stage: u8) -> u8 {
    pair_address(DPI_BASE, stage)
}

/// Register holding the colour pair that contains `stage` (1-based).
pub fn rgb_address(stage: u8) -> u8 {
    pair_address(RGB_BASE, stage)
}

fn encode_stage_dpi(dpi: StageDpi) -> [u8; 4] {
    let [x_high, x_low] = (dpi.x / 50).saturating_sub(1).to_be_bytes();
    let [y_high, y_low] = (dpi.y / 50).saturating_sub(1).to_be_bytes();
    let high = (y_high << 6) | (x_high << 2);
    [x_low, y_low, high, report::checksum_of(&[x_low, y_low, high])]
}

fn decode_stage_dpi(x_low: u8, y_low: u8, high: u8) -> StageDpi {
    let x_high = (high >> 2) & 0x0F;
    let y_high = (high >> 6) & 0x03;
    let to_dpi = |high: u8, low: u8| {
        let value = u32::from(u16::from_be_bytes([high, low]));
        u16::try_from((value + 1) * 50).unwrap_or(u16::MAX)
    };
    StageDpi {
        x: to_dpi(x_high, x_low),
        y: to_dpi(y_high, y_low),
    }
}

fn encode_rgb(rgb: Rgb) -> [u8; 4] {
    [rgb.r, rgb.g, rgb.b, report::checksum_of(&[rgb.r, rgb.g, rgb.b])]
}

fn pair_payload(a: [u8; 4], b: [u8; 4]) -> [u8; 10] {
    [a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3], 0x00, 0x00]
}

/// Encode a DPI pair register write.
pub fn encode_dpi_pair(address: u8, a: StageDpi, b: StageDpi) -> Report {
    report::write_register(
        address,
        PAIR_LEN,
        pair_payload(encode_stage_dpi(a), encode_stage_dpi(b)),
    )
}

/// Decode both stages of a DPI pair response.
pub fn decode_dpi_pair(data: &Report) -> [StageDpi; 2] {
    [
        decode_stage_dpi(data[6], data[7], data[8]),
        decode_stage_dpi(data[10], data[11], data[12]),
    ]
}

/// Encode a colour pair register write.
pub fn encode_rgb_pair(address: u8, a: Rgb, b: Rgb) -> Report {
    report::write_register(address, PAIR_LEN, pair_payload(encode_rgb(a), encode_rgb(b)))
}

/// Decode both stages of a colour pair response.
pub fn decode_rgb_pair(data: &Report) -> [Rgb; 2] {
    [
        Rgb::new(data[6], data[7], data[8]),
        Rgb::new(data[10], data[11], data[12]),
    ]
}

fn read_pair(transport: &dyn HidTransport, address: u8) -> Result<Report> {
    transport.send_feature_report(&report::read_register(address, PAIR_LEN))?;
    read_response(transport, report::ops::READ, REGISTER_READ_TIMEOUT_MS, "stage pair")
}

/// Slot of `stage` within its pair.
fn slot(stage: u8) -> usize {
    if stage % 2 == 1 {
        0
    } else {
        1
    }
}

/// Changes to apply to one DPI stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageUpdate {
    pub x_dpi: Option<u16>,
    /// Defaults to `x_dpi` when only X is given.
    pub y_dpi: Option<u16>,
    pub rgb: Option<Rgb>,
}

/// Change the DPI and/or colour of one stage (1-based).
///
/// Everything is validated before the first report is sent.
pub fn modify_stage(transport: &dyn HidTransport, stage: u8, update: StageUpdate) -> Result<()> {
    safety::validate_stage_number(stage)?;
    let dpi = match (update.x_dpi, update.y_dpi) {
        (Some(x), y) => {
            let x = safety::validate_dpi("x_dpi", x)?;
            let y = safety::validate_dpi("y_dpi", y.unwrap_or(x))?;
            Some(StageDpi::new(x, y))
        }
        (None, Some(_)) => {
            return Err(Error::InvalidArgument("Y DPI requires X DPI".into()));
        }
        (None, None) => None,
    };
    if dpi.is_none() && update.rgb.is_none() {
        return Err(Error::InvalidArgument(
            "at least one of X DPI or RGB must be given".into(),
        ));
    }

    if let Some(dpi) = dpi {
        let address = dpi_address(stage);
        let mut pair = decode_dpi_pair(&read_pair(transport, address)?);
        debug!(stage, current = ?pair, "DPI pair read");
        pair[slot(stage)] = dpi;
        transport.send_feature_report(&encode_dpi_pair(address, pair[0], pair[1]))?;
        info!(stage, x = dpi.x, y = dpi.y, "Stage DPI set");
    }

    if let Some(rgb) = update.rgb {
        let address = rgb_address(stage);
        let mut pair = decode_rgb_pair(&read_pair(transport, address)?);
        debug!(stage, current = ?pair, "Colour pair read");
        pair[slot(stage)] = rgb;
        transport.send_feature_report(&encode_rgb_pair(address, pair[0], pair[1]))?;
        info!(stage, rgb = %rgb, "Stage colour set");
    }

    Ok(())
}
