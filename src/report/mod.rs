//! PanelDue status report.
//!
//! One request produces one line:
//!
//! ```text
//! {"status":"I","heaters":[..],"active":[..],"standby":[..],"hstat":[..],
//!  "pos":[x,y,z],"extr":[..],"sfactor":n,"efactor":[..],"tool":n,"probe":"0",
//!  "fanPercent":[..],"fanRPM":n,"homed":[x,y,z],"fraction_printed":f,
//!  "message":"..","myName":"..","firmwareName":"Marlin","geometry":"..",
//!  "axes":3,"volumes":n,"numTools":n}
//! ```
//!
//! Field order and key names are fixed by the display's parser. Fan fields
//! need at least one fan, `fraction_printed` needs progress tracking,
//! `message` needs a non-empty latch, and the identity block from `myName`
//! on needs [`ReportStyle::Extended`].
//!
//! A transport failure abandons the record where it stands. The display
//! drops the partial line and picks up at the next complete one.

pub mod json;
pub mod request;

use embedded_hal::delay::DelayNs;

use crate::config::MachineConfig;
use crate::error::Result;
use crate::machine::{MachineSnapshot, fan_percent, fan_rpm};
use crate::serial::{Sink, Transport};
use crate::status::StatusLatch;

use json::JsonWriter;
pub use request::{ReportRequest, ReportStyle};

/// Reported in `firmwareName`; the display keys protocol quirks off it.
pub const FIRMWARE_NAME: &str = "Marlin";

/// Linear axes reported in `axes`.
pub const AXIS_COUNT: i32 = 3;

/// Record keys, in emission order.
pub mod key {
    pub const STATUS: &str = "status";
    pub const HEATERS: &str = "heaters";
    pub const ACTIVE: &str = "active";
    pub const STANDBY: &str = "standby";
    pub const HSTAT: &str = "hstat";
    pub const POS: &str = "pos";
    pub const EXTR: &str = "extr";
    pub const SFACTOR: &str = "sfactor";
    pub const EFACTOR: &str = "efactor";
    pub const TOOL: &str = "tool";
    pub const PROBE: &str = "probe";
    pub const FAN_PERCENT: &str = "fanPercent";
    pub const FAN_RPM: &str = "fanRPM";
    pub const HOMED: &str = "homed";
    pub const FRACTION_PRINTED: &str = "fraction_printed";
    pub const MESSAGE: &str = "message";
    pub const MY_NAME: &str = "myName";
    pub const FIRMWARE_NAME: &str = "firmwareName";
    pub const GEOMETRY: &str = "geometry";
    pub const AXES: &str = "axes";
    pub const VOLUMES: &str = "volumes";
    pub const NUM_TOOLS: &str = "numTools";
}

/// Stream one status record for `snapshot` to `sink`.
///
/// `delay` supplies the short pause taken after each numeric array.
pub fn write_status_report<T, D, const N: usize>(
    sink: &mut Sink<'_, T>,
    delay: &mut D,
    config: &MachineConfig,
    snapshot: &MachineSnapshot,
    latch: &StatusLatch<N>,
    style: ReportStyle,
) -> Result<()>
where
    T: Transport,
    D: DelayNs,
{
    let mut json = JsonWriter::new(sink, delay);
    json.begin()?;

    json.const_str_field(key::STATUS, if snapshot.sd_printing { "P" } else { "I" })?;

    json.float_array(key::HEATERS, snapshot.heaters(config).map(|h| h.current))?;
    // No separate standby setpoint exists: standby repeats the active targets.
    json.float_array(key::ACTIVE, snapshot.heaters(config).map(|h| h.target))?;
    json.float_array(key::STANDBY, snapshot.heaters(config).map(|h| h.target))?;
    // 2 = heating, 0 = off. "At temperature" is never reported.
    json.digit_array(key::HSTAT, snapshot.heaters(config).map(|h| h.status_digit()))?;

    json.float_array(key::POS, snapshot.position)?;
    // A single E axis is tracked; every extruder slot shows it.
    json.float_array(
        key::EXTR,
        (0..config.extruders).map(|_| snapshot.e_position),
    )?;

    json.int_field(key::SFACTOR, i32::from(snapshot.feedrate_percent))?;
    json.float_array(
        key::EFACTOR,
        (0..config.extruders as usize).map(|e| f32::from(snapshot.flow_percent(e))),
    )?;
    json.int_field(key::TOOL, i32::from(snapshot.active_extruder))?;
    json.const_str_field(key::PROBE, "0")?;

    if config.fan_count > 0 {
        json.float_array(
            key::FAN_PERCENT,
            (0..config.fan_count as usize).map(|i| f32::from(fan_percent(snapshot.fan_duty(i)))),
        )?;
        json.int_field(key::FAN_RPM, fan_rpm(snapshot.fan_duty(0)))?;
    }

    json.digit_array(key::HOMED, snapshot.homed.digits())?;

    if config.print_progress {
        json.float_field(key::FRACTION_PRINTED, snapshot.fraction_printed())?;
    }

    if !latch.is_empty() {
        json.str_field(key::MESSAGE, latch.as_str())?;
    }

    if style == ReportStyle::Extended {
        json.str_field(key::MY_NAME, config.machine_name.as_str())?;
        json.const_str_field(key::FIRMWARE_NAME, FIRMWARE_NAME)?;
        json.const_str_field(key::GEOMETRY, config.geometry().as_str())?;
        json.int_field(key::AXES, AXIS_COUNT)?;
        json.int_field(key::VOLUMES, i32::from(config.volumes()))?;
        json.int_field(key::NUM_TOOLS, i32::from(config.extruders))?;
    }

    json.end()
}
