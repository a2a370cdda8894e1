//! Wire-level tests for the status record.

use paneldue::config::MachineConfig;
use paneldue::report::{ReportStyle, write_status_report};
use paneldue::serial::{Origin, SerialPorts};
use paneldue::status::{MESSAGE_CAPACITY, StatusLatch};
use serde_json::Value;

use crate::mock_hw::{CaptureTransport, CountingDelay, reference_snapshot};

fn reference_config() -> MachineConfig {
    MachineConfig {
        print_progress: false,
        ..MachineConfig::default()
    }
}

fn render_with(
    config: &MachineConfig,
    latch: &StatusLatch<MESSAGE_CAPACITY>,
    style: ReportStyle,
) -> (String, u32) {
    let mut ports = SerialPorts::new([CaptureTransport::default()]);
    let mut delay = CountingDelay::default();
    let target = ports.resolve(Origin::Serial(0));
    let mut sink = ports.sink(target).unwrap();
    write_status_report(
        &mut sink,
        &mut delay,
        config,
        &reference_snapshot(),
        latch,
        style,
    )
    .unwrap();
    let text = ports.port_mut(0).unwrap().text().to_owned();
    (text, delay.yields)
}

fn parse(record: &str) -> Value {
    assert!(record.ends_with('\n'), "record must be line terminated");
    serde_json::from_str(record.trim_end()).expect("record is valid JSON")
}

// ── Reference machine ─────────────────────────────────────────

#[test]
fn reference_machine_fields() {
    let (text, _) = render_with(&reference_config(), &StatusLatch::new(), ReportStyle::Base);
    assert!(text.contains("\"heaters\":[60.00,200.30]"));
    assert!(text.contains("\"active\":[60.00,200.00]"));
    assert!(text.contains("\"standby\":[60.00,200.00]"));
    assert!(text.contains("\"hstat\":[2,2]"));
    assert!(text.contains("\"fanPercent\":[50.00]"));
    assert!(text.contains("\"fanRPM\":1280"));
    assert!(text.contains("\"homed\":[1,1,0]"));
    assert!(!text.contains("\"message\""));
    assert!(!text.contains("\"myName\""));

    let v = parse(&text);
    assert_eq!(v["status"], "I");
    assert_eq!(v["probe"], "0");
    assert_eq!(v["sfactor"], 100);
    assert_eq!(v["tool"], 0);
}

#[test]
fn keys_come_out_in_fixed_order() {
    let config = MachineConfig::default();
    let mut latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();
    latch.set("Heating");
    let (text, _) = render_with(&config, &latch, ReportStyle::Extended);

    let order = [
        "status",
        "heaters",
        "active",
        "standby",
        "hstat",
        "pos",
        "extr",
        "sfactor",
        "efactor",
        "tool",
        "probe",
        "fanPercent",
        "fanRPM",
        "homed",
        "fraction_printed",
        "message",
        "myName",
        "firmwareName",
        "geometry",
        "axes",
        "volumes",
        "numTools",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|k| {
            text.find(&format!("\"{k}\":"))
                .unwrap_or_else(|| panic!("missing key {k}"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
}

#[test]
fn yields_once_per_numeric_array() {
    let (_, yields) = render_with(&reference_config(), &StatusLatch::new(), ReportStyle::Base);
    // heaters, active, standby, pos, extr, efactor, fanPercent
    assert_eq!(yields, 7);

    let no_fans = MachineConfig {
        fan_count: 0,
        ..reference_config()
    };
    let (_, yields) = render_with(&no_fans, &StatusLatch::new(), ReportStyle::Base);
    assert_eq!(yields, 6);
}

// ── Extended block ────────────────────────────────────────────

#[test]
fn extended_block_only_for_style_one() {
    let config = reference_config();
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    let (extended, _) = render_with(&config, &latch, ReportStyle::from_param(Some(1)));
    let v = parse(&extended);
    assert_eq!(v["myName"], "3D Printer");
    assert_eq!(v["firmwareName"], "Marlin");
    assert_eq!(v["geometry"], "cartesian");
    assert_eq!(v["axes"], 3);
    assert_eq!(v["volumes"], 1);
    assert_eq!(v["numTools"], 1);

    for style in [Some(0), None, Some(2)] {
        let (base, _) = render_with(&config, &latch, ReportStyle::from_param(style));
        let v = parse(&base);
        for key in ["myName", "firmwareName", "geometry", "axes", "volumes", "numTools"] {
            assert!(v.get(key).is_none(), "{key} present for style {style:?}");
        }
    }
}

#[test]
fn conflicting_geometry_reports_first_match() {
    let mut config = reference_config();
    config.kinematics.corexy = true;
    config.kinematics.hangprinter = true;
    let (text, _) = render_with(&config, &StatusLatch::new(), ReportStyle::Extended);
    assert_eq!(parse(&text)["geometry"], "hangprinter");
}

// ── Message latch ─────────────────────────────────────────────

#[test]
fn long_message_is_truncated_in_record() {
    let mut latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();
    let long: String = "abcdefghij".repeat(9);
    assert_eq!(long.len(), 90);
    latch.set(&long);

    let (text, _) = render_with(&reference_config(), &latch, ReportStyle::Base);
    let v = parse(&text);
    let message = v["message"].as_str().unwrap();
    assert_eq!(message.len(), MESSAGE_CAPACITY);
    assert_eq!(message, &long[..MESSAGE_CAPACITY]);
}

#[test]
fn message_is_not_escaped() {
    let mut latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();
    latch.set("say \"hi\"");
    let (text, _) = render_with(&reference_config(), &latch, ReportStyle::Base);
    assert!(text.contains("\"message\":\"say \"hi\"\""));
}

// ── Progress ──────────────────────────────────────────────────

#[test]
fn fraction_printed_needs_progress_support() {
    let (without, _) = render_with(&reference_config(), &StatusLatch::new(), ReportStyle::Base);
    assert!(parse(&without).get("fraction_printed").is_none());

    let (with, _) = render_with(&MachineConfig::default(), &StatusLatch::new(), ReportStyle::Base);
    assert_eq!(parse(&with)["fraction_printed"].as_f64(), Some(0.0));
}

// ── Transport failure ─────────────────────────────────────────

#[test]
fn disconnect_leaves_partial_unterminated_record() {
    let mut ports = SerialPorts::new([CaptureTransport::failing_after(64)]);
    let mut delay = CountingDelay::default();
    let target = ports.resolve(Origin::Local);
    let mut sink = ports.sink(target).unwrap();
    let result = write_status_report(
        &mut sink,
        &mut delay,
        &reference_config(),
        &reference_snapshot(),
        &StatusLatch::<MESSAGE_CAPACITY>::new(),
        ReportStyle::Base,
    );
    assert!(result.is_err());
    let port = ports.port_mut(0).unwrap();
    assert!(port.text().starts_with('{'));
    assert!(port.lines().len() <= 1);
    assert!(!port.text().ends_with('\n'));
}
