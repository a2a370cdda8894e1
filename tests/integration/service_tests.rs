//! End-to-end tests through `PanelService`.

use paneldue::adapters::machine_sim::SimulatedMachine;
use paneldue::app::commands::HostCommand;
use paneldue::app::service::PanelService;
use paneldue::config::MachineConfig;
use paneldue::report::{ReportRequest, ReportStyle};
use paneldue::serial::{Origin, SerialPorts};
use paneldue::status::{MESSAGE_CAPACITY, StatusLatch};
use serde_json::Value;

use crate::mock_hw::{CaptureTransport, CountingDelay, MockMachine, reference_snapshot};

fn two_ports() -> SerialPorts<CaptureTransport, 2> {
    SerialPorts::new([CaptureTransport::default(), CaptureTransport::default()])
}

fn run(
    service: &mut PanelService,
    line: &str,
    origin: Origin,
    machine: &mut MockMachine,
    ports: &mut SerialPorts<CaptureTransport, 2>,
) {
    let cmd = HostCommand::parse(line, origin).expect("recognised command");
    service
        .handle_command(cmd, machine, ports, &mut CountingDelay::default())
        .unwrap();
}

/// The only test in this binary that touches the process-wide latch.
#[test]
fn display_message_round_trip() {
    let mut service = PanelService::new(MachineConfig::default());
    let mut machine = MockMachine::new(reference_snapshot());
    let mut ports = two_ports();

    run(&mut service, "M117 Heating bed", Origin::Serial(1), &mut machine, &mut ports);
    run(&mut service, "N12 M408 S1 ;poll", Origin::Serial(1), &mut machine, &mut ports);

    let record = ports.port_mut(1).unwrap().text().to_owned();
    let v: Value = serde_json::from_str(record.trim_end()).unwrap();
    assert_eq!(v["message"], "Heating bed");
    assert_eq!(v["firmwareName"], "Marlin");
    assert!(ports.port_mut(0).unwrap().out.is_empty());

    let long = "x".repeat(120);
    run(&mut service, &format!("M117 {long}"), Origin::Serial(1), &mut machine, &mut ports);
    run(&mut service, "M408", Origin::Serial(1), &mut machine, &mut ports);
    let latest = ports.port_mut(1).unwrap().lines().last().copied().map(str::to_owned).unwrap();
    let v: Value = serde_json::from_str(&latest).unwrap();
    assert_eq!(v["message"].as_str().unwrap().len(), MESSAGE_CAPACITY);

    run(&mut service, "M117", Origin::Serial(1), &mut machine, &mut ports);
    run(&mut service, "M408", Origin::Serial(1), &mut machine, &mut ports);
    let last = ports.port_mut(1).unwrap().lines().last().copied().map(str::to_owned).unwrap();
    assert!(!last.contains("\"message\""));

    assert_eq!(service.reports_sent(), 3);
    assert_eq!(machine.reads, 3);
}

#[test]
fn local_request_broadcasts_to_every_port() {
    let mut service = PanelService::new(MachineConfig::default());
    let mut machine = MockMachine::new(reference_snapshot());
    let mut ports = two_ports();
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    service
        .report_with_latch(
            ReportRequest::new(Origin::Local, ReportStyle::Base),
            &latch,
            &mut machine,
            &mut ports,
            &mut CountingDelay::default(),
        )
        .unwrap();

    let first = ports.port_mut(0).unwrap().text().to_owned();
    let second = ports.port_mut(1).unwrap().text().to_owned();
    assert!(first.ends_with("}\n"));
    assert_eq!(first, second);
    assert_eq!(machine.reads, 1);
}

#[test]
fn broadcast_survives_a_dead_port() {
    let mut service = PanelService::new(MachineConfig::default());
    let mut machine = MockMachine::new(reference_snapshot());
    let mut ports = SerialPorts::new([
        CaptureTransport::failing_after(0),
        CaptureTransport::default(),
    ]);
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    let result = service.report_with_latch(
        ReportRequest::new(Origin::Local, ReportStyle::Base),
        &latch,
        &mut machine,
        &mut ports,
        &mut CountingDelay::default(),
    );
    assert!(result.is_err());
    assert_eq!(service.reports_failed(), 1);
    assert!(ports.port_mut(0).unwrap().out.is_empty());

    let healthy = ports.port_mut(1).unwrap().text().to_owned();
    assert!(healthy.ends_with("}\n"));
    let v: Value = serde_json::from_str(healthy.trim_end()).unwrap();
    assert_eq!(v["fanRPM"], 1280);
}

#[test]
fn reply_goes_to_requesting_port_only() {
    let mut service = PanelService::new(MachineConfig::default());
    let mut machine = MockMachine::new(reference_snapshot());
    let mut ports = two_ports();
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    service
        .report_with_latch(
            ReportRequest::new(Origin::Serial(0), ReportStyle::Extended),
            &latch,
            &mut machine,
            &mut ports,
            &mut CountingDelay::default(),
        )
        .unwrap();

    assert_eq!(ports.port_mut(0).unwrap().lines().len(), 1);
    assert!(ports.port_mut(1).unwrap().out.is_empty());
}

#[test]
fn failed_port_is_counted() {
    let mut service = PanelService::new(MachineConfig::default());
    let mut machine = MockMachine::new(reference_snapshot());
    let mut ports = SerialPorts::new([
        CaptureTransport::default(),
        CaptureTransport::failing_after(10),
    ]);
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    let result = service.report_with_latch(
        ReportRequest::new(Origin::Serial(1), ReportStyle::Base),
        &latch,
        &mut machine,
        &mut ports,
        &mut CountingDelay::default(),
    );
    assert!(result.is_err());
    assert_eq!(service.reports_sent(), 0);
    assert_eq!(service.reports_failed(), 1);
    assert!(ports.port_mut(0).unwrap().out.is_empty());
}

#[test]
fn simulated_machine_warms_up_between_polls() {
    let config = MachineConfig::default();
    let mut service = PanelService::new(config.clone());
    let mut machine = SimulatedMachine::new(&config);
    machine.set_hotend_target(0, 210.0);
    machine.set_fan(0, 255);
    let mut ports = SerialPorts::new([CaptureTransport::default()]);
    let latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();

    for _ in 0..2 {
        service
            .report_with_latch(
                ReportRequest::new(Origin::Serial(0), ReportStyle::Base),
                &latch,
                &mut machine,
                &mut ports,
                &mut CountingDelay::default(),
            )
            .unwrap();
    }

    let lines = ports.port_mut(0).unwrap().lines().iter().map(|l| l.to_string()).collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    let temps: Vec<f64> = lines
        .iter()
        .map(|l| {
            let v: Value = serde_json::from_str(l).unwrap();
            v["heaters"][1].as_f64().unwrap()
        })
        .collect();
    assert!(temps[1] > temps[0]);

    let v: Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(v["hstat"][1], 2);
    assert_eq!(v["fanPercent"][0].as_f64(), Some(100.0));
    assert_eq!(v["fanRPM"], 2550);
}
