//! Simulated machine for host runs and bench bring-up.
//!
//! Implements [`MachineStatePort`] without a planner or heaters behind it:
//! temperatures creep toward their setpoints on every snapshot and a job
//! advances one percent per snapshot while running. Good enough to watch a
//! display react, not a thermal model.

use crate::app::ports::MachineStatePort;
use crate::config::MachineConfig;
use crate::machine::{AxisFlags, HeaterReading, MachineSnapshot};

/// Ambient temperature every heater starts at (°C).
const AMBIENT_C: f32 = 22.0;

/// Fraction of the remaining gap closed per snapshot.
const RAMP: f32 = 0.2;

pub struct SimulatedMachine {
    state: MachineSnapshot,
}

impl SimulatedMachine {
    pub fn new(config: &MachineConfig) -> Self {
        let mut state = MachineSnapshot {
            bed: config
                .heated_bed
                .then_some(HeaterReading::new(AMBIENT_C, 0.0)),
            feedrate_percent: 100,
            ..MachineSnapshot::default()
        };
        for _ in 0..config.hotends {
            let _ = state.hotends.push(HeaterReading::new(AMBIENT_C, 0.0));
        }
        for _ in 0..config.extruders {
            let _ = state.flow_percent.push(100);
        }
        for _ in 0..config.fan_count {
            let _ = state.fan_speed.push(0);
        }
        Self { state }
    }

    pub fn set_bed_target(&mut self, celsius: f32) {
        if let Some(bed) = self.state.bed.as_mut() {
            bed.target = celsius;
        }
    }

    pub fn set_hotend_target(&mut self, index: usize, celsius: f32) {
        if let Some(h) = self.state.hotends.get_mut(index) {
            h.target = celsius;
        }
    }

    pub fn set_fan(&mut self, index: usize, duty: u8) {
        if let Some(f) = self.state.fan_speed.get_mut(index) {
            *f = duty;
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32, z: f32) {
        self.state.position = [x, y, z];
    }

    pub fn home_all(&mut self) {
        self.state.position = [0.0; 3];
        self.state.homed = AxisFlags::new(true, true, true);
    }

    /// Start a job from removable media.
    pub fn start_job(&mut self) {
        self.state.sd_printing = true;
        self.state.progress_percent = Some(0);
    }

    fn step(&mut self) {
        let heaters = self.state.bed.iter_mut().chain(self.state.hotends.iter_mut());
        for h in heaters {
            let goal = if h.target > 0.0 { h.target } else { AMBIENT_C };
            h.current += (goal - h.current) * RAMP;
        }

        if self.state.sd_printing {
            let done = self.state.progress_percent.unwrap_or(0).saturating_add(1);
            self.state.progress_percent = Some(done.min(100));
            self.state.e_position += 0.5;
            if done >= 100 {
                self.state.sd_printing = false;
            }
        }
    }
}

impl MachineStatePort for SimulatedMachine {
    fn snapshot(&mut self) -> MachineSnapshot {
        self.step();
        self.state.clone()
    }
}
