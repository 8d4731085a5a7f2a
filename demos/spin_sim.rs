//! Host simulation of the spin-reactive strip.
//!
//! Runs the real control loop against a wall-clock time source and a scripted
//! gyroscope: the power-on sweep plays, the first health check fails, then the
//! device rests, spins one way, spins the other way and comes to rest again.
//! Strip frames are decoded back into a color and printed whenever they change.
//!
//! ```text
//! cargo run --example spin_sim --features std
//! RUST_LOG=debug cargo run --example spin_sim --features std
//! ```

use std::time::{Duration, Instant};

use spinflow::config::STRIP_LENGTH;
use spinflow::pixel::{BIT_ONE_PULSE, BITS_PER_PIXEL};
use spinflow::{
    AppConfig, AppFsm, Indicators, Millis, MotionSensor, Pixel, PulseTransmitter,
    SensorReading, StatusLed, StripOutput, Supervisor, Tick, TimeSource, colors,
    pulse_buffer_len,
};

/// How long the simulation runs.
const RUN_TIME_MS: u32 = 8_000;

// ============================================================================
// Host "hardware"
// ============================================================================

/// Millisecond clock backed by `Instant`.
struct HostClock {
    start: Instant,
}

impl TimeSource<Tick> for HostClock {
    fn now(&self) -> Tick {
        Tick(self.start.elapsed().as_millis() as u32)
    }
}

/// Gyroscope following a fixed motion script.
struct ScriptedGyro<'a> {
    clock: &'a HostClock,
    failed_once: bool,
}

impl MotionSensor for ScriptedGyro<'_> {
    type Error = &'static str;

    fn check(&mut self) -> bool {
        // Cold boot: the first check finds the bus still busy.
        let ok = self.failed_once;
        self.failed_once = true;
        ok
    }

    fn sample(&mut self) -> Result<SensorReading, Self::Error> {
        let gz = match self.clock.now().0 {
            0..=3_499 => 0,
            3_500..=4_999 => 240,
            5_000..=6_499 => -240,
            _ => 0,
        };
        Ok(SensorReading::new(3, -2, gz))
    }
}

/// Decodes the first pixel of each frame and prints it when it changes.
struct ConsoleStrip {
    shown: Option<Pixel>,
}

impl PulseTransmitter for ConsoleStrip {
    fn transmit(&mut self, pulses: &[u16]) {
        let packed = pulses
            .iter()
            .take(BITS_PER_PIXEL)
            .fold(0u32, |acc, code| (acc << 1) | u32::from(*code == BIT_ONE_PULSE));
        let pixel = Pixel::from_packed(packed);

        if self.shown != Some(pixel) {
            println!(
                "            strip  r={:<3} g={:<3} b={:<3} ({} pulses)",
                pixel.red,
                pixel.green,
                pixel.blue,
                pulses.len()
            );
            self.shown = Some(pixel);
        }
    }
}

/// Status LEDs that only report changes.
#[derive(Default)]
struct ConsoleLeds {
    state: [bool; 3],
}

fn led_slot(led: StatusLed) -> usize {
    match led {
        StatusLed::App => 0,
        StatusLed::Sensor => 1,
        StatusLed::Strip => 2,
    }
}

impl Indicators for ConsoleLeds {
    fn set(&mut self, led: StatusLed, on: bool) {
        let slot = led_slot(led);
        if self.state[slot] != on {
            self.state[slot] = on;
            if led != StatusLed::Strip {
                println!("            led    {:?} {}", led, if on { "on" } else { "off" });
            }
        }
    }

    fn toggle(&mut self, led: StatusLed) {
        let on = !self.state[led_slot(led)];
        self.set(led, on);
    }
}

type HostOutput =
    StripOutput<ConsoleStrip, ConsoleLeds, STRIP_LENGTH, { pulse_buffer_len(STRIP_LENGTH) }>;

// ============================================================================
// Control loop
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let clock = HostClock {
        start: Instant::now(),
    };
    let config = AppConfig::default();

    let output: HostOutput = StripOutput::new(
        ConsoleStrip { shown: None },
        ConsoleLeds::default(),
        config.brightness,
    );

    let gyro = ScriptedGyro {
        clock: &clock,
        failed_once: false,
    };
    let mut app = AppFsm::<Tick, _, _, _>::new(gyro, output, &clock, config);
    let mut supervisor = Supervisor::<Tick>::new(Millis(2_000), 3);

    while clock.now().0 < RUN_TIME_MS {
        supervisor.service(&mut app)?;
        std::thread::sleep(Duration::from_millis(1));
    }

    // Park on a dim white so the end of the run is visible.
    let parked = colors::scale(Pixel::new(255, 255, 255), config.brightness);
    let output = app.output_mut();
    output.strip_mut().fill(parked);
    output.show();

    log::info!(
        "simulation finished in {:?} after {} restarts",
        app.state(),
        supervisor.restarts()
    );
    Ok(())
}
