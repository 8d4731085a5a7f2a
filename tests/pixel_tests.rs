//! Integration tests for PixelStrip, StripOutput and the startup sweep

mod common;
use common::*;

use spinflow::config::{STRIP_LENGTH, SWEEP_FRAME_MS};
use spinflow::pixel::{BIT_ONE_PULSE, BIT_ZERO_PULSE};
use spinflow::sweep::SWEEP_FRAMES;
use spinflow::{
    Action, DeviceStrip, Millis, Output, Pixel, PixelStrip, StartupSweep, StripOutput, Tick,
    pulse_buffer_len,
};

type TestOutput = StripOutput<MockTransmitter, MockIndicators, 20, { pulse_buffer_len(20) }>;

fn new_output() -> TestOutput {
    StripOutput::new(MockTransmitter::new(), MockIndicators::default(), 50)
}

fn bits(codes: &[u16]) -> heapless::Vec<u8, 48> {
    codes
        .iter()
        .map(|code| match *code {
            BIT_ONE_PULSE => 1,
            BIT_ZERO_PULSE => 0,
            other => panic!("unexpected pulse code {other}"),
        })
        .collect()
}

#[test]
fn device_strip_encodes_24_codes_per_pixel() {
    let mut strip = DeviceStrip::new();
    let pulses = strip.encode().unwrap();

    assert_eq!(pulses.len(), 24 * STRIP_LENGTH);
    assert!(pulses.iter().all(|code| *code == BIT_ZERO_PULSE));
}

#[test]
fn red_msb_lands_after_the_green_byte() {
    let mut strip = PixelStrip::<1, 24>::new();
    strip.fill(Pixel::new(0x80, 0, 0));

    let bits = bits(strip.encode().unwrap());

    let mut expected = [0u8; 24];
    expected[8] = 1;
    assert_eq!(bits.as_slice(), &expected);
}

#[test]
fn every_channel_is_sent_msb_first_in_grb_order() {
    let mut strip = PixelStrip::<1, 24>::new();
    strip.fill(Pixel::new(0x01, 0xA0, 0x0F));

    let bits = bits(strip.encode().unwrap());

    assert_eq!(
        bits.as_slice(),
        &[
            1, 0, 1, 0, 0, 0, 0, 0, // green 0xA0
            0, 0, 0, 0, 0, 0, 0, 1, // red 0x01
            0, 0, 0, 0, 1, 1, 1, 1, // blue 0x0F
        ]
    );
}

#[test]
fn pixels_are_sent_in_strip_order() {
    let mut strip = PixelStrip::<2, 48>::new();
    strip.set_pixel(1, Pixel::new(0, 0, 1)).unwrap();

    let bits = bits(strip.encode().unwrap());

    assert_eq!(bits.iter().filter(|b| **b == 1).count(), 1);
    assert_eq!(bits[47], 1);
}

#[test]
fn encode_reflects_latest_buffer() {
    let mut strip = PixelStrip::<1, 24>::new();
    strip.fill(Pixel::new(255, 255, 255));
    assert!(strip.encode().unwrap().iter().all(|c| *c == BIT_ONE_PULSE));

    strip.clear();
    assert!(strip.encode().unwrap().iter().all(|c| *c == BIT_ZERO_PULSE));
}

#[test]
fn flush_hands_full_frame_to_transmitter() {
    let mut strip = DeviceStrip::new();
    let mut transmitter = MockTransmitter::new();
    strip.set_green(50);

    strip.flush(&mut transmitter).unwrap();

    assert_eq!(transmitter.frames, 1);
    assert_eq!(transmitter.last.len(), pulse_buffer_len(STRIP_LENGTH));
}

#[test]
fn spin_actions_paint_the_whole_strip() {
    let mut output = new_output();

    output.apply(Action::PositiveSpin);
    assert!(output.strip().pixels().iter().all(|p| *p == Pixel::new(50, 0, 0)));

    output.apply(Action::NegativeSpin);
    assert!(output.strip().pixels().iter().all(|p| *p == Pixel::new(0, 0, 50)));

    output.apply(Action::Idle);
    assert!(output.strip().pixels().iter().all(|p| *p == Pixel::new(0, 50, 0)));

    assert_eq!(output.transmitter().frames, 3);
}

#[test]
fn strip_indicator_toggles_while_spinning_and_clears_on_idle() {
    let mut output = new_output();

    output.apply(Action::PositiveSpin);
    assert!(output.indicators().strip);
    output.apply(Action::PositiveSpin);
    assert!(!output.indicators().strip);
    output.apply(Action::NegativeSpin);
    assert!(output.indicators().strip);

    output.apply(Action::Idle);
    assert!(!output.indicators().strip);
}

#[test]
fn sensor_and_app_indicators_follow_faults() {
    let mut output = new_output();

    output.apply(Action::SensorFault);
    assert!(output.indicators().sensor);
    output.apply(Action::SensorReady);
    assert!(!output.indicators().sensor);

    output.apply(Action::Halted);
    assert!(output.indicators().app);

    // Status changes never touch the strip.
    assert_eq!(output.transmitter().frames, 0);
}

#[test]
fn clear_turns_strip_off_and_transmits() {
    let mut output = new_output();
    output.apply(Action::PositiveSpin);

    output.clear();

    assert!(output.strip().pixels().iter().all(|p| *p == Pixel::OFF));
    assert_eq!(output.transmitter().frames, 2);
}

#[test]
fn sweep_plays_one_frame_per_interval() {
    let mut sweep = StartupSweep::<Tick>::new(Millis(SWEEP_FRAME_MS));
    let mut shown = heapless::Vec::<(u32, Pixel), 32>::new();

    for now in 0..3_000 {
        if let Some(color) = sweep.poll(Tick(now)) {
            shown.push((now, color)).unwrap();
        }
    }

    assert!(sweep.is_done());
    assert_eq!(shown.len(), usize::from(SWEEP_FRAMES));
    for (i, (at, _)) in shown.iter().enumerate() {
        assert_eq!(*at, i as u32 * SWEEP_FRAME_MS);
    }

    assert_eq!(shown[0].1, Pixel::OFF);
    assert_eq!(shown[6].1, Pixel::new(250, 0, 0));
    assert_eq!(shown[12].1, Pixel::new(0, 250, 0));
    assert_eq!(shown[18].1, Pixel::new(0, 0, 250));
    assert_eq!(shown[19].1, Pixel::OFF);
}

#[test]
fn sweep_waits_between_frames() {
    let mut sweep = StartupSweep::<Tick>::new(Millis(100));

    assert_eq!(sweep.poll(Tick(0)), Some(Pixel::OFF));
    assert_eq!(sweep.poll(Tick(50)), None);
    assert_eq!(sweep.poll(Tick(99)), None);
    assert!(sweep.poll(Tick(100)).is_some());
    assert!(!sweep.is_done());
}

#[test]
fn sweep_frames_bypass_brightness() {
    let mut output = new_output();

    output.apply(Action::Sweep(Pixel::new(250, 0, 0)));

    assert!(output.strip().pixels().iter().all(|p| *p == Pixel::new(250, 0, 0)));
    assert_eq!(output.transmitter().frames, 1);
    assert!(!output.indicators().strip);
}

#[test]
fn sweep_formats_with_debug() {
    let sweep = StartupSweep::<Tick>::new(Millis(SWEEP_FRAME_MS));
    let text = format!("{:?}", sweep);

    assert!(text.starts_with("StartupSweep"));
    assert!(text.contains("SoftTimer"));
}
