//! FFT controller against the simulated hardware

mod sim;

use axi_fft_dma::{
    fft::{DEFAULT_POINTS, DEFAULT_SCALE_SCHEDULE, MAX_POINTS},
    Channel, ComplexSample, ConfigWord, Direction, Error, Fft, Irq, Params,
};
use proptest::{prop_assert, prop_assert_eq, prop_assume, proptest};
use sim::{SimCache, SimDma, SimGpio};

use std::thread;

#[test]
fn defaults() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();

    assert_eq!(fft.direction(), Direction::Forward);
    assert_eq!(fft.point_count(), DEFAULT_POINTS);
    assert_eq!(fft.scale_schedule(), DEFAULT_SCALE_SCHEDULE);
    assert_eq!(fft.params(), Params::default());
    assert_eq!(fft.engine().transfer_length(), DEFAULT_POINTS);
    assert_eq!(fft.config_word().exponent(), 10);
    assert!(gpio.writes().is_empty(), "nothing written until execute");
}

#[test]
fn execute_writes_the_configuration_word() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let mut fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();
    fft.set_direction(Direction::Inverse);
    fft.set_point_count(256).unwrap();
    fft.set_scale_schedule(0x1555);

    let input: Vec<ComplexSample> = (0..256)
        .map(|i| ComplexSample::new(i as i16, -(i as i16)))
        .collect();
    let mut output = vec![ComplexSample::default(); 256];
    let result = thread::scope(|s| {
        s.spawn(|| sim::fire(fft.engine(), &dma, 1, &[Channel::Outbound, Channel::Inbound]));
        fft.execute(&input, &mut output)
    });

    assert_eq!(result, Ok(()));
    assert_eq!(gpio.writes(), [(0x1555 << 9) | 8]);
    assert_eq!(output, input, "loopback returns the input");
}

#[test]
fn execute_moves_point_count_samples() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let mut fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();
    fft.set_point_count(16).unwrap();

    // Larger buffers; only the first 16 samples move.
    let input = vec![ComplexSample::new(3, 4); 64];
    let mut output = vec![ComplexSample::default(); 64];
    let result = thread::scope(|s| {
        s.spawn(|| sim::fire(fft.engine(), &dma, 1, &[Channel::Inbound, Channel::Outbound]));
        fft.execute(&input, &mut output)
    });

    assert_eq!(result, Ok(()));
    assert_eq!(output[..16], input[..16]);
    assert!(output[16..].iter().all(|&sample| sample == ComplexSample::default()));
    assert_eq!(
        dma.events()
            .into_iter()
            .filter(|event| matches!(event, sim::Event::Start(_, 64)))
            .count(),
        2
    );
}

#[test]
fn execute_reports_runtime_errors() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let mut fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();
    fft.set_point_count(32).unwrap();
    dma.script(Channel::Outbound, Irq::ERROR);

    let input = vec![ComplexSample::default(); 32];
    let mut output = vec![ComplexSample::default(); 32];
    let result = thread::scope(|s| {
        s.spawn(|| sim::fire(fft.engine(), &dma, 1, &[Channel::Outbound]));
        fft.execute(&input, &mut output)
    });

    assert_eq!(result, Err(Error::TransferRuntime));
    assert_eq!(gpio.writes().len(), 1);
}

#[test]
fn execute_rejects_short_buffers() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();

    let input = vec![ComplexSample::default(); 512];
    let mut output = vec![ComplexSample::default(); DEFAULT_POINTS];
    assert_eq!(
        fft.execute(&input, &mut output),
        Err(Error::IllegalParameter)
    );
    assert_eq!(dma.starts(Channel::Outbound), 0);
}

#[test]
fn release_returns_the_hardware() {
    let dma = SimDma::new();
    let cache = SimCache::default();
    let gpio = SimGpio::default();
    let fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();

    let (engine, released) = fft.release();
    assert!(std::ptr::eq(released, &gpio));
    assert_eq!(engine.transfer_length(), DEFAULT_POINTS);
}

proptest! {
    #[test]
    fn accepts_powers_of_two(exponent in 0u32..=13) {
        let dma = SimDma::new();
        let cache = SimCache::default();
        let gpio = SimGpio::default();
        let mut fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();

        let points = 1usize << exponent;
        prop_assert_eq!(fft.set_point_count(points), Ok(()));
        prop_assert_eq!(fft.point_count(), points);
        prop_assert_eq!(fft.engine().transfer_length(), points);
        prop_assert_eq!(fft.config_word().exponent(), exponent);
    }

    #[test]
    fn rejects_everything_else(points in 0usize..=(4 * MAX_POINTS), previous in 0u32..=13) {
        prop_assume!(!(points.is_power_of_two() && points <= MAX_POINTS));

        let dma = SimDma::new();
        let cache = SimCache::default();
        let gpio = SimGpio::default();
        let mut fft = Fft::new(sim::engine(&dma, &cache), &gpio).unwrap();
        fft.set_point_count(1 << previous).unwrap();
        let before = fft.params();

        prop_assert_eq!(fft.set_point_count(points), Err(Error::IllegalParameter));
        prop_assert_eq!(fft.params(), before);
        prop_assert_eq!(fft.engine().transfer_length(), 1usize << previous);
    }

    #[test]
    fn config_word_fields(forward: bool, exponent in 0u32..=13, scale in 0u16..0x4000) {
        let direction = if forward { Direction::Forward } else { Direction::Inverse };
        let word = ConfigWord::new(direction, exponent, scale);

        prop_assert_eq!(word.direction(), direction);
        prop_assert_eq!(word.exponent(), exponent);
        prop_assert_eq!(word.scale_schedule(), scale);
        prop_assert!(word.raw() < (1 << 23));
        prop_assert_eq!(word.raw() & 0xE0, 0, "bits [7:5] are reserved");
    }
}
