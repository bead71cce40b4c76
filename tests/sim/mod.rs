//! Simulated hardware for host tests
//!
//! `SimDma` behaves like an AXI DMA wired in loopback through a streaming
//! core: starting the inbound channel copies the outbound bytes into the
//! destination. Each start raises the channel's scripted interrupt status.
//! Nothing fires on its own; tests play the interrupt context by calling
//! `Engine::on_interrupt` from another thread.

#![allow(dead_code)]

use axi_fft_dma::{
    CacheMaintenance, Channel, Config, DiscreteOutput, Dma, Engine, InterruptController, Irq,
    Rejection, Trigger,
};

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex};

pub const OUTBOUND_LINE: u32 = 62;
pub const INBOUND_LINE: u32 = 61;

fn idx(channel: Channel) -> usize {
    match channel {
        Channel::Outbound => 0,
        Channel::Inbound => 1,
    }
}

/// When a reset finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetLatency {
    /// Done after this many polls report "not yet"
    Polls(u32),
    /// Never done
    Never,
}

#[derive(Debug)]
struct State {
    scatter_gather: bool,
    reset_latency: ResetLatency,
    reset_remaining: Option<u32>,
    /// Status raised when each channel starts
    script: [Irq; 2],
    /// One-shot rejections for each channel
    reject: [Option<Rejection>; 2],
    status: [Irq; 2],
    enabled: [Irq; 2],
    starts: [u32; 2],
    outbound: Option<(usize, usize)>,
    log: Vec<Event>,
}

/// Everything the driver did to the simulated DMA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Reset,
    Start(Channel, usize),
    Rejected(Channel, Rejection),
    Acknowledge(Channel, Irq),
}

pub struct SimDma {
    state: Mutex<State>,
    started: Condvar,
    resets: AtomicU32,
    reset_polls: AtomicU32,
    /// While `true`, `reset` blocks before touching the engine
    reset_gate: Mutex<bool>,
    gate: Condvar,
}

impl SimDma {
    pub fn new() -> Self {
        SimDma {
            state: Mutex::new(State {
                scatter_gather: false,
                reset_latency: ResetLatency::Polls(3),
                reset_remaining: None,
                script: [Irq::COMPLETE, Irq::COMPLETE],
                reject: [None, None],
                status: [Irq::NONE, Irq::NONE],
                enabled: [Irq::NONE, Irq::NONE],
                starts: [0, 0],
                outbound: None,
                log: Vec::new(),
            }),
            started: Condvar::new(),
            resets: AtomicU32::new(0),
            reset_polls: AtomicU32::new(0),
            reset_gate: Mutex::new(false),
            gate: Condvar::new(),
        }
    }

    pub fn with_scatter_gather(self) -> Self {
        self.state.lock().unwrap().scatter_gather = true;
        self
    }

    pub fn set_reset_latency(&self, latency: ResetLatency) {
        self.state.lock().unwrap().reset_latency = latency;
    }

    /// Status raised by every later start of `channel`
    pub fn script(&self, channel: Channel, irq: Irq) {
        self.state.lock().unwrap().script[idx(channel)] = irq;
    }

    /// Refuse the next start of `channel`
    pub fn reject_next(&self, channel: Channel, rejection: Rejection) {
        self.state.lock().unwrap().reject[idx(channel)] = Some(rejection);
    }

    /// Assert `irq` in the status of `channel`, as if the hardware raised it
    pub fn raise(&self, channel: Channel, irq: Irq) {
        let mut state = self.state.lock().unwrap();
        let status = state.status[idx(channel)];
        state.status[idx(channel)] = status | irq;
    }

    pub fn status(&self, channel: Channel) -> Irq {
        self.state.lock().unwrap().status[idx(channel)]
    }

    pub fn enabled(&self, channel: Channel) -> Irq {
        self.state.lock().unwrap().enabled[idx(channel)]
    }

    pub fn starts(&self, channel: Channel) -> u32 {
        self.state.lock().unwrap().starts[idx(channel)]
    }

    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn reset_polls(&self) -> u32 {
        self.reset_polls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().log.clone()
    }

    /// Make later resets block until [`open_resets`](SimDma::open_resets)
    pub fn hold_resets(&self) {
        *self.reset_gate.lock().unwrap() = true;
    }

    pub fn open_resets(&self) {
        *self.reset_gate.lock().unwrap() = false;
        self.gate.notify_all();
    }

    /// Block until `channel` has started `count` transfers
    pub fn wait_for_start(&self, channel: Channel, count: u32) {
        let state = self.state.lock().unwrap();
        let _state = self
            .started
            .wait_while(state, |state| state.starts[idx(channel)] < count)
            .unwrap();
    }
}

unsafe impl Dma for SimDma {
    fn has_scatter_gather(&self) -> bool {
        self.state.lock().unwrap().scatter_gather
    }

    fn reset(&self) {
        let held = self.reset_gate.lock().unwrap();
        drop(self.gate.wait_while(held, |held| *held).unwrap());
        self.resets.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.reset_remaining = match state.reset_latency {
            ResetLatency::Polls(polls) => Some(polls),
            ResetLatency::Never => None,
        };
        state.enabled = [Irq::NONE, Irq::NONE];
        state.outbound = None;
        state.log.push(Event::Reset);
    }

    fn is_reset_done(&self) -> bool {
        self.reset_polls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        match state.reset_remaining {
            Some(0) => true,
            Some(remaining) => {
                state.reset_remaining = Some(remaining - 1);
                false
            }
            None => false,
        }
    }

    fn enable_interrupts(&self, channel: Channel, irq: Irq) {
        let mut state = self.state.lock().unwrap();
        let enabled = state.enabled[idx(channel)];
        state.enabled[idx(channel)] = enabled | irq;
    }

    fn disable_interrupts(&self, channel: Channel, irq: Irq) {
        let mut state = self.state.lock().unwrap();
        let enabled = state.enabled[idx(channel)];
        state.enabled[idx(channel)] = Irq::from_bits(enabled.bits() & !irq.bits());
    }

    fn interrupt_status(&self, channel: Channel) -> Irq {
        self.state.lock().unwrap().status[idx(channel)]
    }

    fn acknowledge(&self, channel: Channel, irq: Irq) {
        let mut state = self.state.lock().unwrap();
        let status = state.status[idx(channel)];
        state.status[idx(channel)] = Irq::from_bits(status.bits() & !irq.bits());
        state.log.push(Event::Acknowledge(channel, irq));
    }

    unsafe fn start_transfer(
        &self,
        channel: Channel,
        address: usize,
        bytes: usize,
    ) -> Result<(), Rejection> {
        let mut state = self.state.lock().unwrap();
        if let Some(rejection) = state.reject[idx(channel)].take() {
            state.log.push(Event::Rejected(channel, rejection));
            return Err(rejection);
        }

        match channel {
            Channel::Outbound => state.outbound = Some((address, bytes)),
            Channel::Inbound => {
                if let Some((source, len)) = state.outbound.take() {
                    // Loopback: the core streams its input straight back.
                    std::ptr::copy_nonoverlapping(
                        source as *const u8,
                        address as *mut u8,
                        len.min(bytes),
                    );
                }
            }
        }

        let raised = state.script[idx(channel)];
        let status = state.status[idx(channel)];
        state.status[idx(channel)] = status | raised;
        state.starts[idx(channel)] += 1;
        state.log.push(Event::Start(channel, bytes));
        drop(state);
        self.started.notify_all();
        Ok(())
    }
}

/// A recording interrupt controller
#[derive(Debug, Default)]
pub struct SimIntc {
    pub configured: Vec<(u32, u8, Trigger)>,
    pub connected: Vec<(u32, Channel)>,
    pub enabled: Vec<u32>,
    /// Refuse to connect this line
    pub refuse: Option<u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Refused(pub u32);

impl InterruptController for SimIntc {
    type Error = Refused;
    fn configure(&mut self, line: u32, priority: u8, trigger: Trigger) -> Result<(), Refused> {
        self.configured.push((line, priority, trigger));
        Ok(())
    }
    fn connect(&mut self, line: u32, channel: Channel) -> Result<(), Refused> {
        if self.refuse == Some(line) {
            return Err(Refused(line));
        }
        self.connected.push((line, channel));
        Ok(())
    }
    fn enable(&mut self, line: u32) {
        self.enabled.push(line);
    }
    fn disable(&mut self, line: u32) {
        self.enabled.retain(|&enabled| enabled != line);
    }
}

/// A recording cache
#[derive(Debug, Default)]
pub struct SimCache {
    flushes: Mutex<Vec<(usize, usize)>>,
}

impl SimCache {
    pub fn flushes(&self) -> Vec<(usize, usize)> {
        self.flushes.lock().unwrap().clone()
    }
}

impl CacheMaintenance for SimCache {
    fn flush(&self, address: usize, bytes: usize) {
        self.flushes.lock().unwrap().push((address, bytes));
    }
}

/// A recording configuration port
#[derive(Debug, Default)]
pub struct SimGpio {
    writes: Mutex<Vec<u32>>,
}

impl SimGpio {
    pub fn writes(&self) -> Vec<u32> {
        self.writes.lock().unwrap().clone()
    }
}

impl DiscreteOutput for SimGpio {
    fn write(&self, value: u32) {
        self.writes.lock().unwrap().push(value);
    }
}

pub type SimEngine<'a> = Engine<&'a SimDma, SimIntc, &'a SimCache>;

pub fn config() -> Config {
    Config::new(OUTBOUND_LINE, INBOUND_LINE)
}

pub fn engine<'a>(dma: &'a SimDma, cache: &'a SimCache) -> SimEngine<'a> {
    Engine::new(dma, SimIntc::default(), cache, config()).expect("engine bring-up")
}

/// Play the interrupt context for one transfer
///
/// Waits until the inbound channel has started `count` transfers, then
/// runs the handlers in `order`.
pub fn fire<D: Dma, I: InterruptController, C: CacheMaintenance>(
    engine: &Engine<D, I, C>,
    dma: &SimDma,
    count: u32,
    order: &[Channel],
) {
    dma.wait_for_start(Channel::Inbound, count);
    for &channel in order {
        engine.on_interrupt(channel);
    }
}
