use serde::{Deserialize, Serialize};

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Vertical refresh counter driving the main board NMI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VsyncTimer {
    /// Cycles between two refresh interrupts
    period: u32,

    /// Cycles accumulated since the last refresh, always `< period`
    count: u32,

    /// Written through 0xB000; zero disables the NMI
    nmi_mask: u8,
}

impl VsyncTimer {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            count: 0,
            nmi_mask: 0,
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.nmi_mask = 0;
    }

    /// Advance by `cycles` and report whether an NMI should be raised.
    pub fn advance(&mut self, cycles: u32) -> bool {
        let mut total = self.count as u64 + cycles as u64;
        let mut elapsed = false;
        while total >= self.period as u64 {
            total -= self.period as u64;
            elapsed = true;
        }
        self.count = total as u32;

        elapsed && self.nmi_mask != 0
    }

    pub fn set_nmi_mask(&mut self, mask: u8) {
        self.nmi_mask = mask;
    }

    pub fn nmi_mask(&self) -> u8 {
        self.nmi_mask
    }

    pub fn nmi_enabled(&self) -> bool {
        self.nmi_mask != 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

/// Converts host frame time into a CPU tick budget.
///
/// The sub-tick remainder of each conversion and any ticks the CPU ran past
/// its budget are carried into the next frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameClock {
    freq_hz: u32,
    remainder: u64,
    ticks_to_run: u32,
    overrun_ticks: u32,
    total_ticks: u64,
}

impl FrameClock {
    pub fn new(freq_hz: u32) -> Self {
        Self {
            freq_hz,
            remainder: 0,
            ticks_to_run: 0,
            overrun_ticks: 0,
            total_ticks: 0,
        }
    }

    pub fn ticks_to_run(&mut self, micro_seconds: u32) -> u32 {
        let scaled = self.freq_hz as u64 * micro_seconds as u64 + self.remainder;
        self.remainder = scaled % MICROS_PER_SECOND;
        let ticks = (scaled / MICROS_PER_SECOND).min(u32::MAX as u64) as u32;

        let consumed = ticks.min(self.overrun_ticks);
        self.overrun_ticks -= consumed;
        self.ticks_to_run = ticks - consumed;
        self.ticks_to_run
    }

    pub fn ticks_executed(&mut self, ticks: u32) {
        self.total_ticks += ticks as u64;
        if ticks > self.ticks_to_run {
            self.overrun_ticks += ticks - self.ticks_to_run;
        }
    }

    pub fn freq_hz(&self) -> u32 {
        self.freq_hz
    }

    pub fn overrun_ticks(&self) -> u32 {
        self.overrun_ticks
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}
