use crate::{
    bus::MainBoard,
    clock::FrameClock,
    config::MachineConfig,
    cpu::{Cpu, Tick},
    error::MachineError,
    hexdump,
    renderer::Renderer,
    rom::RomSet,
    sound::SoundBoard,
};

/// The Bomb Jack arcade machine is two computers, the main board and the
/// sound board, plus the video hardware reading the main board's RAM.
pub struct Machine {
    pub main: MainBoard,
    pub sound: SoundBoard,
    pub roms: RomSet,
    pub renderer: Renderer,
    pub main_clock: FrameClock,
    pub sound_clock: FrameClock,
    pub config: MachineConfig,
    pub frames: u64,
}

impl Machine {
    pub fn new(config: MachineConfig, roms: RomSet) -> Self {
        tracing::info!(
            "Initializing Bomb Jack: main {} Hz, sound {} Hz, vsync every {} cycles",
            config.main_clock_hz,
            config.sound_clock_hz,
            config.vsync_period()
        );

        Self {
            main: MainBoard::new(&config, &roms),
            sound: SoundBoard::new(&config, &roms),
            renderer: Renderer::new(),
            main_clock: FrameClock::new(config.main_clock_hz),
            sound_clock: FrameClock::new(config.sound_clock_hz),
            roms,
            config,
            frames: 0,
        }
    }

    pub fn reset(&mut self) {
        self.main.reset();
        self.sound.reset();
        self.main.inputs.reset();
    }

    /// Runs both boards for `micro_seconds` of host time, then rebuilds the
    /// frame buffer.
    pub fn exec<M: Cpu, S: Cpu>(&mut self, main_cpu: &mut M, sound_cpu: &mut S, micro_seconds: u32) {
        let ticks = self.main_clock.ticks_to_run(micro_seconds);
        let executed = run_cpu(main_cpu, &mut self.main, ticks);
        self.main_clock.ticks_executed(executed);

        let ticks = self.sound_clock.ticks_to_run(micro_seconds);
        let executed = run_cpu(sound_cpu, &mut self.sound, ticks);
        self.sound_clock.ticks_executed(executed);

        self.draw();
        self.frames += 1;
        tracing::trace!(
            "Frame {} completed, main ticks: {}",
            self.frames,
            self.main_clock.total_ticks()
        );
    }

    /// Rebuilds the frame buffer from the current video RAM and palette.
    pub fn draw(&mut self) {
        self.renderer.draw(&self.main, self.roms.graphics());
    }

    pub fn screen(&self) -> &[u32] {
        &self.renderer.screen_buffer
    }

    pub fn key_down(&mut self, key: String) {
        self.main.inputs.key_down(key);
    }

    pub fn key_up(&mut self, key: String) {
        self.main.inputs.key_up(key);
    }

    pub fn set_joystick1(&mut self, value: u8) {
        self.main.inputs.joystick1 = value;
    }

    pub fn set_joystick2(&mut self, value: u8) {
        self.main.inputs.joystick2 = value;
    }

    pub fn set_system(&mut self, value: u8) {
        self.main.inputs.system = value;
    }

    pub fn set_dip_switches(&mut self, dsw1: u8, dsw2: u8) {
        self.main.dsw1 = dsw1;
        self.main.dsw2 = dsw2;
    }

    pub fn memory_dump(&self, start: u16, end: u16) -> String {
        let memory: Vec<u8> = (start..=end).map(|addr| self.main.peek(addr)).collect();
        hexdump(&memory, start)
    }
}

fn run_cpu<C: Cpu, B: Tick>(cpu: &mut C, bus: &mut B, ticks: u32) -> u32 {
    let mut executed = 0;
    while executed < ticks {
        let ran = cpu.exec(bus, ticks - executed);
        if ran == 0 {
            break;
        }
        executed += ran;
    }
    executed
}

#[derive(Default)]
pub struct MachineBuilder {
    config: MachineConfig,
    roms: Option<RomSet>,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&mut self, config: MachineConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn roms(&mut self, roms: RomSet) -> &mut Self {
        self.roms = Some(roms);
        self
    }

    pub fn rom_blob(&mut self, blob: &[u8]) -> Result<&mut Self, MachineError> {
        self.roms = Some(RomSet::from_blob(blob)?);
        Ok(self)
    }

    pub fn dip_switches(&mut self, dsw1: u8, dsw2: u8) -> &mut Self {
        self.config.dsw1 = dsw1;
        self.config.dsw2 = dsw2;
        self
    }

    pub fn build(&self) -> Machine {
        let roms = self.roms.clone().unwrap_or_else(|| {
            tracing::warn!("MachineBuilder: no ROM set given, using blank ROMs");
            RomSet::empty()
        });
        Machine::new(self.config.clone(), roms)
    }
}
