pub mod bus;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod error;
pub mod input;
pub mod machine;
pub mod palette;
pub mod psg;
pub mod renderer;
pub mod rom;
pub mod slot;
pub mod sound;
pub mod utils;

pub use bus::MainBoard;
pub use config::MachineConfig;
pub use cpu::{Cpu, Pins, Tick};
pub use error::MachineError;
pub use machine::{Machine, MachineBuilder};
pub use renderer::Renderer;
pub use rom::RomSet;
pub use sound::SoundBoard;
pub use utils::hexdump;
use tracing_subscriber::{fmt, EnvFilter};
use wasm_bindgen::prelude::*;

/// Installs a stdout subscriber for native hosts; `RUST_LOG` overrides
/// `default_filter`.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

pub fn get_machine(rom_blob: &[u8]) -> Result<Machine, MachineError> {
    Ok(MachineBuilder::new().rom_blob(rom_blob)?.build())
}

#[wasm_bindgen(js_name = Machine)]
pub struct JsMachine(Machine);

#[wasm_bindgen(js_class = Machine)]
impl JsMachine {
    #[wasm_bindgen(constructor)]
    pub fn new(rom_blob: &[u8]) -> Result<JsMachine, JsError> {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        Ok(Self(get_machine(rom_blob)?))
    }

    /// Main board bus cycle issued by a host-side CPU core.
    #[wasm_bindgen(js_name = memRead)]
    pub fn mem_read(&mut self, cycles: u32, address: u16) -> u8 {
        self.0.main.tick(cycles, Pins::mem_read(address)).data
    }

    /// Returns whether the NMI line is asserted after the write.
    #[wasm_bindgen(js_name = memWrite)]
    pub fn mem_write(&mut self, cycles: u32, address: u16, data: u8) -> bool {
        self.0.main.tick(cycles, Pins::mem_write(address, data)).nmi
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: String) {
        self.0.key_down(key);
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: String) {
        self.0.key_up(key);
    }

    pub fn reset(&mut self) {
        self.0.reset();
    }

    /// Rebuilds the frame and returns it as RGBA bytes.
    pub fn screen(&mut self) -> Vec<u8> {
        self.0.draw();
        self.0.renderer.rgba()
    }

    #[wasm_bindgen(getter)]
    pub fn palette(&self) -> Vec<u32> {
        self.0.main.palette.colors().to_vec()
    }
}
