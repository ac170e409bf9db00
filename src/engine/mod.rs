//! Emulation engine collaborator
//!
//! The dispatcher never looks inside the engine. It only owns an
//! [`EmulatorHandle`] built from an (architecture, mode) pair and hands it to
//! command handlers that need it.

pub mod recording;

pub use recording::RecordingEngine;

use crate::error::EngineResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CPU architecture the engine is opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86,
    Arm,
    Arm64,
    Mips,
    Sparc,
    Ppc,
    M68k,
    Riscv,
}

/// Engine mode (word size, instruction set or endianness)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
pub enum Mode {
    #[value(name = "16")]
    #[serde(rename = "16")]
    Bits16,
    #[value(name = "32")]
    #[serde(rename = "32")]
    Bits32,
    #[value(name = "64")]
    #[serde(rename = "64")]
    Bits64,
    #[value(name = "arm")]
    #[serde(rename = "arm")]
    Arm,
    #[value(name = "thumb")]
    #[serde(rename = "thumb")]
    Thumb,
    #[value(name = "mips32")]
    #[serde(rename = "mips32")]
    Mips32,
    #[value(name = "mips64")]
    #[serde(rename = "mips64")]
    Mips64,
    #[value(name = "little-endian")]
    #[serde(rename = "little-endian")]
    LittleEndian,
    #[value(name = "big-endian")]
    #[serde(rename = "big-endian")]
    BigEndian,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Arch as ValueEnum>::from_str(s, true)
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Mode as ValueEnum>::from_str(s, true)
    }
}

/// A contiguous block of memory written into the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub address: u64,
    pub size: usize,
}

impl MemoryRegion {
    /// One past the last address of the region, saturating at `u64::MAX`
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.size as u64)
    }

    /// Whether two regions share at least one byte
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.address < other.end() && other.address < self.end()
    }
}

/// Operations the debugger shell needs from an emulation engine
pub trait Engine {
    /// Start emulation at `begin`, optionally stopping at `until`
    fn start(&mut self, begin: u64, until: Option<u64>) -> EngineResult<()>;

    /// Stop a running emulation
    fn stop(&mut self) -> EngineResult<()>;

    /// Execute a single instruction
    fn step(&mut self) -> EngineResult<()>;

    /// Read a register by name
    fn read_register(&self, name: &str) -> EngineResult<u64>;

    /// Write a register by name
    fn write_register(&mut self, name: &str, value: u64) -> EngineResult<()>;

    /// Copy `bytes` into engine memory at `address`
    fn write_memory(&mut self, address: u64, bytes: &[u8]) -> EngineResult<()>;

    /// Regions currently mapped, ordered by address
    fn mappings(&self) -> Vec<MemoryRegion>;

    /// Whether emulation is currently running
    fn is_running(&self) -> bool;
}

/// The session's engine instance together with the pair it was opened for
pub struct EmulatorHandle {
    arch: Arch,
    mode: Mode,
    engine: Box<dyn Engine>,
}

impl EmulatorHandle {
    /// Open a handle backed by the in-process recording engine
    pub fn open(arch: Arch, mode: Mode) -> Self {
        log::debug!("Opening emulator for {}/{}", arch, mode);
        Self::with_engine(arch, mode, Box::new(RecordingEngine::new()))
    }

    /// Wrap an already constructed engine
    pub fn with_engine(arch: Arch, mode: Mode, engine: Box<dyn Engine>) -> Self {
        EmulatorHandle { arch, mode, engine }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn Engine {
        self.engine.as_mut()
    }
}

impl fmt::Debug for EmulatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmulatorHandle")
            .field("arch", &self.arch)
            .field("mode", &self.mode)
            .field("running", &self.engine.is_running())
            .finish()
    }
}
