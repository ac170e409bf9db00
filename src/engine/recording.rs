//! In-process engine that records what the shell asks of it
//!
//! No instructions are decoded. Memory writes are kept so mappings can be
//! listed, registers are a plain name/value table, and `step` only advances
//! a counter.

use crate::engine::{Engine, MemoryRegion};
use crate::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct RecordingEngine {
    memory: BTreeMap<u64, Vec<u8>>,
    registers: BTreeMap<String, u64>,
    running: bool,
    steps: u64,
    until: Option<u64>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `step` calls since the last `start`
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Stop address given to the last `start`
    pub fn until(&self) -> Option<u64> {
        self.until
    }

    /// Bytes previously written at exactly `address`
    pub fn memory_at(&self, address: u64) -> Option<&[u8]> {
        self.memory.get(&address).map(Vec::as_slice)
    }

    fn is_mapped(&self, address: u64) -> bool {
        self.memory
            .iter()
            .any(|(start, bytes)| address >= *start && address - *start < bytes.len() as u64)
    }
}

impl Engine for RecordingEngine {
    fn start(&mut self, begin: u64, until: Option<u64>) -> EngineResult<()> {
        if !self.is_mapped(begin) {
            return Err(EngineError::Unmapped(begin));
        }
        self.registers.insert("pc".to_string(), begin);
        self.running = true;
        self.steps = 0;
        self.until = until;
        Ok(())
    }

    fn stop(&mut self) -> EngineResult<()> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        self.running = false;
        Ok(())
    }

    fn step(&mut self) -> EngineResult<()> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        self.steps = self.steps.saturating_add(1);
        Ok(())
    }

    fn read_register(&self, name: &str) -> EngineResult<u64> {
        self.registers
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::InvalidRegister(name.to_string()))
    }

    fn write_register(&mut self, name: &str, value: u64) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::InvalidRegister(name.to_string()));
        }
        self.registers.insert(name.to_string(), value);
        Ok(())
    }

    fn write_memory(&mut self, address: u64, bytes: &[u8]) -> EngineResult<()> {
        if address.checked_add(bytes.len() as u64).is_none() {
            return Err(EngineError::OutOfRange {
                address,
                size: bytes.len(),
            });
        }
        let region = MemoryRegion {
            address,
            size: bytes.len(),
        };
        if self.mappings().iter().any(|existing| existing.overlaps(&region)) {
            return Err(EngineError::Overlap {
                address,
                size: bytes.len(),
            });
        }
        self.memory.insert(address, bytes.to_vec());
        Ok(())
    }

    fn mappings(&self) -> Vec<MemoryRegion> {
        self.memory
            .iter()
            .map(|(address, bytes)| MemoryRegion {
                address: *address,
                size: bytes.len(),
            })
            .collect()
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
