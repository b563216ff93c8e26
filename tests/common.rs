#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use embedded_storage::{ReadStorage, Storage};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

pub const CAPACITY: usize = 1024;

/// Byte addressable mock EEPROM. Clones share the same cells, which allows several allocator
/// instances on one device and inspecting the cells while an instance owns a handle.
#[derive(Clone)]
pub struct Eeprom {
    inner: Rc<RefCell<Cells>>,
}

pub struct Cells {
    pub buf: Vec<u8>,
    pub fail_after_operation: usize,
    pub operations: Vec<Operation>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Read { offset: u32, len: usize },
    Write { offset: u32, len: usize },
}

impl Eeprom {
    pub fn new(size: usize) -> Self {
        Self::new_with_fault(size, usize::MAX)
    }

    pub fn new_with_fault(size: usize, fail_after_operation: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Cells {
                buf: vec![0u8; size],
                fail_after_operation,
                operations: vec![],
            })),
        }
    }

    pub fn cells(&self) -> Ref<'_, Cells> {
        self.inner.borrow()
    }

    pub fn cells_mut(&self) -> RefMut<'_, Cells> {
        self.inner.borrow_mut()
    }

    pub fn bytes(&self, from: usize, to: usize) -> Vec<u8> {
        self.cells().buf[from..to].to_vec()
    }

    pub fn set_bytes(&self, offset: usize, bytes: &[u8]) {
        self.cells_mut().buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn writes(&self) -> Vec<u32> {
        self.cells()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Write { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.cells()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Read { .. }))
            .count()
    }

    pub fn clear_operations(&self) {
        self.cells_mut().operations.clear();
    }

    pub fn fail_after(&self, operations: usize) {
        let mut cells = self.cells_mut();
        cells.fail_after_operation = cells.operations.len() + operations;
    }

    pub fn disable_faults(&self) {
        self.cells_mut().fail_after_operation = usize::MAX;
    }

    pub fn dump_operations(&self) {
        println!("Operations:");
        for op in &self.cells().operations {
            println!("  {:?}", op);
        }
    }
}

#[derive(Debug)]
pub struct EepromError;

impl ReadStorage for Eeprom {
    type Error = EepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let mut cells = self.cells_mut();
        if cells.operations.len() >= cells.fail_after_operation {
            println!("    eeprom: FAULT");
            return Err(EepromError);
        }
        cells.operations.push(Operation::Read {
            offset,
            len: bytes.len(),
        });

        let offset = offset as usize;
        bytes.copy_from_slice(&cells.buf[offset..offset + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.cells().buf.len()
    }
}

impl Storage for Eeprom {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        // the allocator never batches bytes
        assert_eq!(bytes.len(), 1);

        let mut cells = self.cells_mut();
        println!(
            "    eeprom: write: 0x{offset:04X} = 0x{:02X} #{:>3}",
            bytes[0],
            cells.operations.len()
        );
        if cells.operations.len() >= cells.fail_after_operation {
            println!("    eeprom: FAULT");
            return Err(EepromError);
        }
        cells.operations.push(Operation::Write {
            offset,
            len: bytes.len(),
        });

        let offset = offset as usize;
        cells.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}
