// SPDX-License-Identifier: Apache-2.0

//! Layout of the kernel's `s_axi_control` register space.
//!
//! The first 0x10 bytes hold the fixed control and interrupt registers. User
//! parameters follow, scalars first then pointers, each in document order.
//! Every register is followed by a 4-byte gap. Offsets are tracked as `u64`
//! so any accepted width lays out without wrapping; whether the result fits
//! the 32-bit control space is checked by `KernelConfig::validate`.

use serde::Serialize;

use crate::kernel_config::KernelParams;

/// Offset of the first user parameter register.
pub const USER_REGISTER_BASE: u64 = 0x10;

/// Bytes left unused after every user register.
pub const REGISTER_GAP_BYTES: u64 = 4;

/// Pointers are always 64 bits wide, whatever the bus data width.
pub const POINTER_BYTES: u64 = 8;

/// Registers every kernel carries ahead of the user parameters:
/// `(name, offset, description)`.
pub const CONTROL_REGISTERS: [(&str, u64, &str); 4] = [
    ("CTRL", 0x000, "Control signals"),
    ("GIER", 0x004, "Global Interrupt Enable Register"),
    ("IP_IER", 0x008, "IP Interrupt Enable Register"),
    ("IP_ISR", 0x00C, "IP Interrupt Status Register"),
];

/// Size of the `s_axi_control` address space; every register must end at or
/// below this offset.
pub const CONTROL_SPACE_BYTES: u64 = 1 << 32;

/// Running byte-offset counter for user registers.
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    next: u64,
}

impl Default for AddressAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressAllocator {
    pub fn new() -> Self {
        Self {
            next: USER_REGISTER_BASE,
        }
    }

    /// Returns the offset for a register of `size_bytes` and bumps the counter
    /// past it and the trailing gap.
    pub fn allocate(&mut self, size_bytes: u64) -> u64 {
        let offset = self.next;
        self.next += size_bytes + REGISTER_GAP_BYTES;
        offset
    }

    /// The offset the next allocation would receive.
    pub fn next_offset(&self) -> u64 {
        self.next
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegisterKind {
    Scalar,
    Pointer { bus: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Register {
    pub name: String,
    pub offset: u64,
    pub size_bytes: u64,
    #[serde(flatten)]
    pub kind: RegisterKind,
}

impl Register {
    pub fn size_bits(&self) -> u64 {
        self.size_bytes * 8
    }

    /// First byte past the register, not counting the trailing gap.
    pub fn end(&self) -> u64 {
        self.offset + self.size_bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMap {
    registers: Vec<Register>,
    end_offset: u64,
}

impl AddressMap {
    pub fn allocate(params: &KernelParams) -> Self {
        let mut allocator = AddressAllocator::new();
        let mut registers = Vec::with_capacity(params.scalars.len() + params.memory.len());
        for (name, size_bits) in &params.scalars {
            // Widths that are not whole bytes truncate.
            let size_bytes = u64::from(size_bits / 8);
            let offset = allocator.allocate(size_bytes);
            log::debug!("scalar `{name}`: offset {offset:#x} size {size_bytes} bytes");
            registers.push(Register {
                name: name.clone(),
                offset,
                size_bytes,
                kind: RegisterKind::Scalar,
            });
        }
        for (name, bus) in &params.memory {
            let offset = allocator.allocate(POINTER_BYTES);
            log::debug!("pointer `{name}`: offset {offset:#x} bus {bus}");
            registers.push(Register {
                name: name.clone(),
                offset,
                size_bytes: POINTER_BYTES,
                kind: RegisterKind::Pointer { bus: bus.clone() },
            });
        }
        AddressMap {
            registers,
            end_offset: allocator.next_offset(),
        }
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    pub fn scalars(&self) -> impl Iterator<Item = &Register> {
        self.registers
            .iter()
            .filter(|r| r.kind == RegisterKind::Scalar)
    }

    pub fn pointers(&self) -> impl Iterator<Item = &Register> {
        self.registers
            .iter()
            .filter(|r| matches!(r.kind, RegisterKind::Pointer { .. }))
    }

    /// First offset past the last register and its gap.
    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    /// First byte past the last register, ignoring its gap. This is what has
    /// to fit in `CONTROL_SPACE_BYTES`.
    pub fn last_register_end(&self) -> u64 {
        self.registers
            .last()
            .map_or(USER_REGISTER_BASE, Register::end)
    }
}
