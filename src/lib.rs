// SPDX-License-Identifier: Apache-2.0

//! Generates the TCL script that packages an RTL kernel into an XO archive.
//!
//! The kernel is described by a JSON document (see [`KernelConfig`]); the
//! script lays out the kernel's control register space and wires up its bus
//! interfaces, clocks and IP sub-cores.
//!
//! ```
//! use kernelpack::{generate_from_config, KernelConfig};
//!
//! let config = KernelConfig::from_json_str(
//!     r#"{"buses": {"m_axi_gmem": ["m_axi", null]},
//!         "params": {"scalars": {"n": 32}, "memory": {"in": "m_axi_gmem"}}}"#,
//! )
//! .unwrap();
//! let script = generate_from_config(&config);
//! assert!(script.contains("set_property address_offset 0x018 $reg"));
//! ```

pub mod address_map;
pub mod kernel_config;
pub mod kernelpack_error;
pub mod package_script;
pub mod tcl_fragments;

pub use address_map::{AddressMap, Register, RegisterKind};
pub use kernel_config::KernelConfig;
pub use kernelpack_error::KernelPackError;
pub use package_script::{generate_from_config, generate_package_script, PackageOptions};
