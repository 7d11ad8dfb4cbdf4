// SPDX-License-Identifier: Apache-2.0

//! Typed view of the JSON kernel description.
//!
//! Every mapping is an `IndexMap` so that iteration follows document order:
//! both the register layout and the generated script depend on it.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::address_map::{AddressMap, CONTROL_SPACE_BYTES};
use crate::KernelPackError;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex should compile")
});

/// A loosely-typed leaf value from the configuration (IP versions, IP
/// property values) that is spliced into the script as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ConfigValue(pub serde_json::Value);

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => write!(f, "{s}"),
            serde_json::Value::Null => Ok(()),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(serde_json::Value::String(s.to_string()))
    }
}

/// A bus entry, written in the document as a `[bus_type, detail]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BusSpec {
    /// Interface type prefix, e.g. `m_axi` or `axis`.
    pub bus_type: String,
    /// Second element of the pair; not interpreted.
    #[serde(default)]
    pub detail: serde_json::Value,
}

/// A vendor IP sub-core instantiated into the packing project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IpCore {
    pub name: String,
    pub vendor: String,
    pub version: ConfigValue,
    #[serde(default)]
    pub params: IndexMap<String, ConfigValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KernelParams {
    /// Scalar parameter name to bit width.
    #[serde(default)]
    pub scalars: IndexMap<String, u32>,
    /// Pointer parameter name to the bus it addresses.
    #[serde(default)]
    pub memory: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KernelConfig {
    pub unroll: Option<u32>,
    pub buses: IndexMap<String, BusSpec>,
    pub clocks: Option<u32>,
    #[serde(default)]
    pub ip_cores: IndexMap<String, IpCore>,
    pub params: KernelParams,
}

fn check_identifier(what: &str, name: &str, problems: &mut Vec<String>) {
    if !IDENTIFIER_RE.is_match(name) {
        problems.push(format!("{what} name `{name}` is not a valid identifier"));
    }
}

impl KernelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, KernelPackError> {
        let config: KernelConfig = serde_json::from_str(json)?;
        log::debug!(
            "parsed kernel config; buses: {} scalars: {} pointers: {} ip cores: {}",
            config.buses.len(),
            config.params.scalars.len(),
            config.params.memory.len(),
            config.ip_cores.len()
        );
        Ok(config)
    }

    pub fn unroll_factor(&self) -> u32 {
        self.unroll.unwrap_or(1)
    }

    /// Number of clock domains including the primary `ap_clk`.
    pub fn clock_count(&self) -> u32 {
        self.clocks.unwrap_or(1)
    }

    /// Expands the declared buses into the interface instances the kernel
    /// exposes: one per bus, or `unroll` of them suffixed `_0.._{n-1}` when
    /// the kernel is unrolled.
    pub fn bus_instances(&self) -> Vec<(String, &BusSpec)> {
        let unroll = self.unroll_factor();
        let mut instances = Vec::new();
        for (name, spec) in &self.buses {
            if unroll > 1 {
                for i in 0..unroll {
                    instances.push((format!("{name}_{i}"), spec));
                }
            } else {
                instances.push((name.clone(), spec));
            }
        }
        instances
    }

    /// All spellings a memory parameter may use to name one of the declared
    /// buses.
    fn known_bus_references(&self) -> HashSet<String> {
        let unroll = self.unroll_factor();
        let mut known = HashSet::new();
        for (name, spec) in &self.buses {
            for base in [name.clone(), format!("{}_{}", spec.bus_type, name)] {
                if unroll > 1 {
                    for i in 0..unroll {
                        known.insert(format!("{base}_{i}"));
                    }
                }
                known.insert(base);
            }
        }
        known
    }

    /// Checks the cross-field consistency that generation itself never looks
    /// at. All problems are reported together.
    pub fn validate(&self) -> Result<(), KernelPackError> {
        let mut problems = Vec::new();
        if self.unroll == Some(0) {
            problems.push("`unroll` must be at least 1".to_string());
        }
        if self.clocks == Some(0) {
            problems.push("`clocks` must be at least 1".to_string());
        }
        for (name, spec) in &self.buses {
            check_identifier("bus", name, &mut problems);
            check_identifier("bus type", &spec.bus_type, &mut problems);
        }
        for module_name in self.ip_cores.keys() {
            check_identifier("IP module", module_name, &mut problems);
        }
        for (name, bits) in &self.params.scalars {
            check_identifier("scalar parameter", name, &mut problems);
            if *bits == 0 || bits % 8 != 0 {
                problems.push(format!(
                    "scalar parameter `{name}` has width {bits}; widths must be a non-zero multiple of 8"
                ));
            }
        }
        let known_buses = self.known_bus_references();
        for (name, bus) in &self.params.memory {
            check_identifier("memory parameter", name, &mut problems);
            if self.params.scalars.contains_key(name) {
                problems.push(format!(
                    "parameter `{name}` is declared both as a scalar and as a memory pointer"
                ));
            }
            if !known_buses.contains(bus) {
                problems.push(format!(
                    "memory parameter `{name}` references undeclared bus `{bus}`"
                ));
            }
        }
        let register_end = AddressMap::allocate(&self.params).last_register_end();
        if register_end > CONTROL_SPACE_BYTES {
            problems.push(format!(
                "parameter registers end at {register_end:#x}, past the {CONTROL_SPACE_BYTES:#x}-byte control address space"
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(KernelPackError(problems.join("; ")))
        }
    }
}
