// SPDX-License-Identifier: Apache-2.0

//! Text fragments spliced into the packaging script.
//!
//! Each builder is a pure function of its arguments. Nothing here checks that
//! names refer to anything real; the vendor tool reports that when the script
//! runs.

use indexmap::IndexMap;

use crate::kernel_config::{ConfigValue, IpCore};

/// Default `FREQ_HZ` advertised for every kernel clock.
pub const DEFAULT_CLOCK_FREQ_HZ: u64 = 250_000_000;

/// Register offsets are written with at least three hex digits.
fn format_offset(offset: u64) -> String {
    format!("0x{offset:03x}")
}

pub fn bus_clock_association(bus_name: &str, bus_type: &str) -> String {
    format!("ipx::associate_bus_interfaces -busif {bus_type}_{bus_name} -clock ap_clk $core\n")
}

/// Infers the clock and reset ports of an additional clock domain, e.g.
/// `ap_clk_2` / `ap_rst_n_2` for postfix `2`.
pub fn extra_clock_interfaces(postfix: &str) -> String {
    format!(
        r#"
::ipx::infer_bus_interface "ap_clk_{postfix}"   "xilinx.com:signal:clock_rtl:1.0" $core
::ipx::infer_bus_interface "ap_rst_n_{postfix}" "xilinx.com:signal:reset_rtl:1.0" $core
"#
    )
}

/// Attaches a user-resolvable `FREQ_HZ` parameter to `ap_clk{postfix}`. The
/// postfix is empty for the primary clock and `_N` otherwise.
pub fn clock_frequency(postfix: &str, freq_hz: u64) -> String {
    format!(
        r#"
# Specify the freq_hz parameter
set clkbif      [::ipx::get_bus_interfaces -of $core "ap_clk{postfix}"]
set clkbifparam [::ipx::add_bus_parameter -quiet "FREQ_HZ" $clkbif]
# Set desired frequency
set_property value {freq_hz} $clkbifparam
# set value_resolve_type 'user' if the frequency can vary.
set_property value_resolve_type user $clkbifparam
# set value_resolve_type 'immediate' if the frequency cannot change.
# set_property value_resolve_type immediate $clkbifparam
"#
    )
}

pub fn create_ip(module_name: &str, core: &IpCore) -> String {
    format!(
        "create_ip -name {} -vendor {} -library ip -version {} -module_name {module_name}\n",
        core.name, core.vendor, core.version
    )
}

/// Sets every configured property on an instantiated IP in one
/// `set_property -dict` call.
pub fn set_ip_properties(module_name: &str, params: &IndexMap<String, ConfigValue>) -> String {
    let mut result = "set_property -dict [list".to_string();
    for (key, value) in params {
        result.push_str(&format!(" {key} {{{value}}}"));
    }
    result.push_str(&format!("] [get_ips {module_name}]\n"));
    result
}

pub fn scalar_register(name: &str, offset: u64, size_bytes: u64) -> String {
    let offset = format_offset(offset);
    format!(
        r#"
set reg [::ipx::add_register -quiet "{name}" $addr_block]
    set_property description    "Kernel parameter {name}" $reg
    set_property address_offset {offset} $reg
    set_property size           [expr {{{size_bytes}*8}}] $reg
"#
    )
}

/// A 64-bit pointer register tied to `bus` through `ASSOCIATED_BUSIF`.
pub fn pointer_register(name: &str, offset: u64, bus: &str) -> String {
    let offset = format_offset(offset);
    format!(
        r#"
set reg [::ipx::add_register -quiet "{name}" $addr_block]
    set_property description    "Kernel parameter {name}" $reg
    set_property address_offset {offset} $reg
    set_property size           [expr {{8*8}}] $reg
    set regparam [::ipx::add_register_parameter -quiet {{ASSOCIATED_BUSIF}} $reg]
    set_property value          {bus} $regparam
"#
    )
}
