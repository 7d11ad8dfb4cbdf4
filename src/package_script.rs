// SPDX-License-Identifier: Apache-2.0

//! Assembles the complete packaging script.
//!
//! The script expects seven positional arguments when run by the vendor tool:
//!
//! ```text
//! <xoname> <kernel_name> <build_dir> <rtl_src_dir> <library_dir> <generate_dir> <board_part>
//! ```
//!
//! Sections are emitted in a fixed order: IP sub-cores while the project is
//! being built, then bus/clock associations, extra clock domains, clock
//! frequencies, the control register block and finally the user parameter
//! registers.

use crate::address_map::{AddressMap, RegisterKind};
use crate::kernel_config::KernelConfig;
use crate::tcl_fragments::{
    bus_clock_association, clock_frequency, create_ip, extra_clock_interfaces, pointer_register,
    scalar_register, set_ip_properties, DEFAULT_CLOCK_FREQ_HZ,
};

/// Knobs that are not part of the kernel description itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// `FREQ_HZ` advertised on every kernel clock.
    pub clock_freq_hz: u64,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            clock_freq_hz: DEFAULT_CLOCK_FREQ_HZ,
        }
    }
}

/// Pre-rendered text for each variable section of the script.
#[derive(Debug, Default)]
struct ScriptSections {
    ip_cores: String,
    bus_clocks: String,
    extra_clocks: String,
    clock_frequencies: String,
    scalar_registers: String,
    pointer_registers: String,
}

fn render_ip_cores(config: &KernelConfig) -> String {
    let mut result = String::new();
    for (module_name, core) in &config.ip_cores {
        result.push_str(&create_ip(module_name, core));
        if !core.params.is_empty() {
            result.push_str(&set_ip_properties(module_name, &core.params));
        }
    }
    if !result.is_empty() {
        result.push_str("generate_target all [get_ips]\n");
    }
    result
}

fn render_bus_clocks(config: &KernelConfig) -> String {
    config
        .bus_instances()
        .into_iter()
        .map(|(name, spec)| bus_clock_association(&name, &spec.bus_type))
        .collect()
}

/// Clock domains past the primary one are numbered from 2.
fn extra_clock_numbers(config: &KernelConfig) -> std::ops::RangeInclusive<u32> {
    2..=config.clock_count()
}

fn render_extra_clocks(config: &KernelConfig) -> String {
    extra_clock_numbers(config)
        .map(|n| extra_clock_interfaces(&n.to_string()))
        .collect()
}

fn render_clock_frequencies(config: &KernelConfig, options: &PackageOptions) -> String {
    let mut result = clock_frequency("", options.clock_freq_hz);
    for n in extra_clock_numbers(config) {
        result.push_str(&clock_frequency(&format!("_{n}"), options.clock_freq_hz));
    }
    result
}

impl ScriptSections {
    fn from_config(config: &KernelConfig, options: &PackageOptions) -> Self {
        let address_map = AddressMap::allocate(&config.params);
        let mut sections = ScriptSections {
            ip_cores: render_ip_cores(config),
            bus_clocks: render_bus_clocks(config),
            extra_clocks: render_extra_clocks(config),
            clock_frequencies: render_clock_frequencies(config, options),
            ..Default::default()
        };
        for register in address_map.scalars() {
            sections.scalar_registers.push_str(&scalar_register(
                &register.name,
                register.offset,
                register.size_bytes,
            ));
        }
        for register in address_map.pointers() {
            if let RegisterKind::Pointer { bus } = &register.kind {
                sections
                    .pointer_registers
                    .push_str(&pointer_register(&register.name, register.offset, bus));
            }
        }
        sections
    }

    fn render(&self) -> String {
        let ScriptSections {
            ip_cores,
            bus_clocks,
            extra_clocks,
            clock_frequencies,
            scalar_registers,
            pointer_registers,
        } = self;
        format!(
            r#"
#
# Argument parsing
#
if {{ $::argc != 7 }} {{
    puts "Error: Program \"$::argv0\" requires 7 arguments.\n"
    puts "Usage: $::argv0 <xoname> <kernel_name> <build_dir> <rtl_src_dir> <library_dir> <generate_dir> <board_part>\n"
    exit
}}

set xoname      [lindex $::argv 0]
set kernel_name [lindex $::argv 1]
set build_dir   [lindex $::argv 2]
set src_dir     [lindex $::argv 3]
set lib_dir     [lindex $::argv 4]
set gen_dir     [lindex $::argv 5]
set board_part  [lindex $::argv 6]

set tmp_dir "$build_dir/tmp"
set pkg_dir "$build_dir/pkg"

#
# Build the kernel
#
create_project kernel_packing $tmp_dir -part $board_part -force
add_files [glob $src_dir/*.*v $lib_dir/*.*v $gen_dir/*.*v]
{ip_cores}
update_compile_order -fileset sources_1
update_compile_order -fileset sim_1
set_property top $kernel_name [current_fileset]
set_property top_file {{$src_dir/$kernel_name}} [current_fileset]
set_msg_config -id "HDL" -new_severity "ERROR"
check_syntax
reset_msg_config -id "HDL" -default_severity
ipx::package_project -root_dir $pkg_dir -vendor xilinx.com -library RTLKernel -taxonomy /KernelIP -import_files -set_current false
ipx::unload_core $pkg_dir/component.xml
ipx::edit_ip_in_project -upgrade true -name tmp_project -directory $pkg_dir $pkg_dir/component.xml

set core [ipx::current_core]

set_property core_revision 2 $core
foreach up [ipx::get_user_parameters] {{
    ipx::remove_user_parameter [get_property NAME $up] $core
}}
ipx::associate_bus_interfaces -busif s_axi_control -clock ap_clk $core
{bus_clocks}
{extra_clocks}
{clock_frequencies}
set mem_map    [::ipx::add_memory_map -quiet "s_axi_control" $core]
set addr_block [::ipx::add_address_block -quiet "reg0" $mem_map]

# Set the control registers
set reg [::ipx::add_register "CTRL" $addr_block]
    set_property description          "Control signals" $reg
    set_property address_offset       0x000             $reg
    set_property size                 32                $reg
set field [ipx::add_field AP_START $reg]
    set_property ACCESS               {{read-write}}                              $field
    set_property BIT_OFFSET           {{0}}                                       $field
    set_property BIT_WIDTH            {{1}}                                       $field
    set_property DESCRIPTION          {{Control signal Register for 'ap_start'.}} $field
    set_property MODIFIED_WRITE_VALUE {{modify}}                                  $field
set field [ipx::add_field AP_DONE $reg]
    set_property ACCESS               {{read-only}}                              $field
    set_property BIT_OFFSET           {{1}}                                      $field
    set_property BIT_WIDTH            {{1}}                                      $field
    set_property DESCRIPTION          {{Control signal Register for 'ap_done'.}} $field
    set_property READ_ACTION          {{modify}}                                 $field
set field [ipx::add_field AP_IDLE $reg]
    set_property ACCESS               {{read-only}}                              $field
    set_property BIT_OFFSET           {{2}}                                      $field
    set_property BIT_WIDTH            {{1}}                                      $field
    set_property DESCRIPTION          {{Control signal Register for 'ap_idle'.}} $field
    set_property READ_ACTION          {{modify}}                                 $field
set field [ipx::add_field AP_READY $reg]
    set_property ACCESS               {{read-only}}                               $field
    set_property BIT_OFFSET           {{3}}                                       $field
    set_property BIT_WIDTH            {{1}}                                       $field
    set_property DESCRIPTION          {{Control signal Register for 'ap_ready'.}} $field
    set_property READ_ACTION          {{modify}}                                  $field
set field [ipx::add_field AP_RESERVED_1 $reg]
    set_property ACCESS               {{read-only}}              $field
    set_property BIT_OFFSET           {{4}}                      $field
    set_property BIT_WIDTH            {{3}}                      $field
    set_property DESCRIPTION          {{Reserved.  0s on read.}} $field
    set_property READ_ACTION          {{modify}}                 $field
set field [ipx::add_field AUTO_RESTART $reg]
    set_property ACCESS               {{read-write}}                                  $field
    set_property BIT_OFFSET           {{7}}                                           $field
    set_property BIT_WIDTH            {{1}}                                           $field
    set_property DESCRIPTION          {{Control signal Register for 'auto_restart'.}} $field
    set_property MODIFIED_WRITE_VALUE {{modify}}                                      $field
set field [ipx::add_field RESERVED_2 $reg]
    set_property ACCESS               {{read-only}}              $field
    set_property BIT_OFFSET           {{8}}                      $field
    set_property BIT_WIDTH            {{24}}                     $field
    set_property DESCRIPTION          {{Reserved.  0s on read.}} $field
    set_property READ_ACTION          {{modify}}                 $field

# Set the interrupt registers
set reg [::ipx::add_register "GIER" $addr_block]
    set_property description    "Global Interrupt Enable Register" $reg
    set_property address_offset 0x004                              $reg
    set_property size           32                                 $reg
set reg [::ipx::add_register "IP_IER" $addr_block]
    set_property description    "IP Interrupt Enable Register" $reg
    set_property address_offset 0x008                          $reg
    set_property size           32                             $reg
set reg [::ipx::add_register "IP_ISR" $addr_block]
    set_property description    "IP Interrupt Status Register" $reg
    set_property address_offset 0x00C                          $reg
    set_property size           32                             $reg

# Set the IP registers of the core
{scalar_registers}

{pointer_registers}

set_property slave_memory_map_ref "s_axi_control" [::ipx::get_bus_interfaces -of $core "s_axi_control"]

# Set the final project properties
set_property xpm_libraries             {{XPM_CDC XPM_MEMORY XPM_FIFO}} $core
set_property sdx_kernel                true                          $core
set_property sdx_kernel_type           rtl                           $core
set_property supported_families        {{ }}                           $core
set_property auto_family_support_level level_2                       $core

# Save and close the project
ipx::create_xgui_files       $core
ipx::update_checksums        $core
ipx::check_integrity -kernel $core
ipx::save_core               $core
close_project

#
# Package the kernel
#
package_xo -xo_path ${{xoname}} -kernel_name $kernel_name -ip_directory $pkg_dir -force
"#
        )
    }
}

/// Generates the packaging script for `config`.
pub fn generate_package_script(config: &KernelConfig, options: &PackageOptions) -> String {
    log::info!(
        "generate_package_script; unroll: {} clocks: {} freq_hz: {}",
        config.unroll_factor(),
        config.clock_count(),
        options.clock_freq_hz
    );
    ScriptSections::from_config(config, options).render()
}

/// Generates the packaging script with default options.
pub fn generate_from_config(config: &KernelConfig) -> String {
    generate_package_script(config, &PackageOptions::default())
}
