// SPDX-License-Identifier: Apache-2.0

//! `address-map`: dumps the register layout the packaging script declares, so
//! host code can be checked against it.

use clap::ArgMatches;
use kernelpack::address_map::CONTROL_REGISTERS;
use kernelpack::{AddressMap, Register};
use serde::Serialize;

use crate::common::read_kernel_config;
use crate::driver_config::{get_strict, PackageSettings};
use crate::report_cli_error::report_error_chain_and_exit;

/// The control and interrupt registers are all 32 bits wide.
const CONTROL_REGISTER_BYTES: u64 = 4;

#[derive(Serialize)]
struct ControlRegisterRecord {
    name: &'static str,
    offset: u64,
    size_bytes: u64,
    description: &'static str,
}

#[derive(Serialize)]
struct AddressMapReport<'a> {
    control: Vec<ControlRegisterRecord>,
    registers: &'a [Register],
    end_offset: u64,
}

fn build_report(address_map: &AddressMap) -> AddressMapReport<'_> {
    AddressMapReport {
        control: CONTROL_REGISTERS
            .iter()
            .map(|&(name, offset, description)| ControlRegisterRecord {
                name,
                offset,
                size_bytes: CONTROL_REGISTER_BYTES,
                description,
            })
            .collect(),
        registers: address_map.registers(),
        end_offset: address_map.end_offset(),
    }
}

fn render_report(address_map: &AddressMap) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&build_report(address_map))?)
}

pub fn handle_address_map(matches: &ArgMatches, settings: &Option<PackageSettings>) {
    log::info!("handle_address_map");
    let config_path = matches
        .get_one::<String>("config")
        .expect("config is required");
    let config = read_kernel_config(config_path, get_strict(matches, settings), "address-map");
    let address_map = AddressMap::allocate(&config.params);
    match render_report(&address_map) {
        Ok(json) => println!("{json}"),
        Err(e) => report_error_chain_and_exit(
            "failed to serialize address map",
            Some("address-map"),
            &e,
        ),
    }
}
