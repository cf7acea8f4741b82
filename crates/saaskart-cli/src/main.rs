// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    saaskart_cli::main_entry()
}
