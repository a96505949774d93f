// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs::OpenOptions;
use std::sync::atomic::{AtomicBool, Ordering::SeqCst};

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Settings;
use crate::error::{Error, Result};

static LOGGER_READY: AtomicBool = AtomicBool::new(false);

/// Route the `log` macros into `settings.log_file`.
///
/// Only the first call does anything; explorer may re-run plugin init and
/// the global logger can only be installed once per process.
pub fn init(settings: &Settings) -> Result<()> {
    if LOGGER_READY.compare_exchange(false, true, SeqCst, SeqCst).is_err() {
        return Ok(());
    }
    if settings.log_level == LevelFilter::Off {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .map_err(|e| {
            LOGGER_READY.store(false, SeqCst);
            Error::Logger(format!("{}: {e}", settings.log_file.display()))
        })?;

    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    // Someone else in the process may own the global logger already.
    WriteLogger::init(settings.log_level, config, file)
        .map_err(|e| Error::Logger(e.to_string()))
}
