// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

/// Errors raised while resolving or redirecting host functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("module not loaded: {0}")]
    ModuleNotLoaded(String),

    /// None of the candidate signatures resolved, usually a host build the
    /// signatures were not written for.
    #[error("symbol not found in {module}: {signature}")]
    SymbolNotFound {
        module: String,
        signature: String,
    },

    #[error("export not found in {module}: {name}")]
    ExportNotFound {
        module: String,
        name: String,
    },

    /// Writing the redirection into the target failed.
    #[error("patching 0x{target:X} failed: {reason}")]
    Patch {
        target: usize,
        reason: String,
    },

    /// The target module was already hooked by an earlier observation.
    #[error("target module already hooked")]
    AlreadyHooked,

    #[error("logger setup failed: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, Error>;
