// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::ffi::{c_void, CString};
use std::mem;
use std::sync::Mutex;

use log::debug;
use retour::RawDetour;
use windows_core::{HSTRING, PCSTR};
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};

use super::symbols;
use crate::error::{Error, Result};
use crate::hook::HookHost;

/// The running process: module table, PDB symbols and inline detours.
pub struct WinHookHost {
    symbol_path: String,
    dbghelp: Mutex<()>,
}

impl WinHookHost {
    pub fn new(symbol_path: &str) -> Self {
        WinHookHost { symbol_path: symbol_path.to_string(), dbghelp: Mutex::new(()) }
    }
}

impl HookHost for WinHookHost {
    type Module = usize;
    type Patch = (usize, RawDetour);

    fn module_handle(&self, name: &str) -> Option<usize> {
        let module = unsafe { GetModuleHandleW(&HSTRING::from(name)) }.ok()?;
        if module.is_invalid() { None } else { Some(module.0 as usize) }
    }

    fn find_symbol(&self, module: usize, signature: &str) -> Option<usize> {
        let _guard = self.dbghelp.lock().ok()?;
        unsafe { symbols::find_undecorated(module, signature, &self.symbol_path) }
    }

    fn find_export(&self, module: usize, name: &str) -> Option<usize> {
        let cname = CString::new(name).ok()?;
        let proc = unsafe { GetProcAddress(HMODULE(module as *mut c_void), PCSTR(cname.as_ptr().cast())) }?;
        Some(proc as usize)
    }

    fn patch(&self, target: usize, replacement: usize) -> Result<((usize, RawDetour), usize)> {
        let detour = unsafe { RawDetour::new(target as *const (), replacement as *const ()) }
            .map_err(|e| Error::Patch { target, reason: e.to_string() })?;
        let trampoline = detour.trampoline() as *const () as usize;
        debug!("patch: 0x{target:X} trampoline 0x{trampoline:X}");
        Ok(((target, detour), trampoline))
    }

    fn commit(&self, patches: Vec<(usize, RawDetour)>) -> Result<()> {
        // Bei Fehler: Drop von `patches` deaktiviert die schon aktiven.
        enable_all(&patches, |detour| unsafe { detour.enable() }.map_err(|e| e.to_string()))?;
        // Bleiben bis Prozessende aktiv.
        for (_, detour) in patches {
            mem::forget(detour);
        }
        Ok(())
    }
}

fn enable_all<P, F>(patches: &[(usize, P)], mut enable: F) -> Result<()>
where
    F: FnMut(&P) -> std::result::Result<(), String>,
{
    for (target, patch) in patches {
        enable(patch).map_err(|reason| Error::Patch { target: *target, reason })?;
    }
    Ok(())
}
