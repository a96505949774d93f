// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

// ── PDB Symbol Lookup (dbghelp) ─────────────────────
// Taskbar.View.dll exportiert nichts Brauchbares, die Methoden findet man
// nur über die öffentlichen PDBs. dbghelp ist nicht thread-safe, Aufrufer
// halten den Lock aus WinHookHost.

use std::ffi::c_void;

use log::{debug, warn};
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::System::Diagnostics::Debug::*;
use windows::Win32::System::LibraryLoader::GetModuleFileNameW;
use windows::Win32::System::Threading::GetCurrentProcess;

use crate::hook::same_signature;

const MAX_UNDECORATED: usize = 4096;
const UNDNAME_NO_PTR64: u32 = 0x20000;

struct Search<'a> {
    wanted: &'a str,
    found: Option<usize>,
    scanned: u32,
}

/// Method name at the end of an undecorated signature, used as the
/// enumeration mask: `...::OnPointerPressed(void *)` → `OnPointerPressed`.
pub(crate) fn method_name(signature: &str) -> Option<&str> {
    let head = signature.split('(').next()?;
    let name = head.trim_end().rsplit(|c: char| c == ':' || c.is_whitespace()).next()?;
    if name.is_empty() { None } else { Some(name) }
}

unsafe fn module_path(module: usize) -> Option<String> {
    let mut buf = [0u16; 1024];
    let len = GetModuleFileNameW(HMODULE(module as *mut c_void), &mut buf);
    if len == 0 { return None; }
    Some(String::from_utf16_lossy(&buf[..len as usize]))
}

unsafe fn undecorate(decorated: &[u16]) -> Option<String> {
    let mut name: Vec<u16> = decorated.to_vec();
    name.push(0);
    let mut out = vec![0u16; MAX_UNDECORATED];
    // UNDNAME_COMPLETE ohne __ptr64; same_signature normalisiert trotzdem.
    let len = UnDecorateSymbolNameW(PCWSTR(name.as_ptr()), &mut out, UNDNAME_NO_PTR64);
    if len == 0 { return None; }
    Some(String::from_utf16_lossy(&out[..len as usize]))
}

unsafe extern "system" fn on_symbol(info: *const SYMBOL_INFOW, _size: u32, ctx: *const c_void) -> BOOL {
    let search = &mut *(ctx as *mut Search);
    search.scanned += 1;
    let info = &*info;
    let name = std::slice::from_raw_parts(info.Name.as_ptr(), info.NameLen as usize);
    match undecorate(name) {
        Some(full) if same_signature(&full, search.wanted) => {
            search.found = Some(info.Address as usize);
            FALSE
        }
        _ => TRUE,
    }
}

/// Resolve `signature` (undecorated, `UNDNAME_COMPLETE` form) inside the
/// mapped `module`. Loads the module's PDB through `search_path`.
pub(crate) unsafe fn find_undecorated(module: usize, signature: &str, search_path: &str) -> Option<usize> {
    let mask = format!("*{}*", method_name(signature)?);
    let path = module_path(module)?;
    let process = GetCurrentProcess();

    // Dekorierte Namen behalten, wir vergleichen selbst.
    SymSetOptions(SYMOPT_DEFERRED_LOADS | SYMOPT_FAIL_CRITICAL_ERRORS);
    if let Err(e) = SymInitializeW(process, &HSTRING::from(search_path), FALSE) {
        warn!("dbghelp: SymInitializeW FAILED: {e}");
        return None;
    }

    let base = SymLoadModuleExW(
        process,
        None,
        &HSTRING::from(path.as_str()),
        None,
        module as u64,
        0,
        None,
        Default::default(),
    );
    if base == 0 {
        warn!("dbghelp: SymLoadModuleExW FAILED for {path}");
        let _ = SymCleanup(process);
        return None;
    }

    let mut search = Search { wanted: signature, found: None, scanned: 0 };
    let _ = SymEnumSymbolsW(
        process,
        base,
        &HSTRING::from(mask.as_str()),
        Some(on_symbol),
        Some(&mut search as *mut Search as *const c_void),
    );
    debug!("dbghelp: {} candidates for {mask}, hit={:?}", search.scanned, search.found);

    let _ = SymUnloadModule64(process, base);
    let _ = SymCleanup(process);
    search.found
}
