// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

// ── Explorer-Wiring ─────────────────────────────────

mod host;
mod symbols;

use std::ffi::c_void;
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::OnceLock;

use log::{error, warn};

pub use self::host::WinHookHost;
use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::hook::{InitOutcome, OriginalSlot, SymbolHook};
use crate::host::{PointerEvent, VisualNode};
use crate::plugin::Plugin;

type PointerPressedFn = unsafe extern "system" fn(*mut c_void, *mut c_void) -> i32;
type LoadLibraryExWFn = unsafe extern "system" fn(*const u16, *mut c_void, u32) -> *mut c_void;
type Handler = Box<dyn FnMut(*mut c_void, *mut c_void) -> i32 + Send>;

// ── Globaler State ──────────────────────────────────
static POINTER_PRESSED_ORIGINAL: OriginalSlot = OriginalSlot::new();
static LOAD_LIBRARY_ORIGINAL: OriginalSlot = OriginalSlot::new();
static PLUGIN: OnceLock<Plugin<WinHookHost, Handler>> = OnceLock::new();

/// Turns the raw ABI pointers of `OnPointerPressed(this, args)` into typed
/// host objects.
pub trait RawUi: Send + 'static {
    type Node: VisualNode;
    type Event: PointerEvent<Self::Node>;

    /// # Safety
    /// `this` is the `this` pointer the host passed to the override.
    unsafe fn node(&self, this: *mut c_void) -> Option<Self::Node>;

    /// # Safety
    /// `args` is the event args pointer the host passed, possibly null.
    unsafe fn event(&self, args: *mut c_void) -> Option<Self::Event>;
}

unsafe fn call_pointer_pressed_original(this: *mut c_void, args: *mut c_void) -> i32 {
    match POINTER_PRESSED_ORIGINAL.get() {
        Some(addr) => {
            let original: PointerPressedFn = mem::transmute(addr);
            original(this, args)
        }
        None => 0,
    }
}

// ── Detour: TaskbarFrame::OnPointerPressed ──────────
unsafe extern "system" fn pointer_pressed_hook(this: *mut c_void, args: *mut c_void) -> i32 {
    let Some(plugin) = PLUGIN.get() else { return call_pointer_pressed_original(this, args) };
    // Kein Engine oder reentranter Aufruf: direkt durch.
    let outcome = catch_unwind(AssertUnwindSafe(|| plugin.with_engine(|handler| handler(this, args))));
    match outcome {
        Ok(Some(ret)) => ret,
        Ok(None) => call_pointer_pressed_original(this, args),
        Err(_) => {
            error!("pointer_pressed_hook: handler panicked");
            call_pointer_pressed_original(this, args)
        }
    }
}

// ── Detour: kernelbase!LoadLibraryExW ───────────────
unsafe extern "system" fn load_library_ex_w_hook(name: *const u16, file: *mut c_void, flags: u32) -> *mut c_void {
    let Some(addr) = LOAD_LIBRARY_ORIGINAL.get() else { return ptr::null_mut() };
    let original: LoadLibraryExWFn = mem::transmute(addr);
    let module = original(name, file, flags);
    if module.is_null() {
        return module;
    }
    if let Some(plugin) = PLUGIN.get() {
        let _ = catch_unwind(AssertUnwindSafe(|| plugin.interceptor().on_module_loaded(Some(module as usize))));
    }
    module
}

/// Install the adapter that drives the effect on every press of the frame.
/// Needs [`initialize`] first.
pub fn set_ui<U>(ui: U, settings: Settings)
where
    U: RawUi,
    Dispatcher<U::Node>: Send,
{
    let mut dispatcher: Dispatcher<U::Node> = Dispatcher::from_entropy(settings);
    let handler: Handler = Box::new(move |this, args| unsafe {
        let node = ui.node(this);
        let event = ui.event(args);
        dispatcher.handle(node.as_ref(), event.as_ref(), || call_pointer_pressed_original(this, args))
    });
    match PLUGIN.get() {
        Some(plugin) => plugin.install_engine(handler),
        None => warn!("set_ui: plugin not initialized, press handler not installed"),
    }
}

/// Plugin init. Safe to call more than once; only the first call builds
/// the plugin.
pub fn initialize(settings: Settings) -> Result<InitOutcome> {
    let plugin = PLUGIN.get_or_init(|| {
        let hooks = vec![SymbolHook {
            symbols: settings.pointer_pressed_symbols.clone(),
            replacement: pointer_pressed_hook as PointerPressedFn as usize,
            original: &POINTER_PRESSED_ORIGINAL,
        }];
        Plugin::new(
            WinHookHost::new(&settings.symbol_search_path),
            settings,
            hooks,
            load_library_ex_w_hook as LoadLibraryExWFn as usize,
            &LOAD_LIBRARY_ORIGINAL,
        )
    });
    plugin.initialize()
}

pub fn settings_changed() {
    if let Some(plugin) = PLUGIN.get() {
        plugin.settings_changed();
    }
}

pub fn teardown() {
    if let Some(plugin) = PLUGIN.get() {
        plugin.teardown();
    }
}
