// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Mutex;

use log::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::hook::{HookHost, InitOutcome, Interceptor, OriginalSlot, SymbolHook};
use crate::logging;

/// The process-wide plugin instance. Owns the interceptor with its one-shot
/// "target hooked" flag, and the engine the redirected handler drives.
pub struct Plugin<H: HookHost, E = ()> {
    interceptor: Interceptor<H>,
    loader_replacement: usize,
    loader_original: &'static OriginalSlot,
    engine: Mutex<Option<E>>,
}

impl<H: HookHost, E> Plugin<H, E> {
    /// `hooks` is the table for the target module; `loader_replacement`
    /// is installed over the module loader when the target is not mapped
    /// at init, with its original published in `loader_original`.
    pub fn new(
        host: H,
        settings: Settings,
        hooks: Vec<SymbolHook>,
        loader_replacement: usize,
        loader_original: &'static OriginalSlot,
    ) -> Self {
        Plugin {
            interceptor: Interceptor::new(host, settings, hooks),
            loader_replacement,
            loader_original,
            engine: Mutex::new(None),
        }
    }

    pub fn interceptor(&self) -> &Interceptor<H> {
        &self.interceptor
    }

    pub fn install_engine(&self, engine: E) {
        if let Ok(mut slot) = self.engine.lock() {
            *slot = Some(engine);
        }
    }

    /// Run `f` on the engine. `None` if none is installed or it is already
    /// running further up the stack; never blocks.
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut E) -> T) -> Option<T> {
        let mut slot = self.engine.try_lock().ok()?;
        slot.as_mut().map(f)
    }

    /// One-time interception setup. A failure leaves the host untouched and
    /// is only reported back; the host keeps running unmodified.
    pub fn initialize(&self) -> Result<InitOutcome> {
        // Ohne Log weitermachen, der Effekt braucht es nicht.
        let _ = logging::init(self.interceptor.settings());
        info!("Init");
        let outcome = self.interceptor.initialize(self.loader_replacement, self.loader_original);
        match &outcome {
            Ok(o) => info!("init: {o:?}"),
            Err(e) => warn!("init: {e}, staying inert"),
        }
        outcome
    }

    pub fn settings_changed(&self) {
        info!("SettingsChanged");
    }

    /// Nothing to release: patches stay for the life of the process and the
    /// button index only holds weak references.
    pub fn teardown(&self) {
        info!("Uninit");
    }
}
