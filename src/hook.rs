// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

// ── Symbol-Hooks ────────────────────────────────────

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst};

use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Module lookup, symbol resolution and code patching of the host process.
pub trait HookHost {
    type Module: Copy + PartialEq + fmt::Debug;
    /// A prepared redirection. Dropping it before [`HookHost::commit`]
    /// leaves the target untouched.
    type Patch;

    fn module_handle(&self, name: &str) -> Option<Self::Module>;

    fn find_symbol(&self, module: Self::Module, signature: &str) -> Option<usize>;

    fn find_export(&self, module: Self::Module, name: &str) -> Option<usize>;

    /// Prepare redirecting `target` to `replacement`. Returns the patch and
    /// the address that runs the original code.
    fn patch(&self, target: usize, replacement: usize) -> Result<(Self::Patch, usize)>;

    /// Activate a batch. Either every patch goes live or none does.
    fn commit(&self, patches: Vec<Self::Patch>) -> Result<()>;
}

/// Where the callable original of a redirected function is published.
pub struct OriginalSlot(AtomicUsize);

impl OriginalSlot {
    pub const fn new() -> Self {
        OriginalSlot(AtomicUsize::new(0))
    }

    pub fn get(&self) -> Option<usize> {
        match self.0.load(SeqCst) {
            0 => None,
            addr => Some(addr),
        }
    }

    fn set(&self, addr: usize) {
        self.0.store(addr, SeqCst);
    }

    fn clear(&self) {
        self.0.store(0, SeqCst);
    }
}

impl Default for OriginalSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OriginalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OriginalSlot(0x{:X})", self.0.load(SeqCst))
    }
}

#[derive(Debug, Clone)]
pub struct SymbolHook {
    /// Candidate signatures, tried in order.
    pub symbols: Vec<String>,
    pub replacement: usize,
    pub original: &'static OriginalSlot,
}

// 64-bit undecorated names carry `__ptr64` on every pointer and on the
// `this` qualifier, the configured signatures are written without it.
pub fn same_signature(undecorated: &str, wanted: &str) -> bool {
    undecorated.replace(" __ptr64", "").trim() == wanted.replace(" __ptr64", "").trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Hooked,
    Deferred,
}

/// Installs a hook table into the target module, now or on its first load.
pub struct Interceptor<H: HookHost> {
    host: H,
    settings: Settings,
    hooks: Vec<SymbolHook>,
    target_hooked: AtomicBool,
    loader_hooked: AtomicBool,
}

impl<H: HookHost> Interceptor<H> {
    pub fn new(host: H, settings: Settings, hooks: Vec<SymbolHook>) -> Self {
        Interceptor {
            host,
            settings,
            hooks,
            target_hooked: AtomicBool::new(false),
            loader_hooked: AtomicBool::new(false),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// One-shot flag: the target module has been observed and handled.
    pub fn is_target_hooked(&self) -> bool {
        self.target_hooked.load(SeqCst)
    }

    pub fn is_loader_hooked(&self) -> bool {
        self.loader_hooked.load(SeqCst)
    }

    /// Install the hook table into `module`.
    ///
    /// Every symbol is resolved before anything is patched; one missing
    /// symbol or one failed patch leaves the whole module untouched.
    pub fn hook_symbols(&self, module: H::Module) -> Result<usize> {
        let mut targets = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            let found = hook
                .symbols
                .iter()
                .find_map(|sig| self.host.find_symbol(module, sig));
            match found {
                Some(addr) => targets.push(addr),
                None => {
                    warn!("hook_symbols: no candidate resolved in {}", self.settings.target_module);
                    return Err(Error::SymbolNotFound {
                        module: self.settings.target_module.clone(),
                        signature: hook.symbols.first().cloned().unwrap_or_default(),
                    });
                }
            }
        }

        let mut patches = Vec::with_capacity(targets.len());
        for (hook, &target) in self.hooks.iter().zip(&targets) {
            match self.host.patch(target, hook.replacement) {
                Ok((patch, original)) => {
                    debug!("hook_symbols: 0x{target:X} -> 0x{:X}", hook.replacement);
                    hook.original.set(original);
                    patches.push(patch);
                }
                Err(e) => {
                    self.clear_originals();
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.host.commit(patches) {
            self.clear_originals();
            return Err(e);
        }
        info!("Hooks applied ({} functions)", self.hooks.len());
        Ok(self.hooks.len())
    }

    fn clear_originals(&self) {
        for hook in &self.hooks {
            hook.original.clear();
        }
    }

    /// Hook the target now if it is mapped, otherwise redirect the module
    /// loader to `loader_replacement` and wait.
    pub fn initialize(&self, loader_replacement: usize, loader_original: &'static OriginalSlot) -> Result<InitOutcome> {
        if let Some(module) = self.host.module_handle(&self.settings.target_module) {
            if self.target_hooked.swap(true, SeqCst) {
                return Err(Error::AlreadyHooked);
            }
            self.hook_symbols(module)?;
            return Ok(InitOutcome::Hooked);
        }

        if self.loader_hooked.load(SeqCst) {
            return Ok(InitOutcome::Deferred);
        }
        let loader = self
            .host
            .module_handle(&self.settings.loader_module)
            .ok_or_else(|| Error::ModuleNotLoaded(self.settings.loader_module.clone()))?;
        let entry = self
            .host
            .find_export(loader, &self.settings.loader_export)
            .ok_or_else(|| Error::ExportNotFound {
                module: self.settings.loader_module.clone(),
                name: self.settings.loader_export.clone(),
            })?;

        let (patch, original) = self.host.patch(entry, loader_replacement)?;
        loader_original.set(original);
        if let Err(e) = self.host.commit(vec![patch]) {
            loader_original.clear();
            return Err(e);
        }
        self.loader_hooked.store(true, SeqCst);
        info!("{} not loaded yet, watching {}", self.settings.target_module, self.settings.loader_export);
        Ok(InitOutcome::Deferred)
    }

    /// Called by the loader redirection after the original loader returned.
    /// Returns `true` only for the one call that installed the hook table.
    pub fn on_module_loaded(&self, loaded: Option<H::Module>) -> bool {
        let Some(loaded) = loaded else { return false };
        if self.target_hooked.load(SeqCst) {
            return false;
        }
        if self.host.module_handle(&self.settings.target_module) != Some(loaded) {
            return false;
        }
        // Zwei Loader-Aufrufe können hier gleichzeitig ankommen.
        if self.target_hooked.swap(true, SeqCst) {
            return false;
        }

        match self.hook_symbols(loaded) {
            Ok(_) => true,
            Err(e) => {
                warn!("on_module_loaded: {e}");
                false
            }
        }
    }
}

// ── Fake Module Layout (Tests) ──────────────────────
