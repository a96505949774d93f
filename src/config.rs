// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use log::LevelFilter;

// ── Host-Module ─────────────────────────────────────
pub const TARGET_MODULE: &str = "Taskbar.View.dll";
pub const LOADER_MODULE: &str = "kernelbase.dll";
pub const LOADER_EXPORT: &str = "LoadLibraryExW";

// Undecorated name as produced by UnDecorateSymbolNameW with no flags.
pub const POINTER_PRESSED_SYMBOL: &str = "public: virtual int __cdecl winrt::impl::produce<struct winrt::Taskbar::implementation::TaskbarFrame,struct winrt::Windows::UI::Xaml::Controls::IControlOverrides>::OnPointerPressed(void *)";

// Microsoft public symbol server, cached under the temp dir.
pub const SYMBOL_SERVER: &str = "https://msdl.microsoft.com/download/symbols";

// ── Visual Tree Klassen ─────────────────────────────
pub const FRAME_CLASS: &str = "Taskbar.TaskbarFrame";       // exakt
pub const CONTAINER_PRIMARY: &str = "TaskbarFrameRepeater"; // partiell
pub const CONTAINER_FALLBACK: &str = "TaskbarItemHost";     // partiell
pub const ICON_MARKER: &str = "TaskListButton";             // partiell

// ── Logging ─────────────────────────────────────────
pub const LOG_FILE_NAME: &str = "taskswap.log";
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

// Everything the effect needs to know about the host, fixed for the
// lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub target_module: String,
    pub loader_module: String,
    pub loader_export: String,
    // Candidate signatures for the frame's pointer-pressed override; the
    // first one found in the module is used.
    pub pointer_pressed_symbols: Vec<String>,
    // dbghelp search path used to fetch PDBs for the target module.
    pub symbol_search_path: String,
    pub frame_class: String,
    pub container_primary: String,
    pub container_fallback: String,
    pub icon_marker: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            target_module: TARGET_MODULE.to_string(),
            loader_module: LOADER_MODULE.to_string(),
            loader_export: LOADER_EXPORT.to_string(),
            pointer_pressed_symbols: vec![POINTER_PRESSED_SYMBOL.to_string()],
            symbol_search_path: format!(
                "srv*{}*{}",
                std::env::temp_dir().join("taskswap-symbols").display(),
                SYMBOL_SERVER
            ),
            frame_class: FRAME_CLASS.to_string(),
            container_primary: CONTAINER_PRIMARY.to_string(),
            container_fallback: CONTAINER_FALLBACK.to_string(),
            icon_marker: ICON_MARKER.to_string(),
            log_file: std::env::temp_dir().join(LOG_FILE_NAME),
            log_level: LOG_LEVEL,
        }
    }
}

impl Settings {
    pub fn container_candidates(&self) -> [&str; 2] {
        [&self.container_primary, &self.container_fallback]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_taskbar() {
        let s = Settings::default();
        assert_eq!(s.target_module, "Taskbar.View.dll");
        assert_eq!(s.pointer_pressed_symbols.len(), 1);
        assert!(s.pointer_pressed_symbols[0].ends_with("::OnPointerPressed(void *)"));
        assert_eq!(s.container_candidates(), ["TaskbarFrameRepeater", "TaskbarItemHost"]);
        assert!(s.log_file.ends_with(LOG_FILE_NAME));
        assert!(s.symbol_search_path.starts_with("srv*"));
        assert!(s.symbol_search_path.ends_with(SYMBOL_SERVER));
    }
}
