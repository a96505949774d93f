// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod config;
pub mod dispatch;
pub mod error;
pub mod hook;
pub mod host;
pub mod index;
pub mod locator;
pub mod logging;
pub mod plugin;
pub mod swap;

#[cfg(windows)]
pub mod win;

pub use config::Settings;
pub use dispatch::{Action, Dispatcher};
pub use error::{Error, Result};
pub use hook::{HookHost, InitOutcome, Interceptor, OriginalSlot, SymbolHook};
pub use host::{PointerDevice, PointerEvent, RenderTransform, TransformGroup, Translation, VisualNode, WeakNode};
pub use index::{IconEntry, IconIndex};
pub use locator::{collect_icons, locate, NameMatch};
pub use plugin::Plugin;
pub use swap::SwapOutcome;
