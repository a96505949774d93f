// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::host::{PointerDevice, PointerEvent, VisualNode};
use crate::index::IconIndex;
use crate::locator::{collect_icons, NameMatch};
use crate::swap::{self, SwapOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ignored,
    // Middle click, number of buttons put back.
    Reset(usize),
    Swap(SwapOutcome),
}

// Owns the button snapshot and the random source. One per process, driven
// from the host UI thread only.
pub struct Dispatcher<N: VisualNode, R = StdRng> {
    settings: Settings,
    index: IconIndex<N>,
    rng: R,
}

impl<N: VisualNode> Dispatcher<N, StdRng> {
    pub fn from_entropy(settings: Settings) -> Self {
        Dispatcher::new(settings, StdRng::from_entropy())
    }
}

impl<N: VisualNode, R: Rng> Dispatcher<N, R> {
    pub fn new(settings: Settings, rng: R) -> Self {
        Dispatcher { settings, index: IconIndex::new(), rng }
    }

    pub fn index(&self) -> &IconIndex<N> {
        &self.index
    }

    // Run the effect for one press, then `original`. `original` runs no
    // matter what happened before it, a panic in the effect included.
    pub fn handle<E, T, F>(&mut self, sender: Option<&N>, event: Option<&E>, original: F) -> T
    where
        E: PointerEvent<N>,
        F: FnOnce() -> T,
    {
        if catch_unwind(AssertUnwindSafe(|| self.on_pointer_pressed(sender, event))).is_err() {
            warn!("pointer handler panicked, passing through");
            self.index = IconIndex::new();
        }
        original()
    }

    // Decide and apply: middle mouse button resets, anything else swaps.
    pub fn on_pointer_pressed<E: PointerEvent<N>>(&mut self, sender: Option<&N>, event: Option<&E>) -> Action {
        let Some(frame) = sender else { return Action::Ignored };
        let is_frame = frame
            .type_name()
            .is_some_and(|name| NameMatch::Exact(&self.settings.frame_class).matches(&name));
        if !is_frame {
            return Action::Ignored;
        }

        let middle = event.is_some_and(|e| {
            e.device() == Some(PointerDevice::Mouse) && e.is_middle_pressed(frame)
        });

        // Snapshot ist nach jedem Klick veraltet, immer neu aufbauen.
        self.index.replace(collect_icons(frame, &self.settings));

        if middle {
            let n = swap::reset(&mut self.index);
            info!("Taskbar middle-click: reset icon order ({n} buttons)");
            Action::Reset(n)
        } else {
            info!("Taskbar clicked");
            Action::Swap(swap::random_swap(&mut self.index, &mut self.rng))
        }
    }
}
