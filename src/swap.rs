// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

// ── Reset / Swap ────────────────────────────────────

use log::{debug, info};
use rand::Rng;

use crate::host::{Translation, VisualNode};
use crate::index::IconIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    // Fewer than two buttons indexed, nothing to do.
    TooFew,
    // One of the pair was destroyed by the host; neither was touched.
    Stale { a: usize, b: usize },
    Swapped { a: usize, b: usize },
}

// Put every live button back on its layout slot. Dead entries are skipped.
// Returns how many buttons were reset.
pub fn reset<N: VisualNode>(index: &mut IconIndex<N>) -> usize {
    let mut count = 0;
    for entry in index.entries_mut() {
        let Some(translate) = entry.translation() else { continue };
        translate.set_x(0.0);
        entry.current_shift = 0.0;
        count += 1;
    }
    debug!("reset: {count} of {} buttons", index.len());
    count
}

// Two distinct indices in `0..len`, uniformly. Collisions are re-drawn.
pub fn pick_pair<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let a = rng.gen_range(0..len);
    let mut b = rng.gen_range(0..len);
    while b == a {
        b = rng.gen_range(0..len);
    }
    Some((a, b))
}

// Move `a` onto `b`'s layout slot and `b` onto `a`'s. Offsets are absolute
// from `original_x`, an earlier swap is overwritten, not composed.
// Both translations are resolved before either is written, so a dead
// partner leaves the live one untouched.
pub fn swap_pair<N: VisualNode>(index: &mut IconIndex<N>, a: usize, b: usize) -> SwapOutcome {
    if index.len() < 2 || a == b || a >= index.len() || b >= index.len() {
        return SwapOutcome::TooFew;
    }

    let entries = index.entries_mut();
    let (ta, tb) = match (entries[a].translation(), entries[b].translation()) {
        (Some(ta), Some(tb)) => (ta, tb),
        _ => {
            debug!("swap: entry {a} or {b} no longer alive");
            return SwapOutcome::Stale { a, b };
        }
    };

    let (xa, xb) = (entries[a].original_x(), entries[b].original_x());
    ta.set_x(xb - xa);
    tb.set_x(xa - xb);
    entries[a].current_shift = xb - xa;
    entries[b].current_shift = xa - xb;

    index.set_last_swap((a, b));
    info!("Swapped index {a} and {b}");
    SwapOutcome::Swapped { a, b }
}

pub fn random_swap<N: VisualNode, R: Rng + ?Sized>(index: &mut IconIndex<N>, rng: &mut R) -> SwapOutcome {
    match pick_pair(index.len(), rng) {
        Some((a, b)) => swap_pair(index, a, b),
        None => SwapOutcome::TooFew,
    }
}
