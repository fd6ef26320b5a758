//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers.  No closures, no heap.  Handlers are pure: they read the pass snapshot and
//! write lamp commands and requests; the controller performs the I/O.
//!
//! ```text
//!            ┌───────[!blink_due]──────▶ CHECK_SWITCHES ──┐
//!            │                                            │
//!  ──▶ IDLE ─┤                                            │
//!       ▲    └───────[blink_due]───────▶ BLINK ───────────┤
//!       │                                                 │
//!       └─────────────────────────────────────────────────┘
//!
//!  IDLE ──[fault_latched]──▶ FAULT   (terminal until power cycle)
//! ```

use super::context::{FsmContext, LightCommands};
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: CheckSwitches
        StateDescriptor {
            id: StateId::CheckSwitches,
            name: "CheckSwitches",
            on_enter: None,
            on_exit: None,
            on_update: check_switches_update,
        },
        // Index 2: Blink
        StateDescriptor {
            id: StateId::Blink,
            name: "Blink",
            on_enter: None,
            on_exit: None,
            on_update: blink_update,
        },
        // Index 3: Fault
        StateDescriptor {
            id: StateId::Fault,
            name: "Fault",
            on_enter: Some(fault_enter),
            on_exit: None,
            on_update: fault_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.signals.fault_latched {
        return Some(StateId::Fault);
    }

    // Brake follows the level of either source, not its edges.
    ctx.commands.brake = ctx.brake_requested();
    ctx.commands.head = ctx.signals.headlight;

    if ctx.signals.blink_due {
        Some(StateId::Blink)
    } else {
        Some(StateId::CheckSwitches)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CHECK_SWITCHES state
// ═══════════════════════════════════════════════════════════════════════════

fn check_switches_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.requests.sample_switches = true;
    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  BLINK state (hazard dominates the individual turn flags)
// ═══════════════════════════════════════════════════════════════════════════

fn blink_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.requests.clear_blink_due = true;

    if ctx.signals.hazard {
        ctx.commands.left = !ctx.commands.left;
        ctx.commands.right = !ctx.commands.right;
    } else {
        ctx.commands.left = ctx.signals.left && !ctx.commands.left;
        ctx.commands.right = ctx.signals.right && !ctx.commands.right;
    }

    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT state (terminal until power cycle)
// ═══════════════════════════════════════════════════════════════════════════

fn fault_enter(ctx: &mut FsmContext) {
    ctx.commands = LightCommands::all_off();
    ctx.strobe_elapsed_ms = 0;
    ctx.fault_clear_done = false;
    warn!(
        "FAULT: lamps forced off, strobing at {} ms half-period",
        ctx.config.strobe_half_period_ms
    );
}

/// Strobe and, when enabled, request the one-time confirmation clear once
/// the strobe has run for `fault_confirm_timeout_ms`.  That clear writes
/// NORMAL over a trip frame received earlier in this FAULT; a trip received
/// after the clear is left in the latch.
fn fault_update(ctx: &mut FsmContext) -> Option<StateId> {
    let half_period = ctx.config.strobe_half_period_ms;

    if ctx.config.fault_confirm_clear
        && !ctx.fault_clear_done
        && ctx.strobe_elapsed_ms >= ctx.config.fault_confirm_timeout_ms
    {
        info!(
            "FAULT: strobe held {} ms, confirming and clearing the latch",
            ctx.strobe_elapsed_ms
        );
        ctx.requests.clear_fault_latch = true;
        ctx.fault_clear_done = true;
    }

    ctx.commands.strobe = !ctx.commands.strobe;
    ctx.requests.hold_ms = Some(half_period);
    ctx.strobe_elapsed_ms = ctx.strobe_elapsed_ms.saturating_add(half_period);

    None
}
