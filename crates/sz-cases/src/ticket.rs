//! Ticket draw and resolution

use sz_core::GameRng;

use crate::catalog::{CaseBox, TICKET_MAX, TICKET_MIN};
use crate::item::Item;

/// Uniform ticket in `TICKET_MIN..=TICKET_MAX`
pub fn draw_ticket(rng: &mut GameRng) -> u32 {
    rng.inclusive(TICKET_MIN, TICKET_MAX)
}

/// The item owning `ticket`.
///
/// A validated box always has exactly one owner. Anything else resolves to
/// the first item so every draw still produces a result; only a box with no
/// items gives `None`.
pub fn resolve_ticket(case_box: &CaseBox, ticket: u32) -> Option<&Item> {
    if let Some(item) = case_box.items.iter().find(|i| i.contains(ticket)) {
        return Some(item);
    }
    log::error!(
        "[Ticket] No item in box {} owns ticket {}, using first item",
        case_box.id,
        ticket
    );
    case_box.items.first()
}
