//! Habit sharing: claimable snapshots addressed by short codes.
//!
//! A share copies a habit's descriptive fields (never its completion
//! history) under a generated 8-character code that expires after a fixed
//! number of days. Importing a live code creates a fresh habit for the
//! claimer with provenance fields set and marks the share claimed.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::types::{Habit, SharedHabit};

/// Alphabet used for share codes.
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a share code.
pub const CODE_LEN: usize = 8;

/// Default number of days before a share code expires.
pub const DEFAULT_EXPIRY_DAYS: u32 = 7;

/// Generate a random 8-character share code over `A–Z0–9`.
pub fn generate_share_code() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        let idx = (bits % CODE_CHARS.len() as u128) as usize;
        code.push(CODE_CHARS[idx] as char);
        bits /= CODE_CHARS.len() as u128;
    }
    code
}

/// Create a share for the given habit and persist it.
pub fn share_habit(
    store: &dyn HabitStore,
    habit_id: &str,
    shared_by: &str,
    expiry_days: u32,
    today: NaiveDate,
) -> Result<SharedHabit> {
    let habit = store
        .get_habit(habit_id)?
        .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))?;

    let share = SharedHabit {
        id: Uuid::new_v4().to_string(),
        habit_id: habit.id,
        title: habit.title,
        description: habit.description,
        category: habit.category,
        shared_by: shared_by.to_string(),
        shared_at: today,
        share_code: generate_share_code(),
        expires_at: today
            .checked_add_days(Days::new(u64::from(expiry_days)))
            .unwrap_or(NaiveDate::MAX),
        claimed: false,
    };

    store.insert_share(&share)?;
    tracing::info!(habit_id = %share.habit_id, code = %share.share_code, "Habit shared");
    Ok(share)
}

/// Resolve a share code, rejecting unknown and expired codes.
pub fn lookup_share(store: &dyn HabitStore, code: &str, today: NaiveDate) -> Result<SharedHabit> {
    let share = store
        .share_by_code(code)?
        .ok_or_else(|| Error::ShareNotFound(code.to_string()))?;
    if !share.is_live_on(today) {
        return Err(Error::ShareExpired(code.to_string()));
    }
    Ok(share)
}

/// Claim a share code: create a fresh habit copy with empty history for the
/// importer and mark the share claimed.
pub fn import_share(store: &dyn HabitStore, code: &str, today: NaiveDate) -> Result<Habit> {
    let share = lookup_share(store, code, today)?;

    let mut habit = Habit::new(
        crate::types::HabitDraft {
            title: share.title.clone(),
            description: share.description.clone(),
            category: share.category.clone(),
            reminder: None,
        },
        today,
    );
    habit.shared_by = Some(share.shared_by.clone());
    habit.shared_at = Some(today);

    store.insert_habit(&habit)?;
    store.mark_claimed(&share.id)?;
    tracing::info!(code = %code, new_habit = %habit.id, "Share imported");
    Ok(habit)
}
