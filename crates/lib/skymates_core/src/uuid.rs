//! User ids are UUIDv7, generated app-side so both stores allocate them the
//! same way and they sort by creation time.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
