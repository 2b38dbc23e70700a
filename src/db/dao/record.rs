//! Bookkeeping every stored record shares. `#[record]` implements these for
//! each entity so `DaoBase` can stamp ids and timestamps generically.

use sea_orm::entity::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

pub trait RecordEntity: sea_orm::EntityTrait {
    /// Default ordering column; listings are newest first.
    fn created_at_column() -> Self::Column;
}

pub trait StampedRecord {
    fn assign_id(&mut self, id: Uuid);
    fn stamp_created(&mut self, at: DateTimeWithTimeZone);
    fn stamp_updated(&mut self, at: DateTimeWithTimeZone);

    fn stamp_new(&mut self, id: Uuid, at: DateTimeWithTimeZone) {
        self.assign_id(id);
        self.stamp_created(at);
        self.stamp_updated(at);
    }
}
