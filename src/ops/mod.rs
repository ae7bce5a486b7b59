pub mod diff;
pub mod draft;
pub mod ledger;
pub mod visibility;
