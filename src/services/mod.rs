pub mod changes;
pub mod confirmation;
pub mod notifier;
