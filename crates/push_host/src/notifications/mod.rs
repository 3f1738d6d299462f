//! User-visible notification contracts.

pub mod service;

pub use service::{
    MemoryNotificationService, NotificationFuture, NotificationService,
};
