mod client;

pub use client::{
    AuthStatus, CloneApiError, CloneClient, CloneResult, CloneStarted, ItemKind, LoginUrl,
    ProgressSnapshot, ResolvedItem, TaskStatus,
};
