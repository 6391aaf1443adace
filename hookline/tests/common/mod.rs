#![allow(dead_code)]

use hookline::{Callbacks, testing::ManualScheduler};
use std::{error::Error, fmt};

// ============================================================================
// Test Payload Types
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tags: Vec<&'static str>,
}

impl Message {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub name: String,
    pub read_only: bool,
}

impl Room {
    pub fn general() -> Self {
        Self {
            name: "general".to_string(),
            read_only: false,
        }
    }
}

#[derive(Debug)]
pub struct Rejected(pub &'static str);

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected: {}", self.0)
    }
}

impl Error for Rejected {}

// ============================================================================
// Test Callbacks
// ============================================================================

/// A callback that appends `tag` to the message.
pub fn tag(
    tag: &'static str,
) -> impl Fn(&Message, &Room) -> Option<Message> + Send + Sync + 'static {
    move |msg: &Message, _: &Room| {
        let mut next = msg.clone();
        next.tags.push(tag);
        Some(next)
    }
}

/// A callback that always fails.
pub fn reject(
    reason: &'static str,
) -> impl Fn(&Message, &Room) -> Result<Option<Message>, Rejected> + Send + Sync + 'static {
    move |_: &Message, _: &Room| Err(Rejected(reason))
}

// ============================================================================
// Registries
// ============================================================================

/// A registry whose detached tasks run only when the test says so.
pub fn manual_registry() -> (Callbacks, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let callbacks = Callbacks::builder().scheduler(scheduler.clone()).build();
    (callbacks, scheduler)
}

pub fn ids(callbacks: &Callbacks, hook: &str) -> Vec<String> {
    callbacks
        .callbacks(hook)
        .iter()
        .map(|meta| meta.id.to_string())
        .collect()
}
