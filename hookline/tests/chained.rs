//! Chained dispatch through `Callbacks::run`.

mod common;

use common::{Message, Rejected, Room, reject, tag};
use hookline::{CallbackError, CallbackOptions, Callbacks, Priority, testing::CallCounter};
use std::sync::Arc;

#[test]
fn later_callbacks_see_earlier_output() {
    let callbacks = Callbacks::new();
    callbacks
        .add("h", |items: &Vec<&'static str>, _: &()| {
            let mut items = items.clone();
            items.push("B");
            Some(items)
        })
        .unwrap();
    callbacks
        .add("h", |items: &Vec<&'static str>, _: &()| {
            let mut items = items.clone();
            items.push("A");
            Some(items)
        })
        .unwrap();

    assert_eq!(callbacks.run("h", Vec::<&str>::new(), &()).unwrap(), ["B", "A"]);
}

#[test]
fn no_result_passes_the_item_through() {
    let callbacks = Callbacks::new();
    let counter = CallCounter::new();
    callbacks.add("h", counter.callback::<u32, ()>()).unwrap();
    callbacks.add("h", |_: &u32, _: &()| None).unwrap();
    callbacks.add("h", |n: &u32, _: &()| (*n > 100).then_some(0)).unwrap();

    assert_eq!(callbacks.run("h", 5_u32, &()).unwrap(), 5);
    assert_eq!(counter.count(), 1);
}

#[test]
fn empty_and_emptied_hooks_return_the_input() {
    let callbacks = Callbacks::new();
    let room = Room::general();
    assert_eq!(callbacks.run("h", Message::new("x"), &room).unwrap(), Message::new("x"));

    let id = callbacks.add("h", tag("a")).unwrap();
    assert_eq!(callbacks.run("h", Message::new("x"), &room).unwrap().tags, ["a"]);

    assert!(callbacks.remove("h", &id));
    assert_eq!(callbacks.run("h", Message::new("x"), &room).unwrap(), Message::new("x"));
}

#[test]
fn context_reaches_every_callback_unchanged() {
    let callbacks = Callbacks::new();
    callbacks
        .add("h", |msg: &Message, room: &Room| {
            room.read_only.then(|| Message::new(&format!("[{}] {}", room.name, msg.text)))
        })
        .unwrap();
    callbacks
        .add("h", |msg: &Message, room: &Room| {
            Some(Message::new(&format!("{} #{}", msg.text, room.name)))
        })
        .unwrap();

    let room = Room {
        name: "ops".to_string(),
        read_only: true,
    };
    let msg = callbacks.run("h", Message::new("deploy"), &room).unwrap();
    assert_eq!(msg.text, "[ops] deploy #ops");
}

#[test]
fn tuple_contexts_carry_several_values() {
    let callbacks = Callbacks::new();
    callbacks
        .add("h", |total: &u64, (factor, offset): &(u64, u64)| Some(total * factor + offset))
        .unwrap();
    assert_eq!(callbacks.run("h", 4_u64, &(3_u64, 1_u64)).unwrap(), 13);
}

#[test]
fn first_failure_aborts_the_chain() {
    let callbacks = Callbacks::new();
    let after = CallCounter::new();
    callbacks
        .add_with_options("h", tag("first"), CallbackOptions::new().with_priority(Priority::HIGH))
        .unwrap();
    callbacks
        .add_with_options("h", reject("spam"), CallbackOptions::new().with_id("spam-filter"))
        .unwrap();
    callbacks
        .add_with_priority("h", after.callback::<Message, Room>(), Priority::LOW)
        .unwrap();

    let err = callbacks.run("h", Message::new("buy now"), &Room::general()).unwrap_err();
    assert_eq!(err.callback_id(), Some("spam-filter"));
    match err {
        CallbackError::Failed { hook, source, .. } => {
            assert_eq!(hook, "h");
            let rejected = source.downcast_ref::<Rejected>().unwrap();
            assert_eq!(rejected.0, "spam");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(after.count(), 0);
}

#[test]
fn result_outcomes_mix_with_option_outcomes() {
    let callbacks = Callbacks::new();
    callbacks
        .add("h", |n: &i32, _: &()| -> Result<Option<i32>, Rejected> {
            if *n < 0 { Err(Rejected("negative")) } else { Ok(Some(n * 2)) }
        })
        .unwrap();
    callbacks
        .add("h", |_: &i32, _: &()| -> Result<(), std::io::Error> { Ok(()) })
        .unwrap();

    assert_eq!(callbacks.run("h", 4_i32, &()).unwrap(), 8);
    assert!(callbacks.run("h", -1_i32, &()).is_err());
}

#[test]
fn callbacks_added_during_a_run_apply_to_the_next_run() {
    let callbacks = Arc::new(Callbacks::new());
    let registry = Arc::downgrade(&callbacks);
    callbacks
        .add_with_options(
            "h",
            move |n: &u32, _: &()| {
                if let Some(registry) = registry.upgrade() {
                    let late = CallbackOptions::new().with_id("late").with_priority(Priority::LOW);
                    registry.add_with_options("h", |n: &u32, _: &()| Some(n + 100), late).ok();
                }
                Some(n + 1)
            },
            CallbackOptions::new().with_id("first"),
        )
        .unwrap();

    assert_eq!(callbacks.run("h", 0_u32, &()).unwrap(), 1);
    assert_eq!(callbacks.run("h", 0_u32, &()).unwrap(), 101);
}

#[test]
fn priority_beats_registration_order() {
    let callbacks = Callbacks::new();
    let append = |label: &'static str| {
        move |items: &Vec<&'static str>, _: &()| {
            let mut items = items.clone();
            items.push(label);
            Some(items)
        }
    };
    callbacks.add_with_priority("hook", append("A"), Priority::LOW).unwrap();
    callbacks.add_with_priority("hook", append("B"), Priority::HIGH).unwrap();

    assert_eq!(callbacks.run("hook", Vec::<&str>::new(), &()).unwrap(), ["B", "A"]);
}

#[test]
fn pass_through_callback_then_removal() {
    let callbacks = Callbacks::new();
    let id = callbacks
        .add_with_options("h", |_: &i32, _: &()| None, CallbackOptions::new().with_id("C"))
        .unwrap();
    assert_eq!(id, "C");
    assert_eq!(callbacks.run("h", 5_i32, &()).unwrap(), 5);

    assert!(callbacks.remove("h", "C"));
    assert_eq!(callbacks.run("h", 5_i32, &()).unwrap(), 5);
}
