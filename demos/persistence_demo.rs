//! Walkthrough: persisting navigation state across a simulated restart.
//!
//! Run with `cargo run --example persistence_demo`.

use backstack_navigator::{Navigator, ScopeConfig, StateBlob};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Screen {
    Inbox,
    Thread { id: u64 },
    Compose,
}

fn main() {
    env_logger::init();

    // First "process": navigate somewhere interesting, then persist.
    let bytes = {
        let navigator = Navigator::new();
        let mail = navigator
            .controller(ScopeConfig::new("mail", Screen::Inbox))
            .expect("fresh scope");
        mail.navigate_to(Screen::Thread { id: 42 }).unwrap();
        mail.navigate_to(Screen::Compose).unwrap();

        let blob = navigator.persist().expect("serializable destinations");
        blob.to_bytes().expect("encodable blob")
    };
    println!("persisted {} bytes", bytes.len());

    // Second "process": restore and keep going as if nothing happened.
    let blob = StateBlob::from_bytes(&bytes).expect("decodable blob");
    let navigator = Navigator::restore(blob);
    let mail = navigator
        .controller(ScopeConfig::new("mail", Screen::Inbox))
        .expect("restorable scope");

    println!("restored stack:");
    for record in mail.records() {
        println!("  {:?}", record.destination());
    }

    let popped = navigator.go_back().and_then(|p| p.destination::<Screen>());
    println!("back popped {:?}, current {:?}", popped, mail.current());
}
