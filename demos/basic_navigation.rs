//! Walkthrough: nested scopes and global back-navigation.
//!
//! Run with `cargo run --example basic_navigation`.

use backstack_navigator::{NavOptions, Navigator, ScopeConfig, Transition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum RootScreen {
    Home,
    Settings,
    SettingsDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum DetailScreen {
    First,
    Second,
}

fn print_tree(navigator: &Navigator) {
    for entry in navigator.all_history() {
        println!("  [{}] {}", entry.scope, entry.description);
    }
    println!();
}

fn main() {
    env_logger::init();

    let navigator = Navigator::new();
    let root = navigator
        .controller(ScopeConfig::new("root", RootScreen::Home))
        .expect("fresh root scope");

    root.navigate_to(RootScreen::Settings).unwrap();
    root.navigate_with(
        RootScreen::SettingsDetail,
        NavOptions::new()
            .single_top()
            .transition(Transition::slide_left(250)),
    )
    .unwrap();

    // A nested scope owned by the SettingsDetail destination.
    let detail = navigator
        .controller(
            ScopeConfig::new("settings-detail", DetailScreen::First)
                .child_of(RootScreen::SettingsDetail),
        )
        .expect("fresh nested scope");
    detail.navigate_to(DetailScreen::Second).unwrap();

    println!("after navigation:");
    print_tree(&navigator);

    while navigator.can_go_back() {
        if let Some(popped) = navigator.go_back() {
            println!("back: {:?} removed from '{}'", popped.kind(), popped.scope());
        }
        print_tree(&navigator);
    }

    println!("back gesture exhausted; current tree has {} scope(s)", navigator.scope_count());
}
