//! Shared fixtures for integration tests.

#![allow(dead_code)]

use backstack_navigator::{DialogId, Navigator, ScopeConfig};
use serde::{Deserialize, Serialize};

/// Destinations of the root scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RootScreen {
    Home,
    Settings,
    SettingsDetail,
}

/// Destinations of the nested settings-detail scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetailScreen {
    First,
    Second,
    Third,
}

/// Dialog ids usable in the root scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RootDialog {
    Confirm { subject: String },
    About,
}

impl DialogId for RootDialog {
    fn kind(&self) -> &'static str {
        match self {
            RootDialog::Confirm { .. } => "confirm",
            RootDialog::About => "about",
        }
    }
}

pub const ROOT: &str = "root";
pub const DETAIL: &str = "settings-detail";

/// Config for the root scope, dialogs declared.
pub fn root_config() -> ScopeConfig<RootScreen> {
    ScopeConfig::new(ROOT, RootScreen::Home).with_dialogs(&["confirm", "about"])
}

/// Config for the nested scope owned by the SettingsDetail destination.
pub fn detail_config() -> ScopeConfig<DetailScreen> {
    ScopeConfig::new(DETAIL, DetailScreen::First).child_of(RootScreen::SettingsDetail)
}

pub fn confirm(subject: &str) -> RootDialog {
    RootDialog::Confirm {
        subject: subject.to_string(),
    }
}

/// A navigator with the root scope resolved.
pub fn navigator_with_root() -> Navigator {
    let navigator = Navigator::new();
    navigator
        .controller_with_dialogs::<RootScreen, RootDialog>(root_config())
        .expect("fresh root scope");
    navigator
}
