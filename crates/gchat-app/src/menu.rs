//! Window menu bar and the action registry shared with the tray menu

use muda::accelerator::{Accelerator, Code, Modifiers};
use muda::{Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use std::collections::HashMap;

/// Something the user can ask for from a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleWindow,
    Relaunch,
    Quit,
    Reload,
    OpenProject,
    About,
}

/// Maps menu item ids to actions for both the menu bar and the tray
#[derive(Debug, Default)]
pub struct MenuActions {
    actions: HashMap<MenuId, MenuAction>,
}

impl MenuActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: MenuId, action: MenuAction) {
        self.actions.insert(id, action);
    }

    /// Create a menu item bound to `action`
    pub fn item(
        &mut self,
        text: &str,
        action: MenuAction,
        accelerator: Option<Accelerator>,
    ) -> MenuItem {
        let item = MenuItem::new(text, true, accelerator);
        self.register(item.id().clone(), action);
        item
    }

    pub fn lookup(&self, id: &MenuId) -> Option<MenuAction> {
        self.actions.get(id).copied()
    }
}

/// File, View and Help menus
pub fn build_menu_bar(actions: &mut MenuActions) -> anyhow::Result<Menu> {
    let relaunch = actions.item("Relaunch", MenuAction::Relaunch, None);
    let quit = actions.item(
        "Quit",
        MenuAction::Quit,
        Some(Accelerator::new(Some(Modifiers::CONTROL), Code::KeyQ)),
    );
    let file = Submenu::with_items(
        "&File",
        true,
        &[&relaunch, &PredefinedMenuItem::separator(), &quit],
    )?;

    let reload = actions.item(
        "Reload",
        MenuAction::Reload,
        Some(Accelerator::new(Some(Modifiers::CONTROL), Code::KeyR)),
    );
    let view = Submenu::with_items("&View", true, &[&reload])?;

    let github = actions.item("Official GitHub", MenuAction::OpenProject, None);
    let about = actions.item("About", MenuAction::About, None);
    let help = Submenu::with_items(
        "&Help",
        true,
        &[&github, &PredefinedMenuItem::separator(), &about],
    )?;

    Ok(Menu::with_items(&[&file, &view, &help])?)
}
